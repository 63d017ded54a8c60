//! Docvec HTTP server
//!
//! Actix-web JSON API over the index engine

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_web::{error::InternalError, web, App, HttpResponse, HttpServer};
use docvec_common::{AppConfig, Result};
use docvec_embedding::{Embedder, OllamaEmbedder};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use state::AppState;

/// Register every route and the JSON body error handler
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let body = serde_json::json!({ "error": err.to_string() });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    cfg.app_data(json_config)
        .service(routes::system::health)
        .service(routes::system::stats)
        .service(routes::documents::add_document)
        .service(routes::documents::add_documents_batch)
        .service(routes::documents::list_documents)
        .service(routes::documents::get_document)
        .service(routes::documents::delete_document)
        .service(routes::documents::clear_index)
        .service(routes::search::search);
}

/// Build the engine against Ollama and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let embedder: Arc<dyn Embedder> = Arc::new(OllamaEmbedder::from_config(&config)?);
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config, embedder)?);

    info!("Starting HTTP server on {}", bind_addr);

    let data = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(data.clone())
            .configure(configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}
