use actix_web::{get, web, HttpResponse};
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness plus embedder reachability
#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    let embedder_reachable = match state.engine.embedder().test_connection().await {
        Ok(reachable) => reachable,
        Err(e) => {
            warn!("Embedder health check failed: {}", e);
            false
        }
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        model: state.engine.model().to_string(),
        embedder_reachable,
    }))
}

#[get("/index/stats")]
pub async fn stats(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.engine.stats().await))
}
