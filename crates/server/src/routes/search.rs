use actix_web::{post, web, HttpResponse};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{SearchRequest, SearchResponse};

#[post("/index/search")]
pub async fn search(
    req: web::Json<SearchRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let results = state.engine.search(&req.query, req.top_k).await?;
    Ok(HttpResponse::Ok().json(SearchResponse { results }))
}
