use actix_web::{delete, get, post, web, HttpResponse};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{AddBatchRequest, AddRequest, StatusResponse};

#[post("/index/add")]
pub async fn add_document(
    req: web::Json<AddRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let AddRequest { id, text, metadata } = req.into_inner();
    state.engine.add(&id, &text, metadata).await?;
    Ok(HttpResponse::Ok().json(StatusResponse::with_id("success", id)))
}

#[post("/index/add-batch")]
pub async fn add_documents_batch(
    req: web::Json<AddBatchRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let result = state.engine.add_batch(req.into_inner().documents).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/index/documents")]
pub async fn list_documents(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.engine.list_documents().await))
}

#[get("/index/document/{id}")]
pub async fn get_document(
    path: web::Path<String>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let doc = state.engine.get_document(&path).await?;
    Ok(HttpResponse::Ok().json(doc))
}

#[delete("/index/document/{id}")]
pub async fn delete_document(
    path: web::Path<String>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    state.engine.delete(&path).await?;
    Ok(HttpResponse::Ok().json(StatusResponse::new("deleted")))
}

#[post("/index/clear")]
pub async fn clear_index(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    state.engine.clear().await?;
    Ok(HttpResponse::Ok().json(StatusResponse::new("cleared")))
}
