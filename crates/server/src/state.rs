use docvec_common::{AppConfig, Result};
use docvec_embedding::Embedder;
use docvec_vector::IndexEngine;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Index engine
    pub engine: Arc<IndexEngine>,
}

impl AppState {
    /// Create new application state, loading the persisted snapshot
    pub fn new(config: AppConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let engine = IndexEngine::open(&config, embedder)?;

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }
}
