use docvec_vector::{Metadata, NewDocument, SearchHit};
use serde::{Deserialize, Serialize};

/// Add a single document
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub metadata: Metadata,
}

/// Add many documents
#[derive(Debug, Deserialize)]
pub struct AddBatchRequest {
    #[serde(default)]
    pub documents: Vec<NewDocument>,
}

/// Search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Search query text
    #[serde(default)]
    pub query: String,

    /// Result count; the configured default applies when omitted
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

/// Generic status reply
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl StatusResponse {
    pub fn new(status: &'static str) -> Self {
        Self { status, id: None }
    }

    pub fn with_id(status: &'static str, id: impl Into<String>) -> Self {
        Self {
            status,
            id: Some(id.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub embedder_reachable: bool,
}
