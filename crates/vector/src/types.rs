use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form document metadata
pub type Metadata = Map<String, Value>;

/// Stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Caller-assigned unique id
    pub id: String,

    /// Text that was embedded
    pub text: String,

    #[serde(default)]
    pub metadata: Metadata,
}

/// Document submitted for indexing
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl NewDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }
}

/// Search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Document ID
    pub id: String,

    /// Squared L2 distance (0.0 is identical direction, 4.0 is opposite)
    pub score: f32,

    /// Distance mapped to (0, 1], higher is closer
    pub similarity: f32,

    pub text: String,

    pub metadata: Metadata,
}

/// Result of a batch insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchAddResult {
    /// Ids new to the index; replaced ids are not counted
    pub added: usize,
    pub total_documents: usize,
}

/// Index statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub embedding_dim: usize,
}

/// Display projection of a document for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(rename = "createdBy")]
    pub created_by: String,
}

impl DocumentView {
    pub const UNTITLED: &'static str = "Untitled";
    pub const DEFAULT_CATEGORY: &'static str = "General";
    pub const DEFAULT_AUTHOR: &'static str = "System";

    /// Project metadata fields, falling back to the raw text and sentinel defaults
    pub fn project(doc: &Document) -> Self {
        let field = |key: &str| metadata_string(&doc.metadata, key);

        Self {
            id: doc.id.clone(),
            title: field("title").unwrap_or_else(|| Self::UNTITLED.to_string()),
            content: field("content").unwrap_or_else(|| doc.text.clone()),
            category: field("category").unwrap_or_else(|| Self::DEFAULT_CATEGORY.to_string()),
            created_by: field("createdBy").unwrap_or_else(|| Self::DEFAULT_AUTHOR.to_string()),
        }
    }
}

/// Metadata value as display text; null and missing are both absent
fn metadata_string(metadata: &Metadata, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
