use docvec_common::{DocvecError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{Document, Metadata};

/// Document body as persisted in the state artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Id -> document map that keeps insertion order across deletes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStore {
    documents: IndexMap<String, StoredDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(documents: IndexMap<String, StoredDocument>) -> Self {
        Self { documents }
    }

    pub(crate) fn entries(&self) -> &IndexMap<String, StoredDocument> {
        &self.documents
    }

    /// Insert or overwrite; an existing id keeps its position
    pub fn put(&mut self, id: impl Into<String>, text: impl Into<String>, metadata: Metadata) {
        self.documents.insert(
            id.into(),
            StoredDocument {
                text: text.into(),
                metadata,
            },
        );
    }

    pub fn get(&self, id: &str) -> Result<Document> {
        self.documents
            .get(id)
            .map(|stored| to_document(id, stored))
            .ok_or_else(|| DocvecError::not_found(format!("Document not found: {}", id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Remove a document, keeping the relative order of the rest
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.documents
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| DocvecError::not_found(format!("Document not found: {}", id)))
    }

    /// All documents in insertion order
    pub fn list(&self) -> Vec<Document> {
        self.documents
            .iter()
            .map(|(id, stored)| to_document(id, stored))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn to_document(id: &str, stored: &StoredDocument) -> Document {
    Document {
        id: id.to_string(),
        text: stored.text.clone(),
        metadata: stored.metadata.clone(),
    }
}
