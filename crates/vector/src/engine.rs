use docvec_common::{AppConfig, DocvecError, Result};
use docvec_embedding::{Embedder, EncodeMode};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::similarity::{distance_to_similarity, l2_normalize};
use crate::snapshot::SnapshotStore;
use crate::state::IndexState;
use crate::types::{
    BatchAddResult, Document, DocumentView, IndexStats, Metadata, NewDocument, SearchHit,
};

/// Index engine
///
/// Owns the flat index, document store, embedding cache and row order as one
/// unit behind a single lock. Every mutation is applied to a staged copy,
/// written to disk, and only then made visible; a failed write leaves the
/// previous state in place.
pub struct IndexEngine {
    state: Mutex<IndexState>,
    snapshot: SnapshotStore,
    embedder: Arc<dyn Embedder>,
    embedding_dim: usize,
    default_top_k: usize,
}

impl IndexEngine {
    /// Create the engine from configuration, loading any persisted snapshot
    pub fn open(config: &AppConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::with_snapshot(
            SnapshotStore::from_config(config),
            config.embedding_dim,
            config.default_top_k,
            embedder,
        )
    }

    pub fn with_snapshot(
        snapshot: SnapshotStore,
        embedding_dim: usize,
        default_top_k: usize,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        if embedder.dimension() != embedding_dim {
            return Err(DocvecError::config(format!(
                "Embedder {} produces {}-dim vectors, index is configured for {}",
                embedder.model(),
                embedder.dimension(),
                embedding_dim
            )));
        }

        let state = snapshot.load_or_empty(embedding_dim);

        info!(
            "Index engine initialized - {} documents, dim={}, model={}",
            state.len(),
            embedding_dim,
            embedder.model()
        );

        Ok(Self {
            state: Mutex::new(state),
            snapshot,
            embedder,
            embedding_dim,
            default_top_k,
        })
    }

    pub fn model(&self) -> &str {
        self.embedder.model()
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Add or replace one document
    pub async fn add(&self, id: &str, text: &str, metadata: Metadata) -> Result<()> {
        validate_document(id, text)?;
        info!("Adding document to index: {}", id);

        let mut vectors = self.encode_normalized(&[text.to_string()], EncodeMode::Passage).await?;
        let vector = vectors
            .pop()
            .ok_or_else(|| DocvecError::embedding("Embedder returned no vector"))?;

        let mut guard = self.state.lock().await;
        let mut staged = guard.clone();
        staged.upsert(id, text, metadata, vector)?;
        self.commit(&mut guard, staged).await?;

        info!("Document added to index: {}", id);
        Ok(())
    }

    /// Add or replace many documents with a single encode call and a single write
    pub async fn add_batch(&self, documents: Vec<NewDocument>) -> Result<BatchAddResult> {
        if documents.is_empty() {
            let total_documents = self.state.lock().await.len();
            return Ok(BatchAddResult {
                added: 0,
                total_documents,
            });
        }

        for doc in &documents {
            validate_document(&doc.id, &doc.text)?;
        }
        info!("Adding batch of {} documents", documents.len());

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = self.encode_normalized(&texts, EncodeMode::Passage).await?;

        let mut guard = self.state.lock().await;
        let mut staged = guard.clone();
        let previous = staged.len();
        for (doc, vector) in documents.into_iter().zip(vectors) {
            staged.upsert(&doc.id, &doc.text, doc.metadata, vector)?;
        }
        let total_documents = staged.len();
        let added = total_documents - previous;
        self.commit(&mut guard, staged).await?;

        info!("Batch added: {} documents, {} total", added, total_documents);
        Ok(BatchAddResult {
            added,
            total_documents,
        })
    }

    /// Nearest documents to `query`, closest first
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(DocvecError::invalid_input("Missing query"));
        }
        let top_k = top_k.unwrap_or(self.default_top_k);
        if top_k == 0 {
            return Err(DocvecError::invalid_input("top_k must be at least 1"));
        }

        debug!("Searching for: {} (top_k={})", query, top_k);

        if self.state.lock().await.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = self.encode_normalized(&[query.to_string()], EncodeMode::Query).await?;
        let query_vector = vectors
            .pop()
            .ok_or_else(|| DocvecError::embedding("Embedder returned no vector"))?;

        let state = self.state.lock().await;
        let ranked = state.index.search(&query_vector, top_k)?;

        let mut hits = Vec::with_capacity(ranked.len());
        for (row, distance) in ranked {
            match state.resolve_row(row) {
                Some(doc) => hits.push(SearchHit {
                    id: doc.id,
                    score: distance,
                    similarity: distance_to_similarity(distance),
                    text: doc.text,
                    metadata: doc.metadata,
                }),
                None => warn!("Skipping row {} with no document", row),
            }
        }

        debug!("Search completed - {} results", hits.len());
        Ok(hits)
    }

    /// Remove a document and rebuild the index from cached vectors
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        let mut staged = guard.clone();

        if let Err(e) = staged.remove(id) {
            if e.is_consistency_fault() {
                error!("Index consistency fault while deleting {}: {}", id, e);
            }
            return Err(e);
        }
        self.commit(&mut guard, staged).await?;

        info!("Document deleted from index: {}", id);
        Ok(())
    }

    /// Drop every document
    pub async fn clear(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        self.commit(&mut guard, IndexState::empty(self.embedding_dim)).await?;

        info!("Index cleared");
        Ok(())
    }

    pub async fn get_document(&self, id: &str) -> Result<Document> {
        self.state.lock().await.documents.get(id)
    }

    /// Display projections of all documents in row order
    pub async fn list_documents(&self) -> Vec<DocumentView> {
        self.state
            .lock()
            .await
            .documents
            .list()
            .iter()
            .map(DocumentView::project)
            .collect()
    }

    pub async fn stats(&self) -> IndexStats {
        let state = self.state.lock().await;
        IndexStats {
            total_documents: state.index.size(),
            embedding_dim: self.embedding_dim,
        }
    }

    /// Verify the cross-structure invariants of the live state
    pub async fn check_consistency(&self) -> Result<()> {
        self.state.lock().await.verify(self.embedding_dim)
    }

    /// Persist `staged` and make it the live state
    async fn commit(&self, guard: &mut MutexGuard<'_, IndexState>, staged: IndexState) -> Result<()> {
        if let Err(e) = self.snapshot.save(&staged).await {
            error!("Failed to persist snapshot, keeping previous state: {}", e);
            return Err(e);
        }
        **guard = staged;
        Ok(())
    }

    /// Encode, then check dimension and unit-normalize each vector independently
    async fn encode_normalized(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>> {
        let raw = self.embedder.encode(texts, mode).await?;
        if raw.len() != texts.len() {
            return Err(DocvecError::embedding(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                raw.len()
            )));
        }

        raw.into_iter()
            .map(|v| {
                if v.len() != self.embedding_dim {
                    return Err(DocvecError::dimension_mismatch(self.embedding_dim, v.len()));
                }
                l2_normalize(v)
            })
            .collect()
    }
}

fn validate_document(id: &str, text: &str) -> Result<()> {
    if id.trim().is_empty() || text.trim().is_empty() {
        return Err(DocvecError::invalid_input("Missing id or text"));
    }
    Ok(())
}
