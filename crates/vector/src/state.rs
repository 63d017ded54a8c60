use docvec_common::{DocvecError, Result};
use std::collections::HashSet;

use crate::cache::EmbeddingCache;
use crate::flat::FlatIndex;
use crate::store::DocumentStore;
use crate::types::{Document, Metadata};

/// Per-component slack allowed between an index row and its cached vector
const ROW_TOLERANCE: f32 = 1e-6;

/// The vector index, document store, embedding cache and row order as one unit.
///
/// `row_order[i]` names the document whose vector is row `i` of `index`; every
/// document id appears exactly once in `row_order` and once in `cache`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IndexState {
    pub(crate) index: FlatIndex,
    pub(crate) documents: DocumentStore,
    pub(crate) cache: EmbeddingCache,
    pub(crate) row_order: Vec<String>,
}

impl IndexState {
    pub(crate) fn empty(dim: usize) -> Self {
        Self {
            index: FlatIndex::new(dim),
            documents: DocumentStore::new(),
            cache: EmbeddingCache::new(),
            row_order: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.row_order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.row_order.is_empty()
    }

    fn row_of(&self, id: &str) -> Option<usize> {
        self.row_order.iter().position(|r| r == id)
    }

    /// Insert a document with its normalized vector, or replace it in place
    pub(crate) fn upsert(
        &mut self,
        id: &str,
        text: &str,
        metadata: Metadata,
        vector: Vec<f32>,
    ) -> Result<()> {
        if self.documents.contains(id) {
            let row = self.row_of(id).ok_or_else(|| {
                DocvecError::internal(format!("Document {} has no row in the index", id))
            })?;
            self.index.replace(row, &vector)?;
        } else {
            self.index.append(&[&vector])?;
            self.row_order.push(id.to_string());
        }

        self.documents.put(id, text, metadata);
        self.cache.put(id, vector);
        Ok(())
    }

    /// Remove a document and rebuild the index from cached vectors
    pub(crate) fn remove(&mut self, id: &str) -> Result<()> {
        self.documents.delete(id)?;

        let row = self.row_of(id).ok_or_else(|| {
            DocvecError::internal(format!("Document {} has no row in the index", id))
        })?;
        self.row_order.remove(row);
        self.cache.delete(id);

        let vectors = self.cache.all_ordered(self.row_order.as_slice())?;
        self.index.rebuild(&vectors)
    }

    /// Rows mapped back to documents; rows with no document are skipped
    pub(crate) fn resolve_row(&self, row: usize) -> Option<Document> {
        let id = self.row_order.get(row)?;
        self.documents.get(id).ok()
    }

    /// Check the cross-structure invariants
    pub(crate) fn verify(&self, dim: usize) -> Result<()> {
        if self.index.dim() != dim {
            return Err(DocvecError::dimension_mismatch(dim, self.index.dim()));
        }

        let rows = self.row_order.len();
        if self.index.size() != rows || self.documents.len() != rows || self.cache.len() != rows {
            return Err(DocvecError::internal(format!(
                "Size mismatch: {} rows, {} vectors, {} documents, {} cached vectors",
                rows,
                self.index.size(),
                self.documents.len(),
                self.cache.len()
            )));
        }

        let mut seen = HashSet::with_capacity(rows);
        for (row, id) in self.row_order.iter().enumerate() {
            if !seen.insert(id.as_str()) {
                return Err(DocvecError::internal(format!("Duplicate row for id {}", id)));
            }
            if !self.documents.contains(id) {
                return Err(DocvecError::internal(format!("Row {} has no document", id)));
            }
            let cached = self.cache.get(id).map_err(|_| DocvecError::missing_cached_vector(id.as_str()))?;
            if cached.len() != dim {
                return Err(DocvecError::dimension_mismatch(dim, cached.len()));
            }

            let stored = self.index.row(row).ok_or_else(|| {
                DocvecError::internal(format!("Row {} is missing from the index", row))
            })?;
            if stored.iter().zip(cached).any(|(a, b)| (a - b).abs() > ROW_TOLERANCE) {
                return Err(DocvecError::internal(format!(
                    "Row {} does not hold the cached vector for {}",
                    row, id
                )));
            }
        }

        Ok(())
    }
}
