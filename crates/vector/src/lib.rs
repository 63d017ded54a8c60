//! Docvec vector index engine
//!
//! Exact nearest-neighbor search over text embeddings, with documents,
//! row order and cached vectors kept consistent and persisted together.

mod cache;
mod engine;
mod flat;
mod similarity;
mod snapshot;
mod state;
mod store;
mod types;

#[cfg(test)]
mod test_support;

pub use cache::EmbeddingCache;
pub use engine::IndexEngine;
pub use flat::FlatIndex;
pub use similarity::{distance_to_similarity, l2_norm, l2_normalize};
pub use snapshot::SnapshotStore;
pub use store::{DocumentStore, StoredDocument};
pub use types::{
    BatchAddResult, Document, DocumentView, IndexStats, Metadata, NewDocument, SearchHit,
};
