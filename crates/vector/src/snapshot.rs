//! Snapshot persistence.
//!
//! A snapshot is two co-located artifacts written and read together: the
//! bincode-encoded flat index and a JSON state file holding documents, row
//! order and cached vectors.

use docvec_common::{AppConfig, DocvecError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cache::EmbeddingCache;
use crate::flat::FlatIndex;
use crate::state::IndexState;
use crate::store::{DocumentStore, StoredDocument};

#[derive(Serialize)]
struct StateFileRef<'a> {
    documents: &'a IndexMap<String, StoredDocument>,
    id_list: &'a [String],
    embeddings: &'a HashMap<String, Vec<f32>>,
}

#[derive(Deserialize)]
struct StateFile {
    documents: IndexMap<String, StoredDocument>,
    id_list: Vec<String>,
    embeddings: HashMap<String, Vec<f32>>,
}

/// Locations of the two snapshot artifacts
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    index_path: PathBuf,
    state_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(index_path: impl Into<PathBuf>, state_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            state_path: state_path.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.index_path(), config.state_path())
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Load the snapshot, or start empty when it is absent or unusable
    pub(crate) fn load_or_empty(&self, dim: usize) -> IndexState {
        match self.try_load(dim) {
            Ok(Some(state)) => {
                info!("Loaded {} documents from disk", state.len());
                state
            }
            Ok(None) => {
                info!("Creating new index and state");
                IndexState::empty(dim)
            }
            Err(e) => {
                warn!("Failed to load index or state: {}. Creating new ones.", e);
                IndexState::empty(dim)
            }
        }
    }

    /// `Ok(None)` unless both artifacts exist
    pub(crate) fn try_load(&self, dim: usize) -> Result<Option<IndexState>> {
        let index_exists = self.index_path.exists();
        let state_exists = self.state_path.exists();

        if !index_exists && !state_exists {
            return Ok(None);
        }
        if index_exists != state_exists {
            warn!(
                "Incomplete snapshot (index present: {}, state present: {}), ignoring it",
                index_exists, state_exists
            );
            return Ok(None);
        }

        info!("Loading existing index and state...");
        let bytes = std::fs::read(&self.index_path).map_err(|e| {
            DocvecError::persistence(format!("Failed to read {}: {}", self.index_path.display(), e))
        })?;
        let index = FlatIndex::from_bytes(&bytes)?;

        let data = std::fs::read_to_string(&self.state_path).map_err(|e| {
            DocvecError::persistence(format!("Failed to read {}: {}", self.state_path.display(), e))
        })?;
        let file: StateFile = serde_json::from_str(&data).map_err(|e| {
            DocvecError::persistence(format!("Failed to parse {}: {}", self.state_path.display(), e))
        })?;

        // Documents are re-keyed in row order so listings follow the index
        let mut documents = file.documents;
        let mut ordered = IndexMap::with_capacity(documents.len());
        for id in &file.id_list {
            if let Some(doc) = documents.shift_remove(id) {
                ordered.insert(id.clone(), doc);
            }
        }
        if let Some(stray) = documents.keys().next() {
            return Err(DocvecError::persistence(format!(
                "Document {} is not in the row order",
                stray
            )));
        }

        let state = IndexState {
            index,
            documents: DocumentStore::from_entries(ordered),
            cache: EmbeddingCache::from_map(file.embeddings),
            row_order: file.id_list,
        };
        state
            .verify(dim)
            .map_err(|e| DocvecError::persistence(format!("Inconsistent snapshot: {}", e)))?;

        Ok(Some(state))
    }

    /// Write both artifacts.
    ///
    /// Each is written to a temporary sibling and renamed into place.
    pub(crate) async fn save(&self, state: &IndexState) -> Result<()> {
        info!("Saving index and state to disk...");

        let index_bytes = state.index.to_bytes()?;
        let state_bytes = serde_json::to_vec(&StateFileRef {
            documents: state.documents.entries(),
            id_list: &state.row_order,
            embeddings: state.cache.as_map(),
        })
        .map_err(|e| DocvecError::persistence(format!("Failed to encode state: {}", e)))?;

        let index_tmp = tmp_path(&self.index_path);
        let state_tmp = tmp_path(&self.state_path);

        write_file(&index_tmp, &index_bytes).await?;
        write_file(&state_tmp, &state_bytes).await?;
        rename_file(&index_tmp, &self.index_path).await?;
        rename_file(&state_tmp, &self.state_path).await?;

        info!("State saved");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes).await.map_err(|e| {
        DocvecError::persistence(format!("Failed to write {}: {}", path.display(), e))
    })
}

async fn rename_file(from: &Path, to: &Path) -> Result<()> {
    tokio::fs::rename(from, to).await.map_err(|e| {
        DocvecError::persistence(format!(
            "Failed to move {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metadata;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_state() -> IndexState {
        let mut state = IndexState::empty(2);
        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), json!("First"));
        state.upsert("a", "alpha", metadata, vec![1.0, 0.0]).unwrap();
        state.upsert("b", "beta", Metadata::new(), vec![0.0, 1.0]).unwrap();
        state
    }

    fn store_in(dir: &Path) -> SnapshotStore {
        SnapshotStore::new(dir.join("faiss_index.bin"), dir.join("state.json"))
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let state = sample_state();

        store.save(&state).await.unwrap();
        let loaded = store.try_load(2).unwrap().unwrap();

        assert_eq!(loaded, state);
        assert!(!tmp_path(store.index_path()).exists());
    }

    #[tokio::test]
    async fn test_state_file_layout() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_state()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.state_path()).unwrap()).unwrap();
        assert_eq!(raw["id_list"], json!(["a", "b"]));
        assert_eq!(raw["documents"]["a"]["text"], "alpha");
        assert_eq!(raw["documents"]["a"]["metadata"]["title"], "First");
        assert_eq!(raw["embeddings"]["b"], json!([0.0, 1.0]));
    }

    #[test]
    fn test_missing_artifacts_start_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.try_load(2).unwrap().is_none());
        assert!(store.load_or_empty(2).is_empty());
    }

    #[tokio::test]
    async fn test_single_artifact_is_ignored() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_state()).await.unwrap();
        std::fs::remove_file(store.index_path()).unwrap();

        assert!(store.try_load(2).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_state_falls_back_to_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_state()).await.unwrap();
        std::fs::write(store.state_path(), b"{ not json").unwrap();

        assert!(store.try_load(2).is_err());
        assert!(store.load_or_empty(2).is_empty());
    }

    #[tokio::test]
    async fn test_mismatched_artifacts_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_state()).await.unwrap();

        // Index from a different snapshot with one row
        let mut other = FlatIndex::new(2);
        other.append(&[vec![1.0, 0.0]]).unwrap();
        std::fs::write(store.index_path(), other.to_bytes().unwrap()).unwrap();

        assert!(matches!(store.try_load(2), Err(DocvecError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_stale_index_beside_state_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_state()).await.unwrap();

        // Same shape, rows swapped
        let mut other = FlatIndex::new(2);
        other.append(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        std::fs::write(store.index_path(), other.to_bytes().unwrap()).unwrap();

        assert!(matches!(store.try_load(2), Err(DocvecError::Persistence(_))));
        assert!(store.load_or_empty(2).is_empty());
    }

    #[tokio::test]
    async fn test_dimension_change_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_state()).await.unwrap();

        assert!(store.try_load(384).is_err());
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir.path().join("missing"));

        let err = store.save(&sample_state()).await.unwrap_err();
        assert!(matches!(err, DocvecError::Persistence(_)));
    }
}
