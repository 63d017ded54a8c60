use docvec_common::{DocvecError, Result};
use std::collections::HashMap;

/// Id -> normalized vector, used to rebuild the index without re-embedding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingCache {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(vectors: HashMap<String, Vec<f32>>) -> Self {
        Self { vectors }
    }

    pub(crate) fn as_map(&self) -> &HashMap<String, Vec<f32>> {
        &self.vectors
    }

    pub fn put(&mut self, id: impl Into<String>, vector: Vec<f32>) {
        self.vectors.insert(id.into(), vector);
    }

    pub fn get(&self, id: &str) -> Result<&[f32]> {
        self.vectors
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| DocvecError::not_found(format!("No cached vector for {}", id)))
    }

    pub fn delete(&mut self, id: &str) -> Option<Vec<f32>> {
        self.vectors.remove(id)
    }

    /// Cached vectors in the given id order.
    ///
    /// A missing id means row order and cache have diverged.
    pub fn all_ordered<S: AsRef<str>>(&self, order: &[S]) -> Result<Vec<&[f32]>> {
        order
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.vectors
                    .get(id)
                    .map(Vec::as_slice)
                    .ok_or_else(|| DocvecError::missing_cached_vector(id))
            })
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vectors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ordered_follows_given_order() {
        let mut cache = EmbeddingCache::new();
        cache.put("a", vec![1.0, 0.0]);
        cache.put("b", vec![0.0, 1.0]);

        let vectors = cache.all_ordered(&["b", "a"]).unwrap();
        assert_eq!(vectors, vec![&[0.0f32, 1.0][..], &[1.0f32, 0.0][..]]);
    }

    #[test]
    fn test_all_ordered_missing_vector() {
        let mut cache = EmbeddingCache::new();
        cache.put("a", vec![1.0]);

        let err = cache.all_ordered(&["a", "ghost"]).unwrap_err();
        assert!(matches!(err, DocvecError::MissingCachedVector(id) if id == "ghost"));
    }

    #[test]
    fn test_get_and_delete() {
        let mut cache = EmbeddingCache::new();
        cache.put("a", vec![1.0]);
        assert_eq!(cache.get("a").unwrap(), &[1.0f32][..]);

        assert!(cache.delete("a").is_some());
        assert!(cache.get("a").is_err());
        assert!(cache.delete("a").is_none());
    }
}
