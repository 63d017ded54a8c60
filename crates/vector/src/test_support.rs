use async_trait::async_trait;
use docvec_common::{DocvecError, Result};
use docvec_embedding::{Embedder, EncodeMode};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Deterministic embedder that maps keywords onto fixed axes:
/// `[animal, feline, finance, bias]`
#[derive(Default)]
pub(crate) struct KeywordEmbedder {
    calls: AtomicUsize,
    modes: Mutex<Vec<EncodeMode>>,
    fail_next: AtomicBool,
    truncate_next: AtomicBool,
}

impl KeywordEmbedder {
    pub(crate) const DIM: usize = 4;

    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn modes(&self) -> Vec<EncodeMode> {
        self.modes.lock().unwrap().clone()
    }

    pub(crate) fn last_mode(&self) -> Option<EncodeMode> {
        self.modes().last().copied()
    }

    /// Next encode call fails
    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Next encode call returns vectors one element short
    pub(crate) fn truncate_next(&self) {
        self.truncate_next.store(true, Ordering::SeqCst);
    }

    fn vector_for(text: &str) -> Vec<f32> {
        let mut v = vec![0.0, 0.0, 0.0, 0.2];
        for word in text.to_lowercase().split_whitespace() {
            match word {
                "cat" | "cats" | "feline" => {
                    v[0] += 1.0;
                    v[1] += 1.0;
                }
                "dog" | "dogs" | "pets" | "mammals" => v[0] += 1.0,
                "stock" | "stocks" | "markets" | "fell" | "rallied" => v[2] += 1.0,
                _ => {}
            }
        }
        v
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    fn model(&self) -> &str {
        "keyword-test"
    }

    fn dimension(&self) -> usize {
        Self::DIM
    }

    async fn encode(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.lock().unwrap().push(mode);

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DocvecError::embedding("model unavailable"));
        }
        let truncate = self.truncate_next.swap(false, Ordering::SeqCst);

        Ok(texts
            .iter()
            .map(|t| {
                let mut v = Self::vector_for(t);
                if truncate {
                    v.pop();
                }
                v
            })
            .collect())
    }
}
