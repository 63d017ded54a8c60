use async_trait::async_trait;
use docvec_common::{AppConfig, Result};

/// Which side of an asymmetric retrieval pair a text is encoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Stored documents
    Passage,
    /// Search queries
    Query,
}

/// Common trait for embedding backends
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier reported by health checks
    fn model(&self) -> &str;

    /// Length of every vector this embedder produces
    fn dimension(&self) -> usize;

    /// Encode a batch of texts, one vector per input in input order
    async fn encode(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>>;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Textual framing applied before encoding (e5-style "passage: " / "query: ")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingFraming {
    pub passage_prefix: String,
    pub query_prefix: String,
}

impl Default for EmbeddingFraming {
    fn default() -> Self {
        Self {
            passage_prefix: "passage: ".to_string(),
            query_prefix: "query: ".to_string(),
        }
    }
}

impl EmbeddingFraming {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            passage_prefix: config.passage_prefix.clone(),
            query_prefix: config.query_prefix.clone(),
        }
    }

    /// Prefix for the given mode
    pub fn prefix(&self, mode: EncodeMode) -> &str {
        match mode {
            EncodeMode::Passage => &self.passage_prefix,
            EncodeMode::Query => &self.query_prefix,
        }
    }

    /// Apply the mode's prefix to every text
    pub fn frame(&self, texts: &[String], mode: EncodeMode) -> Vec<String> {
        let prefix = self.prefix(mode);
        texts.iter().map(|t| format!("{}{}", prefix, t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_passage_and_query() {
        let framing = EmbeddingFraming::default();
        let texts = vec!["cats are mammals".to_string()];

        assert_eq!(framing.frame(&texts, EncodeMode::Passage), vec!["passage: cats are mammals"]);
        assert_eq!(framing.frame(&texts, EncodeMode::Query), vec!["query: cats are mammals"]);
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.passage_prefix = "doc| ".to_string();
        let framing = EmbeddingFraming::from_config(&config);
        assert_eq!(framing.prefix(EncodeMode::Passage), "doc| ");
        assert_eq!(framing.prefix(EncodeMode::Query), "query: ");
    }
}
