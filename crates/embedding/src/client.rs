use async_trait::async_trait;
use docvec_common::{AppConfig, DocvecError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::embedder::{Embedder, EmbeddingFraming, EncodeMode};
use crate::types::{EmbedRequest, EmbedResponse};

const MAX_RETRIES: u32 = 3;

/// Ollama embedding client
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimension: usize,
    framing: EmbeddingFraming,
    client: Client,
}

impl OllamaEmbedder {
    /// Create new Ollama embedder
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
        framing: EmbeddingFraming,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama embedder initialized: {} (model={}, dim={})", base_url, model, dimension);
        Ok(Self {
            base_url,
            model,
            dimension,
            framing,
            client,
        })
    }

    /// Build from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.ollama_base_url.clone(),
            config.embedding_model.clone(),
            config.embedding_dim,
            EmbeddingFraming::from_config(config),
        )
    }

    /// Encode with retry on transport failures
    async fn embed_with_retry(&self, input: Vec<String>, max_retries: u32) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let expected = input.len();

        debug!("Generating embeddings - Model: {}, Inputs: {}", self.model, expected);

        let request = EmbedRequest {
            model: self.model.clone(),
            input,
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request).await {
                Ok(embeddings) => {
                    check_embeddings(&embeddings, expected)?;
                    debug!("Received {} embeddings", embeddings.len());
                    return Ok(embeddings);
                }
                Err(e) => {
                    if attempt < max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt - 1));
                        warn!(
                            "Embedding request failed (attempt {}/{}): {}. Retrying in {:?}...",
                            attempt,
                            max_retries,
                            e,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DocvecError::embedding("All retries failed")))
    }

    /// Single attempt to generate embeddings
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| DocvecError::embedding(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| DocvecError::embedding(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response
            .json()
            .await
            .map_err(|e| DocvecError::embedding(format!("Failed to parse embedding response: {}", e)))?;

        Ok(result.embeddings)
    }
}

/// One non-empty vector per input
fn check_embeddings(embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
    if embeddings.len() != expected {
        return Err(DocvecError::embedding(format!(
            "Expected {} embeddings, received {}",
            expected,
            embeddings.len()
        )));
    }
    if embeddings.iter().any(|e| e.is_empty()) {
        return Err(DocvecError::embedding("Empty embedding from Ollama"));
    }
    Ok(())
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn encode(&self, texts: &[String], mode: EncodeMode) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_with_retry(self.framing.frame(texts, mode), MAX_RETRIES).await
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DocvecError::embedding(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }
}
