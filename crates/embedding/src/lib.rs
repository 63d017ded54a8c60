//! Docvec embedding collaborator
//!
//! Text-to-vector encoding behind the [`Embedder`] trait, with an Ollama client

mod client;
mod embedder;
mod types;

pub use client::OllamaEmbedder;
pub use embedder::{Embedder, EmbeddingFraming, EncodeMode};
pub use types::{EmbedRequest, EmbedResponse};
