use crate::error::DocvecError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Docvec application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the persisted snapshot
    pub data_dir: PathBuf,

    /// Index artifact file name (inside `data_dir`)
    pub index_file_name: String,

    /// State artifact file name (inside `data_dir`)
    pub state_file_name: String,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Embedding dimension produced by the model
    pub embedding_dim: usize,

    /// Prefix applied to documents before encoding
    pub passage_prefix: String,

    /// Prefix applied to search queries before encoding
    pub query_prefix: String,

    /// Result count when a search request omits one
    pub default_top_k: usize,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./faiss_data"),
            index_file_name: "faiss_index.bin".to_string(),
            state_file_name: "state.json".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "intfloat/multilingual-e5-small".to_string(),
            embedding_dim: 384,
            passage_prefix: "passage: ".to_string(),
            query_prefix: "query: ".to_string(),
            default_top_k: 5,
            server_host: "127.0.0.1".to_string(),
            server_port: 8001,
            log_dir: PathBuf::from("./faiss_data/log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file.
    ///
    /// Directories are not created here; call [`AppConfig::ensure_directories`]
    /// once any overrides have been applied.
    pub fn from_env() -> Result<Self, DocvecError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let config = Self {
            data_dir: Self::get_env_path("DATA_DIR").unwrap_or(defaults.data_dir),
            index_file_name: std::env::var("INDEX_FILE_NAME")
                .unwrap_or(defaults.index_file_name),
            state_file_name: std::env::var("STATE_FILE_NAME")
                .unwrap_or(defaults.state_file_name),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or(defaults.ollama_base_url),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or(defaults.embedding_model),
            embedding_dim: Self::get_env_parsed("EMBEDDING_DIM")?
                .unwrap_or(defaults.embedding_dim),
            passage_prefix: std::env::var("PASSAGE_PREFIX").unwrap_or(defaults.passage_prefix),
            query_prefix: std::env::var("QUERY_PREFIX").unwrap_or(defaults.query_prefix),
            default_top_k: Self::get_env_parsed("DEFAULT_TOP_K")?
                .unwrap_or(defaults.default_top_k),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Parse a numeric environment variable; a present but malformed value is an error
    fn get_env_parsed(key: &str) -> Result<Option<usize>, DocvecError> {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|e| {
                DocvecError::config(format!("{} must be a positive integer ({}): {}", key, raw, e))
            }),
            Err(_) => Ok(None),
        }
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), DocvecError> {
        for dir in [&self.data_dir, &self.log_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    DocvecError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Full path of the index artifact
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file_name)
    }

    /// Full path of the state artifact
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.state_file_name)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DocvecError> {
        if self.embedding_model.is_empty() {
            return Err(DocvecError::config("Embedding model name cannot be empty"));
        }

        if self.embedding_dim == 0 {
            return Err(DocvecError::config("Embedding dimension cannot be 0"));
        }

        if self.default_top_k == 0 {
            return Err(DocvecError::config("Default top_k cannot be 0"));
        }

        // Asymmetric retrieval models need distinct framings
        if self.passage_prefix == self.query_prefix {
            return Err(DocvecError::config(
                "Passage and query prefixes must differ",
            ));
        }

        // Validate Ollama URL
        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://") {
            return Err(DocvecError::config(
                "Ollama base URL must start with http:// or https://"
            ));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(DocvecError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.embedding_dim, 384);
        assert_eq!(config.default_top_k, 5);
    }

    #[test]
    fn test_artifact_paths() {
        let config = AppConfig::default();
        assert_eq!(config.index_path(), PathBuf::from("./faiss_data/faiss_index.bin"));
        assert_eq!(config.state_path(), PathBuf::from("./faiss_data/state.json"));
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "127.0.0.1:8001");
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.embedding_dim = 0;
        assert!(invalid_config.validate().is_err());

        let mut same_prefix = AppConfig::default();
        same_prefix.query_prefix = same_prefix.passage_prefix.clone();
        assert!(same_prefix.validate().is_err());

        let mut bad_url = AppConfig::default();
        bad_url.ollama_base_url = "localhost:11434".to_string();
        assert!(bad_url.validate().is_err());
    }
}
