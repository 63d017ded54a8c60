/// Docvec error types
#[derive(Debug, thiserror::Error)]
pub enum DocvecError {
    /// Missing or empty required field (id, text, query)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation targets a nonexistent document id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document id already present (only raised when duplicates are rejected)
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Vector length disagrees with the configured embedding dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Row order references an id with no cached vector.
    /// Signals that the index invariants were already broken.
    #[error("Missing cached vector for id: {0}")]
    MissingCachedVector(String),

    /// Durable snapshot write or read failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Embedding backend failed or returned unusable output
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocvecError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create missing cached vector error
    pub fn missing_cached_vector<S: Into<String>>(id: S) -> Self {
        Self::MissingCachedVector(id.into())
    }

    /// Create persistence error
    pub fn persistence<S: Into<String>>(msg: S) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create embedding error
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error indicates a broken index rather than a bad request
    pub fn is_consistency_fault(&self) -> bool {
        matches!(self, Self::MissingCachedVector(_) | Self::Internal(_))
    }
}

// HTTP response conversion
impl DocvecError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::DuplicateId(_) => 409,
            Self::DimensionMismatch { .. } => 422,
            Self::MissingCachedVector(_) => 500,
            Self::Persistence(_) => 500,
            Self::Embedding(_) => 502,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}
