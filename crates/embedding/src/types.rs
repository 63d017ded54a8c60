use serde::{Deserialize, Serialize};

/// Ollama batch embed request (`POST /api/embed`)
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    /// Model name (e.g., "nomic-embed-text")
    pub model: String,

    /// Texts to encode, already framed
    pub input: Vec<String>,
}

/// Ollama batch embed response
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    /// Model name
    #[serde(default)]
    pub model: String,

    /// One vector per input, in input order
    pub embeddings: Vec<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = EmbedRequest {
            model: "e5".to_string(),
            input: vec!["passage: hi".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "e5");
        assert_eq!(json["input"][0], "passage: hi");
    }

    #[test]
    fn test_response_without_model_field() {
        let response: EmbedResponse =
            serde_json::from_str(r#"{"embeddings": [[0.1, 0.2], [0.3, 0.4]]}"#).unwrap();
        assert_eq!(response.embeddings.len(), 2);
        assert!(response.model.is_empty());
    }
}
