use thiserror::Error;

/// Main error type for the itinerary pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No attractions found for destination `{0}`")]
    CatalogNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Completion request timed out: {0}")]
    Timeout(String),

    #[error("Upstream error: HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Failed to extract itinerary JSON: {message}")]
    Extraction { message: String, raw_preview: String },

    #[error("Generated itinerary failed validation: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Check if this error is retryable by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::Timeout(_)
                | PipelineError::Upstream { .. }
                | PipelineError::MalformedResponse(_)
                | PipelineError::Extraction { .. }
                | PipelineError::Validation(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::InvalidRequest(_) => "INVALID_REQUEST",
            PipelineError::CatalogNotFound(_) => "CATALOG_NOT_FOUND",
            PipelineError::Config(_) => "CONFIG_ERROR",
            PipelineError::Timeout(_) => "TIMEOUT_ERROR",
            PipelineError::Upstream { .. } => "UPSTREAM_ERROR",
            PipelineError::MalformedResponse(_) => "MALFORMED_UPSTREAM_RESPONSE",
            PipelineError::Extraction { .. } => "EXTRACTION_ERROR",
            PipelineError::Validation(_) => "VALIDATION_ERROR",
            PipelineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status classification for callers exposing the pipeline over a
    /// request handler
    pub fn http_status(&self) -> u16 {
        match self {
            PipelineError::InvalidRequest(_) => 400,
            PipelineError::CatalogNotFound(_) => 404,
            PipelineError::Config(_) => 500,
            PipelineError::Timeout(_) => 504,
            PipelineError::Upstream { .. } => 502,
            PipelineError::MalformedResponse(_) => 502,
            PipelineError::Extraction { .. } => 500,
            PipelineError::Validation(_) => 500,
            PipelineError::Internal(_) => 500,
        }
    }

    /// Bounded diagnostic detail, when one exists beyond the message
    pub fn detail(&self) -> Option<&str> {
        match self {
            PipelineError::Extraction { raw_preview, .. } => Some(raw_preview),
            PipelineError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        });

        if let Some(detail) = self.detail() {
            payload["error"]["details"] = serde_json::Value::String(detail.to_string());
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_retryability() {
        let err = PipelineError::Timeout("upstream did not respond within 120s".to_string());
        assert_eq!(err.error_code(), "TIMEOUT_ERROR");
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), 504);

        let err = PipelineError::Config("DEEPSEEK_API_KEY is not set".to_string());
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(!err.is_retryable());

        let err = PipelineError::InvalidRequest("destination is required".to_string());
        assert_eq!(err.http_status(), 400);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_payload() {
        let err = PipelineError::Extraction {
            message: "expected value at line 1 column 1".to_string(),
            raw_preview: "Sorry, I cannot help with that.".to_string(),
        };

        let payload = err.to_error_payload();
        assert_eq!(payload["error"]["code"], "EXTRACTION_ERROR");
        assert_eq!(payload["error"]["retryable"], true);
        assert_eq!(
            payload["error"]["details"],
            "Sorry, I cannot help with that."
        );
    }

    #[test]
    fn test_upstream_error_display() {
        let err = PipelineError::Upstream {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(err.http_status(), 502);
    }
}
