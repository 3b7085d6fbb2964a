//! Error types for query field selection

use thiserror::Error;

/// Result type for field selection operations
pub type Result<T> = std::result::Result<T, QueryFieldsError>;

/// Errors that can occur while configuring or running field selection
#[derive(Debug, Error)]
pub enum QueryFieldsError {
    /// No request could be obtained from the serializer context
    #[error("misconfigured serializer: pass a request in the context or override get_request")]
    MisconfiguredSerializer,

    /// Delimiter is empty or uses a character reserved in query strings
    #[error("invalid delimiter {delimiter:?}: must be non-empty and avoid ; / ? : @ = &")]
    InvalidDelimiter { delimiter: String },

    /// Include or exclude parameter name is unusable
    #[error("invalid query parameter name {name:?}: {message}")]
    InvalidArgName { name: String, message: String },

    /// Layered configuration failed to load
    #[error("failed to load selector configuration: {0}")]
    Config(#[from] figment::Error),
}

impl QueryFieldsError {
    /// True when the error only means "no request was available".
    pub fn is_misconfigured(&self) -> bool {
        matches!(self, QueryFieldsError::MisconfiguredSerializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misconfigured_display() {
        let err = QueryFieldsError::MisconfiguredSerializer;
        assert!(err.to_string().starts_with("misconfigured serializer"));
        assert!(err.is_misconfigured());
    }

    #[test]
    fn test_invalid_delimiter_display() {
        let err = QueryFieldsError::InvalidDelimiter {
            delimiter: "&".into(),
        };
        assert!(err.to_string().contains("\"&\""));
        assert!(!err.is_misconfigured());
    }
}
