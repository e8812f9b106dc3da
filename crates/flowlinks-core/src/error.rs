//! Error types for the FlowLinks core.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the pure parts of FlowLinks.
#[derive(Error, Debug)]
pub enum Error {
    /// A template name did not match any known template.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// Stored link metadata could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_template_display() {
        let err = Error::UnknownTemplate("landing.htm".to_string());
        assert_eq!(err.to_string(), "unknown template: landing.htm");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
