use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Invalid object reference: {0}")]
    InvalidReference(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid comparison document: {0}")]
    InvalidDocument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_report_error_display() {
        let error = ReportError::InvalidStructure("test message".to_string());
        assert_eq!(error.to_string(), "Invalid PDF structure: test message");
    }

    #[test]
    fn test_report_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let error = ReportError::from(io_error);

        match error {
            ReportError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_fetch_error_names_url() {
        let error = ReportError::Fetch {
            url: "https://cdn.example.com/a.png".to_string(),
            reason: "HTTP 404".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Image fetch failed for https://cdn.example.com/a.png: HTTP 404"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ReportError::from(json_error);
        assert!(matches!(error, ReportError::Json(_)));
        assert!(error.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_error_chain_display() {
        let errors = [
            (
                "Invalid comparison document: need 2 or 3 items, got 1",
                ReportError::InvalidDocument("need 2 or 3 items, got 1".to_string()),
            ),
            (
                "Configuration error: margin must be positive",
                ReportError::Config("margin must be positive".to_string()),
            ),
            (
                "Compression error: deflate failed",
                ReportError::CompressionError("deflate failed".to_string()),
            ),
            (
                "Invalid image: corrupt JPEG",
                ReportError::InvalidImage("corrupt JPEG".to_string()),
            ),
        ];

        for (expected, error) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReportError>();
    }
}
