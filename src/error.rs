use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for the redaktor library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Source document could not be read or parsed.
    #[error("Failed to ingest document '{path}': {message}")]
    Ingestion {
        /// Path to the source document
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The text-generation service call failed.
    #[error("Generation service error: {message}")]
    Service {
        /// Error message
        message: String,
    },

    /// The output document could not be serialized.
    #[error("Failed to render output document: {message}")]
    Render {
        /// Error message
        message: String,
    },

    /// Prompt template rendering error.
    #[error("Failed to render prompt template '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an ingestion error with path context.
    #[must_use]
    pub fn ingestion(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Ingestion {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a generation service error.
    #[must_use]
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    /// Creates a render error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a prompt template error.
    #[must_use]
    pub fn template(template: impl Into<String>, source: tera::Error) -> Self {
        Self::Template {
            template: template.into(),
            message: source.to_string(),
        }
    }

    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Returns true if this is a generation service error.
    #[must_use]
    pub const fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }

    /// Returns true if this is an ingestion error.
    #[must_use]
    pub const fn is_ingestion(&self) -> bool {
        matches!(self, Self::Ingestion { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

// Conversion implementations for convenient error handling
impl From<tera::Error> for Error {
    fn from(e: tera::Error) -> Self {
        Self::Template {
            template: "unknown".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Service {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test message");
        assert!(err.is_config());
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_ingestion_error() {
        let err = Error::ingestion("/tmp/artykul.docx", "not a zip archive");
        assert!(err.is_ingestion());
        assert!(err.to_string().contains("/tmp/artykul.docx"));
        assert!(err.to_string().contains("not a zip archive"));
    }

    #[test]
    fn test_service_error() {
        let err = Error::service("HTTP 429: rate limited");
        assert!(err.is_service());
        assert!(!err.is_config());
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/test.docx", io_err);
        assert!(err.to_string().contains("/tmp/test.docx"));
    }

    #[test]
    fn test_error_clone() {
        let err = Error::render("zip write failed");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
