//! Error types for parline operations
//!
//! Only host concerns fail with an error: reading files and loading
//! configuration. Analysis of malformed code never fails; it degrades to
//! "no diagnostic" or "no change".

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for parline operations
#[derive(Debug, Error)]
pub enum ParlineError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
}

impl ParlineError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParlineError::ConfigError { .. } => ErrorKind::Config,
            ParlineError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let io = ParlineError::io_error(
            "parline.toml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(ParlineError::config_error("bad").kind(), ErrorKind::Config);
        assert_eq!(io.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_recoverable() {
        let io = ParlineError::io_error(
            "parline.toml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(io.is_recoverable());
        assert!(!ParlineError::config_error("bad").is_recoverable());
    }

    #[test]
    fn test_io_error_message_includes_path() {
        let err = ParlineError::io_error(
            "src/Program.cs",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("src/Program.cs"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
