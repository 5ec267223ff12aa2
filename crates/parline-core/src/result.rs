//! Result type alias for parline operations

use crate::error::ParlineError;

/// Standard Result type for parline operations
pub type Result<T> = std::result::Result<T, ParlineError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                if err.is_recoverable() {
                    tracing::warn!("Continuing after error: {}", err);
                } else {
                    tracing::error!("{}", err);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_continue() {
        let ok: Result<u32> = Ok(3);
        assert_eq!(ok.log_and_continue(), Some(3));

        let err: Result<u32> = Err(ParlineError::config_error("bad"));
        assert_eq!(err.log_and_continue(), None);

        let io: Result<u32> = Err(ParlineError::io_error(
            "parline.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        ));
        assert_eq!(io.log_and_continue(), None);
    }
}
