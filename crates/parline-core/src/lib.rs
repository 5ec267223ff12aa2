//! Parline Core
//!
//! Host toolchain for the parline linter: a lossless syntax tree for C#
//! sources, the diagnostics model, rule metadata, configuration loading and
//! error types. Rules themselves live in `parline-rules`.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod result;
pub mod rules;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileFilter, FilesConfiguration, FormatterConfiguration, IndentStyle,
    LinterConfiguration, NewlineStyle, ParlineConfig, RuleSeverity,
};
pub use diagnostics::{
    Applicability, CodeSuggestion, DefaultDiagnosticCollector, Diagnostic, DiagnosticCollector,
    Location, Severity, SourceMap,
};
pub use error::{ErrorKind, ParlineError};
pub use model::SourceModel;
pub use result::{Result, ResultExt};
pub use rules::{RuleCategory, RuleMetadata};

/// Environment variable consulted before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "PARLINE_LOG";

/// Initialize the tracing subscriber for logging
///
/// `PARLINE_LOG` or `RUST_LOG` take precedence; otherwise `verbosity`
/// selects the level (0 = warn, 1 = info, 2 = debug, 3+ = trace). Logs go
/// to stderr so machine-readable output on stdout stays clean.
pub fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(verbosity >= 2)
                .with_line_number(verbosity >= 2),
        )
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "parline=warn",
        1 => "parline=info",
        2 => "parline=debug",
        _ => "parline=trace",
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "parline=warn");
        assert_eq!(default_directive(2), "parline=debug");
        assert_eq!(default_directive(9), "parline=trace");
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(0);
        init_tracing(1);
    }
}
