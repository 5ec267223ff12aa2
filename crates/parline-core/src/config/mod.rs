//! Configuration system for parline
//!
//! - TOML (`parline.toml`) and JSON (`.parlinerc.json`) configuration files
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde; every field is optional
//!
//! ## Example Configuration
//!
//! ```toml
//! [linter]
//! enabled = true
//!
//! [linter.rules]
//! "style/parameters-on-separate-lines" = "warn"
//!
//! [formatter]
//! indent_style = "spaces"
//! indent_size = 4
//! newline = "auto"
//!
//! [files]
//! include = ["**/*.cs"]
//! exclude = ["**/bin/**", "**/obj/**"]
//! max_fix_passes = 64
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader, Result};
pub use types::{
    DEFAULT_MAX_FIX_PASSES, FileFilter, FilesConfiguration, FormatterConfiguration, IndentStyle,
    LinterConfiguration, NewlineStyle, ParlineConfig, RuleSeverity,
};
