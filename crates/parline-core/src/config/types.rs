//! Configuration types for parline
//!
//! Every section and field is optional in the file; accessors on
//! [`ParlineConfig`] resolve missing values to defaults.

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::diagnostics::Severity;
use crate::error::ParlineError;

/// Default number of lint/fix rounds for `--write`
pub const DEFAULT_MAX_FIX_PASSES: usize = 64;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParlineConfig {
    /// Linter configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter: Option<LinterConfiguration>,

    /// Formatting preferences used when rewriting lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<FormatterConfiguration>,

    /// File discovery configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

/// Linter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinterConfiguration {
    /// Enable/disable linter
    pub enabled: Option<bool>,

    /// Severity overrides keyed by rule id
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSeverity>,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning (doesn't fail build)
    Warn,
    /// Error (fails build)
    Error,
}

impl RuleSeverity {
    /// Diagnostic severity, or `None` when the rule is disabled
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Off => None,
            RuleSeverity::Info => Some(Severity::Info),
            RuleSeverity::Warn => Some(Severity::Warning),
            RuleSeverity::Error => Some(Severity::Error),
        }
    }
}

/// Indent style for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces,
    /// Use tabs for indentation
    Tabs,
}

/// Line break sequence inserted by fixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineStyle {
    /// `\r\n` if the document already contains one, `\n` otherwise
    Auto,
    Lf,
    Crlf,
}

/// Formatter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatterConfiguration {
    /// Indent style (spaces or tabs)
    pub indent_style: Option<IndentStyle>,

    /// Indentation size in spaces (when indent_style is 'spaces')
    pub indent_size: Option<usize>,

    /// Line break sequence for inserted line breaks
    pub newline: Option<NewlineStyle>,
}

/// Files configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilesConfiguration {
    /// Glob patterns to include
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude
    pub exclude: Option<Vec<String>>,

    /// Upper bound on lint/fix rounds per file in fix mode
    pub max_fix_passes: Option<usize>,
}

impl Default for LinterConfiguration {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            rules: BTreeMap::new(),
        }
    }
}

impl Default for FormatterConfiguration {
    fn default() -> Self {
        Self {
            indent_style: Some(IndentStyle::Spaces),
            indent_size: Some(4),
            newline: Some(NewlineStyle::Auto),
        }
    }
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            include: Some(vec!["**/*.cs".to_string()]),
            exclude: Some(vec![
                "**/bin/**".to_string(),
                "**/obj/**".to_string(),
                "**/*.g.cs".to_string(),
                "**/*.Designer.cs".to_string(),
            ]),
            max_fix_passes: Some(DEFAULT_MAX_FIX_PASSES),
        }
    }
}

impl ParlineConfig {
    /// Whether the linter runs at all
    pub fn linter_enabled(&self) -> bool {
        self.linter
            .as_ref()
            .and_then(|l| l.enabled)
            .unwrap_or(true)
    }

    /// Configured severity for a rule, if any
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.linter
            .as_ref()
            .and_then(|l| l.rules.get(rule_id))
            .copied()
    }

    /// One indentation unit as text
    pub fn indent_unit(&self) -> String {
        let defaults = FormatterConfiguration::default();
        let formatter = self.formatter.as_ref().unwrap_or(&defaults);
        match formatter.indent_style.unwrap_or(IndentStyle::Spaces) {
            IndentStyle::Tabs => "\t".to_string(),
            IndentStyle::Spaces => " ".repeat(formatter.indent_size.unwrap_or(4)),
        }
    }

    pub fn newline_style(&self) -> NewlineStyle {
        self.formatter
            .as_ref()
            .and_then(|f| f.newline)
            .unwrap_or(NewlineStyle::Auto)
    }

    pub fn max_fix_passes(&self) -> usize {
        self.files
            .as_ref()
            .and_then(|f| f.max_fix_passes)
            .unwrap_or(DEFAULT_MAX_FIX_PASSES)
    }

    /// Compile the include/exclude globs
    pub fn file_filter(&self) -> Result<FileFilter, ParlineError> {
        let defaults = FilesConfiguration::default();
        let files = self.files.as_ref();
        let include = files
            .and_then(|f| f.include.clone())
            .or(defaults.include)
            .unwrap_or_default();
        let exclude = files
            .and_then(|f| f.exclude.clone())
            .or(defaults.exclude)
            .unwrap_or_default();

        Ok(FileFilter {
            include: compile_patterns(&include)?,
            exclude: compile_patterns(&exclude)?,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, ParlineError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                ParlineError::config_error(format!("Invalid glob pattern '{p}': {e}"))
            })
        })
        .collect()
}

/// Compiled include/exclude globs
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileFilter {
    /// A path is accepted when it matches an include pattern and no exclude
    /// pattern. Patterns are matched against the path relative to `root`.
    pub fn accepts(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let matches = |p: &Pattern| p.matches_path(relative) || p.matches_path(path);

        self.include.iter().any(matches) && !self.exclude.iter().any(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_severity_serialization() {
        let json = serde_json::to_string(&RuleSeverity::Error).unwrap();
        assert_eq!(json, r#""error""#);

        let json = serde_json::to_string(&RuleSeverity::Off).unwrap();
        assert_eq!(json, r#""off""#);
    }

    #[test]
    fn test_rule_severity_mapping() {
        assert_eq!(RuleSeverity::Off.to_severity(), None);
        assert_eq!(RuleSeverity::Warn.to_severity(), Some(Severity::Warning));
        assert_eq!(RuleSeverity::Error.to_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_defaults() {
        let config = ParlineConfig::default();

        assert!(config.linter_enabled());
        assert_eq!(config.indent_unit(), "    ");
        assert_eq!(config.newline_style(), NewlineStyle::Auto);
        assert_eq!(config.max_fix_passes(), DEFAULT_MAX_FIX_PASSES);
        assert_eq!(config.rule_severity("style/anything"), None);
    }

    #[test]
    fn test_indent_unit_variants() {
        let mut config = ParlineConfig {
            formatter: Some(FormatterConfiguration {
                indent_style: Some(IndentStyle::Tabs),
                indent_size: None,
                newline: None,
            }),
            ..Default::default()
        };
        assert_eq!(config.indent_unit(), "\t");

        config.formatter = Some(FormatterConfiguration {
            indent_style: None,
            indent_size: Some(2),
            newline: None,
        });
        assert_eq!(config.indent_unit(), "  ");
    }

    #[test]
    fn test_file_filter() {
        let filter = ParlineConfig::default().file_filter().unwrap();
        let root = Path::new("/repo");

        assert!(filter.accepts(Path::new("/repo/src/Program.cs"), root));
        assert!(filter.accepts(Path::new("/repo/Program.cs"), root));
        assert!(!filter.accepts(Path::new("/repo/src/bin/Debug/Gen.cs"), root));
        assert!(!filter.accepts(Path::new("/repo/src/Form.Designer.cs"), root));
        assert!(!filter.accepts(Path::new("/repo/README.md"), root));
    }

    #[test]
    fn test_invalid_glob_is_config_error() {
        let config = ParlineConfig {
            files: Some(FilesConfiguration {
                include: Some(vec!["[".to_string()]),
                exclude: None,
                max_fix_passes: None,
            }),
            ..Default::default()
        };

        let err = config.file_filter().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
