//! Diagnostic types and utilities
//!
//! Provides diagnostics with:
//! - Precise code positioning with line/column information
//! - Code suggestions with applicability levels (safe vs unsafe)
//! - Collection and sorting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::rules::RuleCategory;

/// Represents a diagnostic message from linting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique identifier for the rule that generated this diagnostic
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Location in the source file
    pub location: Location,
    /// Code suggestions for fixing the issue
    pub suggestions: Vec<CodeSuggestion>,
    /// Category of the rule that produced this diagnostic
    pub category: Option<RuleCategory>,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional end position for ranges
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span
    pub length: usize,
    /// Optional span information (start, end)
    pub span: Option<(usize, usize)>,
}

/// Indicates how a tool should manage this suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Applicability {
    /// The suggestion is definitely correct and can be applied automatically
    Always,

    /// The suggestion may be correct but requires review
    MaybeIncorrect,
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Always => write!(f, "safe"),
            Applicability::MaybeIncorrect => write!(f, "unsafe"),
        }
    }
}

/// A code suggestion that can be automatically applied
///
/// The replacement text is computed lazily by the fix driver; a suggestion
/// only records the action's title and where it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    /// Description of the suggested fix
    pub message: String,

    /// Stable key grouping equivalent fixes for batch application
    pub equivalence_key: Option<String>,

    /// Location to apply the fix
    pub location: Location,

    /// When this suggestion should be applied
    pub applicability: Applicability,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            suggestions: Vec::new(),
            category: None,
        }
    }

    /// Add a code suggestion to this diagnostic
    pub fn with_suggestion(mut self, suggestion: CodeSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Set the category for this diagnostic
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Check if this diagnostic has any safe fixes
    pub fn has_safe_fixes(&self) -> bool {
        self.suggestions
            .iter()
            .any(|s| s.applicability == Applicability::Always)
    }

    /// Byte range the diagnostic covers
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        match self.location.span {
            Some((start, end)) => start..end,
            None => self.location.offset..self.location.offset + self.location.length,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            line: 0,
            column: 0,
            end_line: None,
            end_column: None,
            offset: 0,
            length: 0,
            span: None,
        }
    }
}

impl Location {
    /// Create a new location
    pub fn new(file: PathBuf, line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: None,
            end_column: None,
            offset,
            length,
            span: None,
        }
    }
}

impl CodeSuggestion {
    /// Create a safe (always applicable) suggestion
    pub fn safe(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            equivalence_key: None,
            location,
            applicability: Applicability::Always,
        }
    }

    pub fn with_equivalence_key(mut self, key: impl Into<String>) -> Self {
        self.equivalence_key = Some(key.into());
        self
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Trait for collecting and managing diagnostics
pub trait DiagnosticCollector {
    /// Collect a diagnostic
    fn collect(&mut self, diagnostic: Diagnostic);

    /// Collect multiple diagnostics
    fn collect_all(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.collect(diagnostic);
        }
    }
}

/// Default implementation of DiagnosticCollector
#[derive(Debug, Clone, Default)]
pub struct DefaultDiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DefaultDiagnosticCollector {
    /// Create a new diagnostic collector
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Sort diagnostics by location (file, then line, then column)
    pub fn sort_by_location(&mut self) {
        sort_by_location(&mut self.diagnostics);
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Sort diagnostics by file, line, column and rule id
fn sort_by_location(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then_with(|| a.location.line.cmp(&b.location.line))
            .then_with(|| a.location.column.cmp(&b.location.column))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
}

impl DiagnosticCollector for DefaultDiagnosticCollector {
    fn collect(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(file: &str, line: usize, column: usize, severity: Severity) -> Diagnostic {
        Diagnostic::new(
            "style/test",
            severity,
            "message",
            Location::new(PathBuf::from(file), line, column, 0, 1),
        )
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Hint);
        assert!(Severity::Hint < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_collector_sorts_by_location() {
        let mut collector = DefaultDiagnosticCollector::new();
        collector.collect_all(vec![
            diagnostic("b.cs", 1, 1, Severity::Warning),
            diagnostic("a.cs", 3, 5, Severity::Error),
            diagnostic("a.cs", 3, 2, Severity::Warning),
        ]);
        collector.sort_by_location();

        let order: Vec<_> = collector
            .into_diagnostics()
            .iter()
            .map(|d| (d.location.file.display().to_string(), d.location.column))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.cs".to_string(), 2),
                ("a.cs".to_string(), 5),
                ("b.cs".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_byte_range_prefers_span() {
        let mut d = diagnostic("a.cs", 1, 1, Severity::Warning);
        d.location.offset = 4;
        d.location.length = 3;
        assert_eq!(d.byte_range(), 4..7);

        d.location.span = Some((10, 20));
        assert_eq!(d.byte_range(), 10..20);
    }

    #[test]
    fn test_safe_fix_detection() {
        let d = diagnostic("a.cs", 1, 1, Severity::Warning)
            .with_suggestion(CodeSuggestion::safe("Fix it", Location::default()));
        assert!(d.has_safe_fixes());
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
