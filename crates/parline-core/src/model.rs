//! Parsed source file handed to rules

use std::path::{Path, PathBuf};

use crate::cst::{CsSyntaxNode, LexerError, parse_cs};
use crate::diagnostics::{Diagnostic, Severity, SourceMap};
use crate::rules::RuleCategory;

/// Rule id used for lexer errors
pub const SYNTAX_ERROR_RULE_ID: &str = "correctness/syntax-error";

/// A source file together with its syntax tree and line index
///
/// The tree is not `Send`; build one model per thread from the text.
#[derive(Debug, Clone)]
pub struct SourceModel {
    /// Root of the lossless syntax tree
    pub cst: CsSyntaxNode,
    /// Original source text
    pub source: String,
    /// Path of the source file
    pub source_file: PathBuf,
    /// Line index over `source`
    pub source_map: SourceMap,
    /// Problems found while tokenizing
    pub lexer_errors: Vec<LexerError>,
}

impl SourceModel {
    /// Parse `source` and index its lines
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let source = source.into();
        let source_file = path.into();
        let (cst, lexer_errors) = parse_cs(&source);
        let source_map = SourceMap::new(&source);

        tracing::trace!(
            "Parsed {} ({} bytes, {} lexer errors)",
            source_file.display(),
            source.len(),
            lexer_errors.len()
        );

        Self {
            cst,
            source,
            source_file,
            source_map,
            lexer_errors,
        }
    }

    pub fn path(&self) -> &Path {
        &self.source_file
    }

    /// Lexer errors as diagnostics
    pub fn syntax_diagnostics(&self) -> Vec<Diagnostic> {
        self.lexer_errors
            .iter()
            .map(|error| {
                let location = self.source_map.span_to_location(
                    &error.span,
                    &self.source,
                    &self.source_file,
                );
                Diagnostic::new(
                    SYNTAX_ERROR_RULE_ID,
                    Severity::Error,
                    error.message.clone(),
                    location,
                )
                .with_category(RuleCategory::Correctness)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model() {
        let model = SourceModel::parse("a.cs", "class C\n{\n}\n");

        assert_eq!(model.cst.text().to_string(), model.source);
        assert_eq!(model.path(), Path::new("a.cs"));
        assert_eq!(model.source_map.line_count(), 4);
        assert!(model.syntax_diagnostics().is_empty());
    }

    #[test]
    fn test_lexer_errors_become_diagnostics() {
        let model = SourceModel::parse("a.cs", "class C { string s = \"open; }");
        let diagnostics = model.syntax_diagnostics();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, SYNTAX_ERROR_RULE_ID);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].location.line, 1);
    }
}
