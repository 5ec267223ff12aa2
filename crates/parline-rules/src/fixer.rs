//! Fix application
//!
//! A diagnostic only records where a problem is. Fixing maps its span back
//! to the smallest covering node, hands that node to the owning rule and
//! prints the new tree. Fix-all repeats lint and fix on fresh parses until
//! nothing fixable is left.

use parline_core::cst::trivia::detect_newline;
use parline_core::cst::{CsSyntaxNode, NodeOrToken, TextRange, TextSize};
use parline_core::{Diagnostic, NewlineStyle, ParlineConfig, RuleMetadata, SourceModel};
use serde::Serialize;
use std::path::Path;

use crate::engine::{CancellationFlag, RuleEngine};

/// A user-facing fix offered for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeAction {
    pub title: &'static str,
    /// Actions sharing a key can be applied together in one batch
    pub equivalence_key: Option<&'static str>,
}

impl CodeAction {
    /// The action a rule offers, if it is fixable
    pub fn for_rule(metadata: &RuleMetadata) -> Option<Self> {
        metadata.fix_title.map(|title| Self {
            title,
            equivalence_key: metadata.fix_equivalence_key,
        })
    }
}

/// Layout settings for rewritten code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOptions {
    /// One level of indentation
    pub indent_unit: String,
    pub newline: NewlineStyle,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            indent_unit: "    ".to_string(),
            newline: NewlineStyle::Auto,
        }
    }
}

impl FixOptions {
    pub fn from_config(config: &ParlineConfig) -> Self {
        Self {
            indent_unit: config.indent_unit(),
            newline: config.newline_style(),
        }
    }

    /// Line break to insert into `text`
    pub fn newline_for(&self, text: &str) -> &'static str {
        match self.newline {
            NewlineStyle::Auto => detect_newline(text),
            NewlineStyle::Lf => "\n",
            NewlineStyle::Crlf => "\r\n",
        }
    }
}

/// Result of applying a single fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// The full new source text
    Changed(String),
    NoChange,
}

/// Result of fixing a whole file
#[derive(Debug, Clone, Serialize)]
pub struct FixAllResult {
    pub output: String,
    /// Number of fixes that changed the text
    pub applied: usize,
    /// Number of lint rounds run
    pub passes: usize,
    /// Diagnostics left after the last round
    pub remaining: Vec<Diagnostic>,
}

impl FixAllResult {
    pub fn is_changed(&self) -> bool {
        self.applied > 0
    }
}

/// Smallest node whose range covers `range`
///
/// Returns `None` when `range` lies outside the tree.
pub fn find_trigger(root: &CsSyntaxNode, range: TextRange) -> Option<CsSyntaxNode> {
    if !root.text_range().contains_range(range) {
        return None;
    }

    match root.covering_element(range) {
        NodeOrToken::Node(node) => Some(node),
        NodeOrToken::Token(token) => token.parent(),
    }
}

/// Apply the fix of the rule that reported `diagnostic`
///
/// Unknown rules, rules without a fix, stale spans and fixes that leave
/// the text as it was all yield `NoChange`.
pub fn apply_fix(
    engine: &RuleEngine,
    model: &SourceModel,
    diagnostic: &Diagnostic,
    options: &FixOptions,
) -> FixOutcome {
    let Some(rule) = engine.rule(&diagnostic.rule_id) else {
        tracing::trace!("No rule '{}' to fix with", diagnostic.rule_id);
        return FixOutcome::NoChange;
    };

    let Some(range) = text_range(&diagnostic.byte_range()) else {
        return FixOutcome::NoChange;
    };
    let Some(trigger) = find_trigger(&model.cst, range) else {
        tracing::debug!(
            "Diagnostic span {:?} is outside {}",
            range,
            model.path().display()
        );
        return FixOutcome::NoChange;
    };

    match rule.fix(&model.cst, &trigger, options) {
        Some(root) => {
            let output = root.text().to_string();
            if output == model.source {
                FixOutcome::NoChange
            } else {
                FixOutcome::Changed(output)
            }
        }
        None => FixOutcome::NoChange,
    }
}

/// Fix every fixable diagnostic in `source`
///
/// Each round re-parses the current text, lints it and applies the first
/// fix that changes something. Stops when no fix applies or after the
/// configured maximum number of rounds.
pub fn fix_all(
    engine: &RuleEngine,
    path: &Path,
    source: &str,
    options: &FixOptions,
) -> FixAllResult {
    let max_passes = engine.config().max_fix_passes().max(1);
    let cancel = CancellationFlag::new();
    let mut output = source.to_string();
    let mut applied = 0;
    let mut passes = 0;

    loop {
        let model = SourceModel::parse(path, output.clone());
        let diagnostics = engine.lint(&model, &cancel);
        passes += 1;

        let changed = if passes > max_passes {
            tracing::warn!(
                "{}: giving up after {} fix passes",
                path.display(),
                max_passes
            );
            None
        } else {
            diagnostics
                .iter()
                .filter(|d| is_fixable(engine, d))
                .find_map(|d| match apply_fix(engine, &model, d, options) {
                    FixOutcome::Changed(text) => Some(text),
                    FixOutcome::NoChange => None,
                })
        };

        match changed {
            Some(text) => {
                tracing::debug!("{}: fix pass {} applied", path.display(), passes);
                output = text;
                applied += 1;
            }
            None => {
                return FixAllResult {
                    output,
                    applied,
                    passes,
                    remaining: diagnostics,
                };
            }
        }
    }
}

fn is_fixable(engine: &RuleEngine, diagnostic: &Diagnostic) -> bool {
    diagnostic.has_safe_fixes()
        && engine
            .rule(&diagnostic.rule_id)
            .is_some_and(|rule| rule.metadata().is_fixable())
}

fn text_range(range: &std::ops::Range<usize>) -> Option<TextRange> {
    let start = TextSize::try_from(range.start).ok()?;
    let end = TextSize::try_from(range.end).ok()?;
    (start <= end).then(|| TextRange::new(start, end))
}
