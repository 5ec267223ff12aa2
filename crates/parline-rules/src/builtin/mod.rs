//! Built-in rules

pub mod list_reformat;
pub mod separate_lines;

pub use separate_lines::{ListOwner, ParametersOnSeparateLines, Violation, detect};

use crate::engine::SyntaxRule;

/// Every built-in rule, in registration order
pub fn builtin_rules() -> Vec<Box<dyn SyntaxRule>> {
    vec![Box::new(ParametersOnSeparateLines)]
}
