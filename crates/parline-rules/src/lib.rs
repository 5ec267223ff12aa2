//! Parline Rules
//!
//! Rule engine, fix driver and the built-in rules. The engine owns tree
//! traversal and dispatches nodes to rules by kind; the fixer turns a
//! diagnostic back into a tree edit and drives fix-all passes.

pub mod builtin;
pub mod engine;
pub mod fixer;

pub use builtin::{ParametersOnSeparateLines, builtin_rules};
pub use engine::{CancellationFlag, RuleContext, RuleEngine, SyntaxRule};
pub use fixer::{
    CodeAction, FixAllResult, FixOptions, FixOutcome, apply_fix, find_trigger, fix_all,
};
