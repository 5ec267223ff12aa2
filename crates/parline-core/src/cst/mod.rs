//! Concrete Syntax Tree (CST) for C#
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments,
//! and formatting, so fixes can rewrite one list without disturbing the rest
//! of the file.
//!
//! ## Architecture
//!
//! The CST uses Rowan's green/red tree pattern:
//!
//! - **Green Tree**: Immutable, position-independent storage
//!   - Stores actual source text with trivia (whitespace, comments)
//!   - Cheap to clone (uses Arc internally)
//!
//! - **Red Tree**: Dynamically constructed view with parent pointers
//!   - Created on-demand for traversal
//!   - Provides the typed API in [`ast`]
//!
//! ## Trivia Handling
//!
//! Trivia is attached to the parent node between significant children, so
//! the range of a parameter or argument never includes its surroundings.
//!
//! This enables lossless representation: `parse(source).text() == source`
//!
//! ## Example
//!
//! ```rust,ignore
//! use parline_core::cst::{parse_cs, CsSyntaxKind};
//!
//! let (cst, _lexer_errors) = parse_cs("class C { void M(int a, int b) { } }");
//!
//! for node in cst.descendants() {
//!     if node.kind() == CsSyntaxKind::Parameter {
//!         println!("parameter: {}", node.text());
//!     }
//! }
//! ```

mod builder;
mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub mod ast;
pub mod edit;
pub mod trivia;

pub use builder::CstBuilder;
pub use language::CsLanguage;
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use nodes::*;
pub use parser::parse_cs;
pub use syntax_kind::CsSyntaxKind;
