//! Type aliases for C# CST nodes
//!
//! These types are built on top of Rowan's generic tree types, parameterized
//! with our CsLanguage.

use super::CsLanguage;

pub use rowan::{Direction, GreenNode, GreenToken, NodeOrToken, TextRange, TextSize, WalkEvent};

/// A node in the concrete syntax tree
///
/// Provides parent/child/sibling navigation, lossless text reconstruction
/// and kind queries. Nodes are cheap to clone; the underlying green tree
/// is shared.
///
/// # Example
///
/// ```rust,ignore
/// use parline_core::cst::{CsSyntaxNode, CsSyntaxKind};
///
/// fn count_calls(root: &CsSyntaxNode) -> usize {
///     root.descendants()
///         .filter(|n| n.kind() == CsSyntaxKind::InvocationExpr)
///         .count()
/// }
/// ```
pub type CsSyntaxNode = rowan::SyntaxNode<CsLanguage>;

/// A token (leaf) in the concrete syntax tree
pub type CsSyntaxToken = rowan::SyntaxToken<CsLanguage>;

/// Either a node or a token
pub type CsSyntaxElement = rowan::SyntaxElement<CsLanguage>;

/// Owned green element, used when rebuilding nodes
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;
