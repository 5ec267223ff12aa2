//! Typed AST layer over the CST
//!
//! Provides typed wrappers around the untyped CST nodes. Each wrapper is a
//! zero-cost view onto a `CsSyntaxNode`; casting only checks the kind.

use super::{CsSyntaxKind, CsSyntaxNode, CsSyntaxToken};

/// Trait for typed AST nodes
pub trait AstNode: Sized {
    fn can_cast(kind: CsSyntaxKind) -> bool;
    fn cast(node: CsSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &CsSyntaxNode;
}

/// A parenthesised, comma-separated list of items
pub trait SeparatedList: AstNode {
    /// Kind of the item nodes
    const ITEM_KIND: CsSyntaxKind;

    /// Item nodes in source order, including empty (missing) items
    fn items(&self) -> Vec<CsSyntaxNode> {
        self.syntax()
            .children()
            .filter(|n| n.kind() == Self::ITEM_KIND)
            .collect()
    }

    /// Comma tokens between the items
    fn separators(&self) -> Vec<CsSyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == CsSyntaxKind::Comma)
            .collect()
    }

    fn open_paren(&self) -> Option<CsSyntaxToken> {
        token_of_kind(self.syntax(), CsSyntaxKind::LParen)
    }

    fn close_paren(&self) -> Option<CsSyntaxToken> {
        token_of_kind(self.syntax(), CsSyntaxKind::RParen)
    }
}

/// Helper function to find first child of a specific kind
fn child_of_kind(parent: &CsSyntaxNode, kind: CsSyntaxKind) -> Option<CsSyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Helper function to find first token of a specific kind
fn token_of_kind(parent: &CsSyntaxNode, kind: CsSyntaxKind) -> Option<CsSyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

// ============================================================================
// CompilationUnit
// ============================================================================

/// Root of a parsed source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    syntax: CsSyntaxNode,
}

impl AstNode for CompilationUnit {
    fn can_cast(kind: CsSyntaxKind) -> bool {
        kind == CsSyntaxKind::CompilationUnit
    }

    fn cast(node: CsSyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &CsSyntaxNode {
        &self.syntax
    }
}

impl CompilationUnit {
    /// All method-like declarations anywhere in the file
    pub fn method_decls(&self) -> impl Iterator<Item = MethodDecl> {
        self.syntax.descendants().filter_map(MethodDecl::cast)
    }

    /// All invocation expressions anywhere in the file
    pub fn invocations(&self) -> impl Iterator<Item = InvocationExpr> {
        self.syntax.descendants().filter_map(InvocationExpr::cast)
    }
}

// ============================================================================
// MethodDecl
// ============================================================================

/// Method, constructor, destructor or operator declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    syntax: CsSyntaxNode,
}

impl AstNode for MethodDecl {
    fn can_cast(kind: CsSyntaxKind) -> bool {
        kind == CsSyntaxKind::MethodDecl
    }

    fn cast(node: CsSyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &CsSyntaxNode {
        &self.syntax
    }
}

impl MethodDecl {
    pub fn parameter_list(&self) -> Option<ParameterList> {
        child_of_kind(&self.syntax, CsSyntaxKind::ParameterList).and_then(ParameterList::cast)
    }

    /// Declared name: the last identifier before the parameter list that
    /// is not part of a type argument list
    pub fn name(&self) -> Option<String> {
        let mut depth = 0usize;
        let mut name = None;
        for token in self.header_tokens() {
            match token.kind() {
                CsSyntaxKind::Lt => depth += 1,
                CsSyntaxKind::Gt => depth = depth.saturating_sub(1),
                CsSyntaxKind::Ident if depth == 0 => name = Some(token.text().to_string()),
                _ => {}
            }
        }
        name
    }

    /// What this declaration declares
    ///
    /// Constructors are recognised by sharing the enclosing type's name.
    pub fn method_kind(&self) -> MethodKind {
        let header: Vec<_> = self.header_tokens().collect();
        if header
            .iter()
            .any(|t| t.kind() == CsSyntaxKind::Ident && t.text() == "operator")
        {
            return MethodKind::Operator;
        }
        if header
            .iter()
            .any(|t| t.kind() == CsSyntaxKind::Operator && t.text() == "~")
        {
            return MethodKind::Destructor;
        }

        let type_name = self
            .syntax
            .ancestors()
            .find(|n| n.kind() == CsSyntaxKind::TypeDecl)
            .and_then(|decl| type_decl_name(&decl));
        match (self.name(), type_name) {
            (Some(name), Some(type_name)) if name == type_name => MethodKind::Constructor,
            _ => MethodKind::Method,
        }
    }

    /// Tokens before the parameter list
    fn header_tokens(&self) -> impl Iterator<Item = CsSyntaxToken> {
        self.syntax
            .children_with_tokens()
            .take_while(|e| e.kind() != CsSyntaxKind::ParameterList)
            .filter_map(|e| e.into_token())
    }
}

/// Kinds of member a `MethodDecl` node can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Constructor,
    Destructor,
    /// User-defined operator or conversion
    Operator,
}

/// The identifier following the type keyword of a `TypeDecl`
fn type_decl_name(decl: &CsSyntaxNode) -> Option<String> {
    decl.children_with_tokens()
        .filter_map(|e| e.into_token())
        .skip_while(|t| !t.kind().is_type_keyword())
        .find(|t| t.kind() == CsSyntaxKind::Ident)
        .map(|t| t.text().to_string())
}

// ============================================================================
// InvocationExpr
// ============================================================================

/// Call expression: `target(args)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationExpr {
    syntax: CsSyntaxNode,
}

impl AstNode for InvocationExpr {
    fn can_cast(kind: CsSyntaxKind) -> bool {
        kind == CsSyntaxKind::InvocationExpr
    }

    fn cast(node: CsSyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &CsSyntaxNode {
        &self.syntax
    }
}

impl InvocationExpr {
    /// The call's own argument list (the last one, for chained calls)
    pub fn argument_list(&self) -> Option<ArgumentList> {
        self.syntax
            .children()
            .filter(|n| n.kind() == CsSyntaxKind::ArgumentList)
            .last()
            .and_then(ArgumentList::cast)
    }

    /// Source text of the invoked expression
    pub fn target_text(&self) -> String {
        let start = self.syntax.text_range().start();
        let end = self
            .argument_list()
            .map(|list| list.syntax().text_range().start())
            .unwrap_or_else(|| self.syntax.text_range().end());
        let text = self.syntax.text().to_string();
        let len = usize::from(end - start);
        text.get(..len).unwrap_or(&text).trim_end().to_string()
    }
}

// ============================================================================
// ParameterList / Parameter
// ============================================================================

/// `( parameter, ... )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    syntax: CsSyntaxNode,
}

impl AstNode for ParameterList {
    fn can_cast(kind: CsSyntaxKind) -> bool {
        kind == CsSyntaxKind::ParameterList
    }

    fn cast(node: CsSyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &CsSyntaxNode {
        &self.syntax
    }
}

impl SeparatedList for ParameterList {
    const ITEM_KIND: CsSyntaxKind = CsSyntaxKind::Parameter;
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        self.syntax.children().filter_map(Parameter::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    syntax: CsSyntaxNode,
}

impl AstNode for Parameter {
    fn can_cast(kind: CsSyntaxKind) -> bool {
        kind == CsSyntaxKind::Parameter
    }

    fn cast(node: CsSyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &CsSyntaxNode {
        &self.syntax
    }
}

impl Parameter {
    /// True for a placeholder produced by a dangling comma
    pub fn is_missing(&self) -> bool {
        self.syntax.text_range().is_empty()
    }
}

// ============================================================================
// ArgumentList / Argument
// ============================================================================

/// `( argument, ... )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentList {
    syntax: CsSyntaxNode,
}

impl AstNode for ArgumentList {
    fn can_cast(kind: CsSyntaxKind) -> bool {
        kind == CsSyntaxKind::ArgumentList
    }

    fn cast(node: CsSyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &CsSyntaxNode {
        &self.syntax
    }
}

impl SeparatedList for ArgumentList {
    const ITEM_KIND: CsSyntaxKind = CsSyntaxKind::Argument;
}

impl ArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Argument> {
        self.syntax.children().filter_map(Argument::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    syntax: CsSyntaxNode,
}

impl AstNode for Argument {
    fn can_cast(kind: CsSyntaxKind) -> bool {
        kind == CsSyntaxKind::Argument
    }

    fn cast(node: CsSyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &CsSyntaxNode {
        &self.syntax
    }
}

impl Argument {
    /// True for a placeholder produced by a dangling comma
    pub fn is_missing(&self) -> bool {
        self.syntax.text_range().is_empty()
    }
}
