//! Adjacent list items sharing a line
//!
//! Checks method declarations and invocations. Constructors, destructors
//! and operators are left alone. For every adjacent pair
//! of parameters (or arguments) where the second item starts on the line the
//! first one ends on, one diagnostic is reported. A list of N items on a
//! single line therefore yields N-1 diagnostics, which lets a fix-all pass
//! resolve boundaries independently.

use parline_core::cst::ast::{AstNode, InvocationExpr, MethodDecl, MethodKind, SeparatedList};
use parline_core::cst::{CsSyntaxKind, CsSyntaxNode, TextRange};
use parline_core::rules::PARAMETERS_ON_SEPARATE_LINES;
use parline_core::{DiagnosticCollector, RuleMetadata, SourceMap};

use super::list_reformat;
use crate::engine::{RuleContext, SyntaxRule};
use crate::fixer::FixOptions;

/// A node that owns a parenthesised item list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOwner {
    Declaration(MethodDecl),
    Call(InvocationExpr),
}

impl ListOwner {
    pub fn cast(node: CsSyntaxNode) -> Option<Self> {
        match node.kind() {
            CsSyntaxKind::MethodDecl => MethodDecl::cast(node)
                .filter(|decl| decl.method_kind() == MethodKind::Method)
                .map(Self::Declaration),
            CsSyntaxKind::InvocationExpr => InvocationExpr::cast(node).map(Self::Call),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &CsSyntaxNode {
        match self {
            Self::Declaration(decl) => decl.syntax(),
            Self::Call(call) => call.syntax(),
        }
    }

    /// The owned parameter or argument list
    pub fn list(&self) -> Option<CsSyntaxNode> {
        match self {
            Self::Declaration(decl) => decl.parameter_list().map(|l| l.syntax().clone()),
            Self::Call(call) => call.argument_list().map(|l| l.syntax().clone()),
        }
    }

    /// Items of the owned list in source order
    pub fn items(&self) -> Vec<CsSyntaxNode> {
        match self {
            Self::Declaration(decl) => decl
                .parameter_list()
                .map(|l| l.items())
                .unwrap_or_default(),
            Self::Call(call) => call
                .argument_list()
                .map(|l| l.items())
                .unwrap_or_default(),
        }
    }
}

/// Two adjacent items that share a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub first: CsSyntaxNode,
    pub second: CsSyntaxNode,
    /// From the start of `first` to the end of `second`
    pub range: TextRange,
}

/// Find every adjacent item pair in `node`'s list that shares a line
///
/// Nodes that are neither method declarations nor calls yield nothing. Pairs whose
/// positions cannot be mapped to lines (synthesized empty items, offsets
/// outside the text) are skipped.
pub fn detect(node: &CsSyntaxNode, source_map: &SourceMap) -> Vec<Violation> {
    let Some(owner) = ListOwner::cast(node.clone()) else {
        return Vec::new();
    };

    let items = owner.items();
    if items.len() < 2 {
        return Vec::new();
    }

    items
        .windows(2)
        .filter_map(|pair| {
            let (first, second) = (&pair[0], &pair[1]);
            let Some((end_line, start_line)) = boundary_lines(first, second, source_map) else {
                tracing::trace!(
                    "Skipping item pair at {:?}..{:?}: position unavailable",
                    first.text_range(),
                    second.text_range()
                );
                return None;
            };

            (end_line == start_line).then(|| Violation {
                first: first.clone(),
                second: second.clone(),
                range: TextRange::new(first.text_range().start(), second.text_range().end()),
            })
        })
        .collect()
}

/// Last line of `first` and first line of `second`
fn boundary_lines(
    first: &CsSyntaxNode,
    second: &CsSyntaxNode,
    source_map: &SourceMap,
) -> Option<(usize, usize)> {
    let (first, second) = (first.text_range(), second.text_range());
    if first.is_empty() || second.is_empty() {
        return None;
    }

    let end_line = source_map.line_of(usize::from(first.end()))?;
    let start_line = source_map.line_of(usize::from(second.start()))?;
    Some((end_line, start_line))
}

/// `style/parameters-on-separate-lines`
#[derive(Debug, Default, Clone, Copy)]
pub struct ParametersOnSeparateLines;

impl SyntaxRule for ParametersOnSeparateLines {
    fn metadata(&self) -> &'static RuleMetadata {
        &PARAMETERS_ON_SEPARATE_LINES
    }

    fn subscribed_kinds(&self) -> &'static [CsSyntaxKind] {
        &[CsSyntaxKind::MethodDecl, CsSyntaxKind::InvocationExpr]
    }

    fn check_node(
        &self,
        node: &CsSyntaxNode,
        ctx: &RuleContext<'_>,
        sink: &mut dyn DiagnosticCollector,
    ) {
        for violation in detect(node, &ctx.model.source_map) {
            sink.collect(ctx.diagnostic(self.metadata(), violation.range));
        }
    }

    fn fix(
        &self,
        root: &CsSyntaxNode,
        trigger: &CsSyntaxNode,
        options: &FixOptions,
    ) -> Option<CsSyntaxNode> {
        list_reformat::reformat(root, trigger, options)
    }
}
