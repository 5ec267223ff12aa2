//! Rewrite a parameter or argument list to one item per line
//!
//! The trigger may be an item, a list, a declaration or a call. It is
//! resolved to an anchor (the enclosing declaration or call) and the list
//! it owns. Every item is then placed on its own line, indented one unit
//! deeper than the line the anchor starts on. Separators and the trivia
//! around them are kept as they are; only the trivia in front of each item
//! is replaced. Comments in that trivia are carried over.

use parline_core::cst::edit::{green_of, green_token, rebuild_node, replace_node};
use parline_core::cst::trivia::line_indentation;
use parline_core::cst::{CsSyntaxElement, CsSyntaxKind, CsSyntaxNode, GreenElement};

use super::separate_lines::ListOwner;
use crate::fixer::FixOptions;

/// What the trigger node is, relative to its list and anchor
///
/// Resolution tries these in declaration order; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TriggerShape {
    /// Parameter in a declaration's parameter list
    DeclarationItem,
    /// Argument in a call's argument list
    CallItem,
    /// Parameter list of a declaration
    DeclarationList,
    /// Argument list of a call
    CallList,
    /// The declaration itself
    Declaration,
    /// The call itself
    Call,
}

impl TriggerShape {
    fn classify(trigger: &CsSyntaxNode) -> Option<Self> {
        let parent = trigger.parent();
        let parent_kind = parent.as_ref().map(|p| p.kind());
        let grandparent_kind = parent.as_ref().and_then(|p| p.parent()).map(|g| g.kind());

        use CsSyntaxKind as K;
        match (trigger.kind(), parent_kind, grandparent_kind) {
            (K::Parameter, Some(K::ParameterList), Some(K::MethodDecl)) => {
                Some(Self::DeclarationItem)
            }
            (K::Argument, Some(K::ArgumentList), Some(K::InvocationExpr)) => Some(Self::CallItem),
            (K::ParameterList, Some(K::MethodDecl), _) => Some(Self::DeclarationList),
            (K::ArgumentList, Some(K::InvocationExpr), _) => Some(Self::CallList),
            (K::MethodDecl, _, _) => Some(Self::Declaration),
            (K::InvocationExpr, _, _) => Some(Self::Call),
            _ => None,
        }
    }
}

/// Enclosing declaration or call plus the list being rewritten
#[derive(Debug, Clone)]
struct Anchor {
    node: CsSyntaxNode,
    list: CsSyntaxNode,
}

fn resolve_anchor(trigger: &CsSyntaxNode) -> Option<Anchor> {
    let shape = TriggerShape::classify(trigger)?;
    tracing::trace!("Fix trigger {:?} resolved as {:?}", trigger.kind(), shape);

    let (node, list) = match shape {
        TriggerShape::DeclarationItem | TriggerShape::CallItem => {
            let list = trigger.parent()?;
            (list.parent()?, list)
        }
        TriggerShape::DeclarationList | TriggerShape::CallList => {
            (trigger.parent()?, trigger.clone())
        }
        TriggerShape::Declaration | TriggerShape::Call => {
            let owner = ListOwner::cast(trigger.clone())?;
            (trigger.clone(), owner.list()?)
        }
    };

    // Constructors, destructors and operators are never rewritten
    if ListOwner::cast(node.clone()).is_none() {
        tracing::trace!("{:?} does not own a checked list", node.kind());
        return None;
    }

    Some(Anchor { node, list })
}

/// Place every item of the list resolved from `trigger` on its own line
///
/// Returns the new root, or `None` when the trigger resolves to no list or
/// the list is already laid out that way. `root` is never modified.
pub fn reformat(
    root: &CsSyntaxNode,
    trigger: &CsSyntaxNode,
    options: &FixOptions,
) -> Option<CsSyntaxNode> {
    let Some(anchor) = resolve_anchor(trigger) else {
        tracing::trace!("No declaration or call found for {:?}", trigger.kind());
        return None;
    };

    let text = root.text().to_string();
    let newline = options.newline_for(&text);
    let indent = format!(
        "{}{}",
        line_indentation(&text, anchor.node.text_range().start()),
        options.indent_unit
    );

    let children = rewrite_items(&anchor.list, newline, &indent);
    let green = rebuild_node(&anchor.list, children);
    if green == anchor.list.green().into_owned() {
        return None;
    }

    Some(replace_node(&anchor.list, green))
}

/// Children of `list` with the trivia before every item replaced
fn rewrite_items(list: &CsSyntaxNode, newline: &str, indent: &str) -> Vec<GreenElement> {
    let item_kind = match list.kind() {
        CsSyntaxKind::ParameterList => CsSyntaxKind::Parameter,
        _ => CsSyntaxKind::Argument,
    };

    let mut children = Vec::new();
    let mut pending: Vec<CsSyntaxElement> = Vec::new();

    for element in list.children_with_tokens() {
        if element.kind().is_trivia() {
            pending.push(element);
            continue;
        }

        if element.kind() == item_kind {
            push_line_break(&mut children, newline, indent);
            for comment in pending.drain(..).filter(|e| e.kind().is_comment()) {
                let line_comment = comment.kind() == CsSyntaxKind::CommentLine;
                children.push(green_of(&comment));
                if line_comment {
                    push_line_break(&mut children, newline, indent);
                } else {
                    children.push(green_token(CsSyntaxKind::Whitespace, " "));
                }
            }
        } else {
            children.extend(pending.drain(..).map(|e| green_of(&e)));
        }
        children.push(green_of(&element));
    }

    children.extend(pending.iter().map(green_of));
    children
}

fn push_line_break(children: &mut Vec<GreenElement>, newline: &str, indent: &str) {
    children.push(green_token(CsSyntaxKind::Newline, newline));
    if !indent.is_empty() {
        children.push(green_token(CsSyntaxKind::Whitespace, indent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parline_core::cst::parse_cs;

    fn nth_of(root: &CsSyntaxNode, kind: CsSyntaxKind, n: usize) -> CsSyntaxNode {
        root.descendants().filter(|n| n.kind() == kind).nth(n).unwrap()
    }

    #[test]
    fn test_classify_precedence() {
        let (cst, _) = parse_cs("class C { void M(int a) { F(b); } }");

        let cases = [
            (CsSyntaxKind::Parameter, TriggerShape::DeclarationItem),
            (CsSyntaxKind::Argument, TriggerShape::CallItem),
            (CsSyntaxKind::ParameterList, TriggerShape::DeclarationList),
            (CsSyntaxKind::ArgumentList, TriggerShape::CallList),
            (CsSyntaxKind::MethodDecl, TriggerShape::Declaration),
            (CsSyntaxKind::InvocationExpr, TriggerShape::Call),
        ];
        for (kind, expected) in cases {
            let node = nth_of(&cst, kind, 0);
            assert_eq!(TriggerShape::classify(&node), Some(expected), "{kind:?}");
        }

        let block = nth_of(&cst, CsSyntaxKind::Block, 0);
        assert_eq!(TriggerShape::classify(&block), None);
    }

    #[test]
    fn test_object_creation_argument_has_no_anchor() {
        let (cst, _) = parse_cs("class C { void M() { var x = new P(1, 2); } }");
        let arg = nth_of(&cst, CsSyntaxKind::Argument, 0);

        assert!(resolve_anchor(&arg).is_none());
        assert!(reformat(&cst, &arg, &FixOptions::default()).is_none());
    }

    #[test]
    fn test_constructor_parameters_have_no_anchor() {
        let (cst, _) = parse_cs("class C { public C(int a, int b) { } }");
        let param = nth_of(&cst, CsSyntaxKind::Parameter, 0);
        let list = nth_of(&cst, CsSyntaxKind::ParameterList, 0);

        assert!(resolve_anchor(&param).is_none());
        assert!(resolve_anchor(&list).is_none());
        assert!(reformat(&cst, &param, &FixOptions::default()).is_none());
    }

    #[test]
    fn test_comments_before_items_are_kept() {
        let source = "class C {\n    void M(/* first */ int a, // tail\n int b) { }\n}";
        let (cst, _) = parse_cs(source);
        let decl = nth_of(&cst, CsSyntaxKind::MethodDecl, 0);

        let fixed = reformat(&cst, &decl, &FixOptions::default()).unwrap();
        assert_eq!(
            fixed.text().to_string(),
            "class C {\n    void M(\n        /* first */ int a,\n        // tail\n        int b) { }\n}"
        );
    }

    #[test]
    fn test_tabs_indent_unit() {
        let source = "class C\n{\n\tvoid M(int a, int b) { }\n}";
        let (cst, _) = parse_cs(source);
        let list = nth_of(&cst, CsSyntaxKind::ParameterList, 0);
        let options = FixOptions {
            indent_unit: "\t".to_string(),
            ..FixOptions::default()
        };

        let fixed = reformat(&cst, &list, &options).unwrap();
        assert_eq!(
            fixed.text().to_string(),
            "class C\n{\n\tvoid M(\n\t\tint a,\n\t\tint b) { }\n}"
        );
    }
}
