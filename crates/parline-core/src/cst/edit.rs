//! Persistent tree edits
//!
//! Rowan trees are immutable. An edit rebuilds the green node of the
//! changed subtree and splices it into a new root; untouched subtrees are
//! shared with the old tree.

use super::{CsSyntaxElement, CsSyntaxKind, CsSyntaxNode, GreenElement, GreenNode, GreenToken, NodeOrToken};

/// Owned green copy of a node or token
pub fn green_of(element: &CsSyntaxElement) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    }
}

/// Fresh green token, used for synthesized trivia
pub fn green_token(kind: CsSyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

/// Green node of the same kind as `node` with the given children
pub fn rebuild_node(node: &CsSyntaxNode, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(node.kind().into(), children)
}

/// Replace `node` with `replacement` and return the new root
pub fn replace_node(node: &CsSyntaxNode, replacement: GreenNode) -> CsSyntaxNode {
    CsSyntaxNode::new_root(node.replace_with(replacement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_cs;

    #[test]
    fn test_replace_node_keeps_rest_of_tree() {
        let source = "class C { void M(int a, int b) { } }";
        let (cst, _) = parse_cs(source);
        let list = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::ParameterList)
            .unwrap();

        let children: Vec<_> = list
            .children_with_tokens()
            .filter(|element| element.kind() != CsSyntaxKind::Whitespace)
            .flat_map(|element| {
                let mut out = vec![green_of(&element)];
                if element.kind() == CsSyntaxKind::Comma {
                    out.push(green_token(CsSyntaxKind::Newline, "\n"));
                }
                out
            })
            .collect();

        let root = replace_node(&list, rebuild_node(&list, children));

        assert_eq!(root.text().to_string(), "class C { void M(int a,\nint b) { } }");
        assert_eq!(root.kind(), CsSyntaxKind::CompilationUnit);
        // The original tree is unchanged
        assert_eq!(cst.text().to_string(), source);
    }
}
