//! Thin wrapper over rowan's green tree builder

use rowan::{Checkpoint, GreenNodeBuilder};

use super::{CsSyntaxKind, CsSyntaxNode, CstToken};

/// Builds a green tree from lexed tokens
///
/// Node structure is decided by the parser; the builder only records it.
pub struct CstBuilder {
    builder: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: CsSyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Remember the current position so a node can later be wrapped around
    /// everything added after it
    pub fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: CsSyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub fn token(&mut self, kind: CsSyntaxKind, text: &str) {
        self.builder.token(kind.into(), text);
    }

    pub fn add_token(&mut self, token: &CstToken) {
        self.token(token.kind, &token.text);
    }

    pub fn finish(self) -> CsSyntaxNode {
        CsSyntaxNode::new_root(self.builder.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
