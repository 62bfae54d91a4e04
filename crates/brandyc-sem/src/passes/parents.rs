//! Parent hookup pass.
//!
//! A single pre-order walk that records each node as the parent of its
//! children. The pass drives its own descent so the current parent id
//! travels down as context; the root keeps no parent.

use brandyc_par::{walk_children, AstNode, AstVisitor, NodeId, Outcome};

/// The parent-hookup visitor. Run it over the module root with
/// [`brandyc_par::walk_ref`].
#[derive(Default)]
pub struct ParentHookup {
    stack: Vec<NodeId>,
}

impl ParentHookup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AstVisitor for ParentHookup {
    fn visit(&mut self, node: &mut AstNode) -> Outcome {
        node.parent = self.stack.last().copied();
        self.stack.push(node.id);
        walk_children(node, self);
        self.stack.pop();
        Outcome::Stop
    }
}
