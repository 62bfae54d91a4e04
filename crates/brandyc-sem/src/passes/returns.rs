//! Function-return rewrite.
//!
//! A function body, lambda body, or property getter holding exactly one
//! statement that is an expression gets that statement replaced by a
//! `return` of the expression. The declaration hooks note the eligible
//! statement; when the walk reaches it, the base hook hands back a
//! replacement through the `Replace` outcome, and the walk driver swaps
//! it into the owning slot.
//!
//! The rewrite is idempotent: the second run sees a `return` statement,
//! which is not an expression, and leaves the tree untouched.

use brandyc_par::ast::{NodeIdGen, ReturnNode};
use brandyc_par::{AstNode, AstVisitor, NodeId, NodeKind, Outcome};
use brandyc_util::FxHashSet;

/// The function-return rewrite visitor. Run it over the module root
/// with [`brandyc_par::walk`] so replacement is legal.
pub struct FunctionReturns<'a> {
    ids: &'a mut NodeIdGen,
    pending: FxHashSet<NodeId>,
}

impl<'a> FunctionReturns<'a> {
    pub fn new(ids: &'a mut NodeIdGen) -> Self {
        Self {
            ids,
            pending: FxHashSet::default(),
        }
    }

    /// Note the body's single expression statement, if the scope
    /// qualifies for the rewrite.
    fn mark_scope(&mut self, scope: Option<&AstNode>) {
        let Some(scope) = scope else { return };
        let NodeKind::Scope(scope) = &scope.kind else {
            return;
        };
        if scope.statements.len() == 1 && scope.statements[0].is_expression() {
            self.pending.insert(scope.statements[0].id);
        }
    }
}

impl AstVisitor for FunctionReturns<'_> {
    fn visit_function(&mut self, node: &mut AstNode) -> Outcome {
        if let NodeKind::Function(function) = &node.kind {
            self.mark_scope(function.scope.as_deref());
        }
        Outcome::Resume
    }

    fn visit_lambda(&mut self, node: &mut AstNode) -> Outcome {
        if let NodeKind::Lambda(lambda) = &node.kind {
            self.mark_scope(lambda.scope.as_deref());
        }
        Outcome::Resume
    }

    fn visit_property(&mut self, node: &mut AstNode) -> Outcome {
        if let NodeKind::Property(property) = &node.kind {
            self.mark_scope(property.getter.as_deref());
        }
        Outcome::Resume
    }

    fn visit(&mut self, node: &mut AstNode) -> Outcome {
        if !self.pending.remove(&node.id) || !node.is_expression() {
            return Outcome::Resume;
        }

        let first = node.first_token;
        let last = node.last_token;
        let value = Box::new(node.take());
        let replacement = Box::new(AstNode::new(
            self.ids.fresh(),
            first,
            last,
            NodeKind::Return(ReturnNode { value: Some(value) }),
        ));
        Outcome::Replace(replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandyc_lex::tokenize;
    use brandyc_par::{walk, Parser};

    fn rewritten(source: &str) -> (Box<AstNode>, NodeIdGen) {
        let tokens = tokenize(source).unwrap();
        let parsed = Parser::new(source, &tokens).parse_module().unwrap();
        let mut root = parsed.root;
        let mut ids = parsed.ids;
        walk(&mut root, &mut FunctionReturns::new(&mut ids));
        (root, ids)
    }

    fn body_statements(root: &AstNode) -> &[Box<AstNode>] {
        let NodeKind::Module(module) = &root.kind else {
            panic!("root is not a module");
        };
        let NodeKind::Function(function) = &module.members[0].kind else {
            panic!("member is not a function");
        };
        let NodeKind::Scope(scope) = &function.scope.as_ref().unwrap().kind else {
            panic!("body is not a scope");
        };
        &scope.statements
    }

    #[test]
    fn test_single_expression_becomes_return() {
        let (root, _) = rewritten("func f(a: i32, b: i32) ->\n  a + b\n");
        let statements = body_statements(&root);
        assert_eq!(statements.len(), 1);
        let NodeKind::Return(ret) = &statements[0].kind else {
            panic!("body statement was not rewritten to a return");
        };
        assert!(matches!(
            ret.value.as_ref().unwrap().kind,
            NodeKind::BinaryOp(_)
        ));
    }

    #[test]
    fn test_multi_statement_body_is_untouched() {
        let (root, _) = rewritten("func f(a: i32) ->\n  a\n  a + 1\n");
        let statements = body_statements(&root);
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| s.is_expression()));
    }

    #[test]
    fn test_non_expression_single_statement_is_untouched() {
        let (root, _) = rewritten("func f(a: i32) ->\n  return a\n");
        let statements = body_statements(&root);
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0].kind, NodeKind::Return(_)));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let (mut root, mut ids) = rewritten("func f(a: i32) ->\n  a\n");
        let before = format!("{:?}", root);
        walk(&mut root, &mut FunctionReturns::new(&mut ids));
        let after = format!("{:?}", root);
        assert_eq!(before, after);
    }

    #[test]
    fn test_property_getter_is_rewritten() {
        let (root, _) = rewritten("property p: i32 { get -> 41 + 1 }\n");
        let NodeKind::Module(module) = &root.kind else {
            panic!("root is not a module");
        };
        let NodeKind::Property(property) = &module.members[0].kind else {
            panic!("member is not a property");
        };
        let NodeKind::Scope(getter) = &property.getter.as_ref().unwrap().kind else {
            panic!("getter is not a scope");
        };
        assert!(matches!(getter.statements[0].kind, NodeKind::Return(_)));
    }
}
