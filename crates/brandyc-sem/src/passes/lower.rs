//! Operator lowering.
//!
//! Rewrites `a ⊕ b` into `a.@op(b)` and `⊖ a` / `a ⊖` into `a.@op()`,
//! so the resolver only ever sees calls. The member-access dot is
//! structural and stays untouched. Method names come from the closed
//! [`OperatorMethod`] table; no strings are matched here.

use brandyc_par::ast::{CallNode, MemberAccessNode, NodeIdGen};
use brandyc_par::{AstNode, AstVisitor, NodeKind, Outcome};

use crate::ops::OperatorMethod;

/// The operator-lowering visitor. Run it over the module root with
/// [`brandyc_par::walk`] so replacement is legal.
pub struct OperatorLowering<'a> {
    ids: &'a mut NodeIdGen,
}

impl<'a> OperatorLowering<'a> {
    pub fn new(ids: &'a mut NodeIdGen) -> Self {
        Self { ids }
    }

    fn lower(
        &mut self,
        node: &mut AstNode,
        method: OperatorMethod,
        left: Box<AstNode>,
        arguments: Vec<Box<AstNode>>,
    ) -> Outcome {
        let first = node.first_token;
        let last = node.last_token;

        let member = Box::new(AstNode::new(
            self.ids.fresh(),
            first,
            last,
            NodeKind::MemberAccess(MemberAccessNode {
                left: Some(left),
                member: method.interned(),
                symbol: None,
                resulting_type: None,
            }),
        ));

        let call = Box::new(AstNode::new(
            self.ids.fresh(),
            first,
            last,
            NodeKind::Call(CallNode {
                callee: Some(member),
                arguments,
                implementation: None,
                resulting_type: None,
            }),
        ));

        Outcome::Replace(call)
    }
}

impl AstVisitor for OperatorLowering<'_> {
    fn visit_binary_op(&mut self, node: &mut AstNode) -> Outcome {
        let NodeKind::BinaryOp(op) = &mut node.kind else {
            return Outcome::Resume;
        };
        let Some(method) = OperatorMethod::for_binary(op.op) else {
            return Outcome::Resume;
        };
        if op.left.is_none() || op.right.is_none() {
            return Outcome::Resume;
        }

        let left = op.left.take().unwrap();
        let right = op.right.take().unwrap();
        self.lower(node, method, left, vec![right])
    }

    fn visit_unary_op(&mut self, node: &mut AstNode) -> Outcome {
        let NodeKind::UnaryOp(op) = &mut node.kind else {
            return Outcome::Resume;
        };
        let Some(method) = OperatorMethod::for_unary(op.op, op.is_postfix) else {
            return Outcome::Resume;
        };
        if op.operand.is_none() {
            return Outcome::Resume;
        }

        let operand = op.operand.take().unwrap();
        self.lower(node, method, operand, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandyc_lex::tokenize;
    use brandyc_par::{walk, Parser};
    use brandyc_util::Name;

    fn lowered(source: &str) -> Box<AstNode> {
        let tokens = tokenize(source).unwrap();
        let parsed = Parser::new(source, &tokens).parse_module().unwrap();
        let mut root = parsed.root;
        let mut ids = parsed.ids;
        walk(&mut root, &mut OperatorLowering::new(&mut ids));
        root
    }

    fn only_statement(root: &AstNode) -> &AstNode {
        match &root.kind {
            NodeKind::Module(m) => &m.statements[0],
            _ => panic!("root is not a module"),
        }
    }

    /// Destructure a lowered call into (method name, receiver, args).
    fn as_method_call(node: &AstNode) -> (Name, &AstNode, &[Box<AstNode>]) {
        let NodeKind::Call(call) = &node.kind else {
            panic!("node is not a call");
        };
        let NodeKind::MemberAccess(member) = &call.callee.as_ref().unwrap().kind else {
            panic!("callee is not a member access");
        };
        (
            member.member,
            member.left.as_ref().unwrap(),
            &call.arguments,
        )
    }

    #[test]
    fn test_binary_add_lowers_to_method_call() {
        let root = lowered("1 + 2 * 3\n");
        let statement = only_statement(&root);

        let (method, receiver, args) = as_method_call(statement);
        assert_eq!(method.as_str(), "@add");
        assert!(matches!(receiver.kind, NodeKind::Literal(_)));
        assert_eq!(args.len(), 1);

        // The right operand is itself a lowered @multiply call.
        let (inner, _, inner_args) = as_method_call(&args[0]);
        assert_eq!(inner.as_str(), "@multiply");
        assert_eq!(inner_args.len(), 1);
    }

    #[test]
    fn test_assignment_lowers_to_assign_method() {
        let root = lowered("x = 1\n");
        let statement = only_statement(&root);
        let (method, receiver, args) = as_method_call(statement);
        assert_eq!(method.as_str(), "@assign");
        assert!(matches!(receiver.kind, NodeKind::NameReference(_)));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_unary_lowers_to_zero_argument_call() {
        let root = lowered("y = -x\n");
        let statement = only_statement(&root);
        let (_, _, args) = as_method_call(statement);

        let (method, receiver, inner_args) = as_method_call(&args[0]);
        assert_eq!(method.as_str(), "@subtract");
        assert!(matches!(receiver.kind, NodeKind::NameReference(_)));
        assert!(inner_args.is_empty());
    }

    #[test]
    fn test_member_dot_is_exempt() {
        let root = lowered("a.b\n");
        let statement = only_statement(&root);
        assert!(matches!(statement.kind, NodeKind::MemberAccess(_)));
    }

    #[test]
    fn test_no_operator_nodes_survive() {
        let root = lowered("a = 1 + 2 << 3 && not b\n");

        struct NoOperators;
        impl AstVisitor for NoOperators {
            fn visit_binary_op(&mut self, _node: &mut AstNode) -> Outcome {
                panic!("a binary operator node survived lowering");
            }
            fn visit_unary_op(&mut self, _node: &mut AstNode) -> Outcome {
                panic!("a unary operator node survived lowering");
            }
        }

        let mut root = root;
        brandyc_par::walk_ref(&mut root, &mut NoOperators);
    }
}
