//! Tree-walking visitor framework.
//!
//! A pre-order walk with four per-node outcomes: *resume* (descend into
//! children), *stop* (skip children), *rewalk* (visit the same node
//! again after mutating it), and *replace* (swap a replacement into the
//! owning slot and visit the new node).
//!
//! Hooks take `&mut AstNode` and dispatch by variant tag. Each variant
//! hook defaults to its family hook — post-expressions fan into
//! expressions, expressions and declarations into statements, and
//! everything into the base [`AstVisitor::visit`] — so overriding a
//! single family hook catches the whole family, the way subclass-style
//! fall-through would.
//!
//! Replacement is only legal when the walk entered through an owning
//! slot ([`walk`] / [`walk_opt`]); a walk by borrow ([`walk_ref`])
//! treats `Replace` as an internal invariant violation and panics.

use crate::ast::{AstNode, NodeKind};

/// What the visitor wants the walk driver to do next.
pub enum Outcome {
    /// Recurse into the node's children.
    Resume,
    /// Do not recurse into children.
    Stop,
    /// Visit this node again (after the visitor mutated it).
    Rewalk,
    /// Swap the replacement into the owning slot and visit it.
    Replace(Box<AstNode>),
}

/// Visitor over the syntax tree.
///
/// Every hook receives the full `&mut AstNode`; implementations match
/// on [`AstNode::kind`] to reach their variant's payload.
#[allow(unused_variables)]
pub trait AstVisitor {
    /// Catch-all over every node.
    fn visit(&mut self, node: &mut AstNode) -> Outcome {
        Outcome::Resume
    }

    // Family hooks -----------------------------------------------------

    /// Catch-all over statements (declarations and expressions
    /// included).
    fn visit_statement(&mut self, node: &mut AstNode) -> Outcome {
        self.visit(node)
    }

    /// Catch-all over declarations.
    fn visit_symbol(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    /// Catch-all over expressions.
    fn visit_expression(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    /// Catch-all over post-expressions (member access, call, cast,
    /// index).
    fn visit_post_expression(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    // Structural nodes -------------------------------------------------

    fn visit_module(&mut self, node: &mut AstNode) -> Outcome {
        self.visit(node)
    }

    fn visit_scope(&mut self, node: &mut AstNode) -> Outcome {
        self.visit(node)
    }

    fn visit_type_reference(&mut self, node: &mut AstNode) -> Outcome {
        self.visit(node)
    }

    // Declarations -----------------------------------------------------

    fn visit_class(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_symbol(node)
    }

    fn visit_function(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_symbol(node)
    }

    fn visit_var(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_symbol(node)
    }

    fn visit_parameter(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_var(node)
    }

    fn visit_property(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_symbol(node)
    }

    fn visit_label(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_symbol(node)
    }

    fn visit_import(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_symbol(node)
    }

    fn visit_typedef(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_symbol(node)
    }

    // Statements -------------------------------------------------------

    fn visit_return(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    fn visit_break(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    fn visit_goto(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    fn visit_if(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    fn visit_while(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    fn visit_for(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    fn visit_meta_block(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    fn visit_attribute(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_statement(node)
    }

    // Expressions ------------------------------------------------------

    fn visit_binary_op(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_unary_op(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_absolute_value(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_literal(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_tuple_literal(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_dict_literal(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_lambda(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_name_reference(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_expression(node)
    }

    fn visit_member_access(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_post_expression(node)
    }

    fn visit_call(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_post_expression(node)
    }

    fn visit_cast(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_post_expression(node)
    }

    fn visit_index(&mut self, node: &mut AstNode) -> Outcome {
        self.visit_post_expression(node)
    }
}

/// Invoke the hook matching the node's variant.
pub fn dispatch<V: AstVisitor + ?Sized>(visitor: &mut V, node: &mut AstNode) -> Outcome {
    match &node.kind {
        NodeKind::Module(_) => visitor.visit_module(node),
        NodeKind::Scope(_) => visitor.visit_scope(node),
        NodeKind::TypeReference(_) => visitor.visit_type_reference(node),
        NodeKind::Class(_) => visitor.visit_class(node),
        NodeKind::Function(_) => visitor.visit_function(node),
        NodeKind::Var(_) => visitor.visit_var(node),
        NodeKind::Parameter(_) => visitor.visit_parameter(node),
        NodeKind::Property(_) => visitor.visit_property(node),
        NodeKind::Label(_) => visitor.visit_label(node),
        NodeKind::Import(_) => visitor.visit_import(node),
        NodeKind::Typedef(_) => visitor.visit_typedef(node),
        NodeKind::Return(_) => visitor.visit_return(node),
        NodeKind::Break(_) => visitor.visit_break(node),
        NodeKind::Goto(_) => visitor.visit_goto(node),
        NodeKind::If(_) => visitor.visit_if(node),
        NodeKind::While(_) => visitor.visit_while(node),
        NodeKind::For(_) => visitor.visit_for(node),
        NodeKind::MetaBlock(_) => visitor.visit_meta_block(node),
        NodeKind::Attribute(_) => visitor.visit_attribute(node),
        NodeKind::BinaryOp(_) => visitor.visit_binary_op(node),
        NodeKind::UnaryOp(_) => visitor.visit_unary_op(node),
        NodeKind::AbsoluteValue(_) => visitor.visit_absolute_value(node),
        NodeKind::Literal(_) => visitor.visit_literal(node),
        NodeKind::TupleLiteral(_) => visitor.visit_tuple_literal(node),
        NodeKind::DictLiteral(_) => visitor.visit_dict_literal(node),
        NodeKind::Lambda(_) => visitor.visit_lambda(node),
        NodeKind::NameReference(_) => visitor.visit_name_reference(node),
        NodeKind::MemberAccess(_) => visitor.visit_member_access(node),
        NodeKind::Call(_) => visitor.visit_call(node),
        NodeKind::Cast(_) => visitor.visit_cast(node),
        NodeKind::Index(_) => visitor.visit_index(node),
    }
}

/// Walk a node held by an owning slot. `Replace` swaps the slot's
/// contents and re-visits the replacement.
pub fn walk<V: AstVisitor + ?Sized>(slot: &mut Box<AstNode>, visitor: &mut V) {
    loop {
        match dispatch(visitor, slot) {
            Outcome::Resume => {
                walk_children(slot, visitor);
                return;
            }
            Outcome::Stop => return,
            Outcome::Rewalk => continue,
            Outcome::Replace(replacement) => {
                *slot = replacement;
                continue;
            }
        }
    }
}

/// Walk an optional owning slot.
pub fn walk_opt<V: AstVisitor + ?Sized>(slot: &mut Option<Box<AstNode>>, visitor: &mut V) {
    if let Some(node) = slot {
        walk(node, visitor);
    }
}

/// Walk a node held by borrow. Requesting `Replace` here is a
/// programmer error and aborts.
pub fn walk_ref<V: AstVisitor + ?Sized>(node: &mut AstNode, visitor: &mut V) {
    loop {
        match dispatch(visitor, node) {
            Outcome::Resume => {
                walk_children(node, visitor);
                return;
            }
            Outcome::Stop => return,
            Outcome::Rewalk => continue,
            Outcome::Replace(_) => panic!("replace requested on a node visited by borrow"),
        }
    }
}

/// Walk the node's children without re-visiting the node itself.
///
/// Child order is fixed by each variant's structural definition and is
/// part of the walk contract.
pub fn walk_children<V: AstVisitor + ?Sized>(node: &mut AstNode, visitor: &mut V) {
    match &mut node.kind {
        NodeKind::Module(n) => {
            for member in &mut n.members {
                walk(member, visitor);
            }
            for statement in &mut n.statements {
                walk(statement, visitor);
            }
        }
        NodeKind::Scope(n) => {
            for statement in &mut n.statements {
                walk(statement, visitor);
            }
        }
        NodeKind::TypeReference(_) => {}
        NodeKind::Class(n) => {
            walk_opt(&mut n.attributes, visitor);
            for base in &mut n.base_classes {
                walk(base, visitor);
            }
            for member in &mut n.members {
                walk(member, visitor);
            }
        }
        NodeKind::Function(n) => {
            walk_opt(&mut n.attributes, visitor);
            for parameter in &mut n.parameters {
                walk(parameter, visitor);
            }
            walk_opt(&mut n.return_type, visitor);
            walk_opt(&mut n.scope, visitor);
        }
        NodeKind::Var(n) => {
            walk_opt(&mut n.attributes, visitor);
            walk_opt(&mut n.ty, visitor);
            walk_opt(&mut n.initial_value, visitor);
        }
        NodeKind::Parameter(n) => {
            walk_opt(&mut n.ty, visitor);
            walk_opt(&mut n.default_value, visitor);
        }
        NodeKind::Property(n) => {
            walk_opt(&mut n.attributes, visitor);
            walk_opt(&mut n.ty, visitor);
            walk_opt(&mut n.getter, visitor);
            walk_opt(&mut n.setter, visitor);
        }
        NodeKind::Label(_) | NodeKind::Import(_) | NodeKind::Goto(_) | NodeKind::Break(_) => {}
        NodeKind::Typedef(n) => {
            walk_opt(&mut n.target, visitor);
        }
        NodeKind::Return(n) => {
            walk_opt(&mut n.value, visitor);
        }
        NodeKind::If(n) => {
            walk_opt(&mut n.condition, visitor);
            walk_opt(&mut n.scope, visitor);
            walk_opt(&mut n.else_clause, visitor);
        }
        NodeKind::While(n) => {
            walk_opt(&mut n.condition, visitor);
            walk_opt(&mut n.scope, visitor);
        }
        NodeKind::For(n) => {
            walk_opt(&mut n.iterable, visitor);
            walk_opt(&mut n.start, visitor);
            walk_opt(&mut n.end, visitor);
            walk_opt(&mut n.step, visitor);
            walk_opt(&mut n.guard, visitor);
            walk_opt(&mut n.scope, visitor);
        }
        NodeKind::MetaBlock(n) => {
            walk_opt(&mut n.scope, visitor);
        }
        NodeKind::Attribute(n) => {
            for value in &mut n.values {
                walk(value, visitor);
            }
        }
        NodeKind::BinaryOp(n) => {
            walk_opt(&mut n.left, visitor);
            walk_opt(&mut n.right, visitor);
        }
        NodeKind::UnaryOp(n) => {
            walk_opt(&mut n.operand, visitor);
        }
        NodeKind::AbsoluteValue(n) => {
            walk_opt(&mut n.operand, visitor);
        }
        NodeKind::Literal(_) | NodeKind::NameReference(_) => {}
        NodeKind::TupleLiteral(n) => {
            for value in &mut n.values {
                walk(value, visitor);
            }
        }
        NodeKind::DictLiteral(n) => {
            for (key, value) in n.keys.iter_mut().zip(n.values.iter_mut()) {
                walk(key, visitor);
                walk(value, visitor);
            }
        }
        NodeKind::Lambda(n) => {
            for parameter in &mut n.parameters {
                walk(parameter, visitor);
            }
            walk_opt(&mut n.return_type, visitor);
            walk_opt(&mut n.scope, visitor);
        }
        NodeKind::MemberAccess(n) => {
            walk_opt(&mut n.left, visitor);
        }
        NodeKind::Call(n) => {
            walk_opt(&mut n.callee, visitor);
            for argument in &mut n.arguments {
                walk(argument, visitor);
            }
        }
        NodeKind::Cast(n) => {
            walk_opt(&mut n.left, visitor);
            walk_opt(&mut n.target, visitor);
        }
        NodeKind::Index(n) => {
            walk_opt(&mut n.left, visitor);
            walk_opt(&mut n.index, visitor);
        }
    }
}
