//! Statement rules.
//!
//! Statement dispatch tries, in order: label, if, while, for, import,
//! meta block, var, typedef, expression, return, break, goto. The
//! `unless` and `until` forms normalize into `if` / `while` by wrapping
//! the condition in a synthesized logical-not spanning the original
//! condition.

use brandyc_lex::TokenKind;

use crate::ast::*;
use crate::{Parsed, Parser};

impl<'a> Parser<'a> {
    /// A statement at the current indent level.
    pub(crate) fn accept_statement(&mut self) -> Parsed<Box<AstNode>> {
        self.with_newlines(true, |p| {
            p.speculate(|p| {
                if !p.accept_indent() {
                    return Ok(None);
                }

                if let Some(node) = p.accept_label()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_if()? {
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_while()? {
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_for()? {
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_import()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_meta_block()? {
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_var()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_typedef()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_expression()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_return()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_break()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }
                if let Some(node) = p.accept_goto()? {
                    p.expect_terminator()?;
                    return Ok(Some(node));
                }

                Ok(None)
            })
        })
    }

    /// `return [expr]`
    pub(crate) fn accept_return(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Return) {
                return Ok(None);
            }
            let value = p.accept_expression()?;
            Ok(Some(
                p.finish_node(first, NodeKind::Return(ReturnNode { value })),
            ))
        })
    }

    /// `break [label]` / `continue [label]`
    pub(crate) fn accept_break(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            let is_continue = if p.accept(TokenKind::Break) {
                false
            } else if p.accept(TokenKind::Continue) {
                true
            } else {
                return Ok(None);
            };

            let target = if p.accept(TokenKind::Identifier) {
                Some(p.token_name(p.last_accepted()))
            } else {
                None
            };

            Ok(Some(p.finish_node(
                first,
                NodeKind::Break(BreakNode { is_continue, target }),
            )))
        })
    }

    /// `goto label`
    pub(crate) fn accept_goto(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Goto) {
                return Ok(None);
            }
            p.expect(TokenKind::Identifier)?;
            let target = p.token_name(p.last_accepted());
            Ok(Some(
                p.finish_node(first, NodeKind::Goto(GotoNode { target })),
            ))
        })
    }

    /// `if` / `unless` with an `elif` chain and an optional final
    /// `else`, linked linearly through `else_clause`.
    pub(crate) fn accept_if(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            let negated = if p.accept(TokenKind::If) {
                false
            } else if p.accept(TokenKind::Unless) {
                true
            } else {
                return Ok(None);
            };

            let condition = match p.accept_expression()? {
                Some(condition) => condition,
                None => return Err(p.error_here("expected an expression following if")),
            };
            let condition = if negated {
                p.synthesize_not(condition)
            } else {
                condition
            };

            let scope = p.accept_scope()?;

            // Collect the elif / else clauses, then fold them from the
            // back into the linear else chain.
            let mut clauses: Vec<(usize, Option<Box<AstNode>>, Box<AstNode>, usize)> = Vec::new();

            while p.accept(TokenKind::Elif) {
                let clause_first = p.last_accepted();
                let clause_condition = match p.accept_expression()? {
                    Some(condition) => condition,
                    None => return Err(p.error_here("expected an expression following elif")),
                };
                let clause_scope = p.accept_scope()?;
                let clause_last = p.last_token_index().unwrap_or(clause_first);
                clauses.push((clause_first, Some(clause_condition), clause_scope, clause_last));
            }

            if p.accept(TokenKind::Else) {
                let clause_first = p.last_accepted();
                let clause_scope = p.accept_scope()?;
                let clause_last = p.last_token_index().unwrap_or(clause_first);
                clauses.push((clause_first, None, clause_scope, clause_last));
            }

            let mut tail: Option<Box<AstNode>> = None;
            for (clause_first, clause_condition, clause_scope, clause_last) in
                clauses.into_iter().rev()
            {
                tail = Some(p.make_node(
                    clause_first,
                    clause_last,
                    NodeKind::If(IfNode {
                        condition: clause_condition,
                        scope: Some(clause_scope),
                        else_clause: tail,
                    }),
                ));
            }

            Ok(Some(p.finish_node(
                first,
                NodeKind::If(IfNode {
                    condition: Some(condition),
                    scope: Some(scope),
                    else_clause: tail,
                }),
            )))
        })
    }

    /// `while` / `until`.
    pub(crate) fn accept_while(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            let negated = if p.accept(TokenKind::While) {
                false
            } else if p.accept(TokenKind::Until) {
                true
            } else {
                return Ok(None);
            };

            let condition = match p.accept_expression()? {
                Some(condition) => condition,
                None => return Err(p.error_here("expected an expression following while")),
            };
            let condition = if negated {
                p.synthesize_not(condition)
            } else {
                condition
            };

            let scope = p.accept_scope()?;

            Ok(Some(p.finish_node(
                first,
                NodeKind::While(WhileNode {
                    condition: Some(condition),
                    scope: Some(scope),
                }),
            )))
        })
    }

    /// `for x in e` or `for x from a to b [every s]`, each with an
    /// optional `if` guard before the body.
    pub(crate) fn accept_for(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::For) {
                return Ok(None);
            }

            p.expect(TokenKind::Identifier)?;
            let name = p.token_name(p.last_accepted());

            let mut iterable = None;
            let mut start = None;
            let mut end = None;
            let mut step = None;

            if p.accept(TokenKind::In) {
                iterable = match p.accept_expression()? {
                    Some(e) => Some(e),
                    None => return Err(p.error_here("expected an expression after in")),
                };
            } else if p.accept(TokenKind::From) {
                start = match p.accept_expression()? {
                    Some(e) => Some(e),
                    None => return Err(p.error_here("expected a start expression after from")),
                };
                p.expect(TokenKind::To)?;
                end = match p.accept_expression()? {
                    Some(e) => Some(e),
                    None => return Err(p.error_here("expected an end expression after to")),
                };
                if p.accept(TokenKind::Every) {
                    step = match p.accept_expression()? {
                        Some(e) => Some(e),
                        None => return Err(p.error_here("expected a step expression after every")),
                    };
                }
            } else {
                return Err(p.error_here("expected in or from in for loop"));
            }

            let guard = if p.accept(TokenKind::If) {
                match p.accept_expression()? {
                    Some(e) => Some(e),
                    None => return Err(p.error_here("expected a guard expression after if")),
                }
            } else {
                None
            };

            let scope = p.accept_scope()?;

            Ok(Some(p.finish_node(
                first,
                NodeKind::For(ForNode {
                    name,
                    iterable,
                    start,
                    end,
                    step,
                    guard,
                    scope: Some(scope),
                }),
            )))
        })
    }

    /// `meta` block.
    pub(crate) fn accept_meta_block(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Meta) {
                return Ok(None);
            }
            let scope = p.accept_scope()?;
            Ok(Some(p.finish_node(
                first,
                NodeKind::MetaBlock(MetaBlockNode { scope: Some(scope) }),
            )))
        })
    }

    /// Wrap a condition in a logical-not node spanning the condition,
    /// used to normalize `unless` and `until`.
    pub(crate) fn synthesize_not(&mut self, condition: Box<AstNode>) -> Box<AstNode> {
        let first = condition.first_token;
        let last = condition.last_token;
        self.make_node(
            first,
            last,
            NodeKind::UnaryOp(UnaryOpNode {
                op: TokenKind::LogicalNot,
                op_token: first,
                is_postfix: false,
                operand: Some(condition),
                resulting_type: None,
            }),
        )
    }

    /// Build a node with an explicit token range.
    pub(crate) fn make_node(
        &mut self,
        first: usize,
        last: usize,
        kind: NodeKind,
    ) -> Box<AstNode> {
        Box::new(AstNode::new(self.ids.fresh(), first, last.max(first), kind))
    }
}
