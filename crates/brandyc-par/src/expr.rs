//! Expression rules.
//!
//! One generic routine implements every binary level: it parses the
//! left operand with the next-tighter rule, then folds operators from
//! its accepted list, parsing right operands with the supplied right
//! rule. Left-associative levels pass the next-tighter rule on both
//! sides; the assignment level passes itself as the right rule and so
//! associates right.
//!
//! Newlines are made significant around operator acceptance, so an
//! operator may end a line but never begin one.

use brandyc_lex::TokenKind;

use crate::ast::*;
use crate::{Parsed, Parser};

const ASSIGNMENT_OPS: &[TokenKind] = &[
    TokenKind::AssignCreate,
    TokenKind::Assign,
    TokenKind::AssignAdd,
    TokenKind::AssignSubtract,
    TokenKind::AssignMultiply,
    TokenKind::AssignDivide,
    TokenKind::AssignModulo,
    TokenKind::AssignExponent,
    TokenKind::AssignBitshiftLeft,
    TokenKind::AssignBitshiftRight,
    TokenKind::AssignLogicalShiftLeft,
    TokenKind::AssignLogicalShiftRight,
    TokenKind::AssignBitwiseAnd,
    TokenKind::AssignBitwiseOr,
    TokenKind::AssignBitwiseXor,
    TokenKind::AssignLogicalAnd,
    TokenKind::AssignLogicalOr,
];

const PIPE_OPS: &[TokenKind] = &[
    TokenKind::PipeRight,
    TokenKind::PipeLeft,
    TokenKind::PipeDoubleRight,
    TokenKind::PipeDoubleLeft,
    TokenKind::PipeTripleRight,
    TokenKind::PipeTripleLeft,
];

const EQUALITY_OPS: &[TokenKind] = &[
    TokenKind::Equality,
    TokenKind::Inequality,
    TokenKind::ApproxEquality,
    TokenKind::ApproxInequality,
];

const COMPARISON_OPS: &[TokenKind] = &[
    TokenKind::GreaterThan,
    TokenKind::LessThan,
    TokenKind::GreaterThanOrEqual,
    TokenKind::LessThanOrEqual,
    TokenKind::ApproxGreaterThan,
    TokenKind::ApproxLessThan,
    TokenKind::ApproxGreaterThanOrEqual,
    TokenKind::ApproxLessThanOrEqual,
];

const SHIFT_OPS: &[TokenKind] = &[
    TokenKind::BitshiftLeft,
    TokenKind::BitshiftRight,
    TokenKind::LogicalShiftLeft,
    TokenKind::LogicalShiftRight,
];

const ARROW_OPS: &[TokenKind] = &[
    TokenKind::ArrowRight,
    TokenKind::ArrowLeft,
    TokenKind::LongArrowRight,
    TokenKind::LongArrowLeft,
    TokenKind::BidirectionalArrow,
    TokenKind::FatArrowRight,
    TokenKind::LongFatArrowRight,
    TokenKind::LongFatArrowLeft,
    TokenKind::BidirectionalFatArrow,
];

const UNARY_OPS: &[TokenKind] = &[
    TokenKind::Increment,
    TokenKind::Decrement,
    TokenKind::Add,
    TokenKind::Subtract,
    TokenKind::BitwiseXor,
    TokenKind::DoubleDot,
    TokenKind::TripleDot,
    TokenKind::LogicalNot,
    TokenKind::BitwiseNot,
    TokenKind::Multiply,
    TokenKind::Exponent,
    TokenKind::BitwiseAnd,
];

impl<'a> Parser<'a> {
    /// A full expression: the bottom of the precedence cascade.
    pub(crate) fn accept_expression(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_assignment()
    }

    // ------------------------------------------------------------------
    // The precedence cascade, loosest binding first.
    // ------------------------------------------------------------------

    fn accept_assignment(&mut self) -> Parsed<Box<AstNode>> {
        // Right-associative: the right operand re-enters this level.
        self.accept_generic_binary2(Self::accept_pipe, Self::accept_assignment, ASSIGNMENT_OPS)
    }

    fn accept_pipe(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_logical_or, PIPE_OPS)
    }

    fn accept_logical_or(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_logical_and, &[TokenKind::LogicalOr])
    }

    fn accept_logical_and(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_bitwise_or, &[TokenKind::LogicalAnd])
    }

    fn accept_bitwise_or(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_bitwise_xor, &[TokenKind::BitwiseOr])
    }

    fn accept_bitwise_xor(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_bitwise_and, &[TokenKind::BitwiseXor])
    }

    fn accept_bitwise_and(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_equality, &[TokenKind::BitwiseAnd])
    }

    fn accept_equality(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_comparison, EQUALITY_OPS)
    }

    fn accept_comparison(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_shift, COMPARISON_OPS)
    }

    fn accept_shift(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_additive, SHIFT_OPS)
    }

    fn accept_additive(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(
            Self::accept_multiplicative,
            &[TokenKind::Add, TokenKind::Subtract],
        )
    }

    fn accept_multiplicative(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(
            Self::accept_exponent,
            &[TokenKind::Multiply, TokenKind::Divide, TokenKind::Modulo],
        )
    }

    fn accept_exponent(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_null_coalesce, &[TokenKind::Exponent])
    }

    fn accept_null_coalesce(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_range, &[TokenKind::NullCoalesce])
    }

    fn accept_range(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(
            Self::accept_arrow,
            &[TokenKind::DoubleDot, TokenKind::TripleDot],
        )
    }

    fn accept_arrow(&mut self) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary(Self::accept_unary, ARROW_OPS)
    }

    /// The shared binary level: left-associative fold over the operator
    /// list.
    fn accept_generic_binary(
        &mut self,
        rule: fn(&mut Self) -> Parsed<Box<AstNode>>,
        operators: &[TokenKind],
    ) -> Parsed<Box<AstNode>> {
        self.accept_generic_binary2(rule, rule, operators)
    }

    /// Two-rule form of the binary level, for levels whose right
    /// operand re-enters a different rule (assignment).
    fn accept_generic_binary2(
        &mut self,
        left_rule: fn(&mut Self) -> Parsed<Box<AstNode>>,
        right_rule: fn(&mut Self) -> Parsed<Box<AstNode>>,
        operators: &[TokenKind],
    ) -> Parsed<Box<AstNode>> {
        let first = self.mark();
        let mut left = match left_rule(self)? {
            Some(left) => left,
            None => return Ok(None),
        };

        'fold: loop {
            for &op in operators {
                // The operator itself must sit on the current line; a
                // newline before it ends the expression instead.
                self.saved.push(self.current);
                let matched = self.with_newlines(false, |p| p.accept(op));
                if !matched {
                    self.current = self.saved.pop().expect("speculation stack underflow");
                    continue;
                }
                let op_token = self.last_accepted();

                match right_rule(self)? {
                    Some(right) => {
                        self.saved.pop();
                        left = self.finish_node(
                            first,
                            NodeKind::BinaryOp(BinaryOpNode {
                                op,
                                op_token,
                                left: Some(left),
                                right: Some(right),
                                resulting_type: None,
                            }),
                        );
                        continue 'fold;
                    }
                    None => {
                        // No right operand: give the operator back and
                        // keep what we have.
                        self.current = self.saved.pop().expect("speculation stack underflow");
                        return Ok(Some(left));
                    }
                }
            }
            return Ok(Some(left));
        }
    }

    // ------------------------------------------------------------------
    // Unary and postfix
    // ------------------------------------------------------------------

    /// A prefix operator chain, bottoming out in a post-expression.
    pub(crate) fn accept_unary(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            for &op in UNARY_OPS {
                if !p.accept(op) {
                    continue;
                }
                let op_token = p.last_accepted();
                let operand = match p.accept_unary()? {
                    Some(operand) => operand,
                    None => return Err(p.error_here("expected an operand after unary operator")),
                };
                return Ok(Some(p.finish_node(
                    first,
                    NodeKind::UnaryOp(UnaryOpNode {
                        op,
                        op_token,
                        is_postfix: false,
                        operand: Some(operand),
                        resulting_type: None,
                    }),
                )));
            }

            p.accept_post_expression()
        })
    }

    /// A primary value followed by a greedy chain of member accesses,
    /// calls, casts, and index expressions. No newline may separate the
    /// primary from a call's `(` or an index's `[`.
    pub(crate) fn accept_post_expression(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            let mut left = match p.accept_value()? {
                Some(value) => value,
                None => return Ok(None),
            };

            loop {
                if p.accept(TokenKind::Dot) {
                    p.expect(TokenKind::Identifier)?;
                    let member = p.token_name(p.last_accepted());
                    left = p.finish_node(
                        first,
                        NodeKind::MemberAccess(MemberAccessNode {
                            left: Some(left),
                            member,
                            symbol: None,
                            resulting_type: None,
                        }),
                    );
                    continue;
                }

                if p.with_newlines(false, |p| p.accept(TokenKind::OpenParen)) {
                    let mut arguments = Vec::new();
                    if !p.accept(TokenKind::CloseParen) {
                        loop {
                            match p.accept_expression()? {
                                Some(argument) => arguments.push(argument),
                                None => {
                                    return Err(p.error_here("expected an argument expression"))
                                }
                            }
                            if !p.accept(TokenKind::Comma) {
                                break;
                            }
                        }
                        p.expect(TokenKind::CloseParen)?;
                    }
                    left = p.finish_node(
                        first,
                        NodeKind::Call(CallNode {
                            callee: Some(left),
                            arguments,
                            implementation: None,
                            resulting_type: None,
                        }),
                    );
                    continue;
                }

                if p.accept(TokenKind::As) {
                    let target = match p.accept_type()? {
                        Some(target) => target,
                        None => return Err(p.error_here("expected a type to cast to")),
                    };
                    left = p.finish_node(
                        first,
                        NodeKind::Cast(CastNode {
                            left: Some(left),
                            target: Some(target),
                            resulting_type: None,
                        }),
                    );
                    continue;
                }

                if p.with_newlines(false, |p| p.accept(TokenKind::OpenBracket)) {
                    let index = match p.accept_expression()? {
                        Some(index) => index,
                        None => return Err(p.error_here("expected an index expression")),
                    };
                    p.expect(TokenKind::CloseBracket)?;
                    left = p.finish_node(
                        first,
                        NodeKind::Index(IndexNode {
                            left: Some(left),
                            index: Some(index),
                            implementation: None,
                            resulting_type: None,
                        }),
                    );
                    continue;
                }

                return Ok(Some(left));
            }
        })
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// A primary value: literal, lambda, absolute value, dict literal,
    /// name reference, or a parenthesized expression / tuple literal.
    pub(crate) fn accept_value(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            if let Some(node) = p.accept_literal()? {
                return Ok(Some(node));
            }
            if let Some(node) = p.accept_lambda()? {
                return Ok(Some(node));
            }
            if let Some(node) = p.accept_absolute_value()? {
                return Ok(Some(node));
            }
            if let Some(node) = p.accept_dict_literal()? {
                return Ok(Some(node));
            }
            if let Some(node) = p.accept_name_reference()? {
                return Ok(Some(node));
            }

            let first = p.mark();
            if p.accept(TokenKind::OpenParen) {
                let expression = match p.accept_expression()? {
                    Some(expression) => expression,
                    None => return Ok(None),
                };

                if p.accept(TokenKind::Comma) {
                    let mut values = vec![expression];
                    loop {
                        match p.accept_expression()? {
                            Some(value) => values.push(value),
                            None => {
                                return Err(
                                    p.error_here("expected an expression in tuple literal")
                                )
                            }
                        }
                        if !p.accept(TokenKind::Comma) {
                            break;
                        }
                    }
                    p.expect(TokenKind::CloseParen)?;
                    return Ok(Some(p.finish_node(
                        first,
                        NodeKind::TupleLiteral(TupleLiteralNode {
                            values,
                            resulting_type: None,
                        }),
                    )));
                }

                if p.accept(TokenKind::CloseParen) {
                    return Ok(Some(expression));
                }
            }

            Ok(None)
        })
    }

    /// Any literal token, `true` / `false` / `nil` included.
    pub(crate) fn accept_literal(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept_matching(TokenKind::is_literal) {
                return Ok(None);
            }
            let value_token = p.last_accepted();
            let literal_kind = p.token_kind_at(value_token);
            Ok(Some(p.finish_node(
                first,
                NodeKind::Literal(LiteralNode {
                    value_token,
                    literal_kind,
                    resulting_type: None,
                }),
            )))
        })
    }

    /// `lambda (params) [type] -> scope` or `=> expr`.
    pub(crate) fn accept_lambda(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Lambda) {
                return Ok(None);
            }

            let parameters = p.accept_parameter_list()?;
            let return_type = p.accept_type()?;

            let scope = if p.accept(TokenKind::ArrowRight) {
                p.accept_scope()?
            } else if p.accept(TokenKind::FatArrowRight) {
                p.accept_expression_scope()?
            } else {
                return Err(p.error_here("expected an arrow (-> or =>) after the lambda header"));
            };

            Ok(Some(p.finish_node(
                first,
                NodeKind::Lambda(LambdaNode {
                    parameters,
                    return_type,
                    scope: Some(scope),
                    resulting_type: None,
                }),
            )))
        })
    }

    /// `|expr|`
    pub(crate) fn accept_absolute_value(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::BitwiseOr) {
                return Ok(None);
            }
            let operand = match p.accept_expression()? {
                Some(operand) => operand,
                None => return Ok(None),
            };
            p.expect(TokenKind::BitwiseOr)?;
            Ok(Some(p.finish_node(
                first,
                NodeKind::AbsoluteValue(AbsoluteValueNode {
                    operand: Some(operand),
                    resulting_type: None,
                }),
            )))
        })
    }

    /// `{ key: value, … }` or the empty `{}`.
    pub(crate) fn accept_dict_literal(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::OpenCurly) {
                return Ok(None);
            }

            let mut keys = Vec::new();
            let mut values = Vec::new();

            if p.accept(TokenKind::CloseCurly) {
                return Ok(Some(p.finish_node(
                    first,
                    NodeKind::DictLiteral(DictLiteralNode {
                        keys,
                        values,
                        resulting_type: None,
                    }),
                )));
            }

            loop {
                let key = match p.accept_expression()? {
                    Some(key) => key,
                    None => return Ok(None),
                };
                if !p.accept(TokenKind::Colon) {
                    // Not a dict after all; let the scope grammar have
                    // the brace back.
                    return Ok(None);
                }
                let value = match p.accept_expression()? {
                    Some(value) => value,
                    None => return Err(p.error_here("expected a value expression after :")),
                };
                keys.push(key);
                values.push(value);
                if !p.accept(TokenKind::Comma) {
                    break;
                }
            }
            p.expect(TokenKind::CloseCurly)?;

            Ok(Some(p.finish_node(
                first,
                NodeKind::DictLiteral(DictLiteralNode {
                    keys,
                    values,
                    resulting_type: None,
                }),
            )))
        })
    }

    /// A bare identifier.
    pub(crate) fn accept_name_reference(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Identifier) {
                return Ok(None);
            }
            let name = p.token_name(p.last_accepted());
            Ok(Some(p.finish_node(
                first,
                NodeKind::NameReference(NameReferenceNode {
                    name,
                    symbol: None,
                    resulting_type: None,
                }),
            )))
        })
    }

    /// A dotted type name.
    pub(crate) fn accept_type(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Identifier) {
                return Ok(None);
            }
            let mut path = vec![p.token_name(p.last_accepted())];
            while p.accept(TokenKind::Dot) {
                p.expect(TokenKind::Identifier)?;
                path.push(p.token_name(p.last_accepted()));
            }
            Ok(Some(p.finish_node(
                first,
                NodeKind::TypeReference(TypeReferenceNode { path, symbol: None }),
            )))
        })
    }
}
