//! Operator method names.
//!
//! Every operator the parser accepts lowers to a call of a named method
//! on its left operand. The mapping from token kind to method name is a
//! closed enum with a dense name table; the rewrite pass never builds
//! or matches name strings.

use brandyc_lex::TokenKind;
use brandyc_util::Name;

/// The closed set of operator methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorMethod {
    Assign,
    AssignAdd,
    AssignSubtract,
    AssignMultiply,
    AssignDivide,
    AssignModulo,
    AssignExponent,
    AssignBitwiseLeftShift,
    AssignBitwiseRightShift,
    AssignLogicalLeftShift,
    AssignLogicalRightShift,
    AssignBitwiseAnd,
    AssignBitwiseOr,
    AssignBitwiseXor,
    AssignLogicalAnd,
    AssignLogicalOr,
    PipeRight,
    PipeLeft,
    PipeDoubleRight,
    PipeDoubleLeft,
    PipeTripleRight,
    PipeTripleLeft,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Inequality,
    ApproxEquality,
    ApproxInequality,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    ApproxLessThan,
    ApproxGreaterThan,
    ApproxLessThanOrEqual,
    ApproxGreaterThanOrEqual,
    BitwiseLeftShift,
    BitwiseRightShift,
    LogicalLeftShift,
    LogicalRightShift,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    NullCoalesce,
    DoubleDot,
    TripleDot,
    ArrowRight,
    ArrowLeft,
    LongArrowRight,
    LongArrowLeft,
    BidirectionalArrow,
    FatArrowRight,
    LongFatArrowRight,
    LongFatArrowLeft,
    BidirectionalFatArrow,
    BitwiseNot,
    LogicalNot,
    PreIncrement,
    PostIncrement,
    PreDecrement,
    PostDecrement,
    Call,
    Index,
}

impl OperatorMethod {
    /// The source-level method name.
    pub fn name(self) -> &'static str {
        match self {
            OperatorMethod::Assign => "@assign",
            OperatorMethod::AssignAdd => "@assign_add",
            OperatorMethod::AssignSubtract => "@assign_subtract",
            OperatorMethod::AssignMultiply => "@assign_multiply",
            OperatorMethod::AssignDivide => "@assign_divide",
            OperatorMethod::AssignModulo => "@assign_modulo",
            OperatorMethod::AssignExponent => "@assign_exponent",
            OperatorMethod::AssignBitwiseLeftShift => "@assign_bitwise_left_shift",
            OperatorMethod::AssignBitwiseRightShift => "@assign_bitwise_right_shift",
            OperatorMethod::AssignLogicalLeftShift => "@assign_logical_left_shift",
            OperatorMethod::AssignLogicalRightShift => "@assign_logical_right_shift",
            OperatorMethod::AssignBitwiseAnd => "@assign_bitwise_and",
            OperatorMethod::AssignBitwiseOr => "@assign_bitwise_or",
            OperatorMethod::AssignBitwiseXor => "@assign_bitwise_xor",
            OperatorMethod::AssignLogicalAnd => "@assign_logical_and",
            OperatorMethod::AssignLogicalOr => "@assign_logical_or",
            OperatorMethod::PipeRight => "@pipe_right",
            OperatorMethod::PipeLeft => "@pipe_left",
            OperatorMethod::PipeDoubleRight => "@pipe_double_right",
            OperatorMethod::PipeDoubleLeft => "@pipe_double_left",
            OperatorMethod::PipeTripleRight => "@pipe_triple_right",
            OperatorMethod::PipeTripleLeft => "@pipe_triple_left",
            OperatorMethod::LogicalOr => "@logical_or",
            OperatorMethod::LogicalAnd => "@logical_and",
            OperatorMethod::BitwiseOr => "@bitwise_or",
            OperatorMethod::BitwiseXor => "@bitwise_xor",
            OperatorMethod::BitwiseAnd => "@bitwise_and",
            OperatorMethod::Equality => "@equality",
            OperatorMethod::Inequality => "@inequality",
            OperatorMethod::ApproxEquality => "@approx_equality",
            OperatorMethod::ApproxInequality => "@approx_inequality",
            OperatorMethod::LessThan => "@less_than",
            OperatorMethod::GreaterThan => "@greater_than",
            OperatorMethod::LessThanOrEqual => "@less_than_or_equal",
            OperatorMethod::GreaterThanOrEqual => "@greater_than_or_equal",
            OperatorMethod::ApproxLessThan => "@approx_less_than",
            OperatorMethod::ApproxGreaterThan => "@approx_greater_than",
            OperatorMethod::ApproxLessThanOrEqual => "@approx_less_than_or_equal",
            OperatorMethod::ApproxGreaterThanOrEqual => "@approx_greater_than_or_equal",
            OperatorMethod::BitwiseLeftShift => "@bitwise_left_shift",
            OperatorMethod::BitwiseRightShift => "@bitwise_right_shift",
            OperatorMethod::LogicalLeftShift => "@logical_left_shift",
            OperatorMethod::LogicalRightShift => "@logical_right_shift",
            OperatorMethod::Add => "@add",
            OperatorMethod::Subtract => "@subtract",
            OperatorMethod::Multiply => "@multiply",
            OperatorMethod::Divide => "@divide",
            OperatorMethod::Modulo => "@modulo",
            OperatorMethod::Exponent => "@exponent",
            OperatorMethod::NullCoalesce => "@null_coalesce",
            OperatorMethod::DoubleDot => "@double_dot",
            OperatorMethod::TripleDot => "@triple_dot",
            OperatorMethod::ArrowRight => "@arrow_right",
            OperatorMethod::ArrowLeft => "@arrow_left",
            OperatorMethod::LongArrowRight => "@long_arrow_right",
            OperatorMethod::LongArrowLeft => "@long_arrow_left",
            OperatorMethod::BidirectionalArrow => "@bidirectional_arrow",
            OperatorMethod::FatArrowRight => "@fat_arrow_right",
            OperatorMethod::LongFatArrowRight => "@long_fat_arrow_right",
            OperatorMethod::LongFatArrowLeft => "@long_fat_arrow_left",
            OperatorMethod::BidirectionalFatArrow => "@bidirectional_fat_arrow",
            OperatorMethod::BitwiseNot => "@bitwise_not",
            OperatorMethod::LogicalNot => "@logical_not",
            OperatorMethod::PreIncrement => "@pre_increment",
            OperatorMethod::PostIncrement => "@post_increment",
            OperatorMethod::PreDecrement => "@pre_decrement",
            OperatorMethod::PostDecrement => "@post_decrement",
            OperatorMethod::Call => "@call",
            OperatorMethod::Index => "@index",
        }
    }

    /// The interned method name.
    pub fn interned(self) -> Name {
        Name::intern(self.name())
    }

    /// Method for a binary operator token. The member-access dot is
    /// structural, never a method, so it has no entry.
    pub fn for_binary(kind: TokenKind) -> Option<OperatorMethod> {
        Some(match kind {
            TokenKind::Assign | TokenKind::AssignCreate => OperatorMethod::Assign,
            TokenKind::AssignAdd => OperatorMethod::AssignAdd,
            TokenKind::AssignSubtract => OperatorMethod::AssignSubtract,
            TokenKind::AssignMultiply => OperatorMethod::AssignMultiply,
            TokenKind::AssignDivide => OperatorMethod::AssignDivide,
            TokenKind::AssignModulo => OperatorMethod::AssignModulo,
            TokenKind::AssignExponent => OperatorMethod::AssignExponent,
            TokenKind::AssignBitshiftLeft => OperatorMethod::AssignBitwiseLeftShift,
            TokenKind::AssignBitshiftRight => OperatorMethod::AssignBitwiseRightShift,
            TokenKind::AssignLogicalShiftLeft => OperatorMethod::AssignLogicalLeftShift,
            TokenKind::AssignLogicalShiftRight => OperatorMethod::AssignLogicalRightShift,
            TokenKind::AssignBitwiseAnd => OperatorMethod::AssignBitwiseAnd,
            TokenKind::AssignBitwiseOr => OperatorMethod::AssignBitwiseOr,
            TokenKind::AssignBitwiseXor => OperatorMethod::AssignBitwiseXor,
            TokenKind::AssignLogicalAnd => OperatorMethod::AssignLogicalAnd,
            TokenKind::AssignLogicalOr => OperatorMethod::AssignLogicalOr,
            TokenKind::PipeRight => OperatorMethod::PipeRight,
            TokenKind::PipeLeft => OperatorMethod::PipeLeft,
            TokenKind::PipeDoubleRight => OperatorMethod::PipeDoubleRight,
            TokenKind::PipeDoubleLeft => OperatorMethod::PipeDoubleLeft,
            TokenKind::PipeTripleRight => OperatorMethod::PipeTripleRight,
            TokenKind::PipeTripleLeft => OperatorMethod::PipeTripleLeft,
            TokenKind::LogicalOr => OperatorMethod::LogicalOr,
            TokenKind::LogicalAnd => OperatorMethod::LogicalAnd,
            TokenKind::BitwiseOr => OperatorMethod::BitwiseOr,
            TokenKind::BitwiseXor => OperatorMethod::BitwiseXor,
            TokenKind::BitwiseAnd => OperatorMethod::BitwiseAnd,
            TokenKind::Equality => OperatorMethod::Equality,
            TokenKind::Inequality => OperatorMethod::Inequality,
            TokenKind::ApproxEquality => OperatorMethod::ApproxEquality,
            TokenKind::ApproxInequality => OperatorMethod::ApproxInequality,
            TokenKind::LessThan => OperatorMethod::LessThan,
            TokenKind::GreaterThan => OperatorMethod::GreaterThan,
            TokenKind::LessThanOrEqual => OperatorMethod::LessThanOrEqual,
            TokenKind::GreaterThanOrEqual => OperatorMethod::GreaterThanOrEqual,
            TokenKind::ApproxLessThan => OperatorMethod::ApproxLessThan,
            TokenKind::ApproxGreaterThan => OperatorMethod::ApproxGreaterThan,
            TokenKind::ApproxLessThanOrEqual => OperatorMethod::ApproxLessThanOrEqual,
            TokenKind::ApproxGreaterThanOrEqual => OperatorMethod::ApproxGreaterThanOrEqual,
            TokenKind::BitshiftLeft => OperatorMethod::BitwiseLeftShift,
            TokenKind::BitshiftRight => OperatorMethod::BitwiseRightShift,
            TokenKind::LogicalShiftLeft => OperatorMethod::LogicalLeftShift,
            TokenKind::LogicalShiftRight => OperatorMethod::LogicalRightShift,
            TokenKind::Add => OperatorMethod::Add,
            TokenKind::Subtract => OperatorMethod::Subtract,
            TokenKind::Multiply => OperatorMethod::Multiply,
            TokenKind::Divide => OperatorMethod::Divide,
            TokenKind::Modulo => OperatorMethod::Modulo,
            TokenKind::Exponent => OperatorMethod::Exponent,
            TokenKind::NullCoalesce => OperatorMethod::NullCoalesce,
            TokenKind::DoubleDot => OperatorMethod::DoubleDot,
            TokenKind::TripleDot => OperatorMethod::TripleDot,
            TokenKind::ArrowRight => OperatorMethod::ArrowRight,
            TokenKind::ArrowLeft => OperatorMethod::ArrowLeft,
            TokenKind::LongArrowRight => OperatorMethod::LongArrowRight,
            TokenKind::LongArrowLeft => OperatorMethod::LongArrowLeft,
            TokenKind::BidirectionalArrow => OperatorMethod::BidirectionalArrow,
            TokenKind::FatArrowRight => OperatorMethod::FatArrowRight,
            TokenKind::LongFatArrowRight => OperatorMethod::LongFatArrowRight,
            TokenKind::LongFatArrowLeft => OperatorMethod::LongFatArrowLeft,
            TokenKind::BidirectionalFatArrow => OperatorMethod::BidirectionalFatArrow,
            _ => return None,
        })
    }

    /// Method for a unary operator token. Increment and decrement
    /// distinguish prefix from postfix position; everything else shares
    /// its base name and is told apart by arity.
    pub fn for_unary(kind: TokenKind, is_postfix: bool) -> Option<OperatorMethod> {
        Some(match kind {
            TokenKind::Increment => {
                if is_postfix {
                    OperatorMethod::PostIncrement
                } else {
                    OperatorMethod::PreIncrement
                }
            }
            TokenKind::Decrement => {
                if is_postfix {
                    OperatorMethod::PostDecrement
                } else {
                    OperatorMethod::PreDecrement
                }
            }
            TokenKind::Add => OperatorMethod::Add,
            TokenKind::Subtract => OperatorMethod::Subtract,
            TokenKind::Multiply => OperatorMethod::Multiply,
            TokenKind::Exponent => OperatorMethod::Exponent,
            TokenKind::BitwiseXor => OperatorMethod::BitwiseXor,
            TokenKind::BitwiseAnd => OperatorMethod::BitwiseAnd,
            TokenKind::BitwiseNot => OperatorMethod::BitwiseNot,
            TokenKind::LogicalNot => OperatorMethod::LogicalNot,
            TokenKind::DoubleDot => OperatorMethod::DoubleDot,
            TokenKind::TripleDot => OperatorMethod::TripleDot,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_mapping_names() {
        assert_eq!(
            OperatorMethod::for_binary(TokenKind::Add).unwrap().name(),
            "@add"
        );
        assert_eq!(
            OperatorMethod::for_binary(TokenKind::AssignAdd)
                .unwrap()
                .name(),
            "@assign_add"
        );
        assert_eq!(
            OperatorMethod::for_binary(TokenKind::BitshiftLeft)
                .unwrap()
                .name(),
            "@bitwise_left_shift"
        );
        assert_eq!(
            OperatorMethod::for_binary(TokenKind::LessThanOrEqual)
                .unwrap()
                .name(),
            "@less_than_or_equal"
        );
    }

    #[test]
    fn test_dot_is_exempt() {
        assert_eq!(OperatorMethod::for_binary(TokenKind::Dot), None);
    }

    #[test]
    fn test_unary_position_split() {
        assert_eq!(
            OperatorMethod::for_unary(TokenKind::Increment, false)
                .unwrap()
                .name(),
            "@pre_increment"
        );
        assert_eq!(
            OperatorMethod::for_unary(TokenKind::Increment, true)
                .unwrap()
                .name(),
            "@post_increment"
        );
        assert_eq!(
            OperatorMethod::for_unary(TokenKind::Subtract, false)
                .unwrap()
                .name(),
            "@subtract"
        );
    }
}
