//! Boundary behaviors the lexer contract pins down.

use proptest::prelude::*;

use crate::token::TokenKind;
use crate::tokenizer::tokenize;

#[test]
fn test_empty_input_yields_no_tokens() {
    assert!(tokenize("").unwrap().is_empty());
}

#[test]
fn test_comments_only_input() {
    let source = "// one\n/* two */\n";
    let tokens = tokenize(source).unwrap();
    assert!(tokens
        .iter()
        .all(|t| t.kind.is_trivia() || t.kind == TokenKind::Newline));
}

#[test]
fn test_shift_assign_is_one_token() {
    let tokens = tokenize("x >>= 1\n").unwrap();
    let ops: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind.is_operator())
        .map(|t| t.kind)
        .collect();
    assert_eq!(ops, vec![TokenKind::AssignBitshiftRight]);
}

#[test]
fn test_keyword_prefix_identifier() {
    let source = "foreach\n";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text(source), "foreach");
}

#[test]
fn test_nested_block_comments_unsupported() {
    // The inner opener is plain text; the first `*/` closes the token
    // and the dangling tail lexes as ordinary tokens.
    let source = "/* a /* b */ c */\n";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::BlockComment);
    assert_eq!(tokens[0].text(source), "/* a /* b */");
    assert!(tokens
        .iter()
        .any(|t| t.kind == TokenKind::Identifier && t.text(source) == "c"));
}

#[test]
fn test_unterminated_block_comment_is_error() {
    assert!(tokenize("/* never closed\n").is_err());
}

#[test]
fn test_unterminated_string_is_error() {
    assert!(tokenize("\"never closed\n").is_err());
}

#[test]
fn test_control_byte_is_error_with_zero_progress() {
    let err = tokenize("\x02").unwrap_err();
    assert_eq!(err.offset, 0);
    assert_eq!(err.line, 1);
}

#[test]
fn test_escaped_string_is_one_token() {
    // `"foo\nbar"` tokenizes to a single string literal of length 10.
    let source = "\"foo\\nbar\"\n";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].span.len, 10);
}

#[test]
fn test_read_token_matches_driver_lengths() {
    // Property 1 of the contract: re-reading at each token's offset
    // reproduces exactly that token's length.
    let source = "func f(a: i32, b: i32) -> a + b\n";
    let tokens = tokenize(source).unwrap();
    for token in &tokens {
        let (kind, len) = crate::brandy_lexer().read_token(source.as_bytes(), token.span.start);
        assert_eq!(kind, token.kind);
        assert_eq!(len as u32, token.span.len);
    }
}

const ROUND_TRIP_ATOMS: &[&str] = &[
    " ", "\n", "foo", "42", "1.5f", "\"s\"", "+", ">>=", "//c\n", "/*b*/", "(", ")", "while",
];

proptest! {
    /// Any buffer built from lexable atoms tokenizes, and the token
    /// texts concatenate back to the exact source. Adjacent atoms may
    /// fuse into other tokens (`42` + `foo` munches as one number and
    /// one identifier differently), so only the round trip is asserted,
    /// never a token count.
    #[test]
    fn prop_round_trip(atoms in proptest::collection::vec(
        proptest::sample::select(ROUND_TRIP_ATOMS),
        0..40,
    )) {
        let source: String = atoms.concat();
        if let Ok(tokens) = tokenize(&source) {
            let rebuilt: String = tokens.iter().map(|t| t.text(&source)).collect();
            prop_assert_eq!(rebuilt, source);
        }
    }
}
