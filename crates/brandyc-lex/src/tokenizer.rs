//! Tokenizer driver.
//!
//! Walks the input buffer end to end with the shared DFA, annotating
//! each token with the 1-based line it starts on. Whitespace, newlines,
//! and comments are kept in the output vector; the parser skips them,
//! and downstream consumers rely on the round-trip property (the
//! concatenation of all token texts equals the source buffer).

use brandyc_util::Span;
use thiserror::Error;

use crate::grammar::brandy_lexer;
use crate::token::{Token, TokenKind};

/// Unrecoverable tokenization failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unrecognized byte sequence at offset {offset} (line {line})")]
pub struct LexError {
    /// Byte offset of the first byte that could not be lexed.
    pub offset: usize,
    /// Line the failure occurred on (1-based).
    pub line: u32,
}

/// Tokenize a whole source buffer.
///
/// On success the returned vector covers every byte of the input,
/// trivia included. A byte sequence no token can start aborts with a
/// [`LexError`] anchored at the offending offset.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let lexer = brandy_lexer();
    let bytes = source.as_bytes();

    let mut tokens = Vec::new();
    let mut offset = 0usize;
    let mut line = 1u32;

    while offset < bytes.len() {
        let (kind, len) = lexer.read_token(bytes, offset);

        if kind == TokenKind::Invalid {
            return Err(LexError { offset, line });
        }

        tokens.push(Token::new(kind, Span::new(offset, len as u32, line)));

        match kind {
            TokenKind::Newline => line += 1,
            // Comments, doc blocks, and shebang lines may carry any
            // number of newlines; count what the token actually covers.
            TokenKind::LineComment
            | TokenKind::BlockComment
            | TokenKind::DocBlock
            | TokenKind::Shebang => {
                let text = &bytes[offset..offset + len];
                line += text.iter().filter(|&&b| b == b'\n').count() as u32;
            }
            _ => {}
        }

        offset += len;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn test_simple_statement() {
        assert_eq!(
            kinds("var x = 1\n"),
            vec![
                TokenKind::Var,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Assign,
                TokenKind::Whitespace,
                TokenKind::I32Literal,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_round_trip() {
        let source = "func f(a: i32) ->\n  return a + 1\n// done\n";
        let tokens = tokenize(source).unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text(source)).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_line_numbers() {
        let source = "a\nb\n/* x\ny */\nc\n";
        let tokens = tokenize(source).unwrap();
        let lines: Vec<(String, u32)> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| (t.text(source).to_string(), t.line()))
            .collect();
        assert_eq!(
            lines,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                // The block comment spans lines 3-4.
                ("c".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_line_comment_advances_line() {
        let source = "a // trailing\nb\n";
        let tokens = tokenize(source).unwrap();
        let b = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Identifier && t.text(source) == "b")
            .unwrap();
        assert_eq!(b.line(), 2);
    }

    #[test]
    fn test_lex_error_position() {
        let err = tokenize("ok\n\x01\n").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_trivia_retained() {
        let tokens = tokenize("1 + 2 // sum\n").unwrap();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Whitespace));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::LineComment));
    }

    #[test]
    fn test_tokens_cover_every_byte() {
        let source = "if x { y() }\n";
        let tokens = tokenize(source).unwrap();
        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.span.start, offset);
            offset = token.span.end();
        }
        assert_eq!(offset, source.len());
    }
}
