//! Construction of the Brandy transition table.
//!
//! The table is declarative at heart: keywords are walked in letter by
//! letter with an identifier fall-through at every intermediate state
//! (so `foreach` lexes as one identifier, never `for` + `each`), and
//! operators are installed byte by byte with duplicate installation
//! caught by [`Lexer::add_edge`].
//!
//! Built once per process behind a lazy initializer; afterwards the
//! table is immutable and shared read-only by every tokenizer driver.

use std::sync::LazyLock;

use crate::dfa::{Lexer, StateId};
use crate::token::TokenKind;

static BRANDY_LEXER: LazyLock<Lexer> = LazyLock::new(build_lexer);

/// The process-wide Brandy lexer table.
pub fn brandy_lexer() -> &'static Lexer {
    &BRANDY_LEXER
}

/// Attach the identifier fall-through edges to a keyword state.
///
/// Any letter, digit, `_`, or `$` continuing past a keyword prefix turns
/// the walk into a plain identifier.
fn identifier_fallthrough(lexer: &mut Lexer, state: StateId, identifier: StateId) {
    lexer.add_letter_edge(state, identifier);
    lexer.add_digit_edge(state, identifier);
    lexer.add_edge(state, identifier, b'_');
    lexer.add_edge(state, identifier, b'$');
}

/// Install a keyword, sharing prefix states with previously installed
/// keywords and attaching identifier fall-throughs along the way.
fn add_keyword(lexer: &mut Lexer, identifier: StateId, kind: TokenKind, spelling: &str) {
    let bytes = spelling.as_bytes();
    let mut from = lexer.root();

    for &byte in &bytes[..bytes.len() - 1] {
        from = match lexer.get_edge(from, byte) {
            Some(existing) if existing != identifier => existing,
            _ => {
                let intermediate = lexer.create_state(TokenKind::Identifier);
                identifier_fallthrough(lexer, intermediate, identifier);
                lexer.add_edge(from, intermediate, byte);
                intermediate
            }
        };
    }

    let finish = lexer.create_state(kind);
    identifier_fallthrough(lexer, finish, identifier);
    lexer.add_edge(from, finish, bytes[bytes.len() - 1]);
}

/// Install a one-byte operator and its `=` compound form, returning the
/// bare operator state for further chaining.
fn add_operator_with_assign(
    lexer: &mut Lexer,
    byte: u8,
    kind: TokenKind,
    assign_kind: TokenKind,
) -> StateId {
    let root = lexer.root();
    let op = lexer.create_state(kind);
    let assign = lexer.create_state(assign_kind);
    lexer.add_edge(root, op, byte);
    lexer.add_edge(op, assign, b'=');
    op
}

fn build_lexer() -> Lexer {
    let mut lexer = Lexer::new();
    let root = lexer.root();
    let identifier = lexer.create_state(TokenKind::Identifier);

    // Whitespace and newlines. Both are emitted and retained; the parser
    // skips them, and the whitespace run before a statement is what the
    // indent check measures.
    {
        let whitespace = lexer.create_state(TokenKind::Whitespace);
        lexer.add_edge(root, whitespace, b' ');
        lexer.add_edge(root, whitespace, b'\t');
        lexer.add_edge(whitespace, whitespace, b' ');
        lexer.add_edge(whitespace, whitespace, b'\t');

        let newline = lexer.create_state(TokenKind::Newline);
        lexer.add_edge(root, newline, b'\n');
    }

    // Identifiers, `@name` operator-method identifiers, and the `@[`
    // attribute opener.
    {
        let at = lexer.create_intermediate();
        let attribute = lexer.create_state(TokenKind::AttributeStart);
        lexer.add_edge(root, at, b'@');
        lexer.add_edge(at, attribute, b'[');
        lexer.add_default_edge(at, identifier);

        lexer.add_edge(root, identifier, b'_');
        lexer.add_edge(root, identifier, b'$');
        lexer.add_letter_edge(root, identifier);

        lexer.add_edge(identifier, identifier, b'_');
        lexer.add_edge(identifier, identifier, b'$');
        lexer.add_letter_edge(identifier, identifier);
        lexer.add_digit_edge(identifier, identifier);
    }

    // Numeric literals: optional width suffix `b`/`s`/`l` (after `u` for
    // unsigned), `f` float suffix, decimal point, exponent.
    {
        let lit_i8 = lexer.create_state(TokenKind::I8Literal);
        let lit_i16 = lexer.create_state(TokenKind::I16Literal);
        let lit_i32 = lexer.create_state(TokenKind::I32Literal);
        let lit_i64 = lexer.create_state(TokenKind::I64Literal);

        let lit_u8 = lexer.create_state(TokenKind::U8Literal);
        let lit_u16 = lexer.create_state(TokenKind::U16Literal);
        let lit_u32 = lexer.create_state(TokenKind::U32Literal);
        let lit_u64 = lexer.create_state(TokenKind::U64Literal);

        let dot = lexer.create_intermediate();
        let lit_f32 = lexer.create_state(TokenKind::F32Literal);
        let lit_f64 = lexer.create_state(TokenKind::F64Literal);
        let exp = lexer.create_intermediate();
        let exp_plus = lexer.create_intermediate();
        let exp_minus = lexer.create_intermediate();
        let exp_val = lexer.create_state(TokenKind::F64Literal);

        lexer.add_digit_edge(root, lit_i32);
        lexer.add_digit_edge(lit_i32, lit_i32);
        lexer.add_edge(lit_i32, lit_i8, b'b');
        lexer.add_edge(lit_i32, lit_i8, b'B');
        lexer.add_edge(lit_i32, lit_i16, b's');
        lexer.add_edge(lit_i32, lit_i16, b'S');
        lexer.add_edge(lit_i32, lit_i64, b'l');
        lexer.add_edge(lit_i32, lit_i64, b'L');
        lexer.add_edge(lit_i32, lit_f32, b'f');
        lexer.add_edge(lit_i32, lit_f32, b'F');

        lexer.add_edge(lit_i32, lit_u32, b'u');
        lexer.add_edge(lit_i32, lit_u32, b'U');

        lexer.add_edge(lit_u32, lit_u8, b'b');
        lexer.add_edge(lit_u32, lit_u8, b'B');
        lexer.add_edge(lit_u32, lit_u16, b's');
        lexer.add_edge(lit_u32, lit_u16, b'S');
        lexer.add_edge(lit_u32, lit_u64, b'l');
        lexer.add_edge(lit_u32, lit_u64, b'L');

        lexer.add_edge(lit_i32, dot, b'.');

        lexer.add_digit_edge(dot, lit_f64);
        lexer.add_digit_edge(lit_f64, lit_f64);
        lexer.add_edge(lit_f64, lit_f32, b'f');
        lexer.add_edge(lit_f64, lit_f32, b'F');

        lexer.add_edge(lit_f64, exp, b'e');
        lexer.add_edge(lit_f64, exp, b'E');

        lexer.add_edge(exp, exp_plus, b'+');
        lexer.add_edge(exp, exp_minus, b'-');
        lexer.add_digit_edge(exp, exp_val);
        lexer.add_digit_edge(exp_plus, exp_val);
        lexer.add_digit_edge(exp_minus, exp_val);
        lexer.add_digit_edge(exp_val, exp_val);
        lexer.add_edge(exp_val, lit_f32, b'f');
        lexer.add_edge(exp_val, lit_f32, b'F');
    }

    // String literals with `\`-escapes via a dedicated escape state.
    {
        let body = lexer.create_intermediate();
        let escape = lexer.create_intermediate();
        let escaped = lexer.create_intermediate();
        let end = lexer.create_state(TokenKind::StringLiteral);

        lexer.add_edge(root, body, b'"');

        lexer.add_default_edge(body, body);
        lexer.add_edge(body, escape, b'\\');

        lexer.add_edge(escape, escaped, b'n');
        lexer.add_edge(escape, escaped, b'r');
        lexer.add_edge(escape, escaped, b't');
        lexer.add_edge(escape, escaped, b'b');
        lexer.add_edge(escape, escaped, b'"');
        lexer.add_edge(escape, escaped, b'\'');
        lexer.add_edge(escape, escaped, b'\\');

        lexer.add_default_edge(escaped, body);

        lexer.add_edge(escaped, end, b'"');
        lexer.add_edge(body, end, b'"');
    }

    // Char literals share the escape set; a raw newline inside is a
    // dead end.
    {
        let open = lexer.create_intermediate();
        let mid = lexer.create_intermediate();
        let escape = lexer.create_intermediate();
        let escaped = lexer.create_intermediate();
        let end = lexer.create_state(TokenKind::CharLiteral);
        let dead = lexer.create_intermediate();

        lexer.add_edge(root, open, b'\'');

        lexer.add_default_edge(open, mid);
        lexer.add_edge(open, escape, b'\\');
        lexer.add_edge(open, dead, b'\n');

        lexer.add_edge(escape, escaped, b'n');
        lexer.add_edge(escape, escaped, b'r');
        lexer.add_edge(escape, escaped, b't');
        lexer.add_edge(escape, escaped, b'b');
        lexer.add_edge(escape, escaped, b'\'');
        lexer.add_edge(escape, escaped, b'\\');

        lexer.add_edge(escaped, end, b'\'');
        lexer.add_edge(mid, end, b'\'');
    }

    // `/`, `/=`, line comments, block comments. Block comments are not
    // nested: the first `*/` closes the token.
    {
        let div = lexer.create_state(TokenKind::Divide);
        let div_assign = lexer.create_state(TokenKind::AssignDivide);
        let block_inner = lexer.create_intermediate();
        let block_star = lexer.create_intermediate();
        let block_end = lexer.create_state(TokenKind::BlockComment);
        let line_body = lexer.create_intermediate();
        let line_end = lexer.create_state(TokenKind::LineComment);

        lexer.add_edge(root, div, b'/');
        lexer.add_edge(div, div_assign, b'=');

        lexer.add_edge(div, block_inner, b'*');
        lexer.add_default_edge(block_inner, block_inner);
        lexer.add_edge(block_inner, block_star, b'*');
        lexer.add_edge(block_star, block_star, b'*');
        lexer.add_default_edge(block_star, block_inner);
        lexer.add_edge(block_star, block_end, b'/');

        lexer.add_edge(div, line_body, b'/');
        lexer.add_default_edge(line_body, line_body);
        lexer.add_edge(line_body, line_end, b'\n');
        lexer.add_edge(line_body, line_end, b'\r');
    }

    // Shebang lines: `#!` through the closing newline.
    {
        let hash = lexer.create_intermediate();
        let body = lexer.create_intermediate();
        let end = lexer.create_state(TokenKind::Shebang);

        lexer.add_edge(root, hash, b'#');
        lexer.add_edge(hash, body, b'!');
        lexer.add_default_edge(body, body);
        lexer.add_edge(body, end, b'\n');
        lexer.add_edge(body, end, b'\r');
    }

    // Documentation blocks: backtick-delimited, newlines allowed.
    {
        let open = lexer.create_intermediate();
        let body = lexer.create_intermediate();
        let end = lexer.create_state(TokenKind::DocBlock);

        lexer.add_edge(root, open, b'`');
        lexer.add_edge(open, end, b'`');
        lexer.add_default_edge(open, body);
        lexer.add_default_edge(body, body);
        lexer.add_edge(body, end, b'`');
    }

    // `+ ++ +=`
    {
        let plus = add_operator_with_assign(&mut lexer, b'+', TokenKind::Add, TokenKind::AssignAdd);
        let increment = lexer.create_state(TokenKind::Increment);
        lexer.add_edge(plus, increment, b'+');
    }

    // `- -- -= -> -->`
    {
        let minus = add_operator_with_assign(
            &mut lexer,
            b'-',
            TokenKind::Subtract,
            TokenKind::AssignSubtract,
        );
        let decrement = lexer.create_state(TokenKind::Decrement);
        let arrow = lexer.create_state(TokenKind::ArrowRight);
        let long_arrow = lexer.create_state(TokenKind::LongArrowRight);
        lexer.add_edge(minus, decrement, b'-');
        lexer.add_edge(minus, arrow, b'>');
        lexer.add_edge(decrement, long_arrow, b'>');
    }

    // `* *= ** **=`
    {
        let star = add_operator_with_assign(
            &mut lexer,
            b'*',
            TokenKind::Multiply,
            TokenKind::AssignMultiply,
        );
        let exponent = lexer.create_state(TokenKind::Exponent);
        let exponent_assign = lexer.create_state(TokenKind::AssignExponent);
        lexer.add_edge(star, exponent, b'*');
        lexer.add_edge(exponent, exponent_assign, b'=');
    }

    add_operator_with_assign(&mut lexer, b'%', TokenKind::Modulo, TokenKind::AssignModulo);
    add_operator_with_assign(
        &mut lexer,
        b'^',
        TokenKind::BitwiseXor,
        TokenKind::AssignBitwiseXor,
    );

    // `= == ==> => `
    {
        let assign = lexer.create_state(TokenKind::Assign);
        let equality = lexer.create_state(TokenKind::Equality);
        let fat_arrow = lexer.create_state(TokenKind::FatArrowRight);
        let long_fat_arrow = lexer.create_state(TokenKind::LongFatArrowRight);

        lexer.add_edge(root, assign, b'=');
        lexer.add_edge(assign, equality, b'=');
        lexer.add_edge(assign, fat_arrow, b'>');
        lexer.add_edge(equality, long_fat_arrow, b'>');
    }

    // `! !=`
    {
        let not = lexer.create_state(TokenKind::LogicalNot);
        let inequality = lexer.create_state(TokenKind::Inequality);
        lexer.add_edge(root, not, b'!');
        lexer.add_edge(not, inequality, b'=');
    }

    // `< <= <== <=> << <<= <<< <<<= <| <|| <||| <- <-- <->`
    {
        let less = lexer.create_state(TokenKind::LessThan);
        let less_equal = lexer.create_state(TokenKind::LessThanOrEqual);
        let long_fat_left = lexer.create_state(TokenKind::LongFatArrowLeft);
        let bidi_fat = lexer.create_state(TokenKind::BidirectionalFatArrow);
        let shl = lexer.create_state(TokenKind::BitshiftLeft);
        let shl_assign = lexer.create_state(TokenKind::AssignBitshiftLeft);
        let lshl = lexer.create_state(TokenKind::LogicalShiftLeft);
        let lshl_assign = lexer.create_state(TokenKind::AssignLogicalShiftLeft);
        let pipe_left = lexer.create_state(TokenKind::PipeLeft);
        let pipe_double_left = lexer.create_state(TokenKind::PipeDoubleLeft);
        let pipe_triple_left = lexer.create_state(TokenKind::PipeTripleLeft);
        let arrow_left = lexer.create_state(TokenKind::ArrowLeft);
        let long_arrow_left = lexer.create_state(TokenKind::LongArrowLeft);
        let bidi_arrow = lexer.create_state(TokenKind::BidirectionalArrow);

        lexer.add_edge(root, less, b'<');
        lexer.add_edge(less, less_equal, b'=');
        lexer.add_edge(less_equal, long_fat_left, b'=');
        lexer.add_edge(less_equal, bidi_fat, b'>');
        lexer.add_edge(less, shl, b'<');
        lexer.add_edge(shl, shl_assign, b'=');
        lexer.add_edge(shl, lshl, b'<');
        lexer.add_edge(lshl, lshl_assign, b'=');
        lexer.add_edge(less, pipe_left, b'|');
        lexer.add_edge(pipe_left, pipe_double_left, b'|');
        lexer.add_edge(pipe_double_left, pipe_triple_left, b'|');
        lexer.add_edge(less, arrow_left, b'-');
        lexer.add_edge(arrow_left, long_arrow_left, b'-');
        lexer.add_edge(arrow_left, bidi_arrow, b'>');
    }

    // `> >= >> >>= >>> >>>=`
    {
        let greater = lexer.create_state(TokenKind::GreaterThan);
        let greater_equal = lexer.create_state(TokenKind::GreaterThanOrEqual);
        let shr = lexer.create_state(TokenKind::BitshiftRight);
        let shr_assign = lexer.create_state(TokenKind::AssignBitshiftRight);
        let lshr = lexer.create_state(TokenKind::LogicalShiftRight);
        let lshr_assign = lexer.create_state(TokenKind::AssignLogicalShiftRight);

        lexer.add_edge(root, greater, b'>');
        lexer.add_edge(greater, greater_equal, b'=');
        lexer.add_edge(greater, shr, b'>');
        lexer.add_edge(shr, shr_assign, b'=');
        lexer.add_edge(shr, lshr, b'>');
        lexer.add_edge(lshr, lshr_assign, b'=');
    }

    // `& &= && &&=`
    {
        let bit_and = lexer.create_state(TokenKind::BitwiseAnd);
        let logical_and = lexer.create_state(TokenKind::LogicalAnd);
        let bit_and_assign = lexer.create_state(TokenKind::AssignBitwiseAnd);
        let logical_and_assign = lexer.create_state(TokenKind::AssignLogicalAnd);

        lexer.add_edge(root, bit_and, b'&');
        lexer.add_edge(bit_and, logical_and, b'&');
        lexer.add_edge(bit_and, bit_and_assign, b'=');
        lexer.add_edge(logical_and, logical_and_assign, b'=');
    }

    // `| |= |> || ||= ||> |||>`
    {
        let bit_or = lexer.create_state(TokenKind::BitwiseOr);
        let logical_or = lexer.create_state(TokenKind::LogicalOr);
        let bit_or_assign = lexer.create_state(TokenKind::AssignBitwiseOr);
        let logical_or_assign = lexer.create_state(TokenKind::AssignLogicalOr);
        let pipe_right = lexer.create_state(TokenKind::PipeRight);
        let pipe_double_right = lexer.create_state(TokenKind::PipeDoubleRight);
        let triple_bar = lexer.create_intermediate();
        let pipe_triple_right = lexer.create_state(TokenKind::PipeTripleRight);

        lexer.add_edge(root, bit_or, b'|');
        lexer.add_edge(bit_or, logical_or, b'|');
        lexer.add_edge(bit_or, bit_or_assign, b'=');
        lexer.add_edge(bit_or, pipe_right, b'>');
        lexer.add_edge(logical_or, logical_or_assign, b'=');
        lexer.add_edge(logical_or, pipe_double_right, b'>');
        lexer.add_edge(logical_or, triple_bar, b'|');
        lexer.add_edge(triple_bar, pipe_triple_right, b'>');
    }

    // `~` and the approximate comparison family `~== ~!= ~< ~> ~<= ~>=`
    {
        let tilde = lexer.create_state(TokenKind::BitwiseNot);
        let tilde_eq = lexer.create_intermediate();
        let approx_eq = lexer.create_state(TokenKind::ApproxEquality);
        let tilde_bang = lexer.create_intermediate();
        let approx_ne = lexer.create_state(TokenKind::ApproxInequality);
        let approx_less = lexer.create_state(TokenKind::ApproxLessThan);
        let approx_less_eq = lexer.create_state(TokenKind::ApproxLessThanOrEqual);
        let approx_greater = lexer.create_state(TokenKind::ApproxGreaterThan);
        let approx_greater_eq = lexer.create_state(TokenKind::ApproxGreaterThanOrEqual);

        lexer.add_edge(root, tilde, b'~');
        lexer.add_edge(tilde, tilde_eq, b'=');
        lexer.add_edge(tilde_eq, approx_eq, b'=');
        lexer.add_edge(tilde, tilde_bang, b'!');
        lexer.add_edge(tilde_bang, approx_ne, b'=');
        lexer.add_edge(tilde, approx_less, b'<');
        lexer.add_edge(approx_less, approx_less_eq, b'=');
        lexer.add_edge(tilde, approx_greater, b'>');
        lexer.add_edge(approx_greater, approx_greater_eq, b'=');
    }

    // `. .. ...`
    {
        let dot = lexer.create_state(TokenKind::Dot);
        let double_dot = lexer.create_state(TokenKind::DoubleDot);
        let triple_dot = lexer.create_state(TokenKind::TripleDot);
        lexer.add_edge(root, dot, b'.');
        lexer.add_edge(dot, double_dot, b'.');
        lexer.add_edge(double_dot, triple_dot, b'.');
    }

    // `??`
    {
        let question = lexer.create_intermediate();
        let coalesce = lexer.create_state(TokenKind::NullCoalesce);
        lexer.add_edge(root, question, b'?');
        lexer.add_edge(question, coalesce, b'?');
    }

    // `: :=` and the remaining punctuation.
    {
        let colon = lexer.create_state(TokenKind::Colon);
        let create = lexer.create_state(TokenKind::AssignCreate);
        lexer.add_edge(root, colon, b':');
        lexer.add_edge(colon, create, b'=');
    }

    let semicolon = lexer.create_state(TokenKind::Semicolon);
    lexer.add_edge(root, semicolon, b';');
    let comma = lexer.create_state(TokenKind::Comma);
    lexer.add_edge(root, comma, b',');
    let open_paren = lexer.create_state(TokenKind::OpenParen);
    lexer.add_edge(root, open_paren, b'(');
    let close_paren = lexer.create_state(TokenKind::CloseParen);
    lexer.add_edge(root, close_paren, b')');
    let open_bracket = lexer.create_state(TokenKind::OpenBracket);
    lexer.add_edge(root, open_bracket, b'[');
    let close_bracket = lexer.create_state(TokenKind::CloseBracket);
    lexer.add_edge(root, close_bracket, b']');
    let open_curly = lexer.create_state(TokenKind::OpenCurly);
    lexer.add_edge(root, open_curly, b'{');
    let close_curly = lexer.create_state(TokenKind::CloseCurly);
    lexer.add_edge(root, close_curly, b'}');

    // Keywords. The `func`/`function` spelling pair installs the same
    // kind twice; the word forms `and`/`or`/`not` are synonyms of the
    // symbolic operators. `value` is deliberately not reserved: it is
    // the name of the implicit setter parameter and must stay
    // referencable as an ordinary identifier.
    add_keyword(&mut lexer, identifier, TokenKind::Meta, "meta");
    add_keyword(&mut lexer, identifier, TokenKind::Import, "import");
    add_keyword(&mut lexer, identifier, TokenKind::Function, "func");
    add_keyword(&mut lexer, identifier, TokenKind::Function, "function");
    add_keyword(&mut lexer, identifier, TokenKind::Method, "method");
    add_keyword(&mut lexer, identifier, TokenKind::Lambda, "lambda");
    add_keyword(&mut lexer, identifier, TokenKind::Class, "class");
    add_keyword(&mut lexer, identifier, TokenKind::Extends, "extends");
    add_keyword(&mut lexer, identifier, TokenKind::If, "if");
    add_keyword(&mut lexer, identifier, TokenKind::Elif, "elif");
    add_keyword(&mut lexer, identifier, TokenKind::Else, "else");
    add_keyword(&mut lexer, identifier, TokenKind::Unless, "unless");
    add_keyword(&mut lexer, identifier, TokenKind::For, "for");
    add_keyword(&mut lexer, identifier, TokenKind::In, "in");
    add_keyword(&mut lexer, identifier, TokenKind::From, "from");
    add_keyword(&mut lexer, identifier, TokenKind::To, "to");
    add_keyword(&mut lexer, identifier, TokenKind::Every, "every");
    add_keyword(&mut lexer, identifier, TokenKind::While, "while");
    add_keyword(&mut lexer, identifier, TokenKind::Do, "do");
    add_keyword(&mut lexer, identifier, TokenKind::Until, "until");
    add_keyword(&mut lexer, identifier, TokenKind::Export, "export");
    add_keyword(&mut lexer, identifier, TokenKind::Enum, "enum");
    add_keyword(&mut lexer, identifier, TokenKind::Property, "property");
    add_keyword(&mut lexer, identifier, TokenKind::Get, "get");
    add_keyword(&mut lexer, identifier, TokenKind::Set, "set");
    add_keyword(&mut lexer, identifier, TokenKind::Var, "var");
    add_keyword(&mut lexer, identifier, TokenKind::Return, "return");
    add_keyword(&mut lexer, identifier, TokenKind::Yield, "yield");
    add_keyword(&mut lexer, identifier, TokenKind::Break, "break");
    add_keyword(&mut lexer, identifier, TokenKind::Continue, "continue");
    add_keyword(&mut lexer, identifier, TokenKind::As, "as");
    add_keyword(&mut lexer, identifier, TokenKind::True, "true");
    add_keyword(&mut lexer, identifier, TokenKind::Goto, "goto");
    add_keyword(&mut lexer, identifier, TokenKind::Label, "label");
    add_keyword(&mut lexer, identifier, TokenKind::LogicalAnd, "and");
    add_keyword(&mut lexer, identifier, TokenKind::LogicalOr, "or");
    add_keyword(&mut lexer, identifier, TokenKind::LogicalNot, "not");
    add_keyword(&mut lexer, identifier, TokenKind::False, "false");
    add_keyword(&mut lexer, identifier, TokenKind::Nil, "nil");
    add_keyword(&mut lexer, identifier, TokenKind::Typedef, "typedef");
    add_keyword(&mut lexer, identifier, TokenKind::Decltype, "decltype");
    add_keyword(&mut lexer, identifier, TokenKind::Typename, "typename");
    add_keyword(&mut lexer, identifier, TokenKind::Const, "const");
    add_keyword(&mut lexer, identifier, TokenKind::Static, "static");
    add_keyword(&mut lexer, identifier, TokenKind::Virtual, "virtual");

    lexer
}
