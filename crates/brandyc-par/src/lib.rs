//! brandyc-par - Recursive-descent parser and AST for Brandy.
//!
//! The parser consumes the token vector produced by `brandyc-lex`,
//! trivia included. Three pieces of state shape the grammar:
//!
//! - a stack of saved indices for speculative alternatives: every rule
//!   pushes the current position, drops it on success, and restores it
//!   on a clean rejection;
//! - a stack of "newlines are skippable here" booleans: pushed `false`
//!   around operator acceptance and the opening token of call/index
//!   argument lists, so a newline ends the expression instead;
//! - an indent counter: scopes nest at two-space indentation steps, and
//!   braced `{ … }` blocks funnel into the same scope rule.
//!
//! Recoverable rejection is `Ok(None)`; an unrecoverable failure (a
//! required token missing after the rule committed) is `Err(ParseError)`
//! and abandons the whole parse.

pub mod ast;
pub mod visit;

mod expr;
mod items;
mod stmt;

#[cfg(test)]
mod edge_cases;

use brandyc_lex::{Token, TokenKind};
use thiserror::Error;

pub use ast::{AstNode, NodeId, NodeIdGen, NodeKind};
pub use visit::{dispatch, walk, walk_children, walk_opt, walk_ref, AstVisitor, Outcome};

use ast::{ModuleNode, ScopeNode};

/// Unrecoverable parse failure, anchored at the offending token.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} (at token {token_index})")]
pub struct ParseError {
    /// Index into the token vector.
    pub token_index: usize,
    /// What went wrong.
    pub message: String,
}

/// Result of a grammar rule: `Ok(Some(node))` on a match, `Ok(None)` on
/// a clean rejection (position restored), `Err` on an unrecoverable
/// failure.
pub type Parsed<T> = Result<Option<T>, ParseError>;

/// A successfully parsed translation unit plus the id allocator, which
/// rewrite passes keep using for replacement nodes.
#[derive(Debug)]
pub struct ParsedModule {
    pub root: Box<AstNode>,
    pub ids: NodeIdGen,
}

/// Expected indentation unit, in characters of leading whitespace.
const INDENT_SIZE: u32 = 2;

/// The Brandy parser.
pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    current: usize,
    saved: Vec<usize>,
    allow_newlines: Vec<bool>,
    indent: u32,
    ids: NodeIdGen,
}

impl<'a> Parser<'a> {
    /// Create a parser over a token vector and its backing source.
    pub fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            current: 0,
            saved: Vec::new(),
            allow_newlines: vec![true],
            indent: 0,
            ids: NodeIdGen::new(),
        }
    }

    /// Parse the whole token stream into a module.
    pub fn parse_module(mut self) -> Result<ParsedModule, ParseError> {
        let first = self.mark();
        let mut module = ModuleNode::default();

        while !self.at_end_of_stream() {
            if let Some(symbol) = self.accept_symbol()? {
                module.members.push(symbol);
            } else if let Some(statement) = self.accept_statement()? {
                module.statements.push(statement);
            } else {
                return Err(self.error_here("no symbol or statement matches here"));
            }
        }

        let root = self.finish_node(first, NodeKind::Module(module));
        Ok(ParsedModule {
            root,
            ids: self.ids,
        })
    }

    // ------------------------------------------------------------------
    // Scope
    // ------------------------------------------------------------------

    /// A statement scope: either a braced `{ … }` block or an indented
    /// block one level deeper. Never rejects; an empty scope is valid.
    pub(crate) fn accept_scope(&mut self) -> Result<Box<AstNode>, ParseError> {
        let first = self.mark();
        let mut scope = ScopeNode::default();

        if self.accept(TokenKind::OpenCurly) {
            self.indent += 1;
            loop {
                match self.accept_statement() {
                    Ok(Some(statement)) => scope.statements.push(statement),
                    Ok(None) => break,
                    Err(e) => {
                        self.indent -= 1;
                        return Err(e);
                    }
                }
            }
            self.indent -= 1;
            self.expect(TokenKind::CloseCurly)?;
        } else {
            self.indent += 1;
            loop {
                match self.accept_statement() {
                    Ok(Some(statement)) => scope.statements.push(statement),
                    Ok(None) => break,
                    Err(e) => {
                        self.indent -= 1;
                        return Err(e);
                    }
                }
            }
            self.indent -= 1;
        }

        Ok(self.finish_node(first, NodeKind::Scope(scope)))
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    /// Index of the next significant token, honoring the top of the
    /// newline-skipping stack: when newlines are significant they stop
    /// the scan and act as statement separators.
    pub(crate) fn next_valid_token(&self) -> usize {
        let allow_newlines = *self.allow_newlines.last().unwrap_or(&true);
        let mut i = self.current;
        while i < self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Shebang => i += 1,
                TokenKind::Newline if allow_newlines => i += 1,
                _ => break,
            }
        }
        i
    }

    /// Index of the most recently consumed significant token.
    pub(crate) fn last_token_index(&self) -> Option<usize> {
        let mut i = self.current;
        while i > 0 {
            i -= 1;
            match self.tokens[i].kind {
                TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Shebang => continue,
                _ => return Some(i),
            }
        }
        None
    }

    /// The token consumed by the most recent successful `accept`.
    pub(crate) fn last_accepted(&self) -> usize {
        self.current - 1
    }

    /// Consume the next significant token if it has the given kind.
    pub(crate) fn accept(&mut self, kind: TokenKind) -> bool {
        let i = self.next_valid_token();
        if i < self.tokens.len() && self.tokens[i].kind == kind {
            self.current = i + 1;
            true
        } else {
            false
        }
    }

    /// Like `accept`, but matching any kind the predicate admits.
    pub(crate) fn accept_matching(&mut self, predicate: impl Fn(TokenKind) -> bool) -> bool {
        let i = self.next_valid_token();
        if i < self.tokens.len() && predicate(self.tokens[i].kind) {
            self.current = i + 1;
            true
        } else {
            false
        }
    }

    /// Require the next significant token to have the given kind.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.accept(kind) {
            Ok(())
        } else {
            Err(self.error_here(format!("expected {:?} here", kind)))
        }
    }

    /// Statement terminator: a semicolon, a newline boundary, a closing
    /// brace, or the end of the stream.
    pub(crate) fn expect_terminator(&mut self) -> Result<(), ParseError> {
        if self.accept(TokenKind::Semicolon) {
            return Ok(());
        }

        let next = self.next_valid_token();
        if next >= self.tokens.len() || self.tokens[next].kind == TokenKind::CloseCurly {
            return Ok(());
        }

        if let Some(last) = self.last_token_index() {
            if self.tokens[next].line() == self.tokens[last].line() {
                return Err(ParseError {
                    token_index: next,
                    message: "expected a semicolon or newline".to_string(),
                });
            }
        }

        Ok(())
    }

    /// True once only trivia remains.
    pub(crate) fn at_end_of_stream(&self) -> bool {
        self.next_valid_token() >= self.tokens.len()
    }

    /// Check that the next statement sits at the current indentation
    /// level, consuming the leading trivia when it does.
    ///
    /// A token on the same line as the previous one always continues
    /// the current statement position; otherwise the whitespace run
    /// opening its line must measure exactly `indent` units.
    pub(crate) fn accept_indent(&mut self) -> bool {
        let j = self.next_valid_token();
        if j >= self.tokens.len() {
            return self.indent == 0;
        }

        let Some(i) = self.last_token_index() else {
            return self.indent == 0;
        };

        let ln_i = self.tokens[i].line();
        let ln_j = self.tokens[j].line();

        if ln_i == ln_j {
            self.current = j;
            return true;
        }

        if j == 0 {
            return self.indent == 0;
        }

        let leading = &self.tokens[j - 1];
        if leading.kind != TokenKind::Whitespace || leading.line() != ln_j {
            self.current = j;
            return self.indent == 0;
        }

        if leading.span.len / INDENT_SIZE == self.indent {
            self.current = j;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Speculation and newline-significance stacks
    // ------------------------------------------------------------------

    /// Run a rule speculatively: on `Ok(None)` the position is restored
    /// as if nothing was consumed.
    pub(crate) fn speculate<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Parsed<T>,
    ) -> Parsed<T> {
        self.saved.push(self.current);
        match rule(self) {
            Ok(Some(value)) => {
                self.saved.pop();
                Ok(Some(value))
            }
            Ok(None) => {
                self.current = self.saved.pop().expect("speculation stack underflow");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Run with newline skipping forced on or off.
    pub(crate) fn with_newlines<T>(
        &mut self,
        allow: bool,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.allow_newlines.push(allow);
        let result = f(self);
        self.allow_newlines.pop();
        result
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    /// Position of the next significant token, clamped into the token
    /// vector; rules record this before consuming anything.
    pub(crate) fn mark(&self) -> usize {
        self.next_valid_token()
            .min(self.tokens.len().saturating_sub(1))
    }

    /// Build a node spanning from `first` through the last consumed
    /// token.
    pub(crate) fn finish_node(&mut self, first: usize, kind: NodeKind) -> Box<AstNode> {
        let last = self.last_token_index().unwrap_or(first).max(first);
        Box::new(AstNode::new(self.ids.fresh(), first, last, kind))
    }

    /// Intern the text of the token at `index`.
    pub(crate) fn token_name(&self, index: usize) -> brandyc_util::Name {
        brandyc_util::Name::intern(self.tokens[index].text(self.source))
    }

    /// Kind of the token at `index`.
    pub(crate) fn token_kind_at(&self, index: usize) -> TokenKind {
        self.tokens[index].kind
    }

    /// An error anchored at the next significant token.
    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            token_index: self.next_valid_token().min(self.tokens.len()),
            message: message.into(),
        }
    }
}
