//! The lexer automaton.
//!
//! The lexer is a deterministic finite automaton over bytes. Each state
//! carries an accept kind (possibly [`TokenKind::Invalid`]), an explicit
//! byte-keyed edge map, and three wildcard fallbacks tried in order
//! after the explicit edges: *letter* (`[A-Za-z]`), *digit* (`[0-9]`),
//! and *default* (anything).
//!
//! Reading a token is maximal munch with retreat: consume as long as
//! any edge matches, remembering the last accepting prefix, and fall
//! back to it when the walk dead-ends on a non-accepting state.
//!
//! The graph is built once at startup by [`crate::grammar`] and is
//! immutable afterwards; any number of tokenizer drivers may share it
//! read-only.

use brandyc_util::{define_idx, IndexVec};
use rustc_hash::FxHashMap;

use crate::token::TokenKind;

define_idx!(
    /// Reference to a DFA state.
    StateId
);

/// There are around 320 states once the full grammar is installed.
const APPROX_STATE_COUNT: usize = 384;

/// A single automaton state.
struct State {
    /// Token kind accepted when a walk ends here.
    accept: TokenKind,
    /// Explicit byte transitions; consulted first.
    edges: FxHashMap<u8, StateId>,
    /// Fallback for `[A-Za-z]` bytes.
    letter_edge: Option<StateId>,
    /// Fallback for `[0-9]` bytes.
    digit_edge: Option<StateId>,
    /// Fallback for any byte not otherwise consumed.
    default_edge: Option<StateId>,
}

impl State {
    fn new(accept: TokenKind) -> Self {
        Self {
            accept,
            edges: FxHashMap::default(),
            letter_edge: None,
            digit_edge: None,
            default_edge: None,
        }
    }
}

/// The DFA lexer.
///
/// Construction-time methods (`create_state`, `add_edge`, …) are used by
/// the grammar installer; after that only [`Lexer::read_token`] is
/// called.
pub struct Lexer {
    states: IndexVec<StateId, State>,
}

impl Lexer {
    /// Create a lexer holding only the non-accepting root state.
    pub fn new() -> Self {
        let mut states = IndexVec::with_capacity(APPROX_STATE_COUNT);
        states.push(State::new(TokenKind::Invalid));
        Self { states }
    }

    /// The root state.
    pub fn root(&self) -> StateId {
        StateId(0)
    }

    /// Create a state accepting `accept`.
    pub fn create_state(&mut self, accept: TokenKind) -> StateId {
        self.states.push(State::new(accept))
    }

    /// Create an intermediate state that accepts nothing.
    pub fn create_intermediate(&mut self) -> StateId {
        self.create_state(TokenKind::Invalid)
    }

    /// Install an explicit byte edge.
    ///
    /// # Panics
    ///
    /// Panics if `from` already has an edge on `byte`. Duplicate
    /// installations are grammar bugs and must surface at construction
    /// time, not as silently shadowed operators.
    pub fn add_edge(&mut self, from: StateId, to: StateId, byte: u8) {
        let previous = self.states[from].edges.insert(byte, to);
        if previous.is_some() {
            panic!(
                "duplicate lexer edge on {:?} from state {}",
                byte as char, from.0
            );
        }
    }

    /// Install the letter wildcard edge.
    pub fn add_letter_edge(&mut self, from: StateId, to: StateId) {
        self.states[from].letter_edge = Some(to);
    }

    /// Install the digit wildcard edge.
    pub fn add_digit_edge(&mut self, from: StateId, to: StateId) {
        self.states[from].digit_edge = Some(to);
    }

    /// Install the default wildcard edge.
    pub fn add_default_edge(&mut self, from: StateId, to: StateId) {
        self.states[from].default_edge = Some(to);
    }

    /// The explicit edge on `byte`, if any. Used by keyword installation
    /// to share prefix states.
    pub fn get_edge(&self, from: StateId, byte: u8) -> Option<StateId> {
        self.states[from].edges.get(&byte).copied()
    }

    /// Read one token starting at `offset`.
    ///
    /// Returns the accepted kind and its byte length. The length is zero
    /// only when the byte at `offset` cannot start any token, in which
    /// case the kind is [`TokenKind::Invalid`].
    pub fn read_token(&self, input: &[u8], offset: usize) -> (TokenKind, usize) {
        let mut current = self.root();
        let mut last_good: Option<(TokenKind, usize)> = None;

        let mut pos = offset;
        let (kind, len) = loop {
            let accept = self.states[current].accept;
            if accept != TokenKind::Invalid {
                last_good = Some((accept, pos - offset));
            }

            let next = input
                .get(pos)
                .and_then(|&byte| self.next_from(current, byte));

            match next {
                Some(next) => {
                    current = next;
                    pos += 1;
                }
                None => break (accept, pos - offset),
            }
        };

        // Maximal munch dead-ended on a non-accepting state; back off to
        // the longest accepting prefix.
        if kind == TokenKind::Invalid {
            if let Some(good) = last_good {
                return good;
            }
        }

        (kind, len)
    }

    fn next_from(&self, state: StateId, byte: u8) -> Option<StateId> {
        let state = &self.states[state];

        if let Some(&next) = state.edges.get(&byte) {
            Some(next)
        } else if state.letter_edge.is_some() && byte.is_ascii_alphabetic() {
            state.letter_edge
        } else if state.digit_edge.is_some() && byte.is_ascii_digit() {
            state.digit_edge
        } else {
            state.default_edge
        }
    }

    /// Number of states, exposed for the construction-time sanity tests.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A toy grammar: identifiers of `a`s, the `+` and `+=` operators.
    fn toy_lexer() -> Lexer {
        let mut lexer = Lexer::new();
        let root = lexer.root();

        let ident = lexer.create_state(TokenKind::Identifier);
        lexer.add_edge(root, ident, b'a');
        lexer.add_edge(ident, ident, b'a');

        let plus = lexer.create_state(TokenKind::Add);
        let plus_eq = lexer.create_state(TokenKind::AssignAdd);
        lexer.add_edge(root, plus, b'+');
        lexer.add_edge(plus, plus_eq, b'=');

        lexer
    }

    #[test]
    fn test_reads_longest_match() {
        let lexer = toy_lexer();
        assert_eq!(lexer.read_token(b"aaa+", 0), (TokenKind::Identifier, 3));
        assert_eq!(lexer.read_token(b"+=", 0), (TokenKind::AssignAdd, 2));
        assert_eq!(lexer.read_token(b"+a", 0), (TokenKind::Add, 1));
    }

    #[test]
    fn test_reads_at_offset() {
        let lexer = toy_lexer();
        assert_eq!(lexer.read_token(b"aa+=", 2), (TokenKind::AssignAdd, 2));
    }

    #[test]
    fn test_invalid_first_byte_has_zero_length() {
        let lexer = toy_lexer();
        assert_eq!(lexer.read_token(b"?", 0), (TokenKind::Invalid, 0));
    }

    #[test]
    fn test_end_of_input() {
        let lexer = toy_lexer();
        assert_eq!(lexer.read_token(b"", 0), (TokenKind::Invalid, 0));
        assert_eq!(lexer.read_token(b"a", 0), (TokenKind::Identifier, 1));
    }

    #[test]
    fn test_retreat_to_last_accept() {
        let mut lexer = Lexer::new();
        let root = lexer.root();

        // `ab` accepts, `abc` is a dead-end prefix of `abcd`.
        let a = lexer.create_intermediate();
        let ab = lexer.create_state(TokenKind::Identifier);
        let abc = lexer.create_intermediate();
        let abcd = lexer.create_state(TokenKind::StringLiteral);
        lexer.add_edge(root, a, b'a');
        lexer.add_edge(a, ab, b'b');
        lexer.add_edge(ab, abc, b'c');
        lexer.add_edge(abc, abcd, b'd');

        // Dead-ends after `abc`; retreats to `ab`.
        assert_eq!(lexer.read_token(b"abcx", 0), (TokenKind::Identifier, 2));
        // Full munch when the long spelling completes.
        assert_eq!(lexer.read_token(b"abcd", 0), (TokenKind::StringLiteral, 4));
    }

    #[test]
    #[should_panic(expected = "duplicate lexer edge")]
    fn test_duplicate_edge_panics() {
        let mut lexer = Lexer::new();
        let root = lexer.root();
        let a = lexer.create_state(TokenKind::Add);
        let b = lexer.create_state(TokenKind::Subtract);
        lexer.add_edge(root, a, b'+');
        lexer.add_edge(root, b, b'+');
    }
}
