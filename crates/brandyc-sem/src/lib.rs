//! brandyc-sem - Symbols, types, and the semantic passes.
//!
//! This crate turns a parsed Brandy module into a fully resolved one:
//! parents hooked up, single-expression bodies rewritten to returns,
//! operators lowered to method calls, scopes filled with their symbols,
//! and every expression annotated with its resulting type.
//!
//! [`compile`] is the translation-unit entry point; it owns the source
//! text, the token vector, the resolved tree, the analysis context, and
//! the accumulated diagnostics.

pub mod analysis;
pub mod ops;
pub mod passes;
pub mod scope;
pub mod symbol;
pub mod types;

#[cfg(test)]
mod edge_cases;

use brandyc_lex::{tokenize, Token};
use brandyc_par::{AstNode, Parser};
use brandyc_util::Handler;

pub use analysis::{analyze, Analysis};
pub use ops::OperatorMethod;
pub use scope::ScopeStack;
pub use symbol::{ConcreteMatch, Symbol, SymbolKind, SymbolTable, Symbols};
pub use types::{builtin_common, BuiltinType, Builtins};

/// A compiled translation unit.
///
/// Consumers read the resolved tree, the module's top-level symbol
/// table (through [`Analysis::module_table`]), and the diagnostics;
/// they are expected not to mutate the tree.
pub struct Module {
    /// Where the source came from.
    pub path: String,
    /// The source text, with a trailing newline guaranteed.
    pub source: String,
    /// Every token of the source, trivia included.
    pub tokens: Vec<Token>,
    /// The resolved syntax tree; `None` when lexing or parsing failed.
    pub root: Option<Box<AstNode>>,
    /// Symbol arenas and per-scope tables; `None` when the pipeline
    /// stopped before analysis.
    pub analysis: Option<Analysis>,
    /// Accumulated diagnostics.
    pub handler: Handler,
}

impl Module {
    /// True when the unit compiled without errors.
    pub fn is_clean(&self) -> bool {
        !self.handler.has_errors()
    }
}

/// Compile a translation unit from its path and source text.
///
/// A missing trailing newline is appended before tokenization. A lex
/// failure is terminal; a parse failure records its diagnostic and
/// yields a module without a tree; semantic errors accumulate while
/// analysis continues on independent subtrees.
pub fn compile(path: impl Into<String>, source: &str) -> Module {
    let path = path.into();
    let mut source = source.to_string();
    if !source.ends_with('\n') {
        source.push('\n');
    }

    let handler = Handler::new();

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(error) => {
            handler.terminal(0, error.to_string());
            return Module {
                path,
                source,
                tokens: Vec::new(),
                root: None,
                analysis: None,
                handler,
            };
        }
    };

    let parsed = match Parser::new(&source, &tokens).parse_module() {
        Ok(parsed) => parsed,
        Err(error) => {
            handler.error(error.token_index, error.message.clone());
            return Module {
                path,
                source,
                tokens,
                root: None,
                analysis: None,
                handler,
            };
        }
    };

    let mut root = parsed.root;
    let mut ids = parsed.ids;
    let analysis = analyze(&mut root, &mut ids, &handler);

    Module {
        path,
        source,
        tokens,
        root: Some(root),
        analysis: Some(analysis),
        handler,
    }
}
