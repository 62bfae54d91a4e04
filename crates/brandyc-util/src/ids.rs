//! Shared id types.
//!
//! Symbol and symbol-table ids are allocated by the semantic arenas but
//! appear as annotation slots on AST nodes, so the newtypes live here
//! where both crates can see them.

use crate::define_idx;

define_idx!(
    /// Handle to a symbol in the semantic symbol arena.
    SymbolId
);

define_idx!(
    /// Handle to a symbol table in the semantic table arena.
    TableId
);
