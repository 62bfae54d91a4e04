//! brandyc-util - Foundation types for the Brandy compiler front-end.
//!
//! This crate holds the pieces every phase leans on: source spans, the
//! global string interner, typed index vectors, and the diagnostic
//! handler. Nothing in here knows about tokens or syntax; the phase
//! crates (`brandyc-lex`, `brandyc-par`, `brandyc-sem`) build on top.

pub mod diagnostic;
pub mod ids;
pub mod index_vec;
pub mod interner;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Severity};
pub use ids::{SymbolId, TableId};
pub use index_vec::{Idx, IndexVec};
pub use interner::Name;
pub use span::Span;

// Re-export commonly used hash containers so phase crates agree on hashers.
pub use indexmap::IndexMap;
pub use rustc_hash::{FxHashMap, FxHashSet};

/// Define a typed index newtype over `u32` implementing [`Idx`].
///
/// Typed indices keep the compiler's many id spaces (DFA states, AST
/// nodes, symbols, symbol tables) from being mixed up at compile time.
///
/// # Examples
///
/// ```
/// use brandyc_util::{define_idx, Idx, IndexVec};
///
/// define_idx!(WidgetId);
///
/// let mut widgets: IndexVec<WidgetId, &str> = IndexVec::new();
/// let id = widgets.push("gear");
/// assert_eq!(widgets[id], "gear");
/// ```
#[macro_export]
macro_rules! define_idx {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $crate::Idx for $name {
            fn from_usize(idx: usize) -> Self {
                assert!(idx <= u32::MAX as usize);
                $name(idx as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}
