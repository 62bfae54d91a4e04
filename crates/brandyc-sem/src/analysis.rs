//! Pass orchestration.
//!
//! The semantic passes run in a fixed order, each relying on the
//! invariants the previous one established: parent hookup, the
//! function-return rewrite, operator lowering, symbol-table fill, and
//! finally name/type resolution. Resolution iterates to a fixpoint so
//! forward references and return-type inference chains settle without
//! re-entering other subtrees mid-walk; diagnostics are emitted on the
//! settling iteration only.

use brandyc_par::ast::NodeIdGen;
use brandyc_par::{walk, walk_ref, AstNode, NodeId};
use brandyc_util::{Handler, SymbolId, TableId};
use rustc_hash::FxHashMap;

use crate::passes::fill::SymbolFiller;
use crate::passes::lower::OperatorLowering;
use crate::passes::parents::ParentHookup;
use crate::passes::resolve::Resolver;
use crate::passes::returns::FunctionReturns;
use crate::symbol::Symbols;

/// Everything the semantic passes accumulate beside the tree: the
/// symbol arenas, the table of each scope-introducing node, and the
/// symbol declared by each declaration node.
pub struct Analysis {
    /// Symbol and table arenas, builtins included.
    pub symbols: Symbols,
    /// Scope-introducing node to its symbol table.
    pub scope_tables: FxHashMap<NodeId, TableId>,
    /// Declaration node to the symbol it declares.
    pub declared: FxHashMap<NodeId, SymbolId>,
    /// Property node to its setter's implicit `value` parameter.
    pub setter_values: FxHashMap<NodeId, SymbolId>,
    /// The module's top-level table.
    pub module_table: TableId,
}

impl Analysis {
    fn new() -> Self {
        let symbols = Symbols::new();
        let module_table = symbols.builtins.table;
        Self {
            symbols,
            scope_tables: FxHashMap::default(),
            declared: FxHashMap::default(),
            setter_values: FxHashMap::default(),
            module_table,
        }
    }
}

/// Run the full pass sequence over a parsed module.
pub fn analyze(root: &mut Box<AstNode>, ids: &mut NodeIdGen, handler: &Handler) -> Analysis {
    walk_ref(root, &mut ParentHookup::new());
    walk(root, &mut FunctionReturns::new(ids));
    walk(root, &mut OperatorLowering::new(ids));

    let mut ctx = Analysis::new();

    {
        let mut filler = SymbolFiller::new(&mut ctx, handler);
        walk_ref(root, &mut filler);
    }

    loop {
        let mut resolver = Resolver::new(&mut ctx, handler, false);
        walk_ref(root, &mut resolver);
        let progress = resolver.progress;
        let unresolved = resolver.unresolved;
        if !progress || unresolved == 0 {
            break;
        }
    }

    // The settling pass: resolves nothing new, reports what stayed
    // unresolved.
    let mut resolver = Resolver::new(&mut ctx, handler, true);
    walk_ref(root, &mut resolver);

    ctx
}
