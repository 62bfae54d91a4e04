//! Symbol model.
//!
//! Every symbol lives in one arena ([`Symbols`]); symbol tables live in
//! a sibling arena and hold `Name → SymbolId` entries in insertion
//! order. Scope-introducing nodes map to their table through the
//! analysis context, so the tables can be read and written while the
//! tree itself is being walked mutably.
//!
//! Types are symbols too: class types, the closed builtin set, and
//! interned function types. `common_type` and `get_member` are the two
//! operations the resolver leans on.

use brandyc_par::NodeId;
use brandyc_util::{IndexVec, Name, SymbolId, TableId};
use indexmap::IndexMap;

use crate::types::{seed_builtins, BuiltinType, Builtins};

/// A named semantic entity.
#[derive(Debug)]
pub struct Symbol {
    /// The name the symbol is known by in its table.
    pub name: Name,
    /// The declaring node, if the symbol came from source.
    pub node: Option<NodeId>,
    /// What the symbol is.
    pub kind: SymbolKind,
}

/// The closed set of symbol variants.
#[derive(Debug)]
pub enum SymbolKind {
    /// A jump target.
    Label,
    /// A variable; `implicit` marks first-assignment declarations.
    Variable {
        ty: Option<SymbolId>,
        implicit: bool,
    },
    /// A property with optional declared type.
    Property { ty: Option<SymbolId> },
    /// An overload set sharing one name.
    Function { overloads: Vec<SymbolId> },
    /// One overload: fixed parameter types and a return type. Both
    /// stay `None` until the resolver fills them in; builtins are
    /// seeded fully formed.
    ConcreteFunction {
        params: Option<Vec<SymbolId>>,
        ret: Option<SymbolId>,
    },
    /// A user class type: optional base plus a member table.
    ClassType {
        base: Option<SymbolId>,
        members: TableId,
    },
    /// One of the closed builtin types.
    Builtin {
        builtin: BuiltinType,
        members: TableId,
    },
    /// An interned function type.
    FunctionType {
        params: Vec<SymbolId>,
        ret: Option<SymbolId>,
    },
    /// An imported module; `target` is its symbol table once loaded.
    Import { target: Option<TableId> },
    /// A transparent type alias.
    Typedef { target: Option<SymbolId> },
}

/// Result of overload resolution.
#[derive(Debug, PartialEq, Eq)]
pub enum ConcreteMatch {
    Found(SymbolId),
    Ambiguous,
    NoMatch,
}

/// A single scope's table: insertion-ordered so analysis output is
/// deterministic.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: IndexMap<Name, SymbolId>,
}

impl SymbolTable {
    /// Insert a symbol. Returns false when the name is already bound in
    /// this table (a duplicate definition).
    pub fn insert(&mut self, name: Name, symbol: SymbolId) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, symbol);
        true
    }

    /// Look up a name in this table only.
    pub fn get(&self, name: Name) -> Option<SymbolId> {
        self.entries.get(&name).copied()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no names are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, SymbolId)> + '_ {
        self.entries.iter().map(|(name, id)| (*name, *id))
    }
}

/// The symbol and table arenas, pre-seeded with the builtin types.
pub struct Symbols {
    symbols: IndexVec<SymbolId, Symbol>,
    tables: IndexVec<TableId, SymbolTable>,
    /// Handles to the builtin types and the builtin scope table.
    pub builtins: Builtins,
    /// Interned function types, scanned linearly on construction.
    function_types: Vec<SymbolId>,
}

impl Symbols {
    /// Create the arenas and seed the builtin types, their operator
    /// members, and the builtin scope table.
    pub fn new() -> Self {
        let mut symbols = Symbols {
            symbols: IndexVec::new(),
            tables: IndexVec::new(),
            builtins: Builtins::placeholder(),
            function_types: Vec::new(),
        };
        symbols.builtins = seed_builtins(&mut symbols);
        symbols
    }

    // ------------------------------------------------------------------
    // Arena access
    // ------------------------------------------------------------------

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol)
    }

    pub fn alloc_table(&mut self) -> TableId {
        self.tables.push(SymbolTable::default())
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }

    pub fn table(&self, id: TableId) -> &SymbolTable {
        &self.tables[id]
    }

    pub fn table_mut(&mut self, id: TableId) -> &mut SymbolTable {
        &mut self.tables[id]
    }

    // ------------------------------------------------------------------
    // Type queries
    // ------------------------------------------------------------------

    /// True when the symbol denotes a type (aliases included).
    pub fn is_type(&self, id: SymbolId) -> bool {
        match &self.symbol(id).kind {
            SymbolKind::ClassType { .. }
            | SymbolKind::Builtin { .. }
            | SymbolKind::FunctionType { .. } => true,
            SymbolKind::Typedef { target } => target.map(|t| self.is_type(t)).unwrap_or(false),
            _ => false,
        }
    }

    /// Follow typedef aliases to the underlying symbol.
    pub fn resolve_alias(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        // Alias chains are short; a cycle would mean a typedef of
        // itself, which the fill pass's duplicate check prevents.
        for _ in 0..self.symbols.len() {
            match &self.symbol(current).kind {
                SymbolKind::Typedef {
                    target: Some(target),
                } => current = *target,
                _ => break,
            }
        }
        current
    }

    /// The type a reference to this symbol has, when known.
    pub fn type_of(&self, id: SymbolId) -> Option<SymbolId> {
        match &self.symbol(id).kind {
            SymbolKind::Variable { ty, .. } => *ty,
            SymbolKind::Property { ty } => *ty,
            SymbolKind::ConcreteFunction { params, ret } => params
                .as_ref()
                .and_then(|params| self.lookup_function_type(params, *ret)),
            SymbolKind::Function { overloads } => {
                if overloads.len() == 1 {
                    self.type_of(overloads[0])
                } else {
                    None
                }
            }
            SymbolKind::ClassType { .. }
            | SymbolKind::Builtin { .. }
            | SymbolKind::FunctionType { .. }
            | SymbolKind::Typedef { .. } => Some(self.builtins.type_type),
            SymbolKind::Import { .. } => Some(self.builtins.import_type),
            SymbolKind::Label => None,
        }
    }

    /// Resolve a member of a type (or import) by name. Class lookups
    /// walk up the inheritance chain.
    pub fn get_member(&self, id: SymbolId, name: Name) -> Option<SymbolId> {
        match &self.symbol(self.resolve_alias(id)).kind {
            SymbolKind::ClassType { base, members } => {
                if let Some(found) = self.table(*members).get(name) {
                    return Some(found);
                }
                base.and_then(|base| self.get_member(base, name))
            }
            SymbolKind::Builtin { members, .. } => self.table(*members).get(name),
            SymbolKind::Import { target } => target.and_then(|t| self.table(t).get(name)),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Function types and overloads
    // ------------------------------------------------------------------

    /// Intern a function type, reusing an existing symbol with the same
    /// signature.
    pub fn function_type(&mut self, params: &[SymbolId], ret: Option<SymbolId>) -> SymbolId {
        if let Some(existing) = self.lookup_function_type(params, ret) {
            return existing;
        }

        let id = self.alloc(Symbol {
            name: Name::intern("function"),
            node: None,
            kind: SymbolKind::FunctionType {
                params: params.to_vec(),
                ret,
            },
        });
        self.function_types.push(id);
        id
    }

    fn lookup_function_type(&self, params: &[SymbolId], ret: Option<SymbolId>) -> Option<SymbolId> {
        self.function_types.iter().copied().find(|&id| {
            matches!(
                &self.symbol(id).kind,
                SymbolKind::FunctionType { params: p, ret: r } if p == params && *r == ret
            )
        })
    }

    /// Choose a concrete overload for the given argument types.
    ///
    /// An overload is viable when it has the same arity and every
    /// argument type equals or shares a common type with the declared
    /// parameter type. An exact parameter-type match wins outright;
    /// otherwise a single viable candidate is chosen, several are an
    /// ambiguity, none is a failure.
    pub fn get_concrete(&self, function: SymbolId, args: &[SymbolId]) -> ConcreteMatch {
        let SymbolKind::Function { overloads } = &self.symbol(function).kind else {
            return ConcreteMatch::NoMatch;
        };

        let mut viable = Vec::new();
        for &overload in overloads {
            let SymbolKind::ConcreteFunction {
                params: Some(params),
                ..
            } = &self.symbol(overload).kind
            else {
                continue;
            };
            if params.len() != args.len() {
                continue;
            }

            let exact = params
                .iter()
                .zip(args)
                .all(|(&param, &arg)| self.resolve_alias(param) == self.resolve_alias(arg));
            if exact {
                return ConcreteMatch::Found(overload);
            }

            let compatible = params
                .iter()
                .zip(args)
                .all(|(&param, &arg)| self.common_type(param, arg).is_some());
            if compatible {
                viable.push(overload);
            }
        }

        match viable.len() {
            0 => ConcreteMatch::NoMatch,
            1 => ConcreteMatch::Found(viable[0]),
            _ => ConcreteMatch::Ambiguous,
        }
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_insert_and_duplicate() {
        let mut symbols = Symbols::new();
        let table = symbols.alloc_table();
        let name = Name::intern("x");
        let sym = symbols.alloc(Symbol {
            name,
            node: None,
            kind: SymbolKind::Variable {
                ty: None,
                implicit: false,
            },
        });

        assert!(symbols.table_mut(table).insert(name, sym));
        assert!(!symbols.table_mut(table).insert(name, sym));
        assert_eq!(symbols.table(table).get(name), Some(sym));
    }

    #[test]
    fn test_function_type_interning() {
        let mut symbols = Symbols::new();
        let i32_ty = symbols.builtins.i32;
        let bool_ty = symbols.builtins.bool;

        let a = symbols.function_type(&[i32_ty], Some(bool_ty));
        let b = symbols.function_type(&[i32_ty], Some(bool_ty));
        let c = symbols.function_type(&[bool_ty], Some(bool_ty));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_typedef_resolves_transitively() {
        let mut symbols = Symbols::new();
        let i32_ty = symbols.builtins.i32;
        let first = symbols.alloc(Symbol {
            name: Name::intern("Id"),
            node: None,
            kind: SymbolKind::Typedef {
                target: Some(i32_ty),
            },
        });
        let second = symbols.alloc(Symbol {
            name: Name::intern("Key"),
            node: None,
            kind: SymbolKind::Typedef {
                target: Some(first),
            },
        });

        assert_eq!(symbols.resolve_alias(second), i32_ty);
        assert!(symbols.is_type(second));
        // Members resolve through the alias.
        let add = Name::intern("@add");
        assert_eq!(
            symbols.get_member(second, add),
            symbols.get_member(i32_ty, add)
        );
    }

    #[test]
    fn test_get_concrete_prefers_exact_match() {
        let mut symbols = Symbols::new();
        let i32_ty = symbols.builtins.i32;
        let add = symbols
            .get_member(i32_ty, Name::intern("@add"))
            .expect("i32 has @add");

        match symbols.get_concrete(add, &[i32_ty]) {
            ConcreteMatch::Found(overload) => {
                let SymbolKind::ConcreteFunction { params, ret } = &symbols.symbol(overload).kind
                else {
                    panic!("overload is not concrete");
                };
                assert_eq!(params.as_deref(), Some(&[i32_ty][..]));
                assert_eq!(*ret, Some(i32_ty));
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_get_concrete_arity_mismatch() {
        let mut symbols = Symbols::new();
        let i32_ty = symbols.builtins.i32;
        let add = symbols
            .get_member(i32_ty, Name::intern("@add"))
            .expect("i32 has @add");

        assert_eq!(
            symbols.get_concrete(add, &[i32_ty, i32_ty, i32_ty]),
            ConcreteMatch::NoMatch
        );
    }

    #[test]
    fn test_class_member_lookup_walks_bases() {
        let mut symbols = Symbols::new();

        let base_table = symbols.alloc_table();
        let base = symbols.alloc(Symbol {
            name: Name::intern("Base"),
            node: None,
            kind: SymbolKind::ClassType {
                base: None,
                members: base_table,
            },
        });
        let field_name = Name::intern("field");
        let field = symbols.alloc(Symbol {
            name: field_name,
            node: None,
            kind: SymbolKind::Variable {
                ty: None,
                implicit: false,
            },
        });
        symbols.table_mut(base_table).insert(field_name, field);

        let derived_table = symbols.alloc_table();
        let derived = symbols.alloc(Symbol {
            name: Name::intern("Derived"),
            node: None,
            kind: SymbolKind::ClassType {
                base: Some(base),
                members: derived_table,
            },
        });

        assert_eq!(symbols.get_member(derived, field_name), Some(field));
    }
}
