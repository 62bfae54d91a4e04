//! Builtin types, the common-type lattice, and arena seeding.
//!
//! The builtin set is closed. Numeric widening follows the lattice:
//! signed with signed picks the wider, unsigned with unsigned picks the
//! wider, int with float yields the float, float with float picks the
//! wider; `null` with anything yields the other type; everything else
//! is undefined unless the two types are identical. User classes find
//! their first common base walking up the inheritance chain, falling
//! back to the universal `object`.
//!
//! Seeding also installs the operator methods on the scalar types (the
//! resolver sees only calls after lowering, so `1 + 2` resolves through
//! `i32`'s `@add` overload set) and the global `print` function.

use brandyc_util::{Name, SymbolId, TableId};

use crate::symbol::{Symbol, SymbolKind, Symbols};

/// The closed set of builtin types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinType {
    Void,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    Regex,
    Bool,
    Null,
    TypeType,
    ImportType,
    Object,
}

impl BuiltinType {
    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            BuiltinType::I8 | BuiltinType::I16 | BuiltinType::I32 | BuiltinType::I64
        )
    }

    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            BuiltinType::U8 | BuiltinType::U16 | BuiltinType::U32 | BuiltinType::U64
        )
    }

    pub fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    pub fn is_float(self) -> bool {
        matches!(self, BuiltinType::F32 | BuiltinType::F64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_int() || self.is_float()
    }

    /// Storage width used to pick the wider of two types.
    pub fn byte_size(self) -> u32 {
        match self {
            BuiltinType::I8 | BuiltinType::U8 | BuiltinType::Bool | BuiltinType::Char => 1,
            BuiltinType::I16 | BuiltinType::U16 => 2,
            BuiltinType::I32 | BuiltinType::U32 | BuiltinType::F32 => 4,
            BuiltinType::I64 | BuiltinType::U64 | BuiltinType::F64 => 8,
            _ => 0,
        }
    }

    /// The name the type is bound to in the builtin scope.
    pub fn source_name(self) -> &'static str {
        match self {
            BuiltinType::Void => "void",
            BuiltinType::I8 => "i8",
            BuiltinType::I16 => "i16",
            BuiltinType::I32 => "i32",
            BuiltinType::I64 => "i64",
            BuiltinType::U8 => "u8",
            BuiltinType::U16 => "u16",
            BuiltinType::U32 => "u32",
            BuiltinType::U64 => "u64",
            BuiltinType::F32 => "f32",
            BuiltinType::F64 => "f64",
            BuiltinType::Char => "char",
            BuiltinType::String => "string",
            BuiltinType::Regex => "regex",
            BuiltinType::Bool => "bool",
            BuiltinType::Null => "null",
            BuiltinType::TypeType => "type",
            BuiltinType::ImportType => "import",
            BuiltinType::Object => "object",
        }
    }
}

/// The common type of two builtins under the numeric widening rules,
/// identity and null handling excluded (the caller does those first).
pub fn builtin_common(a: BuiltinType, b: BuiltinType) -> Option<BuiltinType> {
    if a.is_signed_int() && b.is_signed_int() {
        return Some(if a.byte_size() >= b.byte_size() { a } else { b });
    }
    if a.is_unsigned_int() && b.is_unsigned_int() {
        return Some(if a.byte_size() >= b.byte_size() { a } else { b });
    }
    if a.is_int() && b.is_float() {
        return Some(b);
    }
    if a.is_float() && b.is_int() {
        return Some(a);
    }
    if a.is_float() && b.is_float() {
        return Some(if a.byte_size() >= b.byte_size() { a } else { b });
    }
    None
}

/// Handles to the seeded builtin symbols.
#[derive(Clone, Copy, Debug)]
pub struct Builtins {
    pub void: SymbolId,
    pub i8: SymbolId,
    pub i16: SymbolId,
    pub i32: SymbolId,
    pub i64: SymbolId,
    pub u8: SymbolId,
    pub u16: SymbolId,
    pub u32: SymbolId,
    pub u64: SymbolId,
    pub f32: SymbolId,
    pub f64: SymbolId,
    pub char: SymbolId,
    pub string: SymbolId,
    pub regex: SymbolId,
    pub bool: SymbolId,
    pub null: SymbolId,
    pub type_type: SymbolId,
    pub import_type: SymbolId,
    pub object: SymbolId,
    /// The global `print(string) -> void` function.
    pub print: SymbolId,
    /// The bottom scope table holding the type names and `print`.
    pub table: TableId,
}

impl Builtins {
    /// All-zero handles used only while the arena is being seeded.
    pub(crate) fn placeholder() -> Self {
        let zero = SymbolId(0);
        Builtins {
            void: zero,
            i8: zero,
            i16: zero,
            i32: zero,
            i64: zero,
            u8: zero,
            u16: zero,
            u32: zero,
            u64: zero,
            f32: zero,
            f64: zero,
            char: zero,
            string: zero,
            regex: zero,
            bool: zero,
            null: zero,
            type_type: zero,
            import_type: zero,
            object: zero,
            print: zero,
            table: TableId(0),
        }
    }

    /// The symbol for a builtin type.
    pub fn id_of(&self, builtin: BuiltinType) -> SymbolId {
        match builtin {
            BuiltinType::Void => self.void,
            BuiltinType::I8 => self.i8,
            BuiltinType::I16 => self.i16,
            BuiltinType::I32 => self.i32,
            BuiltinType::I64 => self.i64,
            BuiltinType::U8 => self.u8,
            BuiltinType::U16 => self.u16,
            BuiltinType::U32 => self.u32,
            BuiltinType::U64 => self.u64,
            BuiltinType::F32 => self.f32,
            BuiltinType::F64 => self.f64,
            BuiltinType::Char => self.char,
            BuiltinType::String => self.string,
            BuiltinType::Regex => self.regex,
            BuiltinType::Bool => self.bool,
            BuiltinType::Null => self.null,
            BuiltinType::TypeType => self.type_type,
            BuiltinType::ImportType => self.import_type,
            BuiltinType::Object => self.object,
        }
    }
}

impl Symbols {
    /// The common type of two types, or `None` for disjoint families.
    pub fn common_type(&self, a: SymbolId, b: SymbolId) -> Option<SymbolId> {
        let a = self.resolve_alias(a);
        let b = self.resolve_alias(b);

        if a == b {
            return Some(a);
        }
        if a == self.builtins.null {
            return Some(b);
        }
        if b == self.builtins.null {
            return Some(a);
        }

        match (&self.symbol(a).kind, &self.symbol(b).kind) {
            (
                SymbolKind::Builtin { builtin: ta, .. },
                SymbolKind::Builtin { builtin: tb, .. },
            ) => builtin_common(*ta, *tb).map(|common| self.builtins.id_of(common)),
            (SymbolKind::ClassType { .. }, SymbolKind::ClassType { .. }) => {
                Some(self.common_base(a, b))
            }
            _ => None,
        }
    }

    /// First common base of two class types, or `object`.
    fn common_base(&self, a: SymbolId, b: SymbolId) -> SymbolId {
        let mut a_chain = Vec::new();
        let mut current = Some(a);
        while let Some(id) = current {
            a_chain.push(id);
            current = match &self.symbol(id).kind {
                SymbolKind::ClassType { base, .. } => *base,
                _ => None,
            };
        }

        let mut current = Some(b);
        while let Some(id) = current {
            if a_chain.contains(&id) {
                return id;
            }
            current = match &self.symbol(id).kind {
                SymbolKind::ClassType { base, .. } => *base,
                _ => None,
            };
        }

        self.builtins.object
    }
}

const NUMERICS: [BuiltinType; 10] = [
    BuiltinType::I8,
    BuiltinType::I16,
    BuiltinType::I32,
    BuiltinType::I64,
    BuiltinType::U8,
    BuiltinType::U16,
    BuiltinType::U32,
    BuiltinType::U64,
    BuiltinType::F32,
    BuiltinType::F64,
];

const ARITHMETIC_METHODS: [&str; 6] = [
    "@add",
    "@subtract",
    "@multiply",
    "@divide",
    "@modulo",
    "@exponent",
];

const COMPARISON_METHODS: [&str; 12] = [
    "@equality",
    "@inequality",
    "@approx_equality",
    "@approx_inequality",
    "@less_than",
    "@greater_than",
    "@less_than_or_equal",
    "@greater_than_or_equal",
    "@approx_less_than",
    "@approx_greater_than",
    "@approx_less_than_or_equal",
    "@approx_greater_than_or_equal",
];

const ARITHMETIC_ASSIGN_METHODS: [&str; 7] = [
    "@assign",
    "@assign_add",
    "@assign_subtract",
    "@assign_multiply",
    "@assign_divide",
    "@assign_modulo",
    "@assign_exponent",
];

const BITWISE_METHODS: [&str; 3] = ["@bitwise_and", "@bitwise_or", "@bitwise_xor"];

const SHIFT_METHODS: [&str; 4] = [
    "@bitwise_left_shift",
    "@bitwise_right_shift",
    "@logical_left_shift",
    "@logical_right_shift",
];

const BITWISE_ASSIGN_METHODS: [&str; 7] = [
    "@assign_bitwise_and",
    "@assign_bitwise_or",
    "@assign_bitwise_xor",
    "@assign_bitwise_left_shift",
    "@assign_bitwise_right_shift",
    "@assign_logical_left_shift",
    "@assign_logical_right_shift",
];

const STEP_METHODS: [&str; 4] = [
    "@pre_increment",
    "@post_increment",
    "@pre_decrement",
    "@post_decrement",
];

/// Seed the builtin types, their operator members, and the builtin
/// scope table. Called once from [`Symbols::new`].
pub(crate) fn seed_builtins(symbols: &mut Symbols) -> Builtins {
    let table = symbols.alloc_table();

    let make = |symbols: &mut Symbols, builtin: BuiltinType| {
        let members = symbols.alloc_table();
        symbols.alloc(Symbol {
            name: Name::intern(builtin.source_name()),
            node: None,
            kind: SymbolKind::Builtin { builtin, members },
        })
    };

    let builtins = Builtins {
        void: make(symbols, BuiltinType::Void),
        i8: make(symbols, BuiltinType::I8),
        i16: make(symbols, BuiltinType::I16),
        i32: make(symbols, BuiltinType::I32),
        i64: make(symbols, BuiltinType::I64),
        u8: make(symbols, BuiltinType::U8),
        u16: make(symbols, BuiltinType::U16),
        u32: make(symbols, BuiltinType::U32),
        u64: make(symbols, BuiltinType::U64),
        f32: make(symbols, BuiltinType::F32),
        f64: make(symbols, BuiltinType::F64),
        char: make(symbols, BuiltinType::Char),
        string: make(symbols, BuiltinType::String),
        regex: make(symbols, BuiltinType::Regex),
        bool: make(symbols, BuiltinType::Bool),
        null: make(symbols, BuiltinType::Null),
        type_type: make(symbols, BuiltinType::TypeType),
        import_type: make(symbols, BuiltinType::ImportType),
        object: make(symbols, BuiltinType::Object),
        print: SymbolId(0),
        table,
    };

    // Bind the nameable types in the bottom scope.
    for builtin in [
        BuiltinType::Void,
        BuiltinType::I8,
        BuiltinType::I16,
        BuiltinType::I32,
        BuiltinType::I64,
        BuiltinType::U8,
        BuiltinType::U16,
        BuiltinType::U32,
        BuiltinType::U64,
        BuiltinType::F32,
        BuiltinType::F64,
        BuiltinType::Char,
        BuiltinType::String,
        BuiltinType::Regex,
        BuiltinType::Bool,
        BuiltinType::Object,
    ] {
        let id = builtins.id_of(builtin);
        let name = Name::intern(builtin.source_name());
        symbols.table_mut(table).insert(name, id);
    }

    seed_scalar_operators(symbols, &builtins);

    // print(string) -> void
    let print = {
        let concrete = symbols.alloc(Symbol {
            name: Name::intern("print"),
            node: None,
            kind: SymbolKind::ConcreteFunction {
                params: Some(vec![builtins.string]),
                ret: Some(builtins.void),
            },
        });
        let function = symbols.alloc(Symbol {
            name: Name::intern("print"),
            node: None,
            kind: SymbolKind::Function {
                overloads: vec![concrete],
            },
        });
        symbols
            .table_mut(table)
            .insert(Name::intern("print"), function);
        function
    };

    Builtins { print, ..builtins }
}

/// Install the operator methods on the scalar builtin types.
fn seed_scalar_operators(symbols: &mut Symbols, builtins: &Builtins) {
    // Numeric scalars.
    for &t in &NUMERICS {
        let this = builtins.id_of(t);
        let members = members_table(symbols, this);
        let compatible: Vec<(SymbolId, SymbolId)> = NUMERICS
            .iter()
            .filter_map(|&u| {
                let common = if t == u { t } else { builtin_common(t, u)? };
                Some((builtins.id_of(u), builtins.id_of(common)))
            })
            .collect();

        for method in ARITHMETIC_METHODS {
            for &(operand, common) in &compatible {
                add_overload(symbols, members, method, vec![operand], common);
            }
        }

        // Unary forms: `-x` lowers to a zero-argument `@subtract`, and
        // likewise for the other prefix spellings of these operators.
        for method in ["@add", "@subtract", "@multiply", "@exponent"] {
            add_overload(symbols, members, method, Vec::new(), this);
        }

        for method in COMPARISON_METHODS {
            for &(operand, _) in &compatible {
                add_overload(symbols, members, method, vec![operand], builtins.bool);
            }
        }

        for method in ARITHMETIC_ASSIGN_METHODS {
            for &(operand, _) in &compatible {
                add_overload(symbols, members, method, vec![operand], this);
            }
        }

        for method in STEP_METHODS {
            add_overload(symbols, members, method, Vec::new(), this);
        }

        if t.is_int() {
            let int_compatible: Vec<(SymbolId, SymbolId)> = NUMERICS
                .iter()
                .filter(|u| u.is_int())
                .filter_map(|&u| {
                    let common = if t == u { t } else { builtin_common(t, u)? };
                    Some((builtins.id_of(u), builtins.id_of(common)))
                })
                .collect();

            for method in BITWISE_METHODS {
                for &(operand, common) in &int_compatible {
                    add_overload(symbols, members, method, vec![operand], common);
                }
            }
            for method in SHIFT_METHODS {
                for &(operand, _) in &int_compatible {
                    add_overload(symbols, members, method, vec![operand], this);
                }
            }
            for method in BITWISE_ASSIGN_METHODS {
                for &(operand, _) in &int_compatible {
                    add_overload(symbols, members, method, vec![operand], this);
                }
            }
            add_overload(symbols, members, "@bitwise_not", Vec::new(), this);
        }
    }

    // bool
    {
        let this = builtins.bool;
        let members = members_table(symbols, this);
        for method in [
            "@logical_and",
            "@logical_or",
            "@assign_logical_and",
            "@assign_logical_or",
            "@assign",
            "@equality",
            "@inequality",
        ] {
            add_overload(symbols, members, method, vec![this], this);
        }
        add_overload(symbols, members, "@logical_not", Vec::new(), this);
    }

    // string
    {
        let this = builtins.string;
        let members = members_table(symbols, this);
        add_overload(symbols, members, "@add", vec![this], this);
        add_overload(symbols, members, "@assign", vec![this], this);
        for method in ["@equality", "@inequality", "@less_than", "@greater_than"] {
            add_overload(symbols, members, method, vec![this], builtins.bool);
        }
    }

    // char
    {
        let this = builtins.char;
        let members = members_table(symbols, this);
        add_overload(symbols, members, "@assign", vec![this], this);
        for method in [
            "@equality",
            "@inequality",
            "@less_than",
            "@greater_than",
            "@less_than_or_equal",
            "@greater_than_or_equal",
        ] {
            add_overload(symbols, members, method, vec![this], builtins.bool);
        }
    }
}

fn members_table(symbols: &Symbols, type_id: SymbolId) -> TableId {
    match &symbols.symbol(type_id).kind {
        SymbolKind::Builtin { members, .. } => *members,
        SymbolKind::ClassType { members, .. } => *members,
        _ => unreachable!("operator members are only seeded on types"),
    }
}

/// Append one concrete overload to the named function in a member
/// table, creating the overload set on first use.
fn add_overload(
    symbols: &mut Symbols,
    table: TableId,
    method: &str,
    params: Vec<SymbolId>,
    ret: SymbolId,
) {
    let name = Name::intern(method);
    let concrete = symbols.alloc(Symbol {
        name,
        node: None,
        kind: SymbolKind::ConcreteFunction {
            params: Some(params),
            ret: Some(ret),
        },
    });

    match symbols.table(table).get(name) {
        Some(function) => {
            if let SymbolKind::Function { overloads } = &mut symbols.symbol_mut(function).kind {
                overloads.push(concrete);
            }
        }
        None => {
            let function = symbols.alloc(Symbol {
                name,
                node: None,
                kind: SymbolKind::Function {
                    overloads: vec![concrete],
                },
            });
            symbols.table_mut(table).insert(name, function);
        }
    }
}
