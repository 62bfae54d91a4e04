//! AST node definitions.
//!
//! The tree is a tagged union: every node is an [`AstNode`] carrying its
//! id, the token range it covers, an optional parent back-reference, and
//! the variant payload in [`NodeKind`]. Children are exclusively owned
//! `Option<Box<AstNode>>` / `Vec<Box<AstNode>>` slots; parents are plain
//! ids filled in by the parent-hookup pass, so ownership stays a tree.
//!
//! Expressions carry a `resulting_type` slot and, where a concrete
//! overload gets chosen, an `implementation` slot; both are filled by
//! the resolution pass in `brandyc-sem`.

use brandyc_lex::TokenKind;
use brandyc_util::{define_idx, Name, SymbolId};

define_idx!(
    /// Id of an AST node, allocated in creation order.
    NodeId
);

/// Allocator handing out fresh [`NodeId`]s.
///
/// The parser owns one while building the tree; rewrite passes keep it
/// going so replacement nodes get ids the original tree never used.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    /// Allocator starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id.
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// One node of the syntax tree.
#[derive(Debug)]
pub struct AstNode {
    /// Stable id, unique within the translation unit.
    pub id: NodeId,
    /// Index of the first token the node covers.
    pub first_token: usize,
    /// Index of the last token the node covers.
    pub last_token: usize,
    /// Parent id; set by the parent-hookup pass, `None` on the root.
    pub parent: Option<NodeId>,
    /// Variant payload.
    pub kind: NodeKind,
}

impl AstNode {
    /// Construct a node covering `first_token..=last_token`.
    pub fn new(id: NodeId, first_token: usize, last_token: usize, kind: NodeKind) -> Self {
        Self {
            id,
            first_token,
            last_token,
            parent: None,
            kind,
        }
    }

    /// Move this node out of its slot, leaving an empty husk behind.
    ///
    /// Only for visitors about to return [`crate::visit::Outcome::Replace`]:
    /// the walk driver overwrites the husk immediately, so it is never
    /// observed by later passes.
    pub fn take(&mut self) -> AstNode {
        let husk = AstNode {
            id: self.id,
            first_token: self.first_token,
            last_token: self.last_token,
            parent: self.parent,
            kind: NodeKind::TupleLiteral(TupleLiteralNode {
                values: Vec::new(),
                resulting_type: None,
            }),
        };
        std::mem::replace(self, husk)
    }

    /// True for every expression variant.
    pub fn is_expression(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::BinaryOp(_)
                | NodeKind::UnaryOp(_)
                | NodeKind::AbsoluteValue(_)
                | NodeKind::Literal(_)
                | NodeKind::TupleLiteral(_)
                | NodeKind::DictLiteral(_)
                | NodeKind::Lambda(_)
                | NodeKind::NameReference(_)
                | NodeKind::MemberAccess(_)
                | NodeKind::Call(_)
                | NodeKind::Cast(_)
                | NodeKind::Index(_)
        )
    }

    /// True for every declaration variant.
    pub fn is_symbol(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Class(_)
                | NodeKind::Function(_)
                | NodeKind::Var(_)
                | NodeKind::Parameter(_)
                | NodeKind::Property(_)
                | NodeKind::Label(_)
                | NodeKind::Import(_)
                | NodeKind::Typedef(_)
        )
    }

    /// True for every statement variant (declarations and expressions
    /// included, mirroring the family fan-in).
    pub fn is_statement(&self) -> bool {
        self.is_expression()
            || self.is_symbol()
            || matches!(
                self.kind,
                NodeKind::Return(_)
                    | NodeKind::Break(_)
                    | NodeKind::Goto(_)
                    | NodeKind::If(_)
                    | NodeKind::While(_)
                    | NodeKind::For(_)
                    | NodeKind::MetaBlock(_)
                    | NodeKind::Attribute(_)
            )
    }

    /// The resolved type of this expression, if any.
    pub fn resulting_type(&self) -> Option<SymbolId> {
        match &self.kind {
            NodeKind::BinaryOp(n) => n.resulting_type,
            NodeKind::UnaryOp(n) => n.resulting_type,
            NodeKind::AbsoluteValue(n) => n.resulting_type,
            NodeKind::Literal(n) => n.resulting_type,
            NodeKind::TupleLiteral(n) => n.resulting_type,
            NodeKind::DictLiteral(n) => n.resulting_type,
            NodeKind::Lambda(n) => n.resulting_type,
            NodeKind::NameReference(n) => n.resulting_type,
            NodeKind::MemberAccess(n) => n.resulting_type,
            NodeKind::Call(n) => n.resulting_type,
            NodeKind::Cast(n) => n.resulting_type,
            NodeKind::Index(n) => n.resulting_type,
            _ => None,
        }
    }

    /// Set the resolved type of this expression. No-op on
    /// non-expressions.
    pub fn set_resulting_type(&mut self, ty: SymbolId) {
        let slot = match &mut self.kind {
            NodeKind::BinaryOp(n) => &mut n.resulting_type,
            NodeKind::UnaryOp(n) => &mut n.resulting_type,
            NodeKind::AbsoluteValue(n) => &mut n.resulting_type,
            NodeKind::Literal(n) => &mut n.resulting_type,
            NodeKind::TupleLiteral(n) => &mut n.resulting_type,
            NodeKind::DictLiteral(n) => &mut n.resulting_type,
            NodeKind::Lambda(n) => &mut n.resulting_type,
            NodeKind::NameReference(n) => &mut n.resulting_type,
            NodeKind::MemberAccess(n) => &mut n.resulting_type,
            NodeKind::Call(n) => &mut n.resulting_type,
            NodeKind::Cast(n) => &mut n.resulting_type,
            NodeKind::Index(n) => &mut n.resulting_type,
            _ => return,
        };
        *slot = Some(ty);
    }

    /// The symbol a name or member reference resolved to, if any.
    pub fn referenced_symbol(&self) -> Option<SymbolId> {
        match &self.kind {
            NodeKind::NameReference(n) => n.symbol,
            NodeKind::MemberAccess(n) => n.symbol,
            _ => None,
        }
    }
}

/// The closed family of node variants.
#[derive(Debug)]
pub enum NodeKind {
    Module(ModuleNode),
    Scope(ScopeNode),
    TypeReference(TypeReferenceNode),

    Class(ClassNode),
    Function(FunctionNode),
    Var(VarNode),
    Parameter(ParameterNode),
    Property(PropertyNode),
    Label(LabelNode),
    Import(ImportNode),
    Typedef(TypedefNode),

    Return(ReturnNode),
    Break(BreakNode),
    Goto(GotoNode),
    If(IfNode),
    While(WhileNode),
    For(ForNode),
    MetaBlock(MetaBlockNode),
    Attribute(AttributeNode),

    BinaryOp(BinaryOpNode),
    UnaryOp(UnaryOpNode),
    AbsoluteValue(AbsoluteValueNode),
    Literal(LiteralNode),
    TupleLiteral(TupleLiteralNode),
    DictLiteral(DictLiteralNode),
    Lambda(LambdaNode),
    NameReference(NameReferenceNode),
    MemberAccess(MemberAccessNode),
    Call(CallNode),
    Cast(CastNode),
    Index(IndexNode),
}

/// Top level of a translation unit: declared symbols plus loose
/// statements.
#[derive(Debug, Default)]
pub struct ModuleNode {
    pub members: Vec<Box<AstNode>>,
    pub statements: Vec<Box<AstNode>>,
}

/// A statement sequence introducing a lexical scope.
#[derive(Debug, Default)]
pub struct ScopeNode {
    pub statements: Vec<Box<AstNode>>,
}

/// A dotted type name, resolved to a type symbol during analysis.
#[derive(Debug)]
pub struct TypeReferenceNode {
    pub path: Vec<Name>,
    pub symbol: Option<SymbolId>,
}

/// `class Name extends Base …`
#[derive(Debug)]
pub struct ClassNode {
    pub name: Name,
    pub doc: Option<usize>,
    pub attributes: Option<Box<AstNode>>,
    pub base_classes: Vec<Box<AstNode>>,
    pub members: Vec<Box<AstNode>>,
}

/// `func name(params) type -> …`
#[derive(Debug)]
pub struct FunctionNode {
    pub name: Name,
    pub doc: Option<usize>,
    pub attributes: Option<Box<AstNode>>,
    pub is_method: bool,
    pub parameters: Vec<Box<AstNode>>,
    pub return_type: Option<Box<AstNode>>,
    pub scope: Option<Box<AstNode>>,
}

/// `var name [: type] [= expr]`
#[derive(Debug)]
pub struct VarNode {
    pub name: Name,
    pub attributes: Option<Box<AstNode>>,
    pub ty: Option<Box<AstNode>>,
    pub initial_value: Option<Box<AstNode>>,
}

/// A function or lambda parameter: `name: type [= default]`.
#[derive(Debug)]
pub struct ParameterNode {
    pub name: Name,
    pub ty: Option<Box<AstNode>>,
    pub default_value: Option<Box<AstNode>>,
}

/// `property name [: type]` with `get` / `set` scopes.
#[derive(Debug)]
pub struct PropertyNode {
    pub name: Name,
    pub doc: Option<usize>,
    pub attributes: Option<Box<AstNode>>,
    pub ty: Option<Box<AstNode>>,
    pub getter: Option<Box<AstNode>>,
    pub setter: Option<Box<AstNode>>,
}

/// `label name`
#[derive(Debug)]
pub struct LabelNode {
    pub name: Name,
}

/// `import a.b.c [as alias]`
#[derive(Debug)]
pub struct ImportNode {
    pub path: Vec<Name>,
    pub alias: Option<Name>,
}

impl ImportNode {
    /// The name the import binds in the enclosing scope: the alias if
    /// given, otherwise the last path segment.
    pub fn effective_name(&self) -> Name {
        self.alias
            .unwrap_or_else(|| *self.path.last().expect("import path is never empty"))
    }
}

/// `typedef Name = type`
#[derive(Debug)]
pub struct TypedefNode {
    pub name: Name,
    pub target: Option<Box<AstNode>>,
}

/// `return [expr]`
#[derive(Debug)]
pub struct ReturnNode {
    pub value: Option<Box<AstNode>>,
}

/// `break [label]` / `continue [label]`
#[derive(Debug)]
pub struct BreakNode {
    pub is_continue: bool,
    pub target: Option<Name>,
}

/// `goto label`
#[derive(Debug)]
pub struct GotoNode {
    pub target: Name,
}

/// `if` / `elif` / `else` chain. The `else_clause` links the next `If`
/// node; the final `else` is an `If` with no condition.
#[derive(Debug)]
pub struct IfNode {
    pub condition: Option<Box<AstNode>>,
    pub scope: Option<Box<AstNode>>,
    pub else_clause: Option<Box<AstNode>>,
}

/// `while cond …`
#[derive(Debug)]
pub struct WhileNode {
    pub condition: Option<Box<AstNode>>,
    pub scope: Option<Box<AstNode>>,
}

/// `for x in e` / `for x from a to b every s`, with an optional `if`
/// guard before the body.
#[derive(Debug)]
pub struct ForNode {
    pub name: Name,
    pub iterable: Option<Box<AstNode>>,
    pub start: Option<Box<AstNode>>,
    pub end: Option<Box<AstNode>>,
    pub step: Option<Box<AstNode>>,
    pub guard: Option<Box<AstNode>>,
    pub scope: Option<Box<AstNode>>,
}

/// `meta` block; interpretation is left to a later stage.
#[derive(Debug)]
pub struct MetaBlockNode {
    pub scope: Option<Box<AstNode>>,
}

/// `@[ expr, … ]` attribute list attached to a declaration.
#[derive(Debug)]
pub struct AttributeNode {
    pub values: Vec<Box<AstNode>>,
}

/// Binary operator application; lowered to a call before resolution.
#[derive(Debug)]
pub struct BinaryOpNode {
    pub op: TokenKind,
    pub op_token: usize,
    pub left: Option<Box<AstNode>>,
    pub right: Option<Box<AstNode>>,
    pub resulting_type: Option<SymbolId>,
}

/// Unary operator application, prefix or postfix; lowered to a call
/// before resolution.
#[derive(Debug)]
pub struct UnaryOpNode {
    pub op: TokenKind,
    pub op_token: usize,
    pub is_postfix: bool,
    pub operand: Option<Box<AstNode>>,
    pub resulting_type: Option<SymbolId>,
}

/// `|expr|`
#[derive(Debug)]
pub struct AbsoluteValueNode {
    pub operand: Option<Box<AstNode>>,
    pub resulting_type: Option<SymbolId>,
}

/// A literal token. The kind is recorded at parse time so resolution
/// never re-reads the token vector.
#[derive(Debug)]
pub struct LiteralNode {
    pub value_token: usize,
    pub literal_kind: TokenKind,
    pub resulting_type: Option<SymbolId>,
}

/// `(a, b, …)`
#[derive(Debug)]
pub struct TupleLiteralNode {
    pub values: Vec<Box<AstNode>>,
    pub resulting_type: Option<SymbolId>,
}

/// `{ k: v, … }`
#[derive(Debug)]
pub struct DictLiteralNode {
    pub keys: Vec<Box<AstNode>>,
    pub values: Vec<Box<AstNode>>,
    pub resulting_type: Option<SymbolId>,
}

/// `lambda (params) type -> …`
#[derive(Debug)]
pub struct LambdaNode {
    pub parameters: Vec<Box<AstNode>>,
    pub return_type: Option<Box<AstNode>>,
    pub scope: Option<Box<AstNode>>,
    pub resulting_type: Option<SymbolId>,
}

/// A bare identifier in expression position.
#[derive(Debug)]
pub struct NameReferenceNode {
    pub name: Name,
    pub symbol: Option<SymbolId>,
    pub resulting_type: Option<SymbolId>,
}

/// `left.member`
#[derive(Debug)]
pub struct MemberAccessNode {
    pub left: Option<Box<AstNode>>,
    pub member: Name,
    pub symbol: Option<SymbolId>,
    pub resulting_type: Option<SymbolId>,
}

/// `callee(args…)`
#[derive(Debug)]
pub struct CallNode {
    pub callee: Option<Box<AstNode>>,
    pub arguments: Vec<Box<AstNode>>,
    pub implementation: Option<SymbolId>,
    pub resulting_type: Option<SymbolId>,
}

/// `expr as type`
#[derive(Debug)]
pub struct CastNode {
    pub left: Option<Box<AstNode>>,
    pub target: Option<Box<AstNode>>,
    pub resulting_type: Option<SymbolId>,
}

/// `left[index]`, lowered to `@index` member resolution.
#[derive(Debug)]
pub struct IndexNode {
    pub left: Option<Box<AstNode>>,
    pub index: Option<Box<AstNode>>,
    pub implementation: Option<SymbolId>,
    pub resulting_type: Option<SymbolId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(ids: &mut NodeIdGen) -> AstNode {
        AstNode::new(
            ids.fresh(),
            0,
            0,
            NodeKind::Literal(LiteralNode {
                value_token: 0,
                literal_kind: TokenKind::I32Literal,
                resulting_type: None,
            }),
        )
    }

    #[test]
    fn test_id_gen_is_sequential() {
        let mut ids = NodeIdGen::new();
        assert_eq!(ids.fresh(), NodeId(0));
        assert_eq!(ids.fresh(), NodeId(1));
    }

    #[test]
    fn test_family_predicates() {
        let mut ids = NodeIdGen::new();
        let lit = literal(&mut ids);
        assert!(lit.is_expression());
        assert!(lit.is_statement());
        assert!(!lit.is_symbol());

        let ret = AstNode::new(
            ids.fresh(),
            0,
            0,
            NodeKind::Return(ReturnNode { value: None }),
        );
        assert!(ret.is_statement());
        assert!(!ret.is_expression());

        let module = AstNode::new(ids.fresh(), 0, 0, NodeKind::Module(ModuleNode::default()));
        assert!(!module.is_statement());
    }

    #[test]
    fn test_resulting_type_round_trip() {
        let mut ids = NodeIdGen::new();
        let mut lit = literal(&mut ids);
        assert_eq!(lit.resulting_type(), None);
        lit.set_resulting_type(SymbolId(3));
        assert_eq!(lit.resulting_type(), Some(SymbolId(3)));
    }

    #[test]
    fn test_take_preserves_identity() {
        let mut ids = NodeIdGen::new();
        let mut lit = literal(&mut ids);
        let id = lit.id;
        let moved = lit.take();
        assert_eq!(moved.id, id);
        assert!(matches!(moved.kind, NodeKind::Literal(_)));
        // The husk keeps the id but carries no payload.
        assert_eq!(lit.id, id);
        assert!(matches!(lit.kind, NodeKind::TupleLiteral(_)));
    }

    #[test]
    fn test_import_effective_name() {
        let import = ImportNode {
            path: vec![Name::intern("core"), Name::intern("io")],
            alias: None,
        };
        assert_eq!(import.effective_name(), Name::intern("io"));

        let aliased = ImportNode {
            path: vec![Name::intern("core")],
            alias: Some(Name::intern("c")),
        };
        assert_eq!(aliased.effective_name(), Name::intern("c"));
    }
}
