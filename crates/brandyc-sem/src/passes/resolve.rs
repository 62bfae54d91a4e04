//! Name and type resolution.
//!
//! A table-stack walk that resolves every name reference, member
//! access, call, cast, and index, assigning each expression its
//! `resulting_type` and, where a concrete overload gets chosen, its
//! `implementation`. Operator lowering has already run, so operators
//! arrive here as calls of `@`-methods.
//!
//! One pass cannot settle everything: a call may need the return type
//! of a function whose body has not been resolved yet. Each resolver
//! run records whether it learned anything new (`progress`) and how
//! many facts are still missing (`unresolved`); the driver re-runs the
//! pass until the tree stops changing and lets a final reporting run
//! turn whatever is left into diagnostics.

use brandyc_lex::TokenKind;
use brandyc_par::{walk_children, walk_opt, walk_ref, AstNode, AstVisitor, NodeKind, Outcome};
use brandyc_util::{Handler, Name, SymbolId};

use crate::analysis::Analysis;
use crate::ops::OperatorMethod;
use crate::scope::ScopeStack;
use crate::symbol::{ConcreteMatch, SymbolKind, Symbols};

/// The resolution visitor. Run it over the module root with
/// [`brandyc_par::walk_ref`]; construct a fresh one per iteration.
pub struct Resolver<'a> {
    ctx: &'a mut Analysis,
    handler: &'a Handler,
    stack: ScopeStack,
    /// Emit diagnostics for unresolved facts (the settling run).
    report: bool,
    /// Whether this run assigned any previously missing fact.
    pub progress: bool,
    /// How many facts are still missing after this run.
    pub unresolved: usize,
    assign_method: Name,
    call_method: Name,
    index_method: Name,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: &'a mut Analysis, handler: &'a Handler, report: bool) -> Self {
        let stack = ScopeStack::new(ctx.symbols.builtins.table);
        Self {
            ctx,
            handler,
            stack,
            report,
            progress: false,
            unresolved: 0,
            assign_method: OperatorMethod::Assign.interned(),
            call_method: OperatorMethod::Call.interned(),
            index_method: OperatorMethod::Index.interned(),
        }
    }

    /// A fact is still missing; try again next iteration.
    fn defer(&mut self) {
        self.unresolved += 1;
    }

    /// A fact can never resolve; report it on the settling run.
    fn fail(&mut self, anchor: usize, message: String) {
        if self.report {
            self.handler.error(anchor, message);
        }
        self.unresolved += 1;
    }

    /// The type a reference to `symbol` has, interning function types
    /// on demand. `None` while the symbol's own facts are missing, and
    /// for overload sets that only a call can disambiguate.
    fn reference_type(&mut self, symbol: SymbolId) -> Option<SymbolId> {
        match &self.ctx.symbols.symbol(symbol).kind {
            SymbolKind::ConcreteFunction {
                params: Some(params),
                ret: Some(ret),
            } => {
                let params = params.clone();
                let ret = Some(*ret);
                Some(self.ctx.symbols.function_type(&params, ret))
            }
            SymbolKind::ConcreteFunction { .. } => None,
            SymbolKind::Function { overloads } if overloads.len() == 1 => {
                let only = overloads[0];
                self.reference_type(only)
            }
            _ => self.ctx.symbols.type_of(symbol),
        }
    }

    /// The resolved type symbol of a type-reference child, if any.
    fn type_ref_symbol(node: Option<&AstNode>) -> Option<SymbolId> {
        match node.map(|n| &n.kind) {
            Some(NodeKind::TypeReference(t)) => t.symbol,
            _ => None,
        }
    }

    /// Resolve an overload set against argument types, filling the
    /// call's implementation and resulting type.
    fn apply_overload(
        &mut self,
        function: SymbolId,
        args: &[SymbolId],
        anchor: usize,
    ) -> (Option<SymbolId>, Option<SymbolId>) {
        let name = self.ctx.symbols.symbol(function).name;
        match self.ctx.symbols.get_concrete(function, args) {
            ConcreteMatch::Found(concrete) => {
                let ret = match &self.ctx.symbols.symbol(concrete).kind {
                    SymbolKind::ConcreteFunction { ret, .. } => *ret,
                    _ => None,
                };
                (Some(concrete), ret)
            }
            ConcreteMatch::Ambiguous => {
                self.fail(anchor, format!("ambiguous call to '{}'", name));
                (None, None)
            }
            ConcreteMatch::NoMatch => {
                let message = if name.as_str().starts_with('@') {
                    "operator not supported for these operand types".to_string()
                } else {
                    format!("no matching overload of '{}' for these argument types", name)
                };
                self.fail(anchor, message);
                (None, None)
            }
        }
    }

    /// First assignment typing: a lowered `@assign` whose receiver is a
    /// still-untyped variable takes the type of the assigned value.
    fn infer_assignment_target(&mut self, node: &AstNode) {
        let NodeKind::Call(call) = &node.kind else {
            return;
        };
        let Some(callee) = call.callee.as_deref() else {
            return;
        };
        let NodeKind::MemberAccess(member) = &callee.kind else {
            return;
        };
        if member.member != self.assign_method {
            return;
        }
        let Some(left) = member.left.as_deref() else {
            return;
        };
        let NodeKind::NameReference(name_ref) = &left.kind else {
            return;
        };
        let Some(var) = name_ref.symbol else {
            return;
        };
        let Some(value_ty) = call.arguments.first().and_then(|a| a.resulting_type()) else {
            return;
        };

        if let SymbolKind::Variable { ty: ty @ None, .. } =
            &mut self.ctx.symbols.symbol_mut(var).kind
        {
            *ty = Some(value_ty);
            self.progress = true;
        }
    }

    /// Fill a still-empty variable type slot.
    fn set_variable_type(&mut self, symbol: SymbolId, ty: SymbolId) {
        match &mut self.ctx.symbols.symbol_mut(symbol).kind {
            SymbolKind::Variable { ty: slot @ None, .. } => {
                *slot = Some(ty);
                self.progress = true;
            }
            SymbolKind::Property { ty: slot @ None } => {
                *slot = Some(ty);
                self.progress = true;
            }
            _ => {}
        }
    }
}

impl AstVisitor for Resolver<'_> {
    // ------------------------------------------------------------------
    // Table-pushing structure
    // ------------------------------------------------------------------

    fn visit_module(&mut self, node: &mut AstNode) -> Outcome {
        let Some(&table) = self.ctx.scope_tables.get(&node.id) else {
            return Outcome::Resume;
        };
        self.stack.push(table);
        walk_children(node, self);
        self.stack.pop();
        Outcome::Stop
    }

    fn visit_scope(&mut self, node: &mut AstNode) -> Outcome {
        let Some(&table) = self.ctx.scope_tables.get(&node.id) else {
            return Outcome::Resume;
        };
        self.stack.push(table);
        walk_children(node, self);
        self.stack.pop();
        Outcome::Stop
    }

    fn visit_class(&mut self, node: &mut AstNode) -> Outcome {
        if let Some(&table) = self.ctx.scope_tables.get(&node.id) {
            self.stack.push(table);
            walk_children(node, self);
            self.stack.pop();
        } else {
            walk_children(node, self);
        }

        // Hook the first base class into the class symbol so the
        // common-type chain can walk it.
        let declared = self.ctx.declared.get(&node.id).copied();
        let NodeKind::Class(class) = &node.kind else {
            return Outcome::Stop;
        };
        let Some(class_symbol) = declared else {
            return Outcome::Stop;
        };

        if let Some(base_node) = class.base_classes.first() {
            match Self::type_ref_symbol(Some(base_node)) {
                Some(base) => {
                    let base = self.ctx.symbols.resolve_alias(base);
                    if matches!(
                        self.ctx.symbols.symbol(base).kind,
                        SymbolKind::ClassType { .. }
                    ) {
                        if let SymbolKind::ClassType { base: slot @ None, .. } =
                            &mut self.ctx.symbols.symbol_mut(class_symbol).kind
                        {
                            *slot = Some(base);
                            self.progress = true;
                        }
                    } else {
                        self.fail(
                            base_node.first_token,
                            "base class is not a class type".to_string(),
                        );
                    }
                }
                None => self.defer(),
            }
        }

        Outcome::Stop
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn visit_function(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let Some(declared) = self.ctx.declared.get(&node.id).copied() else {
            return Outcome::Stop;
        };

        // Parameter types must be declared; collect them.
        let (param_types, has_ret_node) = {
            let NodeKind::Function(function) = &node.kind else {
                return Outcome::Stop;
            };
            let params: Option<Vec<SymbolId>> = function
                .parameters
                .iter()
                .map(|p| match &p.kind {
                    NodeKind::Parameter(param) => Self::type_ref_symbol(param.ty.as_deref()),
                    _ => None,
                })
                .collect();
            (params, function.return_type.is_some())
        };

        match &param_types {
            Some(types) => {
                if let SymbolKind::ConcreteFunction {
                    params: slot @ None,
                    ..
                } = &mut self.ctx.symbols.symbol_mut(declared).kind
                {
                    *slot = Some(types.clone());
                    self.progress = true;
                }
            }
            None => self.defer(),
        }

        let ret_unset = matches!(
            self.ctx.symbols.symbol(declared).kind,
            SymbolKind::ConcreteFunction { ret: None, .. }
        );
        if !ret_unset {
            return Outcome::Stop;
        }

        let resolved_ret = if has_ret_node {
            let NodeKind::Function(function) = &node.kind else {
                return Outcome::Stop;
            };
            match Self::type_ref_symbol(function.return_type.as_deref()) {
                Some(ty) => Some(ty),
                None => {
                    self.defer();
                    return Outcome::Stop;
                }
            }
        } else {
            // Infer the return type as the common type over the body's
            // return expressions.
            let deduction = {
                let NodeKind::Function(function) = &mut node.kind else {
                    return Outcome::Stop;
                };
                let Some(scope) = function.scope.as_mut() else {
                    return Outcome::Stop;
                };
                let mut deducer =
                    ReturnTypeDeducer::new(&self.ctx.symbols, self.ctx.symbols.builtins.void);
                walk_ref(&mut **scope, &mut deducer);
                deducer.finish()
            };
            match deduction {
                Deduction::Known(ty) => Some(ty),
                Deduction::Unknown => {
                    self.defer();
                    return Outcome::Stop;
                }
                Deduction::Conflict => {
                    self.fail(
                        node.first_token,
                        "no common type found for disparate return types".to_string(),
                    );
                    return Outcome::Stop;
                }
            }
        };

        if let Some(ty) = resolved_ret {
            if let SymbolKind::ConcreteFunction { ret: slot @ None, .. } =
                &mut self.ctx.symbols.symbol_mut(declared).kind
            {
                *slot = Some(ty);
                self.progress = true;
            }
        }

        Outcome::Stop
    }

    fn visit_lambda(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        if node.resulting_type().is_some() {
            return Outcome::Stop;
        }

        let (param_types, declared_ret, has_ret_node) = {
            let NodeKind::Lambda(lambda) = &node.kind else {
                return Outcome::Stop;
            };
            let params: Option<Vec<SymbolId>> = lambda
                .parameters
                .iter()
                .map(|p| match &p.kind {
                    NodeKind::Parameter(param) => Self::type_ref_symbol(param.ty.as_deref()),
                    _ => None,
                })
                .collect();
            (
                params,
                Self::type_ref_symbol(lambda.return_type.as_deref()),
                lambda.return_type.is_some(),
            )
        };

        let Some(params) = param_types else {
            self.defer();
            return Outcome::Stop;
        };

        let ret = if has_ret_node {
            match declared_ret {
                Some(ty) => ty,
                None => {
                    self.defer();
                    return Outcome::Stop;
                }
            }
        } else {
            let deduction = {
                let NodeKind::Lambda(lambda) = &mut node.kind else {
                    return Outcome::Stop;
                };
                let Some(scope) = lambda.scope.as_mut() else {
                    return Outcome::Stop;
                };
                let mut deducer =
                    ReturnTypeDeducer::new(&self.ctx.symbols, self.ctx.symbols.builtins.void);
                walk_ref(&mut **scope, &mut deducer);
                deducer.finish()
            };
            match deduction {
                Deduction::Known(ty) => ty,
                Deduction::Unknown => {
                    self.defer();
                    return Outcome::Stop;
                }
                Deduction::Conflict => {
                    self.fail(
                        node.first_token,
                        "no common type found for disparate return types".to_string(),
                    );
                    return Outcome::Stop;
                }
            }
        };

        let ty = self.ctx.symbols.function_type(&params, Some(ret));
        node.set_resulting_type(ty);
        self.progress = true;
        Outcome::Stop
    }

    fn visit_var(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let declared = self.ctx.declared.get(&node.id).copied();
        let NodeKind::Var(var) = &node.kind else {
            return Outcome::Stop;
        };
        let Some(symbol) = declared else {
            return Outcome::Stop;
        };

        if matches!(
            self.ctx.symbols.symbol(symbol).kind,
            SymbolKind::Variable { ty: Some(_), .. }
        ) {
            return Outcome::Stop;
        }

        let ty = Self::type_ref_symbol(var.ty.as_deref())
            .or_else(|| var.initial_value.as_deref().and_then(|v| v.resulting_type()));
        match ty {
            Some(ty) => self.set_variable_type(symbol, ty),
            None => self.defer(),
        }

        Outcome::Stop
    }

    fn visit_parameter(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let declared = self.ctx.declared.get(&node.id).copied();
        let NodeKind::Parameter(param) = &node.kind else {
            return Outcome::Stop;
        };
        let Some(symbol) = declared else {
            return Outcome::Stop;
        };

        if matches!(
            self.ctx.symbols.symbol(symbol).kind,
            SymbolKind::Variable { ty: Some(_), .. }
        ) {
            return Outcome::Stop;
        }

        match Self::type_ref_symbol(param.ty.as_deref()) {
            Some(ty) => self.set_variable_type(symbol, ty),
            None => self.defer(),
        }

        Outcome::Stop
    }

    fn visit_property(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let declared = self.ctx.declared.get(&node.id).copied();
        let setter_value = self.ctx.setter_values.get(&node.id).copied();
        let NodeKind::Property(property) = &node.kind else {
            return Outcome::Stop;
        };

        if let Some(ty) = Self::type_ref_symbol(property.ty.as_deref()) {
            if let Some(symbol) = declared {
                self.set_variable_type(symbol, ty);
            }
            if let Some(value) = setter_value {
                self.set_variable_type(value, ty);
            }
        } else if property.ty.is_some() {
            self.defer();
        }

        Outcome::Stop
    }

    fn visit_typedef(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let declared = self.ctx.declared.get(&node.id).copied();
        let NodeKind::Typedef(typedef) = &node.kind else {
            return Outcome::Stop;
        };
        let Some(symbol) = declared else {
            return Outcome::Stop;
        };

        match Self::type_ref_symbol(typedef.target.as_deref()) {
            Some(target) => {
                if let SymbolKind::Typedef { target: slot @ None } =
                    &mut self.ctx.symbols.symbol_mut(symbol).kind
                {
                    *slot = Some(target);
                    self.progress = true;
                }
            }
            None => self.defer(),
        }

        Outcome::Stop
    }

    fn visit_for(&mut self, node: &mut AstNode) -> Outcome {
        // Bounds and guard resolve in the enclosing scope; typing the
        // loop variable before the body keeps body references settling
        // in the same iteration.
        let NodeKind::For(for_node) = &mut node.kind else {
            return Outcome::Resume;
        };
        for slot in [
            &mut for_node.iterable,
            &mut for_node.start,
            &mut for_node.end,
            &mut for_node.step,
            &mut for_node.guard,
        ] {
            walk_opt(slot, self);
        }

        let bounds = (
            for_node.start.as_deref().and_then(|n| n.resulting_type()),
            for_node.end.as_deref().and_then(|n| n.resulting_type()),
        );
        let ranged = for_node.start.is_some();
        let anchor = node.first_token;

        let declared = self.ctx.declared.get(&node.id).copied();
        if let Some(symbol) = declared {
            let untyped = matches!(
                self.ctx.symbols.symbol(symbol).kind,
                SymbolKind::Variable { ty: None, .. }
            );
            if untyped {
                if ranged {
                    match bounds {
                        (Some(start), Some(end)) => {
                            match self.ctx.symbols.common_type(start, end) {
                                Some(common) => self.set_variable_type(symbol, common),
                                None => self.fail(
                                    anchor,
                                    "loop bounds have no common type".to_string(),
                                ),
                            }
                        }
                        _ => self.defer(),
                    }
                } else {
                    // Iterated element types are opaque without an
                    // iteration protocol; the universal base stands in.
                    let object = self.ctx.symbols.builtins.object;
                    self.set_variable_type(symbol, object);
                }
            }
        }

        let NodeKind::For(for_node) = &mut node.kind else {
            return Outcome::Stop;
        };
        walk_opt(&mut for_node.scope, self);

        Outcome::Stop
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn visit_literal(&mut self, node: &mut AstNode) -> Outcome {
        let builtins = self.ctx.symbols.builtins;
        let NodeKind::Literal(literal) = &mut node.kind else {
            return Outcome::Stop;
        };
        if literal.resulting_type.is_some() {
            return Outcome::Stop;
        }

        let ty = match literal.literal_kind {
            TokenKind::I8Literal => builtins.i8,
            TokenKind::I16Literal => builtins.i16,
            TokenKind::I32Literal => builtins.i32,
            TokenKind::I64Literal => builtins.i64,
            TokenKind::U8Literal => builtins.u8,
            TokenKind::U16Literal => builtins.u16,
            TokenKind::U32Literal => builtins.u32,
            TokenKind::U64Literal => builtins.u64,
            TokenKind::F32Literal => builtins.f32,
            TokenKind::F64Literal => builtins.f64,
            TokenKind::CharLiteral => builtins.char,
            TokenKind::StringLiteral => builtins.string,
            TokenKind::RegexLiteral => builtins.regex,
            TokenKind::True | TokenKind::False => builtins.bool,
            TokenKind::Nil => builtins.null,
            _ => return Outcome::Stop,
        };
        literal.resulting_type = Some(ty);
        self.progress = true;
        Outcome::Stop
    }

    fn visit_name_reference(&mut self, node: &mut AstNode) -> Outcome {
        let anchor = node.first_token;
        let NodeKind::NameReference(name_ref) = &mut node.kind else {
            return Outcome::Stop;
        };

        if name_ref.symbol.is_none() {
            match self.stack.resolve(&self.ctx.symbols, name_ref.name) {
                Some(found) => {
                    // A function with exactly one overload collapses to
                    // that overload.
                    let collapsed = match &self.ctx.symbols.symbol(found).kind {
                        SymbolKind::Function { overloads } if overloads.len() == 1 => overloads[0],
                        _ => found,
                    };
                    name_ref.symbol = Some(collapsed);
                    self.progress = true;
                }
                None => {
                    self.fail(
                        anchor,
                        format!("could not resolve name '{}'", name_ref.name),
                    );
                    return Outcome::Stop;
                }
            }
        }

        if name_ref.resulting_type.is_none() {
            if let Some(symbol) = name_ref.symbol {
                match self.reference_type(symbol) {
                    Some(ty) => {
                        let NodeKind::NameReference(name_ref) = &mut node.kind else {
                            return Outcome::Stop;
                        };
                        name_ref.resulting_type = Some(ty);
                        self.progress = true;
                    }
                    None => {
                        // Overload sets are typed at their call site;
                        // anything else is still settling.
                        if !matches!(
                            self.ctx.symbols.symbol(symbol).kind,
                            SymbolKind::Function { .. } | SymbolKind::Label
                        ) {
                            self.defer();
                        }
                    }
                }
            }
        }

        Outcome::Stop
    }

    fn visit_member_access(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let anchor = node.first_token;
        let NodeKind::MemberAccess(member) = &mut node.kind else {
            return Outcome::Stop;
        };

        if member.symbol.is_none() {
            // Imports and type names resolve members through the symbol
            // itself; values resolve through their type.
            let base = match member.left.as_deref().and_then(|l| l.referenced_symbol()) {
                Some(s)
                    if matches!(
                        self.ctx.symbols.symbol(s).kind,
                        SymbolKind::Import { .. }
                            | SymbolKind::ClassType { .. }
                            | SymbolKind::Builtin { .. }
                            | SymbolKind::Typedef { .. }
                    ) =>
                {
                    Some(s)
                }
                _ => member.left.as_deref().and_then(|l| l.resulting_type()),
            };

            let Some(base) = base else {
                self.defer();
                return Outcome::Stop;
            };

            match self.ctx.symbols.get_member(base, member.member) {
                Some(found) => {
                    member.symbol = Some(found);
                    self.progress = true;
                }
                None => {
                    // Types without an `@assign` member are still
                    // assignable; the call hook types those directly.
                    if member.member == self.assign_method {
                        self.defer();
                    } else {
                        self.fail(
                            anchor,
                            format!("could not resolve member '{}'", member.member),
                        );
                    }
                    return Outcome::Stop;
                }
            }
        }

        if member.resulting_type.is_none() {
            if let Some(symbol) = member.symbol {
                match self.reference_type(symbol) {
                    Some(ty) => {
                        let NodeKind::MemberAccess(member) = &mut node.kind else {
                            return Outcome::Stop;
                        };
                        member.resulting_type = Some(ty);
                        self.progress = true;
                    }
                    None => {
                        if !matches!(
                            self.ctx.symbols.symbol(symbol).kind,
                            SymbolKind::Function { .. }
                        ) {
                            self.defer();
                        }
                    }
                }
            }
        }

        Outcome::Stop
    }

    fn visit_call(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);
        self.infer_assignment_target(node);

        let anchor = node.first_token;
        let NodeKind::Call(call) = &mut node.kind else {
            return Outcome::Stop;
        };
        if call.resulting_type.is_some() {
            return Outcome::Stop;
        }

        let Some(callee) = call.callee.as_deref() else {
            return Outcome::Stop;
        };
        let arg_types: Option<Vec<SymbolId>> =
            call.arguments.iter().map(|a| a.resulting_type()).collect();

        // Assignment to a place whose type carries no `@assign` member
        // (function values, class instances, `object`): the call takes
        // the place's type directly.
        if let NodeKind::MemberAccess(member) = &callee.kind {
            if member.member == self.assign_method && member.symbol.is_none() {
                if let Some(left_ty) = member.left.as_deref().and_then(|l| l.resulting_type()) {
                    let resolved = self.ctx.symbols.resolve_alias(left_ty);
                    if self
                        .ctx
                        .symbols
                        .get_member(resolved, self.assign_method)
                        .is_none()
                    {
                        let NodeKind::Call(call) = &mut node.kind else {
                            return Outcome::Stop;
                        };
                        call.resulting_type = Some(left_ty);
                        self.progress = true;
                        return Outcome::Stop;
                    }
                }
            }
        }

        // The callee's resolved symbol carries the overload set; a
        // plain function value only carries a function type.
        if let Some(target) = callee.referenced_symbol() {
            match &self.ctx.symbols.symbol(target).kind {
                SymbolKind::ConcreteFunction { ret, .. } => {
                    let ret = *ret;
                    if call.implementation.is_none() {
                        call.implementation = Some(target);
                        self.progress = true;
                    }
                    match ret {
                        Some(ty) => {
                            call.resulting_type = Some(ty);
                            self.progress = true;
                        }
                        None => self.defer(),
                    }
                    return Outcome::Stop;
                }
                SymbolKind::Function { .. } => {
                    let Some(args) = arg_types else {
                        self.defer();
                        return Outcome::Stop;
                    };
                    let (implementation, ret) = self.apply_overload(target, &args, anchor);
                    let NodeKind::Call(call) = &mut node.kind else {
                        return Outcome::Stop;
                    };
                    if let Some(implementation) = implementation {
                        call.implementation = Some(implementation);
                        self.progress = true;
                        match ret {
                            Some(ty) => {
                                call.resulting_type = Some(ty);
                            }
                            None => self.defer(),
                        }
                    }
                    return Outcome::Stop;
                }
                _ => {}
            }
        }

        let Some(callee_ty) = callee.resulting_type() else {
            self.defer();
            return Outcome::Stop;
        };
        let callee_ty = self.ctx.symbols.resolve_alias(callee_ty);

        match &self.ctx.symbols.symbol(callee_ty).kind {
            SymbolKind::FunctionType { ret, .. } => match *ret {
                Some(ty) => {
                    call.resulting_type = Some(ty);
                    self.progress = true;
                }
                None => self.defer(),
            },
            _ => {
                // Not a function: a `@call` member makes the value
                // callable.
                match self.ctx.symbols.get_member(callee_ty, self.call_method) {
                    Some(call_member)
                        if matches!(
                            self.ctx.symbols.symbol(call_member).kind,
                            SymbolKind::Function { .. }
                        ) =>
                    {
                        let Some(args) = arg_types else {
                            self.defer();
                            return Outcome::Stop;
                        };
                        let (implementation, ret) =
                            self.apply_overload(call_member, &args, anchor);
                        let NodeKind::Call(call) = &mut node.kind else {
                            return Outcome::Stop;
                        };
                        if let Some(implementation) = implementation {
                            call.implementation = Some(implementation);
                            self.progress = true;
                            match ret {
                                Some(ty) => {
                                    call.resulting_type = Some(ty);
                                }
                                None => self.defer(),
                            }
                        }
                    }
                    _ => self.fail(anchor, "cannot call this value".to_string()),
                }
            }
        }

        Outcome::Stop
    }

    fn visit_cast(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let NodeKind::Cast(cast) = &mut node.kind else {
            return Outcome::Stop;
        };
        if cast.resulting_type.is_some() {
            return Outcome::Stop;
        }

        match cast.target.as_deref().and_then(|t| match &t.kind {
            NodeKind::TypeReference(tr) => tr.symbol,
            _ => None,
        }) {
            Some(ty) => {
                cast.resulting_type = Some(ty);
                self.progress = true;
            }
            None => self.defer(),
        }

        Outcome::Stop
    }

    fn visit_index(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let anchor = node.first_token;
        let NodeKind::Index(index) = &mut node.kind else {
            return Outcome::Stop;
        };
        if index.resulting_type.is_some() {
            return Outcome::Stop;
        }

        let left_ty = index.left.as_deref().and_then(|l| l.resulting_type());
        let index_ty = index.index.as_deref().and_then(|i| i.resulting_type());
        let (Some(left_ty), Some(index_ty)) = (left_ty, index_ty) else {
            self.defer();
            return Outcome::Stop;
        };

        let left_ty = self.ctx.symbols.resolve_alias(left_ty);
        match self.ctx.symbols.get_member(left_ty, self.index_method) {
            Some(index_member)
                if matches!(
                    self.ctx.symbols.symbol(index_member).kind,
                    SymbolKind::Function { .. }
                ) =>
            {
                let (implementation, ret) =
                    self.apply_overload(index_member, &[index_ty], anchor);
                let NodeKind::Index(index) = &mut node.kind else {
                    return Outcome::Stop;
                };
                if let Some(implementation) = implementation {
                    index.implementation = Some(implementation);
                    self.progress = true;
                    match ret {
                        Some(ty) => {
                            index.resulting_type = Some(ty);
                        }
                        None => self.defer(),
                    }
                }
            }
            _ => self.fail(anchor, "cannot index this value".to_string()),
        }

        Outcome::Stop
    }

    fn visit_absolute_value(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);

        let NodeKind::AbsoluteValue(abs) = &mut node.kind else {
            return Outcome::Stop;
        };
        if abs.resulting_type.is_some() {
            return Outcome::Stop;
        }

        match abs.operand.as_deref().and_then(|o| o.resulting_type()) {
            Some(ty) => {
                abs.resulting_type = Some(ty);
                self.progress = true;
            }
            None => self.defer(),
        }

        Outcome::Stop
    }

    fn visit_tuple_literal(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);
        if node.resulting_type().is_none() {
            let object = self.ctx.symbols.builtins.object;
            node.set_resulting_type(object);
            self.progress = true;
        }
        Outcome::Stop
    }

    fn visit_dict_literal(&mut self, node: &mut AstNode) -> Outcome {
        walk_children(node, self);
        if node.resulting_type().is_none() {
            let object = self.ctx.symbols.builtins.object;
            node.set_resulting_type(object);
            self.progress = true;
        }
        Outcome::Stop
    }

    fn visit_type_reference(&mut self, node: &mut AstNode) -> Outcome {
        let anchor = node.first_token;
        let NodeKind::TypeReference(type_ref) = &mut node.kind else {
            return Outcome::Stop;
        };
        if type_ref.symbol.is_some() {
            return Outcome::Stop;
        }

        let first = type_ref.path[0];
        let Some(mut symbol) = self.stack.resolve(&self.ctx.symbols, first) else {
            self.fail(anchor, format!("could not resolve type name '{}'", first));
            return Outcome::Stop;
        };

        for &segment in &type_ref.path[1..] {
            match self.ctx.symbols.get_member(symbol, segment) {
                Some(next) => symbol = next,
                None => {
                    self.fail(anchor, format!("could not resolve member '{}'", segment));
                    return Outcome::Stop;
                }
            }
        }

        if !self.ctx.symbols.is_type(symbol) {
            let name = type_ref.path.last().copied().unwrap_or(first);
            self.fail(anchor, format!("'{}' is not a type", name));
            return Outcome::Stop;
        }

        type_ref.symbol = Some(self.ctx.symbols.resolve_alias(symbol));
        self.progress = true;
        Outcome::Stop
    }
}

/// Outcome of scanning a body for return statements.
enum Deduction {
    Known(SymbolId),
    Unknown,
    Conflict,
}

/// Collects the common type over every `return` in a body, stopping at
/// nested lambda and function boundaries.
struct ReturnTypeDeducer<'s> {
    symbols: &'s Symbols,
    void: SymbolId,
    found: Option<SymbolId>,
    incomplete: bool,
    conflict: bool,
}

impl<'s> ReturnTypeDeducer<'s> {
    fn new(symbols: &'s Symbols, void: SymbolId) -> Self {
        Self {
            symbols,
            void,
            found: None,
            incomplete: false,
            conflict: false,
        }
    }

    fn finish(self) -> Deduction {
        if self.conflict {
            Deduction::Conflict
        } else if self.incomplete {
            Deduction::Unknown
        } else {
            Deduction::Known(self.found.unwrap_or(self.void))
        }
    }
}

impl AstVisitor for ReturnTypeDeducer<'_> {
    fn visit_lambda(&mut self, _node: &mut AstNode) -> Outcome {
        Outcome::Stop
    }

    fn visit_function(&mut self, _node: &mut AstNode) -> Outcome {
        Outcome::Stop
    }

    fn visit_return(&mut self, node: &mut AstNode) -> Outcome {
        let NodeKind::Return(ret) = &node.kind else {
            return Outcome::Stop;
        };

        let ty = match ret.value.as_deref() {
            None => Some(self.void),
            Some(value) => value.resulting_type(),
        };

        match ty {
            None => self.incomplete = true,
            Some(ty) => match self.found {
                None => self.found = Some(ty),
                Some(previous) => match self.symbols.common_type(previous, ty) {
                    Some(common) => self.found = Some(common),
                    None => self.conflict = true,
                },
            },
        }

        Outcome::Stop
    }
}
