//! Symbol-table fill pass.
//!
//! A pre-order traversal maintaining the scope-table stack. Entering a
//! module, class, scope, or function/lambda body pushes the node's
//! table; leaving pops it. Named declarations insert into the top
//! table, with duplicates in the same scope reported. Two extra rules:
//! a lowered `@assign` whose receiver is a bare unresolved name creates
//! an implicit variable in the innermost scope, and property setters
//! gain an implicit `value` parameter.

use brandyc_par::{walk_children, AstNode, AstVisitor, NodeId, NodeKind, Outcome};
use brandyc_util::{Handler, Name, SymbolId, TableId};

use crate::analysis::Analysis;
use crate::ops::OperatorMethod;
use crate::scope::ScopeStack;
use crate::symbol::{Symbol, SymbolKind};

/// The symbol-table filler. Run it over the module root with
/// [`brandyc_par::walk_ref`] after operator lowering.
pub struct SymbolFiller<'a> {
    ctx: &'a mut Analysis,
    handler: &'a Handler,
    stack: ScopeStack,
    assign_method: Name,
    value_name: Name,
}

impl<'a> SymbolFiller<'a> {
    pub fn new(ctx: &'a mut Analysis, handler: &'a Handler) -> Self {
        let stack = ScopeStack::new(ctx.symbols.builtins.table);
        Self {
            ctx,
            handler,
            stack,
            assign_method: OperatorMethod::Assign.interned(),
            value_name: Name::intern("value"),
        }
    }

    /// Allocate and push the table for a scope-introducing node.
    fn enter_scope(&mut self, node: NodeId) -> TableId {
        let table = self.ctx.symbols.alloc_table();
        self.ctx.scope_tables.insert(node, table);
        self.stack.push(table);
        table
    }

    /// Insert a symbol into the innermost table, reporting duplicates.
    /// The declaration is recorded either way so resolution can still
    /// reason about the node.
    fn declare(&mut self, node_id: NodeId, anchor: usize, name: Name, kind: SymbolKind) -> SymbolId {
        let id = self.ctx.symbols.alloc(Symbol {
            name,
            node: Some(node_id),
            kind,
        });

        let table = self.stack.innermost();
        if !self.ctx.symbols.table_mut(table).insert(name, id) {
            self.handler.error(
                anchor,
                format!("duplicate definition of '{}' in this scope", name),
            );
        }
        self.ctx.declared.insert(node_id, id);
        id
    }

    /// Functions insert into an overload set keyed by name; a second
    /// function of the same name extends the set rather than colliding.
    fn declare_function(&mut self, node_id: NodeId, anchor: usize, name: Name) -> SymbolId {
        let concrete = self.ctx.symbols.alloc(Symbol {
            name,
            node: Some(node_id),
            kind: SymbolKind::ConcreteFunction {
                params: None,
                ret: None,
            },
        });

        let table = self.stack.innermost();
        match self.ctx.symbols.table(table).get(name) {
            Some(existing) => {
                match &mut self.ctx.symbols.symbol_mut(existing).kind {
                    SymbolKind::Function { overloads } => overloads.push(concrete),
                    _ => self.handler.error(
                        anchor,
                        format!("duplicate definition of '{}' in this scope", name),
                    ),
                }
            }
            None => {
                let function = self.ctx.symbols.alloc(Symbol {
                    name,
                    node: None,
                    kind: SymbolKind::Function {
                        overloads: vec![concrete],
                    },
                });
                self.ctx.symbols.table_mut(table).insert(name, function);
            }
        }

        self.ctx.declared.insert(node_id, concrete);
        concrete
    }

    /// Declare parameters into the (already pushed) body table and walk
    /// the body's children.
    fn fill_body(&mut self, parameters: &mut [Box<AstNode>], scope: Option<&mut Box<AstNode>>) {
        for parameter in parameters.iter_mut() {
            if let NodeKind::Parameter(p) = &parameter.kind {
                self.declare(
                    parameter.id,
                    parameter.first_token,
                    p.name,
                    SymbolKind::Variable {
                        ty: None,
                        implicit: false,
                    },
                );
            }
            // Default values may declare (lambdas, implicit assigns).
            walk_children(parameter, self);
        }

        if let Some(scope) = scope {
            walk_children(scope, self);
        }
    }
}

impl AstVisitor for SymbolFiller<'_> {
    fn visit_module(&mut self, node: &mut AstNode) -> Outcome {
        let table = self.enter_scope(node.id);
        self.ctx.module_table = table;
        walk_children(node, self);
        self.stack.pop();
        Outcome::Stop
    }

    fn visit_scope(&mut self, node: &mut AstNode) -> Outcome {
        self.enter_scope(node.id);
        walk_children(node, self);
        self.stack.pop();
        Outcome::Stop
    }

    fn visit_class(&mut self, node: &mut AstNode) -> Outcome {
        let NodeKind::Class(class) = &node.kind else {
            return Outcome::Resume;
        };
        let name = class.name;

        let members = self.ctx.symbols.alloc_table();
        self.declare(
            node.id,
            node.first_token,
            name,
            SymbolKind::ClassType {
                base: None,
                members,
            },
        );

        self.ctx.scope_tables.insert(node.id, members);
        self.stack.push(members);
        walk_children(node, self);
        self.stack.pop();
        Outcome::Stop
    }

    fn visit_function(&mut self, node: &mut AstNode) -> Outcome {
        let NodeKind::Function(function) = &node.kind else {
            return Outcome::Resume;
        };
        self.declare_function(node.id, node.first_token, function.name);

        let NodeKind::Function(function) = &mut node.kind else {
            return Outcome::Stop;
        };

        // Attributes and the return type resolve in the enclosing
        // scope; parameters belong to the body.
        if let Some(attributes) = &mut function.attributes {
            walk_children(attributes, self);
        }

        let scope_id = match &function.scope {
            Some(scope) => scope.id,
            None => return Outcome::Stop,
        };
        self.enter_scope(scope_id);
        self.fill_body(&mut function.parameters, function.scope.as_mut());
        self.stack.pop();

        Outcome::Stop
    }

    fn visit_lambda(&mut self, node: &mut AstNode) -> Outcome {
        let NodeKind::Lambda(lambda) = &mut node.kind else {
            return Outcome::Resume;
        };

        let scope_id = match &lambda.scope {
            Some(scope) => scope.id,
            None => return Outcome::Stop,
        };
        self.enter_scope(scope_id);
        self.fill_body(&mut lambda.parameters, lambda.scope.as_mut());
        self.stack.pop();

        Outcome::Stop
    }

    fn visit_parameter(&mut self, _node: &mut AstNode) -> Outcome {
        // Parameters are declared by their owning function or lambda.
        Outcome::Resume
    }

    fn visit_var(&mut self, node: &mut AstNode) -> Outcome {
        if let NodeKind::Var(var) = &node.kind {
            self.declare(
                node.id,
                node.first_token,
                var.name,
                SymbolKind::Variable {
                    ty: None,
                    implicit: false,
                },
            );
        }
        Outcome::Resume
    }

    fn visit_label(&mut self, node: &mut AstNode) -> Outcome {
        if let NodeKind::Label(label) = &node.kind {
            self.declare(node.id, node.first_token, label.name, SymbolKind::Label);
        }
        Outcome::Resume
    }

    fn visit_property(&mut self, node: &mut AstNode) -> Outcome {
        let NodeKind::Property(property) = &node.kind else {
            return Outcome::Resume;
        };
        self.declare(
            node.id,
            node.first_token,
            property.name,
            SymbolKind::Property { ty: None },
        );

        let NodeKind::Property(property) = &mut node.kind else {
            return Outcome::Stop;
        };

        if let Some(attributes) = &mut property.attributes {
            walk_children(attributes, self);
        }

        if let Some(getter) = &mut property.getter {
            let id = getter.id;
            self.enter_scope(id);
            walk_children(getter, self);
            self.stack.pop();
        }

        if let Some(setter) = &mut property.setter {
            let id = setter.id;
            self.enter_scope(id);
            // The setter receives the assigned value through an
            // implicit `value` parameter.
            let value = self.declare(
                id,
                node.first_token,
                self.value_name,
                SymbolKind::Variable {
                    ty: None,
                    implicit: true,
                },
            );
            self.ctx.setter_values.insert(node.id, value);
            walk_children(setter, self);
            self.stack.pop();
        }

        Outcome::Stop
    }

    fn visit_import(&mut self, node: &mut AstNode) -> Outcome {
        if let NodeKind::Import(import) = &node.kind {
            self.declare(
                node.id,
                node.first_token,
                import.effective_name(),
                SymbolKind::Import { target: None },
            );
        }
        Outcome::Resume
    }

    fn visit_typedef(&mut self, node: &mut AstNode) -> Outcome {
        if let NodeKind::Typedef(typedef) = &node.kind {
            self.declare(
                node.id,
                node.first_token,
                typedef.name,
                SymbolKind::Typedef { target: None },
            );
        }
        Outcome::Resume
    }

    fn visit_for(&mut self, node: &mut AstNode) -> Outcome {
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
            brandyc_par::walk_opt(slot, self);
        }

        let name = for_node.name;
        let scope_id = match &for_node.scope {
            Some(scope) => scope.id,
            None => return Outcome::Stop,
        };
        self.enter_scope(scope_id);
        self.declare(
            node.id,
            node.first_token,
            name,
            SymbolKind::Variable {
                ty: None,
                implicit: true,
            },
        );

        let NodeKind::For(for_node) = &mut node.kind else {
            return Outcome::Stop;
        };
        if let Some(scope) = &mut for_node.scope {
            walk_children(scope, self);
        }
        self.stack.pop();

        Outcome::Stop
    }

    fn visit_call(&mut self, node: &mut AstNode) -> Outcome {
        // First assignment to an unknown bare name declares it in the
        // innermost scope. Assignments are calls by now: the receiver
        // of `@assign` is the assigned place.
        let NodeKind::Call(call) = &node.kind else {
            return Outcome::Resume;
        };
        let Some(callee) = &call.callee else {
            return Outcome::Resume;
        };
        let NodeKind::MemberAccess(member) = &callee.kind else {
            return Outcome::Resume;
        };
        if member.member != self.assign_method {
            return Outcome::Resume;
        }
        let Some(left) = &member.left else {
            return Outcome::Resume;
        };
        let NodeKind::NameReference(name_ref) = &left.kind else {
            return Outcome::Resume;
        };

        let name = name_ref.name;
        if !self.stack.resolves_anywhere(&self.ctx.symbols, name) {
            let target_id = left.id;
            let anchor = left.first_token;
            self.declare(
                target_id,
                anchor,
                name,
                SymbolKind::Variable {
                    ty: None,
                    implicit: true,
                },
            );
        }

        Outcome::Resume
    }
}
