//! Declaration rules: attributes, functions, classes, properties,
//! parameters, variables, typedefs, imports, labels.

use brandyc_lex::TokenKind;

use crate::ast::*;
use crate::{ParseError, Parsed, Parser};

impl<'a> Parser<'a> {
    /// A declaration at the current indent level: an optional attribute
    /// list followed by a function, class, or property. An attribute
    /// list with no symbol after it is an error.
    pub(crate) fn accept_symbol(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            if !p.accept_indent() {
                return Ok(None);
            }

            let attributes = p.accept_attributes()?;

            if let Some(mut node) = p.accept_function()? {
                attach_attributes(&mut node, attributes);
                return Ok(Some(node));
            }
            if let Some(mut node) = p.accept_class()? {
                attach_attributes(&mut node, attributes);
                return Ok(Some(node));
            }
            if let Some(mut node) = p.accept_property()? {
                attach_attributes(&mut node, attributes);
                return Ok(Some(node));
            }

            if attributes.is_some() {
                Err(p.error_here("attribute list is missing a symbol to attach to"))
            } else {
                Ok(None)
            }
        })
    }

    /// `@[ expr, … ]`
    pub(crate) fn accept_attributes(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::AttributeStart) {
                return Ok(None);
            }

            let mut values = Vec::new();
            if p.accept(TokenKind::CloseBracket) {
                return Ok(Some(
                    p.finish_node(first, NodeKind::Attribute(AttributeNode { values })),
                ));
            }

            loop {
                match p.accept_expression()? {
                    Some(value) => values.push(value),
                    None => return Err(p.error_here("expected an expression in attribute list")),
                }
                if !p.accept(TokenKind::Comma) {
                    break;
                }
            }
            p.expect(TokenKind::CloseBracket)?;

            Ok(Some(
                p.finish_node(first, NodeKind::Attribute(AttributeNode { values })),
            ))
        })
    }

    /// `func name(params) [type] -> scope` or `=> expr`. The `=>` form
    /// builds the one-return scope directly.
    pub(crate) fn accept_function(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            let is_method = if p.accept(TokenKind::Function) {
                false
            } else if p.accept(TokenKind::Method) {
                true
            } else {
                return Ok(None);
            };

            p.expect(TokenKind::Identifier)?;
            let name = p.token_name(p.last_accepted());

            let parameters = p.accept_parameter_list()?;
            let return_type = p.accept_type()?;

            if p.accept(TokenKind::ArrowRight) {
                let doc = p.accept_doc();
                let scope = p.accept_scope()?;
                Ok(Some(p.finish_node(
                    first,
                    NodeKind::Function(FunctionNode {
                        name,
                        doc,
                        attributes: None,
                        is_method,
                        parameters,
                        return_type,
                        scope: Some(scope),
                    }),
                )))
            } else if p.accept(TokenKind::FatArrowRight) {
                let doc = p.accept_doc();
                let scope = p.accept_expression_scope()?;
                Ok(Some(p.finish_node(
                    first,
                    NodeKind::Function(FunctionNode {
                        name,
                        doc,
                        attributes: None,
                        is_method,
                        parameters,
                        return_type,
                        scope: Some(scope),
                    }),
                )))
            } else {
                Err(p.error_here("expected an arrow (-> or =>) after the function header"))
            }
        })
    }

    /// `(name: type [= default], …)`; missing parens mean no
    /// parameters.
    pub(crate) fn accept_parameter_list(&mut self) -> Result<Vec<Box<AstNode>>, ParseError> {
        let mut parameters = Vec::new();
        if !self.accept(TokenKind::OpenParen) {
            return Ok(parameters);
        }
        if self.accept(TokenKind::CloseParen) {
            return Ok(parameters);
        }

        loop {
            match self.accept_parameter()? {
                Some(parameter) => parameters.push(parameter),
                None => return Err(self.error_here("expected a parameter")),
            }
            if !self.accept(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::CloseParen)?;
        Ok(parameters)
    }

    /// `name: type [= default]`
    pub(crate) fn accept_parameter(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            if !p.accept(TokenKind::Identifier) {
                return Ok(None);
            }
            let first = p.last_accepted();
            let name = p.token_name(first);

            p.expect(TokenKind::Colon)?;
            let ty = match p.accept_type()? {
                Some(ty) => ty,
                None => return Err(p.error_here("expected a type following : in parameter")),
            };

            let default_value = if p.accept(TokenKind::Assign) {
                match p.accept_expression()? {
                    Some(value) => Some(value),
                    None => {
                        return Err(p.error_here("expected a default value following = in parameter"))
                    }
                }
            } else {
                None
            };

            Ok(Some(p.finish_node(
                first,
                NodeKind::Parameter(ParameterNode {
                    name,
                    ty: Some(ty),
                    default_value,
                }),
            )))
        })
    }

    /// `class Name [extends Base, …]` followed by a member scope,
    /// braced or indented.
    pub(crate) fn accept_class(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Class) {
                return Ok(None);
            }

            p.expect(TokenKind::Identifier)?;
            let name = p.token_name(p.last_accepted());

            let mut base_classes = Vec::new();
            if p.accept(TokenKind::Extends) {
                loop {
                    match p.accept_type()? {
                        Some(base) => base_classes.push(base),
                        None => return Err(p.error_here("expected a base class name")),
                    }
                    if !p.accept(TokenKind::Comma) {
                        break;
                    }
                }
            }

            let doc = p.accept_doc();

            let mut members = Vec::new();
            if p.accept(TokenKind::OpenCurly) {
                p.indented(|p| {
                    while let Some(member) = p.accept_symbol()? {
                        members.push(member);
                    }
                    Ok(())
                })?;
                p.expect(TokenKind::CloseCurly)?;
            } else {
                p.indented(|p| {
                    while let Some(member) = p.accept_symbol()? {
                        members.push(member);
                    }
                    Ok(())
                })?;
            }

            Ok(Some(p.finish_node(
                first,
                NodeKind::Class(ClassNode {
                    name,
                    doc,
                    attributes: None,
                    base_classes,
                    members,
                }),
            )))
        })
    }

    /// `property name [: type]` with `get` and/or `set` accessors in
    /// either order. `get` takes `->` or `=>`; `set` takes `->` only.
    pub(crate) fn accept_property(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Property) {
                return Ok(None);
            }

            p.expect(TokenKind::Identifier)?;
            let name = p.token_name(p.last_accepted());

            let ty = if p.accept(TokenKind::Colon) {
                match p.accept_type()? {
                    Some(ty) => Some(ty),
                    None => {
                        return Err(p.error_here(
                            "expected a type name following the colon in property definition",
                        ))
                    }
                }
            } else {
                None
            };

            let doc = p.accept_doc();

            let braced = p.accept(TokenKind::OpenCurly);

            let (getter, setter) = p.indented(|p| {
                let mut getter = None;
                let mut setter = None;
                let mut got_set = false;

                if p.accept(TokenKind::Set) {
                    got_set = true;
                    setter = Some(p.accept_setter_scope()?);
                }

                if p.accept(TokenKind::Get) {
                    if p.accept(TokenKind::ArrowRight) {
                        getter = Some(p.accept_scope()?);
                    } else if p.accept(TokenKind::FatArrowRight) {
                        getter = Some(p.accept_expression_scope()?);
                    } else {
                        return Err(p.error_here(
                            "expected a -> or => after 'get' in property definition",
                        ));
                    }
                }

                if !got_set && p.accept(TokenKind::Set) {
                    setter = Some(p.accept_setter_scope()?);
                }

                Ok((getter, setter))
            })?;

            if braced {
                p.expect(TokenKind::CloseCurly)?;
            }

            Ok(Some(p.finish_node(
                first,
                NodeKind::Property(PropertyNode {
                    name,
                    doc,
                    attributes: None,
                    ty,
                    getter,
                    setter,
                }),
            )))
        })
    }

    /// Setter body. `=>` is explicitly rejected: a setter has no value
    /// to return.
    fn accept_setter_scope(&mut self) -> Result<Box<AstNode>, ParseError> {
        if self.accept(TokenKind::ArrowRight) {
            self.accept_scope()
        } else if self.accept(TokenKind::FatArrowRight) {
            Err(self.error_here("a property setter cannot use =>, use -> instead"))
        } else {
            Err(self.error_here("expected a -> after 'set' in property definition"))
        }
    }

    /// `var name [: type] [= expr]`; at least one of the type and the
    /// initializer must be present.
    pub(crate) fn accept_var(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Var) {
                return Ok(None);
            }

            p.expect(TokenKind::Identifier)?;
            let name = p.token_name(p.last_accepted());

            let ty = if p.accept(TokenKind::Colon) {
                match p.accept_type()? {
                    Some(ty) => Some(ty),
                    None => {
                        return Err(p.error_here("expected a type following : in variable"))
                    }
                }
            } else {
                None
            };

            let initial_value = if p.accept(TokenKind::Assign) {
                match p.accept_expression()? {
                    Some(value) => Some(value),
                    None => return Err(p.error_here("expected an initializer following =")),
                }
            } else {
                None
            };

            if ty.is_none() && initial_value.is_none() {
                return Err(p.error_here("a variable needs a type or an initializer"));
            }

            Ok(Some(p.finish_node(
                first,
                NodeKind::Var(VarNode {
                    name,
                    attributes: None,
                    ty,
                    initial_value,
                }),
            )))
        })
    }

    /// `typedef Name = type`
    pub(crate) fn accept_typedef(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Typedef) {
                return Ok(None);
            }

            p.expect(TokenKind::Identifier)?;
            let name = p.token_name(p.last_accepted());

            p.expect(TokenKind::Assign)?;
            let target = match p.accept_type()? {
                Some(target) => target,
                None => return Err(p.error_here("expected a type after = in typedef")),
            };

            Ok(Some(p.finish_node(
                first,
                NodeKind::Typedef(TypedefNode {
                    name,
                    target: Some(target),
                }),
            )))
        })
    }

    /// `import a.b.c [as alias]`
    pub(crate) fn accept_import(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Import) {
                return Ok(None);
            }

            p.expect(TokenKind::Identifier)?;
            let mut path = vec![p.token_name(p.last_accepted())];
            while p.accept(TokenKind::Dot) {
                p.expect(TokenKind::Identifier)?;
                path.push(p.token_name(p.last_accepted()));
            }

            let alias = if p.accept(TokenKind::As) {
                p.expect(TokenKind::Identifier)?;
                Some(p.token_name(p.last_accepted()))
            } else {
                None
            };

            Ok(Some(
                p.finish_node(first, NodeKind::Import(ImportNode { path, alias })),
            ))
        })
    }

    /// `label name`
    pub(crate) fn accept_label(&mut self) -> Parsed<Box<AstNode>> {
        self.speculate(|p| {
            let first = p.mark();
            if !p.accept(TokenKind::Label) {
                return Ok(None);
            }

            p.expect(TokenKind::Identifier)?;
            let name = p.token_name(p.last_accepted());

            Ok(Some(
                p.finish_node(first, NodeKind::Label(LabelNode { name })),
            ))
        })
    }

    /// A doc block directly following a declaration header.
    pub(crate) fn accept_doc(&mut self) -> Option<usize> {
        if self.accept(TokenKind::DocBlock) {
            Some(self.last_accepted())
        } else {
            None
        }
    }

    /// A `=>`-style body: a scope holding one return of the following
    /// expression.
    pub(crate) fn accept_expression_scope(&mut self) -> Result<Box<AstNode>, ParseError> {
        let first = self.mark();
        let value = match self.accept_expression()? {
            Some(value) => value,
            None => return Err(self.error_here("expected an expression after =>")),
        };
        let ret = self.finish_node(first, NodeKind::Return(ReturnNode { value: Some(value) }));
        Ok(self.finish_node(
            first,
            NodeKind::Scope(ScopeNode {
                statements: vec![ret],
            }),
        ))
    }

    /// Run a parse step one indentation level deeper.
    pub(crate) fn indented<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }
}

/// Hang a parsed attribute list off the declaration it precedes.
fn attach_attributes(node: &mut AstNode, attributes: Option<Box<AstNode>>) {
    if attributes.is_none() {
        return;
    }
    match &mut node.kind {
        NodeKind::Function(n) => n.attributes = attributes,
        NodeKind::Class(n) => n.attributes = attributes,
        NodeKind::Property(n) => n.attributes = attributes,
        NodeKind::Var(n) => n.attributes = attributes,
        _ => {}
    }
}
