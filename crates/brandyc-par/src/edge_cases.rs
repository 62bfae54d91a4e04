//! Parser behaviors the grammar contract pins down.

use brandyc_lex::{tokenize, TokenKind};

use crate::ast::*;
use crate::{ParsedModule, Parser};

fn parse(source: &str) -> ParsedModule {
    let tokens = tokenize(source).expect("test source must lex");
    Parser::new(source, &tokens)
        .parse_module()
        .expect("test source must parse")
}

fn parse_err(source: &str) -> crate::ParseError {
    let tokens = tokenize(source).expect("test source must lex");
    Parser::new(source, &tokens)
        .parse_module()
        .expect_err("test source must fail to parse")
}

fn only_statement(module: &AstNode) -> &AstNode {
    match &module.kind {
        NodeKind::Module(m) => {
            assert_eq!(m.statements.len(), 1, "expected exactly one statement");
            &m.statements[0]
        }
        _ => panic!("root is not a module"),
    }
}

fn only_member(module: &AstNode) -> &AstNode {
    match &module.kind {
        NodeKind::Module(m) => {
            assert_eq!(m.members.len(), 1, "expected exactly one member");
            &m.members[0]
        }
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_empty_input_parses_to_empty_module() {
    let parsed = parse("");
    match &parsed.root.kind {
        NodeKind::Module(m) => {
            assert!(m.members.is_empty());
            assert!(m.statements.is_empty());
        }
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_comments_only_module_is_empty() {
    let parsed = parse("// nothing here\n/* still nothing */\n");
    match &parsed.root.kind {
        NodeKind::Module(m) => {
            assert!(m.members.is_empty());
            assert!(m.statements.is_empty());
        }
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_precedence_add_multiply() {
    let parsed = parse("1 + 2 * 3\n");
    let statement = only_statement(&parsed.root);
    match &statement.kind {
        NodeKind::BinaryOp(add) => {
            assert_eq!(add.op, TokenKind::Add);
            let right = add.right.as_ref().unwrap();
            match &right.kind {
                NodeKind::BinaryOp(mul) => assert_eq!(mul.op, TokenKind::Multiply),
                _ => panic!("right operand is not a multiply"),
            }
        }
        _ => panic!("statement is not a binary op"),
    }
}

#[test]
fn test_left_associativity() {
    let parsed = parse("a - b - c\n");
    let statement = only_statement(&parsed.root);
    match &statement.kind {
        NodeKind::BinaryOp(outer) => {
            assert_eq!(outer.op, TokenKind::Subtract);
            let left = outer.left.as_ref().unwrap();
            assert!(matches!(&left.kind, NodeKind::BinaryOp(inner) if inner.op == TokenKind::Subtract));
        }
        _ => panic!("statement is not a binary op"),
    }
}

#[test]
fn test_assignment_associates_right() {
    let parsed = parse("a = b = c\n");
    let statement = only_statement(&parsed.root);
    match &statement.kind {
        NodeKind::BinaryOp(outer) => {
            assert_eq!(outer.op, TokenKind::Assign);
            let right = outer.right.as_ref().unwrap();
            assert!(matches!(&right.kind, NodeKind::BinaryOp(inner) if inner.op == TokenKind::Assign));
        }
        _ => panic!("statement is not a binary op"),
    }
}

#[test]
fn test_post_expression_chain() {
    let parsed = parse("foo.bar(1)[2] as i32\n");
    let statement = only_statement(&parsed.root);
    // Outermost is the cast; peel inward: cast -> index -> call ->
    // member access -> name.
    let NodeKind::Cast(cast) = &statement.kind else {
        panic!("outermost is not a cast");
    };
    let NodeKind::Index(index) = &cast.left.as_ref().unwrap().kind else {
        panic!("cast operand is not an index");
    };
    let NodeKind::Call(call) = &index.left.as_ref().unwrap().kind else {
        panic!("index operand is not a call");
    };
    assert_eq!(call.arguments.len(), 1);
    let NodeKind::MemberAccess(member) = &call.callee.as_ref().unwrap().kind else {
        panic!("callee is not a member access");
    };
    assert!(matches!(
        member.left.as_ref().unwrap().kind,
        NodeKind::NameReference(_)
    ));
}

#[test]
fn test_newline_blocks_call_parens() {
    // `f` and `(1)` are separate statements: no newline is permitted
    // between a callee and its argument list.
    let parsed = parse("f\n(1)\n");
    match &parsed.root.kind {
        NodeKind::Module(m) => {
            assert_eq!(m.statements.len(), 2);
            assert!(matches!(m.statements[0].kind, NodeKind::NameReference(_)));
        }
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_operator_never_starts_a_line() {
    // With the operator on the next line the expression ends at `a`.
    let parsed = parse("a\n+ b\n");
    match &parsed.root.kind {
        NodeKind::Module(m) => {
            assert_eq!(m.statements.len(), 2);
            assert!(matches!(m.statements[0].kind, NodeKind::NameReference(_)));
            assert!(matches!(m.statements[1].kind, NodeKind::UnaryOp(_)));
        }
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_if_chain_is_linear() {
    let parsed = parse("if a { return 1 } elif b { return 2 } else { return 3 }\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::If(root) = &statement.kind else {
        panic!("statement is not an if");
    };
    assert!(root.condition.is_some());

    let elif = root.else_clause.as_ref().unwrap();
    let NodeKind::If(elif) = &elif.kind else {
        panic!("else clause is not an if node");
    };
    assert!(elif.condition.is_some());

    let tail = elif.else_clause.as_ref().unwrap();
    let NodeKind::If(tail) = &tail.kind else {
        panic!("chain tail is not an if node");
    };
    // The final else carries no condition.
    assert!(tail.condition.is_none());
    assert!(tail.else_clause.is_none());
}

#[test]
fn test_unless_normalizes_to_negated_if() {
    let parsed = parse("unless done { work() }\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::If(node) = &statement.kind else {
        panic!("statement is not an if");
    };
    let condition = node.condition.as_ref().unwrap();
    let NodeKind::UnaryOp(not) = &condition.kind else {
        panic!("condition is not a synthesized not");
    };
    assert_eq!(not.op, TokenKind::LogicalNot);
    // The synthesized node spans the original condition.
    let operand = not.operand.as_ref().unwrap();
    assert_eq!(condition.first_token, operand.first_token);
    assert_eq!(condition.last_token, operand.last_token);
}

#[test]
fn test_until_normalizes_to_negated_while() {
    let parsed = parse("until empty { drain() }\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::While(node) = &statement.kind else {
        panic!("statement is not a while");
    };
    assert!(matches!(
        node.condition.as_ref().unwrap().kind,
        NodeKind::UnaryOp(_)
    ));
}

#[test]
fn test_function_fat_arrow_builds_return_scope() {
    let parsed = parse("func f(a: i32, b: i32) => a + b\n");
    let member = only_member(&parsed.root);
    let NodeKind::Function(function) = &member.kind else {
        panic!("member is not a function");
    };
    assert_eq!(function.parameters.len(), 2);
    let NodeKind::Scope(scope) = &function.scope.as_ref().unwrap().kind else {
        panic!("function body is not a scope");
    };
    assert_eq!(scope.statements.len(), 1);
    let NodeKind::Return(ret) = &scope.statements[0].kind else {
        panic!("body statement is not a return");
    };
    assert!(matches!(
        ret.value.as_ref().unwrap().kind,
        NodeKind::BinaryOp(_)
    ));
}

#[test]
fn test_function_indented_body() {
    let parsed = parse("func f(a: i32) ->\n  return a\n");
    let member = only_member(&parsed.root);
    let NodeKind::Function(function) = &member.kind else {
        panic!("member is not a function");
    };
    let NodeKind::Scope(scope) = &function.scope.as_ref().unwrap().kind else {
        panic!("function body is not a scope");
    };
    assert_eq!(scope.statements.len(), 1);
}

#[test]
fn test_property_accessors() {
    let parsed = parse("property p: i32 { get => 1 set -> }\n");
    let member = only_member(&parsed.root);
    let NodeKind::Property(property) = &member.kind else {
        panic!("member is not a property");
    };
    assert!(property.ty.is_some());
    assert!(property.getter.is_some());
    assert!(property.setter.is_some());

    let NodeKind::Scope(getter) = &property.getter.as_ref().unwrap().kind else {
        panic!("getter is not a scope");
    };
    assert!(matches!(getter.statements[0].kind, NodeKind::Return(_)));
}

#[test]
fn test_property_setter_rejects_fat_arrow() {
    let err = parse_err("property p: i32 { set => 1 }\n");
    assert!(err.message.contains("setter"));
}

#[test]
fn test_orphan_attribute_list_is_error() {
    let err = parse_err("@[deprecated]\nx = 1\n");
    assert!(err.message.contains("attribute"));
}

#[test]
fn test_attributes_attach_to_function() {
    let parsed = parse("@[inline]\nfunc f => 1\n");
    let member = only_member(&parsed.root);
    let NodeKind::Function(function) = &member.kind else {
        panic!("member is not a function");
    };
    assert!(function.attributes.is_some());
}

#[test]
fn test_for_in_with_guard() {
    let parsed = parse("for x in items if x { use(x) }\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::For(node) = &statement.kind else {
        panic!("statement is not a for");
    };
    assert!(node.iterable.is_some());
    assert!(node.guard.is_some());
    assert!(node.start.is_none());
}

#[test]
fn test_for_from_to_every() {
    let parsed = parse("for i from 0 to 10 every 2 { use(i) }\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::For(node) = &statement.kind else {
        panic!("statement is not a for");
    };
    assert!(node.iterable.is_none());
    assert!(node.start.is_some());
    assert!(node.end.is_some());
    assert!(node.step.is_some());
}

#[test]
fn test_import_dotted_path_with_alias() {
    let parsed = parse("import core.io as io\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::Import(import) = &statement.kind else {
        panic!("statement is not an import");
    };
    assert_eq!(import.path.len(), 2);
    assert_eq!(import.effective_name().as_str(), "io");
}

#[test]
fn test_var_declaration() {
    let parsed = parse("var x = 1.5f\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::Var(var) = &statement.kind else {
        panic!("statement is not a var");
    };
    assert_eq!(var.name.as_str(), "x");
    let init = var.initial_value.as_ref().unwrap();
    assert!(matches!(
        &init.kind,
        NodeKind::Literal(l) if l.literal_kind == TokenKind::F32Literal
    ));
}

#[test]
fn test_tuple_and_dict_literals() {
    let parsed = parse("t = (1, 2)\nd = { 1: 2 }\ne = {}\n");
    match &parsed.root.kind {
        NodeKind::Module(m) => {
            assert_eq!(m.statements.len(), 3);
            let NodeKind::BinaryOp(t) = &m.statements[0].kind else {
                panic!("not an assignment");
            };
            assert!(matches!(
                t.right.as_ref().unwrap().kind,
                NodeKind::TupleLiteral(_)
            ));
            let NodeKind::BinaryOp(d) = &m.statements[1].kind else {
                panic!("not an assignment");
            };
            assert!(matches!(
                d.right.as_ref().unwrap().kind,
                NodeKind::DictLiteral(_)
            ));
            let NodeKind::BinaryOp(e) = &m.statements[2].kind else {
                panic!("not an assignment");
            };
            assert!(matches!(
                e.right.as_ref().unwrap().kind,
                NodeKind::DictLiteral(_)
            ));
        }
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_absolute_value() {
    let parsed = parse("m = |x - y|\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::BinaryOp(assign) = &statement.kind else {
        panic!("not an assignment");
    };
    assert!(matches!(
        assign.right.as_ref().unwrap().kind,
        NodeKind::AbsoluteValue(_)
    ));
}

#[test]
fn test_word_operators_share_kind_with_symbols() {
    let parsed = parse("ok = a and not b\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::BinaryOp(assign) = &statement.kind else {
        panic!("not an assignment");
    };
    let NodeKind::BinaryOp(and) = &assign.right.as_ref().unwrap().kind else {
        panic!("not a logical and");
    };
    assert_eq!(and.op, TokenKind::LogicalAnd);
    assert!(matches!(
        &and.right.as_ref().unwrap().kind,
        NodeKind::UnaryOp(not) if not.op == TokenKind::LogicalNot
    ));
}

#[test]
fn test_token_spans_nest() {
    let parsed = parse("x = 1 + 2\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::BinaryOp(assign) = &statement.kind else {
        panic!("not an assignment");
    };
    let right = assign.right.as_ref().unwrap();
    assert!(statement.first_token <= right.first_token);
    assert!(right.first_token <= right.last_token);
    assert!(right.last_token <= statement.last_token);
}

#[test]
fn test_typedef() {
    let parsed = parse("typedef Id = i32\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::Typedef(typedef) = &statement.kind else {
        panic!("statement is not a typedef");
    };
    assert_eq!(typedef.name.as_str(), "Id");
    assert!(typedef.target.is_some());
}

#[test]
fn test_missing_terminator_is_error() {
    let err = parse_err("a b\n");
    assert!(err.message.contains("semicolon or newline"));
}

#[test]
fn test_semicolon_separates_statements_on_one_line() {
    let parsed = parse("a; b\n");
    match &parsed.root.kind {
        NodeKind::Module(m) => assert_eq!(m.statements.len(), 2),
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_class_with_members() {
    let parsed = parse("class Point {\n  func x() i32 => 0\n  func y() i32 => 0\n}\n");
    let member = only_member(&parsed.root);
    let NodeKind::Class(class) = &member.kind else {
        panic!("member is not a class");
    };
    assert_eq!(class.name.as_str(), "Point");
    assert_eq!(class.members.len(), 2);
}

#[test]
fn test_class_extends() {
    let parsed = parse("class Circle extends Shape {\n}\n");
    let member = only_member(&parsed.root);
    let NodeKind::Class(class) = &member.kind else {
        panic!("member is not a class");
    };
    assert_eq!(class.base_classes.len(), 1);
}

#[test]
fn test_lambda_expression() {
    let parsed = parse("f = lambda (x: i32) => x\n");
    let statement = only_statement(&parsed.root);
    let NodeKind::BinaryOp(assign) = &statement.kind else {
        panic!("not an assignment");
    };
    let NodeKind::Lambda(lambda) = &assign.right.as_ref().unwrap().kind else {
        panic!("right side is not a lambda");
    };
    assert_eq!(lambda.parameters.len(), 1);
    assert!(lambda.scope.is_some());
}

#[test]
fn test_meta_block_parses() {
    let parsed = parse("meta {\n  x = 1\n}\n");
    let statement = only_statement(&parsed.root);
    assert!(matches!(statement.kind, NodeKind::MetaBlock(_)));
}

#[test]
fn test_goto_and_label() {
    let parsed = parse("label retry\ngoto retry\n");
    match &parsed.root.kind {
        NodeKind::Module(m) => {
            assert_eq!(m.statements.len(), 2);
            assert!(matches!(m.statements[0].kind, NodeKind::Label(_)));
            assert!(matches!(m.statements[1].kind, NodeKind::Goto(_)));
        }
        _ => panic!("root is not a module"),
    }
}
