//! Whole-pipeline behaviors, including the contract's concrete
//! scenarios.

use brandyc_par::{AstNode, NodeKind};
use brandyc_util::{Name, Severity};

use crate::symbol::SymbolKind;
use crate::{compile, Module};

fn compiled(source: &str) -> Module {
    compile("test.by", source)
}

fn clean(source: &str) -> Module {
    let module = compiled(source);
    assert!(
        module.is_clean(),
        "unexpected diagnostics: {:?}",
        module.handler.diagnostics()
    );
    module
}

fn statements(module: &Module) -> &[Box<AstNode>] {
    let root = module.root.as_ref().expect("module has a tree");
    match &root.kind {
        NodeKind::Module(m) => &m.statements,
        _ => panic!("root is not a module"),
    }
}

fn members(module: &Module) -> &[Box<AstNode>] {
    let root = module.root.as_ref().expect("module has a tree");
    match &root.kind {
        NodeKind::Module(m) => &m.members,
        _ => panic!("root is not a module"),
    }
}

#[test]
fn test_arithmetic_scenario() {
    // `1 + 2 * 3` resolves to an `@add` call whose argument is an
    // `@multiply` call; the whole expression is i32.
    let module = clean("1 + 2 * 3\n");
    let analysis = module.analysis.as_ref().unwrap();
    let statement = &statements(&module)[0];

    let NodeKind::Call(add) = &statement.kind else {
        panic!("statement is not a lowered call");
    };
    let NodeKind::MemberAccess(method) = &add.callee.as_ref().unwrap().kind else {
        panic!("callee is not a member access");
    };
    assert_eq!(method.member.as_str(), "@add");
    assert!(add.implementation.is_some());
    assert_eq!(
        statement.resulting_type(),
        Some(analysis.symbols.builtins.i32)
    );

    let NodeKind::Call(mul) = &add.arguments[0].kind else {
        panic!("argument is not a lowered call");
    };
    let NodeKind::MemberAccess(inner) = &mul.callee.as_ref().unwrap().kind else {
        panic!("inner callee is not a member access");
    };
    assert_eq!(inner.member.as_str(), "@multiply");
}

#[test]
fn test_var_scenario() {
    // `var x = 1.5f` produces a var symbol typed f32; the module table
    // holds exactly one entry keyed `x`.
    let module = clean("var x = 1.5f\n");
    let analysis = module.analysis.as_ref().unwrap();

    let table = analysis.symbols.table(analysis.module_table);
    assert_eq!(table.len(), 1);
    let x = table.get(Name::intern("x")).expect("x is declared");
    match &analysis.symbols.symbol(x).kind {
        SymbolKind::Variable { ty, implicit } => {
            assert_eq!(*ty, Some(analysis.symbols.builtins.f32));
            assert!(!implicit);
        }
        other => panic!("x is not a variable: {:?}", other),
    }
}

#[test]
fn test_function_return_rewrite_and_inference_scenario() {
    // `func f(a: i32, b: i32) -> a + b`: the body becomes a single
    // return of the lowered @add call, and the return type is inferred
    // as i32.
    let module = clean("func f(a: i32, b: i32) -> a + b\n");
    let analysis = module.analysis.as_ref().unwrap();

    let function = &members(&module)[0];
    let NodeKind::Function(f) = &function.kind else {
        panic!("member is not a function");
    };
    let NodeKind::Scope(scope) = &f.scope.as_ref().unwrap().kind else {
        panic!("body is not a scope");
    };
    assert_eq!(scope.statements.len(), 1);
    let NodeKind::Return(ret) = &scope.statements[0].kind else {
        panic!("body statement is not a return");
    };
    assert!(matches!(ret.value.as_ref().unwrap().kind, NodeKind::Call(_)));

    let concrete = analysis.declared[&function.id];
    match &analysis.symbols.symbol(concrete).kind {
        SymbolKind::ConcreteFunction { params, ret } => {
            let b = &analysis.symbols.builtins;
            assert_eq!(params.as_deref(), Some(&[b.i32, b.i32][..]));
            assert_eq!(*ret, Some(b.i32));
        }
        other => panic!("declared symbol is not concrete: {:?}", other),
    }
}

#[test]
fn test_property_free_value_scenario() {
    // In a getter, `value` is a free identifier: resolution reports an
    // unresolved name anchored at the `value` token.
    let module = compiled("property p: i32 { get => value }\n");
    assert!(module.handler.has_errors());

    let diagnostics = module.handler.diagnostics();
    let error = diagnostics
        .iter()
        .find(|d| d.message.contains("could not resolve name 'value'"))
        .expect("the free identifier is reported");
    assert_eq!(module.tokens[error.token_index].text(&module.source), "value");
}

#[test]
fn test_setter_value_parameter_resolves() {
    // The implicit setter parameter exists and carries the property's
    // type, so the setter body can use it.
    let module = clean("var sink = 0\nproperty p: i32 { get => 1 set -> sink = value }\n");
    let analysis = module.analysis.as_ref().unwrap();

    let property = members(&module)
        .iter()
        .find(|m| matches!(m.kind, NodeKind::Property(_)))
        .expect("property is a member");
    let value = analysis.setter_values[&property.id];
    match &analysis.symbols.symbol(value).kind {
        SymbolKind::Variable { ty, implicit } => {
            assert_eq!(*ty, Some(analysis.symbols.builtins.i32));
            assert!(implicit);
        }
        other => panic!("value is not a variable: {:?}", other),
    }
}

#[test]
fn test_branch_return_inference_scenario() {
    // Returning 1 and 2.0 from an inference-typed function yields the
    // common type f64.
    let module = clean("func pick(x: i32) ->\n  if x > 0 { return 1 } else { return 2.0 }\n");
    let analysis = module.analysis.as_ref().unwrap();

    let function = &members(&module)[0];
    let concrete = analysis.declared[&function.id];
    match &analysis.symbols.symbol(concrete).kind {
        SymbolKind::ConcreteFunction { ret, .. } => {
            assert_eq!(*ret, Some(analysis.symbols.builtins.f64));
        }
        other => panic!("declared symbol is not concrete: {:?}", other),
    }
}

#[test]
fn test_string_literal_scenario() {
    let module = clean("s = \"foo\\nbar\"\n");
    let analysis = module.analysis.as_ref().unwrap();

    // One string token of length 10, typed `string` after resolution.
    let string_token = module
        .tokens
        .iter()
        .find(|t| t.kind == brandyc_lex::TokenKind::StringLiteral)
        .expect("string literal token");
    assert_eq!(string_token.span.len, 10);

    let NodeKind::Call(assign) = &statements(&module)[0].kind else {
        panic!("statement is not a lowered assignment");
    };
    assert_eq!(
        assign.arguments[0].resulting_type(),
        Some(analysis.symbols.builtins.string)
    );
}

#[test]
fn test_implicit_declaration() {
    // First assignment to an unknown bare name declares it in the
    // innermost scope and types it from the value.
    let module = clean("y = 42\n");
    let analysis = module.analysis.as_ref().unwrap();

    let y = analysis
        .symbols
        .table(analysis.module_table)
        .get(Name::intern("y"))
        .expect("y is implicitly declared");
    match &analysis.symbols.symbol(y).kind {
        SymbolKind::Variable { ty, implicit } => {
            assert!(*implicit);
            assert_eq!(*ty, Some(analysis.symbols.builtins.i32));
        }
        other => panic!("y is not a variable: {:?}", other),
    }
}

#[test]
fn test_duplicate_definition_is_reported() {
    let module = compiled("var a = 1\nvar a = 2\n");
    assert!(module.handler.has_errors());
    assert!(module
        .handler
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("duplicate definition of 'a'")));
}

#[test]
fn test_builtin_print_call() {
    let module = clean("print(\"hello\")\n");
    let analysis = module.analysis.as_ref().unwrap();

    let NodeKind::Call(call) = &statements(&module)[0].kind else {
        panic!("statement is not a call");
    };
    assert!(call.implementation.is_some());
    assert_eq!(
        statements(&module)[0].resulting_type(),
        Some(analysis.symbols.builtins.void)
    );
}

#[test]
fn test_operator_not_supported_for_disjoint_types() {
    let module = compiled("t = \"a\" + 1\n");
    assert!(module.handler.has_errors());
    assert!(module
        .handler
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("operator not supported")));
}

#[test]
fn test_call_on_non_callable_is_reported() {
    let module = compiled("var n = 1\nn(2)\n");
    assert!(module.handler.has_errors());
    assert!(module
        .handler
        .diagnostics()
        .iter()
        .any(|d| d.message.contains("cannot call this value")));
}

#[test]
fn test_forward_reference_settles() {
    let module = clean("func caller() => helper(1)\nfunc helper(x: i32) => x + 1\n");
    let analysis = module.analysis.as_ref().unwrap();

    for member in members(&module) {
        let concrete = analysis.declared[&member.id];
        match &analysis.symbols.symbol(concrete).kind {
            SymbolKind::ConcreteFunction { ret, .. } => {
                assert_eq!(*ret, Some(analysis.symbols.builtins.i32));
            }
            other => panic!("declared symbol is not concrete: {:?}", other),
        }
    }
}

#[test]
fn test_typedef_is_transparent() {
    let module = clean("typedef Id = i32\nfunc f(x: Id) => x + 1\n");
    let analysis = module.analysis.as_ref().unwrap();

    let function = members(&module)
        .iter()
        .find(|m| matches!(m.kind, NodeKind::Function(_)))
        .expect("function member");
    let concrete = analysis.declared[&function.id];
    match &analysis.symbols.symbol(concrete).kind {
        SymbolKind::ConcreteFunction { params, ret } => {
            let b = &analysis.symbols.builtins;
            assert_eq!(params.as_deref(), Some(&[b.i32][..]));
            assert_eq!(*ret, Some(b.i32));
        }
        other => panic!("declared symbol is not concrete: {:?}", other),
    }
}

#[test]
fn test_lambda_value_is_callable() {
    let module = clean("f = lambda (x: i32) => x\ng = f(3)\n");
    let analysis = module.analysis.as_ref().unwrap();

    let g = analysis
        .symbols
        .table(analysis.module_table)
        .get(Name::intern("g"))
        .expect("g is declared");
    match &analysis.symbols.symbol(g).kind {
        SymbolKind::Variable { ty, .. } => {
            assert_eq!(*ty, Some(analysis.symbols.builtins.i32));
        }
        other => panic!("g is not a variable: {:?}", other),
    }
}

#[test]
fn test_ranged_loop_variable_is_typed() {
    let module = clean("for i from 0 to 10 every 2 { s = i }\n");
    let analysis = module.analysis.as_ref().unwrap();

    let for_node = &statements(&module)[0];
    let loop_var = analysis.declared[&for_node.id];
    match &analysis.symbols.symbol(loop_var).kind {
        SymbolKind::Variable { ty, .. } => {
            assert_eq!(*ty, Some(analysis.symbols.builtins.i32));
        }
        other => panic!("loop variable is not a variable: {:?}", other),
    }
}

#[test]
fn test_class_methods_and_common_base() {
    let module = clean(
        "class Shape {\n  func area() f64 => 0.0\n}\nclass Circle extends Shape {\n}\n",
    );
    let analysis = module.analysis.as_ref().unwrap();

    let shape = analysis
        .symbols
        .table(analysis.module_table)
        .get(Name::intern("Shape"))
        .expect("Shape declared");
    let circle = analysis
        .symbols
        .table(analysis.module_table)
        .get(Name::intern("Circle"))
        .expect("Circle declared");

    // Members resolve through the base chain.
    assert!(analysis
        .symbols
        .get_member(circle, Name::intern("area"))
        .is_some());
    // The common type of a class and its subclass is the base.
    assert_eq!(analysis.symbols.common_type(shape, circle), Some(shape));
}

#[test]
fn test_unresolved_name_is_reported_once_settled() {
    let module = compiled("q + 1\n");
    let diagnostics = module.handler.diagnostics();
    let count = diagnostics
        .iter()
        .filter(|d| d.message.contains("could not resolve name 'q'"))
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_lex_failure_is_terminal() {
    let module = compiled("ok\n\u{1}\n");
    assert!(module.handler.is_fatal());
    assert!(module.root.is_none());
    assert!(module
        .handler
        .diagnostics()
        .iter()
        .any(|d| d.severity == Severity::Terminal));
}

#[test]
fn test_parse_failure_stops_before_analysis() {
    let module = compiled("func f\n");
    assert!(module.handler.has_errors());
    assert!(!module.handler.is_fatal());
    assert!(module.root.is_none());
    assert!(module.analysis.is_none());
}

#[test]
fn test_empty_input_compiles_clean() {
    let module = clean("");
    assert!(statements(&module).is_empty());
    assert!(members(&module).is_empty());
}

#[test]
fn test_trailing_newline_is_appended() {
    let module = clean("x = 1");
    assert!(module.source.ends_with('\n'));

    // Round trip still covers the amended buffer.
    let rebuilt: String = module
        .tokens
        .iter()
        .map(|t| t.text(&module.source))
        .collect();
    assert_eq!(rebuilt, module.source);
}

#[test]
fn test_deterministic_output() {
    let source = "func f(a: i32) -> a * 2\nvar x = f(21)\nif x > 0 { print(\"big\") }\n";
    let first = clean(source);
    let second = clean(source);
    assert_eq!(
        format!("{:?}", first.root.as_ref().unwrap()),
        format!("{:?}", second.root.as_ref().unwrap())
    );
}

#[test]
fn test_meta_block_participates_in_resolution() {
    let module = clean("meta {\n  m = 1\n}\n");
    let analysis = module.analysis.as_ref().unwrap();

    // The meta scope resolved its implicit declaration like any other
    // scope.
    let NodeKind::MetaBlock(meta) = &statements(&module)[0].kind else {
        panic!("statement is not a meta block");
    };
    let scope = meta.scope.as_ref().unwrap();
    let table = analysis.scope_tables[&scope.id];
    assert!(analysis
        .symbols
        .table(table)
        .get(Name::intern("m"))
        .is_some());
}

#[test]
fn test_unless_condition_resolves_to_bool() {
    let module = clean("var flag = true\nunless flag { print(\"off\") }\n");
    let analysis = module.analysis.as_ref().unwrap();

    let unless = statements(&module)
        .iter()
        .find(|s| matches!(s.kind, NodeKind::If(_)))
        .expect("normalized if statement");
    let NodeKind::If(node) = &unless.kind else {
        unreachable!();
    };
    // The synthesized not lowers to a @logical_not call returning bool.
    assert_eq!(
        node.condition.as_ref().unwrap().resulting_type(),
        Some(analysis.symbols.builtins.bool)
    );
}
