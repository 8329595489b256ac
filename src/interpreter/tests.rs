//! End-to-end evaluation tests: build a Program, run it, check the value.

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::ast::{BinaryOp, Block, ClassDecl, Expr, MethodDecl, Program, Stmt, UnaryOp};
use crate::interpreter::value::NativeFunction;
use crate::interpreter::{Interpreter, Value};

fn run(statements: Vec<Stmt>) -> Value {
    Interpreter::new().eval_program(&Program::new(statements))
}

fn let_stmt(name: &str, value: Expr) -> Stmt {
    Stmt::Let {
        name: name.to_string(),
        value,
    }
}

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

fn number(n: f64) -> Expr {
    Expr::Number(n)
}

fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}

fn assign(target: Expr, value: Expr) -> Expr {
    Expr::Assign {
        target: Box::new(target),
        value: Box::new(value),
    }
}

fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        arguments,
    }
}

fn attr(object: Expr, name: &str) -> Expr {
    Expr::Attr {
        object: Box::new(object),
        name: name.to_string(),
    }
}

fn index(object: Expr, idx: Expr) -> Expr {
    Expr::Index {
        object: Box::new(object),
        index: Box::new(idx),
    }
}

fn block(statements: Vec<Stmt>) -> Block {
    Block::new(statements)
}

fn expect_error(value: Value, substring: &str) {
    match value {
        Value::Error(reason) => {
            let reason = reason.to_string();
            assert!(
                reason.contains(substring),
                "error {:?} does not mention {:?}",
                reason,
                substring
            );
        }
        other => panic!("expected an error containing {:?}, got {}", substring, other),
    }
}

#[test]
fn arithmetic_and_comparison() {
    let value = run(vec![Stmt::Expression(binary(
        binary(number(2.0), BinaryOp::Add, number(3.0)),
        BinaryOp::Multiply,
        number(4.0),
    ))]);
    assert_eq!(value, Value::Number(20.0));

    let value = run(vec![Stmt::Expression(binary(
        number(2.0),
        BinaryOp::Less,
        number(3.0),
    ))]);
    assert_eq!(value, Value::Bool(true));
}

#[test]
fn string_concat_and_compare() {
    let value = run(vec![Stmt::Expression(binary(
        Expr::Str("foo".into()),
        BinaryOp::Add,
        Expr::Str("bar".into()),
    ))]);
    assert_eq!(value, Value::string("foobar"));

    let value = run(vec![Stmt::Expression(binary(
        Expr::Str("a".into()),
        BinaryOp::Less,
        Expr::Str("b".into()),
    ))]);
    assert_eq!(value, Value::Bool(true));
}

#[test]
fn type_mismatch_names_both_kinds() {
    let value = run(vec![Stmt::Expression(binary(
        number(1.0),
        BinaryOp::Add,
        Expr::Str("x".into()),
    ))]);
    expect_error(value, "type mismatch: number + string");
}

#[test]
fn negating_a_non_number_raises() {
    let value = run(vec![Stmt::Expression(Expr::Unary {
        operator: UnaryOp::Negate,
        operand: Box::new(Expr::Str("x".into())),
    })]);
    expect_error(value, "unknown operator: -string");
}

#[test]
fn undefined_name_raises() {
    let value = run(vec![Stmt::Expression(ident("ghost"))]);
    expect_error(value, "undefined name: ghost");
}

#[test]
fn assignment_without_declaration_is_an_error() {
    let value = run(vec![Stmt::Expression(assign(ident("x"), number(1.0)))]);
    expect_error(value, "undefined name: x");
}

// A declaration-free block runs in the enclosing scope, so the assignment
// escapes. A block that declares gets its own scope and the shadow stays
// local.
#[test]
fn block_scoping_is_lazy() {
    let value = run(vec![
        let_stmt("x", number(0.0)),
        Stmt::Expression(Expr::Block(block(vec![Stmt::Expression(assign(
            ident("x"),
            number(1.0),
        ))]))),
        Stmt::Expression(ident("x")),
    ]);
    assert_eq!(value, Value::Number(1.0));

    let value = run(vec![
        let_stmt("x", number(0.0)),
        Stmt::Expression(Expr::Block(block(vec![
            let_stmt("x", number(99.0)),
            Stmt::Expression(assign(ident("x"), number(100.0))),
        ]))),
        Stmt::Expression(ident("x")),
    ]);
    assert_eq!(value, Value::Number(0.0));
}

#[test]
fn statements_before_the_first_let_see_the_outer_scope() {
    // An assignment before the block's first `let` still escapes.
    let value = run(vec![
        let_stmt("x", number(0.0)),
        Stmt::Expression(Expr::Block(block(vec![
            Stmt::Expression(assign(ident("x"), number(7.0))),
            let_stmt("x", number(99.0)),
        ]))),
        Stmt::Expression(ident("x")),
    ]);
    assert_eq!(value, Value::Number(7.0));
}

/// A native that records whether it was ever called.
fn explode() -> (Value, Rc<Cell<bool>>) {
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let native = Value::Native(Rc::new(NativeFunction::new("explode", None, move |_, _| {
        flag.set(true);
        Value::Nil
    })));
    (native, fired)
}

#[test]
fn and_or_short_circuit() {
    let (native, fired) = explode();
    let mut interpreter = Interpreter::new();
    interpreter
        .globals()
        .borrow_mut()
        .define("explode", native);

    // false and explode() — explode must not run, result is the left value.
    let program = Program::new(vec![Stmt::Expression(Expr::And {
        left: Box::new(Expr::Bool(false)),
        right: Box::new(call(ident("explode"), vec![])),
    })]);
    assert_eq!(interpreter.eval_program(&program), Value::Bool(false));
    assert!(!fired.get());

    // 1 or explode() — truthy left short-circuits and is the result.
    let program = Program::new(vec![Stmt::Expression(Expr::Or {
        left: Box::new(number(1.0)),
        right: Box::new(call(ident("explode"), vec![])),
    })]);
    assert_eq!(interpreter.eval_program(&program), Value::Number(1.0));
    assert!(!fired.get());
}

#[test]
fn zero_and_empty_string_are_truthy() {
    for condition in [number(0.0), Expr::Str(String::new()), Expr::Array(vec![])] {
        let value = run(vec![Stmt::Expression(Expr::If {
            condition: Box::new(condition),
            consequence: block(vec![Stmt::Expression(Expr::Str("yes".into()))]),
            alternative: Some(block(vec![Stmt::Expression(Expr::Str("no".into()))])),
        })]);
        assert_eq!(value, Value::string("yes"));
    }
}

#[test]
fn if_without_alternative_is_nil() {
    let value = run(vec![Stmt::Expression(Expr::If {
        condition: Box::new(Expr::Bool(false)),
        consequence: block(vec![Stmt::Expression(number(1.0))]),
        alternative: None,
    })]);
    assert_eq!(value, Value::Nil);
}

#[test]
fn while_counts_and_yields_nil() {
    // let i = 0; while (i < 5) { i = i + 1 }; i
    let value = run(vec![
        let_stmt("i", number(0.0)),
        Stmt::While {
            condition: binary(ident("i"), BinaryOp::Less, number(5.0)),
            body: block(vec![Stmt::Expression(assign(
                ident("i"),
                binary(ident("i"), BinaryOp::Add, number(1.0)),
            ))]),
        },
        Stmt::Expression(ident("i")),
    ]);
    assert_eq!(value, Value::Number(5.0));
}

#[test]
fn return_unwinds_to_the_call_boundary() {
    // let f = fn() { return 1; 2 }; f()
    let value = run(vec![
        let_stmt(
            "f",
            Expr::Function {
                params: vec![],
                body: block(vec![
                    Stmt::Return(number(1.0)),
                    Stmt::Expression(number(2.0)),
                ]),
            },
        ),
        Stmt::Expression(call(ident("f"), vec![])),
    ]);
    assert_eq!(value, Value::Number(1.0));
}

#[test]
fn missing_arguments_bind_nil_and_extras_drop() {
    // let f = fn(a, b) { a }; f(7, 8, 9) and f()
    let f = let_stmt(
        "f",
        Expr::Function {
            params: vec!["a".into(), "b".into()],
            body: block(vec![Stmt::Expression(ident("a"))]),
        },
    );
    let value = run(vec![
        f.clone(),
        Stmt::Expression(call(ident("f"), vec![number(7.0), number(8.0), number(9.0)])),
    ]);
    assert_eq!(value, Value::Number(7.0));

    let value = run(vec![f, Stmt::Expression(call(ident("f"), vec![]))]);
    assert_eq!(value, Value::Nil);
}

#[test]
fn closures_capture_and_share_their_environment() {
    // let n = 0;
    // let bump = fn() { n = n + 1; n };
    // bump(); bump()
    let value = run(vec![
        let_stmt("n", number(0.0)),
        let_stmt(
            "bump",
            Expr::Function {
                params: vec![],
                body: block(vec![
                    Stmt::Expression(assign(
                        ident("n"),
                        binary(ident("n"), BinaryOp::Add, number(1.0)),
                    )),
                    Stmt::Expression(ident("n")),
                ]),
            },
        ),
        Stmt::Expression(call(ident("bump"), vec![])),
        Stmt::Expression(call(ident("bump"), vec![])),
    ]);
    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn closure_outlives_its_defining_call() {
    // let make = fn() { let n = 10; fn() { n = n + 1; n } };
    // let counter = make(); counter(); counter()
    let inner = Expr::Function {
        params: vec![],
        body: block(vec![
            Stmt::Expression(assign(
                ident("n"),
                binary(ident("n"), BinaryOp::Add, number(1.0)),
            )),
            Stmt::Expression(ident("n")),
        ]),
    };
    let value = run(vec![
        let_stmt(
            "make",
            Expr::Function {
                params: vec![],
                body: block(vec![
                    let_stmt("n", number(10.0)),
                    Stmt::Expression(inner),
                ]),
            },
        ),
        let_stmt("counter", call(ident("make"), vec![])),
        Stmt::Expression(call(ident("counter"), vec![])),
        Stmt::Expression(call(ident("counter"), vec![])),
    ]);
    assert_eq!(value, Value::Number(12.0));
}

#[test]
fn calling_a_non_function_raises() {
    let value = run(vec![Stmt::Expression(call(number(3.0), vec![]))]);
    expect_error(value, "not a function: number");
}

#[test]
fn errors_stop_later_statements() {
    // The raise happens before the second statement could define y.
    let value = run(vec![
        Stmt::Expression(binary(number(1.0), BinaryOp::Add, Expr::Str("x".into()))),
        let_stmt("y", number(1.0)),
        Stmt::Expression(ident("y")),
    ]);
    expect_error(value, "type mismatch");
}

#[test]
fn errors_in_arguments_skip_the_call() {
    let (native, fired) = explode();
    let mut interpreter = Interpreter::new();
    interpreter
        .globals()
        .borrow_mut()
        .define("explode", native);
    let program = Program::new(vec![Stmt::Expression(call(
        ident("explode"),
        vec![ident("ghost")],
    ))]);
    expect_error(
        interpreter.eval_program(&program),
        "undefined name: ghost",
    );
    assert!(!fired.get());
}

#[test]
fn interpret_converts_errors_for_the_host() {
    let mut interpreter = Interpreter::new();
    let program = Program::new(vec![Stmt::Expression(ident("ghost"))]);
    let err = interpreter.interpret(&program).unwrap_err();
    assert_eq!(
        err.to_string(),
        "runtime error: undefined name: ghost"
    );

    let program = Program::new(vec![Stmt::Expression(number(1.0))]);
    assert_eq!(interpreter.interpret(&program).unwrap(), Value::Number(1.0));
}

#[test]
fn array_literal_index_and_assignment() {
    let value = run(vec![
        let_stmt(
            "a",
            Expr::Array(vec![number(1.0), number(2.0), number(3.0)]),
        ),
        Stmt::Expression(assign(index(ident("a"), number(1.0)), number(20.0))),
        Stmt::Expression(index(ident("a"), number(1.0))),
    ]);
    assert_eq!(value, Value::Number(20.0));
}

#[test]
fn array_reads_out_of_bounds_are_nil_but_writes_raise() {
    let a = let_stmt("a", Expr::Array(vec![number(1.0)]));
    let value = run(vec![
        a.clone(),
        Stmt::Expression(index(ident("a"), number(5.0))),
    ]);
    assert_eq!(value, Value::Nil);

    let value = run(vec![
        a,
        Stmt::Expression(assign(index(ident("a"), number(5.0)), number(0.0))),
    ]);
    expect_error(value, "index out of bounds");
}

#[test]
fn string_indexing_yields_chars_or_nil() {
    let s = let_stmt("s", Expr::Str("hey".into()));
    let value = run(vec![
        s.clone(),
        Stmt::Expression(index(ident("s"), number(1.0))),
    ]);
    assert_eq!(value, Value::string("e"));

    let value = run(vec![s, Stmt::Expression(index(ident("s"), number(9.0)))]);
    assert_eq!(value, Value::Nil);
}

#[test]
fn dict_literal_lookup_and_assignment() {
    let d = let_stmt(
        "d",
        Expr::Dict(vec![(Expr::Str("k".into()), number(1.0))]),
    );
    let value = run(vec![
        d.clone(),
        Stmt::Expression(index(ident("d"), Expr::Str("k".into()))),
    ]);
    assert_eq!(value, Value::Number(1.0));

    // Missing keys read as Nil.
    let value = run(vec![
        d.clone(),
        Stmt::Expression(index(ident("d"), Expr::Str("missing".into()))),
    ]);
    assert_eq!(value, Value::Nil);

    let value = run(vec![
        d,
        Stmt::Expression(assign(
            index(ident("d"), Expr::Str("k2".into())),
            number(2.0),
        )),
        Stmt::Expression(index(ident("d"), Expr::Str("k2".into()))),
    ]);
    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn unhashable_dict_keys_raise() {
    let value = run(vec![Stmt::Expression(Expr::Dict(vec![(
        Expr::Array(vec![]),
        number(1.0),
    )]))]);
    expect_error(value, "unusable as dictionary key: array");
}

fn class_decl(name: &str, superclass: Option<Expr>, methods: Vec<MethodDecl>) -> Stmt {
    Stmt::Class(ClassDecl {
        name: name.to_string(),
        superclass,
        methods,
    })
}

fn method(name: &str, params: Vec<&str>, body: Vec<Stmt>) -> MethodDecl {
    MethodDecl {
        name: name.to_string(),
        params: params.into_iter().map(String::from).collect(),
        body: block(body),
    }
}

#[test]
fn init_runs_with_the_instance_as_receiver() {
    // class Point { init(x) { this.x = x } }
    // let p = Point(4); p.x
    let value = run(vec![
        class_decl(
            "Point",
            None,
            vec![method(
                "init",
                vec!["x"],
                vec![Stmt::Expression(assign(
                    attr(ident("this"), "x"),
                    ident("x"),
                ))],
            )],
        ),
        let_stmt("p", call(ident("Point"), vec![number(4.0)])),
        Stmt::Expression(attr(ident("p"), "x")),
    ]);
    assert_eq!(value, Value::Number(4.0));
}

#[test]
fn instantiation_yields_the_instance_not_inits_result() {
    // init returns a number; the call still yields the instance.
    let value = run(vec![
        class_decl(
            "Box",
            None,
            vec![method("init", vec![], vec![Stmt::Return(number(99.0))])],
        ),
        Stmt::Expression(call(ident("Box"), vec![])),
    ]);
    assert!(matches!(value, Value::Instance(_)));
}

#[test]
fn methods_dispatch_through_the_superclass_chain() {
    // class Animal { speak() { return "..." } name() { return "animal" } }
    // class Dog < Animal { speak() { return "woof" } }
    // Dog().speak() + Dog().name()
    let value = run(vec![
        class_decl(
            "Animal",
            None,
            vec![
                method("speak", vec![], vec![Stmt::Return(Expr::Str("...".into()))]),
                method(
                    "name",
                    vec![],
                    vec![Stmt::Return(Expr::Str("animal".into()))],
                ),
            ],
        ),
        class_decl(
            "Dog",
            Some(ident("Animal")),
            vec![method(
                "speak",
                vec![],
                vec![Stmt::Return(Expr::Str("woof".into()))],
            )],
        ),
        Stmt::Expression(binary(
            call(attr(call(ident("Dog"), vec![]), "speak"), vec![]),
            BinaryOp::Add,
            call(attr(call(ident("Dog"), vec![]), "name"), vec![]),
        )),
    ]);
    assert_eq!(value, Value::string("woofanimal"));
}

#[test]
fn instance_attrs_shadow_class_methods() {
    // class C { f() { return 1 } }
    // let c = C(); c.f = fn() { return 2 }; c.f()
    let value = run(vec![
        class_decl(
            "C",
            None,
            vec![method("f", vec![], vec![Stmt::Return(number(1.0))])],
        ),
        let_stmt("c", call(ident("C"), vec![])),
        Stmt::Expression(assign(
            attr(ident("c"), "f"),
            Expr::Function {
                params: vec![],
                body: block(vec![Stmt::Return(number(2.0))]),
            },
        )),
        Stmt::Expression(call(attr(ident("c"), "f"), vec![])),
    ]);
    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn class_attributes_are_visible_from_instances() {
    // class C {}; C.limit = 8; C().limit
    let value = run(vec![
        class_decl("C", None, vec![]),
        Stmt::Expression(assign(attr(ident("C"), "limit"), number(8.0))),
        Stmt::Expression(attr(call(ident("C"), vec![]), "limit")),
    ]);
    assert_eq!(value, Value::Number(8.0));
}

#[test]
fn non_class_superclass_raises() {
    let value = run(vec![class_decl("Bad", Some(number(3.0)), vec![])]);
    expect_error(value, "superclass must be a class, not number");
}

#[test]
fn missing_attribute_raises() {
    let value = run(vec![Stmt::Expression(attr(number(1.0), "nope"))]);
    expect_error(value, "no such attribute: nope on number");
}

#[test]
fn native_methods_bind_their_receiver() {
    // let a = [1]; a.push(2); a.size()
    let value = run(vec![
        let_stmt("a", Expr::Array(vec![number(1.0)])),
        Stmt::Expression(call(attr(ident("a"), "push"), vec![number(2.0)])),
        Stmt::Expression(call(attr(ident("a"), "size"), vec![])),
    ]);
    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn native_arity_errors_surface_as_raises() {
    // len() with no arguments
    let value = run(vec![Stmt::Expression(call(ident("len"), vec![]))]);
    expect_error(value, "wrong number of arguments");
}

#[test]
fn is_compares_identity_and_eq_compares_structure() {
    // let a = [1]; let b = [1]; a is b  -> false
    let arrays = vec![
        let_stmt("a", Expr::Array(vec![number(1.0)])),
        let_stmt("b", Expr::Array(vec![number(1.0)])),
    ];
    let mut program = arrays.clone();
    program.push(Stmt::Expression(binary(ident("a"), BinaryOp::Is, ident("b"))));
    assert_eq!(run(program), Value::Bool(false));

    let mut program = arrays;
    program.push(Stmt::Expression(binary(ident("a"), BinaryOp::Is, ident("a"))));
    assert_eq!(run(program), Value::Bool(true));

    // Strings: == is structural, is requires the same allocation.
    let value = run(vec![Stmt::Expression(binary(
        Expr::Str("s".into()),
        BinaryOp::Equal,
        Expr::Str("s".into()),
    ))]);
    assert_eq!(value, Value::Bool(true));
    let value = run(vec![Stmt::Expression(binary(
        Expr::Str("s".into()),
        BinaryOp::Is,
        Expr::Str("s".into()),
    ))]);
    assert_eq!(value, Value::Bool(false));
}

#[test]
fn type_builtin_reaches_user_classes() {
    // class C {}; type(C()) == C
    let value = run(vec![
        class_decl("C", None, vec![]),
        Stmt::Expression(binary(
            call(ident("type"), vec![call(ident("C"), vec![])]),
            BinaryOp::Equal,
            ident("C"),
        )),
    ]);
    assert_eq!(value, Value::Bool(true));
}

#[test]
fn inspect_method_works_on_every_value() {
    // 2.5.inspect()
    let value = run(vec![Stmt::Expression(call(
        attr(number(2.5), "inspect"),
        vec![],
    ))]);
    assert_eq!(value, Value::string("2.5"));
}
