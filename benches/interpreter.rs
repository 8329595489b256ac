//! Interpreter benchmarks for chime.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chimelang::ast::{BinaryOp, Block, Expr, Program, Stmt};
use chimelang::interpreter::Interpreter;

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}

/// let i = 0; while (i < n) { i = i + 1 }
fn counting_loop(n: f64) -> Program {
    Program::new(vec![
        Stmt::Let {
            name: "i".into(),
            value: Expr::Number(0.0),
        },
        Stmt::While {
            condition: binary(ident("i"), BinaryOp::Less, Expr::Number(n)),
            body: Block::new(vec![Stmt::Expression(Expr::Assign {
                target: Box::new(ident("i")),
                value: Box::new(binary(ident("i"), BinaryOp::Add, Expr::Number(1.0))),
            })]),
        },
    ])
}

/// let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };
/// fib(n)
fn recursive_fib(n: f64) -> Program {
    let fib_call = |arg: Expr| Expr::Call {
        callee: Box::new(ident("fib")),
        arguments: vec![arg],
    };
    let body = Expr::If {
        condition: Box::new(binary(ident("n"), BinaryOp::Less, Expr::Number(2.0))),
        consequence: Block::new(vec![Stmt::Expression(ident("n"))]),
        alternative: Some(Block::new(vec![Stmt::Expression(binary(
            fib_call(binary(ident("n"), BinaryOp::Subtract, Expr::Number(1.0))),
            BinaryOp::Add,
            fib_call(binary(ident("n"), BinaryOp::Subtract, Expr::Number(2.0))),
        ))])),
    };
    Program::new(vec![
        Stmt::Let {
            name: "fib".into(),
            value: Expr::Function {
                params: vec!["n".into()],
                body: Block::new(vec![Stmt::Expression(body)]),
            },
        },
        Stmt::Expression(fib_call(Expr::Number(n))),
    ])
}

fn loop_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("while loop");
    for n in [1_000u32, 10_000] {
        let program = counting_loop(n as f64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &program, |b, program| {
            b.iter(|| {
                let mut interpreter = Interpreter::new();
                black_box(interpreter.eval_program(program))
            })
        });
    }
    group.finish();
}

fn fib_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("recursive fib");
    for n in [10u32, 15] {
        let program = recursive_fib(n as f64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &program, |b, program| {
            b.iter(|| {
                let mut interpreter = Interpreter::new();
                black_box(interpreter.eval_program(program))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, loop_benchmarks, fib_benchmarks);
criterion_main!(benches);
