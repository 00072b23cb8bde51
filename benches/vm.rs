//! Benchmarks for the compiler and bytecode VM (SPEC_FULL.md A.6).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rangsi::ast::Program;
use rangsi::lexer::Scanner;
use rangsi::parser::Parser;
use rangsi::vm::{Compiler, Vm};

fn parse(source: &str) -> Program {
    let tokens = Scanner::new(source).scan_tokens().expect("lex error");
    Parser::new(tokens).parse().expect("parse error")
}

fn run(source: &str) {
    let program = parse(source);
    let module = Compiler::compile(&program).expect("compile error");
    let mut vm = Vm::new().with_output_sink(|_| {});
    vm.execute(&module.main).expect("runtime error");
}

fn fib_recursive_source(n: u32) -> String {
    format!(
        "kian fib(n)\n  tha n < 2\n    kuun n\n  job\n  kuun fib(n - 1) + fib(n - 2)\njob\nda fib({n})\n"
    )
}

fn loop_sum_source(n: u32) -> String {
    format!("ao total = 0\nao i = 0\nwonn i < {n}\n  total = total + i\n  i = i + 1\njob\nda total\n")
}

fn closure_counter_source(n: u32) -> String {
    format!(
        "kian make()\n  ao n = 0\n  kuun kian()\n    n = n + 1\n    kuun n\n  job\njob\nao c = make()\nao i = 0\nwonn i < {n}\n  c()\n  i = i + 1\njob\nda c()\n"
    )
}

fn class_dispatch_source(n: u32) -> String {
    format!(
        "klum Counter\n  kian sang()\n    ni.n = 0\n  job\n  kian bump()\n    ni.n = ni.n + 1\n    kuun ni.n\n  job\njob\nao c = mai Counter()\nao i = 0\nwonn i < {n}\n  c.bump()\n  i = i + 1\njob\nda c.bump()\n"
    )
}

fn fib_recursive(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib_recursive");
    for n in [10u32, 18, 24] {
        let source = fib_recursive_source(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, src| {
            b.iter(|| run(black_box(src)))
        });
    }
    group.finish();
}

fn loop_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("loop_sum");
    for n in [1_000u32, 50_000, 200_000] {
        let source = loop_sum_source(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, src| {
            b.iter(|| run(black_box(src)))
        });
    }
    group.finish();
}

fn closure_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure_counter");
    let source = closure_counter_source(10_000);
    group.bench_function("bump_10k", |b| b.iter(|| run(black_box(&source))));
    group.finish();
}

fn class_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("class_dispatch");
    let source = class_dispatch_source(10_000);
    group.bench_function("bump_10k", |b| b.iter(|| run(black_box(&source))));
    group.finish();
}

/// Compilation time alone, separate from execution.
fn compilation_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation_overhead");

    let program = parse(&fib_recursive_source(24));
    group.bench_function("compile_fib", |b| {
        b.iter(|| Compiler::compile(black_box(&program)).unwrap())
    });

    let program = parse(&loop_sum_source(200_000));
    group.bench_function("compile_loop", |b| {
        b.iter(|| Compiler::compile(black_box(&program)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    fib_recursive,
    loop_sum,
    closure_counter,
    class_dispatch,
    compilation_overhead,
);
criterion_main!(benches);
