use brandyc_lex::tokenize;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_source() -> String {
    let unit = "func fib(n: i32) ->\n  if n < 2 { return n }\n  return fib(n - 1) + fib(n - 2)\n\nvar total = 0\nwhile total < 100 { total += fib(10) } // hot loop\n";
    unit.repeat(64)
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample_source();

    c.bench_function("tokenize_repeated_module", |b| {
        b.iter(|| tokenize(black_box(&source)).unwrap())
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
