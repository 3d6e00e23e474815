//! Query throughput over synthetic trees.
//!
//! Run benchmarks: `cargo bench --bench query_throughput`

use astpath::xpath::XPath;
use astpath::{Evaluator, Inspector};
use astpath_core::fixture;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const CALLS: &str = "//*[@type='CallExpr']/Fun[@type='Ident']/@Name";

fn bench_select_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_calls");
    for functions in [10, 100, 1000] {
        let ast = fixture::many_functions(functions);
        let evaluator = Evaluator::new(ast.source_set());
        let xpath = XPath::compile(CALLS).unwrap();

        group.throughput(Throughput::Elements(functions as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(functions),
            &functions,
            |b, _| b.iter(|| black_box(evaluator.eval_compiled(&xpath).unwrap())),
        );
    }
    group.finish();
}

fn bench_positional_path(c: &mut Criterion) {
    let ast = fixture::many_functions(100);
    let evaluator = Evaluator::new(ast.source_set());
    c.bench_function("positional_path", |b| {
        b.iter(|| black_box(evaluator.select("/*/Decls[50]/Body/List[2]").unwrap()))
    });
}

fn bench_inspector_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("inspector_build");
    for functions in [100, 1000] {
        let ast = fixture::many_functions(functions);
        group.bench_with_input(
            BenchmarkId::from_parameter(functions),
            &ast,
            |b, ast| b.iter(|| black_box(Inspector::new(ast.roots()))),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_select_calls,
    bench_positional_path,
    bench_inspector_build
);
criterion_main!(benches);
