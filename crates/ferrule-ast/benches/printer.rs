//! Expression building, dispatch and tree printing benchmarks.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ferrule_ast::ast::expr::ApplyKind;
use ferrule_ast::{AstContext, Expr, SourceLoc, Spanned};
use ferrule_mem::LocalArena;

/// `a + a + ... + a` with `depth` operators, nested to the left.
fn binary_chain<'a>(ctx: &AstContext<'a>, depth: u32) -> &'a Expr<'a> {
    let mut lhs = ctx.unresolved_decl_ref("a", SourceLoc::new(0));
    for i in 1..=depth {
        let op = ctx.unresolved_decl_ref("+", SourceLoc::new(i * 4 - 2));
        let rhs = ctx.unresolved_decl_ref("a", SourceLoc::new(i * 4));
        let args = ctx.tuple(
            SourceLoc::INVALID,
            &[Some(lhs), Some(rhs)],
            SourceLoc::INVALID,
            false,
        );
        lhs = ctx.apply(ApplyKind::Binary, op, Some(args));
    }
    lhs
}

fn bench_build(c: &mut Criterion) {
    ferrule_log::init_from_env();
    let mut group = c.benchmark_group("build_binary_chain");

    for depth in [10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            b.iter(|| {
                let arena = LocalArena::default();
                let ctx = AstContext::new(&arena);
                black_box(binary_chain(&ctx, depth).tag());
            });
        });
    }

    group.finish();
}

fn bench_source_range(c: &mut Criterion) {
    let arena = LocalArena::default();
    let ctx = AstContext::new(&arena);
    let root = binary_chain(&ctx, 200);

    c.bench_function("source_range_depth_200", |b| {
        b.iter(|| black_box(root.source_range()));
    });
    c.bench_function("is_implicit_depth_200", |b| {
        b.iter(|| black_box(root.is_implicit()));
    });
}

fn bench_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("print_binary_chain");

    for depth in [10, 100].iter() {
        let arena = LocalArena::default();
        let ctx = AstContext::new(&arena);
        let root = binary_chain(&ctx, *depth);

        group.bench_with_input(BenchmarkId::from_parameter(depth), root, |b, root| {
            b.iter(|| black_box(root.print_to_string()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_source_range, bench_print);
criterion_main!(benches);
