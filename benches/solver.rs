//! Benchmarks for the snake cube solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use snake_cube::chain::{SERPENTINE_CUBE, SNAKE_CUBE, TOY_CUBE};
use snake_cube::{FanOut, Puzzle};

/// Benchmark exhaustively enumerating the 2x2x2 toy chain.
fn bench_toy_exhaustive(c: &mut Criterion) {
    let puzzle = Puzzle::new(&TOY_CUBE[..], 2).unwrap();
    c.bench_function("toy_count", |b| b.iter(|| black_box(&puzzle).count_solutions()));
}

/// Benchmark counting the 3x3x3 serpentine sequentially and in parallel.
fn bench_serpentine(c: &mut Criterion) {
    let puzzle = Puzzle::new(&SERPENTINE_CUBE[..], 3).unwrap();
    let mut group = c.benchmark_group("serpentine");
    group.bench_function("count", |b| b.iter(|| black_box(&puzzle).count_solutions()));
    group.bench_function("par_count_roots", |b| {
        b.iter(|| black_box(&puzzle).par_count(FanOut::Roots))
    });
    group.bench_function("par_count_branches_4", |b| {
        b.iter(|| black_box(&puzzle).par_count(FanOut::Branches(4)))
    });
    group.bench_function("distinct", |b| {
        b.iter(|| black_box(&puzzle).distinct_solutions().count())
    });
    group.finish();
}

/// Benchmark finding the first 4x4x4 snake solution.
fn bench_snake_first(c: &mut Criterion) {
    let puzzle = Puzzle::from_chain(&SNAKE_CUBE[..]).unwrap();
    let mut group = c.benchmark_group("snake");
    group.sample_size(10);
    group.bench_function("first", |b| b.iter(|| black_box(&puzzle).first_solution()));
    group.bench_function("par_first", |b| {
        b.iter(|| black_box(&puzzle).par_solutions(FanOut::Roots, Some(1)))
    });
    group.finish();
}

criterion_group!(benches, bench_toy_exhaustive, bench_serpentine, bench_snake_first);
criterion_main!(benches);
