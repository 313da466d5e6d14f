//! Criterion benchmarks for spline evaluation and full grading.
//! Sizes: pieces per spline in {1, 10, 50}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p sketchgrade

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sketchgrade::dispatch::{grade, CountMode, Grader, GraderKind, GraderSet, ToolIds, ToolInfo};
use sketchgrade::geom::Spline;
use sketchgrade::prelude::{CanvasConfig, RawMark, Submission, ToolKind};

const CANVAS: CanvasConfig = CanvasConfig {
    xrange: [-5.0, 5.0],
    yrange: [-5.0, 5.0],
    width: 500,
    height: 500,
};

/// Pixel-space control points of a random walk over x ∈ [-4.5, 4.5].
fn random_chain(pieces: usize, seed: u64) -> Vec<Vector2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = 450.0 / pieces as f64;
    let mut y = 250.0;
    let mut cps = vec![Vector2::new(25.0, y)];
    for i in 0..pieces {
        let x0 = 25.0 + step * i as f64;
        let next = (y + rng.gen_range(-40.0..40.0)).clamp(30.0, 470.0);
        cps.push(Vector2::new(x0 + step / 3.0, y + rng.gen_range(-10.0..10.0)));
        cps.push(Vector2::new(x0 + 2.0 * step / 3.0, next + rng.gen_range(-10.0..10.0)));
        cps.push(Vector2::new(x0 + step, next));
        y = next;
    }
    cps
}

fn random_submission(pieces: usize, seed: u64) -> Submission {
    let cps: Vec<[f64; 2]> = random_chain(pieces, seed).iter().map(|p| [p.x, p.y]).collect();
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let points = (0..5)
        .map(|_| RawMark::point(rng.gen_range(30.0..470.0), rng.gen_range(30.0..470.0)))
        .collect();
    Submission::new(CANVAS)
        .with_marks("fd", vec![RawMark::spline(&cps)])
        .with_marks("pt", points)
}

fn grader_set() -> GraderSet {
    let on = |kind: GraderKind, tool: &str| {
        let mut g = Grader::new(kind);
        g.toolid = ToolIds::new([tool]);
        g.xrange = Some([Some(-3.0), Some(3.0)]);
        g
    };
    let mut fun = on(GraderKind::MatchFun, "fd");
    fun.fun = Some("sin(x) + x/2".into());
    let mut count = on(GraderKind::Count, "pt");
    count.count = Some(3);
    count.mode = CountMode::AtLeast;
    let mut above = on(GraderKind::GreaterThan, "fd");
    above.fun = Some("-4 + 0*x".into());
    GraderSet::new(
        vec![ToolInfo::new("fd", ToolKind::Spline), ToolInfo::new("pt", ToolKind::Point)],
        vec![
            fun,
            count,
            above,
            on(GraderKind::MonotIncreasing, "fd"),
            on(GraderKind::ConcaveUp, "fd"),
            on(GraderKind::DefinedIn, "fd"),
            on(GraderKind::UndefinedIn, "fd"),
        ],
    )
}

fn bench_spline(c: &mut Criterion) {
    let mut group = c.benchmark_group("spline");
    for &n in &[1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::new("value_at", n), &n, |b, &n| {
            b.iter_batched(
                || Spline::from_control_points(&random_chain(n, 41)),
                |s| {
                    if let Some(s) = s {
                        for i in 0..100 {
                            let _ = s.value_at(25.0 + 4.5 * i as f64);
                        }
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");
    let set = grader_set();
    for &n in &[1usize, 10, 50] {
        group.bench_with_input(BenchmarkId::new("seven_graders", n), &n, |b, &n| {
            b.iter_batched(
                || random_submission(n, 42),
                |sub| {
                    let _report = grade(&sub, &set);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_spline, bench_grade);
criterion_main!(benches);
