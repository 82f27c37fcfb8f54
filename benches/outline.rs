//! Benchmarks for strip construction, incremental refresh and culled
//! rendering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use seamline::bounds::Aabb2;
use seamline::outline::{OutlineBuilder, OutlineDrawCall, OutlineStyle, RenderBatch};
use seamline::{Point2, Vertex2};

/// A batch that only counts submitted entries.
struct CountingBatch {
    frustum: Aabb2<f32>,
    entries: usize,
}

impl RenderBatch for CountingBatch {
    fn frustum(&self) -> Aabb2<f32> {
        self.frustum
    }

    fn draw_outline(&mut self, call: OutlineDrawCall<'_>) {
        self.entries += call.range.len();
    }
}

/// Generates a wobbly closed loop around the origin.
fn generate_blob(num_points: usize) -> Vec<Vertex2> {
    (0..num_points)
        .map(|i| {
            let t = i as f32 / num_points as f32 * std::f32::consts::TAU;
            let r = 10.0 + ((i * 17) % 100) as f32 / 100.0; // Deterministic "noise"
            Point2::new(r * t.cos(), r * t.sin())
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_strips");

    for size in [100, 1000, 10000] {
        let points = generate_blob(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("closed", size), &points, |b, pts| {
            b.iter(|| {
                let mut outline = OutlineBuilder::new(black_box(pts), OutlineStyle::default())
                    .expect("valid style");
                outline.refresh();
                outline
            })
        });
    }

    group.finish();
}

fn bench_set_vertex(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_vertex_refresh");

    for size in [1000, 10000] {
        let points = generate_blob(size);
        let mut outline = OutlineBuilder::new(&points, OutlineStyle::default()).expect("valid style");
        outline.refresh();

        group.bench_function(BenchmarkId::new("single", size), |b| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 7) % size;
                let p = points[i];
                outline
                    .set_vertex(i, Point2::new(p.x * 1.01, p.y * 1.01))
                    .expect("index in range");
                outline.refresh();
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in [1000, 10000] {
        let points = generate_blob(size);
        let mut outline = OutlineBuilder::new(&points, OutlineStyle::default()).expect("valid style");
        outline.refresh();
        group.throughput(Throughput::Elements(size as u64));

        let everything = Aabb2::new(Point2::new(-100.0, -100.0), Point2::new(100.0, 100.0));
        let corner = Aabb2::new(Point2::new(5.0, 5.0), Point2::new(100.0, 100.0));

        for (name, frustum) in [("visible", everything), ("quarter", corner)] {
            group.bench_function(BenchmarkId::new(name, size), |b| {
                b.iter(|| {
                    let mut batch = CountingBatch {
                        frustum,
                        entries: 0,
                    };
                    outline.render(&mut batch).expect("outline has vertices");
                    black_box(batch.entries)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_set_vertex, bench_render);
criterion_main!(benches);
