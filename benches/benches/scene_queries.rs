// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use vellum_scene::{LocalNode, NodeId, RecordingSurface, Scene, Shape};

/// `n` row containers of `n` cells each; cells cycle through rect, oval, and
/// triangle so every containment path is exercised.
fn gen_grid_scene(n: usize, cell: f64, rotate: bool) -> (Scene, NodeId) {
    let scene = Scene::new();
    let root = scene.insert(LocalNode::new(Shape::container()));
    for y in 0..n {
        let row = scene
            .insert_into(root, LocalNode::new(Shape::container()).at(0.0, y as f64 * cell))
            .unwrap();
        for x in 0..n {
            let shape = match (x + y) % 3 {
                0 => Shape::rect(cell * 0.8, cell * 0.8),
                1 => Shape::oval(cell * 0.8, cell * 0.8),
                _ => Shape::polygon([
                    Point::new(0.0, cell * 0.8),
                    Point::new(cell * 0.4, 0.0),
                    Point::new(cell * 0.8, cell * 0.8),
                ]),
            };
            let node = scene
                .insert_into(row, LocalNode::new(shape).at(x as f64 * cell, 0.0))
                .unwrap();
            if rotate {
                scene.rotate(node, 10.0 * (x % 4) as f64).unwrap();
            }
        }
    }
    (scene, root)
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_f64(&mut self) -> f64 {
        // xorshift64*
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let v = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (v >> 11) as f64 / (1_u64 << 53) as f64
    }
}

fn gen_points(count: usize, extent: f64, seed: u64) -> Vec<Point> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * extent, rng.next_f64() * extent))
        .collect()
}

fn bench_hit_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_path");
    for &(n, rotate) in &[(16_usize, false), (32, false), (32, true), (64, false)] {
        let (scene, root) = gen_grid_scene(n, 10.0, rotate);
        let points = gen_points(256, n as f64 * 10.0, 0x5eed);
        group.throughput(Throughput::Elements(points.len() as u64));
        let name = format!("grid_n{}{}", n, if rotate { "_rotated" } else { "" });
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut found = 0_usize;
                for p in &points {
                    if scene.hit_path(root, *p).unwrap().is_some() {
                        found += 1;
                    }
                }
                black_box(found);
            });
        });
    }
    group.finish();
}

fn bench_element_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("element_at");
    let (scene, root) = gen_grid_scene(32, 10.0, false);
    let rows = scene.children(root).unwrap();
    let points = gen_points(256, 320.0, 7);
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("flat_row_n32", |b| {
        b.iter(|| {
            for (i, p) in points.iter().enumerate() {
                let row = rows[i % rows.len()];
                black_box(scene.element_at(row, Point::new(p.x, 5.0)).unwrap());
            }
        });
    });
    group.finish();
}

fn bench_bounds_and_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("whole_scene");
    for &n in &[16_usize, 32] {
        let (scene, root) = gen_grid_scene(n, 10.0, true);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("bounds_n{n}"), |b| {
            b.iter(|| black_box(scene.bounds(root).unwrap()));
        });
        group.bench_function(format!("paint_n{n}"), |b| {
            b.iter_batched(
                RecordingSurface::new,
                |mut surface| {
                    scene.paint(root, &mut surface).unwrap();
                    black_box(surface.events().len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hit_path, bench_element_at, bench_bounds_and_paint);
criterion_main!(benches);
