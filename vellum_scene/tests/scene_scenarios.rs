// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios through the public scene API.

use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use kurbo::{Point, Rect};
use peniko::Color;
use vellum_scene::{
    AffineTransform, DrawOp, LocalNode, NodeId, RecordingSurface, Scene, SceneError, Shape,
};

fn approx_rect(a: Rect, b: Rect) -> bool {
    (a.x0 - b.x0).abs() < 1e-9
        && (a.y0 - b.y0).abs() < 1e-9
        && (a.x1 - b.x1).abs() < 1e-9
        && (a.y1 - b.y1).abs() < 1e-9
}

fn setup() -> (Scene, NodeId) {
    let scene = Scene::new();
    let root = scene.insert(LocalNode::new(Shape::container()));
    (scene, root)
}

#[test]
fn rotated_rectangle_swaps_extent() {
    let (scene, root) = setup();
    let rect = scene
        .insert_into(root, LocalNode::new(Shape::rect(100.0, 50.0)).at(10.0, 10.0))
        .unwrap();
    scene.rotate(rect, 90.0).unwrap();

    // A quarter turn counterclockwise on screen sends +x to screen-up, so the
    // 100 × 50 rectangle now spans 50 wide and 100 tall above its origin.
    let bounds = scene.bounds(rect).unwrap();
    assert!(
        approx_rect(bounds, Rect::new(10.0, -90.0, 60.0, 10.0)),
        "unexpected bounds {bounds:?}"
    );
    assert!(scene.contains(rect, Point::new(10.0 + 5.0, 10.0 - 60.0)));
    assert!(!scene.contains(rect, Point::new(10.0 + 60.0, 10.0 + 5.0)));
    // The unrotated footprint is no longer covered.
    assert!(!scene.contains(rect, Point::new(10.0 + 60.0, 10.0 + 25.0)));
}

#[test]
fn rectangle_containment_bounds() {
    let (scene, root) = setup();
    let (w, h) = (30.0, 20.0);
    let rect = scene.insert_into(root, LocalNode::new(Shape::rect(w, h))).unwrap();
    assert!(scene.contains(rect, Point::new(w / 2.0, h / 2.0)));
    assert!(!scene.contains(rect, Point::new(w, h)));
    assert!(!scene.contains(rect, Point::new(-1.0, -1.0)));
}

#[test]
fn arc_sweep_wraps_past_full_turn() {
    let (scene, root) = setup();
    // Circle of radius 50 centered at (50, 50) in local space.
    let arc = scene
        .insert_into(root, LocalNode::new(Shape::arc(100.0, 100.0, 350.0, 30.0)))
        .unwrap();
    let on_circle = |deg: f64| {
        let (s, c) = deg.to_radians().sin_cos();
        Point::new(50.0 + 50.0 * c, 50.0 - 50.0 * s)
    };
    assert!(scene.contains(arc, on_circle(5.0)));
    assert!(scene.contains(arc, on_circle(355.0)));
    assert!(!scene.contains(arc, on_circle(180.0)));
    // Filling turns the arc into a wedge through the center region.
    scene.set_filled(arc, true).unwrap();
    assert!(scene.contains(arc, Point::new(80.0, 50.0)));
    assert!(!scene.contains(arc, Point::new(20.0, 50.0)));
}

#[test]
fn polygons_use_even_odd_rule() {
    let (scene, root) = setup();
    let square = scene
        .insert_into(
            root,
            LocalNode::new(Shape::polygon([
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ])),
        )
        .unwrap();
    assert!(scene.contains(square, Point::new(5.0, 5.0)));
    assert!(!scene.contains(square, Point::new(15.0, 15.0)));

    let bowtie = scene
        .insert_into(
            root,
            LocalNode::new(Shape::polygon([
                Point::new(0.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0),
            ]))
            .at(100.0, 0.0),
        )
        .unwrap();
    assert!(scene.contains(bowtie, Point::new(102.0, 5.0)));
    assert!(!scene.contains(bowtie, Point::new(105.0, 2.0)));
    assert_eq!(
        scene.bounds(bowtie).unwrap(),
        Rect::new(100.0, 0.0, 110.0, 10.0)
    );
}

#[test]
fn duplicated_container_is_independent() {
    let (scene, root) = setup();
    let group = scene.insert_into(root, LocalNode::new(Shape::container())).unwrap();
    let red = Color::from_rgb8(200, 0, 0);
    let a = scene
        .insert_into(group, LocalNode::new(Shape::rect(5.0, 5.0)).with_color(red))
        .unwrap();
    let b = scene.insert_into(group, LocalNode::new(Shape::oval(5.0, 5.0))).unwrap();

    let copy = scene.duplicate(group).unwrap();
    assert_eq!(scene.parent(copy).unwrap(), None);
    let copied = scene.children(copy).unwrap();
    assert_eq!(copied.len(), 2);
    assert!(!copied.contains(&a) && !copied.contains(&b));

    let blue = Color::from_rgb8(0, 0, 200);
    scene.set_color(copied[0], blue).unwrap();
    scene.set_position(copied[1], 40.0, 40.0).unwrap();
    assert_eq!(scene.color(a).unwrap().to_rgba8(), red.to_rgba8());
    assert_eq!(scene.position(b).unwrap(), Point::ORIGIN);
    assert_eq!(scene.children(group).unwrap(), vec![a, b]);
}

#[test]
fn send_to_front_twice_is_idempotent() {
    let (scene, root) = setup();
    let a = scene.insert_into(root, LocalNode::new(Shape::rect(1.0, 1.0))).unwrap();
    let b = scene.insert_into(root, LocalNode::new(Shape::rect(1.0, 1.0))).unwrap();
    let c = scene.insert_into(root, LocalNode::new(Shape::rect(1.0, 1.0))).unwrap();
    scene.send_to_front(a).unwrap();
    let once = scene.children(root).unwrap();
    scene.send_to_front(a).unwrap();
    assert_eq!(scene.children(root).unwrap(), once);
    assert_eq!(once, vec![b, c, a]);
}

#[test]
fn resize_is_refused_after_rotation() {
    let (scene, root) = setup();
    let oval = scene.insert_into(root, LocalNode::new(Shape::oval(10.0, 10.0))).unwrap();
    scene.rotate(oval, 10.0).unwrap();
    assert!(matches!(
        scene.set_size(oval, 20.0, 20.0),
        Err(SceneError::InvalidOperation { .. })
    ));
}

#[test]
fn containers_cannot_contain_themselves() {
    let (scene, root) = setup();
    let a = scene.insert_into(root, LocalNode::new(Shape::container())).unwrap();
    let b = scene.insert_into(a, LocalNode::new(Shape::container())).unwrap();
    assert!(matches!(
        scene.add(b, a),
        Err(SceneError::StructuralConsistency { .. })
    ));
    assert_eq!(scene.parent(a).unwrap(), Some(root));
}

#[test]
fn nested_transforms_compose_in_paint_and_hit_test() {
    let (scene, root) = setup();
    let group = scene.insert_into(root, LocalNode::new(Shape::container()).at(50.0, 50.0)).unwrap();
    scene.scale(group, 2.0, 2.0).unwrap();
    let leaf = scene
        .insert_into(group, LocalNode::new(Shape::rect(10.0, 10.0)).at(5.0, 0.0).filled(None))
        .unwrap();

    // Leaf covers [60, 80] × [50, 70] on the canvas.
    let hit = scene.hit_path(root, Point::new(75.0, 65.0)).unwrap().unwrap();
    assert_eq!(hit.node, leaf);
    assert_eq!(hit.path, vec![root, group, leaf]);
    assert_eq!(hit.local[2], Point::new(7.5, 7.5));
    assert!(scene.hit_path(root, Point::new(55.0, 65.0)).unwrap().is_none());

    let mut surface = RecordingSurface::new();
    scene.paint(root, &mut surface).unwrap();
    let draws: Vec<_> = surface.draws().collect();
    assert_eq!(draws.len(), 2, "fill then outline");
    assert!(matches!(draws[0].0, DrawOp::FillRect(_)));
    let mut expected = AffineTransform::identity();
    expected.translate(50.0, 50.0);
    expected.scale(2.0, 2.0);
    expected.translate(5.0, 0.0);
    assert_eq!(draws[1].1.transform, expected.as_affine());
}

#[test]
fn concurrent_cross_adds_never_form_a_cycle() {
    for _ in 0..200 {
        let scene = Scene::new();
        let a = scene.insert(LocalNode::new(Shape::container()));
        let b = scene.insert(LocalNode::new(Shape::container()));
        let barrier = Barrier::new(2);
        let (ab, ba) = thread::scope(|s| {
            let ab = s.spawn(|| {
                barrier.wait();
                scene.add(a, b)
            });
            let ba = s.spawn(|| {
                barrier.wait();
                scene.add(b, a)
            });
            (ab.join().unwrap(), ba.join().unwrap())
        });

        let (pa, pb) = (scene.parent(a).unwrap(), scene.parent(b).unwrap());
        assert!(!(pa == Some(b) && pb == Some(a)), "a and b contain each other");
        assert!(ab.is_ok() != ba.is_ok(), "exactly one add succeeds");
        assert!(matches!(
            ab.err().or(ba.err()),
            Some(SceneError::StructuralConsistency { .. })
        ));
    }
}

#[test]
fn concurrent_adds_of_one_node_leave_a_single_owner() {
    for _ in 0..200 {
        let scene = Scene::new();
        let x = scene.insert(LocalNode::new(Shape::container()));
        let y = scene.insert(LocalNode::new(Shape::container()));
        let n = scene.insert(LocalNode::new(Shape::rect(5.0, 5.0)));
        let barrier = Barrier::new(2);
        thread::scope(|s| {
            s.spawn(|| {
                barrier.wait();
                scene.add(x, n).unwrap();
            });
            s.spawn(|| {
                barrier.wait();
                scene.add(y, n).unwrap();
            });
        });

        let owners: Vec<_> = [x, y]
            .into_iter()
            .filter(|c| scene.children(*c).unwrap().contains(&n))
            .collect();
        assert_eq!(owners.len(), 1);
        assert_eq!(scene.parent(n).unwrap(), Some(owners[0]));
    }
}

#[test]
fn traversals_run_alongside_structural_edits() {
    let (scene, root) = setup();
    let group = scene
        .insert_into(root, LocalNode::new(Shape::container()).at(20.0, 20.0))
        .unwrap();
    let leaves: Vec<_> = (0..8)
        .map(|i| {
            scene
                .insert_into(
                    group,
                    LocalNode::new(Shape::rect(10.0, 10.0)).at(f64::from(i) * 5.0, 0.0),
                )
                .unwrap()
        })
        .collect();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            for round in 0..500 {
                let leaf = leaves[round % leaves.len()];
                match (round / leaves.len()) % 4 {
                    0 => {
                        scene.remove(group, leaf).unwrap();
                    }
                    1 => scene.add(root, leaf).unwrap(),
                    2 => scene.add_at(group, leaf, 3.0, 3.0).unwrap(),
                    _ => {
                        scene.send_to_back(leaf).unwrap();
                    }
                }
                let extra = scene.insert_into(group, LocalNode::new(Shape::oval(4.0, 4.0))).unwrap();
                scene.destroy(extra).unwrap();
            }
            done.store(true, Ordering::Release);
        });
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                let mut surface = RecordingSurface::new();
                scene.paint(root, &mut surface).unwrap();
                scene.hit_path(root, Point::new(25.0, 25.0)).unwrap();
                scene.bounds(group).unwrap();
                assert!(scene.element_count(group).unwrap() <= leaves.len() + 1);
            }
        });
    });

    // Every leaf ends up owned exactly once.
    for leaf in &leaves {
        let parent = scene.parent(*leaf).unwrap().unwrap();
        assert_eq!(
            scene.children(parent).unwrap().iter().filter(|c| *c == leaf).count(),
            1
        );
    }
}
