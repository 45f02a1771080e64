// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small scene, query it, and paint it into a recording surface.
//!
//! Run:
//! - `cargo run -p vellum_demos --example scene_basics`

use kurbo::Point;
use peniko::Color;
use vellum_scene::{Event, LocalNode, RecordingSurface, Scene, Shape};

fn main() {
    let scene = Scene::new();
    let root = scene.insert(LocalNode::new(Shape::container()));

    // A blue badge: a filled circle with a label, grouped and moved as one.
    let badge = scene
        .insert_into(
            root,
            LocalNode::new(Shape::container())
                .at(40.0, 40.0)
                .with_color(Color::from_rgb8(20, 60, 200)),
        )
        .unwrap();
    let disc = scene
        .insert_into(badge, LocalNode::new(Shape::oval(60.0, 60.0)).filled(None))
        .unwrap();
    let label = scene
        .insert_into(badge, LocalNode::new(Shape::label("42")).at(20.0, 36.0))
        .unwrap();

    // A red wedge, rotated a little.
    let wedge = scene
        .insert_into(
            root,
            LocalNode::new(Shape::arc(80.0, 80.0, 30.0, 120.0))
                .at(150.0, 40.0)
                .with_color(Color::from_rgb8(200, 30, 30))
                .filled(None),
        )
        .unwrap();
    scene.rotate(wedge, 15.0).unwrap();

    println!("== Bounds ==");
    for (name, id) in [("badge", badge), ("disc", disc), ("label", label), ("wedge", wedge)] {
        println!("  {name:6} {:?}", scene.bounds(id).unwrap());
    }

    println!("== Hit paths ==");
    for p in [Point::new(70.0, 70.0), Point::new(190.0, 60.0), Point::new(5.0, 5.0)] {
        match scene.hit_path(root, p).unwrap() {
            Some(hit) => println!("  {p:?} -> {:?} via {:?}", hit.node, hit.path),
            None => println!("  {p:?} -> nothing"),
        }
    }

    println!("== Paint ==");
    let mut surface = RecordingSurface::new();
    scene.paint(root, &mut surface).unwrap();
    for event in surface.events() {
        match event {
            Event::State { op, .. } => println!("  state {op:?}"),
            Event::Draw { op, state } => {
                println!("  draw  {op:?} in {:?}", state.color.to_rgba8());
            }
        }
    }
    assert_eq!(surface.depth(), 0);
}
