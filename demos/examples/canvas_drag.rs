// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag a shape around a canvas with synthetic pointer events.
//!
//! The handler raises the pressed node and moves it by the pointer delta.
//! Hover enter/exit events are printed as they happen.
//!
//! Run:
//! - `cargo run -p vellum_demos --example canvas_drag`

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kurbo::{Point, Size};
use vellum_canvas::{Canvas, CanvasOptions, RepaintPolicy};
use vellum_responder::types::{Outcome, Phase, PointerEvent, PointerKind};
use vellum_scene::{LocalNode, RecordingSurface, Shape};

fn main() {
    let mut canvas = Canvas::new(CanvasOptions {
        size: Size::new(320.0, 200.0),
        repaint: RepaintPolicy::Coalesced,
        ..CanvasOptions::default()
    });
    let frames = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&frames);
    canvas.on_repaint(move || {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let card = canvas
        .insert(LocalNode::new(Shape::round_rect(80.0, 50.0, 10.0, 10.0)).at(20.0, 20.0))
        .unwrap();
    let target = canvas
        .insert(LocalNode::new(Shape::rect(60.0, 60.0)).at(200.0, 100.0))
        .unwrap();
    let _ = canvas.flush();

    let script = [
        PointerEvent::moved(10.0, 10.0),
        PointerEvent::moved(40.0, 40.0),
        PointerEvent::press(40.0, 40.0),
        PointerEvent::dragged(120.0, 80.0),
        PointerEvent::dragged(220.0, 120.0),
        PointerEvent::release(220.0, 120.0),
        PointerEvent::moved(300.0, 190.0),
    ];

    let mut last = Point::ORIGIN;
    for event in &script {
        println!("== {:?} at {:?} ==", event.kind, event.position);
        let scene = Arc::clone(canvas.scene());
        canvas.dispatch_pointer(event, |e| {
            match (e.kind, e.phase) {
                (PointerKind::Entered | PointerKind::Exited, _) => {
                    println!("  {:?} {:?}", e.kind, e.node);
                }
                (PointerKind::Pressed, Phase::Target) => {
                    last = e.position;
                    scene.send_to_front(e.node).unwrap();
                }
                (PointerKind::Dragged, Phase::Target) => {
                    let delta = e.position - last;
                    scene.move_by(e.node, delta.x, delta.y).unwrap();
                    last = e.position;
                    println!("  moved {:?} by {delta:?}", e.node);
                }
                _ => {}
            }
            Outcome::Continue
        });
        if canvas.flush() {
            let mut surface = RecordingSurface::new();
            canvas.paint(&mut surface).unwrap();
            println!("  repainted {} draw ops", surface.draws().count());
        }
    }

    let moved_to = canvas.scene().position(card).unwrap();
    println!("card ended at {moved_to:?}");
    assert_eq!(moved_to, Point::new(200.0, 100.0));
    assert_eq!(
        canvas.element_at(Point::new(230.0, 130.0)).unwrap(),
        Some(card),
        "the card now sits on top of {target:?}"
    );
    println!("frames requested: {}", frames.load(Ordering::Relaxed));
}
