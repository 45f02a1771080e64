// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route pointer events over a nested scene with the responder directly.
//!
//! Shows the capture → target → bubble sequence for a press, hover
//! transitions between nested containers, and path reconstruction through
//! the scene's parent links.
//!
//! Run:
//! - `cargo run -p vellum_demos --example responder_scene`

use kurbo::Point;
use vellum_responder::adapters::scene::{SceneParents, top_hit_for_point};
use vellum_responder::hover::{HoverState, path_from_dispatch};
use vellum_responder::router::Router;
use vellum_responder::types::ResolvedHit;
use vellum_scene::{LocalNode, Scene, Shape};

fn main() {
    let scene = Scene::new();
    let root = scene.insert(LocalNode::new(Shape::container()));
    let toolbar = scene
        .insert_into(root, LocalNode::new(Shape::container()).at(0.0, 0.0))
        .unwrap();
    let open = scene
        .insert_into(toolbar, LocalNode::new(Shape::rect(30.0, 20.0)).at(5.0, 5.0))
        .unwrap();
    let save = scene
        .insert_into(toolbar, LocalNode::new(Shape::rect(30.0, 20.0)).at(40.0, 5.0))
        .unwrap();
    println!("root={root:?} toolbar={toolbar:?} open={open:?} save={save:?}");

    let router: Router<_, SceneParents<'_>> = Router::with_parent(SceneParents(&scene));
    let mut hover = HoverState::new();

    for p in [Point::new(10.0, 10.0), Point::new(50.0, 10.0), Point::new(200.0, 200.0)] {
        let hits: Vec<_> = top_hit_for_point(&scene, root, p).unwrap().into_iter().collect();
        let seq = router.handle_with_hits(&hits);
        println!("== Pointer at {p:?} ==");
        for d in &seq {
            println!("  {:?} {:?} local={:?}", d.phase, d.node, d.local);
        }
        println!("  hover: {:?}", hover.update_path(&path_from_dispatch(&seq)));
    }

    // A bare hit has no path; the router walks the scene's parent links.
    let seq = router.handle_with_hits(&[ResolvedHit::bare(save)]);
    assert_eq!(path_from_dispatch(&seq), vec![root, toolbar, save]);
    println!("== Reconstructed path ==\n  {:?}", path_from_dispatch(&seq));
}
