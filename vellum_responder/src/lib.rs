// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vellum Responder: deterministic pointer routing for scene graphs.
//!
//! ## Overview
//!
//! This crate turns host pointer events into events addressed to scene nodes.
//! It does not perform hit testing. Feed it [`ResolvedHit`](crate::types::ResolvedHit)
//! values (for example from [`Scene::hit_path`] through the `scene_adapter`
//! feature) and it decides who hears about the event, and in what order.
//!
//! ## Layers
//!
//! - [`Router`](crate::router::Router): picks the front-most candidate and
//!   emits a capture → target → bubble sequence along its root→target path.
//!   A [`ParentLookup`](crate::types::ParentLookup) rebuilds paths that hits
//!   leave out.
//! - [`HoverState`](crate::hover::HoverState): diffs consecutive paths into
//!   exits (inner→outer) followed by enters (outer→inner).
//! - [`PointerRouter`](crate::pointer::PointerRouter): the state machine
//!   a host talks to. A press captures the node under the pointer until
//!   release; hover is suspended for the duration.
//! - [`deliver`](crate::pointer::deliver): walks node events through a handler
//!   that can stop a phase or consume the event.
//!
//! ## Example
//!
//! ```
//! use vellum_responder::pointer::PointerRouter;
//! use vellum_responder::types::{Phase, PointerEvent, PointerKind, ResolvedHit};
//!
//! let mut pointer: PointerRouter<u32> = PointerRouter::new();
//! let over = |node: u32| {
//!     vec![ResolvedHit { node, path: Some(vec![0, node]), localizer: Default::default() }]
//! };
//!
//! // Hover A, then move to B: A is exited before B is entered.
//! pointer.handle(&PointerEvent::moved(1.0, 1.0), &over(1));
//! let out = pointer.handle(&PointerEvent::moved(9.0, 1.0), &over(2));
//! assert_eq!((out[0].kind, out[0].node), (PointerKind::Exited, 1));
//! assert_eq!((out[1].kind, out[1].node), (PointerKind::Entered, 2));
//!
//! // Press on B and drag over A: B keeps receiving the drag.
//! pointer.handle(&PointerEvent::press(9.0, 1.0), &over(2));
//! let out = pointer.handle(&PointerEvent::dragged(1.0, 1.0), &over(1));
//! let target = out.iter().find(|e| e.phase == Phase::Target).unwrap();
//! assert_eq!(target.node, 2);
//! ```
//!
//! [`Scene::hit_path`]: https://docs.rs/vellum_scene/latest/vellum_scene/struct.Scene.html#method.hit_path

pub mod adapters;
pub mod hover;
pub mod pointer;
pub mod router;
pub mod types;
