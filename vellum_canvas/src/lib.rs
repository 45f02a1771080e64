// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vellum Canvas: binds a [`Scene`](vellum_scene::Scene) to a host surface.
//!
//! A [`Canvas`] owns the scene and its root container. The host feeds it
//! pointer events in surface coordinates and gets back node events in
//! delivery order; it asks the canvas to paint when it is time to draw.
//!
//! - Pointer routing goes through [`vellum_responder`]: the front-most leaf
//!   under the pointer is the target, hover changes exit before they enter,
//!   and a press holds every event until release.
//! - Painting clears to [`CanvasOptions::background`] and paints the whole
//!   scene. There is no damage tracking.
//! - The scene only raises a "redraw needed" flag. [`RepaintPolicy`] decides
//!   whether the host callback runs on every change or once per
//!   [`Canvas::flush`].
//!
//! ## Example
//!
//! ```
//! use kurbo::Size;
//! use vellum_canvas::{Canvas, CanvasOptions};
//! use vellum_responder::types::{Phase, PointerEvent, PointerKind};
//! use vellum_scene::{LocalNode, RecordingSurface, Shape};
//!
//! let mut canvas = Canvas::new(CanvasOptions {
//!     size: Size::new(320.0, 240.0),
//!     ..CanvasOptions::default()
//! });
//! let button = canvas
//!     .insert(LocalNode::new(Shape::round_rect(80.0, 30.0, 8.0, 8.0)).at(20.0, 20.0))
//!     .unwrap();
//!
//! let events = canvas.handle_pointer(&PointerEvent::press(30.0, 30.0));
//! let target = events.iter().find(|e| e.phase == Phase::Target).unwrap();
//! assert_eq!((target.node, target.kind), (button, PointerKind::Pressed));
//!
//! let mut surface = RecordingSurface::new();
//! canvas.paint(&mut surface).unwrap();
//! assert_eq!(surface.draws().count(), 2);
//! ```

mod canvas;
mod options;

pub use canvas::Canvas;
pub use options::{CanvasOptions, RepaintPolicy};
