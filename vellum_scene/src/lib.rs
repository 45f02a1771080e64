// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vellum Scene: a retained-mode 2D scene graph on Kurbo.
//!
//! A [`Scene`] holds a tree of drawable nodes. Every node carries a position in
//! its container's space, its own affine transform, a color, a line width,
//! visibility, and a [`Shape`] payload. Containers nest without bound, and
//! points are resolved through them by inverting each node's transform on the
//! way down.
//!
//! - [`AffineTransform`]: the transform algebra, with rotation angles in degrees
//!   that turn counterclockwise on a y-down screen.
//! - [`Shape`]: rectangle, rounded rectangle, oval, line, arc, polygon, label,
//!   image, and container. Each leaf supplies its bounds under a transform,
//!   containment in its local space, and paint.
//! - [`Scene`]: arena of nodes addressed by generational [`NodeId`]s, with
//!   containment, z-order, bounds, hit testing, deep copies, color
//!   inheritance, and repaint signalling.
//! - [`Surface`]: where painting goes. [`RecordingSurface`] records ops for
//!   tests and headless use.
//!
//! ## Coordinate spaces
//!
//! A node maps its local space into its container's space through
//! `translate(position) · transform`. [`Scene::bounds`] and
//! [`Scene::contains`] speak the container's space. [`Scene::element_at`] and
//! [`Scene::hit_path`] take a point in the queried container's own local space.
//!
//! ## Concurrency
//!
//! All operations take `&self`. Node state and container child lists each sit
//! behind their own lock, so a paint pass and structural edits on unrelated
//! containers proceed independently.
//!
//! ## Not a renderer
//!
//! The scene does not rasterize, load fonts, or decode images. It emits draw
//! ops into a [`Surface`] and asks a [`FontMetrics`] provider and an
//! [`ImageResolver`] for the sizes it needs.
//!
//! ### Minimal usage
//!
//! ```
//! use kurbo::Point;
//! use vellum_scene::{LocalNode, Scene, Shape};
//!
//! let scene = Scene::new();
//! let root = scene.insert(LocalNode::new(Shape::container()));
//! let rect = scene
//!     .insert_into(root, LocalNode::new(Shape::rect(100.0, 50.0)).at(10.0, 10.0))
//!     .unwrap();
//!
//! // Quarter turn about the rectangle's own origin: it now extends upward.
//! scene.rotate(rect, 90.0).unwrap();
//! let bounds = scene.bounds(rect).unwrap();
//! assert!((bounds.width() - 50.0).abs() < 1e-9);
//! assert!((bounds.height() - 100.0).abs() < 1e-9);
//!
//! assert_eq!(scene.element_at(root, Point::new(15.0, -50.0)).unwrap(), Some(rect));
//! assert_eq!(scene.element_at(root, Point::new(70.0, 15.0)).unwrap(), None);
//! ```

mod affine;
mod edit;
mod error;
mod font;
mod geometry;
mod node;
mod scene;
mod shape;
mod surface;
mod types;

pub use affine::{AffineTransform, SNAP_EPSILON};
pub use error::{Result, SceneError};
pub use font::{ApproximateMetrics, Font, FontMetrics, FontStyle, ImageResolver, NoImages};
pub use scene::{RepaintNotifier, Scene};
pub use shape::Shape;
pub use surface::{DrawOp, Event, RecordingSurface, StateOp, Surface, SurfaceState};
pub use types::{Hit, HitTolerance, LocalNode, NodeFlags, NodeId, SceneOptions, ZOrder};
