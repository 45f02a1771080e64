// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, local node data, and options.

use kurbo::Point;
use peniko::Color;

use crate::affine::AffineTransform;
use crate::font::Font;
use crate::shape::Shape;

/// Identifier for a node in a [`Scene`](crate::Scene).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-node state bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is painted and participates in hit testing.
        const VISIBLE     = 0b0000_0001;
        /// Node interior is painted with its fill color.
        const FILLED      = 0b0000_0010;
        /// Node was rotated, scaled, sheared, or translated through its own transform.
        /// Size-bearing shapes refuse to be resized once this is set.
        const TRANSFORMED = 0b0000_0100;
        /// Container is complete: its child list can no longer change.
        const SEALED      = 0b0000_1000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Local data for a node, used when inserting it into a [`Scene`](crate::Scene).
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Position of the node's local origin in its container's coordinate space.
    pub position: Point,
    /// The node's own transform, applied before the position offset.
    pub transform: AffineTransform,
    /// Explicit stroke color. `None` inherits the nearest ancestor's color.
    pub color: Option<Color>,
    /// Explicit fill color. `None` fills with the stroke color.
    pub fill_color: Option<Color>,
    /// Stroke width in local units.
    pub line_width: f64,
    /// Visibility and fill flags.
    pub flags: NodeFlags,
    /// Geometry payload.
    pub shape: Shape,
}

impl LocalNode {
    /// Local data for `shape` with defaults for everything else.
    pub fn new(shape: Shape) -> Self {
        Self {
            position: Point::ORIGIN,
            transform: AffineTransform::IDENTITY,
            color: None,
            fill_color: None,
            line_width: 1.0,
            flags: NodeFlags::default(),
            shape,
        }
    }

    /// Set the position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Set an explicit stroke color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Fill the node, optionally with a color different from the stroke color.
    #[must_use]
    pub fn filled(mut self, fill_color: Option<Color>) -> Self {
        self.flags |= NodeFlags::FILLED;
        self.fill_color = fill_color;
        self
    }

    /// Set the stroke width.
    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }
}

/// Result of a hit test.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    /// The front-most leaf under the point.
    pub node: NodeId,
    /// Path from the queried container to `node` (inclusive).
    pub path: Vec<NodeId>,
    /// The query point expressed in each path entry's local space.
    ///
    /// `local[i]` is in the untransformed space of `path[i]`'s children for
    /// containers, and in the shape's own local space for the leaf.
    pub local: Vec<Point>,
}

/// Tolerances used by containment tests of open shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTolerance {
    /// Maximum distance, in local units, from a line segment that still counts as a hit.
    pub line: f64,
    /// Half-width, in local units, of the band around an unfilled arc that counts
    /// as a hit. Half the node's line width is added on top.
    pub arc: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            line: 1.5,
            arc: 1.5,
        }
    }
}

/// Scene-wide configuration.
#[derive(Clone, Debug)]
pub struct SceneOptions {
    /// Color used by nodes with no explicit color anywhere up their ancestry.
    pub default_color: Color,
    /// Font used by labels that do not name one.
    pub default_font: Font,
    /// Containment tolerances for open shapes.
    pub tolerance: HitTolerance,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            default_color: Color::BLACK,
            default_font: Font::default(),
            tolerance: HitTolerance::default(),
        }
    }
}

/// A z-order request for a node within its container.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ZOrder {
    /// Move to the end of the child list (painted last, hit first).
    Front,
    /// Move to the start of the child list.
    Back,
    /// Swap with the next sibling.
    Forward,
    /// Swap with the previous sibling.
    Backward,
}
