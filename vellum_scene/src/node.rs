// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node storage held in the scene arena.

use kurbo::{Affine, Point};
use parking_lot::Mutex;
use peniko::Color;

use crate::affine::AffineTransform;
use crate::error::Result;
use crate::shape::Shape;
use crate::types::{LocalNode, NodeFlags, NodeId};

/// One arena slot: the node's scalar state and, for containers, its child list.
///
/// The two live behind separate locks. A traversal holds a container's child
/// list while it locks each child's state in turn, never the other way round.
#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) state: Mutex<NodeState>,
    pub(crate) children: Option<Mutex<Vec<NodeId>>>,
}

impl Slot {
    pub(crate) fn new(local: LocalNode) -> Self {
        Self::from_state(NodeState::from_local(local))
    }

    pub(crate) fn from_state(state: NodeState) -> Self {
        let children = state.shape.is_container().then(|| Mutex::new(Vec::new()));
        Self {
            state: Mutex::new(state),
            children,
        }
    }
}

/// Mutable state of a single node.
#[derive(Clone, Debug)]
pub(crate) struct NodeState {
    pub(crate) parent: Option<NodeId>,
    pub(crate) position: Point,
    pub(crate) transform: AffineTransform,
    /// Cached inverse of `transform`; `None` until requested after a change.
    inverse: Option<AffineTransform>,
    pub(crate) color: Option<Color>,
    pub(crate) fill_color: Option<Color>,
    pub(crate) line_width: f64,
    pub(crate) flags: NodeFlags,
    pub(crate) shape: Shape,
}

impl NodeState {
    fn from_local(local: LocalNode) -> Self {
        let mut flags = local.flags;
        if !local.transform.is_identity() {
            flags |= NodeFlags::TRANSFORMED;
        }
        Self {
            parent: None,
            position: local.position,
            transform: local.transform,
            inverse: None,
            color: local.color,
            fill_color: local.fill_color,
            line_width: local.line_width,
            flags,
            shape: local.shape,
        }
    }

    /// Compose onto the node's own transform and mark it transformed.
    pub(crate) fn compose(&mut self, f: impl FnOnce(&mut AffineTransform)) {
        f(&mut self.transform);
        self.inverse = None;
        self.flags |= NodeFlags::TRANSFORMED;
    }

    /// `translate(position) · transform`: local space to parent space.
    pub(crate) fn full_transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2()) * self.transform.as_affine()
    }

    /// Map a point from parent space into untransformed local space.
    pub(crate) fn to_local(&mut self, p: Point) -> Result<Point> {
        let inverse = match self.inverse {
            Some(inv) => inv,
            None => {
                let inv = self.transform.invert()?;
                self.inverse = Some(inv);
                inv
            }
        };
        Ok(inverse * (p - self.position.to_vec2()))
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    pub(crate) fn is_filled(&self) -> bool {
        self.flags.contains(NodeFlags::FILLED)
    }

    /// Fresh, unowned copy of this node's scalar state.
    pub(crate) fn detached_copy(&self) -> Self {
        Self {
            parent: None,
            ..self.clone()
        }
    }
}
