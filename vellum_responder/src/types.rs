// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the responder: pointer events, phases, outcomes, hits,
//! lookups, and dispatch steps.
//!
//! ## Overview
//!
//! These types describe the routing protocol and its inputs/outputs.
//! They are consumed by the [`router`](crate::router) and the
//! [`pointer`](crate::pointer) state machine.

use kurbo::Point;

/// What happened to the pointer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerKind {
    /// A button went down.
    Pressed,
    /// A button went up.
    Released,
    /// The pointer moved with no button held.
    Moved,
    /// The pointer moved while a button was held.
    Dragged,
    /// The pointer entered a node, or the host surface.
    Entered,
    /// The pointer left a node, or the host surface.
    Exited,
}

/// Which button a press or release refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the wheel button.
    Auxiliary,
}

/// A pointer event as delivered by the host, in host-surface coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Event kind.
    pub kind: PointerKind,
    /// Pointer location on the host surface.
    pub position: Point,
    /// Button involved, for presses and releases.
    pub button: Option<PointerButton>,
}

impl PointerEvent {
    /// An event of `kind` at `(x, y)` with no button.
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            button: None,
        }
    }

    /// Primary-button press at `(x, y)`.
    pub fn press(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Pressed, x, y).with_button(PointerButton::Primary)
    }

    /// Primary-button release at `(x, y)`.
    pub fn release(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Released, x, y).with_button(PointerButton::Primary)
    }

    /// Hover move to `(x, y)`.
    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Moved, x, y)
    }

    /// Drag to `(x, y)`.
    pub fn dragged(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Dragged, x, y)
    }

    /// Set the button.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }
}

/// Phases of event propagation.
///
/// Appears on each [`Dispatch`] item produced by
/// [`Router::handle_with_hits`](crate::router::Router::handle_with_hits).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Parent-to-target traversal.
    Capture,
    /// Target node.
    Target,
    /// Target-to-parent traversal.
    Bubble,
}

/// Handler outcome controlling propagation.
///
/// Returned by the handler passed to
/// [`deliver`](crate::pointer::deliver) to continue within a group, skip the
/// rest of it, or abort delivery altogether.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Continue within the current phase.
    Continue,
    /// Stop propagation within the current phase.
    Stop,
    /// Stop and mark consumed.
    StopAndConsume,
}

/// Per-node local coordinates of a hit.
///
/// `points[i]` is the event location expressed in the local space of the
/// `i`-th node of the hit's root→target path. An empty localizer means no
/// local coordinates are known.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Localizer {
    points: Vec<Point>,
}

impl Localizer {
    /// Wrap points aligned with a root→target path.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Local point for the node at `depth` along the path.
    pub fn at(&self, depth: usize) -> Option<Point> {
        self.points.get(depth).copied()
    }

    /// Returns `true` if no local coordinates are carried.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A resolved hit to be routed.
///
/// Typically obtained from a scene hit test (see the `scene_adapter`
/// feature). It is the input to
/// [`Router::handle_with_hits`](crate::router::Router::handle_with_hits).
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedHit<K> {
    /// Node key associated with the hit.
    pub node: K,
    /// Optional root→target path; if absent, the router may consult [`ParentLookup`] to derive one.
    pub path: Option<Vec<K>>,
    /// Local coordinates aligned with `path`.
    pub localizer: Localizer,
}

impl<K> ResolvedHit<K> {
    /// A hit on `node` with no path and no local coordinates.
    pub fn bare(node: K) -> Self {
        Self {
            node,
            path: None,
            localizer: Localizer::default(),
        }
    }
}

/// Look up the parent of a node to reconstruct a root→target path for propagation.
///
/// The [router](crate::router::Router) consults this when a [`ResolvedHit::path`] is absent, if you
/// construct it via [`Router::with_parent`](crate::router::Router::with_parent).
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A parent provider for flat key spaces: every node is a root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    #[inline]
    fn parent_of(&self, _node: &K) -> Option<K> {
        None
    }
}

/// A single dispatch step.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch<K> {
    /// Propagation phase for this step (capture, target, or bubble).
    pub phase: Phase,
    /// Node associated with this dispatch step.
    pub node: K,
    /// Event location in `node`'s local space, when known.
    pub local: Option<Point>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localizer_indexes_by_depth() {
        let l = Localizer::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 3.0)]);
        assert_eq!(l.at(1), Some(Point::new(2.0, 3.0)));
        assert_eq!(l.at(2), None);
        assert!(Localizer::default().is_empty());
    }

    #[test]
    fn press_and_release_carry_primary_button() {
        let p = PointerEvent::press(3.0, 4.0);
        assert_eq!(p.kind, PointerKind::Pressed);
        assert_eq!(p.button, Some(PointerButton::Primary));
        assert_eq!(PointerEvent::release(0.0, 0.0).button, Some(PointerButton::Primary));
        assert_eq!(PointerEvent::moved(1.0, 2.0).button, None);
        assert_eq!(
            PointerEvent::dragged(0.0, 0.0)
                .with_button(PointerButton::Secondary)
                .button,
            Some(PointerButton::Secondary)
        );
    }
}
