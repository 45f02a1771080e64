// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer state machine: press/drag capture and hover transitions on top of
//! the [`Router`].
//!
//! ## Rules
//!
//! - A press captures the node under the pointer. Drags and the matching
//!   release go to that node wherever the pointer is, and the release frees it.
//! - Hover is frozen while a button is held, then resynchronized on release.
//! - A hover change exits the old nodes before entering the new ones, and
//!   both come before the move that caused them.
//! - The pointer leaving the host surface exits everything hovered.

use kurbo::Point;
use tracing::trace;

use crate::hover::{HoverEvent, HoverState, path_from_dispatch};
use crate::router::Router;
use crate::types::{
    Dispatch, NoParent, Outcome, ParentLookup, Phase, PointerButton, PointerEvent, PointerKind,
    ResolvedHit,
};

/// An event addressed to one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEvent<K> {
    /// Receiving node.
    pub node: K,
    /// What happened.
    pub kind: PointerKind,
    /// Propagation phase; hover transitions are always [`Phase::Target`].
    pub phase: Phase,
    /// Pointer location on the host surface.
    pub position: Point,
    /// Pointer location in `node`'s local space, when known.
    pub local: Option<Point>,
    /// Button involved, for presses and releases.
    pub button: Option<PointerButton>,
}

/// Turns host pointer events plus resolved hits into node events.
pub struct PointerRouter<K: Copy + Eq, P: ParentLookup<K> = NoParent> {
    router: Router<K, P>,
    hover: HoverState<K>,
    pressed: bool,
}

impl<K: Copy + Eq + core::fmt::Debug, P: ParentLookup<K>> core::fmt::Debug for PointerRouter<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointerRouter")
            .field("router", &self.router)
            .field("hover", &self.hover)
            .field("pressed", &self.pressed)
            .finish()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> Default for PointerRouter<K, P> {
    fn default() -> Self {
        Self::with_parent(P::default())
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> PointerRouter<K, P> {
    /// Create a pointer router with a default parent lookup.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K>> PointerRouter<K, P> {
    /// Create a pointer router with an explicit parent lookup.
    pub fn with_parent(parent: P) -> Self {
        Self {
            router: Router::with_parent(parent),
            hover: HoverState::new(),
            pressed: false,
        }
    }

    /// The underlying router.
    pub fn router(&self) -> &Router<K, P> {
        &self.router
    }

    /// Restrict hover and press targets; see [`Router::set_scope`].
    pub fn set_scope(&mut self, scope: Option<fn(&K) -> bool>) {
        self.router.set_scope(scope);
    }

    /// The node captured by the active press, if any.
    pub fn captured(&self) -> Option<K> {
        self.router.captured()
    }

    /// Whether a button is currently held.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The hovered root→target path.
    pub fn hovered(&self) -> &[K] {
        self.hover.current_path()
    }

    /// Drop the active press without delivering a release, for example when
    /// the captured node went away.
    pub fn cancel_press(&mut self) {
        self.router.capture(None);
        self.pressed = false;
    }

    /// Process one host event.
    ///
    /// `hits` are the candidates under `event.position`, back to front.
    pub fn handle(&mut self, event: &PointerEvent, hits: &[ResolvedHit<K>]) -> Vec<NodeEvent<K>> {
        self.handle_with_captured(event, hits, None)
    }

    /// Process one host event, with a separately resolved hit for the
    /// captured node.
    ///
    /// While a press is active, `captured` supplies the path and local
    /// coordinates of [`PointerRouter::captured`] wherever the pointer is.
    /// Without it, the captured node's path is rebuilt through the parent
    /// lookup and carries no local coordinates.
    pub fn handle_with_captured(
        &mut self,
        event: &PointerEvent,
        hits: &[ResolvedHit<K>],
        captured: Option<ResolvedHit<K>>,
    ) -> Vec<NodeEvent<K>> {
        match event.kind {
            PointerKind::Pressed => self.press(event, hits, captured),
            PointerKind::Released => self.release(event, hits, captured),
            PointerKind::Dragged => self.drag(event, hits, captured),
            PointerKind::Moved if self.pressed => self.drag(event, hits, captured),
            PointerKind::Moved | PointerKind::Entered => self.hover_move(event, hits),
            PointerKind::Exited => {
                let exits = self.hover.clear();
                hover_events(event, exits, &[])
            }
        }
    }

    /// Route to the captured node, preferring its dedicated hit.
    fn route_captured(
        &self,
        hits: &[ResolvedHit<K>],
        captured: Option<ResolvedHit<K>>,
    ) -> Vec<Dispatch<K>> {
        match captured {
            Some(hit) => self.router.handle_with_hits(core::slice::from_ref(&hit)),
            None => self.router.handle_with_hits(hits),
        }
    }

    fn press(
        &mut self,
        event: &PointerEvent,
        hits: &[ResolvedHit<K>],
        captured: Option<ResolvedHit<K>>,
    ) -> Vec<NodeEvent<K>> {
        if self.pressed {
            // Additional button on an active press goes to the captured node.
            return self.drag(event, hits, captured);
        }
        let seq = self.router.handle_with_hits(hits);
        self.pressed = true;
        let target = seq.iter().find(|d| d.phase == Phase::Target).map(|d| d.node);
        self.router.capture(target);
        trace!(captured = target.is_some(), "press");
        node_events(event, &seq)
    }

    fn drag(
        &mut self,
        event: &PointerEvent,
        hits: &[ResolvedHit<K>],
        captured: Option<ResolvedHit<K>>,
    ) -> Vec<NodeEvent<K>> {
        if self.router.captured().is_none() {
            // The press landed on nothing; so does everything until release.
            return Vec::new();
        }
        node_events(event, &self.route_captured(hits, captured))
    }

    fn release(
        &mut self,
        event: &PointerEvent,
        hits: &[ResolvedHit<K>],
        captured: Option<ResolvedHit<K>>,
    ) -> Vec<NodeEvent<K>> {
        let mut out = if !self.pressed || self.router.captured().is_some() {
            node_events(event, &self.route_captured(hits, captured))
        } else {
            Vec::new()
        };
        self.router.capture(None);
        self.pressed = false;
        trace!("release");

        let seq = self.router.handle_with_hits(hits);
        let transitions = self.hover.update_path(&path_from_dispatch(&seq));
        out.extend(hover_events(event, transitions, &seq));
        out
    }

    fn hover_move(&mut self, event: &PointerEvent, hits: &[ResolvedHit<K>]) -> Vec<NodeEvent<K>> {
        let seq = self.router.handle_with_hits(hits);
        let transitions = self.hover.update_path(&path_from_dispatch(&seq));
        let mut out = hover_events(event, transitions, &seq);
        if event.kind == PointerKind::Moved {
            out.extend(node_events(event, &seq));
        }
        out
    }
}

fn node_events<K: Copy>(event: &PointerEvent, seq: &[Dispatch<K>]) -> Vec<NodeEvent<K>> {
    seq.iter()
        .map(|d| NodeEvent {
            node: d.node,
            kind: event.kind,
            phase: d.phase,
            position: event.position,
            local: d.local,
            button: event.button,
        })
        .collect()
}

fn hover_events<K: Copy + Eq>(
    event: &PointerEvent,
    transitions: Vec<HoverEvent<K>>,
    seq: &[Dispatch<K>],
) -> Vec<NodeEvent<K>> {
    transitions
        .into_iter()
        .map(|t| {
            let (node, kind, local) = match t {
                HoverEvent::Enter(node) => {
                    let local = seq.iter().find(|d| d.node == node).and_then(|d| d.local);
                    (node, PointerKind::Entered, local)
                }
                HoverEvent::Exit(node) => (node, PointerKind::Exited, None),
            };
            NodeEvent {
                node,
                kind,
                phase: Phase::Target,
                position: event.position,
                local,
                button: None,
            }
        })
        .collect()
}

/// Deliver `events` to `handler` in order, honoring its [`Outcome`]s.
///
/// Events are grouped into runs that share kind and phase. [`Outcome::Stop`]
/// skips the rest of the current run. [`Outcome::StopAndConsume`] abandons
/// everything that remains. Returns `true` if the events were consumed.
pub fn deliver<K>(
    events: &[NodeEvent<K>],
    mut handler: impl FnMut(&NodeEvent<K>) -> Outcome,
) -> bool {
    let mut i = 0;
    while i < events.len() {
        let run = (events[i].kind, events[i].phase);
        match handler(&events[i]) {
            Outcome::Continue => i += 1,
            Outcome::Stop => {
                i += 1;
                while i < events.len() && (events[i].kind, events[i].phase) == run {
                    i += 1;
                }
            }
            Outcome::StopAndConsume => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Parents;
    impl ParentLookup<u32> for Parents {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            (*node >= 10).then_some(*node / 10)
        }
    }

    fn at(node: u32) -> Vec<ResolvedHit<u32>> {
        vec![ResolvedHit::bare(node)]
    }

    fn summary(out: &[NodeEvent<u32>]) -> Vec<(PointerKind, Phase, u32)> {
        out.iter().map(|e| (e.kind, e.phase, e.node)).collect()
    }

    #[test]
    fn move_emits_hover_then_dispatch() {
        let mut p: PointerRouter<u32, Parents> = PointerRouter::new();
        let out = p.handle(&PointerEvent::moved(0.0, 0.0), &at(12));
        assert_eq!(
            summary(&out)[..3],
            [
                (PointerKind::Entered, Phase::Target, 1),
                (PointerKind::Entered, Phase::Target, 12),
                (PointerKind::Moved, Phase::Capture, 1),
            ]
        );
        assert_eq!(out.len(), 2 + 5);
        assert_eq!(p.hovered(), &[1, 12]);
    }

    #[test]
    fn moving_off_everything_exits() {
        let mut p: PointerRouter<u32, Parents> = PointerRouter::new();
        let _ = p.handle(&PointerEvent::moved(0.0, 0.0), &at(12));
        let out = p.handle(&PointerEvent::moved(0.0, 0.0), &[]);
        assert_eq!(
            summary(&out),
            vec![
                (PointerKind::Exited, Phase::Target, 12),
                (PointerKind::Exited, Phase::Target, 1),
            ]
        );
    }

    #[test]
    fn press_on_nothing_swallows_drag() {
        let mut p: PointerRouter<u32> = PointerRouter::new();
        assert!(p.handle(&PointerEvent::press(0.0, 0.0), &[]).is_empty());
        assert!(p.is_pressed());
        assert!(p.handle(&PointerEvent::dragged(1.0, 1.0), &at(5)).is_empty());
        let out = p.handle(&PointerEvent::release(1.0, 1.0), &at(5));
        // Release goes nowhere, then hover catches up with the pointer.
        assert_eq!(summary(&out), vec![(PointerKind::Entered, Phase::Target, 5)]);
        assert!(!p.is_pressed());
    }

    #[test]
    fn host_exit_keeps_capture() {
        let mut p: PointerRouter<u32> = PointerRouter::new();
        let _ = p.handle(&PointerEvent::moved(0.0, 0.0), &at(3));
        let _ = p.handle(&PointerEvent::press(0.0, 0.0), &at(3));
        let out = p.handle(&PointerEvent::new(PointerKind::Exited, -5.0, 0.0), &[]);
        assert_eq!(summary(&out), vec![(PointerKind::Exited, Phase::Target, 3)]);
        assert_eq!(p.captured(), Some(3));
        let out = p.handle(&PointerEvent::dragged(-9.0, 0.0), &[]);
        assert!(out.iter().all(|e| e.node == 3 && e.kind == PointerKind::Dragged));
    }

    #[test]
    fn cancel_press_releases_capture() {
        let mut p: PointerRouter<u32> = PointerRouter::new();
        let _ = p.handle(&PointerEvent::press(0.0, 0.0), &at(3));
        p.cancel_press();
        assert_eq!(p.captured(), None);
        assert!(!p.is_pressed());
    }

    #[test]
    fn deliver_honors_outcomes() {
        let mut p: PointerRouter<u32, Parents> = PointerRouter::new();
        let out = p.handle(&PointerEvent::moved(0.0, 0.0), &at(12));

        let mut seen = Vec::new();
        let consumed = deliver(&out, |e| {
            seen.push((e.kind, e.phase, e.node));
            if e.kind == PointerKind::Entered || e.phase == Phase::Capture {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert!(!consumed);
        assert_eq!(
            seen,
            vec![
                (PointerKind::Entered, Phase::Target, 1),
                (PointerKind::Moved, Phase::Capture, 1),
                (PointerKind::Moved, Phase::Target, 12),
                (PointerKind::Moved, Phase::Bubble, 12),
                (PointerKind::Moved, Phase::Bubble, 1),
            ]
        );

        let mut count = 0;
        assert!(deliver(&out, |_| {
            count += 1;
            Outcome::StopAndConsume
        }));
        assert_eq!(count, 1);
    }
}
