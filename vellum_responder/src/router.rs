// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Picks a target from resolved hits, reconstructs its path, and emits a
//! capture → target → bubble sequence for it.
//!
//! ## Target Selection
//!
//! - Hits are expected in back-to-front order, as a scene lists its children.
//! - `set_scope` filters candidates first.
//! - The last remaining candidate wins.
//! - `capture` overrides selection entirely until released.
//!
//! ## See Also
//!
//! [`hover`](crate::hover) for hover transitions derived from the dispatch sequence.

use tracing::trace;

use crate::types::{Dispatch, Localizer, NoParent, ParentLookup, Phase, ResolvedHit};

/// Deterministic responder chain router.
///
/// ## Usage
///
/// - Construct with [`Router::new`] when hits always carry a full path, or
///   with [`Router::with_parent`] to enable path reconstruction via a
///   [`ParentLookup`].
/// - Optionally restrict candidates with [`Router::set_scope`], or pin every
///   event to one node with [`Router::capture`].
/// - Call [`Router::handle_with_hits`] for each input event.
pub struct Router<K, P: ParentLookup<K> = NoParent> {
    parent: P,
    scope: Option<fn(&K) -> bool>,
    capture: Option<K>,
}

impl<K: Copy + Eq + core::fmt::Debug, P: ParentLookup<K>> core::fmt::Debug for Router<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("scoped", &self.scope.is_some())
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> Router<K, P> {
    /// Create a router with a default parent lookup.
    pub fn new() -> Self {
        Self::with_parent(P::default())
    }
}

impl<K: Copy + Eq, P: ParentLookup<K> + Default> Default for Router<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq, P: ParentLookup<K>> Router<K, P> {
    /// Create a router with an explicit parent lookup provider.
    pub fn with_parent(parent: P) -> Self {
        Self {
            parent,
            scope: None,
            capture: None,
        }
    }

    /// Set an optional scope filter; only nodes that satisfy the predicate are considered.
    ///
    /// Capture bypasses the scope.
    pub fn set_scope(&mut self, scope: Option<fn(&K) -> bool>) {
        self.scope = scope;
    }

    /// Route every event to `node` until called again with `None`.
    pub fn capture(&mut self, node: Option<K>) {
        self.capture = node;
    }

    /// The node currently capturing events, if any.
    pub fn captured(&self) -> Option<K> {
        self.capture
    }

    /// The parent lookup in use.
    pub fn parents(&self) -> &P {
        &self.parent
    }

    /// Handle a sequence of hits ordered back to front and produce a
    /// propagation sequence.
    pub fn handle_with_hits(&self, hits: &[ResolvedHit<K>]) -> Vec<Dispatch<K>> {
        if let Some(cap) = self.capture {
            // Prefer the last hit naming the captured node for its path and
            // local coordinates.
            let (path, localizer) = match hits.iter().rev().find(|h| h.node == cap) {
                Some(h) => (self.path_of(h), h.localizer.clone()),
                None => (self.reconstruct_path(cap), Localizer::default()),
            };
            trace!(depth = path.len(), "routing to captured node");
            return Self::emit_path(&path, &localizer);
        }

        let best = hits
            .iter()
            .rev()
            .find(|h| self.scope.is_none_or(|allowed| allowed(&h.node)));
        let Some(best) = best else {
            return Vec::new();
        };
        Self::emit_path(&self.path_of(best), &best.localizer)
    }

    fn path_of(&self, hit: &ResolvedHit<K>) -> Vec<K> {
        match &hit.path {
            Some(path) if path.last() == Some(&hit.node) => path.clone(),
            _ => self.reconstruct_path(hit.node),
        }
    }

    fn reconstruct_path(&self, target: K) -> Vec<K> {
        let mut out = vec![target];
        let mut cur = target;
        // Collect to root; callers guarantee acyclic ancestry.
        while let Some(p) = self.parent.parent_of(&cur) {
            out.push(p);
            cur = p;
        }
        out.reverse();
        out
    }

    fn emit_path(path: &[K], localizer: &Localizer) -> Vec<Dispatch<K>> {
        let Some((&target, _)) = path.split_last() else {
            return Vec::new();
        };
        let step = |phase, depth: usize, node| Dispatch {
            phase,
            node,
            local: localizer.at(depth),
        };
        let depth = path.len() - 1;
        let mut out = Vec::with_capacity(path.len() * 2 + 1);
        out.extend(path.iter().enumerate().map(|(i, &n)| step(Phase::Capture, i, n)));
        out.push(step(Phase::Target, depth, target));
        out.extend(path.iter().enumerate().rev().map(|(i, &n)| step(Phase::Bubble, i, n)));
        out
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct Node(u32);

    #[derive(Default)]
    struct Parents;
    impl ParentLookup<Node> for Parents {
        fn parent_of(&self, node: &Node) -> Option<Node> {
            match node.0 {
                3 => Some(Node(2)),
                2 => Some(Node(1)),
                _ => None,
            }
        }
    }

    fn hit(node: u32, path: &[u32]) -> ResolvedHit<Node> {
        ResolvedHit {
            node: Node(node),
            path: Some(path.iter().map(|n| Node(*n)).collect()),
            localizer: Localizer::default(),
        }
    }

    fn phases(out: &[Dispatch<Node>]) -> Vec<(Phase, u32)> {
        out.iter().map(|d| (d.phase, d.node.0)).collect()
    }

    fn target(out: &[Dispatch<Node>]) -> u32 {
        out.iter()
            .find(|d| d.phase == Phase::Target)
            .map(|d| d.node.0)
            .unwrap()
    }

    #[test]
    fn simple_path_dispatch() {
        let router: Router<Node> = Router::new();
        let out = router.handle_with_hits(&[hit(3, &[1, 2, 3])]);
        assert_eq!(
            phases(&out),
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Capture, 3),
                (Phase::Target, 3),
                (Phase::Bubble, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn front_most_hit_wins() {
        let router: Router<Node> = Router::new();
        let out = router.handle_with_hits(&[hit(1, &[1]), hit(2, &[2])]);
        assert_eq!(target(&out), 2);
    }

    #[test]
    fn no_hits_no_dispatch() {
        let router: Router<Node> = Router::new();
        assert!(router.handle_with_hits(&[]).is_empty());
    }

    #[test]
    fn scope_filter_selects_allowed_hit() {
        let mut router: Router<Node> = Router::new();
        router.set_scope(Some(|n: &Node| (n.0 & 1) == 0));
        let out = router.handle_with_hits(&[hit(2, &[2]), hit(1, &[1])]);
        assert_eq!(target(&out), 2);
        assert_eq!(out.iter().filter(|d| d.phase == Phase::Target).count(), 1);
    }

    #[test]
    fn parent_lookup_reconstructs_missing_path() {
        let router: Router<Node, Parents> = Router::new();
        let out = router.handle_with_hits(&[ResolvedHit::bare(Node(3))]);
        assert_eq!(
            phases(&out)[..4],
            [
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Capture, 3),
                (Phase::Target, 3),
            ]
        );
    }

    #[test]
    fn singleton_path_without_parent_or_path() {
        let router: Router<Node> = Router::new();
        let out = router.handle_with_hits(&[ResolvedHit::bare(Node(9))]);
        assert_eq!(
            phases(&out),
            vec![(Phase::Capture, 9), (Phase::Target, 9), (Phase::Bubble, 9)]
        );
    }

    #[test]
    fn capture_overrides_selection_and_reconstructs_path() {
        let mut router: Router<Node, Parents> = Router::with_parent(Parents);
        router.capture(Some(Node(3)));
        let out = router.handle_with_hits(&[hit(9, &[9])]);
        assert_eq!(target(&out), 3);
        assert_eq!(out.len(), 7);
        assert!(out.iter().all(|d| d.local.is_none()));
    }

    #[test]
    fn capture_prefers_last_matching_hit() {
        let mut router: Router<Node> = Router::new();
        router.capture(Some(Node(7)));
        let mut second = hit(7, &[1, 7]);
        second.localizer = Localizer::new(vec![Point::new(10.0, 10.0), Point::new(1.0, 2.0)]);
        let out = router.handle_with_hits(&[hit(7, &[7]), second, hit(8, &[8])]);
        assert_eq!(
            phases(&out),
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 7),
                (Phase::Target, 7),
                (Phase::Bubble, 7),
                (Phase::Bubble, 1),
            ]
        );
        assert_eq!(out[2].local, Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn capture_bypasses_scope_and_can_be_released() {
        let mut router: Router<Node> = Router::new();
        router.set_scope(Some(|n: &Node| (n.0 & 1) == 0));
        router.capture(Some(Node(3)));
        assert_eq!(target(&router.handle_with_hits(&[hit(2, &[2])])), 3);
        router.capture(None);
        assert_eq!(router.captured(), None);
        assert_eq!(target(&router.handle_with_hits(&[hit(2, &[2])])), 2);
    }

    #[test]
    fn local_points_follow_depth() {
        let router: Router<Node> = Router::new();
        let mut h = hit(3, &[1, 3]);
        h.localizer = Localizer::new(vec![Point::new(5.0, 5.0), Point::new(0.5, 0.5)]);
        let out = router.handle_with_hits(&[h]);
        let locals: Vec<_> = out.iter().map(|d| (d.node.0, d.local)).collect();
        assert_eq!(locals[0], (1, Some(Point::new(5.0, 5.0))));
        assert_eq!(locals[2], (3, Some(Point::new(0.5, 0.5))));
        assert_eq!(locals[4], (1, Some(Point::new(5.0, 5.0))));
    }
}
