// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state: enter/exit transitions from consecutive root→target paths.
//!
//! ## Usage
//!
//! 1) Route a pointer move with the [`Router`](crate::router::Router).
//! 2) Extract the root→target path with [`path_from_dispatch`].
//! 3) Feed it to [`HoverState::update_path`] to get `Exit(..)` / `Enter(..)` transitions.
//!
//! ```
//! use vellum_responder::hover::{HoverEvent, HoverState};
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update_path(&[1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update_path(&[1, 3]), vec![HoverEvent::Exit(2), HoverEvent::Enter(3)]);
//! ```

use crate::types::{Dispatch, Phase};

/// Hover state machine over root→target paths.
///
/// Exits are emitted inner-most first, then enters outer-most first, so a
/// node is always exited before its replacement is entered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer now covers this node.
    Enter(K),
    /// The pointer no longer covers this node.
    Exit(K),
}

impl<K> HoverEvent<K> {
    /// The node the transition concerns.
    pub fn node(&self) -> &K {
        match self {
            Self::Enter(k) | Self::Exit(k) => k,
        }
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The currently hovered root→target path.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// Forget the hovered path, exiting every node on it inner-most first.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        self.current.drain(..).rev().map(HoverEvent::Exit).collect()
    }

    /// Move to `new_path` and return the transitions needed to get there.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        // Depth of the shared ancestry.
        let shared = self
            .current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();

        let exits = self.current[shared..].iter().rev().map(|&k| HoverEvent::Exit(k));
        let enters = new_path[shared..].iter().map(|&k| HoverEvent::Enter(k));
        let out = exits.chain(enters).collect();

        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }
}

/// Extract the root→target path from a router dispatch sequence.
///
/// Relies on the sequence opening with the capture phase, as the router in
/// this crate produces.
pub fn path_from_dispatch<K: Copy>(seq: &[Dispatch<K>]) -> Vec<K> {
    seq.iter()
        .take_while(|d| d.phase == Phase::Capture)
        .map(|d| d.node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_path_enters_outer_to_inner() {
        let mut h: HoverState<u32> = HoverState::new();
        let ev = h.update_path(&[1, 2, 3]);
        assert_eq!(
            ev,
            vec![
                HoverEvent::Enter(1),
                HoverEvent::Enter(2),
                HoverEvent::Enter(3)
            ]
        );
        assert_eq!(h.current_path(), &[1, 2, 3]);
    }

    #[test]
    fn clear_exits_inner_to_outer() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2]);
        assert_eq!(h.clear(), vec![HoverEvent::Exit(2), HoverEvent::Exit(1)]);
        assert!(h.current_path().is_empty());
        assert!(h.clear().is_empty());
    }

    #[test]
    fn sibling_change_exits_before_entering() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2, 3]);
        let ev = h.update_path(&[1, 4]);
        assert_eq!(
            ev,
            vec![
                HoverEvent::Exit(3),
                HoverEvent::Exit(2),
                HoverEvent::Enter(4)
            ]
        );
    }

    #[test]
    fn disjoint_paths_swap_everything() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2]);
        let ev = h.update_path(&[4, 5]);
        assert_eq!(
            ev,
            vec![
                HoverEvent::Exit(2),
                HoverEvent::Exit(1),
                HoverEvent::Enter(4),
                HoverEvent::Enter(5),
            ]
        );
        assert_eq!(h.current_path(), &[4, 5]);
    }

    #[test]
    fn deeper_path_only_enters_the_tail() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[1, 2]);
        assert_eq!(h.update_path(&[1, 2, 3]), vec![HoverEvent::Enter(3)]);
        assert_eq!(h.update_path(&[1]), vec![HoverEvent::Exit(3), HoverEvent::Exit(2)]);
    }

    #[test]
    fn same_path_has_no_transitions() {
        let mut h: HoverState<u32> = HoverState::new();
        let _ = h.update_path(&[7, 8]);
        assert!(h.update_path(&[7, 8]).is_empty());
    }

    #[test]
    fn path_is_read_from_capture_phase() {
        let seq = [
            Dispatch { phase: Phase::Capture, node: 1_u32, local: None },
            Dispatch { phase: Phase::Capture, node: 2, local: None },
            Dispatch { phase: Phase::Target, node: 2, local: None },
            Dispatch { phase: Phase::Bubble, node: 2, local: None },
            Dispatch { phase: Phase::Bubble, node: 1, local: None },
        ];
        assert_eq!(path_from_dispatch(&seq), vec![1, 2]);
    }
}
