// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use peniko::Color;
use vellum_scene::SceneOptions;

/// When the host hears about pending repaints.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RepaintPolicy {
    /// Run the repaint callback on every change to the scene.
    Immediate,
    /// Record changes and run the callback at most once per
    /// [`Canvas::flush`](crate::Canvas::flush).
    #[default]
    Coalesced,
}

/// Canvas configuration.
#[derive(Clone, Debug)]
pub struct CanvasOptions {
    /// Color the whole canvas is cleared to before the scene is painted.
    pub background: Color,
    /// Repaint scheduling.
    pub repaint: RepaintPolicy,
    /// Initial canvas size, in host-surface units.
    pub size: Size,
    /// Options for the owned scene.
    pub scene: SceneOptions,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            repaint: RepaintPolicy::default(),
            size: Size::ZERO,
            scene: SceneOptions::default(),
        }
    }
}
