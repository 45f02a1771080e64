// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing-surface interface consumed by [`Scene::paint`](crate::Scene::paint).
//!
//! The scene does not rasterize. It emits [`StateOp`]s (save/restore, transform,
//! color, stroke width) and [`DrawOp`]s (primitive strokes and fills) into any
//! [`Surface`]. Geometry in a [`DrawOp`] is in the node's local space; the
//! surface is responsible for applying the accumulated transform.
//!
//! [`RecordingSurface`] records every op together with a snapshot of the state
//! it was issued under, which is what tests and headless demos use.

use kurbo::{Affine, BezPath, Ellipse, Line, Point, Rect};
use peniko::{Color, Fill};

use crate::font::Font;

/// State operations.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Push a copy of the current state.
    Save,
    /// Pop back to the most recently saved state.
    Restore,
    /// Right-multiply a transform into the current transform.
    Transform(Affine),
    /// Set the current paint color.
    SetColor(Color),
    /// Set the current stroke width.
    SetStrokeWidth(f64),
}

/// Draw operations, expressed in the current local space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Outline a rectangle.
    StrokeRect(Rect),
    /// Fill a rectangle.
    FillRect(Rect),
    /// Outline an ellipse.
    StrokeEllipse(Ellipse),
    /// Fill an ellipse.
    FillEllipse(Ellipse),
    /// Outline a path.
    StrokePath(BezPath),
    /// Fill a path with the given fill rule.
    FillPath(BezPath, Fill),
    /// Stroke a single line segment.
    Line(Line),
    /// Draw text with its baseline starting at `origin`.
    Text {
        /// Text to draw.
        text: String,
        /// Font to set it in.
        font: Font,
        /// Left end of the baseline.
        origin: Point,
    },
    /// Blit a named image into `dst`.
    Image {
        /// Image name, as understood by the host's image store.
        name: String,
        /// Destination rectangle.
        dst: Rect,
    },
}

/// A drawing surface that accepts primitive draw commands.
pub trait Surface {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);
}

/// Snapshot of the state a [`RecordingSurface`] tracks.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceState {
    /// Accumulated transform.
    pub transform: Affine,
    /// Current paint color.
    pub color: Color,
    /// Current stroke width.
    pub stroke_width: f64,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            color: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// A recorded surface event.
#[derive(Clone, Debug)]
pub enum Event {
    /// State operation and the resulting state.
    State {
        /// Operation that was applied.
        op: StateOp,
        /// State after applying it.
        state: SurfaceState,
    },
    /// Draw operation and the state it was drawn under.
    Draw {
        /// Operation that was applied.
        op: DrawOp,
        /// State at the time of drawing.
        state: SurfaceState,
    },
}

/// Surface that records ops instead of rasterizing.
///
/// Unbalanced [`StateOp::Restore`]s are ignored.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    events: Vec<Event>,
    state: SurfaceState,
    stack: Vec<SurfaceState>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Recorded draw ops with the state each was drawn under.
    pub fn draws(&self) -> impl Iterator<Item = (&DrawOp, &SurfaceState)> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Draw { op, state } => Some((op, state)),
            Event::State { .. } => None,
        })
    }

    /// Current state.
    pub fn current(&self) -> &SurfaceState {
        &self.state
    }

    /// Depth of the save stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Forget all recorded events and reset the state.
    pub fn clear(&mut self) {
        self.events.clear();
        self.stack.clear();
        self.state = SurfaceState::default();
    }
}

impl Surface for RecordingSurface {
    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::Save => self.stack.push(self.state.clone()),
            StateOp::Restore => {
                if let Some(s) = self.stack.pop() {
                    self.state = s;
                }
            }
            StateOp::Transform(t) => self.state.transform = self.state.transform * *t,
            StateOp::SetColor(c) => self.state.color = *c,
            StateOp::SetStrokeWidth(w) => self.state.stroke_width = *w,
        }
        self.events.push(Event::State {
            op,
            state: self.state.clone(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        self.events.push(Event::Draw {
            op,
            state: self.state.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_scopes_state() {
        let mut s = RecordingSurface::new();
        s.state(StateOp::Save);
        s.state(StateOp::Transform(Affine::translate((5.0, 0.0))));
        s.state(StateOp::SetStrokeWidth(3.0));
        s.draw(DrawOp::Line(Line::new((0.0, 0.0), (1.0, 0.0))));
        s.state(StateOp::Restore);
        s.draw(DrawOp::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)));

        let draws: Vec<_> = s.draws().collect();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].1.transform, Affine::translate((5.0, 0.0)));
        assert_eq!(draws[0].1.stroke_width, 3.0);
        assert_eq!(draws[1].1.transform, Affine::IDENTITY);
        assert_eq!(draws[1].1.stroke_width, 1.0);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut s = RecordingSurface::new();
        s.state(StateOp::SetStrokeWidth(2.0));
        s.state(StateOp::Restore);
        assert_eq!(s.current().stroke_width, 2.0);
    }
}
