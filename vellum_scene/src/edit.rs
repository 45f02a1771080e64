// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node properties: position, transform, appearance, and the geometry
//! setters of the individual shape variants.

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

use crate::affine::AffineTransform;
use crate::error::{Result, SceneError};
use crate::font::Font;
use crate::geometry::ellipse_point;
use crate::node::NodeState;
use crate::scene::Scene;
use crate::shape::{Shape, append_polygon_arc};
use crate::types::{NodeFlags, NodeId};

fn unsupported<T>(op: &'static str) -> Result<T> {
    Err(SceneError::Unsupported { op })
}

fn resize(state: &mut NodeState, size: Size, op: &'static str) -> Result<()> {
    if !state.shape.is_resizable() {
        return unsupported(op);
    }
    if state.flags.contains(NodeFlags::TRANSFORMED) {
        return Err(SceneError::InvalidOperation {
            op,
            reason: "node has been transformed",
        });
    }
    state.shape.set_size(size)
}

fn polar(r: f64, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(r * cos, -r * sin)
}

/// Position and transform.
impl Scene {
    /// Position of `id` in its parent's space.
    pub fn position(&self, id: NodeId) -> Result<Point> {
        self.read(id, |s| s.position)
    }

    /// Move `id` to `(x, y)` in its parent's space.
    pub fn set_position(&self, id: NodeId, x: f64, y: f64) -> Result<()> {
        self.update(id, "set_position", |s| {
            s.position = Point::new(x, y);
            Ok(())
        })
    }

    /// Offset the position of `id`.
    pub fn move_by(&self, id: NodeId, dx: f64, dy: f64) -> Result<()> {
        self.update(id, "move_by", |s| {
            s.position += Vec2::new(dx, dy);
            Ok(())
        })
    }

    /// Offset the position of `id` by `r` along `degrees`, counterclockwise on screen.
    pub fn move_polar(&self, id: NodeId, r: f64, degrees: f64) -> Result<()> {
        let d = polar(r, degrees);
        self.move_by(id, d.x, d.y)
    }

    /// The node's own transform.
    pub fn transform(&self, id: NodeId) -> Result<AffineTransform> {
        self.read(id, |s| s.transform)
    }

    /// Whether `id` has been rotated, scaled, sheared, or translated.
    pub fn is_transformed(&self, id: NodeId) -> Result<bool> {
        self.read(id, |s| s.flags.contains(NodeFlags::TRANSFORMED))
    }

    /// Rotate `id` about its own origin, counterclockwise on screen.
    pub fn rotate(&self, id: NodeId, degrees: f64) -> Result<()> {
        self.update(id, "rotate", |s| {
            s.compose(|t| t.rotate(degrees));
            Ok(())
        })
    }

    /// Scale `id` about its own origin.
    pub fn scale(&self, id: NodeId, sx: f64, sy: f64) -> Result<()> {
        self.update(id, "scale", |s| {
            s.compose(|t| t.scale(sx, sy));
            Ok(())
        })
    }

    /// Shear `id` about its own origin.
    pub fn shear(&self, id: NodeId, shx: f64, shy: f64) -> Result<()> {
        self.update(id, "shear", |s| {
            s.compose(|t| t.shear(shx, shy));
            Ok(())
        })
    }

    /// Translate `id` through its own transform.
    ///
    /// Unlike [`Scene::move_by`], the offset is expressed in the node's
    /// transformed axes and marks the node as transformed.
    pub fn translate(&self, id: NodeId, tx: f64, ty: f64) -> Result<()> {
        self.update(id, "translate", |s| {
            s.compose(|t| t.translate(tx, ty));
            Ok(())
        })
    }

    /// Untransformed extent of `id`. Containers report zero.
    pub fn size(&self, id: NodeId) -> Result<Size> {
        let cx = self.cx();
        self.read(id, |s| s.shape.size(&cx))
    }

    /// Resize a rectangle, rounded rectangle, oval, arc, or image.
    ///
    /// Fails with [`SceneError::InvalidOperation`] once the node has been
    /// transformed, and with [`SceneError::Unsupported`] for other shapes.
    pub fn set_size(&self, id: NodeId, width: f64, height: f64) -> Result<()> {
        self.update(id, "set_size", |s| {
            resize(s, Size::new(width, height), "set_size")
        })
    }

    /// Move and resize in one step. Same restrictions as [`Scene::set_size`].
    pub fn set_frame(&self, id: NodeId, frame: Rect) -> Result<()> {
        self.update(id, "set_frame", |s| {
            resize(s, frame.size(), "set_frame")?;
            s.position = frame.origin();
            Ok(())
        })
    }
}

/// Appearance.
impl Scene {
    /// Stroke color of `id`: its own, else the nearest ancestor's, else the
    /// scene default.
    pub fn color(&self, id: NodeId) -> Result<Color> {
        let mut cur = id;
        loop {
            let (color, parent) = self.read(cur, |s| (s.color, s.parent))?;
            if let Some(color) = color {
                return Ok(color);
            }
            match parent {
                Some(parent) => cur = parent,
                None => return Ok(self.options().default_color),
            }
        }
    }

    /// Give `id` an explicit stroke color.
    pub fn set_color(&self, id: NodeId, color: Color) -> Result<()> {
        self.update(id, "set_color", |s| {
            s.color = Some(color);
            Ok(())
        })
    }

    /// Drop the explicit stroke color of `id` so it inherits again.
    pub fn inherit_color(&self, id: NodeId) -> Result<()> {
        self.update(id, "inherit_color", |s| {
            s.color = None;
            Ok(())
        })
    }

    /// Fill color of `id`, falling back to its stroke color.
    pub fn fill_color(&self, id: NodeId) -> Result<Color> {
        match self.read(id, |s| s.fill_color)? {
            Some(color) => Ok(color),
            None => self.color(id),
        }
    }

    /// Give `id` an explicit fill color.
    pub fn set_fill_color(&self, id: NodeId, color: Color) -> Result<()> {
        self.update(id, "set_fill_color", |s| {
            s.fill_color = Some(color);
            Ok(())
        })
    }

    /// Turn interior filling on or off.
    pub fn set_filled(&self, id: NodeId, filled: bool) -> Result<()> {
        self.update(id, "set_filled", |s| {
            s.flags.set(NodeFlags::FILLED, filled);
            Ok(())
        })
    }

    /// Whether `id` paints its interior.
    pub fn is_filled(&self, id: NodeId) -> Result<bool> {
        self.read(id, |s| s.is_filled())
    }

    /// Show or hide `id`. Hidden nodes are neither painted nor hit.
    pub fn set_visible(&self, id: NodeId, visible: bool) -> Result<()> {
        self.update(id, "set_visible", |s| {
            s.flags.set(NodeFlags::VISIBLE, visible);
            Ok(())
        })
    }

    /// Whether `id` is visible.
    pub fn is_visible(&self, id: NodeId) -> Result<bool> {
        self.read(id, |s| s.is_visible())
    }

    /// Set the stroke width.
    pub fn set_line_width(&self, id: NodeId, width: f64) -> Result<()> {
        self.update(id, "set_line_width", |s| {
            s.line_width = width;
            Ok(())
        })
    }

    /// Stroke width of `id`.
    pub fn line_width(&self, id: NodeId) -> Result<f64> {
        self.read(id, |s| s.line_width)
    }

    /// Current flags of `id`.
    pub fn flags(&self, id: NodeId) -> Result<NodeFlags> {
        self.read(id, |s| s.flags)
    }

    /// Copy of the shape payload of `id`.
    pub fn shape(&self, id: NodeId) -> Result<Shape> {
        self.read(id, |s| s.shape.clone())
    }
}

/// Lines.
impl Scene {
    /// Start of a line, in its parent's space. This is the node's position.
    pub fn start_point(&self, id: NodeId) -> Result<Point> {
        self.read(id, |s| match s.shape {
            Shape::Line(_) => Ok(s.position),
            _ => unsupported("start_point"),
        })?
    }

    /// End of a line, in its parent's space, ignoring the node's own transform.
    pub fn end_point(&self, id: NodeId) -> Result<Point> {
        self.read(id, |s| match s.shape {
            Shape::Line(d) => Ok(s.position + d),
            _ => unsupported("end_point"),
        })?
    }

    /// Move the start of a line, keeping its end point fixed.
    pub fn set_start_point(&self, id: NodeId, x: f64, y: f64) -> Result<()> {
        self.update(id, "set_start_point", |s| {
            let Shape::Line(d) = &mut s.shape else {
                return unsupported("set_start_point");
            };
            let end = s.position + *d;
            s.position = Point::new(x, y);
            *d = end - s.position;
            Ok(())
        })
    }

    /// Move the end of a line, keeping its start point fixed.
    pub fn set_end_point(&self, id: NodeId, x: f64, y: f64) -> Result<()> {
        self.update(id, "set_end_point", |s| {
            let Shape::Line(d) = &mut s.shape else {
                return unsupported("set_end_point");
            };
            *d = Point::new(x, y) - s.position;
            Ok(())
        })
    }
}

/// Arcs.
impl Scene {
    /// Start and sweep angles of an arc, in degrees.
    pub fn arc_angles(&self, id: NodeId) -> Result<(f64, f64)> {
        self.read(id, |s| match s.shape {
            Shape::Arc { start, sweep, .. } => Ok((start, sweep)),
            _ => unsupported("arc_angles"),
        })?
    }

    /// Set the start angle of an arc.
    pub fn set_start_angle(&self, id: NodeId, degrees: f64) -> Result<()> {
        self.update(id, "set_start_angle", |s| match &mut s.shape {
            Shape::Arc { start, .. } => {
                *start = degrees;
                Ok(())
            }
            _ => unsupported("set_start_angle"),
        })
    }

    /// Set the sweep angle of an arc. Negative sweeps run clockwise.
    pub fn set_sweep_angle(&self, id: NodeId, degrees: f64) -> Result<()> {
        self.update(id, "set_sweep_angle", |s| match &mut s.shape {
            Shape::Arc { sweep, .. } => {
                *sweep = degrees;
                Ok(())
            }
            _ => unsupported("set_sweep_angle"),
        })
    }

    /// Point where an arc begins, in its parent's space.
    pub fn arc_start_point(&self, id: NodeId) -> Result<Point> {
        self.arc_point(id, "arc_start_point", |start, _| start)
    }

    /// Point where an arc ends, in its parent's space.
    pub fn arc_end_point(&self, id: NodeId) -> Result<Point> {
        self.arc_point(id, "arc_end_point", |start, sweep| start + sweep)
    }

    fn arc_point(
        &self,
        id: NodeId,
        op: &'static str,
        angle: impl FnOnce(f64, f64) -> f64,
    ) -> Result<Point> {
        self.read(id, |s| match s.shape {
            Shape::Arc { size, start, sweep } => {
                let p = ellipse_point(size.width / 2.0, size.height / 2.0, angle(start, sweep));
                Ok(s.full_transform() * p)
            }
            _ => unsupported(op),
        })?
    }
}

/// Polygons.
impl Scene {
    /// Vertices of a polygon, in its local space.
    pub fn vertices(&self, id: NodeId) -> Result<Vec<Point>> {
        self.read(id, |s| match &s.shape {
            Shape::Polygon(v) => Ok(v.clone()),
            _ => unsupported("vertices"),
        })?
    }

    /// Append a vertex at `(x, y)`.
    pub fn add_vertex(&self, id: NodeId, x: f64, y: f64) -> Result<()> {
        self.edit_polygon(id, "add_vertex", |v| v.push(Point::new(x, y)))
    }

    /// Append a vertex offset by `(dx, dy)` from the last one.
    ///
    /// An empty polygon starts from its local origin.
    pub fn add_edge(&self, id: NodeId, dx: f64, dy: f64) -> Result<()> {
        self.edit_polygon(id, "add_edge", |v| push_edge(v, Vec2::new(dx, dy)))
    }

    /// Append a vertex `r` away from the last one along `degrees`.
    pub fn add_polar_edge(&self, id: NodeId, r: f64, degrees: f64) -> Result<()> {
        self.edit_polygon(id, "add_polar_edge", |v| push_edge(v, polar(r, degrees)))
    }

    /// Append vertices that trace an arc of the ellipse inscribed in
    /// `width × height`, starting at the last vertex.
    pub fn add_arc(
        &self,
        id: NodeId,
        width: f64,
        height: f64,
        start: f64,
        sweep: f64,
    ) -> Result<()> {
        self.edit_polygon(id, "add_arc", |v| {
            append_polygon_arc(v, width, height, start, sweep);
        })
    }

    fn edit_polygon(
        &self,
        id: NodeId,
        op: &'static str,
        f: impl FnOnce(&mut Vec<Point>),
    ) -> Result<()> {
        self.update(id, op, |s| match &mut s.shape {
            Shape::Polygon(v) => {
                f(v);
                Ok(())
            }
            _ => unsupported(op),
        })
    }
}

fn push_edge(vertices: &mut Vec<Point>, d: Vec2) {
    let last = *vertices.last().unwrap_or(&Point::ORIGIN);
    if vertices.is_empty() {
        vertices.push(last);
    }
    vertices.push(last + d);
}

/// Labels.
impl Scene {
    /// Text of a label.
    pub fn text(&self, id: NodeId) -> Result<String> {
        self.read(id, |s| match &s.shape {
            Shape::Label { text, .. } => Ok(text.clone()),
            _ => unsupported("text"),
        })?
    }

    /// Replace the text of a label.
    pub fn set_text(&self, id: NodeId, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        self.update(id, "set_text", |s| match &mut s.shape {
            Shape::Label { text, .. } => {
                *text = new;
                Ok(())
            }
            _ => unsupported("set_text"),
        })
    }

    /// Font a label is set in, resolving the scene default.
    pub fn font(&self, id: NodeId) -> Result<Font> {
        let default = &self.options().default_font;
        self.read(id, |s| match &s.shape {
            Shape::Label { font, .. } => Ok(font.clone().unwrap_or_else(|| default.clone())),
            _ => unsupported("font"),
        })?
    }

    /// Set the font of a label.
    pub fn set_font(&self, id: NodeId, new: Font) -> Result<()> {
        self.update(id, "set_font", |s| match &mut s.shape {
            Shape::Label { font, .. } => {
                *font = Some(new);
                Ok(())
            }
            _ => unsupported("set_font"),
        })
    }

    /// Distance from a label's baseline to the top of its tallest glyphs.
    pub fn ascent(&self, id: NodeId) -> Result<f64> {
        let font = self.font(id)?;
        Ok(self.cx().metrics.ascent(&font))
    }

    /// Distance from a label's baseline to the bottom of its lowest glyphs.
    pub fn descent(&self, id: NodeId) -> Result<f64> {
        let font = self.font(id)?;
        Ok(self.cx().metrics.descent(&font))
    }
}
