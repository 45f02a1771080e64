// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape payloads and their geometry.
//!
//! Every node carries a [`Shape`]. Leaf variants know how to compute their
//! bounding box under a transform, test a point in their untransformed local
//! space, and paint themselves into a [`Surface`]. The [`Shape::Container`]
//! variant has no geometry of its own; the scene derives it from the children.

use kurbo::{Affine, BezPath, Ellipse, Line, Point, Rect, Size, Vec2};
use peniko::{Color, Fill};

use crate::error::{Result, SceneError};
use crate::font::{Font, FontMetrics, ImageResolver};
use crate::geometry::{
    append_arc, bbox_of_points, contains_angle, ellipse_extreme_angles, ellipse_point, even_odd_contains,
    polygon_path, rounded_rect_path, segment_distance, transform_rect_bbox,
};
use crate::surface::{DrawOp, StateOp, Surface};
use crate::types::HitTolerance;

/// Angular step, in degrees, used when approximating an arc with polygon edges.
const POLYGON_ARC_STEP: f64 = 5.0;

/// Geometry payload of a node.
///
/// All geometry is relative to the node's local origin, before its own
/// transform and position are applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Rectangle spanning `[0, w) × [0, h)`.
    Rect(Size),
    /// Rectangle with elliptical corners. `corner` is the full width and
    /// height of the ellipse that rounds each corner.
    RoundRect {
        /// Frame size.
        size: Size,
        /// Corner ellipse size.
        corner: Size,
    },
    /// Ellipse inscribed in `[0, w] × [0, h]`.
    Oval(Size),
    /// Segment from the local origin to the given end offset.
    Line(Vec2),
    /// Elliptical arc inscribed in `[0, w] × [0, h]`. Angles are in degrees,
    /// counterclockwise on screen, with 0° pointing along +x.
    Arc {
        /// Frame size of the full ellipse.
        size: Size,
        /// Start angle.
        start: f64,
        /// Signed sweep.
        sweep: f64,
    },
    /// Closed polygon through the vertices; the edge back to the first vertex is implied.
    Polygon(Vec<Point>),
    /// Text with its baseline starting at the local origin.
    Label {
        /// Text content.
        text: String,
        /// Font, or `None` for the scene's default font.
        font: Option<Font>,
    },
    /// Named image with its top-left corner at the local origin.
    Image {
        /// Name understood by the host's image store.
        name: String,
        /// Explicit or cached natural size. Resolved on first use when `None`.
        size: Option<Size>,
    },
    /// Composite node; geometry comes from the children.
    Container,
}

impl Shape {
    /// A `width × height` rectangle.
    pub fn rect(width: f64, height: f64) -> Self {
        Self::Rect(Size::new(width, height))
    }

    /// A rounded rectangle whose corners are quarter ellipses of `arc_width × arc_height`.
    pub fn round_rect(width: f64, height: f64, arc_width: f64, arc_height: f64) -> Self {
        Self::RoundRect {
            size: Size::new(width, height),
            corner: Size::new(arc_width, arc_height),
        }
    }

    /// An ellipse inscribed in a `width × height` frame.
    pub fn oval(width: f64, height: f64) -> Self {
        Self::Oval(Size::new(width, height))
    }

    /// A segment from the local origin to `(dx, dy)`.
    pub fn line(dx: f64, dy: f64) -> Self {
        Self::Line(Vec2::new(dx, dy))
    }

    /// An arc of the ellipse inscribed in a `width × height` frame.
    pub fn arc(width: f64, height: f64, start: f64, sweep: f64) -> Self {
        Self::Arc {
            size: Size::new(width, height),
            start,
            sweep,
        }
    }

    /// A polygon through `vertices`.
    pub fn polygon(vertices: impl IntoIterator<Item = Point>) -> Self {
        Self::Polygon(vertices.into_iter().collect())
    }

    /// A label in the scene's default font.
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label {
            text: text.into(),
            font: None,
        }
    }

    /// An image whose size is resolved from its name when first needed.
    pub fn image(name: impl Into<String>) -> Self {
        Self::Image {
            name: name.into(),
            size: None,
        }
    }

    /// An empty container.
    pub fn container() -> Self {
        Self::Container
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rect(_) => "rect",
            Self::RoundRect { .. } => "round_rect",
            Self::Oval(_) => "oval",
            Self::Line(_) => "line",
            Self::Arc { .. } => "arc",
            Self::Polygon(_) => "polygon",
            Self::Label { .. } => "label",
            Self::Image { .. } => "image",
            Self::Container => "container",
        }
    }

    /// True for [`Shape::Container`].
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container)
    }

    /// Whether the shape has a frame size that can be set directly.
    pub fn is_resizable(&self) -> bool {
        matches!(
            self,
            Self::Rect(_) | Self::RoundRect { .. } | Self::Oval(_) | Self::Arc { .. } | Self::Image { .. }
        )
    }

    /// Replace the frame size of a resizable shape.
    pub(crate) fn set_size(&mut self, new: Size) -> Result<()> {
        match self {
            Self::Rect(size) | Self::Oval(size) => *size = new,
            Self::RoundRect { size, .. } | Self::Arc { size, .. } => *size = new,
            Self::Image { size, .. } => *size = Some(new),
            _ => return Err(SceneError::Unsupported { op: "set_size" }),
        }
        Ok(())
    }

    /// Untransformed extent of the shape.
    ///
    /// Lines report the absolute deltas, polygons the extent of their vertices,
    /// labels their advance width by ascent plus descent. Containers report zero.
    pub(crate) fn size(&mut self, cx: &ShapeCx<'_>) -> Size {
        match self {
            Self::Rect(size) | Self::Oval(size) => *size,
            Self::RoundRect { size, .. } | Self::Arc { size, .. } => *size,
            Self::Line(d) => Size::new(d.x.abs(), d.y.abs()),
            Self::Polygon(vertices) => bbox_of_points(vertices.iter().copied())
                .map(|r| r.size())
                .unwrap_or(Size::ZERO),
            Self::Label { text, font } => {
                let font = font.as_ref().unwrap_or(cx.default_font);
                Size::new(
                    cx.metrics.text_width(font, text),
                    cx.metrics.ascent(font) + cx.metrics.descent(font),
                )
            }
            Self::Image { name, size } => resolve_image(name, size, cx),
            Self::Container => Size::ZERO,
        }
    }

    /// Bounding box of the local geometry as seen through `ctm`.
    ///
    /// Returns `None` for containers, whose bounds the scene computes from the children.
    pub(crate) fn local_bounds(
        &mut self,
        ctm: Affine,
        filled: bool,
        cx: &ShapeCx<'_>,
    ) -> Option<Rect> {
        let origin = Rect::from_origin_size(ctm * Point::ORIGIN, Size::ZERO);
        let bounds = match self {
            Self::Rect(size) | Self::RoundRect { size, .. } => {
                transform_rect_bbox(ctm, size.to_rect())
            }
            Self::Oval(size) => {
                let (rx, ry) = (size.width / 2.0, size.height / 2.0);
                let extrema = ellipse_extreme_angles(ctm, rx, ry).map(|t| ellipse_point(rx, ry, t));
                let center = filled.then_some(Point::new(rx, ry));
                bbox_of_points(extrema.into_iter().chain(center).map(|p| ctm * p))
                    .unwrap_or(origin)
            }
            Self::Line(d) => Rect::from_points(ctm * Point::ORIGIN, ctm * d.to_point()),
            Self::Arc { size, start, sweep } => {
                let (rx, ry) = (size.width / 2.0, size.height / 2.0);
                let (start, sweep) = (*start, *sweep);
                let ends = [
                    ellipse_point(rx, ry, start),
                    ellipse_point(rx, ry, start + sweep),
                ];
                let extrema = ellipse_extreme_angles(ctm, rx, ry)
                    .into_iter()
                    .filter(|t| contains_angle(start, sweep, *t))
                    .map(|t| ellipse_point(rx, ry, t));
                let center = filled.then_some(Point::new(rx, ry));
                bbox_of_points(ends.into_iter().chain(extrema).chain(center).map(|p| ctm * p))
                    .unwrap_or(origin)
            }
            Self::Polygon(vertices) => {
                bbox_of_points(vertices.iter().map(|p| ctm * *p)).unwrap_or(origin)
            }
            Self::Label { .. } | Self::Image { .. } => {
                transform_rect_bbox(ctm, self.local_box(cx))
            }
            Self::Container => return None,
        };
        Some(bounds)
    }

    /// Point-in-shape test in untransformed local space.
    pub(crate) fn local_contains(
        &mut self,
        p: Point,
        filled: bool,
        line_width: f64,
        cx: &ShapeCx<'_>,
    ) -> bool {
        match self {
            Self::Rect(size) => size.to_rect().contains(p),
            Self::RoundRect { size, corner } => round_rect_contains(*size, *corner, p),
            Self::Oval(size) => {
                let (rx, ry) = (size.width / 2.0, size.height / 2.0);
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let (u, v) = ((p.x - rx) / rx, (p.y - ry) / ry);
                u * u + v * v <= 1.0
            }
            Self::Line(d) => segment_distance(p, Point::ORIGIN, d.to_point())
                .is_some_and(|dist| dist <= cx.tolerance.line),
            Self::Arc { size, start, sweep } => {
                let (rx, ry) = (size.width / 2.0, size.height / 2.0);
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let (u, v) = ((p.x - rx) / rx, (p.y - ry) / ry);
                let r = u.hypot(v);
                if filled {
                    if r > 1.0 {
                        return false;
                    }
                    // The apex of a wedge has no angle of its own.
                    if r == 0.0 {
                        return true;
                    }
                } else {
                    // Band half-width in normalized units, scaled by the mean radius.
                    let band = (cx.tolerance.arc + line_width / 2.0) / ((rx + ry) / 2.0);
                    if (r - 1.0).abs() > band {
                        return false;
                    }
                }
                contains_angle(*start, *sweep, (-v).atan2(u).to_degrees())
            }
            Self::Polygon(vertices) => even_odd_contains(vertices, p),
            Self::Label { .. } | Self::Image { .. } => self.local_box(cx).contains(p),
            Self::Container => false,
        }
    }

    /// Emit draw ops for the shape. The caller has already pushed the node's
    /// transform, stroke color, and stroke width.
    pub(crate) fn paint(
        &mut self,
        surface: &mut dyn Surface,
        stroke: Color,
        fill: Option<Color>,
        cx: &ShapeCx<'_>,
    ) {
        match self {
            Self::Rect(size) => {
                let r = size.to_rect();
                fill_op(surface, DrawOp::FillRect(r), stroke, fill);
                surface.draw(DrawOp::StrokeRect(r));
            }
            Self::RoundRect { size, corner } => {
                let path =
                    rounded_rect_path(size.width, size.height, corner.width / 2.0, corner.height / 2.0);
                fill_op(surface, DrawOp::FillPath(path.clone(), Fill::NonZero), stroke, fill);
                surface.draw(DrawOp::StrokePath(path));
            }
            Self::Oval(size) => {
                let e = Ellipse::from_rect(size.to_rect());
                fill_op(surface, DrawOp::FillEllipse(e), stroke, fill);
                surface.draw(DrawOp::StrokeEllipse(e));
            }
            Self::Line(d) => surface.draw(DrawOp::Line(Line::new(Point::ORIGIN, d.to_point()))),
            Self::Arc { size, start, sweep } => {
                let (rx, ry) = (size.width / 2.0, size.height / 2.0);
                let center = Point::new(rx, ry);
                let radii = Vec2::new(rx, ry);
                let start_pt = ellipse_point(rx, ry, *start);
                if fill.is_some() {
                    let mut pie = BezPath::new();
                    pie.move_to(center);
                    pie.line_to(start_pt);
                    append_arc(&mut pie, center, radii, *start, *sweep);
                    pie.close_path();
                    fill_op(surface, DrawOp::FillPath(pie, Fill::NonZero), stroke, fill);
                }
                let mut outline = BezPath::new();
                outline.move_to(start_pt);
                append_arc(&mut outline, center, radii, *start, *sweep);
                surface.draw(DrawOp::StrokePath(outline));
            }
            Self::Polygon(vertices) => {
                if vertices.is_empty() {
                    return;
                }
                let path = polygon_path(vertices);
                fill_op(surface, DrawOp::FillPath(path.clone(), Fill::EvenOdd), stroke, fill);
                surface.draw(DrawOp::StrokePath(path));
            }
            Self::Label { text, font } => surface.draw(DrawOp::Text {
                text: text.clone(),
                font: font.clone().unwrap_or_else(|| cx.default_font.clone()),
                origin: Point::ORIGIN,
            }),
            Self::Image { name, size } => {
                let dst = resolve_image(name, size, cx).to_rect();
                surface.draw(DrawOp::Image {
                    name: name.clone(),
                    dst,
                });
            }
            Self::Container => {}
        }
    }

    /// Axis-aligned local box of a label or image.
    fn local_box(&mut self, cx: &ShapeCx<'_>) -> Rect {
        match self {
            Self::Label { text, font } => {
                let font = font.as_ref().unwrap_or(cx.default_font);
                Rect::new(
                    0.0,
                    -cx.metrics.ascent(font),
                    cx.metrics.text_width(font, text),
                    cx.metrics.descent(font),
                )
            }
            Self::Image { name, size } => resolve_image(name, size, cx).to_rect(),
            _ => Rect::ZERO,
        }
    }
}

/// Collaborators and settings the shape geometry consults.
pub(crate) struct ShapeCx<'a> {
    pub(crate) metrics: &'a dyn FontMetrics,
    pub(crate) images: &'a dyn ImageResolver,
    pub(crate) default_font: &'a Font,
    pub(crate) tolerance: HitTolerance,
}

fn fill_op(surface: &mut dyn Surface, op: DrawOp, stroke: Color, fill: Option<Color>) {
    let Some(color) = fill else { return };
    if color == stroke {
        surface.draw(op);
    } else {
        surface.state(StateOp::SetColor(color));
        surface.draw(op);
        surface.state(StateOp::SetColor(stroke));
    }
}

fn resolve_image(name: &str, size: &mut Option<Size>, cx: &ShapeCx<'_>) -> Size {
    if let Some(size) = size {
        return *size;
    }
    match cx.images.image_size(name) {
        Some(natural) => {
            *size = Some(natural);
            natural
        }
        None => Size::ZERO,
    }
}

fn round_rect_contains(size: Size, corner: Size, p: Point) -> bool {
    if !size.to_rect().contains(p) {
        return false;
    }
    let rx = (corner.width / 2.0).min(size.width / 2.0);
    let ry = (corner.height / 2.0).min(size.height / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return true;
    }
    let cx = if p.x < rx {
        rx
    } else if p.x > size.width - rx {
        size.width - rx
    } else {
        return true;
    };
    let cy = if p.y < ry {
        ry
    } else if p.y > size.height - ry {
        size.height - ry
    } else {
        return true;
    };
    let (u, v) = ((p.x - cx) / rx, (p.y - cy) / ry);
    u * u + v * v <= 1.0
}

/// Append vertices approximating an arc of the ellipse inscribed in
/// `width × height`, positioned so that the arc starts at the last vertex
/// (or the origin when there is none).
pub(crate) fn append_polygon_arc(
    vertices: &mut Vec<Point>,
    width: f64,
    height: f64,
    start: f64,
    sweep: f64,
) {
    let (rx, ry) = (width / 2.0, height / 2.0);
    let current = vertices.last().copied().unwrap_or(Point::ORIGIN);
    if vertices.is_empty() {
        vertices.push(current);
    }
    let frame_origin = current - (ellipse_point(rx, ry, start) - Point::ORIGIN);
    let steps = (sweep.abs() / POLYGON_ARC_STEP).ceil().max(1.0);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "steps is a small positive whole number."
    )]
    let n = steps as usize;
    for i in 1..=n {
        #[allow(clippy::cast_precision_loss, reason = "n is small.")]
        let t = start + sweep * (i as f64) / steps;
        vertices.push(frame_origin + (ellipse_point(rx, ry, t) - Point::ORIGIN));
    }
}
