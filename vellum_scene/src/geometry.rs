// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers shared by the shape variants.
//!
//! Angles are in degrees, counterclockwise on a y-down screen. A point at
//! angle `θ` on the ellipse inscribed in a `2·rx × 2·ry` frame anchored at the
//! local origin is `(rx + rx·cos θ, ry − ry·sin θ)`. Angles are measured in the
//! ellipse's normalized (circle) space, so 45° always lies on the diagonal of
//! the frame.

use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Axis-aligned bounding box of a set of points. Empty input yields `None`.
pub(crate) fn bbox_of_points(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
}

/// Transform an axis-aligned `Rect` by an `Affine` and return the axis-aligned
/// bounding box of the four mapped corners.
pub(crate) fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
    ];
    bbox_of_points(corners.map(|p| affine * p)).unwrap_or(rect)
}

/// Normalize an angle in degrees into `[0, 360)`.
pub(crate) fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if a >= 360.0 { 0.0 } else { a }
}

/// Whether `angle` lies in the swept range `[start, start + sweep]`.
///
/// A negative sweep covers `[start + sweep, start]`. A sweep of 360° or more in
/// either direction covers the full circle. Ranges that wrap past 360° are
/// handled by normalizing both the start and the candidate into `[0, 360)`.
pub(crate) fn contains_angle(start: f64, sweep: f64, angle: f64) -> bool {
    if sweep.abs() >= 360.0 {
        return true;
    }
    let (start, sweep) = if sweep < 0.0 {
        (start + sweep, -sweep)
    } else {
        (start, sweep)
    };
    let start = normalize_degrees(start);
    let angle = normalize_degrees(angle);
    let end = start + sweep;
    if end > 360.0 {
        angle >= start || angle <= end - 360.0
    } else {
        angle >= start && angle <= end
    }
}

/// Point at `degrees` on the ellipse inscribed in the frame `[0, 2·rx] × [0, 2·ry]`.
pub(crate) fn ellipse_point(rx: f64, ry: f64, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(rx + rx * cos, ry - ry * sin)
}

/// Parametric angles (degrees) at which the ellipse inscribed in
/// `[0, 2·rx] × [0, 2·ry]`, mapped through `ctm`, reaches its horizontal and
/// vertical extrema.
///
/// For the mapped x coordinate `a·rx·cos θ − c·ry·sin θ` the extrema sit at
/// `atan2(−c·ry, a·rx)` and the opposite angle; likewise for y with `b` and `d`.
pub(crate) fn ellipse_extreme_angles(ctm: Affine, rx: f64, ry: f64) -> [f64; 4] {
    let [a, b, c, d, _, _] = ctm.as_coeffs();
    let tx = (-c * ry).atan2(a * rx).to_degrees();
    let ty = (-d * ry).atan2(b * rx).to_degrees();
    [tx, tx + 180.0, ty, ty + 180.0]
}

/// Distance from `p` to the segment `a`–`b`, or `None` when the segment has zero length.
pub(crate) fn segment_distance(p: Point, a: Point, b: Point) -> Option<f64> {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return None;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    let closest = a + ab * t;
    Some((p - closest).hypot())
}

/// Even-odd point-in-polygon test.
///
/// Casts a horizontal ray from `p` toward +x and toggles on every edge it
/// crosses. The closing edge from the last vertex back to the first is implied.
pub(crate) fn even_odd_contains(vertices: &[Point], p: Point) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Append an elliptical arc to `path`, starting from the path's current point.
///
/// `start` and `sweep` are in degrees, counterclockwise on screen.
pub(crate) fn append_arc(path: &mut BezPath, center: Point, radii: Vec2, start: f64, sweep: f64) {
    // kurbo measures angles clockwise on a y-down screen.
    let arc = kurbo::Arc::new(
        center,
        radii,
        -start.to_radians(),
        -sweep.to_radians(),
        0.0,
    );
    for el in arc.append_iter(0.1) {
        path.push(el);
    }
}

/// Path for a rectangle `[0, w] × [0, h]` whose corners are quarter ellipses
/// with the given radii.
pub(crate) fn rounded_rect_path(w: f64, h: f64, rx: f64, ry: f64) -> BezPath {
    let rx = rx.clamp(0.0, w / 2.0);
    let ry = ry.clamp(0.0, h / 2.0);
    let radii = Vec2::new(rx, ry);
    let mut path = BezPath::new();
    path.move_to((rx, 0.0));
    path.line_to((w - rx, 0.0));
    append_arc(&mut path, Point::new(w - rx, ry), radii, 90.0, -90.0);
    path.line_to((w, h - ry));
    append_arc(&mut path, Point::new(w - rx, h - ry), radii, 0.0, -90.0);
    path.line_to((rx, h));
    append_arc(&mut path, Point::new(rx, h - ry), radii, 270.0, -90.0);
    path.line_to((0.0, ry));
    append_arc(&mut path, Point::new(rx, ry), radii, 180.0, -90.0);
    path.close_path();
    path
}

/// Closed path through `vertices`.
pub(crate) fn polygon_path(vertices: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = vertices.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for v in iter {
            path.line_to(*v);
        }
        path.close_path();
    }
    path
}
