// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine transform algebra for scene nodes.
//!
//! [`AffineTransform`] is a thin, copyable wrapper around [`kurbo::Affine`] that
//! adds the screen-space conventions the scene uses:
//!
//! - Angles are in degrees and rotate counterclockwise *on screen* (y grows
//!   downward), so the sine term is negated relative to the math convention.
//! - Elementary operations right-multiply onto the current matrix, so the most
//!   recently added operation is applied to points first.
//! - `cos`/`sin` values with magnitude below [`SNAP_EPSILON`] are snapped to
//!   zero, which keeps quarter turns exact across repeated compositions.
//!
//! Composition order: `a.concatenate(b)` turns `a` into `a · b`, and applying
//! the result to a point applies `b` first, then `a`.

use kurbo::{Affine, Point};

use crate::error::{Result, SceneError};

/// Cosine and sine magnitudes below this value are treated as exactly zero.
pub const SNAP_EPSILON: f64 = 1e-10;

/// A 2×3 affine map: `(x, y) → (sx·x + shx·y + tx, shy·x + sy·y + ty)`.
///
/// Coefficients are stored in kurbo order `[scale_x, shear_y, shear_x, scale_y,
/// translate_x, translate_y]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineTransform(Affine);

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    /// The neutral transform.
    pub const IDENTITY: Self = Self(Affine::IDENTITY);

    /// Returns the neutral transform.
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build a transform from its six coefficients.
    pub const fn new(
        scale_x: f64,
        shear_y: f64,
        shear_x: f64,
        scale_y: f64,
        translate_x: f64,
        translate_y: f64,
    ) -> Self {
        Self(Affine::new([
            scale_x,
            shear_y,
            shear_x,
            scale_y,
            translate_x,
            translate_y,
        ]))
    }

    /// Horizontal scale coefficient (`a`).
    pub fn scale_x(&self) -> f64 {
        self.0.as_coeffs()[0]
    }

    /// Vertical shear coefficient (`b`).
    pub fn shear_y(&self) -> f64 {
        self.0.as_coeffs()[1]
    }

    /// Horizontal shear coefficient (`c`).
    pub fn shear_x(&self) -> f64 {
        self.0.as_coeffs()[2]
    }

    /// Vertical scale coefficient (`d`).
    pub fn scale_y(&self) -> f64 {
        self.0.as_coeffs()[3]
    }

    /// Horizontal translation (`e`).
    pub fn translate_x(&self) -> f64 {
        self.0.as_coeffs()[4]
    }

    /// Vertical translation (`f`).
    pub fn translate_y(&self) -> f64 {
        self.0.as_coeffs()[5]
    }

    /// Determinant of the linear part, `a·d − b·c`.
    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.0.as_coeffs();
        a * d - b * c
    }

    /// True when this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.0 == Affine::IDENTITY
    }

    /// The underlying kurbo transform.
    pub const fn as_affine(&self) -> Affine {
        self.0
    }

    /// Right-multiply `other` into `self`.
    ///
    /// After this call, transforming a point applies `other` first and then
    /// the previous value of `self`.
    pub fn concatenate(&mut self, other: Self) {
        self.0 = self.0 * other.0;
    }

    /// Returns `self · other` without mutating either operand.
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Compute the inverse transform.
    ///
    /// Fails with [`SceneError::SingularTransform`] when the determinant is zero
    /// or not finite. Callers that invert repeatedly should cache the result and
    /// recompute it only after the forward matrix changes.
    pub fn invert(&self) -> Result<Self> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(SceneError::SingularTransform { determinant });
        }
        Ok(Self(self.0.inverse()))
    }

    /// Map a point through this transform.
    pub fn transform_point(&self, pt: Point) -> Point {
        self.0 * pt
    }

    /// Map a point through the inverse of this transform.
    pub fn inverse_transform_point(&self, pt: Point) -> Result<Point> {
        Ok(self.invert()?.transform_point(pt))
    }

    /// Compose a counterclockwise (on screen) rotation by `degrees`.
    pub fn rotate(&mut self, degrees: f64) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (sin, cos) = (snap(sin), snap(cos));
        // y-down: a positive angle turns +x toward -y.
        self.concatenate(Self::new(cos, -sin, sin, cos, 0.0, 0.0));
    }

    /// Compose a scale by `sx` horizontally and `sy` vertically.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.concatenate(Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0));
    }

    /// Compose a shear: `x' = x + shx·y`, `y' = shy·x + y`.
    pub fn shear(&mut self, shx: f64, shy: f64) {
        self.concatenate(Self::new(1.0, shy, shx, 1.0, 0.0, 0.0));
    }

    /// Compose a translation.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.concatenate(Self::new(1.0, 0.0, 0.0, 1.0, tx, ty));
    }

    /// The rotation implied by the linear part, in degrees, using the same
    /// counterclockwise-on-screen convention as [`AffineTransform::rotate`].
    pub fn rotation_degrees(&self) -> f64 {
        let [a, b, ..] = self.0.as_coeffs();
        (-b).atan2(a).to_degrees()
    }
}

impl From<Affine> for AffineTransform {
    fn from(affine: Affine) -> Self {
        Self(affine)
    }
}

impl From<AffineTransform> for Affine {
    fn from(transform: AffineTransform) -> Self {
        transform.0
    }
}

impl core::ops::Mul for AffineTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.then(rhs)
    }
}

impl core::ops::Mul<Point> for AffineTransform {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        self.transform_point(rhs)
    }
}

#[inline]
fn snap(v: f64) -> f64 {
    if v.abs() < SNAP_EPSILON { 0.0 } else { v }
}
