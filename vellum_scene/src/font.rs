// Copyright 2025 the Vellum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font descriptors and the metric and image-size providers the scene consults.
//!
//! Text shaping and image decoding live outside this crate. Labels and images
//! only need sizes, so the scene asks a [`FontMetrics`] provider and an
//! [`ImageResolver`] for them.

use core::fmt;
use core::str::FromStr;

use kurbo::Size;

use crate::error::SceneError;

/// Weight and slant of a font.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum FontStyle {
    /// Regular weight, upright.
    #[default]
    Plain,
    /// Bold weight.
    Bold,
    /// Italic slant.
    Italic,
    /// Bold weight and italic slant.
    BoldItalic,
}

/// A font descriptor: family, style, and point size.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name, for example `"SansSerif"`.
    pub family: String,
    /// Weight and slant.
    pub style: FontStyle,
    /// Size in points.
    pub size: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "SansSerif".into(),
            style: FontStyle::Plain,
            size: 12.0,
        }
    }
}

impl Font {
    /// A plain font of the given family and size.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            style: FontStyle::Plain,
            size,
        }
    }

    /// Same font with a different style.
    #[must_use]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

/// Parses `family-style-size` descriptors such as `"Serif-bold-18"`.
///
/// Any part may be `*` to keep the default, and trailing parts may be omitted.
impl FromStr for Font {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut font = Self::default();
        let mut parts = s.split('-');
        if let Some(family) = parts.next().filter(|p| !p.is_empty() && *p != "*") {
            font.family = family.into();
        }
        if let Some(style) = parts.next().filter(|p| *p != "*") {
            font.style = match style.to_ascii_lowercase().as_str() {
                "plain" => FontStyle::Plain,
                "bold" => FontStyle::Bold,
                "italic" => FontStyle::Italic,
                "bolditalic" => FontStyle::BoldItalic,
                _ => {
                    return Err(SceneError::InvalidFont {
                        descriptor: s.to_owned(),
                        reason: "unknown font style",
                    });
                }
            };
        }
        if let Some(size) = parts.next().filter(|p| *p != "*") {
            font.size = size.parse().map_err(|_| SceneError::InvalidFont {
                descriptor: s.to_owned(),
                reason: "font size is not a number",
            })?;
        }
        Ok(font)
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = match self.style {
            FontStyle::Plain => "plain",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "bolditalic",
        };
        write!(f, "{}-{}-{}", self.family, style, self.size)
    }
}

/// Font metric queries needed for label geometry.
pub trait FontMetrics: Send + Sync {
    /// Distance from the baseline to the top of the tallest glyphs.
    fn ascent(&self, font: &Font) -> f64;
    /// Distance from the baseline to the bottom of the lowest glyphs.
    fn descent(&self, font: &Font) -> f64;
    /// Advance width of `text` set in `font`.
    fn text_width(&self, font: &Font, text: &str) -> f64;
    /// Total line height. Defaults to ascent plus descent.
    fn height(&self, font: &Font) -> f64 {
        self.ascent(font) + self.descent(font)
    }
}

/// Metric approximation that needs no font data.
///
/// Every character advances by `advance` ems; ascent and descent are fixed
/// fractions of the point size. Good enough for layout-free hit testing and for
/// tests that need deterministic numbers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ApproximateMetrics {
    /// Ascent as a fraction of the point size.
    pub ascent: f64,
    /// Descent as a fraction of the point size.
    pub descent: f64,
    /// Per-character advance as a fraction of the point size.
    pub advance: f64,
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self {
            ascent: 0.8,
            descent: 0.2,
            advance: 0.6,
        }
    }
}

impl FontMetrics for ApproximateMetrics {
    fn ascent(&self, font: &Font) -> f64 {
        font.size * self.ascent
    }

    fn descent(&self, font: &Font) -> f64 {
        font.size * self.descent
    }

    fn text_width(&self, font: &Font, text: &str) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Character counts are far below f64's exact integer range."
        )]
        let chars = text.chars().count() as f64;
        chars * font.size * self.advance
    }
}

/// Resolves the natural size of an image by name.
///
/// Image nodes call this lazily, the first time their size is needed, and cache
/// the answer.
pub trait ImageResolver: Send + Sync {
    /// Natural size of the named image, or `None` when it is unknown.
    fn image_size(&self, name: &str) -> Option<Size>;
}

/// Resolver that knows no images; every image has zero size until sized explicitly.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn image_size(&self, _name: &str) -> Option<Size> {
        None
    }
}
