// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Point};

use crate::PaintDesc;

/// Font selection carried by text paints.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Family name as resolved by the renderer.
    pub family: String,
    /// Font size in user space units.
    pub size: f32,
    /// Weight on the usual 100..=900 scale.
    pub weight: u16,
    /// Whether an italic face was selected.
    pub italic: bool,
}

impl TextStyle {
    /// Regular, upright style of the given family and size.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            weight: 400,
            italic: false,
        }
    }
}

/// A run of positioned glyphs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBlob {
    /// Glyph identifiers in the run's font.
    pub glyphs: Vec<u16>,
    /// Glyph origins relative to the run origin.
    pub positions: Vec<Point>,
}

/// Outline extraction for text, provided by whoever owns the fonts.
pub trait GlyphOutlines {
    /// Outline of `text` drawn with its baseline origin at `origin`.
    ///
    /// Returns `None` when the font cannot be resolved.
    fn text_path(&self, text: &str, origin: Point, paint: &PaintDesc) -> Option<BezPath>;
}

/// [`GlyphOutlines`] that resolves no fonts.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoGlyphOutlines;

impl GlyphOutlines for NoGlyphOutlines {
    fn text_path(&self, _text: &str, _origin: Point, _paint: &PaintDesc) -> Option<BezPath> {
        None
    }
}
