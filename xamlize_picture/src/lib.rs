// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Xamlize Picture: the recorded drawing commands a vector renderer hands to
//! the `xamlize` converter.
//!
//! A [`Picture`] is an ordered, finite list of [`Command`]s captured from an
//! immediate-mode canvas. Geometry, paints, and transforms are already fully
//! resolved: there are no SVG concepts (units, `use` references, CSS) left at
//! this level, only paths in device space, absolute matrices, and paint
//! descriptions.
//!
//! # Core concepts
//!
//! - **Commands**: [`Command`] is a closed set of state changes
//!   (`Save`, `Restore`, `SaveLayer`, `SetMatrix`, clips) and draws
//!   (`DrawPath`, text and image draws).
//! - **Geometry**: [`PathDesc`] pairs a kurbo [`BezPath`] with a
//!   [`FillRule`].
//! - **Paint**: [`PaintDesc`] describes fill/stroke style, an optional
//!   [`ShaderDesc`] (flat color, gradients, tiled nested pictures), stroke
//!   geometry, and optional color/image filters.
//! - **Recording**: [`PictureRecorder`] offers a canvas-like API for building
//!   pictures by hand, with [`PictureRecorder::with_save`] and
//!   [`PictureRecorder::with_layer`] scoping helpers.
//! - **Text outlines**: the renderer that owns fonts implements
//!   [`GlyphOutlines`] so text draws can be converted to outline paths.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Affine, Rect};
//! use peniko::Color;
//! use xamlize_picture::{Command, PaintDesc, PathDesc, record_picture};
//!
//! let picture = record_picture(Rect::new(0.0, 0.0, 16.0, 16.0), |rec| {
//!     rec.with_save(|rec| {
//!         rec.set_matrix(Affine::scale(2.0));
//!         rec.draw_path(
//!             PathDesc::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
//!             PaintDesc::fill(Color::from_rgb8(255, 0, 0)),
//!         );
//!     });
//! });
//!
//! assert_eq!(picture.commands.len(), 4);
//! assert!(matches!(picture.commands[0], Command::Save));
//! ```

#![no_std]

extern crate alloc;

mod paint;
mod path;
mod recorder;
mod text;

use alloc::string::String;
use alloc::vec::Vec;

pub use kurbo::{self, Affine, BezPath, Cap, Join, Point, Rect, Stroke as StrokeStyle};
pub use peniko::{
    self, BlendMode, Color, ColorStop, Extend, Fill as FillRule, Gradient, GradientKind,
    ImageAlphaType, ImageFormat,
};

pub use paint::{
    ColorFilterDesc, FilterDesc, GradientShader, PaintDesc, PaintStyle, PictureShader, ShaderDesc,
};
pub use path::PathDesc;
pub use recorder::{PictureRecorder, record_picture};
pub use text::{GlyphOutlines, NoGlyphOutlines, TextBlob, TextStyle};

/// How a clip combines with the clip already in effect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ClipCombine {
    /// Keep only the area inside both the current clip and the new one.
    #[default]
    Intersect,
    /// Remove the new clip's area from the current clip.
    Difference,
}

/// Description of a raster image drawn by [`Command::DrawImage`].
#[derive(Clone, Debug)]
pub struct ImageDesc {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel format of the image buffer.
    pub format: ImageFormat,
    /// Alpha encoding of the pixels (straight vs premultiplied).
    pub alpha_type: ImageAlphaType,
}

/// A single recorded drawing command.
///
/// The set is closed: consumers are expected to match exhaustively so that
/// adding a command kind is a compile error everywhere it must be handled.
#[derive(Clone, Debug)]
pub enum Command {
    /// Clip subsequent drawing to a path.
    ClipPath {
        /// Clip geometry, in device space.
        path: PathDesc,
        /// Combination with the clip already in effect.
        combine: ClipCombine,
        /// Whether the clip edge is anti-aliased.
        antialias: bool,
    },
    /// Clip subsequent drawing to a rectangle.
    ClipRect {
        /// Clip rectangle, in device space.
        rect: Rect,
        /// Combination with the clip already in effect.
        combine: ClipCombine,
        /// Whether the clip edge is anti-aliased.
        antialias: bool,
    },
    /// Replace the current transform with an absolute matrix.
    SetMatrix(Affine),
    /// Push the current transform and clip state.
    Save,
    /// Pop the state pushed by the matching `Save` or `SaveLayer`.
    Restore,
    /// Begin an offscreen layer composited with `paint` at the matching `Restore`.
    SaveLayer {
        /// Paint applied when compositing the layer, if any.
        paint: Option<PaintDesc>,
    },
    /// Draw a path.
    DrawPath {
        /// Path to draw.
        path: PathDesc,
        /// Fill and stroke description.
        paint: PaintDesc,
    },
    /// Draw a run of text with its baseline origin at `(x, y)`.
    DrawText {
        /// UTF-8 text.
        text: String,
        /// Baseline origin x.
        x: f64,
        /// Baseline origin y.
        y: f64,
        /// Paint, including [`TextStyle`].
        paint: PaintDesc,
    },
    /// Draw text laid out along a path.
    DrawTextOnPath {
        /// UTF-8 text.
        text: String,
        /// Path the baseline follows.
        path: PathDesc,
        /// Offset along the path.
        h_offset: f64,
        /// Offset perpendicular to the path.
        v_offset: f64,
        /// Paint, including [`TextStyle`].
        paint: PaintDesc,
    },
    /// Draw a pre-shaped glyph run.
    DrawTextBlob {
        /// Positioned glyphs.
        blob: TextBlob,
        /// Run origin x.
        x: f64,
        /// Run origin y.
        y: f64,
        /// Paint, including [`TextStyle`].
        paint: PaintDesc,
    },
    /// Draw a region of an image into a destination rectangle.
    DrawImage {
        /// Image metadata.
        image: ImageDesc,
        /// Source rectangle in image pixels.
        src: Rect,
        /// Destination rectangle in device space.
        dst: Rect,
        /// Optional paint applied while drawing.
        paint: Option<PaintDesc>,
    },
}

impl Command {
    /// Short lowercase name of the command kind, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClipPath { .. } => "clip_path",
            Self::ClipRect { .. } => "clip_rect",
            Self::SetMatrix(_) => "set_matrix",
            Self::Save => "save",
            Self::Restore => "restore",
            Self::SaveLayer { .. } => "save_layer",
            Self::DrawPath { .. } => "draw_path",
            Self::DrawText { .. } => "draw_text",
            Self::DrawTextOnPath { .. } => "draw_text_on_path",
            Self::DrawTextBlob { .. } => "draw_text_blob",
            Self::DrawImage { .. } => "draw_image",
        }
    }
}

/// An ordered sequence of commands plus the rectangle it was recorded into.
#[derive(Clone, Debug, Default)]
pub struct Picture {
    /// Bounds the picture was recorded with.
    pub cull_rect: Rect,
    /// Commands in playback order.
    pub commands: Vec<Command>,
}

impl Picture {
    /// Create a picture from a cull rectangle and commands.
    pub fn new(cull_rect: Rect, commands: Vec<Command>) -> Self {
        Self {
            cull_rect,
            commands,
        }
    }

    /// Returns `true` if the picture has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
