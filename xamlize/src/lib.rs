// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Xamlize: recorded vector pictures to nested XAML drawing markup.
//!
//! A [`Picture`](xamlize_picture::Picture) is a flat, stack-based command
//! stream: absolute matrices, clips that last until the next restore, and
//! offscreen layers. The markup consumed by Avalonia-style UI frameworks is
//! the opposite: a tree of `DrawingGroup` elements whose transforms are
//! relative to their parents. This crate rebuilds the tree in one pass.
//!
//! - Each `SetMatrix` that changes the effective transform opens a group
//!   holding the matrix relative to the groups already open.
//! - Each clip opens a group holding the clip geometry.
//! - Each `SaveLayer` buffers its content and, at the matching restore,
//!   splices it back as a plain group, an opacity group, an opacity mask, or
//!   unchanged, depending on the layer paint (see [`LayerKind`]).
//! - Draw commands become `GeometryDrawing` leaves with a brush and a pen.
//!
//! ## API overview
//!
//! - [`Converter`]: entry point; holds [`ConvertOptions`] and an optional
//!   [`GlyphOutlines`](xamlize_picture::GlyphOutlines) source for text.
//! - [`Converter::drawing_group`] → the [`tree`] model, for inspection.
//! - [`Converter::to_xaml`] → indented markup.
//! - [`write_document`]: the markup half of [`Converter::to_xaml`], exposed
//!   for callers that edit the tree.
//! - [`StylesDocument`]: several conversions packaged as keyed resources.
//!
//! ```
//! use xamlize::{ConvertOptions, Converter};
//! use xamlize_picture::{Affine, Color, PaintDesc, PathDesc, Rect, record_picture};
//!
//! let picture = record_picture(Rect::new(0.0, 0.0, 2.0, 2.0), |rec| {
//!     rec.save();
//!     rec.set_matrix(Affine::scale(2.0));
//!     rec.draw_path(
//!         PathDesc::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
//!         PaintDesc::fill(Color::from_rgba8(255, 0, 0, 255)),
//!     );
//!     rec.restore();
//! });
//! let options = ConvertOptions::default();
//! let xaml = Converter::new(&options).to_xaml(&picture, None);
//! assert!(xaml.contains(r#"<MatrixTransform Matrix="2,0,0,2,0,0"/>"#));
//! assert!(xaml.contains(r##"<GeometryDrawing Brush="#FFFF0000" Geometry="F1 M0 0L1 0L1 1L0 1Z"/>"##));
//! ```
//!
//! Numbers are written in a locale-invariant shortest form. Conversion never
//! fails; anything without a markup equivalent is skipped and reported
//! through the [`log`] facade.
//!
//! The tree builder is `no_std` and uses `alloc`. Markup output needs the
//! `std` feature (on by default), which pulls in `xmlwriter`.

#![no_std]

extern crate alloc;

mod brush;
#[cfg(feature = "std")]
mod emit;
pub mod geometry;
mod interpret;
mod layer;
#[cfg_attr(
    not(feature = "std"),
    allow(dead_code, reason = "only path data is formatted without markup output")
)]
mod number;
mod options;
mod pen;
mod state;
#[cfg(feature = "std")]
mod styles;
pub mod tree;

#[cfg(feature = "std")]
use alloc::string::String;

use xamlize_picture::{GlyphOutlines, NoGlyphOutlines, Picture};

#[cfg(feature = "std")]
pub use emit::write_document;
pub use layer::{LayerKind, MASK_SENTINEL_COLOR};
pub use options::{ConvertOptions, DocumentKind, LineEnding};
#[cfg(feature = "std")]
pub use styles::{StyleEntry, StylesDocument, resource_key};

use interpret::Context;
use tree::DrawingGroup;

/// Converts pictures with a fixed set of options.
#[derive(Clone, Copy)]
pub struct Converter<'a> {
    options: &'a ConvertOptions,
    outlines: &'a dyn GlyphOutlines,
}

impl core::fmt::Debug for Converter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Converter")
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> Converter<'a> {
    /// Converter without glyph outlines; text commands draw nothing.
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self {
            options,
            outlines: &NoGlyphOutlines,
        }
    }

    /// Use `outlines` to turn text commands into paths.
    #[must_use]
    pub fn with_glyph_outlines(self, outlines: &'a dyn GlyphOutlines) -> Self {
        Self { outlines, ..self }
    }

    /// The options in effect.
    pub fn options(&self) -> &ConvertOptions {
        self.options
    }

    /// Outermost element produced by [`Converter::to_xaml`].
    pub fn document_kind(&self) -> DocumentKind {
        if self.options.generate_image {
            DocumentKind::Image
        } else {
            DocumentKind::DrawingGroup
        }
    }

    /// Convert `picture` to its root group.
    pub fn drawing_group(&self, picture: &Picture) -> DrawingGroup {
        interpret::convert(picture, Context::root(self.options, self.outlines))
    }

    /// Convert `picture` to markup, with `key` as the root `x:Key`.
    #[cfg(feature = "std")]
    pub fn to_xaml(&self, picture: &Picture, key: Option<&str>) -> String {
        self.document(picture, self.document_kind(), key)
    }

    /// Like [`Converter::to_xaml`], always wrapped in `Image`/`DrawingImage`.
    #[cfg(feature = "std")]
    pub fn to_xaml_image(&self, picture: &Picture, key: Option<&str>) -> String {
        self.document(picture, DocumentKind::Image, key)
    }

    /// Like [`Converter::to_xaml`], always a bare root `DrawingGroup`.
    #[cfg(feature = "std")]
    pub fn to_xaml_drawing_group(&self, picture: &Picture, key: Option<&str>) -> String {
        self.document(picture, DocumentKind::DrawingGroup, key)
    }

    /// Convert `picture` into an entry for a [`StylesDocument`].
    ///
    /// The key is assigned when the entry is pushed, so entries can be
    /// converted in any order.
    #[cfg(feature = "std")]
    pub fn style_entry(&self, picture: &Picture, file_name: &str) -> StyleEntry {
        StyleEntry {
            file_name: file_name.into(),
            kind: self.document_kind(),
            root: self.drawing_group(picture),
        }
    }

    #[cfg(feature = "std")]
    fn document(&self, picture: &Picture, kind: DocumentKind, key: Option<&str>) -> String {
        write_document(&self.drawing_group(picture), kind, key, self.options)
    }
}
