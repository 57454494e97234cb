// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer classification and compositing.
//!
//! The markup has no offscreen layer primitive, so each `SaveLayer` is
//! recognized by the shape of its paint and re-expressed with group
//! properties. The patterns follow the conventions of the renderer that
//! records SVG masks and group opacity: mask boundaries are marked with an
//! opaque black paint (historically called "transparent black"), mask
//! content is composited through a color filter, and group opacity is a
//! plain color with reduced alpha. These are conventions of that renderer,
//! not properties of alpha values in general.

use alloc::boxed::Box;

use peniko::Color;
use xamlize_picture::PaintDesc;

use crate::ConvertOptions;
use crate::tree::{Brush, Drawing, DrawingGroup, TileMode, VisualBrush};

/// Paint color marking mask layers.
pub const MASK_SENTINEL_COLOR: Color = Color::BLACK;

/// How a `SaveLayer` is reproduced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LayerKind {
    /// Start of masked content; wrapped in a plain group.
    MaskGroup,
    /// Mask content; becomes the opacity mask of the enclosing group.
    MaskBrush,
    /// Group opacity of `alpha / 255`.
    OpacityGroup {
        /// Opacity in `0..1`.
        opacity: f64,
    },
    /// Image filter layer; content passes through unfiltered.
    FilterGroup,
    /// Any other paint; content passes through.
    UnknownPaint,
}

impl LayerKind {
    /// Classify a layer paint.
    ///
    /// Checks run in a fixed order and the first match wins.
    pub fn classify(paint: Option<&PaintDesc>) -> Self {
        let Some(paint) = paint else {
            return Self::UnknownPaint;
        };
        let sentinel = paint.color.is_some_and(is_sentinel);
        let no_shader = paint.shader.is_none();
        let color_filter = paint.color_filter.is_some();
        let image_filter = paint.image_filter.is_some();

        if no_shader && color_filter && !image_filter && sentinel {
            return Self::MaskBrush;
        }
        if no_shader && !color_filter && !image_filter && sentinel {
            return Self::MaskGroup;
        }
        if no_shader
            && !color_filter
            && !image_filter
            && let Some(color) = paint.color
            && color.to_rgba8().a < u8::MAX
        {
            return Self::OpacityGroup {
                opacity: f64::from(color.to_rgba8().a) / 255.0,
            };
        }
        if no_shader && !color_filter && image_filter && sentinel {
            return Self::FilterGroup;
        }
        Self::UnknownPaint
    }

    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::MaskGroup => "mask group",
            Self::MaskBrush => "mask brush",
            Self::OpacityGroup { .. } => "opacity group",
            Self::FilterGroup => "filter group",
            Self::UnknownPaint => "unknown paint",
        }
    }
}

fn is_sentinel(color: Color) -> bool {
    let c = color.to_rgba8();
    let s = MASK_SENTINEL_COLOR.to_rgba8();
    (c.r, c.g, c.b, c.a) == (s.r, s.g, s.b, s.a)
}

/// Splice the buffered `content` of a finished layer into `parent`.
pub(crate) fn composite(
    kind: LayerKind,
    content: DrawingGroup,
    parent: &mut DrawingGroup,
    options: &ConvertOptions,
) {
    log::trace!("compositing {} layer", kind.name());
    match kind {
        LayerKind::MaskGroup if !options.ignore_mask => {
            parent.children.push(Drawing::Group(content));
        }
        LayerKind::MaskBrush => {
            if options.ignore_mask {
                return;
            }
            let mask = Box::new(Brush::Visual(VisualBrush {
                tile_mode: Some(TileMode::None),
                source_rect: None,
                destination_rect: None,
                transform: None,
                visual: content,
            }));
            set_opacity_mask(parent, mask);
        }
        LayerKind::OpacityGroup { opacity } if !options.ignore_opacity => {
            parent.children.push(Drawing::Group(DrawingGroup {
                opacity: Some(opacity),
                ..content
            }));
        }
        LayerKind::MaskGroup
        | LayerKind::OpacityGroup { .. }
        | LayerKind::FilterGroup
        | LayerKind::UnknownPaint => pass_through(content, parent),
    }
}

/// Move `content` into `parent`, handing a pending opacity mask up with it.
fn pass_through(content: DrawingGroup, parent: &mut DrawingGroup) {
    if let Some(mask) = content.opacity_mask {
        set_opacity_mask(parent, mask);
    }
    parent.children.extend(content.children);
}

/// A group carries one mask; the most recent one wins.
fn set_opacity_mask(parent: &mut DrawingGroup, mask: Box<Brush>) {
    if parent.opacity_mask.replace(mask).is_some() {
        log::debug!("replacing an existing opacity mask");
    }
}
