// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing tree produced by conversion.
//!
//! Nodes mirror the markup vocabulary one to one, so the tree can be
//! inspected or post-processed before [`crate::write_document`] turns it
//! into markup.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Affine, Cap, Join, Point, Rect};
use peniko::{Color, Extend};
use xamlize_picture::PathDesc;

/// A node in the drawing tree.
#[derive(Clone, Debug)]
pub enum Drawing {
    /// Nested group.
    Group(DrawingGroup),
    /// Leaf geometry.
    Geometry(GeometryDrawing),
}

/// A `DrawingGroup` element.
///
/// Groups opened for a transform, clip, or layer carry exactly one of the
/// optional properties; the root and pass-through groups carry none.
#[derive(Clone, Debug, Default)]
pub struct DrawingGroup {
    /// `DrawingGroup.Transform`, relative to the enclosing groups.
    pub transform: Option<Affine>,
    /// `DrawingGroup.ClipGeometry`.
    pub clip_geometry: Option<PathDesc>,
    /// `Opacity` attribute.
    pub opacity: Option<f64>,
    /// `DrawingGroup.OpacityMask`.
    pub opacity_mask: Option<Box<Brush>>,
    /// Child drawings in paint order.
    pub children: Vec<Drawing>,
}

impl DrawingGroup {
    /// Returns `true` if the group has no children and no properties.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
            && self.transform.is_none()
            && self.clip_geometry.is_none()
            && self.opacity.is_none()
            && self.opacity_mask.is_none()
    }

    /// Number of groups nested anywhere below this one, not counting itself.
    pub fn nested_group_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Drawing::Group(g) => 1 + g.nested_group_count(),
                Drawing::Geometry(_) => 0,
            })
            .sum()
    }

    /// Geometry drawings anywhere below this group, depth first.
    pub fn geometries(&self) -> Vec<&GeometryDrawing> {
        let mut out = Vec::new();
        self.collect_geometries(&mut out);
        out
    }

    fn collect_geometries<'a>(&'a self, out: &mut Vec<&'a GeometryDrawing>) {
        for child in &self.children {
            match child {
                Drawing::Group(g) => g.collect_geometries(out),
                Drawing::Geometry(g) => out.push(g),
            }
        }
    }
}

/// A `GeometryDrawing` leaf.
#[derive(Clone, Debug)]
pub struct GeometryDrawing {
    /// Geometry, in the coordinate space of the enclosing groups.
    pub geometry: PathDesc,
    /// Fill brush. Solid colors are written inline as the `Brush` attribute.
    pub brush: Option<Brush>,
    /// Stroke.
    pub pen: Option<Pen>,
}

/// A brush element.
#[derive(Clone, Debug)]
pub enum Brush {
    /// `SolidColorBrush`, or an inline `#AARRGGBB` where an attribute is allowed.
    Solid(Color),
    /// `LinearGradientBrush`.
    LinearGradient(LinearGradientBrush),
    /// `RadialGradientBrush`.
    RadialGradient(RadialGradientBrush),
    /// `VisualBrush`.
    Visual(VisualBrush),
}

/// One entry of `GradientStops`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// Offset in `0..=1`.
    pub offset: f32,
    /// Stop color.
    pub color: Color,
}

/// `LinearGradientBrush` attributes and stops.
#[derive(Clone, Debug)]
pub struct LinearGradientBrush {
    /// `StartPoint`.
    pub start: Point,
    /// `EndPoint`.
    pub end: Point,
    /// `SpreadMethod`; only written when not [`Extend::Pad`].
    pub spread: Extend,
    /// `LinearGradientBrush.Transform`.
    pub transform: Option<Affine>,
    /// Stops in source order.
    pub stops: Vec<GradientStop>,
}

/// `RadialGradientBrush` attributes and stops.
#[derive(Clone, Debug)]
pub struct RadialGradientBrush {
    /// `Center`.
    pub center: Point,
    /// `GradientOrigin`.
    pub gradient_origin: Point,
    /// `Radius`, as a fraction of the shape width.
    pub radius: f64,
    /// `SpreadMethod`; only written when not [`Extend::Pad`].
    pub spread: Extend,
    /// `RadialGradientBrush.Transform`.
    pub transform: Option<Affine>,
    /// Stops in source order.
    pub stops: Vec<GradientStop>,
}

/// `VisualBrush` tile modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileMode {
    /// `None`.
    None,
    /// `Tile`.
    Tile,
    /// `FlipXY`.
    FlipXY,
}

impl TileMode {
    /// Tile mode for a shader extend mode; clamping maps to `None`.
    pub fn from_extend(extend: Extend) -> Self {
        match extend {
            Extend::Pad => Self::None,
            Extend::Repeat => Self::Tile,
            Extend::Reflect => Self::FlipXY,
        }
    }

    /// Attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Tile => "Tile",
            Self::FlipXY => "FlipXY",
        }
    }
}

/// `VisualBrush` whose visual is an `Image` of a nested drawing.
#[derive(Clone, Debug)]
pub struct VisualBrush {
    /// `TileMode`, omitted when `None`.
    pub tile_mode: Option<TileMode>,
    /// `SourceRect`.
    pub source_rect: Option<Rect>,
    /// `DestinationRect`.
    pub destination_rect: Option<Rect>,
    /// `VisualBrush.Transform`.
    pub transform: Option<Affine>,
    /// Root group of the nested drawing.
    pub visual: DrawingGroup,
}

/// `Pen` element.
#[derive(Clone, Debug)]
pub struct Pen {
    /// Stroke brush.
    pub brush: Option<Brush>,
    /// `Thickness`.
    pub thickness: f64,
    /// `LineCap`.
    pub line_cap: Cap,
    /// `LineJoin`.
    pub line_join: Join,
    /// `MiterLimit`.
    pub miter_limit: f64,
    /// `Pen.DashStyle`.
    pub dash_style: Option<DashStyle>,
}

impl Pen {
    /// Thickness written when the attribute is omitted.
    pub const DEFAULT_THICKNESS: f64 = 1.0;
    /// Line cap written when the attribute is omitted.
    pub const DEFAULT_LINE_CAP: Cap = Cap::Butt;
    /// Line join written when the attribute is omitted.
    pub const DEFAULT_LINE_JOIN: Join = Join::Bevel;
    /// Miter limit written when the attribute is omitted.
    pub const DEFAULT_MITER_LIMIT: f64 = 10.0;
}

/// `DashStyle` with lengths relative to the pen thickness.
#[derive(Clone, Debug, PartialEq)]
pub struct DashStyle {
    /// `Dashes`.
    pub dashes: Vec<f64>,
    /// `Offset`.
    pub offset: f64,
}
