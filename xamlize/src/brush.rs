// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shader to brush encoding.
//!
//! Brush geometry is made relative to the bounding box of the shape being
//! painted. Without brush transforms, a local matrix is folded into the
//! gradient points after its translation is moved to the bounds origin;
//! with brush transforms, the matrix is written out as-is (translated by the
//! bounds origin) and only untransformed gradients are offset.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};
use peniko::color::Srgb;
use peniko::{Gradient, GradientKind};
use xamlize_picture::{GradientShader, PictureShader, ShaderDesc};

use crate::interpret::{self, Context};
use crate::tree::{
    Brush, GradientStop, LinearGradientBrush, RadialGradientBrush, TileMode, VisualBrush,
};

/// Radius written when the shape has no width to normalize against.
///
/// This is the markup default, where the gradient spans the shape.
pub(crate) const DEGENERATE_RADIUS: f64 = 0.5;

/// Brush for `shader` painting a shape whose bounding box is `bounds`.
///
/// Returns `None` for shaders with no markup equivalent.
pub(crate) fn shader_brush(shader: &ShaderDesc, bounds: Rect, cx: Context<'_>) -> Option<Brush> {
    match shader {
        ShaderDesc::Color(color) => Some(Brush::Solid(*color)),
        ShaderDesc::Gradient(gradient) => gradient_brush(gradient, bounds, cx),
        ShaderDesc::Picture(picture) => picture_brush(picture, bounds, cx),
    }
}

/// Where brush geometry ends up relative to the painted shape.
#[derive(Copy, Clone, Debug)]
struct Placement {
    /// Matrix folded into points and radii.
    fold: Option<Affine>,
    /// Subtract the bounds origin and clamp at zero.
    clamp_origin: Option<Point>,
    /// Matrix written as a brush transform.
    transform: Option<Affine>,
}

impl Placement {
    fn new(local: Option<Affine>, bounds: Rect, brush_transform: bool) -> Self {
        match (local, brush_transform) {
            (None, _) => Self {
                fold: None,
                clamp_origin: Some(bounds.origin()),
                transform: None,
            },
            (Some(local), false) => Self {
                fold: Some(clamp_translation(local, bounds)),
                clamp_origin: None,
                transform: None,
            },
            (Some(local), true) => Self {
                fold: None,
                clamp_origin: None,
                transform: Some(relative_to_bounds(local, bounds)),
            },
        }
    }

    fn point(&self, p: Point) -> Point {
        if let Some(fold) = self.fold {
            return fold * p;
        }
        if let Some(origin) = self.clamp_origin {
            return Point::new((p.x - origin.x).max(0.0), (p.y - origin.y).max(0.0));
        }
        p
    }

    fn radius(&self, r: f64) -> f64 {
        match self.fold {
            // x component of the vector (r, 0) mapped by the linear part
            Some(fold) => fold.as_coeffs()[0] * r,
            None => r,
        }
    }
}

/// `local` with its translation moved to the bounds origin and clamped at zero.
fn clamp_translation(local: Affine, bounds: Rect) -> Affine {
    let [a, b, c, d, e, f] = local.as_coeffs();
    Affine::new([
        a,
        b,
        c,
        d,
        (e - bounds.x0).max(0.0),
        (f - bounds.y0).max(0.0),
    ])
}

/// `local` with its translation moved to the bounds origin.
fn relative_to_bounds(local: Affine, bounds: Rect) -> Affine {
    let [a, b, c, d, e, f] = local.as_coeffs();
    Affine::new([a, b, c, d, e - bounds.x0, f - bounds.y0])
}

fn gradient_stops(gradient: &Gradient) -> Vec<GradientStop> {
    gradient
        .stops
        .iter()
        .map(|stop| GradientStop {
            offset: stop.offset,
            color: stop.color.to_alpha_color::<Srgb>(),
        })
        .collect()
}

fn gradient_brush(shader: &GradientShader, bounds: Rect, cx: Context<'_>) -> Option<Brush> {
    let gradient = &shader.gradient;
    let placement = Placement::new(shader.local_transform, bounds, cx.options.brush_transform);
    match &gradient.kind {
        GradientKind::Linear(pos) => Some(Brush::LinearGradient(LinearGradientBrush {
            start: placement.point(pos.start),
            end: placement.point(pos.end),
            spread: gradient.extend,
            transform: placement.transform,
            stops: gradient_stops(gradient),
        })),
        GradientKind::Radial(pos) => {
            // The start radius is zero for every supported input.
            let radius = placement.radius(f64::from(pos.end_radius));
            Some(Brush::RadialGradient(RadialGradientBrush {
                center: placement.point(pos.start_center),
                gradient_origin: placement.point(pos.end_center),
                radius: relative_radius(radius, bounds.width()),
                spread: gradient.extend,
                transform: placement.transform,
                stops: gradient_stops(gradient),
            }))
        }
        GradientKind::Sweep(_) => {
            log::debug!("sweep gradient has no brush equivalent; skipping");
            None
        }
    }
}

/// `radius` as a fraction of `width`.
///
/// Falls back to [`DEGENERATE_RADIUS`] when the width is zero or not finite.
pub(crate) fn relative_radius(radius: f64, width: f64) -> f64 {
    if width.abs() < f64::EPSILON || !width.is_finite() {
        log::debug!("radial gradient on a zero-width shape; using radius {DEGENERATE_RADIUS}");
        return DEGENERATE_RADIUS;
    }
    radius / width
}

fn picture_brush(shader: &PictureShader, bounds: Rect, cx: Context<'_>) -> Option<Brush> {
    let transform = match shader.local_transform {
        Some(local) if cx.options.brush_transform => Some(relative_to_bounds(local, bounds)),
        Some(local) => {
            log::trace!("picture shader local matrix {local:?} is not reproduced");
            None
        }
        None => None,
    };
    let visual = interpret::convert_nested(&shader.picture, cx)?;
    let tile_mode = TileMode::from_extend(shader.extend);
    Some(Brush::Visual(VisualBrush {
        tile_mode: (tile_mode != TileMode::None).then_some(tile_mode),
        source_rect: Some(shader.picture.cull_rect),
        destination_rect: Some(shader.tile),
        transform,
        visual,
    }))
}
