// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Rect, Stroke};
use xamlize_picture::PaintDesc;

use crate::brush::shader_brush;
use crate::interpret::Context;
use crate::tree::{DashStyle, Pen};

impl DashStyle {
    /// Dash pattern with intervals and phase expressed in pen thicknesses.
    ///
    /// Hairline strokes (width zero) are normalized as if one unit wide.
    pub fn from_absolute(intervals: &[f64], phase: f64, width: f64) -> Self {
        let unit = dash_unit(width);
        Self {
            dashes: intervals.iter().map(|v| v / unit).collect(),
            offset: phase / unit,
        }
    }

    /// Intervals and phase in absolute units for a pen of `width`.
    pub fn to_absolute(&self, width: f64) -> (Vec<f64>, f64) {
        let unit = dash_unit(width);
        (
            self.dashes.iter().map(|v| v * unit).collect(),
            self.offset * unit,
        )
    }
}

fn dash_unit(width: f64) -> f64 {
    if width > 0.0 && width.is_finite() {
        width
    } else {
        1.0
    }
}

/// Pen for a stroked paint, or `None` when the paint has no shader.
pub(crate) fn stroke_pen(paint: &PaintDesc, bounds: Rect, cx: Context<'_>) -> Option<Pen> {
    let shader = paint.shader.as_ref()?;
    let stroke: &Stroke = &paint.stroke;
    let brush = shader_brush(shader, bounds, cx);
    if brush.is_none() {
        log::debug!("stroke shader has no brush equivalent; pen has no brush");
    }
    let dash_style = (!stroke.dash_pattern.is_empty()).then(|| {
        DashStyle::from_absolute(&stroke.dash_pattern, stroke.dash_offset, stroke.width)
    });
    Some(Pen {
        brush,
        thickness: stroke.width,
        line_cap: stroke.start_cap,
        line_join: stroke.join,
        miter_limit: stroke.miter_limit,
        dash_style,
    })
}
