// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locale-invariant formatting of scalars, points, rectangles, matrices, and colors.
//!
//! Rust's float `Display` is already locale independent and prints the
//! shortest string that round-trips, never using exponent notation. Geometry
//! is written at single precision; negative zero and non-finite values are
//! written as `0`.

use alloc::format;
use alloc::string::String;
use core::fmt::Write as _;

use kurbo::{Affine, Point, Rect};
use peniko::Color;

/// Single precision scalar.
pub(crate) fn fmt_f32(v: f32) -> String {
    if v == 0.0 || !v.is_finite() {
        return String::from("0");
    }
    format!("{v}")
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "markup geometry is written at single precision"
)]
pub(crate) fn fmt_f64_to_f32(v: f64) -> String {
    fmt_f32(v as f32)
}

/// Full precision scalar, for ratios such as opacity.
pub(crate) fn fmt_f64(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return String::from("0");
    }
    format!("{v}")
}

/// `x,y`
pub(crate) fn fmt_point(p: Point) -> String {
    format!("{},{}", fmt_f64_to_f32(p.x), fmt_f64_to_f32(p.y))
}

/// `left,top,width,height`
pub(crate) fn fmt_rect(r: Rect) -> String {
    format!(
        "{},{},{},{}",
        fmt_f64_to_f32(r.x0),
        fmt_f64_to_f32(r.y0),
        fmt_f64_to_f32(r.width()),
        fmt_f64_to_f32(r.height())
    )
}

/// Six comma-separated coefficients: scale-x, skew-y, skew-x, scale-y, translate-x, translate-y.
pub(crate) fn fmt_matrix(xf: Affine) -> String {
    // kurbo::Affine stores [a, b, c, d, e, f] corresponding to:
    // [ a c e ]
    // [ b d f ]
    // [ 0 0 1 ]
    fmt_list(&xf.as_coeffs())
}

/// Comma-separated list.
pub(crate) fn fmt_list(values: &[f64]) -> String {
    let mut s = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&fmt_f64_to_f32(*v));
    }
    s
}

/// `#AARRGGBB`, uppercase.
pub(crate) fn fmt_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    let mut s = String::with_capacity(9);
    let _ = write!(
        s,
        "#{:02X}{:02X}{:02X}{:02X}",
        rgba.a, rgba.r, rgba.g, rgba.b
    );
    s
}
