// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path data encoding.

use alloc::string::String;
use core::fmt::Write as _;

use kurbo::{PathEl, Point};
use xamlize_picture::{FillRule, PathDesc};

use crate::number::fmt_f64_to_f32;

/// Fill rule token that prefixes path data: `F0` for even-odd, `F1` for nonzero.
pub fn fill_rule_token(fill_rule: FillRule) -> &'static str {
    match fill_rule {
        FillRule::EvenOdd => "F0",
        FillRule::NonZero => "F1",
    }
}

/// Path data prefixed by its fill rule token, for example `F1 M0 0L1 0L1 1Z`.
///
/// Commands are absolute with no separator between them. The token is
/// followed by a space even when the path is empty.
pub fn path_data(path: &PathDesc) -> String {
    let mut data = String::from(fill_rule_token(path.fill_rule));
    data.push(' ');
    for el in path.geometry.iter() {
        match el {
            PathEl::MoveTo(p) => push_command(&mut data, 'M', &[p]),
            PathEl::LineTo(p) => push_command(&mut data, 'L', &[p]),
            PathEl::QuadTo(p1, p2) => push_command(&mut data, 'Q', &[p1, p2]),
            PathEl::CurveTo(p1, p2, p3) => push_command(&mut data, 'C', &[p1, p2, p3]),
            PathEl::ClosePath => data.push('Z'),
        }
    }
    data
}

fn push_command(data: &mut String, command: char, points: &[Point]) {
    data.push(command);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            data.push(' ');
        }
        let _ = write!(data, "{} {}", fmt_f64_to_f32(p.x), fmt_f64_to_f32(p.y));
    }
}
