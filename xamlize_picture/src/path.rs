// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{BezPath, PathEl, Rect, Shape};
use peniko::Fill;

/// Resolved path geometry plus its fill rule.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDesc {
    /// Path geometry.
    pub geometry: BezPath,
    /// Fill rule used when filling or clipping.
    pub fill_rule: Fill,
}

impl PathDesc {
    /// Create a path description.
    pub fn new(geometry: BezPath, fill_rule: Fill) -> Self {
        Self {
            geometry,
            fill_rule,
        }
    }

    /// Closed rectangle, wound clockwise from the top-left corner, filled nonzero.
    pub fn from_rect(rect: Rect) -> Self {
        let mut geometry = BezPath::new();
        geometry.move_to((rect.x0, rect.y0));
        geometry.line_to((rect.x1, rect.y0));
        geometry.line_to((rect.x1, rect.y1));
        geometry.line_to((rect.x0, rect.y1));
        geometry.close_path();
        Self::new(geometry, Fill::NonZero)
    }

    /// Tight bounding box of the geometry.
    pub fn bounds(&self) -> Rect {
        if self.is_empty() {
            return Rect::ZERO;
        }
        self.geometry.bounding_box()
    }

    /// Returns `true` if the path has no drawable segments.
    ///
    /// A path made only of `MoveTo` and `ClosePath` elements is empty.
    pub fn is_empty(&self) -> bool {
        self.geometry
            .elements()
            .iter()
            .all(|el| matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath))
    }
}

impl From<BezPath> for PathDesc {
    fn from(geometry: BezPath) -> Self {
        Self::new(geometry, Fill::NonZero)
    }
}
