// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint, shader, and filter descriptions.

use alloc::boxed::Box;
use alloc::sync::Arc;

use kurbo::{Affine, Cap, Join, Point, Rect, Stroke};
use peniko::{
    BlendMode, Color, ColorStop, Extend, Gradient, GradientKind, LinearGradientPosition,
    RadialGradientPosition,
};

use crate::{Picture, TextStyle};

/// Which parts of a path a paint covers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaintStyle {
    /// Fill the interior.
    #[default]
    Fill,
    /// Stroke the outline.
    Stroke,
    /// Fill the interior, then stroke the outline.
    FillAndStroke,
}

impl PaintStyle {
    /// Returns `true` if the interior is painted.
    pub fn fills(self) -> bool {
        matches!(self, Self::Fill | Self::FillAndStroke)
    }

    /// Returns `true` if the outline is painted.
    pub fn strokes(self) -> bool {
        matches!(self, Self::Stroke | Self::FillAndStroke)
    }
}

/// A gradient shader with an optional local matrix.
///
/// Linear gradients use [`GradientKind::Linear`]. Two-point conical
/// gradients use [`GradientKind::Radial`], where `start_center` is the
/// gradient center and `end_center` the gradient origin. Sweep gradients can
/// be described but have no markup equivalent.
#[derive(Clone, Debug)]
pub struct GradientShader {
    /// Gradient geometry, stops, and extend mode.
    pub gradient: Gradient,
    /// Matrix mapping gradient space into user space.
    pub local_transform: Option<Affine>,
}

/// A shader that tiles a nested picture.
#[derive(Clone, Debug)]
pub struct PictureShader {
    /// The nested picture.
    pub picture: Arc<Picture>,
    /// Tile rectangle in user space.
    pub tile: Rect,
    /// Tiling mode, applied to both axes.
    pub extend: Extend,
    /// Matrix mapping tile space into user space.
    pub local_transform: Option<Affine>,
}

/// Source of color for a paint.
#[derive(Clone, Debug)]
pub enum ShaderDesc {
    /// A single flat color.
    Color(Color),
    /// A linear, radial, or sweep gradient.
    Gradient(GradientShader),
    /// A tiled nested picture.
    Picture(PictureShader),
}

impl ShaderDesc {
    /// Linear gradient between two points.
    pub fn linear_gradient(
        start: impl Into<Point>,
        end: impl Into<Point>,
        stops: &[ColorStop],
        extend: Extend,
    ) -> Self {
        Self::Gradient(GradientShader {
            gradient: Gradient {
                kind: GradientKind::Linear(LinearGradientPosition::new(start, end)),
                extend,
                stops: stops.into(),
                ..Gradient::default()
            },
            local_transform: None,
        })
    }

    /// Two-point conical gradient.
    ///
    /// `center` is where the gradient is centered; `origin` is the focal
    /// point the gradient radiates from.
    pub fn two_point_conical(
        center: impl Into<Point>,
        start_radius: f32,
        origin: impl Into<Point>,
        end_radius: f32,
        stops: &[ColorStop],
        extend: Extend,
    ) -> Self {
        Self::Gradient(GradientShader {
            gradient: Gradient {
                kind: GradientKind::Radial(RadialGradientPosition {
                    start_center: center.into(),
                    start_radius,
                    end_center: origin.into(),
                    end_radius,
                }),
                extend,
                stops: stops.into(),
                ..Gradient::default()
            },
            local_transform: None,
        })
    }

    /// Tiled nested picture.
    pub fn picture(picture: Arc<Picture>, tile: Rect, extend: Extend) -> Self {
        Self::Picture(PictureShader {
            picture,
            tile,
            extend,
            local_transform: None,
        })
    }

    /// Set the local matrix of a gradient or picture shader.
    ///
    /// Has no effect on flat colors.
    #[must_use]
    pub fn with_local_transform(mut self, transform: Affine) -> Self {
        match &mut self {
            Self::Color(_) => {}
            Self::Gradient(g) => g.local_transform = Some(transform),
            Self::Picture(p) => p.local_transform = Some(transform),
        }
        self
    }

    /// Returns the flat color if this is a [`ShaderDesc::Color`].
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            _ => None,
        }
    }
}

/// Color filter applied while compositing.
#[derive(Clone, Debug)]
pub enum ColorFilterDesc {
    /// Replace alpha with the luminance of the color (used for SVG masks).
    LuminanceToAlpha,
    /// 4x5 row-major color matrix.
    Matrix(Box<[f32; 20]>),
    /// Blend a constant color over the input.
    Blend {
        /// Constant color.
        color: Color,
        /// Blend mode.
        mode: BlendMode,
    },
}

/// Description of an image filter.
///
/// The converter recognizes layers carrying filters but does not reproduce
/// them; the variant set follows the common SVG filter primitives.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterDesc {
    /// Fill the output with a solid color (aka `feFlood`).
    Flood {
        /// Flood color.
        color: Color,
    },
    /// Gaussian blur with separate X/Y standard deviation values in user space.
    Blur {
        /// Standard deviation along the X axis.
        std_deviation_x: f32,
        /// Standard deviation along the Y axis.
        std_deviation_y: f32,
    },
    /// Drop shadow under the source content.
    DropShadow {
        /// Shadow offset along the X axis.
        dx: f32,
        /// Shadow offset along the Y axis.
        dy: f32,
        /// Blur standard deviation along the X axis.
        std_deviation_x: f32,
        /// Blur standard deviation along the Y axis.
        std_deviation_y: f32,
        /// Shadow color.
        color: Color,
    },
    /// Translate the layer output by a vector (aka `feOffset`).
    Offset {
        /// Offset along the X axis.
        dx: f32,
        /// Offset along the Y axis.
        dy: f32,
    },
}

impl FilterDesc {
    /// Create a uniform Gaussian blur filter.
    #[inline]
    pub const fn blur(sigma: f32) -> Self {
        Self::Blur {
            std_deviation_x: sigma,
            std_deviation_y: sigma,
        }
    }
}

/// How a path or layer is painted.
#[derive(Clone, Debug)]
pub struct PaintDesc {
    /// Fill, stroke, or both.
    pub style: PaintStyle,
    /// Color source. Nothing is drawn by the converter without one.
    pub shader: Option<ShaderDesc>,
    /// Stroke width, caps, join, miter limit, and dash pattern.
    ///
    /// Only [`Stroke::start_cap`] is consulted for the line cap.
    pub stroke: Stroke,
    /// Flat paint color, independent of the shader.
    ///
    /// Layer paints use this for group opacity and mask markers.
    pub color: Option<Color>,
    /// Color filter applied while compositing.
    pub color_filter: Option<ColorFilterDesc>,
    /// Image filter applied while compositing.
    pub image_filter: Option<FilterDesc>,
    /// Font selection for text draws.
    pub text: Option<TextStyle>,
}

impl Default for PaintDesc {
    fn default() -> Self {
        Self {
            style: PaintStyle::Fill,
            shader: None,
            stroke: Stroke::new(1.0)
                .with_caps(Cap::Butt)
                .with_join(Join::Miter)
                .with_miter_limit(4.0),
            color: None,
            color_filter: None,
            image_filter: None,
            text: None,
        }
    }
}

impl PaintDesc {
    /// Flat color fill.
    pub fn fill(color: Color) -> Self {
        Self::shaded(PaintStyle::Fill, ShaderDesc::Color(color)).with_color(color)
    }

    /// Flat color stroke of the given width.
    pub fn stroke(color: Color, width: f64) -> Self {
        let mut paint = Self::shaded(PaintStyle::Stroke, ShaderDesc::Color(color)).with_color(color);
        paint.stroke.width = width;
        paint
    }

    /// Paint with an explicit style and shader.
    pub fn shaded(style: PaintStyle, shader: ShaderDesc) -> Self {
        Self {
            style,
            shader: Some(shader),
            ..Self::default()
        }
    }

    /// Layer paint that only carries a flat color.
    pub fn layer(color: Color) -> Self {
        Self::default().with_color(color)
    }

    /// Set the flat color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Replace the stroke description.
    #[must_use]
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    /// Set the color filter.
    #[must_use]
    pub fn with_color_filter(mut self, filter: ColorFilterDesc) -> Self {
        self.color_filter = Some(filter);
        self
    }

    /// Set the image filter.
    #[must_use]
    pub fn with_image_filter(mut self, filter: FilterDesc) -> Self {
        self.image_filter = Some(filter);
        self
    }

    /// Set the font selection.
    #[must_use]
    pub fn with_text_style(mut self, text: TextStyle) -> Self {
        self.text = Some(text);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_stroke_cover_both() {
        assert!(PaintStyle::FillAndStroke.fills(), "fill-and-stroke fills");
        assert!(PaintStyle::FillAndStroke.strokes(), "fill-and-stroke strokes");
        assert!(!PaintStyle::Fill.strokes(), "fill does not stroke");
        assert!(!PaintStyle::Stroke.fills(), "stroke does not fill");
    }

    #[test]
    fn local_transform_attaches_to_gradients_only() {
        let m = Affine::translate((3.0, 4.0));
        let color = ShaderDesc::Color(Color::BLACK).with_local_transform(m);
        assert_eq!(color.as_color(), Some(Color::BLACK));

        let stops = [
            ColorStop::from((0.0, Color::BLACK)),
            ColorStop::from((1.0, Color::WHITE)),
        ];
        let linear =
            ShaderDesc::linear_gradient((0.0, 0.0), (1.0, 0.0), &stops, Extend::Pad)
                .with_local_transform(m);
        match linear {
            ShaderDesc::Gradient(g) => {
                assert_eq!(g.local_transform, Some(m));
                assert_eq!(g.gradient.stops.len(), 2);
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn stroke_paint_keeps_width() {
        let paint = PaintDesc::stroke(Color::BLACK, 3.0);
        assert_eq!(paint.style, PaintStyle::Stroke);
        assert!((paint.stroke.width - 3.0).abs() < 1e-12, "width is carried");
        assert_eq!(paint.color, Some(Color::BLACK));
    }
}
