// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pictures serialized as JSON by the rendering front end.
//!
//! ```json
//! { "cull_rect": [0, 0, 24, 24],
//!   "commands": [
//!     { "op": "save" },
//!     { "op": "set_matrix", "matrix": [2, 0, 0, 2, 0, 0] },
//!     { "op": "draw_path",
//!       "path": { "data": "M0 0L1 0L1 1L0 1Z" },
//!       "paint": { "shader": { "type": "color", "color": "#FF0000" } } },
//!     { "op": "restore" } ] }
//! ```

use std::sync::Arc;

use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Stroke};
use peniko::{BlendMode, Color, ColorStop, Extend, ImageAlphaType, ImageFormat};
use serde::Deserialize;
use xamlize_picture::{
    ClipCombine, ColorFilterDesc, Command, FillRule, FilterDesc, ImageDesc, PaintDesc,
    PaintStyle, PathDesc, Picture, ShaderDesc, TextBlob, TextStyle,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum PictureJsonError {
    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),
    #[error("invalid color {0:?}; expected #RRGGBB or #AARRGGBB")]
    Color(String),
    #[error("invalid path data {data:?}")]
    Path {
        data: String,
        #[source]
        source: kurbo::SvgParseError,
    },
    #[error("color matrix has {0} values; expected 20")]
    ColorMatrix(usize),
    #[error("text blob has {glyphs} glyphs but {positions} positions")]
    TextBlob { glyphs: usize, positions: usize },
}

type Result<T, E = PictureJsonError> = std::result::Result<T, E>;

/// Parse a picture from its JSON text.
pub(crate) fn parse_picture(text: &str) -> Result<Picture> {
    let json: PictureJson = serde_json::from_str(text)?;
    json.into_picture()
}

/// Parse `#RRGGBB` or `#AARRGGBB`.
pub(crate) fn parse_color(text: &str) -> Result<Color> {
    let invalid = || PictureJsonError::Color(text.to_owned());
    let hex = text.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    let [a, r, g, b] = match hex.len() {
        6 => (value | 0xFF00_0000).to_be_bytes(),
        8 => value.to_be_bytes(),
        _ => return Err(invalid()),
    };
    Ok(Color::from_rgba8(r, g, b, a))
}

fn rect([x0, y0, x1, y1]: [f64; 4]) -> Rect {
    Rect::new(x0, y0, x1, y1)
}

fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}

#[derive(Debug, Deserialize)]
struct PictureJson {
    cull_rect: [f64; 4],
    #[serde(default)]
    commands: Vec<CommandJson>,
}

impl PictureJson {
    fn into_picture(self) -> Result<Picture> {
        let commands = self
            .commands
            .into_iter()
            .map(CommandJson::into_command)
            .collect::<Result<Vec<_>>>()?;
        Ok(Picture::new(rect(self.cull_rect), commands))
    }
}

fn yes() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum CommandJson {
    Save,
    Restore,
    SetMatrix {
        matrix: [f64; 6],
    },
    ClipPath {
        path: PathJson,
        #[serde(default)]
        combine: CombineJson,
        #[serde(default = "yes")]
        antialias: bool,
    },
    ClipRect {
        rect: [f64; 4],
        #[serde(default)]
        combine: CombineJson,
        #[serde(default = "yes")]
        antialias: bool,
    },
    SaveLayer {
        #[serde(default)]
        paint: Option<PaintJson>,
    },
    DrawPath {
        path: PathJson,
        paint: PaintJson,
    },
    DrawText {
        text: String,
        x: f64,
        y: f64,
        paint: PaintJson,
    },
    DrawTextOnPath {
        text: String,
        path: PathJson,
        #[serde(default)]
        h_offset: f64,
        #[serde(default)]
        v_offset: f64,
        paint: PaintJson,
    },
    DrawTextBlob {
        glyphs: Vec<u16>,
        positions: Vec<[f64; 2]>,
        x: f64,
        y: f64,
        paint: PaintJson,
    },
    DrawImage {
        width: u32,
        height: u32,
        src: [f64; 4],
        dst: [f64; 4],
        #[serde(default)]
        paint: Option<PaintJson>,
    },
}

impl CommandJson {
    fn into_command(self) -> Result<Command> {
        Ok(match self {
            Self::Save => Command::Save,
            Self::Restore => Command::Restore,
            Self::SetMatrix { matrix } => Command::SetMatrix(Affine::new(matrix)),
            Self::ClipPath {
                path,
                combine,
                antialias,
            } => Command::ClipPath {
                path: path.into_path()?,
                combine: combine.into(),
                antialias,
            },
            Self::ClipRect {
                rect: r,
                combine,
                antialias,
            } => Command::ClipRect {
                rect: rect(r),
                combine: combine.into(),
                antialias,
            },
            Self::SaveLayer { paint } => Command::SaveLayer {
                paint: paint.map(PaintJson::into_paint).transpose()?,
            },
            Self::DrawPath { path, paint } => Command::DrawPath {
                path: path.into_path()?,
                paint: paint.into_paint()?,
            },
            Self::DrawText { text, x, y, paint } => Command::DrawText {
                text,
                x,
                y,
                paint: paint.into_paint()?,
            },
            Self::DrawTextOnPath {
                text,
                path,
                h_offset,
                v_offset,
                paint,
            } => Command::DrawTextOnPath {
                text,
                path: path.into_path()?,
                h_offset,
                v_offset,
                paint: paint.into_paint()?,
            },
            Self::DrawTextBlob {
                glyphs,
                positions,
                x,
                y,
                paint,
            } => {
                if glyphs.len() != positions.len() {
                    return Err(PictureJsonError::TextBlob {
                        glyphs: glyphs.len(),
                        positions: positions.len(),
                    });
                }
                Command::DrawTextBlob {
                    blob: TextBlob {
                        glyphs,
                        positions: positions.into_iter().map(point).collect(),
                    },
                    x,
                    y,
                    paint: paint.into_paint()?,
                }
            }
            Self::DrawImage {
                width,
                height,
                src,
                dst,
                paint,
            } => Command::DrawImage {
                image: ImageDesc {
                    width,
                    height,
                    format: ImageFormat::Rgba8,
                    alpha_type: ImageAlphaType::Alpha,
                },
                src: rect(src),
                dst: rect(dst),
                paint: paint.map(PaintJson::into_paint).transpose()?,
            },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CombineJson {
    #[default]
    Intersect,
    Difference,
}

impl From<CombineJson> for ClipCombine {
    fn from(value: CombineJson) -> Self {
        match value {
            CombineJson::Intersect => Self::Intersect,
            CombineJson::Difference => Self::Difference,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
enum FillRuleJson {
    #[default]
    #[serde(rename = "nonzero")]
    NonZero,
    #[serde(rename = "evenodd")]
    EvenOdd,
}

#[derive(Debug, Deserialize)]
struct PathJson {
    data: String,
    #[serde(default)]
    fill_rule: FillRuleJson,
}

impl PathJson {
    fn into_path(self) -> Result<PathDesc> {
        let geometry = BezPath::from_svg(&self.data).map_err(|source| PictureJsonError::Path {
            data: self.data.clone(),
            source,
        })?;
        let fill_rule = match self.fill_rule {
            FillRuleJson::NonZero => FillRule::NonZero,
            FillRuleJson::EvenOdd => FillRule::EvenOdd,
        };
        Ok(PathDesc::new(geometry, fill_rule))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StyleJson {
    #[default]
    Fill,
    Stroke,
    FillAndStroke,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CapJson {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum JoinJson {
    #[default]
    Miter,
    Round,
    Bevel,
}

fn unit() -> f64 {
    1.0
}

fn default_miter_limit() -> f64 {
    4.0
}

#[derive(Debug, Deserialize)]
struct StrokeJson {
    #[serde(default = "unit")]
    width: f64,
    #[serde(default)]
    cap: CapJson,
    #[serde(default)]
    join: JoinJson,
    #[serde(default = "default_miter_limit")]
    miter_limit: f64,
    #[serde(default)]
    dashes: Vec<f64>,
    #[serde(default)]
    dash_offset: f64,
}

impl StrokeJson {
    fn into_stroke(self) -> Stroke {
        let cap = match self.cap {
            CapJson::Butt => Cap::Butt,
            CapJson::Round => Cap::Round,
            CapJson::Square => Cap::Square,
        };
        let join = match self.join {
            JoinJson::Miter => Join::Miter,
            JoinJson::Round => Join::Round,
            JoinJson::Bevel => Join::Bevel,
        };
        Stroke::new(self.width)
            .with_caps(cap)
            .with_join(join)
            .with_miter_limit(self.miter_limit)
            .with_dashes(self.dash_offset, self.dashes)
    }
}

/// Tile modes use the source renderer's names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ExtendJson {
    #[default]
    Clamp,
    Repeat,
    Mirror,
}

impl From<ExtendJson> for Extend {
    fn from(value: ExtendJson) -> Self {
        match value {
            ExtendJson::Clamp => Self::Pad,
            ExtendJson::Repeat => Self::Repeat,
            ExtendJson::Mirror => Self::Reflect,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StopJson {
    offset: f32,
    color: String,
}

fn stops(stops: &[StopJson]) -> Result<Vec<ColorStop>> {
    stops
        .iter()
        .map(|stop| Ok(ColorStop::from((stop.offset, parse_color(&stop.color)?))))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ShaderJson {
    Color {
        color: String,
    },
    LinearGradient {
        start: [f64; 2],
        end: [f64; 2],
        stops: Vec<StopJson>,
        #[serde(default)]
        extend: ExtendJson,
        #[serde(default)]
        local_matrix: Option<[f64; 6]>,
    },
    TwoPointConical {
        center: [f64; 2],
        #[serde(default)]
        start_radius: f32,
        origin: [f64; 2],
        end_radius: f32,
        stops: Vec<StopJson>,
        #[serde(default)]
        extend: ExtendJson,
        #[serde(default)]
        local_matrix: Option<[f64; 6]>,
    },
    Picture {
        picture: Box<PictureJson>,
        tile: [f64; 4],
        #[serde(default)]
        extend: ExtendJson,
        #[serde(default)]
        local_matrix: Option<[f64; 6]>,
    },
}

impl ShaderJson {
    fn into_shader(self) -> Result<ShaderDesc> {
        let (shader, local_matrix) = match self {
            Self::Color { color } => return Ok(ShaderDesc::Color(parse_color(&color)?)),
            Self::LinearGradient {
                start,
                end,
                stops: s,
                extend,
                local_matrix,
            } => (
                ShaderDesc::linear_gradient(point(start), point(end), &stops(&s)?, extend.into()),
                local_matrix,
            ),
            Self::TwoPointConical {
                center,
                start_radius,
                origin,
                end_radius,
                stops: s,
                extend,
                local_matrix,
            } => (
                ShaderDesc::two_point_conical(
                    point(center),
                    start_radius,
                    point(origin),
                    end_radius,
                    &stops(&s)?,
                    extend.into(),
                ),
                local_matrix,
            ),
            Self::Picture {
                picture,
                tile,
                extend,
                local_matrix,
            } => (
                ShaderDesc::picture(
                    Arc::new(picture.into_picture()?),
                    rect(tile),
                    extend.into(),
                ),
                local_matrix,
            ),
        };
        Ok(match local_matrix {
            Some(m) => shader.with_local_transform(Affine::new(m)),
            None => shader,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ColorFilterJson {
    LuminanceToAlpha,
    Matrix { values: Vec<f32> },
    Blend { color: String },
}

impl ColorFilterJson {
    fn into_filter(self) -> Result<ColorFilterDesc> {
        Ok(match self {
            Self::LuminanceToAlpha => ColorFilterDesc::LuminanceToAlpha,
            Self::Matrix { values } => {
                let len = values.len();
                let matrix: [f32; 20] = values
                    .try_into()
                    .map_err(|_| PictureJsonError::ColorMatrix(len))?;
                ColorFilterDesc::Matrix(Box::new(matrix))
            }
            Self::Blend { color } => ColorFilterDesc::Blend {
                color: parse_color(&color)?,
                mode: BlendMode::default(),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ImageFilterJson {
    Flood {
        color: String,
    },
    Blur {
        sigma: f32,
    },
    DropShadow {
        dx: f32,
        dy: f32,
        sigma: f32,
        color: String,
    },
    Offset {
        dx: f32,
        dy: f32,
    },
}

impl ImageFilterJson {
    fn into_filter(self) -> Result<FilterDesc> {
        Ok(match self {
            Self::Flood { color } => FilterDesc::Flood {
                color: parse_color(&color)?,
            },
            Self::Blur { sigma } => FilterDesc::blur(sigma),
            Self::DropShadow {
                dx,
                dy,
                sigma,
                color,
            } => FilterDesc::DropShadow {
                dx,
                dy,
                std_deviation_x: sigma,
                std_deviation_y: sigma,
                color: parse_color(&color)?,
            },
            Self::Offset { dx, dy } => FilterDesc::Offset { dx, dy },
        })
    }
}

fn regular_weight() -> u16 {
    400
}

#[derive(Debug, Deserialize)]
struct TextStyleJson {
    family: String,
    size: f32,
    #[serde(default = "regular_weight")]
    weight: u16,
    #[serde(default)]
    italic: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PaintJson {
    #[serde(default)]
    style: StyleJson,
    #[serde(default)]
    shader: Option<ShaderJson>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    stroke: Option<StrokeJson>,
    #[serde(default)]
    color_filter: Option<ColorFilterJson>,
    #[serde(default)]
    image_filter: Option<ImageFilterJson>,
    #[serde(default)]
    text: Option<TextStyleJson>,
}

impl PaintJson {
    fn into_paint(self) -> Result<PaintDesc> {
        let mut paint = PaintDesc {
            style: match self.style {
                StyleJson::Fill => PaintStyle::Fill,
                StyleJson::Stroke => PaintStyle::Stroke,
                StyleJson::FillAndStroke => PaintStyle::FillAndStroke,
            },
            shader: self.shader.map(ShaderJson::into_shader).transpose()?,
            color: self.color.as_deref().map(parse_color).transpose()?,
            color_filter: self
                .color_filter
                .map(ColorFilterJson::into_filter)
                .transpose()?,
            image_filter: self
                .image_filter
                .map(ImageFilterJson::into_filter)
                .transpose()?,
            ..PaintDesc::default()
        };
        if let Some(stroke) = self.stroke {
            paint.stroke = stroke.into_stroke();
        }
        if let Some(text) = self.text {
            paint.text = Some(TextStyle {
                weight: text.weight,
                italic: text.italic,
                ..TextStyle::new(text.family, text.size)
            });
        }
        Ok(paint)
    }
}
