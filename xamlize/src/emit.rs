// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing tree to markup.
//!
//! Markup is written through [`XmlWriter`], which indents as elements are
//! opened and escapes attribute values. Path data inside `StreamGeometry`
//! is written with whitespace preserved so the fill-rule token keeps its
//! separator.

use alloc::string::String;

use kurbo::{Affine, Cap, Join};
use peniko::Extend;
use xmlwriter::{Indent, Options, XmlWriter};

use crate::geometry::path_data;
use crate::number::{
    fmt_color, fmt_f32, fmt_f64, fmt_f64_to_f32, fmt_list, fmt_matrix, fmt_point, fmt_rect,
};
use crate::options::{ConvertOptions, DocumentKind, LineEnding};
use crate::tree::{
    Brush, DashStyle, Drawing, DrawingGroup, GeometryDrawing, GradientStop, Pen, VisualBrush,
};

/// Write `root` as markup, with `key` as the `x:Key` of the outermost element.
///
/// Indentation and line endings follow [`ConvertOptions::indent`] and
/// [`ConvertOptions::line_ending`].
pub fn write_document(
    root: &DrawingGroup,
    kind: DocumentKind,
    key: Option<&str>,
    options: &ConvertOptions,
) -> String {
    let mut w = MarkupWriter::new(options);
    w.document(root, kind, key);
    w.finish()
}

fn spread_method(extend: Extend) -> Option<&'static str> {
    match extend {
        Extend::Pad => None,
        Extend::Repeat => Some("Repeat"),
        Extend::Reflect => Some("Reflect"),
    }
}

fn pen_line_cap(cap: Cap) -> &'static str {
    match cap {
        Cap::Butt => "Flat",
        Cap::Round => "Round",
        Cap::Square => "Square",
    }
}

fn pen_line_join(join: Join) -> &'static str {
    match join {
        Join::Miter => "Miter",
        Join::Round => "Round",
        Join::Bevel => "Bevel",
    }
}

/// Solid brushes go in an attribute; every other brush needs a property block.
fn block_brush(brush: Option<&Brush>) -> Option<&Brush> {
    brush.filter(|brush| !matches!(brush, Brush::Solid(_)))
}

pub(crate) struct MarkupWriter {
    xml: XmlWriter,
    line_ending: LineEnding,
}

impl MarkupWriter {
    pub(crate) fn new(options: &ConvertOptions) -> Self {
        let indent = match options.indent {
            Some(width) => Indent::Spaces(u8::try_from(width).unwrap_or(u8::MAX)),
            None => Indent::None,
        };
        Self {
            xml: XmlWriter::new(Options {
                use_single_quote: false,
                indent,
                attributes_indent: Indent::None,
            }),
            line_ending: options.line_ending,
        }
    }

    pub(crate) fn start(&mut self, name: &str) {
        self.xml.start_element(name);
    }

    pub(crate) fn attr(&mut self, name: &str, value: &str) {
        self.xml.write_attribute(name, value);
    }

    pub(crate) fn end(&mut self) {
        self.xml.end_element();
    }

    pub(crate) fn comment(&mut self, text: &str) {
        self.xml.write_comment_fmt(format_args!(" {text} "));
    }

    pub(crate) fn finish(self) -> String {
        let out = self.xml.end_document();
        let out = out.trim_end_matches('\n');
        match self.line_ending {
            LineEnding::Lf => out.into(),
            LineEnding::CrLf => out.replace('\n', "\r\n"),
        }
    }

    pub(crate) fn document(&mut self, root: &DrawingGroup, kind: DocumentKind, key: Option<&str>) {
        match kind {
            DocumentKind::Image => self.image(root, key),
            DocumentKind::DrawingGroup => self.group(root, key),
        }
    }

    fn key(&mut self, key: Option<&str>) {
        if let Some(key) = key {
            self.attr("x:Key", key);
        }
    }

    fn image(&mut self, root: &DrawingGroup, key: Option<&str>) {
        self.start("Image");
        self.key(key);
        self.start("DrawingImage");
        self.group(root, None);
        self.end();
        self.end();
    }

    fn group(&mut self, group: &DrawingGroup, key: Option<&str>) {
        self.start("DrawingGroup");
        self.key(key);
        if let Some(opacity) = group.opacity {
            self.attr("Opacity", &fmt_f64(opacity));
        }
        if let Some(transform) = group.transform {
            self.start("DrawingGroup.Transform");
            self.matrix_transform(transform);
            self.end();
        }
        if let Some(clip) = &group.clip_geometry {
            self.start("DrawingGroup.ClipGeometry");
            self.start("StreamGeometry");
            self.xml.set_preserve_whitespaces(true);
            self.xml.write_text(&path_data(clip));
            self.end();
            self.xml.set_preserve_whitespaces(false);
            self.end();
        }
        for child in &group.children {
            match child {
                Drawing::Group(g) => self.group(g, None),
                Drawing::Geometry(g) => self.geometry_drawing(g),
            }
        }
        if let Some(mask) = &group.opacity_mask {
            self.start("DrawingGroup.OpacityMask");
            self.brush(mask);
            self.end();
        }
        self.end();
    }

    fn matrix_transform(&mut self, transform: Affine) {
        self.start("MatrixTransform");
        self.attr("Matrix", &fmt_matrix(transform));
        self.end();
    }

    fn geometry_drawing(&mut self, drawing: &GeometryDrawing) {
        self.start("GeometryDrawing");
        if let Some(Brush::Solid(color)) = &drawing.brush {
            self.attr("Brush", &fmt_color(*color));
        }
        self.attr("Geometry", &path_data(&drawing.geometry));
        if let Some(brush) = block_brush(drawing.brush.as_ref()) {
            self.start("GeometryDrawing.Brush");
            self.brush(brush);
            self.end();
        }
        if let Some(pen) = &drawing.pen {
            self.start("GeometryDrawing.Pen");
            self.pen(pen);
            self.end();
        }
        self.end();
    }

    fn brush(&mut self, brush: &Brush) {
        match brush {
            Brush::Solid(color) => {
                self.start("SolidColorBrush");
                self.attr("Color", &fmt_color(*color));
                self.end();
            }
            Brush::LinearGradient(lg) => {
                self.start("LinearGradientBrush");
                self.attr("StartPoint", &fmt_point(lg.start));
                self.attr("EndPoint", &fmt_point(lg.end));
                if let Some(spread) = spread_method(lg.spread) {
                    self.attr("SpreadMethod", spread);
                }
                self.brush_transform("LinearGradientBrush", lg.transform);
                self.gradient_stops("LinearGradientBrush", &lg.stops);
                self.end();
            }
            Brush::RadialGradient(rg) => {
                self.start("RadialGradientBrush");
                self.attr("Center", &fmt_point(rg.center));
                self.attr("GradientOrigin", &fmt_point(rg.gradient_origin));
                self.attr("Radius", &fmt_f64_to_f32(rg.radius));
                if let Some(spread) = spread_method(rg.spread) {
                    self.attr("SpreadMethod", spread);
                }
                self.brush_transform("RadialGradientBrush", rg.transform);
                self.gradient_stops("RadialGradientBrush", &rg.stops);
                self.end();
            }
            Brush::Visual(vb) => self.visual_brush(vb),
        }
    }

    fn brush_transform(&mut self, element: &str, transform: Option<Affine>) {
        if let Some(transform) = transform {
            self.start(&alloc::format!("{element}.Transform"));
            self.matrix_transform(transform);
            self.end();
        }
    }

    fn gradient_stops(&mut self, element: &str, stops: &[GradientStop]) {
        self.start(&alloc::format!("{element}.GradientStops"));
        for stop in stops {
            self.start("GradientStop");
            self.attr("Offset", &fmt_f32(stop.offset));
            self.attr("Color", &fmt_color(stop.color));
            self.end();
        }
        self.end();
    }

    fn visual_brush(&mut self, vb: &VisualBrush) {
        self.start("VisualBrush");
        if let Some(mode) = vb.tile_mode {
            self.attr("TileMode", mode.as_str());
        }
        if let Some(rect) = vb.source_rect {
            self.attr("SourceRect", &fmt_rect(rect));
        }
        if let Some(rect) = vb.destination_rect {
            self.attr("DestinationRect", &fmt_rect(rect));
        }
        self.brush_transform("VisualBrush", vb.transform);
        self.start("VisualBrush.Visual");
        self.image(&vb.visual, None);
        self.end();
        self.end();
    }

    fn pen(&mut self, pen: &Pen) {
        self.start("Pen");
        if let Some(Brush::Solid(color)) = &pen.brush {
            self.attr("Brush", &fmt_color(*color));
        }
        if pen.thickness != Pen::DEFAULT_THICKNESS {
            self.attr("Thickness", &fmt_f64_to_f32(pen.thickness));
        }
        if pen.line_cap != Pen::DEFAULT_LINE_CAP {
            self.attr("LineCap", pen_line_cap(pen.line_cap));
        }
        if pen.line_join != Pen::DEFAULT_LINE_JOIN {
            self.attr("LineJoin", pen_line_join(pen.line_join));
        }
        if pen.miter_limit != Pen::DEFAULT_MITER_LIMIT {
            self.attr("MiterLimit", &fmt_f64_to_f32(pen.miter_limit));
        }
        if let Some(dash) = &pen.dash_style {
            self.dash_style(dash);
        }
        if let Some(brush) = block_brush(pen.brush.as_ref()) {
            self.start("Pen.Brush");
            self.brush(brush);
            self.end();
        }
        self.end();
    }

    fn dash_style(&mut self, dash: &DashStyle) {
        self.start("Pen.DashStyle");
        self.start("DashStyle");
        self.attr("Dashes", &fmt_list(&dash.dashes));
        self.attr("Offset", &fmt_f64_to_f32(dash.offset));
        self.end();
        self.end();
    }
}
