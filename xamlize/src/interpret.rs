// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The command interpreter.
//!
//! A single pass over a picture's commands that keeps the save/restore
//! stacks and a builder stack of open groups. Transform and clip commands
//! open a group that stays open until the frame they were pushed in is
//! restored; layers redirect drawing into a fresh builder that is spliced
//! into its parent on restore.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};
use peniko::Color;
use xamlize_picture::{
    ClipCombine, Command, FillRule, GlyphOutlines, PaintDesc, PathDesc, Picture,
};

use crate::ConvertOptions;
use crate::brush::shader_brush;
use crate::layer::{self, LayerKind};
use crate::pen::stroke_pen;
use crate::state::{ClipEntry, LayerFrame, RestoredFrame, StateStack, is_identity};
use crate::tree::{Brush, Drawing, DrawingGroup, GeometryDrawing};

/// Nested picture shaders deeper than this are dropped.
pub(crate) const MAX_PICTURE_DEPTH: usize = 32;

/// Settings and collaborators shared by a conversion and its nested pictures.
#[derive(Copy, Clone)]
pub(crate) struct Context<'a> {
    pub(crate) options: &'a ConvertOptions,
    pub(crate) outlines: &'a dyn GlyphOutlines,
    depth: usize,
}

impl<'a> Context<'a> {
    pub(crate) fn root(options: &'a ConvertOptions, outlines: &'a dyn GlyphOutlines) -> Self {
        Self {
            options,
            outlines,
            depth: 0,
        }
    }

    fn nested(self) -> Option<Self> {
        (self.depth < MAX_PICTURE_DEPTH).then_some(Self {
            depth: self.depth + 1,
            ..self
        })
    }
}

/// Convert a picture into its root group.
pub(crate) fn convert(picture: &Picture, cx: Context<'_>) -> DrawingGroup {
    Interpreter::new(cx).run(picture)
}

/// Convert a picture nested in a shader, or `None` past the depth limit.
pub(crate) fn convert_nested(picture: &Picture, cx: Context<'_>) -> Option<DrawingGroup> {
    let Some(cx) = cx.nested() else {
        log::warn!("picture shaders nested deeper than {MAX_PICTURE_DEPTH} levels are dropped");
        return None;
    };
    Some(convert(picture, cx))
}

/// Leaf drawing for `path` painted with `paint`.
pub(crate) fn geometry_drawing(
    path: &PathDesc,
    paint: &PaintDesc,
    cx: Context<'_>,
) -> GeometryDrawing {
    let bounds = path.bounds();
    let brush = if paint.style.fills() {
        paint
            .shader
            .as_ref()
            .and_then(|shader| shader_brush(shader, bounds, cx))
    } else {
        None
    };
    let pen = if paint.style.strokes() {
        stroke_pen(paint, bounds, cx)
    } else {
        None
    };
    GeometryDrawing {
        geometry: path.clone(),
        brush,
        pen,
    }
}

struct Interpreter<'a> {
    cx: Context<'a>,
    state: StateStack,
    root: DrawingGroup,
    /// Groups opened by transforms, clips, and layers, innermost last.
    open: Vec<DrawingGroup>,
}

impl<'a> Interpreter<'a> {
    fn new(cx: Context<'a>) -> Self {
        Self {
            cx,
            state: StateStack::new(),
            root: DrawingGroup::default(),
            open: Vec::new(),
        }
    }

    fn run(mut self, picture: &Picture) -> DrawingGroup {
        if self.cx.options.transparent_background {
            self.background(picture.cull_rect);
        }
        for command in &picture.commands {
            self.command(command);
        }
        self.finish()
    }

    fn command(&mut self, command: &Command) {
        log::trace!("{} at depth {}", command.name(), self.state.depth());
        match command {
            Command::ClipPath {
                path,
                combine,
                antialias,
            } => self.clip(ClipEntry {
                path: path.clone(),
                combine: *combine,
                antialias: *antialias,
            }),
            Command::ClipRect {
                rect,
                combine,
                antialias,
            } => self.clip(ClipEntry {
                path: PathDesc::from_rect(*rect),
                combine: *combine,
                antialias: *antialias,
            }),
            Command::SetMatrix(matrix) => self.set_matrix(*matrix),
            Command::Save => self.state.save(),
            Command::Restore => self.restore(),
            Command::SaveLayer { paint } => self.save_layer(paint.as_ref()),
            Command::DrawPath { path, paint } => self.draw(path, paint),
            Command::DrawText { text, x, y, paint } => {
                let origin = Point::new(*x, *y);
                match self.cx.outlines.text_path(text, origin, paint) {
                    Some(outline) => self.draw(&PathDesc::new(outline, FillRule::NonZero), paint),
                    None => log::debug!("no outline for text {text:?}; skipping"),
                }
            }
            Command::DrawTextOnPath { text, .. } => {
                log::debug!("text on a path is not converted: {text:?}");
            }
            Command::DrawTextBlob { blob, .. } => {
                log::debug!("text blob of {} glyphs is not converted", blob.glyphs.len());
            }
            Command::DrawImage { image, .. } => {
                log::debug!(
                    "{}x{} image is not converted",
                    image.width,
                    image.height
                );
            }
        }
    }

    fn top(&mut self) -> &mut DrawingGroup {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn close_group(&mut self) {
        match self.open.pop() {
            Some(group) => self.top().children.push(Drawing::Group(group)),
            None => log::debug!("no open group to close"),
        }
    }

    fn background(&mut self, cull_rect: Rect) {
        self.root.children.push(Drawing::Geometry(GeometryDrawing {
            geometry: PathDesc::from_rect(cull_rect),
            brush: Some(Brush::Solid(Color::from_rgba8(0, 0, 0, 0))),
            pen: None,
        }));
    }

    fn clip(&mut self, clip: ClipEntry) {
        if self.cx.options.ignore_clip_path {
            log::trace!("ignoring clip");
            return;
        }
        if clip.combine == ClipCombine::Difference {
            log::debug!("difference clip is written as an intersecting clip");
        }
        if !clip.antialias {
            log::trace!("aliased clip edges are not reproduced");
        }
        self.open.push(DrawingGroup {
            clip_geometry: Some(clip.path.clone()),
            ..DrawingGroup::default()
        });
        self.state.push_clip(clip);
    }

    fn set_matrix(&mut self, matrix: Affine) {
        if is_identity(matrix) {
            return;
        }
        let relative = self.state.relative_transform(matrix);
        if is_identity(relative) {
            return;
        }
        self.open.push(DrawingGroup {
            transform: Some(relative),
            ..DrawingGroup::default()
        });
        self.state.push_transform(relative);
    }

    fn save_layer(&mut self, paint: Option<&PaintDesc>) {
        let kind = LayerKind::classify(paint);
        log::trace!("layer classified as {}", kind.name());
        self.open.push(DrawingGroup::default());
        self.state.save_layer(LayerFrame {
            kind,
            paint: paint.cloned(),
        });
    }

    fn restore(&mut self) {
        match self.state.restore() {
            Some(frame) => self.close_frame(frame),
            None => log::debug!("ignoring restore without a matching save"),
        }
    }

    fn close_frame(&mut self, frame: RestoredFrame) {
        for _ in 0..frame.opened_groups() {
            self.close_group();
        }
        if let Some(layer) = frame.layer {
            log::trace!(
                "restoring {} layer with paint {:?}",
                layer.kind.name(),
                layer.paint
            );
            let content = self.open.pop().unwrap_or_default();
            let options = self.cx.options;
            layer::composite(layer.kind, content, self.top(), options);
        }
    }

    fn draw(&mut self, path: &PathDesc, paint: &PaintDesc) {
        if path.is_empty() {
            log::trace!("skipping empty path");
            return;
        }
        log::trace!(
            "drawing under {:?} with {} clips",
            self.state.cumulative_transform(),
            self.state.active_clips().count()
        );
        let drawing = geometry_drawing(path, paint, self.cx);
        self.top().children.push(Drawing::Geometry(drawing));
    }

    fn finish(mut self) -> DrawingGroup {
        while let Some(frame) = self.state.restore() {
            log::debug!("closing a frame left open at the end of the picture");
            self.close_frame(frame);
        }
        let root = self.state.take_root();
        for _ in 0..root.opened_groups() {
            self.close_group();
        }
        debug_assert!(self.open.is_empty(), "every opened group is closed");
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use kurbo::BezPath;
    use peniko::Extend;
    use xamlize_picture::{NoGlyphOutlines, PaintStyle, ShaderDesc, record_picture};

    fn run(picture: &Picture, options: &ConvertOptions) -> DrawingGroup {
        convert(picture, Context::root(options, &NoGlyphOutlines))
    }

    fn unit_square() -> PathDesc {
        PathDesc::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0))
    }

    fn red() -> PaintDesc {
        PaintDesc::fill(Color::from_rgba8(255, 0, 0, 255))
    }

    #[test]
    fn scaled_square_nests_in_transform_group() {
        let picture = record_picture(Rect::new(0.0, 0.0, 2.0, 2.0), |rec| {
            rec.with_save(|rec| {
                rec.set_matrix(Affine::new([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]));
                rec.draw_path(unit_square(), red());
            });
        });
        let root = run(&picture, &ConvertOptions::default());
        assert_eq!(root.children.len(), 1);
        let Drawing::Group(group) = &root.children[0] else {
            panic!("expected a transform group");
        };
        assert_eq!(group.transform, Some(Affine::scale(2.0)));
        assert_eq!(group.children.len(), 1);
        assert!(matches!(group.children[0], Drawing::Geometry(_)));
    }

    #[test]
    fn identity_matrix_opens_nothing() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.set_matrix(Affine::IDENTITY);
            rec.draw_path(unit_square(), red());
        });
        let root = run(&picture, &ConvertOptions::default());
        assert_eq!(root.nested_group_count(), 0);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn repeated_matrix_opens_one_group() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.set_matrix(Affine::scale(3.0));
            rec.with_save(|rec| {
                rec.set_matrix(Affine::scale(3.0));
                rec.draw_path(unit_square(), red());
            });
        });
        let root = run(&picture, &ConvertOptions::default());
        assert_eq!(root.nested_group_count(), 1);
    }

    #[test]
    fn nested_matrix_is_relative_to_parent() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.set_matrix(Affine::scale(2.0));
            rec.with_save(|rec| {
                rec.set_matrix(Affine::scale(2.0) * Affine::translate((4.0, 0.0)));
                rec.draw_path(unit_square(), red());
            });
        });
        let root = run(&picture, &ConvertOptions::default());
        let Drawing::Group(outer) = &root.children[0] else {
            panic!("expected the outer transform group");
        };
        let Drawing::Group(inner) = &outer.children[0] else {
            panic!("expected the inner transform group");
        };
        let relative = inner.transform.expect("inner group has a transform");
        assert!(
            is_identity(relative * Affine::translate((-4.0, 0.0))),
            "expected a pure translation, got {relative:?}"
        );
    }

    #[test]
    fn clips_close_at_restore() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.with_save(|rec| {
                rec.clip_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
                rec.draw_path(unit_square(), red());
            });
            rec.draw_path(unit_square(), red());
        });
        let root = run(&picture, &ConvertOptions::default());
        assert_eq!(root.children.len(), 2);
        let Drawing::Group(clip) = &root.children[0] else {
            panic!("expected a clip group");
        };
        assert!(clip.clip_geometry.is_some(), "clip group carries geometry");
        assert!(matches!(root.children[1], Drawing::Geometry(_)));
    }

    #[test]
    fn ignored_clips_open_nothing() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.with_save(|rec| {
                rec.clip_rect(Rect::new(0.0, 0.0, 5.0, 5.0));
                rec.draw_path(unit_square(), red());
            });
        });
        let options = ConvertOptions::default().with_ignore_clip_path(true);
        let root = run(&picture, &options);
        assert_eq!(root.nested_group_count(), 0);
        assert_eq!(root.geometries().len(), 1);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.restore();
            rec.restore();
            rec.draw_path(unit_square(), red());
        });
        let root = run(&picture, &ConvertOptions::default());
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn unrestored_frames_are_closed() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.save();
            rec.set_matrix(Affine::translate((1.0, 1.0)));
            rec.save_layer(Some(PaintDesc::layer(Color::from_rgba8(0, 0, 0, 51))));
            rec.clip_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
            rec.draw_path(unit_square(), red());
        });
        let root = run(&picture, &ConvertOptions::default());
        // transform > opacity > clip
        assert_eq!(root.nested_group_count(), 3);
        assert_eq!(root.geometries().len(), 1);
    }

    #[test]
    fn empty_paths_are_skipped() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.draw_path(PathDesc::from(BezPath::new()), red());
        });
        let root = run(&picture, &ConvertOptions::default());
        assert!(root.is_empty(), "nothing drawn");
    }

    #[test]
    fn unsupported_draws_are_no_ops() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.draw_text("hello", 0.0, 10.0, red());
            rec.push(Command::DrawTextOnPath {
                text: "along".into(),
                path: unit_square(),
                h_offset: 0.0,
                v_offset: 0.0,
                paint: red(),
            });
        });
        let root = run(&picture, &ConvertOptions::default());
        assert!(root.is_empty(), "text without outlines draws nothing");
    }

    #[test]
    fn text_uses_outlines_when_available() {
        struct Boxes;
        impl GlyphOutlines for Boxes {
            fn text_path(&self, text: &str, origin: Point, _: &PaintDesc) -> Option<BezPath> {
                let width = 10.0 * text.len() as f64;
                let rect = Rect::new(origin.x, origin.y - 10.0, origin.x + width, origin.y);
                Some(PathDesc::from_rect(rect).geometry)
            }
        }
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.draw_text("ab", 5.0, 20.0, red());
        });
        let options = ConvertOptions::default();
        let root = convert(&picture, Context::root(&options, &Boxes));
        let geometries = root.geometries();
        assert_eq!(geometries.len(), 1);
        assert_eq!(
            geometries[0].geometry.bounds(),
            Rect::new(5.0, 10.0, 25.0, 20.0)
        );
    }

    #[test]
    fn stroke_only_paint_has_pen_and_no_brush() {
        let picture = record_picture(Rect::ZERO, |rec| {
            rec.draw_path(unit_square(), PaintDesc::stroke(Color::BLACK, 2.0));
        });
        let root = run(&picture, &ConvertOptions::default());
        let geometry = root.geometries()[0];
        assert!(geometry.brush.is_none(), "stroke does not fill");
        assert!(geometry.pen.is_some(), "stroke has a pen");
    }

    #[test]
    fn fill_and_stroke_has_both() {
        let paint = PaintDesc::shaded(PaintStyle::FillAndStroke, ShaderDesc::Color(Color::WHITE));
        let picture = record_picture(Rect::ZERO, |rec| rec.draw_path(unit_square(), paint));
        let root = run(&picture, &ConvertOptions::default());
        let geometry = root.geometries()[0];
        assert!(geometry.brush.is_some(), "filled");
        assert!(geometry.pen.is_some(), "stroked");
    }

    #[test]
    fn transparent_background_comes_first() {
        let picture = record_picture(Rect::new(0.0, 0.0, 24.0, 24.0), |rec| {
            rec.draw_path(unit_square(), red());
        });
        let options = ConvertOptions::default().with_transparent_background(true);
        let root = run(&picture, &options);
        assert_eq!(root.children.len(), 2);
        let Drawing::Geometry(background) = &root.children[0] else {
            panic!("expected the background rectangle");
        };
        assert_eq!(background.geometry.bounds(), Rect::new(0.0, 0.0, 24.0, 24.0));
    }

    #[test]
    fn self_nesting_stops_at_depth_limit() {
        // Build a chain deeper than the limit; conversion must terminate.
        let mut picture = Arc::new(record_picture(Rect::new(0.0, 0.0, 1.0, 1.0), |rec| {
            rec.draw_path(unit_square(), red());
        }));
        for _ in 0..(MAX_PICTURE_DEPTH + 4) {
            let shader = ShaderDesc::picture(
                picture.clone(),
                Rect::new(0.0, 0.0, 1.0, 1.0),
                Extend::Repeat,
            );
            picture = Arc::new(record_picture(Rect::new(0.0, 0.0, 1.0, 1.0), |rec| {
                rec.draw_path(unit_square(), PaintDesc::shaded(PaintStyle::Fill, shader));
            }));
        }
        let root = run(&picture, &ConvertOptions::default());
        let mut depth = 0;
        let mut group = &root;
        while let Some(Brush::Visual(vb)) = group
            .geometries()
            .into_iter()
            .next()
            .and_then(|g| g.brush.as_ref())
        {
            depth += 1;
            group = &vb.visual;
        }
        assert_eq!(depth, MAX_PICTURE_DEPTH);
    }
}
