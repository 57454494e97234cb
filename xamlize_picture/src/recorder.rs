// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Rect};

use crate::{ClipCombine, Command, PaintDesc, PathDesc, Picture};

/// Canvas-style builder for [`Picture`]s.
///
/// The recorder appends commands verbatim; it does not validate save/restore
/// balance, matching what a real renderer may produce.
#[derive(Debug, Default)]
pub struct PictureRecorder {
    cull_rect: Rect,
    commands: Vec<Command>,
}

impl PictureRecorder {
    /// Start recording into `cull_rect`.
    pub fn new(cull_rect: Rect) -> Self {
        Self {
            cull_rect,
            commands: Vec::new(),
        }
    }

    /// Append an arbitrary command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Record `Save`.
    pub fn save(&mut self) {
        self.push(Command::Save);
    }

    /// Record `Restore`.
    pub fn restore(&mut self) {
        self.push(Command::Restore);
    }

    /// Record `SaveLayer`.
    pub fn save_layer(&mut self, paint: Option<PaintDesc>) {
        self.push(Command::SaveLayer { paint });
    }

    /// Record `SetMatrix`.
    pub fn set_matrix(&mut self, matrix: Affine) {
        self.push(Command::SetMatrix(matrix));
    }

    /// Record an intersecting, anti-aliased path clip.
    pub fn clip_path(&mut self, path: PathDesc) {
        self.push(Command::ClipPath {
            path,
            combine: ClipCombine::Intersect,
            antialias: true,
        });
    }

    /// Record an intersecting, anti-aliased rectangle clip.
    pub fn clip_rect(&mut self, rect: Rect) {
        self.push(Command::ClipRect {
            rect,
            combine: ClipCombine::Intersect,
            antialias: true,
        });
    }

    /// Record `DrawPath`.
    pub fn draw_path(&mut self, path: PathDesc, paint: PaintDesc) {
        self.push(Command::DrawPath { path, paint });
    }

    /// Record `DrawText`.
    pub fn draw_text(&mut self, text: impl Into<String>, x: f64, y: f64, paint: PaintDesc) {
        self.push(Command::DrawText {
            text: text.into(),
            x,
            y,
            paint,
        });
    }

    /// Run `f` between `Save` and `Restore`.
    ///
    /// Note: if `f` panics, the restore is not recorded.
    pub fn with_save<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let out = f(self);
        self.restore();
        out
    }

    /// Run `f` between `SaveLayer(paint)` and `Restore`.
    ///
    /// Note: if `f` panics, the restore is not recorded.
    pub fn with_layer<R>(&mut self, paint: Option<PaintDesc>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save_layer(paint);
        let out = f(self);
        self.restore();
        out
    }

    /// Number of commands recorded so far.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Finish recording.
    pub fn finish(self) -> Picture {
        Picture::new(self.cull_rect, self.commands)
    }
}

/// Record a picture with a closure.
pub fn record_picture(cull_rect: Rect, f: impl FnOnce(&mut PictureRecorder)) -> Picture {
    let mut recorder = PictureRecorder::new(cull_rect);
    f(&mut recorder);
    recorder.finish()
}
