// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Save/restore state.
//!
//! Transforms, clips, and layers live on three separate stacks that are
//! pushed and popped together, one frame per `Save` or `SaveLayer`. Every
//! transform or clip entry corresponds to exactly one open output group, so
//! a restored frame tells the interpreter how many groups to close.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Affine;
use smallvec::SmallVec;
use xamlize_picture::{ClipCombine, PaintDesc, PathDesc};

use crate::layer::LayerKind;

/// Matrices with a smaller absolute determinant are treated as singular.
const SINGULAR_DETERMINANT: f64 = 1e-12;

/// Coefficient tolerance for identity checks.
const IDENTITY_TOLERANCE: f64 = 1e-6;

type Frame<T> = SmallVec<[T; 2]>;

/// A stack of frames, each holding the entries pushed since it was opened.
///
/// The root frame always exists and is never popped.
#[derive(Clone, Debug)]
pub(crate) struct FrameStack<T> {
    frames: Vec<Frame<T>>,
}

impl<T> FrameStack<T> {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    pub(crate) fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Pop the innermost frame, or `None` if only the root remains.
    pub(crate) fn pop_frame(&mut self) -> Option<Frame<T>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Empty the root frame and return its entries.
    pub(crate) fn take_root(&mut self) -> Frame<T> {
        self.frames
            .first_mut()
            .map(core::mem::take)
            .unwrap_or_default()
    }

    pub(crate) fn push(&mut self, value: T) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(value);
        }
    }

    /// All entries, outermost first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.frames.iter().flatten()
    }

    /// Number of frames above the root.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

/// A clip pushed in some frame.
#[derive(Clone, Debug)]
pub(crate) struct ClipEntry {
    pub(crate) path: PathDesc,
    pub(crate) combine: ClipCombine,
    pub(crate) antialias: bool,
}

/// The layer opened by a `SaveLayer`. Its content buffer is the matching
/// entry on the interpreter's builder stack.
#[derive(Clone, Debug)]
pub(crate) struct LayerFrame {
    pub(crate) kind: LayerKind,
    pub(crate) paint: Option<PaintDesc>,
}

/// Everything a frame pushed, handed back on restore.
#[derive(Debug, Default)]
pub(crate) struct RestoredFrame {
    pub(crate) transforms: Frame<Affine>,
    pub(crate) clips: Frame<ClipEntry>,
    pub(crate) layer: Option<LayerFrame>,
}

impl RestoredFrame {
    /// Output groups opened while the frame was current.
    pub(crate) fn opened_groups(&self) -> usize {
        self.transforms.len() + self.clips.len()
    }
}

/// The three lockstep stacks.
#[derive(Debug)]
pub(crate) struct StateStack {
    transforms: FrameStack<Affine>,
    clips: FrameStack<ClipEntry>,
    layers: Vec<Option<LayerFrame>>,
}

impl StateStack {
    pub(crate) fn new() -> Self {
        Self {
            transforms: FrameStack::new(),
            clips: FrameStack::new(),
            layers: Vec::new(),
        }
    }

    pub(crate) fn save(&mut self) {
        self.push_frame(None);
    }

    pub(crate) fn save_layer(&mut self, layer: LayerFrame) {
        self.push_frame(Some(layer));
    }

    fn push_frame(&mut self, layer: Option<LayerFrame>) {
        self.transforms.push_frame();
        self.clips.push_frame();
        self.layers.push(layer);
    }

    /// Pop the innermost frame; `None` when there is nothing to restore.
    pub(crate) fn restore(&mut self) -> Option<RestoredFrame> {
        let layer = self.layers.pop()?;
        Some(RestoredFrame {
            transforms: self.transforms.pop_frame().unwrap_or_default(),
            clips: self.clips.pop_frame().unwrap_or_default(),
            layer,
        })
    }

    /// Empty the root frame, once every other frame is restored.
    pub(crate) fn take_root(&mut self) -> RestoredFrame {
        RestoredFrame {
            transforms: self.transforms.take_root(),
            clips: self.clips.take_root(),
            layer: None,
        }
    }

    pub(crate) fn push_transform(&mut self, relative: Affine) {
        self.transforms.push(relative);
    }

    pub(crate) fn push_clip(&mut self, clip: ClipEntry) {
        self.clips.push(clip);
    }

    /// Number of open frames above the root.
    pub(crate) fn depth(&self) -> usize {
        debug_assert_eq!(
            self.transforms.depth(),
            self.layers.len(),
            "transform frames out of step"
        );
        debug_assert_eq!(
            self.clips.depth(),
            self.layers.len(),
            "clip frames out of step"
        );
        self.layers.len()
    }

    /// Product of every open transform group, outermost first.
    pub(crate) fn cumulative_transform(&self) -> Affine {
        self.transforms
            .iter()
            .fold(Affine::IDENTITY, |acc, m| acc * *m)
    }

    /// `absolute` expressed relative to the open transform groups.
    ///
    /// Singular ancestors cannot be undone and are skipped.
    pub(crate) fn relative_transform(&self, absolute: Affine) -> Affine {
        let mut relative = absolute;
        for ancestor in self.transforms.iter() {
            if ancestor.determinant().abs() < SINGULAR_DETERMINANT {
                log::debug!("skipping singular ancestor transform {ancestor:?}");
                continue;
            }
            relative = ancestor.inverse() * relative;
        }
        relative
    }

    /// Clips in effect, outermost first.
    pub(crate) fn active_clips(&self) -> impl Iterator<Item = &ClipEntry> {
        self.clips.iter()
    }
}

/// Returns `true` if every coefficient is within tolerance of the identity.
pub(crate) fn is_identity(m: Affine) -> bool {
    m.as_coeffs()
        .iter()
        .zip(Affine::IDENTITY.as_coeffs())
        .all(|(a, b)| (a - b).abs() < IDENTITY_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};

    fn clip() -> ClipEntry {
        ClipEntry {
            path: PathDesc::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            combine: ClipCombine::Intersect,
            antialias: true,
        }
    }

    #[test]
    fn frames_restore_what_they_pushed() {
        let mut state = StateStack::new();
        state.push_transform(Affine::scale(2.0));
        state.save();
        state.push_transform(Affine::translate((1.0, 0.0)));
        state.push_clip(clip());
        state.save_layer(LayerFrame {
            kind: LayerKind::UnknownPaint,
            paint: None,
        });
        state.push_clip(clip());
        assert_eq!(state.depth(), 2);
        assert_eq!(state.active_clips().count(), 2);

        let inner = state.restore().expect("layer frame");
        assert!(inner.layer.is_some(), "layer comes back with its frame");
        assert_eq!(inner.opened_groups(), 1);

        let outer = state.restore().expect("save frame");
        assert!(outer.layer.is_none(), "plain save has no layer");
        assert_eq!(outer.opened_groups(), 2);

        assert!(state.restore().is_none(), "root is never restored");
        assert_eq!(state.take_root().opened_groups(), 1);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn relative_transform_undoes_open_groups() {
        let mut state = StateStack::new();
        let outer = Affine::scale(2.0);
        state.push_transform(outer);
        state.save();
        let absolute = Affine::scale(2.0) * Affine::translate((5.0, 3.0));
        let relative = state.relative_transform(absolute);
        assert!(
            is_identity(relative * Affine::translate((-5.0, -3.0))),
            "relative should be the translation, got {relative:?}"
        );
        state.push_transform(relative);
        let p = Point::new(1.0, 1.0);
        let mapped = state.cumulative_transform() * p;
        let expected = absolute * p;
        assert!((mapped - expected).hypot() < 1e-9, "nested groups reproduce the absolute matrix");
    }

    #[test]
    fn relative_transform_spans_every_open_frame() {
        let mut state = StateStack::new();
        state.push_transform(Affine::translate((10.0, 0.0)));
        state.save();
        state.push_transform(Affine::scale(3.0));
        state.save();
        let absolute = Affine::translate((10.0, 0.0)) * Affine::scale(3.0);
        assert!(
            is_identity(state.relative_transform(absolute)),
            "already represented by the open groups"
        );
    }

    #[test]
    fn singular_ancestors_are_skipped() {
        let mut state = StateStack::new();
        state.push_transform(Affine::scale(0.0));
        let m = Affine::translate((1.0, 2.0));
        assert_eq!(state.relative_transform(m), m);
    }

    #[test]
    fn identity_check_has_tolerance() {
        assert!(is_identity(Affine::IDENTITY), "exact identity");
        assert!(
            is_identity(Affine::new([1.0 + 1e-9, 0.0, -1e-9, 1.0, 1e-8, 0.0])),
            "within tolerance"
        );
        assert!(!is_identity(Affine::scale(1.01)), "visible scale");
        assert!(!is_identity(Affine::translate((0.5, 0.0))), "visible shift");
    }
}
