// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Line separator used in emitted markup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The separator itself.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Outermost element of a converted picture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DocumentKind {
    /// `Image` wrapping a `DrawingImage` wrapping the root `DrawingGroup`.
    #[default]
    Image,
    /// The root `DrawingGroup` on its own.
    DrawingGroup,
}

/// Conversion settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Wrap the root group in `Image`/`DrawingImage`.
    pub generate_image: bool,
    /// Express gradient and picture shader local matrices as brush transforms
    /// instead of mapping the brush geometry through them.
    pub brush_transform: bool,
    /// Pass opacity layers through without an `Opacity` group.
    pub ignore_opacity: bool,
    /// Ignore clip commands.
    pub ignore_clip_path: bool,
    /// Pass mask groups through and drop mask brushes.
    pub ignore_mask: bool,
    /// Start the root group with a transparent rectangle covering the picture bounds.
    pub transparent_background: bool,
    /// Line separator.
    pub line_ending: LineEnding,
    /// Spaces per nesting level, or `None` to write the document on one line.
    pub indent: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            generate_image: true,
            brush_transform: false,
            ignore_opacity: false,
            ignore_clip_path: false,
            ignore_mask: false,
            transparent_background: false,
            line_ending: LineEnding::Lf,
            indent: Some(2),
        }
    }
}

impl ConvertOptions {
    /// Set [`ConvertOptions::generate_image`].
    #[must_use]
    pub fn with_generate_image(mut self, value: bool) -> Self {
        self.generate_image = value;
        self
    }

    /// Set [`ConvertOptions::brush_transform`].
    #[must_use]
    pub fn with_brush_transform(mut self, value: bool) -> Self {
        self.brush_transform = value;
        self
    }

    /// Set [`ConvertOptions::ignore_opacity`].
    #[must_use]
    pub fn with_ignore_opacity(mut self, value: bool) -> Self {
        self.ignore_opacity = value;
        self
    }

    /// Set [`ConvertOptions::ignore_clip_path`].
    #[must_use]
    pub fn with_ignore_clip_path(mut self, value: bool) -> Self {
        self.ignore_clip_path = value;
        self
    }

    /// Set [`ConvertOptions::ignore_mask`].
    #[must_use]
    pub fn with_ignore_mask(mut self, value: bool) -> Self {
        self.ignore_mask = value;
        self
    }

    /// Set [`ConvertOptions::transparent_background`].
    #[must_use]
    pub fn with_transparent_background(mut self, value: bool) -> Self {
        self.transparent_background = value;
        self
    }

    /// Set [`ConvertOptions::line_ending`].
    #[must_use]
    pub fn with_line_ending(mut self, value: LineEnding) -> Self {
        self.line_ending = value;
        self
    }

    /// Set [`ConvertOptions::indent`].
    #[must_use]
    pub fn with_indent(mut self, value: Option<usize>) -> Self {
        self.indent = value;
        self
    }
}
