// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource dictionaries of converted pictures.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::emit::MarkupWriter;
use crate::options::{ConvertOptions, DocumentKind};
use crate::tree::DrawingGroup;

/// Resource key for a file: `_` followed by the file stem, with every
/// character that is not ASCII alphanumeric replaced by `_`.
///
/// Both `/` and `\` are treated as directory separators.
pub fn resource_key(path: &str) -> String {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    };
    let mut key = String::with_capacity(stem.len() + 1);
    key.push('_');
    key.extend(
        stem.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }),
    );
    key
}

/// One converted picture in a [`StylesDocument`].
#[derive(Clone, Debug)]
pub struct StyleEntry {
    /// Source file name, written as a comment before the markup and used
    /// for the resource key.
    pub file_name: String,
    /// Whether the resource is an `Image` or a bare `DrawingGroup`.
    pub kind: DocumentKind,
    /// Root of the converted drawing.
    pub root: DrawingGroup,
}

/// Builder for a `Styles` document whose resources are converted pictures.
///
/// Keys are assigned as entries are pushed, so entries can be converted in
/// parallel and only the ones that make it into the document take a key.
#[derive(Clone, Debug, Default)]
pub struct StylesDocument {
    preview: bool,
    keys: HashSet<String>,
    entries: Vec<(String, StyleEntry)>,
}

impl StylesDocument {
    /// Empty document; `preview` adds a `Design.PreviewWith` gallery.
    pub fn new(preview: bool) -> Self {
        Self {
            preview,
            ..Self::default()
        }
    }

    /// Key for `path`, suffixing `_1`, `_2`, ... on collision.
    fn reserve_key(&mut self, path: &str) -> String {
        let base = resource_key(path);
        let mut key = base.clone();
        let mut n = 0_usize;
        while self.keys.contains(&key) {
            n += 1;
            key = alloc::format!("{base}_{n}");
        }
        if n > 0 {
            log::debug!("resource key {base} already taken; using {key}");
        }
        self.keys.insert(key.clone());
        key
    }

    /// Append `entry` and return the key it was given.
    pub fn push(&mut self, entry: StyleEntry) -> String {
        let key = self.reserve_key(&entry.file_name);
        self.entries.push((key.clone(), entry));
        key
    }

    /// Keys and entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &StyleEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Returns `true` if nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The whole document, indented per `options`.
    pub fn to_markup(&self, options: &ConvertOptions) -> String {
        let mut w = MarkupWriter::new(options);
        w.start("Styles");
        w.attr("xmlns", "https://github.com/avaloniaui");
        w.attr("xmlns:x", "http://schemas.microsoft.com/winfx/2006/xaml");
        if self.preview {
            w.start("Design.PreviewWith");
            w.start("ScrollViewer");
            w.attr("HorizontalScrollBarVisibility", "Auto");
            w.attr("VerticalScrollBarVisibility", "Auto");
            w.start("WrapPanel");
            w.attr("ItemWidth", "50");
            w.attr("ItemHeight", "50");
            w.attr("MaxWidth", "400");
            for (key, entry) in self.entries() {
                let resource = alloc::format!("{{DynamicResource {key}}}");
                match entry.kind {
                    DocumentKind::Image => {
                        w.start("ContentControl");
                        w.attr("Content", &resource);
                        w.end();
                    }
                    DocumentKind::DrawingGroup => {
                        w.start("Image");
                        w.start("Image.Source");
                        w.start("DrawingImage");
                        w.attr("Drawing", &resource);
                        w.end();
                        w.end();
                        w.end();
                    }
                }
            }
            w.end();
            w.end();
            w.end();
        }
        w.start("Style");
        w.start("Style.Resources");
        for (key, entry) in self.entries() {
            w.comment(&comment_text(&entry.file_name));
            w.document(&entry.root, entry.kind, Some(key));
        }
        w.end();
        w.end();
        w.end();
        w.finish()
    }
}

/// Comment bodies may not contain `--`.
fn comment_text(text: &str) -> String {
    let mut out = String::from(text);
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}
