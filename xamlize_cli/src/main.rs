// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `xamlize`: convert recorded picture JSON into XAML drawing markup.
//!
//! One input converts to one document. Several inputs convert in parallel,
//! either next to their inputs (or into `--output` as a directory), or into a
//! single `Styles` resource document with `--styles`.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see skipped
//! commands.

mod picture_json;

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::Parser;
use rayon::prelude::*;
use xamlize::{ConvertOptions, Converter, LineEnding, StyleEntry, StylesDocument};
use xamlize_picture::Picture;

/// Extension of written markup files.
const OUTPUT_EXTENSION: &str = "axaml";

#[derive(Debug, Parser)]
#[command(name = "xamlize", version, about)]
struct Args {
    /// Picture JSON files to convert.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file, or output directory when converting several inputs
    /// without `--styles`. Defaults to stdout for a single input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Package every input into one `Styles` resource document.
    #[arg(long)]
    styles: bool,

    /// Add a `Design.PreviewWith` gallery to the styles document.
    #[arg(long, requires = "styles")]
    preview: bool,

    /// `x:Key` of the root element (single input only).
    #[arg(long, conflicts_with = "styles")]
    key: Option<String>,

    /// Emit a bare `DrawingGroup` instead of an `Image`.
    #[arg(long)]
    drawing_group: bool,

    /// Write shader local matrices as brush transforms.
    #[arg(long)]
    brush_transform: bool,

    /// Pass opacity layers through.
    #[arg(long)]
    ignore_opacity: bool,

    /// Ignore clips.
    #[arg(long)]
    ignore_clip_path: bool,

    /// Pass mask layers through and drop opacity masks.
    #[arg(long)]
    ignore_mask: bool,

    /// Start with a transparent rectangle covering the picture bounds.
    #[arg(long)]
    transparent_background: bool,

    /// Use CRLF line endings.
    #[arg(long)]
    crlf: bool,

    /// Spaces per indentation level.
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Write the whole document on a single line.
    #[arg(long, conflicts_with = "indent")]
    single_line: bool,
}

impl Args {
    fn options(&self) -> ConvertOptions {
        ConvertOptions::default()
            .with_generate_image(!self.drawing_group)
            .with_brush_transform(self.brush_transform)
            .with_ignore_opacity(self.ignore_opacity)
            .with_ignore_clip_path(self.ignore_clip_path)
            .with_ignore_mask(self.ignore_mask)
            .with_transparent_background(self.transparent_background)
            .with_line_ending(if self.crlf {
                LineEnding::CrLf
            } else {
                LineEnding::Lf
            })
            .with_indent((!self.single_line).then_some(self.indent))
    }
}

fn load_picture(path: &Path) -> anyhow::Result<Picture> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    picture_json::parse_picture(&text).with_context(|| format!("decoding {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_output(output: Option<&Path>, markup: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, markup).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(markup.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn convert_single(args: &Args, options: &ConvertOptions) -> anyhow::Result<()> {
    let [input] = args.inputs.as_slice() else {
        bail!("expected exactly one input");
    };
    let picture = load_picture(input)?;
    let markup = Converter::new(options).to_xaml(&picture, args.key.as_deref());
    write_output(args.output.as_deref(), &markup)
}

fn convert_each(args: &Args, options: &ConvertOptions) -> anyhow::Result<()> {
    if args.key.is_some() {
        bail!("--key applies to a single input only");
    }
    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let converted = args
        .inputs
        .par_iter()
        .map(|input| -> anyhow::Result<()> {
            let picture = load_picture(input)?;
            let markup = Converter::new(options).to_xaml(&picture, None);
            let target = match &args.output {
                Some(dir) => dir.join(file_name(input)).with_extension(OUTPUT_EXTENSION),
                None => input.with_extension(OUTPUT_EXTENSION),
            };
            write_output(Some(&target), &markup)
        })
        .filter(|result| match result {
            Ok(()) => true,
            Err(err) => {
                log::warn!("skipping input: {err:#}");
                false
            }
        })
        .count();
    if converted == 0 {
        bail!("none of the {} inputs converted", args.inputs.len());
    }
    log::info!("converted {converted} of {} inputs", args.inputs.len());
    Ok(())
}

fn convert_styles(args: &Args, options: &ConvertOptions) -> anyhow::Result<()> {
    // Converters hold a non-`Sync` glyph source, so each task builds its own.
    let entries: Vec<Option<StyleEntry>> = args
        .inputs
        .par_iter()
        .map(|input| match load_picture(input) {
            Ok(picture) => {
                let converter = Converter::new(options);
                Some(converter.style_entry(&picture, &file_name(input)))
            }
            Err(err) => {
                log::warn!("skipping input: {err:#}");
                None
            }
        })
        .collect();

    // Keys are assigned in input order, and only to inputs that converted.
    let mut document = StylesDocument::new(args.preview);
    for entry in entries.into_iter().flatten() {
        let key = document.push(entry);
        log::debug!("added resource {key}");
    }
    if document.is_empty() {
        bail!("none of the {} inputs converted", args.inputs.len());
    }
    write_output(args.output.as_deref(), &document.to_markup(options))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = args.options();
    log::debug!("converting with {options:?}");

    if args.styles {
        convert_styles(&args, &options)
    } else if args.inputs.len() == 1 {
        convert_single(&args, &options)
    } else {
        convert_each(&args, &options)
    }
}
