// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural properties over generated command sequences.

use xamlize::tree::{Drawing, DrawingGroup};
use xamlize::{ConvertOptions, Converter, MASK_SENTINEL_COLOR};
use xamlize_picture::{
    Affine, BezPath, ColorFilterDesc, Color, Command, FillRule, FilterDesc, PaintDesc, PathDesc,
    Picture, PictureRecorder, Rect,
};

/// Small xorshift generator so runs are reproducible.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    fn coord(&mut self) -> f64 {
        (self.below(200) as f64) / 4.0 - 10.0
    }

    fn rect(&mut self) -> Rect {
        let (x, y) = (self.coord(), self.coord());
        Rect::new(x, y, x + 1.0 + self.below(20) as f64, y + 1.0 + self.below(20) as f64)
    }

    fn matrix(&mut self) -> Affine {
        match self.below(4) {
            0 => Affine::IDENTITY,
            1 => Affine::scale(1.0 + self.below(4) as f64),
            2 => Affine::translate((self.coord(), self.coord())),
            _ => Affine::rotate(self.coord() / 10.0),
        }
    }

    fn path(&mut self) -> PathDesc {
        let mut path = PathDesc::from_rect(self.rect());
        if self.below(2) == 0 {
            path.fill_rule = FillRule::EvenOdd;
        }
        path
    }

    fn layer_paint(&mut self) -> Option<PaintDesc> {
        match self.below(5) {
            0 => Some(PaintDesc::layer(MASK_SENTINEL_COLOR)),
            1 => Some(
                PaintDesc::layer(MASK_SENTINEL_COLOR)
                    .with_color_filter(ColorFilterDesc::LuminanceToAlpha),
            ),
            2 => Some(PaintDesc::layer(Color::from_rgba8(
                0,
                0,
                0,
                self.below(255) as u8,
            ))),
            3 => Some(PaintDesc::layer(MASK_SENTINEL_COLOR).with_image_filter(FilterDesc::blur(1.0))),
            _ => None,
        }
    }
}

/// A random command stream; `balanced` closes every save it opens.
fn generate(seed: u64, balanced: bool) -> Picture {
    let mut rng = Rng(seed | 1);
    let mut rec = PictureRecorder::new(Rect::new(0.0, 0.0, 32.0, 32.0));
    let mut depth = 0_usize;
    for _ in 0..(20 + rng.below(60)) {
        match rng.below(8) {
            0 => {
                rec.save();
                depth += 1;
            }
            1 => {
                rec.save_layer(rng.layer_paint());
                depth += 1;
            }
            2 if depth > 0 || !balanced => {
                rec.restore();
                depth = depth.saturating_sub(1);
            }
            3 => rec.set_matrix(rng.matrix()),
            4 => rec.clip_rect(rng.rect()),
            5 => rec.clip_path(rng.path()),
            _ => {
                let paint = PaintDesc::fill(Color::from_rgba8(
                    rng.below(256) as u8,
                    rng.below(256) as u8,
                    rng.below(256) as u8,
                    255,
                ));
                rec.draw_path(rng.path(), paint);
            }
        }
    }
    if balanced {
        for _ in 0..depth {
            rec.restore();
        }
    }
    rec.finish()
}

fn count_groups(group: &DrawingGroup) -> usize {
    group
        .children
        .iter()
        .map(|child| match child {
            Drawing::Group(g) => 1 + count_groups(g),
            Drawing::Geometry(_) => 0,
        })
        .sum()
}

/// `DrawingGroup` elements in `xaml`, which must be well formed.
fn parsed_groups(xaml: &str, seed: u64) -> usize {
    let doc = roxmltree::Document::parse(xaml)
        .unwrap_or_else(|err| panic!("seed {seed} is not well formed: {err}"));
    doc.descendants()
        .filter(|node| node.tag_name().name() == "DrawingGroup")
        .count()
}

#[test]
fn balanced_sequences_are_well_formed() {
    let options = ConvertOptions::default();
    let converter = Converter::new(&options);
    for seed in 1..200 {
        let xaml = converter.to_xaml(&generate(seed, true), None);
        assert!(parsed_groups(&xaml, seed) >= 1, "seed {seed} has a root group");
    }
}

#[test]
fn unbalanced_sequences_are_still_well_formed() {
    let options = ConvertOptions::default().with_indent(None);
    let converter = Converter::new(&options);
    for seed in 1..200 {
        let xaml = converter.to_xaml(&generate(seed, false), None);
        assert!(parsed_groups(&xaml, seed) >= 1, "seed {seed} has a root group");
    }
}

#[test]
fn tree_and_markup_agree_on_group_count() {
    let options = ConvertOptions::default().with_generate_image(false);
    let converter = Converter::new(&options);
    for seed in 1..100 {
        let picture = generate(seed, true);
        let root = converter.drawing_group(&picture);
        let xaml = converter.to_xaml(&picture, None);
        // Each opacity mask visual adds its own root group.
        let masks = xaml.matches("<DrawingGroup.OpacityMask>").count();
        assert_eq!(
            parsed_groups(&xaml, seed),
            1 + count_groups(&root) + masks + nested_mask_groups(&root),
            "seed {seed}"
        );
    }
}

/// Groups inside opacity mask visuals, which the child walk does not visit.
fn nested_mask_groups(group: &DrawingGroup) -> usize {
    let own = group.opacity_mask.as_deref().map_or(0, |brush| match brush {
        xamlize::tree::Brush::Visual(vb) => {
            count_groups(&vb.visual) + nested_mask_groups(&vb.visual)
        }
        _ => 0,
    });
    own + group
        .children
        .iter()
        .map(|child| match child {
            Drawing::Group(g) => nested_mask_groups(g),
            Drawing::Geometry(_) => 0,
        })
        .sum::<usize>()
}

#[test]
fn identity_matrices_never_open_groups() {
    let options = ConvertOptions::default();
    let converter = Converter::new(&options);
    let mut rng = Rng(0x5eed);
    let mut rec = PictureRecorder::new(Rect::new(0.0, 0.0, 8.0, 8.0));
    for _ in 0..50 {
        match rng.below(3) {
            0 => rec.save(),
            1 => rec.set_matrix(Affine::new([1.0, 0.0, 0.0, 1.0, 1e-9, -1e-9])),
            _ => rec.draw_path(rng.path(), PaintDesc::fill(Color::BLACK)),
        }
    }
    let picture = rec.finish();
    let root = converter.drawing_group(&picture);
    assert_eq!(count_groups(&root), 0);
    assert!(!converter.to_xaml(&picture, None).contains("MatrixTransform"));
}

#[test]
fn every_geometry_has_a_fill_rule_token() {
    let options = ConvertOptions::default();
    let converter = Converter::new(&options);
    for seed in 1..100 {
        let xaml = converter.to_xaml(&generate(seed, true), None);
        for (i, _) in xaml.match_indices("Geometry=\"") {
            let value = &xaml[i + "Geometry=\"".len()..];
            assert!(
                value.starts_with("F0 M") || value.starts_with("F1 M"),
                "seed {seed}: {}",
                &value[..value.len().min(24)]
            );
        }
        for (i, _) in xaml.match_indices("<StreamGeometry>") {
            let value = &xaml[i + "<StreamGeometry>".len()..];
            assert!(
                value.starts_with("F0 M") || value.starts_with("F1 M"),
                "seed {seed}"
            );
        }
    }
}

#[test]
fn empty_paths_produce_nothing() {
    let mut moves = BezPath::new();
    moves.move_to((1.0, 1.0));
    moves.move_to((2.0, 2.0));
    let picture = Picture::new(
        Rect::new(0.0, 0.0, 4.0, 4.0),
        vec![Command::DrawPath {
            path: PathDesc::from(moves),
            paint: PaintDesc::fill(Color::BLACK),
        }],
    );
    let options = ConvertOptions::default();
    let root = Converter::new(&options).drawing_group(&picture);
    assert!(root.is_empty());
}
