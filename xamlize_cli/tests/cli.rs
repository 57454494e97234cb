// Copyright 2025 the Xamlize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives the `xamlize` binary on the JSON fixtures.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn xamlize() -> Command {
    Command::cargo_bin("xamlize").expect("xamlize binary")
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("utf-8 markup")
}

#[test]
fn single_input_goes_to_stdout() {
    let out = stdout_of(xamlize().arg(fixture("scaled_square.json")));
    assert!(out.starts_with("<Image>\n  <DrawingImage>"), "{out}");
    assert!(out.contains("<MatrixTransform Matrix=\"2,0,0,2,0,0\"/>"), "{out}");
    assert!(
        out.contains("<GeometryDrawing Brush=\"#FFFF0000\" Geometry=\"F1 M0 0L1 0L1 1L0 1Z\"/>"),
        "{out}"
    );
}

#[test]
fn flags_reach_the_converter() {
    let out = stdout_of(xamlize().args([
        "--drawing-group",
        "--key",
        "_square",
        "--indent",
        "0",
        "--crlf",
    ]).arg(fixture("scaled_square.json")));
    assert!(out.starts_with("<DrawingGroup x:Key=\"_square\">\r\n<DrawingGroup>"), "{out}");
}

#[test]
fn layers_masks_and_dashes() {
    let out = stdout_of(xamlize().arg(fixture("masked-badge.json")));
    assert!(out.contains("<DrawingGroup.OpacityMask>"), "{out}");
    assert!(out.contains("Geometry=\"F0 M0 0L16 0L16 16L0 16Z\""), "{out}");
    assert!(
        out.contains("<LinearGradientBrush StartPoint=\"0,0\" EndPoint=\"16,0\">"),
        "{out}"
    );
    assert!(out.contains("<DrawingGroup Opacity=\"0.5019607843137255\">"), "{out}");
    assert!(out.contains("<DashStyle Dashes=\"2,1\" Offset=\"0\"/>"), "{out}");
    assert!(!out.contains("ImageDrawing"), "images are skipped: {out}");

    let ignored = stdout_of(
        xamlize()
            .args(["--ignore-mask", "--ignore-opacity"])
            .arg(fixture("masked-badge.json")),
    );
    assert!(!ignored.contains("OpacityMask"), "{ignored}");
    assert!(!ignored.contains("Opacity="), "{ignored}");
}

#[test]
fn output_file_is_written() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("square.axaml");
    xamlize()
        .arg("--output")
        .arg(&out)
        .arg(fixture("scaled_square.json"))
        .assert()
        .success();
    let markup = fs::read_to_string(&out).expect("read output");
    assert!(markup.ends_with("</Image>"), "{markup}");
}

#[test]
fn several_inputs_go_to_a_directory() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path().join("out");
    xamlize()
        .arg("--output")
        .arg(&dir)
        .arg(fixture("scaled_square.json"))
        .arg(fixture("masked-badge.json"))
        .arg(fixture("broken.json"))
        .assert()
        .success();
    assert!(dir.join("scaled_square.axaml").exists(), "first input converted");
    assert!(dir.join("masked-badge.axaml").exists(), "second input converted");
    assert!(!dir.join("broken.axaml").exists(), "broken input is skipped");
}

#[test]
fn styles_document_collects_every_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("Icons.axaml");
    xamlize()
        .args(["--styles", "--preview", "--output"])
        .arg(&out)
        .arg(fixture("scaled_square.json"))
        .arg(fixture("broken.json"))
        .arg(fixture("masked-badge.json"))
        .assert()
        .success();
    let markup = fs::read_to_string(&out).expect("read styles");
    assert!(markup.starts_with("<Styles xmlns=\"https://github.com/avaloniaui\""), "{markup}");
    assert!(markup.contains("<!-- scaled_square.json -->"), "{markup}");
    assert!(markup.contains("<Image x:Key=\"_scaled_square\">"), "{markup}");
    assert!(markup.contains("<Image x:Key=\"_masked_badge\">"), "{markup}");
    assert!(
        markup.contains("<ContentControl Content=\"{DynamicResource _masked_badge}\"/>"),
        "{markup}"
    );
    assert!(!markup.contains("broken"), "{markup}");
    let square = markup.find("_scaled_square\">").expect("square entry");
    let badge = markup.find("_masked_badge\">").expect("badge entry");
    assert!(square < badge, "entries keep input order");
}

#[test]
fn failed_inputs_do_not_take_a_key() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let broken = tmp.path().join("a").join("icon.json");
    let good = tmp.path().join("b").join("icon.json");
    for (path, source) in [(&broken, "broken.json"), (&good, "scaled_square.json")] {
        fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
        fs::copy(fixture(source), path).expect("copy fixture");
    }
    let out = stdout_of(xamlize().arg("--styles").arg(&broken).arg(&good));
    assert!(out.contains("<Image x:Key=\"_icon\">"), "{out}");
    assert!(!out.contains("_icon_1"), "{out}");
}

#[test]
fn single_line_output() {
    let out = stdout_of(
        xamlize()
            .arg("--single-line")
            .arg(fixture("scaled_square.json")),
    );
    assert_eq!(out.lines().count(), 1, "{out}");
    assert!(out.starts_with("<Image><DrawingImage><DrawingGroup>"), "{out}");
}

#[test]
fn failing_inputs_alone_fail_the_run() {
    xamlize().arg(fixture("broken.json")).assert().failure();
    xamlize()
        .arg("--styles")
        .arg(fixture("broken.json"))
        .assert()
        .failure();
}

#[test]
fn missing_input_fails() {
    xamlize().arg("does-not-exist.json").assert().failure();
}
