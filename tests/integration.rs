use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_el2md")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_markdown() {
    let input = std::fs::read_to_string(fixture_path("widget.el")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("widget.expected.md")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn stdin_mode_minimal_file() {
    let input = "\
;;; widget.el --- does widgets
;;; Commentary:
;; Widgets are great.
;;; Code:
(defun widget-make () \"Makes a widget.\")
";
    let expected = "\
## widget.el

*does widgets*

---

Widgets are great.

### Function and Macro Documentation

#### `(widget-make)`

Makes a widget.

---

Converted from `widget.el` by [el2md](https://github.com/arg-sh/el2md).
";

    let assert = cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("no known license found"));
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn stdin_malformed_form_leaves_diagnostic() {
    let input = "\
;;; gadget.el --- gadgets
;;; Code:
(defun gadget-bad 42 \"Doc.\")
(defun gadget-good () \"Good.\")
";

    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("<!-- el2md: defun gadget-bad: unreadable parameter list -->"));
    assert!(output.contains("#### `(gadget-good)`"));
}

#[test]
fn stdin_private_and_undocumented_excluded() {
    let input = "\
;;; gadget.el --- gadgets
;;; Code:
(defun gadget--secret (x) \"Hidden.\")
(defun gadget-undocumented (x))
(defun gadget-shown (x) \"Shown.\")
";

    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!output.contains("gadget--secret"));
    assert!(!output.contains("gadget-undocumented"));
    assert!(output.contains("#### `(gadget-shown x)`"));
}

#[test]
fn stdin_missing_code_marker() {
    let input = "\
;;; gadget.el --- gadgets
;;; Commentary:
;; Text only.
(defun gadget-f () \"F.\")
";

    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("Text only."));
    assert!(!output.contains("Function and Macro Documentation"));
}

#[test]
fn stdin_ambiguous_license_warns() {
    let input = "\
;;; gadget.el --- gadgets
;; Permission is hereby granted, free of charge, to any person obtaining
;; a copy of this software and associated documentation files (the
;; \"Software\"), to deal in the Software without restriction.
;; Licensed under the Apache License, Version 2.0 (the \"License\");
;;; Code:
";

    let assert = cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("multiple licenses matched"));
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!output.contains("img.shields.io"));
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("widget.el"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("widget.md")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("widget.expected.md")).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn file_mode_multiple_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("widget.el"))
        .arg(fixture_path("button.el"))
        .assert()
        .success();

    assert!(dir.path().join("widget.md").exists());
    assert!(dir.path().join("button.md").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("widget.el"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn file_mode_skips_empty_documents() {
    let dir = TempDir::new().unwrap();
    let mut input = NamedTempFile::with_suffix(".el").unwrap();
    input.write_all(b"(setq unrelated t)\n").unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(input.path().to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to document"));

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert!(entries.is_empty(), "no output expected: {entries:?}");
}

#[test]
fn file_mode_warns_on_unmatched_pattern() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("no-such-dir/*.el")
        .assert()
        .success()
        .stderr(predicate::str::contains("no files matched"));
}
