//! el2md: generate a Markdown README from annotated Emacs Lisp source.
//!
//! Reads the package header comments, the `;;; Commentary:` section, and
//! the docstrings of public `defun`/`defmacro`/`defcustom` forms. Supports
//! two modes:
//!
//! - **stdin mode**: `el2md < widget.el > README.md`
//! - **file mode**: `el2md -o docs lisp/*.el`

mod badges;
mod classify;
mod license;
mod model;
mod parse;
mod render;
mod scan;
mod sexp;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "el2md",
    about = "Generate Markdown documentation from Emacs Lisp package headers and docstrings"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Query the package index and CI status for extra badges
    #[arg(long)]
    badges: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: read one file from stdin, write Markdown to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let doc = parse::parse(&input);
    let badges = collect_badges(&doc, cli.badges);
    print!("{}", render::render(&doc, &badges));
    Ok(())
}

/// file mode: process multiple files, write one `.md` per input into the
/// output directory.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;

    for path in &input_files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("warning: skipping {}: {}", path.display(), err);
                continue;
            }
        };
        let doc = parse::parse(&content);
        if doc.is_empty() {
            eprintln!("warning: skipping {}: nothing to document", path.display());
            continue;
        }
        let badges = collect_badges(&doc, cli.badges);

        let name = derive_output_name(&path.to_string_lossy());
        let out_path = output_dir.join(format!("{name}.md"));
        fs::write(&out_path, render::render(&doc, &badges))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// License badge from the catalog, then any network badges when enabled.
/// Zero or ambiguous license matches leave a warning instead of a badge.
fn collect_badges(doc: &model::Document, network: bool) -> Vec<String> {
    let mut out = Vec::new();
    match license::detect(&doc.license_block).as_slice() {
        [] => eprintln!("warning: no known license found"),
        [lic] => out.push(lic.badge.to_string()),
        many => {
            let names: Vec<&str> = many.iter().map(|l| l.name).collect();
            eprintln!("warning: multiple licenses matched: {}", names.join(", "));
        }
    }
    if network {
        out.extend(badges::BadgeProbe::new().collect(&doc.headers));
    }
    out
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["el"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a source path.
/// "lisp/widget.el" → "widget"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit('/').next().unwrap_or(source);
    filename.strip_suffix(".el").unwrap_or(filename).to_string()
}
