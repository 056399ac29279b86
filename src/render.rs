//! Markdown assembly.
//!
//! Pure function from a parsed document (plus any badges the driver
//! collected) to the final Markdown text. Blocks are separated by exactly
//! one blank line and the document ends with a single trailing newline.

use crate::classify;
use crate::model::{DocEntry, DocKind, Document};

const PROJECT_URL: &str = "https://github.com/arg-sh/el2md";

pub fn render(doc: &Document, badges: &[String]) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(title) = &doc.title {
        blocks.push(classify::format_heading(2, title));
        if let Some(subtitle) = &doc.subtitle {
            blocks.push(format!("*{subtitle}*"));
        }
    }
    if !badges.is_empty() {
        blocks.push(badges.join(" "));
    }
    if !blocks.is_empty() {
        blocks.push("---".to_string());
    }

    if let Some(commentary) = commentary_block(&doc.commentary) {
        blocks.push(commentary);
    }

    push_section(
        &mut blocks,
        "Customization Documentation",
        &doc.customizations,
    );
    push_section(
        &mut blocks,
        "Function and Macro Documentation",
        &doc.callables,
    );

    blocks.push("---".to_string());
    blocks.push(match &doc.title {
        Some(title) => format!("Converted from `{title}` by [el2md]({PROJECT_URL})."),
        None => format!("Converted by [el2md]({PROJECT_URL})."),
    });

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Commentary lines as one block, leading and trailing blank runs dropped.
fn commentary_block(lines: &[String]) -> Option<String> {
    let mut lines = lines;
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines = &lines[1..];
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines = &lines[..lines.len() - 1];
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// One grouped documentation section: level-3 heading, then a level-4
/// heading plus body per entry. Empty sections disappear entirely.
fn push_section(blocks: &mut Vec<String>, heading: &str, entries: &[DocEntry]) {
    if entries.is_empty() {
        return;
    }
    blocks.push(classify::format_heading(3, heading));
    for entry in entries {
        match entry {
            DocEntry::Doc(rec) => {
                let title = match rec.kind {
                    DocKind::Macro => format!("`{}` (macro)", rec.title),
                    DocKind::Function => format!("`{}`", rec.title),
                    DocKind::Custom => format!("`{}`", rec.name),
                };
                blocks.push(classify::format_heading(4, &title));
                if !rec.body.is_empty() {
                    blocks.push(rec.body.clone());
                }
            }
            DocEntry::Failed { kind, name, reason } => {
                blocks.push(format!("<!-- el2md: {} {name}: {reason} -->", kind.head()));
            }
        }
    }
}
