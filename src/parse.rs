//! Line-oriented section parser.
//!
//! An explicit state machine over the input lines: header block until
//! `;;; Commentary:`, commentary until `;;; Code:`, then the declaration
//! region. Missing markers degrade to missing sections, never errors.

use regex::Regex;
use std::sync::LazyLock;

use crate::classify;
use crate::model::{DocKind, Document, Phase};
use crate::scan::Scanner;

/// `;; Key: value` pseudo-header.
static RE_HEADER_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^;;+[ \t]*([A-Za-z][A-Za-z0-9-]*):[ \t]*(.*)$").unwrap());

/// `-*- ... -*-` file-variable cookie on the title line.
static RE_FILE_COOKIE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\*-.*-\*-").unwrap());

const COMMENTARY_MARKER: &str = ";;; Commentary:";
const CODE_MARKER: &str = ";;; Code:";

pub struct Parser {
    phase: Phase,
    doc: Document,
    region: String,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            phase: Phase::BeforeCommentary,
            doc: Document::default(),
            region: String::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn feed_line(&mut self, line: &str) {
        match self.phase {
            Phase::BeforeCommentary => self.feed_header(line),
            Phase::InCommentary => self.feed_commentary(line),
            Phase::InCode => {
                self.region.push_str(line);
                self.region.push('\n');
            }
            Phase::Done => {}
        }
    }

    fn feed_header(&mut self, line: &str) {
        let trimmed = line.trim_end();
        if trimmed == COMMENTARY_MARKER {
            self.phase = Phase::InCommentary;
            return;
        }
        if trimmed == CODE_MARKER {
            self.phase = Phase::InCode;
            return;
        }
        if !line.starts_with(';') {
            return;
        }
        self.doc.license_block.push_str(line);
        self.doc.license_block.push('\n');

        if self.doc.title.is_none() && trimmed.starts_with(";;; ") {
            self.read_title(trimmed);
            return;
        }
        if let Some(caps) = RE_HEADER_FIELD.captures(trimmed) {
            self.doc
                .headers
                .insert(caps[1].to_string(), caps[2].trim().to_string());
        }
    }

    /// `;;; name.el --- one-line description -*- cookie -*-`
    fn read_title(&mut self, line: &str) {
        let stripped = classify::strip_comment_prefix(line);
        match stripped.split_once(" --- ") {
            Some((name, rest)) => {
                self.doc.title = Some(name.trim().to_string());
                let subtitle = RE_FILE_COOKIE.replace(rest, "");
                let subtitle = subtitle.trim();
                if !subtitle.is_empty() {
                    self.doc.subtitle = Some(subtitle.to_string());
                }
            }
            None => self.doc.title = Some(stripped.trim().to_string()),
        }
    }

    fn feed_commentary(&mut self, line: &str) {
        if line.trim_end() == CODE_MARKER {
            self.phase = Phase::InCode;
            return;
        }
        if line.trim().is_empty() {
            self.doc.commentary.push(String::new());
            return;
        }
        if !line.starts_with(';') {
            return;
        }
        if let Some(md) = classify::convert_line(line) {
            self.doc.commentary.push(md);
        }
    }

    /// Scan the collected declaration region and close out the document.
    pub fn finish(mut self) -> Document {
        self.phase = Phase::Done;
        for entry in Scanner::new(&self.region) {
            match entry.kind() {
                DocKind::Custom => self.doc.customizations.push(entry),
                DocKind::Function | DocKind::Macro => self.doc.callables.push(entry),
            }
        }
        self.doc
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

/// Parse a whole source file.
pub fn parse(input: &str) -> Document {
    let mut parser = Parser::new();
    for line in input.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}
