//! Data model for a converted Emacs Lisp file, independent of the output
//! format.

use std::collections::HashMap;

/// Complete parse result for a single source file.
#[derive(Debug, Default)]
pub struct Document {
    /// Package name from the `;;; name --- description` title line.
    pub title: Option<String>,
    /// One-line description from the title line, file-variable cookie removed.
    pub subtitle: Option<String>,
    /// `;; Key: value` pseudo-headers from the leading comment block.
    /// Last occurrence wins; keys stored as written.
    pub headers: HashMap<String, String>,
    /// Raw leading comment block (top of file through the commentary
    /// marker), fed to the license matcher.
    pub license_block: String,
    /// Commentary section, already classified into Markdown lines.
    pub commentary: Vec<String>,
    /// `defcustom` documentation, discovery order.
    pub customizations: Vec<DocEntry>,
    /// `defun`/`defmacro` documentation, discovery order.
    pub callables: Vec<DocEntry>,
}

impl Document {
    /// True when conversion produced nothing worth writing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.commentary.is_empty()
            && self.customizations.is_empty()
            && self.callables.is_empty()
    }
}

/// Kind of documentable top-level form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Function,
    Macro,
    Custom,
}

impl DocKind {
    pub fn head(&self) -> &'static str {
        match self {
            DocKind::Function => "defun",
            DocKind::Macro => "defmacro",
            DocKind::Custom => "defcustom",
        }
    }
}

/// One documented declaration. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRecord {
    pub kind: DocKind,
    pub name: String,
    /// Rendered call signature for callables, bare name for defcustom.
    pub title: String,
    /// Docstring text: symbol-quoting normalized, trailing whitespace trimmed.
    pub body: String,
}

/// Scanner output: a record, or an extraction failure that renders as a
/// one-line HTML-comment diagnostic where the documentation would have been.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocEntry {
    Doc(DocRecord),
    Failed {
        kind: DocKind,
        name: String,
        reason: String,
    },
}

impl DocEntry {
    pub fn kind(&self) -> DocKind {
        match self {
            DocEntry::Doc(rec) => rec.kind,
            DocEntry::Failed { kind, .. } => *kind,
        }
    }
}

/// Scan phase over the line sequence. Transitions happen on the
/// `;;; Commentary:` and `;;; Code:` marker lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BeforeCommentary,
    InCommentary,
    InCode,
    Done,
}
