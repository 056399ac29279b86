//! Declaration scanner: walks the code region for documentable top-level
//! forms (`defun`, `defmacro`, `defcustom`) and yields one entry per form.
//!
//! The walk is forward-only over a single cursor. Forms with a private name
//! (`--`) or without a docstring are skipped without a trace; forms that are
//! structurally broken yield a failure entry so the renderer can leave a
//! diagnostic where the documentation would have been.

use crate::classify;
use crate::model::{DocEntry, DocKind, DocRecord};
use crate::sexp::Cursor;

pub struct Scanner<'a> {
    region: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(region: &'a str) -> Self {
        Scanner {
            region,
            pos: 0,
            done: false,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = DocEntry;

    fn next(&mut self) -> Option<DocEntry> {
        while !self.done {
            let rest = &self.region[self.pos..];
            let mut cur = Cursor::new(rest);
            cur.skip_trivia();
            if cur.at_end() {
                self.done = true;
                return None;
            }
            if cur.peek() != Some(b'(') {
                // Stray top-level atom (`(provide 'x)` siblings, reader
                // prefixes). Skip one expression; give up when even that
                // makes no progress.
                if !cur.skip_expr() {
                    self.done = true;
                    return None;
                }
                self.pos += cur.pos();
                continue;
            }
            self.pos += cur.pos();

            let form = &self.region[self.pos..];
            let mut probe = Cursor::new(form);
            let closed = probe.skip_delimited(b'(', b')');
            let span = if closed { &form[..probe.pos()] } else { form };
            self.pos += span.len();
            if !closed {
                self.done = true;
            }

            if let Some(entry) = parse_form(span, closed) {
                return Some(entry);
            }
        }
        None
    }
}

// -- Form parsing -------------------------------------------------------------

/// Parse one top-level form span (starting at its `(`). `None` means the
/// form is not documentable: unrecognized head, private name, or no
/// docstring.
fn parse_form(span: &str, closed: bool) -> Option<DocEntry> {
    let mut cur = Cursor::new(&span[1..]);
    cur.skip_trivia();
    let kind = match cur.read_symbol()? {
        "defun" => DocKind::Function,
        "defmacro" => DocKind::Macro,
        "defcustom" => DocKind::Custom,
        _ => return None,
    };
    cur.skip_trivia();
    let name = cur.read_symbol();

    if !closed {
        return Some(DocEntry::Failed {
            kind,
            name: name.unwrap_or("?").to_string(),
            reason: "unterminated form".to_string(),
        });
    }
    let Some(name) = name else {
        return Some(DocEntry::Failed {
            kind,
            name: "?".to_string(),
            reason: "unreadable name token".to_string(),
        });
    };
    if name.contains("--") {
        return None;
    }

    match kind {
        DocKind::Custom => parse_custom(cur, name),
        DocKind::Function | DocKind::Macro => parse_callable(cur, kind, name),
    }
}

/// `(defcustom name default "docstring" . keywords)`; the docstring is the
/// element after the default value.
fn parse_custom(mut cur: Cursor, name: &str) -> Option<DocEntry> {
    if !cur.skip_expr() {
        return Some(DocEntry::Failed {
            kind: DocKind::Custom,
            name: name.to_string(),
            reason: "unreadable default value".to_string(),
        });
    }
    cur.skip_trivia();
    let doc = cur.read_string().filter(|d| !d.is_empty())?;
    Some(DocEntry::Doc(DocRecord {
        kind: DocKind::Custom,
        name: name.to_string(),
        title: name.to_string(),
        body: postprocess(&doc),
    }))
}

/// `(defun name (args) "docstring" . body)`, same shape for `defmacro`.
fn parse_callable(mut cur: Cursor, kind: DocKind, name: &str) -> Option<DocEntry> {
    cur.skip_trivia();
    let args = if cur.peek() == Some(b'(') {
        read_arg_tokens(&mut cur)
    } else if cur.read_symbol() == Some("nil") {
        // `nil` is valid surface syntax for an empty parameter list.
        Some(Vec::new())
    } else {
        None
    };
    let Some(args) = args else {
        return Some(DocEntry::Failed {
            kind,
            name: name.to_string(),
            reason: "unreadable parameter list".to_string(),
        });
    };
    cur.skip_trivia();
    let doc = cur.read_string().filter(|d| !d.is_empty())?;

    let (title, body) = match fn_line_override(&doc, name) {
        Some(pair) => pair,
        None => (render_signature(name, &args), doc),
    };
    Some(DocEntry::Doc(DocRecord {
        kind,
        name: name.to_string(),
        title,
        body: postprocess(&body),
    }))
}

/// Read the flat symbol list between the parameter-list parens.
fn read_arg_tokens<'a>(cur: &mut Cursor<'a>) -> Option<Vec<&'a str>> {
    cur.bump();
    let mut tokens = Vec::new();
    loop {
        cur.skip_trivia();
        match cur.peek() {
            Some(b')') => {
                cur.bump();
                return Some(tokens);
            }
            Some(_) => tokens.push(cur.read_symbol()?),
            None => return None,
        }
    }
}

// -- Signature rendering ------------------------------------------------------

/// One-line call signature from the declared parameter list: required
/// parameters bare, `&optional` ones bracketed, `&rest` ones with a
/// trailing ellipsis.
fn render_signature(name: &str, args: &[&str]) -> String {
    #[derive(Clone, Copy)]
    enum Mode {
        Required,
        Optional,
        Rest,
    }
    let mut parts = vec![name.to_string()];
    let mut mode = Mode::Required;
    for arg in args {
        match *arg {
            "&optional" => mode = Mode::Optional,
            "&rest" => mode = Mode::Rest,
            other if other.starts_with('&') => {}
            other => parts.push(match mode {
                Mode::Required => other.to_string(),
                Mode::Optional => format!("[{other}]"),
                Mode::Rest => format!("{other}..."),
            }),
        }
    }
    format!("({})", parts.join(" "))
}

/// A docstring whose final line is `(fn ARG...)` names its own signature;
/// the help convention substitutes the real name for `fn`. Returns the
/// substituted signature and the docstring with that line removed.
fn fn_line_override(doc: &str, name: &str) -> Option<(String, String)> {
    let trimmed = doc.trim_end();
    let (before, last) = match trimmed.rsplit_once('\n') {
        Some((before, last)) => (before, last),
        None => ("", trimmed),
    };
    let last = last.trim();
    let inner = last.strip_prefix("(fn")?.strip_suffix(')')?;
    if !inner.is_empty() && !inner.starts_with(' ') {
        return None;
    }
    Some((format!("({name}{inner})"), before.to_string()))
}

/// Docstring post-processing shared by every record kind.
fn postprocess(doc: &str) -> String {
    classify::fixup_symbol_quotes(doc).trim_end().to_string()
}
