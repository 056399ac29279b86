//! Commentary line classifier: one source line in, one Markdown line out.
//!
//! Transform order matters: symbol-quote fix-up and image wrapping run on
//! the raw line, classification runs on the result, and the comment prefix
//! is stripped last before emission.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

/// `` `symbol' `` reference where the close quote touches non-blank content.
static RE_SYMBOL_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?[^ \t])'").unwrap());

/// Bare URL ending in an image extension.
static RE_IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^ \t]+\.(?:png|jpg|jpeg)").unwrap());

/// Leading comment markers plus at most one following space.
static RE_COMMENT_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^;+ ?").unwrap());

/// `o ` list bullet, leading spaces allowed.
static RE_BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^( *)o (.*)$").unwrap());

// -- Transforms ---------------------------------------------------------------

/// Drop the close quote of a `` `symbol' `` reference, keeping the backquote.
///
/// A lone close quote would otherwise flip everything after it into inline
/// code under most Markdown renderers. The close quote survives when it only
/// follows blank content (`` `foo ' `` stays as written).
pub fn fixup_symbol_quotes(line: &str) -> String {
    RE_SYMBOL_QUOTE.replace_all(line, "`$1").to_string()
}

/// Wrap bare image URLs in an HTML image tag so README renderers show them
/// inline. A URL directly preceded by `(` is already inside Markdown link
/// syntax and is left alone.
pub fn wrap_image_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for m in RE_IMAGE_URL.find_iter(line) {
        let preceded_by_paren = line[..m.start()].chars().next_back() == Some('(');
        out.push_str(&line[last..m.start()]);
        if preceded_by_paren {
            out.push_str(m.as_str());
        } else {
            out.push_str(&format!("<img src=\"{}\" />", m.as_str()));
        }
        last = m.end();
    }
    out.push_str(&line[last..]);
    out
}

/// Remove leading `;` markers plus at most one following space.
pub fn strip_comment_prefix(line: &str) -> String {
    RE_COMMENT_PREFIX.replace(line, "").to_string()
}

/// Format a heading at the given nesting level: trailing colon and
/// whitespace removed, ` --- ` separator turned into an en-dash.
///
/// Idempotent: text already carrying the level's `#` prefix is returned
/// as-is, so re-formatting never accumulates markers. Returns an empty
/// string when nothing remains of the text.
pub fn format_heading(level: usize, text: &str) -> String {
    let mut text = text.trim_end();
    if let Some(rest) = text.strip_suffix(':') {
        text = rest.trim_end();
    }
    let text = text.replace(" --- ", " \u{2013} ");
    if text.is_empty() {
        return String::new();
    }
    let marker = "#".repeat(level);
    if text.starts_with(&marker) && text[marker.len()..].starts_with(' ') {
        return text;
    }
    format!("{} {}", marker, text)
}

/// Convert one commentary line to Markdown.
///
/// `;;; ` lines become level-3 headings (or nothing, when the heading text
/// is empty), `o ` bullets become `* ` list items, everything else passes
/// through with the comment prefix stripped.
pub fn convert_line(line: &str) -> Option<String> {
    let fixed = wrap_image_links(&fixup_symbol_quotes(line));
    let stripped = strip_comment_prefix(&fixed);

    if fixed.starts_with(";;; ") {
        let heading = format_heading(3, &stripped);
        if heading.is_empty() {
            return None;
        }
        return Some(heading);
    }

    if let Some(caps) = RE_BULLET.captures(&stripped) {
        return Some(format!("{}* {}", &caps[1], &caps[2]));
    }

    Some(stripped)
}
