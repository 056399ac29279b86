//! Minimal s-expression scanning for the declaration region.
//!
//! Not a Lisp reader, just enough lexical awareness to find matching
//! delimiters and pull tokens out of a form: double-quoted strings with
//! backslash escapes, `?c` / `?\c` character literals, `;` comments, and
//! `'` / `` ` `` / `,` / `#` expression prefixes.

/// Forward-only cursor over declaration-region text. Byte positions always
/// land on ASCII delimiters, so slicing stays on UTF-8 boundaries.
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

/// Bytes that terminate a symbol token.
fn is_symbol_end(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\t' | b'\n' | b'\r' | b'(' | b')' | b'[' | b']' | b'"' | b';' | b'\'' | b'`'
            | b','
    )
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Cursor { text, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn byte(&self, at: usize) -> Option<u8> {
        self.text.as_bytes().get(at).copied()
    }

    pub fn peek(&self) -> Option<u8> {
        self.byte(self.pos)
    }

    /// Advance one full character (multi-byte safe).
    pub fn bump(&mut self) {
        match self.text[self.pos..].chars().next() {
            Some(c) => self.pos += c.len_utf8(),
            None => self.pos = self.text.len(),
        }
    }

    /// Skip whitespace and `;` comments.
    pub fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.pos += 1,
                Some(b';') => {
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    /// Read a symbol token at the cursor. Returns `None` when the cursor is
    /// not at symbol-constituent text.
    pub fn read_symbol(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_symbol_end(b) {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            None
        } else {
            Some(&self.text[start..self.pos])
        }
    }

    /// Read a double-quoted string at the cursor, decoding escapes the way
    /// the host reader does for the common cases (`\"`, `\\`, `\n`, `\t`;
    /// any other escaped character stands for itself).
    pub fn read_string(&mut self) -> Option<String> {
        if self.peek() != Some(b'"') {
            return None;
        }
        self.pos += 1;
        let mut out = String::new();
        loop {
            let c = self.text[self.pos..].chars().next()?;
            self.pos += c.len_utf8();
            match c {
                '"' => return Some(out),
                '\\' => {
                    let escaped = self.text[self.pos..].chars().next()?;
                    self.pos += escaped.len_utf8();
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
    }

    /// Skip a raw string literal without decoding. Returns false when the
    /// string never terminates.
    fn skip_string(&mut self) -> bool {
        debug_assert_eq!(self.peek(), Some(b'"'));
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => {
                    self.pos += 1;
                    self.bump();
                }
                b'"' => {
                    self.pos += 1;
                    return true;
                }
                _ => self.bump(),
            }
        }
        false
    }

    /// Skip a `?c` / `?\c` character literal (cursor at the `?`).
    fn skip_char_literal(&mut self) {
        self.pos += 1;
        if self.peek() == Some(b'\\') {
            self.pos += 1;
        }
        self.bump();
    }

    /// Skip past the matching close delimiter (cursor at the open
    /// delimiter). Strings, character literals, and comments inside the
    /// span do not affect the depth count. Returns false when the span
    /// never closes.
    pub fn skip_delimited(&mut self, open: u8, close: u8) -> bool {
        debug_assert_eq!(self.peek(), Some(open));
        let mut depth = 0usize;
        let mut token_start = true;
        while let Some(b) = self.peek() {
            match b {
                b'"' => {
                    if !self.skip_string() {
                        return false;
                    }
                    token_start = false;
                    continue;
                }
                b';' => {
                    while let Some(c) = self.peek() {
                        self.pos += 1;
                        if c == b'\n' {
                            break;
                        }
                    }
                    token_start = true;
                    continue;
                }
                b'?' if token_start => {
                    self.skip_char_literal();
                    token_start = false;
                    continue;
                }
                _ => {}
            }
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    self.pos += 1;
                    return true;
                }
            }
            token_start = matches!(
                b,
                b' ' | b'\t' | b'\n' | b'\r' | b'(' | b'[' | b'\'' | b'`' | b','
            );
            self.bump();
        }
        false
    }

    /// Skip exactly one expression: optional reader prefixes (`'`, `` ` ``,
    /// `,`, `,@`, `#`), then a list, vector, string, character literal, or
    /// atom. Returns false when no complete expression is present.
    pub fn skip_expr(&mut self) -> bool {
        self.skip_trivia();
        while matches!(self.peek(), Some(b'\'' | b'`' | b',' | b'@' | b'#')) {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'(') => self.skip_delimited(b'(', b')'),
            Some(b'[') => self.skip_delimited(b'[', b']'),
            Some(b'"') => self.skip_string(),
            Some(b'?') => {
                self.skip_char_literal();
                true
            }
            Some(_) => self.read_symbol().is_some(),
            None => false,
        }
    }
}
