//! Tag lexing: identifiers, quoted literals, and single-character tokens.
//!
//! Grounded on `_next_lex`/`_read_esc` in the original reader. Implemented
//! as methods on [`Reader`] rather than a free-standing type, since every
//! operation here interleaves reads from the byte reader with writes into
//! the shared text scratch buffer and symbol table — the same shape
//! `quick-xml`'s `ReaderState` methods take relative to its `IoReader`.

use std::io::{Read, Write};

use crate::escape::{lookup_named, parse_numeric, Named};
use crate::interner::NOT_A_TOKEN;
use crate::limits::MAX_ESC_LENGTH;

use super::{LexTok, Reader};

fn is_id_char(c: u8) -> bool {
    c > b' ' && (!c.is_ascii_punctuation() || matches!(c, b'_' | b'-' | b'.'))
}

impl<'i, R: Read, W: Write> Reader<'i, R, W> {
    pub(crate) fn add_text(&mut self, c: u8) {
        self.text_hash = self.text_hash.wrapping_mul(33).wrapping_add(c as u32);
        let _ = self.text.push(c);
    }

    /// Interns the bytes accumulated since `lex_text_index` and resets the
    /// symbol. If the text buffer filled up while accumulating this token,
    /// the token's bytes are discarded (not interned) and a resource
    /// diagnostic is emitted, matching `_close_text`'s "too much text"
    /// path.
    pub(crate) fn close_text(&mut self) -> crate::interner::Token {
        if !self.text.is_full() {
            let start = self.lex_text_index;
            let hash = self.text_hash;
            let bytes_len = self.text.len() - start;
            let mut scratch = [0u8; crate::limits::MAX_TEXT_SIZE];
            scratch[..bytes_len].copy_from_slice(&self.text.as_slice()[start..]);
            self.interner.intern(&scratch[..bytes_len], Some(hash))
        } else {
            let start = self.lex_text_index;
            self.text.truncate(start);
            let loc = self.lex_loc;
            self.diag.error(
                loc,
                format_args!(
                    "too much text, please set \"max_text_size\" to {} or more",
                    2 * crate::limits::MAX_TEXT_SIZE
                ),
            );
            NOT_A_TOKEN
        }
    }

    fn skip_newline_tracked(&mut self, c: u8) {
        if c == b'\n' && self.bytes.newline() {
            let loc = self.bytes.location();
            self.diag.warn_once_max_line_no(loc);
        }
    }

    /// Consumes the next tag-lexical token: an identifier, a quoted
    /// literal, or a single raw byte. Skips leading whitespace, tracking
    /// newlines.
    pub(crate) fn next_lex(&mut self) -> LexTok {
        self.lex_text_index = self.text.len();
        self.text_hash = 0;

        let mut c = loop {
            match self.bytes.get() {
                Some(b) if b <= b' ' => self.skip_newline_tracked(b),
                Some(b) => break b,
                None => {
                    self.lex_tok = LexTok::Eof;
                    return LexTok::Eof;
                }
            }
        };
        self.lex_loc = self.bytes.location();

        if is_id_char(c) {
            loop {
                self.add_text(c);
                match self.bytes.get() {
                    Some(next) if is_id_char(next) => c = next,
                    Some(next) => {
                        self.bytes.unget(next);
                        break;
                    }
                    None => break,
                }
            }
            self.lex_symbol = self.close_text();
            self.lex_tok = LexTok::Id;
            return LexTok::Id;
        }

        if c == b'"' {
            loop {
                match self.bytes.get() {
                    Some(b'"') => break,
                    Some(b2) if b2 >= b' ' || b2 == b'\t' => {
                        if b2 == b'&' {
                            self.read_escape();
                        } else {
                            self.add_text(b2);
                        }
                    }
                    _ => {
                        let loc = self.bytes.location();
                        self.diag.error(loc, format_args!("literal not closed"));
                        break;
                    }
                }
            }
            self.lex_symbol = self.close_text();
            self.lex_tok = LexTok::Literal;
            return LexTok::Literal;
        }

        self.lex_tok = LexTok::Byte(c);
        LexTok::Byte(c)
    }

    /// Decodes one `&name;` / `&#n;` / `&#xN;` reference, called just
    /// after the `&` has been consumed. Appends the decoded byte to the
    /// text buffer. Grounded on `_read_esc`.
    pub(crate) fn read_escape(&mut self) {
        let loc = self.bytes.location();

        let peeked = self.bytes.get();
        let numeric = peeked == Some(b'#');
        if !numeric {
            // Only peeked to check for '#'; push whatever we saw back so
            // it's the first character consumed by the name/digit
            // accumulation loop below, mirroring `_getc`/`_ungetc` in the
            // original `_read_esc`. A peeked EOF has nothing to push back.
            if let Some(b) = peeked {
                self.bytes.unget(b);
            }
        }
        let mut buf = [0u8; MAX_ESC_LENGTH];
        let mut len = 0usize;
        loop {
            match self.bytes.get() {
                Some(b';') => break,
                Some(c) if len == MAX_ESC_LENGTH => {
                    self.diag.error(
                        loc,
                        format_args!("escape must be shorter {} symbols", len),
                    );
                    // push back so a following read doesn't silently eat
                    // a real document byte that happened not to be ';'
                    self.bytes.unget(c);
                    break;
                }
                Some(c) if c.is_ascii_alphanumeric() => {
                    buf[len] = c;
                    len += 1;
                }
                Some(_) => {
                    self.diag.error(loc, format_args!("missing \";\" in escape"));
                    break;
                }
                None => {
                    self.diag.error(loc, format_args!("missing \";\" in escape"));
                    break;
                }
            }
        }

        let name = &buf[..len];
        let decoded = if numeric {
            let hex = name.first() == Some(&b'x');
            let digits = if hex { &name[1..] } else { name };
            match parse_numeric(digits, hex) {
                Some(code) => code as u8,
                None => {
                    self.diag.error(loc, format_args!("extra text in escape"));
                    b'?'
                }
            }
        } else {
            match lookup_named(name) {
                Named::Resolved(ch) => ch,
                Named::Unknown => {
                    self.diag.error(
                        loc,
                        format_args!("unknown escape \"&{}\"", String::from_utf8_lossy(name)),
                    );
                    b'?'
                }
            }
        };
        self.add_text(decoded);
    }
}
