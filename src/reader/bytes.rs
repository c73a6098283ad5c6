//! Buffered, position-tracking byte source.
//!
//! Reads fixed-size blocks ([`IO_BUF_SIZE`]) from an underlying
//! [`Read`], tracking (line, column) as bytes are consumed. Grounded on
//! `_getc`/`_ungetc`/`_got_newline` in the original reader, reshaped for
//! Rust: rather than the original's pointer-arithmetic trick of sliding a
//! `line_start` base pointer so a raw index always addresses "the current
//! byte", a one-byte pushback slot plays the same role for `unget` without
//! needing unsafe pointer games, and a short/zero read is simply treated
//! as EOF (the I/O layer's timeout handling is out of scope, per §5).

use std::io::{self, Read};

use crate::limits::IO_BUF_SIZE;
use crate::location::Location;

pub struct ByteReader<R> {
    inner: R,
    block: Box<[u8]>,
    pos: usize,
    filled: usize,
    /// Exactly one byte of pushback, set by `unget`.
    redeliver: Option<u8>,
    loc: Location,
    eof: bool,
    col_saturated: bool,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        ByteReader {
            inner,
            block: vec![0u8; IO_BUF_SIZE].into_boxed_slice(),
            pos: 0,
            filled: 0,
            redeliver: None,
            loc: Location::start(),
            eof: false,
            col_saturated: false,
        }
    }

    pub fn location(&self) -> Location {
        self.loc
    }

    pub fn is_eof(&self) -> bool {
        self.eof && self.redeliver.is_none()
    }

    /// Returns whether the column counter saturated since the last call,
    /// clearing the flag. Callers check this once per token to decide
    /// whether to emit the one-shot saturation note.
    #[must_use]
    pub fn take_col_saturation(&mut self) -> bool {
        std::mem::take(&mut self.col_saturated)
    }

    fn refill(&mut self) -> io::Result<bool> {
        loop {
            match self.inner.read(&mut self.block) {
                Ok(0) => return Ok(false),
                Ok(n) => {
                    self.pos = 0;
                    self.filled = n;
                    return Ok(true);
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // A read error has no well-formed recovery inside the node
                // state machine; treat it like a short read (EOF).
                Err(_) => return Ok(false),
            }
        }
    }

    /// Returns the next byte, or `None` at end of file. Advances the
    /// column; a fresh block is pulled in once the current one is
    /// exhausted.
    pub fn get(&mut self) -> Option<u8> {
        if let Some(b) = self.redeliver.take() {
            self.col_saturated |= self.loc.bump_col();
            return Some(b);
        }
        if self.eof {
            return None;
        }
        if self.pos == self.filled {
            match self.refill() {
                Ok(true) => {}
                _ => {
                    self.eof = true;
                    return None;
                }
            }
        }
        let b = self.block[self.pos];
        self.pos += 1;
        self.col_saturated |= self.loc.bump_col();
        Some(b)
    }

    /// Pushes `byte` back so the next `get` returns it again. Only one
    /// byte of pushback is supported — exactly what every call site needs.
    pub fn unget(&mut self, byte: u8) {
        debug_assert!(self.redeliver.is_none(), "unget called twice in a row");
        self.redeliver = Some(byte);
        if self.loc.col_no > 0 {
            self.loc.col_no -= 1;
        }
    }

    /// Call after consuming a `\n` byte. Advances the line counter and
    /// resets the column. Returns `true` if the line counter was already
    /// saturated (caller emits the one-shot note).
    #[must_use]
    pub fn newline(&mut self) -> bool {
        self.loc.bump_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bytes_in_order() {
        let mut r = ByteReader::new(&b"abc"[..]);
        assert_eq!(r.get(), Some(b'a'));
        assert_eq!(r.get(), Some(b'b'));
        assert_eq!(r.get(), Some(b'c'));
        assert_eq!(r.get(), None);
    }

    #[test]
    fn unget_redelivers_the_same_byte() {
        let mut r = ByteReader::new(&b"ab"[..]);
        let a = r.get().unwrap();
        r.unget(a);
        assert_eq!(r.get(), Some(a));
        assert_eq!(r.get(), Some(b'b'));
    }

    #[test]
    fn tracks_line_and_column() {
        let mut r = ByteReader::new(&b"ab\ncd"[..]);
        assert_eq!(r.location(), Location { line_no: 1, col_no: 0 });
        r.get();
        assert_eq!(r.location().col_no, 1);
        r.get();
        r.get(); // '\n'
        r.newline();
        assert_eq!(r.location(), Location { line_no: 2, col_no: 0 });
    }

    #[test]
    fn crosses_block_boundary() {
        let data = vec![b'x'; IO_BUF_SIZE + 5];
        let mut r = ByteReader::new(&data[..]);
        for _ in 0..IO_BUF_SIZE + 5 {
            assert_eq!(r.get(), Some(b'x'));
        }
        assert_eq!(r.get(), None);
    }
}
