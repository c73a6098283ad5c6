//! Statistics shared by the two CLI front-ends.
//!
//! Grounded on the high-watermark tracking (`used_attrs`, `used_bindings`,
//! ...) and the end-of-run `fprintf(stderr, ...)` footer in both
//! `main.c` and `main.cpp`.

use std::io::{self, Read, Write};

use crate::interner::Interner;
use crate::reader::Reader;

/// Per-run high-watermarks plus file/error counters, printed to stderr at
/// the end of a run by both `xread` and `xmine`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stats {
    pub files: u32,
    pub errors: u32,
    used_attrs: usize,
    used_bindings: usize,
    used_binding_text: usize,
    used_text: usize,
    used_stack: usize,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the high-watermarks from a reader's current per-document
    /// state. Call after every `bump`.
    pub fn observe<R: Read, W: Write>(&mut self, reader: &Reader<R, W>) {
        self.used_attrs = self.used_attrs.max(reader.attrs().len());
        self.used_bindings = self.used_bindings.max(reader.bound_size());
        self.used_binding_text = self.used_binding_text.max(reader.bound_text_size());
        self.used_text = self.used_text.max(reader.text().len());
        self.used_stack = self.used_stack.max(reader.depth());
    }

    /// Folds one finished document's error count into the run totals.
    pub fn finish_file(&mut self, errors: u32) {
        self.files += 1;
        self.errors += errors;
    }

    /// Writes the end-of-run footer, matching the shape (not the exact
    /// wording) of `main.c`/`main.cpp`'s closing `fprintf` block.
    pub fn report<W: Write>(&self, mut out: W, interner: &Interner) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "processed {} files", self.files)?;
        writeln!(out, "finished with {} errors", self.errors)?;
        writeln!(out, "symbols_size = {}", interner.len())?;
        writeln!(out, "used_bindings = {}", self.used_bindings)?;
        writeln!(out, "used_binding_text = {}", self.used_binding_text)?;
        writeln!(out, "used_text = {}", self.used_text)?;
        writeln!(out, "used_attrs = {}", self.used_attrs)?;
        writeln!(out, "used_stack = {}", self.used_stack)?;

        let table = interner.table_stats();
        if table.worst_chain > 0 {
            writeln!(out, "hash_size = {}", table.directory_size)?;
            writeln!(out, "hash_fill = {}%", table.fill_percent)?;
            writeln!(out, "hash_avg_case = {}", table.average_chain)?;
            writeln!(out, "hash_worst_case = {}", table.worst_chain)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watermarks_track_the_deepest_document_seen() {
        let mut interner = Interner::new();
        let mut stats = Stats::new();
        let mut reader = Reader::new(
            "test.xml",
            &b"<a><b><c/></b></a>"[..],
            &mut interner,
            Vec::new(),
        );
        loop {
            let event = reader.bump();
            stats.observe(&reader);
            if event == crate::reader::Event::Eof {
                break;
            }
        }
        stats.finish_file(reader.errors());
        assert_eq!(stats.used_stack, 3);
        assert_eq!(stats.files, 1);
    }
}
