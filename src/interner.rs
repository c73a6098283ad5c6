//! Process-wide string interner.
//!
//! Maps byte strings to small integer token ids and back, shared by the
//! reader and the miner. Entries are copied in and never removed; the
//! table itself grows (a plain `Vec`, mirroring the original's
//! `realloc`-doubled `symbols` array) but the *document-scoped* reader
//! buffers built on top of it ([`crate::fixed::FixedBuf`]) do not — the
//! "no reallocation" guarantee is about per-document state, not the
//! long-lived symbol table.

use crate::limits::SYMBOL_HASHTAB_SIZE;

/// A small non-negative integer uniquely identifying an interned byte
/// string. Ids are dense in insertion order, starting at 1; 0 is reserved
/// ([`NOT_A_TOKEN`]).
pub type Token = u16;

/// Sentinel meaning "unknown" / "no token". Never a valid interned id.
pub const NOT_A_TOKEN: Token = 0;

/// Computes the 33-multiplier rolling hash (seed 0) used throughout: both
/// by the interner's own table and by the lexer while it accumulates a
/// candidate identifier's bytes.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |h, &b| h.wrapping_mul(33).wrapping_add(b as u32))
}

struct Entry {
    bytes: Box<[u8]>,
    hash: u32,
    /// 1-based index of the next entry in this hash chain, 0 = end.
    next: u32,
    used: bool,
    is_tag: bool,
}

/// Fill ratio, average and worst chain length over the occupied directory
/// slots, reported by the driver at the end of a run.
#[derive(Debug, Clone, Copy)]
pub struct TableStats {
    pub directory_size: usize,
    pub fill_percent: u32,
    pub average_chain: u32,
    pub worst_chain: u32,
}

/// The symbol table: an open hash table of fixed directory size
/// ([`SYMBOL_HASHTAB_SIZE`]) resolving collisions by chaining through the
/// entry array.
pub struct Interner {
    directory: Vec<u32>,
    entries: Vec<Entry>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            directory: vec![0; SYMBOL_HASHTAB_SIZE],
            entries: Vec::with_capacity(256),
        }
    }

    /// Returns the existing id for `bytes` if present, otherwise inserts a
    /// new entry and returns its id. `hash`, if `Some`, is used as a
    /// precomputed hash instead of recomputing; callers that have already
    /// accumulated the hash while lexing pass it to avoid a second pass
    /// over the bytes.
    ///
    /// Returns [`NOT_A_TOKEN`] if the table has already interned
    /// `Token::MAX` distinct strings — fatal to whichever bootstrap call
    /// hit it.
    pub fn intern(&mut self, bytes: &[u8], hash: Option<u32>) -> Token {
        let hash = hash.unwrap_or_else(|| hash_bytes(bytes));
        let slot = (hash as usize) % SYMBOL_HASHTAB_SIZE;

        let mut cursor = self.directory[slot];
        while cursor != 0 {
            let entry = &self.entries[(cursor - 1) as usize];
            if entry.hash == hash && &*entry.bytes == bytes {
                return cursor as Token;
            }
            cursor = entry.next;
        }

        if self.entries.len() >= Token::MAX as usize {
            return NOT_A_TOKEN;
        }

        let index = self.entries.len() as u32 + 1;
        self.entries.push(Entry {
            bytes: bytes.to_vec().into_boxed_slice(),
            hash,
            next: self.directory[slot],
            used: false,
            is_tag: false,
        });
        self.directory[slot] = index;
        index as Token
    }

    /// Reverse lookup. Returns an empty slice for an unknown or
    /// [`NOT_A_TOKEN`] id, matching `xml_token_name`'s fallback to `""`.
    /// Marks the entry as "used" for statistics.
    pub fn name(&mut self, token: Token) -> &[u8] {
        if token == NOT_A_TOKEN {
            return b"";
        }
        match self.entries.get_mut((token - 1) as usize) {
            Some(entry) => {
                entry.used = true;
                &entry.bytes
            }
            None => b"",
        }
    }

    /// Reverse lookup without marking the entry as used. For callers that
    /// only hold a shared reference, such as the miner's rendering pass.
    pub fn name_const(&self, token: Token) -> &[u8] {
        if token == NOT_A_TOKEN {
            return b"";
        }
        match self.entries.get((token - 1) as usize) {
            Some(entry) => &entry.bytes,
            None => b"",
        }
    }

    /// Records that `token` was observed as a tag name, for the plain
    /// reader driver's end-of-run tag listing.
    pub fn mark(&mut self, token: Token, tag: bool) {
        if token == NOT_A_TOKEN {
            return;
        }
        if let Some(entry) = self.entries.get_mut((token - 1) as usize) {
            entry.is_tag = tag;
        }
    }

    pub fn is_tag(&self, token: Token) -> bool {
        token != NOT_A_TOKEN
            && self
                .entries
                .get((token - 1) as usize)
                .map(|e| e.is_tag)
                .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every interned string ever seen as a tag name, bucketed by the
    /// directory slot it hashes into — grounds `xread`'s end-of-run dump.
    pub fn tags_by_slot(&self) -> Vec<(usize, Vec<&[u8]>)> {
        let mut out = Vec::new();
        for (slot, &head) in self.directory.iter().enumerate() {
            if head == 0 {
                continue;
            }
            let mut names = Vec::new();
            let mut cursor = head;
            while cursor != 0 {
                let entry = &self.entries[(cursor - 1) as usize];
                if entry.is_tag {
                    names.push(&*entry.bytes);
                }
                cursor = entry.next;
            }
            if !names.is_empty() {
                out.push((slot, names));
            }
        }
        out
    }

    pub fn table_stats(&self) -> TableStats {
        let mut fill = 0u32;
        let mut worst = 0u32;
        for &head in &self.directory {
            if head == 0 {
                continue;
            }
            fill += 1;
            let mut len = 0u32;
            let mut cursor = head;
            while cursor != 0 {
                len += 1;
                cursor = self.entries[(cursor - 1) as usize].next;
            }
            worst = worst.max(len);
        }
        let average = if fill == 0 {
            0
        } else {
            (self.entries.len() as u32 + fill / 2) / fill
        };
        TableStats {
            directory_size: SYMBOL_HASHTAB_SIZE,
            fill_percent: if fill == 0 {
                0
            } else {
                100 * fill / SYMBOL_HASHTAB_SIZE as u32
            },
            average_chain: average,
            worst_chain: worst,
        }
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern(b"hello", None);
        let b = interner.intern(b"hello", None);
        assert_eq!(a, b);
        assert_ne!(a, NOT_A_TOKEN);
    }

    #[test]
    fn name_round_trips() {
        let mut interner = Interner::new();
        let token = interner.intern(b"world", None);
        assert_eq!(interner.name(token), b"world");
    }

    #[test]
    fn distinct_strings_get_distinct_tokens() {
        let mut interner = Interner::new();
        let a = interner.intern(b"a", None);
        let b = interner.intern(b"b", None);
        assert_ne!(a, b);
    }

    #[test]
    fn precomputed_hash_matches_recomputed() {
        let mut interner = Interner::new();
        let hash = hash_bytes(b"xmlns");
        let a = interner.intern(b"xmlns", Some(hash));
        let b = interner.intern(b"xmlns", None);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_token_name_is_empty() {
        let mut interner = Interner::new();
        assert_eq!(interner.name(NOT_A_TOKEN), b"");
        assert_eq!(interner.name(12345), b"");
    }

    #[test]
    fn tag_marking_is_observable() {
        let mut interner = Interner::new();
        let token = interner.intern(b"root", None);
        assert!(!interner.is_tag(token));
        interner.mark(token, true);
        assert!(interner.is_tag(token));
    }
}
