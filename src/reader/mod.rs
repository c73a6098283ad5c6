//! The pull XML reader: a fixed-capacity, single-pass lexer and node state
//! machine.
//!
//! A [`Reader`] is constructed per document, shares a process-wide
//! [`Interner`] by mutable reference, and is driven one node at a time via
//! [`Reader::bump`]. All of its buffers — attributes, open-tag stack,
//! namespace bindings, text scratch space — are [`FixedBuf`]s sized from
//! [`crate::limits`]; none of them reallocate mid-document. Overflowing one
//! is a recoverable resource error, not a panic.

mod bytes;
mod helpers;
pub mod events;
mod lexer;

pub use bytes::ByteReader;
pub use events::{Attribute, Event, StackNode};

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use crate::diagnostics::{self, Diagnostics};
use crate::fixed::FixedBuf;
use crate::interner::{Interner, Token, NOT_A_TOKEN};
use crate::limits::{MAX_ATTRS_SIZE, MAX_STACK_SIZE, MAX_TEXT_SIZE};
use crate::location::Location;
use crate::namespace::Namespaces;

/// `state` in the original: whether the next `bump` starts a fresh node or
/// must first emit the synthetic Close implied by a previous `<tag/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    InText,
    AtEndOfOpenTag,
}

/// Tag lexer token kind. `Byte` carries the raw single-character token
/// (`<`, `>`, `/`, `=`, `:`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexTok {
    Id,
    Literal,
    Byte(u8),
    Eof,
}

/// Per-document reader state. Construct with [`Reader::new`] (or one of
/// the `from_*` convenience constructors on [`Reader<ByteReader<R>, W>`]),
/// drive with [`Reader::bump`] until it returns [`Event::Eof`].
pub struct Reader<'i, R, W: Write> {
    interner: &'i mut Interner,
    diag: Diagnostics<W>,
    bytes: ByteReader<R>,

    ns: Namespaces,
    text: FixedBuf<u8, MAX_TEXT_SIZE>,
    attrs: FixedBuf<Attribute, MAX_ATTRS_SIZE>,
    stack: FixedBuf<StackNode, MAX_STACK_SIZE>,

    state: NodeState,
    xmlns: Token,

    lex_loc: Location,
    lex_tok: LexTok,
    lex_symbol: Token,
    lex_text_index: usize,
    text_hash: u32,

    /// Location of the `<` that opened the tag currently being parsed —
    /// used to anchor "too many attributes"/"extra text" diagnostics at
    /// the tag rather than at whichever byte triggered the error.
    tag_loc: Location,
    /// Location up to which the document is "closed" once the open-tag
    /// stack empties, used to annotate a spurious top-level closing tag.
    ending_loc: Location,
    /// Set once a tag is entered, used by `ignore_rest_tag` to decide
    /// whether "extra text" has already been reported for this tag.
    want_warn_end_of_tag: bool,

    eof: bool,
}

impl<'i, R: Read, W: Write> Reader<'i, R, W> {
    fn from_parts(bytes: ByteReader<R>, interner: &'i mut Interner, diag: Diagnostics<W>) -> Self {
        let xmlns_hash = crate::interner::hash_bytes(b"xmlns");
        let xmlns = interner.intern(b"xmlns", Some(xmlns_hash));
        let ns = Namespaces::new(interner);

        let mut reader = Reader {
            interner,
            diag,
            bytes,
            ns,
            text: FixedBuf::new(),
            attrs: FixedBuf::new(),
            stack: FixedBuf::new(),
            state: NodeState::InText,
            xmlns,
            lex_loc: Location::start(),
            lex_tok: LexTok::Eof,
            lex_symbol: NOT_A_TOKEN,
            lex_text_index: 0,
            text_hash: 0,
            tag_loc: Location::start(),
            ending_loc: Location::start(),
            want_warn_end_of_tag: true,
            eof: false,
        };

        if xmlns == NOT_A_TOKEN {
            reader
                .diag
                .warning(Location::start(), format_args!("have no \"xmlns\" symbol, xml bindings are unavailable"));
        }

        reader
    }

    /// Generic constructor: wraps `raw` in a fixed-block [`ByteReader`] and
    /// initializes per-document state against the shared `interner`.
    /// `source` names the input for diagnostics (e.g. the file path).
    pub fn new(source: impl Into<String>, raw: R, interner: &'i mut Interner, diag_out: W) -> Self {
        Self::from_parts(ByteReader::new(raw), interner, Diagnostics::new(diag_out, source))
    }

    /// Toggles the `extra_messages_allowed` hook (spec §7): purely
    /// informational notes (unresolved-alias, unknown-balance, saturation)
    /// are suppressed when `allow` is `false`. Errors and warnings are
    /// always printed regardless.
    pub fn with_extra_messages(mut self, allow: bool) -> Self {
        self.diag = self.diag.with_extra_messages(allow);
        self
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn errors(&self) -> u32 {
        self.diag.errors()
    }

    /// The current tag's attributes, `attrs[0]` being the tag name itself.
    /// Valid only until the next `bump`.
    pub fn attrs(&self) -> &[Attribute] {
        self.attrs.as_slice()
    }

    /// The current open-tag nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of namespace bindings currently on the scoped binding stack.
    pub fn bound_size(&self) -> usize {
        self.ns.len()
    }

    /// Bytes of alias text currently held by the binding stack.
    pub fn bound_text_size(&self) -> usize {
        self.ns.text_len()
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        self.interner
    }

    /// The text bytes produced by the most recent Text event (or the raw
    /// bytes underlying the most recent Id/Literal token mid-tag).
    pub fn text(&self) -> &[u8] {
        self.text.as_slice()
    }

    /// The whole-text interned token for the most recent Text event.
    pub fn text_token(&self) -> Token {
        self.lex_symbol
    }

    pub fn current_tag_token(&self) -> Token {
        self.stack
            .as_slice()
            .last()
            .map(|n| n.id_token)
            .unwrap_or(NOT_A_TOKEN)
    }
}

impl<'i, W: Write> Reader<'i, File, W> {
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        interner: &'i mut Interner,
        diag_out: W,
    ) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let source = path.to_string_lossy().into_owned();
        let bytes = ByteReader::new(file);
        Ok(Self::from_parts(bytes, interner, Diagnostics::new(diag_out, source)))
    }
}

impl<'i> Reader<'i, io::Stdin, io::Stderr> {
    /// Convenience constructor matching the common CLI shape: reads from
    /// standard input, reports diagnostics to standard error.
    pub fn from_stdin(source: impl Into<String>, interner: &'i mut Interner) -> Self {
        Self::from_parts(
            ByteReader::new(io::stdin()),
            interner,
            diagnostics::stderr_diagnostics(source),
        )
    }
}

impl<'i, R: Read, W: Write> Reader<'i, BufReader<R>, W> {
    pub fn from_unbuffered_reader(
        reader: R,
        source: impl Into<String>,
        interner: &'i mut Interner,
        diag_out: W,
    ) -> Self {
        Self::from_parts(
            ByteReader::new(BufReader::new(reader)),
            interner,
            Diagnostics::new(diag_out, source),
        )
    }
}
