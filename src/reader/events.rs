//! Event and attribute views returned by [`super::Reader::bump`].

use crate::interner::Token;
use crate::location::Location;

/// One parsed attribute, or the tag name itself at index 0.
///
/// Indices point into the reader's text scratch buffer; they (like the
/// tokens) are only valid until the next [`super::Reader::bump`] call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Attribute {
    pub loc: Location,
    pub namesp_index: u16,
    pub id_index: u16,
    pub val_index: u16,
    pub namesp_token: Token,
    pub id_token: Token,
    pub val_token: Token,
}

/// Per-open-tag bookkeeping pushed on Open, popped on the matching Close.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackNode {
    pub loc: Location,
    pub id_token: Token,
    pub namesp_token: Token,
    pub bound_size: u16,
    pub bound_text_size: u16,
}

/// The kind of node produced by one `bump` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Open,
    Text,
    Close,
    /// End of file: no further events will be produced.
    Eof,
}
