//! Compile-time capacity limits for a single document's reader state.
//!
//! These mirror the `enum { ... }` limits table in the original C reader:
//! every bounded buffer in [`crate::reader::Reader`] is sized from one of
//! these constants and never reallocates mid-document. Doubling the
//! relevant constant and recompiling is the documented remedy for an
//! overflow diagnostic.

/// Maximum length, in bytes, of the text between `&` and `;` in a character
/// reference.
pub const MAX_ESC_LENGTH: usize = 20;

/// Maximum number of attributes per tag, including the implicit `attrs[0]`
/// tag-name slot.
pub const MAX_ATTRS_SIZE: usize = 1 + 20;

/// Maximum number of simultaneously active namespace bindings.
pub const MAX_BOUND_SIZE: usize = 20;

/// Maximum open-tag nesting depth.
pub const MAX_STACK_SIZE: usize = 20;

/// Maximum bytes of text (tag/attribute identifiers, literals, element text)
/// buffered for a single node.
pub const MAX_TEXT_SIZE: usize = 1024;

/// Maximum bytes of alias text held by the namespace-binding stack.
pub const MAX_BOUND_TEXT_SIZE: usize = 64;

/// Block size used by the buffered byte reader.
pub const IO_BUF_SIZE: usize = 1024;

/// Number of chain-head slots in the interner's hash table directory.
pub const SYMBOL_HASHTAB_SIZE: usize = 5051;
