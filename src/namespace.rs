//! Scoped namespace-binding stack.
//!
//! Bindings are pushed while parsing `xmlns`/`xmlns:alias` attributes of an
//! open tag and popped on the matching close by restoring a saved
//! `(bindings, alias text)` size pair — the same scoped-unbind technique as
//! the original's `stack_node_t::{bound_size, bound_text_size}` snapshots.
//! Resolution is a linear scan from the top of the stack, matching by
//! byte-exact alias, mirroring `_do_resolve_namespaces`.

use crate::fixed::FixedBuf;
use crate::interner::{Interner, Token, NOT_A_TOKEN};
use crate::limits::{MAX_BOUND_SIZE, MAX_BOUND_TEXT_SIZE};

#[derive(Debug, Clone, Copy, Default)]
struct Binding {
    namesp_token: Token,
    text_start: u16,
    text_len: u16,
}

/// A snapshot of the stack's size, taken when an open tag begins and
/// restored when its matching close tag is processed.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub bound_size: usize,
    pub bound_text_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Bindings,
    Text,
}

/// The scoped stack of `alias -> namespace token` bindings. `bindings[0]`
/// is always the default-namespace binding for the empty alias.
pub struct Namespaces {
    bindings: FixedBuf<Binding, MAX_BOUND_SIZE>,
    text: FixedBuf<u8, MAX_BOUND_TEXT_SIZE>,
}

impl Namespaces {
    /// Interns the empty string and binds it to the default (empty) alias,
    /// as `init_read_xml` does for `bound[0]`.
    pub fn new(interner: &mut Interner) -> Self {
        let empty = interner.intern(b"", None);
        let mut bindings = FixedBuf::new();
        let _ = bindings.push(Binding {
            namesp_token: empty,
            text_start: 0,
            text_len: 0,
        });
        let mut text = FixedBuf::new();
        // bound_text[0] = 0 in the original reserves index 0 as the empty
        // alias's (zero-length) text; nothing to copy here.
        let _ = text.extend_truncating(&[]);
        Namespaces { bindings, text }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            bound_size: self.bindings.len(),
            bound_text_size: self.text.len(),
        }
    }

    /// Restores the stack to a previously taken snapshot, discarding any
    /// bindings pushed since.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.bindings.truncate(snapshot.bound_size);
        self.text.truncate(snapshot.bound_text_size);
    }

    /// Pushes a new binding for `alias`. Returns which buffer overflowed,
    /// if any; the binding is not added on overflow (mirrors the original
    /// printing a resource diagnostic and dropping the attribute).
    pub fn push(&mut self, namesp_token: Token, alias: &[u8]) -> Result<(), Overflow> {
        if self.bindings.is_full() {
            return Err(Overflow::Bindings);
        }
        let text_start = self.text.len();
        if text_start + alias.len() > self.text.capacity() {
            return Err(Overflow::Text);
        }
        let copied = self.text.extend_truncating(alias);
        debug_assert_eq!(copied, alias.len());
        let pushed = self.bindings.push(Binding {
            namesp_token,
            text_start: text_start as u16,
            text_len: alias.len() as u16,
        });
        debug_assert!(pushed);
        Ok(())
    }

    /// Resolves `alias` against the current stack, scanning from the most
    /// recently pushed binding. Returns `None` (unresolved) rather than
    /// `NOT_A_TOKEN` directly so the caller can distinguish "not found" from
    /// a binding that was itself bound to an unknown namespace token.
    pub fn resolve(&self, alias: &[u8]) -> Option<Token> {
        self.bindings.as_slice().iter().rev().find_map(|b| {
            let text = &self.text.as_slice()[b.text_start as usize..(b.text_start + b.text_len) as usize];
            (text == alias).then_some(b.namesp_token)
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }
}

/// `NOT_A_TOKEN` is the resolved namespace for an alias nothing ever bound.
pub const UNRESOLVED: Token = NOT_A_TOKEN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alias_resolves_to_empty_namespace() {
        let mut interner = Interner::new();
        let ns = Namespaces::new(&mut interner);
        let empty = interner.intern(b"", None);
        assert_eq!(ns.resolve(b""), Some(empty));
    }

    #[test]
    fn push_then_resolve_then_restore() {
        let mut interner = Interner::new();
        let mut ns = Namespaces::new(&mut interner);
        let u = interner.intern(b"u", None);

        let snap = ns.snapshot();
        ns.push(u, b"n").unwrap();
        assert_eq!(ns.resolve(b"n"), Some(u));

        ns.restore(snap);
        assert_eq!(ns.resolve(b"n"), None);
    }

    #[test]
    fn most_recent_binding_for_an_alias_wins() {
        let mut interner = Interner::new();
        let mut ns = Namespaces::new(&mut interner);
        let a = interner.intern(b"a", None);
        let b = interner.intern(b"b", None);

        ns.push(a, b"n").unwrap();
        ns.push(b, b"n").unwrap();
        assert_eq!(ns.resolve(b"n"), Some(b));
    }

    #[test]
    fn binding_overflow_is_reported() {
        let mut interner = Interner::new();
        let mut ns = Namespaces::new(&mut interner);
        let t = interner.intern(b"t", None);
        for _ in 1..crate::limits::MAX_BOUND_SIZE {
            ns.push(t, b"x").unwrap();
        }
        assert_eq!(ns.push(t, b"y"), Err(Overflow::Bindings));
    }
}
