//! Schema miner: classifies every observed tag into struct, enum, number or
//! string kinds from its child/attribute/text co-occurrence, sharing the
//! reader's interner.
//!
//! Grounded on `add_mined_item`/the classification and rendering loops in
//! `main.cpp`. Unlike the reader, the miner's own tables are process-lived
//! and unbounded (the original uses `std::map`/`std::vector` for exactly
//! this reason), so `per_tag` and the miner's own tag stack are plain
//! `BTreeMap`/`Vec`, not [`crate::fixed::FixedBuf`].

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

use crate::interner::{Interner, Token};
use crate::reader::Reader;

/// The four kinds a tag can be classified as. Priority when more than one
/// flag is set: `String` > `Number` > `Enum` > `Struct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Struct,
    Enum,
    Number,
    String,
}

#[derive(Debug, Clone, Default)]
struct Observation {
    /// Distinct member tokens observed under this tag: child effective
    /// tags, attribute ids, or the `<number>`/`<string>` sentinels text
    /// values get substituted with. Set-valued: an open question in the
    /// distilled spec notes one source variant double-counts membership;
    /// this tracks presence only, per observation not per occurrence.
    members: BTreeSet<Token>,
    is_item: bool,
    is_number: bool,
    is_string: bool,
}

/// One tag's classification, produced by [`Miner::classify`].
#[derive(Debug, Clone)]
pub struct Classified {
    pub tag: Token,
    pub kind: Kind,
    /// The representative tag for this tag's member-set signature. Equal
    /// to `tag` itself when `is_representative` is true.
    pub same_as: Token,
    /// Whether this tag is the first one observed with its exact member
    /// signature — only representatives are emitted as declarations.
    pub is_representative: bool,
    /// The member-set signature, sorted by token id (deterministic, not
    /// necessarily the order members were first observed).
    pub members: Vec<Token>,
}

/// Returns whether `text` is all ASCII digits (the empty string counts,
/// matching the original's `is_number`'s vacuous loop).
fn is_number(text: &[u8]) -> bool {
    text.iter().all(|b| b.is_ascii_digit())
}

/// Returns whether `text` contains no character outside `[A-Za-z0-9_]`.
fn is_identifier_like(text: &[u8]) -> bool {
    text.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Observes a reader's event stream across one or more documents,
/// accumulating a per-tag member-set and classifying tags on demand via
/// [`Miner::classify`].
pub struct Miner {
    per_tag: BTreeMap<Token, Observation>,
    stack: Vec<Token>,
    number_token: Token,
    string_token: Token,
    type_token: Token,
}

impl Miner {
    /// Pre-interns the `<number>`/`<string>`/`type` sentinel tokens, so the
    /// first `type=` attribute lookup in a document doesn't pay for a
    /// fresh insert mid-parse.
    pub fn new(interner: &mut Interner) -> Self {
        Miner {
            per_tag: BTreeMap::new(),
            stack: Vec::new(),
            number_token: interner.intern(b"<number>", None),
            string_token: interner.intern(b"<string>", None),
            type_token: interner.intern(b"type", None),
        }
    }

    fn add_item(&mut self, tag: Token, value_token: Token, text: &[u8]) {
        let info = self.per_tag.entry(tag).or_default();
        let value_token = if is_number(text) {
            info.is_number = true;
            self.number_token
        } else if !is_identifier_like(text) {
            info.is_string = true;
            self.string_token
        } else {
            value_token
        };
        info.members.insert(value_token);
        info.is_item = true;
    }

    /// Call on [`crate::reader::Event::Open`]. The effective tag is
    /// `attrs[0].id_token`, unless a `type` attribute is present, in which
    /// case it's that attribute's value token. Every other attribute is
    /// recorded as an item of the effective tag; if a tag is currently
    /// open, the effective tag is recorded as one of its members.
    pub fn on_open<R: Read, W: Write>(&mut self, reader: &mut Reader<R, W>) {
        let attrs = reader.attrs().to_vec();
        if attrs.is_empty() {
            return;
        }
        let mut effective = attrs[0].id_token;
        for a in &attrs[1..] {
            if a.id_token == self.type_token {
                effective = a.val_token;
                break;
            }
        }
        for a in &attrs[1..] {
            if a.id_token == self.type_token {
                continue;
            }
            let text = reader.interner_mut().name(a.val_token).to_vec();
            self.add_item(effective, a.id_token, &text);
        }
        if let Some(&top) = self.stack.last() {
            self.per_tag.entry(top).or_default().members.insert(effective);
        }
        self.stack.push(effective);
    }

    /// Call on [`crate::reader::Event::Text`]: records the text as an item
    /// of the currently open tag, if any.
    pub fn on_text<R: Read, W: Write>(&mut self, reader: &mut Reader<R, W>) {
        if let Some(&top) = self.stack.last() {
            let text_token = reader.text_token();
            let text = reader.interner_mut().name(text_token).to_vec();
            self.add_item(top, text_token, &text);
        }
    }

    /// Call on [`crate::reader::Event::Close`].
    pub fn on_close(&mut self) {
        self.stack.pop();
    }

    /// Classifies every observed tag, in ascending token-id order (the
    /// iteration order of `per_tag`, matching the original's emission
    /// order). The `kinds` equivalence map is local to this call: two
    /// tags with identical sorted member signatures share a
    /// representative, the first one encountered in iteration order.
    pub fn classify(&self) -> Vec<Classified> {
        let mut kinds: BTreeMap<Vec<Token>, Token> = BTreeMap::new();
        let mut out = Vec::with_capacity(self.per_tag.len());

        for (&tag, obs) in &self.per_tag {
            let kind = if obs.is_string {
                Kind::String
            } else if obs.is_number {
                Kind::Number
            } else if obs.is_item {
                Kind::Enum
            } else {
                Kind::Struct
            };
            let members: Vec<Token> = obs.members.iter().copied().collect();

            let same_as = *kinds.entry(members.clone()).or_insert(tag);
            let is_representative = same_as == tag;

            out.push(Classified {
                tag,
                kind,
                same_as,
                is_representative,
                members,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(doc: &str) -> (Interner, Miner, u32) {
        let mut interner = Interner::new();
        let mut miner = Miner::new(&mut interner);
        let mut reader = Reader::new("test.xml", doc.as_bytes(), &mut interner, Vec::new());
        loop {
            match reader.bump() {
                crate::reader::Event::Open => miner.on_open(&mut reader),
                crate::reader::Event::Text => miner.on_text(&mut reader),
                crate::reader::Event::Close => miner.on_close(),
                crate::reader::Event::Eof => break,
            }
        }
        let errors = reader.errors();
        (interner, miner, errors)
    }

    fn kind_of(interner: &mut Interner, classified: &[Classified], name: &str) -> Kind {
        let token = interner.intern(name.as_bytes(), None);
        classified.iter().find(|c| c.tag == token).unwrap().kind
    }

    #[test]
    fn all_numeric_children_become_number() {
        let (mut interner, miner, errors) = run("<root><n>1</n><n>2</n></root>");
        assert_eq!(errors, 0);
        let classified = miner.classify();
        assert_eq!(kind_of(&mut interner, &classified, "n"), Kind::Number);
    }

    #[test]
    fn non_identifier_text_becomes_string() {
        let (mut interner, miner, _) = run("<root><s>a b</s></root>");
        let classified = miner.classify();
        assert_eq!(kind_of(&mut interner, &classified, "s"), Kind::String);
    }

    #[test]
    fn struct_with_one_child_member() {
        let (mut interner, miner, _) = run("<root><n>1</n></root>");
        let classified = miner.classify();
        assert_eq!(kind_of(&mut interner, &classified, "root"), Kind::Struct);
    }

    #[test]
    fn identical_member_signatures_share_a_representative() {
        let (mut interner, miner, _) = run("<root><a n=\"1\"/><b n=\"2\"/></root>");
        let classified = miner.classify();
        let a_token = interner.intern(b"a", None);
        let b_token = interner.intern(b"b", None);
        let a = classified.iter().find(|c| c.tag == a_token).unwrap();
        let b = classified.iter().find(|c| c.tag == b_token).unwrap();
        assert_eq!(a.same_as, b.same_as);
        assert!(a.is_representative);
        assert!(!b.is_representative);
    }
}
