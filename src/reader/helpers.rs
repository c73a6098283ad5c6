//! The node state machine's core: text reading, tag/attribute parsing,
//! namespace resolution, open/close bookkeeping, and the public event-API
//! helpers (§4.7) layered on top of [`Reader::bump`].
//!
//! Grounded on `bump_xml_node`/`_read_text`/`_read_tag`/`_read_attr_id`/
//! `_read_attr_val`/`_do_resolve_namespaces`/`_do_open_tag`/`_do_close_tag`/
//! `_ignore_rest_tag` in the original reader, reshaped where the original's
//! pointer arithmetic doesn't translate cleanly (see DESIGN.md).

use std::io::{Read, Write};

use crate::interner::{Token, NOT_A_TOKEN};
use crate::limits::{MAX_ATTRS_SIZE, MAX_BOUND_SIZE, MAX_BOUND_TEXT_SIZE, MAX_STACK_SIZE};
use crate::namespace::{Overflow, Snapshot};

use super::events::{Attribute, StackNode};
use super::{Event, LexTok, NodeState, Reader};

/// The namespace-alias portion of a just-parsed `<attr-id>`, before
/// resolution. `Plain` covers ordinary (possibly qualified) attributes and
/// the tag name itself; `XmlnsBinding` covers `xmlns[:alias]`, which is
/// consumed by the namespace stack rather than added to the attribute
/// array.
enum AttrKind {
    Plain {
        namesp_index: u16,
        id_index: u16,
        id_token: Token,
    },
    XmlnsBinding {
        alias_start: u16,
        alias_end: u16,
    },
}

struct ParsedAttrId {
    loc: crate::location::Location,
    kind: AttrKind,
}

/// Formats `namesp:id` as an owned string. Builds each half in its own
/// statement rather than inline in one `format!` call, since two
/// `Interner::name` calls can't both borrow `interner` at once.
fn qualified_name(interner: &mut crate::interner::Interner, namesp: Token, id: Token) -> String {
    let namesp = String::from_utf8_lossy(interner.name(namesp)).into_owned();
    let id = String::from_utf8_lossy(interner.name(id)).into_owned();
    format!("{}:{}", namesp, id)
}

impl<'i, R: Read, W: Write> Reader<'i, R, W> {
    /// Advances the state machine until exactly one event is produced, or
    /// end-of-file is reached. See spec §4.6.
    pub fn bump(&mut self) -> Event {
        if self.state == NodeState::AtEndOfOpenTag {
            self.close_self_closing_tag();
            self.state = NodeState::InText;
            return Event::Close;
        }

        loop {
            self.text.clear();
            self.attrs.clear();
            self.lex_text_index = 0;
            self.text_hash = 0;

            let saw_lt = self.read_text();
            if !self.text.is_empty() {
                if saw_lt {
                    self.bytes.unget(b'<');
                }
                self.lex_symbol = self.close_text();
                return Event::Text;
            }

            self.tag_loc = self.bytes.location();
            if self.stack.is_full() {
                self.diag.error(
                    self.tag_loc,
                    format_args!(
                        "too deep node, please set \"max_stack_size\" to {} or more",
                        2 * MAX_STACK_SIZE
                    ),
                );
                self.eof = true;
                return Event::Eof;
            }

            let snapshot = self.ns.snapshot();
            self.want_warn_end_of_tag = true;

            match self.bytes.get() {
                Some(b'!') => {
                    self.skip_comment_or_ignore();
                    continue;
                }
                Some(b'[') | Some(b'?') => {
                    self.want_warn_end_of_tag = false;
                    self.skip_to_gt();
                    continue;
                }
                Some(b'/') => {
                    self.read_tag_attrs();
                    self.resolve_namespaces();
                    if !self.attrs.is_empty() {
                        if self.lex_tok != LexTok::Byte(b'>') {
                            let name_loc = self.attrs[0].loc;
                            self.diag.error(
                                self.tag_loc,
                                format_args!("closing tag must be ended with \">\""),
                            );
                            self.diag.note(name_loc, format_args!("here was \"</\""));
                        }
                        return self.close_tag(true);
                    }
                    self.diag
                        .error(self.tag_loc, format_args!("closing tag must be: </tag>"));
                }
                None => {
                    if self.stack.is_empty() {
                        self.eof = true;
                        return Event::Eof;
                    }
                    return self.close_tag(false);
                }
                Some(c) => {
                    self.bytes.unget(c);
                    self.read_tag_attrs();
                    self.resolve_namespaces();
                    if !self.attrs.is_empty() {
                        let self_closing = self.lex_tok == LexTok::Byte(b'/');
                        if self_closing {
                            self.next_lex();
                            if self.lex_tok != LexTok::Byte(b'>') {
                                self.diag.error(
                                    self.tag_loc,
                                    format_args!("closed tag must be ended with \"/>\""),
                                );
                            }
                        }
                        self.do_open_tag(snapshot);
                        self.state = if self_closing {
                            NodeState::AtEndOfOpenTag
                        } else {
                            NodeState::InText
                        };
                        return Event::Open;
                    }
                    self.diag.error(
                        self.tag_loc,
                        format_args!("open tag must be: <tag> [<attr> ...]"),
                    );
                }
            }
            self.ignore_rest_tag();
        }
    }

    /// Plain text up to (but not including) the next `<`. Collapses runs of
    /// spaces to one, drops leading/trailing whitespace, decodes escapes.
    /// Returns whether the scan stopped because `<` was seen (as opposed to
    /// EOF) — the caller pushes `<` back in that case, since it must be
    /// re-consumed by the next `bump` to drive the tag dispatch.
    fn read_text(&mut self) -> bool {
        let mut c = match self.bytes.get() {
            Some(c) => c,
            None => return false,
        };
        loop {
            if c == b'<' {
                return true;
            }
            if c > b' ' {
                if !self.text.is_empty() {
                    self.add_text(b' ');
                }
                loop {
                    if c == b'&' {
                        self.read_escape();
                    } else {
                        self.add_text(c);
                    }
                    c = match self.bytes.get() {
                        Some(next) => next,
                        None => return false,
                    };
                    if c == b'<' {
                        return true;
                    }
                    if c <= b' ' {
                        break;
                    }
                }
            }
            if c == b'\n' && self.bytes.newline() {
                let loc = self.bytes.location();
                self.diag.warn_once_max_line_no(loc);
            }
            c = match self.bytes.get() {
                Some(next) => next,
                None => return false,
            };
        }
    }

    /// Skips `<!-- ... -->`, tolerating (not validating) anything else
    /// starting with `!` — matching the original's silent pass-through for
    /// unsupported `<!DOCTYPE ...>`-shaped constructs (§1 Non-goals).
    fn skip_comment_or_ignore(&mut self) {
        if self.bytes.get() != Some(b'-') {
            return;
        }
        if self.bytes.get() != Some(b'-') {
            return;
        }
        let mut dash_run = 0u32;
        loop {
            match self.bytes.get() {
                Some(b'-') => dash_run += 1,
                Some(b'>') => {
                    if dash_run >= 2 {
                        return;
                    }
                    dash_run = 0;
                }
                Some(b'\n') => {
                    dash_run = 0;
                    if self.bytes.newline() {
                        let loc = self.bytes.location();
                        self.diag.warn_once_max_line_no(loc);
                    }
                }
                Some(_) => dash_run = 0,
                None => {
                    self.diag
                        .error(self.tag_loc, format_args!("missing \"-->\""));
                    return;
                }
            }
        }
    }

    /// Skips a `<[ ... ]>` / `<? ... ?>` construct to its matching `>`.
    /// Terminates on EOF (the redesign flag in spec §9: the original's
    /// `_ignore_rest_tag`-adjacent skip does not latch on EOF).
    fn skip_to_gt(&mut self) {
        loop {
            match self.bytes.get() {
                Some(b'>') | None => return,
                Some(b'\n') => {
                    if self.bytes.newline() {
                        let loc = self.bytes.location();
                        self.diag.warn_once_max_line_no(loc);
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Drains bytes until `>` or EOF, reporting "extra text" at most once
    /// per tag. Terminates on EOF (see the comment scanner above).
    fn ignore_rest_tag(&mut self) {
        loop {
            match self.bytes.get() {
                Some(b'>') | None => return,
                Some(b'\n') => {
                    if self.bytes.newline() {
                        let loc = self.bytes.location();
                        self.diag.warn_once_max_line_no(loc);
                    }
                }
                Some(c) => {
                    if self.want_warn_end_of_tag && c > b' ' {
                        self.want_warn_end_of_tag = false;
                        let loc = self.tag_loc;
                        self.diag.error(loc, format_args!("extra text"));
                    }
                }
            }
        }
    }

    /// Parses `<tag-id> [<attr-id> = <literal> | xmlns[:<alias>] = <literal> ...]`,
    /// leaving `attrs[0]` as the tag/closing-tag name and `lex_tok` as
    /// whatever token ended the run (`>`, `/`, or something malformed).
    /// `xmlns[:alias]` attributes are pushed onto the namespace stack
    /// instead of being added to `attrs`.
    fn read_tag_attrs(&mut self) {
        self.next_lex();
        if self.lex_tok != LexTok::Id {
            return;
        }
        let name = self.read_attr_id(false);
        if let AttrKind::Plain {
            namesp_index,
            id_index,
            id_token,
        } = name.kind
        {
            let _ = self.attrs.push(Attribute {
                loc: name.loc,
                namesp_index,
                id_index,
                val_index: id_index,
                namesp_token: NOT_A_TOKEN,
                id_token,
                val_token: NOT_A_TOKEN,
            });
        }

        while self.lex_tok == LexTok::Id {
            let attr_loc = self.lex_loc;
            let parsed = self.read_attr_id(true);

            let mut val_index = 0u16;
            let mut val_token = NOT_A_TOKEN;
            if self.lex_tok == LexTok::Byte(b'=') {
                self.next_lex();
                if self.lex_tok == LexTok::Literal {
                    val_index = self.lex_text_index as u16;
                    val_token = self.lex_symbol;
                    self.next_lex();
                } else {
                    self.diag.error(
                        attr_loc,
                        format_args!("<attr-val> must be a literal string"),
                    );
                }
            } else {
                self.diag.error(
                    attr_loc,
                    format_args!("<attr> must be: <attr-id> = <literal>"),
                );
            }

            match parsed.kind {
                AttrKind::XmlnsBinding {
                    alias_start,
                    alias_end,
                } => {
                    let len = (alias_end - alias_start) as usize;
                    if len <= MAX_BOUND_TEXT_SIZE {
                        let mut alias_buf = [0u8; MAX_BOUND_TEXT_SIZE];
                        alias_buf[..len].copy_from_slice(
                            &self.text.as_slice()[alias_start as usize..alias_end as usize],
                        );
                        match self.ns.push(val_token, &alias_buf[..len]) {
                            Ok(()) => {}
                            Err(Overflow::Bindings) => self.diag.error(
                                attr_loc,
                                format_args!(
                                    "too many bindings, please set \"max_bound_size\" to {} or more",
                                    2 * MAX_BOUND_SIZE
                                ),
                            ),
                            Err(Overflow::Text) => self.diag.error(
                                attr_loc,
                                format_args!(
                                    "too much bound text, please set \"max_bound_text_size\" to {} or more",
                                    2 * MAX_BOUND_TEXT_SIZE
                                ),
                            ),
                        }
                    } else {
                        self.diag.error(
                            attr_loc,
                            format_args!(
                                "too much bound text, please set \"max_bound_text_size\" to {} or more",
                                2 * MAX_BOUND_TEXT_SIZE
                            ),
                        );
                    }
                }
                AttrKind::Plain {
                    namesp_index,
                    id_index,
                    id_token,
                } => {
                    if self.attrs.is_full() {
                        self.diag.error(
                            attr_loc,
                            format_args!(
                                "too many attributes, please set \"max_attrs_size\" to {} or more",
                                2 * MAX_ATTRS_SIZE
                            ),
                        );
                        return;
                    }
                    let _ = self.attrs.push(Attribute {
                        loc: attr_loc,
                        namesp_index,
                        id_index,
                        val_index,
                        namesp_token: NOT_A_TOKEN,
                        id_token,
                        val_token,
                    });
                }
            }
        }
    }

    /// Parses one `<id>` or `<alias>:<id>` (or, when `check_xmlns` and the
    /// left side is the `xmlns` token, an `xmlns[:alias]` binding). Assumes
    /// `lex_tok`/`lex_symbol` already hold a just-lexed `Id`; leaves the
    /// lexer positioned just past the parsed name.
    fn read_attr_id(&mut self, check_xmlns: bool) -> ParsedAttrId {
        let loc = self.lex_loc;
        let first_token = self.lex_symbol;
        let first_start = self.lex_text_index as u16;
        let first_end = self.text.len() as u16;
        self.next_lex();

        if self.lex_tok == LexTok::Byte(b':') {
            self.next_lex();
            if self.lex_tok == LexTok::Id {
                let second_start = self.lex_text_index as u16;
                let second_end = self.text.len() as u16;
                let second_token = self.lex_symbol;
                let is_binding =
                    check_xmlns && self.xmlns != NOT_A_TOKEN && first_token == self.xmlns;
                self.next_lex();
                return if is_binding {
                    ParsedAttrId {
                        loc,
                        kind: AttrKind::XmlnsBinding {
                            alias_start: second_start,
                            alias_end: second_end,
                        },
                    }
                } else {
                    ParsedAttrId {
                        loc,
                        kind: AttrKind::Plain {
                            namesp_index: first_start,
                            id_index: second_start,
                            id_token: second_token,
                        },
                    }
                };
            }
            self.diag.error(
                self.lex_loc,
                format_args!("<attr-id> must be: <namesp>:<id>"),
            );
        }

        let is_binding = check_xmlns && self.xmlns != NOT_A_TOKEN && first_token == self.xmlns;
        if is_binding {
            ParsedAttrId {
                loc,
                kind: AttrKind::XmlnsBinding {
                    alias_start: first_end,
                    alias_end: first_end,
                },
            }
        } else {
            ParsedAttrId {
                loc,
                kind: AttrKind::Plain {
                    namesp_index: first_start,
                    id_index: first_start,
                    id_token: first_token,
                },
            }
        }
    }

    /// Resolves every attribute's (including `attrs[0]`'s) namespace alias
    /// against the current binding stack. Unresolved aliases get
    /// [`NOT_A_TOKEN`] and a one-shot warning/note (§4.5).
    fn resolve_namespaces(&mut self) {
        let count = self.attrs.len();
        let mut resolved = [None::<Token>; MAX_ATTRS_SIZE];
        for i in 0..count {
            let a = self.attrs[i];
            let alias = &self.text.as_slice()[a.namesp_index as usize..a.id_index as usize];
            resolved[i] = self.ns.resolve(alias);
        }
        for i in 0..count {
            match resolved[i] {
                Some(tok) => self.attrs[i].namesp_token = tok,
                None => {
                    self.attrs[i].namesp_token = NOT_A_TOKEN;
                    let loc = self.attrs[i].loc;
                    if self.diag.extra_messages_allowed() {
                        self.diag
                            .warning(loc, format_args!("namespace alias is unknown"));
                    }
                    if self.diag.latch_unresolved_alias() {
                        self.diag.note(
                            loc,
                            format_args!("tags/attributes with unresolved aliases are ignored"),
                        );
                    }
                }
            }
        }
    }

    fn do_open_tag(&mut self, snapshot: Snapshot) {
        let a0 = self.attrs[0];
        let _ = self.stack.push(StackNode {
            loc: self.tag_loc,
            id_token: a0.id_token,
            namesp_token: a0.namesp_token,
            bound_size: snapshot.bound_size as u16,
            bound_text_size: snapshot.bound_text_size as u16,
        });
        self.interner.mark(a0.id_token, true);
    }

    /// Pops the stack entry for a `<tag/>` empty element. By construction
    /// its id/namespace match the entry that was just pushed, so there is
    /// nothing to balance-check.
    fn close_self_closing_tag(&mut self) {
        if let Some(top) = self.stack.as_slice().last().copied() {
            self.ns.restore(Snapshot {
                bound_size: top.bound_size as usize,
                bound_text_size: top.bound_text_size as usize,
            });
            self.stack.truncate(self.stack.len() - 1);
            if self.stack.is_empty() {
                self.ending_loc = top.loc;
            }
        }
    }

    /// Pops the stack entry matching a real `</tag>` (`parsed = true`) or a
    /// synthetic close for an unclosed tag at EOF (`parsed = false`), per
    /// spec §8's invariant that every Open is eventually matched by exactly
    /// one Close. Restores the namespace stack to what it was before the
    /// matching Open.
    fn close_tag(&mut self, parsed: bool) -> Event {
        if let Some(top) = self.stack.as_slice().last().copied() {
            self.ns.restore(Snapshot {
                bound_size: top.bound_size as usize,
                bound_text_size: top.bound_text_size as usize,
            });

            if parsed {
                let a0 = self.attrs[0];
                let top_unknown = top.id_token == NOT_A_TOKEN || top.namesp_token == NOT_A_TOKEN;
                let closing_unknown = a0.id_token == NOT_A_TOKEN || a0.namesp_token == NOT_A_TOKEN;
                if top_unknown || closing_unknown {
                    if self.diag.extra_messages_allowed() && self.diag.latch_unknown_balance() {
                        let loc = self.tag_loc;
                        self.diag.warning(
                            loc,
                            format_args!(
                                "tags with unknown ids or namespaces are not checked for open/close balance"
                            ),
                        );
                    }
                } else if a0.id_token != top.id_token || a0.namesp_token != top.namesp_token {
                    let closing_name = qualified_name(self.interner, a0.namesp_token, a0.id_token);
                    let opening_name = qualified_name(self.interner, top.namesp_token, top.id_token);
                    let loc = self.tag_loc;
                    self.diag.error(
                        loc,
                        format_args!("closing tag \"{}\" mismatches opening tag", closing_name),
                    );
                    self.diag.note(
                        top.loc,
                        format_args!("the opening \"{}\" was here", opening_name),
                    );
                }
            }

            self.stack.truncate(self.stack.len() - 1);
            if self.stack.is_empty() {
                self.ending_loc = top.loc;
            }
        } else if parsed {
            let a0 = self.attrs[0];
            if self.diag.extra_messages_allowed() {
                self.diag
                    .warning(a0.loc, format_args!("no closing tag is needed here"));
                let loc = self.ending_loc;
                self.diag.note(loc, format_args!("here we are at root"));
            }
        }
        self.state = NodeState::InText;
        Event::Close
    }

    /// Linear search among the current tag's attributes (excluding
    /// `attrs[0]`). Returns the attribute's index, or `None` with an
    /// optional diagnostic if nothing matches.
    pub fn find_attr(&mut self, id_token: Token, namesp_token: Token) -> Option<usize> {
        if self.attrs.is_empty() {
            if self.diag.extra_messages_allowed() {
                let names = qualified_name(self.interner, namesp_token, id_token);
                let loc = self.lex_loc;
                self.diag.warning(
                    loc,
                    format_args!("here should be a tag with attribute \"{}\"", names),
                );
            }
            return None;
        }
        for (i, a) in self.attrs.as_slice().iter().enumerate().skip(1) {
            if a.id_token == id_token && a.namesp_token == namesp_token {
                return Some(i);
            }
        }
        if self.diag.extra_messages_allowed() {
            let a0 = self.attrs[0];
            let tag_name = qualified_name(self.interner, a0.namesp_token, a0.id_token);
            let want_name = qualified_name(self.interner, namesp_token, id_token);
            let loc = a0.loc;
            self.diag.warning(
                loc,
                format_args!("no attribute \"{}\" found in \"{}\"", want_name, tag_name),
            );
        }
        None
    }

    /// Calls [`Reader::bump`] repeatedly, skipping subtrees, until an
    /// open-tag event is produced at `level`, EOF, or a fatal error.
    /// Returns whether an Open was found (the caller reads its view via
    /// [`Reader::attrs`]).
    pub fn bump_tag_at(&mut self, level: usize) -> bool {
        while !self.eof && level <= self.depth() {
            self.ignore_rest_at(level + 1);
            match self.bump() {
                Event::Open => return true,
                Event::Eof => return false,
                _ => {}
            }
        }
        false
    }

    /// Combines [`Reader::bump_tag_at`] with name matching.
    pub fn find_tag_at(&mut self, id: Token, namesp: Token, level: usize) -> bool {
        while self.bump_tag_at(level) {
            let a0 = self.attrs[0];
            if a0.id_token == id && a0.namesp_token == namesp {
                return true;
            }
        }
        false
    }

    /// Descends into subtrees, returning the first matching Open at depth
    /// `>= min_level`.
    pub fn find_tag_recursive(&mut self, id: Token, namesp: Token, min_level: usize) -> bool {
        while !self.eof && min_level <= self.depth() {
            if self.bump() == Event::Open {
                let a0 = self.attrs[0];
                if a0.id_token == id && a0.namesp_token == namesp {
                    return true;
                }
            }
        }
        false
    }

    /// Drains events until the stack depth is below `level`.
    pub fn ignore_rest_at(&mut self, level: usize) {
        while !self.eof && level <= self.depth() {
            self.bump();
        }
    }
}
