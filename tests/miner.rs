use pretty_assertions::assert_eq;

use xstruct::interner::Interner;
use xstruct::miner::{Kind, Miner};
use xstruct::reader::{Event, Reader};

fn mine(docs: &[&str]) -> (Interner, Miner) {
    let mut interner = Interner::new();
    let mut miner = Miner::new(&mut interner);
    for doc in docs {
        let mut reader = Reader::new("test.xml", doc.as_bytes(), &mut interner, Vec::new());
        loop {
            match reader.bump() {
                Event::Open => miner.on_open(&mut reader),
                Event::Text => miner.on_text(&mut reader),
                Event::Close => miner.on_close(),
                Event::Eof => break,
            }
        }
    }
    (interner, miner)
}

fn kind_of(interner: &mut Interner, classified: &[xstruct::miner::Classified], name: &str) -> Kind {
    let token = interner.intern(name.as_bytes(), None);
    classified.iter().find(|c| c.tag == token).unwrap().kind
}

#[test]
fn tag_with_only_numeric_text_children_is_number() {
    let (mut interner, miner) = mine(&["<root><count>1</count><count>42</count></root>"]);
    let classified = miner.classify();
    assert_eq!(kind_of(&mut interner, &classified, "count"), Kind::Number);
}

#[test]
fn tag_with_non_identifier_text_is_string() {
    let (mut interner, miner) = mine(&["<root><note>hi there</note></root>"]);
    let classified = miner.classify();
    assert_eq!(kind_of(&mut interner, &classified, "note"), Kind::String);
}

#[test]
fn tag_with_only_child_elements_is_struct() {
    let (mut interner, miner) = mine(&["<root><a>1</a><b>x y</b></root>"]);
    let classified = miner.classify();
    assert_eq!(kind_of(&mut interner, &classified, "root"), Kind::Struct);
}

#[test]
fn tag_with_only_plain_attribute_items_is_enum() {
    // "root" has one non-numeric, non-string-shaped item (the "status"
    // attribute id) and no child elements or text: is_item alone selects
    // Enum over Struct.
    let (mut interner, miner) = mine(&["<root status=\"ok\"/>"]);
    let classified = miner.classify();
    assert_eq!(kind_of(&mut interner, &classified, "root"), Kind::Enum);
}

#[test]
fn type_attribute_overrides_the_effective_tag() {
    let (mut interner, miner) = mine(&["<item type=\"widget\" color=\"red\"/>"]);
    let classified = miner.classify();
    let widget = interner.intern(b"widget", None);
    assert!(classified.iter().any(|c| c.tag == widget));
    // "item" itself never appears as an effective tag once type= overrides it.
    let item = interner.intern(b"item", None);
    assert!(!classified.iter().any(|c| c.tag == item));
}

#[test]
fn two_tags_with_identical_member_signatures_share_a_representative() {
    let (mut interner, miner) = mine(&["<root><a n=\"1\"/><b n=\"2\"/></root>"]);
    let classified = miner.classify();
    let a = interner.intern(b"a", None);
    let b = interner.intern(b"b", None);
    let ca = classified.iter().find(|c| c.tag == a).unwrap();
    let cb = classified.iter().find(|c| c.tag == b).unwrap();
    assert_eq!(ca.same_as, cb.same_as);
    assert!(ca.is_representative);
    assert!(!cb.is_representative);
}

#[test]
fn mining_spans_multiple_documents() {
    let (mut interner, miner) = mine(&["<root><n>1</n></root>", "<root><n>2</n></root>"]);
    let classified = miner.classify();
    assert_eq!(kind_of(&mut interner, &classified, "n"), Kind::Number);
    // only one "root" observation accumulated across both documents, not two
    assert_eq!(classified.iter().filter(|c| c.tag == interner.intern(b"root", None)).count(), 1);
}
