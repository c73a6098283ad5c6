use criterion::{self, criterion_group, criterion_main, Criterion};

use xstruct::interner::Interner;
use xstruct::miner::Miner;
use xstruct::reader::{Event, Reader};

fn repeated_siblings(count: usize) -> String {
    let mut doc = String::from("<root>");
    for i in 0..count {
        doc.push_str(&format!("<item id=\"{}\">{}</item>", i, i));
    }
    doc.push_str("</root>");
    doc
}

/// Benchmarks draining a whole document through `Reader::bump`.
fn bump(c: &mut Criterion) {
    let doc = repeated_siblings(2000);
    let mut group = c.benchmark_group("Reader::bump");
    group.bench_function("2000 siblings", |b| {
        b.iter(|| {
            let mut interner = Interner::new();
            let mut reader = Reader::new("bench.xml", doc.as_bytes(), &mut interner, Vec::new());
            let mut count = criterion::black_box(0);
            loop {
                match reader.bump() {
                    Event::Open => count += 1,
                    Event::Eof => break,
                    _ => {}
                }
            }
            assert_eq!(count, 2001, "root plus 2000 <item> opens");
        });
    });
    group.finish();
}

/// Benchmarks how fast individual node kinds are parsed.
fn one_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("one node");

    group.bench_function("Open with attrs", |b| {
        let src = format!(r#"<hello target="{}">"#, "world".repeat(512 / 5));
        b.iter(|| {
            let mut interner = Interner::new();
            let mut reader = Reader::new("bench.xml", src.as_bytes(), &mut interner, Vec::new());
            match reader.bump() {
                Event::Open => {}
                other => panic!("did not expect {:?}", other),
            }
            assert_eq!(reader.attrs().len(), 2);
        });
    });

    group.bench_function("Text with escapes", |b| {
        let src = format!(r#"<a>{}&amp;{}</a>"#, "lorem ".repeat(100), "ipsum ".repeat(100));
        b.iter(|| {
            let mut interner = Interner::new();
            let mut reader = Reader::new("bench.xml", src.as_bytes(), &mut interner, Vec::new());
            assert_eq!(reader.bump(), Event::Open);
            assert_eq!(reader.bump(), Event::Text);
        });
    });

    group.bench_function("Comment", |b| {
        let src = format!(r#"<!-- hello "{}" -->"#, "world".repeat(512 / 5));
        b.iter(|| {
            let mut interner = Interner::new();
            let mut reader = Reader::new("bench.xml", src.as_bytes(), &mut interner, Vec::new());
            assert_eq!(reader.bump(), Event::Eof);
        });
    });

    group.finish();
}

/// Benchmarks the interner's hot path: repeated lookups of an
/// already-interned name.
fn interner_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("Interner");
    group.bench_function("intern repeated name", |b| {
        b.iter(|| {
            let mut interner = Interner::new();
            for _ in 0..1000 {
                criterion::black_box(interner.intern(b"repeated-name", None));
            }
        });
    });
    group.finish();
}

/// Benchmarks mining a moderately sized document into its schema.
fn mine_document(c: &mut Criterion) {
    let doc = repeated_siblings(500);
    let mut group = c.benchmark_group("Miner");
    group.bench_function("classify 500 siblings", |b| {
        b.iter(|| {
            let mut interner = Interner::new();
            let mut miner = Miner::new(&mut interner);
            let mut reader = Reader::new("bench.xml", doc.as_bytes(), &mut interner, Vec::new());
            loop {
                match reader.bump() {
                    Event::Open => miner.on_open(&mut reader),
                    Event::Text => miner.on_text(&mut reader),
                    Event::Close => miner.on_close(),
                    Event::Eof => break,
                }
            }
            criterion::black_box(miner.classify());
        });
    });
    group.finish();
}

criterion_group!(benches, bump, one_node, interner_lookup, mine_document);
criterion_main!(benches);
