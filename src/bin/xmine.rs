//! Schema miner driver: reads a newline-separated list of document paths
//! from standard input, mines all of them into one shared tag table, then
//! renders a struct/enum declaration per representative tag.
//!
//! Grounded on `main.cpp`'s file loop (first file with errors stops the
//! whole run) and its classification/rendering pass.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use xstruct::driver::Stats;
use xstruct::interner::{Interner, Token};
use xstruct::miner::{Classified, Kind, Miner};
use xstruct::reader::{Event, Reader};

fn member_type_name(by_tag: &BTreeMap<Token, &Classified>, interner: &Interner, member: Token) -> String {
    match by_tag.get(&member) {
        Some(c) if c.kind == Kind::Number => "type_NUMBER".to_string(),
        Some(c) if c.kind == Kind::String => "type_STRING".to_string(),
        Some(c) if c.kind == Kind::Enum => {
            format!("/*enum*/ type_{}", String::from_utf8_lossy(interner.name_const(c.same_as)))
        }
        Some(c) => format!("/*struct*/ type_{}", String::from_utf8_lossy(interner.name_const(c.same_as))),
        None => "type_unknown".to_string(),
    }
}

fn render(classified: &[Classified], interner: &Interner, mut out: impl Write) -> io::Result<()> {
    let by_tag: BTreeMap<Token, &Classified> = classified.iter().map(|c| (c.tag, c)).collect();

    for c in classified {
        if !c.is_representative {
            continue;
        }
        let name = String::from_utf8_lossy(interner.name_const(c.tag));
        match c.kind {
            Kind::Struct => {
                writeln!(out, "struct type_{} {{", name)?;
                for &m in &c.members {
                    let member_name = String::from_utf8_lossy(interner.name_const(m));
                    writeln!(out, "    {} {};", member_type_name(&by_tag, interner, m), member_name)?;
                }
                writeln!(out, "}};")?;
            }
            Kind::Enum => {
                writeln!(out, "enum type_{} {{", name)?;
                for &m in &c.members {
                    writeln!(out, "    val_{},", String::from_utf8_lossy(interner.name_const(m)))?;
                }
                writeln!(out, "}};")?;
            }
            Kind::Number | Kind::String => {
                // leaf kinds have no declaration of their own; referenced
                // via type_NUMBER/type_STRING at the point of use.
            }
        }
    }
    Ok(())
}

fn main() {
    let mut interner = Interner::new();
    let mut miner = Miner::new(&mut interner);
    let mut stats = Stats::new();
    let mut total_errors = 0u32;

    for line in io::stdin().lock().lines() {
        let path = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let path = path.trim();
        if path.is_empty() {
            continue;
        }

        let mut reader = match Reader::from_file(path, &mut interner, io::stderr()) {
            Ok(reader) => reader,
            Err(e) => {
                eprintln!("file \"{}\" {}", path, e);
                std::process::exit(1);
            }
        };

        loop {
            let event = reader.bump();
            stats.observe(&reader);
            match event {
                Event::Open => miner.on_open(&mut reader),
                Event::Text => miner.on_text(&mut reader),
                Event::Close => miner.on_close(),
                Event::Eof => break,
            }
        }

        let errors = reader.errors();
        stats.finish_file(errors);
        total_errors += errors;
        if total_errors != 0 {
            break;
        }
    }

    let classified = miner.classify();
    let _ = render(&classified, &interner, io::stdout());

    let _ = stats.report(io::stderr(), &interner);
    std::process::exit(if total_errors != 0 { 1 } else { 0 });
}
