//! Plain reader driver: parses one document, printing nothing but its
//! diagnostics, then dumps every interned tag name bucketed by hash slot
//! and the run's high-watermark statistics.
//!
//! Grounded on `main.c`'s `is_tag` marking and end-of-run hashtable report.

use std::env;
use std::io;

use xstruct::driver::Stats;
use xstruct::interner::Interner;
use xstruct::reader::{Event, Reader};

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| "commlib.xml".to_string());

    let mut interner = Interner::new();
    let mut stats = Stats::new();

    let mut reader = match Reader::from_file(&path, &mut interner, io::stderr()) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("file \"{}\" {}", path, e);
            std::process::exit(1);
        }
    };

    loop {
        let event = reader.bump();
        stats.observe(&reader);
        if event == Event::Eof {
            break;
        }
    }

    let errors = reader.errors();
    stats.finish_file(errors);

    for (slot, names) in interner.tags_by_slot() {
        print!("[{}]", slot);
        for name in names {
            print!(" {}", String::from_utf8_lossy(name));
        }
        println!();
    }

    let _ = stats.report(io::stderr(), &interner);
    std::process::exit(if errors != 0 { 1 } else { 0 });
}
