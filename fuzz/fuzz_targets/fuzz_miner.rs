#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate xstruct;

use xstruct::interner::Interner;
use xstruct::miner::Miner;
use xstruct::reader::{Event, Reader};

fuzz_target!(|data: &[u8]| {
    let mut interner = Interner::new();
    let mut miner = Miner::new(&mut interner);
    let mut reader = Reader::new("fuzz.xml", data, &mut interner, Vec::new());
    loop {
        match reader.bump() {
            Event::Open => miner.on_open(&mut reader),
            Event::Text => miner.on_text(&mut reader),
            Event::Close => miner.on_close(),
            Event::Eof => break,
        }
    }
    let _ = miner.classify();
});
