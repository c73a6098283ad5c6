#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate xstruct;

use xstruct::interner::Interner;
use xstruct::reader::{Event, Reader};

fuzz_target!(|data: &[u8]| {
    let mut interner = Interner::new();
    let mut reader = Reader::new("fuzz.xml", data, &mut interner, Vec::new());
    loop {
        match reader.bump() {
            Event::Eof => break,
            _ => {}
        }
    }
});
