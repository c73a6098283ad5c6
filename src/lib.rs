//! A bounded-capacity streaming XML reader, plus a schema-mining pass over
//! its event stream.
//!
//! ## Description
//!
//! - [`interner`]: a process-wide string-to-token-id table shared by the
//!   reader and the miner.
//! - [`reader`]: [`reader::Reader`], a pull parser. Every buffer it owns is
//!   fixed-capacity ([`limits`]); it never reallocates mid-document.
//! - [`miner`]: [`miner::Miner`], which observes a reader's event stream
//!   across one or more documents and classifies each tag as a struct,
//!   enum, number or string.
//! - [`driver`]: statistics shared by the two CLI front-ends (`xread`,
//!   `xmine`).
//!
//! ## Example
//!
//! ```no_run
//! use xstruct::interner::Interner;
//! use xstruct::reader::{Event, Reader};
//!
//! let mut interner = Interner::new();
//! let mut reader = Reader::from_file("doc.xml", &mut interner, std::io::stderr())
//!     .expect("open doc.xml");
//!
//! loop {
//!     match reader.bump() {
//!         Event::Open => println!("open depth={}", reader.depth()),
//!         Event::Text => println!("text={:?}", reader.text()),
//!         Event::Close => println!("close depth={}", reader.depth()),
//!         Event::Eof => break,
//!     }
//! }
//! ```

pub mod diagnostics;
pub mod driver;
pub mod errors;
pub mod escape;
pub mod fixed;
pub mod interner;
pub mod limits;
pub mod location;
pub mod miner;
pub mod namespace;
pub mod reader;

pub use errors::{Error, Result};
pub use interner::Interner;
pub use reader::{Event, Reader};
