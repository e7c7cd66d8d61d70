//! The language-pack codec: character map, parser, writer, and the pack
//! data model. Pure data transformations over owned byte buffers — no I/O,
//! no shared state, safe to run on different packs from different threads.

pub mod charmap;
pub mod error;
pub mod model;
pub mod parser;
pub mod writer;

pub use charmap::{CharMap, DecodeOptions};
pub use error::{GlobalPackError, Result};
pub use model::{Entry, Pack};
pub use parser::parse_file;
pub use writer::save_file;

pub use globalpack_core::bin_hash;
