//! Public facade over the `*_Global.bin` language-pack codec.
//!
//! The codec itself lives in `globalpack-core` (the label hash and the
//! file's XOR obfuscation stream) and [`globalpack_codec`] (the character
//! map, parser, writer, and pack model, re-exporting the hash and
//! obfuscation primitives alongside its own); this crate re-exports the
//! surface a host tool — a CLI, a GUI editor, a JSON import/export bridge —
//! needs to parse, inspect, edit, and re-serialize a pack without depending
//! on the internal crate split.

pub use globalpack_codec::{
    bin_hash, parse_file, save_file, CharMap, DecodeOptions, Entry, GlobalPackError, Pack, Result,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_round_trips_a_pack() {
        let mut labels = Pack::new(CharMap::build(std::iter::empty()));
        labels.add("GREETING", "GREETING").unwrap();

        let mut pack = Pack::new(CharMap::build(std::iter::empty()));
        pack.add("GREETING", "Hello there").unwrap();

        let bytes = save_file(&pack, &labels, true).unwrap();
        let reparsed = parse_file(&bytes).unwrap();

        assert_eq!(
            reparsed.find_entry_by_label("GREETING").unwrap().text,
            "Hello there"
        );
    }

    #[test]
    fn facade_exposes_bin_hash() {
        assert_eq!(bin_hash(""), 0);
        assert_eq!(bin_hash("A"), 32);
    }
}
