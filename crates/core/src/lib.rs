//! Low-level primitives shared by the language-pack codec: the label hash
//! and the file-level XOR obfuscation stream. Neither knows anything about
//! the container layout; they operate on bytes and strings only.

pub mod hash;
pub mod obfuscate;

pub use hash::bin_hash;
pub use obfuscate::{decode_xor, encode_xor, is_obfuscated};
