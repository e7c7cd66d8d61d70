//! Produces a whole `*_Global.bin` buffer from an in-memory [`Pack`] plus its
//! accompanying labels pack.

use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use globalpack_core::encode_xor;
use log::warn;

use crate::charmap::{CharMap, ENTRY_TABLE_LEN};
use crate::error::Result;
use crate::model::Pack;

const LANG_MAGIC: u32 = 0x39000;
const HASH_TABLE_OFFSET: u32 = 0x1C;
const CHAR_MAP_MAGIC: u32 = 0x39001;
const CHAR_MAP_CHUNK_SIZE: u32 = 0x1804;
const FIXED_HEADER_LEN: usize = 36;

struct Row {
    hash: u32,
    label: String,
    encoded: Vec<u8>,
    string_offset: u32,
}

/// Serializes `pack` into a byte-exact `*_Global.bin` layout, looking up
/// each entry's human-readable label in `labels` by hash. A fresh
/// [`CharMap`] is built from `pack`'s current strings on every call.
pub fn save_file(pack: &Pack, labels: &Pack, obfuscate: bool) -> Result<Vec<u8>> {
    let char_map = CharMap::build(pack.entries.iter().flat_map(|e| e.text.chars()));

    let mut rows = Vec::with_capacity(pack.entries.len());
    for entry in &pack.entries {
        let encoded = char_map.encode(&entry.text)?;
        let label = match labels.find_entry_by_hash(entry.hash) {
            Some(l) => l.text.clone(),
            None => {
                warn!(
                    "no label found for hash 0x{:08x}; writing an empty label",
                    entry.hash
                );
                String::new()
            }
        };
        rows.push(Row {
            hash: entry.hash,
            label,
            encoded,
            string_offset: 0,
        });
    }

    let n = rows.len();
    let strings_len: usize = rows.iter().map(|r| r.encoded.len() + 1).sum();
    let mut lang_len = FIXED_HEADER_LEN + 8 * n + strings_len;
    lang_len += 4 - (lang_len % 4);

    let mut padding_len = 16 - (lang_len % 16);
    if padding_len < 8 {
        padding_len += 16;
    }

    let total_len = lang_len + padding_len + 8 + 4 + ENTRY_TABLE_LEN * 2;
    let mut data = vec![0u8; total_len];

    {
        let mut cursor = Cursor::new(&mut data[..]);
        cursor.write_u32::<LittleEndian>(LANG_MAGIC)?;
        cursor.write_u32::<LittleEndian>((lang_len - 8) as u32)?;
        cursor.write_u32::<LittleEndian>(n as u32)?;
        cursor.write_u32::<LittleEndian>(HASH_TABLE_OFFSET)?;
        cursor.write_u32::<LittleEndian>((8 * n + 28) as u32)?;
        cursor.write_all(b"Global")?;
        // Remaining bytes of the 16-byte tag region stay zero.
    }

    // Strings are laid out in label-sorted order (a stable sort under the
    // cyclic `. <-> - <-> _` collation), but the hash/offset table that
    // points at them is laid out in hash order. Both orderings are derived
    // from the same `rows`, re-sorted in place between the two writes.
    rows.sort_by(|a, b| collation_key(&a.label).cmp(&collation_key(&b.label)));

    {
        let mut cursor = Cursor::new(&mut data[..]);
        cursor.seek(SeekFrom::Start((FIXED_HEADER_LEN + 8 * n) as u64))?;
        let mut in_offset = 0u32;
        for row in rows.iter_mut() {
            cursor.write_all(&row.encoded)?;
            cursor.write_u8(0)?;
            row.string_offset = in_offset;
            in_offset += row.encoded.len() as u32 + 1;
        }
    }

    rows.sort_by_key(|r| r.hash);

    {
        let mut cursor = Cursor::new(&mut data[..]);
        cursor.seek(SeekFrom::Start(FIXED_HEADER_LEN as u64))?;
        for row in &rows {
            cursor.write_u32::<LittleEndian>(row.hash)?;
            cursor.write_u32::<LittleEndian>(row.string_offset)?;
        }
    }

    {
        let mut cursor = Cursor::new(&mut data[..]);
        cursor.seek(SeekFrom::Start(lang_len as u64))?;
        cursor.write_u32::<LittleEndian>(0)?;
        cursor.write_u32::<LittleEndian>((padding_len - 8) as u32)?;
    }

    {
        let mut cursor = Cursor::new(&mut data[..]);
        cursor.seek(SeekFrom::Start((lang_len + padding_len) as u64))?;
        cursor.write_u32::<LittleEndian>(CHAR_MAP_MAGIC)?;
        cursor.write_u32::<LittleEndian>(CHAR_MAP_CHUNK_SIZE)?;
        cursor.write_i32::<LittleEndian>(char_map.num_entries())?;
        for &slot in char_map.entry_table() {
            cursor.write_u16::<LittleEndian>(slot)?;
        }
    }

    Ok(if obfuscate { encode_xor(&data) } else { data })
}

/// Remaps `. -> -`, `_ -> .`, `- -> _` on a lower-cased byte. Comparing two
/// labels byte-by-byte under this remap (with shorter-is-less on a common
/// prefix, which `Vec<u8>`'s `Ord` already gives us) is the game's expected
/// string ordering.
fn remap_byte(b: u8) -> u8 {
    match b {
        b'.' => b'-',
        b'_' => b'.',
        b'-' => b'_',
        other => other,
    }
}

fn collation_key(label: &str) -> Vec<u8> {
    label
        .bytes()
        .map(|b| remap_byte(b.to_ascii_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_sort_applies_cyclic_remap() {
        let mut labels = vec!["A.B", "A_B", "A-B"];
        labels.sort_by(|a, b| collation_key(a).cmp(&collation_key(b)));
        assert_eq!(labels, vec!["A-B", "A.B", "A_B"]);
    }

    #[test]
    fn collation_is_case_insensitive() {
        assert_eq!(collation_key("abc"), collation_key("ABC"));
    }

    #[test]
    fn encoding_failure_is_loud() {
        let mut pack = Pack::new(CharMap::build(std::iter::empty()));
        pack.add("BAD", "\u{FF80}").unwrap();
        let labels = Pack::new(CharMap::build(std::iter::empty()));
        let err = save_file(&pack, &labels, false).unwrap_err();
        assert!(matches!(
            err,
            crate::error::GlobalPackError::UnmappableCharacter { .. }
        ));
    }

    #[test]
    fn missing_label_falls_back_to_empty_string() {
        let mut pack = Pack::new(CharMap::build(std::iter::empty()));
        pack.add("ORPHAN", "text").unwrap();
        let labels = Pack::new(CharMap::build(std::iter::empty()));
        // Should not fail even though `labels` has no entry for ORPHAN.
        let bytes = save_file(&pack, &labels, false).unwrap();
        assert!(!bytes.is_empty());
    }
}
