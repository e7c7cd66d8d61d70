//! The per-file character map: a fixed 3072-slot table of `u16` code points
//! (or "jump bucket" indices) used to compress a language pack's non-ASCII
//! alphabet into 1- or 2-byte codes. Indices below 0x80 are reserved for
//! ASCII; a slot holding a small bucket number means the next byte picks an
//! offset within that bucket instead of naming a character directly.

use crate::error::{GlobalPackError, Result};

/// Total slot count of the fixed-size table the game's format always
/// allocates, regardless of how many of those slots are actually in use.
pub const ENTRY_TABLE_LEN: usize = 3072;

/// Indices below this are reserved for ASCII and never read during decode.
const RESERVED_LEN: u16 = 0x80;

/// Code points at or above this value can never be placed in a map; they
/// collide with the bucket-index encoding space.
const ENCODE_CEILING: u32 = 0xFF80;

/// Controls how strictly [`CharMap::decode`] treats a two-byte escape whose
/// second byte doesn't have its high bit set. `strict = true` (the default)
/// reports it as [`GlobalPackError::UnmappableByte`]; `strict = false`
/// un-consumes the byte and reprocesses it as a fresh, single-byte code unit
/// instead, for bug-for-bug compatibility with older packs.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub strict: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// A parsed or freshly-built character map.
#[derive(Debug, Clone)]
pub struct CharMap {
    entry_table: [u16; ENTRY_TABLE_LEN],
    num_entries: i32,
}

impl CharMap {
    /// Wraps an already-decoded entry table, as read by the parser.
    pub fn from_raw(entry_table: [u16; ENTRY_TABLE_LEN], num_entries: i32) -> Self {
        Self {
            entry_table,
            num_entries,
        }
    }

    pub fn entry_table(&self) -> &[u16; ENTRY_TABLE_LEN] {
        &self.entry_table
    }

    pub fn num_entries(&self) -> i32 {
        self.num_entries
    }

    /// Builds a fresh map from an arbitrary set of non-ASCII code points.
    /// ASCII code points in `chars` are dropped, since they never need a
    /// table entry. Duplicate code points are collapsed before layout.
    pub fn build(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set: Vec<u32> = chars
            .into_iter()
            .map(|c| c as u32)
            .filter(|&c| c >= RESERVED_LEN as u32)
            .collect();
        set.sort_unstable();
        set.dedup();
        set.sort_unstable_by(|a, b| b.cmp(a)); // descending, per format contract

        let mut entry_table = [0u16; ENTRY_TABLE_LEN];
        let mut num_entries: i32 = RESERVED_LEN as i32 + set.len() as i32;

        let mut tmp_num_entries = num_entries;
        let mut max_jump_entry = tmp_num_entries >> 7;
        if max_jump_entry >= 2 {
            tmp_num_entries += 1;
        }
        loop {
            let new_max_jump_entry = tmp_num_entries >> 7;
            if new_max_jump_entry > max_jump_entry {
                tmp_num_entries += 1;
                max_jump_entry = new_max_jump_entry;
            } else {
                break;
            }
        }

        num_entries += max_jump_entry - 1;

        let mut idx = RESERVED_LEN as usize;
        let mut bucket = max_jump_entry;
        while bucket >= 2 {
            entry_table[idx] = bucket as u16;
            idx += 1;
            bucket -= 1;
        }
        for &c in &set {
            entry_table[idx] = c as u16;
            idx += 1;
        }
        debug_assert!(idx <= ENTRY_TABLE_LEN);

        Self {
            entry_table,
            num_entries,
        }
    }

    /// Decodes an encoded byte run with the default (strict) options.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.decode_with(bytes, DecodeOptions::default())
    }

    /// Decodes an encoded byte run through this map, walking the two-level
    /// table: a single byte below 0x80 passes through as ASCII, a direct
    /// table entry yields a character, and a jump-bucket entry consumes one
    /// more byte to select an offset within that bucket.
    pub fn decode_with(&self, bytes: &[u8], opts: DecodeOptions) -> Result<String> {
        let mut out = String::new();
        let mut i = 0usize;
        while i < bytes.len() {
            let c = bytes[i];
            let start = i;
            i += 1;
            if c < RESERVED_LEN as u8 {
                out.push(c as char);
                continue;
            }

            let t = self.entry_table[c as usize];
            if t >= RESERVED_LEN {
                out.push(char_from_direct(t, start)?);
                continue;
            }
            if t == 0 {
                return Err(GlobalPackError::UnmappableByte {
                    byte: c,
                    offset: start,
                });
            }

            let Some(&n) = bytes.get(i) else {
                return Err(GlobalPackError::UnmappableByte {
                    byte: c,
                    offset: start,
                });
            };
            if n < 0x80 {
                if opts.strict {
                    return Err(GlobalPackError::UnmappableByte {
                        byte: n,
                        offset: i,
                    });
                }
                // Un-consume the second byte; reprocess it as a fresh code unit.
                continue;
            }
            i += 1;

            let idx = 128usize * (t as usize - 1) + n as usize;
            let value = *self.entry_table.get(idx).ok_or(GlobalPackError::UnmappableByte {
                byte: n,
                offset: start,
            })?;
            out.push(char_from_direct(value, start)?);
        }
        Ok(out)
    }

    /// Encodes a string through this map, emitting one byte per character
    /// that has a direct slot and two bytes (bucket lead, then in-bucket
    /// offset) for characters that only exist behind a jump entry.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(s.len());
        for ch in s.chars() {
            let c = ch as u32;
            if c >= ENCODE_CEILING {
                return Err(GlobalPackError::UnmappableCharacter {
                    ch,
                    string: s.to_string(),
                });
            }
            if c < RESERVED_LEN as u32 {
                out.push(c as u8);
                continue;
            }

            let target = c as u16;
            let idx = self.find_slot(target, RESERVED_LEN as usize).ok_or(
                GlobalPackError::UnmappableCharacter {
                    ch,
                    string: s.to_string(),
                },
            )?;

            if idx < 256 {
                out.push(idx as u8);
            } else {
                let bucket = (idx >> 7) as u16;
                let off = 128 + (idx & 0x7F);
                let lead = self.find_slot(bucket, RESERVED_LEN as usize).ok_or(
                    GlobalPackError::UnmappableCharacter {
                        ch,
                        string: s.to_string(),
                    },
                )?;
                out.push(lead as u8);
                out.push(off as u8);
            }
        }
        Ok(out)
    }

    /// First index in `[from..num_entries)` whose slot equals `value`.
    fn find_slot(&self, value: u16, from: usize) -> Option<usize> {
        let end = self.num_entries.max(0) as usize;
        (from..end.min(ENTRY_TABLE_LEN)).find(|&i| self.entry_table[i] == value)
    }
}

fn char_from_direct(value: u16, offset: usize) -> Result<char> {
    char::from_u32(value as u32).ok_or(GlobalPackError::UnmappableByte {
        byte: value as u8,
        offset,
    })
}
