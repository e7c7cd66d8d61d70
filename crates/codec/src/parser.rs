//! Reads a whole `*_Global.bin` buffer into a [`Pack`]: header, hash/offset
//! table, strings region, and character-map chunk.

use std::io::Cursor;

use binrw::{BinRead, BinReaderExt};
use globalpack_core::{decode_xor, is_obfuscated};

use crate::charmap::{CharMap, ENTRY_TABLE_LEN};
use crate::error::{GlobalPackError, Result};
use crate::model::{Entry, Pack};

const FIXED_HEADER_LEN: usize = 36;
const SENTINEL: &[u8] = b"Global";

#[derive(BinRead, Debug)]
#[br(little)]
struct LangHeader {
    magic: u32,
    chunk_len: u32,
    entry_count: u32,
    hash_table_offset: u32,
    strings_start: u32,
    tag: [u8; 16],
}

#[derive(BinRead, Debug)]
#[br(little)]
struct CharMapChunkHeader {
    magic: u32,
    size: u32,
    num_entries: i32,
}

/// Parses a whole language-pack buffer, auto-detecting and reversing the
/// file-level XOR obfuscation first if needed.
pub fn parse_file(bytes: &[u8]) -> Result<Pack> {
    let owned;
    let data: &[u8] = if is_obfuscated(bytes) {
        owned = decode_xor(bytes);
        &owned
    } else {
        bytes
    };

    if data.len() < FIXED_HEADER_LEN {
        return Err(GlobalPackError::MalformedHeader(format!(
            "buffer is {} bytes, shorter than the {FIXED_HEADER_LEN}-byte fixed header",
            data.len()
        )));
    }

    let mut cursor = Cursor::new(data);
    let header: LangHeader = cursor
        .read_le()
        .map_err(|e| GlobalPackError::MalformedHeader(e.to_string()))?;

    if &header.tag[0..6] != SENTINEL {
        return Err(GlobalPackError::MalformedHeader(
            "missing \"Global\" sentinel at offset 20".to_string(),
        ));
    }
    if header.hash_table_offset != 0x1C {
        return Err(GlobalPackError::MalformedHeader(format!(
            "unexpected hash_table_offset 0x{:x}, expected 0x1C",
            header.hash_table_offset
        )));
    }
    log::debug!(
        "header: entry_count={} strings_start={} chunk_len={}",
        header.entry_count,
        header.strings_start,
        header.chunk_len
    );

    let char_map = read_char_map(data, header.chunk_len as usize)?;

    let strings_region = header.strings_start as usize + 8;
    let mut entries = Vec::with_capacity(header.entry_count as usize);
    let mut offset = FIXED_HEADER_LEN;
    while offset < strings_region {
        let hash = read_u32(data, offset)?;
        let string_offset = read_u32(data, offset + 4)?;
        let abs = strings_region + string_offset as usize;
        let raw = read_cstr(data, abs)?;
        let text = char_map.decode(raw)?;
        entries.push(Entry {
            hash,
            text,
            original_bytes: Some(raw.to_vec()),
            offset: Some(string_offset),
        });
        offset += 8;
    }

    Ok(Pack { entries, char_map })
}

fn read_char_map(data: &[u8], chunk_len: usize) -> Result<CharMap> {
    let mut chunk_offset = chunk_len + 8;
    let discriminant = read_u32(data, chunk_offset)?;
    if discriminant == 0 {
        // A padding chunk; skip it to reach the real char-map chunk.
        let padding_len = read_u32(data, chunk_offset + 4)?;
        chunk_offset += padding_len as usize + 8;
        log::trace!("skipped padding chunk, char-map chunk now at {chunk_offset}");
    }

    let mut cursor = Cursor::new(data);
    cursor.set_position(chunk_offset as u64);
    let cm_header: CharMapChunkHeader = cursor
        .read_le()
        .map_err(|e| GlobalPackError::MalformedHeader(e.to_string()))?;
    log::trace!(
        "char-map chunk: magic=0x{:x} size=0x{:x} num_entries={}",
        cm_header.magic,
        cm_header.size,
        cm_header.num_entries
    );

    let mut entry_table = [0u16; ENTRY_TABLE_LEN];
    for slot in entry_table.iter_mut() {
        *slot = cursor
            .read_le()
            .map_err(|e| GlobalPackError::MalformedHeader(e.to_string()))?;
    }

    Ok(CharMap::from_raw(entry_table, cm_header.num_entries))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    let bytes = data.get(offset..offset + 4).ok_or_else(|| {
        GlobalPackError::MalformedHeader(format!("offset {offset} is out of bounds"))
    })?;
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
}

fn read_cstr(data: &[u8], offset: usize) -> Result<&[u8]> {
    let tail = data
        .get(offset..)
        .ok_or_else(|| GlobalPackError::TruncatedString { offset })?;
    let nul = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(GlobalPackError::TruncatedString { offset })?;
    Ok(&tail[..nul])
}
