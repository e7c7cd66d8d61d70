//! The in-memory pack: an ordered list of entries plus the character map
//! they were decoded through (or will be encoded through, for the writer).

use globalpack_core::bin_hash;

use crate::charmap::CharMap;
use crate::error::{GlobalPackError, Result};

/// One `(hash, text)` row. `original_bytes` and `offset` are diagnostic-only
/// fields retained from parsing; they play no role in identity and are
/// `None` for entries built by hand.
#[derive(Debug, Clone)]
pub struct Entry {
    pub hash: u32,
    pub text: String,
    pub original_bytes: Option<Vec<u8>>,
    pub offset: Option<u32>,
}

impl Entry {
    pub fn new(hash: u32, text: impl Into<String>) -> Self {
        Self {
            hash,
            text: text.into(),
            original_bytes: None,
            offset: None,
        }
    }
}

/// A parsed or hand-built language pack: its entries and character map.
#[derive(Debug, Clone)]
pub struct Pack {
    pub entries: Vec<Entry>,
    pub char_map: CharMap,
}

impl Pack {
    pub fn new(char_map: CharMap) -> Self {
        Self {
            entries: Vec::new(),
            char_map,
        }
    }

    pub fn find_entry_by_hash(&self, hash: u32) -> Option<&Entry> {
        self.entries.iter().find(|e| e.hash == hash)
    }

    pub fn find_entry_by_label(&self, label: &str) -> Option<&Entry> {
        self.find_entry_by_hash(bin_hash(label))
    }

    /// Inserts a new entry, failing if its label's hash already exists.
    pub fn add(&mut self, label: &str, text: impl Into<String>) -> Result<()> {
        let hash = bin_hash(label);
        if self.find_entry_by_hash(hash).is_some() {
            return Err(GlobalPackError::DuplicateHash {
                hash,
                label: label.to_string(),
            });
        }
        self.entries.push(Entry::new(hash, text));
        Ok(())
    }

    /// Removes the entry for `label`, failing if it isn't present.
    pub fn remove(&mut self, label: &str) -> Result<()> {
        let hash = bin_hash(label);
        let pos = self
            .entries
            .iter()
            .position(|e| e.hash == hash)
            .ok_or_else(|| GlobalPackError::UnknownLabel(label.to_string()))?;
        self.entries.remove(pos);
        Ok(())
    }

    /// Replaces the text of the entry for `label`, failing if it isn't
    /// present.
    pub fn edit(&mut self, label: &str, text: impl Into<String>) -> Result<()> {
        let hash = bin_hash(label);
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.hash == hash)
            .ok_or_else(|| GlobalPackError::UnknownLabel(label.to_string()))?;
        entry.text = text.into();
        Ok(())
    }
}
