//! LZW string table.
//!
//! Strings are stored as `(prefix code, suffix byte)` pairs in one growable
//! arena addressed by code. A clear code truncates the arena back to the 256
//! literals and the two control codes; entries are never removed otherwise.

use std::collections::HashMap;

use crate::config::{CLEAR_CODE, FIRST_CODE};

/// Prefix of a literal entry.
const NO_PREFIX: u16 = u16::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    prefix: u16,
    suffix: u8,
    /// First byte of the expansion.
    first: u8,
    /// Length of the expansion in bytes.
    len: u16,
}

/// Decoder side string table.
#[derive(Debug)]
pub(crate) struct StringTable {
    entries: Vec<Entry>,
}

impl StringTable {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        for byte in 0..=u8::MAX {
            entries.push(Entry {
                prefix: NO_PREFIX,
                suffix: byte,
                first: byte,
                len: 1,
            });
        }
        // Clear and end-of-information expand to nothing.
        for _ in CLEAR_CODE..FIRST_CODE {
            entries.push(Entry {
                prefix: NO_PREFIX,
                suffix: 0,
                first: 0,
                len: 0,
            });
        }
        Self { entries }
    }

    pub(crate) fn reset(&mut self) {
        self.entries.truncate(usize::from(FIRST_CODE));
    }

    /// Number of codes in use, control codes included.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, code: u16) -> bool {
        usize::from(code) < self.entries.len()
    }

    pub(crate) fn first_byte(&self, code: u16) -> u8 {
        self.entries[usize::from(code)].first
    }

    /// Append `prefix`'s expansion followed by `suffix`.
    pub(crate) fn push(&mut self, prefix: u16, suffix: u8) {
        let parent = self.entries[usize::from(prefix)];
        self.entries.push(Entry {
            prefix,
            suffix,
            first: parent.first,
            len: parent.len.saturating_add(1),
        });
    }

    /// Append the expansion of `code` to `out`.
    pub(crate) fn expand_into(&self, code: u16, out: &mut Vec<u8>) {
        let len = usize::from(self.entries[usize::from(code)].len);
        let start = out.len();
        out.resize(start + len, 0);
        let mut code = code;
        for slot in out[start..].iter_mut().rev() {
            let entry = self.entries[usize::from(code)];
            *slot = entry.suffix;
            code = entry.prefix;
        }
    }
}

/// Encoder side table mapping `(prefix, byte)` to the code of the longer
/// string.
#[derive(Debug)]
pub(crate) struct EncodeTable {
    codes: HashMap<(u16, u8), u16>,
    next_code: u16,
}

impl EncodeTable {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            codes: HashMap::with_capacity(capacity),
            next_code: FIRST_CODE,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.codes.clear();
        self.next_code = FIRST_CODE;
    }

    /// Number of codes in use, control codes included.
    pub(crate) fn len(&self) -> usize {
        usize::from(self.next_code)
    }

    pub(crate) fn find(&self, prefix: u16, byte: u8) -> Option<u16> {
        self.codes.get(&(prefix, byte)).copied()
    }

    pub(crate) fn push(&mut self, prefix: u16, byte: u8) {
        self.codes.insert((prefix, byte), self.next_code);
        self.next_code += 1;
    }

    /// Account for the entry a decoder adds after the final code.
    pub(crate) fn bump(&mut self) {
        self.next_code += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        let table = StringTable::new(4096);
        assert_eq!(table.len(), 258);
        let mut out = Vec::new();
        table.expand_into(b'x' as u16, &mut out);
        assert_eq!(out, b"x");
        table.expand_into(CLEAR_CODE, &mut out);
        assert_eq!(out, b"x");
    }

    #[test]
    fn test_chain_expansion() {
        let mut table = StringTable::new(4096);
        table.push(b'a' as u16, b'b');
        table.push(258, b'c');
        table.push(259, b'd');
        let mut out = b"<".to_vec();
        table.expand_into(260, &mut out);
        assert_eq!(out, b"<abcd");
        assert_eq!(table.first_byte(260), b'a');
        assert!(table.contains(260));
        assert!(!table.contains(261));

        table.reset();
        assert_eq!(table.len(), 258);
        assert!(!table.contains(258));
    }

    #[test]
    fn test_encode_table() {
        let mut table = EncodeTable::new(4096);
        assert_eq!(table.find(1, 2), None);
        table.push(1, 2);
        assert_eq!(table.find(1, 2), Some(258));
        assert_eq!(table.len(), 259);
        table.reset();
        assert_eq!(table.find(1, 2), None);
        assert_eq!(table.len(), 258);
    }
}
