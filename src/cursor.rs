/// A sequence of code points with a single mutable read cursor.
///
/// A sequence of length `n` has `n + 1` cursor positions, numbered `0..=n`.
/// The sequence never moves its own cursor. Only the matcher does, and only
/// the matcher and index-anchored epsilon transitions read it.
pub trait CursorIntSequence {
    /// Returns the number of code points in this sequence.
    fn int_length(&self) -> usize;

    /// Returns the code point at `index`, where `index < int_length()`.
    fn get_int(&self, index: usize) -> u32;

    /// Returns the current cursor position.
    fn cursor_index(&self) -> usize;

    /// Moves the cursor to `index`, where `index <= int_length()`.
    fn set_cursor_index(&mut self, index: usize);
}

/// An owned sequence of decoded code points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodePoints {
    values: Vec<u32>,
    cursor: usize,
}

impl CodePoints {
    /// Create a sequence over raw code point values.
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Decode UTF-16 code units into code points.
    ///
    /// Surrogate pairs are combined. An unpaired surrogate is kept as its raw
    /// unit value so that it can still be matched by a predicate.
    pub fn from_utf16(units: &[u16]) -> Self {
        let values = char::decode_utf16(units.iter().copied())
            .map(|r| r.map_or_else(|e| u32::from(e.unpaired_surrogate()), u32::from))
            .collect();
        Self::new(values)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }
}

impl From<&str> for CodePoints {
    fn from(s: &str) -> Self {
        Self::new(s.chars().map(u32::from).collect())
    }
}

impl From<&[char]> for CodePoints {
    fn from(chars: &[char]) -> Self {
        Self::new(chars.iter().map(|&c| u32::from(c)).collect())
    }
}

impl From<Vec<u32>> for CodePoints {
    fn from(values: Vec<u32>) -> Self {
        Self::new(values)
    }
}

impl CursorIntSequence for CodePoints {
    fn int_length(&self) -> usize {
        self.values.len()
    }

    fn get_int(&self, index: usize) -> u32 {
        self.values[index]
    }

    fn cursor_index(&self) -> usize {
        self.cursor
    }

    fn set_cursor_index(&mut self, index: usize) {
        debug_assert!(index <= self.values.len(), "cursor {} out of range", index);
        self.cursor = index;
    }
}
