//! Cursor-based byte stream reader for CIL method bodies.
//!
//! The [`Parser`] wraps the byte buffer of exactly one method body and hands out
//! little-endian primitives while tracking the current position. The instruction decoder
//! uses the position before and after each instruction to derive offsets, encoded lengths
//! and branch targets.
//!
//! # Examples
//!
//! ```rust
//! use cilfmt::Parser;
//!
//! let data = [0x2B, 0x05, 0x2A];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_le::<u8>()?, 0x2B);
//! assert_eq!(parser.read_le::<i8>()?, 5);
//! assert_eq!(parser.pos(), 2);
//! assert_eq!(parser.remaining(), 1);
//! # Ok::<(), cilfmt::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, CilIO},
    Result,
};

/// A bounds-checked reader over an in-memory instruction stream.
///
/// Every read validates that enough bytes remain and fails with
/// [`crate::Error::OutOfBounds`] otherwise, leaving the position unchanged.
pub struct Parser<'a> {
    /// The bytes being decoded
    data: &'a [u8],
    /// Current position within `data`
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if at least one unread byte remains.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of bytes between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Get the current position of the cursor.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Peek at the next byte without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the cursor is at the end of the buffer.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(crate::Error::OutOfBounds)
    }

    /// Read a little-endian `T` and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn sequential_reads() {
        let data = [0x20, 0x2A, 0x00, 0x00, 0x00, 0x2A];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.len(), 6);
        assert_eq!(parser.read_le::<u8>().unwrap(), 0x20);
        assert_eq!(parser.read_le::<i32>().unwrap(), 42);
        assert_eq!(parser.pos(), 5);
        assert!(parser.has_more_data());
        assert_eq!(parser.remaining(), 1);
        assert_eq!(parser.peek_byte().unwrap(), 0x2A);
        assert_eq!(parser.pos(), 5);
    }

    #[test]
    fn truncated_read_keeps_position() {
        let data = [0x21, 0x01, 0x02];
        let mut parser = Parser::new(&data);
        parser.read_le::<u8>().unwrap();

        assert!(matches!(parser.read_le::<i64>(), Err(Error::OutOfBounds)));
        assert_eq!(parser.pos(), 1);
    }

    #[test]
    fn empty_buffer() {
        let parser = Parser::new(&[]);

        assert!(parser.is_empty());
        assert!(!parser.has_more_data());
        assert_eq!(parser.remaining(), 0);
        assert!(matches!(parser.peek_byte(), Err(Error::OutOfBounds)));
    }
}
