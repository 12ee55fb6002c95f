//! Metadata tokens embedded in the instruction stream.
//!
//! A token is a 32-bit value whose high byte names the metadata table (or the user
//! string heap, `0x70`) and whose low 24 bits are the row. Instructions such as `call`,
//! `ldfld`, `ldstr` or `calli` carry one as their operand; the decoder hands it to a
//! [`crate::TokenResolver`] without interpreting it.

use std::fmt;

/// A 32-bit metadata token (ECMA-335 II.22).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Create a token from its raw value
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Token(value)
    }

    /// The raw 32-bit value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The table id stored in the high byte
    #[must_use]
    pub const fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The 1-based row index stored in the low 24 bits
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// `true` for the nil token
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.row() == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_and_row() {
        let token = Token::new(0x0A00_0012);
        assert_eq!(token.value(), 0x0A00_0012);
        assert_eq!(token.table(), 0x0A);
        assert_eq!(token.row(), 0x12);
        assert!(!token.is_null());
    }

    #[test]
    fn null_token() {
        assert!(Token::new(0).is_null());
        assert!(Token::new(0x0200_0000).is_null());
    }

    #[test]
    fn user_string() {
        let token = Token::new(0x7000_0001);
        assert_eq!(token.table(), 0x70);
        assert_eq!(token.row(), 1);
    }

    #[test]
    fn conversions() {
        let token: Token = 0x0600_0001_u32.into();
        let raw: u32 = token.into();
        assert_eq!(raw, 0x0600_0001);
    }

    #[test]
    fn display_and_debug() {
        let token = Token(0x0600_0001);
        assert_eq!(format!("{token}"), "0x06000001");

        let debug = format!("{token:?}");
        assert!(debug.contains("Token(0x06000001"));
        assert!(debug.contains("table: 0x06"));
        assert!(debug.contains("row: 1"));
    }
}
