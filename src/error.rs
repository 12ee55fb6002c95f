use std::fmt;

use thiserror::Error;

use crate::metadata::token::Token;

/// Builds an [`Error::UnsupportedMemberKind`] and records the rejection in the log.
macro_rules! unsupported_error {
    ($kind:expr) => {{
        let kind: crate::MemberKind = $kind;
        log::warn!("refusing to format unsupported member kind: {}", kind);
        crate::Error::UnsupportedMemberKind(kind)
    }};
}

/// Builds an [`Error::UnexpectedEndOfStream`] for the instruction starting at `offset`.
macro_rules! eos_error {
    ($offset:expr) => {
        crate::Error::UnexpectedEndOfStream { offset: $offset }
    };
}

/// Member kinds that the formatters recognise but cannot render yet.
///
/// Encountering one of these is an explicit, documented limitation of the declaration
/// and reference formatters, surfaced through [`Error::UnsupportedMemberKind`] instead of
/// being skipped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    /// A field declaration or a field reference operand
    Field,
    /// An event declaration
    Event,
    /// A property declaration
    Property,
    /// An instance or type constructor declaration
    Constructor,
    /// A type nested inside another type
    #[strum(serialize = "nested type")]
    NestedType,
    /// A method implemented through P/Invoke
    #[strum(serialize = "pinvoke method")]
    PInvoke,
}

/// Which capability of a [`crate::TokenResolver`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LookupKind {
    /// `resolve_member`
    Member,
    /// `resolve_string`
    String,
    /// `resolve_signature`
    Signature,
}

/// Error reported by a [`crate::TokenResolver`] when a token cannot be mapped.
///
/// The decoder never retries or substitutes a placeholder; the error is wrapped into
/// [`Error::UnresolvedToken`] together with the offset of the failing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    /// The token that could not be resolved
    pub token: Token,
    /// The lookup that was attempted
    pub kind: LookupKind,
}

impl ResolutionError {
    /// Create a new resolution error for `token`
    #[must_use]
    pub fn new(token: Token, kind: LookupKind) -> Self {
        ResolutionError { token, kind }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no {} is known for token {}", self.kind, self.token)
    }
}

impl std::error::Error for ResolutionError {}

/// The generic Error type, which covers every failure this library can return.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::UnknownOpcode`] - The stream contains a byte sequence that is not a defined opcode
/// - [`Error::UnexpectedEndOfStream`] - An opcode or operand claims more bytes than remain
/// - [`Error::UnresolvedToken`] - The token resolver rejected an embedded token
/// - [`Error::InvalidBranchTarget`] - A branch displacement does not land on an instruction
///
/// All decoding errors are fatal to the current decode call. No partial instruction list is
/// returned, since later offsets cannot be trusted once the cursor lost synchronisation.
///
/// ## Formatting Errors
/// - [`Error::UnsupportedMemberKind`] - A member kind the formatters deliberately do not render
/// - [`Error::FileError`] - The output sink failed
///
/// # Examples
///
/// ```rust
/// use cilfmt::{decode, Error, MapResolver};
///
/// match decode(&[0x00, 0xFF], &MapResolver::new()) {
///     Err(Error::UnknownOpcode { offset, value }) => {
///         assert_eq!(offset, 1);
///         assert_eq!(value, 0xFF);
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The byte (or `0xFE`-prefixed byte pair) at `offset` is not a defined opcode.
    ///
    /// For extended opcodes `value` carries both bytes, e.g. `0xFE08`.
    #[error("Unknown opcode 0x{value:02X} at offset {offset}")]
    UnknownOpcode {
        /// Offset of the first opcode byte
        offset: usize,
        /// The raw opcode value
        value: u16,
    },

    /// The instruction starting at `offset` is truncated.
    #[error("Unexpected end of stream in instruction at offset {offset}")]
    UnexpectedEndOfStream {
        /// Offset of the truncated instruction
        offset: usize,
    },

    /// The token embedded in the instruction at `offset` could not be resolved.
    #[error("Unresolved token {token} in instruction at offset {offset}: {source}")]
    UnresolvedToken {
        /// Offset of the instruction carrying the token
        offset: usize,
        /// The raw token
        token: Token,
        /// The error reported by the resolver
        source: ResolutionError,
    },

    /// The branch at `offset` targets a location that is not the start of an instruction.
    ///
    /// `target` is the absolute position computed from the displacement and may be negative.
    #[error("Branch at offset {offset} targets {target}, which is not an instruction boundary")]
    InvalidBranchTarget {
        /// Offset of the branching instruction
        offset: usize,
        /// The computed absolute target
        target: i64,
    },

    /// A member kind that the formatters do not support was encountered.
    #[error("Formatting of {0} members is not supported")]
    UnsupportedMemberKind(MemberKind),

    /// An out of bound access was attempted while reading the byte stream.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The output sink reported an I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
