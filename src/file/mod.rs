//! Raw byte access for instruction streams.
//!
//! - [`crate::file::parser::Parser`] - cursor over the bytes of one method body
//! - [`crate::file::io`] - little-endian primitive decoding shared by the parser
//!
//! Acquiring the bytes of a method body (from a PE image, a live runtime, ...) is the
//! host's job; everything in here works on a plain `&[u8]`.

pub mod io;
pub mod parser;
