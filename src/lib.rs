// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # cilfmt
//!
//! A decoder and ILDasm-style formatter for CIL (Common Intermediate Language) method bodies.
//!
//! `cilfmt` takes the raw bytes of one method body, decodes them into typed
//! [`disassembler::Instruction`]s and renders them as text, either as a bare listing or
//! wrapped into `.assembly` / `.class` / `.method` declarations. It does not read PE files
//! or metadata tables itself: every token embedded in the bytecode is handed to a
//! [`TokenResolver`] supplied by the host.
//!
//! ## Features
//!
//! - **Complete opcode table** - every ECMA-335 opcode, including the `0xFE` extended set
//! - **Strict decoding** - truncated operands, unknown opcodes, unresolved tokens and
//!   branches into the middle of an instruction are all reported as errors
//! - **ILDasm notation** - primitive spellings, `[assembly]Type` references, `!0`/`!!0`
//!   generic parameters and `instance` call signatures
//! - **Streaming output** - any [`std::io::Write`] sink, line by line
//!
//! ## Quick Start
//!
//! ```rust
//! use cilfmt::{
//!     disassemble_to_string,
//!     formatter::FormatterOptions,
//!     metadata::reference::{MethodRef, TypeRef},
//!     MapResolver, Token,
//! };
//!
//! let resolver = MapResolver::new()
//!     .with_string(Token::new(0x7000_0001), "Hello, World!")
//!     .with_method(
//!         Token::new(0x0A00_0001),
//!         MethodRef::new(
//!             TypeRef::named("System.Console", "System.Console"),
//!             "WriteLine",
//!             TypeRef::system("System.Void"),
//!         )
//!         .with_parameters(vec![TypeRef::system("System.String")]),
//!     );
//!
//! let body = [
//!     0x72, 0x01, 0x00, 0x00, 0x70, // ldstr
//!     0x28, 0x01, 0x00, 0x00, 0x0A, // call
//!     0x2A, // ret
//! ];
//!
//! let text = disassemble_to_string(&body, &resolver, FormatterOptions::compact())?;
//! assert_eq!(
//!     text,
//!     "00: ldstr \"Hello, World!\"\n\
//!      05: call void [System.Console]System.Console::WriteLine(string)\n\
//!      10: ret\n"
//! );
//! # Ok::<(), cilfmt::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`disassembler`] - opcode table and the decoder
//! - [`formatter`] - reference, instruction and declaration formatters
//! - [`metadata`] - tokens, reference descriptors and the [`TokenResolver`] seam
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: `debug` for decode
//! summaries, `trace` for every decoded instruction and `warn` when input is rejected. No
//! logger is installed by the library.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. Decoding never returns partial results.

use std::io::Write;

#[macro_use]
pub(crate) mod error;

/// Bounds-checked little-endian access to raw method body bytes
pub mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use cilfmt::prelude::*;
///
/// let instructions = decode(&[0x00, 0x2A], &MapResolver::new())?;
/// assert_eq!(instructions.len(), 2);
/// # Ok::<(), cilfmt::Error>(())
/// ```
pub mod prelude;

/// Instruction decoding based on ECMA-335 Partition III
///
/// - [`disassembler::OpCode`] / [`disassembler::lookup`] - the opcode table
/// - [`disassembler::decode_instruction`] - decode a single instruction
/// - [`disassembler::decode_stream`] - decode the remainder of a [`Parser`]
pub mod disassembler;

/// Rendering of instructions, references and declarations as text
pub mod formatter;

/// Metadata tokens, resolved references and the resolver seam
pub mod metadata;

/// `cilfmt` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use error::{Error, LookupKind, MemberKind, ResolutionError};

/// Byte cursor used by the decoder.
///
/// # Example
///
/// ```rust
/// use cilfmt::{disassembler::decode_instruction, MapResolver, Parser};
/// let code = [0x2A]; // ret
/// let mut parser = Parser::new(&code);
/// let instr = decode_instruction(&mut parser, &MapResolver::new())?;
/// assert_eq!(instr.mnemonic(), "ret");
/// # Ok::<(), cilfmt::Error>(())
/// ```
pub use file::parser::Parser;

pub use disassembler::decode;
pub use metadata::{
    resolver::{MapResolver, TokenResolver},
    token::Token,
};

/// Decodes `bytes` and writes the instruction listing to `sink`.
///
/// # Errors
/// Returns any decoding error from [`decode`], or a formatting error from
/// [`formatter::InstructionFormatter::format`].
pub fn disassemble<R, W>(
    bytes: &[u8],
    resolver: &R,
    options: formatter::FormatterOptions,
    sink: W,
) -> Result<()>
where
    R: TokenResolver + ?Sized,
    W: Write,
{
    let instructions = decode(bytes, resolver)?;
    formatter::InstructionFormatter::new(options).format(&instructions, sink)
}

/// Decodes `bytes` and returns the instruction listing as a `String`.
///
/// # Errors
/// Same as [`disassemble`].
pub fn disassemble_to_string<R>(
    bytes: &[u8],
    resolver: &R,
    options: formatter::FormatterOptions,
) -> Result<String>
where
    R: TokenResolver + ?Sized,
{
    let instructions = decode(bytes, resolver)?;
    formatter::InstructionFormatter::new(options).format_to_string(&instructions)
}
