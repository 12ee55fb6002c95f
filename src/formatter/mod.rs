//! Textual rendering of decoded instructions and declarations.
//!
//! - [`reference`] - ILDasm notation for types, methods and byte blobs
//! - [`InstructionFormatter`] - offset-prefixed instruction listings
//! - [`DeclarationFormatter`] - `.assembly` / `.class` / `.method` envelopes
//! - [`TextBuilder`] - the indentation-aware writer both formatters stream through
//!
//! # Example
//! ```rust
//! use cilfmt::{decode, formatter::{FormatterOptions, InstructionFormatter}, MapResolver};
//!
//! let instructions = decode(&[0x16, 0x2A], &MapResolver::new())?; // ldc.i4.0, ret
//! let text = InstructionFormatter::new(FormatterOptions::compact()).format_to_string(&instructions)?;
//! assert_eq!(text, "0: ldc.i4.0\n1: ret\n");
//! # Ok::<(), cilfmt::Error>(())
//! ```

mod attributes;
mod config;
mod declaration;
mod instruction;
pub mod reference;
mod text;

pub use attributes::{
    GenericParameterAttributes, MethodAttributes, MethodImplAttributes, TypeAttributes,
};
pub use config::FormatterOptions;
pub use declaration::{
    AssemblyDecl, DeclarationFormatter, GenericParameterDecl, MemberDecl, MethodDecl,
    ParameterDecl, TypeDecl,
};
pub use instruction::{format_line, format_operand, quote, InstructionFormatter};
pub use text::TextBuilder;
