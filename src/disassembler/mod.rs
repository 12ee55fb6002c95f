//! CIL (Common Intermediate Language) instruction decoding.
//!
//! This module turns the raw bytes of a method body into an ordered list of
//! [`Instruction`]s, with operands decoded, tokens resolved and branch targets converted to
//! absolute offsets.
//!
//! # Key Types
//! - [`OpCode`] - Static descriptor of an opcode (mnemonic, operand shape, flow class)
//! - [`Instruction`] - A decoded instruction
//! - [`Operand`] - The decoded operand payload
//! - [`FlowControl`] - How an instruction affects control flow
//!
//! # Main Functions
//! - [`decode_instruction`] - Decode a single instruction
//! - [`decode_stream`] - Decode the rest of a [`crate::Parser`]
//! - [`lookup`] - Find an opcode by value
//!
//! # Example
//! ```rust
//! use cilfmt::{disassembler::decode_stream, MapResolver, Parser};
//!
//! let bytecode = &[0x00, 0x2A]; // nop, ret
//! let mut parser = Parser::new(bytecode);
//! let instructions = decode_stream(&mut parser, &MapResolver::new())?;
//! assert_eq!(instructions[1].mnemonic(), "ret");
//! # Ok::<(), cilfmt::Error>(())
//! ```

mod boundary;
mod decoder;
mod instruction;
mod opcodes;

pub use decoder::{decode, decode_instruction, decode_stream};
pub use instruction::{Instruction, Operand};
pub use opcodes::{
    extended, lookup, single_byte, FlowControl, OpCode, OperandKind, EXTENDED_PREFIX, OPCODES,
};
