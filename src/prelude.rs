//! # cilfmt Prelude
//!
//! Re-exports the types needed to decode and format a method body in one import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilfmt operations
pub use crate::Error;

/// The result type used throughout cilfmt
pub use crate::Result;

// ================================================================================================
// Decoding
// ================================================================================================

pub use crate::disassembler::{
    decode, decode_instruction, decode_stream, FlowControl, Instruction, OpCode, Operand,
    OperandKind,
};

/// Byte cursor for incremental decoding
pub use crate::Parser;

// ================================================================================================
// Token Resolution
// ================================================================================================

pub use crate::metadata::{
    reference::{FieldRef, MemberRef, MethodKind, MethodRef, MethodSignature, TypeRef},
    resolver::{MapResolver, TokenResolver},
    token::Token,
};

// ================================================================================================
// Formatting
// ================================================================================================

pub use crate::formatter::{
    DeclarationFormatter, FormatterOptions, InstructionFormatter, MethodDecl, TypeDecl,
};

pub use crate::{disassemble, disassemble_to_string};
