//! Decoded instruction representation.
//!
//! An [`Instruction`] records where it starts, how many bytes it spans, which
//! [`OpCode`] it uses and its decoded [`Operand`]. Branch displacements are already
//! turned into absolute offsets and tokens are already resolved, so an instruction is
//! self-contained and can be formatted without the resolver.

use std::slice;

use crate::{
    disassembler::opcodes::{FlowControl, OpCode},
    metadata::reference::MemberRef,
};

/// The decoded operand of an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand
    None,
    /// Signed 8-bit immediate
    Int8(i8),
    /// Unsigned 8-bit immediate, or a short argument/local index
    UInt8(u8),
    /// Signed 16-bit immediate
    Int16(i16),
    /// Argument or local variable index
    UInt16(u16),
    /// Signed 32-bit immediate
    Int32(i32),
    /// Signed 64-bit immediate
    Int64(i64),
    /// Single precision constant
    Float32(f32),
    /// Double precision constant
    Float64(f64),
    /// Absolute offset of a branch target
    Target(usize),
    /// Absolute offsets of the switch cases, in table order
    Switch(Vec<usize>),
    /// A resolved user string
    String(String),
    /// A resolved type, method or field
    Member(MemberRef),
    /// A call-site signature blob
    Signature(Vec<u8>),
}

impl Operand {
    /// `true` if the instruction has no operand
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }
}

/// A single decoded CIL instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Offset of the first opcode byte, relative to the start of the method body
    pub offset: usize,
    /// Encoded length, opcode and operand included
    pub size: usize,
    /// The opcode descriptor
    pub opcode: &'static OpCode,
    /// The decoded operand
    pub operand: Operand,
}

impl Instruction {
    /// The mnemonic, e.g. `ldstr`
    #[must_use]
    pub fn mnemonic(&self) -> &'static str {
        self.opcode.name
    }

    /// Control-flow class of the opcode
    #[must_use]
    pub fn flow(&self) -> FlowControl {
        self.opcode.flow
    }

    /// Offset of the byte right after this instruction
    #[must_use]
    pub fn next_offset(&self) -> usize {
        self.offset + self.size
    }

    /// All absolute offsets this instruction may jump to.
    ///
    /// Empty for everything but branches and `switch`. The fall-through successor of a
    /// conditional branch is not included.
    #[must_use]
    pub fn branch_targets(&self) -> &[usize] {
        match &self.operand {
            Operand::Target(target) => slice::from_ref(target),
            Operand::Switch(targets) => targets,
            _ => &[],
        }
    }

    /// `true` if execution never falls through to the next instruction
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.flow(),
            FlowControl::Branch | FlowControl::Return | FlowControl::Throw
        )
    }
}
