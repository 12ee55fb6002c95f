//! The CIL opcode registry (ECMA-335 Partition III).
//!
//! Every defined opcode is listed once in [`OPCODES`], a literal table compiled into the
//! binary. Single-byte opcodes occupy `0x00`-`0xE0`; extended opcodes are introduced by the
//! [`EXTENDED_PREFIX`] byte `0xFE` and are stored with `value = 0xFE00 | second_byte`.
//!
//! Two 256-entry index tables are computed from [`OPCODES`] at compile time, so lookups are
//! a single array access and need no runtime initialisation or synchronisation.
//!
//! # Examples
//!
//! ```rust
//! use cilfmt::disassembler::{lookup, FlowControl, OperandKind};
//!
//! let br_s = lookup(0x2B).unwrap();
//! assert_eq!(br_s.name, "br.s");
//! assert_eq!(br_s.operand, OperandKind::ShortBranchTarget);
//! assert_eq!(br_s.flow, FlowControl::Branch);
//!
//! let ceq = lookup(0xFE01).unwrap();
//! assert!(ceq.is_extended());
//!
//! assert!(lookup(0x24).is_none());
//! ```

use std::fmt;

/// First byte of every two-byte opcode
pub const EXTENDED_PREFIX: u8 = 0xFE;

/// Shape of the operand that follows an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum OperandKind {
    /// No operand
    None,
    /// Signed 8-bit immediate (`ldc.i4.s`)
    Int8,
    /// Unsigned 8-bit immediate or short argument/local index
    UInt8,
    /// Signed 16-bit immediate
    Int16,
    /// Signed 32-bit immediate (`ldc.i4`)
    Int32,
    /// Signed 64-bit immediate (`ldc.i8`)
    Int64,
    /// IEEE-754 single (`ldc.r4`)
    Float32,
    /// IEEE-754 double (`ldc.r8`)
    Float64,
    /// Signed 8-bit displacement relative to the next instruction
    ShortBranchTarget,
    /// Signed 32-bit displacement relative to the next instruction
    LongBranchTarget,
    /// Jump table: `u32` count followed by that many `i32` displacements
    Switch,
    /// Type token
    Type,
    /// Method token
    Method,
    /// Field token
    Field,
    /// Type, method or field token (`ldtoken`)
    Tok,
    /// Standalone signature token (`calli`)
    Signature,
    /// User string token (`ldstr`)
    String,
    /// Unsigned 16-bit argument/local index
    LocalIndex,
}

impl OperandKind {
    /// Returns the encoded size of this operand in bytes.
    ///
    /// Returns `None` for [`OperandKind::Switch`], whose size depends on the case count.
    #[must_use]
    pub const fn size(&self) -> Option<usize> {
        match self {
            OperandKind::None => Some(0),
            OperandKind::Int8 | OperandKind::UInt8 | OperandKind::ShortBranchTarget => Some(1),
            OperandKind::Int16 | OperandKind::LocalIndex => Some(2),
            OperandKind::Int32
            | OperandKind::Float32
            | OperandKind::LongBranchTarget
            | OperandKind::Type
            | OperandKind::Method
            | OperandKind::Field
            | OperandKind::Tok
            | OperandKind::Signature
            | OperandKind::String => Some(4),
            OperandKind::Int64 | OperandKind::Float64 => Some(8),
            OperandKind::Switch => None,
        }
    }
}

/// How an opcode affects control flow, following the runtime's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum FlowControl {
    /// Execution continues with the next instruction
    Next,
    /// Unconditional jump (`br`, `leave`)
    Branch,
    /// Conditional jump, including `switch`
    ConditionalBranch,
    /// Method call
    Call,
    /// Leaves the method or a handler (`ret`, `endfinally`, `endfilter`)
    Return,
    /// Raises an exception
    Throw,
    /// Prefix that modifies the following instruction
    Meta,
    /// Debugger breakpoint
    Break,
}

/// Immutable descriptor of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpCode {
    /// Mnemonic as printed in disassembly, e.g. `ldloc.s`
    pub name: &'static str,
    /// `0x00`-`0xFF` for single-byte opcodes, `0xFE00 | second_byte` for extended ones
    pub value: u16,
    /// Shape of the operand
    pub operand: OperandKind,
    /// Control-flow class
    pub flow: FlowControl,
}

impl OpCode {
    /// `true` for two-byte opcodes
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        self.value > 0xFF
    }

    /// Number of bytes the opcode itself occupies (1 or 2)
    #[must_use]
    pub const fn size(&self) -> usize {
        if self.is_extended() {
            2
        } else {
            1
        }
    }

    /// `true` for `unaligned.`, `volatile.`, `tail.`, `constrained.`, `readonly.` and `no.`
    #[must_use]
    pub const fn is_prefix(&self) -> bool {
        matches!(self.flow, FlowControl::Meta)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

macro_rules! op {
    ($name:literal, $value:literal) => {
        op!($name, $value, None, Next)
    };
    ($name:literal, $value:literal, $operand:ident) => {
        op!($name, $value, $operand, Next)
    };
    ($name:literal, $value:literal, $operand:ident, $flow:ident) => {
        OpCode {
            name: $name,
            value: $value,
            operand: OperandKind::$operand,
            flow: FlowControl::$flow,
        }
    };
}

const TABLE: &[OpCode] = &[
    op!("nop", 0x00),
    op!("break", 0x01, None, Break),
    op!("ldarg.0", 0x02),
    op!("ldarg.1", 0x03),
    op!("ldarg.2", 0x04),
    op!("ldarg.3", 0x05),
    op!("ldloc.0", 0x06),
    op!("ldloc.1", 0x07),
    op!("ldloc.2", 0x08),
    op!("ldloc.3", 0x09),
    op!("stloc.0", 0x0A),
    op!("stloc.1", 0x0B),
    op!("stloc.2", 0x0C),
    op!("stloc.3", 0x0D),
    op!("ldarg.s", 0x0E, UInt8),
    op!("ldarga.s", 0x0F, UInt8),
    op!("starg.s", 0x10, UInt8),
    op!("ldloc.s", 0x11, UInt8),
    op!("ldloca.s", 0x12, UInt8),
    op!("stloc.s", 0x13, UInt8),
    op!("ldnull", 0x14),
    op!("ldc.i4.m1", 0x15),
    op!("ldc.i4.0", 0x16),
    op!("ldc.i4.1", 0x17),
    op!("ldc.i4.2", 0x18),
    op!("ldc.i4.3", 0x19),
    op!("ldc.i4.4", 0x1A),
    op!("ldc.i4.5", 0x1B),
    op!("ldc.i4.6", 0x1C),
    op!("ldc.i4.7", 0x1D),
    op!("ldc.i4.8", 0x1E),
    op!("ldc.i4.s", 0x1F, Int8),
    op!("ldc.i4", 0x20, Int32),
    op!("ldc.i8", 0x21, Int64),
    op!("ldc.r4", 0x22, Float32),
    op!("ldc.r8", 0x23, Float64),
    op!("dup", 0x25),
    op!("pop", 0x26),
    op!("jmp", 0x27, Method, Call),
    op!("call", 0x28, Method, Call),
    op!("calli", 0x29, Signature, Call),
    op!("ret", 0x2A, None, Return),
    op!("br.s", 0x2B, ShortBranchTarget, Branch),
    op!("brfalse.s", 0x2C, ShortBranchTarget, ConditionalBranch),
    op!("brtrue.s", 0x2D, ShortBranchTarget, ConditionalBranch),
    op!("beq.s", 0x2E, ShortBranchTarget, ConditionalBranch),
    op!("bge.s", 0x2F, ShortBranchTarget, ConditionalBranch),
    op!("bgt.s", 0x30, ShortBranchTarget, ConditionalBranch),
    op!("ble.s", 0x31, ShortBranchTarget, ConditionalBranch),
    op!("blt.s", 0x32, ShortBranchTarget, ConditionalBranch),
    op!("bne.un.s", 0x33, ShortBranchTarget, ConditionalBranch),
    op!("bge.un.s", 0x34, ShortBranchTarget, ConditionalBranch),
    op!("bgt.un.s", 0x35, ShortBranchTarget, ConditionalBranch),
    op!("ble.un.s", 0x36, ShortBranchTarget, ConditionalBranch),
    op!("blt.un.s", 0x37, ShortBranchTarget, ConditionalBranch),
    op!("br", 0x38, LongBranchTarget, Branch),
    op!("brfalse", 0x39, LongBranchTarget, ConditionalBranch),
    op!("brtrue", 0x3A, LongBranchTarget, ConditionalBranch),
    op!("beq", 0x3B, LongBranchTarget, ConditionalBranch),
    op!("bge", 0x3C, LongBranchTarget, ConditionalBranch),
    op!("bgt", 0x3D, LongBranchTarget, ConditionalBranch),
    op!("ble", 0x3E, LongBranchTarget, ConditionalBranch),
    op!("blt", 0x3F, LongBranchTarget, ConditionalBranch),
    op!("bne.un", 0x40, LongBranchTarget, ConditionalBranch),
    op!("bge.un", 0x41, LongBranchTarget, ConditionalBranch),
    op!("bgt.un", 0x42, LongBranchTarget, ConditionalBranch),
    op!("ble.un", 0x43, LongBranchTarget, ConditionalBranch),
    op!("blt.un", 0x44, LongBranchTarget, ConditionalBranch),
    op!("switch", 0x45, Switch, ConditionalBranch),
    op!("ldind.i1", 0x46),
    op!("ldind.u1", 0x47),
    op!("ldind.i2", 0x48),
    op!("ldind.u2", 0x49),
    op!("ldind.i4", 0x4A),
    op!("ldind.u4", 0x4B),
    op!("ldind.i8", 0x4C),
    op!("ldind.i", 0x4D),
    op!("ldind.r4", 0x4E),
    op!("ldind.r8", 0x4F),
    op!("ldind.ref", 0x50),
    op!("stind.ref", 0x51),
    op!("stind.i1", 0x52),
    op!("stind.i2", 0x53),
    op!("stind.i4", 0x54),
    op!("stind.i8", 0x55),
    op!("stind.r4", 0x56),
    op!("stind.r8", 0x57),
    op!("add", 0x58),
    op!("sub", 0x59),
    op!("mul", 0x5A),
    op!("div", 0x5B),
    op!("div.un", 0x5C),
    op!("rem", 0x5D),
    op!("rem.un", 0x5E),
    op!("and", 0x5F),
    op!("or", 0x60),
    op!("xor", 0x61),
    op!("shl", 0x62),
    op!("shr", 0x63),
    op!("shr.un", 0x64),
    op!("neg", 0x65),
    op!("not", 0x66),
    op!("conv.i1", 0x67),
    op!("conv.i2", 0x68),
    op!("conv.i4", 0x69),
    op!("conv.i8", 0x6A),
    op!("conv.r4", 0x6B),
    op!("conv.r8", 0x6C),
    op!("conv.u4", 0x6D),
    op!("conv.u8", 0x6E),
    op!("callvirt", 0x6F, Method, Call),
    op!("cpobj", 0x70, Type),
    op!("ldobj", 0x71, Type),
    op!("ldstr", 0x72, String),
    op!("newobj", 0x73, Method, Call),
    op!("castclass", 0x74, Type),
    op!("isinst", 0x75, Type),
    op!("conv.r.un", 0x76),
    op!("unbox", 0x79, Type),
    op!("throw", 0x7A, None, Throw),
    op!("ldfld", 0x7B, Field),
    op!("ldflda", 0x7C, Field),
    op!("stfld", 0x7D, Field),
    op!("ldsfld", 0x7E, Field),
    op!("ldsflda", 0x7F, Field),
    op!("stsfld", 0x80, Field),
    op!("stobj", 0x81, Type),
    op!("conv.ovf.i1.un", 0x82),
    op!("conv.ovf.i2.un", 0x83),
    op!("conv.ovf.i4.un", 0x84),
    op!("conv.ovf.i8.un", 0x85),
    op!("conv.ovf.u1.un", 0x86),
    op!("conv.ovf.u2.un", 0x87),
    op!("conv.ovf.u4.un", 0x88),
    op!("conv.ovf.u8.un", 0x89),
    op!("conv.ovf.i.un", 0x8A),
    op!("conv.ovf.u.un", 0x8B),
    op!("box", 0x8C, Type),
    op!("newarr", 0x8D, Type),
    op!("ldlen", 0x8E),
    op!("ldelema", 0x8F, Type),
    op!("ldelem.i1", 0x90),
    op!("ldelem.u1", 0x91),
    op!("ldelem.i2", 0x92),
    op!("ldelem.u2", 0x93),
    op!("ldelem.i4", 0x94),
    op!("ldelem.u4", 0x95),
    op!("ldelem.i8", 0x96),
    op!("ldelem.i", 0x97),
    op!("ldelem.r4", 0x98),
    op!("ldelem.r8", 0x99),
    op!("ldelem.ref", 0x9A),
    op!("stelem.i", 0x9B),
    op!("stelem.i1", 0x9C),
    op!("stelem.i2", 0x9D),
    op!("stelem.i4", 0x9E),
    op!("stelem.i8", 0x9F),
    op!("stelem.r4", 0xA0),
    op!("stelem.r8", 0xA1),
    op!("stelem.ref", 0xA2),
    op!("ldelem", 0xA3, Type),
    op!("stelem", 0xA4, Type),
    op!("unbox.any", 0xA5, Type),
    op!("conv.ovf.i1", 0xB3),
    op!("conv.ovf.u1", 0xB4),
    op!("conv.ovf.i2", 0xB5),
    op!("conv.ovf.u2", 0xB6),
    op!("conv.ovf.i4", 0xB7),
    op!("conv.ovf.u4", 0xB8),
    op!("conv.ovf.i8", 0xB9),
    op!("conv.ovf.u8", 0xBA),
    op!("refanyval", 0xC2, Type),
    op!("ckfinite", 0xC3),
    op!("mkrefany", 0xC6, Type),
    op!("ldtoken", 0xD0, Tok),
    op!("conv.u2", 0xD1),
    op!("conv.u1", 0xD2),
    op!("conv.i", 0xD3),
    op!("conv.ovf.i", 0xD4),
    op!("conv.ovf.u", 0xD5),
    op!("add.ovf", 0xD6),
    op!("add.ovf.un", 0xD7),
    op!("mul.ovf", 0xD8),
    op!("mul.ovf.un", 0xD9),
    op!("sub.ovf", 0xDA),
    op!("sub.ovf.un", 0xDB),
    op!("endfinally", 0xDC, None, Return),
    op!("leave", 0xDD, LongBranchTarget, Branch),
    op!("leave.s", 0xDE, ShortBranchTarget, Branch),
    op!("stind.i", 0xDF),
    op!("conv.u", 0xE0),
    op!("arglist", 0xFE00),
    op!("ceq", 0xFE01),
    op!("cgt", 0xFE02),
    op!("cgt.un", 0xFE03),
    op!("clt", 0xFE04),
    op!("clt.un", 0xFE05),
    op!("ldftn", 0xFE06, Method),
    op!("ldvirtftn", 0xFE07, Method),
    op!("ldarg", 0xFE09, LocalIndex),
    op!("ldarga", 0xFE0A, LocalIndex),
    op!("starg", 0xFE0B, LocalIndex),
    op!("ldloc", 0xFE0C, LocalIndex),
    op!("ldloca", 0xFE0D, LocalIndex),
    op!("stloc", 0xFE0E, LocalIndex),
    op!("localloc", 0xFE0F),
    op!("endfilter", 0xFE11, None, Return),
    op!("unaligned.", 0xFE12, UInt8, Meta),
    op!("volatile.", 0xFE13, None, Meta),
    op!("tail.", 0xFE14, None, Meta),
    op!("initobj", 0xFE15, Type),
    op!("constrained.", 0xFE16, Type, Meta),
    op!("cpblk", 0xFE17),
    op!("initblk", 0xFE18),
    op!("no.", 0xFE19, UInt8, Meta),
    op!("rethrow", 0xFE1A, None, Throw),
    op!("sizeof", 0xFE1C, Type),
    op!("refanytype", 0xFE1D),
    op!("readonly.", 0xFE1E, None, Meta),
];

/// Every defined opcode, single-byte opcodes first, in ascending value order
pub static OPCODES: &[OpCode] = TABLE;

/// Maps the low byte of an opcode value to `index + 1` in [`TABLE`], 0 marks a hole
const fn build_index(extended: bool) -> [u16; 256] {
    let mut index = [0_u16; 256];
    let mut i = 0;
    while i < TABLE.len() {
        let opcode = &TABLE[i];
        if opcode.is_extended() == extended {
            index[(opcode.value & 0xFF) as usize] = (i + 1) as u16;
        }
        i += 1;
    }
    index
}

static SINGLE_BYTE_INDEX: [u16; 256] = build_index(false);
static EXTENDED_INDEX: [u16; 256] = build_index(true);

fn resolve_slot(slot: u16) -> Option<&'static OpCode> {
    let index = slot.checked_sub(1)?;
    OPCODES.get(usize::from(index))
}

/// Look up a single-byte opcode.
///
/// Returns `None` for reserved values and for the [`EXTENDED_PREFIX`] escape byte.
#[must_use]
pub fn single_byte(byte: u8) -> Option<&'static OpCode> {
    if byte == EXTENDED_PREFIX {
        return None;
    }
    resolve_slot(SINGLE_BYTE_INDEX[usize::from(byte)])
}

/// Look up an extended opcode by the byte following [`EXTENDED_PREFIX`].
#[must_use]
pub fn extended(second: u8) -> Option<&'static OpCode> {
    resolve_slot(EXTENDED_INDEX[usize::from(second)])
}

/// Look up an opcode by its full value (`0x2A`, `0xFE01`, ...).
#[must_use]
pub fn lookup(value: u16) -> Option<&'static OpCode> {
    let [high, low] = value.to_be_bytes();
    match high {
        0 => single_byte(low),
        EXTENDED_PREFIX => extended(low),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn table_is_complete() {
        let single = OPCODES.iter().filter(|op| !op.is_extended()).count();
        let extended = OPCODES.iter().filter(|op| op.is_extended()).count();

        assert_eq!(single, 191);
        assert_eq!(extended, 28);
    }

    #[test]
    fn values_and_names_are_unique() {
        let values: HashSet<u16> = OPCODES.iter().map(|op| op.value).collect();
        let names: HashSet<&str> = OPCODES.iter().map(|op| op.name).collect();

        assert_eq!(values.len(), OPCODES.len());
        assert_eq!(names.len(), OPCODES.len());
    }

    #[test]
    fn every_opcode_round_trips() {
        for opcode in OPCODES {
            let found = lookup(opcode.value).unwrap();
            assert_eq!(found, opcode, "lookup mismatch for {}", opcode.name);
        }
    }

    #[test]
    fn reserved_values_miss() {
        for value in [0x24_u16, 0x77, 0x78, 0xA6, 0xB2, 0xBB, 0xC1, 0xC4, 0xCF, 0xE1, 0xFF] {
            assert!(lookup(value).is_none(), "0x{value:02X} should be reserved");
        }
        for second in [0x08_u8, 0x10, 0x1B, 0x1F, 0xFF] {
            assert!(extended(second).is_none());
        }
        assert!(single_byte(EXTENDED_PREFIX).is_none());
        assert!(lookup(0x0101).is_none());
    }

    #[test]
    fn operand_sizes() {
        for kind in OperandKind::iter() {
            match kind {
                OperandKind::Switch => assert_eq!(kind.size(), None),
                OperandKind::None => assert_eq!(kind.size(), Some(0)),
                _ => assert!(kind.size().unwrap() > 0),
            }
        }
        assert_eq!(OperandKind::LocalIndex.size(), Some(2));
        assert_eq!(OperandKind::Float64.size(), Some(8));
    }

    #[test]
    fn flow_classes() {
        assert_eq!(lookup(0x01).unwrap().flow, FlowControl::Break);
        assert_eq!(lookup(0x28).unwrap().flow, FlowControl::Call);
        assert_eq!(lookup(0x45).unwrap().flow, FlowControl::ConditionalBranch);
        assert_eq!(lookup(0xDE).unwrap().flow, FlowControl::Branch);
        assert_eq!(lookup(0xDC).unwrap().flow, FlowControl::Return);
        assert_eq!(lookup(0xFE1A).unwrap().flow, FlowControl::Throw);
        assert!(lookup(0xFE16).unwrap().is_prefix());
    }

    #[test]
    fn header_size() {
        assert_eq!(lookup(0x00).unwrap().size(), 1);
        assert_eq!(lookup(0xFE00).unwrap().size(), 2);
        assert_eq!(lookup(0xFE0C).unwrap().to_string(), "ldloc");
    }
}
