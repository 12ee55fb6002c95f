//! CIL instruction decoding.
//!
//! The decoder walks a method body from left to right, one instruction at a time. Each
//! instruction is an opcode (one byte, or two bytes after the `0xFE` escape) followed by an
//! operand whose shape is fixed by the opcode. All multi-byte operands are little-endian.
//!
//! Tokens are resolved through a [`TokenResolver`] while decoding, and branch
//! displacements are turned into absolute offsets. Once the whole body has been consumed,
//! every branch and switch target is checked against the set of instruction start offsets.
//!
//! # Example: Decoding a Single Instruction
//!
//! ```rust
//! use cilfmt::{disassembler::decode_instruction, MapResolver, Parser};
//!
//! let code = [0x2A]; // ret
//! let mut parser = Parser::new(&code);
//! let instr = decode_instruction(&mut parser, &MapResolver::new())?;
//! assert_eq!(instr.mnemonic(), "ret");
//! # Ok::<(), cilfmt::Error>(())
//! ```
//!
//! # Example: Decoding a Method Body
//!
//! ```rust
//! use cilfmt::{decode, disassembler::Operand, MapResolver};
//!
//! let code = [0x2B, 0x01, 0x00, 0x2A]; // br.s 3, nop, ret
//! let instrs = decode(&code, &MapResolver::new())?;
//! assert_eq!(instrs.len(), 3);
//! assert_eq!(instrs[0].operand, Operand::Target(3));
//! # Ok::<(), cilfmt::Error>(())
//! ```

use crate::{
    disassembler::{
        boundary::BoundaryMap,
        instruction::{Instruction, Operand},
        opcodes::{self, OpCode, OperandKind, EXTENDED_PREFIX},
    },
    file::{io::CilIO, parser::Parser},
    metadata::{resolver::TokenResolver, token::Token},
    Error, Result,
};

/// Decodes a complete method body.
///
/// Offsets of the returned instructions are relative to the start of `bytes`.
///
/// # Arguments
///
/// * `bytes` - The raw CIL of one method body
/// * `resolver` - Resolves the tokens embedded in the body
///
/// # Errors
///
/// Fails with the first decoding error encountered; no partial result is returned. See
/// [`decode_instruction`] for the per-instruction errors, plus
/// [`Error::InvalidBranchTarget`] if a branch does not land on an instruction.
pub fn decode<R>(bytes: &[u8], resolver: &R) -> Result<Vec<Instruction>>
where
    R: TokenResolver + ?Sized,
{
    let mut parser = Parser::new(bytes);
    decode_stream(&mut parser, resolver)
}

/// Decodes all instructions from the current parser position to the end of its data.
///
/// Instruction offsets are parser positions, so they are relative to the start of the
/// parser's data rather than to the starting position.
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_stream<R>(parser: &mut Parser, resolver: &R) -> Result<Vec<Instruction>>
where
    R: TokenResolver + ?Sized,
{
    log::debug!(
        "decoding {} bytes of CIL starting at offset {}",
        parser.remaining(),
        parser.pos()
    );

    let mut instructions = Vec::new();
    while parser.has_more_data() {
        let instruction = match decode_instruction(parser, resolver) {
            Ok(instruction) => instruction,
            Err(error) => {
                log::warn!("failed to decode method body: {error}");
                return Err(error);
            }
        };

        log::trace!(
            "{:04}: {} ({} bytes)",
            instruction.offset,
            instruction.mnemonic(),
            instruction.size
        );
        instructions.push(instruction);
    }

    if let Err(error) = validate_targets(&instructions, parser.len()) {
        log::warn!("rejecting method body: {error}");
        return Err(error);
    }

    log::debug!("decoded {} instructions", instructions.len());
    Ok(instructions)
}

/// Decodes a single CIL instruction from the current parser position.
///
/// The parser is advanced past the instruction. Branch targets are converted to absolute
/// offsets but not validated, since the rest of the body is not known yet.
///
/// # Errors
///
/// - [`Error::UnknownOpcode`] if the opcode is reserved or undefined
/// - [`Error::UnexpectedEndOfStream`] if the opcode or its operand is truncated
/// - [`Error::UnresolvedToken`] if `resolver` rejects an embedded token
/// - [`Error::InvalidBranchTarget`] if a branch displacement points before offset 0
///
/// # Examples
///
/// ```rust
/// use cilfmt::{disassembler::{decode_instruction, Operand}, MapResolver, Parser, Token};
///
/// let resolver = MapResolver::new().with_string(Token::new(0x7000_0001), "hi");
/// let bytecode = [0x72, 0x01, 0x00, 0x00, 0x70]; // ldstr 0x70000001
/// let mut parser = Parser::new(&bytecode);
///
/// let instruction = decode_instruction(&mut parser, &resolver)?;
/// assert_eq!(instruction.mnemonic(), "ldstr");
/// assert_eq!(instruction.size, 5);
/// assert_eq!(instruction.operand, Operand::String("hi".to_string()));
/// # Ok::<(), cilfmt::Error>(())
/// ```
pub fn decode_instruction<R>(parser: &mut Parser, resolver: &R) -> Result<Instruction>
where
    R: TokenResolver + ?Sized,
{
    let offset = parser.pos();
    let opcode = read_opcode(parser, offset)?;

    let operand = match opcode.operand {
        OperandKind::None => Operand::None,
        OperandKind::Int8 => Operand::Int8(read(parser, offset)?),
        OperandKind::UInt8 => Operand::UInt8(read(parser, offset)?),
        OperandKind::Int16 => Operand::Int16(read(parser, offset)?),
        OperandKind::LocalIndex => Operand::UInt16(read(parser, offset)?),
        OperandKind::Int32 => Operand::Int32(read(parser, offset)?),
        OperandKind::Int64 => Operand::Int64(read(parser, offset)?),
        OperandKind::Float32 => Operand::Float32(read(parser, offset)?),
        OperandKind::Float64 => Operand::Float64(read(parser, offset)?),
        OperandKind::ShortBranchTarget => {
            let displacement = read::<i8>(parser, offset)?;
            Operand::Target(branch_target(offset, parser.pos(), i64::from(displacement))?)
        }
        OperandKind::LongBranchTarget => {
            let displacement = read::<i32>(parser, offset)?;
            Operand::Target(branch_target(offset, parser.pos(), i64::from(displacement))?)
        }
        OperandKind::Switch => Operand::Switch(read_switch(parser, offset)?),
        OperandKind::Type | OperandKind::Method | OperandKind::Field | OperandKind::Tok => {
            let token = Token::new(read(parser, offset)?);
            let member = resolver
                .resolve_member(token)
                .map_err(|source| unresolved(offset, token, source))?;
            Operand::Member(member)
        }
        OperandKind::String => {
            let token = Token::new(read(parser, offset)?);
            let value = resolver
                .resolve_string(token)
                .map_err(|source| unresolved(offset, token, source))?;
            Operand::String(value)
        }
        OperandKind::Signature => {
            let token = Token::new(read(parser, offset)?);
            let blob = resolver
                .resolve_signature(token)
                .map_err(|source| unresolved(offset, token, source))?;
            Operand::Signature(blob)
        }
    };

    Ok(Instruction {
        offset,
        size: parser.pos() - offset,
        opcode,
        operand,
    })
}

/// Reads one operand value, reporting truncation against the instruction start
fn read<T: CilIO>(parser: &mut Parser, offset: usize) -> Result<T> {
    parser.read_le::<T>().map_err(|_| eos_error!(offset))
}

fn read_opcode(parser: &mut Parser, offset: usize) -> Result<&'static OpCode> {
    let first = read::<u8>(parser, offset)?;
    if first != EXTENDED_PREFIX {
        return opcodes::single_byte(first).ok_or(Error::UnknownOpcode {
            offset,
            value: u16::from(first),
        });
    }

    let second = read::<u8>(parser, offset)?;
    opcodes::extended(second).ok_or(Error::UnknownOpcode {
        offset,
        value: u16::from_be_bytes([EXTENDED_PREFIX, second]),
    })
}

/// Reads a switch table and resolves every case against the end of the table
fn read_switch(parser: &mut Parser, offset: usize) -> Result<Vec<usize>> {
    let count = usize::try_from(read::<u32>(parser, offset)?).map_err(|_| eos_error!(offset))?;
    let table_size = count.checked_mul(4).ok_or(eos_error!(offset))?;
    if table_size > parser.remaining() {
        return Err(eos_error!(offset));
    }

    let base = parser.pos() + table_size;
    let mut targets = Vec::with_capacity(count);
    for _ in 0..count {
        let displacement = read::<i32>(parser, offset)?;
        targets.push(branch_target(offset, base, i64::from(displacement))?);
    }

    Ok(targets)
}

/// Computes `base + displacement`, rejecting targets before the start of the body
fn branch_target(offset: usize, base: usize, displacement: i64) -> Result<usize> {
    let target = i64::try_from(base)
        .unwrap_or(i64::MAX)
        .saturating_add(displacement);

    usize::try_from(target).map_err(|_| Error::InvalidBranchTarget { offset, target })
}

fn unresolved(offset: usize, token: Token, source: crate::ResolutionError) -> Error {
    Error::UnresolvedToken {
        offset,
        token,
        source,
    }
}

/// Checks that every branch and switch target is the start of a decoded instruction
fn validate_targets(instructions: &[Instruction], len: usize) -> Result<()> {
    let mut boundaries = BoundaryMap::new(len);
    for instruction in instructions {
        boundaries.mark(instruction.offset);
    }

    for instruction in instructions {
        for &target in instruction.branch_targets() {
            let target = i64::try_from(target).unwrap_or(i64::MAX);
            if !boundaries.is_boundary(target) {
                return Err(Error::InvalidBranchTarget {
                    offset: instruction.offset,
                    target,
                });
            }
        }
    }

    Ok(())
}
