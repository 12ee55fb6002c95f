//! Textual rendering of decoded instruction lists.
//!
//! Each instruction becomes one line:
//!
//! ```text
//! 00: ldstr "Hello, World!"
//! 05: call void [System.Console]System.Console::WriteLine(string)
//! 10: ret
//! ```
//!
//! Offsets are decimal, zero-padded to the width of the largest offset in the list. With
//! [`FormatterOptions::separate_jumps`] set, a blank line follows every instruction whose
//! flow class is a branch, conditional branch, return, throw, prefix or break.

use std::io::Write;

use crate::{
    disassembler::{FlowControl, Instruction, Operand},
    formatter::{
        config::FormatterOptions,
        reference::{format_bytes, format_member},
        text::TextBuilder,
    },
    Result,
};

/// Renders instruction lists according to a set of [`FormatterOptions`].
#[derive(Debug, Clone, Default)]
pub struct InstructionFormatter {
    options: FormatterOptions,
}

impl InstructionFormatter {
    /// Create a formatter with `options`
    #[must_use]
    pub fn new(options: FormatterOptions) -> Self {
        InstructionFormatter { options }
    }

    /// Writes `instructions` to `sink`, one line each.
    ///
    /// An empty list writes nothing.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedMemberKind`] for operands that cannot be rendered
    /// (field references) and [`crate::Error::FileError`] if the sink fails. Lines written
    /// before the failure remain in the sink.
    pub fn format<W: Write>(&self, instructions: &[Instruction], sink: W) -> Result<()> {
        let mut builder = TextBuilder::new(sink);
        self.write(instructions, &mut builder)?;
        builder.flush()
    }

    /// Writes `instructions` through an existing builder, honouring its indentation.
    ///
    /// # Errors
    /// Same as [`InstructionFormatter::format`].
    pub fn write<W: Write>(
        &self,
        instructions: &[Instruction],
        builder: &mut TextBuilder<W>,
    ) -> Result<()> {
        let width = offset_width(instructions);

        for instruction in instructions {
            builder.line(&format_line(instruction, width)?)?;

            if self.options.separate_jumps && separates(instruction.flow()) {
                builder.end_line()?;
            }
        }

        Ok(())
    }

    /// Renders `instructions` into a `String`.
    ///
    /// # Errors
    /// Same as [`InstructionFormatter::format`].
    pub fn format_to_string(&self, instructions: &[Instruction]) -> Result<String> {
        let mut out = Vec::new();
        self.format(instructions, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn separates(flow: FlowControl) -> bool {
    matches!(
        flow,
        FlowControl::Branch
            | FlowControl::ConditionalBranch
            | FlowControl::Return
            | FlowControl::Throw
            | FlowControl::Meta
            | FlowControl::Break
    )
}

/// Number of decimal digits of the largest offset
fn offset_width(instructions: &[Instruction]) -> usize {
    instructions
        .iter()
        .map(|instruction| instruction.offset)
        .max()
        .map_or(1, |offset| offset.to_string().len())
}

/// Renders one instruction line without indentation or line terminator.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedMemberKind`] for field operands.
pub fn format_line(instruction: &Instruction, width: usize) -> Result<String> {
    let mut line = format!(
        "{:0width$}: {}",
        instruction.offset,
        instruction.mnemonic(),
        width = width
    );

    if let Some(operand) = format_operand(&instruction.operand)? {
        line.push(' ');
        line.push_str(&operand);
    }

    Ok(line)
}

/// Renders an operand, or `None` if the instruction has none.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedMemberKind`] for field operands.
pub fn format_operand(operand: &Operand) -> Result<Option<String>> {
    let text = match operand {
        Operand::None => return Ok(None),
        Operand::Int8(value) => value.to_string(),
        Operand::UInt8(value) => value.to_string(),
        Operand::Int16(value) => value.to_string(),
        Operand::UInt16(value) => value.to_string(),
        Operand::Int32(value) => value.to_string(),
        Operand::Int64(value) => value.to_string(),
        Operand::Float32(value) => {
            format_float(f64::from(*value), &format!("{value:e}"), SINGLE_DIGITS)
        }
        Operand::Float64(value) => format_float(*value, &format!("{value:e}"), DOUBLE_DIGITS),
        Operand::Target(target) => target.to_string(),
        Operand::Switch(targets) => {
            let targets: Vec<String> = targets.iter().map(ToString::to_string).collect();
            format!("({})", targets.join(", "))
        }
        Operand::String(value) => quote(value),
        Operand::Member(member) => format_member(member)?,
        Operand::Signature(blob) => format_bytes(blob),
    };

    Ok(Some(text))
}

/// Exponent at which `float32` operands switch to scientific notation
const SINGLE_DIGITS: i32 = 7;
/// Exponent at which `float64` operands switch to scientific notation
const DOUBLE_DIGITS: i32 = 15;

/// Renders a float the way the runtime's invariant culture does.
///
/// `scientific` is the shortest round-trip `{:e}` spelling of the value at its own
/// precision. Exponents of at least `digits`, or below -4, print as `1E+20` / `1E-05`;
/// everything else prints in plain decimal.
fn format_float(value: f64, scientific: &str, digits: i32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    } else if value == f64::INFINITY {
        return "Infinity".to_string();
    } else if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }

    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent >= digits || exponent < -4 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs());
    }

    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let significand: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if exponent < 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(exponent.unsigned_abs() as usize - 1));
        out.push_str(&significand);
    } else {
        let point = exponent.unsigned_abs() as usize + 1;
        if significand.len() > point {
            out.push_str(&significand[..point]);
            out.push('.');
            out.push_str(&significand[point..]);
        } else {
            out.push_str(&significand);
            out.extend(std::iter::repeat('0').take(point - significand.len()));
        }
    }

    out
}

/// Wraps `value` in double quotes, escaping quotes, backslashes and control characters.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
