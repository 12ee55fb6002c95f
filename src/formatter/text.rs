//! Indentation-aware line writer used by the formatters.
//!
//! [`TextBuilder`] wraps any [`std::io::Write`] sink. Text is written in fragments; the
//! current indentation (four spaces per level) is emitted lazily before the first fragment
//! of each line, so blank lines carry no trailing whitespace.

use std::io::Write;

use crate::Result;

const INDENT: &str = "    ";

/// Streams indented text into a sink.
///
/// # Examples
///
/// ```rust
/// use cilfmt::formatter::TextBuilder;
///
/// let mut out = Vec::new();
/// let mut builder = TextBuilder::new(&mut out);
/// builder.line("{")?;
/// builder.indented(|b| b.line("ret"))?;
/// builder.line("}")?;
///
/// assert_eq!(String::from_utf8(out).unwrap(), "{\n    ret\n}\n");
/// # Ok::<(), cilfmt::Error>(())
/// ```
pub struct TextBuilder<W: Write> {
    writer: W,
    indent: usize,
    at_line_start: bool,
}

impl<W: Write> TextBuilder<W> {
    /// Create a builder at indentation level 0
    pub fn new(writer: W) -> Self {
        TextBuilder {
            writer,
            indent: 0,
            at_line_start: true,
        }
    }

    /// Current indentation level
    #[must_use]
    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// Append `text` to the current line.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the sink fails.
    pub fn append(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        if self.at_line_start {
            for _ in 0..self.indent {
                self.writer.write_all(INDENT.as_bytes())?;
            }
            self.at_line_start = false;
        }

        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Terminate the current line.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the sink fails.
    pub fn end_line(&mut self) -> Result<()> {
        self.writer.write_all(b"\n")?;
        self.at_line_start = true;
        Ok(())
    }

    /// Append `text` and terminate the line.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the sink fails.
    pub fn line(&mut self, text: &str) -> Result<()> {
        self.append(text)?;
        self.end_line()
    }

    /// Run `f` one indentation level deeper.
    ///
    /// The level is restored even if `f` fails.
    ///
    /// # Errors
    /// Returns whatever `f` returns.
    pub fn indented<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    /// Flush the sink.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the sink fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
