//! Formatter configuration.

/// Options controlling the instruction listing layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterOptions {
    /// Emit a blank line after every instruction that transfers or alters control
    /// (branches, returns, throws, prefixes and `break`)
    pub separate_jumps: bool,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            separate_jumps: true,
        }
    }
}

impl FormatterOptions {
    /// One line per instruction without separators
    #[must_use]
    pub fn compact() -> Self {
        Self {
            separate_jumps: false,
        }
    }

    /// The default layout, with control transfers separated by blank lines
    #[must_use]
    pub fn listing() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert!(FormatterOptions::default().separate_jumps);
        assert_eq!(FormatterOptions::listing(), FormatterOptions::default());
        assert!(!FormatterOptions::compact().separate_jumps);
    }
}
