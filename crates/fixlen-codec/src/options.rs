//! Decoder and encoder options.

use serde::{Deserialize, Serialize};

/// Options for decoding fixed-width lines.
///
/// Every toggle is off by default, which makes any malformed line fatal.
/// Tolerated defects are still recorded in the decoder's diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Right-pad short lines with spaces instead of halting.
    pub handle_short_lines: bool,
    /// Truncate long lines to the schema width instead of halting.
    pub ignore_extra_size: bool,
    /// Keep empty columns as empty tokens instead of halting.
    pub ignore_empty_columns: bool,
    /// Strip leading whitespace from each token.
    pub trim_leading_space: bool,
    /// Strip trailing whitespace from each token.
    pub trim_trailing_space: bool,
}

impl DecoderOptions {
    /// Create decoder options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable all three tolerances.
    #[must_use]
    pub fn lenient(mut self) -> Self {
        self.handle_short_lines = true;
        self.ignore_extra_size = true;
        self.ignore_empty_columns = true;
        self
    }

    /// Strip whitespace on both sides of each token.
    #[must_use]
    pub fn trim(mut self) -> Self {
        self.trim_leading_space = true;
        self.trim_trailing_space = true;
        self
    }

    #[must_use]
    pub fn with_handle_short_lines(mut self, enable: bool) -> Self {
        self.handle_short_lines = enable;
        self
    }

    #[must_use]
    pub fn with_ignore_extra_size(mut self, enable: bool) -> Self {
        self.ignore_extra_size = enable;
        self
    }

    #[must_use]
    pub fn with_ignore_empty_columns(mut self, enable: bool) -> Self {
        self.ignore_empty_columns = enable;
        self
    }

    #[must_use]
    pub fn with_trim_leading_space(mut self, enable: bool) -> Self {
        self.trim_leading_space = enable;
        self
    }

    #[must_use]
    pub fn with_trim_trailing_space(mut self, enable: bool) -> Self {
        self.trim_trailing_space = enable;
        self
    }

    /// Combine two option sets; a toggle is on if either side enables it.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            handle_short_lines: self.handle_short_lines || other.handle_short_lines,
            ignore_extra_size: self.ignore_extra_size || other.ignore_extra_size,
            ignore_empty_columns: self.ignore_empty_columns || other.ignore_empty_columns,
            trim_leading_space: self.trim_leading_space || other.trim_leading_space,
            trim_trailing_space: self.trim_trailing_space || other.trim_trailing_space,
        }
    }

    /// Apply the configured trimming to a token.
    #[must_use]
    pub fn trim_token<'a>(&self, token: &'a str) -> &'a str {
        let token = if self.trim_leading_space {
            token.trim_start()
        } else {
            token
        };
        if self.trim_trailing_space {
            token.trim_end()
        } else {
            token
        }
    }
}

/// Line terminator appended by the encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineTerminator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Options for encoding fixed-width lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Character used to right-pad short tokens (default: space).
    pub pad_char: char,
    /// Terminator written after each line (default: `\n`).
    pub line_terminator: LineTerminator,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            pad_char: ' ',
            line_terminator: LineTerminator::Lf,
        }
    }
}

impl EncoderOptions {
    /// Create encoder options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the padding character.
    #[must_use]
    pub fn with_pad_char(mut self, pad_char: char) -> Self {
        self.pad_char = pad_char;
        self
    }

    /// Set the line terminator.
    #[must_use]
    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// Terminate lines with `\r\n`.
    #[must_use]
    pub fn crlf(mut self) -> Self {
        self.line_terminator = LineTerminator::CrLf;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_defaults_are_strict() {
        let opts = DecoderOptions::default();
        assert!(!opts.handle_short_lines);
        assert!(!opts.ignore_extra_size);
        assert!(!opts.ignore_empty_columns);
        assert_eq!(opts.trim_token("  a b  "), "  a b  ");
    }

    #[test]
    fn test_trim_toggles_are_independent() {
        let leading = DecoderOptions::new().with_trim_leading_space(true);
        assert_eq!(leading.trim_token("  ab  "), "ab  ");

        let trailing = DecoderOptions::new().with_trim_trailing_space(true);
        assert_eq!(trailing.trim_token("  ab  "), "  ab");

        assert_eq!(DecoderOptions::new().trim().trim_token("\t ab \t"), "ab");
    }

    #[test]
    fn test_lenient_and_union() {
        let opts = DecoderOptions::new().lenient();
        assert!(opts.handle_short_lines && opts.ignore_extra_size && opts.ignore_empty_columns);
        assert!(!opts.trim_leading_space);

        let merged = opts.union(DecoderOptions::new().trim());
        assert!(merged.trim_leading_space && merged.trim_trailing_space);
        assert!(merged.ignore_extra_size);
    }

    #[test]
    fn test_decoder_options_deserialize_partial() {
        let opts: DecoderOptions =
            serde_json::from_str(r#"{"ignore_empty_columns": true}"#).unwrap();
        assert_eq!(opts, DecoderOptions::new().with_ignore_empty_columns(true));
    }

    #[test]
    fn test_encoder_options() {
        let opts = EncoderOptions::new().with_pad_char('0').crlf();
        assert_eq!(opts.pad_char, '0');
        assert_eq!(opts.line_terminator.as_str(), "\r\n");
        assert_eq!(EncoderOptions::default().line_terminator.as_str(), "\n");
    }
}
