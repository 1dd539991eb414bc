//! Fixed-width line decoder.
//!
//! A [`Decoder`] is a single-pass cursor over a line stream. Each line is
//! checked against the schema's total width, split into one token per
//! column, and optionally trimmed. Every defect is recorded in
//! [`Decoder::diagnostics`]; the [`DecoderOptions`] tolerances decide whether
//! decoding repairs the line and continues or halts for good.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use fixlen_model::Schema;
use tracing::{debug, warn};

use crate::binder::{Binder, Record};
use crate::error::{CodecError, DefectKind, ParseError, Result};
use crate::options::DecoderOptions;
use crate::text::split_at_chars;

/// Tokens of one decoded line, in schema column order.
pub type TokenRecord = Vec<String>;

/// Outcome of one validation step.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step<T> {
    /// Keep going with the (possibly repaired) value.
    Continue(T),
    /// Stop the session with this defect.
    Halt(ParseError),
}

/// Fixed-width line decoder.
pub struct Decoder<R> {
    reader: R,
    schema: Arc<Schema>,
    options: DecoderOptions,
    pending: Option<String>,
    lines_consumed: usize,
    diagnostics: Vec<ParseError>,
    finished: bool,
}

impl<R: BufRead> Decoder<R> {
    /// Create a decoder with default (strict) options.
    pub fn new(reader: R, schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_options(reader, schema, DecoderOptions::default())
    }

    /// Create a decoder with options.
    pub fn with_options(
        reader: R,
        schema: impl Into<Arc<Schema>>,
        options: DecoderOptions,
    ) -> Self {
        Self {
            reader,
            schema: schema.into(),
            options,
            pending: None,
            lines_consumed: 0,
            diagnostics: Vec::new(),
            finished: false,
        }
    }

    /// Fetch the next raw line.
    ///
    /// Returns `false` once the stream is exhausted or a fatal defect has
    /// been hit; after that it keeps returning `false`.
    ///
    /// # Errors
    ///
    /// I/O errors (including invalid UTF-8) finish the session and are
    /// returned as [`CodecError::Io`].
    pub fn has_next(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.finish();
                Ok(false)
            }
            Ok(_) => {
                strip_terminator(&mut line);
                self.pending = Some(line);
                Ok(true)
            }
            Err(error) => {
                self.finished = true;
                self.pending = None;
                Err(error.into())
            }
        }
    }

    /// Validate and split the line fetched by the last [`has_next`](Self::has_next).
    ///
    /// # Errors
    ///
    /// [`CodecError::Decode`] for an untolerated defect, which also ends the
    /// session. [`CodecError::NoPendingLine`] if no line was fetched.
    pub fn next_record(&mut self) -> Result<TokenRecord> {
        let line = self.pending.take().ok_or(CodecError::NoPendingLine)?;
        self.decode_line(line)
    }

    /// Decode the next line and bind it into `target`.
    ///
    /// A binding failure leaves the session running.
    pub fn bind_next<T: Record>(&mut self, target: &mut T) -> Result<()> {
        let binder = Binder::<T>::new(&self.schema);
        self.bind_next_with(&binder, target)
    }

    /// Decode the next line and bind it through a prepared [`Binder`].
    pub fn bind_next_with<T>(&mut self, binder: &Binder<T>, target: &mut T) -> Result<()> {
        let tokens = self.next_record()?;
        binder.bind(&tokens, target)?;
        Ok(())
    }

    /// Decode every remaining line.
    ///
    /// All or nothing: the first untolerated defect discards the records
    /// decoded so far. The diagnostics keep everything seen up to the failure.
    pub fn drain_all(&mut self) -> Result<Vec<TokenRecord>> {
        let mut records = Vec::new();
        while self.has_next()? {
            records.push(self.next_record()?);
        }
        self.finished = true;
        Ok(records)
    }

    /// Iterate the remaining lines as decoded records.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { decoder: self }
    }
}

impl<R> Decoder<R> {
    /// Every defect recorded so far, in order.
    #[must_use]
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    /// Number of lines validated so far.
    #[must_use]
    pub fn lines_consumed(&self) -> usize {
        self.lines_consumed
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    fn finish(&mut self) {
        if !self.finished {
            debug!(
                lines = self.lines_consumed,
                defects = self.diagnostics.len(),
                "decoding finished"
            );
        }
        self.finished = true;
        self.pending = None;
    }

    fn record(&mut self, defect: ParseError) -> ParseError {
        self.diagnostics.push(defect.clone());
        defect
    }

    fn halt(&mut self, defect: ParseError) -> CodecError {
        warn!(
            line = defect.line_number,
            column = defect.column.as_deref(),
            kind = %defect.kind,
            "decoding halted"
        );
        self.finish();
        CodecError::Decode(defect)
    }

    fn decode_line(&mut self, line: String) -> Result<TokenRecord> {
        self.lines_consumed += 1;
        let line_number = self.lines_consumed;

        let line = match self.fit_length(line, line_number) {
            Step::Continue(line) => line,
            Step::Halt(defect) => return Err(self.halt(defect)),
        };
        match self.split(&line, line_number) {
            Step::Continue(tokens) => Ok(tokens),
            Step::Halt(defect) => Err(self.halt(defect)),
        }
    }

    /// Check the line length, truncating or padding when tolerated.
    fn fit_length(&mut self, mut line: String, line_number: usize) -> Step<String> {
        let width = self.schema.total_width();
        let length = line.chars().count();
        match length.cmp(&width) {
            Ordering::Equal => Step::Continue(line),
            Ordering::Greater => {
                let defect = self.record(ParseError::line(line_number, DefectKind::LineTooLong));
                if !self.options.ignore_extra_size {
                    return Step::Halt(defect);
                }
                debug!(line = line_number, length, width, "truncating long line");
                let keep = split_at_chars(&line, width).0.len();
                line.truncate(keep);
                Step::Continue(line)
            }
            Ordering::Less => {
                let defect = self.record(ParseError::line(line_number, DefectKind::LineTooShort));
                if !self.options.handle_short_lines {
                    return Step::Halt(defect);
                }
                debug!(line = line_number, length, width, "padding short line");
                line.extend(std::iter::repeat_n(' ', width - length));
                Step::Continue(line)
            }
        }
    }

    /// Slice an exact-width line into trimmed column tokens.
    fn split(&mut self, line: &str, line_number: usize) -> Step<TokenRecord> {
        let schema = Arc::clone(&self.schema);
        let mut tokens = Vec::with_capacity(schema.column_count());
        let mut rest = line;

        for column in schema.iter() {
            let (raw, tail) = split_at_chars(rest, column.width());
            rest = tail;
            let token = self.options.trim_token(raw);
            if token.is_empty() {
                let defect = self.record(ParseError::empty_column(line_number, column.name()));
                if !self.options.ignore_empty_columns {
                    return Step::Halt(defect);
                }
                debug!(line = line_number, column = column.name(), "keeping empty column");
            }
            tokens.push(token.to_string());
        }

        Step::Continue(tokens)
    }
}

impl Decoder<BufReader<File>> {
    /// Open a file for decoding.
    pub fn open(path: &Path, schema: impl Into<Arc<Schema>>) -> Result<Self> {
        Self::open_with_options(path, schema, DecoderOptions::default())
    }

    /// Open a file for decoding with options.
    pub fn open_with_options(
        path: &Path,
        schema: impl Into<Arc<Schema>>,
        options: DecoderOptions,
    ) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CodecError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CodecError::Io(e)
            }
        })?;
        Ok(Self::with_options(BufReader::new(file), schema, options))
    }
}

/// Iterator over the remaining records of a [`Decoder`].
///
/// Ends after the stream is exhausted or after yielding a fatal error.
pub struct Records<'a, R> {
    decoder: &'a mut Decoder<R>,
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = Result<TokenRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.decoder.has_next() {
            Ok(true) => Some(self.decoder.next_record()),
            Ok(false) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

/// Remove a trailing `\n` or `\r\n`, and a lone trailing `\r` on the
/// final unterminated line.
fn strip_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
    }
    if line.ends_with('\r') {
        line.pop();
    }
}
