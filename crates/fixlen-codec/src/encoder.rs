//! Fixed-width line encoder.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use fixlen_model::Schema;
use tracing::trace;

use crate::binder::{Binder, Record};
use crate::error::Result;
use crate::options::EncoderOptions;
use crate::text::push_fixed;

/// Fixed-width line encoder.
///
/// Output is buffered; call [`flush`](Self::flush) (or
/// [`write_all`](Self::write_all), which flushes) before dropping the encoder
/// to be sure every line reached the underlying writer.
pub struct Encoder<W: Write> {
    writer: BufWriter<W>,
    schema: Arc<Schema>,
    options: EncoderOptions,
    line: String,
    lines_written: usize,
}

impl<W: Write> Encoder<W> {
    /// Create an encoder with default options.
    pub fn new(writer: W, schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_options(writer, schema, EncoderOptions::default())
    }

    /// Create an encoder with options.
    pub fn with_options(
        writer: W,
        schema: impl Into<Arc<Schema>>,
        options: EncoderOptions,
    ) -> Self {
        let schema = schema.into();
        Self {
            writer: BufWriter::new(writer),
            line: String::with_capacity(schema.total_width() + 2),
            schema,
            options,
            lines_written: 0,
        }
    }

    /// Encode one line from tokens given in schema column order.
    ///
    /// Each token is cut or padded to its column width. Columns past the end
    /// of `tokens` are written as padding; surplus tokens are ignored.
    pub fn write_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        self.line.clear();
        for (index, column) in self.schema.iter().enumerate() {
            let token = tokens.get(index).map_or("", AsRef::as_ref);
            push_fixed(&mut self.line, token, column.width(), self.options.pad_char);
        }
        self.line.push_str(self.options.line_terminator.as_str());
        self.writer.write_all(self.line.as_bytes())?;
        self.lines_written += 1;
        Ok(())
    }

    /// Encode one typed record.
    pub fn write_record<T: Record>(&mut self, record: &T) -> Result<()> {
        let binder = Binder::<T>::new(&self.schema);
        self.write_record_with(&binder, record)
    }

    /// Encode one typed record through a prepared [`Binder`].
    pub fn write_record_with<T>(&mut self, binder: &Binder<T>, record: &T) -> Result<()> {
        let tokens = binder.extract(record)?;
        self.write_tokens(&tokens)
    }

    /// Encode every record, then flush.
    pub fn write_all<'a, T, I>(&mut self, records: I) -> Result<()>
    where
        T: Record,
        I: IntoIterator<Item = &'a T>,
    {
        let binder = Binder::<T>::new(&self.schema);
        for record in records {
            self.write_record_with(&binder, record)?;
        }
        self.flush()
    }

    /// Encode every token record, then flush.
    pub fn write_all_tokens<S, I>(&mut self, records: I) -> Result<()>
    where
        S: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<[S]>,
    {
        for tokens in records {
            self.write_tokens(tokens.as_ref())?;
        }
        self.flush()
    }

    /// Push buffered lines to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        trace!(lines = self.lines_written, "flushing encoder");
        self.writer.flush()?;
        Ok(())
    }

    /// Number of lines encoded so far.
    #[must_use]
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

impl Encoder<File> {
    /// Create a file for encoding.
    pub fn create(path: &Path, schema: impl Into<Arc<Schema>>) -> Result<Self> {
        Self::create_with_options(path, schema, EncoderOptions::default())
    }

    /// Create a file for encoding with options.
    pub fn create_with_options(
        path: &Path,
        schema: impl Into<Arc<Schema>>,
        options: EncoderOptions,
    ) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_options(file, schema, options))
    }
}
