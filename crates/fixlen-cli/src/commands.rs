//! Subcommand implementations.
//!
//! Each `run_*` function does the work of one subcommand and returns an
//! outcome for `main` to report; none of them print diagnostics or exit.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;
use tracing::{debug, info, info_span, trace};

use fixlen_codec::{
    CodecError, Decoder, DecoderOptions, Encoder, EncoderOptions, LineTerminator, ParseError,
    TokenRecord,
};
use fixlen_model::Schema;

use crate::cli::{CheckArgs, DecodeArgs, EncodeArgs, RecordFormatArg, SchemaArgs, ToleranceArgs};
use crate::logging::redact_value;
use crate::summary::records_table;

/// Result of `fixlen decode`.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub records: usize,
    pub lines_consumed: usize,
    pub diagnostics: Vec<ParseError>,
    /// The defect that stopped decoding early.
    pub halted: Option<ParseError>,
}

/// Result of `fixlen check`.
#[derive(Debug)]
pub struct CheckOutcome {
    pub records: usize,
    pub lines_consumed: usize,
    pub diagnostics: Vec<ParseError>,
    pub halted: Option<ParseError>,
}

impl CheckOutcome {
    /// True when the input decoded without a single recorded defect.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.halted.is_none()
    }
}

/// Result of `fixlen encode`.
#[derive(Debug)]
pub struct EncodeOutcome {
    pub lines_written: usize,
}

pub fn run_schema(args: &SchemaArgs) -> Result<Arc<Schema>> {
    load_schema(&args.schema)
}

pub fn run_decode(args: &DecodeArgs) -> Result<DecodeOutcome> {
    let span = info_span!("decode", input = %args.input.display());
    let _guard = span.enter();

    let schema = load_schema(&args.schema)?;
    let options = decoder_options(&args.tolerance)?;
    let mut decoder = Decoder::open_with_options(&args.input, Arc::clone(&schema), options)
        .with_context(|| format!("open {}", args.input.display()))?;
    let (records, halted) = collect_records(&mut decoder)?;

    let mut out = open_output(args.output.as_deref())?;
    write_records(&mut out, &schema, &records, args.format)?;
    out.flush().context("flush decoded records")?;

    info!(
        records = records.len(),
        lines = decoder.lines_consumed(),
        defects = decoder.diagnostics().len(),
        "decode finished"
    );
    Ok(DecodeOutcome {
        records: records.len(),
        lines_consumed: decoder.lines_consumed(),
        diagnostics: decoder.diagnostics().to_vec(),
        halted,
    })
}

pub fn run_check(args: &CheckArgs) -> Result<CheckOutcome> {
    let span = info_span!("check", input = %args.input.display());
    let _guard = span.enter();

    let schema = load_schema(&args.schema)?;
    let options = decoder_options(&args.tolerance)?;
    let mut decoder = Decoder::open_with_options(&args.input, schema, options)
        .with_context(|| format!("open {}", args.input.display()))?;
    let (records, halted) = collect_records(&mut decoder)?;

    info!(
        records = records.len(),
        defects = decoder.diagnostics().len(),
        "check finished"
    );
    Ok(CheckOutcome {
        records: records.len(),
        lines_consumed: decoder.lines_consumed(),
        diagnostics: decoder.diagnostics().to_vec(),
        halted,
    })
}

pub fn run_encode(args: &EncodeArgs) -> Result<EncodeOutcome> {
    let span = info_span!("encode", input = %args.input.display());
    let _guard = span.enter();

    let schema = load_schema(&args.schema)?;
    let mut options = EncoderOptions::new().with_pad_char(args.pad_char);
    if args.crlf {
        options = options.with_line_terminator(LineTerminator::CrLf);
    }
    let input = File::open(&args.input)
        .with_context(|| format!("open {}", args.input.display()))?;
    let out = open_output(args.output.as_deref())?;
    let mut encoder = Encoder::with_options(out, Arc::clone(&schema), options);

    for (index, line) in BufReader::new(input).lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("read line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("line {line_number}: invalid JSON"))?;
        let tokens = json_tokens(&schema, &value)
            .with_context(|| format!("line {line_number}: cannot encode value"))?;
        let joined = tokens.join("|");
        trace!(line = line_number, tokens = redact_value(&joined), "encoding");
        encoder.write_tokens(&tokens)?;
    }
    encoder.flush().context("flush encoded lines")?;

    info!(lines = encoder.lines_written(), "encode finished");
    Ok(EncodeOutcome {
        lines_written: encoder.lines_written(),
    })
}

/// Load a schema document, naming the file on failure.
pub fn load_schema(path: &Path) -> Result<Arc<Schema>> {
    let schema = Schema::from_json_path(path)
        .with_context(|| format!("load schema {}", path.display()))?;
    debug!(
        columns = schema.column_count(),
        width = schema.total_width(),
        "schema loaded"
    );
    Ok(Arc::new(schema))
}

/// Combine tolerance flags with an optional options file.
pub fn decoder_options(args: &ToleranceArgs) -> Result<DecoderOptions> {
    let mut options = DecoderOptions::new()
        .with_handle_short_lines(args.handle_short_lines)
        .with_ignore_extra_size(args.ignore_extra_size)
        .with_ignore_empty_columns(args.ignore_empty_columns)
        .with_trim_leading_space(args.trim_leading)
        .with_trim_trailing_space(args.trim_trailing);
    if args.lenient {
        options = options.lenient();
    }
    if args.trim {
        options = options.trim();
    }
    if let Some(path) = &args.options {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let loaded: DecoderOptions = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parse decoder options {}", path.display()))?;
        options = options.union(loaded);
    }
    Ok(options)
}

/// Turn one JSON line into tokens in schema column order.
///
/// Objects are looked up by column name; arrays are taken positionally.
pub fn json_tokens(schema: &Schema, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Object(map) => Ok(schema
            .iter()
            .map(|column| map.get(column.name()).map(json_token).unwrap_or_default())
            .collect()),
        Value::Array(items) => Ok(items.iter().map(json_token).collect()),
        other => bail!("expected an object or an array, found {}", json_type(other)),
    }
}

fn json_token(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested => nested.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode until the input ends or a defect halts the session.
fn collect_records<R: BufRead>(
    decoder: &mut Decoder<R>,
) -> Result<(Vec<TokenRecord>, Option<ParseError>)> {
    let mut records = Vec::new();
    while decoder.has_next().context("read input")? {
        match decoder.next_record() {
            Ok(record) => {
                let joined = record.join("|");
                trace!(
                    line = decoder.lines_consumed(),
                    tokens = redact_value(&joined),
                    "decoded"
                );
                records.push(record);
            }
            Err(CodecError::Decode(defect)) => return Ok((records, Some(defect))),
            Err(error) => return Err(error).context("decode input"),
        }
    }
    Ok((records, None))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Write records in the requested format.
pub fn write_records<W: Write>(
    out: &mut W,
    schema: &Schema,
    records: &[TokenRecord],
    format: RecordFormatArg,
) -> Result<()> {
    match format {
        RecordFormatArg::Json => {
            let objects: Vec<_> = records
                .iter()
                .map(|tokens| RecordObject { schema, tokens })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &objects).context("write JSON")?;
            writeln!(out)?;
        }
        RecordFormatArg::Jsonl => {
            let mut out = BufWriter::new(out);
            for tokens in records {
                serde_json::to_writer(&mut out, &RecordObject { schema, tokens })
                    .context("write JSON line")?;
                writeln!(out)?;
            }
            out.flush()?;
        }
        RecordFormatArg::Table => {
            writeln!(out, "{}", records_table(schema, records))?;
        }
    }
    Ok(())
}

/// A decoded record serialized as an object keyed by column name, in
/// schema order.
struct RecordObject<'a> {
    schema: &'a Schema,
    tokens: &'a [String],
}

impl Serialize for RecordObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tokens.len()))?;
        for (column, token) in self.schema.iter().zip(self.tokens) {
            map.serialize_entry(column.name(), token)?;
        }
        map.end()
    }
}
