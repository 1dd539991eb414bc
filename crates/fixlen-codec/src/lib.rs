//! Fixed-width record decoder, encoder and field binder.
//!
//! Lines are decoded against a [`Schema`](fixlen_model::Schema) into one
//! token per column, or bound straight into a typed [`Record`]. The encoder
//! does the reverse, cutting or padding every column to its exact width.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use std::sync::Arc;
//!
//! use fixlen_codec::{Decoder, DecoderOptions, Encoder};
//! use fixlen_model::{Column, Schema};
//!
//! let schema = Arc::new(
//!     Schema::load(vec![
//!         Column::new("City", 5),
//!         Column::new("Street", 4),
//!         Column::new("Number", 4),
//!         Column::new("Main", 1),
//!     ])
//!     .unwrap(),
//! );
//!
//! let options = DecoderOptions::new().trim().with_ignore_empty_columns(true);
//! let input = Cursor::new("city1str15   T\ncity6    5   T\n");
//! let mut decoder = Decoder::with_options(input, Arc::clone(&schema), options);
//! let records = decoder.drain_all().unwrap();
//! assert_eq!(records[1], vec!["city6", "", "5", "T"]);
//! assert_eq!(decoder.diagnostics().len(), 1);
//!
//! let mut encoder = Encoder::new(Vec::new(), schema);
//! encoder.write_tokens(&records[0]).unwrap();
//! assert_eq!(encoder.into_inner().unwrap(), b"city1str15   T\n");
//! ```
//!
//! # Tolerances
//!
//! A malformed line is always recorded in [`Decoder::diagnostics`]. Whether
//! it also stops decoding depends on [`DecoderOptions`]:
//!
//! | Defect         | Tolerance              | Repair                    |
//! |----------------|------------------------|---------------------------|
//! | Line too long  | `ignore_extra_size`    | truncate to schema width  |
//! | Line too short | `handle_short_lines`   | right-pad with spaces     |
//! | Empty column   | `ignore_empty_columns` | keep the empty token      |
//!
//! An untolerated defect ends the session: `has_next` returns `false` from
//! then on, even if the input has more lines.

pub mod binder;
mod decoder;
mod encoder;
mod error;
mod options;
mod text;

pub use binder::{
    Binder, Field, FieldKind, FieldTable, FieldType, FieldValue, Record, bind, extract,
    format_float, parse_bool,
};
pub use decoder::{Decoder, Records, TokenRecord};
pub use encoder::Encoder;
pub use error::{BindError, CodecError, DefectKind, ParseError, Result};
pub use options::{DecoderOptions, EncoderOptions, LineTerminator};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
