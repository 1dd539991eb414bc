//! Shared fixtures for codec integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use fixlen_codec::{Decoder, DecoderOptions};
use fixlen_model::Schema;

pub const ADDRESS_SCHEMA: &str = r#"{
  "Columns": [
    {"Name": "City", "Length": 5},
    {"Name": "Street", "Length": 4},
    {"Name": "Number", "Length": 4},
    {"Name": "Main", "Length": 1}
  ]
}"#;

pub const ADDRESSES: &str = "city1str15   T
city2str24537T
city3str3 24 F
city4str4125 T
city5str52   T
city6    5   T";

pub fn address_schema() -> Arc<Schema> {
    Arc::new(Schema::from_json_str(ADDRESS_SCHEMA).expect("address schema"))
}

/// Trim both sides and keep empty columns, the usual lenient-token setup.
pub fn trimming_options() -> DecoderOptions {
    DecoderOptions::new().trim().with_ignore_empty_columns(true)
}

pub fn decoder(input: &str, options: DecoderOptions) -> Decoder<Cursor<Vec<u8>>> {
    Decoder::with_options(
        Cursor::new(input.as_bytes().to_vec()),
        address_schema(),
        options,
    )
}
