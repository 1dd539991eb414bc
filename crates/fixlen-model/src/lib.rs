//! Schema model for fixed-width record files.
//!
//! A [`Schema`] is an ordered list of named [`Column`]s, each spanning a fixed
//! number of characters. Decoders and encoders are built against a schema
//! and never mutate it.
//!
//! ```
//! use fixlen_model::{Column, Schema};
//!
//! let schema = Schema::load(vec![Column::new("City", 5), Column::new("Main", 1)]).unwrap();
//! assert_eq!(schema.total_width(), 6);
//! ```

pub mod document;
pub mod error;
pub mod schema;

pub use document::{ColumnDefinition, SchemaDocument};
pub use error::{Result, SchemaError};
pub use schema::{Column, Schema};
