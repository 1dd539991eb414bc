//! JSON schema documents.
//!
//! A schema document lists the columns of a record in order:
//!
//! ```json
//! {"Columns": [{"Name": "City", "Length": 5}, {"Name": "Main", "Length": 1}]}
//! ```
//!
//! Lowercase keys (`columns`, `name`, `length`) are accepted as well, and
//! are what [`Schema`] serializes to.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::schema::{Column, Schema};

/// Serialized form of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "columns", alias = "Columns")]
    pub columns: Vec<ColumnDefinition>,
}

/// One entry of a schema document.
///
/// The length is signed so that a negative width is reported as an invalid
/// schema instead of a JSON type mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    #[serde(rename = "name", alias = "Name")]
    pub name: String,
    #[serde(rename = "length", alias = "Length", alias = "width")]
    pub length: i64,
}

impl TryFrom<SchemaDocument> for Schema {
    type Error = SchemaError;

    fn try_from(document: SchemaDocument) -> Result<Self> {
        let columns = document
            .columns
            .into_iter()
            .map(|def| match usize::try_from(def.length) {
                Ok(width) => Ok(Column::new(def.name, width)),
                Err(_) => Err(SchemaError::invalid_width(def.name, def.length)),
            })
            .collect::<Result<Vec<_>>>()?;
        Schema::load(columns)
    }
}

impl From<Schema> for SchemaDocument {
    fn from(schema: Schema) -> Self {
        Self {
            columns: schema
                .iter()
                .map(|column| ColumnDefinition {
                    name: column.name().to_string(),
                    length: i64::try_from(column.width()).unwrap_or(i64::MAX),
                })
                .collect(),
        }
    }
}

impl Schema {
    /// Parse a schema from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        document.try_into()
    }

    /// Read a schema from a JSON document stream.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_reader(BufReader::new(reader))?;
        document.try_into()
    }

    /// Read a schema from a JSON document file.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SchemaError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SchemaError::Io(e)
            }
        })?;
        Self::from_json_reader(file)
    }
}
