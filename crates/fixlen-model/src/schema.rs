//! Column layout of a fixed-width record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::SchemaDocument;
use crate::error::{Result, SchemaError};

/// A named fixed-width span within a record line.
///
/// Widths are counted in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    name: String,
    width: usize,
}

impl Column {
    /// Create a column descriptor.
    ///
    /// The descriptor is not checked here; [`Schema::load`] rejects empty
    /// names and zero widths.
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column width in characters.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Ordered list of columns describing one record line.
///
/// A schema never changes after [`Schema::load`] succeeds, so it can be
/// shared between any number of decoders and encoders behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SchemaDocument", try_from = "SchemaDocument")]
pub struct Schema {
    columns: Vec<Column>,
    positions: BTreeMap<String, usize>,
    total_width: usize,
}

impl Schema {
    /// Build a schema from an ordered list of columns.
    ///
    /// # Errors
    ///
    /// Fails when a column has an empty name, a zero width, or reuses the
    /// name of an earlier column, and when the widths do not fit in `usize`.
    pub fn load(columns: impl IntoIterator<Item = Column>) -> Result<Self> {
        let columns: Vec<Column> = columns.into_iter().collect();
        let mut positions = BTreeMap::new();
        let mut total_width = 0usize;

        for (index, column) in columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(SchemaError::EmptyName { index });
            }
            if column.width == 0 {
                return Err(SchemaError::invalid_width(&column.name, 0));
            }
            if positions.insert(column.name.clone(), index).is_some() {
                return Err(SchemaError::duplicate_column(&column.name));
            }
            total_width = total_width.checked_add(column.width).ok_or_else(|| {
                SchemaError::WidthOverflow {
                    name: column.name.clone(),
                }
            })?;
        }

        Ok(Self {
            columns,
            positions,
            total_width,
        })
    }

    /// Sum of all column widths.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.total_width
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in record order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Iterate columns in record order.
    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Column at `index`, if any.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Index of the column called `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Column called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|index| &self.columns[index])
    }

    /// Character offset at which each column starts.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, &Column)> + '_ {
        self.columns.iter().scan(0usize, |cursor, column| {
            let start = *cursor;
            *cursor += column.width;
            Some((start, column))
        })
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_columns() -> Vec<Column> {
        vec![
            Column::new("City", 5),
            Column::new("Street", 4),
            Column::new("Number", 4),
            Column::new("Main", 1),
        ]
    }

    #[test]
    fn test_total_width() {
        let schema = Schema::load(address_columns()).unwrap();
        assert_eq!(schema.total_width(), 14);
        assert_eq!(schema.column_count(), 4);
    }

    #[test]
    fn test_lookup_by_name() {
        let schema = Schema::load(address_columns()).unwrap();
        assert_eq!(schema.position("Number"), Some(2));
        assert_eq!(schema.get("Main").map(Column::width), Some(1));
        assert!(schema.get("Zip").is_none());
    }

    #[test]
    fn test_offsets() {
        let schema = Schema::load(address_columns()).unwrap();
        let offsets: Vec<(usize, &str)> =
            schema.offsets().map(|(at, col)| (at, col.name())).collect();
        assert_eq!(
            offsets,
            vec![(0, "City"), (5, "Street"), (9, "Number"), (13, "Main")]
        );
    }

    #[test]
    fn test_rejects_zero_width() {
        let err = Schema::load(vec![Column::new("A", 3), Column::new("B", 0)]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidWidth { ref name, width: 0 } if name == "B"));
    }

    #[test]
    fn test_rejects_overflowing_total_width() {
        let err = Schema::load(vec![
            Column::new("A", usize::MAX / 2),
            Column::new("B", usize::MAX / 2),
            Column::new("C", 2),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::WidthOverflow { ref name } if name == "C"));
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let err = Schema::load(vec![Column::new("A", 3), Column::new("A", 2)]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { ref name } if name == "A"));
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = Schema::load(vec![Column::new("", 3)]).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyName { index: 0 }));
    }

    #[test]
    fn test_empty_schema() {
        let schema = Schema::load(Vec::new()).unwrap();
        assert_eq!(schema.total_width(), 0);
        assert_eq!(schema.column_count(), 0);
    }
}
