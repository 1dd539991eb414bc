//! Mapping between token sequences and typed records.
//!
//! Records describe their fields once, through [`Record::field_table`]. A
//! [`Binder`] then resolves the schema's columns against that table so that
//! binding and extraction are plain indexed lookups.
//!
//! ```
//! use fixlen_codec::{Binder, record_fields};
//! use fixlen_model::{Column, Schema};
//!
//! #[derive(Default)]
//! struct Address {
//!     city: String,
//!     number: i32,
//! }
//!
//! record_fields!(Address {
//!     "City" => city,
//!     "Number" => number,
//! });
//!
//! let schema = Schema::load(vec![Column::new("City", 5), Column::new("Number", 4)]).unwrap();
//! let binder = Binder::<Address>::new(&schema);
//!
//! let mut address = Address::default();
//! binder.bind(&["city3", "24"], &mut address).unwrap();
//! assert_eq!(address.number, 24);
//! assert_eq!(binder.extract(&address).unwrap(), vec!["city3", "24"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use fixlen_model::Schema;

use crate::error::BindError;

/// Primitive type of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Signed integer.
    Int,
    /// Unsigned integer.
    Uint,
    /// Floating point.
    Float,
    /// Text, bound verbatim.
    Text,
    /// Boolean.
    Bool,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "integer",
            Self::Uint => "unsigned integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bool => "boolean",
        };
        f.write_str(name)
    }
}

/// A field value widened to its kind's largest representation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// Parse token text as a value of `kind`.
    ///
    /// Returns the parser's reason on failure.
    pub fn parse(kind: FieldKind, token: &str) -> Result<Self, String> {
        match kind {
            FieldKind::Int => token.parse().map(Self::Int).map_err(|e| e.to_string()),
            FieldKind::Uint => {
                if token.starts_with(['+', '-']) {
                    return Err("sign not allowed for unsigned integer".to_string());
                }
                token.parse().map(Self::Uint).map_err(|e| e.to_string())
            }
            FieldKind::Float => token.parse().map(Self::Float).map_err(|e| e.to_string()),
            FieldKind::Text => Ok(Self::Text(token.to_string())),
            FieldKind::Bool => parse_bool(token).map(Self::Bool),
        }
    }

    /// Render the value as token text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Float(v) => format_float(*v),
            Self::Text(v) => v.clone(),
            Self::Bool(v) => v.to_string(),
        }
    }
}

/// Parse a boolean literal: `true`, `false`, `t`, `f`, `1`, `0`, any case.
pub fn parse_bool(token: &str) -> Result<bool, String> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err("invalid boolean literal".to_string()),
    }
}

/// Format a float in scientific notation: shortest round-trip mantissa, an
/// uppercase `E`, a signed exponent of at least two digits.
///
/// `1.5` renders as `1.5E+00`, `-0.00012` as `-1.2E-04`.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let formatted = format!("{value:E}");
    let (mantissa, exponent) = formatted.split_once('E').unwrap_or((&formatted, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs())
}

/// Rust types that can back a bindable field.
pub trait FieldType: Sized {
    const KIND: FieldKind;

    fn to_value(&self) -> FieldValue;

    /// Narrow a parsed value into `Self`; `None` when out of range.
    fn from_value(value: FieldValue) -> Option<Self>;
}

macro_rules! impl_field_type {
    ($kind:ident, $variant:ident, $wide:ty: $($ty:ty),+) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$kind;

                fn to_value(&self) -> FieldValue {
                    FieldValue::$variant(<$wide>::from(*self))
                }

                fn from_value(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::$variant(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_field_type!(Int, Int, i64: i8, i16, i32, i64);
impl_field_type!(Uint, Uint, u64: u8, u16, u32, u64);

impl FieldType for isize {
    const KIND: FieldKind = FieldKind::Int;

    fn to_value(&self) -> FieldValue {
        FieldValue::Int(*self as i64)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(v) => isize::try_from(v).ok(),
            _ => None,
        }
    }
}

impl FieldType for usize {
    const KIND: FieldKind = FieldKind::Uint;

    fn to_value(&self) -> FieldValue {
        FieldValue::Uint(*self as u64)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Uint(v) => usize::try_from(v).ok(),
            _ => None,
        }
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(f64::from(*self))
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => {
                let narrowed = v as f32;
                (narrowed.is_finite() || !v.is_finite()).then_some(narrowed)
            }
            _ => None,
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

type Getter<T> = Box<dyn Fn(&T) -> FieldValue + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, FieldValue) -> bool + Send + Sync>;

enum Access<T> {
    Typed {
        kind: FieldKind,
        get: Getter<T>,
        set: Setter<T>,
    },
    Unsupported {
        type_name: &'static str,
    },
}

/// Accessor pair for one named field of `T`.
pub struct Field<T> {
    name: String,
    access: Access<T>,
}

impl<T: 'static> Field<T> {
    /// Describe a field through a getter and a mutable getter.
    pub fn new<V: FieldType + 'static>(
        name: impl Into<String>,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        Self {
            name: name.into(),
            access: Access::Typed {
                kind: V::KIND,
                get: Box::new(move |record| get(record).to_value()),
                set: Box::new(move |record, value| match V::from_value(value) {
                    Some(v) => {
                        *get_mut(record) = v;
                        true
                    }
                    None => false,
                }),
            },
        }
    }

    /// Declare a field whose type cannot be bound.
    ///
    /// Binding or extracting a column that maps onto it fails with
    /// [`BindError::UnsupportedFieldType`].
    pub fn unsupported(name: impl Into<String>, type_name: &'static str) -> Self {
        Self {
            name: name.into(),
            access: Access::Unsupported { type_name },
        }
    }
}

impl<T> Field<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind, or `None` for unsupported fields.
    #[must_use]
    pub fn kind(&self) -> Option<FieldKind> {
        match &self.access {
            Access::Typed { kind, .. } => Some(*kind),
            Access::Unsupported { .. } => None,
        }
    }

    fn unsupported_error(&self, type_name: &'static str) -> BindError {
        BindError::UnsupportedFieldType {
            field: self.name.clone(),
            type_name,
        }
    }

    /// Parse `token` and store it in `record`.
    pub fn set(&self, record: &mut T, token: &str) -> Result<(), BindError> {
        match &self.access {
            Access::Typed { kind, set, .. } => {
                let value = FieldValue::parse(*kind, token)
                    .map_err(|reason| BindError::coercion(&self.name, token, *kind, reason))?;
                if set(record, value) {
                    Ok(())
                } else {
                    Err(BindError::coercion(
                        &self.name,
                        token,
                        *kind,
                        "value out of range for field type",
                    ))
                }
            }
            Access::Unsupported { type_name } => Err(self.unsupported_error(type_name)),
        }
    }

    /// Read the field from `record` and render it as token text.
    pub fn render(&self, record: &T) -> Result<String, BindError> {
        match &self.access {
            Access::Typed { get, .. } => Ok(get(record).render()),
            Access::Unsupported { type_name } => Err(self.unsupported_error(type_name)),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Name-indexed set of fields for one record type.
#[derive(Debug)]
pub struct FieldTable<T> {
    fields: Vec<Field<T>>,
    index: BTreeMap<String, usize>,
}

impl<T> FieldTable<T> {
    /// Build a table. When two fields share a name the first one wins.
    #[must_use]
    pub fn new(fields: Vec<Field<T>>) -> Self {
        let mut index = BTreeMap::new();
        for (position, field) in fields.iter().enumerate() {
            index.entry(field.name.clone()).or_insert(position);
        }
        Self { fields, index }
    }

    /// Field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field<T>> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field<T>> {
        self.fields.iter()
    }
}

/// A record type whose fields can be bound by name.
pub trait Record: Sized + 'static {
    /// Describe the bindable fields of this type.
    fn field_table() -> FieldTable<Self>;
}

/// Implement [`Record`] for a struct by listing column names and fields.
///
/// ```
/// # use fixlen_codec::record_fields;
/// #[derive(Default)]
/// struct Address { city: String, main: bool }
///
/// record_fields!(Address { "City" => city, "Main" => main });
/// ```
#[macro_export]
macro_rules! record_fields {
    ($ty:ty { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn field_table() -> $crate::FieldTable<Self> {
                $crate::FieldTable::new(vec![
                    $($crate::Field::<$ty>::new($name, |r| &r.$field, |r| &mut r.$field),)*
                ])
            }
        }
    };
}

/// Schema columns resolved against a record type's field table.
///
/// Build one binder per (schema, record type) pair and reuse it.
#[derive(Debug)]
pub struct Binder<T> {
    table: FieldTable<T>,
    slots: Vec<Option<usize>>,
}

impl<T: Record> Binder<T> {
    /// Resolve `schema` against `T`'s field table.
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        Self::with_table(schema, T::field_table())
    }
}

impl<T> Binder<T> {
    /// Resolve `schema` against an explicit field table.
    #[must_use]
    pub fn with_table(schema: &Schema, table: FieldTable<T>) -> Self {
        let slots = schema
            .iter()
            .map(|column| table.index.get(column.name()).copied())
            .collect();
        Self { table, slots }
    }

    /// Number of schema columns that map onto a field.
    #[must_use]
    pub fn bound_columns(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Store `tokens` (in schema column order) into `target`.
    ///
    /// Columns without a same-named field are skipped. Fails on the first
    /// token that does not coerce; fields set before it keep their new value.
    pub fn bind<S: AsRef<str>>(&self, tokens: &[S], target: &mut T) -> Result<(), BindError> {
        for (slot, token) in self.slots.iter().zip(tokens) {
            if let Some(position) = slot {
                self.table.fields[*position].set(target, token.as_ref())?;
            }
        }
        Ok(())
    }

    /// Render `source` as tokens in schema column order.
    ///
    /// Columns without a same-named field extract as empty text.
    pub fn extract(&self, source: &T) -> Result<Vec<String>, BindError> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(position) => self.table.fields[*position].render(source),
                None => Ok(String::new()),
            })
            .collect()
    }
}

/// Bind `tokens` into `target` using a one-off [`Binder`].
pub fn bind<T: Record, S: AsRef<str>>(
    tokens: &[S],
    schema: &Schema,
    target: &mut T,
) -> Result<(), BindError> {
    Binder::<T>::new(schema).bind(tokens, target)
}

/// Extract tokens from `source` using a one-off [`Binder`].
pub fn extract<T: Record>(source: &T, schema: &Schema) -> Result<Vec<String>, BindError> {
    Binder::<T>::new(schema).extract(source)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use fixlen_model::Column;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        small: i8,
        count: u16,
        ratio: f64,
        label: String,
        flag: bool,
        extra: HashMap<String, String>,
    }

    impl Record for Sample {
        fn field_table() -> FieldTable<Self> {
            FieldTable::new(vec![
                Field::new("Small", |r: &Sample| &r.small, |r: &mut Sample| &mut r.small),
                Field::new("Count", |r: &Sample| &r.count, |r: &mut Sample| &mut r.count),
                Field::new("Ratio", |r: &Sample| &r.ratio, |r: &mut Sample| &mut r.ratio),
                Field::new("Label", |r: &Sample| &r.label, |r: &mut Sample| &mut r.label),
                Field::new("Flag", |r: &Sample| &r.flag, |r: &mut Sample| &mut r.flag),
                Field::unsupported("Extra", "HashMap<String, String>"),
            ])
        }
    }

    fn schema(names: &[&str]) -> Schema {
        Schema::load(names.iter().map(|name| Column::new(*name, 8))).unwrap()
    }

    #[test]
    fn test_bind_all_kinds() {
        let schema = schema(&["Small", "Count", "Ratio", "Label", "Flag"]);
        let mut sample = Sample::default();
        bind(&["-12", "65535", "2.5e3", " text ", "T"], &schema, &mut sample).unwrap();
        assert_eq!(sample.small, -12);
        assert_eq!(sample.count, 65535);
        assert!((sample.ratio - 2500.0).abs() < f64::EPSILON);
        assert_eq!(sample.label, " text ");
        assert!(sample.flag);
    }

    #[test]
    fn test_unknown_columns_are_skipped() {
        let schema = schema(&["Zip", "Count", "Other"]);
        let binder = Binder::<Sample>::new(&schema);
        assert_eq!(binder.bound_columns(), 1);

        let mut sample = Sample::default();
        binder.bind(&["not-a-number", "7", "x"], &mut sample).unwrap();
        assert_eq!(sample.count, 7);
    }

    #[test]
    fn test_integer_coercion_errors() {
        let schema = schema(&["Small"]);
        let mut sample = Sample::default();

        let err = bind(&["abc"], &schema, &mut sample).unwrap_err();
        assert!(matches!(
            err,
            BindError::Coercion { ref field, kind: FieldKind::Int, .. } if field == "Small"
        ));

        let err = bind(&["300"], &schema, &mut sample).unwrap_err();
        assert!(matches!(err, BindError::Coercion { ref reason, .. } if reason.contains("range")));
    }

    #[test]
    fn test_f32_out_of_range() {
        struct Gauge {
            level: f32,
        }
        let table = FieldTable::new(vec![Field::<Gauge>::new(
            "Level",
            |r| &r.level,
            |r| &mut r.level,
        )]);
        let binder = Binder::with_table(&schema(&["Level"]), table);
        let mut gauge = Gauge { level: 0.0 };

        let err = binder.bind(&["1e300"], &mut gauge).unwrap_err();
        assert!(matches!(
            err,
            BindError::Coercion { kind: FieldKind::Float, ref reason, .. } if reason.contains("range")
        ));
        assert!(gauge.level.abs() < f32::EPSILON);

        binder.bind(&["-2.5E+01"], &mut gauge).unwrap();
        assert!((gauge.level + 25.0).abs() < f32::EPSILON);
        binder.bind(&["+Inf"], &mut gauge).unwrap();
        assert!(gauge.level.is_infinite());
    }

    #[test]
    fn test_unsigned_rejects_sign() {
        let schema = schema(&["Count"]);
        let mut sample = Sample::default();
        for token in ["-1", "+1", "1x"] {
            let err = bind(&[token], &schema, &mut sample).unwrap_err();
            assert!(matches!(err, BindError::Coercion { kind: FieldKind::Uint, .. }));
        }
    }

    #[test]
    fn test_bool_lexicon() {
        for (token, expected) in [
            ("true", true),
            ("TRUE", true),
            ("t", true),
            ("1", true),
            ("False", false),
            ("F", false),
            ("0", false),
        ] {
            assert_eq!(parse_bool(token), Ok(expected), "token {token}");
        }
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_unsupported_field() {
        let schema = schema(&["Label", "Extra"]);
        let mut sample = Sample::default();
        let err = bind(&["a", "b"], &schema, &mut sample).unwrap_err();
        assert!(matches!(err, BindError::UnsupportedFieldType { ref field, .. } if field == "Extra"));

        let err = extract(&sample, &schema).unwrap_err();
        assert!(matches!(err, BindError::UnsupportedFieldType { .. }));
    }

    #[test]
    fn test_extract_renders_in_schema_order() {
        let schema = schema(&["Flag", "Ratio", "Missing", "Small", "Count", "Label"]);
        let sample = Sample {
            small: -3,
            count: 42,
            ratio: 1.5,
            label: "abc".to_string(),
            flag: false,
            extra: HashMap::new(),
        };
        let tokens = extract(&sample, &schema).unwrap();
        assert_eq!(tokens, vec!["false", "1.5E+00", "", "-3", "42", "abc"]);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.5), "1.5E+00");
        assert_eq!(format_float(100.0), "1E+02");
        assert_eq!(format_float(0.0), "0E+00");
        assert_eq!(format_float(-0.00012), "-1.2E-04");
        assert_eq!(format_float(1.25e123), "1.25E+123");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_first_field_wins_on_duplicate_name() {
        let table: FieldTable<Sample> = FieldTable::new(vec![
            Field::new("Label", |r: &Sample| &r.label, |r: &mut Sample| &mut r.label),
            Field::new("Label", |r: &Sample| &r.small, |r: &mut Sample| &mut r.small),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Label").and_then(Field::kind), Some(FieldKind::Text));
    }
}
