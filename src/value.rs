use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
#[cfg(feature = "span")]
use miette::SourceSpan;

use crate::{
    ArrayFormat, DateTimeFormat, FloatFormat, IntegerFormat, StringFormat, TableFormat, TomlArray,
    TomlError, TomlTable, TomlTypeError,
};

/// The kind of a [`TomlValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TomlKind {
    /// An uninitialized value.
    Empty,
    /// `true` / `false`.
    Boolean,
    /// A 64-bit signed integer, in any radix.
    Integer,
    /// A 64-bit float.
    Float,
    /// A string, in any quoting style.
    String,
    /// A date without time or offset.
    LocalDate,
    /// A time without date or offset.
    LocalTime,
    /// A date and time without offset.
    LocalDateTime,
    /// A date and time with UTC offset.
    OffsetDateTime,
    /// An array of values.
    Array,
    /// A table of key/value pairs.
    Table,
}

impl Display for TomlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TomlKind::Empty => "empty",
            TomlKind::Boolean => "boolean",
            TomlKind::Integer => "integer",
            TomlKind::Float => "float",
            TomlKind::String => "string",
            TomlKind::LocalDate => "local date",
            TomlKind::LocalTime => "local time",
            TomlKind::LocalDateTime => "local date-time",
            TomlKind::OffsetDateTime => "offset date-time",
            TomlKind::Array => "array",
            TomlKind::Table => "table",
        };
        write!(f, "{}", name)
    }
}

/// The payload of a [`TomlValue`].
///
/// Each variant co-locates the kind-specific data with the kind-specific
/// format descriptor, so a payload and a format of different kinds cannot
/// exist on one value.
#[derive(Debug, Clone)]
pub enum TomlData {
    /// An uninitialized value. Never produced by parsing.
    Empty,
    /// A boolean.
    Boolean(bool),
    /// An integer and its radix/grouping format.
    Integer(i64, IntegerFormat),
    /// A float and its notation format.
    Float(f64, FloatFormat),
    /// A string and its quoting format.
    String(String, StringFormat),
    /// A local date.
    LocalDate(NaiveDate, DateTimeFormat),
    /// A local time.
    LocalTime(NaiveTime, DateTimeFormat),
    /// A local date-time.
    LocalDateTime(NaiveDateTime, DateTimeFormat),
    /// An offset date-time.
    OffsetDateTime(DateTime<FixedOffset>, DateTimeFormat),
    /// An array and its layout format.
    Array(TomlArray, ArrayFormat),
    /// A table and its layout format.
    Table(TomlTable, TableFormat),
}

impl TomlData {
    /// The kind tag for this payload.
    pub fn kind(&self) -> TomlKind {
        match self {
            TomlData::Empty => TomlKind::Empty,
            TomlData::Boolean(..) => TomlKind::Boolean,
            TomlData::Integer(..) => TomlKind::Integer,
            TomlData::Float(..) => TomlKind::Float,
            TomlData::String(..) => TomlKind::String,
            TomlData::LocalDate(..) => TomlKind::LocalDate,
            TomlData::LocalTime(..) => TomlKind::LocalTime,
            TomlData::LocalDateTime(..) => TomlKind::LocalDateTime,
            TomlData::OffsetDateTime(..) => TomlKind::OffsetDateTime,
            TomlData::Array(..) => TomlKind::Array,
            TomlData::Table(..) => TomlKind::Table,
        }
    }
}

// Structural equality: payloads only. Format descriptors never change the
// effective value, so they are ignored, as are comments and spans.
impl PartialEq for TomlData {
    fn eq(&self, other: &Self) -> bool {
        use TomlData::*;
        match (self, other) {
            (Empty, Empty) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a, _), Integer(b, _)) => a == b,
            (Float(a, _), Float(b, _)) => a == b,
            (String(a, _), String(b, _)) => a == b,
            (LocalDate(a, _), LocalDate(b, _)) => a == b,
            (LocalTime(a, _), LocalTime(b, _)) => a == b,
            (LocalDateTime(a, _), LocalDateTime(b, _)) => a == b,
            (OffsetDateTime(a, _), OffsetDateTime(b, _)) => a == b,
            (Array(a, _), Array(b, _)) => a == b,
            (Table(a, _), Table(b, _)) => a == b,
            _ => false,
        }
    }
}

/// A single TOML value: the payload plus everything needed to reproduce how
/// it was written.
///
/// Values parsed from a document keep their format descriptor (radix,
/// quoting style, layout), the comment lines written directly above them,
/// the comment written after them on the same line, and their source span.
/// Programmatically constructed values start format-neutral with no
/// comments.
///
/// ```rust
/// use tomled::TomlValue;
///
/// let value: TomlValue = "0xDEAD_BEEF".parse().unwrap();
/// assert_eq!(value.as_integer(), Some(3735928559));
/// // The original spelling survives serialization:
/// assert_eq!(value.to_string(), "0xDEAD_BEEF");
/// ```
#[derive(Debug, Clone)]
pub struct TomlValue {
    pub(crate) data: TomlData,
    pub(crate) comments: Vec<String>,
    pub(crate) trailing_comment: Option<String>,
    #[cfg(feature = "span")]
    pub(crate) span: Option<SourceSpan>,
}

impl PartialEq for TomlValue {
    fn eq(&self, other: &Self) -> bool {
        // comments, trailing_comment, and span intentionally omitted.
        self.data == other.data
    }
}

impl Default for TomlValue {
    fn default() -> Self {
        TomlValue::empty()
    }
}

impl TomlValue {
    pub(crate) fn from_data(data: TomlData) -> Self {
        TomlValue {
            data,
            comments: Vec::new(),
            trailing_comment: None,
            #[cfg(feature = "span")]
            span: None,
        }
    }

    /// Creates an uninitialized value.
    pub fn empty() -> Self {
        TomlValue::from_data(TomlData::Empty)
    }

    /// Creates a boolean value.
    pub fn boolean(value: bool) -> Self {
        TomlValue::from_data(TomlData::Boolean(value))
    }

    /// Creates an integer value with neutral (decimal) formatting.
    pub fn integer(value: i64) -> Self {
        TomlValue::from_data(TomlData::Integer(value, IntegerFormat::default()))
    }

    /// Creates an integer value with an explicit format descriptor.
    pub fn integer_with_format(value: i64, format: IntegerFormat) -> Self {
        TomlValue::from_data(TomlData::Integer(value, format))
    }

    /// Creates a float value with neutral formatting.
    pub fn float(value: f64) -> Self {
        TomlValue::from_data(TomlData::Float(value, FloatFormat::default()))
    }

    /// Creates a float value with an explicit format descriptor.
    pub fn float_with_format(value: f64, format: FloatFormat) -> Self {
        TomlValue::from_data(TomlData::Float(value, format))
    }

    /// Creates a string value with neutral formatting.
    pub fn string(value: impl Into<String>) -> Self {
        TomlValue::from_data(TomlData::String(value.into(), StringFormat::default()))
    }

    /// Creates a string value with an explicit format descriptor.
    pub fn string_with_format(value: impl Into<String>, format: StringFormat) -> Self {
        TomlValue::from_data(TomlData::String(value.into(), format))
    }

    /// Creates a local date value.
    pub fn local_date(value: NaiveDate) -> Self {
        TomlValue::from_data(TomlData::LocalDate(value, DateTimeFormat::default()))
    }

    /// Creates a local time value.
    pub fn local_time(value: NaiveTime) -> Self {
        TomlValue::from_data(TomlData::LocalTime(value, DateTimeFormat::default()))
    }

    /// Creates a local date-time value.
    pub fn local_date_time(value: NaiveDateTime) -> Self {
        TomlValue::from_data(TomlData::LocalDateTime(value, DateTimeFormat::default()))
    }

    /// Creates an offset date-time value.
    pub fn offset_date_time(value: DateTime<FixedOffset>) -> Self {
        TomlValue::from_data(TomlData::OffsetDateTime(value, DateTimeFormat::default()))
    }

    /// Creates a date or time value with an explicit format descriptor.
    pub fn date_time_with_format(data: TomlData, format: DateTimeFormat) -> Self {
        let data = match data {
            TomlData::LocalDate(d, _) => TomlData::LocalDate(d, format),
            TomlData::LocalTime(t, _) => TomlData::LocalTime(t, format),
            TomlData::LocalDateTime(dt, _) => TomlData::LocalDateTime(dt, format),
            TomlData::OffsetDateTime(dt, _) => TomlData::OffsetDateTime(dt, format),
            other => other,
        };
        TomlValue::from_data(data)
    }

    /// Creates an array value with neutral layout.
    pub fn array(values: impl IntoIterator<Item = TomlValue>) -> Self {
        TomlValue::from_data(TomlData::Array(
            values.into_iter().collect(),
            ArrayFormat::default(),
        ))
    }

    /// Creates an array value with an explicit format descriptor.
    pub fn array_with_format(array: TomlArray, format: ArrayFormat) -> Self {
        TomlValue::from_data(TomlData::Array(array, format))
    }

    /// Creates a table value with neutral layout.
    pub fn table(table: TomlTable) -> Self {
        TomlValue::from_data(TomlData::Table(table, TableFormat::default()))
    }

    /// Creates a table value with an explicit format descriptor.
    pub fn table_with_format(table: TomlTable, format: TableFormat) -> Self {
        TomlValue::from_data(TomlData::Table(table, format))
    }

    /// Attaches leading comment lines to this value, replacing any existing
    /// ones. Each entry is one full comment, marker included, e.g.
    /// `"# speed of light"`.
    pub fn with_comments(mut self, comments: impl IntoIterator<Item = String>) -> Self {
        self.comments = comments.into_iter().collect();
        self
    }

    /// Attaches a same-line trailing comment to this value.
    pub fn with_trailing_comment(mut self, comment: impl Into<String>) -> Self {
        self.trailing_comment = Some(comment.into());
        self
    }
}

impl TomlValue {
    /// The kind of this value.
    pub fn kind(&self) -> TomlKind {
        self.data.kind()
    }

    /// This value's payload and format.
    pub fn data(&self) -> &TomlData {
        &self.data
    }

    /// A mutable reference to this value's payload and format.
    pub fn data_mut(&mut self) -> &mut TomlData {
        &mut self.data
    }

    /// Replaces this value's payload (and, with it, the format descriptor),
    /// keeping comments and span.
    pub fn set_data(&mut self, data: TomlData) {
        self.data = data;
    }

    /// Returns `true` if the value is uninitialized.
    pub fn is_empty_value(&self) -> bool {
        matches!(self.data, TomlData::Empty)
    }

    /// Returns `true` if the value is a boolean.
    pub fn is_boolean(&self) -> bool {
        matches!(self.data, TomlData::Boolean(..))
    }

    /// Returns `true` if the value is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self.data, TomlData::Integer(..))
    }

    /// Returns `true` if the value is a float.
    pub fn is_float(&self) -> bool {
        matches!(self.data, TomlData::Float(..))
    }

    /// Returns `true` if the value is a string.
    pub fn is_string(&self) -> bool {
        matches!(self.data, TomlData::String(..))
    }

    /// Returns `true` if the value is a local date.
    pub fn is_local_date(&self) -> bool {
        matches!(self.data, TomlData::LocalDate(..))
    }

    /// Returns `true` if the value is a local time.
    pub fn is_local_time(&self) -> bool {
        matches!(self.data, TomlData::LocalTime(..))
    }

    /// Returns `true` if the value is a local date-time.
    pub fn is_local_date_time(&self) -> bool {
        matches!(self.data, TomlData::LocalDateTime(..))
    }

    /// Returns `true` if the value is an offset date-time.
    pub fn is_offset_date_time(&self) -> bool {
        matches!(self.data, TomlData::OffsetDateTime(..))
    }

    /// Returns `true` if the value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self.data, TomlData::Array(..))
    }

    /// Returns `true` if the value is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.data, TomlData::Table(..))
    }

    /// Returns `Some(bool)` if the value is a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match &self.data {
            TomlData::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `Some(i64)` if the value is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match &self.data {
            TomlData::Integer(i, _) => Some(*i),
            _ => None,
        }
    }

    /// Returns `Some(f64)` if the value is a float.
    pub fn as_float(&self) -> Option<f64> {
        match &self.data {
            TomlData::Float(f, _) => Some(*f),
            _ => None,
        }
    }

    /// Returns `Some(&str)` if the value is a string.
    pub fn as_string(&self) -> Option<&str> {
        match &self.data {
            TomlData::String(s, _) => Some(s),
            _ => None,
        }
    }

    /// Returns the local date payload, if this is a local date.
    pub fn as_local_date(&self) -> Option<NaiveDate> {
        match &self.data {
            TomlData::LocalDate(d, _) => Some(*d),
            _ => None,
        }
    }

    /// Returns the local time payload, if this is a local time.
    pub fn as_local_time(&self) -> Option<NaiveTime> {
        match &self.data {
            TomlData::LocalTime(t, _) => Some(*t),
            _ => None,
        }
    }

    /// Returns the local date-time payload, if this is a local date-time.
    pub fn as_local_date_time(&self) -> Option<NaiveDateTime> {
        match &self.data {
            TomlData::LocalDateTime(dt, _) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the offset date-time payload, if this is an offset
    /// date-time.
    pub fn as_offset_date_time(&self) -> Option<DateTime<FixedOffset>> {
        match &self.data {
            TomlData::OffsetDateTime(dt, _) => Some(*dt),
            _ => None,
        }
    }

    /// Returns the array payload, if this is an array.
    pub fn as_array(&self) -> Option<&TomlArray> {
        match &self.data {
            TomlData::Array(a, _) => Some(a),
            _ => None,
        }
    }

    /// Returns the array payload mutably, if this is an array.
    pub fn as_array_mut(&mut self) -> Option<&mut TomlArray> {
        match &mut self.data {
            TomlData::Array(a, _) => Some(a),
            _ => None,
        }
    }

    /// Returns the table payload, if this is a table.
    pub fn as_table(&self) -> Option<&TomlTable> {
        match &self.data {
            TomlData::Table(t, _) => Some(t),
            _ => None,
        }
    }

    /// Returns the table payload mutably, if this is a table.
    pub fn as_table_mut(&mut self) -> Option<&mut TomlTable> {
        match &mut self.data {
            TomlData::Table(t, _) => Some(t),
            _ => None,
        }
    }

    fn type_error(&self, expected: TomlKind) -> TomlTypeError {
        TomlTypeError {
            expected,
            found: self.kind(),
        }
    }

    /// Like [`TomlValue::as_boolean`], but reports the mismatching kind on
    /// failure.
    pub fn try_boolean(&self) -> Result<bool, TomlTypeError> {
        self.as_boolean()
            .ok_or_else(|| self.type_error(TomlKind::Boolean))
    }

    /// Like [`TomlValue::as_integer`], but reports the mismatching kind on
    /// failure.
    pub fn try_integer(&self) -> Result<i64, TomlTypeError> {
        self.as_integer()
            .ok_or_else(|| self.type_error(TomlKind::Integer))
    }

    /// Like [`TomlValue::as_float`], but reports the mismatching kind on
    /// failure.
    pub fn try_float(&self) -> Result<f64, TomlTypeError> {
        self.as_float()
            .ok_or_else(|| self.type_error(TomlKind::Float))
    }

    /// Like [`TomlValue::as_string`], but reports the mismatching kind on
    /// failure.
    pub fn try_string(&self) -> Result<&str, TomlTypeError> {
        match &self.data {
            TomlData::String(s, _) => Ok(s),
            _ => Err(self.type_error(TomlKind::String)),
        }
    }

    /// Like [`TomlValue::as_array`], but reports the mismatching kind on
    /// failure.
    pub fn try_array(&self) -> Result<&TomlArray, TomlTypeError> {
        match &self.data {
            TomlData::Array(a, _) => Ok(a),
            _ => Err(self.type_error(TomlKind::Array)),
        }
    }

    /// Like [`TomlValue::as_table`], but reports the mismatching kind on
    /// failure.
    pub fn try_table(&self) -> Result<&TomlTable, TomlTypeError> {
        match &self.data {
            TomlData::Table(t, _) => Ok(t),
            _ => Err(self.type_error(TomlKind::Table)),
        }
    }
}

impl TomlValue {
    /// The integer format descriptor, if this is an integer.
    pub fn integer_format(&self) -> Option<&IntegerFormat> {
        match &self.data {
            TomlData::Integer(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The integer format descriptor mutably, if this is an integer.
    pub fn integer_format_mut(&mut self) -> Option<&mut IntegerFormat> {
        match &mut self.data {
            TomlData::Integer(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The float format descriptor, if this is a float.
    pub fn float_format(&self) -> Option<&FloatFormat> {
        match &self.data {
            TomlData::Float(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The float format descriptor mutably, if this is a float.
    pub fn float_format_mut(&mut self) -> Option<&mut FloatFormat> {
        match &mut self.data {
            TomlData::Float(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The string format descriptor, if this is a string.
    pub fn string_format(&self) -> Option<&StringFormat> {
        match &self.data {
            TomlData::String(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The string format descriptor mutably, if this is a string.
    pub fn string_format_mut(&mut self) -> Option<&mut StringFormat> {
        match &mut self.data {
            TomlData::String(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The date-time format descriptor, if this is any date or time kind.
    pub fn date_time_format(&self) -> Option<&DateTimeFormat> {
        match &self.data {
            TomlData::LocalDate(_, fmt)
            | TomlData::LocalTime(_, fmt)
            | TomlData::LocalDateTime(_, fmt)
            | TomlData::OffsetDateTime(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The date-time format descriptor mutably, if this is any date or time
    /// kind.
    pub fn date_time_format_mut(&mut self) -> Option<&mut DateTimeFormat> {
        match &mut self.data {
            TomlData::LocalDate(_, fmt)
            | TomlData::LocalTime(_, fmt)
            | TomlData::LocalDateTime(_, fmt)
            | TomlData::OffsetDateTime(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The array format descriptor, if this is an array.
    pub fn array_format(&self) -> Option<&ArrayFormat> {
        match &self.data {
            TomlData::Array(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The array format descriptor mutably, if this is an array.
    pub fn array_format_mut(&mut self) -> Option<&mut ArrayFormat> {
        match &mut self.data {
            TomlData::Array(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The table format descriptor, if this is a table.
    pub fn table_format(&self) -> Option<&TableFormat> {
        match &self.data {
            TomlData::Table(_, fmt) => Some(fmt),
            _ => None,
        }
    }

    /// The table format descriptor mutably, if this is a table.
    pub fn table_format_mut(&mut self) -> Option<&mut TableFormat> {
        match &mut self.data {
            TomlData::Table(_, fmt) => Some(fmt),
            _ => None,
        }
    }
}

impl TomlValue {
    /// The comment lines written directly above this value, verbatim,
    /// marker included.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// The comment lines above this value, mutably.
    pub fn comments_mut(&mut self) -> &mut Vec<String> {
        &mut self.comments
    }

    /// Replaces the comment lines above this value.
    pub fn set_comments(&mut self, comments: impl IntoIterator<Item = String>) {
        self.comments = comments.into_iter().collect();
    }

    /// The comment on the same line after this value, if any.
    pub fn trailing_comment(&self) -> Option<&str> {
        self.trailing_comment.as_deref()
    }

    /// Sets the comment on the same line after this value.
    pub fn set_trailing_comment(&mut self, comment: impl Into<String>) {
        self.trailing_comment = Some(comment.into());
    }

    /// This value's span in the source it was parsed from, if any.
    ///
    /// Programmatically constructed values have no span. Spans are not
    /// maintained across mutation.
    #[cfg(feature = "span")]
    pub fn span(&self) -> Option<SourceSpan> {
        self.span
    }

    /// Sets this value's span.
    #[cfg(feature = "span")]
    pub fn set_span(&mut self, span: impl Into<SourceSpan>) {
        self.span = Some(span.into());
    }

    /// Resets every format descriptor in this value (and, for containers,
    /// every contained value) to the neutral default. Comments are kept.
    pub fn clear_fmt(&mut self) {
        match &mut self.data {
            TomlData::Empty | TomlData::Boolean(..) => {}
            TomlData::Integer(_, fmt) => *fmt = IntegerFormat::default(),
            TomlData::Float(_, fmt) => *fmt = FloatFormat::default(),
            TomlData::String(_, fmt) => *fmt = StringFormat::default(),
            TomlData::LocalDate(_, fmt)
            | TomlData::LocalTime(_, fmt)
            | TomlData::LocalDateTime(_, fmt)
            | TomlData::OffsetDateTime(_, fmt) => *fmt = DateTimeFormat::default(),
            TomlData::Array(array, fmt) => {
                *fmt = ArrayFormat::default();
                for value in array.iter_mut() {
                    value.clear_fmt();
                }
            }
            TomlData::Table(table, fmt) => {
                *fmt = TableFormat::default();
                for (_, value) in table.iter_mut() {
                    value.clear_fmt();
                }
            }
        }
    }

    /// Removes every comment from this value and, for containers, every
    /// contained value.
    pub fn clear_comments(&mut self) {
        self.comments.clear();
        self.trailing_comment = None;
        match &mut self.data {
            TomlData::Array(array, _) => {
                for value in array.iter_mut() {
                    value.clear_comments();
                }
            }
            TomlData::Table(table, _) => {
                for (_, value) in table.iter_mut() {
                    value.clear_comments();
                }
            }
            _ => {}
        }
    }
}

impl Display for TomlValue {
    /// Renders this value as it would appear on the right-hand side of a
    /// key/value pair, under the default [`TomlSpec`](crate::TomlSpec).
    ///
    /// A format width (`{:width$}`) is taken as a layout width hint for
    /// auto-formatted arrays and tables.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = crate::ser::format_value_hinted(
            self,
            &crate::TomlSpec::default(),
            f.width().unwrap_or(crate::ser::DEFAULT_WIDTH_HINT),
        );
        write!(f, "{}", rendered)
    }
}

impl FromStr for TomlValue {
    type Err = TomlError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        crate::parser::parse_value(input)
    }
}

impl From<bool> for TomlValue {
    fn from(value: bool) -> Self {
        TomlValue::boolean(value)
    }
}

impl From<i64> for TomlValue {
    fn from(value: i64) -> Self {
        TomlValue::integer(value)
    }
}

impl From<f64> for TomlValue {
    fn from(value: f64) -> Self {
        TomlValue::float(value)
    }
}

impl From<&str> for TomlValue {
    fn from(value: &str) -> Self {
        TomlValue::string(value)
    }
}

impl From<String> for TomlValue {
    fn from(value: String) -> Self {
        TomlValue::string(value)
    }
}

impl From<TomlTable> for TomlValue {
    fn from(value: TomlTable) -> Self {
        TomlValue::table(value)
    }
}

impl From<TomlArray> for TomlValue {
    fn from(value: TomlArray) -> Self {
        TomlValue::array(value)
    }
}
