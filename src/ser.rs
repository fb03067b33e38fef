//! Serialization of value trees back to TOML text.
//!
//! Every value carries a format descriptor describing how it was written
//! (or, for programmatically constructed values, a neutral default), and the
//! functions here turn a tree back into text honoring those descriptors:
//! number radix and digit grouping, string quoting style, array and table
//! layout, and attached comments. All numeric output uses `.` as the decimal
//! point and is independent of the process locale.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike};

use crate::{
    ArrayFormat, ArrayStyle, DateTimeDelimiter, DateTimeFormat, FloatFormat, FloatStyle,
    IntegerFormat, IntegerRadix, OffsetStyle, StringFormat, StringStyle, TableFormat, TableStyle,
    TomlArray, TomlData, TomlDocument, TomlSpec, TomlTable, TomlValue,
};

/// Layout width used when the caller gives no hint of its own.
pub(crate) const DEFAULT_WIDTH_HINT: usize = 80;

/// Renders a whole document, dialect-gated extensions (numeric suffixes, hex
/// floats) included only when `spec` enables them.
pub fn format_document(doc: &TomlDocument, spec: &TomlSpec) -> String {
    let mut out = String::new();
    if let Some(table) = doc.root().as_table() {
        let fmt = doc
            .root()
            .table_format()
            .cloned()
            .unwrap_or_default();
        write_table_body(&mut out, table, &fmt, &mut Vec::new(), spec);
    }
    for comment in doc.trailing_comments() {
        out.push_str(comment);
        out.push('\n');
    }
    out
}

/// Renders a single value as it would appear on the right-hand side of a
/// key/value pair.
pub fn format_value(value: &TomlValue, spec: &TomlSpec) -> String {
    format_value_hinted(value, spec, DEFAULT_WIDTH_HINT)
}

/// Like [`format_value`], with a width hint that auto-formatted arrays use
/// to decide between oneline and multiline layout.
pub fn format_value_hinted(value: &TomlValue, spec: &TomlSpec, width: usize) -> String {
    let mut out = String::new();
    write_value(&mut out, value, spec, width);
    out
}

fn write_value(out: &mut String, value: &TomlValue, spec: &TomlSpec, width: usize) {
    match value.data() {
        TomlData::Empty => {}
        TomlData::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        TomlData::Integer(v, fmt) => write_integer(out, *v, fmt, spec),
        TomlData::Float(v, fmt) => write_float(out, *v, fmt, spec),
        TomlData::String(s, fmt) => write_string(out, s, fmt),
        TomlData::LocalDate(d, _) => write_date(out, *d),
        TomlData::LocalTime(t, fmt) => write_time(out, *t, fmt, spec),
        TomlData::LocalDateTime(dt, fmt) => {
            write_date(out, dt.date());
            out.push(delimiter_char(fmt.delimiter));
            write_time(out, dt.time(), fmt, spec);
        }
        TomlData::OffsetDateTime(dt, fmt) => write_offset_date_time(out, dt, fmt, spec),
        TomlData::Array(a, fmt) => write_array(out, a, fmt, spec, width),
        TomlData::Table(t, _) => write_inline_table(out, t, spec, width),
    }
}

// ===========================================================================
// Numbers
// ===========================================================================

fn write_integer(out: &mut String, value: i64, fmt: &IntegerFormat, spec: &TomlSpec) {
    // TOML has no signed prefixed literals, so negative values always render
    // in decimal.
    let radix = if value < 0 {
        IntegerRadix::Decimal
    } else {
        fmt.radix
    };
    let magnitude = value.unsigned_abs();
    let mut digits = match radix {
        IntegerRadix::Binary => format!("{:b}", magnitude),
        IntegerRadix::Octal => format!("{:o}", magnitude),
        IntegerRadix::Decimal => format!("{}", magnitude),
        IntegerRadix::Hexadecimal if fmt.uppercase => format!("{:X}", magnitude),
        IntegerRadix::Hexadecimal => format!("{:x}", magnitude),
    };
    if radix != IntegerRadix::Decimal && fmt.width > digits.len() {
        let mut padded = "0".repeat(fmt.width - digits.len());
        padded.push_str(&digits);
        digits = padded;
    }
    if let Some(every) = fmt.spacing {
        if every > 0 {
            digits = group_digits(&digits, every);
        }
    }
    if value < 0 {
        out.push('-');
    }
    out.push_str(radix.prefix());
    out.push_str(&digits);
    push_suffix(out, fmt.suffix.as_deref(), spec);
}

/// Inserts `_` separators between groups of `every` digits, counted from the
/// least significant digit.
fn group_digits(digits: &str, every: usize) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / every);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % every == 0 {
            grouped.push('_');
        }
        grouped.push(*c);
    }
    grouped
}

fn push_suffix(out: &mut String, suffix: Option<&str>, spec: &TomlSpec) {
    if let (Some(suffix), true) = (suffix, spec.ext_num_suffix) {
        out.push('_');
        out.push_str(suffix);
    }
}

fn write_float(out: &mut String, value: f64, fmt: &FloatFormat, spec: &TomlSpec) {
    if value.is_nan() {
        out.push_str(if value.is_sign_negative() { "-nan" } else { "nan" });
        push_suffix(out, fmt.suffix.as_deref(), spec);
        return;
    }
    if value.is_infinite() {
        out.push_str(if value < 0.0 { "-inf" } else { "inf" });
        push_suffix(out, fmt.suffix.as_deref(), spec);
        return;
    }
    let style = match fmt.style {
        FloatStyle::Hex if !spec.ext_hex_float => FloatStyle::Auto,
        style => style,
    };
    match style {
        FloatStyle::Auto => push_float_plain(out, value),
        FloatStyle::Fixed => match fmt.precision {
            Some(precision) => out.push_str(&format!("{:.*}", precision, value)),
            None => push_float_plain(out, value),
        },
        FloatStyle::Scientific => {
            let rendered = match fmt.precision {
                Some(precision) => format!("{:.*e}", precision, value),
                None => format!("{:e}", value),
            };
            // Rust writes `1.0e0`; TOML convention is a signed, zero-padded
            // exponent like `1.0e+00`.
            match rendered.rfind('e') {
                Some(pos) => {
                    let exponent: i32 = rendered[pos + 1..].parse().unwrap_or(0);
                    out.push_str(&rendered[..pos]);
                    out.push_str(&format!("e{:+03}", exponent));
                }
                None => out.push_str(&rendered),
            }
        }
        FloatStyle::Hex => write_hex_float(out, value),
    }
    push_suffix(out, fmt.suffix.as_deref(), spec);
}

/// Shortest decimal rendering that round-trips, with a decimal point forced
/// in so the value re-parses as a float.
fn push_float_plain(out: &mut String, value: f64) {
    let rendered = value.to_string();
    let needs_point = !rendered.contains('.');
    out.push_str(&rendered);
    if needs_point {
        out.push_str(".0");
    }
}

fn write_hex_float(out: &mut String, value: f64) {
    if value.is_sign_negative() {
        out.push('-');
    }
    let magnitude = value.abs();
    if magnitude == 0.0 {
        out.push_str("0x0p+0");
        return;
    }
    let bits = magnitude.to_bits();
    let raw_exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & 0x000f_ffff_ffff_ffff;
    let (lead, exponent) = if raw_exponent == 0 {
        ('0', -1022)
    } else {
        ('1', raw_exponent - 1023)
    };
    let mut frac_hex = format!("{:013x}", fraction);
    while frac_hex.ends_with('0') {
        frac_hex.pop();
    }
    if frac_hex.is_empty() {
        out.push_str(&format!("0x{}p{:+}", lead, exponent));
    } else {
        out.push_str(&format!("0x{}.{}p{:+}", lead, frac_hex, exponent));
    }
}

// ===========================================================================
// Strings
// ===========================================================================

fn write_string(out: &mut String, s: &str, fmt: &StringFormat) {
    match effective_string_style(s, fmt) {
        StringStyle::Literal => {
            out.push('\'');
            out.push_str(s);
            out.push('\'');
        }
        StringStyle::MultilineLiteral => {
            out.push_str("'''");
            if fmt.start_with_newline {
                out.push('\n');
            }
            out.push_str(s);
            out.push_str("'''");
        }
        StringStyle::MultilineBasic => {
            out.push_str("\"\"\"");
            if fmt.start_with_newline {
                out.push('\n');
            }
            push_ml_basic(out, s);
            out.push_str("\"\"\"");
        }
        _ => {
            out.push('"');
            for c in s.chars() {
                push_basic_escaped(out, c);
            }
            out.push('"');
        }
    }
}

/// Resolves `Auto` and falls back to an escaping style when the requested
/// verbatim style cannot represent the content.
fn effective_string_style(s: &str, fmt: &StringFormat) -> StringStyle {
    match fmt.style {
        StringStyle::Auto => {
            if s.contains('\n') {
                StringStyle::MultilineBasic
            } else {
                StringStyle::Basic
            }
        }
        StringStyle::Basic => StringStyle::Basic,
        StringStyle::Literal => {
            if literal_representable(s) {
                StringStyle::Literal
            } else {
                StringStyle::Basic
            }
        }
        StringStyle::MultilineBasic => StringStyle::MultilineBasic,
        StringStyle::MultilineLiteral => {
            if ml_literal_representable(s) {
                StringStyle::MultilineLiteral
            } else {
                StringStyle::MultilineBasic
            }
        }
    }
}

fn literal_representable(s: &str) -> bool {
    !s.chars()
        .any(|c| c == '\'' || c == '\u{7f}' || (c != '\t' && (c as u32) < 0x20))
}

fn ml_literal_representable(s: &str) -> bool {
    !s.contains("'''")
        && !s.chars().any(|c| {
            c == '\u{7f}' || (c != '\t' && c != '\n' && (c as u32) < 0x20)
        })
}

fn push_basic_escaped(out: &mut String, c: char) {
    match c {
        '\u{0008}' => out.push_str("\\b"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\u{000C}' => out.push_str("\\f"),
        '\r' => out.push_str("\\r"),
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        c if (c as u32) < 0x20 || c == '\u{7f}' => {
            out.push_str(&format!("\\u{:04X}", c as u32));
        }
        c => out.push(c),
    }
}

/// Multiline-basic content: newlines and tabs stay verbatim, and any run of
/// quotation marks that could form a delimiter gets one escaped.
fn push_ml_basic(out: &mut String, s: &str) {
    let chars: Vec<char> = s.chars().collect();
    let mut quote_run = 0usize;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' => {
                quote_run += 1;
                if quote_run == 3 || i == chars.len() - 1 {
                    out.push_str("\\\"");
                    quote_run = 0;
                } else {
                    out.push('"');
                }
            }
            _ => {
                quote_run = 0;
                match c {
                    '\n' | '\t' => out.push(c),
                    '\\' => out.push_str("\\\\"),
                    '\u{0008}' => out.push_str("\\b"),
                    '\u{000C}' => out.push_str("\\f"),
                    '\r' => out.push_str("\\r"),
                    c if (c as u32) < 0x20 || c == '\u{7f}' => {
                        out.push_str(&format!("\\u{:04X}", c as u32));
                    }
                    c => out.push(c),
                }
            }
        }
    }
}

// ===========================================================================
// Dates and times
// ===========================================================================

fn delimiter_char(delimiter: DateTimeDelimiter) -> char {
    match delimiter {
        DateTimeDelimiter::T => 'T',
        DateTimeDelimiter::LowerT => 't',
        DateTimeDelimiter::Space => ' ',
    }
}

fn write_date(out: &mut String, date: NaiveDate) {
    out.push_str(&format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    ));
}

fn write_time(out: &mut String, time: NaiveTime, fmt: &DateTimeFormat, spec: &TomlSpec) {
    out.push_str(&format!("{:02}:{:02}", time.hour(), time.minute()));
    if fmt.has_seconds || !spec.optional_seconds {
        out.push_str(&format!(":{:02}", time.second()));
        if let Some(digits) = fmt.subsec_digits {
            if digits > 0 {
                let nanos = format!("{:09}", time.nanosecond());
                out.push('.');
                if digits <= 9 {
                    out.push_str(&nanos[..digits]);
                } else {
                    out.push_str(&nanos);
                    out.push_str(&"0".repeat(digits - 9));
                }
            }
        }
    }
}

fn write_offset_date_time(
    out: &mut String,
    dt: &DateTime<FixedOffset>,
    fmt: &DateTimeFormat,
    spec: &TomlSpec,
) {
    let naive = dt.naive_local();
    write_date(out, naive.date());
    out.push(delimiter_char(fmt.delimiter));
    write_time(out, naive.time(), fmt, spec);
    let seconds = dt.offset().local_minus_utc();
    match fmt.offset {
        OffsetStyle::Zulu if seconds == 0 => out.push('Z'),
        OffsetStyle::LowerZulu if seconds == 0 => out.push('z'),
        _ => {
            let sign = if seconds < 0 { '-' } else { '+' };
            let magnitude = seconds.unsigned_abs();
            out.push_str(&format!(
                "{}{:02}:{:02}",
                sign,
                magnitude / 3600,
                (magnitude % 3600) / 60
            ));
        }
    }
}

// ===========================================================================
// Arrays and inline tables
// ===========================================================================

fn write_array(out: &mut String, array: &TomlArray, fmt: &ArrayFormat, spec: &TomlSpec, width: usize) {
    let style = match fmt.style {
        ArrayStyle::Oneline => ArrayStyle::Oneline,
        ArrayStyle::Multiline => ArrayStyle::Multiline,
        // Auto, and arrays of tables that ended up in value position.
        _ => {
            let has_comments = array
                .iter()
                .any(|v| !v.comments().is_empty() || v.trailing_comment().is_some());
            if has_comments {
                ArrayStyle::Multiline
            } else {
                let oneline = oneline_array(array, spec, width);
                if oneline.chars().count() <= width {
                    out.push_str(&oneline);
                    return;
                }
                ArrayStyle::Multiline
            }
        }
    };
    match style {
        ArrayStyle::Oneline => out.push_str(&oneline_array(array, spec, width)),
        _ => {
            let indent = fmt.indent_char.repeat(fmt.body_indent);
            out.push_str("[\n");
            for value in array.iter() {
                for comment in value.comments() {
                    out.push_str(&indent);
                    out.push_str(comment);
                    out.push('\n');
                }
                out.push_str(&indent);
                write_value(out, value, spec, width.saturating_sub(fmt.body_indent));
                out.push(',');
                if let Some(comment) = value.trailing_comment() {
                    out.push(' ');
                    out.push_str(comment);
                }
                out.push('\n');
            }
            out.push_str(&fmt.indent_char.repeat(fmt.closing_indent));
            out.push(']');
        }
    }
}

fn oneline_array(array: &TomlArray, spec: &TomlSpec, width: usize) -> String {
    let mut out = String::new();
    out.push('[');
    for (i, value) in array.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(&mut out, value, spec, width);
    }
    out.push(']');
    out
}

fn write_inline_table(out: &mut String, table: &TomlTable, spec: &TomlSpec, width: usize) {
    if table.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{ ");
    let mut first = true;
    for (key, value) in table.iter() {
        write_inline_pairs(out, &key.to_string(), value, spec, width, &mut first);
    }
    out.push_str(" }");
}

/// Emits `key = value` pairs inside an inline table, flattening nested
/// dotted-key tables back into `a.b = v` form.
fn write_inline_pairs(
    out: &mut String,
    key_repr: &str,
    value: &TomlValue,
    spec: &TomlSpec,
    width: usize,
    first: &mut bool,
) {
    if let TomlData::Table(inner, fmt) = value.data() {
        if fmt.style == TableStyle::Dotted {
            for (key, value) in inner.iter() {
                let nested = format!("{}.{}", key_repr, key);
                write_inline_pairs(out, &nested, value, spec, width, first);
            }
            return;
        }
    }
    if !*first {
        out.push_str(", ");
    }
    *first = false;
    out.push_str(key_repr);
    out.push_str(" = ");
    write_value(out, value, spec, width);
}

// ===========================================================================
// Document layout
// ===========================================================================

/// True when the entry is emitted through its own `[path]` / `[[path]]`
/// headers rather than as a `key = value` line.
fn is_header_entry(value: &TomlValue) -> bool {
    match value.data() {
        TomlData::Table(table, fmt) => match fmt.style {
            TableStyle::Header | TableStyle::Implicit => true,
            TableStyle::Inline | TableStyle::Dotted => false,
            TableStyle::Auto => !auto_dotted(table),
        },
        TomlData::Array(array, fmt) => match fmt.style {
            ArrayStyle::ArrayOfTables | ArrayStyle::Auto => {
                !array.is_empty() && array.iter().all(|v| v.is_table())
            }
            _ => false,
        },
        _ => false,
    }
}

/// Default layout heuristic for tables with no recorded emission form: a
/// table holding exactly one scalar entry reads better as a dotted key.
fn auto_dotted(table: &TomlTable) -> bool {
    table.len() == 1
        && table
            .values()
            .all(|v| !v.is_table() && !v.is_array())
}

fn emits_dotted(value: &TomlValue) -> bool {
    match value.data() {
        TomlData::Table(table, fmt) => match fmt.style {
            TableStyle::Dotted => true,
            TableStyle::Auto => auto_dotted(table),
            _ => false,
        },
        _ => false,
    }
}

/// Collects the flattened `prefix.key = value` pairs of a dotted table.
fn dotted_pairs<'v>(
    key_repr: String,
    value: &'v TomlValue,
    pairs: &mut Vec<(String, &'v TomlValue)>,
) {
    if emits_dotted(value) {
        if let Some(table) = value.as_table() {
            for (key, value) in table.iter() {
                dotted_pairs(format!("{}.{}", key_repr, key), value, pairs);
            }
            return;
        }
    }
    pairs.push((key_repr, value));
}

fn write_entry_line(out: &mut String, indent: &str, key_repr: &str, value: &TomlValue, spec: &TomlSpec) {
    for comment in value.comments() {
        out.push_str(indent);
        out.push_str(comment);
        out.push('\n');
    }
    out.push_str(indent);
    out.push_str(key_repr);
    out.push_str(" = ");
    let rhs_width = DEFAULT_WIDTH_HINT.saturating_sub(indent.len() + key_repr.chars().count() + 3);
    write_value(out, value, spec, rhs_width);
    if let Some(comment) = value.trailing_comment() {
        out.push(' ');
        out.push_str(comment);
    }
    out.push('\n');
}

fn write_header(
    out: &mut String,
    value: &TomlValue,
    fmt: &TableFormat,
    path: &[String],
    is_array: bool,
) {
    if !out.is_empty() {
        out.push('\n');
    }
    let indent = fmt.indent_char.repeat(fmt.name_indent);
    for comment in value.comments() {
        out.push_str(&indent);
        out.push_str(comment);
        out.push('\n');
    }
    out.push_str(&indent);
    out.push_str(if is_array { "[[" } else { "[" });
    out.push_str(&path.join("."));
    out.push_str(if is_array { "]]" } else { "]" });
    if let Some(comment) = value.trailing_comment() {
        out.push(' ');
        out.push_str(comment);
    }
    out.push('\n');
}

/// Emits the contents of one table: simple `key = value` entries first, then
/// every header-emitted subtable, depth first and in entry order.
fn write_table_body(
    out: &mut String,
    table: &TomlTable,
    fmt: &TableFormat,
    path: &mut Vec<String>,
    spec: &TomlSpec,
) {
    let indent = fmt.indent_char.repeat(fmt.body_indent);
    for (key, value) in table.iter() {
        if is_header_entry(value) {
            continue;
        }
        if emits_dotted(value) {
            let mut pairs = Vec::new();
            dotted_pairs(key.to_string(), value, &mut pairs);
            for (dotted_key, value) in pairs {
                write_entry_line(out, &indent, &dotted_key, value, spec);
            }
        } else {
            write_entry_line(out, &indent, &key.to_string(), value, spec);
        }
    }
    for (key, value) in table.iter() {
        if !is_header_entry(value) {
            continue;
        }
        path.push(key.to_string());
        match value.data() {
            TomlData::Table(inner, table_fmt) => {
                let has_inline_entries = inner.values().any(|v| !is_header_entry(v));
                let emit_header = match table_fmt.style {
                    TableStyle::Header => true,
                    TableStyle::Implicit => has_inline_entries,
                    _ => has_inline_entries || inner.is_empty(),
                };
                if emit_header {
                    write_header(out, value, table_fmt, path, false);
                }
                write_table_body(out, inner, table_fmt, path, spec);
            }
            TomlData::Array(array, _) => {
                for element in array.iter() {
                    if let TomlData::Table(inner, table_fmt) = element.data() {
                        write_header(out, element, table_fmt, path, true);
                        write_table_body(out, inner, table_fmt, path, spec);
                    }
                }
            }
            _ => {}
        }
        path.pop();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TomlKey;

    fn spec() -> TomlSpec {
        TomlSpec::default()
    }

    #[test]
    fn integer_styles() {
        let value = TomlValue::integer_with_format(
            3735928559,
            IntegerFormat {
                radix: IntegerRadix::Hexadecimal,
                spacing: Some(4),
                width: 8,
                uppercase: true,
                suffix: None,
            },
        );
        assert_eq!(format_value(&value, &spec()), "0xDEAD_BEEF");

        let value = TomlValue::integer_with_format(
            1,
            IntegerFormat {
                radix: IntegerRadix::Binary,
                width: 4,
                ..Default::default()
            },
        );
        assert_eq!(format_value(&value, &spec()), "0b0001");

        let value = TomlValue::integer_with_format(
            -1000000,
            IntegerFormat {
                radix: IntegerRadix::Decimal,
                spacing: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(format_value(&value, &spec()), "-1_000_000");
    }

    #[test]
    fn negative_integers_never_render_prefixed() {
        let value = TomlValue::integer_with_format(
            -255,
            IntegerFormat {
                radix: IntegerRadix::Hexadecimal,
                ..Default::default()
            },
        );
        assert_eq!(format_value(&value, &spec()), "-255");
    }

    #[test]
    fn float_styles() {
        let fixed = TomlValue::float_with_format(
            1.0,
            FloatFormat {
                style: FloatStyle::Fixed,
                precision: Some(1),
                suffix: None,
            },
        );
        assert_eq!(format_value(&fixed, &spec()), "1.0");

        let sci = TomlValue::float_with_format(
            1.0,
            FloatFormat {
                style: FloatStyle::Scientific,
                precision: Some(1),
                suffix: None,
            },
        );
        assert_eq!(format_value(&sci, &spec()), "1.0e+00");

        assert_eq!(format_value(&TomlValue::float(4.0), &spec()), "4.0");
        assert_eq!(format_value(&TomlValue::float(-0.0), &spec()), "-0.0");
        assert_eq!(
            format_value(&TomlValue::float(f64::NEG_INFINITY), &spec()),
            "-inf"
        );
        assert_eq!(format_value(&TomlValue::float(f64::NAN), &spec()), "nan");
    }

    #[test]
    fn hex_float_needs_the_extension() {
        let value = TomlValue::float_with_format(
            12.0,
            FloatFormat {
                style: FloatStyle::Hex,
                precision: None,
                suffix: None,
            },
        );
        assert_eq!(format_value(&value, &spec()), "12.0");
        let ext = TomlSpec {
            ext_hex_float: true,
            ..TomlSpec::v1_0()
        };
        assert_eq!(format_value(&value, &ext), "0x1.8p+3");
    }

    #[test]
    fn string_fallbacks() {
        let value = TomlValue::string_with_format(
            "it's",
            StringFormat {
                style: StringStyle::Literal,
                start_with_newline: false,
            },
        );
        assert_eq!(format_value(&value, &spec()), "\"it's\"");

        let value = TomlValue::string_with_format(
            "has ''' inside",
            StringFormat {
                style: StringStyle::MultilineLiteral,
                start_with_newline: false,
            },
        );
        assert_eq!(format_value(&value, &spec()), "\"\"\"has ''' inside\"\"\"");

        let value = TomlValue::string("tab\tand\nnewline");
        assert_eq!(
            format_value(&value, &spec()),
            "\"\"\"tab\tand\nnewline\"\"\""
        );
    }

    #[test]
    fn ml_basic_never_emits_a_delimiter_run() {
        let value = TomlValue::string_with_format(
            "x\"\"\"y",
            StringFormat {
                style: StringStyle::MultilineBasic,
                start_with_newline: false,
            },
        );
        assert_eq!(format_value(&value, &spec()), "\"\"\"x\"\"\\\"y\"\"\"");
    }

    #[test]
    fn auto_arrays_obey_the_width_hint() {
        let value = TomlValue::array([TomlValue::integer(100000), TomlValue::integer(200000)]);
        assert_eq!(format_value(&value, &spec()), "[100000, 200000]");
        assert_eq!(
            format_value_hinted(&value, &spec(), 10),
            "[\n    100000,\n    200000,\n]"
        );
    }

    #[test]
    fn inline_tables_flatten_dotted_entries() {
        let mut inner = TomlTable::new();
        inner.insert("b", 1i64);
        let mut outer = TomlTable::new();
        outer.insert(
            TomlKey::new("a"),
            TomlValue::table_with_format(
                inner,
                TableFormat {
                    style: TableStyle::Dotted,
                    ..Default::default()
                },
            ),
        );
        outer.insert("c", 2i64);
        let value = TomlValue::table_with_format(
            outer,
            TableFormat {
                style: TableStyle::Inline,
                ..Default::default()
            },
        );
        assert_eq!(format_value(&value, &spec()), "{ a.b = 1, c = 2 }");
    }
}
