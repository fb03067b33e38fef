//! Per-value format descriptors.
//!
//! Every [`TomlValue`](crate::TomlValue) carries, next to its payload, a
//! descriptor of how that value was written in the source (or how it should
//! be written, for programmatically constructed values). The serializer
//! consults these to reproduce the original text style: number radix and
//! digit grouping, string quoting, array/table layout, date-time component
//! style.
//!
//! All descriptors are `Default`-constructible. The default is
//! "format-neutral": the serializer picks a reasonable rendering at
//! serialization time.

/// The radix an integer was (or should be) written in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerRadix {
    /// `0b` prefix.
    Binary,
    /// `0o` prefix.
    Octal,
    /// No prefix.
    #[default]
    Decimal,
    /// `0x` prefix.
    Hexadecimal,
}

impl IntegerRadix {
    /// The numeric base of this radix.
    pub fn base(self) -> u32 {
        match self {
            IntegerRadix::Binary => 2,
            IntegerRadix::Octal => 8,
            IntegerRadix::Decimal => 10,
            IntegerRadix::Hexadecimal => 16,
        }
    }

    /// The literal prefix of this radix (empty for decimal).
    pub fn prefix(self) -> &'static str {
        match self {
            IntegerRadix::Binary => "0b",
            IntegerRadix::Octal => "0o",
            IntegerRadix::Decimal => "",
            IntegerRadix::Hexadecimal => "0x",
        }
    }
}

/// How an integer is rendered.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct IntegerFormat {
    /// Radix of the digits.
    pub radix: IntegerRadix,
    /// Underscore digit-separator group width, counted from the least
    /// significant digit. `None` emits no separators.
    pub spacing: Option<usize>,
    /// Minimum digit count. Non-decimal renderings are zero-padded up to
    /// this width; decimal ignores it (leading zeroes are not valid TOML).
    pub width: usize,
    /// Render hexadecimal digits in uppercase.
    pub uppercase: bool,
    /// Unit suffix appended as `_suffix`, for dialects with the numeric
    /// suffix extension enabled.
    pub suffix: Option<String>,
}

/// The notation a float was (or should be) written in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatStyle {
    /// Let the serializer pick the shortest faithful rendering.
    #[default]
    Auto,
    /// Plain decimal point notation, e.g. `3.14`.
    Fixed,
    /// Exponent notation, e.g. `3.14e-2`.
    Scientific,
    /// Hexadecimal significand/binary exponent notation, e.g. `0x1.8p+3`.
    /// Only serializable in dialects with the hex float extension.
    Hex,
}

/// How a float is rendered.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct FloatFormat {
    /// Notation to use.
    pub style: FloatStyle,
    /// Digits after the decimal point. `None` renders the shortest string
    /// that round-trips the value.
    pub precision: Option<usize>,
    /// Unit suffix, as for [`IntegerFormat::suffix`].
    pub suffix: Option<String>,
}

/// The quoting style of a string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringStyle {
    /// Basic quoting, or multiline basic when the content spans lines.
    #[default]
    Auto,
    /// `"..."` with escapes.
    Basic,
    /// `'...'`, verbatim content.
    Literal,
    /// `"""..."""`.
    MultilineBasic,
    /// `'''...'''`.
    MultilineLiteral,
}

/// How a string is rendered.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct StringFormat {
    /// Quoting style. The serializer falls back to an escaping style when
    /// the requested one cannot represent the content.
    pub style: StringStyle,
    /// Whether the multiline form was written with a newline right after
    /// the opening delimiter. That newline is trimmed from the content by
    /// the grammar, so it lives here instead.
    pub start_with_newline: bool,
}

/// The separator between the date and time parts of a date-time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeDelimiter {
    /// `T`
    #[default]
    T,
    /// `t`
    LowerT,
    /// A single space.
    Space,
}

/// How a UTC offset is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetStyle {
    /// `Z`
    #[default]
    Zulu,
    /// `z`
    LowerZulu,
    /// `+HH:MM` / `-HH:MM`, including `+00:00`.
    Numeric,
}

/// How a date, time, or date-time is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateTimeFormat {
    /// Separator between date and time components.
    pub delimiter: DateTimeDelimiter,
    /// Whether the seconds component is written. Omitting it is only legal
    /// in dialects with optional seconds.
    pub has_seconds: bool,
    /// Number of sub-second digits written. `None` omits the fractional
    /// part entirely.
    pub subsec_digits: Option<usize>,
    /// Offset notation, for offset date-times.
    pub offset: OffsetStyle,
}

impl Default for DateTimeFormat {
    fn default() -> Self {
        DateTimeFormat {
            delimiter: DateTimeDelimiter::T,
            has_seconds: true,
            subsec_digits: None,
            offset: OffsetStyle::Zulu,
        }
    }
}

/// Which character a layout indents with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentChar {
    /// Indent with spaces.
    #[default]
    Space,
    /// Indent with tabs.
    Tab,
}

impl IndentChar {
    pub(crate) fn repeat(self, count: usize) -> String {
        match self {
            IndentChar::Space => " ".repeat(count),
            IndentChar::Tab => "\t".repeat(count),
        }
    }
}

/// The layout of an array.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayStyle {
    /// Oneline if the rendering fits the width hint and no element carries
    /// comments, multiline otherwise.
    #[default]
    Auto,
    /// `[1, 2, 3]` on a single line.
    Oneline,
    /// One element per line between `[` and `]`.
    Multiline,
    /// An array of tables, emitted as a sequence of `[[path]]` headers.
    ArrayOfTables,
}

/// How an array is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayFormat {
    /// Layout to use.
    pub style: ArrayStyle,
    /// Indent character for multiline layout.
    pub indent_char: IndentChar,
    /// Indent width of element lines in multiline layout.
    pub body_indent: usize,
    /// Indent width of the closing `]` line in multiline layout.
    pub closing_indent: usize,
}

impl Default for ArrayFormat {
    fn default() -> Self {
        ArrayFormat {
            style: ArrayStyle::Auto,
            indent_char: IndentChar::Space,
            body_indent: 4,
            closing_indent: 0,
        }
    }
}

/// The emission form of a table.
///
/// Beyond driving the serializer, this doubles as the table's provenance
/// during a parse: the document invariants (which tables may be re-opened or
/// extended, and how) depend on whether a table came from a `[header]`, was
/// implicitly created as an intermediate path segment, was built by dotted
/// keys, or was written inline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableStyle {
    /// Dotted if the table is a small scalar leaf, header otherwise.
    #[default]
    Auto,
    /// Created as an intermediate segment of a deeper header path; emits no
    /// header of its own unless it holds direct key/values.
    Implicit,
    /// Defined by a `[path]` header.
    Header,
    /// Written as an inline table `{ k = v }`.
    Inline,
    /// Built by dotted keys; emitted as `prefix.key = value` lines.
    Dotted,
}

/// How a table is rendered.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct TableFormat {
    /// Emission form.
    pub style: TableStyle,
    /// Indent character for the widths below.
    pub indent_char: IndentChar,
    /// Indent width of the `[path]` header line.
    pub name_indent: usize,
    /// Indent width of the key/value lines in the table body.
    pub body_indent: usize,
}
