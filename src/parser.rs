use std::ops::Range;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};
use miette::{LabeledSpan, NamedSource, Severity, SourceSpan};
use winnow::{
    combinator::{alt, eof, opt, peek, separated},
    error::{AddContext, ErrMode, ErrorKind, ParserError},
    prelude::*,
    stream::{AsChar, Location, Stream},
    token::{any, one_of, take_while},
    Located,
};

use crate::{
    ArrayFormat, ArrayStyle, DateTimeDelimiter, DateTimeFormat, FloatFormat, FloatStyle,
    IndentChar, IntegerFormat, IntegerRadix, OffsetStyle, StringFormat, StringStyle, TableFormat,
    TableStyle, TomlArray, TomlData, TomlDiagnostic, TomlDocument, TomlError, TomlErrorKind,
    TomlKey, TomlSpec, TomlTable, TomlValue,
};

pub(crate) type Input<'a> = Located<&'a str>;
type PResult<T> = winnow::PResult<T, TomlParseError>;

/// Arrays and inline tables nested deeper than this fail with
/// [`TomlErrorKind::NestingTooDeep`] instead of overflowing the stack.
const MAX_NESTING: usize = 128;

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct TomlParseError {
    pub(crate) context: Option<&'static str>,
    pub(crate) span: Option<SourceSpan>,
    pub(crate) label: Option<&'static str>,
    pub(crate) help: Option<&'static str>,
    pub(crate) kind: Option<TomlErrorKind>,
    pub(crate) secondary: Vec<(SourceSpan, &'static str)>,
}

impl TomlParseError {
    fn empty() -> Self {
        TomlParseError {
            context: None,
            span: None,
            label: None,
            help: None,
            kind: None,
            secondary: Vec::new(),
        }
    }
}

impl<I: Stream> ParserError<I> for TomlParseError {
    fn from_error_kind(_input: &I, _kind: ErrorKind) -> Self {
        Self::empty()
    }

    fn append(
        self,
        _input: &I,
        _token_start: &<I as Stream>::Checkpoint,
        _kind: ErrorKind,
    ) -> Self {
        self
    }
}

impl<I: Stream> AddContext<I> for TomlParseError {
    fn add_context(
        mut self,
        _input: &I,
        _token_start: &<I as Stream>::Checkpoint,
        ctx: &'static str,
    ) -> Self {
        self.context = self.context.or(Some(ctx));
        self
    }
}

fn lbl(label: &'static str) -> &'static str {
    label
}

fn point_span(input: &Input<'_>) -> SourceSpan {
    SourceSpan::new(input.location().into(), 0)
}

fn cut_kind<T>(input: &Input<'_>, kind: TomlErrorKind) -> PResult<T> {
    cut_kind_at(point_span(input), kind)
}

fn cut_kind_at<T>(span: impl Into<SourceSpan>, kind: TomlErrorKind) -> PResult<T> {
    Err(ErrMode::Cut(TomlParseError {
        context: None,
        span: Some(span.into()),
        label: None,
        help: None,
        kind: Some(kind),
        secondary: Vec::new(),
    }))
}

/// A located semantic failure, optionally pointing back at the first
/// definition that the new one collides with.
fn semantic_at(
    span: SourceSpan,
    first_defined: Option<SourceSpan>,
    kind: TomlErrorKind,
) -> ErrMode<TomlParseError> {
    ErrMode::Cut(TomlParseError {
        context: None,
        span: Some(span),
        label: None,
        help: None,
        kind: Some(kind),
        secondary: first_defined
            .map(|s| (s, "first defined here"))
            .into_iter()
            .collect(),
    })
}

fn key_span(key: &TomlKey) -> SourceSpan {
    #[cfg(feature = "span")]
    if let Some(span) = key.span() {
        return span;
    }
    #[cfg(not(feature = "span"))]
    let _ = key;
    SourceSpan::new(0.into(), 0)
}

fn value_span(value: &TomlValue) -> Option<SourceSpan> {
    #[cfg(feature = "span")]
    return value.span();
    #[cfg(not(feature = "span"))]
    {
        let _ = value;
        None
    }
}

fn peek_char(input: &mut Input<'_>) -> Option<char> {
    let parsed: PResult<Option<char>> = opt(peek(any)).parse_next(input);
    parsed.ok().flatten()
}

fn expect_char(input: &mut Input<'_>, token: char, what: &'static str) -> PResult<()> {
    let found: Option<char> = opt(token).parse_next(input)?;
    if found.is_some() {
        Ok(())
    } else {
        cut_kind(input, TomlErrorKind::Expected(what))
    }
}

fn expect_str(input: &mut Input<'_>, token: &'static str, what: &'static str) -> PResult<()> {
    let found: Option<&str> = opt(token).parse_next(input)?;
    if found.is_some() {
        Ok(())
    } else {
        cut_kind(input, TomlErrorKind::Expected(what))
    }
}

/// `ws := wschar*` where `wschar := ' ' | '\t'`
fn space0<'s>(input: &mut Input<'s>) -> PResult<&'s str> {
    take_while(0.., (' ', '\t')).parse_next(input)
}

/// `newline := LF | CRLF`
fn newline(input: &mut Input<'_>) -> PResult<()> {
    alt(("\r\n", "\n")).void().parse_next(input)
}

/// Control characters that no TOML construct may contain unescaped.
fn is_forbidden_control(c: char) -> bool {
    (c < '\u{20}' && c != '\t') || c == '\u{7f}'
}

/// `comment := '#' non-eol*`
///
/// Returns the comment verbatim, marker included, without the line
/// terminator. Control characters are rejected unless the dialect allows
/// them.
fn comment<'s>(input: &mut Input<'s>, spec: &TomlSpec) -> PResult<&'s str> {
    let (text, span): (&str, Range<usize>) =
        ('#', take_while(0.., |c: char| c != '\n' && c != '\r'))
            .take()
            .with_span()
            .parse_next(input)?;
    if !spec.control_chars_in_comments {
        for (idx, c) in text.char_indices() {
            if is_forbidden_control(c) {
                return cut_kind_at(
                    SourceSpan::new((span.start + idx).into(), c.len_utf8()),
                    TomlErrorKind::InvalidComment,
                );
            }
        }
    }
    Ok(text)
}

// ===========================================================================
// Keys
// ===========================================================================

/// `unquoted-key := (ALPHA | DIGIT | '-' | '_')+`
fn bare_key(input: &mut Input<'_>) -> PResult<String> {
    take_while(1.., TomlKey::is_bare_key_char)
        .map(|s: &str| s.to_string())
        .parse_next(input)
}

/// `simple-key := quoted-key | unquoted-key`
fn key(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<TomlKey> {
    let ((value, raw), _span) = alt((
        |i: &mut Input<'_>| basic_string(i, spec),
        |i: &mut Input<'_>| literal_string(i),
        |i: &mut Input<'_>| bare_key(i),
    ))
    .with_taken()
    .with_span()
    .parse_next(input)?;
    let mut key = TomlKey::new(value);
    key.set_repr(raw);
    #[cfg(feature = "span")]
    key.set_span(_span);
    Ok(key)
}

/// `key := simple-key | dotted-key`
/// `dotted-key := simple-key (dot-sep simple-key)+`
fn dotted_keys(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<Vec<TomlKey>> {
    separated(
        1..,
        |i: &mut Input<'_>| key(i, spec),
        (space0, '.', space0),
    )
    .context(lbl("a key"))
    .parse_next(input)
}

fn cut_dotted_keys(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<Vec<TomlKey>> {
    match dotted_keys(input, spec) {
        Err(ErrMode::Backtrack(_)) => cut_kind(input, TomlErrorKind::Expected("a key")),
        other => other,
    }
}

// ===========================================================================
// Strings
// ===========================================================================

/// `string := ml-basic-string | basic-string | ml-literal-string | literal-string`
fn string(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<(String, StringFormat)> {
    alt((
        |i: &mut Input<'_>| ml_basic_string(i, spec),
        |i: &mut Input<'_>| {
            basic_string(i, spec).map(|s| {
                (
                    s,
                    StringFormat {
                        style: StringStyle::Basic,
                        start_with_newline: false,
                    },
                )
            })
        },
        |i: &mut Input<'_>| ml_literal_string(i),
        |i: &mut Input<'_>| {
            literal_string(i).map(|s| {
                (
                    s,
                    StringFormat {
                        style: StringStyle::Literal,
                        start_with_newline: false,
                    },
                )
            })
        },
    ))
    .context(lbl("a string"))
    .parse_next(input)
}

/// `basic-string := '"' basic-char* '"'`
fn basic_string(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<String> {
    '"'.parse_next(input)?;
    let mut out = String::new();
    loop {
        let closed: Option<char> = opt('"').parse_next(input)?;
        if closed.is_some() {
            return Ok(out);
        }
        match peek_char(input) {
            None | Some('\n') | Some('\r') => {
                return cut_kind(input, TomlErrorKind::UnterminatedString);
            }
            Some('\\') => out.push(escaped_char(input, spec)?),
            Some(c) if is_forbidden_control(c) => {
                return cut_kind(
                    input,
                    TomlErrorKind::InvalidString("control characters must be escaped"),
                );
            }
            Some(_) => {
                let c: char = any.parse_next(input)?;
                out.push(c);
            }
        }
    }
}

/// ```text
/// ml-basic-string := '"""' newline? ml-basic-body '"""'
/// ```
///
/// A newline directly after the opening delimiter is trimmed from the
/// content and recorded in the format descriptor. Up to two unescaped
/// quotation marks may appear adjacent to the closing delimiter; they belong
/// to the content.
fn ml_basic_string(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<(String, StringFormat)> {
    "\"\"\"".parse_next(input)?;
    let start_with_newline = {
        let nl: Option<()> = opt(newline).parse_next(input)?;
        nl.is_some()
    };
    let mut out = String::new();
    loop {
        match peek_char(input) {
            None => return cut_kind(input, TomlErrorKind::UnterminatedString),
            Some('"') => {
                let run: &str = take_while(1.., '"').parse_next(input)?;
                if run.len() >= 3 {
                    if run.len() > 5 {
                        return cut_kind(
                            input,
                            TomlErrorKind::InvalidString(
                                "too many consecutive quotation marks before the closing delimiter",
                            ),
                        );
                    }
                    for _ in 0..run.len() - 3 {
                        out.push('"');
                    }
                    return Ok((
                        out,
                        StringFormat {
                            style: StringStyle::MultilineBasic,
                            start_with_newline,
                        },
                    ));
                }
                out.push_str(run);
            }
            Some('\\') => {
                // A backslash ending its line swallows all whitespace up to
                // the next non-whitespace character.
                let cp = input.checkpoint();
                let _: char = any.parse_next(input)?;
                space0(input)?;
                let continued: Option<()> = opt(newline).parse_next(input)?;
                if continued.is_some() {
                    let _: &str = take_while(0.., (' ', '\t', '\r', '\n')).parse_next(input)?;
                } else {
                    input.reset(&cp);
                    out.push(escaped_char(input, spec)?);
                }
            }
            Some('\r') => {
                let _: char = any.parse_next(input)?;
                if peek_char(input) != Some('\n') {
                    return cut_kind(
                        input,
                        TomlErrorKind::InvalidString("stray carriage return"),
                    );
                }
                let _: char = any.parse_next(input)?;
                out.push('\n');
            }
            Some(c) if c != '\n' && is_forbidden_control(c) => {
                return cut_kind(
                    input,
                    TomlErrorKind::InvalidString("control characters must be escaped"),
                );
            }
            Some(_) => {
                let c: char = any.parse_next(input)?;
                out.push(c);
            }
        }
    }
}

/// `literal-string := "'" literal-char* "'"`
fn literal_string(input: &mut Input<'_>) -> PResult<String> {
    '\''.parse_next(input)?;
    let mut out = String::new();
    loop {
        let closed: Option<char> = opt('\'').parse_next(input)?;
        if closed.is_some() {
            return Ok(out);
        }
        match peek_char(input) {
            None | Some('\n') | Some('\r') => {
                return cut_kind(input, TomlErrorKind::UnterminatedString);
            }
            Some(c) if is_forbidden_control(c) => {
                return cut_kind(
                    input,
                    TomlErrorKind::InvalidString(
                        "control characters are not allowed in literal strings",
                    ),
                );
            }
            Some(_) => {
                let c: char = any.parse_next(input)?;
                out.push(c);
            }
        }
    }
}

/// `ml-literal-string := "'''" newline? ml-literal-body "'''"`
fn ml_literal_string(input: &mut Input<'_>) -> PResult<(String, StringFormat)> {
    "'''".parse_next(input)?;
    let start_with_newline = {
        let nl: Option<()> = opt(newline).parse_next(input)?;
        nl.is_some()
    };
    let mut out = String::new();
    loop {
        match peek_char(input) {
            None => return cut_kind(input, TomlErrorKind::UnterminatedString),
            Some('\'') => {
                let run: &str = take_while(1.., '\'').parse_next(input)?;
                if run.len() >= 3 {
                    if run.len() > 5 {
                        return cut_kind(
                            input,
                            TomlErrorKind::InvalidString(
                                "too many consecutive quotation marks before the closing delimiter",
                            ),
                        );
                    }
                    for _ in 0..run.len() - 3 {
                        out.push('\'');
                    }
                    return Ok((
                        out,
                        StringFormat {
                            style: StringStyle::MultilineLiteral,
                            start_with_newline,
                        },
                    ));
                }
                out.push_str(run);
            }
            Some('\r') => {
                let _: char = any.parse_next(input)?;
                if peek_char(input) != Some('\n') {
                    return cut_kind(
                        input,
                        TomlErrorKind::InvalidString("stray carriage return"),
                    );
                }
                let _: char = any.parse_next(input)?;
                out.push('\n');
            }
            Some(c) if c != '\n' && is_forbidden_control(c) => {
                return cut_kind(
                    input,
                    TomlErrorKind::InvalidString(
                        "control characters are not allowed in literal strings",
                    ),
                );
            }
            Some(_) => {
                let c: char = any.parse_next(input)?;
                out.push(c);
            }
        }
    }
}

/// ```text
/// escape := '\' ('b' | 't' | 'n' | 'f' | 'r' | '"' | '\' | 'uXXXX' | 'UXXXXXXXX')
/// ```
/// plus `\e` and `\xHH` when the dialect enables them.
fn escaped_char(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<char> {
    '\\'.parse_next(input)?;
    let start = input.location().saturating_sub(1);
    let c = match peek_char(input) {
        Some(c) => c,
        None => return cut_kind(input, TomlErrorKind::UnterminatedString),
    };
    let _: char = any.parse_next(input)?;
    match c {
        'b' => Ok('\u{0008}'),
        't' => Ok('\t'),
        'n' => Ok('\n'),
        'f' => Ok('\u{000C}'),
        'r' => Ok('\r'),
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        'e' if spec.escape_sequence_e => Ok('\u{001B}'),
        'x' if spec.escape_sequence_x => unicode_escape(input, 2, start),
        'u' => unicode_escape(input, 4, start),
        'U' => unicode_escape(input, 8, start),
        _ => cut_kind_at(
            SourceSpan::new(start.into(), input.location() - start),
            TomlErrorKind::InvalidEscape,
        ),
    }
}

fn unicode_escape(input: &mut Input<'_>, digits: usize, start: usize) -> PResult<char> {
    let parsed: PResult<&str> =
        take_while(digits..=digits, AsChar::is_hex_digit).parse_next(input);
    let hex: &str = match parsed {
        Ok(hex) => hex,
        Err(_) => {
            return cut_kind_at(
                SourceSpan::new(start.into(), input.location() - start),
                TomlErrorKind::InvalidEscape,
            )
        }
    };
    let value = u32::from_str_radix(hex, 16).unwrap_or(u32::MAX);
    match char::from_u32(value) {
        Some(c) => Ok(c),
        None => cut_kind_at(
            SourceSpan::new(start.into(), input.location() - start),
            TomlErrorKind::InvalidEscape,
        ),
    }
}

// ===========================================================================
// Numbers
// ===========================================================================

fn dec_u32(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Underscore group width, if the separators form uniform groups counted
/// from the least significant digit.
fn underscore_spacing(digits: &str) -> Option<usize> {
    if !digits.contains('_') {
        return None;
    }
    let groups: Vec<&str> = digits.split('_').collect();
    let width = groups.last()?.len();
    if width == 0 {
        return None;
    }
    let uniform = groups[1..].iter().all(|g| g.len() == width)
        && !groups[0].is_empty()
        && groups[0].len() <= width;
    uniform.then_some(width)
}

fn validate_underscores(digits: &str, span: &Range<usize>) -> PResult<()> {
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        cut_kind_at(
            span.clone(),
            TomlErrorKind::InvalidNumber("underscores must be surrounded by digits"),
        )
    } else {
        Ok(())
    }
}

/// Splits a trailing `_suffix` unit tag off a digit run, for dialects with
/// the numeric suffix extension.
fn take_num_suffix<'s>(
    input: &mut Input<'s>,
    spec: &TomlSpec,
    digits: &mut &'s str,
) -> PResult<Option<String>> {
    if !spec.ext_num_suffix || !digits.ends_with('_') {
        return Ok(None);
    }
    match peek_char(input) {
        Some(c) if c.is_ascii_alphabetic() => {
            *digits = &digits[..digits.len() - 1];
            let suffix: &str =
                take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
            Ok(Some(suffix.to_string()))
        }
        _ => Ok(None),
    }
}

/// `integer := dec-int | hex-int | oct-int | bin-int`
fn integer(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<(i64, IntegerFormat)> {
    alt((
        |i: &mut Input<'_>| prefixed_int(i, spec, IntegerRadix::Hexadecimal),
        |i: &mut Input<'_>| prefixed_int(i, spec, IntegerRadix::Octal),
        |i: &mut Input<'_>| prefixed_int(i, spec, IntegerRadix::Binary),
        |i: &mut Input<'_>| decimal_int(i, spec),
    ))
    .context(lbl("an integer"))
    .parse_next(input)
}

/// `hex-int := '0x' hex-digit (hex-digit | '_' hex-digit)*`, and likewise
/// for `0o` and `0b`.
fn prefixed_int(
    input: &mut Input<'_>,
    spec: &TomlSpec,
    radix: IntegerRadix,
) -> PResult<(i64, IntegerFormat)> {
    radix.prefix().parse_next(input)?;
    let in_radix = move |c: char| c.is_digit(radix.base()) || c == '_';
    let radix_res: PResult<(&str, Range<usize>)> =
        take_while(1.., in_radix).with_span().parse_next(input);
    let (mut digits, span): (&str, Range<usize>) = match radix_res {
        Ok(parsed) => parsed,
        Err(_) => {
            return cut_kind(
                input,
                TomlErrorKind::InvalidNumber("missing digits after radix prefix"),
            )
        }
    };
    let suffix = take_num_suffix(input, spec, &mut digits)?;
    validate_underscores(digits, &span)?;
    if let Some(c) = peek_char(input) {
        if c.is_ascii_alphanumeric() {
            return cut_kind(input, TomlErrorKind::InvalidNumber("invalid digit for this radix"));
        }
    }
    let clean: String = digits.chars().filter(|c| *c != '_').collect();
    let value = match i64::from_str_radix(&clean, radix.base()) {
        Ok(value) => value,
        Err(e) => return cut_kind_at(span, TomlErrorKind::ParseInt(e)),
    };
    let format = IntegerFormat {
        radix,
        spacing: underscore_spacing(digits),
        width: clean.len(),
        uppercase: digits.chars().any(|c| c.is_ascii_uppercase()),
        suffix,
    };
    Ok((value, format))
}

/// `dec-int := ('-' | '+')? unsigned-dec-int`
fn decimal_int(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<(i64, IntegerFormat)> {
    let sign: Option<char> = opt(one_of(('+', '-'))).parse_next(input)?;
    let (mut digits, span): (&str, Range<usize>) =
        take_while(1.., |c: char| c.is_ascii_digit() || c == '_')
            .with_span()
            .parse_next(input)?;
    let suffix = take_num_suffix(input, spec, &mut digits)?;
    validate_underscores(digits, &span)?;
    if let Some(c) = peek_char(input) {
        if c.is_ascii_alphanumeric() {
            return cut_kind(input, TomlErrorKind::InvalidNumber("invalid digit"));
        }
    }
    let clean: String = digits.chars().filter(|c| *c != '_').collect();
    if clean.len() > 1 && clean.starts_with('0') {
        return cut_kind_at(
            span,
            TomlErrorKind::InvalidNumber("leading zeroes are not allowed"),
        );
    }
    let mut literal = String::new();
    if sign == Some('-') {
        literal.push('-');
    }
    literal.push_str(&clean);
    let value = match literal.parse::<i64>() {
        Ok(value) => value,
        Err(e) => return cut_kind_at(span, TomlErrorKind::ParseInt(e)),
    };
    let format = IntegerFormat {
        radix: IntegerRadix::Decimal,
        spacing: underscore_spacing(digits),
        width: 0,
        uppercase: false,
        suffix,
    };
    Ok((value, format))
}

/// `float := float-int-part (exp | frac exp?) | special-float | hex-float`
fn float(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<(f64, FloatFormat)> {
    alt((
        |i: &mut Input<'_>| special_float(i),
        |i: &mut Input<'_>| hex_float(i, spec),
        |i: &mut Input<'_>| decimal_float(i, spec),
    ))
    .context(lbl("a float"))
    .parse_next(input)
}

/// `special-float := ('-' | '+')? ('inf' | 'nan')`
fn special_float(input: &mut Input<'_>) -> PResult<(f64, FloatFormat)> {
    let sign: Option<char> = opt(one_of(('+', '-'))).parse_next(input)?;
    let value = alt(("inf".value(f64::INFINITY), "nan".value(f64::NAN))).parse_next(input)?;
    let value = if sign == Some('-') {
        -value
    } else {
        value
    };
    Ok((value, FloatFormat::default()))
}

/// `hex-float := ('-' | '+')? '0x' hex-digits ('.' hex-digits)? ('p' | 'P') exp`
///
/// A language extension, recognized only when the dialect enables it.
fn hex_float(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<(f64, FloatFormat)> {
    if !spec.ext_hex_float {
        return Err(ErrMode::Backtrack(TomlParseError::empty()));
    }
    let sign: Option<char> = opt(one_of(('+', '-'))).parse_next(input)?;
    "0x".parse_next(input)?;
    let int_digits: &str =
        take_while(1.., |c: char| c.is_ascii_hexdigit() || c == '_').parse_next(input)?;
    let frac: Option<&str> = opt(winnow::combinator::preceded(
        '.',
        take_while(1.., |c: char| c.is_ascii_hexdigit() || c == '_'),
    ))
    .parse_next(input)?;
    one_of(('p', 'P')).parse_next(input)?;
    let exp_sign: Option<char> = opt(one_of(('+', '-'))).parse_next(input)?;
    let (exp_digits, exp_span): (&str, Range<usize>) =
        take_while(1.., AsChar::is_dec_digit).with_span().parse_next(input)?;
    let exp = match exp_digits.parse::<i32>() {
        Ok(exp) => {
            if exp_sign == Some('-') {
                -exp
            } else {
                exp
            }
        }
        Err(_) => {
            return cut_kind_at(exp_span, TomlErrorKind::InvalidNumber("exponent out of range"))
        }
    };
    let mut mantissa = 0.0f64;
    for c in int_digits.chars().filter(|c| *c != '_') {
        mantissa = mantissa * 16.0 + f64::from(c.to_digit(16).unwrap_or(0));
    }
    let mut scale = 1.0 / 16.0;
    for c in frac.unwrap_or("").chars().filter(|c| *c != '_') {
        mantissa += f64::from(c.to_digit(16).unwrap_or(0)) * scale;
        scale /= 16.0;
    }
    let mut value = mantissa * 2f64.powi(exp);
    if sign == Some('-') {
        value = -value;
    }
    Ok((
        value,
        FloatFormat {
            style: FloatStyle::Hex,
            precision: None,
            suffix: None,
        },
    ))
}

/// `float := dec-int (exp | frac exp?)`
fn decimal_float(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<(f64, FloatFormat)> {
    let sign: Option<char> = opt(one_of(('+', '-'))).parse_next(input)?;
    let (int_digits, int_span): (&str, Range<usize>) =
        take_while(1.., |c: char| c.is_ascii_digit() || c == '_')
            .with_span()
            .parse_next(input)?;
    let mut frac: Option<(&str, Range<usize>)> = None;
    let dot: Option<char> = opt('.').parse_next(input)?;
    if dot.is_some() {
        let frac_res: PResult<(&str, Range<usize>)> =
            take_while(1.., |c: char| c.is_ascii_digit() || c == '_')
                .with_span()
                .parse_next(input);
        frac = match frac_res {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                return cut_kind(
                    input,
                    TomlErrorKind::InvalidNumber("expected digits after the decimal point"),
                )
            }
        };
    }
    let exp_marker: Option<char> = opt(one_of(('e', 'E'))).parse_next(input)?;
    let mut exp: Option<(Option<char>, &str, Range<usize>)> = None;
    if exp_marker.is_some() {
        let exp_sign: Option<char> = opt(one_of(('+', '-'))).parse_next(input)?;
        let exp_res: PResult<(&str, Range<usize>)> =
            take_while(1.., |c: char| c.is_ascii_digit() || c == '_')
                .with_span()
                .parse_next(input);
        let digits = match exp_res {
            Ok((digits, span)) => (exp_sign, digits, span),
            Err(_) => {
                return cut_kind(
                    input,
                    TomlErrorKind::InvalidNumber("expected digits in the exponent"),
                )
            }
        };
        exp = Some(digits);
    }
    if frac.is_none() && exp.is_none() {
        // Plain integer; let the integer production have it.
        return Err(ErrMode::Backtrack(TomlParseError::empty()));
    }

    let mut suffix = None;
    if let Some((sign_c, mut digits, span)) = exp.take() {
        suffix = take_num_suffix(input, spec, &mut digits)?;
        exp = Some((sign_c, digits, span));
    } else if let Some((mut digits, span)) = frac.take() {
        suffix = take_num_suffix(input, spec, &mut digits)?;
        frac = Some((digits, span));
    }

    validate_underscores(int_digits, &int_span)?;
    let int_clean: String = int_digits.chars().filter(|c| *c != '_').collect();
    if int_clean.len() > 1 && int_clean.starts_with('0') {
        return cut_kind_at(
            int_span,
            TomlErrorKind::InvalidNumber("leading zeroes are not allowed"),
        );
    }

    let mut literal = String::new();
    if sign == Some('-') {
        literal.push('-');
    }
    literal.push_str(&int_clean);
    let mut precision = None;
    if let Some((digits, span)) = &frac {
        validate_underscores(digits, span)?;
        let clean: String = digits.chars().filter(|c| *c != '_').collect();
        precision = Some(clean.len());
        literal.push('.');
        literal.push_str(&clean);
    }
    let mut style = FloatStyle::Fixed;
    if let Some((exp_sign, digits, span)) = &exp {
        validate_underscores(digits, span)?;
        let clean: String = digits.chars().filter(|c| *c != '_').collect();
        style = FloatStyle::Scientific;
        literal.push('e');
        if *exp_sign == Some('-') {
            literal.push('-');
        }
        literal.push_str(&clean);
    }
    let value = match literal.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            return cut_kind_at(int_span, TomlErrorKind::InvalidNumber("value out of range"))
        }
    };
    Ok((
        value,
        FloatFormat {
            style,
            precision,
            suffix,
        },
    ))
}

// ===========================================================================
// Dates and times
// ===========================================================================

/// `date-time := offset-date-time | local-date-time | local-date | local-time`
fn date_time(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<TomlData> {
    alt((
        |i: &mut Input<'_>| date_based(i, spec),
        |i: &mut Input<'_>| {
            partial_time(i, spec).map(|(t, fmt)| TomlData::LocalTime(t, fmt))
        },
    ))
    .context(lbl("a date-time"))
    .parse_next(input)
}

/// `full-date := 4DIGIT '-' 2DIGIT '-' 2DIGIT`
fn full_date(input: &mut Input<'_>) -> PResult<NaiveDate> {
    let ((year, _, month, _, day), span) = (
        take_while(4..=4, AsChar::is_dec_digit),
        '-',
        take_while(2..=2, AsChar::is_dec_digit),
        '-',
        take_while(2..=2, AsChar::is_dec_digit),
    )
        .with_span()
        .parse_next(input)?;
    let month = dec_u32(month);
    let day = dec_u32(day);
    if !(1..=12).contains(&month) {
        return cut_kind_at(span, TomlErrorKind::InvalidDateTime("month must be 01-12"));
    }
    match NaiveDate::from_ymd_opt(dec_u32(year) as i32, month, day) {
        Some(date) => Ok(date),
        None => cut_kind_at(
            span,
            TomlErrorKind::InvalidDateTime("no such day in this month"),
        ),
    }
}

/// `partial-time := 2DIGIT ':' 2DIGIT (':' 2DIGIT ('.' DIGIT+)?)?`
///
/// The seconds component may only be omitted in dialects that allow it.
fn partial_time(
    input: &mut Input<'_>,
    spec: &TomlSpec,
) -> PResult<(NaiveTime, DateTimeFormat)> {
    let ((hour, _, minute), span) = (
        take_while(2..=2, AsChar::is_dec_digit),
        ':',
        take_while(2..=2, AsChar::is_dec_digit),
    )
        .with_span()
        .parse_next(input)?;
    let seconds: Option<&str> = opt(winnow::combinator::preceded(
        ':',
        take_while(2..=2, AsChar::is_dec_digit),
    ))
    .parse_next(input)?;
    if seconds.is_none() && !spec.optional_seconds {
        return cut_kind_at(
            span,
            TomlErrorKind::InvalidDateTime("seconds may not be omitted in this revision"),
        );
    }
    let mut subsec_digits = None;
    let mut nanos = 0u32;
    if seconds.is_some() {
        let frac: Option<&str> = opt(winnow::combinator::preceded(
            '.',
            take_while(1.., AsChar::is_dec_digit),
        ))
        .parse_next(input)?;
        if let Some(frac) = frac {
            subsec_digits = Some(frac.len());
            let mut padded: String = frac.chars().take(9).collect();
            while padded.len() < 9 {
                padded.push('0');
            }
            nanos = dec_u32(&padded);
        }
    }
    let hour = dec_u32(hour);
    let minute = dec_u32(minute);
    let second = seconds.map(dec_u32).unwrap_or(0);
    if hour > 23 {
        return cut_kind_at(span, TomlErrorKind::InvalidDateTime("hour must be 00-23"));
    }
    if minute > 59 {
        return cut_kind_at(span, TomlErrorKind::InvalidDateTime("minute must be 00-59"));
    }
    if second == 60 {
        return cut_kind_at(
            span,
            TomlErrorKind::InvalidDateTime("leap seconds are not supported"),
        );
    }
    if second > 59 {
        return cut_kind_at(span, TomlErrorKind::InvalidDateTime("second must be 00-59"));
    }
    match NaiveTime::from_hms_nano_opt(hour, minute, second, nanos) {
        Some(time) => Ok((
            time,
            DateTimeFormat {
                delimiter: DateTimeDelimiter::T,
                has_seconds: seconds.is_some(),
                subsec_digits,
                offset: OffsetStyle::Zulu,
            },
        )),
        None => cut_kind_at(span, TomlErrorKind::InvalidDateTime("time out of range")),
    }
}

/// `time-offset := 'Z' | 'z' | ('+' | '-') 2DIGIT ':' 2DIGIT`
fn time_offset(input: &mut Input<'_>) -> PResult<(FixedOffset, OffsetStyle)> {
    match peek_char(input) {
        Some('Z') => {
            let _: char = any.parse_next(input)?;
            Ok((utc_offset(), OffsetStyle::Zulu))
        }
        Some('z') => {
            let _: char = any.parse_next(input)?;
            Ok((utc_offset(), OffsetStyle::LowerZulu))
        }
        Some('+') | Some('-') => {
            let ((sign, hours, _, minutes), span) = (
                one_of(('+', '-')),
                take_while(2..=2, AsChar::is_dec_digit),
                ':',
                take_while(2..=2, AsChar::is_dec_digit),
            )
                .with_span()
                .parse_next(input)?;
            let hours = dec_u32(hours);
            let minutes = dec_u32(minutes);
            if hours > 23 || minutes > 59 {
                return cut_kind_at(
                    span,
                    TomlErrorKind::InvalidDateTime("offset out of range"),
                );
            }
            let mut secs = (hours * 3600 + minutes * 60) as i32;
            if sign == '-' {
                secs = -secs;
            }
            match FixedOffset::east_opt(secs) {
                Some(offset) => Ok((offset, OffsetStyle::Numeric)),
                None => cut_kind_at(
                    span,
                    TomlErrorKind::InvalidDateTime("offset out of range"),
                ),
            }
        }
        _ => Err(ErrMode::Backtrack(TomlParseError::empty())),
    }
}

fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap_or_else(|| unreachable!("zero offset is always valid"))
}

/// `local-date-time := full-date delim partial-time`, where `delim` is `T`,
/// `t`, or a single space followed by a time.
fn date_based(input: &mut Input<'_>, spec: &TomlSpec) -> PResult<TomlData> {
    let date = full_date(input)?;
    let delimiter = match peek_char(input) {
        Some('T') => Some(DateTimeDelimiter::T),
        Some('t') => Some(DateTimeDelimiter::LowerT),
        Some(' ') => {
            // A space only joins date and time when a time actually follows.
            let looks_like_time: PResult<((), &str, char)> = peek((
                ' '.void(),
                take_while(2..=2, AsChar::is_dec_digit),
                ':',
            ))
            .parse_next(input);
            match looks_like_time {
                Ok(_) => Some(DateTimeDelimiter::Space),
                Err(_) => None,
            }
        }
        _ => None,
    };
    let Some(delimiter) = delimiter else {
        return Ok(TomlData::LocalDate(date, DateTimeFormat::default()));
    };
    let _: char = any.parse_next(input)?;
    let (time, mut format) = match partial_time(input, spec) {
        Err(ErrMode::Backtrack(_)) => {
            return cut_kind(
                input,
                TomlErrorKind::InvalidDateTime("expected a time after the date delimiter"),
            )
        }
        other => other?,
    };
    format.delimiter = delimiter;
    let naive = date.and_time(time);
    let offset: Option<(FixedOffset, OffsetStyle)> =
        opt(|i: &mut Input<'_>| time_offset(i)).parse_next(input)?;
    match offset {
        Some((offset, style)) => {
            format.offset = style;
            match offset.from_local_datetime(&naive).single() {
                Some(dt) => Ok(TomlData::OffsetDateTime(dt, format)),
                None => cut_kind(input, TomlErrorKind::InvalidDateTime("offset out of range")),
            }
        }
        None => Ok(TomlData::LocalDateTime(naive, format)),
    }
}

// ===========================================================================
// Values, arrays, inline tables
// ===========================================================================

/// `boolean := 'true' | 'false'`
fn boolean(input: &mut Input<'_>) -> PResult<bool> {
    alt(("true".value(true), "false".value(false))).parse_next(input)
}

/// `val := string | boolean | array | inline-table | date-time | float | integer`
fn value(input: &mut Input<'_>, spec: &TomlSpec, depth: usize) -> PResult<TomlValue> {
    if depth >= MAX_NESTING {
        return cut_kind(input, TomlErrorKind::NestingTooDeep);
    }
    let (data, _span) = alt((
        |i: &mut Input<'_>| string(i, spec).map(|(s, f)| TomlData::String(s, f)),
        |i: &mut Input<'_>| array(i, spec, depth).map(|(a, f)| TomlData::Array(a, f)),
        |i: &mut Input<'_>| inline_table(i, spec, depth).map(|(t, f)| TomlData::Table(t, f)),
        |i: &mut Input<'_>| boolean(i).map(TomlData::Boolean),
        |i: &mut Input<'_>| date_time(i, spec),
        |i: &mut Input<'_>| float(i, spec).map(|(v, f)| TomlData::Float(v, f)),
        |i: &mut Input<'_>| integer(i, spec).map(|(v, f)| TomlData::Integer(v, f)),
    ))
    .context(lbl("a value"))
    .with_span()
    .parse_next(input)?;
    let mut value = TomlValue::from_data(data);
    #[cfg(feature = "span")]
    value.set_span(_span);
    Ok(value)
}

/// Like [`value`], but commits: a missing value reports `expected a value`
/// instead of backtracking.
fn require_value(input: &mut Input<'_>, spec: &TomlSpec, depth: usize) -> PResult<TomlValue> {
    match value(input, spec, depth) {
        Err(ErrMode::Backtrack(mut e)) => {
            if e.kind.is_none() {
                e.kind = Some(TomlErrorKind::Expected("a value"));
            }
            if e.span.is_none() {
                e.span = Some(point_span(input));
            }
            Err(ErrMode::Cut(e))
        }
        other => other,
    }
}

/// Whitespace, newlines, and comments between array elements. Comments
/// accumulate in `pending` for attachment to the next element; the indent of
/// the current line is tracked for layout capture.
#[allow(clippy::too_many_arguments)]
fn array_space<'s>(
    input: &mut Input<'s>,
    spec: &TomlSpec,
    pending: &mut Vec<String>,
    saw_newline: &mut bool,
    last_indent: &mut usize,
    indent_char: &mut IndentChar,
) -> PResult<()> {
    let mut at_line_start = false;
    loop {
        let ws: &str = space0(input)?;
        if at_line_start && !ws.is_empty() {
            *last_indent = ws.chars().count();
            if ws.starts_with('\t') {
                *indent_char = IndentChar::Tab;
            }
            at_line_start = false;
        }
        match peek_char(input) {
            Some('#') => {
                let text = comment(input, spec)?;
                pending.push(text.to_string());
            }
            Some('\n') | Some('\r') => {
                newline(input)?;
                *saw_newline = true;
                *last_indent = 0;
                at_line_start = true;
            }
            _ => return Ok(()),
        }
    }
}

/// `array := '[' array-values? ws-comment-newline ']'`
fn array(input: &mut Input<'_>, spec: &TomlSpec, depth: usize) -> PResult<(TomlArray, ArrayFormat)> {
    let open_span_start = input.location();
    '['.parse_next(input)?;
    let mut values = TomlArray::new();
    let mut format = ArrayFormat::default();
    let mut pending: Vec<String> = Vec::new();
    let mut saw_newline = false;
    let mut indent = 0usize;
    let mut indent_char = IndentChar::Space;
    loop {
        array_space(
            input,
            spec,
            &mut pending,
            &mut saw_newline,
            &mut indent,
            &mut indent_char,
        )?;
        let closed: Option<char> = opt(']').parse_next(input)?;
        if closed.is_some() {
            format.closing_indent = indent;
            break;
        }
        if values.is_empty() {
            format.body_indent = indent;
        }
        let mut val = require_value(input, spec, depth + 1)?;
        val.comments = std::mem::take(&mut pending);
        space0(input)?;
        if peek_char(input) == Some('#') {
            let text = comment(input, spec)?;
            val.trailing_comment = Some(text.to_string());
        }
        array_space(
            input,
            spec,
            &mut pending,
            &mut saw_newline,
            &mut indent,
            &mut indent_char,
        )?;
        let had_comma: Option<char> = opt(',').parse_next(input)?;
        if had_comma.is_some() {
            space0(input)?;
            if peek_char(input) == Some('#') {
                let text = comment(input, spec)?;
                if val.trailing_comment.is_none() {
                    val.trailing_comment = Some(text.to_string());
                } else {
                    pending.push(text.to_string());
                }
            }
            values.push(val);
            continue;
        }
        values.push(val);
        array_space(
            input,
            spec,
            &mut pending,
            &mut saw_newline,
            &mut indent,
            &mut indent_char,
        )?;
        let closed: Option<char> = opt(']').parse_next(input)?;
        if closed.is_some() {
            format.closing_indent = indent;
            break;
        }
        return cut_kind(input, TomlErrorKind::Expected("`,` or `]` in array"));
    }
    format.style = if saw_newline {
        ArrayStyle::Multiline
    } else {
        ArrayStyle::Oneline
    };
    format.indent_char = indent_char;
    if spec.homogeneous_arrays && !values.is_empty() {
        let first = values[0].kind();
        if values.iter().any(|v| v.kind() != first) {
            return cut_kind_at(
                SourceSpan::new(open_span_start.into(), input.location() - open_span_start),
                TomlErrorKind::MixedArrayTypes,
            );
        }
    }
    Ok((values, format))
}

/// Whitespace between inline-table tokens. Newlines and comments inside the
/// braces are only consumed in dialects that permit them.
fn inline_space(
    input: &mut Input<'_>,
    spec: &TomlSpec,
    pending: &mut Vec<String>,
) -> PResult<()> {
    loop {
        space0(input)?;
        match peek_char(input) {
            Some('#') if spec.newlines_in_inline_tables => {
                let text = comment(input, spec)?;
                pending.push(text.to_string());
            }
            Some('\n') | Some('\r') if spec.newlines_in_inline_tables => {
                newline(input)?;
            }
            _ => return Ok(()),
        }
    }
}

/// `inline-table := '{' inline-table-keyvals? '}'`
///
/// Newlines inside the braces and a trailing comma are dialect-gated.
fn inline_table(
    input: &mut Input<'_>,
    spec: &TomlSpec,
    depth: usize,
) -> PResult<(TomlTable, TableFormat)> {
    '{'.parse_next(input)?;
    let format = TableFormat {
        style: TableStyle::Inline,
        ..Default::default()
    };
    let mut table = TomlTable::new();
    let mut pending: Vec<String> = Vec::new();
    inline_space(input, spec, &mut pending)?;
    let closed: Option<char> = opt('}').parse_next(input)?;
    if closed.is_some() {
        return Ok((table, format));
    }
    loop {
        let keys = cut_dotted_keys(input, spec)?;
        space0(input)?;
        expect_char(input, '=', "`=` after key")?;
        space0(input)?;
        let mut val = require_value(input, spec, depth + 1)?;
        val.comments = std::mem::take(&mut pending);
        insert_keyval(&mut table, &keys, val)?;
        inline_space(input, spec, &mut pending)?;
        let had_comma: Option<char> = opt(',').parse_next(input)?;
        if had_comma.is_some() {
            inline_space(input, spec, &mut pending)?;
            if peek_char(input) == Some('}') {
                if !spec.trailing_comma_in_inline_tables {
                    return cut_kind(
                        input,
                        TomlErrorKind::Expected(
                            "a key after `,` (this revision has no trailing commas in inline tables)",
                        ),
                    );
                }
                let _: char = any.parse_next(input)?;
                return Ok((table, format));
            }
            continue;
        }
        let closed: Option<char> = opt('}').parse_next(input)?;
        if closed.is_some() {
            return Ok((table, format));
        }
        return cut_kind(input, TomlErrorKind::Expected("`,` or `}` in inline table"));
    }
}

// ===========================================================================
// Document semantics
// ===========================================================================

/// Descends one intermediate segment of a header path, creating an implicit
/// table when the segment is absent. Arrays of tables are traversed through
/// their last element.
fn step_into<'t>(
    table: &'t mut TomlTable,
    key: &TomlKey,
    path: &str,
) -> Result<&'t mut TomlTable, ErrMode<TomlParseError>> {
    let span = key_span(key);
    let entry = table.entries.entry(key.clone()).or_insert_with(|| {
        let mut implicit = TomlValue::table_with_format(
            TomlTable::new(),
            TableFormat {
                style: TableStyle::Implicit,
                ..Default::default()
            },
        );
        #[cfg(feature = "span")]
        implicit.set_span(span);
        implicit
    });
    let first_defined = value_span(entry);
    match &mut entry.data {
        TomlData::Table(_, fmt) if fmt.style == TableStyle::Inline => Err(semantic_at(
            span,
            first_defined,
            TomlErrorKind::TableConflict {
                path: path.to_string(),
            },
        )),
        TomlData::Table(t, _) => Ok(t),
        TomlData::Array(a, fmt) if fmt.style == ArrayStyle::ArrayOfTables => {
            match a.values.last_mut().map(|v| &mut v.data) {
                Some(TomlData::Table(t, _)) => Ok(t),
                _ => Err(semantic_at(
                    span,
                    first_defined,
                    TomlErrorKind::KeyConflict {
                        key: path.to_string(),
                    },
                )),
            }
        }
        _ => Err(semantic_at(
            span,
            first_defined,
            TomlErrorKind::KeyConflict {
                key: path.to_string(),
            },
        )),
    }
}

/// Descends one intermediate segment of a dotted key, creating a
/// dotted-provenance table when the segment is absent. Only tables built by
/// dotted keys may be extended by further dotted keys.
fn step_dotted<'t>(
    table: &'t mut TomlTable,
    key: &TomlKey,
    path: &str,
) -> Result<&'t mut TomlTable, ErrMode<TomlParseError>> {
    let span = key_span(key);
    let entry = table.entries.entry(key.clone()).or_insert_with(|| {
        let mut dotted = TomlValue::table_with_format(
            TomlTable::new(),
            TableFormat {
                style: TableStyle::Dotted,
                ..Default::default()
            },
        );
        #[cfg(feature = "span")]
        dotted.set_span(span);
        dotted
    });
    let first_defined = value_span(entry);
    match &mut entry.data {
        TomlData::Table(t, fmt) if fmt.style == TableStyle::Dotted => Ok(t),
        _ => Err(semantic_at(
            span,
            first_defined,
            TomlErrorKind::KeyConflict {
                key: path.to_string(),
            },
        )),
    }
}

/// Inserts a (possibly dotted) key/value pair into `table`, enforcing the
/// single-assignment rule.
fn insert_keyval(table: &mut TomlTable, keys: &[TomlKey], value: TomlValue) -> PResult<()> {
    let Some((last, parents)) = keys.split_last() else {
        return cut_kind_at(SourceSpan::new(0.into(), 0), TomlErrorKind::Expected("a key"));
    };
    let mut cur = table;
    let mut path = String::new();
    for k in parents {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(k.value());
        cur = step_dotted(cur, k, &path)?;
    }
    if let Some(existing) = cur.get(last.value()) {
        let first_defined = value_span(existing);
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(last.value());
        return Err(semantic_at(
            key_span(last),
            first_defined,
            TomlErrorKind::KeyConflict { key: path },
        ));
    }
    cur.insert(last.clone(), value);
    Ok(())
}

/// Defines (or re-opens) the table named by the final segment of a `[path]`
/// header.
#[allow(clippy::too_many_arguments)]
fn define_header_table(
    table: &mut TomlTable,
    key: &TomlKey,
    path: String,
    header_span: SourceSpan,
    comments: Vec<String>,
    trailing: Option<String>,
    name_indent: usize,
    indent_char: IndentChar,
) -> PResult<()> {
    if let Some(existing) = table.get_mut(key.value()) {
        let first_defined = value_span(existing);
        match &mut existing.data {
            TomlData::Table(_, fmt) if fmt.style == TableStyle::Implicit => {
                // An intermediate segment of an earlier deeper header;
                // promote it to an explicitly defined table.
                fmt.style = TableStyle::Header;
                fmt.name_indent = name_indent;
                fmt.indent_char = indent_char;
                existing.comments = comments;
                existing.trailing_comment = trailing;
                #[cfg(feature = "span")]
                existing.set_span(header_span);
                Ok(())
            }
            TomlData::Table(..) => Err(semantic_at(
                header_span,
                first_defined,
                TomlErrorKind::DuplicateTable { path },
            )),
            TomlData::Array(_, fmt) if fmt.style == ArrayStyle::ArrayOfTables => Err(semantic_at(
                header_span,
                first_defined,
                TomlErrorKind::TableConflict { path },
            )),
            _ => Err(semantic_at(
                header_span,
                first_defined,
                TomlErrorKind::TableRedefinedAsNonTable { path },
            )),
        }
    } else {
        let mut value = TomlValue::table_with_format(
            TomlTable::new(),
            TableFormat {
                style: TableStyle::Header,
                indent_char,
                name_indent,
                body_indent: 0,
            },
        );
        value.comments = comments;
        value.trailing_comment = trailing;
        #[cfg(feature = "span")]
        value.set_span(header_span);
        table.insert(key.clone(), value);
        Ok(())
    }
}

/// Appends a new element for a `[[path]]` header, creating the array of
/// tables on first use.
#[allow(clippy::too_many_arguments)]
fn define_array_element(
    table: &mut TomlTable,
    key: &TomlKey,
    path: String,
    header_span: SourceSpan,
    comments: Vec<String>,
    trailing: Option<String>,
    name_indent: usize,
    indent_char: IndentChar,
) -> PResult<()> {
    let mut element = TomlValue::table_with_format(
        TomlTable::new(),
        TableFormat {
            style: TableStyle::Header,
            indent_char,
            name_indent,
            body_indent: 0,
        },
    );
    element.comments = comments;
    element.trailing_comment = trailing;
    #[cfg(feature = "span")]
    element.set_span(header_span);

    if let Some(existing) = table.get_mut(key.value()) {
        let first_defined = value_span(existing);
        match &mut existing.data {
            TomlData::Array(array, fmt) if fmt.style == ArrayStyle::ArrayOfTables => {
                array.push(element);
                Ok(())
            }
            TomlData::Array(..) => Err(semantic_at(
                header_span,
                first_defined,
                TomlErrorKind::NotAnArrayOfTables { path },
            )),
            TomlData::Table(..) => Err(semantic_at(
                header_span,
                first_defined,
                TomlErrorKind::TableConflict { path },
            )),
            _ => Err(semantic_at(
                header_span,
                first_defined,
                TomlErrorKind::TableRedefinedAsNonTable { path },
            )),
        }
    } else {
        let mut array = TomlArray::new();
        array.push(element);
        let mut value = TomlValue::array_with_format(
            array,
            ArrayFormat {
                style: ArrayStyle::ArrayOfTables,
                indent_char,
                body_indent: 0,
                closing_indent: 0,
            },
        );
        #[cfg(feature = "span")]
        value.set_span(header_span);
        table.insert(key.clone(), value);
        Ok(())
    }
}

/// Resolves the table the cursor path points at, descending through arrays
/// of tables into their most recent element.
fn navigate_mut<'t>(root: &'t mut TomlValue, path: &[String]) -> Option<&'t mut TomlValue> {
    let mut cur = root;
    for segment in path {
        cur = match &mut cur.data {
            TomlData::Table(t, _) => t.get_mut(segment)?,
            _ => return None,
        };
        let descend = matches!(
            &cur.data,
            TomlData::Array(_, fmt) if fmt.style == ArrayStyle::ArrayOfTables
        );
        if descend {
            cur = match &mut cur.data {
                TomlData::Array(a, _) => a.values.last_mut()?,
                _ => unreachable!(),
            };
        }
    }
    Some(cur)
}

// ===========================================================================
// Document driver
// ===========================================================================

/// `newline | eof`, committed.
fn line_end(input: &mut Input<'_>) -> PResult<()> {
    let ended: Option<()> = opt(alt((newline, eof.void()))).parse_next(input)?;
    if ended.is_some() {
        Ok(())
    } else {
        cut_kind(input, TomlErrorKind::Expected("a newline or end of input"))
    }
}

/// Error recovery: drop the rest of the current line.
///
/// A failure reported after its line terminator was already consumed
/// (semantic checks run on the completed expression) must not eat the
/// following line, but an expression that consumed nothing must still make
/// progress, or the driver would spin on the same character.
fn skip_line(source: &str, input: &mut Input<'_>, expr_start: usize) {
    let at = input.location();
    if at > expr_start && at > 0 && source.as_bytes().get(at - 1) == Some(&b'\n') {
        return;
    }
    let _: PResult<&str> = take_while(0.., |c: char| c != '\n').parse_next(input);
    let _: PResult<Option<char>> = opt('\n').parse_next(input);
}

/// `table := std-table | array-table`
///
/// Parses one `[path]` or `[[path]]` header line and applies its document
/// semantics, leaving `current` pointing at the freshly opened table.
fn header_expr(
    input: &mut Input<'_>,
    spec: &TomlSpec,
    root: &mut TomlValue,
    current: &mut Vec<String>,
    pending: &mut Vec<String>,
    indent: &str,
) -> PResult<()> {
    let start = input.location();
    '['.parse_next(input)?;
    let is_array = {
        let second: Option<char> = opt('[').parse_next(input)?;
        second.is_some()
    };
    space0(input)?;
    let keys = cut_dotted_keys(input, spec)?;
    space0(input)?;
    if is_array {
        expect_str(input, "]]", "`]]` after array-of-tables header")?;
    } else {
        expect_char(input, ']', "`]` after table header")?;
    }
    let header_span = SourceSpan::new(start.into(), input.location() - start);
    space0(input)?;
    let trailing = if peek_char(input) == Some('#') {
        Some(comment(input, spec)?.to_string())
    } else {
        None
    };
    line_end(input)?;

    let comments = std::mem::take(pending);
    let name_indent = indent.chars().count();
    let indent_char = if indent.contains('\t') {
        IndentChar::Tab
    } else {
        IndentChar::Space
    };

    let Some((last, parents)) = keys.split_last() else {
        return cut_kind_at(header_span, TomlErrorKind::Expected("a key"));
    };
    let Some(mut table) = root.as_table_mut() else {
        return cut_kind_at(header_span, TomlErrorKind::Other);
    };
    let mut path = String::new();
    for k in parents {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(k.value());
        table = step_into(table, k, &path)?;
    }
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(last.value());
    if is_array {
        define_array_element(
            table,
            last,
            path,
            header_span,
            comments,
            trailing,
            name_indent,
            indent_char,
        )?;
    } else {
        define_header_table(
            table,
            last,
            path,
            header_span,
            comments,
            trailing,
            name_indent,
            indent_char,
        )?;
    }
    current.clear();
    current.extend(keys.iter().map(|k| k.value().to_string()));
    Ok(())
}

/// `keyval := key '=' val`
///
/// Parses one key/value line and inserts it into the table the cursor path
/// points at. With `apply` off the line is still checked for grammar but its
/// result is discarded (used while recovering from a bad header).
fn keyval_expr(
    input: &mut Input<'_>,
    spec: &TomlSpec,
    root: &mut TomlValue,
    current: &[String],
    apply: bool,
    pending: &mut Vec<String>,
    indent: &str,
) -> PResult<()> {
    let keys = cut_dotted_keys(input, spec)?;
    space0(input)?;
    expect_char(input, '=', "`=` after key")?;
    space0(input)?;
    let mut val = require_value(input, spec, 0)?;
    space0(input)?;
    if peek_char(input) == Some('#') {
        val.trailing_comment = Some(comment(input, spec)?.to_string());
    }
    line_end(input)?;
    val.comments = std::mem::take(pending);
    if !apply {
        return Ok(());
    }
    let Some(target) = navigate_mut(root, current) else {
        return cut_kind(input, TomlErrorKind::Other);
    };
    let TomlData::Table(table, fmt) = &mut target.data else {
        return cut_kind(input, TomlErrorKind::Other);
    };
    if table.is_empty() && fmt.style == TableStyle::Header && !indent.is_empty() {
        fmt.body_indent = indent.chars().count();
        if indent.contains('\t') {
            fmt.indent_char = IndentChar::Tab;
        }
    }
    insert_keyval(table, &keys, val)
}

/// The document parse core behind both public entry points.
///
/// With `recover` off the first diagnostic aborts the parse; with it on the
/// driver records the diagnostic, resynchronizes at the next line, and keeps
/// collecting. Either way a failed parse yields no value tree.
pub(crate) fn parse_document(
    source: &str,
    name: Option<&str>,
    spec: &TomlSpec,
    recover: bool,
) -> Result<TomlDocument, TomlError> {
    let mut input = Located::new(source);
    let mut root = TomlValue::table(TomlTable::new());
    let mut current: Vec<String> = Vec::new();
    let mut current_valid = true;
    let mut pending: Vec<String> = Vec::new();
    let mut errors: Vec<TomlParseError> = Vec::new();
    let _: PResult<Option<char>> = opt('\u{feff}').parse_next(&mut input);
    loop {
        let indent = space0(&mut input).unwrap_or("");
        let expr_start = input.location();
        match peek_char(&mut input) {
            None => break,
            Some('\n') | Some('\r') => {
                if let Err(e) = newline(&mut input) {
                    errors.push(err_into(input.location(), e));
                    if !recover {
                        break;
                    }
                    skip_line(source, &mut input, expr_start);
                }
            }
            Some('#') => match comment(&mut input, spec) {
                Ok(text) => pending.push(text.to_string()),
                Err(e) => {
                    errors.push(err_into(input.location(), e));
                    if !recover {
                        break;
                    }
                    skip_line(source, &mut input, expr_start);
                }
            },
            Some('[') => {
                match header_expr(
                    &mut input,
                    spec,
                    &mut root,
                    &mut current,
                    &mut pending,
                    indent,
                ) {
                    Ok(()) => current_valid = true,
                    Err(e) => {
                        errors.push(err_into(input.location(), e));
                        current_valid = false;
                        if !recover {
                            break;
                        }
                        skip_line(source, &mut input, expr_start);
                    }
                }
            }
            Some(_) => {
                if let Err(e) = keyval_expr(
                    &mut input,
                    spec,
                    &mut root,
                    &current,
                    current_valid,
                    &mut pending,
                    indent,
                ) {
                    errors.push(err_into(input.location(), e));
                    if !recover {
                        break;
                    }
                    skip_line(source, &mut input, expr_start);
                }
            }
        }
    }
    if errors.is_empty() {
        Ok(TomlDocument {
            root,
            trailing: pending,
        })
    } else {
        Err(build_error(source, name, errors))
    }
}

/// Parses a standalone value, as written on the right-hand side of a
/// key/value pair.
pub(crate) fn parse_value(source: &str) -> Result<TomlValue, TomlError> {
    let spec = TomlSpec::default();
    let mut input = Located::new(source);
    let parsed = (|input: &mut Input<'_>| -> PResult<TomlValue> {
        space0(input)?;
        let value = require_value(input, &spec, 0)?;
        space0(input)?;
        if peek_char(input).is_some() {
            return cut_kind(input, TomlErrorKind::Expected("end of input"));
        }
        Ok(value)
    })(&mut input);
    let at = input.location();
    parsed.map_err(|e| build_error(source, None, vec![err_into(at, e)]))
}

/// Parses a standalone simple key (bare or quoted).
pub(crate) fn parse_key(source: &str) -> Result<TomlKey, TomlError> {
    let spec = TomlSpec::default();
    let mut input = Located::new(source);
    let parsed = (|input: &mut Input<'_>| -> PResult<TomlKey> {
        space0(input)?;
        let key = match key(input, &spec) {
            Err(ErrMode::Backtrack(_)) => {
                return cut_kind(input, TomlErrorKind::Expected("a key"))
            }
            other => other?,
        };
        space0(input)?;
        if peek_char(input).is_some() {
            return cut_kind(input, TomlErrorKind::Expected("end of input"));
        }
        Ok(key)
    })(&mut input);
    let at = input.location();
    parsed.map_err(|e| build_error(source, None, vec![err_into(at, e)]))
}

/// Lowers an internal parse error into the raw material for a diagnostic,
/// defaulting the span to `at` when the failure did not pin one down.
fn err_into(at: usize, err: ErrMode<TomlParseError>) -> TomlParseError {
    let mut e = match err {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => TomlParseError::empty(),
    };
    if e.span.is_none() {
        e.span = Some(SourceSpan::new(at.into(), 0));
    }
    e
}

fn to_diagnostic(err: TomlParseError, input: &NamedSource<Arc<String>>) -> TomlDiagnostic {
    let kind = match (err.kind, err.context) {
        (Some(kind), _) => kind,
        (None, Some(ctx)) => TomlErrorKind::Expected(ctx),
        (None, None) => TomlErrorKind::Other,
    };
    let help: Option<String> = err
        .help
        .map(Into::into)
        .or_else(|| kind.help().map(Into::into));
    TomlDiagnostic {
        input: input.clone(),
        span: err.span.unwrap_or_else(|| SourceSpan::new(0.into(), 0)),
        secondary: err
            .secondary
            .into_iter()
            .map(|(span, label)| LabeledSpan::new_with_span(Some(label.to_string()), span))
            .collect(),
        label: err.label.map(Into::into),
        help,
        severity: Severity::Error,
        kind,
    }
}

pub(crate) fn build_error(
    source: &str,
    name: Option<&str>,
    errors: Vec<TomlParseError>,
) -> TomlError {
    let src = Arc::new(source.to_string());
    let input = NamedSource::new(name.unwrap_or("<input>"), src);
    let diagnostics = errors
        .into_iter()
        .map(|e| to_diagnostic(e, &input))
        .collect();
    TomlError { input, diagnostics }
}

#[cfg(test)]
mod test {
    use super::*;

    fn doc(input: &str) -> TomlDocument {
        parse_document(input, None, &TomlSpec::default(), false)
            .expect("expected document to parse")
    }

    fn errs(input: &str) -> Vec<TomlErrorKind> {
        parse_document(input, None, &TomlSpec::default(), true)
            .expect_err("expected document to fail")
            .diagnostics
            .into_iter()
            .map(|d| d.kind)
            .collect()
    }

    #[test]
    fn integers() {
        let d = doc("a = 42\nb = -17\nc = 0xdead_beef\nd = 0o755\ne = 0b1010\nf = 1_000_000\n");
        assert_eq!(d.root.as_table().unwrap()["a"].as_integer(), Some(42));
        assert_eq!(d.root.as_table().unwrap()["b"].as_integer(), Some(-17));
        let c = &d.root.as_table().unwrap()["c"];
        assert_eq!(c.as_integer(), Some(0xdead_beef));
        let fmt = c.integer_format().unwrap();
        assert_eq!(fmt.radix, IntegerRadix::Hexadecimal);
        assert_eq!(fmt.spacing, Some(4));
        assert!(!fmt.uppercase);
        assert_eq!(d.root.as_table().unwrap()["d"].as_integer(), Some(0o755));
        assert_eq!(d.root.as_table().unwrap()["e"].as_integer(), Some(10));
        let f = &d.root.as_table().unwrap()["f"];
        assert_eq!(f.integer_format().unwrap().spacing, Some(3));
    }

    #[test]
    fn bad_integers() {
        assert!(matches!(
            errs("a = 0x\n")[0],
            TomlErrorKind::InvalidNumber(_)
        ));
        assert!(matches!(
            errs("a = 1__2\n")[0],
            TomlErrorKind::InvalidNumber(_)
        ));
        assert!(matches!(
            errs("a = 042\n")[0],
            TomlErrorKind::InvalidNumber(_)
        ));
        assert!(matches!(
            errs("a = 9223372036854775808\n")[0],
            TomlErrorKind::ParseInt(_)
        ));
    }

    #[test]
    fn floats() {
        let d = doc("a = 3.14\nb = -0.01\nc = 5e+22\nd = 6.626e-34\ne = inf\nf = -nan\n");
        let t = d.root.as_table().unwrap();
        assert_eq!(t["a"].as_float(), Some(3.14));
        assert_eq!(t["a"].float_format().unwrap().precision, Some(2));
        assert_eq!(t["a"].float_format().unwrap().style, FloatStyle::Fixed);
        assert_eq!(t["b"].as_float(), Some(-0.01));
        assert_eq!(t["c"].as_float(), Some(5e22));
        assert_eq!(t["c"].float_format().unwrap().style, FloatStyle::Scientific);
        assert_eq!(t["d"].as_float(), Some(6.626e-34));
        assert_eq!(t["e"].as_float(), Some(f64::INFINITY));
        assert!(t["f"].as_float().unwrap().is_nan());
    }

    #[test]
    fn strings() {
        let d = doc(concat!(
            "basic = \"hello\\tworld\"\n",
            "literal = 'C:\\Users\\nodejs'\n",
            "unicode = \"\\u00E9\\U0001F600\"\n",
            "ml = \"\"\"\nRoses are red\nViolets are blue\"\"\"\n",
            "cont = \"\"\"\\\n    The quick brown \\\n    fox.\"\"\"\n",
            "mll = '''\n'literal' content'''\n",
        ));
        let t = d.root.as_table().unwrap();
        assert_eq!(t["basic"].as_string(), Some("hello\tworld"));
        assert_eq!(t["literal"].as_string(), Some("C:\\Users\\nodejs"));
        assert_eq!(t["unicode"].as_string(), Some("é😀"));
        let ml = &t["ml"];
        assert_eq!(ml.as_string(), Some("Roses are red\nViolets are blue"));
        let fmt = ml.string_format().unwrap();
        assert_eq!(fmt.style, StringStyle::MultilineBasic);
        assert!(fmt.start_with_newline);
        assert_eq!(t["cont"].as_string(), Some("The quick brown fox."));
        assert_eq!(t["mll"].as_string(), Some("'literal' content"));
    }

    #[test]
    fn bad_strings() {
        assert!(matches!(
            errs("a = \"no end\n")[0],
            TomlErrorKind::UnterminatedString
        ));
        assert!(matches!(
            errs("a = \"bad \\w escape\"\n")[0],
            TomlErrorKind::InvalidEscape
        ));
        assert!(matches!(
            errs("a = \"\\uD800\"\n")[0],
            TomlErrorKind::InvalidEscape
        ));
    }

    #[test]
    fn date_times() {
        let d = doc(concat!(
            "odt = 1979-05-27T07:32:00Z\n",
            "odt2 = 1979-05-27 00:32:00.999-07:00\n",
            "ldt = 1979-05-27t07:32:00\n",
            "ld = 1979-05-27\n",
            "lt = 07:32:00.5555\n",
        ));
        let t = d.root.as_table().unwrap();
        assert!(t["odt"].is_offset_date_time());
        assert_eq!(
            t["odt"].date_time_format().unwrap().offset,
            OffsetStyle::Zulu
        );
        let odt2 = &t["odt2"];
        let fmt = odt2.date_time_format().unwrap();
        assert_eq!(fmt.delimiter, DateTimeDelimiter::Space);
        assert_eq!(fmt.subsec_digits, Some(3));
        assert_eq!(fmt.offset, OffsetStyle::Numeric);
        assert_eq!(
            t["ldt"].date_time_format().unwrap().delimiter,
            DateTimeDelimiter::LowerT
        );
        assert!(t["ld"].is_local_date());
        let lt = &t["lt"];
        assert!(lt.is_local_time());
        assert_eq!(lt.date_time_format().unwrap().subsec_digits, Some(4));
    }

    #[test]
    fn bad_date_times() {
        assert!(matches!(
            errs("a = 1979-13-01\n")[0],
            TomlErrorKind::InvalidDateTime(_)
        ));
        assert!(matches!(
            errs("a = 1979-02-30\n")[0],
            TomlErrorKind::InvalidDateTime(_)
        ));
        assert!(matches!(
            errs("a = 07:32\n")[0],
            TomlErrorKind::InvalidDateTime(_)
        ));
    }

    #[test]
    fn arrays() {
        let d = doc("a = [1, 2, 3]\nb = [\n    \"x\",\n    \"y\",\n]\nnested = [[1], [2, 3]]\n");
        let t = d.root.as_table().unwrap();
        let a = &t["a"];
        assert_eq!(a.as_array().unwrap().len(), 3);
        assert_eq!(a.array_format().unwrap().style, ArrayStyle::Oneline);
        let b = &t["b"];
        assert_eq!(b.array_format().unwrap().style, ArrayStyle::Multiline);
        assert_eq!(b.array_format().unwrap().body_indent, 4);
        assert_eq!(t["nested"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn array_comments() {
        let d = doc("a = [\n    # first\n    1, # one\n    2,\n]\n");
        let t = d.root.as_table().unwrap();
        let a = t["a"].as_array().unwrap();
        assert_eq!(a.get(0).unwrap().comments(), ["# first".to_string()]);
        assert_eq!(a.get(0).unwrap().trailing_comment(), Some("# one"));
        assert!(a.get(1).unwrap().comments().is_empty());
    }

    #[test]
    fn inline_tables() {
        let d = doc("point = { x = 1, y = 2 }\nname = { first = \"Tom\", \"last\" = 'P-W' }\ndotted = { a.b = 1 }\n");
        let t = d.root.as_table().unwrap();
        let point = &t["point"];
        assert_eq!(point.table_format().unwrap().style, TableStyle::Inline);
        assert_eq!(point.as_table().unwrap()["x"].as_integer(), Some(1));
        assert_eq!(
            t["name"].as_table().unwrap()["last"].as_string(),
            Some("P-W")
        );
        let dotted = t["dotted"].as_table().unwrap();
        assert_eq!(
            dotted["a"].as_table().unwrap()["b"].as_integer(),
            Some(1)
        );
    }

    #[test]
    fn inline_table_duplicate_key() {
        assert!(matches!(
            errs("t = { a = 1, a = 2 }\n")[0],
            TomlErrorKind::KeyConflict { .. }
        ));
    }

    #[test]
    fn table_headers() {
        let d = doc("[a]\nx = 1\n[a.b]\ny = 2\n[c.d]\nz = 3\n[c]\nw = 4\n");
        let t = d.root.as_table().unwrap();
        let a = &t["a"];
        assert_eq!(a.table_format().unwrap().style, TableStyle::Header);
        assert_eq!(a.as_table().unwrap()["x"].as_integer(), Some(1));
        assert_eq!(
            a.as_table().unwrap()["b"].as_table().unwrap()["y"].as_integer(),
            Some(2)
        );
        // [c] after [c.d] promotes the implicit intermediate.
        let c = &t["c"];
        assert_eq!(c.table_format().unwrap().style, TableStyle::Header);
        assert_eq!(c.as_table().unwrap()["w"].as_integer(), Some(4));
    }

    #[test]
    fn array_of_tables() {
        let d = doc("[[fruit]]\nname = \"apple\"\n[fruit.physical]\ncolor = \"red\"\n[[fruit]]\nname = \"banana\"\n");
        let t = d.root.as_table().unwrap();
        let fruit = &t["fruit"];
        assert_eq!(
            fruit.array_format().unwrap().style,
            ArrayStyle::ArrayOfTables
        );
        let array = fruit.as_array().unwrap();
        assert_eq!(array.len(), 2);
        // [fruit.physical] landed in the first element, not the second.
        assert!(array.get(0).unwrap().as_table().unwrap().contains_key("physical"));
        assert_eq!(
            array.get(1).unwrap().as_table().unwrap()["name"].as_string(),
            Some("banana")
        );
    }

    #[test]
    fn duplicate_table() {
        let kinds = errs("[table]\na = 42\n[table]\nb = 42\n");
        assert_eq!(kinds.len(), 1);
        assert!(matches!(kinds[0], TomlErrorKind::DuplicateTable { .. }));
    }

    #[test]
    fn dotted_key_conflicts() {
        assert!(matches!(
            errs("a.b = 1\na.b.c = 2\n")[0],
            TomlErrorKind::KeyConflict { .. }
        ));
        assert!(matches!(
            errs("a = 1\na = 2\n")[0],
            TomlErrorKind::KeyConflict { .. }
        ));
        // A header may not re-open a dotted-key table.
        assert!(matches!(
            errs("a.b = 1\n[a]\n")[0],
            TomlErrorKind::DuplicateTable { .. }
        ));
    }

    #[test]
    fn not_an_array_of_tables() {
        assert!(matches!(
            errs("a = [{b = 1}]\n[[a]]\nb = 2\n")[0],
            TomlErrorKind::NotAnArrayOfTables { .. }
        ));
    }

    #[test]
    fn table_conflicts() {
        assert!(matches!(
            errs("[[a]]\nx = 1\n[a]\n")[0],
            TomlErrorKind::TableConflict { .. }
        ));
        assert!(matches!(
            errs("t = {x = 1}\n[t.y]\n")[0],
            TomlErrorKind::TableConflict { .. }
        ));
        assert!(matches!(
            errs("a = 1\n[a]\n")[0],
            TomlErrorKind::TableRedefinedAsNonTable { .. }
        ));
    }

    #[test]
    fn multi_error_collection() {
        let kinds = errs("a = \nb = 42\nb = 43\n[t]\nx = 1\n[t]\n");
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], TomlErrorKind::Expected(_)));
        assert!(matches!(kinds[1], TomlErrorKind::KeyConflict { .. }));
        assert!(matches!(kinds[2], TomlErrorKind::DuplicateTable { .. }));
    }

    #[test]
    fn abort_on_first_error() {
        let err = parse_document(
            "a = \nb = 42\nb = 43\n",
            None,
            &TomlSpec::default(),
            false,
        )
        .expect_err("expected failure");
        assert_eq!(err.diagnostics.len(), 1);
    }

    #[test]
    fn failed_header_does_not_cascade() {
        // The keyvals under the bad header are grammar-checked but do not
        // land in the previous table.
        let kinds = errs("[a]\nx = 1\n[a]\nx = 2\n");
        assert_eq!(kinds.len(), 1);
        assert!(matches!(kinds[0], TomlErrorKind::DuplicateTable { .. }));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        // Run on a thread with an ample stack: the guard returns before any
        // real overflow, but MAX_NESTING recursion levels exceed the test
        // harness's default ~2MB per-thread stack (the library's 8MB main
        // thread is unaffected).
        std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(|| {
                let mut deep = String::from("a = ");
                for _ in 0..(MAX_NESTING + 10) {
                    deep.push('[');
                }
                let kinds = errs(&deep);
                assert!(kinds
                    .iter()
                    .any(|k| matches!(k, TomlErrorKind::NestingTooDeep)));
            })
            .expect("spawn test thread")
            .join()
            .expect("nesting test thread panicked");
    }

    #[test]
    fn comments_attach_verbatim() {
        let d = doc("# first\n# second\nkey = 1 # trailing\n");
        let value = &d.root.as_table().unwrap()["key"];
        assert_eq!(
            value.comments(),
            ["# first".to_string(), "# second".to_string()]
        );
        assert_eq!(value.trailing_comment(), Some("# trailing"));
    }

    #[test]
    fn header_comments_attach_to_table() {
        let d = doc("# the server\n[server] # main\nport = 80\n");
        let server = &d.root.as_table().unwrap()["server"];
        assert_eq!(server.comments(), ["# the server".to_string()]);
        assert_eq!(server.trailing_comment(), Some("# main"));
    }

    #[test]
    fn trailing_comment_block() {
        let d = doc("a = 1\n# the end\n");
        assert_eq!(d.trailing, vec!["# the end".to_string()]);
    }

    #[test]
    fn standalone_value_and_key() {
        assert_eq!(parse_value("42").unwrap().as_integer(), Some(42));
        assert_eq!(parse_value(" true ").unwrap().as_boolean(), Some(true));
        assert!(parse_value("42 43").is_err());
        assert_eq!(parse_key("\"a key\"").unwrap().value(), "a key");
        assert!(parse_key("two keys").is_err());
    }

    #[test]
    fn keys_keep_their_repr() {
        let d = doc("\"quoted key\" = 1\n'literal.key' = 2\n");
        let t = d.root.as_table().unwrap();
        assert_eq!(
            t.get_key("quoted key").and_then(|k| k.repr()),
            Some("\"quoted key\"")
        );
        assert_eq!(
            t.get_key("literal.key").and_then(|k| k.repr()),
            Some("'literal.key'")
        );
    }

    #[test]
    fn crlf_documents() {
        let d = doc("a = 1\r\n[t]\r\nb = 2\r\n");
        let t = d.root.as_table().unwrap();
        assert_eq!(t["a"].as_integer(), Some(1));
        assert_eq!(t["t"].as_table().unwrap()["b"].as_integer(), Some(2));
    }

    #[test]
    fn bom_is_skipped() {
        let d = doc("\u{feff}a = 1\n");
        assert_eq!(d.root.as_table().unwrap()["a"].as_integer(), Some(1));
    }
}
