use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::TomlKind;

/// The toplevel error type for this crate: returned when a TOML document
/// failed to parse.
///
/// This diagnostic implements [`miette::Diagnostic`] and can be used to
/// display detailed, pretty-printed diagnostic messages when using
/// [`miette::Result`] and the `"fancy"` feature flag for `miette`:
///
/// ```no_run
/// fn main() -> miette::Result<()> {
///     "a = 1979-13-01".parse::<tomled::TomlDocument>()?;
///     Ok(())
/// }
/// ```
///
/// For plain-text output with a caret under the offending span, see
/// [`TomlDiagnostic::render`].
#[derive(Debug, Diagnostic, Clone, Error)]
#[error("failed to parse TOML document")]
pub struct TomlError {
    /// Original input that this failure came from.
    #[source_code]
    pub input: NamedSource<Arc<String>>,

    /// Every diagnostic collected for this failure. The entry point decides
    /// whether this holds only the first problem or all of them.
    #[related]
    pub diagnostics: Vec<TomlDiagnostic>,
}

impl TomlError {
    /// The first diagnostic. A `TomlError` always carries at least one.
    pub fn first(&self) -> &TomlDiagnostic {
        &self.diagnostics[0]
    }
}

/// An individual diagnostic message for a TOML parsing issue.
///
/// While generally signifying errors, they can also be treated as warnings.
#[derive(Debug, Diagnostic, Clone, Error)]
#[error("{kind}")]
pub struct TomlDiagnostic {
    /// Shared source for the diagnostic.
    #[source_code]
    pub input: NamedSource<Arc<String>>,

    /// Offset of the error in the input.
    #[label("{}", label.clone().unwrap_or_else(|| "here".into()))]
    pub span: SourceSpan,

    /// Additional labeled spans, e.g. the first definition of a duplicated
    /// table.
    #[label(collection)]
    pub secondary: Vec<LabeledSpan>,

    /// Label text for the primary span. Defaults to `"here"`.
    pub label: Option<String>,

    /// Suggestion for fixing the parse error.
    #[help]
    pub help: Option<String>,

    /// Severity level for the diagnostic.
    #[diagnostic(severity)]
    pub severity: miette::Severity,

    /// What went wrong.
    pub kind: TomlErrorKind,
}

/// The specific kind of parse failure behind a [`TomlDiagnostic`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TomlErrorKind {
    /// The grammar needed a particular token or construct here.
    #[error("expected {0}")]
    Expected(&'static str),

    /// A string ran into the end of its line (or the document) before its
    /// closing quotes.
    #[error("unterminated string")]
    UnterminatedString,

    /// An unknown or malformed escape sequence in a basic string.
    #[error("invalid escape sequence")]
    InvalidEscape,

    /// A character that cannot appear in this kind of string.
    #[error("invalid string: {0}")]
    InvalidString(&'static str),

    /// A malformed number literal.
    #[error("invalid number: {0}")]
    InvalidNumber(&'static str),

    /// A malformed date or time, or one with out-of-range components.
    #[error("invalid date-time: {0}")]
    InvalidDateTime(&'static str),

    /// A control character in a comment, in a dialect that forbids them.
    #[error("invalid character in comment")]
    InvalidComment,

    /// Heterogeneous array in a dialect with the legacy homogeneity rule.
    #[error("array of mixed types")]
    MixedArrayTypes,

    /// Arrays/inline tables nested beyond the supported depth.
    #[error("values nested too deeply")]
    NestingTooDeep,

    /// An integer literal that does not fit in 64 bits.
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// A table was defined a second time.
    #[error("table `{path}` defined multiple times")]
    DuplicateTable {
        /// Dotted path of the table.
        path: String,
    },

    /// A key was assigned twice, or a dotted key path ran through a
    /// non-table value.
    #[error("key `{key}` conflicts with an earlier definition")]
    KeyConflict {
        /// The conflicting key.
        key: String,
    },

    /// `[[name]]` tried to append to something that is not an array of
    /// tables.
    #[error("`{path}` is not an array of tables")]
    NotAnArrayOfTables {
        /// Dotted path of the array.
        path: String,
    },

    /// A table header collided with an array of tables or an inline table.
    #[error("table `{path}` conflicts with an earlier definition")]
    TableConflict {
        /// Dotted path of the table.
        path: String,
    },

    /// A header named something that already holds a non-table value.
    #[error("`{path}` is not a table")]
    TableRedefinedAsNonTable {
        /// Dotted path of the entry.
        path: String,
    },

    /// Anything the parser could not make sense of.
    #[error("unexpected input")]
    Other,
}

impl TomlErrorKind {
    /// True for violations of document invariants (duplicate tables, key
    /// conflicts, array-of-tables misuse) as opposed to grammar failures.
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            TomlErrorKind::DuplicateTable { .. }
                | TomlErrorKind::KeyConflict { .. }
                | TomlErrorKind::NotAnArrayOfTables { .. }
                | TomlErrorKind::TableConflict { .. }
                | TomlErrorKind::TableRedefinedAsNonTable { .. }
                | TomlErrorKind::MixedArrayTypes
        )
    }

    pub(crate) fn help(&self) -> Option<&'static str> {
        match self {
            TomlErrorKind::UnterminatedString => Some(
                "single-line strings must close before the end of the line; use \"\"\" or ''' for multi-line content",
            ),
            TomlErrorKind::InvalidEscape => Some(
                "valid escapes are \\b, \\t, \\n, \\f, \\r, \\\", \\\\, \\uXXXX, and \\UXXXXXXXX",
            ),
            TomlErrorKind::InvalidNumber(_) => Some(
                "underscores must be surrounded by digits, and decimal numbers may not have leading zeroes",
            ),
            TomlErrorKind::InvalidDateTime(_) => {
                Some("dates and times follow RFC 3339, e.g. 1979-05-27T07:32:00Z")
            }
            TomlErrorKind::InvalidComment => {
                Some("control characters other than tab are not permitted in comments in this revision")
            }
            TomlErrorKind::MixedArrayTypes => {
                Some("this dialect requires all elements of an array to share one type")
            }
            TomlErrorKind::DuplicateTable { .. } => {
                Some("a table may only be defined once; merge the entries into the first definition")
            }
            TomlErrorKind::KeyConflict { .. } => Some("a key may only be assigned once"),
            TomlErrorKind::NotAnArrayOfTables { .. } => {
                Some("`[[name]]` may only extend arrays that were created by `[[name]]` headers")
            }
            _ => None,
        }
    }
}

impl TomlDiagnostic {
    /// Renders this diagnostic as a plain-text report: the message, the
    /// offending line, and a caret underline beneath the offending span.
    ///
    /// The output is stable and suitable for literal comparison in tests.
    /// For colorful terminal output, use miette's `"fancy"` feature and
    /// report the containing [`TomlError`] instead.
    pub fn render(&self) -> String {
        let source: &str = self.input.inner().as_str();
        let offset = self.span.offset().min(source.len());
        let (line_no, col, line_text) = locate(source, offset);

        let mut underline_len = self.span.len().max(1);
        let rest_of_line = line_text.chars().count().saturating_sub(col - 1);
        if rest_of_line > 0 {
            underline_len = underline_len.min(rest_of_line);
        }

        let gutter = line_no.to_string();
        let pad = " ".repeat(gutter.len());
        let mut out = format!(
            "error: {}\n{}--> {}:{}:{}\n{} |\n{} | {}\n{} | {}{}\n",
            self,
            pad,
            self.input.name(),
            line_no,
            col,
            pad,
            gutter,
            line_text,
            pad,
            " ".repeat(col - 1),
            "^".repeat(underline_len),
        );
        for labeled in &self.secondary {
            let (sec_line, sec_col, _) = locate(source, labeled.offset().min(source.len()));
            out.push_str(&format!(
                "{} = note: {} ({}:{}:{})\n",
                pad,
                labeled.label().unwrap_or("see also"),
                self.input.name(),
                sec_line,
                sec_col,
            ));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("{} = help: {}\n", pad, help));
        }
        out
    }
}

/// 1-based line and column (in characters) of a byte offset, plus the text
/// of that line without its terminator.
fn locate(source: &str, offset: usize) -> (usize, usize, &str) {
    let before = &source[..offset];
    let line_no = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let col = source[line_start..offset].chars().count() + 1;
    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());
    let line_text = source[line_start..line_end].trim_end_matches('\r');
    (line_no, col, line_text)
}

/// A typed accessor was called on a value of a different kind.
///
/// Produced by the `try_*` accessors on [`TomlValue`](crate::TomlValue).
/// Carries no source location: it is an accessor-time error, not a
/// parse-time one.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("expected {expected}, found {found}")]
pub struct TomlTypeError {
    /// The kind the accessor was for.
    pub expected: TomlKind,
    /// The kind the value actually has.
    pub found: TomlKind,
}

/// A key or index lookup failed.
///
/// Produced by [`TomlTable::try_get`](crate::TomlTable::try_get) and
/// [`TomlArray::try_get`](crate::TomlArray::try_get). Carries no source
/// location.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TomlLookupError {
    /// The table has no entry for this key.
    #[error("no entry for key `{0}`")]
    MissingKey(String),

    /// The array index was out of bounds.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The array length.
        len: usize,
    },
}
