#[cfg(feature = "span")]
use miette::SourceSpan;
use std::{borrow::Borrow, fmt::Display, str::FromStr};

use crate::{parser, TomlError};

/// A single TOML key: one segment of a dotted key, a table header segment,
/// or a plain key in a key/value pair.
///
/// A key remembers its original written representation (`repr`), so a quoted
/// key like `"foo bar"` or `'127.0.0.1'` round-trips exactly. Two keys
/// compare equal when their *values* are equal, regardless of quoting.
#[derive(Debug, Clone)]
pub struct TomlKey {
    pub(crate) value: String,
    pub(crate) repr: Option<String>,
    #[cfg(feature = "span")]
    pub(crate) span: Option<SourceSpan>,
}

impl PartialEq for TomlKey {
    fn eq(&self, other: &Self) -> bool {
        // repr and span intentionally omitted: lookup and equality are by
        // key value only.
        self.value == other.value
    }
}

impl Eq for TomlKey {}

impl PartialOrd for TomlKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TomlKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl std::hash::Hash for TomlKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl Borrow<str> for TomlKey {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl TomlKey {
    /// Creates a new key with default (bare if possible) representation.
    pub fn new(value: impl Into<String>) -> Self {
        TomlKey {
            value: value.into(),
            repr: None,
            #[cfg(feature = "span")]
            span: None,
        }
    }

    /// Gets the string value for this key.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Sets the string value for this key, discarding any custom
    /// representation.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.repr = None;
    }

    /// Gets this key's span in the source it was parsed from, if any.
    ///
    /// Programmatically constructed keys have no span.
    #[cfg(feature = "span")]
    pub fn span(&self) -> Option<SourceSpan> {
        self.span
    }

    /// Sets this key's span.
    #[cfg(feature = "span")]
    pub fn set_span(&mut self, span: impl Into<SourceSpan>) {
        self.span = Some(span.into());
    }

    /// Gets the custom string representation for this key, if any.
    pub fn repr(&self) -> Option<&str> {
        self.repr.as_deref()
    }

    /// Sets a custom string representation for this key.
    pub fn set_repr(&mut self, repr: impl Into<String>) {
        self.repr = Some(repr.into());
    }

    /// Resets this key to its default representation: bare if the value is
    /// a valid bare key, quoted otherwise.
    pub fn clear_fmt(&mut self) {
        self.repr = None;
    }

    /// True if `value` can be written as a bare (unquoted) key.
    pub fn is_bare(value: &str) -> bool {
        !value.is_empty() && value.chars().all(Self::is_bare_key_char)
    }

    pub(crate) fn is_bare_key_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }

    pub(crate) fn write_default_repr(
        value: &str,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        if Self::is_bare(value) {
            write!(f, "{}", value)
        } else {
            write!(f, "\"")?;
            for c in value.chars() {
                match c {
                    '\\' | '"' => write!(f, "\\{}", c)?,
                    '\n' => write!(f, "\\n")?,
                    '\r' => write!(f, "\\r")?,
                    '\t' => write!(f, "\\t")?,
                    c if (c as u32) < 0x20 => write!(f, "\\u{:04X}", c as u32)?,
                    c => write!(f, "{}", c)?,
                }
            }
            write!(f, "\"")
        }
    }
}

impl Display for TomlKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(repr) = &self.repr {
            write!(f, "{}", repr)
        } else {
            Self::write_default_repr(&self.value, f)
        }
    }
}

impl From<&str> for TomlKey {
    fn from(value: &str) -> Self {
        TomlKey::new(value)
    }
}

impl From<String> for TomlKey {
    fn from(value: String) -> Self {
        TomlKey::new(value)
    }
}

impl FromStr for TomlKey {
    type Err = TomlError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parser::parse_key(input)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bare_vs_quoted_display() {
        let key = TomlKey::new("server");
        assert_eq!(format!("{}", key), "server");

        let key = TomlKey::new("two words");
        assert_eq!(format!("{}", key), "\"two words\"");

        let key = TomlKey::new("tab\there");
        assert_eq!(format!("{}", key), "\"tab\\there\"");
    }

    #[test]
    fn repr_wins() {
        let mut key = TomlKey::new("127.0.0.1");
        key.set_repr("'127.0.0.1'");
        assert_eq!(format!("{}", key), "'127.0.0.1'");
        key.clear_fmt();
        assert_eq!(format!("{}", key), "\"127.0.0.1\"");
    }

    #[test]
    fn equality_ignores_repr() {
        let mut quoted = TomlKey::new("a");
        quoted.set_repr("\"a\"");
        assert_eq!(quoted, TomlKey::new("a"));
    }

    #[test]
    fn parsing() -> miette::Result<()> {
        let key: TomlKey = "\"quoted key\"".parse()?;
        assert_eq!(key.value(), "quoted key");
        assert_eq!(key.repr(), Some("\"quoted key\""));

        let key: TomlKey = "bare-key_1".parse()?;
        assert_eq!(key.value(), "bare-key_1");

        assert!("not a key".parse::<TomlKey>().is_err());
        Ok(())
    }
}
