use std::fmt::Display;
use std::str::FromStr;

use crate::{parser, ser, TomlData, TomlError, TomlSpec, TomlTable, TomlValue};

/// A parsed TOML document: the root table plus the comment block, if any,
/// that trails the last expression in the file.
///
/// Parsing preserves enough formatting information (number radix, string
/// quoting, array/table layout, comments) that a document round-trips
/// through [`Display`] without losing its shape:
///
/// ```rust
/// use tomled::TomlDocument;
///
/// let doc_str = "\
/// # This is a TOML document
/// title = \"TOML Example\"
///
/// [owner]
/// name = \"Tom\"
/// ";
/// let doc: TomlDocument = doc_str.parse().expect("failed to parse TOML");
/// assert_eq!(doc.get("title").and_then(|v| v.as_string()), Some("TOML Example"));
/// assert_eq!(doc.to_string(), doc_str);
/// ```
#[derive(Debug, Clone)]
pub struct TomlDocument {
    pub(crate) root: TomlValue,
    pub(crate) trailing: Vec<String>,
}

// Structural equality, consistent with `TomlValue`: trailing comments do not
// participate.
impl PartialEq for TomlDocument {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Default for TomlDocument {
    fn default() -> Self {
        TomlDocument::new()
    }
}

impl TomlDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        TomlDocument {
            root: TomlValue::table(TomlTable::new()),
            trailing: Vec::new(),
        }
    }

    /// Parses a document under the default [`TomlSpec`], stopping at the
    /// first problem. The returned [`TomlError`] carries exactly one
    /// diagnostic.
    pub fn parse(input: &str) -> Result<TomlDocument, TomlError> {
        parser::parse_document(input, None, &TomlSpec::default(), false)
    }

    /// Parses a document under the default [`TomlSpec`], collecting every
    /// diagnostic it can before giving up.
    ///
    /// On failure no value tree is returned, however far the parse got: the
    /// diagnostics are best-effort, the tree is all-or-nothing.
    pub fn try_parse(input: &str) -> Result<TomlDocument, TomlError> {
        parser::parse_document(input, None, &TomlSpec::default(), true)
    }

    /// Like [`TomlDocument::parse`], with an explicit dialect and an
    /// optional source name for diagnostics.
    pub fn parse_with(
        input: &str,
        name: Option<&str>,
        spec: &TomlSpec,
    ) -> Result<TomlDocument, TomlError> {
        parser::parse_document(input, name, spec, false)
    }

    /// Like [`TomlDocument::try_parse`], with an explicit dialect and an
    /// optional source name for diagnostics.
    pub fn try_parse_with(
        input: &str,
        name: Option<&str>,
        spec: &TomlSpec,
    ) -> Result<TomlDocument, TomlError> {
        parser::parse_document(input, name, spec, true)
    }

    /// The root value. Always a table.
    pub fn root(&self) -> &TomlValue {
        &self.root
    }

    /// The root table.
    pub fn table(&self) -> &TomlTable {
        match &self.root.data {
            TomlData::Table(table, _) => table,
            _ => unreachable!("the document root is always a table"),
        }
    }

    /// The root table, mutably.
    pub fn table_mut(&mut self) -> &mut TomlTable {
        match &mut self.root.data {
            TomlData::Table(table, _) => table,
            _ => unreachable!("the document root is always a table"),
        }
    }

    /// Gets the value for a top-level key.
    pub fn get(&self, key: &str) -> Option<&TomlValue> {
        self.table().get(key)
    }

    /// Gets the value for a top-level key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut TomlValue> {
        self.table_mut().get_mut(key)
    }

    /// Inserts a top-level entry, returning the previous value for that key,
    /// if any.
    pub fn insert(
        &mut self,
        key: impl Into<crate::TomlKey>,
        value: impl Into<TomlValue>,
    ) -> Option<TomlValue> {
        self.table_mut().insert(key, value)
    }

    /// Removes a top-level entry, returning its value, if any.
    pub fn remove(&mut self, key: &str) -> Option<TomlValue> {
        self.table_mut().remove(key)
    }

    /// The comment block after the last expression in the document, one
    /// entry per line, markers included.
    pub fn trailing_comments(&self) -> &[String] {
        &self.trailing
    }

    /// Replaces the trailing comment block.
    pub fn set_trailing_comments(&mut self, comments: impl IntoIterator<Item = String>) {
        self.trailing = comments.into_iter().collect();
    }

    /// Auto-formats this document: every format descriptor is reset to its
    /// neutral default and the serializer re-derives the layout.
    ///
    /// Note: this currently removes comments as well.
    pub fn fmt(&mut self) {
        self.root.clear_fmt();
        self.root.clear_comments();
        self.trailing.clear();
    }
}

impl Display for TomlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ser::format_document(self, &TomlSpec::default()))
    }
}

impl FromStr for TomlDocument {
    type Err = TomlError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        TomlDocument::parse(input)
    }
}

impl std::ops::Index<&str> for TomlDocument {
    type Output = TomlValue;

    fn index(&self, key: &str) -> &Self::Output {
        &self.table()[key]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parsing() {
        let src = "\
# Top of file
title = \"TOML Example\" # inline

[owner]
name = \"Tom Preston-Werner\"
dob = 1979-05-27T07:32:00-08:00

[database]
enabled = true
ports = [8000, 8001, 8002]
";
        let doc: TomlDocument = src.parse().expect("failed to parse document");
        assert_eq!(
            doc["title"].as_string(),
            Some("TOML Example")
        );
        assert_eq!(doc["title"].trailing_comment(), Some("# inline"));
        let owner = doc["owner"].as_table().expect("owner should be a table");
        assert_eq!(owner["name"].as_string(), Some("Tom Preston-Werner"));
        let ports = doc["database"].as_table().unwrap()["ports"]
            .as_array()
            .expect("ports should be an array");
        assert_eq!(ports.len(), 3);

        // Documents round-trip.
        assert_eq!(doc.to_string(), src);
    }

    #[test]
    fn construction() {
        let mut doc = TomlDocument::new();
        doc.insert("title", "Example");
        let mut server = TomlTable::new();
        server.insert("host", "0.0.0.0");
        server.insert("port", 8080i64);
        doc.insert(
            "server",
            TomlValue::table_with_format(
                server,
                crate::TableFormat {
                    style: crate::TableStyle::Header,
                    ..Default::default()
                },
            ),
        );

        assert_eq!(
            doc.to_string(),
            "title = \"Example\"\n\n[server]\nhost = \"0.0.0.0\"\nport = 8080\n"
        );
    }

    #[test]
    fn autoformat() {
        let mut doc = TomlDocument::parse("n   = 0xff # hex\n").expect("should parse");
        TomlDocument::fmt(&mut doc);
        assert_eq!(doc.to_string(), "n = 255\n");
    }

    #[test]
    fn equality_ignores_trailing_comments() {
        let a = TomlDocument::parse("x = 1\n# end\n").unwrap();
        let b = TomlDocument::parse("x = 1\n").unwrap();
        assert_eq!(a, b);
    }
}
