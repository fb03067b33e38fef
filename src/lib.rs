//! `tomled` is a "document-oriented" parser and API for TOML. Unlike
//! serde-based implementations, this crate preserves formatting when editing,
//! as well as when inserting or changing values with custom formatting. This
//! is most useful when working with human-maintained TOML files.
//!
//! Parsed values remember their written shape: an integer keeps its radix and
//! digit separators, a string keeps its quoting style, arrays and tables keep
//! their layout and indentation, and comments stay attached to the values
//! they were written above (or after, on the same line).
//!
//! ## Example
//!
//! ```rust
//! use tomled::TomlDocument;
//!
//! let doc_str = "\
//! # This is a TOML document
//! title = \"TOML Example\"
//!
//! [owner]
//! name = \"Tom Preston-Werner\"
//!
//! [database]
//! ports = [8000, 8001, 8002]
//! ";
//!
//! let doc: TomlDocument = doc_str.parse().expect("failed to parse TOML");
//!
//! assert_eq!(
//!     doc.get("title").and_then(|v| v.as_string()),
//!     Some("TOML Example")
//! );
//!
//! // Documents fully round-trip:
//! assert_eq!(doc.to_string(), doc_str);
//! ```
//!
//! ## Controlling Formatting
//!
//! By default, everything is created with default formatting. You can parse
//! items manually to provide custom representations:
//!
//! ```rust
//! let value: tomled::TomlValue = "0xDEAD_BEEF".parse().unwrap();
//! assert_eq!(value.as_integer(), Some(3735928559));
//! assert_eq!(value.to_string(), "0xDEAD_BEEF");
//! ```
//!
//! Or construct values programmatically with explicit format descriptors and
//! comments; [`TomlValue::clear_fmt`] and [`TomlDocument::fmt`] reset
//! everything back to neutral, auto-derived formatting.
//!
//! ## Dialects
//!
//! Parsing and serialization are driven by a [`TomlSpec`]: the TOML language
//! revision plus feature flags for optional grammar productions (the TOML
//! v1.1 draft relaxations) and library extensions (hex floats, numeric unit
//! suffixes, the legacy homogeneous-array rule). The default spec is TOML
//! v1.0 with no extensions.
//!
//! ```rust
//! use tomled::{TomlDocument, TomlSpec};
//!
//! // `07:32` (no seconds) is only valid under the v1.1 draft.
//! assert!(TomlDocument::parse("t = 07:32\n").is_err());
//! assert!(TomlDocument::parse_with("t = 07:32\n", None, &TomlSpec::v1_1()).is_ok());
//! ```
//!
//! ## Error Reporting
//!
//! [`TomlError`] implements [`miette::Diagnostic`] and can be used to display
//! detailed, pretty-printed diagnostic messages when using [`miette::Result`]
//! and the `"fancy"` feature flag for `miette`:
//!
//! ```toml
//! # Cargo.toml
//! [dependencies]
//! miette = { version = "x.y.z", features = ["fancy"] }
//! ```
//!
//! ```no_run
//! fn main() -> miette::Result<()> {
//!     "a = 1979-13-01".parse::<tomled::TomlDocument>()?;
//!     Ok(())
//! }
//! ```
//!
//! [`TomlDocument::try_parse`] keeps going past recoverable failures and
//! reports every diagnostic it finds; [`TomlDiagnostic::render`] produces a
//! stable plain-text report with a caret under the offending span.
//!
//! ## Quirks
//!
//! ### Numbers
//!
//! Integers are [`i64`] and floats are [`f64`]. The original representation
//! (radix, separators, precision) is preserved per value, unless you
//! [`TomlDocument::fmt`], in which case the representation is thrown away
//! and the plain value is used when serializing.
//!
//! ### Equality
//!
//! [`TomlValue`] equality is structural over payloads: formatting, comments,
//! and source spans do not participate. `0xff` and `255` are equal values.
//!
//! ## License
//!
//! The code in this repository is covered by [the Apache-2.0
//! License](LICENSE.md).

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub, rust_2018_idioms)]
#![cfg_attr(test, deny(warnings))]

pub use array::*;
pub use document::*;
pub use error::*;
pub use fmt::*;
pub use key::*;
pub use spec::*;
pub use table::*;
pub use value::*;

mod array;
mod document;
mod error;
mod fmt;
mod key;
mod parser;
pub mod ser;
mod spec;
mod table;
mod value;
