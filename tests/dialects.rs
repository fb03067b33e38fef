//! Dialect gating: TOML v1.1 draft relaxations and library extensions are
//! only recognized when the active `TomlSpec` enables them.

use miette::Result;
use pretty_assertions::assert_eq;

use tomled::{FloatStyle, TomlDocument, TomlErrorKind, TomlSpec};

fn v1_1() -> TomlSpec {
    TomlSpec::v1_1()
}

fn parse_with(input: &str, spec: &TomlSpec) -> Result<TomlDocument, tomled::TomlError> {
    TomlDocument::parse_with(input, None, spec)
}

#[test]
fn optional_seconds() {
    let input = "lunch = 12:30\n";
    let err = TomlDocument::parse(input).expect_err("v1.0 requires seconds");
    assert!(matches!(err.first().kind, TomlErrorKind::InvalidDateTime(_)));

    let doc = parse_with(input, &v1_1()).expect("v1.1 allows omitted seconds");
    let lunch = doc.get("lunch").unwrap();
    assert!(lunch.is_local_time());
    assert!(!lunch.date_time_format().unwrap().has_seconds);
    // The omitted seconds stay omitted when serializing under the same spec.
    assert_eq!(tomled::ser::format_document(&doc, &v1_1()), input);
}

#[test]
fn trailing_commas_in_inline_tables() {
    let input = "t = { a = 1, }\n";
    assert!(TomlDocument::parse(input).is_err());
    let doc = parse_with(input, &v1_1()).expect("v1.1 allows the trailing comma");
    assert_eq!(
        doc.get("t").unwrap().as_table().unwrap()["a"].as_integer(),
        Some(1)
    );
}

#[test]
fn newlines_in_inline_tables() {
    let input = "t = {\n    a = 1,\n    b = 2\n}\n";
    assert!(TomlDocument::parse(input).is_err());
    let doc = parse_with(input, &v1_1()).expect("v1.1 allows multi-line inline tables");
    assert_eq!(
        doc.get("t").unwrap().as_table().unwrap()["b"].as_integer(),
        Some(2)
    );
}

#[test]
fn escape_sequence_extensions() {
    let esc = "s = \"\\e[1m\"\n";
    assert!(matches!(
        TomlDocument::parse(esc).unwrap_err().first().kind,
        TomlErrorKind::InvalidEscape
    ));
    let doc = parse_with(esc, &v1_1()).expect("v1.1 recognizes \\e");
    assert_eq!(doc.get("s").unwrap().as_string(), Some("\u{1b}[1m"));

    let hex = "s = \"\\x41\\x42\"\n";
    assert!(TomlDocument::parse(hex).is_err());
    let doc = parse_with(hex, &v1_1()).expect("v1.1 recognizes \\xHH");
    assert_eq!(doc.get("s").unwrap().as_string(), Some("AB"));
}

#[test]
fn control_characters_in_comments() {
    let input = "a = 1 # del\u{7f} in comment\n";
    assert!(matches!(
        TomlDocument::parse(input).unwrap_err().first().kind,
        TomlErrorKind::InvalidComment
    ));
    assert!(parse_with(input, &v1_1()).is_ok());
}

#[test]
fn hex_float_extension() -> Result<()> {
    let input = "f = 0x1.8p+3\n";
    // Without the extension `0x1` parses as an integer and the rest of the
    // line is garbage.
    assert!(TomlDocument::parse(input).is_err());

    let spec = TomlSpec {
        ext_hex_float: true,
        ..TomlSpec::v1_0()
    };
    let doc = parse_with(input, &spec)?;
    let f = doc.get("f").unwrap();
    assert_eq!(f.as_float(), Some(12.0));
    assert_eq!(f.float_format().unwrap().style, FloatStyle::Hex);
    assert_eq!(tomled::ser::format_document(&doc, &spec), input);
    Ok(())
}

#[test]
fn numeric_suffix_extension() -> Result<()> {
    let input = "price = 100_500_yen\n";
    assert!(TomlDocument::parse(input).is_err());

    let spec = TomlSpec {
        ext_num_suffix: true,
        ..TomlSpec::v1_0()
    };
    let doc = parse_with(input, &spec)?;
    let price = doc.get("price").unwrap();
    assert_eq!(price.as_integer(), Some(100500));
    let format = price.integer_format().unwrap();
    assert_eq!(format.spacing, Some(3));
    assert_eq!(format.suffix.as_deref(), Some("yen"));
    assert_eq!(tomled::ser::format_document(&doc, &spec), input);
    Ok(())
}

#[test]
fn legacy_homogeneous_arrays() {
    let input = "a = [1, 1.0]\n";
    // Heterogeneous arrays are standard TOML v1.0.
    assert!(TomlDocument::parse(input).is_ok());

    let spec = TomlSpec {
        homogeneous_arrays: true,
        ..TomlSpec::v1_0()
    };
    let err = TomlDocument::parse_with(input, None, &spec)
        .expect_err("the legacy rule rejects mixed arrays");
    assert!(matches!(err.first().kind, TomlErrorKind::MixedArrayTypes));
}
