use miette::Result;
use pretty_assertions::assert_eq;

use tomled::{
    IntegerRadix, TomlDocument, TomlErrorKind, TomlLookupError, TomlSpec, TomlValue,
};

#[test]
fn round_trip_idempotence() -> Result<()> {
    let sources = [
        "a = 1\nb = \"two\"\nc = [3, 4]\n",
        "best-day-ever = 1987-07-05T17:45:00Z\n",
        "[a]\nx = 0b1010\n[a.b]\ny = 'literal'\n",
        "[[bin]]\nname = \"cli\"\n\n[[bin]]\nname = \"daemon\"\n",
        "numbers = [0.1, 0.2, 0.5, 1, 2, 5]\n",
        "contributors = [\n    \"Foo Bar <foo@example.com>\",\n    { name = \"Baz Qux\", url = \"https://example.com/bazqux\" },\n]\n",
    ];
    for src in sources {
        let doc = TomlDocument::try_parse(src)?;
        let once = doc.to_string();
        let reparsed = TomlDocument::parse(&once)?;
        // Re-parsing the serializer's output yields a structurally equal
        // tree, and a second pass changes nothing.
        assert_eq!(reparsed, doc, "structural equality lost for {src:?}");
        assert_eq!(reparsed.to_string(), once, "not a fixed point for {src:?}");
    }
    Ok(())
}

#[test]
fn fresh_values_have_no_comments() {
    let value = TomlValue::integer(1);
    assert!(value.comments().is_empty());
    assert!(value.trailing_comment().is_none());

    let commented = TomlValue::integer(1).with_comments(["# one".to_string()]);
    assert_eq!(commented.comments(), ["# one".to_string()]);
}

#[test]
fn parsed_comments_are_verbatim() -> Result<()> {
    let doc = TomlDocument::parse("#comment, no space\n  # indented comment\t\nkey = 1\n")?;
    assert_eq!(
        doc.get("key").unwrap().comments(),
        [
            "#comment, no space".to_string(),
            "# indented comment\t".to_string()
        ]
    );
    Ok(())
}

#[test]
fn duplicate_table_headers_fail() {
    let err = TomlDocument::parse("[table]\na = 42\n[table]\nb = 42\n")
        .expect_err("duplicate tables should fail");
    assert!(matches!(
        err.first().kind,
        TomlErrorKind::DuplicateTable { .. }
    ));
    assert!(err.first().kind.is_semantic());
}

#[test]
fn dotted_path_through_value_fails() {
    let err =
        TomlDocument::parse("a.b = 1\na.b.c = 2\n").expect_err("dotted conflict should fail");
    assert!(matches!(err.first().kind, TomlErrorKind::KeyConflict { .. }));
}

#[test]
fn appending_tables_to_a_plain_array_fails() {
    let err = TomlDocument::parse("a = [{b = 1}]\n[[a]]\nb = 2\n")
        .expect_err("appending to a value array should fail");
    assert!(matches!(
        err.first().kind,
        TomlErrorKind::NotAnArrayOfTables { .. }
    ));
}

#[test]
fn key_lookup() {
    let doc = TomlDocument::parse("title = \"TOML Example\"\n").unwrap();
    assert_eq!(
        doc.table().try_get("title").unwrap().as_string(),
        Some("TOML Example")
    );
    assert_eq!(
        doc.table().try_get("missing").unwrap_err(),
        TomlLookupError::MissingKey("missing".into())
    );
}

#[test]
fn integer_radix_round_trip() -> Result<()> {
    let value: TomlValue = "0xDEAD_BEEF".parse()?;
    assert_eq!(value.as_integer(), Some(3735928559));
    let format = value.integer_format().expect("integer format");
    assert_eq!(format.radix, IntegerRadix::Hexadecimal);
    assert!(format.uppercase);
    assert_eq!(format.spacing, Some(4));
    assert_eq!(value.to_string(), "0xDEAD_BEEF");
    Ok(())
}

#[test]
fn collect_all_diagnostics() {
    let err = TomlDocument::try_parse("a = \nb = 42\nb = 43\n[t]\n[t]\n")
        .expect_err("broken document should fail");
    let kinds: Vec<_> = err.diagnostics.iter().map(|d| &d.kind).collect();
    assert_eq!(kinds.len(), 3);
    assert!(matches!(kinds[0], TomlErrorKind::Expected(_)));
    assert!(matches!(kinds[1], TomlErrorKind::KeyConflict { .. }));
    assert!(matches!(kinds[2], TomlErrorKind::DuplicateTable { .. }));

    // The abort-on-first entry point surfaces only the first of these.
    let err = TomlDocument::parse("a = \nb = 42\nb = 43\n[t]\n[t]\n")
        .expect_err("broken document should fail");
    assert_eq!(err.diagnostics.len(), 1);
    assert!(matches!(err.first().kind, TomlErrorKind::Expected(_)));
}

#[test]
fn deep_nesting_fails_gracefully() {
    // Parse on a thread with an ample stack: the parser returns a
    // NestingTooDeep diagnostic rather than overflowing, but the recursion up
    // to the nesting bound exceeds the test harness's default ~2MB per-thread
    // stack (a normal 8MB main thread is unaffected).
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let mut source = String::from("a = ");
            for _ in 0..500 {
                source.push('[');
            }
            let err = TomlDocument::try_parse(&source).expect_err("deep nesting should fail");
            assert!(err
                .diagnostics
                .iter()
                .any(|d| matches!(d.kind, TomlErrorKind::NestingTooDeep)));
        })
        .expect("spawn test thread")
        .join()
        .expect("deep nesting test thread panicked");
}

#[test]
fn parallel_parses_are_independent() {
    let spec = TomlSpec::v1_1();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let spec = spec.clone();
            std::thread::spawn(move || {
                let source = format!("[worker]\nid = {i}\nstarted = 07:3{i}\n");
                let doc = TomlDocument::try_parse_with(&source, None, &spec)
                    .expect("worker document should parse");
                doc["worker"].as_table().unwrap()["id"].as_integer()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(i as i64));
    }
}
