//! Whole-document round-trips over realistic configuration files.

use miette::Result;
use pretty_assertions::assert_eq;

use tomled::TomlDocument;

#[test]
fn classic_example() -> Result<()> {
    let src = "\
# This is a TOML document
title = \"TOML Example\"

[owner]
name = \"Tom Preston-Werner\"
dob = 1979-05-27T07:32:00-08:00

[database]
enabled = true
ports = [8000, 8001, 8002]
data = [[\"delta\", \"phi\"], [3.14]]
temp_targets = { cpu = 79.5, case = 72.0 }

[servers]

[servers.alpha]
ip = \"10.0.0.1\"
role = \"frontend\"

[servers.beta]
ip = \"10.0.0.2\"
role = \"backend\"
";
    let doc: TomlDocument = src.parse()?;
    assert_eq!(doc.to_string(), src);

    let owner = doc["owner"].as_table().unwrap();
    assert!(owner["dob"].is_offset_date_time());
    let database = doc["database"].as_table().unwrap();
    assert_eq!(database["enabled"].as_boolean(), Some(true));
    assert_eq!(
        database["temp_targets"].as_table().unwrap()["cpu"].as_float(),
        Some(79.5)
    );
    assert_eq!(
        doc["servers"].as_table().unwrap()["alpha"]
            .as_table()
            .unwrap()["ip"]
            .as_string(),
        Some("10.0.0.1")
    );
    Ok(())
}

#[test]
fn cargo_manifest() -> Result<()> {
    let src = "\
[package]
name = \"tomled\"
version = \"0.1.0\"
edition = \"2021\"
rust-version = \"1.70.0\"

[dependencies]
miette = \"7.2.0\"
thiserror = \"1.0.40\"
winnow = { version = \"0.6.20\", features = [\"alloc\"] }

[dev-dependencies]
miette = { version = \"7.2.0\", features = [\"fancy\"] }

[[bin]]
name = \"toml-fmt\"
path = \"src/bin/fmt.rs\"
";
    let doc: TomlDocument = src.parse()?;
    assert_eq!(doc.to_string(), src);

    let winnow = doc["dependencies"].as_table().unwrap()["winnow"]
        .as_table()
        .unwrap();
    assert_eq!(winnow["version"].as_string(), Some("0.6.20"));
    assert_eq!(doc["bin"].as_array().unwrap().len(), 1);
    Ok(())
}

#[test]
fn commented_multiline_layout() -> Result<()> {
    let src = "\
# Database settings
[database]
ports = [
    8000, # primary
    8001,
    8002,
]
connection_max = 5000 # tuned 2025-03
";
    let doc: TomlDocument = src.parse()?;
    assert_eq!(doc.to_string(), src);

    let database = doc["database"].as_table().unwrap();
    let ports = database["ports"].as_array().unwrap();
    assert_eq!(ports.get(0).unwrap().trailing_comment(), Some("# primary"));
    assert_eq!(
        database["connection_max"].trailing_comment(),
        Some("# tuned 2025-03")
    );
    Ok(())
}

#[test]
fn dotted_keys_and_quoted_keys() -> Result<()> {
    let src = "\
site.\"google.com\" = true
physical.color = \"orange\"
physical.shape = \"round\"

[servers]
\"127.0.0.1\" = \"local\"
";
    let doc: TomlDocument = src.parse()?;
    assert_eq!(doc.to_string(), src);

    let site = doc["site"].as_table().unwrap();
    assert_eq!(site["google.com"].as_boolean(), Some(true));
    Ok(())
}

#[test]
fn array_of_tables_round_trip() -> Result<()> {
    let src = "\
[[products]]
name = \"Hammer\"
sku = 738594937

# no name, no sku
[[products]]

[[products]]
name = \"Nail\"
sku = 284758393
color = \"gray\"
";
    let doc: TomlDocument = src.parse()?;
    assert_eq!(doc.to_string(), src);

    let products = doc["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert!(products.get(1).unwrap().as_table().unwrap().is_empty());
    assert_eq!(
        products.get(1).unwrap().comments(),
        ["# no name, no sku".to_string()]
    );
    Ok(())
}

#[test]
fn document_trailing_comments_survive() -> Result<()> {
    let src = "a = 1\n# reviewed 2025-06-01\n# vim: set ft=toml:\n";
    let doc: TomlDocument = src.parse()?;
    assert_eq!(
        doc.trailing_comments(),
        [
            "# reviewed 2025-06-01".to_string(),
            "# vim: set ft=toml:".to_string()
        ]
    );
    assert_eq!(doc.to_string(), src);
    Ok(())
}
