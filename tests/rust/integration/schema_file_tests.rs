use std::io::Write;

use surql_translate::query_builder::{Expr, Query};
use surql_translate::schema_catalog::{SchemaConfig, SchemaError};
use surql_translate::translator::translate;
use tempfile::NamedTempFile;

const BLOG_SCHEMA: &str = r#"
tables:
  - name: article
    fields:
      - property: Id
        column: id
      - property: Headline
        column: headline
      - property: Body
      - property: Author
        record: author
      - property: DraftNotes
        readable: false
  - name: author
    fields:
      - property: Id
        column: id
      - property: DisplayName
        column: display_name
"#;

fn load(yaml: &str) -> Result<surql_translate::SchemaCatalog, SchemaError> {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(yaml.as_bytes()).expect("schema written");
    SchemaConfig::from_yaml_file(file.path()).and_then(|config| config.to_catalog())
}

#[test]
fn test_whole_record_from_yaml_schema() {
    let catalog = load(BLOG_SCHEMA).unwrap();
    let translation = translate(&Query::from_table("article"), &catalog).unwrap();
    assert_eq!(
        translation.query,
        "SELECT Author, Body, headline AS Headline, id AS Id FROM article"
    );
}

#[test]
fn test_nested_record_from_yaml_schema() {
    let catalog = load(BLOG_SCHEMA).unwrap();
    let query = Query::from_table("article")
        .filter(|a| a.clone().member("Author").member("DisplayName").eq(Expr::var("name", "Ada")))
        .select(|a| a.member("Headline"));
    let translation = translate(&query, &catalog).unwrap();
    assert_eq!(
        translation.query,
        "SELECT VALUE headline FROM article WHERE Author.display_name == $name"
    );
}

#[test]
fn test_mixed_case_fields_are_sorted_alphabetically() {
    let yaml = r#"
tables:
  - name: t
    fields:
      - property: name
      - property: Title
      - property: age
"#;
    let catalog = load(yaml).unwrap();
    let translation = translate(&Query::from_table("t"), &catalog).unwrap();
    assert_eq!(translation.query, "SELECT age, name, Title FROM t");
}

#[test]
fn test_unreadable_field_cannot_be_projected() {
    let catalog = load(BLOG_SCHEMA).unwrap();
    let query = Query::from_table("article").select(|a| a.member("DraftNotes"));
    assert!(translate(&query, &catalog).is_err());
}

#[test]
fn test_unknown_nested_record_table_is_rejected() {
    let yaml = r#"
tables:
  - name: article
    fields:
      - property: Author
        record: writer
"#;
    assert!(load(yaml).is_err());
}

#[test]
fn test_malformed_yaml_is_rejected() {
    assert!(load("tables: [name: 12").is_err());
}
