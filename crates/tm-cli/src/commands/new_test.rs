use super::*;
use tm_core::MigrationDefinition;

#[test]
fn test_slugify() {
    assert_eq!(slugify("Add users table"), "add_users_table");
    assert_eq!(slugify("  drop--legacy  ORDERS! "), "drop_legacy_orders");
    assert_eq!(slugify("v2 index"), "v2_index");
    assert_eq!(slugify("!!!"), "");
}

#[test]
fn test_next_version() {
    assert_eq!(next_version(None).unwrap(), 1);
    assert_eq!(next_version(Some(0)).unwrap(), 1);
    assert_eq!(next_version(Some(41)).unwrap(), 42);
}

#[test]
fn test_next_version_after_max_is_error() {
    let err = next_version(Some(i64::MAX)).unwrap_err();
    assert!(err.to_string().contains(&i64::MAX.to_string()));
}

#[test]
fn test_file_name_is_zero_padded() {
    assert_eq!(file_name(3, "add_users"), "0003_add_users.yml");
    assert_eq!(file_name(12345, "big"), "12345_big.yml");
}

#[test]
fn test_template_parses_as_migration() {
    let content = template(7, r#"say "hi" \ bye"#);
    let def = MigrationDefinition::from_yaml_str(&content, "template").unwrap();

    assert_eq!(def.version, 7);
    assert_eq!(def.description, r#"say "hi" \ bye"#);
    assert!(def.up_statements.is_empty());
    assert!(def.down_statements.is_empty());
}
