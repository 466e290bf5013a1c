//! End-to-end pipeline tests: file on disk in, finished descriptors out.
//!
//! Covers the canonical table-schema document, multi-file merge semantics
//! (label uniqueness, source accumulation, documentation precedence and
//! fallback), and display formatting.

mod common;

use common::{store_with_mapping, store_with_notifier, write_schema};
use indoc::indoc;
use schema_completion_source::{FieldMapping, FormatSpec, SourceStore};

#[test]
fn canonical_document_yields_one_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_schema(
        &dir,
        "users.json",
        r#"{"type":"Users","fields":[{"column":"id","fieldType":{"type":"integer"}}]}"#,
    );

    let (store, notifier) = store_with_notifier(vec![path]);
    let batch = store.completions();

    assert!(batch.is_complete);
    assert_eq!(batch.items.len(), 1);
    let descriptor = &batch.items[0];
    assert_eq!(descriptor.label, "id");
    assert_eq!(descriptor.type_name, "integer");
    assert_eq!(descriptor.documentation, "`integer`");
    assert_eq!(descriptor.sources, vec!["Users"]);
    assert_eq!(descriptor.detail(), "Users");
    assert!(notifier.is_empty(), "clean load should not notify");
}

#[test]
fn shared_labels_merge_across_files_with_provenance() {
    let dir = tempfile::tempdir().unwrap();
    let users = write_schema(
        &dir,
        "users.json",
        r#"{"type":"Users","fields":[{"column":"id","fieldType":{"type":"integer"}}]}"#,
    );
    // No usable detail value: contributes the placeholder to sources.
    let untagged = write_schema(
        &dir,
        "untagged.json",
        r#"{"fields":[{"column":"id","fieldType":{"type":"integer"}}]}"#,
    );
    let orders = write_schema(
        &dir,
        "orders.json",
        r#"{"type":"Orders","fields":[{"column":"id","fieldType":{"type":"integer"}}]}"#,
    );

    let (store, _notifier) = store_with_notifier(vec![users, untagged, orders]);
    let descriptors = store.descriptors();

    assert_eq!(descriptors.len(), 1);
    assert_eq!(
        descriptors[0].sources,
        vec!["Users", "UnknownType", "Orders"]
    );
    assert_eq!(descriptors[0].detail(), "Users, UnknownType, Orders");
}

#[test]
fn one_descriptor_per_distinct_label_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let users = write_schema(
        &dir,
        "users.json",
        indoc! {r#"
            {
              "type": "Users",
              "fields": [
                {"column": "id", "fieldType": {"type": "integer"}},
                {"column": "email", "fieldType": {"type": "string"}}
              ]
            }
        "#},
    );
    let orders = write_schema(
        &dir,
        "orders.json",
        indoc! {r#"
            {
              "type": "Orders",
              "fields": [
                {"column": "id", "fieldType": {"type": "integer"}},
                {"column": "amount", "fieldType": {"type": "decimal"}}
              ]
            }
        "#},
    );

    let (store, _notifier) = store_with_notifier(vec![users, orders]);
    let descriptors = store.descriptors();

    let labels: Vec<_> = descriptors.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["amount", "email", "id"]);
    assert_eq!(descriptors[2].sources, vec!["Users", "Orders"]);
}

#[test]
fn documentation_comes_from_first_file_that_supplies_it() {
    let dir = tempfile::tempdir().unwrap();
    // First file defines the label but carries no options.
    let users = write_schema(
        &dir,
        "users.json",
        r#"{"type":"Users","fields":[{"column":"id","fieldType":{"type":"integer"}}]}"#,
    );
    let orders = write_schema(
        &dir,
        "orders.json",
        r#"{"type":"Orders","fields":[{"column":"id","fieldType":{"type":"uuid","options":"primary key"}}]}"#,
    );

    let (store, _notifier) = store_with_notifier(vec![users, orders]);
    let descriptors = store.descriptors();

    // Type comes from the first record, documentation from the first record
    // that actually had any.
    assert_eq!(descriptors[0].type_name, "integer");
    assert_eq!(descriptors[0].documentation, "`integer`\nprimary key");
}

#[test]
fn doc_arrays_are_joined_into_one_segment() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_schema(
        &dir,
        "orders.json",
        r#"{"type":"Orders","fields":[{"column":"status","fieldType":{"type":"enum","options":["open","closed"]}}]}"#,
    );

    let (store, _notifier) = store_with_notifier(vec![path]);
    let descriptors = store.descriptors();

    assert_eq!(descriptors[0].documentation, "`enum`\nopen, closed");
}

#[test]
fn fallback_doc_fills_in_when_no_file_has_documentation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_schema(
        &dir,
        "users.json",
        r#"{"type":"Users","fields":[{"column":"name","fieldType":{"type":"string"}}]}"#,
    );
    let mapping = FieldMapping {
        fallback_doc_field: "type".to_string(),
        ..FieldMapping::default()
    };

    let (store, _notifier) = store_with_mapping(vec![path], mapping);
    let descriptors = store.descriptors();

    // doc_field = "fieldType.options" resolved nothing, so the fallback path
    // "type" is looked up inside the entry's fieldType object.
    assert_eq!(descriptors[0].documentation, "`string`\nstring");
}

#[test]
fn fallback_is_not_used_once_any_file_documents_the_label() {
    let dir = tempfile::tempdir().unwrap();
    let users = write_schema(
        &dir,
        "users.json",
        r#"{"type":"Users","fields":[{"column":"name","fieldType":{"type":"string"}}]}"#,
    );
    let profiles = write_schema(
        &dir,
        "profiles.json",
        r#"{"type":"Profiles","fields":[{"column":"name","fieldType":{"type":"string","options":"display name"}}]}"#,
    );
    let mapping = FieldMapping {
        fallback_doc_field: "type".to_string(),
        ..FieldMapping::default()
    };

    let (store, _notifier) = store_with_mapping(vec![users, profiles], mapping);
    let descriptors = store.descriptors();

    assert_eq!(descriptors[0].documentation, "`string`\ndisplay name");
}

#[test]
fn custom_formats_apply_to_both_segments() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_schema(
        &dir,
        "users.json",
        r#"{"type":"Users","fields":[{"column":"email","fieldType":{"type":"string","options":"unique"}}]}"#,
    );
    let format = FormatSpec {
        type_format: "type: %s".to_string(),
        doc_format: "note: %s".to_string(),
    };

    let store = SourceStore::new(vec![path], FieldMapping::default(), format);
    let descriptors = store.descriptors();

    assert_eq!(descriptors[0].documentation, "type: string\nnote: unique");
}

#[test]
fn custom_mapping_reads_differently_shaped_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_schema(
        &dir,
        "frappe.json",
        indoc! {r#"
            {
              "name": "Task",
              "schema": [
                {"fieldname": "subject", "fieldtype": "Data", "description": "short summary"},
                {"fieldname": "status", "fieldtype": "Select"}
              ]
            }
        "#},
    );
    let mapping = FieldMapping {
        fields_container: "schema".to_string(),
        label_field: "fieldname".to_string(),
        type_field: "fieldtype".to_string(),
        doc_field: "description".to_string(),
        fallback_doc_field: String::new(),
        detail_field: "name".to_string(),
    };

    let (store, notifier) = store_with_mapping(vec![path], mapping);
    let descriptors = store.descriptors();

    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[1].label, "subject");
    assert_eq!(descriptors[1].documentation, "`Data`\nshort summary");
    assert_eq!(descriptors[0].label, "status");
    assert_eq!(descriptors[0].documentation, "`Select`");
    assert_eq!(descriptors[0].sources, vec!["Task"]);
    assert!(notifier.is_empty());
}

#[test]
fn entries_without_labels_are_skipped_but_file_still_contributes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_schema(
        &dir,
        "users.json",
        indoc! {r#"
            {
              "type": "Users",
              "fields": [
                {"fieldType": {"type": "integer"}},
                {"column": "email", "fieldType": {"type": "string"}}
              ]
            }
        "#},
    );

    let (store, notifier) = store_with_notifier(vec![path]);
    let descriptors = store.descriptors();

    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].label, "email");
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].1.contains("invalid field entry 0"));
}

#[test]
fn duplicate_labels_within_one_file_accumulate_sources() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_schema(
        &dir,
        "users.json",
        indoc! {r#"
            {
              "type": "Users",
              "fields": [
                {"column": "id", "fieldType": {"type": "integer"}},
                {"column": "id", "fieldType": {"type": "integer"}}
              ]
            }
        "#},
    );

    let (store, _notifier) = store_with_notifier(vec![path]);
    let descriptors = store.descriptors();

    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].sources, vec!["Users", "Users"]);
}
