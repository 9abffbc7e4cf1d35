//! Tests for snapshot documents

use crate::test_utils::{fixture_path, load_fixture};
use iterpat_validate::model::{
    ElementKind, IteratorOptions, Modifier, SnapshotDocument, SymbolSnapshot, TypeRef,
};
use iterpat_validate::{Marker, SymbolModel, ValidationError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_nested_members_keep_their_enclosure() {
    let snapshot = load_fixture("tree.yaml");
    let tree = snapshot.find("Tree").unwrap();
    let iterator = snapshot.find("TreeIterator").unwrap();

    assert_eq!(snapshot.enclosing_of(iterator).unwrap(), Some(tree));
    assert_eq!(snapshot.kind_of(iterator).unwrap(), ElementKind::Class);
    assert_eq!(
        snapshot.qualified_name(snapshot.find("currentNode").unwrap()).unwrap(),
        "Tree.TreeIterator.currentNode"
    );
    assert_eq!(snapshot.elements_tagged(Marker::IteratorFactory).len(), 2);
    assert_eq!(
        snapshot.tag_payload(tree, Marker::IterableAggregate).unwrap(),
        Some(&TypeRef::declared("TreeIterator"))
    );
    assert_eq!(snapshot.element_of_type(&TypeRef::declared("TreeIterator")), Some(iterator));
}

#[test]
fn test_iterator_options_and_modifiers() {
    let snapshot = SymbolSnapshot::from_yaml_str(
        r"
elements:
  - name: Strict
    kind: class
    tags:
      - iterator: { item: long, treat_warnings_as_errors: true }
    members:
      - name: next
        kind: method
        modifiers: [private, final]
        return_type: long
        parameters:
          - { name: step, type: int }
",
    )
    .unwrap();

    let strict = snapshot.find("Strict").unwrap();
    let next = snapshot.find("next").unwrap();
    assert_eq!(
        snapshot.iterator_options(strict).unwrap(),
        Some(IteratorOptions {
            treat_warnings_as_errors: true
        })
    );
    assert_eq!(snapshot.iterator_options(next).unwrap(), None);
    assert_eq!(
        snapshot.modifiers_of(next).unwrap(),
        &[Modifier::Private, Modifier::Final]
    );
    assert_eq!(snapshot.parameter_count_of(next).unwrap(), 1);
    assert_eq!(snapshot.return_type_of(next).unwrap(), &TypeRef::parse("long"));
}

#[test]
fn test_tags_with_payload_use_map_form() {
    let yaml = SymbolSnapshot::from_yaml_str(
        r"
elements:
  - name: R
    kind: class
    tags:
      - iterator: { item: int }
  - name: Bag
    kind: class
    tags:
      - iterable_aggregate:
          iterator: R
    members:
      - name: iterator
        kind: method
        return_type: R
        tags: [iterator_factory]
",
    )
    .unwrap();
    let json = SymbolSnapshot::from_json_str(
        r#"{
  "elements": [
    { "name": "R", "kind": "class", "tags": [{ "iterator": { "item": "int" } }] },
    {
      "name": "Bag",
      "kind": "class",
      "tags": [{ "iterable_aggregate": { "iterator": "R" } }],
      "members": [
        { "name": "iterator", "kind": "method", "return_type": "R", "tags": ["iterator_factory"] }
      ]
    }
  ]
}"#,
    )
    .unwrap();

    for snapshot in [&yaml, &json] {
        let r = snapshot.find("R").unwrap();
        let bag = snapshot.find("Bag").unwrap();
        assert_eq!(
            snapshot.tag_payload(r, Marker::Iterator).unwrap(),
            Some(&TypeRef::parse("int"))
        );
        assert_eq!(
            snapshot.tag_payload(bag, Marker::IterableAggregate).unwrap(),
            Some(&TypeRef::declared("R"))
        );
        assert_eq!(snapshot.elements_tagged(Marker::IteratorFactory).len(), 1);
    }
}

#[test]
fn test_method_return_type_defaults_to_void() {
    let snapshot = load_fixture("student_collection.yaml");
    let add = snapshot.find("addStudent").unwrap();
    assert_eq!(snapshot.return_type_of(add).unwrap(), &TypeRef::void());
}

#[test]
fn test_library_types_take_part_in_assignability() {
    let snapshot = load_fixture("student_collection.yaml");
    let iterator = TypeRef::declared("Iterator");
    let concrete = TypeRef::declared("StudentCollectionIterator");

    assert!(snapshot.is_assignable(&concrete, &iterator));
    assert!(!snapshot.is_assignable(&iterator, &concrete));
    assert_eq!(snapshot.element_of_type(&iterator), None);
}

#[test]
fn test_json_chosen_by_extension() {
    let snapshot = SymbolSnapshot::load(fixture_path("factory_return_mismatch.json")).unwrap();
    assert!(snapshot.find("BagIterator").is_some());
    assert_eq!(snapshot.roots().len(), 2);
}

#[test]
fn test_invalid_documents_are_rejected() {
    let unknown_kind = SymbolSnapshot::from_yaml_str("elements:\n  - name: X\n    kind: record\n");
    assert!(matches!(unknown_kind, Err(ValidationError::Yaml(_))));

    let bad_json = SymbolSnapshot::from_json_str("{ \"elements\": [ }");
    assert!(matches!(bad_json, Err(ValidationError::Json(_))));

    let class_with_return = SymbolSnapshot::from_yaml_str(
        "elements:\n  - name: X\n    kind: class\n    return_type: int\n",
    );
    assert!(matches!(class_with_return, Err(ValidationError::Snapshot(_))));

    let duplicate = SymbolSnapshot::from_yaml_str(
        "elements:\n  - name: X\n    kind: class\n  - name: X\n    kind: interface\n",
    );
    assert!(matches!(duplicate, Err(ValidationError::Snapshot(_))));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let result = SymbolSnapshot::load(temp.path().join("absent.yaml"));
    assert!(matches!(result, Err(ValidationError::Io(_))));
}

#[test]
fn test_document_round_trips_through_a_file() {
    let temp = TempDir::new().unwrap();
    let document = SnapshotDocument::load(fixture_path("range_generator.yaml")).unwrap();
    let path = temp.path().join("copy.json");
    fs::write(&path, serde_json::to_string(&document).unwrap()).unwrap();

    let snapshot = SymbolSnapshot::load(&path).unwrap();
    assert_eq!(snapshot.len(), 6);
    assert_eq!(snapshot.elements_tagged(Marker::Iterator).len(), 1);
}
