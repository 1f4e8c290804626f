//! Tests for longer edit sequences
//!
//! This tests:
//! - Insert + edit + remove chains
//! - Undo/redo sequences
//! - Batched mutations
//! - Document integrity after operations

use formwork_blocks::{BlockTypeRegistry, ValueType};
use formwork_editor::{Document, EditSession, FormContent, Mutation, UndoStack};
use serde_json::json;

fn session() -> EditSession {
    EditSession::new(
        Document::new("form.json", FormContent::default()),
        BlockTypeRegistry::builtin(),
    )
    .unwrap()
}

fn main_paths(session: &EditSession) -> Vec<String> {
    session.document.content().section("main").unwrap().key_paths()
}

#[test]
fn test_build_then_delete_sequence() {
    let mut session = session();

    session.add_block("stack", "main").unwrap();
    session.add_block("text", "main.stack").unwrap();
    session.add_block("text", "main.stack").unwrap();
    assert_eq!(main_paths(&session), vec!["stack", "stack.text", "stack.text_1"]);

    // removing the container takes its children with it
    session
        .apply(&Mutation::RemoveBlock {
            zone: "main".to_string(),
            key_path: "stack".to_string(),
        })
        .unwrap();
    assert!(main_paths(&session).is_empty());

    // undo restores the whole subtree
    assert!(session.undo());
    assert_eq!(main_paths(&session), vec!["stack", "stack.text", "stack.text_1"]);
}

#[test]
fn test_undo_redo_walks_history() {
    let mut session = session();

    session.add_block("text", "main").unwrap();
    session.add_block("select", "main").unwrap();
    session.add_block("button", "main").unwrap();

    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(main_paths(&session), vec!["text"]);

    assert!(session.redo());
    assert_eq!(main_paths(&session), vec!["text", "select"]);

    // a new edit discards the remaining redo step
    session.add_block("textarea", "main").unwrap();
    assert!(!session.redo());
    assert_eq!(main_paths(&session), vec!["text", "select", "textarea"]);
}

#[test]
fn test_undo_restores_values() {
    let mut session = session();

    session
        .apply(&Mutation::SetValue {
            path: "person.name".to_string(),
            value: json!("Ada"),
        })
        .unwrap();
    session
        .apply(&Mutation::SetValue {
            path: "person.name".to_string(),
            value: json!("Grace"),
        })
        .unwrap();

    session.undo();
    assert_eq!(session.document.content().field_value("person.name"), Some(&json!("Ada")));
    session.undo();
    assert_eq!(session.document.content().field_value("person.name"), None);
}

#[test]
fn test_dropped_insert_is_not_an_undo_step() {
    let mut session = session();

    session.add_block("text", "main").unwrap();
    session.drag_start("button").unwrap();
    session.drag_end(Some("main.text")).unwrap();

    assert_eq!(session.history().undo_levels(), 1);
    assert_eq!(main_paths(&session), vec!["text"]);
}

#[test]
fn test_batch_with_failure_keeps_applied_part() {
    let mut session = session();

    let result = session.apply_batch(
        "Add and label",
        &[
            Mutation::InsertBlock {
                target: "main".to_string(),
                block: BlockTypeRegistry::builtin().describe("text").unwrap().create_block(),
            },
            Mutation::SetProperty {
                zone: "main".to_string(),
                key_path: "missing".to_string(),
                property: "label".to_string(),
                value: json!("x"),
            },
        ],
    );

    assert!(result.is_err());
    assert_eq!(main_paths(&session), vec!["text"]);
    assert_eq!(session.history().undo_levels(), 1);
    assert_eq!(session.history().undo_description(), Some("Add and label"));

    session.undo();
    assert!(main_paths(&session).is_empty());
}

#[test]
fn test_history_limit() {
    let mut session = session().with_history(UndoStack::with_max_levels(3));

    for _ in 0..5 {
        session.add_block("text", "main").unwrap();
    }
    while session.undo() {}

    assert_eq!(main_paths(&session), vec!["text", "text_1"]);
}

#[test]
fn test_extended_registry_blocks_are_placeable() {
    let registry = BlockTypeRegistry::builtin()
        .with_group(formwork_blocks::BlockGroup::new(
            "custom",
            "Custom",
            vec![formwork_blocks::BlockTypeDescriptor::new("rating", "Rating", "Star rating").with_property(
                formwork_blocks::PropertySpec::new("max", ValueType::Number, json!(5)),
            )],
        ))
        .unwrap();
    let mut session = EditSession::new(Document::new("form.json", FormContent::default()), registry).unwrap();

    session.drag_start("rating").unwrap();
    session.drag_end(Some("main")).unwrap();

    let rating = session.block("main", "rating").unwrap();
    assert_eq!(rating.property("max"), Some(&json!(5)));

    let (form, _) = session.edit_form("main", "rating").unwrap();
    let max = &form.children().unwrap()[1];
    assert_eq!(max.block_type, "text");
    assert_eq!(max.str_property("type"), Some("number"));
}
