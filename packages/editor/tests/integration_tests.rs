//! Integration tests for editor crate

use formwork_blocks::BlockTypeRegistry;
use formwork_editor::{Document, EditSession, EditorError, Effect, Mutation, DEFAULT_ZONE};
use serde_json::json;

#[test]
fn test_document_lifecycle() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("forms").join("signup.json");

    let mut doc = Document::create(&path);
    assert!(doc.is_file_backed());
    assert!(doc.is_dirty());

    doc.apply(&Mutation::InsertBlock {
        target: DEFAULT_ZONE.to_string(),
        block: BlockTypeRegistry::builtin().describe("text").unwrap().create_block(),
    })?;
    doc.apply(&Mutation::SetValue {
        path: "person.name".to_string(),
        value: json!("Ada"),
    })?;
    doc.save()?;
    assert!(!doc.is_dirty());

    let reloaded = Document::load(&path)?;
    assert_eq!(reloaded.version, 0);
    assert_eq!(reloaded.content(), doc.content());
    assert_eq!(reloaded.content().field_value("person.name"), Some(&json!("Ada")));
    Ok(())
}

#[test]
fn test_saved_json_shape() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("form.json");

    let mut session = EditSession::new(Document::create(&path), BlockTypeRegistry::builtin())?;
    session.add_block("stack", "main")?;
    session.add_block("button", "main.stack")?;
    session.document.save()?;

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let stack = &saved["sections"]["main"][0];
    assert_eq!(stack["key"], "stack");
    assert_eq!(stack["type"], "stack");
    assert_eq!(stack["fieldKey"], "");
    assert_eq!(stack["properties"]["direction"], "vertical");
    assert_eq!(stack["properties"]["children"][0]["key"], "button");
    assert_eq!(stack["properties"]["children"][0]["properties"]["text"], "Button");
    Ok(())
}

#[test]
fn test_unchanged_mutation_keeps_document_clean() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("form.json");
    std::fs::write(&path, r#"{ "sections": { "main": [] }, "values": {} }"#)?;

    let mut doc = Document::load(&path)?;
    let result = doc.apply(&Mutation::RemoveBlock {
        zone: "main".to_string(),
        key_path: "ghost".to_string(),
    })?;

    assert_eq!(result.effect, Effect::Unchanged);
    assert!(!doc.is_dirty());
    Ok(())
}

#[test]
fn test_session_rejects_malformed_children() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{ "sections": { "main": [
            { "key": "s", "type": "stack", "fieldKey": "", "properties": { "children": { "a": 1 } } }
        ] } }"#,
    )?;

    let doc = Document::load(&path)?;
    let err = EditSession::new(doc, BlockTypeRegistry::builtin()).err().unwrap();
    assert!(matches!(err, EditorError::Tree(_)));
    assert!(err.to_string().contains("non-sequence child list"));
    Ok(())
}

#[test]
fn test_leaf_children_property_survives_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("form.json");
    std::fs::write(
        &path,
        r#"{ "sections": { "main": [
            { "key": "note", "type": "text", "fieldKey": "", "properties": { "children": [] } }
        ] } }"#,
    )?;

    let mut session = EditSession::new(Document::load(&path)?, BlockTypeRegistry::builtin())?;
    assert!(!session.block("main", "note").unwrap().is_container());

    session.drag_start("button")?;
    let result = session.drag_end(Some("main.note"))?.unwrap();
    assert!(matches!(result.effect, Effect::Dropped(_)));

    session.document.save()?;
    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(saved["sections"]["main"][0]["properties"]["children"], json!([]));
    Ok(())
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Document::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, EditorError::Io(_)));
}

#[test]
fn test_mutation_serialization() {
    let mutation = Mutation::UpdateBlock {
        zone: "main".to_string(),
        key_path: "stack.text".to_string(),
        field_key: Some("person.name".to_string()),
        properties: serde_json::from_value(json!({ "label": "Name" })).unwrap(),
    };

    let json = serde_json::to_string(&mutation).unwrap();
    let deserialized: Mutation = serde_json::from_str(&json).unwrap();
    assert_eq!(mutation, deserialized);

    let from_wire: Mutation = serde_json::from_value(json!({
        "op": "RemoveBlock",
        "zone": "main",
        "keyPath": "stack"
    }))
    .unwrap();
    assert_eq!(
        from_wire,
        Mutation::RemoveBlock {
            zone: "main".to_string(),
            key_path: "stack".to_string()
        }
    );
}

