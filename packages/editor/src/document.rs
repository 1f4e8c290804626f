//! # Document Handle
//!
//! A Document is one persisted form: the block trees of each zone plus the
//! value bag the field blocks edit. Documents can be:
//! - **Memory-backed**: Temporary, for testing or in-memory operations
//! - **File-backed**: Single-user editing with disk persistence
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Deserialize → Edit → Save
//!   ↓         ↓          ↓      ↓
//! File   FormContent Mutations File
//! ```
//!
//! On disk a document is JSON:
//!
//! ```json
//! {
//!   "sections": { "main": [ { "key": "text", "type": "text", ... } ] },
//!   "values": { "name": "Ada" }
//! }
//! ```

use crate::{EditorError, Mutation, MutationResult};
use formwork_blocks::{get_value, BlockTree, BlockTypeRegistry, TreeResult, ValueBag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Zone created for new documents
pub const DEFAULT_ZONE: &str = "main";

/// Everything a form persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormContent {
    /// Block tree per zone
    #[serde(default = "default_sections")]
    pub sections: BTreeMap<String, BlockTree>,

    #[serde(default = "empty_bag")]
    pub values: ValueBag,
}

fn default_sections() -> BTreeMap<String, BlockTree> {
    BTreeMap::from([(DEFAULT_ZONE.to_string(), BlockTree::new())])
}

fn empty_bag() -> ValueBag {
    Value::Object(Map::new())
}

impl Default for FormContent {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            values: empty_bag(),
        }
    }
}

impl FormContent {
    pub fn section(&self, zone: &str) -> Option<&BlockTree> {
        self.sections.get(zone)
    }

    pub fn section_mut(&mut self, zone: &str) -> Option<&mut BlockTree> {
        self.sections.get_mut(zone)
    }

    pub fn zones(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Field keys bound by blocks in every zone
    pub fn field_keys(&self) -> Vec<String> {
        self.sections.values().flat_map(BlockTree::field_keys).collect()
    }

    /// Top-level value entries no field key reaches.
    ///
    /// Removing a block keeps its data; this lists what such removals left
    /// behind.
    pub fn orphaned_values(&self) -> Vec<String> {
        let Value::Object(map) = &self.values else {
            return Vec::new();
        };

        let roots: Vec<String> = self
            .field_keys()
            .iter()
            .filter_map(|key| key.split('.').next())
            .map(|root| root.strip_suffix("[]").unwrap_or(root).to_string())
            .collect();

        map.keys()
            .filter(|name| !roots.contains(name))
            .cloned()
            .collect()
    }

    /// Settle container status in every zone against `registry`
    pub fn conform(&mut self, registry: &BlockTypeRegistry) -> TreeResult<()> {
        self.sections.values_mut().try_for_each(|tree| tree.conform(registry))
    }

    /// Current value for a field block's key
    pub fn field_value(&self, field_key: &str) -> Option<&Value> {
        get_value(&self.values, field_key)
    }
}

/// Editable form document
#[derive(Debug)]
pub struct Document {
    /// Path to the JSON file (if any)
    pub path: PathBuf,

    /// Current version number (increments on each applied mutation)
    pub version: u64,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only (for testing, temp docs)
    Memory { content: FormContent },

    /// File-backed (single-user editing)
    File { content: FormContent, dirty: bool },
}

impl Document {
    /// Create a memory-backed document
    pub fn new(path: impl Into<PathBuf>, content: FormContent) -> Self {
        Self {
            path: path.into(),
            version: 0,
            storage: DocumentStorage::Memory { content },
        }
    }

    /// Create a memory-backed document from JSON text
    pub fn from_json(path: impl Into<PathBuf>, source: &str) -> Result<Self, EditorError> {
        let content = serde_json::from_str(source)?;
        Ok(Self::new(path, content))
    }

    /// Load document from file (file-backed)
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let path = path.into();
        let source = std::fs::read_to_string(&path)?;
        let content: FormContent = serde_json::from_str(&source)?;

        debug!(path = %path.display(), zones = content.sections.len(), "Loaded document");

        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::File { content, dirty: false },
        })
    }

    /// Start a new file-backed document; nothing is written until `save`
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: 0,
            storage: DocumentStorage::File {
                content: FormContent::default(),
                dirty: true,
            },
        }
    }

    pub fn content(&self) -> &FormContent {
        match &self.storage {
            DocumentStorage::Memory { content } => content,
            DocumentStorage::File { content, .. } => content,
        }
    }

    /// Mutable content reference (marks file-backed documents dirty)
    pub fn content_mut(&mut self) -> &mut FormContent {
        match &mut self.storage {
            DocumentStorage::Memory { content } => content,
            DocumentStorage::File { content, dirty } => {
                *dirty = true;
                content
            }
        }
    }

    /// Settle container status against the block catalog.
    ///
    /// Decoding cannot tell containers from leaves on its own; this must run
    /// before structural edits that depend on it. The saved form is unchanged
    /// unless a container had no child list, so the dirty flag is left alone.
    pub fn conform(&mut self, registry: &BlockTypeRegistry) -> Result<(), EditorError> {
        let content = match &mut self.storage {
            DocumentStorage::Memory { content } => content,
            DocumentStorage::File { content, .. } => content,
        };
        content.conform(registry)?;
        Ok(())
    }

    /// Swap in a whole new content, returning the old one
    pub fn replace_content(&mut self, content: FormContent) -> FormContent {
        self.version += 1;
        std::mem::replace(self.content_mut(), content)
    }

    /// Apply a mutation.
    ///
    /// The version only moves when the mutation succeeds; a failed mutation
    /// leaves the content as it was.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        let effect = match &mut self.storage {
            DocumentStorage::Memory { content } => mutation.apply(content)?,
            DocumentStorage::File { content, dirty } => {
                let effect = mutation.apply(content)?;
                if effect.is_change() {
                    *dirty = true;
                }
                effect
            }
        };

        self.version += 1;

        Ok(MutationResult {
            version: self.version,
            effect,
        })
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            _ => false,
        }
    }

    pub fn is_file_backed(&self) -> bool {
        matches!(self.storage, DocumentStorage::File { .. })
    }

    /// Save document to disk (if file-backed)
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&mut self) -> Result<(), EditorError> {
        let source = self.to_json()?;
        match &mut self.storage {
            DocumentStorage::File { dirty, .. } => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&self.path, source)?;
                *dirty = false;
                info!(path = %self.path.display(), version = self.version, "Saved document");
                Ok(())
            }
            _ => Err(EditorError::NotFileBacked),
        }
    }

    /// Pretty JSON for the whole document
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self.content())?)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_blocks::{BlockNode, TreeError};
    use serde_json::json;

    const SOURCE: &str = r#"{
        "sections": {
            "main": [
                { "key": "name", "type": "text", "fieldKey": "person.name", "properties": {} }
            ]
        },
        "values": { "person": { "name": "Ada" }, "legacy": 1 }
    }"#;

    #[test]
    fn test_create_memory_document() {
        let doc = Document::from_json("form.json", SOURCE).unwrap();

        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert!(!doc.is_file_backed());
        assert_eq!(doc.content().section("main").unwrap().len(), 1);
        assert_eq!(doc.content().field_value("person.name"), Some(&json!("Ada")));
    }

    #[test]
    fn test_missing_parts_use_defaults() {
        let doc = Document::from_json("form.json", "{}").unwrap();

        assert_eq!(doc.content(), &FormContent::default());
        assert!(doc.content().section(DEFAULT_ZONE).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_children_rejected_on_conform() {
        let source = r#"{ "sections": { "main": [
            { "key": "s", "type": "stack", "properties": { "children": 5 } }
        ] } }"#;

        let mut doc = Document::from_json("form.json", source).unwrap();
        assert!(matches!(
            doc.conform(&BlockTypeRegistry::builtin()),
            Err(EditorError::Tree(TreeError::MalformedChildren { ref key, found: "number" })) if key == "s"
        ));
    }

    #[test]
    fn test_leaf_with_children_property_loads() {
        let source = r#"{ "sections": { "main": [
            { "key": "note", "type": "text", "properties": { "children": "see below" } }
        ] } }"#;

        let mut doc = Document::from_json("form.json", source).unwrap();
        doc.conform(&BlockTypeRegistry::builtin()).unwrap();

        let note = doc.content().section("main").unwrap().find("note").unwrap();
        assert!(!note.is_container());
        assert_eq!(note.str_property("children"), Some("see below"));
    }

    #[test]
    fn test_document_version_increments_on_success_only() {
        let mut doc = Document::from_json("form.json", SOURCE).unwrap();

        let bad = Mutation::SetProperty {
            zone: "main".to_string(),
            key_path: "ghost".to_string(),
            property: "label".to_string(),
            value: json!("x"),
        };
        assert!(doc.apply(&bad).is_err());
        assert_eq!(doc.version, 0);

        let good = Mutation::InsertBlock {
            target: "main".to_string(),
            block: BlockNode::new("name", "text"),
        };
        let result = doc.apply(&good).unwrap();
        assert_eq!(result.version, 1);
        assert!(doc.content().section("main").unwrap().contains("name_1"));
    }

    #[test]
    fn test_orphaned_values() {
        let doc = Document::from_json("form.json", SOURCE).unwrap();
        assert_eq!(doc.content().orphaned_values(), vec!["legacy".to_string()]);
    }

    #[test]
    fn test_append_field_key_is_not_orphaned() {
        let mut content = FormContent::default();
        content
            .section_mut(DEFAULT_ZONE)
            .unwrap()
            .blocks_mut()
            .push(BlockNode::new("tags", "text").with_field_key("tags[]"));
        content.values = json!({ "tags": ["a", "b"], "stale": 1 });

        assert_eq!(content.orphaned_values(), vec!["stale".to_string()]);
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let mut doc = Document::new("form.json", FormContent::default());
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }
}
