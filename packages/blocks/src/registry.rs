//! # Block Type Registry
//!
//! Catalog of the block types an editor can place, grouped by category for
//! presentation. Lookup by id is the only structural use.
//!
//! Unknown ids are expected (legacy documents, removed extensions) and are
//! never an error: `describe` returns `None` and `resolve` hands back the
//! fallback descriptor so callers always have something to render.

use crate::descriptor::{BlockTypeDescriptor, PropertySpec, ValueType};
use crate::error::{TreeError, TreeResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

/// Id of the descriptor returned for unknown block types
pub const FALLBACK_BLOCK_TYPE: &str = "fallback";

/// A titled category of block types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGroup {
    pub id: String,
    pub title: String,
    pub blocks: Vec<BlockTypeDescriptor>,
}

impl BlockGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>, blocks: Vec<BlockTypeDescriptor>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks,
        }
    }
}

/// Immutable lookup table from block type id to descriptor
#[derive(Debug, Clone)]
pub struct BlockTypeRegistry {
    groups: Vec<BlockGroup>,
    /// id -> (group index, block index)
    index: HashMap<String, (usize, usize)>,
    fallback: BlockTypeDescriptor,
}

impl BlockTypeRegistry {
    /// Empty registry (only the fallback resolves)
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
            fallback: BlockTypeDescriptor {
                requires_field_key: false,
                ..BlockTypeDescriptor::new(FALLBACK_BLOCK_TYPE, "Fallback", "A fallback block")
            },
        }
    }

    /// Registry with the standard layout, button and input blocks
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for group in builtin_groups() {
            registry.push_group(group);
        }
        registry
    }

    /// Add a group at construction time. Ids must be unique across groups.
    pub fn with_group(mut self, group: BlockGroup) -> TreeResult<Self> {
        self.add_group(group)?;
        Ok(self)
    }

    fn add_group(&mut self, group: BlockGroup) -> TreeResult<()> {
        self.check_ids(&group)?;
        self.push_group(group);
        Ok(())
    }

    fn check_ids(&self, group: &BlockGroup) -> TreeResult<()> {
        let mut seen = Vec::with_capacity(group.blocks.len());
        for block in &group.blocks {
            if self.index.contains_key(&block.id)
                || block.id == FALLBACK_BLOCK_TYPE
                || seen.contains(&block.id.as_str())
            {
                return Err(TreeError::DuplicateBlockType(block.id.clone()));
            }
            seen.push(block.id.as_str());
        }
        Ok(())
    }

    fn push_group(&mut self, group: BlockGroup) {
        let group_idx = self.groups.len();
        for (block_idx, block) in group.blocks.iter().enumerate() {
            self.index.insert(block.id.clone(), (group_idx, block_idx));
        }
        debug!(group = %group.id, blocks = group.blocks.len(), "Registered block group");
        self.groups.push(group);
    }

    /// Look up a descriptor; `None` for unknown ids
    pub fn describe(&self, type_id: &str) -> Option<&BlockTypeDescriptor> {
        self.index
            .get(type_id)
            .map(|&(group, block)| &self.groups[group].blocks[block])
    }

    /// Look up a descriptor, falling back for unknown ids
    pub fn resolve(&self, type_id: &str) -> &BlockTypeDescriptor {
        self.describe(type_id).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &BlockTypeDescriptor {
        &self.fallback
    }

    pub fn is_known(&self, type_id: &str) -> bool {
        self.index.contains_key(type_id)
    }

    /// Descriptors grouped by category, in registration order
    pub fn list(&self) -> &[BlockGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for BlockTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn size_property() -> PropertySpec {
    PropertySpec::new("size", ValueType::String, json!("medium")).with_enum(&["small", "medium", "large"])
}

fn builtin_groups() -> Vec<BlockGroup> {
    let stack = BlockTypeDescriptor::new("stack", "Stack", "A stack of blocks. Can be horizontal or vertical.")
        .with_property(
            PropertySpec::new("direction", ValueType::String, json!("vertical"))
                .with_enum(&["vertical", "horizontal"]),
        )
        .container();

    let button = BlockTypeDescriptor::new("button", "Button", "A button")
        .with_property(PropertySpec::new("text", ValueType::String, json!("Button")))
        .with_property(
            PropertySpec::new("type", ValueType::String, json!("primary")).with_enum(&["primary", "secondary"]),
        )
        .with_property(PropertySpec::new("action", ValueType::String, json!("log")))
        .with_property(PropertySpec::new("arguments", ValueType::Object, json!({})));

    let text = BlockTypeDescriptor::new("text", "Text", "A text input")
        .with_property(PropertySpec::new("label", ValueType::String, json!("")))
        .with_property(
            PropertySpec::new("type", ValueType::String, json!("text"))
                .with_enum(&["text", "password", "email", "number"]),
        )
        .with_property(size_property())
        .with_property(PropertySpec::new("default_value", ValueType::String, json!("")))
        .with_property(PropertySpec::new("placeholder", ValueType::String, json!("Text")));

    let textarea = BlockTypeDescriptor::new("textarea", "Textarea", "A textarea input")
        .with_property(PropertySpec::new("label", ValueType::String, json!("")))
        .with_property(PropertySpec::new("default_value", ValueType::String, json!("")))
        .with_property(PropertySpec::new("placeholder", ValueType::String, json!("Textarea")))
        .with_property(PropertySpec::new("columns", ValueType::Number, json!(10)))
        .with_property(PropertySpec::new("rows", ValueType::Number, json!(10)));

    let select = BlockTypeDescriptor::new("select", "Select", "A select input")
        .with_property(PropertySpec::new("label", ValueType::String, json!("")))
        .with_property(size_property())
        .with_property(PropertySpec::new("options", ValueType::Array, json!([])))
        .with_property(PropertySpec::new("default_value", ValueType::String, json!("")))
        .with_property(PropertySpec::new("placeholder", ValueType::String, json!("Select")));

    vec![
        BlockGroup::new("layout", "Layout", vec![stack]),
        BlockGroup::new("buttons", "Buttons", vec![button]),
        BlockGroup::new("input", "Input", vec![text, textarea, select]),
    ]
}
