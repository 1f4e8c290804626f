//! # Block Nodes
//!
//! A block is one node of a form layout: a type id, a key that is unique among
//! its siblings, an optional field key bound into the value bag, and a bag of
//! properties.
//!
//! Container blocks keep their ordered child list under the `children`
//! property on the wire. In memory the child list is a typed field. Decoding
//! alone cannot tell a container from a leaf that happens to carry a
//! `children` property, so it only lifts lists that read as blocks; `conform`
//! then settles container status against the block type registry and rejects
//! a container whose child list is not a sequence of blocks.
//!
//! ```json
//! {
//!   "key": "stack",
//!   "type": "stack",
//!   "fieldKey": "",
//!   "properties": {
//!     "direction": "vertical",
//!     "children": [
//!       { "key": "text", "type": "text", "fieldKey": "name", "properties": {} }
//!     ]
//!   }
//! }
//! ```

use crate::error::{TreeError, TreeResult};
use crate::registry::BlockTypeRegistry;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Property that holds a container's child blocks.
pub const CHILDREN_PROPERTY: &str = "children";

/// One node of a block tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct BlockNode {
    /// Identifier among siblings, also the key-path segment for this node
    pub key: String,

    /// Block type id (see `BlockTypeRegistry`)
    pub block_type: String,

    /// Dotted path into the value bag, empty when the block stores no value
    pub field_key: String,

    properties: Map<String, Value>,

    /// `Some` iff the block is a container
    children: Option<Vec<BlockNode>>,
}

/// Wire shape of a block: `{ key, type, fieldKey, properties }`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    key: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    field_key: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl From<RawBlock> for BlockNode {
    fn from(raw: RawBlock) -> Self {
        let RawBlock {
            key,
            block_type,
            field_key,
            mut properties,
        } = raw;

        let children = match properties.get(CHILDREN_PROPERTY) {
            Some(value) if value.is_array() => parse_children(&key, value).ok(),
            _ => None,
        };
        if children.is_some() {
            properties.remove(CHILDREN_PROPERTY);
        }

        Self {
            key,
            block_type,
            field_key,
            properties,
            children,
        }
    }
}

impl Serialize for BlockNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BlockNode", 4)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("type", &self.block_type)?;
        state.serialize_field("fieldKey", &self.field_key)?;
        state.serialize_field("properties", &PropertiesView(self))?;
        state.end()
    }
}

/// Serializes regular properties with the child list folded back in
struct PropertiesView<'a>(&'a BlockNode);

impl Serialize for PropertiesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0;
        let len = node.properties.len() + usize::from(node.children.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in &node.properties {
            map.serialize_entry(name, value)?;
        }
        if let Some(children) = &node.children {
            map.serialize_entry(CHILDREN_PROPERTY, children)?;
        }
        map.end()
    }
}

fn parse_children(key: &str, value: &Value) -> TreeResult<Vec<BlockNode>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                BlockNode::deserialize(item)
                    .map_err(|e| TreeError::InvalidBlock(format!("child of '{}': {}", key, e)))
            })
            .collect(),
        other => Err(TreeError::malformed_children(key, other)),
    }
}

impl BlockNode {
    /// Create a leaf block
    pub fn new(key: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            block_type: block_type.into(),
            field_key: String::new(),
            properties: Map::new(),
            children: None,
        }
    }

    /// Create a container block with an empty child list
    pub fn container(key: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            children: Some(Vec::new()),
            ..Self::new(key, block_type)
        }
    }

    pub fn with_field_key(mut self, field_key: impl Into<String>) -> Self {
        self.field_key = field_key.into();
        self
    }

    /// Set a regular property. Use `with_children` for the child list.
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn with_children(mut self, children: Vec<BlockNode>) -> Self {
        self.properties.remove(CHILDREN_PROPERTY);
        self.children = Some(children);
        self
    }

    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> Option<&[BlockNode]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<BlockNode>> {
        self.children.as_mut()
    }

    /// Whether this block writes into the value bag
    pub fn has_field(&self) -> bool {
        !self.field_key.is_empty()
    }

    /// Regular properties (the child list is not included)
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// String property, if present and a string
    pub fn str_property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str)
    }

    /// Overwrite one property. No schema validation happens here.
    ///
    /// On a container, writing `children` replaces the child list and must be
    /// given a sequence of blocks. On a leaf it is an ordinary property.
    pub fn set_property(&mut self, name: &str, value: Value) -> TreeResult<()> {
        if name == CHILDREN_PROPERTY && self.children.is_some() {
            self.children = Some(parse_children(&self.key, &value)?);
        } else {
            self.properties.insert(name.to_string(), value);
        }
        Ok(())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    /// Set the field key (when given) and merge properties into this block
    pub fn update(&mut self, field_key: Option<&str>, properties: &Map<String, Value>) -> TreeResult<()> {
        if let Some(field_key) = field_key {
            self.field_key = field_key.to_string();
        }
        for (name, value) in properties {
            self.set_property(name, value.clone())?;
        }
        Ok(())
    }

    /// Settle container status from the registry, recursively.
    ///
    /// Registered container types get a typed child list (empty when none was
    /// stored) and fail with `MalformedChildren` when the stored one is not a
    /// sequence. Registered leaf types keep `children` as an ordinary property.
    /// Unknown types are left as decoded.
    pub fn conform(&mut self, registry: &BlockTypeRegistry) -> TreeResult<()> {
        match registry.describe(&self.block_type).map(|d| d.is_container) {
            Some(true) if self.children.is_none() => {
                let children = match self.properties.get(CHILDREN_PROPERTY) {
                    Some(value) => parse_children(&self.key, value)?,
                    None => Vec::new(),
                };
                self.properties.remove(CHILDREN_PROPERTY);
                self.children = Some(children);
            }
            Some(false) => {
                if let Some(children) = self.children.take() {
                    let value = serde_json::to_value(&children).map_err(|e| TreeError::InvalidBlock(e.to_string()))?;
                    self.properties.insert(CHILDREN_PROPERTY.to_string(), value);
                }
            }
            _ => {}
        }

        if let Some(children) = &mut self.children {
            for child in children {
                child.conform(registry)?;
            }
        }
        Ok(())
    }
}
