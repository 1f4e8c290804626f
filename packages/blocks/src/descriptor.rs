//! Block type descriptors and their property schemas.

use crate::block::{BlockNode, CHILDREN_PROPERTY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of value a block property holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Ordered list of child blocks
    #[serde(rename = "blocks")]
    BlockList,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::BlockList => "blocks",
        }
    }
}

/// Schema entry for one block property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    pub name: String,

    #[serde(rename = "type")]
    pub value_type: ValueType,

    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    #[serde(default)]
    pub default: Value,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, value_type: ValueType, default: Value) -> Self {
        Self {
            name: name.into(),
            value_type,
            enum_values: None,
            default,
        }
    }

    pub fn with_enum(mut self, values: &[&str]) -> Self {
        self.enum_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }
}

/// Describes one kind of block: its schema and structural role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTypeDescriptor {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_container: bool,

    #[serde(default = "default_requires_field_key")]
    pub requires_field_key: bool,

    /// Property schema in declaration order
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

fn default_requires_field_key() -> bool {
    true
}

impl BlockTypeDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            is_container: false,
            requires_field_key: true,
            properties: Vec::new(),
        }
    }

    /// Mark as a container; adds the `children` block list to the schema
    pub fn container(mut self) -> Self {
        self.is_container = true;
        self.requires_field_key = false;
        if self.property(CHILDREN_PROPERTY).is_none() {
            self.properties.push(PropertySpec::new(
                CHILDREN_PROPERTY,
                ValueType::BlockList,
                Value::Array(Vec::new()),
            ));
        }
        self
    }

    pub fn with_property(mut self, spec: PropertySpec) -> Self {
        self.properties.push(spec);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Build a fresh block of this type with every property at its default.
    ///
    /// The block key starts out as the type id; placement renames it on
    /// collision. An empty `label` default becomes `New <name>`.
    pub fn create_block(&self) -> BlockNode {
        let mut block = if self.is_container {
            BlockNode::container(&self.id, &self.id)
        } else {
            BlockNode::new(&self.id, &self.id)
        };

        for spec in &self.properties {
            if spec.value_type == ValueType::BlockList {
                continue;
            }
            let value = match (&spec.name[..], &spec.default) {
                ("label", Value::String(s)) if s.is_empty() => Value::String(format!("New {}", self.name)),
                ("label", Value::Null) => Value::String(format!("New {}", self.name)),
                (_, default) => default.clone(),
            };
            block = block.with_property(spec.name.clone(), value);
        }

        block
    }
}
