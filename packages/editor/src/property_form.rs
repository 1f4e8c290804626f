//! Schema-driven property editor.
//!
//! A block's settings are edited with an ordinary form built from blocks: a
//! `stack` keyed `properties` holding one field block per editable property.
//! The form edits a value bag shaped `{ fieldKey, properties: { .. } }`, and
//! the edited bag converts back into an `UpdateBlock` mutation.

use crate::Mutation;
use formwork_blocks::{BlockNode, BlockTypeDescriptor, PropertySpec, ValueBag, ValueType};
use serde_json::{json, Map, Value};

/// Key of the stack that wraps a property form
pub const PROPERTY_FORM_KEY: &str = "properties";

const FIELD_KEY_ENTRY: &str = "fieldKey";

/// Child lists and free-form arrays have no field editor
fn is_editable(spec: &PropertySpec) -> bool {
    !matches!(spec.value_type, ValueType::BlockList | ValueType::Array)
}

fn editor_block_type(spec: &PropertySpec) -> &'static str {
    match spec.value_type {
        ValueType::String | ValueType::Number if spec.enum_values.is_some() => "select",
        ValueType::String | ValueType::Number => "text",
        other => other.as_str(),
    }
}

fn editor_block(spec: &PropertySpec) -> BlockNode {
    let block_type = editor_block_type(spec);
    let block = BlockNode::new(&spec.name, block_type)
        .with_field_key(format!("{}.{}", PROPERTY_FORM_KEY, spec.name))
        .with_property("label", Value::String(spec.name.clone()));

    match block_type {
        "select" => block
            .with_property("options", json!(spec.enum_values))
            .with_property("default_value", spec.default.clone()),
        "text" => {
            let input = if spec.value_type == ValueType::Number { "number" } else { "text" };
            block
                .with_property("type", json!(input))
                .with_property("default_value", spec.default.clone())
        }
        _ => block,
    }
}

/// Form layout for editing blocks described by `descriptor`
pub fn property_form(descriptor: &BlockTypeDescriptor) -> BlockNode {
    let mut children = Vec::new();

    if descriptor.requires_field_key {
        children.push(
            BlockNode::new(FIELD_KEY_ENTRY, "text")
                .with_field_key(FIELD_KEY_ENTRY)
                .with_property("label", json!("Field key"))
                .with_property("default_value", json!("")),
        );
    }

    children.extend(descriptor.properties.iter().filter(|s| is_editable(s)).map(editor_block));

    BlockNode::container(PROPERTY_FORM_KEY, "stack").with_children(children)
}

/// Value bag the property form edits for `block`
pub fn property_values(descriptor: &BlockTypeDescriptor, block: &BlockNode) -> ValueBag {
    let properties: Map<String, Value> = descriptor
        .properties
        .iter()
        .filter(|s| is_editable(s))
        .filter_map(|s| block.property(&s.name).map(|v| (s.name.clone(), v.clone())))
        .collect();

    json!({
        FIELD_KEY_ENTRY: block.field_key,
        PROPERTY_FORM_KEY: properties,
    })
}

/// Turn an edited property bag back into a block update
pub fn property_edit(
    descriptor: &BlockTypeDescriptor,
    zone: &str,
    key_path: &str,
    values: &ValueBag,
) -> Mutation {
    let field_key = descriptor
        .requires_field_key
        .then(|| values.get(FIELD_KEY_ENTRY).and_then(Value::as_str))
        .flatten()
        .map(str::to_string);

    let properties = values
        .get(PROPERTY_FORM_KEY)
        .and_then(Value::as_object)
        .map(|edited| {
            edited
                .iter()
                .filter(|(name, _)| descriptor.property(name).map_or(true, is_editable))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    Mutation::UpdateBlock {
        zone: zone.to_string(),
        key_path: key_path.to_string(),
        field_key,
        properties,
    }
}
