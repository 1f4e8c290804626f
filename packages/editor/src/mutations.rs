//! # Form Mutations
//!
//! Semantic edit operations on a form: structural edits on the block trees of
//! each zone and data edits on the value bag.
//!
//! ## Mutation Semantics
//!
//! ### InsertBlock
//! - Target is a drop identifier (`main`, `main.stack`)
//! - Appends to the end of the target list, renaming on key collision
//! - An unresolvable target is a `Dropped` effect, not an error
//!
//! ### RemoveBlock
//! - Removes the block and its whole subtree
//! - Idempotent: removing a missing block is `Unchanged`
//!
//! ### SetProperty / UpdateBlock
//! - Last write wins, no schema validation
//! - The addressed block must exist
//! - `UpdateBlock` is all or nothing: a bad `children` value leaves the block
//!   as it was
//!
//! ### SetValue / RemoveValue
//! - Dotted paths into the value bag (`person.name`, `tags[]`)

use crate::document::FormContent;
use crate::placement::{insert, resolve_location, DropReason, Placement};
use formwork_blocks::{remove_value, set_value, BlockNode, PathError, TreeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op")]
pub enum Mutation {
    /// Drop a block into the list named by `target`
    InsertBlock { target: String, block: BlockNode },

    #[serde(rename_all = "camelCase")]
    RemoveBlock { zone: String, key_path: String },

    #[serde(rename_all = "camelCase")]
    SetProperty {
        zone: String,
        key_path: String,
        property: String,
        value: Value,
    },

    /// Property form write-back: field key (when given) plus merged properties
    #[serde(rename_all = "camelCase")]
    UpdateBlock {
        zone: String,
        key_path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_key: Option<String>,
        #[serde(default)]
        properties: Map<String, Value>,
    },

    SetValue { path: String, value: Value },

    RemoveValue { path: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {zone}.{key_path}")]
    BlockNotFound { zone: String, key_path: String },

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// What a successfully applied mutation did
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Inserted { zone: String, key_path: String },
    Dropped(DropReason),
    Removed(BlockNode),
    Updated,
    Unchanged,
}

impl Effect {
    /// Whether the content differs from before the mutation
    pub fn is_change(&self) -> bool {
        !matches!(self, Effect::Dropped(_) | Effect::Unchanged)
    }
}

impl Mutation {
    /// Apply mutation to form content with validation
    pub fn apply(&self, content: &mut FormContent) -> Result<Effect, MutationError> {
        self.validate(content)?;

        match self {
            Mutation::InsertBlock { target, block } => Ok(Self::apply_insert(content, target, block)),

            Mutation::RemoveBlock { zone, key_path } => {
                let tree = Self::section_mut(content, zone)?;
                Ok(match tree.remove(key_path) {
                    Some(removed) => Effect::Removed(removed),
                    None => {
                        debug!(zone = %zone, key_path = %key_path, "Remove of missing block ignored");
                        Effect::Unchanged
                    }
                })
            }

            Mutation::SetProperty {
                zone,
                key_path,
                property,
                value,
            } => {
                let block = Self::block_mut(content, zone, key_path)?;
                block.set_property(property, value.clone())?;
                Ok(Effect::Updated)
            }

            Mutation::UpdateBlock {
                zone,
                key_path,
                field_key,
                properties,
            } => {
                let block = Self::block_mut(content, zone, key_path)?;
                let mut updated = block.clone();
                updated.update(field_key.as_deref(), properties)?;
                *block = updated;
                Ok(Effect::Updated)
            }

            Mutation::SetValue { path, value } => {
                set_value(&mut content.values, path, value.clone())?;
                Ok(Effect::Updated)
            }

            Mutation::RemoveValue { path } => Ok(match remove_value(&mut content.values, path) {
                Some(_) => Effect::Updated,
                None => Effect::Unchanged,
            }),
        }
    }

    fn apply_insert(content: &mut FormContent, target: &str, block: &BlockNode) -> Effect {
        let location = resolve_location(target);

        let Some(tree) = content.section_mut(&location.zone) else {
            return Effect::Dropped(DropReason::UnknownZone { zone: location.zone });
        };

        match insert(tree.blocks_mut(), &location.key_path, block.clone()) {
            Placement::Inserted { key_path } => Effect::Inserted {
                zone: location.zone,
                key_path,
            },
            Placement::Dropped { reason } => Effect::Dropped(reason),
        }
    }

    fn section_mut<'a>(
        content: &'a mut FormContent,
        zone: &str,
    ) -> Result<&'a mut formwork_blocks::BlockTree, MutationError> {
        content
            .section_mut(zone)
            .ok_or_else(|| MutationError::UnknownZone(zone.to_string()))
    }

    fn block_mut<'a>(
        content: &'a mut FormContent,
        zone: &str,
        key_path: &str,
    ) -> Result<&'a mut BlockNode, MutationError> {
        Self::section_mut(content, zone)?
            .find_mut(key_path)
            .ok_or_else(|| MutationError::BlockNotFound {
                zone: zone.to_string(),
                key_path: key_path.to_string(),
            })
    }

    /// Validate without applying
    pub fn validate(&self, content: &FormContent) -> Result<(), MutationError> {
        match self {
            // unresolvable targets become drops when applied
            Mutation::InsertBlock { .. } => Ok(()),

            Mutation::RemoveBlock { zone, .. } => {
                content
                    .section(zone)
                    .ok_or_else(|| MutationError::UnknownZone(zone.clone()))?;
                Ok(())
            }

            Mutation::SetProperty { zone, key_path, .. } | Mutation::UpdateBlock { zone, key_path, .. } => {
                let tree = content
                    .section(zone)
                    .ok_or_else(|| MutationError::UnknownZone(zone.clone()))?;
                if tree.contains(key_path) {
                    Ok(())
                } else {
                    Err(MutationError::BlockNotFound {
                        zone: zone.clone(),
                        key_path: key_path.clone(),
                    })
                }
            }

            Mutation::SetValue { path, .. } | Mutation::RemoveValue { path } => {
                if path.is_empty() {
                    Err(PathError::EmptyPath.into())
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Result of applying a mutation to a document
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    pub effect: Effect,
}
