//! # Placement
//!
//! Turns a drop event into a structural insertion.
//!
//! A drop target identifier is the zone name followed by the key path of the
//! container whose drop zone received the block: `main` is the root list of
//! the `main` zone, `main.stack` is the child list of the `stack` block.
//!
//! Insertion appends to the end of the target list. When a sibling already
//! uses the new block's key, `_1`, `_2`, ... is appended until the key is free,
//! so keys stay readable and unique among siblings.
//!
//! A target that cannot be resolved leaves the tree untouched. This is not an
//! error, but it is not silent either: the caller receives
//! `Placement::Dropped` with the reason and can tell the user.

use formwork_blocks::{child_list_mut, join_key_path, key_segments, BlockNode, BlockTree, DescentFailure};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Drop target split into zone and container key path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    pub zone: String,

    /// Key path of the target container, empty for the zone root
    pub key_path: String,
}

/// Split a raw drop identifier into zone and key path
pub fn resolve_location(raw_target: &str) -> DropTarget {
    match raw_target.split_once('.') {
        Some((zone, key_path)) => DropTarget {
            zone: zone.to_string(),
            key_path: key_path.to_string(),
        },
        None => DropTarget {
            zone: raw_target.to_string(),
            key_path: String::new(),
        },
    }
}

/// Why a drop did not insert anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum DropReason {
    UnknownZone { zone: String },
    MissingSegment { segment: String },
    NotAContainer { key_path: String },
}

impl From<DescentFailure> for DropReason {
    fn from(failure: DescentFailure) -> Self {
        match failure {
            DescentFailure::MissingSegment { segment } => DropReason::MissingSegment { segment },
            DescentFailure::NotAContainer { key_path } => DropReason::NotAContainer { key_path },
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::UnknownZone { zone } => write!(f, "no zone named '{}'", zone),
            DropReason::MissingSegment { segment } => write!(f, "no block keyed '{}'", segment),
            DropReason::NotAContainer { key_path } => write!(f, "block '{}' is not a container", key_path),
        }
    }
}

/// Outcome of an insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Block added; `key_path` addresses it under its final key
    Inserted { key_path: String },

    /// Nothing added
    Dropped { reason: DropReason },
}

impl Placement {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Placement::Inserted { .. })
    }
}

/// First of `base`, `base_1`, `base_2`, ... not used by a sibling
pub fn unique_sibling_key(siblings: &[BlockNode], base: &str) -> String {
    let taken = |key: &str| siblings.iter().any(|b| b.key == key);

    if !taken(base) {
        return base.to_string();
    }

    (1..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Append `block` to the child list at `key_path`, renaming it on collision
pub fn insert(blocks: &mut Vec<BlockNode>, key_path: &str, mut block: BlockNode) -> Placement {
    let siblings = match child_list_mut(blocks, key_path) {
        Ok(siblings) => siblings,
        Err(failure) => {
            warn!(key_path, block_key = %block.key, %failure, "Drop target did not resolve");
            return Placement::Dropped {
                reason: failure.into(),
            };
        }
    };

    let key = unique_sibling_key(siblings, &block.key);
    if key != block.key {
        debug!(from = %block.key, to = %key, "Renamed block to avoid sibling collision");
    }
    block.key = key;

    let container_path = key_segments(key_path).collect::<Vec<_>>().join(".");
    let inserted_path = join_key_path(&container_path, &block.key);
    siblings.push(block);

    Placement::Inserted {
        key_path: inserted_path,
    }
}

/// Copy-on-write insertion: a new tree plus the outcome
pub fn with_inserted(tree: &BlockTree, key_path: &str, block: BlockNode) -> (BlockTree, Placement) {
    let mut next = tree.clone();
    let placement = insert(next.blocks_mut(), key_path, block);
    (next, placement)
}
