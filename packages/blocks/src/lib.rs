//! # Formwork Blocks
//!
//! Data model for block-based form layouts.
//!
//! ```text
//! BlockTypeRegistry ──describe──▶ ScopeContext ──enter──▶ child scopes
//!        │                              │
//!        ▼                              ▼
//!   create_block               Visitor / key paths
//!        │                              │
//!        ▼                              ▼
//!   BlockTree (zones) ◀── find / remove / set_property
//!
//!   ValueBag ◀── get_value / set_value / remove_value (via field keys)
//! ```
//!
//! The block tree holds structure and presentation; the value bag holds the
//! data that field blocks edit. A block's `field_key` is a dotted path into
//! the value bag.

pub mod block;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod scope;
pub mod tree;
pub mod value_path;
pub mod visitor;

pub use block::{BlockNode, CHILDREN_PROPERTY};
pub use descriptor::{BlockTypeDescriptor, PropertySpec, ValueType};
pub use error::{PathError, TreeError, TreeResult};
pub use registry::{BlockGroup, BlockTypeRegistry, FALLBACK_BLOCK_TYPE};
pub use scope::ScopeContext;
pub use tree::{
    child_list_mut, find_block_by_key_path, find_block_by_key_path_mut, join_key_path, key_segments,
    remove_block_by_key_path, BlockTree, DescentFailure,
};
pub use value_path::{get_value, get_value_or, remove_value, set_value, ValueBag, MAX_ARRAY_PADDING};
pub use visitor::{walk_block, walk_blocks, Visitor};
