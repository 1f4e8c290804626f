//! # Scope Context
//!
//! Inherited, read-only view threaded through tree traversal. A scope is never
//! stored in the tree; traversal derives a new one each time it enters a
//! container, so a parent's scope is never changed by its children.

use crate::block::BlockNode;
use crate::descriptor::BlockTypeDescriptor;
use crate::registry::BlockTypeRegistry;
use crate::tree::{join_key_path, key_segments};

/// Traversal scope for one child list
#[derive(Debug, Clone)]
pub struct ScopeContext<'r> {
    zone: String,
    ancestor_key_path: String,
    is_editable: bool,
    registry: &'r BlockTypeRegistry,
}

impl<'r> ScopeContext<'r> {
    /// Scope for the root list of a zone
    pub fn root(registry: &'r BlockTypeRegistry, zone: impl Into<String>, is_editable: bool) -> Self {
        Self {
            zone: zone.into(),
            ancestor_key_path: String::new(),
            is_editable,
            registry,
        }
    }

    /// Scope for the children of `container`
    pub fn enter(&self, container: &BlockNode) -> Self {
        Self {
            zone: self.zone.clone(),
            ancestor_key_path: join_key_path(&self.ancestor_key_path, &container.key),
            is_editable: self.is_editable,
            registry: self.registry,
        }
    }

    /// Same scope with editability overridden for a subtree
    pub fn with_editable(&self, is_editable: bool) -> Self {
        Self {
            is_editable,
            ..self.clone()
        }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Dotted keys of the enclosing containers, empty at the root
    pub fn ancestor_key_path(&self) -> &str {
        &self.ancestor_key_path
    }

    pub fn is_editable(&self) -> bool {
        self.is_editable
    }

    pub fn is_root(&self) -> bool {
        self.ancestor_key_path.is_empty()
    }

    /// Number of containers entered since the zone root
    pub fn depth(&self) -> usize {
        key_segments(&self.ancestor_key_path).count()
    }

    pub fn registry(&self) -> &'r BlockTypeRegistry {
        self.registry
    }

    /// Key path of a block in this scope's child list
    pub fn key_path_of(&self, block: &BlockNode) -> String {
        join_key_path(&self.ancestor_key_path, &block.key)
    }

    /// Identifier a drag collaborator reports for this scope's drop zone,
    /// e.g. `main.stack`
    pub fn drop_target(&self) -> String {
        join_key_path(&self.zone, &self.ancestor_key_path)
    }

    pub fn describe(&self, type_id: &str) -> Option<&'r BlockTypeDescriptor> {
        self.registry.describe(type_id)
    }

    /// Descriptor for a block, or the fallback for unknown types
    pub fn resolve(&self, type_id: &str) -> &'r BlockTypeDescriptor {
        self.registry.resolve(type_id)
    }
}
