//! # Block Trees
//!
//! Structural queries and edits addressed by key paths.
//!
//! A key path is a dotted sequence of block keys: `"stack.text"` names the
//! block keyed `text` inside the container keyed `stack`. Descent only ever
//! matches block keys; the child-list property is never named in a path.
//! Empty segments are ignored, so `""` addresses the root list itself.
//!
//! Lookups return `Option` and removal of an absent path is a no-op, so none
//! of these operations fail on an already-missing block.

use crate::block::BlockNode;
use crate::error::TreeResult;
use crate::registry::BlockTypeRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Iterate the non-empty segments of a dotted path
pub fn key_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}

/// Join a parent key path and a child key
pub fn join_key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else if key.is_empty() {
        parent.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Why a key path could not be followed to a child list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DescentFailure {
    /// No sibling carries this key
    MissingSegment { segment: String },

    /// The block at this key path has no child list
    NotAContainer { key_path: String },
}

impl fmt::Display for DescentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescentFailure::MissingSegment { segment } => write!(f, "no block keyed '{}'", segment),
            DescentFailure::NotAContainer { key_path } => {
                write!(f, "block '{}' is not a container", key_path)
            }
        }
    }
}

/// Find a block by key path
pub fn find_block_by_key_path<'a>(blocks: &'a [BlockNode], path: &str) -> Option<&'a BlockNode> {
    let mut segments = key_segments(path).peekable();
    let mut siblings = blocks;

    while let Some(segment) = segments.next() {
        let node = siblings.iter().find(|b| b.key == segment)?;
        if segments.peek().is_none() {
            return Some(node);
        }
        siblings = node.children()?;
    }

    None
}

/// Find a block by key path for editing
pub fn find_block_by_key_path_mut<'a>(
    blocks: &'a mut Vec<BlockNode>,
    path: &str,
) -> Option<&'a mut BlockNode> {
    let segments: Vec<&str> = key_segments(path).collect();
    let (last, parents) = segments.split_last()?;

    descend_mut(blocks, parents)
        .ok()?
        .iter_mut()
        .find(|b| b.key == *last)
}

/// Follow `path` to the child list it names.
///
/// The empty path names `blocks` itself. Every block along the way must be a
/// container.
pub fn child_list_mut<'a>(
    blocks: &'a mut Vec<BlockNode>,
    path: &str,
) -> Result<&'a mut Vec<BlockNode>, DescentFailure> {
    let segments: Vec<&str> = key_segments(path).collect();
    descend_mut(blocks, &segments)
}

fn descend_mut<'a>(
    blocks: &'a mut Vec<BlockNode>,
    segments: &[&str],
) -> Result<&'a mut Vec<BlockNode>, DescentFailure> {
    let mut current = blocks;

    for (depth, segment) in segments.iter().enumerate() {
        let siblings = current;
        let node = siblings
            .iter_mut()
            .find(|b| b.key == *segment)
            .ok_or_else(|| DescentFailure::MissingSegment {
                segment: segment.to_string(),
            })?;

        current = match node.children_mut() {
            Some(children) => children,
            None => {
                return Err(DescentFailure::NotAContainer {
                    key_path: segments[..=depth].join("."),
                })
            }
        };
    }

    Ok(current)
}

/// Splice the addressed block out of its parent list.
///
/// Remaining siblings keep their relative order. Returns `None` and leaves the
/// tree untouched when any segment does not resolve.
pub fn remove_block_by_key_path(blocks: &mut Vec<BlockNode>, path: &str) -> Option<BlockNode> {
    let segments: Vec<&str> = key_segments(path).collect();
    let (last, parents) = segments.split_last()?;

    let siblings = descend_mut(blocks, parents).ok()?;
    let position = siblings.iter().position(|b| b.key == *last)?;
    Some(siblings.remove(position))
}

/// Ordered root list of blocks for one zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTree {
    blocks: Vec<BlockNode>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[BlockNode] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut Vec<BlockNode> {
        &mut self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn find(&self, key_path: &str) -> Option<&BlockNode> {
        find_block_by_key_path(&self.blocks, key_path)
    }

    pub fn find_mut(&mut self, key_path: &str) -> Option<&mut BlockNode> {
        find_block_by_key_path_mut(&mut self.blocks, key_path)
    }

    pub fn contains(&self, key_path: &str) -> bool {
        self.find(key_path).is_some()
    }

    /// Remove in place, returning the removed block
    pub fn remove(&mut self, key_path: &str) -> Option<BlockNode> {
        remove_block_by_key_path(&mut self.blocks, key_path)
    }

    /// Copy-on-write removal: a new tree without the addressed block
    pub fn without(&self, key_path: &str) -> BlockTree {
        let mut next = self.clone();
        next.remove(key_path);
        next
    }

    /// Key paths of every block, depth first
    pub fn key_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_key_paths(&self.blocks, "", &mut paths);
        paths
    }

    /// Settle container status of every block against `registry`
    pub fn conform(&mut self, registry: &BlockTypeRegistry) -> TreeResult<()> {
        self.blocks.iter_mut().try_for_each(|block| block.conform(registry))
    }

    /// Every non-empty field key, depth first
    pub fn field_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_field_keys(&self.blocks, &mut keys);
        keys
    }
}

impl From<Vec<BlockNode>> for BlockTree {
    fn from(blocks: Vec<BlockNode>) -> Self {
        Self { blocks }
    }
}

fn collect_key_paths(blocks: &[BlockNode], prefix: &str, out: &mut Vec<String>) {
    for block in blocks {
        let path = join_key_path(prefix, &block.key);
        if let Some(children) = block.children() {
            out.push(path.clone());
            collect_key_paths(children, &path, out);
        } else {
            out.push(path);
        }
    }
}

fn collect_field_keys(blocks: &[BlockNode], out: &mut Vec<String>) {
    for block in blocks {
        if block.has_field() {
            out.push(block.field_key.clone());
        }
        if let Some(children) = block.children() {
            collect_field_keys(children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use serde_json::json;

    fn sample_tree() -> BlockTree {
        BlockTree::from(vec![
            BlockNode::new("title", "text").with_field_key("title"),
            BlockNode::container("stack", "stack").with_children(vec![
                BlockNode::new("a", "text").with_field_key("person.first"),
                BlockNode::new("target", "text"),
                BlockNode::new("b", "select").with_field_key("person.kind"),
                BlockNode::container("inner", "stack")
                    .with_children(vec![BlockNode::new("deep", "button")]),
            ]),
            BlockNode::new("submit", "button"),
        ])
    }

    #[test]
    fn test_find_by_key_path() {
        let tree = sample_tree();

        assert_eq!(tree.find("title").unwrap().block_type, "text");
        assert_eq!(tree.find("stack.b").unwrap().block_type, "select");
        assert_eq!(tree.find("stack.inner.deep").unwrap().block_type, "button");
        assert!(tree.find("stack").unwrap().is_container());
    }

    #[test]
    fn test_find_missing_returns_none() {
        let tree = sample_tree();

        assert!(tree.find("nope").is_none());
        assert!(tree.find("stack.nope").is_none());
        assert!(tree.find("").is_none());
        // a leaf has no children to descend into
        assert!(tree.find("title.anything").is_none());
        // the child-list property is not addressable
        assert!(tree.find("stack.children.a").is_none());
    }

    #[test]
    fn test_find_mut_edits_in_place() {
        let mut tree = sample_tree();
        tree.find_mut("stack.inner.deep")
            .unwrap()
            .set_property("text", json!("Go"))
            .unwrap();

        assert_eq!(tree.find("stack.inner.deep").unwrap().str_property("text"), Some("Go"));
    }

    #[test]
    fn test_remove_preserves_sibling_order() {
        let mut tree = sample_tree();
        let before = tree.clone();

        let removed = tree.remove("stack.target").unwrap();
        assert_eq!(removed.key, "target");

        let keys: Vec<&str> = tree.find("stack").unwrap().children().unwrap()
            .iter()
            .map(|b| b.key.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "b", "inner"]);

        // neighbours are untouched
        assert_eq!(tree.find("stack.a"), before.find("stack.a"));
        assert_eq!(tree.find("stack.b"), before.find("stack.b"));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut tree = sample_tree();
        let before = tree.clone();

        assert!(tree.remove("stack.ghost").is_none());
        assert!(tree.remove("ghost.a").is_none());
        assert!(tree.remove("title.a").is_none());
        assert!(tree.remove("").is_none());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_without_leaves_original_untouched() {
        let tree = sample_tree();
        let next = tree.without("title");

        assert!(tree.contains("title"));
        assert!(!next.contains("title"));
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_child_list_descent_failures() {
        let mut tree = sample_tree();

        assert_eq!(child_list_mut(tree.blocks_mut(), "").unwrap().len(), 3);
        assert_eq!(child_list_mut(tree.blocks_mut(), "stack.inner").unwrap().len(), 1);

        assert_eq!(
            child_list_mut(tree.blocks_mut(), "stack.ghost").unwrap_err(),
            DescentFailure::MissingSegment { segment: "ghost".to_string() }
        );
        assert_eq!(
            child_list_mut(tree.blocks_mut(), "stack.a").unwrap_err(),
            DescentFailure::NotAContainer { key_path: "stack.a".to_string() }
        );
    }

    #[test]
    fn test_key_paths_and_field_keys() {
        let tree = sample_tree();

        assert_eq!(
            tree.key_paths(),
            vec![
                "title",
                "stack",
                "stack.a",
                "stack.target",
                "stack.b",
                "stack.inner",
                "stack.inner.deep",
                "submit",
            ]
        );
        assert_eq!(tree.field_keys(), vec!["title", "person.first", "person.kind"]);
    }

    #[test]
    fn test_tree_serializes_as_plain_sequence() {
        let tree = BlockTree::from(vec![BlockNode::new("t", "text")]);
        let value = serde_json::to_value(&tree).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["key"], "t");
    }

    #[test]
    fn test_conform_settles_nested_containers() {
        let mut tree: BlockTree = serde_json::from_value(json!([
            { "key": "stack", "type": "stack", "properties": { "children": [
                { "key": "note", "type": "text", "properties": { "children": [{ "key": "x", "type": "button" }] } },
                { "key": "inner", "type": "stack" }
            ] } }
        ]))
        .unwrap();

        tree.conform(&BlockTypeRegistry::builtin()).unwrap();

        assert!(!tree.find("stack.note").unwrap().is_container());
        assert!(tree.find("stack.note.x").is_none());
        assert!(tree.find("stack.inner").unwrap().is_container());
        assert_eq!(tree.key_paths(), vec!["stack", "stack.note", "stack.inner"]);
    }

    #[test]
    fn test_conform_rejects_malformed_container() {
        let mut tree: BlockTree = serde_json::from_value(json!([
            { "key": "s", "type": "stack", "properties": { "children": 5 } }
        ]))
        .unwrap();

        assert_eq!(
            tree.conform(&BlockTypeRegistry::builtin()),
            Err(TreeError::MalformedChildren {
                key: "s".to_string(),
                found: "number"
            })
        );
    }
}
