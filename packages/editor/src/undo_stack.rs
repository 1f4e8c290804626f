//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Before a mutation is recorded, the content it changed is snapshotted
//! - Undo swaps the snapshot back in and keeps the replaced content for redo
//! - New mutations clear the redo stack
//! - Mutations that changed nothing (dropped inserts, repeated removes) are
//!   not recorded
//! - Supports batched operations (group multiple mutations as one undo step)
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut doc = Document::load("form.json")?;
//!
//! stack.apply(&Mutation::RemoveBlock { zone, key_path }, &mut doc)?;
//! stack.undo(&mut doc);
//! stack.redo(&mut doc);
//! ```

use crate::document::FormContent;
use crate::{Document, EditorError, Mutation, MutationResult};
use tracing::debug;

const DEFAULT_MAX_LEVELS: usize = 100;

/// A group of mutations that should be undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// Content to swap in when this batch moves between stacks
    pub snapshot: FormContent,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl MutationBatch {
    pub fn single(mutation: Mutation, snapshot: FormContent) -> Self {
        Self {
            mutations: vec![mutation],
            snapshot,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Batch under construction; the snapshot is taken at its first change
#[derive(Debug, Default)]
struct PendingBatch {
    mutations: Vec<Mutation>,
    snapshot: Option<FormContent>,
    description: Option<String>,
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<PendingBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    pub fn apply(&mut self, mutation: &Mutation, doc: &mut Document) -> Result<MutationResult, EditorError> {
        let snapshot = doc.content().clone();
        let result = doc.apply(mutation)?;

        if !result.effect.is_change() {
            debug!(version = result.version, "Mutation changed nothing, not recorded");
            return Ok(result);
        }

        if let Some(batch) = &mut self.current_batch {
            batch.mutations.push(mutation.clone());
            batch.snapshot.get_or_insert(snapshot);
        } else {
            self.push_batch(MutationBatch::single(mutation.clone(), snapshot));
        }

        Ok(result)
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(PendingBatch::default());
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        let Some(batch) = self.current_batch.take() else {
            return;
        };

        if let Some(snapshot) = batch.snapshot {
            self.push_batch(MutationBatch {
                mutations: batch.mutations,
                snapshot,
                description: batch.description,
            });
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // new action invalidates future
        self.redo_stack.clear();
    }

    /// Undo the most recent mutation/batch. Returns false when there is
    /// nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        let Some(mut batch) = self.undo_stack.pop() else {
            return false;
        };

        let replaced = doc.replace_content(batch.snapshot);
        batch.snapshot = replaced;
        debug!(mutations = batch.mutations.len(), version = doc.version, "Undid batch");
        self.redo_stack.push(batch);
        true
    }

    /// Redo the most recently undone mutation/batch
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        let Some(mut batch) = self.redo_stack.pop() else {
            return false;
        };

        let replaced = doc.replace_content(batch.snapshot);
        batch.snapshot = replaced;
        debug!(mutations = batch.mutations.len(), version = doc.version, "Redid batch");
        self.undo_stack.push(batch);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_blocks::BlockNode;
    use serde_json::json;

    fn doc() -> Document {
        Document::new("form.json", FormContent::default())
    }

    fn insert_text() -> Mutation {
        Mutation::InsertBlock {
            target: "main".to_string(),
            block: BlockNode::new("text", "text"),
        }
    }

    fn root_keys(doc: &Document) -> Vec<String> {
        doc.content().section("main").unwrap().blocks().iter().map(|b| b.key.clone()).collect()
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.max_levels(), 100);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_apply_and_undo_insert() {
        let mut doc = doc();
        let mut stack = UndoStack::new();

        stack.apply(&insert_text(), &mut doc).unwrap();
        assert_eq!(root_keys(&doc), vec!["text"]);
        assert_eq!(stack.undo_levels(), 1);

        assert!(stack.undo(&mut doc));
        assert!(root_keys(&doc).is_empty());
        assert_eq!(stack.redo_levels(), 1);

        assert!(stack.redo(&mut doc));
        assert_eq!(root_keys(&doc), vec!["text"]);
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut doc = doc();
        let mut stack = UndoStack::new();

        assert!(!stack.undo(&mut doc));
        assert!(!stack.redo(&mut doc));
    }

    #[test]
    fn test_unchanged_effects_not_recorded() {
        let mut doc = doc();
        let mut stack = UndoStack::new();

        let dropped = Mutation::InsertBlock {
            target: "main.ghost".to_string(),
            block: BlockNode::new("text", "text"),
        };
        stack.apply(&dropped, &mut doc).unwrap();

        let remove_missing = Mutation::RemoveBlock {
            zone: "main".to_string(),
            key_path: "ghost".to_string(),
        };
        stack.apply(&remove_missing, &mut doc).unwrap();

        assert_eq!(stack.undo_levels(), 0);
    }

    #[test]
    fn test_batched_mutations() {
        let mut doc = doc();
        let mut stack = UndoStack::new();

        stack.begin_batch();
        stack.set_batch_description("Add name field");
        stack.apply(&insert_text(), &mut doc).unwrap();
        stack
            .apply(
                &Mutation::SetProperty {
                    zone: "main".to_string(),
                    key_path: "text".to_string(),
                    property: "label".to_string(),
                    value: json!("Name"),
                },
                &mut doc,
            )
            .unwrap();
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Add name field"));

        stack.undo(&mut doc);
        assert!(root_keys(&doc).is_empty());
        assert_eq!(stack.redo_description(), Some("Add name field"));
    }

    #[test]
    fn test_empty_batch_is_discarded() {
        let mut doc = doc();
        let mut stack = UndoStack::new();

        stack.begin_batch();
        assert!(stack.is_batching());
        stack.end_batch();

        assert!(!stack.is_batching());
        assert!(!stack.undo(&mut doc));
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut doc = doc();
        let mut stack = UndoStack::new();

        stack.apply(&insert_text(), &mut doc).unwrap();
        stack.undo(&mut doc);
        assert_eq!(stack.redo_levels(), 1);

        stack.apply(&insert_text(), &mut doc).unwrap();
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut doc = doc();
        let mut stack = UndoStack::with_max_levels(2);

        for _ in 0..3 {
            stack.apply(&insert_text(), &mut doc).unwrap();
        }

        assert_eq!(stack.undo_levels(), 2);
        stack.undo(&mut doc);
        stack.undo(&mut doc);
        // the oldest insert is beyond the history limit
        assert_eq!(root_keys(&doc), vec!["text"]);
    }
}
