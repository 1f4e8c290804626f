//! # Edit Session
//!
//! One user's editing state for a document: the document itself, the block
//! catalog, undo history and the drag in progress. Every edit made through a
//! session is recorded for undo.

use crate::drag::{DragController, DragState, DropAction};
use crate::property_form::{property_edit, property_form, property_values};
use crate::render::render_outline;
use crate::{Document, EditorError, Effect, Mutation, MutationResult, UndoStack};
use formwork_blocks::{BlockNode, BlockTypeRegistry, ScopeContext, ValueBag};
use tracing::{info, instrument, warn};

pub struct EditSession {
    /// Document being edited
    pub document: Document,

    registry: BlockTypeRegistry,
    history: UndoStack,
    drag: DragController,
}

impl EditSession {
    /// Open a session, settling the document's container blocks against
    /// `registry` first
    pub fn new(mut document: Document, registry: BlockTypeRegistry) -> Result<Self, EditorError> {
        document.conform(&registry)?;
        Ok(Self {
            document,
            registry,
            history: UndoStack::new(),
            drag: DragController::new(),
        })
    }

    pub fn with_history(mut self, history: UndoStack) -> Self {
        self.history = history;
        self
    }

    pub fn registry(&self) -> &BlockTypeRegistry {
        &self.registry
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Apply and record a mutation. Inserted blocks are settled against the
    /// catalog first, like the document they join.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        let conformed;
        let mutation = match mutation {
            Mutation::InsertBlock { target, block } => {
                let mut block = block.clone();
                block.conform(&self.registry)?;
                conformed = Mutation::InsertBlock {
                    target: target.clone(),
                    block,
                };
                &conformed
            }
            other => other,
        };

        let result = self.history.apply(mutation, &mut self.document)?;
        if let Effect::Dropped(reason) = &result.effect {
            warn!(%reason, "Mutation dropped");
        }
        Ok(result)
    }

    /// Apply several mutations as one undo step
    #[instrument(skip(self, description, mutations), fields(count = mutations.len()))]
    pub fn apply_batch(
        &mut self,
        description: impl Into<String>,
        mutations: &[Mutation],
    ) -> Result<Vec<MutationResult>, EditorError> {
        self.history.begin_batch();
        self.history.set_batch_description(description);

        let results = mutations.iter().map(|m| self.apply(m)).collect::<Result<Vec<_>, _>>();

        // a failed mutation still closes the batch over what did apply
        self.history.end_batch();
        results
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.document)
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn drag_start(&mut self, type_id: &str) -> Result<(), EditorError> {
        self.drag.drag_start(&self.registry, type_id)
    }

    /// Finish a drag; `None` when it was cancelled
    #[instrument(skip(self))]
    pub fn drag_end(&mut self, target: Option<&str>) -> Result<Option<MutationResult>, EditorError> {
        match self.drag.drag_end(&self.registry, target) {
            DropAction::Cancelled => Ok(None),
            DropAction::Insert(mutation) => {
                let result = self.apply(&mutation)?;
                if let Effect::Inserted { zone, key_path } = &result.effect {
                    info!(zone = %zone, key_path = %key_path, "Block placed");
                }
                Ok(Some(result))
            }
        }
    }

    /// Insert a fresh block of `type_id` without a drag
    pub fn add_block(&mut self, type_id: &str, target: &str) -> Result<MutationResult, EditorError> {
        let descriptor = self
            .registry
            .describe(type_id)
            .ok_or_else(|| EditorError::UnknownBlockType(type_id.to_string()))?;

        self.apply(&Mutation::InsertBlock {
            target: target.to_string(),
            block: descriptor.create_block(),
        })
    }

    pub fn block(&self, zone: &str, key_path: &str) -> Option<&BlockNode> {
        self.document.content().section(zone)?.find(key_path)
    }

    fn existing_block(&self, zone: &str, key_path: &str) -> Result<&BlockNode, EditorError> {
        self.block(zone, key_path).ok_or_else(|| EditorError::BlockNotFound {
            zone: zone.to_string(),
            key_path: key_path.to_string(),
        })
    }

    /// Property form layout and its starting values for one block
    pub fn edit_form(&self, zone: &str, key_path: &str) -> Result<(BlockNode, ValueBag), EditorError> {
        let block = self.existing_block(zone, key_path)?;
        let descriptor = self.registry.resolve(&block.block_type);
        Ok((property_form(descriptor), property_values(descriptor, block)))
    }

    /// Write an edited property form back to its block
    pub fn submit_form(&mut self, zone: &str, key_path: &str, values: &ValueBag) -> Result<MutationResult, EditorError> {
        let block = self.existing_block(zone, key_path)?;
        let descriptor = self.registry.resolve(&block.block_type);
        let mutation = property_edit(descriptor, zone, key_path, values);
        self.apply(&mutation)
    }

    /// Root scope for rendering a zone
    pub fn scope(&self, zone: &str, is_editable: bool) -> ScopeContext<'_> {
        ScopeContext::root(&self.registry, zone, is_editable)
    }

    /// Outline of one zone, `None` for an unknown zone
    pub fn outline(&self, zone: &str, is_editable: bool) -> Option<String> {
        let content = self.document.content();
        let tree = content.section(zone)?;
        Some(render_outline(tree.blocks(), &self.scope(zone, is_editable), &content.values))
    }
}
