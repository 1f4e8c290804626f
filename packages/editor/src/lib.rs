//! # Formwork Editor
//!
//! Editing engine for block-based forms.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: nodes, registry, key/value paths    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save form documents                 │
//! │  - Resolve drops into insertions            │
//! │  - Apply mutations with validation          │
//! │  - Snapshot undo/redo                       │
//! │  - Property forms and outlines              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is source of truth**: outlines and forms are derived views
//! 2. **Single writer**: one session owns and mutates a document in place
//! 3. **Explicit outcomes**: a drop that lands nowhere says so
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formwork_blocks::BlockTypeRegistry;
//! use formwork_editor::{Document, EditSession};
//!
//! let doc = Document::load("form.json")?;
//! let mut session = EditSession::new(doc, BlockTypeRegistry::builtin())?;
//!
//! session.drag_start("text")?;
//! session.drag_end(Some("main.stack"))?;
//!
//! session.undo();
//! session.document.save()?;
//! ```

mod document;
mod drag;
mod errors;
mod mutations;
mod placement;
mod property_form;
mod render;
mod session;
mod undo_stack;

pub use document::{Document, DocumentStorage, FormContent, DEFAULT_ZONE};
pub use drag::{DragController, DragState, DropAction};
pub use errors::EditorError;
pub use mutations::{Effect, Mutation, MutationError, MutationResult};
pub use placement::{insert, resolve_location, unique_sibling_key, with_inserted, DropReason, DropTarget, Placement};
pub use property_form::{property_edit, property_form, property_values, PROPERTY_FORM_KEY};
pub use render::{render_outline, OutlineRenderer};
pub use session::EditSession;
pub use undo_stack::{MutationBatch, UndoStack};
