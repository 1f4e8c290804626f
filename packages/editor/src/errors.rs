//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    Tree(#[from] formwork_blocks::TreeError),

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block not found: {zone}.{key_path}")]
    BlockNotFound { zone: String, key_path: String },

    #[error("Document is not file-backed")]
    NotFileBacked,
}
