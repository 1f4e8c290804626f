pub mod blocks;
pub mod edit;
pub mod form;
pub mod init;
pub mod show;
pub mod values;

pub use blocks::{blocks, BlocksArgs};
pub use edit::{add, remove, set_prop, AddArgs, RemoveArgs, SetPropArgs};
pub use form::{form, FormArgs};
pub use init::{init, InitArgs};
pub use show::{show, ShowArgs};
pub use values::{get_value, set_value, GetValueArgs, SetValueArgs};

use crate::config::Config;
use anyhow::{anyhow, Result};
use formwork_editor::{Document, EditSession, Effect, MutationResult};
use colored::Colorize;
use serde_json::Value;

/// Open the configured document for editing
pub fn open_session(config: &Config, cwd: &str) -> Result<EditSession> {
    let path = config.document_path(cwd);
    if !path.exists() {
        return Err(anyhow!(
            "Document {} does not exist. Run `formwork init` first",
            path.display()
        ));
    }

    let document = Document::load(path)?;
    Ok(EditSession::new(document, config.registry()?)?)
}

/// Save when the last edit changed something, and report what it did
pub fn finish_edit(session: &mut EditSession, result: &MutationResult) -> Result<()> {
    match &result.effect {
        Effect::Inserted { zone, key_path } => {
            println!("  {} Added {}", "✓".green(), format!("{}.{}", zone, key_path).bright_white());
        }
        Effect::Removed(block) => {
            println!("  {} Removed {} ({})", "✓".green(), block.key.bright_white(), block.block_type);
        }
        Effect::Updated => println!("  {} Updated", "✓".green()),
        Effect::Dropped(reason) => {
            println!("  {} Nothing added: {}", "⚠️".yellow(), reason);
        }
        Effect::Unchanged => println!("  {} Nothing to change", "⚠️".yellow()),
    }

    if session.document.is_dirty() {
        session.document.save()?;
    }
    Ok(())
}

/// Parse a command line value as JSON, falling back to a plain string
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
