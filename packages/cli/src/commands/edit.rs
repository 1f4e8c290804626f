use super::{finish_edit, open_session, parse_value};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use formwork_editor::Mutation;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Block type id (see `formwork blocks`)
    pub block_type: String,

    /// Drop target, e.g. `main` or `main.stack` (defaults to the default zone)
    pub target: Option<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Dotted key path of the block, e.g. `stack.text`
    pub key_path: String,

    #[arg(short, long)]
    pub zone: Option<String>,
}

#[derive(Debug, Args)]
pub struct SetPropArgs {
    /// Dotted key path of the block
    pub key_path: String,

    pub property: String,

    /// JSON value, or plain text
    pub value: String,

    #[arg(short, long)]
    pub zone: Option<String>,
}

/// Drag a new block of a type onto a drop target
pub fn add(args: AddArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut session = open_session(config, cwd)?;
    let target = args.target.unwrap_or_else(|| config.default_zone.clone());

    session.drag_start(&args.block_type)?;
    match session.drag_end(Some(&target))? {
        Some(result) => finish_edit(&mut session, &result),
        None => Ok(()),
    }
}

pub fn remove(args: RemoveArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut session = open_session(config, cwd)?;
    let result = session.apply(&Mutation::RemoveBlock {
        zone: args.zone.unwrap_or_else(|| config.default_zone.clone()),
        key_path: args.key_path,
    })?;
    finish_edit(&mut session, &result)
}

pub fn set_prop(args: SetPropArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut session = open_session(config, cwd)?;
    let result = session.apply(&Mutation::SetProperty {
        zone: args.zone.unwrap_or_else(|| config.default_zone.clone()),
        key_path: args.key_path,
        property: args.property,
        value: parse_value(&args.value),
    })?;
    finish_edit(&mut session, &result)
}
