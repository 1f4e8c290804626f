use super::{finish_edit, open_session, parse_value};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_blocks::get_value_or;
use formwork_editor::Mutation;
use serde_json::Value;

#[derive(Debug, Args)]
pub struct SetValueArgs {
    /// Dotted value path, e.g. `person.name` or `tags[]` to append
    pub path: String,

    /// JSON value, or plain text
    pub value: String,
}

#[derive(Debug, Args)]
pub struct GetValueArgs {
    /// Dotted value path, e.g. `person.addresses.0.city`
    pub path: String,

    /// Printed when nothing is stored at the path
    #[arg(short, long)]
    pub default: Option<String>,
}

pub fn set_value(args: SetValueArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut session = open_session(config, cwd)?;
    let result = session.apply(&Mutation::SetValue {
        path: args.path,
        value: parse_value(&args.value),
    })?;
    finish_edit(&mut session, &result)
}

pub fn get_value(args: GetValueArgs, config: &Config, cwd: &str) -> Result<()> {
    let session = open_session(config, cwd)?;
    let fallback = args.default.as_deref().map(parse_value).unwrap_or(Value::Null);

    match get_value_or(&session.document.content().values, &args.path, fallback) {
        Value::Null => println!("{}", "(not set)".dimmed()),
        value => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}
