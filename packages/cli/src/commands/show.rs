use super::open_session;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Zone to show (all zones when omitted)
    pub zone: Option<String>,

    /// Mark drop zones with their target identifiers
    #[arg(short, long)]
    pub editable: bool,

    /// Print the raw document JSON
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs, config: &Config, cwd: &str) -> Result<()> {
    let session = open_session(config, cwd)?;

    if args.json {
        println!("{}", session.document.to_json()?);
        return Ok(());
    }

    let content = session.document.content();
    let zones: Vec<String> = match &args.zone {
        Some(zone) if content.section(zone).is_none() => return Err(anyhow!("Unknown zone: {}", zone)),
        Some(zone) => vec![zone.clone()],
        None => content.zones().map(str::to_string).collect(),
    };

    for zone in &zones {
        println!("{}", zone.bright_blue().bold());
        let outline = session.outline(zone, args.editable).unwrap_or_default();
        if outline.is_empty() {
            println!("  {}", "(empty)".dimmed());
        }
        for line in outline.lines() {
            println!("  {}", line);
        }
    }

    let orphans = content.orphaned_values();
    if !orphans.is_empty() {
        println!();
        println!("{} values without a field: {}", "⚠️".yellow(), orphans.join(", "));
    }

    Ok(())
}
