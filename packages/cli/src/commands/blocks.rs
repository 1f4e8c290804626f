use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// List the block types that can be placed
pub fn blocks(args: BlocksArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(registry.list())?);
        return Ok(());
    }

    for group in registry.list() {
        println!("{}", group.title.bright_blue().bold());
        for descriptor in &group.blocks {
            let role = if descriptor.is_container { " [container]" } else { "" };
            println!(
                "  {:<10} {}{}",
                descriptor.id.bright_white(),
                descriptor.description,
                role.cyan()
            );
            for spec in &descriptor.properties {
                let choices = spec
                    .enum_values
                    .as_ref()
                    .map(|values| format!(" ({})", values.join(" | ")))
                    .unwrap_or_default();
                println!(
                    "      {} {}{} = {}",
                    spec.name,
                    spec.value_type.as_str().dimmed(),
                    choices,
                    spec.default
                );
            }
        }
        println!();
    }

    Ok(())
}
