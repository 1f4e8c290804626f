use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_editor::Document;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Form document to create
    #[arg(short, long, default_value = "form.json")]
    pub document: String,

    /// Force overwrite existing config and document
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Formwork project...".bright_blue().bold());

    let config = Config {
        document: args.document.clone(),
        ..Config::default()
    };

    let document_path = config.document_path(cwd);
    if !document_path.exists() || args.force {
        Document::create(&document_path).save()?;
        println!("  {} Created {}", "✓".green(), args.document);
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: formwork blocks");
    println!("  2. Run: formwork add text");
    println!("  3. Run: formwork show --editable");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_and_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                document: "forms/contact.json".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.document, "forms/contact.json");

        let doc = Document::load(config.document_path(&cwd)).unwrap();
        assert!(doc.content().section("main").unwrap().is_empty());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "document": "mine.json" }"#).unwrap();

        init(
            InitArgs {
                document: "form.json".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        assert_eq!(Config::load(&cwd).unwrap().document, "mine.json");
        assert!(!dir.path().join("form.json").exists());
    }
}
