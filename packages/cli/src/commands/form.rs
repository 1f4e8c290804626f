use super::{finish_edit, open_session, parse_value};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use formwork_blocks::set_value;
use formwork_editor::{render_outline, PROPERTY_FORM_KEY};

#[derive(Debug, Args)]
pub struct FormArgs {
    /// Dotted key path of the block to edit
    pub key_path: String,

    #[arg(short, long)]
    pub zone: Option<String>,

    /// Form field to change, as `path=value` (e.g. `properties.label=Email`)
    #[arg(short, long = "set", value_name = "PATH=VALUE")]
    pub sets: Vec<String>,
}

/// Show a block's property form, or submit edits made through it
pub fn form(args: FormArgs, config: &Config, cwd: &str) -> Result<()> {
    let mut session = open_session(config, cwd)?;
    let zone = args.zone.unwrap_or_else(|| config.default_zone.clone());
    let (layout, mut values) = session.edit_form(&zone, &args.key_path)?;

    if args.sets.is_empty() {
        let scope = session.scope(PROPERTY_FORM_KEY, false);
        println!("{} {}.{}", "Settings for".bright_blue().bold(), zone, args.key_path);
        print!("{}", render_outline(std::slice::from_ref(&layout), &scope, &values));
        return Ok(());
    }

    for assignment in &args.sets {
        let (path, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected PATH=VALUE, got '{}'", assignment))?;
        set_value(&mut values, path, parse_value(raw))?;
    }

    let result = session.submit_form(&zone, &args.key_path, &values)?;
    finish_edit(&mut session, &result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, init, AddArgs, InitArgs};
    use formwork_editor::Document;
    use serde_json::json;

    #[test]
    fn test_form_submit_updates_block() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        init(InitArgs { document: "form.json".to_string(), force: false }, &cwd).unwrap();
        let config = Config::load(&cwd).unwrap();
        add(AddArgs { block_type: "select".to_string(), target: None }, &config, &cwd).unwrap();

        form(
            FormArgs {
                key_path: "select".to_string(),
                zone: None,
                sets: vec![
                    "fieldKey=address.country".to_string(),
                    "properties.label=Country".to_string(),
                    "properties.size=large".to_string(),
                ],
            },
            &config,
            &cwd,
        )
        .unwrap();

        let doc = Document::load(config.document_path(&cwd)).unwrap();
        let select = doc.content().section("main").unwrap().find("select").unwrap();
        assert_eq!(select.field_key, "address.country");
        assert_eq!(select.property("label"), Some(&json!("Country")));
        assert_eq!(select.property("size"), Some(&json!("large")));
    }

    #[test]
    fn test_malformed_assignment_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        init(InitArgs { document: "form.json".to_string(), force: false }, &cwd).unwrap();
        let config = Config::load(&cwd).unwrap();
        add(AddArgs { block_type: "text".to_string(), target: None }, &config, &cwd).unwrap();

        let err = form(
            FormArgs {
                key_path: "text".to_string(),
                zone: None,
                sets: vec!["properties.label".to_string()],
            },
            &config,
            &cwd,
        )
        .unwrap_err();
        assert!(err.to_string().contains("PATH=VALUE"));
    }
}
