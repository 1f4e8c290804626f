use anyhow::Context;
use formwork_blocks::{BlockGroup, BlockTypeRegistry};
use formwork_editor::DEFAULT_ZONE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "formwork.config.json";

/// Formwork configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Form document edited by default, relative to the config
    #[serde(default = "default_document")]
    pub document: String,

    /// Zone used when a command names none
    #[serde(default = "default_zone")]
    pub default_zone: String,

    /// Log filter when no `-v` is given (`error`, `warn`, `info`, ...)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Block types added to the builtin catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_groups: Vec<BlockGroup>,
}

fn default_document() -> String {
    "form.json".to_string()
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute path to the form document
    pub fn document_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.document)
    }

    /// Builtin block catalog extended with the configured groups
    pub fn registry(&self) -> anyhow::Result<BlockTypeRegistry> {
        self.block_groups
            .iter()
            .cloned()
            .try_fold(BlockTypeRegistry::builtin(), |registry, group| {
                let id = group.id.clone();
                registry
                    .with_group(group)
                    .with_context(|| format!("Cannot register block group '{}'", id))
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            default_zone: default_zone(),
            log_level: default_log_level(),
            block_groups: vec![],
        }
    }
}
