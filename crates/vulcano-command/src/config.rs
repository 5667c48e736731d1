use crate::command::CommandOptions;
use crate::error::{CommandError, Result};
use crate::types::OptionSource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Declarative overrides for one command function
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommandOverrides {
    /// Name of the function these overrides apply to
    pub function: String,

    /// Command name override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Short description override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Fixed visibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<bool>,

    /// Static option lists keyed by argument name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args_opts: HashMap<String, Vec<Value>>,
}

impl CommandOverrides {
    /// Convert into builder options
    pub fn into_options(self) -> CommandOptions {
        let mut options = CommandOptions {
            name: self.name,
            description: self.description,
            ..CommandOptions::default()
        };
        if let Some(show_if) = self.show_if {
            options.show_if = show_if.into();
        }
        options.args_opts = self
            .args_opts
            .into_iter()
            .map(|(arg, values)| (arg, OptionSource::Static(values)))
            .collect();
        options
    }
}

/// Configuration file format for command overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommandsConfig {
    /// Overrides, one entry per function
    pub commands: Vec<CommandOverrides>,
}

impl CommandsConfig {
    /// Find the overrides for a function
    pub fn get(&self, function: &str) -> Option<&CommandOverrides> {
        self.commands.iter().find(|c| c.function == function)
    }

    /// Builder options for a function, empty if it has no entry
    pub fn options_for(&self, function: &str) -> CommandOptions {
        self.get(function)
            .cloned()
            .map(CommandOverrides::into_options)
            .unwrap_or_default()
    }
}

/// Command overrides configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Load overrides from a YAML file
    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<CommandsConfig> {
        let content = read(path.as_ref())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load overrides from a JSON file
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<CommandsConfig> {
        let content = read(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load overrides from a file (auto-detect format)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<CommandsConfig> {
        let path = path.as_ref();
        match extension(path) {
            "yaml" | "yml" => Self::load_from_yaml(path),
            "json" => Self::load_from_json(path),
            _ => Err(unsupported()),
        }
    }

    /// Save overrides to a YAML file
    pub fn save_to_yaml<P: AsRef<Path>>(config: &CommandsConfig, path: P) -> Result<()> {
        let content = serde_yaml::to_string(config)?;
        write(path.as_ref(), content)
    }

    /// Save overrides to a JSON file
    pub fn save_to_json<P: AsRef<Path>>(config: &CommandsConfig, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        write(path.as_ref(), content)
    }

    /// Save overrides to a file (auto-detect format)
    pub fn save_to_file<P: AsRef<Path>>(config: &CommandsConfig, path: P) -> Result<()> {
        let path = path.as_ref();
        match extension(path) {
            "yaml" | "yml" => Self::save_to_yaml(config, path),
            "json" => Self::save_to_json(config, path),
            _ => Err(unsupported()),
        }
    }
}

fn extension(path: &Path) -> &str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}

fn unsupported() -> CommandError {
    CommandError::ConfigError("Unsupported file format. Use .yaml, .yml, or .json".to_string())
}

fn read(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Loading command overrides");
    Ok(fs::read_to_string(path)?)
}

fn write(path: &Path, content: String) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}
