//! Application configuration for payloadforge.
//!
//! User config lives at `~/.payloadforge/payloadforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PayloadForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "payloadforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".payloadforge";

/// Fallback post title.
pub const DEFAULT_TITLE: &str = "Generated Blog Post";

/// Fallback meta description.
pub const DEFAULT_DESCRIPTION: &str = "Generated content for PayloadCMS";

/// `type` of the placeholder block.
pub const DEFAULT_BLOCK_TYPE: &str = "paragraph";

/// `content` of the placeholder block.
pub const DEFAULT_BLOCK_CONTENT: &str = "Generated content block";

/// Upstream field names carrying agent output, in priority order.
pub const DEFAULT_INPUT_FIELDS: [&str; 4] = ["output", "text", "response", "content"];

// ---------------------------------------------------------------------------
// Config structs (matching payloadforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Upstream input settings.
    #[serde(default)]
    pub input: InputSection,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Title used when the source has none.
    #[serde(default = "default_title")]
    pub title: String,

    /// Meta description used when the source has none.
    #[serde(default = "default_description")]
    pub description: String,

    /// `type` of the placeholder block.
    #[serde(default = "default_block_type")]
    pub block_type: String,

    /// `content` of the placeholder block.
    #[serde(default = "default_block_content")]
    pub block_content: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            block_type: default_block_type(),
            block_content: default_block_content(),
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.into()
}
fn default_description() -> String {
    DEFAULT_DESCRIPTION.into()
}
fn default_block_type() -> String {
    DEFAULT_BLOCK_TYPE.into()
}
fn default_block_content() -> String {
    DEFAULT_BLOCK_CONTENT.into()
}

/// `[input]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    /// Candidate field names, tried in order on each upstream item.
    #[serde(default = "default_input_fields")]
    pub fields: Vec<String>,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            fields: default_input_fields(),
        }
    }
}

fn default_input_fields() -> Vec<String> {
    DEFAULT_INPUT_FIELDS.iter().map(|f| f.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Runtime configs (derived from AppConfig)
// ---------------------------------------------------------------------------

/// Defaults applied by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeConfig {
    pub default_title: String,
    pub default_description: String,
    pub default_block_type: String,
    pub default_block_content: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for NormalizeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_title: config.defaults.title.clone(),
            default_description: config.defaults.description.clone(),
            default_block_type: config.defaults.block_type.clone(),
            default_block_content: config.defaults.block_content.clone(),
        }
    }
}

/// Upstream text-selection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Candidate field names in priority order.
    pub fields: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for InputConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            fields: config.input.fields.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.payloadforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PayloadForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.payloadforge/payloadforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PayloadForgeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PayloadForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    tracing::debug!(?path, "loaded config");
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PayloadForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = render_config(&AppConfig::default())?;

    std::fs::write(&path, content).map_err(|e| PayloadForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Serialize a config to pretty TOML.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| PayloadForgeError::config(e.to_string()))
}

/// Reject configs that would make normalization or text selection meaningless.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.input.fields.is_empty() {
        return Err(PayloadForgeError::config("input.fields must not be empty"));
    }
    if config.input.fields.iter().any(|f| f.trim().is_empty()) {
        return Err(PayloadForgeError::config("input.fields contains an empty name"));
    }

    let defaults = &config.defaults;
    for (key, value) in [
        ("title", &defaults.title),
        ("description", &defaults.description),
        ("block_type", &defaults.block_type),
        ("block_content", &defaults.block_content),
    ] {
        if value.trim().is_empty() {
            return Err(PayloadForgeError::config(format!(
                "defaults.{key} must not be empty"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = render_config(&config).expect("serialize default config");
        assert!(toml_str.contains("Generated Blog Post"));
        assert!(toml_str.contains("response"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = render_config(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.description, DEFAULT_DESCRIPTION);
        assert_eq!(parsed.input.fields, DEFAULT_INPUT_FIELDS);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
title = "Untitled Draft"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.title, "Untitled Draft");
        assert_eq!(config.defaults.block_type, DEFAULT_BLOCK_TYPE);
        assert_eq!(config.input.fields.len(), 4);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn runtime_configs_from_app_config() {
        let mut app = AppConfig::default();
        app.input.fields = vec!["answer".into()];
        app.defaults.description = "Draft".into();

        let input = InputConfig::from(&app);
        assert_eq!(input.fields, vec!["answer".to_string()]);

        let normalize = NormalizeConfig::from(&app);
        assert_eq!(normalize.default_description, "Draft");
        assert_eq!(normalize.default_title, DEFAULT_TITLE);
    }

    #[test]
    fn empty_field_list_rejected() {
        let mut config = AppConfig::default();
        config.input.fields.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("input.fields"));
    }

    #[test]
    fn blank_default_rejected() {
        let mut config = AppConfig::default();
        config.defaults.block_content = "  ".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("defaults.block_content"));
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/payloadforge.toml")).unwrap_err();
        assert!(matches!(err, PayloadForgeError::Io { .. }));
    }
}
