//! # Configuration Loader
//!
//! Loads and merges engine settings from multiple sources:
//! 1. Default values (lowest priority)
//! 2. Settings file (middle priority)
//! 3. Environment variables (highest priority)

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConfigError, Result};

/// Settings loader with support for file and environment variable overrides
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Path to the settings file
    config_path: PathBuf,

    /// Environment variable prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: "CMDTREE".to_string(),
        }
    }
}

impl ConfigLoader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader reading a specific settings file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: "CMDTREE".to_string(),
        }
    }

    /// Use a custom environment prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// The settings file this loader reads, if it exists
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn default_config_path() -> PathBuf {
        if let Ok(config_path) = env::var("CMDTREE_CONFIG") {
            return PathBuf::from(config_path);
        }

        let possible_paths = [
            PathBuf::from("cmdtree.toml"),
            dirs::config_dir()
                .map(|d| d.join("cmdtree").join("cmdtree.toml"))
                .unwrap_or_else(|| PathBuf::from("/etc/cmdtree/cmdtree.toml")),
        ];

        for path in &possible_paths {
            if path.exists() {
                return path.clone();
            }
        }

        possible_paths[0].clone()
    }

    /// Load settings with full hierarchy
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. Settings file (if it exists)
    /// 3. Environment variables
    pub fn load(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig::default();

        if self.config_path.exists() {
            let file_config = self.load_from_file()?;
            config = merge_file_config(config, file_config);
            debug!("Loaded engine settings from {:?}", self.config_path);
        }

        config = self.merge_env_config(config)?;

        config.validate()?;

        Ok(config)
    }

    fn load_from_file(&self) -> Result<FileConfig> {
        let content = std::fs::read_to_string(&self.config_path).map_err(|e| {
            ConfigError::settings(format!(
                "Failed to read settings file '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConfigError::settings(format!(
                "Failed to parse settings file '{}': {}",
                self.config_path.display(),
                e
            ))
        })
    }

    fn merge_env_config(&self, mut config: EngineConfig) -> Result<EngineConfig> {
        let var = |name: &str| env::var(format!("{}_{}", self.env_prefix, name)).ok();

        if let Some(val) = var("VERSION") {
            config.version = Some(val);
        }
        if let Some(val) = var("ALIASES") {
            config.aliases = parse_bool(&val, "ALIASES")?;
        }
        if let Some(val) = var("HELP_COMMAND") {
            config.help_command = optional_name(val);
        }
        if let Some(val) = var("VERSION_COMMAND") {
            config.version_command = optional_name(val);
        }
        if let Some(val) = var("DESCRIPTION_COMMAND") {
            config.description_command = val;
        }
        if let Some(val) = var("NAMED_PREFIX") {
            config.named_prefix = parse_char(&val, "NAMED_PREFIX")?;
        }

        Ok(config)
    }
}

fn merge_file_config(mut base: EngineConfig, file: FileConfig) -> EngineConfig {
    if let Some(version) = file.version {
        base.version = Some(version);
    }
    if let Some(aliases) = file.aliases {
        base.aliases = aliases;
    }
    if let Some(name) = file.help_command {
        base.help_command = optional_name(name);
    }
    if let Some(name) = file.version_command {
        base.version_command = optional_name(name);
    }
    if let Some(name) = file.description_command {
        base.description_command = name;
    }
    if let Some(prefix) = file.named_prefix {
        base.named_prefix = prefix;
    }
    base
}

/// `"none"` (any case) disables a synthetic command
fn optional_name(name: String) -> Option<String> {
    if name.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(name)
    }
}

fn parse_bool(s: &str, name: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::settings(format!(
            "Invalid {} '{}': must be 'true' or 'false'",
            name, s
        ))),
    }
}

fn parse_char(s: &str, name: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::settings(format!(
            "Invalid {} '{}': must be a single character",
            name, s
        ))),
    }
}

/// Settings file layout; every field optional to allow partial files
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    version: Option<String>,
    aliases: Option<bool>,
    help_command: Option<String>,
    version_command: Option<String>,
    description_command: Option<String>,
    named_prefix: Option<char>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_loader_with_path() {
        let loader = ConfigLoader::with_path("/custom/cmdtree.toml");
        assert_eq!(loader.config_path(), Path::new("/custom/cmdtree.toml"));
        assert_eq!(loader.env_prefix, "CMDTREE");
    }

    #[test]
    fn test_load_from_file_success() {
        let toml_content = r#"
            version = "calc 0.1.0"
            aliases = false
            version_command = "none"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ConfigLoader::with_path(temp_file.path())
            .prefix("CMDTREE_TEST_FILE")
            .load()
            .unwrap();

        assert_eq!(config.version.as_deref(), Some("calc 0.1.0"));
        assert!(!config.aliases);
        assert!(config.version_command.is_none());
        // Untouched values keep their defaults
        assert_eq!(config.help_command.as_deref(), Some("help"));
        assert_eq!(config.named_prefix, '-');
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let config = ConfigLoader::with_path("/nonexistent/path/cmdtree.toml")
            .prefix("CMDTREE_TEST_MISSING")
            .load()
            .unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_env_priority_over_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"version = \"from file\"\naliases = true\n")
            .unwrap();

        env::set_var("CMDTREE_TEST_ENV_VERSION", "from env");
        env::set_var("CMDTREE_TEST_ENV_ALIASES", "off");
        env::set_var("CMDTREE_TEST_ENV_NAMED_PREFIX", "+");

        let config = ConfigLoader::with_path(temp_file.path())
            .prefix("CMDTREE_TEST_ENV")
            .load()
            .unwrap();

        assert_eq!(config.version.as_deref(), Some("from env"));
        assert!(!config.aliases);
        assert_eq!(config.named_prefix, '+');

        env::remove_var("CMDTREE_TEST_ENV_VERSION");
        env::remove_var("CMDTREE_TEST_ENV_ALIASES");
        env::remove_var("CMDTREE_TEST_ENV_NAMED_PREFIX");
    }

    #[test]
    fn test_invalid_env_values() {
        env::set_var("CMDTREE_TEST_BAD_ALIASES", "maybe");
        let result = ConfigLoader::with_path("/nonexistent/cmdtree.toml")
            .prefix("CMDTREE_TEST_BAD")
            .load();
        env::remove_var("CMDTREE_TEST_BAD_ALIASES");
        assert!(matches!(result, Err(ConfigError::Settings(_))));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"named_prefix = \"x\"\n").unwrap();

        let result = ConfigLoader::with_path(temp_file.path())
            .prefix("CMDTREE_TEST_INVALID")
            .load();
        assert!(matches!(result, Err(ConfigError::Settings(_))));
    }

    #[test]
    fn test_parse_helpers() {
        assert!(parse_bool("YES", "X").unwrap());
        assert!(parse_bool("nope", "X").is_err());
        assert_eq!(parse_char("/", "X").unwrap(), '/');
        assert!(parse_char("--", "X").is_err());
        assert_eq!(optional_name("None".into()), None);
        assert_eq!(optional_name("aide".into()), Some("aide".into()));
    }
}
