//! # Engine Configuration
//!
//! Settings that shape how tokens are interpreted: reserved command names,
//! the named-argument prefix, alias matching and the version string.
//!
//! ## Configuration Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Environment Variables           │
//! │    CMDTREE_ALIASES=false                │
//! ├─────────────────────────────────────────┤
//! │         Settings File (cmdtree.toml)    │
//! │    aliases = false                      │
//! ├─────────────────────────────────────────┤
//! │         Default Values                  │
//! │    impl Default for EngineConfig        │
//! └─────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

mod loader;

pub use loader::ConfigLoader;

use crate::error::{ConfigError, Result};

/// Default name of the synthetic help command
pub const DEFAULT_HELP_COMMAND: &str = "help";
/// Default name of the synthetic version command
pub const DEFAULT_VERSION_COMMAND: &str = "version";
/// Default name of the description query
pub const DEFAULT_DESCRIPTION_COMMAND: &str = "description";
/// Default named-argument prefix
pub const DEFAULT_NAMED_PREFIX: char = '-';

/// Engine settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Answer to `--version`; `None` renders as `None`
    pub version: Option<String>,

    /// Resolve unknown command and argument names by their first letter
    pub aliases: bool,

    /// Name of the help command; `None` disables `--help` and the help node
    pub help_command: Option<String>,

    /// Name of the version command; `None` disables `--version` and the version node
    pub version_command: Option<String>,

    /// Name behind the description query (`--description`)
    pub description_command: String,

    /// First character of named-argument keys
    pub named_prefix: char,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: None,
            aliases: true,
            help_command: Some(DEFAULT_HELP_COMMAND.to_string()),
            version_command: Some(DEFAULT_VERSION_COMMAND.to_string()),
            description_command: DEFAULT_DESCRIPTION_COMMAND.to_string(),
            named_prefix: DEFAULT_NAMED_PREFIX,
        }
    }
}

impl EngineConfig {
    /// Set the version string
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Enable or disable alias matching
    pub fn with_aliases(mut self, aliases: bool) -> Self {
        self.aliases = aliases;
        self
    }

    /// Rename or disable the help command
    pub fn with_help_command(mut self, name: Option<&str>) -> Self {
        self.help_command = name.map(str::to_string);
        self
    }

    /// Rename or disable the version command
    pub fn with_version_command(mut self, name: Option<&str>) -> Self {
        self.version_command = name.map(str::to_string);
        self
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.named_prefix.is_alphanumeric() || self.named_prefix.is_whitespace() {
            return Err(ConfigError::settings(format!(
                "named prefix {:?} must be a punctuation character",
                self.named_prefix
            )));
        }

        if self.description_command.is_empty() {
            return Err(ConfigError::settings("description command cannot be empty"));
        }

        for (what, name) in [
            ("help", &self.help_command),
            ("version", &self.version_command),
        ] {
            if matches!(name, Some(n) if n.is_empty()) {
                return Err(ConfigError::settings(format!("{} command cannot be empty", what)));
            }
        }

        if self.help_command.is_some() && self.help_command == self.version_command {
            return Err(ConfigError::settings(
                "help and version commands must have different names",
            ));
        }

        Ok(())
    }

    /// Reserved tokens derived from these settings
    pub fn markers(&self) -> Markers {
        let lead = format!("{0}{0}", self.named_prefix);
        Markers {
            prefix: self.named_prefix,
            lead: lead.clone(),
            help: self.help_command.as_ref().map(|n| format!("{}{}", lead, n)),
            version: self.version_command.as_ref().map(|n| format!("{}{}", lead, n)),
            description: format!("{}{}", lead, self.description_command),
        }
    }
}

/// Reserved tokens, e.g. `--help`, `--version`, `--description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Named-argument prefix
    pub prefix: char,
    /// The prefix doubled, leading every marker
    pub lead: String,
    pub help: Option<String>,
    pub version: Option<String>,
    pub description: String,
}

impl Markers {
    /// Whether `token` is exactly the help or version marker
    pub fn is_reserved(&self, token: &str) -> bool {
        self.help.as_deref() == Some(token) || self.version.as_deref() == Some(token)
    }

    /// A non-empty `next` token that is a prefix of `marker` selects it
    pub fn selects(marker: &str, next: &str) -> bool {
        !next.is_empty() && marker.starts_with(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let markers = EngineConfig::default().markers();
        assert_eq!(markers.help.as_deref(), Some("--help"));
        assert_eq!(markers.version.as_deref(), Some("--version"));
        assert_eq!(markers.description, "--description");
        assert!(markers.is_reserved("--help"));
        assert!(!markers.is_reserved("--he"));
    }

    #[test]
    fn test_custom_prefix() {
        let config = EngineConfig {
            named_prefix: '+',
            ..EngineConfig::default()
        };
        let markers = config.markers();
        assert_eq!(markers.lead, "++");
        assert_eq!(markers.help.as_deref(), Some("++help"));
    }

    #[test]
    fn test_disabled_commands() {
        let config = EngineConfig::default()
            .with_help_command(None)
            .with_version_command(None);
        assert!(config.validate().is_ok());
        let markers = config.markers();
        assert!(markers.help.is_none());
        assert!(!markers.is_reserved("--help"));
    }

    #[test]
    fn test_selects_by_prefix() {
        assert!(Markers::selects("--description", "--d"));
        assert!(Markers::selects("--help", "--help"));
        assert!(!Markers::selects("--help", ""));
        assert!(!Markers::selects("--help", "--helpme"));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let bad_prefix = EngineConfig {
            named_prefix: 'x',
            ..EngineConfig::default()
        };
        assert!(bad_prefix.validate().is_err());

        let same_names = EngineConfig::default().with_version_command(Some("help"));
        assert!(same_names.validate().is_err());

        let empty = EngineConfig::default().with_help_command(Some(""));
        assert!(empty.validate().is_err());
    }
}
