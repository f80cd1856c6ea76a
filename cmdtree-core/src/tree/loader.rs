//! # Command Document Loader
//!
//! Parses command documents (JSON, YAML or TOML), checks the node
//! invariants, merges documents by top-level name and injects the synthetic
//! help and version commands.
//!
//! A document maps command names to nodes:
//!
//! ```json
//! {
//!     "greet": {
//!         "description": "Say hello",
//!         "args": ["name", {"name": "times", "type": "int", "default": "1"}],
//!         "return": "'Hello <name> ' * <times>"
//!     },
//!     "math": {
//!         "commands": { "add": { "args": ["a", "b"], "return": "<a> + <b>" } }
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{ArgumentSpec, CommandGroup, CommandNode, CommandTree, RunnableCommand};
use crate::config::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::expr::Value;

/// Template of the synthetic help command, resolved by the engine's `help` builtin
pub const HELP_TEMPLATE: &str = "help()";

/// Where a command document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    Json(String),
    Yaml(String),
    Toml(String),
    /// Format chosen by extension (`.yaml`/`.yml`, `.toml`, anything else JSON)
    File(PathBuf),
}

impl CommandSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        CommandSource::File(path.into())
    }

    fn parse(&self) -> Result<RawDocument> {
        match self {
            CommandSource::Json(text) => {
                serde_json::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
            }
            CommandSource::Yaml(text) => {
                serde_yaml::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
            }
            CommandSource::Toml(text) => {
                toml::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
            }
            CommandSource::File(path) => {
                let text = std::fs::read_to_string(path)?;
                Self::for_path(path, text).parse().map_err(|e| match e {
                    ConfigError::Parse(msg) => {
                        ConfigError::parse(format!("{}: {}", path.display(), msg))
                    }
                    other => other,
                })
            }
        }
    }

    fn for_path(path: &Path, text: String) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => CommandSource::Yaml(text),
            Some("toml") => CommandSource::Toml(text),
            _ => CommandSource::Json(text),
        }
    }
}

type RawDocument = IndexMap<String, RawNode>;

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    commands: Option<IndexMap<String, RawNode>>,
    #[serde(rename = "return", default)]
    template: Option<String>,
    #[serde(default)]
    args: Option<Vec<RawArgument>>,
}

/// An argument is either a bare name or a full spec
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArgument {
    Name(String),
    Spec(ArgumentSpec),
}

impl From<RawArgument> for ArgumentSpec {
    fn from(raw: RawArgument) -> Self {
        match raw {
            RawArgument::Name(name) => ArgumentSpec::new(name),
            RawArgument::Spec(spec) => spec,
        }
    }
}

fn build_node(path: &str, raw: RawNode) -> Result<CommandNode> {
    match (raw.commands, raw.template) {
        (Some(_), Some(_)) => Err(ConfigError::malformed(
            path,
            "declares both 'commands' and 'return'",
        )),
        (None, None) => Err(ConfigError::malformed(
            path,
            "is not runnable and has no commands in it",
        )),
        (Some(children), None) => {
            if raw.args.is_some() {
                warn!(command = path, "Ignoring 'args' declared on a command group");
            }
            let mut commands = IndexMap::with_capacity(children.len());
            for (name, child) in children {
                let child_path = format!("{}.{}", path, name);
                commands.insert(name, build_node(&child_path, child)?);
            }
            Ok(CommandNode::Group(CommandGroup {
                description: raw.description,
                commands,
            }))
        }
        (None, Some(template)) => {
            let args_declared = raw.args.is_some();
            let args: Vec<ArgumentSpec> = raw
                .args
                .unwrap_or_default()
                .into_iter()
                .map(ArgumentSpec::from)
                .collect();

            for (i, arg) in args.iter().enumerate() {
                if arg.name.is_empty() {
                    return Err(ConfigError::malformed(path, "declares an argument without name"));
                }
                if args[..i].iter().any(|a| a.name == arg.name) {
                    return Err(ConfigError::DuplicateArgument {
                        command: path.to_string(),
                        name: arg.name.clone(),
                    });
                }
            }

            Ok(CommandNode::Runnable(RunnableCommand {
                description: raw.description,
                template,
                args,
                args_declared,
            }))
        }
    }
}

impl CommandTree {
    /// Load, merge and finish a tree: the shape every dispatcher expects
    pub fn load(sources: &[CommandSource], config: &EngineConfig) -> Result<Self> {
        let mut tree = Self::merge(sources)?;
        tree.inject_builtins(config);
        info!(
            commands = tree.len(),
            sources = sources.len(),
            "Command tree loaded"
        );
        Ok(tree)
    }

    /// Merge documents by top-level name, later sources overwrite earlier ones
    pub fn merge(sources: &[CommandSource]) -> Result<Self> {
        let mut root = CommandGroup::default();

        for source in sources {
            for (name, raw) in source.parse()? {
                let node = build_node(&name, raw)?;
                if root.commands.insert(name.clone(), node).is_some() {
                    debug!(command = %name, "Command replaced by a later document");
                }
            }
        }

        Ok(Self { root })
    }

    /// Add the synthetic version and help commands.
    ///
    /// They take precedence over configured commands of the same name, so
    /// `--help` and `help` always agree.
    pub fn inject_builtins(&mut self, config: &EngineConfig) {
        if let Some(name) = &config.version_command {
            let template = match &config.version {
                Some(version) => Value::from(version.as_str()).repr(),
                None => Value::None.repr(),
            };
            self.inject(name, RunnableCommand::new(template));
        }

        if let Some(name) = &config.help_command {
            self.inject(name, RunnableCommand::new(HELP_TEMPLATE));
        }
    }

    fn inject(&mut self, name: &str, command: RunnableCommand) {
        let previous = self
            .root
            .commands
            .insert(name.to_string(), CommandNode::Runnable(command));
        if previous.is_some() {
            warn!(command = name, "Configured command overridden by the built-in one");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CALC: &str = r#"{
        "calc": {
            "description": "Evaluate an expression",
            "args": ["expression"],
            "return": "calc.calc(<expression>)"
        },
        "history": { "return": "calc.history()" }
    }"#;

    #[test]
    fn test_parse_json_document() {
        let tree = CommandTree::merge(&[CommandSource::Json(CALC.into())]).unwrap();
        assert_eq!(tree.root().names().collect::<Vec<_>>(), vec!["calc", "history"]);

        let calc = tree.get("calc").unwrap().as_runnable().unwrap();
        assert_eq!(calc.args, vec![ArgumentSpec::new("expression")]);
        assert_eq!(calc.description.as_deref(), Some("Evaluate an expression"));
    }

    #[test]
    fn test_empty_args_list_is_declared() {
        let doc = r#"{"a": {"args": [], "return": "1"}, "b": {"return": "2"}}"#;
        let tree = CommandTree::merge(&[CommandSource::Json(doc.into())]).unwrap();
        assert!(tree.get("a").unwrap().as_runnable().unwrap().args_declared);
        assert!(!tree.get("b").unwrap().as_runnable().unwrap().args_declared);
    }

    #[test]
    fn test_parse_yaml_and_toml() {
        let yaml = "
tools:
  description: Tools
  commands:
    ping:
      args:
        - name: host
          reduct: false
      return: \"'pong from <host>'\"
";
        let toml = r#"
[echo]
return = "<text>"
args = ["text"]
"#;
        let tree = CommandTree::merge(&[
            CommandSource::Yaml(yaml.into()),
            CommandSource::Toml(toml.into()),
        ])
        .unwrap();

        let ping = tree.find(&["tools", "ping"]).unwrap().as_runnable().unwrap();
        assert!(!ping.args[0].reduct);
        assert!(tree.get("echo").unwrap().is_runnable());
    }

    #[test]
    fn test_later_sources_overwrite() {
        let first = CommandSource::Json(r#"{"a": {"return": "1"}, "b": {"return": "2"}}"#.into());
        let second = CommandSource::Json(r#"{"a": {"return": "3"}}"#.into());
        let tree = CommandTree::merge(&[first, second]).unwrap();

        // Position of "a" is kept, its content replaced
        assert_eq!(tree.root().names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(tree.get("a").unwrap().as_runnable().unwrap().template, "3");
    }

    #[test]
    fn test_malformed_nodes() {
        let neither = CommandSource::Json(r#"{"g": {"commands": {"x": {"description": "?"}}}}"#.into());
        assert!(matches!(
            CommandTree::merge(&[neither]),
            Err(ConfigError::MalformedTree { ref path, .. }) if path == "g.x"
        ));

        let both = CommandSource::Json(r#"{"x": {"commands": {}, "return": "1"}}"#.into());
        assert!(matches!(
            CommandTree::merge(&[both]),
            Err(ConfigError::MalformedTree { .. })
        ));

        let dup = CommandSource::Json(r#"{"x": {"args": ["a", {"name": "a"}], "return": "1"}}"#.into());
        assert!(matches!(
            CommandTree::merge(&[dup]),
            Err(ConfigError::DuplicateArgument { ref name, .. }) if name == "a"
        ));
    }

    #[test]
    fn test_not_a_mapping() {
        let list = CommandSource::Json("[1, 2, 3]".into());
        assert!(matches!(CommandTree::merge(&[list]), Err(ConfigError::Parse(_))));

        let garbage = CommandSource::Json("{ not json".into());
        assert!(matches!(CommandTree::merge(&[garbage]), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_inject_builtins_override() {
        let source = CommandSource::Json(r#"{"help": {"return": "'mine'"}, "run": {"return": "1"}}"#.into());
        let config = EngineConfig::default().with_version("demo 1.0");
        let tree = CommandTree::load(&[source], &config).unwrap();

        assert_eq!(
            tree.root().names().collect::<Vec<_>>(),
            vec!["help", "run", "version"]
        );
        assert_eq!(tree.get("help").unwrap().as_runnable().unwrap().template, HELP_TEMPLATE);
        assert_eq!(
            tree.get("version").unwrap().as_runnable().unwrap().template,
            "'demo 1.0'"
        );
    }

    #[test]
    fn test_disabled_builtins_are_not_injected() {
        let config = EngineConfig::default()
            .with_help_command(None)
            .with_version_command(None);
        let tree = CommandTree::load(&[], &config).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_file_source_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(b"hello:\n  return: \"'hi'\"\n").unwrap();

        let tree = CommandTree::merge(&[CommandSource::file(file.path())]).unwrap();
        assert!(tree.get("hello").unwrap().is_runnable());

        let missing = CommandSource::file("/nonexistent/commands.json");
        assert!(matches!(CommandTree::merge(&[missing]), Err(ConfigError::Io(_))));
    }
}
