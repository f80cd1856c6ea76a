//! # Command Tree
//!
//! The loaded, merged command configuration. Every node is either a
//! [`CommandGroup`] with named children or a [`RunnableCommand`] carrying a
//! result template and its argument specs.
//!
//! Groups keep their children in declaration order (help listings walk them
//! in that order) while still offering constant-time lookup by name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod loader;

pub use loader::{CommandSource, HELP_TEMPLATE};

/// A node of the command tree
#[derive(Debug, Clone, PartialEq)]
pub enum CommandNode {
    Group(CommandGroup),
    Runnable(RunnableCommand),
}

impl CommandNode {
    /// True iff the node carries a result template
    pub fn is_runnable(&self) -> bool {
        matches!(self, CommandNode::Runnable(_))
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            CommandNode::Group(group) => group.description.as_deref(),
            CommandNode::Runnable(command) => command.description.as_deref(),
        }
    }

    pub fn as_group(&self) -> Option<&CommandGroup> {
        match self {
            CommandNode::Group(group) => Some(group),
            CommandNode::Runnable(_) => None,
        }
    }

    pub fn as_runnable(&self) -> Option<&RunnableCommand> {
        match self {
            CommandNode::Runnable(command) => Some(command),
            CommandNode::Group(_) => None,
        }
    }
}

/// An internal node with named children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandGroup {
    pub description: Option<String>,
    pub commands: IndexMap<String, CommandNode>,
}

impl CommandGroup {
    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Child names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(|k| k.as_str())
    }

    /// The first child, in declaration order, sharing `token`'s first letter
    pub fn alias_for(&self, token: &str) -> Option<&str> {
        let first = token.chars().next()?;
        self.names().find(|name| name.starts_with(first))
    }
}

/// A leaf command
#[derive(Debug, Clone, PartialEq)]
pub struct RunnableCommand {
    pub description: Option<String>,
    /// Result template, `<name>` placeholders are replaced by bound values
    pub template: String,
    pub args: Vec<ArgumentSpec>,
    /// Whether the document declared `args` at all, even an empty list
    pub args_declared: bool,
}

impl RunnableCommand {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            description: None,
            template: template.into(),
            args: Vec::new(),
            args_declared: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_arg(mut self, arg: ArgumentSpec) -> Self {
        self.args.push(arg);
        self.args_declared = true;
        self
    }
}

/// Declaration of one argument of a runnable command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArgumentSpec {
    /// Unique within its command
    pub name: String,

    /// Expression naming the coercion target, e.g. `int`
    #[serde(rename = "type", default)]
    pub arg_type: Option<String>,

    /// Expression evaluated only when the argument is not supplied
    #[serde(default)]
    pub default: Option<String>,

    /// Whether the single-letter alias is accepted
    #[serde(default = "default_reduct")]
    pub reduct: bool,

    /// Validation expression, `%a` stands for the candidate value
    #[serde(default)]
    pub check: Option<String>,

    /// Bind the literal form (`'text'`) instead of the plain string
    #[serde(default)]
    pub repr: bool,
}

fn default_reduct() -> bool {
    true
}

impl ArgumentSpec {
    /// A required, untyped argument
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg_type: None,
            default: None,
            reduct: true,
            check: None,
            repr: false,
        }
    }

    pub fn with_type(mut self, arg_type: impl Into<String>) -> Self {
        self.arg_type = Some(arg_type.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    pub fn with_reduct(mut self, reduct: bool) -> Self {
        self.reduct = reduct;
        self
    }

    pub fn with_repr(mut self, repr: bool) -> Self {
        self.repr = repr;
        self
    }

    /// First letter, the alias accepted when `reduct` is set
    pub fn alias(&self) -> Option<char> {
        self.name.chars().next()
    }

    /// Shown in brackets in usage lines: the default is a non-empty expression
    pub fn is_optional(&self) -> bool {
        self.default.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// The root group plus lookups over it. Built once by
/// [`CommandTree::load`]; immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandTree {
    root: CommandGroup,
}

impl CommandTree {
    pub fn new(root: CommandGroup) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &CommandGroup {
        &self.root
    }

    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.root.get(name)
    }

    /// Number of top-level commands
    pub fn len(&self) -> usize {
        self.root.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.commands.is_empty()
    }

    /// Follow exact names from the root
    pub fn find(&self, path: &[&str]) -> Option<&CommandNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.get(first)?;
        for name in rest {
            node = node.as_group()?.get(name)?;
        }
        Some(node)
    }
}
