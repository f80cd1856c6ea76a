//! # Dispatcher
//!
//! Resolves a token sequence against the command tree and produces the
//! result string.
//!
//! ## Resolution
//!
//! ```text
//! tokens ─▶ walk groups ─▶ runnable ─▶ split ─▶ bind ─▶ render
//!               │
//!               ├─▶ --help / --version      (first token only)
//!               ├─▶ <cmd> --description     (any depth)
//!               └─▶ <cmd> --help            (any depth)
//! ```
//!
//! The walk never rewrites its input: alias resolution only affects the
//! returned path.

use tracing::debug;

use crate::args::{split, Binder, BoundArguments};
use crate::config::{EngineConfig, Markers};
use crate::error::{DispatchError, Result, UsageError};
use crate::expr::{ExecutionContext, Layered, Value};
use crate::help::{self, NO_DESCRIPTION};
use crate::template;
use crate::tree::{CommandGroup, CommandNode, CommandSource, CommandTree, RunnableCommand};

/// Name of the engine function behind the help command's template
const HELP_FUNCTION: &str = "help";

/// What a token sequence resolved to
#[derive(Debug)]
pub enum Outcome<'a> {
    /// `--help` as the only token
    FullHelp,
    /// `--version` as the only token
    Version,
    /// `<path> --description`
    Description {
        path: Vec<String>,
        node: &'a CommandNode,
    },
    /// `<path> --help`, or a group path with nothing after it
    CommandHelp {
        path: Vec<String>,
        node: &'a CommandNode,
    },
    /// A runnable command with its arguments bound
    Run(ResolvedInvocation<'a>),
}

/// A runnable command reached by the walk
#[derive(Debug)]
pub struct ResolvedInvocation<'a> {
    /// Index of the command's own token
    pub index: usize,
    /// Canonical names from the root down to the command
    pub path: Vec<String>,
    pub command: &'a RunnableCommand,
    pub bound: BoundArguments,
}

/// The engine: an immutable command tree plus the caller's context
#[derive(Debug)]
pub struct Dispatcher {
    tree: CommandTree,
    config: EngineConfig,
    markers: Markers,
    context: ExecutionContext,
    /// Names owned by the engine, shadowing the caller's context
    engine_scope: ExecutionContext,
    full_help: String,
}

impl Dispatcher {
    /// Wrap a tree that already went through [`CommandTree::load`]
    pub fn new(tree: CommandTree, context: ExecutionContext, config: EngineConfig) -> Self {
        let full_help = help::full_help(&tree, config.named_prefix);

        let listing = full_help.clone();
        let engine_scope = ExecutionContext::new()
            .with_function(HELP_FUNCTION, move |_| Ok(Value::Str(listing.clone())));

        Self {
            markers: config.markers(),
            tree,
            config,
            context,
            engine_scope,
            full_help,
        }
    }

    /// Validate `config`, load `sources` and build the dispatcher
    pub fn from_sources(
        sources: &[CommandSource],
        context: ExecutionContext,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let tree = CommandTree::load(sources, &config)?;
        Ok(Self::new(tree, context, config))
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `tokens` and return the result string.
    ///
    /// Usage errors become the returned message; only a broken command tree
    /// fails.
    pub fn process<S: AsRef<str>>(&self, tokens: &[S]) -> Result<String> {
        match self.try_process(tokens) {
            Ok(output) => Ok(output),
            Err(DispatchError::Usage(err)) => {
                debug!(error = ?err, "Invocation rejected");
                Ok(err.to_string())
            }
            Err(DispatchError::Config(err)) => Err(err),
        }
    }

    /// Like [`process`](Self::process), keeping usage errors typed
    pub fn try_process<S: AsRef<str>>(&self, tokens: &[S]) -> Result<String, DispatchError> {
        let outcome = self.resolve(tokens)?;
        Ok(self.render(&outcome))
    }

    /// Walk the tree and bind arguments, without rendering anything
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Outcome<'_>, DispatchError> {
        if tokens.is_empty() {
            return Err(UsageError::EmptyInvocation.into());
        }

        let first = tokens[0].as_ref();
        if first.starts_with(self.markers.lead.as_str()) {
            if tokens.len() > 1 {
                return Err(UsageError::InvalidUsage(first.to_string()).into());
            }
            if self.markers.help.as_deref() == Some(first) {
                return Ok(Outcome::FullHelp);
            }
            if self.markers.version.as_deref() == Some(first) {
                return Ok(Outcome::Version);
            }
        }

        self.walk(self.tree.root(), tokens, 0, Vec::new())
    }

    fn walk<'a, S: AsRef<str>>(
        &'a self,
        group: &'a CommandGroup,
        tokens: &[S],
        index: usize,
        mut path: Vec<String>,
    ) -> Result<Outcome<'a>, DispatchError> {
        let token = tokens[index].as_ref();
        let name = self.canonical(group, token);
        let node = group
            .get(name)
            .ok_or_else(|| UsageError::CommandNotFound(token.to_string()))?;
        path.push(name.to_string());

        let next = tokens.get(index + 1).map(|t| t.as_ref());
        if let Some(next) = next {
            if Markers::selects(&self.markers.description, next) {
                return Ok(Outcome::Description { path, node });
            }
            if let Some(help) = &self.markers.help {
                if Markers::selects(help, next) {
                    return Ok(Outcome::CommandHelp { path, node });
                }
            }
        }

        match node {
            CommandNode::Runnable(command) => {
                let split = split(&tokens[index + 1..], &self.markers)?;
                let scope = Layered::new(&self.engine_scope, &self.context);
                let bound = Binder::new(&scope).bind(split, &command.args)?;
                debug!(command = %path.join("."), arguments = bound.len(), "Command resolved");
                Ok(Outcome::Run(ResolvedInvocation {
                    index,
                    path,
                    command,
                    bound,
                }))
            }
            CommandNode::Group(child) => match next {
                None => Ok(Outcome::CommandHelp { path, node }),
                Some(_) => self.walk(child, tokens, index + 1, path),
            },
        }
    }

    /// The child name `token` stands for; aliases never shadow an exact name
    fn canonical<'a>(&self, group: &'a CommandGroup, token: &'a str) -> &'a str {
        if !self.config.aliases || group.contains(token) {
            return token;
        }
        match group.alias_for(token) {
            Some(name) => {
                debug!(alias = token, command = name, "Command alias resolved");
                name
            }
            None => token,
        }
    }

    /// Turn a resolved outcome into the result string
    pub fn render(&self, outcome: &Outcome<'_>) -> String {
        match outcome {
            Outcome::FullHelp => self.full_help.clone(),
            Outcome::Version => self.version().to_string(),
            Outcome::Description { node, .. } => {
                node.description().unwrap_or(NO_DESCRIPTION).to_string()
            }
            Outcome::CommandHelp { path, node } => help::command_help(
                node,
                path,
                self.config.aliases,
                self.config.named_prefix,
            ),
            Outcome::Run(invocation) => {
                let scope = Layered::new(&self.engine_scope, &self.context);
                template::render(&invocation.command.template, &invocation.bound, &scope)
            }
        }
    }

    /// The configured version, `None` when unset
    pub fn version(&self) -> &str {
        self.config.version.as_deref().unwrap_or("None")
    }

    /// Help listing of the whole tree
    pub fn full_help(&self) -> &str {
        &self.full_help
    }
}
