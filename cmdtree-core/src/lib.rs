//! # cmdtree-core
//!
//! A declarative command-line dispatcher. Commands, their arguments and
//! what they return are described in a command document; the engine
//! resolves a token sequence against it, binds and validates arguments and
//! renders the command's result template.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Dispatcher                       │
//! │   tree walk · aliases · --help/--version/--description│
//! ├──────────────┬──────────────────┬────────────────────┤
//! │  args::split │  args::Binder    │  template::render  │
//! ├──────────────┴──────────────────┴────────────────────┤
//! │            expr (expression language)                │
//! ├──────────────────────────────────────────────────────┤
//! │     tree (CommandTree + loader)  ·  config           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use cmdtree_core::{CommandSource, Dispatcher, EngineConfig, ExecutionContext};
//!
//! let doc = r#"{
//!     "greet": { "args": ["name"], "return": "'Hello ' + <name>" }
//! }"#;
//!
//! let dispatcher = Dispatcher::from_sources(
//!     &[CommandSource::Json(doc.into())],
//!     ExecutionContext::new(),
//!     EngineConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(dispatcher.process(&["greet", "-n", "Ada"]).unwrap(), "Hello Ada");
//! assert_eq!(dispatcher.process(&["greet"]).unwrap(), "Missing argument: 'name' !");
//! ```

pub mod args;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod expr;
pub mod help;
pub mod template;
pub mod tree;

pub use args::{Binder, BoundArguments, SplitArgs};
pub use config::{ConfigLoader, EngineConfig, Markers};
pub use dispatch::{Dispatcher, Outcome, ResolvedInvocation};
pub use error::{ConfigError, DispatchError, EvalError, Result, UsageError};
pub use expr::{ContextObject, ExecutionContext, NativeFunction, Value, ValueType};
pub use tree::{ArgumentSpec, CommandGroup, CommandNode, CommandSource, CommandTree, RunnableCommand};
