//! # Command Context
//!
//! Everything needed to build a dispatcher from the command line: which
//! documents to load, which settings file to read and which demo objects
//! to expose.

use std::path::PathBuf;

use cmdtree_core::{CommandSource, ConfigLoader, Dispatcher, ExecutionContext};
use tracing::{debug, info};

use crate::cli::error::print_warning;
use crate::cli::{CommandError, ExitCode, OutputFormat};
use crate::demos::DemoProfile;

/// Options shared by every invocation
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub json: bool,
    pub strict: bool,
    pub verbose: bool,
}

/// Where the command tree and the engine settings come from
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub global_opts: GlobalOptions,

    /// Command documents, merged in order after the demo document
    pub documents: Vec<PathBuf>,

    /// Settings file; the loader's default lookup when absent
    pub config_path: Option<PathBuf>,

    pub demo: Option<DemoProfile>,
}

impl CommandContext {
    pub fn new(global_opts: GlobalOptions) -> Self {
        Self {
            global_opts,
            ..Self::default()
        }
    }

    /// Add a command document (builder style)
    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.documents.push(path.into());
        self
    }

    /// Use a settings file (builder style)
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use a demo profile (builder style)
    pub fn with_demo(mut self, demo: DemoProfile) -> Self {
        self.demo = Some(demo);
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.global_opts.json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain
        }
    }

    /// Exit code for an invocation that produced a result
    pub fn exit_code(&self, success: bool) -> ExitCode {
        if success || !self.global_opts.strict {
            ExitCode::Success
        } else {
            ExitCode::UsageError
        }
    }

    /// Load settings and documents and build the dispatcher
    pub fn dispatcher(&self) -> Result<Dispatcher, CommandError> {
        if self.demo.is_none() && self.documents.is_empty() {
            return Err(CommandError::new("No command document given")
                .with_exit_code(ExitCode::InvalidInvocation)
                .with_suggestion("Pass a document with --commands <FILE>")
                .with_suggestion("Or try a bundled one: --demo basic"));
        }

        let loader = match &self.config_path {
            Some(path) => {
                if !path.exists() {
                    print_warning(&format!(
                        "Settings file '{}' not found, using defaults",
                        path.display()
                    ));
                }
                ConfigLoader::with_path(path)
            }
            None => ConfigLoader::new(),
        };
        let mut config = loader.load()?;
        debug!(settings = ?loader.config_path(), "Engine settings loaded");

        let mut sources = Vec::with_capacity(self.documents.len() + 1);
        let mut context = ExecutionContext::new();
        if let Some(demo) = self.demo {
            info!(demo = demo.name(), "Using bundled demo");
            sources.push(demo.source());
            context = demo.context();
            if config.version.is_none() {
                config.version = Some(demo.version());
            }
        }
        sources.extend(self.documents.iter().map(CommandSource::file));

        Ok(Dispatcher::from_sources(&sources, context, config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_documents() {
        let err = CommandContext::default().dispatcher().unwrap_err();
        assert_eq!(err.exit_code, ExitCode::InvalidInvocation);
        assert!(!err.suggestions.is_empty());
    }

    #[test]
    fn test_demo_dispatcher() {
        let ctx = CommandContext::default()
            .with_config("/nonexistent/cmdtree.toml")
            .with_demo(DemoProfile::Basic);
        let d = ctx.dispatcher().unwrap();
        assert_eq!(d.process(&["add", "1", "2"]).unwrap(), "3");
    }

    #[test]
    fn test_missing_document_is_fatal() {
        let err = CommandContext::default()
            .with_config("/nonexistent/cmdtree.toml")
            .with_document("/nonexistent/commands.json")
            .dispatcher()
            .unwrap_err();
        assert_eq!(err.exit_code, ExitCode::ConfigError);
    }

    #[test]
    fn test_strict_exit_codes() {
        let relaxed = CommandContext::default();
        assert_eq!(relaxed.exit_code(false), ExitCode::Success);

        let strict = CommandContext::new(GlobalOptions {
            strict: true,
            ..GlobalOptions::default()
        });
        assert_eq!(strict.exit_code(false), ExitCode::UsageError);
        assert_eq!(strict.exit_code(true), ExitCode::Success);
        assert_eq!(strict.output_format(), OutputFormat::Plain);
    }
}
