//! # Error Handling
//!
//! Fatal CLI errors and their colored rendering. Usage errors of the
//! dispatcher are not errors here: they are results, see
//! [`output`](crate::cli::output).

use std::fmt;

use cmdtree_core::ConfigError;

use crate::cli::ExitCode;

/// A failure that stops the CLI, with hints for fixing it
#[derive(Debug)]
pub struct CommandError {
    pub message: String,
    pub suggestions: Vec<String>,
    pub exit_code: ExitCode,
}

impl CommandError {
    /// Create a new command error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestions: Vec::new(),
            exit_code: ExitCode::ConfigError,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set exit code
    pub fn with_exit_code(mut self, code: ExitCode) -> Self {
        self.exit_code = code;
        self
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        let error = CommandError::new(err.to_string());
        match err {
            ConfigError::Parse(_) | ConfigError::MalformedTree { .. } => error
                .with_suggestion("Every command needs exactly one of 'commands' or 'return'")
                .with_suggestion("Check the command document is a mapping of command names"),
            ConfigError::DuplicateArgument { .. } => {
                error.with_suggestion("Argument names must be unique within a command")
            }
            ConfigError::UnresolvableType { .. }
            | ConfigError::CheckFailed { .. }
            | ConfigError::DefaultFailed { .. } => error
                .with_suggestion("Fix the expression in the command document")
                .with_suggestion("Objects used by expressions must be in the execution context"),
            ConfigError::Io(_) => error.with_suggestion("Check the file path passed with --commands"),
            ConfigError::Settings(_) => {
                error.with_suggestion("Check the settings file and CMDTREE_* environment variables")
            }
        }
    }
}

/// Format an error for display
pub fn format_error(error: &CommandError) -> String {
    use colored::*;

    let mut output = format!("{} {}\n", "Error:".red().bold(), error.message);

    if !error.suggestions.is_empty() {
        output.push_str(&format!("\n{}", "Suggestions:".cyan().bold()));
        for (i, suggestion) in error.suggestions.iter().enumerate() {
            output.push_str(&format!("\n  {}. {}", i + 1, suggestion));
        }
        output.push('\n');
    }

    output
}

/// Print an error to stderr
pub fn print_error(error: &CommandError) {
    eprintln!("{}", format_error(error));
}

/// Format a warning message
pub fn format_warning(message: &str) -> String {
    use colored::*;
    format!("{} {}", "Warning:".yellow().bold(), message)
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}", format_warning(message));
}
