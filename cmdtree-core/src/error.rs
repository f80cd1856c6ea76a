//! # Error Types
//!
//! Centralized error handling for the dispatcher.
//!
//! Failures fall into two classes:
//!
//! - [`UsageError`]: the end user typed something the command tree does not
//!   accept. These are rendered into the string result of
//!   [`Dispatcher::process`](crate::Dispatcher::process) and never abort.
//! - [`ConfigError`]: the command tree (or the engine settings) is broken.
//!   These surface as hard failures so authoring mistakes stay visible.
//!
//! [`EvalError`] belongs to the expression language. Inside result templates it
//! is swallowed (the template text is returned as-is); inside `type`, `check`
//! and `default` expressions it is promoted to a [`ConfigError`].

use thiserror::Error;

/// Result type alias for engine setup and fatal failures
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Quote a name the way messages present it: `'name'`
pub(crate) fn quoted(name: &str) -> String {
    format!("'{}'", name)
}

fn quoted_list(names: &[String]) -> String {
    names.iter().map(|n| quoted(n)).collect::<Vec<_>>().join(", ")
}

fn plural(names: &[String]) -> &'static str {
    if names.len() > 1 {
        "s"
    } else {
        ""
    }
}

/// Errors caused by the invocation itself (bad tokens, bad arguments)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    /// `process` was called without any token
    #[error("No command given, try '--help' !")]
    EmptyInvocation,

    /// The token does not name a child of the current group
    #[error("Command {} doesn't exist !", quoted(.0))]
    CommandNotFound(String),

    /// A leading `--` command was followed by more tokens
    #[error("Can't process arguments after {} !", quoted(.0))]
    InvalidUsage(String),

    /// A named argument key was the last token
    #[error("Missing value for argument {} !", quoted(.0))]
    MalformedArgs(String),

    /// The help or version marker appeared among a command's arguments
    #[error("You can't use version command or help command like this ({}) !", quoted(.0))]
    ReservedToken(String),

    /// A named argument matches no declared argument, exactly or by alias
    #[error("Invalid argument {} !", quoted(.0))]
    UnknownArgument(String),

    /// The raw value could not be converted to the declared type
    #[error("Got type {} instead of {} for arg: {}", quoted(.found), quoted(.expected), quoted(.name))]
    TypeMismatch {
        name: String,
        found: String,
        expected: String,
    },

    /// A check expression rejected the value
    #[error("{0}")]
    Validation(String),

    /// Arguments without default were not supplied
    #[error("Missing argument{}: {} !", plural(.0), quoted_list(.0))]
    MissingArguments(Vec<String>),

    /// More positional values than unmatched arguments
    #[error("Too many arguments, can't bind: {} !", quoted_list(.0))]
    TooManyArguments(Vec<String>),
}

impl UsageError {
    /// Create a generic validation failure for an argument
    pub fn invalid_value(name: &str) -> Self {
        Self::Validation(format!("Argument: {} has not valid value !", quoted(name)))
    }
}

/// Errors caused by a broken command tree or engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A command document is not a structured mapping of commands
    #[error("Failed to parse command document: {0}")]
    Parse(String),

    /// A node is not exactly one of group or runnable
    #[error("Command {} is malformed: {reason}", quoted(.path))]
    MalformedTree { path: String, reason: String },

    /// An argument name is declared twice for the same command
    #[error("Command {} declares argument {} more than once", quoted(.command), quoted(.name))]
    DuplicateArgument { command: String, name: String },

    /// A `type` expression does not evaluate to a type
    #[error("Can't get argument type for arg {}: {reason}", quoted(.name))]
    UnresolvableType { name: String, reason: String },

    /// A `check` expression cannot be evaluated
    #[error("Can't execute check {} for arg {}: {reason}", quoted(.check), quoted(.name))]
    CheckFailed {
        name: String,
        check: String,
        reason: String,
    },

    /// A `default` expression cannot be evaluated
    #[error("Default argument {} for arg {} can't be executed: {reason}", quoted(.expression), quoted(.name))]
    DefaultFailed {
        name: String,
        expression: String,
        reason: String,
    },

    /// I/O errors while reading documents or settings
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid engine settings
    #[error("Settings error: {0}")]
    Settings(String),
}

impl ConfigError {
    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new malformed tree error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new settings error
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

/// Any failure of a single invocation
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Recoverable, reported to the user as the result string
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Fatal, the command tree needs fixing
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DispatchError {
    /// Whether this error is caused by user input
    pub fn is_usage(&self) -> bool {
        matches!(self, DispatchError::Usage(_))
    }

    /// The usage error, if this is one
    pub fn as_usage(&self) -> Option<&UsageError> {
        match self {
            DispatchError::Usage(err) => Some(err),
            DispatchError::Config(_) => None,
        }
    }
}

/// Expression language failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The source text is not a valid expression
    #[error("syntax error at {position}: {message}")]
    Syntax { position: usize, message: String },

    /// A name is neither a builtin nor in the execution context
    #[error("name {} is not defined", quoted(.0))]
    UnknownName(String),

    /// An attribute or method does not exist on a value
    #[error("{} object has no attribute {}", quoted(.owner), quoted(.name))]
    UnknownAttribute { owner: String, name: String },

    /// The value cannot be called
    #[error("{} object is not callable", quoted(.0))]
    NotCallable(String),

    /// An operation was applied to values of the wrong type
    #[error("type error: {0}")]
    Type(String),

    /// A value could not be converted to the requested type
    #[error("can't convert {} value {value} to {}", quoted(.found), quoted(.expected))]
    Conversion {
        value: String,
        found: String,
        expected: String,
    },

    /// Integer arithmetic left the i64 range
    #[error("integer overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("index out of range")]
    IndexOutOfRange,

    /// Raised by a domain object
    #[error("{0}")]
    Object(String),
}

impl EvalError {
    /// Create a new syntax error
    pub fn syntax(position: usize, msg: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: msg.into(),
        }
    }

    /// Create a new type error
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    /// Create a new domain object error
    pub fn object(msg: impl Into<String>) -> Self {
        Self::Object(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arguments_message() {
        let one = UsageError::MissingArguments(vec!["name".to_string()]);
        assert_eq!(one.to_string(), "Missing argument: 'name' !");

        let two = UsageError::MissingArguments(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(two.to_string(), "Missing arguments: 'a', 'b' !");
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = UsageError::TypeMismatch {
            name: "count".to_string(),
            found: "str".to_string(),
            expected: "int".to_string(),
        };
        assert_eq!(err.to_string(), "Got type 'str' instead of 'int' for arg: 'count'");
    }

    #[test]
    fn test_dispatch_error_classes() {
        let usage: DispatchError = UsageError::EmptyInvocation.into();
        assert!(usage.is_usage());
        assert_eq!(usage.as_usage(), Some(&UsageError::EmptyInvocation));

        let config: DispatchError = ConfigError::settings("bad prefix").into();
        assert!(!config.is_usage());
        assert!(config.as_usage().is_none());
        assert_eq!(config.to_string(), "Settings error: bad prefix");
    }

    #[test]
    fn test_invalid_value_message() {
        let err = UsageError::invalid_value("port");
        assert_eq!(err.to_string(), "Argument: 'port' has not valid value !");
    }
}
