//! # CLI Module
//!
//! Glue between the command line and the dispatcher: loading documents,
//! formatting results and mapping outcomes to exit codes.

pub mod context;
pub mod error;
pub mod output;

pub use context::{CommandContext, GlobalOptions};
pub use error::CommandError;
pub use output::{InvocationReport, OutputFormat};

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The invocation produced a result (usage errors included, unless strict)
    Success = 0,

    /// A usage error in strict mode
    UsageError = 1,

    /// The command line itself could not be parsed
    InvalidInvocation = 2,

    /// A command document or the settings are broken
    ConfigError = 3,
}

impl ExitCode {
    /// Integer value of the exit code
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::UsageError => "Invocation rejected",
            ExitCode::InvalidInvocation => "Invalid command line",
            ExitCode::ConfigError => "Broken command document or settings",
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UsageError.as_i32(), 1);
        assert_eq!(ExitCode::ConfigError.as_i32(), 3);
        assert_eq!(ExitCode::ConfigError.description(), "Broken command document or settings");
    }
}
