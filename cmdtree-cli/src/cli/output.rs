//! # Output Formatting
//!
//! Rendering of one invocation's outcome, as plain text or JSON.

use std::io::{self, Write};

use cmdtree_core::{DispatchError, UsageError};
use serde_json::json;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// What one invocation produced
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationReport {
    /// The tokens as given on the command line
    pub command: Vec<String>,
    pub outcome: Result<String, UsageError>,
}

impl InvocationReport {
    /// Report for `tokens`; configuration errors are not reports
    pub fn from_dispatch(
        tokens: &[String],
        result: Result<String, DispatchError>,
    ) -> Result<Self, cmdtree_core::ConfigError> {
        let outcome = match result {
            Ok(output) => Ok(output),
            Err(DispatchError::Usage(err)) => Err(err),
            Err(DispatchError::Config(err)) => return Err(err),
        };
        Ok(Self {
            command: tokens.to_vec(),
            outcome,
        })
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The text `process` would have returned
    pub fn text(&self) -> String {
        match &self.outcome {
            Ok(output) => output.clone(),
            Err(err) => err.to_string(),
        }
    }
}

/// Format a report for display
pub fn format_output(report: &InvocationReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(report),
        OutputFormat::Plain => report.text(),
    }
}

/// Format a report as JSON
pub fn format_json(report: &InvocationReport) -> String {
    let value = match &report.outcome {
        Ok(result) => json!({
            "status": "success",
            "command": report.command,
            "result": result,
        }),
        Err(err) => json!({
            "status": "error",
            "command": report.command,
            "error": err.to_string(),
        }),
    };

    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// Print a report to stdout
pub fn print_output(report: &InvocationReport, format: OutputFormat) {
    println!("{}", format_output(report, format));
}

/// Print a report to a writer
pub fn write_output<W: Write>(
    writer: &mut W,
    report: &InvocationReport,
    format: OutputFormat,
) -> io::Result<()> {
    writeln!(writer, "{}", format_output(report, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: Result<String, UsageError>) -> InvocationReport {
        InvocationReport {
            command: vec!["calc".to_string(), "1+1".to_string()],
            outcome,
        }
    }

    #[test]
    fn test_format_json_success() {
        let json: serde_json::Value =
            serde_json::from_str(&format_json(&report(Ok("2".into())))).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["result"], "2");
        assert_eq!(json["command"][0], "calc");
    }

    #[test]
    fn test_format_json_usage_error() {
        let outcome = Err(UsageError::CommandNotFound("calx".into()));
        let json: serde_json::Value = serde_json::from_str(&format_json(&report(outcome))).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Command 'calx' doesn't exist !");
    }

    #[test]
    fn test_plain_is_process_text() {
        let failed = report(Err(UsageError::MissingArguments(vec!["a".into()])));
        assert!(!failed.is_success());
        assert_eq!(format_output(&failed, OutputFormat::Plain), "Missing argument: 'a' !");
    }

    #[test]
    fn test_write_output() {
        let mut buffer = Vec::new();
        write_output(&mut buffer, &report(Ok("2".into())), OutputFormat::Plain).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "2\n");
    }

    #[test]
    fn test_config_errors_are_not_reports() {
        let tokens = vec!["x".to_string()];
        let fatal = DispatchError::Config(cmdtree_core::ConfigError::settings("bad"));
        assert!(InvocationReport::from_dispatch(&tokens, Err(fatal)).is_err());
    }
}
