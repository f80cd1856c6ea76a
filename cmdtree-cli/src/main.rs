//! # cmdtree
//!
//! Run one command from a command document:
//!
//! ```text
//! cmdtree --commands commands.json greet -name Ada
//! cmdtree --demo calculate calc "6 * 7"
//! cmdtree --demo logger --help
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::{debug, info};

use cmdtree_cli::cli::error::print_error;
use cmdtree_cli::cli::output::{print_output, InvocationReport};
use cmdtree_cli::{CommandContext, CommandError, DemoProfile, ExitCode, GlobalOptions};

/// CLI structure
///
/// `--help` and `--version` belong to the command tree, the CLI's own
/// flags are `--cli-help` and `--cli-version`.
#[derive(Parser, Debug)]
#[command(name = "cmdtree")]
#[command(about = "Run commands described in a JSON, YAML or TOML document")]
#[command(version, disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Command document; repeat to merge several, later ones win
    #[arg(short = 'c', long = "commands", value_name = "FILE")]
    commands: Vec<PathBuf>,

    /// Engine settings file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use a bundled demo document
    #[arg(long, value_enum)]
    demo: Option<DemoProfile>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Exit with code 1 when the invocation is rejected
    #[arg(long)]
    strict: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print help for the cmdtree binary itself
    #[arg(long = "cli-help", action = ArgAction::Help)]
    #[allow(dead_code)]
    cli_help: Option<bool>,

    /// Print the cmdtree binary's version
    #[arg(long = "cli-version", action = ArgAction::Version)]
    #[allow(dead_code)]
    cli_version: Option<bool>,

    /// Tokens handed to the command tree
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

impl Cli {
    fn context(&self) -> CommandContext {
        let mut ctx = CommandContext::new(GlobalOptions {
            json: self.json,
            strict: self.strict,
            verbose: self.verbose,
        });
        ctx.documents = self.commands.clone();
        ctx.config_path = self.config.clone();
        ctx.demo = self.demo;
        ctx
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let ctx = cli.context();
    let dispatcher = ctx.dispatcher()?;

    debug!(tokens = ?cli.tokens, "Dispatching");
    let result = dispatcher.try_process(cli.tokens.as_slice());
    let report = InvocationReport::from_dispatch(&cli.tokens, result).map_err(CommandError::from)?;

    print_output(&report, ctx.output_format());
    Ok(ctx.exit_code(report.is_success()))
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => {
            info!(code = code.as_i32(), "Invocation finished");
            code.into()
        }
        Err(err) => match err.downcast::<CommandError>() {
            Ok(err) => {
                print_error(&err);
                err.exit_code.into()
            }
            Err(err) => {
                print_error(&CommandError::new(format!("{:#}", err)));
                ExitCode::ConfigError.into()
            }
        },
    }
}
