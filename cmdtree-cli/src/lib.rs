//! # cmdtree CLI Library
//!
//! Front end for [`cmdtree_core`]: loads command documents named on the
//! command line (or a bundled demo), runs one invocation and prints the
//! result.

pub mod cli;
pub mod demos;

pub use cli::{CommandContext, CommandError, ExitCode, GlobalOptions};
pub use demos::DemoProfile;
