//! # Demo Profiles
//!
//! Bundled command documents, each with the domain objects its templates
//! call. `cmdtree --demo calculate calc "1 + 2"` runs one without any file.

use std::sync::Arc;

use clap::ValueEnum;
use cmdtree_core::{CommandSource, ExecutionContext};

pub mod calc;
pub mod logger;

pub use calc::Calc;
pub use logger::Logger;

/// A bundled demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoProfile {
    /// Plain templates, no domain object
    Basic,
    /// A calculator object with a history
    Calculate,
    /// A login session object
    Logger,
}

impl DemoProfile {
    pub fn name(&self) -> &'static str {
        match self {
            DemoProfile::Basic => "basic",
            DemoProfile::Calculate => "calculate",
            DemoProfile::Logger => "logger",
        }
    }

    /// The bundled command document
    pub fn document(&self) -> &'static str {
        match self {
            DemoProfile::Basic => include_str!("../../demos/basic.json"),
            DemoProfile::Calculate => include_str!("../../demos/calculate.json"),
            DemoProfile::Logger => include_str!("../../demos/logger.json"),
        }
    }

    pub fn source(&self) -> CommandSource {
        CommandSource::Json(self.document().to_string())
    }

    /// Version reported when the settings don't name one
    pub fn version(&self) -> String {
        format!("cmdtree: {} [{}]", self.name(), env!("CARGO_PKG_VERSION"))
    }

    /// Objects the demo's templates refer to
    pub fn context(&self) -> ExecutionContext {
        match self {
            DemoProfile::Basic => ExecutionContext::new(),
            DemoProfile::Calculate => ExecutionContext::new().with_object("calc", Arc::new(Calc::new())),
            DemoProfile::Logger => {
                ExecutionContext::new().with_object("logger", Arc::new(Logger::default()))
            }
        }
    }
}
