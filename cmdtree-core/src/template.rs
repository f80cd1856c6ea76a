//! # Result Templates
//!
//! A runnable command's `return` field is rendered in two steps: every
//! `<name>` placeholder is replaced by the bound value's string form, then
//! the text is evaluated as an expression. When evaluation fails the
//! substituted text itself is the result, so a template may be a live
//! expression (`calc.calc(<expr>)`) or plain text (`Hello <name>`).

use tracing::debug;

use crate::args::BoundArguments;
use crate::expr::{evaluate, Namespace};

/// Replace each `<name>` by the display form of its bound value
pub fn substitute(template: &str, bound: &BoundArguments) -> String {
    bound.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("<{}>", name), &value.to_string())
    })
}

/// Substitute, then evaluate; fall back to the substituted text
pub fn render(template: &str, bound: &BoundArguments, ns: &dyn Namespace) -> String {
    let source = substitute(template, bound);
    match evaluate(&source, ns) {
        Ok(value) => value.to_string(),
        Err(e) => {
            debug!(template = %source, error = %e, "Template kept as literal text");
            source
        }
    }
}
