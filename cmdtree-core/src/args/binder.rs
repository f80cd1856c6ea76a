//! # Argument Binder
//!
//! Matches split values against a runnable command's [`ArgumentSpec`]s.
//!
//! Named values are bound first, by exact name or by first-letter alias.
//! Positional values then fill the remaining specs in declaration order.
//! Whatever is still unbound takes its default, or is reported missing.

use indexmap::IndexMap;
use tracing::debug;

use super::split::SplitArgs;
use crate::error::{ConfigError, DispatchError, UsageError};
use crate::expr::{evaluate, evaluate_type, Namespace, Value};
use crate::tree::ArgumentSpec;

/// Placeholder standing for the candidate value inside `check` expressions
pub const CHECK_PLACEHOLDER: &str = "%a";

/// Bound values keyed by argument name, in binding order
pub type BoundArguments = IndexMap<String, Value>;

/// Binds arguments, resolving `type`, `check` and `default` expressions in `ns`
pub struct Binder<'a> {
    ns: &'a dyn Namespace,
}

impl<'a> Binder<'a> {
    pub fn new(ns: &'a dyn Namespace) -> Self {
        Self { ns }
    }

    /// Bind `split` against `specs`.
    ///
    /// Usage errors stop at the first offending value, except missing
    /// arguments which are collected and reported together.
    pub fn bind(
        &self,
        split: SplitArgs,
        specs: &[ArgumentSpec],
    ) -> Result<BoundArguments, DispatchError> {
        let mut unmatched: Vec<&ArgumentSpec> = specs.iter().collect();
        let mut bound = BoundArguments::with_capacity(specs.len());

        for (key, raw) in split.named {
            let index = find_named(&unmatched, &key)
                .ok_or_else(|| UsageError::UnknownArgument(key.clone()))?;
            let spec = unmatched.remove(index);
            if spec.name != key {
                debug!(alias = %key, argument = %spec.name, "Argument alias resolved");
            }
            let value = self.check_value(spec, raw)?;
            bound.insert(spec.name.clone(), value);
        }

        let mut positionals = split.positionals.into_iter();
        while !unmatched.is_empty() {
            let Some(raw) = positionals.next() else {
                break;
            };
            let spec = unmatched.remove(0);
            let value = self.check_value(spec, raw)?;
            bound.insert(spec.name.clone(), value);
        }

        let surplus: Vec<String> = positionals.collect();
        if !surplus.is_empty() {
            return Err(UsageError::TooManyArguments(surplus).into());
        }

        let mut missing = Vec::new();
        for spec in unmatched {
            match &spec.default {
                Some(expression) => {
                    let value = evaluate(expression, self.ns).map_err(|e| {
                        ConfigError::DefaultFailed {
                            name: spec.name.clone(),
                            expression: expression.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    bound.insert(spec.name.clone(), value);
                }
                None => missing.push(spec.name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(UsageError::MissingArguments(missing).into());
        }

        Ok(bound)
    }

    /// Coerce, validate and finally shape one raw value
    fn check_value(&self, spec: &ArgumentSpec, raw: String) -> Result<Value, DispatchError> {
        let mut value = Value::Str(raw);

        if let Some(type_expr) = &spec.arg_type {
            let target = evaluate_type(type_expr, self.ns).map_err(|e| {
                ConfigError::UnresolvableType {
                    name: spec.name.clone(),
                    reason: e.to_string(),
                }
            })?;
            value = target.coerce(&value).map_err(|_| UsageError::TypeMismatch {
                name: spec.name.clone(),
                found: value.type_name(),
                expected: target.name().to_string(),
            })?;
        }

        if let Some(check) = &spec.check {
            let source = check.replace(CHECK_PLACEHOLDER, &value.repr());
            let verdict = evaluate(&source, self.ns).map_err(|e| ConfigError::CheckFailed {
                name: spec.name.clone(),
                check: check.clone(),
                reason: e.to_string(),
            })?;
            match verdict {
                Value::None | Value::Bool(true) => {}
                Value::Str(message) => return Err(UsageError::Validation(message).into()),
                _ => return Err(UsageError::invalid_value(&spec.name).into()),
            }
        }

        if spec.repr {
            value = Value::Str(value.repr());
        }

        Ok(value)
    }
}

/// Exact name first, then the first spec allowing a same-letter alias
fn find_named(unmatched: &[&ArgumentSpec], key: &str) -> Option<usize> {
    unmatched.iter().position(|s| s.name == key).or_else(|| {
        let first = key.chars().next()?;
        unmatched
            .iter()
            .position(|s| s.reduct && s.alias() == Some(first))
    })
}
