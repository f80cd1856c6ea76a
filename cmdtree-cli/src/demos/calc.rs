//! Calculator demo object.

use std::sync::Mutex;

use cmdtree_core::expr::{evaluate, ExecutionContext};
use cmdtree_core::{ContextObject, EvalError, Value};

/// Evaluates arithmetic and remembers what it was asked
#[derive(Debug, Default)]
pub struct Calc {
    history: Mutex<Vec<String>>,
}

impl Calc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `expression` with nothing but the builtins in scope
    pub fn calc(&self, expression: &str) -> Result<Value, EvalError> {
        self.history
            .lock()
            .map_err(|_| EvalError::object("calculator history is poisoned"))?
            .push(expression.to_string());
        evaluate(expression, &ExecutionContext::new())
    }

    pub fn history(&self) -> Result<Value, EvalError> {
        let history = self
            .history
            .lock()
            .map_err(|_| EvalError::object("calculator history is poisoned"))?;
        if history.is_empty() {
            return Ok(Value::from("history is empty..."));
        }
        Ok(Value::from(history.join("\n")))
    }
}

impl ContextObject for Calc {
    fn type_name(&self) -> &str {
        "Calc"
    }

    fn call_method(&self, method: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        match (method, args.as_slice()) {
            ("calc", [Value::Str(expression)]) => self.calc(expression),
            ("calc", _) => Err(EvalError::type_error("calc() takes one string")),
            ("history", []) => self.history(),
            _ => Err(EvalError::UnknownAttribute {
                owner: self.type_name().to_string(),
                name: method.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_records_history() {
        let calc = Calc::new();
        assert_eq!(calc.history().unwrap(), Value::from("history is empty..."));
        assert_eq!(calc.calc("1 + 2 * 3").unwrap(), Value::Int(7));
        assert_eq!(calc.calc("10 / 4").unwrap(), Value::Float(2.5));
        assert_eq!(calc.history().unwrap(), Value::from("1 + 2 * 3\n10 / 4"));
    }

    #[test]
    fn test_calc_errors() {
        let calc = Calc::new();
        assert_eq!(calc.calc("1 / 0").unwrap_err(), EvalError::DivisionByZero);
        assert!(calc.call_method("calc", vec![Value::Int(1)]).is_err());
        assert!(calc.call_method("reset", vec![]).is_err());
    }
}
