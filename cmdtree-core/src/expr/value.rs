//! # Values
//!
//! Runtime values of the expression language and the coercion rules used by
//! argument binding.

use std::fmt;
use std::sync::Arc;

use super::context::ContextObject;
use crate::error::EvalError;

/// Type tags, also usable as values (`int`, `str`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    List,
    Type,
    Builtin,
    Object,
}

impl ValueType {
    /// The display name of this type
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::NoneType => "NoneType",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::List => "list",
            ValueType::Type => "type",
            ValueType::Builtin => "builtin_function",
            ValueType::Object => "object",
        }
    }

    /// Look up a constructible type by its builtin name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(ValueType::Bool),
            "int" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            "str" => Some(ValueType::Str),
            "list" => Some(ValueType::List),
            _ => None,
        }
    }

    /// Convert a value into this type.
    ///
    /// Strings convert to `bool` only through the literals `True` and
    /// `False`; any other text is rejected instead of being judged by
    /// emptiness.
    pub fn coerce(&self, value: &Value) -> Result<Value, EvalError> {
        let fail = || EvalError::Conversion {
            value: value.repr(),
            found: value.type_name(),
            expected: self.name().to_string(),
        };

        match (self, value) {
            (ValueType::Bool, Value::Bool(_))
            | (ValueType::Int, Value::Int(_))
            | (ValueType::Float, Value::Float(_))
            | (ValueType::Str, Value::Str(_))
            | (ValueType::List, Value::List(_)) => Ok(value.clone()),

            (ValueType::Bool, Value::Str(s)) => match s.as_str() {
                "True" => Ok(Value::Bool(true)),
                "False" => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },
            (ValueType::Bool, other) => Ok(Value::Bool(other.is_truthy())),

            (ValueType::Int, Value::Bool(b)) => Ok(Value::Int(i64::from(*b))),
            (ValueType::Int, Value::Float(f)) => {
                if f.is_finite() && f.trunc().abs() < i64::MAX as f64 {
                    Ok(Value::Int(f.trunc() as i64))
                } else {
                    Err(fail())
                }
            }
            (ValueType::Int, Value::Str(s)) => {
                s.trim().parse::<i64>().map(Value::Int).map_err(|_| fail())
            }

            (ValueType::Float, Value::Bool(b)) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            (ValueType::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
            (ValueType::Float, Value::Str(s)) => {
                s.trim().parse::<f64>().map(Value::Float).map_err(|_| fail())
            }

            (ValueType::Str, other) => Ok(Value::Str(other.to_string())),

            (ValueType::List, Value::Str(s)) => Ok(Value::List(
                s.chars().map(|c| Value::Str(c.to_string())).collect(),
            )),

            _ => Err(fail()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Functions available without any execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    Abs,
    Min,
    Max,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "len" => Some(Builtin::Len),
            "abs" => Some(Builtin::Abs),
            "min" => Some(Builtin::Min),
            "max" => Some(Builtin::Max),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::Abs => "abs",
            Builtin::Min => "min",
            Builtin::Max => "max",
        }
    }
}

/// A runtime value
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Type(ValueType),
    Builtin(Builtin),
    Object(Arc<dyn ContextObject>),
}

impl Value {
    /// Wrap a domain object
    pub fn object(object: impl ContextObject + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// The type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::None => ValueType::NoneType,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::List(_) => ValueType::List,
            Value::Type(_) => ValueType::Type,
            Value::Builtin(_) => ValueType::Builtin,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// The apparent type name, domain objects report their own
    pub fn type_name(&self) -> String {
        match self {
            Value::Object(obj) => obj.type_name().to_string(),
            other => other.value_type().name().to_string(),
        }
    }

    /// Falsy values: `None`, `False`, zero, empty string, empty list
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Type(_) | Value::Builtin(_) | Value::Object(_) => true,
        }
    }

    /// Numeric view used by arithmetic and comparisons; bools count as ints
    pub(crate) fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Int(i64::from(*b))),
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// Literal representation: strings quoted and escaped, lists of literals
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => quote_str(s),
            Value::List(items) => format!(
                "[{}]",
                items.iter().map(|v| v.repr()).collect::<Vec<_>>().join(", ")
            ),
            other => other.to_string(),
        }
    }
}

/// Numeric operand after bool promotion
#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(_) => write!(f, "{}", self.repr()),
            Value::Type(t) => write!(f, "{}", t.name()),
            Value::Builtin(b) => write!(f, "<built-in function {}>", b.name()),
            Value::Object(obj) => write!(f, "{}", obj.describe()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(obj) => write!(f, "Object({})", obj.type_name()),
            other => write!(f, "{}({})", other.value_type().name(), other.repr()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return match (a, b) {
                (Number::Int(x), Number::Int(y)) => x == y,
                (x, y) => x.as_f64() == y.as_f64(),
            };
        }

        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("plain".into()).to_string(), "plain");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::from("a")]).to_string(),
            "[1, 'a']"
        );
    }

    #[test]
    fn test_repr_quoting() {
        assert_eq!(Value::from("Brian").repr(), "'Brian'");
        assert_eq!(Value::from("it's").repr(), "\"it's\"");
        assert_eq!(Value::from("a\nb").repr(), "'a\\nb'");
        assert_eq!(Value::Int(7).repr(), "7");
    }

    #[test]
    fn test_bool_coercion_is_lexical() {
        assert_eq!(ValueType::Bool.coerce(&Value::from("True")).unwrap(), Value::Bool(true));
        assert_eq!(ValueType::Bool.coerce(&Value::from("False")).unwrap(), Value::Bool(false));
        // A non-empty string is not automatically true
        assert!(ValueType::Bool.coerce(&Value::from("false")).is_err());
        assert!(ValueType::Bool.coerce(&Value::from("yes")).is_err());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(ValueType::Int.coerce(&Value::from("42")).unwrap(), Value::Int(42));
        assert_eq!(ValueType::Int.coerce(&Value::from(" 7 ")).unwrap(), Value::Int(7));
        assert_eq!(ValueType::Float.coerce(&Value::from("1.5")).unwrap(), Value::Float(1.5));
        assert_eq!(ValueType::Float.coerce(&Value::Int(3)).unwrap(), Value::Float(3.0));

        let err = ValueType::Int.coerce(&Value::from("abc")).unwrap_err();
        assert!(matches!(err, EvalError::Conversion { ref found, ref expected, .. }
            if found == "str" && expected == "int"));
    }

    #[test]
    fn test_equality_crosses_numeric_types() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::from("1"), Value::Int(1));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::Int(-1).is_truthy());
    }
}
