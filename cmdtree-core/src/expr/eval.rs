//! Tree-walking interpreter for parsed expressions.

use std::cmp::Ordering;

use super::context::{Builtins, Namespace};
use super::parser::{parse, BinaryOp, CompareOp, Expr, UnaryOp};
use super::value::{Builtin, Number, Value, ValueType};
use crate::error::EvalError;

/// Parse and evaluate `source`, resolving names through builtins then `ns`
pub fn evaluate(source: &str, ns: &dyn Namespace) -> Result<Value, EvalError> {
    let expr = parse(source)?;
    Interpreter { ns }.eval(&expr)
}

struct Interpreter<'a> {
    ns: &'a dyn Namespace,
}

impl Interpreter<'_> {
    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Name(name) => Builtins
                .lookup(name)
                .or_else(|| self.ns.lookup(name))
                .ok_or_else(|| EvalError::UnknownName(name.clone())),
            Expr::List(items) => Ok(Value::List(self.eval_all(items)?)),
            Expr::Attribute { target, name } => match self.eval(target)? {
                Value::Object(obj) => obj.get_attr(name),
                other => Err(EvalError::UnknownAttribute {
                    owner: other.type_name(),
                    name: name.clone(),
                }),
            },
            Expr::Call { callee, args } => {
                let callee = self.eval(callee)?;
                let args = self.eval_all(args)?;
                call(&callee, args)
            }
            Expr::MethodCall {
                target,
                method,
                args,
            } => {
                let target = self.eval(target)?;
                let args = self.eval_all(args)?;
                call_method(&target, method, args)
            }
            Expr::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                subscript(&target, &index)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnaryOp::Neg => match value.as_number() {
                        Some(Number::Int(i)) => i.checked_neg().map(Value::Int).ok_or(EvalError::Overflow),
                        Some(Number::Float(f)) => Ok(Value::Float(-f)),
                        None => Err(EvalError::type_error(format!(
                            "bad operand type for unary -: '{}'",
                            value.type_name()
                        ))),
                    },
                }
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(*op, &left, &right)
            }
            Expr::Compare { first, rest } => {
                let mut left = self.eval(first)?;
                for (op, next) in rest {
                    let right = self.eval(next)?;
                    if !compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            Expr::And(left, right) => {
                let left = self.eval(left)?;
                if left.is_truthy() {
                    self.eval(right)
                } else {
                    Ok(left)
                }
            }
            Expr::Or(left, right) => {
                let left = self.eval(left)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
            Expr::Conditional {
                body,
                condition,
                orelse,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.eval(body)
                } else {
                    self.eval(orelse)
                }
            }
        }
    }

    fn eval_all(&self, exprs: &[Expr]) -> Result<Vec<Value>, EvalError> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }
}

fn call(callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
    match callee {
        Value::Type(target) => match args.as_slice() {
            [value] => target.coerce(value),
            _ => Err(EvalError::type_error(format!(
                "{}() takes exactly one argument ({} given)",
                target.name(),
                args.len()
            ))),
        },
        Value::Builtin(builtin) => call_builtin(*builtin, args),
        Value::Object(obj) => obj.call(args),
        other => Err(EvalError::NotCallable(other.type_name())),
    }
}

fn call_builtin(builtin: Builtin, args: Vec<Value>) -> Result<Value, EvalError> {
    match builtin {
        Builtin::Len => match args.as_slice() {
            [Value::Str(s)] => Ok(Value::Int(s.chars().count() as i64)),
            [Value::List(items)] => Ok(Value::Int(items.len() as i64)),
            [other] => Err(EvalError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            ))),
            _ => Err(EvalError::type_error("len() takes exactly one argument")),
        },
        Builtin::Abs => match args.as_slice() {
            [value] => match value.as_number() {
                Some(Number::Int(i)) => i.checked_abs().map(Value::Int).ok_or(EvalError::Overflow),
                Some(Number::Float(f)) => Ok(Value::Float(f.abs())),
                None => Err(EvalError::type_error(format!(
                    "bad operand type for abs(): '{}'",
                    value.type_name()
                ))),
            },
            _ => Err(EvalError::type_error("abs() takes exactly one argument")),
        },
        Builtin::Min | Builtin::Max => {
            let items = match args.as_slice() {
                [Value::List(items)] => items.clone(),
                _ => args,
            };
            let wanted = if builtin == Builtin::Min {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            let mut iter = items.into_iter();
            let mut best = iter.next().ok_or_else(|| {
                EvalError::type_error(format!("{}() arg is an empty sequence", builtin.name()))
            })?;
            for item in iter {
                if order(&item, &best)? == wanted {
                    best = item;
                }
            }
            Ok(best)
        }
    }
}

fn call_method(target: &Value, method: &str, args: Vec<Value>) -> Result<Value, EvalError> {
    if let Value::Object(obj) = target {
        return obj.call_method(method, args);
    }

    let unknown = || EvalError::UnknownAttribute {
        owner: target.type_name(),
        name: method.to_string(),
    };

    let Value::Str(s) = target else {
        return Err(unknown());
    };

    match (method, args.as_slice()) {
        ("upper", []) => Ok(Value::Str(s.to_uppercase())),
        ("lower", []) => Ok(Value::Str(s.to_lowercase())),
        ("strip", []) => Ok(Value::Str(s.trim().to_string())),
        ("isdigit", []) => Ok(Value::Bool(
            !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
        )),
        ("startswith", [Value::Str(p)]) => Ok(Value::Bool(s.starts_with(p.as_str()))),
        ("endswith", [Value::Str(p)]) => Ok(Value::Bool(s.ends_with(p.as_str()))),
        ("upper" | "lower" | "strip" | "isdigit" | "startswith" | "endswith", _) => Err(
            EvalError::type_error(format!("bad arguments for str.{}()", method)),
        ),
        _ => Err(unknown()),
    }
}

fn subscript(target: &Value, index: &Value) -> Result<Value, EvalError> {
    let Value::Int(i) = index else {
        return Err(EvalError::type_error(format!(
            "indices must be integers, not '{}'",
            index.type_name()
        )));
    };

    let resolve = |len: usize| -> Result<usize, EvalError> {
        let len = len as i64;
        let pos = if *i < 0 { len + i } else { *i };
        if (0..len).contains(&pos) {
            Ok(pos as usize)
        } else {
            Err(EvalError::IndexOutOfRange)
        }
    };

    match target {
        Value::List(items) => Ok(items[resolve(items.len())?].clone()),
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            Ok(Value::Str(chars[resolve(chars.len())?].to_string()))
        }
        other => Err(EvalError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return arithmetic(op, a, b);
    }

    match (op, left, right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
        (BinaryOp::Add, Value::List(a), Value::List(b)) => {
            Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
        }
        (BinaryOp::Mul, Value::Str(s), Value::Int(n)) | (BinaryOp::Mul, Value::Int(n), Value::Str(s)) => {
            if repeated_len(s.len(), *n)? == 0 {
                return Ok(Value::Str(String::new()));
            }
            Ok(Value::Str(s.repeat(repeat_count(*n))))
        }
        (BinaryOp::Mul, Value::List(items), Value::Int(n))
        | (BinaryOp::Mul, Value::Int(n), Value::List(items)) => {
            let total = repeated_len(items.len(), *n)?;
            Ok(Value::List(items.iter().cycle().take(total).cloned().collect()))
        }
        _ => Err(EvalError::type_error(format!(
            "unsupported operand types for {}: '{}' and '{}'",
            symbol(op),
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Longest string (bytes) or list (items) a repetition may produce
pub const MAX_REPEAT_LEN: usize = 1 << 20;

/// Negative counts repeat zero times
fn repeat_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

fn repeated_len(len: usize, n: i64) -> Result<usize, EvalError> {
    match len.checked_mul(repeat_count(n)) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(total),
        _ => Err(EvalError::Overflow),
    }
}

fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
    }
}

fn arithmetic(op: BinaryOp, a: Number, b: Number) -> Result<Value, EvalError> {
    if let (Number::Int(x), Number::Int(y)) = (a, b) {
        let result = match op {
            BinaryOp::Add => x.checked_add(y),
            BinaryOp::Sub => x.checked_sub(y),
            BinaryOp::Mul => x.checked_mul(y),
            BinaryOp::Div => {
                if y == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                return Ok(Value::Float(x as f64 / y as f64));
            }
        };
        return result.map(Value::Int).ok_or(EvalError::Overflow);
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => {
            if y == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            x / y
        }
    };
    Ok(Value::Float(result))
}

fn order(left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    let ordering = match (left.as_number(), right.as_number()) {
        (Some(Number::Int(a)), Some(Number::Int(b))) => Some(a.cmp(&b)),
        (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()),
        _ => match (left, right) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => None,
        },
    };
    ordering.ok_or_else(|| {
        EvalError::type_error(format!(
            "can't compare '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ))
    })
}

fn contains(container: &Value, item: &Value) -> Result<bool, EvalError> {
    match (container, item) {
        (Value::List(items), _) => Ok(items.contains(item)),
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        _ => Err(EvalError::type_error(format!(
            "argument of type '{}' is not iterable",
            container.type_name()
        ))),
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    Ok(match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Lt => order(left, right)? == Ordering::Less,
        CompareOp::Le => order(left, right)? != Ordering::Greater,
        CompareOp::Gt => order(left, right)? == Ordering::Greater,
        CompareOp::Ge => order(left, right)? != Ordering::Less,
        CompareOp::In => contains(right, left)?,
        CompareOp::NotIn => !contains(right, left)?,
    })
}

/// Resolve a `type` expression to a type tag
pub fn evaluate_type(source: &str, ns: &dyn Namespace) -> Result<ValueType, EvalError> {
    match evaluate(source, ns)? {
        Value::Type(t) => Ok(t),
        other => Err(EvalError::type_error(format!(
            "expected a type, got '{}'",
            other.type_name()
        ))),
    }
}
