//! # Execution Context
//!
//! Name resolution for expressions. The caller hands the engine an
//! [`ExecutionContext`] holding plain values and domain objects; templates
//! reach them by name.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::value::{Builtin, Value, ValueType};
use crate::error::EvalError;

/// A caller-provided object reachable from templates.
///
/// The engine only ever holds shared references. Objects that change state
/// when called (counters, sessions, histories) keep that state behind their
/// own lock.
pub trait ContextObject: Send + Sync {
    /// Name used in messages and type mismatch reports
    fn type_name(&self) -> &str;

    /// `obj.method(args)`
    fn call_method(&self, method: &str, _args: Vec<Value>) -> Result<Value, EvalError> {
        Err(EvalError::UnknownAttribute {
            owner: self.type_name().to_string(),
            name: method.to_string(),
        })
    }

    /// `obj.attr`
    fn get_attr(&self, name: &str) -> Result<Value, EvalError> {
        Err(EvalError::UnknownAttribute {
            owner: self.type_name().to_string(),
            name: name.to_string(),
        })
    }

    /// `obj(args)`
    fn call(&self, _args: Vec<Value>) -> Result<Value, EvalError> {
        Err(EvalError::NotCallable(self.type_name().to_string()))
    }

    /// String form when the object itself is the result
    fn describe(&self) -> String {
        format!("<{} object>", self.type_name())
    }
}

type NativeFn = dyn Fn(Vec<Value>) -> Result<Value, EvalError> + Send + Sync;

/// A plain function exposed as a callable object
pub struct NativeFunction {
    name: String,
    func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl ContextObject for NativeFunction {
    fn type_name(&self) -> &str {
        "function"
    }

    fn call(&self, args: Vec<Value>) -> Result<Value, EvalError> {
        (self.func)(args)
    }

    fn describe(&self) -> String {
        format!("<function {}>", self.name)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction").field("name", &self.name).finish()
    }
}

/// Something that resolves names to values
pub trait Namespace {
    fn lookup(&self, name: &str) -> Option<Value>;
}

/// Type names and builtin functions, visible in every expression
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins;

impl Namespace for Builtins {
    fn lookup(&self, name: &str) -> Option<Value> {
        ValueType::from_name(name)
            .map(Value::Type)
            .or_else(|| Builtin::from_name(name).map(Value::Builtin))
    }
}

/// Mapping from names to caller-provided values and objects
#[derive(Clone, Default)]
pub struct ExecutionContext {
    entries: IndexMap<String, Value>,
}

impl ExecutionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value (builder style)
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a domain object (builder style)
    pub fn with_object(mut self, name: impl Into<String>, object: Arc<dyn ContextObject>) -> Self {
        self.entries.insert(name.into(), Value::Object(object));
        self
    }

    /// Add a plain function (builder style)
    pub fn with_function<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        let name = name.into();
        let function = NativeFunction::new(name.clone(), func);
        self.entries.insert(name, Value::object(function));
        self
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Namespace for ExecutionContext {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Two namespaces searched in order, the first one wins
pub struct Layered<'a> {
    first: &'a dyn Namespace,
    second: &'a dyn Namespace,
}

impl<'a> Layered<'a> {
    pub fn new(first: &'a dyn Namespace, second: &'a dyn Namespace) -> Self {
        Self { first, second }
    }
}

impl Namespace for Layered<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.first.lookup(name).or_else(|| self.second.lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;

    impl ContextObject for Counter {
        fn type_name(&self) -> &str {
            "Counter"
        }
    }

    #[test]
    fn test_context_lookup_and_order() {
        let ctx = ExecutionContext::new()
            .with_value("limit", 3i64)
            .with_object("counter", Arc::new(Counter));

        assert_eq!(ctx.len(), 2);
        assert!(ctx.contains("counter"));
        assert_eq!(ctx.lookup("limit"), Some(Value::Int(3)));
        assert!(ctx.lookup("missing").is_none());
        assert_eq!(ctx.names().collect::<Vec<_>>(), vec!["limit", "counter"]);
    }

    #[test]
    fn test_builtins_namespace() {
        assert_eq!(Builtins.lookup("int"), Some(Value::Type(ValueType::Int)));
        assert_eq!(Builtins.lookup("len"), Some(Value::Builtin(Builtin::Len)));
        assert!(Builtins.lookup("open").is_none());
    }

    #[test]
    fn test_layered_prefers_first() {
        let engine = ExecutionContext::new().with_value("name", "engine");
        let user = ExecutionContext::new()
            .with_value("name", "user")
            .with_value("only_user", true);
        let scope = Layered::new(&engine, &user);

        assert_eq!(scope.lookup("name"), Some(Value::from("engine")));
        assert_eq!(scope.lookup("only_user"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_default_object_behaviour() {
        let counter = Counter;
        assert!(matches!(counter.call(vec![]), Err(EvalError::NotCallable(_))));
        assert!(matches!(
            counter.call_method("bump", vec![]),
            Err(EvalError::UnknownAttribute { .. })
        ));
        assert_eq!(counter.describe(), "<Counter object>");
    }

    #[test]
    fn test_native_function() {
        let ctx = ExecutionContext::new()
            .with_function("double", |args| match args.as_slice() {
                [Value::Int(i)] => Ok(Value::Int(i * 2)),
                _ => Err(EvalError::type_error("double() takes one int")),
            });

        let Some(Value::Object(func)) = ctx.lookup("double") else {
            panic!("double should be an object");
        };
        assert_eq!(func.call(vec![Value::Int(4)]).unwrap(), Value::Int(8));
        assert_eq!(func.describe(), "<function double>");
    }
}
