//! # Expression Language
//!
//! A small, closed expression language for result templates and for the
//! `type`, `check` and `default` fields of argument specs. It can read and
//! call what the caller placed in the [`ExecutionContext`] and nothing else:
//! there is no assignment, no import and no file or process access.
//!
//! ## Syntax
//!
//! - Literals: `42`, `1.5`, `'text'`, `"text"`, `True`, `False`, `None`, `[a, b]`
//! - Names: builtins (`int`, `float`, `str`, `bool`, `list`, `len`, `abs`,
//!   `min`, `max`) and context entries
//! - Postfix: `obj.attr`, `obj.method(..)`, `f(..)`, `xs[i]`
//! - Operators: `+ - * /`, `== != < <= > >= in not in`, `and or not`,
//!   `a if cond else b`
//!
//! Nesting deeper than [`parser::MAX_DEPTH`] is a syntax error, and a
//! repetition longer than [`eval::MAX_REPEAT_LEN`] is an overflow.
//!
//! ## Usage Example
//!
//! ```rust
//! use cmdtree_core::expr::{evaluate, ExecutionContext, Value};
//!
//! let ctx = ExecutionContext::new().with_value("limit", 10i64);
//! let verdict = evaluate("'too big' if 12 > limit else True", &ctx).unwrap();
//! assert_eq!(verdict, Value::from("too big"));
//! ```

pub mod context;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use context::{Builtins, ContextObject, ExecutionContext, Layered, Namespace, NativeFunction};
pub use eval::{evaluate, evaluate_type};
pub use value::{Builtin, Value, ValueType};
