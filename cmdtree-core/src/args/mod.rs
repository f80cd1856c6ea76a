//! # Argument Handling
//!
//! The tokens after a runnable command go through two stages:
//!
//! 1. [`split`]: positional values and `-key value` pairs
//! 2. [`Binder::bind`]: values matched to argument specs, coerced, checked
//!    and completed with defaults

pub mod binder;
pub mod split;

pub use binder::{Binder, BoundArguments, CHECK_PLACEHOLDER};
pub use split::{split, SplitArgs};
