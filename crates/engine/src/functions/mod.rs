//! Built-in function modules
//!
//! Each submodule exposes plain Rust functions taking an
//! [`EvalContext`](crate::EvalContext) as their first argument.

pub mod file;

pub use file::{read_binary, BinaryValue};
