//! Derived repository queries compiled to AQL.
//!
//! Given a parsed method name (`findByNameStartingWithAndAgeBetween`) and the
//! method's arguments, [`query::compile`] produces query text and positional
//! bind variables ready to send to the database.

#![warn(missing_docs)]

pub mod query;

pub use query::{compile, Argument, BindVars, CompileError, CompiledQuery, Value};
