#![forbid(unsafe_code)]

//! Derived-query compilation.
//!
//! This module turns a parsed repository method (a [`ast::PartTree`]) and its
//! runtime arguments into AQL text plus positional bind variables.

/// Assembly of the final `FOR ... RETURN` text and sort clauses.
pub mod assembler;

/// Predicate tree handed over by the method-name parser.
///
/// Defines parts, operators, projection flags and sort keys.
pub mod ast;

/// Argument binding and bind-counter bookkeeping.
pub mod binder;

/// Case-insensitivity policy and LIKE escaping.
pub mod case;

/// Operator-to-fragment templates.
pub mod clause;

/// Compiler facade driving the whole pipeline.
pub mod compiler;

/// AND/OR accumulation of fragments.
pub mod conjunction;

/// Structured compile errors.
pub mod errors;

/// Entity metadata consumed by the compiler.
///
/// Resolves collections, field paths and leaf property types.
pub mod metadata;

/// Argument and bind-variable values.
pub mod value;

pub use compiler::{compile, CompiledQuery, DerivedQueryCompiler};
pub use errors::{CompileError, Result};
pub use value::{Argument, BindVars, Value};
