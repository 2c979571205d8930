//! Argument binding: turns method arguments into positional bind variables.

use tracing::trace;

use crate::query::ast::OperatorType;
use crate::query::case;
use crate::query::errors::{CompileError, Result};
use crate::query::value::{Argument, BindVars, Value};

/// Slots written by a donut part: point x, point y, inner and outer radius.
pub const DONUT_SLOTS: usize = 4;

/// How a string argument is turned into a LIKE pattern.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PatternMode {
    /// Bound as supplied.
    #[default]
    Exact,
    /// Escaped, then `%` appended (`StartingWith`).
    Prefix,
    /// Escaped, then `%` prepended (`EndingWith`).
    Suffix,
}

/// What a single part wrote into the bind map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BindOutcome {
    /// Plain binding of this many slots.
    Fixed(usize),
    /// Point followed by a distance range; the clause must become a donut.
    GeoDonut,
}

impl BindOutcome {
    /// Number of bind slots actually written.
    pub fn slots(&self) -> usize {
        match self {
            BindOutcome::Fixed(slots) => *slots,
            BindOutcome::GeoDonut => DONUT_SLOTS,
        }
    }
}

/// Per-part binding request.
#[derive(Clone, Copy, Debug)]
pub struct BindRequest {
    /// Operator being bound, for error reporting and donut checks.
    pub operator: OperatorType,
    /// Number of logical arguments to consume.
    pub arity: usize,
    /// Lower-case string payloads before binding.
    pub ignore_case: bool,
    /// Pattern rewriting for string arguments.
    pub mode: PatternMode,
}

/// Consumes the argument stream left to right and owns the bind counter.
///
/// One binder serves exactly one compile pass; the next key is always the
/// number of variables written so far.
#[derive(Debug)]
pub struct ArgumentBinder {
    arguments: std::vec::IntoIter<Argument>,
    bind_vars: BindVars,
}

impl ArgumentBinder {
    /// Creates a binder over the method arguments.
    pub fn new(arguments: Vec<Argument>) -> Self {
        Self {
            arguments: arguments.into_iter(),
            bind_vars: BindVars::new(),
        }
    }

    /// Key the next written variable will receive.
    pub fn next_key(&self) -> usize {
        self.bind_vars.len()
    }

    /// Arguments not consumed yet.
    pub fn remaining(&self) -> usize {
        self.arguments.len()
    }

    /// Binds the arguments of one part.
    pub fn bind(&mut self, request: BindRequest) -> Result<BindOutcome> {
        let start = self.next_key();
        let mut last_was_point = false;
        let mut donut = false;
        for taken in 0..request.arity {
            let argument = self
                .arguments
                .next()
                .ok_or(CompileError::InsufficientArguments {
                    operator: request.operator,
                    needed: request.arity,
                    supplied: taken,
                })?;
            let argument = case::lower_argument(argument, request.ignore_case);
            last_was_point = match argument {
                Argument::GeoPoint(point) => {
                    self.push(Value::Float(point.x));
                    self.push(Value::Float(point.y));
                    true
                }
                Argument::GeoRange(range) => {
                    if request.operator != OperatorType::Within || !last_was_point || donut {
                        return Err(CompileError::MisplacedGeoRange {
                            operator: request.operator,
                        });
                    }
                    self.push(Value::Float(range.lower));
                    self.push(Value::Float(range.upper));
                    donut = true;
                    false
                }
                Argument::Scalar(Value::Array(_)) => {
                    return Err(CompileError::InvalidArgument {
                        operator: request.operator,
                        reason: "lists must be passed as a sequence argument",
                    });
                }
                Argument::Scalar(value) => {
                    let value = pattern(value, request)?;
                    self.push(value);
                    false
                }
                Argument::Sequence(items) => {
                    if request.mode != PatternMode::Exact {
                        return Err(CompileError::InvalidArgument {
                            operator: request.operator,
                            reason: "pattern operators need a single string",
                        });
                    }
                    self.push(Value::Array(items));
                    false
                }
            };
        }
        let written = self.next_key() - start;
        trace!(
            operator = %request.operator,
            first = start,
            written,
            "derived.bind.part"
        );
        if donut {
            debug_assert_eq!(written, DONUT_SLOTS);
            Ok(BindOutcome::GeoDonut)
        } else {
            Ok(BindOutcome::Fixed(written))
        }
    }

    /// Finishes the pass, returning the bind map.
    pub fn finish(self) -> BindVars {
        self.bind_vars
    }

    fn push(&mut self, value: Value) {
        let key = self.next_key();
        self.bind_vars.insert(key, value);
    }
}

fn pattern(value: Value, request: BindRequest) -> Result<Value> {
    if request.mode == PatternMode::Exact {
        return Ok(value);
    }
    let Some(text) = value.as_str() else {
        return Err(CompileError::InvalidArgument {
            operator: request.operator,
            reason: "pattern operators need a string",
        });
    };
    let escaped = case::escape_like(text);
    Ok(Value::String(match request.mode {
        PatternMode::Prefix => format!("{escaped}%"),
        PatternMode::Suffix => format!("%{escaped}"),
        PatternMode::Exact => escaped,
    }))
}
