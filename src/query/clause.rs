//! Clause synthesis: one predicate part to one AQL fragment.

use crate::query::ast::OperatorType;
use crate::query::binder::PatternMode;
use crate::query::errors::{CompileError, Result};

/// Output of synthesizing one part.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClauseFragment {
    /// The fragment replaces the iteration source instead of filtering.
    pub is_array_source: bool,
    /// AQL text.
    pub text: String,
}

impl ClauseFragment {
    fn predicate(text: String) -> Self {
        Self {
            is_array_source: false,
            text,
        }
    }

    fn array(text: String) -> Self {
        Self {
            is_array_source: true,
            text,
        }
    }
}

/// Fragment plus what the binder must do for it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SynthesizedClause {
    /// Rendered fragment, keyed from the counter passed to [`synthesize`].
    pub fragment: ClauseFragment,
    /// Logical arguments the operator consumes.
    pub arity: usize,
    /// Pattern rewriting for the argument.
    pub mode: PatternMode,
}

/// Inputs to [`synthesize`] that come from metadata and the case policy.
#[derive(Clone, Copy, Debug)]
pub struct ClauseContext<'a> {
    /// Collection name, used by geo functions.
    pub collection: &'a str,
    /// Case-adjusted document access, e.g. `LOWER(e.name)`.
    pub property: &'a str,
    /// Whether the part is compiled case-insensitively.
    pub ignore_case: bool,
}

/// Maps `operator` to its fragment, with bind keys starting at `n`.
pub fn synthesize(
    operator: OperatorType,
    ctx: &ClauseContext<'_>,
    n: usize,
) -> Result<SynthesizedClause> {
    let prop = ctx.property;
    let (fragment, arity, mode) = match operator {
        OperatorType::SimpleProperty => (predicate(format!("{prop} == @{n}")), 1, PatternMode::Exact),
        OperatorType::NegatingSimpleProperty => {
            (predicate(format!("{prop} != @{n}")), 1, PatternMode::Exact)
        }
        OperatorType::True => (predicate(format!("{prop} == true")), 0, PatternMode::Exact),
        OperatorType::False => (predicate(format!("{prop} == false")), 0, PatternMode::Exact),
        OperatorType::IsNull => (predicate(format!("{prop} == null")), 0, PatternMode::Exact),
        OperatorType::IsNotNull => (predicate(format!("{prop} != null")), 0, PatternMode::Exact),
        OperatorType::Exists => (predicate(format!("HAS(e, @{n})")), 1, PatternMode::Exact),
        OperatorType::Before | OperatorType::LessThan => {
            (predicate(format!("{prop} < @{n}")), 1, PatternMode::Exact)
        }
        OperatorType::After | OperatorType::GreaterThan => {
            (predicate(format!("{prop} > @{n}")), 1, PatternMode::Exact)
        }
        OperatorType::LessThanEqual => (predicate(format!("{prop} <= @{n}")), 1, PatternMode::Exact),
        OperatorType::GreaterThanEqual => {
            (predicate(format!("{prop} >= @{n}")), 1, PatternMode::Exact)
        }
        OperatorType::Between => (
            predicate(format!("@{n} <= {prop} AND {prop} <= @{}", n + 1)),
            2,
            PatternMode::Exact,
        ),
        OperatorType::Like => (predicate(format!("{prop} LIKE @{n}")), 1, PatternMode::Exact),
        OperatorType::NotLike => (predicate(format!("NOT({prop} LIKE @{n})")), 1, PatternMode::Exact),
        OperatorType::StartingWith => (predicate(format!("{prop} LIKE @{n}")), 1, PatternMode::Prefix),
        OperatorType::EndingWith => (predicate(format!("{prop} LIKE @{n}")), 1, PatternMode::Suffix),
        OperatorType::Regex => (
            predicate(format!("REGEX_TEST({prop}, @{n}, {})", ctx.ignore_case)),
            1,
            PatternMode::Exact,
        ),
        OperatorType::In => (predicate(format!("{prop} IN @{n}")), 1, PatternMode::Exact),
        OperatorType::NotIn => (predicate(format!("{prop} NOT IN @{n}")), 1, PatternMode::Exact),
        OperatorType::Containing => (predicate(format!("@{n} IN {prop}")), 1, PatternMode::Exact),
        OperatorType::Near => (
            ClauseFragment::array(unset_distance(&format!(
                "NEAR({}, @{n}, @{})",
                ctx.collection,
                n + 1
            ))),
            1,
            PatternMode::Exact,
        ),
        OperatorType::Within => (
            ClauseFragment::array(unset_distance(&format!(
                "WITHIN({}, @{n}, @{}, @{})",
                ctx.collection,
                n + 1,
                n + 2
            ))),
            2,
            PatternMode::Exact,
        ),
        OperatorType::NotContaining | OperatorType::IsEmpty | OperatorType::IsNotEmpty => {
            return Err(CompileError::UnsupportedOperator { operator });
        }
    };
    Ok(SynthesizedClause {
        fragment,
        arity,
        mode,
    })
}

/// Donut fragment: within the outer radius (`@n+3`) minus within the inner
/// radius (`@n+2`) of the point at `@n`, `@n+1`.
pub fn donut(collection: &str, n: usize) -> ClauseFragment {
    ClauseFragment::array(unset_distance(&format!(
        "MINUS(WITHIN({collection}, @{n}, @{}, @{}), WITHIN({collection}, @{n}, @{}, @{}))",
        n + 1,
        n + 3,
        n + 1,
        n + 2
    )))
}

fn predicate(text: String) -> ClauseFragment {
    ClauseFragment::predicate(text)
}

fn unset_distance(source: &str) -> String {
    format!("(FOR e IN {source} RETURN UNSET(e, '_distance'))")
}
