//! AND/OR accumulation of clause fragments.

use crate::query::clause::ClauseFragment;
use crate::query::errors::{CompileError, Result};

const AND: &str = " AND ";
const OR: &str = " OR ";

/// AND-combination of one group's fragments.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Conjunction {
    /// Iteration-source override contributed by a geo part.
    pub array: Option<String>,
    /// Filter predicate of the remaining parts.
    pub predicate: Option<String>,
}

/// Collects the fragments of one AND-group.
#[derive(Debug, Default)]
pub struct ConjunctionBuilder {
    array: Option<String>,
    predicates: Vec<String>,
}

impl ConjunctionBuilder {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one fragment. A second array source in the same group is an error.
    pub fn add(&mut self, fragment: ClauseFragment) -> Result<()> {
        if fragment.is_array_source {
            if self.array.is_some() {
                return Err(CompileError::MultipleGeoSources);
            }
            self.array = Some(fragment.text);
        } else {
            self.predicates.push(fragment.text);
        }
        Ok(())
    }

    /// Joins the predicates with `AND`.
    pub fn build(self) -> Conjunction {
        Conjunction {
            array: self.array,
            predicate: join(self.predicates, AND),
        }
    }
}

/// OR-combination of all groups.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Disjunction {
    /// Iteration-source override, replacing the collection.
    pub array: Option<String>,
    /// Final `FILTER` predicate.
    pub predicate: Option<String>,
}

/// Collects the conjunctions of every OR-group.
#[derive(Debug, Default)]
pub struct DisjunctionBuilder {
    array: Option<String>,
    predicates: Vec<String>,
}

impl DisjunctionBuilder {
    /// Creates an empty disjunction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one group. Only one geo override per query is supported.
    pub fn add(&mut self, conjunction: Conjunction) -> Result<()> {
        if let Some(array) = conjunction.array {
            if self.array.is_some() {
                return Err(CompileError::MultipleGeoSources);
            }
            self.array = Some(array);
        }
        if let Some(predicate) = conjunction.predicate {
            self.predicates.push(predicate);
        }
        Ok(())
    }

    /// Joins the group predicates with `OR`; AQL binds `AND` tighter.
    pub fn build(self) -> Disjunction {
        Disjunction {
            array: self.array,
            predicate: join(self.predicates, OR),
        }
    }
}

fn join(parts: Vec<String>, separator: &str) -> Option<String> {
    let parts: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(separator))
    }
}
