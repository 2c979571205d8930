//! Predicate tree handed to the compiler by the method-name parser.
//!
//! The structures mirror what a repository method such as
//! `findByNameIgnoreCaseAndAgeBetweenOrderByAgeDesc` decomposes into: a list
//! of OR-groups, each an ordered list of AND-combined [`PredicatePart`]s, plus
//! projection flags. Everything here is immutable input; the compiler never
//! rewrites the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dotted path of logical property names, e.g. `address.city`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    /// Builds a path from individual segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Splits a dotted path into segments. Empty segments are dropped.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.').filter(|s| !s.is_empty()))
    }

    /// Segments from the root entity down to the leaf property.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Final segment of the path, if any.
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for PropertyPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for PropertyPath {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PropertyPath> for String {
    fn from(value: PropertyPath) -> Self {
        value.to_string()
    }
}

/// Case-insensitivity request attached to a predicate part.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreCase {
    /// Compare with the stored case.
    #[default]
    Never,
    /// Ignore case where the property type allows it (`...AllIgnoreCase`).
    WhenPossible,
    /// Explicitly requested on this part (`...IgnoreCase`).
    Always,
}

/// Operator vocabulary produced by the method-name parser.
///
/// `IsEmpty`, `IsNotEmpty` and `NotContaining` are part of the vocabulary but
/// have no clause template; compiling them fails with
/// [`CompileError::UnsupportedOperator`](crate::query::errors::CompileError).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorType {
    /// `findByName`
    SimpleProperty,
    /// `findByNameNot`
    NegatingSimpleProperty,
    /// `findByActiveTrue`
    True,
    /// `findByActiveFalse`
    False,
    /// `findByNameIsNull`
    IsNull,
    /// `findByNameIsNotNull`
    IsNotNull,
    /// `findByNameExists`
    Exists,
    /// `findByBirthdayBefore`
    Before,
    /// `findByAgeLessThan`
    LessThan,
    /// `findByBirthdayAfter`
    After,
    /// `findByAgeGreaterThan`
    GreaterThan,
    /// `findByAgeLessThanEqual`
    LessThanEqual,
    /// `findByAgeGreaterThanEqual`
    GreaterThanEqual,
    /// `findByAgeBetween`
    Between,
    /// `findByNameLike`
    Like,
    /// `findByNameNotLike`
    NotLike,
    /// `findByNameStartingWith`
    StartingWith,
    /// `findByNameEndingWith`
    EndingWith,
    /// `findByNameRegex`
    Regex,
    /// `findByNameIn`
    In,
    /// `findByNameNotIn`
    NotIn,
    /// `findByTagsContaining`
    Containing,
    /// `findByTagsNotContaining`
    NotContaining,
    /// `findByTagsIsEmpty`
    IsEmpty,
    /// `findByTagsIsNotEmpty`
    IsNotEmpty,
    /// `findByLocationNear`
    Near,
    /// `findByLocationWithin`
    Within,
}

impl OperatorType {
    /// Stable snake_case name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorType::SimpleProperty => "simple_property",
            OperatorType::NegatingSimpleProperty => "negating_simple_property",
            OperatorType::True => "true",
            OperatorType::False => "false",
            OperatorType::IsNull => "is_null",
            OperatorType::IsNotNull => "is_not_null",
            OperatorType::Exists => "exists",
            OperatorType::Before => "before",
            OperatorType::LessThan => "less_than",
            OperatorType::After => "after",
            OperatorType::GreaterThan => "greater_than",
            OperatorType::LessThanEqual => "less_than_equal",
            OperatorType::GreaterThanEqual => "greater_than_equal",
            OperatorType::Between => "between",
            OperatorType::Like => "like",
            OperatorType::NotLike => "not_like",
            OperatorType::StartingWith => "starting_with",
            OperatorType::EndingWith => "ending_with",
            OperatorType::Regex => "regex",
            OperatorType::In => "in",
            OperatorType::NotIn => "not_in",
            OperatorType::Containing => "containing",
            OperatorType::NotContaining => "not_containing",
            OperatorType::IsEmpty => "is_empty",
            OperatorType::IsNotEmpty => "is_not_empty",
            OperatorType::Near => "near",
            OperatorType::Within => "within",
        }
    }

    /// Whether the operator replaces the iteration source instead of filtering.
    pub fn is_geo(&self) -> bool {
        matches!(self, OperatorType::Near | OperatorType::Within)
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic condition of a derived query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicatePart {
    /// Logical property path, resolved to a storage field by the metadata.
    pub property: PropertyPath,
    /// Comparison to apply.
    pub operator: OperatorType,
    /// Case-insensitivity request.
    #[serde(default)]
    pub ignore_case: IgnoreCase,
}

impl PredicatePart {
    /// Creates a case-sensitive part.
    pub fn new(property: impl Into<PropertyPath>, operator: OperatorType) -> Self {
        Self {
            property: property.into(),
            operator,
            ignore_case: IgnoreCase::Never,
        }
    }

    /// Returns the same part with the supplied ignore-case request.
    pub fn ignore_case(mut self, ignore_case: IgnoreCase) -> Self {
        self.ignore_case = ignore_case;
        self
    }
}

/// Parsed method name: OR-groups of AND-combined parts plus projection flags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartTree {
    /// OR-combined groups, each an AND-combined list of parts.
    pub groups: Vec<Vec<PredicatePart>>,
    /// `findDistinct...` / `countDistinct...`
    pub distinct: bool,
    /// `countBy...`
    pub count_projection: bool,
    /// `deleteBy...` / `removeBy...`
    pub delete: bool,
    /// `findTop10By...` / `findFirstBy...`
    pub max_results: Option<u64>,
}

impl PartTree {
    /// Creates an empty tree (matches every document).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an OR-group.
    pub fn or(mut self, group: Vec<PredicatePart>) -> Self {
        self.groups.push(group);
        self
    }

    /// Marks the tree as distinct.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Marks the tree as a count projection.
    pub fn count(mut self) -> Self {
        self.count_projection = true;
        self
    }

    /// Marks the tree as a delete.
    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// Limits the number of results.
    pub fn limit(mut self, max_results: u64) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Whether a `LIMIT` clause is emitted.
    pub fn is_limiting(&self) -> bool {
        self.max_results.is_some()
    }

    /// Parts in argument-consumption order.
    pub fn parts(&self) -> impl Iterator<Item = &PredicatePart> {
        self.groups.iter().flatten()
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending order.
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    /// Descending order.
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl Direction {
    /// Keyword emitted into the query text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sort key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Storage property name, emitted verbatim after `e.`.
    pub property: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    /// Ascending order on `property`.
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending order on `property`.
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sort keys.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort(Vec<Order>);

impl Sort {
    /// Sort with no keys; renders as no clause.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Sort by the supplied keys, in order.
    pub fn by(orders: impl IntoIterator<Item = Order>) -> Self {
        Self(orders.into_iter().collect())
    }

    /// Appends a key.
    pub fn and(mut self, order: Order) -> Self {
        self.0.push(order);
        self
    }

    /// Whether no keys are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.0.iter()
    }
}
