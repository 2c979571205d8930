//! Runtime argument values and the bind-variable map they are written into.
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Plain JSON-shaped value: what callers pass as scalar arguments and what the
/// compiler writes into the bind map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null literal.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Signed 64-bit integer literal.
    Int(i64),
    /// 64-bit floating point literal.
    Float(f64),
    /// UTF-8 string literal.
    String(String),
    /// Ordered list, e.g. the right-hand side of `IN`.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Lower-cases strings, recursing into arrays. Other values pass through.
    pub fn to_lowercase(self) -> Value {
        match self {
            Value::String(s) => Value::String(s.to_lowercase()),
            Value::Array(items) => Value::Array(items.into_iter().map(Value::to_lowercase).collect()),
            other => other,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

/// Geo point (`x` = longitude-ish, `y` = latitude-ish, passed through as-is).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// First coordinate.
    pub x: f64,
    /// Second coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distance band for donut queries: documents farther than `lower` and no
/// farther than `upper` from the point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Inner radius.
    pub lower: f64,
    /// Outer radius.
    pub upper: f64,
}

impl Range {
    /// Creates a range.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }
}

/// Method argument, tagged once at the boundary so the binder never has to
/// rediscover its shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v", rename_all = "snake_case")]
pub enum Argument {
    /// Single value bound as-is. Lists go in [`Argument::Sequence`]; an
    /// array here fails with `InvalidArgument`.
    Scalar(Value),
    /// Collection argument (`IN`, `NOT IN`, `CONTAINING` on arrays).
    Sequence(Vec<Value>),
    /// Geo point, bound as two variables.
    GeoPoint(Point),
    /// Distance band, bound as two variables after a point.
    GeoRange(Range),
}

impl Argument {
    /// Lower-cases string payloads; geo values are untouched.
    pub fn to_lowercase(self) -> Argument {
        match self {
            Argument::Scalar(value) => Argument::Scalar(value.to_lowercase()),
            Argument::Sequence(items) => {
                Argument::Sequence(items.into_iter().map(Value::to_lowercase).collect())
            }
            geo => geo,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Scalar(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Scalar(value.into())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Scalar(value.into())
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Scalar(value.into())
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Scalar(value.into())
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Scalar(value.into())
    }
}

impl From<Point> for Argument {
    fn from(value: Point) -> Self {
        Argument::GeoPoint(value)
    }
}

impl From<Range> for Argument {
    fn from(value: Range) -> Self {
        Argument::GeoRange(value)
    }
}

/// Positional bind variables keyed `"0"`, `"1"`, ... in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindVars {
    entries: Vec<(String, Value)>,
}

impl BindVars {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under the stringified `key`.
    pub(crate) fn insert(&mut self, key: usize, value: Value) {
        self.entries.push((key.to_string(), value));
    }

    /// Looks up a variable by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no variables were written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Variables in insertion (= key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for BindVars {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
