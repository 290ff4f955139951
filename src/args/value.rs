use std::fmt;

/// Scalar (or nested-scalar) filter argument.
///
/// Deserializes untagged, so JSON `3` is an [`Value::Int`], `3.5` a [`Value::Float`] and
/// `["a", "b"]` a [`Value::List`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean, rendered as `1`/`0`.
    Bool(bool),
    /// Integer, rendered in decimal.
    Int(i64),
    /// Floating point, rendered with shortest round-trip formatting.
    Float(f64),
    /// Verbatim text.
    Str(String),
    /// Nested scalars, rendered joined by `|`.
    List(Vec<Value>),
}

impl Value {
    /// Unescaped textual form used in the filter-graph expression.
    pub fn render(&self) -> String {
        match self {
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::render)
                .collect::<Vec<_>>()
                .join("|"),
        }
    }

    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

/// Types a stored [`Value`] can be coerced into by
/// [`FilterArgs::get_or`](crate::FilterArgs::get_or).
pub trait FromValue: Sized {
    /// Name reported in [`GraphError::TypeMismatch`](crate::GraphError::TypeMismatch).
    const TYPE_NAME: &'static str;

    /// Coerce `v`, or `None` when the value has no sensible form of this type.
    fn from_value(v: &Value) -> Option<Self>;
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            Value::Str(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(v: &Value) -> Option<Self> {
        Some(v.render())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/args/value.rs"]
mod tests;
