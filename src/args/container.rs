use std::collections::BTreeMap;

use crate::{
    args::value::{FromValue, Value},
    foundation::error::{GraphError, GraphResult},
};

/// Positional arguments plus keyed options for one filter invocation.
///
/// Options live in a `BTreeMap`, so iteration (and therefore rendering) is lexicographic by key
/// regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterArgs {
    /// Order-significant positional arguments.
    #[serde(default)]
    pub positional: Vec<Value>,
    /// Keyed options.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl FilterArgs {
    /// Empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Container holding only positional arguments.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            options: BTreeMap::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, v: impl Into<Value>) -> Self {
        self.positional.push(v.into());
        self
    }

    /// Set a keyed option, replacing any previous value.
    pub fn opt(mut self, key: impl Into<String>, v: impl Into<Value>) -> Self {
        self.set(key, v);
        self
    }

    /// In-place form of [`FilterArgs::opt`].
    pub fn set(&mut self, key: impl Into<String>, v: impl Into<Value>) {
        self.options.insert(key.into(), v.into());
    }

    /// Stored option value, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// True when there is neither a positional argument nor an option.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.options.is_empty()
    }

    /// Combine `parts` left to right into a new container.
    ///
    /// For keys present in several parts the last one wins. Positional lists are not combined:
    /// the first non-empty list is taken verbatim. Inputs are left untouched.
    pub fn merge(parts: &[FilterArgs]) -> FilterArgs {
        let mut out = FilterArgs::new();
        for part in parts {
            if out.positional.is_empty() && !part.positional.is_empty() {
                out.positional = part.positional.clone();
            }
            for (k, v) in &part.options {
                out.options.insert(k.clone(), v.clone());
            }
        }
        out
    }

    /// Remove `key` and return its rendered form, or an empty string when absent.
    pub fn pop_string(&mut self, key: &str) -> String {
        self.options
            .remove(key)
            .map(|v| v.render())
            .unwrap_or_default()
    }

    /// Stored value coerced to `T`, or `default` when absent.
    ///
    /// Fails with [`GraphError::TypeMismatch`] when the stored value cannot be coerced.
    pub fn get_or<T: FromValue>(&self, key: &str, default: T) -> GraphResult<T> {
        let Some(v) = self.options.get(key) else {
            return Ok(default);
        };
        T::from_value(v).ok_or_else(|| GraphError::TypeMismatch {
            key: key.to_string(),
            expected: T::TYPE_NAME,
            found: v.render(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/args/container.rs"]
mod tests;
