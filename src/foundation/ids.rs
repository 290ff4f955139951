use std::fmt;

use crate::foundation::error::{GraphError, GraphResult};

/// Construction-order identity of a node within one [`FilterGraph`](crate::FilterGraph).
///
/// Doubles as the index into the graph's node arena.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena index of this node.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pad label that can be embedded between brackets in the rendered graph.
///
/// Allowed characters are ASCII alphanumerics plus `_`, `-`, `.` and `:` (the latter so that
/// engine stream specifiers such as `0:v` can name external sources).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Validate and wrap `s`.
    pub fn new(s: impl Into<String>) -> GraphResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(GraphError::InvalidLabel {
                label: s,
                reason: "label must be non-empty",
            });
        }
        if let Some(reason) = s.chars().find_map(reject_char) {
            return Err(GraphError::InvalidLabel { label: s, reason });
        }
        Ok(Self(s))
    }

    /// Borrow the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn reject_char(c: char) -> Option<&'static str> {
    match c {
        'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | ':' => None,
        '[' | ']' => Some("brackets are not allowed"),
        ';' | ',' => Some("graph separators are not allowed"),
        c if c.is_whitespace() => Some("whitespace is not allowed"),
        _ => Some("only ASCII alphanumerics, '_', '-', '.' and ':' are allowed"),
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Label {
    type Error = GraphError;

    fn try_from(s: &str) -> GraphResult<Self> {
        Self::new(s)
    }
}

impl<'de> serde::Deserialize<'de> for Label {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Label::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
