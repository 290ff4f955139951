use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::foundation::error::{GraphError, GraphResult};
use crate::foundation::ids::Label;

/// Options for [`FilterGraph::compile_with`](crate::FilterGraph::compile_with).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOpts {
    /// Prefix of auto-assigned labels.
    pub label_prefix: String,
    /// First counter value handed out by the label allocator.
    pub first_label: u64,
    /// Apply filter-graph escaping to arguments and filter specs.
    pub escape: bool,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self {
            label_prefix: "l".to_string(),
            first_label: 1,
            escape: true,
        }
    }
}

impl CompileOpts {
    /// Check that auto labels built from these options are plain tokens.
    ///
    /// The prefix must match `[A-Za-z_][A-Za-z0-9_]*`; the wider label alphabet is only for
    /// external sources such as `0:v`.
    pub fn validate(&self) -> GraphResult<()> {
        let mut chars = self.label_prefix.chars();
        let Some(first) = chars.next() else {
            return Err(GraphError::validation("label_prefix must be non-empty"));
        };
        if !(first.is_ascii_alphabetic() || first == '_')
            || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(GraphError::validation(format!(
                "label_prefix '{}' must start with a letter or '_' and contain only ASCII \
                 alphanumerics and '_'",
                self.label_prefix
            )));
        }
        Label::new(format!("{}{}", self.label_prefix, self.first_label)).map_err(|e| {
            GraphError::validation(format!("label_prefix '{}': {e}", self.label_prefix))
        })?;
        Ok(())
    }

    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GraphResult<Self> {
        let opts: CompileOpts = serde_json::from_reader(r)
            .map_err(|e| GraphError::serde(format!("parse compile options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open compile options '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/opts.rs"]
mod tests;
