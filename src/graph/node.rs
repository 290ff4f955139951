use crate::{
    args::container::FilterArgs,
    foundation::error::{GraphError, GraphResult},
    foundation::ids::NodeId,
    graph::stream::StreamSource,
};

/// Number of inputs a node requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Arity {
    /// Exactly this many inputs.
    Exact(usize),
    /// Whatever the caller supplies, including zero.
    Variable,
}

impl Arity {
    /// Whether `count` inputs satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => n == count,
            Arity::Variable => true,
        }
    }
}

/// One filter invocation. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    filter: String,
    inputs: Vec<StreamSource>,
    arity: Arity,
    args: FilterArgs,
}

impl Node {
    /// Validate and build a node.
    ///
    /// Capability checks on the inputs happen in [`FilterGraph`](crate::FilterGraph), which still
    /// holds the typed streams; this only checks the filter name and the arity.
    pub(crate) fn new(
        id: NodeId,
        filter: &str,
        inputs: Vec<StreamSource>,
        arity: Arity,
        args: FilterArgs,
    ) -> GraphResult<Self> {
        validate_filter_name(filter)?;
        if let Arity::Exact(expected) = arity
            && !arity.accepts(inputs.len())
        {
            return Err(GraphError::ArityMismatch {
                filter: filter.to_string(),
                node: id.0,
                expected,
                actual: inputs.len(),
            });
        }
        Ok(Self {
            id,
            filter: filter.to_string(),
            inputs,
            arity,
            args,
        })
    }

    /// Construction-order id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Filter name.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Input references, in pad order.
    pub fn inputs(&self) -> &[StreamSource] {
        &self.inputs
    }

    /// Declared arity.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Positional arguments and options captured at construction.
    pub fn args(&self) -> &FilterArgs {
        &self.args
    }

    /// Ids of nodes feeding this one (external sources excluded).
    pub fn upstream(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inputs.iter().filter_map(StreamSource::node)
    }
}

fn validate_filter_name(name: &str) -> GraphResult<()> {
    if name.trim().is_empty() {
        return Err(GraphError::validation("filter name must be non-empty"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '[' | ']' | ';' | ',' | '=' | ':'))
    {
        return Err(GraphError::validation(format!(
            "filter name '{name}' contains reserved character {c:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/graph/node.rs"]
mod tests;
