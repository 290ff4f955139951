use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::Context as _;

use crate::{
    args::container::FilterArgs,
    args::value::Value,
    foundation::error::{GraphError, GraphResult},
    foundation::ids::Label,
    graph::filter_graph::{FilterGraph, NodeHandle},
    graph::node::Arity,
    graph::stream::{Pad, Stream},
};

/// JSON-facing description of a filter graph.
///
/// Stream references are either a source label (`"0:v"`), a node id (`"scaled"`, meaning its
/// default output) or `"<node id>:<pad>"`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDescription {
    /// External endpoints the graph reads from.
    #[serde(default)]
    pub sources: Vec<Label>,
    /// Nodes, in construction order.
    #[serde(default)]
    pub nodes: Vec<NodeDescription>,
    /// Terminal stream references.
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// One node of a [`GraphDescription`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDescription {
    /// Name other entries use to reference this node. Not rendered.
    pub id: String,
    /// Filter name.
    pub filter: String,
    /// Input stream references.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Exact input count; variable when absent.
    #[serde(default)]
    pub arity: Option<usize>,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Keyed options.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
    /// Output pads to request up front, e.g. to give them explicit labels.
    #[serde(default)]
    pub outputs: Vec<OutputDescription>,
}

/// An output pad request inside a [`NodeDescription`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputDescription {
    /// Pad index.
    #[serde(default)]
    pub pad: u32,
    /// Explicit label.
    #[serde(default)]
    pub label: Option<String>,
}

impl GraphDescription {
    /// Parse a description from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> GraphResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| GraphError::serde(format!("parse graph description JSON: {e}")))
    }

    /// Parse a description from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open graph description '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check ids and references without building anything.
    pub fn validate(&self) -> GraphResult<()> {
        let sources: BTreeSet<&str> = self.sources.iter().map(Label::as_str).collect();
        let mut ids = BTreeSet::new();
        for node in &self.nodes {
            if node.id.is_empty() || node.id.contains(':') {
                return Err(GraphError::validation(format!(
                    "node id '{}' must be non-empty and must not contain ':'",
                    node.id
                )));
            }
            if sources.contains(node.id.as_str()) {
                return Err(GraphError::validation(format!(
                    "node id '{}' shadows a source label",
                    node.id
                )));
            }
            for input in &node.inputs {
                check_ref(input, &sources, &ids)?;
            }
            if !ids.insert(node.id.as_str()) {
                return Err(GraphError::validation(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }
        for output in &self.outputs {
            check_ref(output, &sources, &ids)?;
        }
        Ok(())
    }

    /// Instantiate the description in `graph` and return its terminal streams.
    ///
    /// Nodes are built in file order, so a node may only read from sources and earlier nodes.
    pub fn build<'g>(&self, graph: &'g FilterGraph) -> GraphResult<Vec<Stream<'g>>> {
        self.validate()?;

        let mut scope = Scope {
            sources: BTreeMap::new(),
            nodes: BTreeMap::new(),
        };
        for label in &self.sources {
            scope
                .sources
                .insert(label.as_str(), graph.source(label.as_str())?);
        }

        for desc in &self.nodes {
            let inputs = desc
                .inputs
                .iter()
                .map(|r| scope.resolve(r))
                .collect::<GraphResult<Vec<_>>>()?;
            let arity = desc.arity.map_or(Arity::Variable, Arity::Exact);
            let args = FilterArgs {
                positional: desc.args.clone(),
                options: desc.options.clone(),
            };
            let handle = graph.node(&desc.filter, &inputs, arity, args)?;
            for out in &desc.outputs {
                handle.stream(out.label.as_deref(), Some(Pad(out.pad)))?;
            }
            scope.nodes.insert(desc.id.as_str(), handle);
        }

        self.outputs.iter().map(|r| scope.resolve(r)).collect()
    }
}

struct Scope<'d, 'g> {
    sources: BTreeMap<&'d str, Stream<'g>>,
    nodes: BTreeMap<&'d str, NodeHandle<'g>>,
}

impl<'g> Scope<'_, 'g> {
    fn resolve(&self, r: &str) -> GraphResult<Stream<'g>> {
        if let Some(s) = self.sources.get(r) {
            return Ok(s.clone());
        }
        let (id, pad) = split_ref(r)?;
        let handle = self
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::validation(format!("unknown stream reference '{r}'")))?;
        handle.stream(None, Some(pad))
    }
}

fn split_ref(r: &str) -> GraphResult<(&str, Pad)> {
    match r.rsplit_once(':') {
        None => Ok((r, Pad::DEFAULT)),
        Some((id, pad)) => {
            let pad = pad.parse::<u32>().map_err(|_| {
                GraphError::validation(format!("invalid pad index in stream reference '{r}'"))
            })?;
            Ok((id, Pad(pad)))
        }
    }
}

fn check_ref(r: &str, sources: &BTreeSet<&str>, ids: &BTreeSet<&str>) -> GraphResult<()> {
    if sources.contains(r) {
        return Ok(());
    }
    let (id, _) = split_ref(r)?;
    if ids.contains(id) {
        Ok(())
    } else {
        Err(GraphError::validation(format!(
            "unknown stream reference '{r}'"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/description.rs"]
mod tests;
