use std::fmt;

use crate::{
    args::container::FilterArgs,
    foundation::error::{GraphError, GraphResult},
    foundation::ids::{Label, NodeId},
    graph::filter_graph::{FilterGraph, NodeHandle},
    graph::node::Arity,
};

/// Which further operations a [`Stream`] admits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// May feed filters and may terminate a graph.
    Filterable,
    /// May only terminate a graph.
    SinkOnly,
}

impl Capability {
    /// Stable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Capability::Filterable => "filterable",
            Capability::SinkOnly => "sink-only",
        }
    }
}

/// Output pad index of a node. `Pad::DEFAULT` is the sole output of a single-output filter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize,
    serde::Deserialize,
)]
pub struct Pad(pub u32);

impl Pad {
    /// First (or only) output.
    pub const DEFAULT: Pad = Pad(0);

    /// Number of output pads a node may expose. Indices at or above this are rejected.
    ///
    /// Pads are rendered positionally, so requesting pad `k` renders `k + 1` outputs.
    pub const LIMIT: u32 = 1024;
}

/// One output pad of one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadRef {
    /// Producing node.
    pub node: NodeId,
    /// Output pad on that node.
    pub pad: Pad,
}

/// What a stream refers to, without the graph borrow.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamSource {
    /// An endpoint outside the graph, addressed by its label (e.g. `0:v`).
    External(Label),
    /// An output pad of a node in the graph.
    Pad(PadRef),
}

impl StreamSource {
    /// Producing node, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            StreamSource::External(_) => None,
            StreamSource::Pad(p) => Some(p.node),
        }
    }
}

/// Handle to one output pad (or external source) of a [`FilterGraph`].
///
/// Streams never change. Building on a stream creates a new node and a new stream, so one stream
/// can feed any number of consumers.
#[derive(Clone)]
pub struct Stream<'g> {
    pub(crate) graph: &'g FilterGraph,
    pub(crate) source: StreamSource,
    pub(crate) capability: Capability,
}

impl<'g> Stream<'g> {
    /// What this stream refers to.
    pub fn source(&self) -> &StreamSource {
        &self.source
    }

    /// Capability tag.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// The graph this stream belongs to.
    pub fn graph(&self) -> &'g FilterGraph {
        self.graph
    }

    /// Explicit label currently bound to this stream's pad, if any.
    pub fn label(&self) -> Option<Label> {
        match &self.source {
            StreamSource::External(l) => Some(l.clone()),
            StreamSource::Pad(p) => self.graph.pad_label(*p),
        }
    }

    /// Fail with [`GraphError::IncompatibleStream`] unless this stream can `action`.
    pub fn require(&self, wanted: Capability, action: &str) -> GraphResult<()> {
        let ok = match (wanted, self.capability) {
            (Capability::Filterable, Capability::Filterable) => true,
            (Capability::Filterable, Capability::SinkOnly) => false,
            (Capability::SinkOnly, _) => true,
        };
        if ok {
            Ok(())
        } else {
            Err(GraphError::IncompatibleStream {
                action: action.to_string(),
                expected: wanted.name(),
                actual: self.capability.name(),
            })
        }
    }

    /// Same pad, restricted to terminating the graph.
    pub fn sink(&self) -> Stream<'g> {
        Stream {
            graph: self.graph,
            source: self.source.clone(),
            capability: Capability::SinkOnly,
        }
    }

    /// Apply a single-input filter and return its default output.
    ///
    /// `parts` are merged left to right; a `label` option, when present, becomes the explicit
    /// label of the output instead of a filter option.
    pub fn filter(&self, name: &str, parts: &[FilterArgs]) -> GraphResult<Stream<'g>> {
        self.require(Capability::Filterable, &format!("apply '{name}'"))?;
        self.graph.filter(std::slice::from_ref(self), name, parts)
    }

    /// Build a node reading `self` followed by `others`, with a concrete arity.
    pub fn filter_n(
        &self,
        others: &[Stream<'g>],
        name: &str,
        arity: Arity,
        args: FilterArgs,
    ) -> GraphResult<NodeHandle<'g>> {
        self.require(Capability::Filterable, &format!("apply '{name}'"))?;
        let mut inputs = Vec::with_capacity(others.len() + 1);
        inputs.push(self.clone());
        inputs.extend_from_slice(others);
        self.graph.node(name, &inputs, arity, args)
    }

    /// Duplicate a video stream. Request each copy with [`NodeHandle::output`].
    pub fn split(&self) -> GraphResult<NodeHandle<'g>> {
        self.require(Capability::Filterable, "split")?;
        self.graph.node(
            "split",
            std::slice::from_ref(self),
            Arity::Exact(1),
            FilterArgs::new(),
        )
    }

    /// Duplicate an audio stream. Request each copy with [`NodeHandle::output`].
    pub fn asplit(&self) -> GraphResult<NodeHandle<'g>> {
        self.require(Capability::Filterable, "asplit")?;
        self.graph.node(
            "asplit",
            std::slice::from_ref(self),
            Arity::Exact(1),
            FilterArgs::new(),
        )
    }

    /// Concatenate `others` followed by `self`, so `self` is the last segment.
    /// See [`FilterGraph::concat`].
    pub fn concat(&self, others: &[Stream<'g>], parts: &[FilterArgs]) -> GraphResult<Stream<'g>> {
        self.require(Capability::Filterable, "concat")?;
        let mut streams = Vec::with_capacity(others.len() + 1);
        streams.extend_from_slice(others);
        streams.push(self.clone());
        self.graph.concat(&streams, parts)
    }
}

impl PartialEq for Stream<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph)
            && self.source == other.source
            && self.capability == other.capability
    }
}

impl Eq for Stream<'_> {}

impl fmt::Debug for Stream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("source", &self.source)
            .field("capability", &self.capability)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/stream.rs"]
mod tests;
