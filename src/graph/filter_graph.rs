use std::{cell::RefCell, collections::BTreeMap, fmt, sync::Arc};

use crate::{
    args::container::FilterArgs,
    compile::compiler::{CompiledGraph, compile_graph},
    compile::opts::CompileOpts,
    foundation::error::{GraphError, GraphResult},
    foundation::ids::{Label, NodeId},
    graph::node::{Arity, Node},
    graph::stream::{Capability, Pad, PadRef, Stream, StreamSource},
};

/// Arena owning every node of one graph-building session.
///
/// Streams and node handles borrow the graph and refer to nodes by [`NodeId`], so there are no
/// reference cycles. Node ids and labels are scoped to this value; independent graphs never
/// influence each other.
#[derive(Default)]
pub struct FilterGraph {
    nodes: RefCell<Vec<Arc<Node>>>,
    // Every output pad requested through a `NodeHandle`, with its explicit label if any.
    pads: RefCell<BTreeMap<PadRef, Option<Label>>>,
    labels: RefCell<BTreeMap<Label, StreamSource>>,
}

impl FilterGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream for an endpoint outside the graph, addressed by `label` (e.g. `0:v`).
    ///
    /// Asking for the same label twice yields the same stream.
    pub fn source(&self, label: &str) -> GraphResult<Stream<'_>> {
        let label = Label::new(label)?;
        let source = StreamSource::External(label.clone());
        self.bind_label(&label, &source)?;
        Ok(Stream {
            graph: self,
            source,
            capability: Capability::Filterable,
        })
    }

    /// Build a filter node reading `inputs` in order.
    ///
    /// Every input must be filterable and belong to this graph, and the input count must satisfy
    /// `arity`. The node's arguments are snapshotted; nothing about the filter itself is checked.
    pub fn node<'g>(
        &'g self,
        filter: &str,
        inputs: &[Stream<'g>],
        arity: Arity,
        args: FilterArgs,
    ) -> GraphResult<NodeHandle<'g>> {
        let action = format!("feed '{filter}'");
        for s in inputs {
            if !std::ptr::eq(s.graph, self) {
                return Err(GraphError::ForeignStream);
            }
            s.require(Capability::Filterable, &action)?;
        }

        let mut nodes = self.nodes.borrow_mut();
        let id = u32::try_from(nodes.len())
            .map(NodeId)
            .map_err(|_| GraphError::internal("node arena exhausted"))?;
        let sources = inputs.iter().map(|s| s.source.clone()).collect();
        let node = Node::new(id, filter, sources, arity, args)?;
        tracing::debug!(node = %id, filter, ?arity, inputs = inputs.len(), "built filter node");
        nodes.push(Arc::new(node));

        Ok(NodeHandle { graph: self, id })
    }

    /// Variable-arity node built from merged `parts`; outputs are requested from the handle.
    pub fn filter_multi_output<'g>(
        &'g self,
        inputs: &[Stream<'g>],
        filter: &str,
        parts: &[FilterArgs],
    ) -> GraphResult<NodeHandle<'g>> {
        self.node(filter, inputs, Arity::Variable, FilterArgs::merge(parts))
    }

    /// Variable-arity node built from merged `parts`, returning its default output.
    ///
    /// A non-empty `label` option is removed from the options and used as the output label.
    pub fn filter<'g>(
        &'g self,
        inputs: &[Stream<'g>],
        filter: &str,
        parts: &[FilterArgs],
    ) -> GraphResult<Stream<'g>> {
        let mut args = FilterArgs::merge(parts);
        let label = args.pop_string("label");
        let label = if label.is_empty() {
            None
        } else {
            let label = Label::new(label)?;
            self.check_label_free(&label)?;
            Some(label)
        };
        let handle = self.node(filter, inputs, Arity::Variable, args)?;
        handle.stream(label.as_ref().map(Label::as_str), None)
    }

    /// Concatenate `streams` segment by segment.
    ///
    /// Each segment holds `v` video streams (default 1) followed by `a` audio streams
    /// (default 0); the stream count must be a whole number of segments, and `n` is set to that
    /// number.
    pub fn concat<'g>(
        &'g self,
        streams: &[Stream<'g>],
        parts: &[FilterArgs],
    ) -> GraphResult<Stream<'g>> {
        let mut args = FilterArgs::merge(parts);
        let video = args.get_or("v", 1_i64)?;
        let audio = args.get_or("a", 0_i64)?;
        if video < 0 || audio < 0 {
            return Err(GraphError::validation(format!(
                "concat: stream counts must be non-negative, got v={video} a={audio}"
            )));
        }
        let per_segment = video.checked_add(audio).ok_or_else(|| {
            GraphError::validation(format!("concat: v={video} + a={audio} overflows"))
        })?;
        let count = i64::try_from(streams.len())
            .map_err(|_| GraphError::validation("concat: too many streams"))?;
        if per_segment == 0 || count == 0 || count % per_segment != 0 {
            return Err(GraphError::validation(format!(
                "concat: {count} stream(s) do not form whole segments of v={video} + a={audio}"
            )));
        }
        args.set("n", count / per_segment);
        self.node("concat", streams, Arity::Variable, args)?.out()
    }

    /// Render the graph reachable from `terminals` with default options.
    pub fn compile(&self, terminals: &[Stream<'_>]) -> GraphResult<CompiledGraph> {
        self.compile_with(terminals, &CompileOpts::default())
    }

    /// Render the graph reachable from `terminals`.
    pub fn compile_with(
        &self,
        terminals: &[Stream<'_>],
        opts: &CompileOpts,
    ) -> GraphResult<CompiledGraph> {
        compile_graph(self, terminals, opts)
    }

    /// Number of nodes built so far.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// True when no node has been built.
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Node with the given id.
    pub fn get(&self, id: NodeId) -> Option<Arc<Node>> {
        self.nodes.borrow().get(id.index()).cloned()
    }

    pub(crate) fn pad_label(&self, pad: PadRef) -> Option<Label> {
        self.pads.borrow().get(&pad).cloned().flatten()
    }

    /// Requested output pads of `node`, in pad order.
    pub(crate) fn output_pads(&self, node: NodeId) -> Vec<(Pad, Option<Label>)> {
        let lo = PadRef {
            node,
            pad: Pad(0),
        };
        let hi = PadRef {
            node,
            pad: Pad(u32::MAX),
        };
        self.pads
            .borrow()
            .range(lo..=hi)
            .map(|(p, l)| (p.pad, l.clone()))
            .collect()
    }

    fn check_label_free(&self, label: &Label) -> GraphResult<()> {
        if self.labels.borrow().contains_key(label) {
            return Err(GraphError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        Ok(())
    }

    fn bind_label(&self, label: &Label, owner: &StreamSource) -> GraphResult<()> {
        let mut labels = self.labels.borrow_mut();
        match labels.get(label) {
            Some(existing) if existing == owner => Ok(()),
            Some(_) => Err(GraphError::DuplicateLabel {
                label: label.to_string(),
            }),
            None => {
                labels.insert(label.clone(), owner.clone());
                Ok(())
            }
        }
    }
}

impl fmt::Debug for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterGraph")
            .field("nodes", &self.nodes.borrow().len())
            .field("pads", &self.pads.borrow().len())
            .finish()
    }
}

/// Output accessor for one node.
#[derive(Clone, Copy)]
pub struct NodeHandle<'g> {
    graph: &'g FilterGraph,
    id: NodeId,
}

impl<'g> NodeHandle<'g> {
    /// Id of the node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node itself.
    pub fn node(&self) -> Option<Arc<Node>> {
        self.graph.get(self.id)
    }

    /// Stream for output `pad` (default: the sole output), optionally with an explicit label.
    ///
    /// Requesting the same pad again yields an equal stream. Without a label the pad is
    /// auto-labelled at compile time. A label can only be given on the first request of a pad,
    /// so streams already handed out never change. Fails when `label` is already bound
    /// elsewhere, when the pad was already handed out under another label (or none), or when the
    /// pad index is not below [`Pad::LIMIT`].
    pub fn stream(&self, label: Option<&str>, pad: Option<Pad>) -> GraphResult<Stream<'g>> {
        let pad = pad.unwrap_or(Pad::DEFAULT);
        if pad.0 >= Pad::LIMIT {
            return Err(GraphError::validation(format!(
                "output pad {} of node {} exceeds the limit of {} pads",
                pad.0,
                self.id,
                Pad::LIMIT
            )));
        }
        let pad = PadRef { node: self.id, pad };
        let source = StreamSource::Pad(pad);
        let label = label.map(Label::new).transpose()?;

        let current = self.graph.pads.borrow().get(&pad).cloned();
        match (current, label) {
            (Some(existing), Some(requested)) if existing.as_ref() != Some(&requested) => {
                return Err(GraphError::LabelConflict {
                    label: requested.to_string(),
                    existing: existing.map(|l| l.to_string()).unwrap_or_default(),
                });
            }
            (Some(_), _) => {}
            (None, Some(requested)) => {
                self.graph.bind_label(&requested, &source)?;
                self.graph.pads.borrow_mut().insert(pad, Some(requested));
            }
            (None, None) => {
                self.graph.pads.borrow_mut().insert(pad, None);
            }
        }

        Ok(Stream {
            graph: self.graph,
            source,
            capability: Capability::Filterable,
        })
    }

    /// Default output, auto-labelled.
    pub fn out(&self) -> GraphResult<Stream<'g>> {
        self.stream(None, None)
    }

    /// Output `index`, auto-labelled.
    pub fn output(&self, index: u32) -> GraphResult<Stream<'g>> {
        self.stream(None, Some(Pad(index)))
    }
}

impl fmt::Debug for NodeHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/filter_graph.rs"]
mod tests;
