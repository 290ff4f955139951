use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
    fmt,
    sync::Arc,
};

use crate::{
    compile::labels::LabelAllocator,
    compile::opts::CompileOpts,
    compile::render::{filter_spec, write_node},
    foundation::error::{GraphError, GraphResult},
    foundation::ids::{Label, NodeId},
    graph::filter_graph::FilterGraph,
    graph::node::Node,
    graph::stream::{Pad, PadRef, Stream, StreamSource},
};

/// Rendered filter-graph expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledGraph {
    /// Text to pass to the media engine as its filter-graph option.
    pub expression: String,
    /// Resolved label of each terminal stream, in the order the terminals were given.
    pub outputs: Vec<Label>,
    /// Number of rendered nodes.
    pub node_count: usize,
}

impl fmt::Display for CompiledGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Render every node reachable from `terminals`.
///
/// Nodes are emitted in topological order, ties broken by ascending [`NodeId`], and pads without
/// an explicit label get one from a [`LabelAllocator`] that skips every explicit label of the
/// graph. Identical construction sequences therefore compile to identical text.
#[tracing::instrument(level = "debug", skip_all, fields(terminals = terminals.len()))]
pub fn compile_graph(
    graph: &FilterGraph,
    terminals: &[Stream<'_>],
    opts: &CompileOpts,
) -> GraphResult<CompiledGraph> {
    opts.validate()?;
    if terminals.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    if terminals.iter().any(|t| !std::ptr::eq(t.graph, graph)) {
        return Err(GraphError::ForeignStream);
    }

    let nodes = discover(graph, terminals)?;
    if nodes.is_empty() {
        return Err(GraphError::EmptyGraph);
    }
    let order = topo_order(&nodes)?;
    let labels = resolve_labels(graph, &nodes, &order, terminals, opts)?;

    let mut expression = String::new();
    for (i, id) in order.iter().enumerate() {
        let node = &nodes[id];
        let inputs = node
            .inputs()
            .iter()
            .map(|s| labels.lookup(s))
            .collect::<GraphResult<Vec<_>>>()?;
        let outputs = labels.outputs.get(id).map(Vec::as_slice).unwrap_or(&[]);
        if i > 0 {
            expression.push(';');
        }
        write_node(
            &mut expression,
            &inputs,
            &filter_spec(node, opts.escape),
            outputs,
        );
    }

    let outputs = terminals
        .iter()
        .map(|t| labels.lookup(&t.source))
        .collect::<GraphResult<Vec<_>>>()?;

    tracing::debug!(
        nodes = order.len(),
        len = expression.len(),
        "compiled filter graph"
    );
    Ok(CompiledGraph {
        expression,
        outputs,
        node_count: order.len(),
    })
}

/// Nodes reachable backwards from `terminals`, keyed by id.
fn discover(
    graph: &FilterGraph,
    terminals: &[Stream<'_>],
) -> GraphResult<BTreeMap<NodeId, Arc<Node>>> {
    let mut found = BTreeMap::new();
    let mut stack: Vec<NodeId> = terminals.iter().filter_map(|t| t.source.node()).collect();
    while let Some(id) = stack.pop() {
        if found.contains_key(&id) {
            continue;
        }
        let node = graph
            .get(id)
            .ok_or_else(|| GraphError::internal(format!("stream references unknown node {id}")))?;
        stack.extend(node.upstream().filter(|up| !found.contains_key(up)));
        found.insert(id, node);
    }
    Ok(found)
}

/// Kahn's algorithm with a min-heap, so independent nodes come out in construction order.
fn topo_order(nodes: &BTreeMap<NodeId, Arc<Node>>) -> GraphResult<Vec<NodeId>> {
    let mut pending: BTreeMap<NodeId, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for (&id, node) in nodes {
        let mut count = 0;
        for up in node.upstream() {
            if !nodes.contains_key(&up) {
                return Err(GraphError::internal(format!(
                    "node {id} reads from node {up} outside the discovered graph"
                )));
            }
            dependents.entry(up).or_default().push(id);
            count += 1;
        }
        pending.insert(id, count);
    }

    let mut ready: BinaryHeap<Reverse<NodeId>> = pending
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(id, _)| Reverse(*id))
        .collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(Reverse(id)) = ready.pop() {
        order.push(id);
        for dep in dependents.get(&id).map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(n) = pending.get_mut(dep) {
                *n -= 1;
                if *n == 0 {
                    ready.push(Reverse(*dep));
                }
            }
        }
    }

    if order.len() != nodes.len() {
        return Err(GraphError::internal("filter graph contains a cycle"));
    }
    Ok(order)
}

struct ResolvedLabels {
    pads: BTreeMap<PadRef, Label>,
    outputs: BTreeMap<NodeId, Vec<Label>>,
}

impl ResolvedLabels {
    fn lookup(&self, source: &StreamSource) -> GraphResult<Label> {
        match source {
            StreamSource::External(l) => Ok(l.clone()),
            StreamSource::Pad(p) => self.pads.get(p).cloned().ok_or_else(|| {
                GraphError::internal(format!(
                    "output pad {} of node {} was never requested",
                    p.pad.0, p.node
                ))
            }),
        }
    }
}

/// Give every output pad of every node a label.
///
/// Pads are rendered positionally, so a node whose highest requested pad is `k` gets labels for
/// all of `0..=k`.
fn resolve_labels(
    graph: &FilterGraph,
    nodes: &BTreeMap<NodeId, Arc<Node>>,
    order: &[NodeId],
    terminals: &[Stream<'_>],
    opts: &CompileOpts,
) -> GraphResult<ResolvedLabels> {
    let requested: BTreeMap<NodeId, Vec<(Pad, Option<Label>)>> = order
        .iter()
        .map(|&id| (id, graph.output_pads(id)))
        .collect();

    let mut alloc = LabelAllocator::new(opts.label_prefix.clone(), opts.first_label);
    let externals = nodes
        .values()
        .flat_map(|n| n.inputs().iter())
        .chain(terminals.iter().map(|t| &t.source));
    for s in externals {
        if let StreamSource::External(l) = s {
            alloc.reserve(l);
        }
    }
    for (_, label) in requested.values().flatten() {
        if let Some(l) = label {
            alloc.reserve(l);
        }
    }

    let mut resolved = ResolvedLabels {
        pads: BTreeMap::new(),
        outputs: BTreeMap::new(),
    };
    for &id in order {
        let pads = &requested[&id];
        let Some((Pad(max), _)) = pads.last() else {
            return Err(GraphError::internal(format!(
                "node {id} is reachable but none of its outputs was requested"
            )));
        };
        let explicit: BTreeMap<Pad, &Label> = pads
            .iter()
            .filter_map(|(p, l)| l.as_ref().map(|l| (*p, l)))
            .collect();

        let mut outs = Vec::with_capacity(*max as usize + 1);
        for index in 0..=*max {
            let pad = Pad(index);
            let label = match explicit.get(&pad) {
                Some(l) => (*l).clone(),
                None => {
                    let l = alloc.next_label()?;
                    tracing::trace!(node = %id, pad = index, label = %l, "assigned label");
                    l
                }
            };
            resolved.pads.insert(PadRef { node: id, pad }, label.clone());
            outs.push(label);
        }
        resolved.outputs.insert(id, outs);
    }
    Ok(resolved)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
