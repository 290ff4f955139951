use super::*;

#[test]
fn node_ids_follow_construction_order() {
    let graph = FilterGraph::new();
    let src = graph.source("in").unwrap();
    let a = src.filter("hflip", &[]).unwrap();
    let b = a.filter("vflip", &[]).unwrap();

    assert_eq!(a.source().node(), Some(NodeId(0)));
    assert_eq!(b.source().node(), Some(NodeId(1)));
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.get(NodeId(1)).unwrap().filter(), "vflip");
    assert!(graph.get(NodeId(2)).is_none());
}

#[test]
fn failed_construction_does_not_consume_an_id() {
    let graph = FilterGraph::new();
    let src = graph.source("in").unwrap();
    assert!(
        graph
            .node("overlay", &[src.clone()], Arity::Exact(2), FilterArgs::new())
            .is_err()
    );
    let ok = graph
        .node("hflip", &[src], Arity::Exact(1), FilterArgs::new())
        .unwrap();
    assert_eq!(ok.id(), NodeId(0));
    assert!(!graph.is_empty());
}

#[test]
fn rejected_output_label_does_not_consume_an_id() {
    let graph = FilterGraph::new();
    let src = graph.source("in").unwrap();

    assert!(matches!(
        src.filter("hflip", &[FilterArgs::new().opt("label", "bad label")]),
        Err(GraphError::InvalidLabel { .. })
    ));
    assert!(matches!(
        src.filter("hflip", &[FilterArgs::new().opt("label", "in")]),
        Err(GraphError::DuplicateLabel { .. })
    ));
    assert!(graph.is_empty());

    let ok = src
        .filter("hflip", &[FilterArgs::new().opt("label", "flipped")])
        .unwrap();
    assert_eq!(ok.source().node(), Some(NodeId(0)));
    assert!(matches!(
        src.filter("vflip", &[FilterArgs::new().opt("label", "flipped")]),
        Err(GraphError::DuplicateLabel { .. })
    ));
    assert_eq!(graph.len(), 1);
}

#[test]
fn arity_is_checked_per_node() {
    let graph = FilterGraph::new();
    let src = graph.source("in").unwrap();
    assert!(
        graph
            .node("hflip", &[src.clone()], Arity::Exact(1), FilterArgs::new())
            .is_ok()
    );
    assert!(matches!(
        graph.node("blend", &[src.clone()], Arity::Exact(2), FilterArgs::new()),
        Err(GraphError::ArityMismatch { .. })
    ));
    assert!(
        graph
            .node("blend", &[src.clone(), src], Arity::Exact(2), FilterArgs::new())
            .is_ok()
    );
}

#[test]
fn streams_from_other_graphs_are_rejected() {
    let g1 = FilterGraph::new();
    let g2 = FilterGraph::new();
    let foreign = g2.source("in").unwrap();
    assert!(matches!(
        g1.node("hflip", &[foreign], Arity::Exact(1), FilterArgs::new()),
        Err(GraphError::ForeignStream)
    ));
}

#[test]
fn same_pad_twice_is_the_same_stream() {
    let graph = FilterGraph::new();
    let split = graph.source("in").unwrap().split().unwrap();
    let a = split.output(0).unwrap();
    let again = split.output(0).unwrap();
    let b = split.output(1).unwrap();

    assert_eq!(a, again);
    assert_ne!(a, b);
    assert_eq!(split.out().unwrap(), a);
    assert_eq!(graph.output_pads(split.id()).len(), 2);
}

#[test]
fn explicit_labels_bind_once() {
    let graph = FilterGraph::new();
    let split = graph.source("in").unwrap().split().unwrap();

    let a = split.stream(Some("left"), Some(Pad(0))).unwrap();
    assert_eq!(a.label().unwrap().as_str(), "left");

    // Re-requesting without a label or with the same label is fine.
    assert_eq!(split.output(0).unwrap().label().unwrap().as_str(), "left");
    assert!(split.stream(Some("left"), Some(Pad(0))).is_ok());

    assert!(matches!(
        split.stream(Some("other"), Some(Pad(0))),
        Err(GraphError::LabelConflict { .. })
    ));
    assert!(matches!(
        split.stream(Some("left"), Some(Pad(1))),
        Err(GraphError::DuplicateLabel { .. })
    ));
    assert!(matches!(
        split.stream(Some("in"), Some(Pad(1))),
        Err(GraphError::DuplicateLabel { .. })
    ));
    assert!(matches!(
        graph.source("left"),
        Err(GraphError::DuplicateLabel { .. })
    ));
}

#[test]
fn handed_out_pads_cannot_be_relabelled() {
    let graph = FilterGraph::new();
    let node = graph
        .filter_multi_output(&[graph.source("in").unwrap()], "split", &[])
        .unwrap();
    let early = node.out().unwrap();
    match node.stream(Some("named"), None) {
        Err(GraphError::LabelConflict { label, existing }) => {
            assert_eq!(label, "named");
            assert!(existing.is_empty());
        }
        other => panic!("expected LabelConflict, got {other:?}"),
    }
    assert!(early.label().is_none());
    assert_eq!(node.out().unwrap(), early);

    // The rejected label stays free for another pad.
    let named = node.stream(Some("named"), Some(Pad(1))).unwrap();
    assert_eq!(named.label().unwrap().as_str(), "named");
}

#[test]
fn pad_indices_are_bounded() {
    let graph = FilterGraph::new();
    let split = graph.source("in").unwrap().split().unwrap();
    assert!(split.output(Pad::LIMIT - 1).is_ok());
    for index in [Pad::LIMIT, 2_000_000, u32::MAX] {
        assert!(
            matches!(split.output(index), Err(GraphError::Validation(_))),
            "{index}"
        );
    }
    assert_eq!(graph.output_pads(split.id()).len(), 1);
}

#[test]
fn same_source_label_is_one_endpoint() {
    let graph = FilterGraph::new();
    assert_eq!(graph.source("0:v").unwrap(), graph.source("0:v").unwrap());
    assert!(matches!(
        graph.source("bad label"),
        Err(GraphError::InvalidLabel { .. })
    ));
}

#[test]
fn concat_counts_segments() {
    let graph = FilterGraph::new();
    let v0 = graph.source("v0").unwrap();
    let a0 = graph.source("a0").unwrap();
    let v1 = graph.source("v1").unwrap();
    let a1 = graph.source("a1").unwrap();

    let out = graph
        .concat(
            &[v0.clone(), a0.clone(), v1.clone(), a1.clone()],
            &[FilterArgs::new().opt("a", 1)],
        )
        .unwrap();
    let node = graph.get(out.source().node().unwrap()).unwrap();
    assert_eq!(node.args().get("n"), Some(&crate::Value::Int(2)));
    assert_eq!(node.arity(), Arity::Variable);

    assert!(matches!(
        graph.concat(&[v0.clone(), a0.clone(), v1], &[FilterArgs::new().opt("a", 1)]),
        Err(GraphError::Validation(_))
    ));
    assert!(matches!(
        graph.concat(&[], &[]),
        Err(GraphError::Validation(_))
    ));
    assert!(matches!(
        graph.concat(&[v0, a0], &[FilterArgs::new().opt("v", "x")]),
        Err(GraphError::TypeMismatch { .. })
    ));
}

#[test]
fn concat_rejects_out_of_range_segment_sizes() {
    let graph = FilterGraph::new();
    let v = graph.source("v").unwrap();
    let a = graph.source("a").unwrap();

    for parts in [
        FilterArgs::new().opt("v", i64::MAX).opt("a", 1),
        FilterArgs::new().opt("v", -1).opt("a", 2),
        FilterArgs::new().opt("v", 0).opt("a", 0),
    ] {
        assert!(
            matches!(
                graph.concat(&[v.clone(), a.clone()], std::slice::from_ref(&parts)),
                Err(GraphError::Validation(_))
            ),
            "{parts:?}"
        );
    }
    assert!(graph.is_empty());
}
