use super::*;

#[test]
fn sink_only_streams_refuse_filters() {
    let graph = FilterGraph::new();
    let src = graph.source("0:v").unwrap();
    let sink = src.sink();

    assert_eq!(sink.capability(), Capability::SinkOnly);
    assert_eq!(sink.source(), src.source());

    match sink.filter("hflip", &[]) {
        Err(GraphError::IncompatibleStream {
            expected, actual, ..
        }) => {
            assert_eq!(expected, "filterable");
            assert_eq!(actual, "sink-only");
        }
        other => panic!("expected IncompatibleStream, got {other:?}"),
    }
    assert!(sink.split().is_err());
    assert!(src.filter_n(&[sink.clone()], "overlay", Arity::Exact(2), FilterArgs::new()).is_err());
    assert_eq!(graph.len(), 0);
}

#[test]
fn any_stream_may_terminate() {
    let graph = FilterGraph::new();
    let src = graph.source("in").unwrap();
    assert!(src.require(Capability::SinkOnly, "output").is_ok());
    assert!(src.sink().require(Capability::SinkOnly, "output").is_ok());
}

#[test]
fn filter_pops_label_option() {
    let graph = FilterGraph::new();
    let out = graph
        .source("in")
        .unwrap()
        .filter(
            "scale",
            &[FilterArgs::new().opt("w", 320), FilterArgs::new().opt("label", "small")],
        )
        .unwrap();

    assert_eq!(out.label().unwrap().as_str(), "small");
    let node = graph.get(NodeId(0)).unwrap();
    assert!(node.args().get("label").is_none());
    assert!(node.args().get("w").is_some());
}

#[test]
fn filter_n_puts_self_first() {
    let graph = FilterGraph::new();
    let main = graph.source("main").unwrap();
    let logo = graph.source("logo").unwrap();
    let handle = main
        .filter_n(&[logo.clone()], "overlay", Arity::Exact(2), FilterArgs::new())
        .unwrap();
    let node = handle.node().unwrap();
    assert_eq!(node.inputs(), &[main.source().clone(), logo.source().clone()]);
}

#[test]
fn streams_compare_by_graph_and_pad() {
    let g1 = FilterGraph::new();
    let g2 = FilterGraph::new();
    assert_eq!(g1.source("a").unwrap(), g1.source("a").unwrap());
    assert_ne!(g1.source("a").unwrap(), g2.source("a").unwrap());
    assert_ne!(g1.source("a").unwrap(), g1.source("a").unwrap().sink());
}

#[test]
fn concat_method_appends_self_last() {
    let graph = FilterGraph::new();
    let a = graph.source("a").unwrap();
    let b = graph.source("b").unwrap();
    let c = graph.source("c").unwrap();
    let out = c.concat(&[a.clone(), b.clone()], &[]).unwrap();
    let node = graph.get(out.source().node().unwrap()).unwrap();
    assert_eq!(node.filter(), "concat");
    assert_eq!(
        node.inputs(),
        &[a.source().clone(), b.source().clone(), c.source().clone()]
    );
    assert_eq!(node.args().get("n"), Some(&crate::Value::Int(3)));
}
