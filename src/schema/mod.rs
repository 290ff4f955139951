//! JSON description of a graph, for callers that do not build graphs in Rust.

pub(crate) mod description;
