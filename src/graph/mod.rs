//! Node/stream data model and the arena that owns it.

pub(crate) mod filter_graph;
pub(crate) mod node;
pub(crate) mod stream;
