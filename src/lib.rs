//! Build media filter graphs with a fluent API and compile them into the filter-graph text
//! accepted by a media engine (e.g. ffmpeg's `-filter_complex`).
//!
//! # Pipeline overview
//!
//! 1. **Build**: a [`FilterGraph`] owns every [`Node`]. Filter-building calls on [`Stream`]s
//!    create nodes and hand back new streams for their outputs.
//! 2. **Compile**: [`FilterGraph::compile`] walks back from the terminal streams, orders the
//!    reachable nodes, labels every pad and renders the expression as a [`CompiledGraph`].
//!
//! ```
//! use filtergraph::{FilterArgs, FilterGraph};
//!
//! let graph = FilterGraph::new();
//! let out = graph
//!     .source("s0")?
//!     .filter("scale", &[FilterArgs::positional(["320", "240"])])?
//!     .filter("hflip", &[])?;
//! let compiled = graph.compile(&[out])?;
//! assert_eq!(compiled.expression, "[s0]scale=320:240[l1];[l1]hflip[l2]");
//! # Ok::<(), filtergraph::GraphError>(())
//! ```
//!
//! The core knows nothing about individual filters: names and options are passed through
//! opaquely, and nothing is executed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod args;
mod compile;
mod foundation;
mod graph;
mod schema;

pub use args::container::FilterArgs;
pub use args::value::{FromValue, Value};
pub use compile::compiler::{CompiledGraph, compile_graph};
pub use compile::labels::LabelAllocator;
pub use compile::opts::CompileOpts;
pub use foundation::error::{GraphError, GraphResult};
pub use foundation::ids::{Label, NodeId};
pub use graph::filter_graph::{FilterGraph, NodeHandle};
pub use graph::node::{Arity, Node};
pub use graph::stream::{Capability, Pad, PadRef, Stream, StreamSource};
pub use schema::description::{GraphDescription, NodeDescription, OutputDescription};
