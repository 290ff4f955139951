//! Graph compilation: discovery, ordering, labelling and rendering.

pub(crate) mod compiler;
pub(crate) mod labels;
pub(crate) mod opts;
pub(crate) mod render;
