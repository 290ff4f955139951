//! Filter arguments: positional values plus keyed options.

pub(crate) mod container;
pub(crate) mod value;
