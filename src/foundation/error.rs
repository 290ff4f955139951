/// Convenience result type used across the crate.
pub type GraphResult<T> = Result<T, GraphError>;

/// Top-level error taxonomy for graph construction and compilation.
#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    /// A node with a fixed arity received a different number of inputs.
    #[error(
        "arity mismatch: filter '{filter}' (node {node}) expects {expected} input(s), got {actual}"
    )]
    ArityMismatch {
        /// Filter name of the offending node.
        filter: String,
        /// Id the node would have been assigned.
        node: u32,
        /// Declared input count.
        expected: usize,
        /// Supplied input count.
        actual: usize,
    },

    /// An operation was invoked on a stream lacking the required capability.
    #[error("incompatible stream: cannot {action} on {actual} stream (requires {expected})")]
    IncompatibleStream {
        /// Operation that was attempted.
        action: String,
        /// Capability the operation requires.
        expected: &'static str,
        /// Capability the stream carries.
        actual: &'static str,
    },

    /// Option coercion requested a type the stored value cannot be converted to.
    #[error("type mismatch: option '{key}' expected {expected}, found '{found}'")]
    TypeMismatch {
        /// Option key.
        key: String,
        /// Requested type.
        expected: &'static str,
        /// Stored value, rendered.
        found: String,
    },

    /// Compilation was requested without any terminal stream.
    #[error("empty graph: no terminal streams to compile")]
    EmptyGraph,

    /// A construction invariant was broken.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    /// An explicit label cannot be embedded in the rendered graph.
    #[error("invalid label '{label}': {reason}")]
    InvalidLabel {
        /// Offending label.
        label: String,
        /// Why the label was rejected.
        reason: &'static str,
    },

    /// One explicit label was bound to two distinct pads.
    #[error("duplicate label '{label}'")]
    DuplicateLabel {
        /// Offending label.
        label: String,
    },

    /// A pad that was already handed out was requested again with a different label.
    #[error("label conflict: requested '{label}' for a pad already handed out as '{existing}'")]
    LabelConflict {
        /// Newly requested label.
        label: String,
        /// Label already bound to the pad; empty when the pad was handed out unlabelled.
        existing: String,
    },

    /// A stream built by one graph was handed to another.
    #[error("stream belongs to a different graph")]
    ForeignStream,

    /// Invalid user-provided data (descriptions, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GraphError {
    /// Build a [`GraphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GraphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`GraphError::InternalConsistency`] value.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalConsistency(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
