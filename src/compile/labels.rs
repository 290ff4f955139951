use std::collections::BTreeSet;

use crate::foundation::error::{GraphError, GraphResult};
use crate::foundation::ids::Label;

/// Hands out `<prefix><n>` labels for pads the caller left unnamed.
///
/// Scoped to a single compilation. Values equal to a reserved (explicit) label are skipped, and
/// no value is ever handed out twice.
#[derive(Debug)]
pub struct LabelAllocator {
    prefix: String,
    next: u64,
    taken: BTreeSet<String>,
}

impl LabelAllocator {
    /// Allocator counting up from `first`.
    pub fn new(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: first,
            taken: BTreeSet::new(),
        }
    }

    /// Never hand out `label`.
    pub fn reserve(&mut self, label: &Label) {
        self.taken.insert(label.as_str().to_string());
    }

    /// Next free label.
    pub fn next_label(&mut self) -> GraphResult<Label> {
        loop {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next = self
                .next
                .checked_add(1)
                .ok_or_else(|| GraphError::internal("label counter overflow"))?;
            if self.taken.insert(candidate.clone()) {
                return Label::new(candidate);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/labels.rs"]
mod tests;
