//! Labels connecting goto statements to their targets.

use std::fmt;

/// An opaque jump target. Labels are unique within one lowered function
/// body; they index nothing until the evaluator builds its jump table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundLabel {
    id: u32,
}

impl BoundLabel {
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

impl fmt::Display for BoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label{}", self.id)
    }
}
