//! Bound variables.

use serde::Serialize;
use std::fmt;

/// A variable bound by a list transform or an object binding.
///
/// Identity is the numeric id; the label only makes dumps readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Variable {
    pub id: u32,
    pub label: String,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}{}", self.label, self.id)
    }
}

/// Allocates variables that are unique within one compilation.
#[derive(Debug, Default)]
pub struct VarGen {
    next: u32,
}

impl VarGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh variable.
    pub fn fresh(&mut self, label: &str) -> Variable {
        let id = self.next;
        self.next += 1;
        Variable {
            id,
            label: label.to_string(),
        }
    }
}
