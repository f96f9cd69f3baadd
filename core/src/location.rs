//! Source locations.
//!
//! The schema parser attaches a `Location` to every declaration it produces.
//! The model never interprets it; it is carried along and copied onto every
//! diagnostic raised against the declaration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to the place a declaration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    /// Name of the source document, if known.
    pub source: Option<String>,
    /// 1-based line, 0 if unknown.
    pub line: usize,
    /// 1-based column, 0 if unknown.
    pub column: usize,
}

impl Location {
    pub fn new(source: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            source: Some(source.into()),
            line,
            column,
        }
    }

    /// Location for declarations synthesized by the model itself.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.source.is_none() && self.line == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}:{}:{}", source, self.line, self.column),
            None if self.line > 0 => write!(f, "line {}, column {}", self.line, self.column),
            None => write!(f, "<unknown>"),
        }
    }
}
