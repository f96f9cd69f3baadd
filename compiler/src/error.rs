//! Compiler error types.

use graft_model::{ModelError, ValidationMessage};
use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Validation reported errors. Carries every diagnostic, not only the errors.
    #[error("Model rejected with {} error(s)", count_errors(.messages))]
    Rejected { messages: Vec<ValidationMessage> },

    /// Model construction fault.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

fn count_errors(messages: &[ValidationMessage]) -> usize {
    messages.iter().filter(|m| m.is_error()).count()
}

impl CompileError {
    pub fn rejected(messages: Vec<ValidationMessage>) -> Self {
        Self::Rejected { messages }
    }

    /// Diagnostics of a rejected model; empty for construction faults.
    pub fn messages(&self) -> &[ValidationMessage] {
        match self {
            Self::Rejected { messages } => messages,
            Self::Model(_) => &[],
        }
    }
}

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;
