//! Validation diagnostics.

use graft_core::Location;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note.
    Info,
    /// Style or likely-unintended construct; does not block compilation.
    Warning,
    /// Invalid schema; compilation is rejected.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
    pub location: Location,
}

impl ValidationMessage {
    pub fn new(severity: Severity, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity,
            message: message.into(),
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (at {})", self.severity, self.message, self.location)
    }
}

/// Collection of diagnostics produced by one validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    messages: Vec<ValidationMessage>,
}

impl ValidationContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>, location: &Location) {
        self.push(ValidationMessage::new(Severity::Error, message, location.clone()));
    }

    pub fn warn(&mut self, message: impl Into<String>, location: &Location) {
        self.push(ValidationMessage::new(Severity::Warning, message, location.clone()));
    }

    pub fn info(&mut self, message: impl Into<String>, location: &Location) {
        self.push(ValidationMessage::new(Severity::Info, message, location.clone()));
    }

    /// Check if there are any diagnostics.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if there are any error-level diagnostics.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.is_error())
    }

    /// Get all diagnostics.
    pub fn all(&self) -> &[ValidationMessage] {
        &self.messages
    }

    /// Get error-level diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.messages.iter().filter(|m| m.is_error())
    }

    /// Get warning-level diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.messages.iter().filter(|m| m.is_warning())
    }

    /// Diagnostics attached to a location.
    pub fn at<'a>(&'a self, location: &'a Location) -> impl Iterator<Item = &'a ValidationMessage> {
        self.messages.iter().filter(move |m| &m.location == location)
    }

    pub fn into_messages(self) -> Vec<ValidationMessage> {
        self.messages
    }
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}
