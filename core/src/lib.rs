//! GRAFT Core Types
//!
//! This crate provides the foundational types used throughout GRAFT:
//! - Arena identifiers (TypeId, FieldId)
//! - Value types (the Value enum used for defaults, literals and inputs)
//! - Source locations attached to configuration objects and diagnostics

mod id;
mod location;
mod value;

pub use id::*;
pub use location::*;
pub use value::*;
