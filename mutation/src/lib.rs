//! GRAFT Mutation
//!
//! Create and update input shapes compiled to mutation IR.
//!
//! Responsibilities:
//! - Generate the ordered input fields of create/update shapes per type
//! - Coerce raw input values and reject malformed ones
//! - Emit IR mutation nodes against the object being written
//! - Report the fields a mutation touches
//!
//! # Module Structure
//!
//! - `generator` - Memoizing InputTypeGenerator and whole-mutation compilation
//! - `create` / `update` - Type-level input shapes
//! - `input` - Input fields and their per-kind behavior
//! - `coerce` - Scalar, identity and list coercion
//! - `shape` - Input shape descriptions for callers

mod coerce;
mod create;
mod error;
mod generator;
mod input;
mod shape;
mod update;

pub use create::CreateInputType;
pub use error::{MutationError, MutationResult};
pub use generator::{CompiledMutation, InputTypeGenerator};
pub use input::{InputField, InputFieldKind};
pub use shape::{AcceptedValue, InputShape};
pub use update::UpdateInputType;

#[cfg(test)]
mod tests;
