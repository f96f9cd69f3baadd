//! GRAFT Compiler
//!
//! Turn a model configuration into a validated model ready for IR compilation.
//!
//! Responsibilities:
//! - Build the model from its configuration
//! - Run model validation and keep the full report
//! - Reject models whose report contains errors
//! - Hand out the field access and input shape compilers of an accepted model

mod compiler;
mod error;

pub use compiler::{compile, compile_json, compile_model, CompiledSchema};
pub use error::{CompileError, CompileResult};
