//! Main compiler implementation.

use crate::{CompileError, CompileResult};
use graft_model::{Model, ModelConfig, ValidationContext};
use graft_mutation::InputTypeGenerator;
use graft_query::FieldAccess;

/// A model that passed validation, together with its report.
///
/// The report may still hold warnings and infos.
#[derive(Debug)]
pub struct CompiledSchema {
    model: Model,
    report: ValidationContext,
}

impl CompiledSchema {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn report(&self) -> &ValidationContext {
        &self.report
    }

    /// Read access compiler for this model.
    pub fn field_access(&self) -> FieldAccess<'_> {
        FieldAccess::new(&self.model)
    }

    /// A fresh input shape generator for this model.
    ///
    /// Shapes are memoized per generator; keep one around to share them.
    pub fn input_types(&self) -> InputTypeGenerator<'_> {
        InputTypeGenerator::new(&self.model)
    }

    pub fn into_parts(self) -> (Model, ValidationContext) {
        (self.model, self.report)
    }
}

/// Validate a built model, rejecting it if the report contains errors.
pub fn compile_model(model: Model) -> CompileResult<CompiledSchema> {
    let report = model.validate();

    if report.has_errors() {
        let errors = report.errors().count();
        tracing::warn!(errors, messages = report.len(), "model rejected");
        for message in report.errors() {
            tracing::debug!(%message, "validation error");
        }
        return Err(CompileError::rejected(report.into_messages()));
    }

    tracing::debug!(
        types = model.declared_types().count(),
        warnings = report.warnings().count(),
        "model accepted"
    );
    Ok(CompiledSchema { model, report })
}

/// Build and validate a model from its configuration.
pub fn compile(config: ModelConfig) -> CompileResult<CompiledSchema> {
    compile_model(Model::from_config(config)?)
}

/// Build and validate a model from a JSON configuration.
pub fn compile_json(source: &str) -> CompileResult<CompiledSchema> {
    compile(ModelConfig::from_json(source)?)
}
