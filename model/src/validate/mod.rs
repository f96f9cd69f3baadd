//! Model validation.
//!
//! Validation walks every declared type and field and appends diagnostics to
//! a single `ValidationContext`. It never fails and never mutates the model,
//! so one pass reports every problem in the schema.

mod fields;
mod names;
mod permissions;
mod types;

use crate::{Model, ValidationContext};

/// Validate a complete model.
pub(crate) fn validate_model(model: &Model) -> ValidationContext {
    let mut ctx = ValidationContext::new();

    types::check_duplicate_type_names(model, &mut ctx);
    permissions::check_duplicate_profiles(model, &mut ctx);

    for type_def in model.declared_types() {
        types::validate_type(model, type_def, &mut ctx);
        for field in model.fields_of(type_def.id) {
            if field.is_system_field {
                continue;
            }
            fields::validate_field(model, field, &mut ctx);
        }
    }

    tracing::debug!(
        errors = ctx.errors().count(),
        warnings = ctx.warnings().count(),
        total = ctx.len(),
        "validated model"
    );
    ctx
}
