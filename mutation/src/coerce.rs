//! Raw value coercion for scalar, enum and identity inputs.

use crate::{MutationError, MutationResult};
use graft_core::Value;
use graft_model::{TypeDef, TypeKind};
use regex_lite::Regex;
use std::sync::OnceLock;

fn date_time_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})?)?$",
            )
            .ok()
        })
        .as_ref()
}

fn is_date_time(text: &str) -> bool {
    date_time_pattern().map_or(true, |re| re.is_match(text))
}

/// Coerce a value for a scalar or enum typed input. Null passes through.
pub(crate) fn coerce_scalar(input: &str, type_def: &TypeDef, value: &Value) -> MutationResult<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let invalid = || MutationError::invalid_value(input, &type_def.name, value.type_name());

    if type_def.kind == TypeKind::Enum {
        return match value.as_str() {
            Some(text) if type_def.enum_values.iter().any(|v| v == text) => Ok(value.clone()),
            _ => Err(invalid()),
        };
    }

    match (type_def.name.as_str(), value) {
        ("ID", _) => coerce_id(input, value),
        ("String", Value::String(_)) => Ok(value.clone()),
        ("Int", Value::Int(_)) => Ok(value.clone()),
        ("Float", Value::Float(_)) => Ok(value.clone()),
        ("Float", Value::Int(n)) => Ok(Value::Float(*n as f64)),
        ("Boolean", Value::Bool(_)) => Ok(value.clone()),
        ("DateTime", Value::String(text)) if is_date_time(text) => Ok(value.clone()),
        ("JSON", _) => Ok(value.clone()),
        ("String" | "Int" | "Float" | "Boolean" | "DateTime", _) => Err(invalid()),
        // Declared scalars carry no format of their own
        _ => Ok(value.clone()),
    }
}

/// Coerce an entity identity. Integers are normalized to strings; null is rejected.
pub(crate) fn coerce_id(input: &str, value: &Value) -> MutationResult<Value> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Int(n) => Ok(Value::String(n.to_string())),
        _ => Err(MutationError::invalid_value(input, "ID", value.type_name())),
    }
}

/// Coerce a list-typed input. Null becomes the empty list; each item goes through `item`.
pub(crate) fn coerce_list(
    input: &str,
    value: &Value,
    mut item: impl FnMut(&Value) -> MutationResult<Value>,
) -> MutationResult<Value> {
    match value {
        Value::Null => Ok(Value::empty_list()),
        Value::List(items) => Ok(Value::List(
            items.iter().map(&mut item).collect::<MutationResult<Vec<_>>>()?,
        )),
        _ => Err(MutationError::not_a_list(input, value.type_name())),
    }
}

/// Items of an already coerced list value.
pub(crate) fn coerced_items(value: &Value) -> &[Value] {
    value.as_list().unwrap_or(&[])
}
