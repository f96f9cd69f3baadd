//! Calc mutation operators.
//!
//! A calc mutation combines a supplied value with the currently stored value
//! instead of overwriting it. The operator table below is fixed; every
//! operator lists the scalar types it can be applied to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A calc mutation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalcOperator {
    Multiply,
    Divide,
    Add,
    Subtract,
    Modulo,
    Append,
    Prepend,
}

struct OperatorInfo {
    operator: CalcOperator,
    name: &'static str,
    prefix: &'static str,
    supported_types: &'static [&'static str],
}

const NUMERIC: &[&str] = &["Int", "Float"];
const TEXTUAL: &[&str] = &["String"];

static OPERATORS: &[OperatorInfo] = &[
    OperatorInfo {
        operator: CalcOperator::Multiply,
        name: "MULTIPLY",
        prefix: "multiplyWith",
        supported_types: NUMERIC,
    },
    OperatorInfo {
        operator: CalcOperator::Divide,
        name: "DIVIDE",
        prefix: "divideBy",
        supported_types: NUMERIC,
    },
    OperatorInfo {
        operator: CalcOperator::Add,
        name: "ADD",
        prefix: "increaseBy",
        supported_types: NUMERIC,
    },
    OperatorInfo {
        operator: CalcOperator::Subtract,
        name: "SUBTRACT",
        prefix: "decreaseBy",
        supported_types: NUMERIC,
    },
    OperatorInfo {
        operator: CalcOperator::Modulo,
        name: "MODULO",
        prefix: "moduloOf",
        supported_types: NUMERIC,
    },
    OperatorInfo {
        operator: CalcOperator::Append,
        name: "APPEND",
        prefix: "appendTo",
        supported_types: TEXTUAL,
    },
    OperatorInfo {
        operator: CalcOperator::Prepend,
        name: "PREPEND",
        prefix: "prependTo",
        supported_types: TEXTUAL,
    },
];

impl CalcOperator {
    /// All operators, in table order.
    pub fn all() -> impl Iterator<Item = CalcOperator> {
        OPERATORS.iter().map(|info| info.operator)
    }

    /// Look up an operator by its configuration name.
    pub fn from_name(name: &str) -> Option<CalcOperator> {
        OPERATORS
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.operator)
    }

    fn info(&self) -> &'static OperatorInfo {
        // Table rows follow variant order.
        &OPERATORS[*self as usize]
    }

    /// Configuration name, e.g. "ADD".
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Prefix of the generated input field, e.g. "increaseBy".
    pub fn prefix(&self) -> &'static str {
        self.info().prefix
    }

    /// Scalar types this operator can be applied to.
    pub fn supported_types(&self) -> &'static [&'static str] {
        self.info().supported_types
    }

    pub fn supports(&self, type_name: &str) -> bool {
        self.supported_types().contains(&type_name)
    }

    /// Name of the update input field for this operator on `field_name`.
    pub fn input_name(&self, field_name: &str) -> String {
        format!("{}{}", self.prefix(), capitalize(field_name))
    }
}

impl fmt::Display for CalcOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Operators applicable to fields of the given scalar type.
pub fn operators_for_type(type_name: &str) -> Vec<CalcOperator> {
    CalcOperator::all()
        .filter(|op| op.supports(type_name))
        .collect()
}

/// Uppercase the first character of a name.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_follows_variant_order() {
        for (i, info) in OPERATORS.iter().enumerate() {
            assert_eq!(info.operator as usize, i);
        }
    }

    #[test]
    fn test_from_name_covers_table() {
        for op in CalcOperator::all() {
            assert_eq!(CalcOperator::from_name(op.name()), Some(op));
        }
        assert_eq!(CalcOperator::from_name("POWER"), None);
    }

    #[test]
    fn test_operators_for_type() {
        assert_eq!(
            operators_for_type("String"),
            vec![CalcOperator::Append, CalcOperator::Prepend]
        );
        assert_eq!(operators_for_type("Int").len(), 5);
        assert!(operators_for_type("Boolean").is_empty());
    }

    #[test]
    fn test_input_name() {
        assert_eq!(CalcOperator::Add.input_name("quantity"), "increaseByQuantity");
        assert_eq!(CalcOperator::Append.input_name("notes"), "appendToNotes");
    }
}
