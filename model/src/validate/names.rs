//! Naming rules for types and fields.

use crate::ValidationContext;
use graft_core::Location;
use regex_lite::Regex;
use std::sync::OnceLock;

fn identifier_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[_a-zA-Z][_a-zA-Z0-9]*$").ok())
        .as_ref()
}

fn is_identifier(name: &str) -> bool {
    identifier_pattern().map_or(true, |re| re.is_match(name))
}

/// Returns false if the name is unusable; style warnings do not count.
fn check_common(kind: &str, name: &str, location: &Location, ctx: &mut ValidationContext) -> bool {
    if name.is_empty() {
        ctx.error(format!("{} name is empty.", kind), location);
        return false;
    }
    if name.starts_with('_') {
        ctx.error(
            format!("{} names cannot start with an underscore.", kind),
            location,
        );
        return false;
    }
    if !is_identifier(name) {
        ctx.error(
            format!("{} name \"{}\" is not a valid identifier.", kind, name),
            location,
        );
        return false;
    }
    if name.contains('_') {
        ctx.warn(
            format!("{} names should not include underscores.", kind),
            location,
        );
    }
    true
}

pub(super) fn check_field_name(name: &str, location: &Location, ctx: &mut ValidationContext) {
    if !check_common("Field", name, location, ctx) {
        return;
    }
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        ctx.warn("Field names should start with a lowercase character.", location);
    }
}

pub(super) fn check_type_name(name: &str, location: &Location, ctx: &mut ValidationContext) {
    if !check_common("Type", name, location, ctx) {
        return;
    }
    if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
        ctx.warn("Type names should start with an uppercase character.", location);
    }
}
