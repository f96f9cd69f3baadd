//! Permission metadata rules.

use crate::{Model, PermissionsConfig, ValidationContext};
use graft_core::Location;
use std::collections::HashMap;

/// A profile name and explicit roles are mutually exclusive; a named profile must exist.
pub(super) fn check_permissions(
    model: &Model,
    permissions: &PermissionsConfig,
    location: &Location,
    ctx: &mut ValidationContext,
) {
    if permissions.profile.is_some() && permissions.roles.is_some() {
        ctx.error(
            "A permission profile and explicit roles cannot be combined.",
            location,
        );
    }
    if let Some(profile) = &permissions.profile {
        if model.get_permission_profile(profile).is_none() {
            ctx.error(format!("Permission profile \"{}\" not found.", profile), location);
        }
    }
}

pub(super) fn check_duplicate_profiles(model: &Model, ctx: &mut ValidationContext) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for profile in model.permission_profiles() {
        *counts.entry(profile.name.as_str()).or_default() += 1;
    }
    for profile in model.permission_profiles() {
        if counts.get(profile.name.as_str()).copied().unwrap_or(0) > 1 {
            ctx.error(
                format!("Duplicate permission profile name: \"{}\".", profile.name),
                &profile.location,
            );
        }
    }
}
