//! Identity resolution: turning header claims into store-backed principals.

use tracing::debug;

use crate::db::SchoolStore;
use crate::db::models::{DbPrincipal, DbStaff};
use crate::error::SchoolError;
use crate::middleware::identity::ActingIdentity;
use crate::types::role::Role;

/// A teacher whose claim has been checked against both `users` and `teachers`.
#[derive(Debug, Clone)]
pub struct AuthorizedTeacher {
    pub principal: DbPrincipal,
    pub staff: DbStaff,
}

/// Resolve the principal whose name and role match exactly.
///
/// Two or more matching rows are rejected as ambiguous rather than picking one.
pub async fn resolve_principal(
    store: &SchoolStore,
    name: &str,
    role: Role,
) -> Result<DbPrincipal, SchoolError> {
    let mut rows = store.principals_by_name_role(name, role, 2).await?;
    match rows.len() {
        0 => Err(SchoolError::not_found(format!(
            "No {role} found with the name \"{name}\"."
        ))),
        1 => Ok(rows.remove(0)),
        _ => Err(SchoolError::conflict(format!(
            "More than one {role} is named \"{name}\"; the identity is ambiguous."
        ))),
    }
}

pub async fn resolve_staff_by_principal(
    store: &SchoolStore,
    principal: &DbPrincipal,
) -> Result<DbStaff, SchoolError> {
    store
        .staff_by_principal(principal.id)
        .await?
        .ok_or_else(|| {
            SchoolError::not_found(format!(
                "No teacher record linked to user \"{}\".",
                principal.name
            ))
        })
}

/// Resolve a principal from any role claim; the claim is lower-cased first.
pub async fn resolve_claimed_principal(
    store: &SchoolStore,
    identity: &ActingIdentity,
) -> Result<DbPrincipal, SchoolError> {
    let (Some(name), Some(claim)) = (identity.name.as_deref(), identity.role.as_deref()) else {
        return Err(SchoolError::validation(
            "User type and name must be provided in headers.",
        ));
    };
    let role = Role::from_claim(claim)?;
    resolve_principal(store, name, role).await
}

/// Gate for every teacher-attributed write.
///
/// The role claim must be exactly `teacher`; this is checked before any
/// store access. The principal and then the staff record are resolved.
pub async fn authorize_teacher_write(
    store: &SchoolStore,
    identity: &ActingIdentity,
) -> Result<AuthorizedTeacher, SchoolError> {
    let name = match (identity.name.as_deref(), identity.role.as_deref()) {
        (Some(name), Some(role)) if role == Role::Teacher.as_str() => name,
        _ => {
            return Err(SchoolError::Unauthorized(
                "Unauthorized or invalid user role.".to_string(),
            ));
        }
    };

    let principal = resolve_principal(store, name, Role::Teacher).await?;
    let staff = resolve_staff_by_principal(store, &principal).await?;
    debug!(
        principal_id = principal.id,
        staff_id = staff.id,
        "teacher write authorized"
    );
    Ok(AuthorizedTeacher { principal, staff })
}
