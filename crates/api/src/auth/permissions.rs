use axum::{extract::FromRequestParts, http::request::Parts};
use infra::repos::MemberRepo;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Employee,
    Member,
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "employee" => Role::Employee,
            _ => Role::Member,
        }
    }
}

/// Extractor for the authenticated caller. The JWT middleware stores verified
/// claims in the request extensions; absence means no valid token was sent.
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("access token required".to_string()))
    }
}

/// Check the caller's role against the required one. Admin implies employee;
/// everyone has member-level access.
pub fn require_role(claims: &Claims, required: Role) -> Result<(), AppError> {
    let role = Role::from(claims.role.as_str());

    let allowed = match required {
        Role::Admin => role == Role::Admin,
        Role::Employee => role == Role::Admin || role == Role::Employee,
        Role::Member => true,
    };

    if !allowed {
        return Err(AppError::Forbidden("insufficient permissions".to_string()));
    }

    Ok(())
}

/// Resolve the member profile belonging to the authenticated user.
pub async fn member_id_for_user(state: &AppState, claims: &Claims) -> Result<i64, AppError> {
    let user_id = claims.user_id()?;
    let member = MemberRepo::new(state.db.clone())
        .get_by_user_id(user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("member profile not found for this user".to_string())
        })?;

    Ok(member.id)
}
