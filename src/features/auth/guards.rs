//! Role-based authorization guards.
//!
//! These guards extract the authenticated user and verify the role tier:
//! - super_user: global, every province
//! - provincial_supervisor: user management and review inside one province
//! - field_agent: data entry only

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for super-user or provincial supervisor access.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSuperTier(user): RequireSuperTier) { ... }
/// ```
pub struct RequireSuperTier(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireSuperTier
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_super_tier() {
            return Err(AppError::Forbidden(
                "Supervisor access required".to_string(),
            ));
        }

        Ok(RequireSuperTier(user.clone()))
    }
}
