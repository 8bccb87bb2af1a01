//! Role-based access control (RBAC) extractors.
//!
//! Wraps [`AuthUser`] and rejects requests whose role does not meet the
//! minimum requirement, enforcing authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use smarthr_core::error::CoreError;
use smarthr_core::roles::{ROLE_ADMIN, ROLE_HR};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `hr` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// Every mutating HR operation (employee lifecycle, organization CRUD,
/// transfers) gates on this extractor:
///
/// ```ignore
/// async fn hr_or_admin(RequireHr(user): RequireHr) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireHr(pub AuthUser);

impl FromRequestParts<AppState> for RequireHr {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_HR {
            return Err(AppError::Core(CoreError::Forbidden(
                "HR or Admin role required".into(),
            )));
        }
        Ok(RequireHr(user))
    }
}
