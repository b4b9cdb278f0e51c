//! Role-based authorization layers.
//!
//! Applied with `axum::middleware::from_fn_with_state` on nested routers so
//! every route under a feature prefix shares the same role requirement.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::ApiError;

/// Checks that the authenticated caller holds one of the allowed roles.
///
/// Missing or invalid tokens reject with 401 before the role is looked at;
/// a valid token with a role outside `allowed_roles` rejects with 403.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    let permitted = auth_user
        .role()
        .is_some_and(|role| allowed_roles.contains(&role));

    if !permitted {
        return Err(ApiError::forbidden(
            "You do not have permission for this resource.",
        ));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Layer for the student-management routes: School Admin only.
pub async fn require_school_admin(
    state: State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(state, req, next, &[UserRole::SchoolAdmin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Layer for the fuel/maintenance routes: Driver only.
pub async fn require_driver(state: State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(state, req, next, &[UserRole::Driver]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
