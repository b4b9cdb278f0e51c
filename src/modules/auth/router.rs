use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::utils::errors::ApiError;

use super::controller::{get_number_plates, login, logout, me, refresh, register};

/// The token-issuing routes only answer POST; anything else gets the
/// envelope-shaped 405 the frontend expects.
fn method_not_allowed(hint: &'static str) -> ApiError {
    ApiError::method_not_allowed(format!("Method not allowed. Use {hint}."))
}

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            post(register)
                .fallback(|| async { method_not_allowed("POST /api/auth/register") }),
        )
        .route(
            "/login",
            post(login).fallback(|| async { method_not_allowed("POST /api/auth/login") }),
        )
        .route(
            "/refresh",
            post(refresh).fallback(|| async { method_not_allowed("POST /api/auth/refresh") }),
        )
        .route("/number-plates", get(get_number_plates))
        .route("/me", get(me))
        .route("/logout", post(logout))
}
