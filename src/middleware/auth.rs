use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::{Claims, UserRole};
use crate::state::AppState;
use crate::utils::errors::ApiError;
use crate::utils::jwt::verify_access_token;

/// Extractor that validates the bearer access token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The authenticated user's database id, parsed from the `sub` claim.
    pub fn user_id(&self) -> Result<i64, ApiError> {
        self.0
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::unauthorized("Invalid user id in token."))
    }

    /// The role carried in the token, if it names a known role.
    pub fn role(&self) -> Option<UserRole> {
        UserRole::parse(&self.0.role)
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Access token is missing."))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Access token is missing."))?;

        let claims = verify_access_token(token, &state.jwt_config)
            .map_err(|_| ApiError::unauthorized("Invalid or expired access token."))?;

        Ok(AuthUser(claims))
    }
}
