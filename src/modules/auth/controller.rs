use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::ApiError;
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

use super::model::{
    Claims, LoginRequest, NumberPlatesData, RefreshRequest, RegisterRequest, RegisteredUser,
    SessionData,
};
use super::service::AuthService;

const REFRESH_COOKIE: &str = "refreshToken";

/// Refresh tokens travel as an httpOnly cookie scoped to the auth routes.
fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/api/auth");
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(state.server_config.cookie_secure);
    cookie.set_max_age(time::Duration::seconds(state.jwt_config.refresh_token_expiry));
    cookie
}

fn expired_refresh_cookie(state: &AppState) -> Cookie<'static> {
    let mut cookie = refresh_cookie(state, String::new());
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisteredUser),
        (status = 400, description = "Validation error or unavailable number plate"),
        (status = 409, description = "Email or phone number already registered"),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisteredUser>>), ApiError> {
    let user = AuthService::register(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Registration successful.", user)),
    ))
}

/// Login and receive an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; refresh token also set as an httpOnly cookie", body = SessionData),
        (status = 401, description = "Invalid login credentials"),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionData>>), ApiError> {
    let session = AuthService::login(&state.db, dto, &state.jwt_config)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid login credentials."))?;

    let jar = jar.add(refresh_cookie(&state, session.refresh_token.clone()));

    Ok((jar, Json(ApiResponse::new("Login successful.", session))))
}

/// Rotate the access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = SessionData),
        (status = 401, description = "Missing, invalid, or expired refresh token"),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, body))]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ApiResponse<SessionData>>), ApiError> {
    let from_body = body
        .ok()
        .and_then(|Json(dto)| dto.refresh_token)
        .filter(|token| !token.trim().is_empty());

    let refresh_token = from_body
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| ApiError::unauthorized("Refresh token is missing."))?;

    let session = AuthService::refresh_session(&state.db, &refresh_token, &state.jwt_config)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token."))?;

    let jar = jar.add(refresh_cookie(&state, session.refresh_token.clone()));

    Ok((
        jar,
        Json(ApiResponse::new("Token refreshed successfully.", session)),
    ))
}

/// List active number plates
#[utoipa::path(
    get,
    path = "/api/auth/number-plates",
    responses(
        (status = 200, description = "Active plate numbers, ascending", body = NumberPlatesData),
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn get_number_plates(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<NumberPlatesData>>, ApiError> {
    let number_plates = AuthService::list_number_plates(&state.db).await?;

    Ok(Json(ApiResponse::new(
        "Number plates retrieved successfully.",
        NumberPlatesData { number_plates },
    )))
}

/// Echo the authenticated caller's token claims
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Authenticated user retrieved", body = Claims),
        (status = 401, description = "Missing or invalid access token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(auth_user))]
pub async fn me(auth_user: AuthUser) -> Json<ApiResponse<Claims>> {
    Json(ApiResponse::new("Authenticated user retrieved.", auth_user.0))
}

/// Clear the refresh cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logout successful")),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let jar = jar.add(expired_refresh_cookie(&state));

    (jar, Json(ApiResponse::message_only("Logout successful.")))
}
