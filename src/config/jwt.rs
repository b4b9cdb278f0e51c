use std::env;

/// Signing secrets and expiries for the access/refresh token pair.
///
/// The refresh secret falls back to the access secret when
/// `JWT_REFRESH_SECRET` is not set, so single-secret deployments keep
/// working.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let access_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "development_access_secret".to_string());
        let refresh_secret =
            env::var("JWT_REFRESH_SECRET").unwrap_or_else(|_| access_secret.clone());

        Self {
            access_secret,
            refresh_secret,
            access_token_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(900), // 15 minutes
            refresh_token_expiry: env::var("JWT_REFRESH_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604_800), // 7 days
        }
    }
}
