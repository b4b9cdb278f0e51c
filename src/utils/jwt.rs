use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{Claims, UserRole};

fn create_token(
    user_id: i64,
    email: &str,
    role: UserRole,
    secret: &str,
    expiry_seconds: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.as_str().to_string(),
        iat: now,
        exp: now + expiry_seconds as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: i64,
    email: &str,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        email,
        role,
        &jwt_config.access_secret,
        jwt_config.access_token_expiry,
    )
}

pub fn create_refresh_token(
    user_id: i64,
    email: &str,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        email,
        role,
        &jwt_config.refresh_secret,
        jwt_config.refresh_token_expiry,
    )
}

pub fn verify_access_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.access_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.refresh_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
