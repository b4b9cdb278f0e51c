use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::utils::password::{hash_password, verify_password};

use super::error::AuthError;
use super::model::{LoginRequest, RegisterRequest, RegisteredUser, SessionData, User, UserRole};

pub struct AuthService;

impl AuthService {
    /// Registers a new user. Driver and Bus Assistant accounts must name an
    /// active number plate; other roles store no plate even when one is sent.
    #[instrument(skip(db, dto), fields(email))]
    pub async fn register(db: &PgPool, dto: RegisterRequest) -> Result<RegisteredUser, AuthError> {
        let email = dto.email.trim().to_lowercase();
        let first_name = dto.first_name.trim().to_string();
        let last_name = dto.last_name.trim().to_string();
        let phone_number = dto.phone_number.trim().to_string();
        let number_plate = dto
            .number_plate
            .as_deref()
            .map(|plate| plate.trim().to_uppercase())
            .unwrap_or_default();

        // The DTO validator only lets registerable role names through.
        let role = UserRole::parse(dto.role.trim()).ok_or(AuthError::InvalidRole)?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM users WHERE email = $1 OR phone_number = $2 LIMIT 1",
        )
        .bind(&email)
        .bind(&phone_number)
        .fetch_optional(db)
        .await?;

        if existing.is_some() {
            return Err(AuthError::DuplicateUser);
        }

        if role.requires_number_plate() {
            if number_plate.is_empty() {
                return Err(AuthError::NumberPlateRequired);
            }

            let plate = sqlx::query_scalar::<_, String>(
                "SELECT plate_number FROM number_plates
                 WHERE plate_number = $1 AND status = 'active'
                 LIMIT 1",
            )
            .bind(&number_plate)
            .fetch_optional(db)
            .await?;

            if plate.is_none() {
                return Err(AuthError::NumberPlateNotFound);
            }
        }

        let password_hash = hash_password(&dto.password)?;

        sqlx::query(
            "INSERT INTO users (email, first_name, last_name, phone_number, number_plate, role, password)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&email)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&phone_number)
        .bind(role.requires_number_plate().then_some(&number_plate))
        .bind(role.as_str())
        .bind(&password_hash)
        .execute(db)
        .await?;

        Ok(RegisteredUser { email, role })
    }

    /// Checks credentials and mints a token pair. Returns `None` for both an
    /// unknown email and a wrong password, so the caller cannot tell which
    /// check failed.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<Option<SessionData>, AuthError> {
        let email = dto.email.trim().to_lowercase();

        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, phone_number, number_plate, role,
                    password, created_at, updated_at
             FROM users
             WHERE email = $1
             LIMIT 1",
        )
        .bind(&email)
        .fetch_optional(db)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        if !verify_password(&dto.password, &user.password)? {
            return Ok(None);
        }

        Self::issue_session(&user, jwt_config).map(Some)
    }

    /// Verifies a refresh token and mints a fresh pair for the embedded user.
    ///
    /// Invalid or expired tokens and deleted users all come back as `None`;
    /// rotation is stateless, so no previous token is revoked.
    #[instrument(skip(db, refresh_token, jwt_config))]
    pub async fn refresh_session(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<Option<SessionData>, AuthError> {
        let Ok(claims) = verify_refresh_token(refresh_token, jwt_config) else {
            return Ok(None);
        };

        let email = claims.email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(None);
        }

        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, phone_number, number_plate, role,
                    password, created_at, updated_at
             FROM users
             WHERE email = $1
             LIMIT 1",
        )
        .bind(&email)
        .fetch_optional(db)
        .await?;

        match user {
            Some(user) => Self::issue_session(&user, jwt_config).map(Some),
            None => Ok(None),
        }
    }

    /// All active plate numbers, ascending.
    #[instrument(skip(db))]
    pub async fn list_number_plates(db: &PgPool) -> Result<Vec<String>, AuthError> {
        let plates = sqlx::query_scalar::<_, String>(
            "SELECT plate_number FROM number_plates
             WHERE status = 'active'
             ORDER BY plate_number ASC",
        )
        .fetch_all(db)
        .await?;

        Ok(plates)
    }

    fn issue_session(user: &User, jwt_config: &JwtConfig) -> Result<SessionData, AuthError> {
        let role = UserRole::parse(&user.role)
            .ok_or_else(|| AuthError::UnknownStoredRole(user.role.clone()))?;

        Ok(SessionData {
            email: user.email.clone(),
            role,
            access_token: create_access_token(user.id, &user.email, role, jwt_config)?,
            refresh_token: create_refresh_token(user.id, &user.email, role, jwt_config)?,
        })
    }
}
