use axum::Router;
use sqlx::PgPool;
use uuid::Uuid;

use school_transit::config::cors::CorsConfig;
use school_transit::config::jwt::JwtConfig;
use school_transit::config::server::ServerConfig;
use school_transit::modules::auth::model::UserRole;
use school_transit::router::init_router;
use school_transit::state::AppState;
use school_transit::utils::jwt::create_access_token;
use school_transit::utils::password::hash_password;

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        db: pool,
        jwt_config: JwtConfig {
            access_secret: "test_access_secret".to_string(),
            refresh_secret: "test_refresh_secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604_800,
        },
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        server_config: ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            cookie_secure: false,
        },
    }
}

pub fn setup_test_app(pool: PgPool) -> (Router, AppState) {
    let state = test_state(pool);
    (init_router(state.clone()), state)
}

pub fn unique_email() -> String {
    format!("user-{}@test.com", Uuid::new_v4())
}

/// Digits-only phone number, unique per call.
pub fn unique_phone() -> String {
    format!("07{:010}", Uuid::new_v4().as_u128() % 10_000_000_000)
}

#[allow(dead_code)]
pub fn unique_plate() -> String {
    format!("K{}", &Uuid::new_v4().simple().to_string()[..7]).to_uppercase()
}

#[allow(dead_code)]
pub fn unique_admission_number() -> String {
    format!("ADM-{}", &Uuid::new_v4().simple().to_string()[..8]).to_uppercase()
}

#[allow(dead_code)]
pub async fn seed_plate(pool: &PgPool, plate: &str, status: &str) {
    sqlx::query(
        "INSERT INTO number_plates (plate_number, status)
         VALUES ($1, $2)
         ON CONFLICT (plate_number) DO UPDATE SET status = $2",
    )
    .bind(plate)
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
}

/// Inserts a user row directly, the way registration would store it.
#[allow(dead_code)]
pub async fn create_test_user(
    pool: &PgPool,
    role: UserRole,
    number_plate: Option<&str>,
    password: &str,
) -> TestUser {
    let email = unique_email();
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, first_name, last_name, phone_number, number_plate, role, password)
         VALUES ($1, 'Test', 'User', $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(&email)
    .bind(unique_phone())
    .bind(number_plate)
    .bind(role.as_str())
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email,
        password: password.to_string(),
    }
}

/// Mints a bearer token the app will accept for the given user.
#[allow(dead_code)]
pub fn bearer_token(state: &AppState, user: &TestUser, role: UserRole) -> String {
    create_access_token(user.id, &user.email, role, &state.jwt_config).unwrap()
}

#[allow(dead_code)]
pub async fn create_test_student(pool: &PgPool, admission_number: &str, status: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO students (
             admission_number, first_name, last_name, class_name, grade,
             parent_contact, admission_date, status
         )
         VALUES ($1, 'Amina', 'Odhiambo', 'Blue House', 'Grade 3', '0711000222', CURRENT_DATE, $2)
         RETURNING id",
    )
    .bind(admission_number)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}
