//! Administrative commands run before the server starts serving traffic.
//!
//! School Admin accounts cannot be created through the public registration
//! endpoint, and drivers can only register against plates that already
//! exist, so deployments bootstrap both from here.

use anyhow::{Context, bail};
use sqlx::PgPool;

use crate::modules::auth::model::UserRole;
use crate::utils::password::hash_password;

pub async fn create_school_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone_number: &str,
    password: &str,
) -> anyhow::Result<()> {
    let email = email.trim().to_lowercase();
    let hashed_password = hash_password(password).context("Failed to hash password")?;

    let result = sqlx::query(
        "INSERT INTO users (email, first_name, last_name, phone_number, number_plate, role, password)
         VALUES ($1, $2, $3, $4, NULL, $5, $6)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(&email)
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(phone_number.trim())
    .bind(UserRole::SchoolAdmin.as_str())
    .bind(&hashed_password)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        bail!("A user with this email already exists");
    }

    Ok(())
}

/// Upserts the given plates as active vehicles. Re-seeding an existing plate
/// reactivates it.
pub async fn seed_number_plates(db: &PgPool, plates: &[String]) -> anyhow::Result<()> {
    if plates.is_empty() {
        bail!("No number plates given");
    }

    for plate in plates {
        let plate = plate.trim().to_uppercase();
        if plate.is_empty() {
            continue;
        }

        sqlx::query(
            "INSERT INTO number_plates (plate_number, status)
             VALUES ($1, 'active')
             ON CONFLICT (plate_number)
             DO UPDATE SET status = 'active', updated_at = now()",
        )
        .bind(&plate)
        .execute(db)
        .await?;
    }

    Ok(())
}
