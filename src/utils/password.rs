use bcrypt::{hash, verify};

/// bcrypt cost factor used for all stored credentials.
pub const BCRYPT_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, BCRYPT_COST)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hashed)
}
