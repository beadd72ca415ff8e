use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
        rand_core::OsRng,
    },
};

use crate::domain::repository::PasswordHasher;
use crate::error::ApiError;

/// Argon2id with the crate's default parameters, PHC string output.
///
/// Both operations run on the blocking pool; a single hash takes tens of
/// milliseconds of CPU.
#[derive(Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, ApiError> {
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
        })
        .await
        .map_err(|e| anyhow::Error::new(e).context("join password hashing task"))?
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
        Ok(hash)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let outcome = tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)?;
            Argon2::default().verify_password(password.as_bytes(), &parsed)
        })
        .await
        .map_err(|e| anyhow::Error::new(e).context("join password verification task"))?;

        match outcome {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow::anyhow!("verify password: {e}").into()),
        }
    }
}
