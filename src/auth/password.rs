//! bcrypt password checks, run on the blocking thread pool.

/// Password given to accounts created through the API.
pub const DEFAULT_PASSWORD: &str = "senha123";

/// bcrypt hash (cost 10) of [`DEFAULT_PASSWORD`], stored for accounts created through the API.
pub const DEFAULT_PASSWORD_HASH: &str =
    "$2b$10$MAcUgya0v.X30Sf.Z0YK8.LiO2P00GQDU.9neBsXnr9uYPAQW8ySa";

#[derive(thiserror::Error, Debug)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Checks `password` against a stored bcrypt hash.
///
/// A hash that bcrypt cannot parse counts as a mismatch.
pub async fn verify(password: String, hash: String) -> Result<bool, PasswordError> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;

    outcome.or_else(|e| {
        tracing::warn!("Stored password hash could not be checked: {}", e);
        Ok(false)
    })
}

/// Hashes `password` with the given bcrypt cost.
pub async fn hash(password: String, cost: u32) -> Result<String, PasswordError> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
}
