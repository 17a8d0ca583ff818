use crate::{auth::TokenIssuer, client::DatabaseClient};

/// Shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseClient,
    pub tokens: TokenIssuer,
    /// Host of the database project, reported by `/health`.
    pub database: String,
}
