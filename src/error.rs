//! Standard errors used by all the database functions in the crate.

use std::fmt;

/// Error collecting all possible failures when talking to the hosted database.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reqwest error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// Error returned by the database REST endpoint.
    #[error("{0}")]
    ApiError(#[from] ApiError),
    /// The project URL cannot be used as the base of the REST endpoints.
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),
    /// Catch-all variant for unexpected errors.
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<reqwest_middleware::Error> for Error {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => Error::HttpError(e),
            reqwest_middleware::Error::Middleware(e) => {
                e.downcast::<Error>().unwrap_or_else(Error::Other)
            }
        }
    }
}

impl From<Error> for reqwest_middleware::Error {
    fn from(e: Error) -> Self {
        reqwest_middleware::Error::Middleware(e.into())
    }
}

/// Database REST API error.
///
/// Mirrors the error object returned by PostgREST.
#[derive(thiserror::Error, Debug)]
pub struct ApiError {
    /// HTTP status returned by the server.
    pub status: u16,
    /// PostgREST or PostgreSQL error code (e.g. `PGRST116`, `23505`).
    pub code: Option<String>,
    /// Concise description of the error.
    pub message: String,
    /// A human readable explanation specific to this occurrence of the problem.
    pub details: Option<String>,
    /// Hint on how to fix the request, if the server provided one.
    pub hint: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Database HTTP error {}: {}", self.status, self.message)?;

        if let Some(ref code) = self.code {
            write!(f, " ({})", code)?;
        }

        if let Some(ref details) = self.details {
            write!(f, "\nAdditional details: {}", details)?;
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}
