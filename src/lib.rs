//! Backend of the ACIEIcard benefit card.
//!
//! Companies (`empresas`) fund the balance of their employees (`beneficiários`), who pay
//! at affiliated merchants (`conveniados`) with their card. This crate holds:
//!
//! - [`DatabaseClient`], a typed client for the hosted database, reached through its REST API;
//! - [`services`], the money movements: payments, cancellations, credits and sales reports;
//! - [`auth`], password login and the access tokens handed to the frontends;
//! - [`server`], the HTTP API exposing all of the above.
//!
//! # Usage
//!
//! ## Talk to the database
//!
//! ```rust,no_run
//! # use acieicard::{DatabaseClient, Error};
//! # use reqwest::Url;
//! # use secrecy::SecretString;
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let db = DatabaseClient::builder(
//!     Url::parse("https://my-project.supabase.co").unwrap(),
//!     SecretString::new("service-role-key".to_string()),
//! )
//! .with_max_retries(3)
//! .build()?;
//!
//! for merchant in db.merchants.list_active().await? {
//!     tracing::info!("{} ({})", merchant.display_name(), merchant.cnpj);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Serve the API
//!
//! ```rust,no_run
//! # use acieicard::{auth::TokenIssuer, server::{self, AppState}, DatabaseClient};
//! # use reqwest::Url;
//! # use secrecy::SecretString;
//! # use std::net::TcpListener;
//! #
//! # #[actix_web::main]
//! # async fn main() -> anyhow::Result<()> {
//! # let db: DatabaseClient = unreachable!();
//! let state = AppState {
//!     db,
//!     tokens: TokenIssuer::new(
//!         &SecretString::new("jwt-secret".to_string()),
//!         chrono::Duration::hours(24),
//!     ),
//!     database: "my-project.supabase.co".to_string(),
//! };
//!
//! let listener = TcpListener::bind(("0.0.0.0", 3002))?;
//! server::listen(listener, state, vec!["http://localhost:3000".to_string()])?.await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
mod common;
pub mod documents;
pub mod error;
mod middlewares;
pub mod server;
pub mod services;
pub mod settings;
pub mod store;
pub mod telemetry;

pub use client::DatabaseClient;
pub use error::Error;
