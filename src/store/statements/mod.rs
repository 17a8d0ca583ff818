//! API and models for the `extratos` table (balance ledger).

mod api;
mod model;

pub use api::StatementsApi;
pub use model::*;
