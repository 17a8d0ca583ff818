//! API and models for the `transacoes` table (payments).

mod api;
mod model;

pub use api::TransactionsApi;
pub use model::*;
