//! API and models for the `beneficiarios` table (card holders).

mod api;
mod model;

pub use api::BeneficiariesApi;
pub use model::*;
