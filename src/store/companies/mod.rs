//! API and models for the `empresas` table (sponsoring companies).

mod api;
mod model;

pub use api::CompaniesApi;
pub use model::*;
