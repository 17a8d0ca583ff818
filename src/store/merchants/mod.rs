//! API and models for the `conveniados` table (affiliated merchants).

mod api;
mod model;

pub use api::MerchantsApi;
pub use model::*;
