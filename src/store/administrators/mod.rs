//! API and models for the `administradores` table.

mod api;
mod model;

pub use api::AdministratorsApi;
pub use model::*;
