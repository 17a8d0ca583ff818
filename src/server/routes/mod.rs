use actix_web::web;

mod auth;
mod beneficiaries;
mod companies;
mod health;
mod merchants;
mod transactions;

pub(crate) use health::{health, not_found};

/// Mounts every `/api` route.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/me", web::get().to(auth::me))
            .configure(auth::configure)
            .configure(companies::configure)
            .configure(beneficiaries::configure)
            .configure(merchants::configure)
            .configure(transactions::configure),
    );
}

/// Treats empty strings like absent fields.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
