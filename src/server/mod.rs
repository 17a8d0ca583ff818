//! HTTP API served to the card frontends.
//!
//! Every route lives under `/api` except `GET /health`. Errors are rendered as
//! `{ "error": ..., "message": ... }` by [`ServiceError`].

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    middleware::Logger,
    web, App, HttpRequest, HttpServer,
};
use std::net::TcpListener;

pub mod error;
pub mod extract;
mod routes;
pub mod state;

pub use error::ServiceError;
pub use extract::Authenticated;
pub use state::AppState;

/// Starts serving the API on an already bound listener.
///
/// The returned [`Server`] must be awaited (or spawned) to actually process requests.
pub fn listen(
    listener: TcpListener,
    state: AppState,
    allowed_origins: Vec<String>,
) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Registers the routes, request parsing rules and the fallback for unknown paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(invalid_json))
        .app_data(web::QueryConfig::default().error_handler(invalid_query))
        .app_data(web::PathConfig::default().error_handler(invalid_path))
        .route("/health", web::get().to(routes::health))
        .configure(routes::configure)
        .default_service(web::route().to(routes::not_found));
}

fn invalid_json(e: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected request body: {}", e);
    ServiceError::bad_request("JSON inválido")
        .with_message(e.to_string())
        .into()
}

fn invalid_query(e: QueryPayloadError, _: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected query string: {}", e);
    ServiceError::bad_request("Parâmetros inválidos")
        .with_message(e.to_string())
        .into()
}

fn invalid_path(e: PathError, _: &HttpRequest) -> actix_web::Error {
    tracing::debug!("Rejected path: {}", e);
    ServiceError::bad_request("Parâmetros inválidos")
        .with_message(e.to_string())
        .into()
}
