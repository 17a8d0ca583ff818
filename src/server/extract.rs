use crate::{
    auth::Claims,
    server::{error::ServiceError, state::AppState},
};
use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use std::ops::Deref;

/// Claims of the bearer token sent with the request.
///
/// Missing tokens are rejected with 401, tokens that fail verification with 403.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl Deref for Authenticated {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, ServiceError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("Application state is not configured");
        ServiceError::internal()
    })?;

    let token = bearer_token(req).ok_or_else(|| ServiceError::unauthorized("Token não fornecido"))?;

    state.tokens.verify(token).map(Authenticated).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ServiceError::new(actix_web::http::StatusCode::FORBIDDEN, "Token inválido")
    })
}

/// Second word of the `Authorization` header (`Bearer <token>`).
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_whitespace()
        .nth(1)
}
