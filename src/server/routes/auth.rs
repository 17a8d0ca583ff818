use crate::{
    auth::{self, load_account, LoginRequest},
    server::{error::ServiceError, extract::Authenticated, state::AppState},
};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/refresh", web::post().to(refresh))
            .route("/me", web::get().to(me)),
    );
}

/// POST /api/auth/login
async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = auth::login(&state.db, &state.tokens, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/auth/logout
///
/// Tokens are not tracked server side, so there is nothing to revoke.
async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Logout realizado com sucesso" }))
}

#[derive(Deserialize, Debug)]
struct RefreshRequest {
    #[serde(default)]
    token: Option<String>,
}

/// POST /api/auth/refresh
async fn refresh(
    state: web::Data<AppState>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse, ServiceError> {
    let token = request
        .into_inner()
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServiceError::bad_request("Token é obrigatório"))?;

    let token = state.tokens.refresh(&token).map_err(|e| {
        tracing::debug!("Refusing to refresh token: {}", e);
        ServiceError::unauthorized("Token inválido ou expirado")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "token": token })))
}

/// GET /api/auth/me, also served at GET /api/me
pub(super) async fn me(
    state: web::Data<AppState>,
    caller: Authenticated,
) -> Result<HttpResponse, ServiceError> {
    let account = load_account(&state.db, caller.kind, &caller.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Usuário não encontrado"))?;

    Ok(HttpResponse::Ok().json(json!({ "usuario": account.profile() })))
}
