use crate::{
    auth::{Claims, UserKind},
    server::{
        error::{ensure, ServiceError},
        extract::Authenticated,
        state::AppState,
    },
    services::payments::{self, CancellationRequest, PaymentRequest},
    store::transactions::{Transaction, TransactionFilter},
};
use actix_web::{web, HttpResponse};
use serde_json::json;

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transacoes")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}/cancelar", web::put().to(cancel)),
    );
}

/// Narrows `filter` to what the caller is allowed to see.
fn scoped_to(caller: &Claims, mut filter: TransactionFilter) -> TransactionFilter {
    let own_id = Some(caller.user_id.clone());
    match caller.kind {
        UserKind::Admin => {}
        UserKind::Company => filter.company_id = own_id,
        UserKind::Merchant => filter.merchant_id = own_id,
        UserKind::Beneficiary => filter.beneficiary_id = own_id,
    }
    filter
}

fn may_read(caller: &Claims, transaction: &Transaction) -> bool {
    caller.is_admin()
        || caller.is(UserKind::Company, &transaction.company_id)
        || caller.is(UserKind::Merchant, &transaction.merchant_id)
        || caller.is(UserKind::Beneficiary, &transaction.beneficiary_id)
}

/// GET /api/transacoes
async fn list(
    state: web::Data<AppState>,
    caller: Authenticated,
    filter: web::Query<TransactionFilter>,
) -> Result<HttpResponse, ServiceError> {
    let filter = scoped_to(&caller, filter.into_inner());

    let transactions = state.db.transactions.list(&filter).await?;
    Ok(HttpResponse::Ok().json(json!({ "transacoes": transactions })))
}

/// GET /api/transacoes/{id}
async fn get(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let transaction = state
        .db
        .transactions
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Transação não encontrada"))?;
    ensure(may_read(&caller, &transaction))?;

    Ok(HttpResponse::Ok().json(json!({ "transacao": transaction })))
}

/// POST /api/transacoes
async fn create(
    state: web::Data<AppState>,
    caller: Authenticated,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let receipt = payments::process(&state.db, &caller, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(receipt))
}

/// An empty body carries no reason; anything else must be valid JSON.
fn cancellation_request(body: &[u8]) -> Result<CancellationRequest, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CancellationRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::bad_request("JSON inválido").with_message(e.to_string()))
}

/// PUT /api/transacoes/{id}/cancelar
async fn cancel(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let request = cancellation_request(&body)?;

    let receipt = payments::cancel(&state.db, &caller, &id, request).await?;
    Ok(HttpResponse::Ok().json(receipt))
}
