use crate::{
    auth::{password::DEFAULT_PASSWORD_HASH, UserKind},
    documents::digits_only,
    server::{
        error::{ensure, ServiceError},
        extract::Authenticated,
        routes::present,
        state::AppState,
    },
    services::sales,
    store::{
        merchants::{MerchantUpdate, NewMerchant},
        AccountStatus,
    },
};
use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

/// Fee charged to merchants registered without an explicit one, in percent.
const DEFAULT_FEE_PERCENT: Decimal = Decimal::from_parts(250, 0, 0, false, 2);

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conveniados")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}/vendas", web::get().to(sales_report))
            .route("/{id}/dashboard", web::get().to(dashboard)),
    );
}

fn may_manage(caller: &Authenticated, merchant_id: &str) -> bool {
    caller.is_admin() || caller.is(UserKind::Merchant, merchant_id)
}

#[derive(Deserialize, Debug, Default)]
struct ListQuery {
    #[serde(default)]
    status: Option<AccountStatus>,
}

/// GET /api/conveniados
async fn list(
    state: web::Data<AppState>,
    _caller: Authenticated,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let merchants = state.db.merchants.list(query.status).await?;
    Ok(HttpResponse::Ok().json(json!({ "conveniados": merchants })))
}

/// GET /api/conveniados/{id}
async fn get(
    state: web::Data<AppState>,
    _caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let merchant = state
        .db
        .merchants
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Conveniado não encontrado"))?;
    Ok(HttpResponse::Ok().json(json!({ "conveniado": merchant })))
}

#[derive(Deserialize, Debug, Default)]
struct CreateMerchantRequest {
    #[serde(default)]
    cnpj: Option<String>,
    #[serde(rename = "razao_social", default)]
    legal_name: Option<String>,
    #[serde(rename = "nome_fantasia", default)]
    trade_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "telefone", default)]
    phone: Option<String>,
    #[serde(rename = "endereco", default)]
    address: Option<Value>,
    #[serde(rename = "taxa_transacao", default)]
    fee_percent: Option<Decimal>,
}

/// POST /api/conveniados
async fn create(
    state: web::Data<AppState>,
    caller: Authenticated,
    request: web::Json<CreateMerchantRequest>,
) -> Result<HttpResponse, ServiceError> {
    ensure(caller.is_admin())?;
    let request = request.into_inner();

    let (cnpj, legal_name, email) = match (
        present(request.cnpj).map(|c| digits_only(&c)),
        present(request.legal_name),
        present(request.email),
    ) {
        (Some(cnpj), Some(legal_name), Some(email)) if !cnpj.is_empty() => {
            (cnpj, legal_name, email)
        }
        _ => {
            return Err(ServiceError::bad_request("Dados incompletos")
                .with_message("CNPJ, razão social e email são obrigatórios"))
        }
    };

    if state.db.merchants.find_by_cnpj(&cnpj).await?.is_some() {
        return Err(ServiceError::bad_request("CNPJ já cadastrado")
            .with_message("Já existe um estabelecimento cadastrado com este CNPJ"));
    }

    let merchant = state
        .db
        .merchants
        .create(&NewMerchant {
            cnpj,
            legal_name,
            trade_name: request.trade_name,
            email,
            phone: request.phone,
            address: request.address,
            fee_percent: request
                .fee_percent
                .filter(|fee| !fee.is_zero())
                .unwrap_or(DEFAULT_FEE_PERCENT),
            status: AccountStatus::Active,
            password_hash: DEFAULT_PASSWORD_HASH.to_string(),
        })
        .await?;

    tracing::info!(merchant_id = %merchant.id, "Merchant created");
    Ok(HttpResponse::Created().json(json!({
        "conveniado": merchant,
        "message": "Estabelecimento cadastrado com sucesso",
    })))
}

/// PUT /api/conveniados/{id}
async fn update(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
    changes: web::Json<MerchantUpdate>,
) -> Result<HttpResponse, ServiceError> {
    ensure(may_manage(&caller, &id))?;

    let merchant = state
        .db
        .merchants
        .update(&id, &changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("Conveniado não encontrado"))?;

    Ok(HttpResponse::Ok().json(json!({
        "conveniado": merchant,
        "message": "Estabelecimento atualizado com sucesso",
    })))
}

#[derive(Deserialize, Debug, Default)]
struct PeriodQuery {
    #[serde(rename = "data_inicio", default)]
    from: Option<String>,
    #[serde(rename = "data_fim", default)]
    to: Option<String>,
}

/// GET /api/conveniados/{id}/vendas
async fn sales_report(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
    period: web::Query<PeriodQuery>,
) -> Result<HttpResponse, ServiceError> {
    ensure(may_manage(&caller, &id))?;

    let report = sales::report(
        &state.db,
        &id,
        period.from.as_deref(),
        period.to.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/conveniados/{id}/dashboard
async fn dashboard(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    ensure(may_manage(&caller, &id))?;

    let dashboard = sales::dashboard(&state.db, &id).await?;
    Ok(HttpResponse::Ok().json(json!({ "dashboard": dashboard })))
}
