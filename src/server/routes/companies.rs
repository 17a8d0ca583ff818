use crate::{
    auth::{password::DEFAULT_PASSWORD_HASH, UserKind},
    documents::digits_only,
    server::{
        error::{ensure, ServiceError},
        extract::Authenticated,
        routes::present,
        state::AppState,
    },
    store::{
        companies::{CompanyUpdate, NewCompany},
        AccountStatus,
    },
};
use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/empresas")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}/saldo", web::get().to(balance)),
    );
}

fn may_manage(caller: &Authenticated, company_id: &str) -> bool {
    caller.is_admin() || caller.is(UserKind::Company, company_id)
}

/// GET /api/empresas
async fn list(
    state: web::Data<AppState>,
    caller: Authenticated,
) -> Result<HttpResponse, ServiceError> {
    ensure(caller.is_admin())?;

    let companies = state.db.companies.list().await?;
    Ok(HttpResponse::Ok().json(json!({ "empresas": companies })))
}

/// GET /api/empresas/{id}
async fn get(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    ensure(may_manage(&caller, &id))?;

    let company = state
        .db
        .companies
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Empresa não encontrada"))?;
    Ok(HttpResponse::Ok().json(json!({ "empresa": company })))
}

#[derive(Deserialize, Debug, Default)]
struct CreateCompanyRequest {
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
}

/// POST /api/empresas
async fn create(
    state: web::Data<AppState>,
    caller: Authenticated,
    request: web::Json<CreateCompanyRequest>,
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

    if state.db.companies.find_by_cnpj(&cnpj).await?.is_some() {
        return Err(ServiceError::bad_request("CNPJ já cadastrado")
            .with_message("Já existe uma empresa cadastrada com este CNPJ"));
    }

    let company = state
        .db
        .companies
        .create(&NewCompany {
            cnpj,
            legal_name,
            trade_name: request.trade_name,
            email,
            phone: request.phone,
            address: request.address,
            total_balance: Decimal::ZERO,
            status: AccountStatus::Active,
            password_hash: DEFAULT_PASSWORD_HASH.to_string(),
        })
        .await?;

    tracing::info!(company_id = %company.id, "Company created");
    Ok(HttpResponse::Created().json(json!({
        "empresa": company,
        "message": "Empresa cadastrada com sucesso",
    })))
}

/// PUT /api/empresas/{id}
async fn update(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
    changes: web::Json<CompanyUpdate>,
) -> Result<HttpResponse, ServiceError> {
    ensure(may_manage(&caller, &id))?;

    let company = state
        .db
        .companies
        .update(&id, &changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("Empresa não encontrada"))?;

    Ok(HttpResponse::Ok().json(json!({
        "empresa": company,
        "message": "Empresa atualizada com sucesso",
    })))
}

/// GET /api/empresas/{id}/saldo
async fn balance(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    ensure(may_manage(&caller, &id))?;

    let company = state
        .db
        .companies
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Empresa não encontrada"))?;
    Ok(HttpResponse::Ok().json(json!({ "saldo": company.total_balance })))
}
