use crate::{
    auth::{password::DEFAULT_PASSWORD_HASH, Claims, UserKind},
    documents::digits_only,
    server::{
        error::{ensure, ServiceError},
        extract::Authenticated,
        routes::present,
        state::AppState,
    },
    services::credits::{self, CreditRequest},
    store::{
        beneficiaries::{Beneficiary, BeneficiaryUpdate, NewBeneficiary, SpendingLimits},
        AccountStatus,
    },
};
use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/beneficiarios")
            .route("", web::post().to(create))
            .route("/empresa/{empresa_id}", web::get().to(list_by_company))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}/saldo", web::get().to(balance))
            .route("/{id}/extrato", web::get().to(statement))
            .route("/{id}/creditos", web::post().to(credit)),
    );
}

fn owns(caller: &Claims, beneficiary: &Beneficiary) -> bool {
    caller.is_admin() || caller.is(UserKind::Company, &beneficiary.company_id)
}

fn may_read(caller: &Claims, beneficiary: &Beneficiary) -> bool {
    owns(caller, beneficiary) || caller.is(UserKind::Beneficiary, &beneficiary.id)
}

async fn load(state: &AppState, id: &str) -> Result<Beneficiary, ServiceError> {
    state
        .db
        .beneficiaries
        .get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Beneficiário não encontrado"))
}

/// GET /api/beneficiarios/empresa/{empresa_id}
async fn list_by_company(
    state: web::Data<AppState>,
    caller: Authenticated,
    company_id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    ensure(caller.is_admin() || caller.is(UserKind::Company, &company_id))?;

    let beneficiaries = state.db.beneficiaries.list_by_company(&company_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "beneficiarios": beneficiaries })))
}

/// GET /api/beneficiarios/{id}
async fn get(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let beneficiary = load(&state, &id).await?;
    ensure(may_read(&caller, &beneficiary))?;

    Ok(HttpResponse::Ok().json(json!({ "beneficiario": beneficiary })))
}

#[derive(Deserialize, Debug, Default)]
struct CreateBeneficiaryRequest {
    #[serde(rename = "empresa_id", default)]
    company_id: Option<String>,
    #[serde(rename = "nome", default)]
    name: Option<String>,
    #[serde(default)]
    cpf: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "limite_diario", default)]
    daily_limit: Option<Decimal>,
    #[serde(rename = "limite_semanal", default)]
    weekly_limit: Option<Decimal>,
    #[serde(rename = "limite_mensal", default)]
    monthly_limit: Option<Decimal>,
}

impl CreateBeneficiaryRequest {
    /// Requested limits, falling back to the defaults for absent or zero values.
    fn limits(&self) -> SpendingLimits {
        let defaults = SpendingLimits::default();
        let or_default = |requested: Option<Decimal>, default: Decimal| {
            requested.filter(|l| !l.is_zero()).unwrap_or(default)
        };

        SpendingLimits {
            daily: or_default(self.daily_limit, defaults.daily),
            weekly: or_default(self.weekly_limit, defaults.weekly),
            monthly: or_default(self.monthly_limit, defaults.monthly),
        }
    }
}

/// POST /api/beneficiarios
async fn create(
    state: web::Data<AppState>,
    caller: Authenticated,
    request: web::Json<CreateBeneficiaryRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request = request.into_inner();
    let limits = request.limits();

    let (company_id, name, cpf) = match (
        present(request.company_id),
        present(request.name),
        present(request.cpf).map(|c| digits_only(&c)),
    ) {
        (Some(company_id), Some(name), Some(cpf)) if !cpf.is_empty() => (company_id, name, cpf),
        _ => {
            return Err(ServiceError::bad_request("Dados incompletos")
                .with_message("Empresa, nome e CPF são obrigatórios"))
        }
    };
    ensure(caller.is_admin() || caller.is(UserKind::Company, &company_id))?;

    if state.db.beneficiaries.find_by_cpf(&cpf).await?.is_some() {
        return Err(ServiceError::bad_request("CPF já cadastrado")
            .with_message("Já existe um beneficiário cadastrado com este CPF"));
    }

    if state.db.companies.get_by_id(&company_id).await?.is_none() {
        return Err(ServiceError::bad_request("Empresa inválida")
            .with_message("A empresa especificada não foi encontrada"));
    }

    let beneficiary = state
        .db
        .beneficiaries
        .create(&NewBeneficiary {
            company_id,
            cpf,
            name,
            email: present(request.email),
            limits,
            balance: Decimal::ZERO,
            status: AccountStatus::Active,
            password_hash: DEFAULT_PASSWORD_HASH.to_string(),
        })
        .await?;

    tracing::info!(beneficiary_id = %beneficiary.id, "Beneficiary created");
    Ok(HttpResponse::Created().json(json!({
        "beneficiario": beneficiary,
        "message": "Beneficiário cadastrado com sucesso",
    })))
}

/// PUT /api/beneficiarios/{id}
async fn update(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
    changes: web::Json<BeneficiaryUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let beneficiary = load(&state, &id).await?;
    ensure(owns(&caller, &beneficiary))?;

    let beneficiary = state
        .db
        .beneficiaries
        .update(&id, &changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("Beneficiário não encontrado"))?;

    Ok(HttpResponse::Ok().json(json!({
        "beneficiario": beneficiary,
        "message": "Beneficiário atualizado com sucesso",
    })))
}

/// GET /api/beneficiarios/{id}/saldo
async fn balance(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let beneficiary = load(&state, &id).await?;
    ensure(may_read(&caller, &beneficiary))?;

    Ok(HttpResponse::Ok().json(json!({
        "saldo_atual": beneficiary.balance,
        "limite_diario": beneficiary.limits.daily,
        "limite_semanal": beneficiary.limits.weekly,
        "limite_mensal": beneficiary.limits.monthly,
    })))
}

/// GET /api/beneficiarios/{id}/extrato
async fn statement(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let beneficiary = load(&state, &id).await?;
    ensure(may_read(&caller, &beneficiary))?;

    let entries = state.db.statements.list_by_beneficiary(&id).await?;
    Ok(HttpResponse::Ok().json(json!({ "extrato": entries })))
}

/// POST /api/beneficiarios/{id}/creditos
async fn credit(
    state: web::Data<AppState>,
    caller: Authenticated,
    id: web::Path<String>,
    request: web::Json<CreditRequest>,
) -> Result<HttpResponse, ServiceError> {
    let beneficiary = load(&state, &id).await?;
    ensure(owns(&caller, &beneficiary))?;

    let receipt = credits::credit(
        &state.db,
        &beneficiary.id,
        &beneficiary.company_id,
        request.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(receipt))
}
