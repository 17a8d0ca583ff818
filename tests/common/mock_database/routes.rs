use crate::common::mock_database::{
    filters::ParsedQuery, MockDatabaseConfiguration, MockDatabaseFaults, MockDatabaseStorage,
};
use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

/// Both the `apikey` header and the bearer token must carry the service key.
fn check_service_key(
    req: &HttpRequest,
    configuration: &MockDatabaseConfiguration,
) -> Result<(), HttpResponse> {
    let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());
    let bearer = format!("Bearer {}", configuration.service_key);

    if header("apikey") == Some(configuration.service_key.as_str())
        && header(AUTHORIZATION.as_str()) == Some(bearer.as_str())
    {
        Ok(())
    } else {
        Err(HttpResponse::Unauthorized().json(json!({
            "code": "PGRST301",
            "message": "Invalid API key",
            "details": null,
            "hint": null
        })))
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "code": "PGRST100",
        "message": message,
        "details": null,
        "hint": null
    }))
}

fn internal_error(table: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "code": "XX000",
        "message": format!("could not write to relation \"{}\"", table),
        "details": null,
        "hint": null
    }))
}

/// Conditional writes on a balance column.
fn is_balance_write(query: &[(String, String)]) -> bool {
    query
        .iter()
        .any(|(column, _)| column == "saldo_atual" || column == "saldo_total")
}

fn wants_representation(req: &HttpRequest) -> bool {
    req.headers()
        .get("Prefer")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.contains("return=representation"))
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// GET /rest/v1/{table}
pub(super) async fn select(
    req: HttpRequest,
    configuration: web::Data<MockDatabaseConfiguration>,
    storage: web::Data<MockDatabaseStorage>,
    table: web::Path<String>,
    query: web::Query<Vec<(String, String)>>,
) -> HttpResponse {
    if let Err(res) = check_service_key(&req, &configuration) {
        return res;
    }
    let query = match ParsedQuery::parse(query.into_inner()) {
        Ok(query) => query,
        Err(e) => return bad_request(e),
    };

    let storage = storage.read().unwrap();
    let rows: Vec<Value> = storage
        .get(table.as_str())
        .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
        .unwrap_or_default();

    HttpResponse::Ok().json(query.shape(rows))
}

/// POST /rest/v1/{table}
pub(super) async fn insert(
    req: HttpRequest,
    configuration: web::Data<MockDatabaseConfiguration>,
    storage: web::Data<MockDatabaseStorage>,
    faults: web::Data<MockDatabaseFaults>,
    table: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(res) = check_service_key(&req, &configuration) {
        return res;
    }
    if faults.read().unwrap().failing_inserts.contains(table.as_str()) {
        return internal_error(&table);
    }

    let incoming = match body.into_inner() {
        Value::Array(rows) => rows,
        row @ Value::Object(_) => vec![row],
        _ => return bad_request("Expected an object or an array".to_string()),
    };

    let mut inserted = Vec::with_capacity(incoming.len());
    for mut row in incoming {
        let Some(fields) = row.as_object_mut() else {
            return bad_request("Expected an object".to_string());
        };

        // Column defaults of the real schema
        fields
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        fields.entry("created_at").or_insert_with(now);
        if table.as_str() == "transacoes" {
            fields.entry("data_transacao").or_insert_with(now);
        }

        inserted.push(row);
    }

    storage
        .write()
        .unwrap()
        .entry(table.into_inner())
        .or_default()
        .extend(inserted.iter().cloned());

    if wants_representation(&req) {
        HttpResponse::Created().json(inserted)
    } else {
        HttpResponse::Created().finish()
    }
}

/// PATCH /rest/v1/{table}
pub(super) async fn update(
    req: HttpRequest,
    configuration: web::Data<MockDatabaseConfiguration>,
    storage: web::Data<MockDatabaseStorage>,
    faults: web::Data<MockDatabaseFaults>,
    table: web::Path<String>,
    query: web::Query<Vec<(String, String)>>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(res) = check_service_key(&req, &configuration) {
        return res;
    }
    if is_balance_write(&query)
        && faults.read().unwrap().contended_balances.contains(table.as_str())
    {
        return HttpResponse::Ok().json(Vec::<Value>::new());
    }
    let query = match ParsedQuery::parse(query.into_inner()) {
        Ok(query) => query,
        Err(e) => return bad_request(e),
    };
    let changes = match body.into_inner() {
        Value::Object(changes) => changes,
        _ => return bad_request("Expected an object".to_string()),
    };

    let mut storage = storage.write().unwrap();
    let mut updated = Vec::new();
    for row in storage.entry(table.into_inner()).or_default().iter_mut() {
        if !query.matches(row) {
            continue;
        }
        if let Some(fields) = row.as_object_mut() {
            fields.extend(changes.clone());
        }
        updated.push(row.clone());
    }

    if wants_representation(&req) {
        HttpResponse::Ok().json(updated)
    } else {
        HttpResponse::NoContent().finish()
    }
}
