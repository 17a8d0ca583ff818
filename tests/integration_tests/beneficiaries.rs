use crate::common::test_context::{TestContext, BENEFICIARY_CPF};
use acieicard::auth::UserKind;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn company_registers_a_beneficiary_with_default_limits() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Company).await;

    let res = ctx
        .post(
            "/api/beneficiarios",
            &token,
            &json!({
                "empresa_id": ctx.company_id,
                "nome": "João Novo",
                "cpf": "987.654.321-00",
            }),
        )
        .await;
    assert_eq!(res.status(), 201);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Beneficiário cadastrado com sucesso");
    let beneficiary = &body["beneficiario"];
    assert_eq!(beneficiary["cpf"], "98765432100");
    assert_eq!(beneficiary["saldo_atual"], 0.0);
    assert_eq!(beneficiary["limite_diario"], 200.0);
    assert_eq!(beneficiary["limite_semanal"], 1000.0);
    assert_eq!(beneficiary["limite_mensal"], 3000.0);
    assert_eq!(beneficiary["status"], "ativo");

    let res = ctx
        .get(&format!("/api/beneficiarios/empresa/{}", ctx.company_id), &token)
        .await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["beneficiarios"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn beneficiary_registration_is_validated() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Admin).await;

    let res = ctx
        .post(
            "/api/beneficiarios",
            &token,
            &json!({ "empresa_id": ctx.company_id, "nome": "Outra Maria", "cpf": BENEFICIARY_CPF }),
        )
        .await;
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "CPF já cadastrado");

    let res = ctx
        .post(
            "/api/beneficiarios",
            &token,
            &json!({ "empresa_id": Uuid::new_v4(), "nome": "João", "cpf": "98765432100" }),
        )
        .await;
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Empresa inválida");

    let res = ctx
        .post("/api/beneficiarios", &token, &json!({ "nome": "João" }))
        .await;
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Dados incompletos");
}

#[tokio::test]
async fn companies_cannot_register_for_other_companies() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Company).await;

    let res = ctx
        .post(
            "/api/beneficiarios",
            &token,
            &json!({ "empresa_id": Uuid::new_v4(), "nome": "João", "cpf": "98765432100" }),
        )
        .await;
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn beneficiary_reads_its_own_data() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Beneficiary).await;

    let res = ctx
        .get(&format!("/api/beneficiarios/{}", ctx.beneficiary_id), &token)
        .await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["beneficiario"]["nome"], "Maria Teste");

    let res = ctx
        .get(&format!("/api/beneficiarios/{}/saldo", ctx.beneficiary_id), &token)
        .await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "saldo_atual": 500.0,
            "limite_diario": 200.0,
            "limite_semanal": 1000.0,
            "limite_mensal": 3000.0,
        })
    );

    let res = ctx
        .get(&format!("/api/beneficiarios/empresa/{}", ctx.company_id), &token)
        .await;
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn merchants_cannot_read_beneficiaries() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Merchant).await;

    let res = ctx
        .get(&format!("/api/beneficiarios/{}", ctx.beneficiary_id), &token)
        .await;
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn unknown_beneficiary_is_404() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Admin).await;

    let res = ctx
        .get(&format!("/api/beneficiarios/{}", Uuid::new_v4()), &token)
        .await;
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Beneficiário não encontrado");
}

#[tokio::test]
async fn company_changes_the_limits() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Company).await;

    let res = ctx
        .put(
            &format!("/api/beneficiarios/{}", ctx.beneficiary_id),
            &token,
            &json!({ "limite_diario": 350 }),
        )
        .await;
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Beneficiário atualizado com sucesso");
    assert_eq!(body["beneficiario"]["limite_diario"], 350.0);
    assert_eq!(body["beneficiario"]["limite_semanal"], 1000.0);
}

#[tokio::test]
async fn company_credits_a_beneficiary() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Company).await;

    let res = ctx
        .post(
            &format!("/api/beneficiarios/{}/creditos", ctx.beneficiary_id),
            &token,
            &json!({ "valor": 150, "descricao": "Vale alimentação" }),
        )
        .await;
    assert_eq!(res.status(), 201);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["saldo_anterior"], 500.0);
    assert_eq!(body["saldo_atual"], 650.0);
    assert_eq!(body["message"], "Crédito realizado com sucesso");

    assert_eq!(ctx.number("beneficiarios", &ctx.beneficiary_id, "saldo_atual"), 650.0);
    assert_eq!(ctx.number("empresas", &ctx.company_id, "saldo_total"), 10150.0);

    let res = ctx
        .get(&format!("/api/beneficiarios/{}/extrato", ctx.beneficiary_id), &token)
        .await;
    let body: Value = res.json().await.unwrap();
    let entries = body["extrato"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["tipo_transacao"], "credito");
    assert_eq!(entries[0]["descricao"], "Vale alimentação");
    assert_eq!(entries[0]["valor"], 150.0);
}

#[tokio::test]
async fn credits_are_validated() {
    let ctx = TestContext::start().await;
    let company = ctx.token(UserKind::Company).await;
    let beneficiary = ctx.token(UserKind::Beneficiary).await;
    let path = format!("/api/beneficiarios/{}/creditos", ctx.beneficiary_id);

    let res = ctx.post(&path, &company, &json!({ "valor": 0 })).await;
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Valor inválido");

    let res = ctx.post(&path, &beneficiary, &json!({ "valor": 100 })).await;
    assert_eq!(res.status(), 403);

    assert_eq!(ctx.number("beneficiarios", &ctx.beneficiary_id, "saldo_atual"), 500.0);
}
