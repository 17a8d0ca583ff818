use crate::common::test_context::{TestContext, MERCHANT_CNPJ};
use acieicard::auth::UserKind;
use chrono::Duration;
use serde_json::{json, Value};

#[tokio::test]
async fn any_user_lists_merchants() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Beneficiary).await;

    let res = ctx.get("/api/conveniados", &token).await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["conveniados"].as_array().unwrap().len(), 1);
    assert_eq!(body["conveniados"][0]["nome_fantasia"], "Mercado Teste");
    assert!(body["conveniados"][0].get("password_hash").is_none());

    let res = ctx.get("/api/conveniados?status=inativo", &token).await;
    let body: Value = res.json().await.unwrap();
    assert!(body["conveniados"].as_array().unwrap().is_empty());

    let res = ctx
        .get(&format!("/api/conveniados/{}", ctx.merchant_id), &token)
        .await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["conveniado"]["cnpj"], MERCHANT_CNPJ);
}

#[tokio::test]
async fn admin_registers_a_merchant_with_the_default_fee() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Admin).await;

    let res = ctx
        .post(
            "/api/conveniados",
            &token,
            &json!({
                "cnpj": "22.333.444/0001-55",
                "razao_social": "Farmácia Central LTDA",
                "nome_fantasia": "Farmácia Central",
                "email": "contato@farmacia.com.br",
            }),
        )
        .await;
    assert_eq!(res.status(), 201);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Estabelecimento cadastrado com sucesso");
    assert_eq!(body["conveniado"]["cnpj"], "22333444000155");
    assert_eq!(body["conveniado"]["taxa_transacao"], 2.5);

    let res = ctx
        .post(
            "/api/conveniados",
            &token,
            &json!({
                "cnpj": MERCHANT_CNPJ,
                "razao_social": "Outro",
                "email": "outro@example.com",
            }),
        )
        .await;
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "CNPJ já cadastrado");
}

#[tokio::test]
async fn only_admins_register_merchants() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Company).await;

    let res = ctx
        .post(
            "/api/conveniados",
            &token,
            &json!({
                "cnpj": "22333444000155",
                "razao_social": "Farmácia Central LTDA",
                "email": "contato@farmacia.com.br",
            }),
        )
        .await;
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn merchant_updates_itself_only() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Merchant).await;

    let res = ctx
        .put(
            &format!("/api/conveniados/{}", ctx.merchant_id),
            &token,
            &json!({ "telefone": "1144445555" }),
        )
        .await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Estabelecimento atualizado com sucesso");
    assert_eq!(body["conveniado"]["telefone"], "1144445555");

    let res = ctx
        .put(
            "/api/conveniados/someone-else",
            &token,
            &json!({ "telefone": "1144445555" }),
        )
        .await;
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn sales_report_sums_approved_sales() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Merchant).await;
    ctx.seed_payment(10.0, Duration::hours(1));
    ctx.seed_payment(25.5, Duration::days(2));
    ctx.seed_payment(40.0, Duration::days(40));

    let res = ctx
        .get(&format!("/api/conveniados/{}/vendas", ctx.merchant_id), &token)
        .await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["vendas"].as_array().unwrap().len(), 3);
    assert_eq!(body["estatisticas"]["total_vendas"], 75.5);
    assert_eq!(body["estatisticas"]["total_transacoes"], 3);

    let since = (chrono::Utc::now() - Duration::days(7)).format("%Y-%m-%d");
    let res = ctx
        .get(
            &format!("/api/conveniados/{}/vendas?data_inicio={}", ctx.merchant_id, since),
            &token,
        )
        .await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["estatisticas"]["total_transacoes"], 2);
    assert_eq!(body["estatisticas"]["ticket_medio"], 17.75);
}

#[tokio::test]
async fn empty_sales_report_has_zero_average() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Admin).await;

    let res = ctx
        .get(&format!("/api/conveniados/{}/vendas", ctx.merchant_id), &token)
        .await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["estatisticas"],
        json!({ "total_vendas": 0.0, "total_transacoes": 0, "ticket_medio": 0.0 })
    );
}

#[tokio::test]
async fn dashboard_groups_sales_by_period() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Merchant).await;
    ctx.seed_payment(10.0, Duration::zero());
    ctx.seed_payment(20.0, Duration::days(3));
    ctx.seed_payment(30.0, Duration::days(20));
    ctx.seed_payment(99.0, Duration::days(45));

    let res = ctx
        .get(&format!("/api/conveniados/{}/dashboard", ctx.merchant_id), &token)
        .await;
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["dashboard"],
        json!({
            "vendas_hoje": { "valor": 10.0, "transacoes": 1 },
            "vendas_semana": { "valor": 30.0, "transacoes": 2 },
            "vendas_mes": { "valor": 60.0, "transacoes": 3 },
        })
    );
}

#[tokio::test]
async fn other_merchants_cannot_see_the_dashboard() {
    let ctx = TestContext::start().await;
    let token = ctx.token(UserKind::Beneficiary).await;

    let res = ctx
        .get(&format!("/api/conveniados/{}/dashboard", ctx.merchant_id), &token)
        .await;
    assert_eq!(res.status(), 403);
}
