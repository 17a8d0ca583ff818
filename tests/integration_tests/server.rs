use crate::common::test_context::TestContext;
use serde_json::{json, Value};

#[tokio::test]
async fn health_check() {
    let ctx = TestContext::start().await;

    let res = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "127.0.0.1");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let ctx = TestContext::start().await;

    let res = ctx
        .client
        .get(ctx.url("/api/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Rota não encontrada" }));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let ctx = TestContext::start().await;

    let res = ctx
        .client
        .post(ctx.url("/api/auth/login"))
        .header("Content-Type", "application/json")
        .body("{\"cpf_cnpj\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "JSON inválido");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn cors_allows_the_configured_frontend() {
    let ctx = TestContext::start().await;

    let res = ctx
        .client
        .request(reqwest::Method::OPTIONS, ctx.url("/api/auth/login"))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    assert_eq!(res.headers()["access-control-allow-credentials"], "true");
}
