use crate::common::mock_database::MockDatabase;
use acieicard::{
    auth::{TokenIssuer, UserKind},
    server::{self, AppState},
    DatabaseClient,
};
use chrono::{Duration, SecondsFormat, Utc};
use reqwest::{Response, Url};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

pub static PASSWORD: &str = "senha123";
pub static ADMIN_EMAIL: &str = "admin@aciei.com.br";
pub static COMPANY_CNPJ: &str = "12345678000199";
pub static BENEFICIARY_CPF: &str = "12345678901";
pub static MERCHANT_CNPJ: &str = "98765432000188";

/// A running API backed by a fresh in-memory database holding one account of each kind.
pub struct TestContext {
    pub db: MockDatabase,
    pub client: reqwest::Client,
    pub admin_id: String,
    pub company_id: String,
    pub beneficiary_id: String,
    pub merchant_id: String,
    url: Url,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestContext {
    pub async fn start() -> Self {
        // Random credentials for this specific test
        let service_key = Uuid::new_v4().to_string();
        let jwt_secret = Uuid::new_v4().to_string();

        let db = MockDatabase::start(&service_key).await;

        let admin_id = Uuid::new_v4().to_string();
        let company_id = Uuid::new_v4().to_string();
        let beneficiary_id = Uuid::new_v4().to_string();
        let merchant_id = Uuid::new_v4().to_string();
        let password_hash = bcrypt::hash(PASSWORD, 4).unwrap();

        db.seed(
            "administradores",
            json!({
                "id": admin_id,
                "nome": "Administrador",
                "email": ADMIN_EMAIL,
                "status": "ativo",
                "password_hash": password_hash,
            }),
        );
        db.seed(
            "empresas",
            json!({
                "id": company_id,
                "cnpj": COMPANY_CNPJ,
                "razao_social": "Empresa Teste LTDA",
                "email": "rh@empresa.com.br",
                "saldo_total": 10000.0,
                "status": "ativo",
                "password_hash": password_hash,
            }),
        );
        db.seed(
            "beneficiarios",
            json!({
                "id": beneficiary_id,
                "empresa_id": company_id,
                "cpf": BENEFICIARY_CPF,
                "nome": "Maria Teste",
                "email": "maria@empresa.com.br",
                "saldo_atual": 500.0,
                "limite_diario": 200.0,
                "limite_semanal": 1000.0,
                "limite_mensal": 3000.0,
                "status": "ativo",
                "password_hash": password_hash,
            }),
        );
        db.seed(
            "conveniados",
            json!({
                "id": merchant_id,
                "cnpj": MERCHANT_CNPJ,
                "razao_social": "Mercado Teste LTDA",
                "nome_fantasia": "Mercado Teste",
                "email": "caixa@mercado.com.br",
                "taxa_transacao": 2.5,
                "status": "ativo",
                "password_hash": password_hash,
            }),
        );

        // Point the real API to the mock database
        let database = DatabaseClient::builder(
            db.url().clone(),
            SecretString::new(service_key),
        )
        .with_retry_policy(None) // Disable retries against the mock database
        .build()
        .unwrap();
        let state = AppState {
            db: database,
            tokens: TokenIssuer::new(&SecretString::new(jwt_secret), Duration::hours(24)),
            database: db.url().host_str().unwrap().to_string(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let http_server =
            server::listen(listener, state, vec!["http://localhost:3000".to_string()]).unwrap();

        // Kill the API when this struct is dropped
        let (shutdown_sender, shutdown_recv) = oneshot::channel();
        tokio::spawn(async move {
            tokio::select! {
                _ = http_server => panic!("HTTP server crashed"),
                _ = shutdown_recv => { /* Intentional shutdown */ }
            }
        });

        Self {
            db,
            client: reqwest::Client::new(),
            admin_id,
            company_id,
            beneficiary_id,
            merchant_id,
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            shutdown: Some(shutdown_sender),
        }
    }

    pub fn url(&self, path: &str) -> Url {
        self.url.join(path).unwrap()
    }

    pub async fn login(&self, kind: &str, login: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({
                "cpf_cnpj": login,
                "senha": password,
                "tipo_usuario": kind,
            }))
            .send()
            .await
            .unwrap()
    }

    /// Logs in as the seeded account of the given kind and returns its access token.
    pub async fn token(&self, kind: UserKind) -> String {
        let login = match kind {
            UserKind::Admin => ADMIN_EMAIL,
            UserKind::Company => COMPANY_CNPJ,
            UserKind::Merchant => MERCHANT_CNPJ,
            UserKind::Beneficiary => BENEFICIARY_CPF,
        };

        let res = self.login(kind.as_str(), login, PASSWORD).await;
        assert_eq!(res.status(), 200, "Login as {} failed", kind);

        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, path: &str, token: &str) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, token: &str, body: &B) -> Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, token: &str, body: &B) -> Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// Stores an approved payment of the seeded beneficiary made `age` ago.
    pub fn seed_payment(&self, amount: f64, age: Duration) -> String {
        let id = Uuid::new_v4().to_string();
        self.db.seed(
            "transacoes",
            json!({
                "id": id,
                "beneficiario_id": self.beneficiary_id,
                "conveniado_id": self.merchant_id,
                "empresa_id": self.company_id,
                "valor": amount,
                "tipo_pagamento": "nfc",
                "status": "aprovado",
                "dados_nfc": null,
                "data_transacao": (Utc::now() - age).to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
        );
        id
    }

    /// Current value of a numeric column of a stored row.
    pub fn number(&self, table: &str, id: &str, column: &str) -> f64 {
        self.db
            .row(table, id)
            .and_then(|row| row[column].as_f64())
            .unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Send a shutdown signal to the actix server on drop
        let _ = self.shutdown.take().unwrap().send(());
    }
}
