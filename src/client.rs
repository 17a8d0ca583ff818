//! Module containing the hosted database client.

use crate::{
    error::Error,
    middlewares::{
        api_key::ApiKeyMiddleware,
        error_handling::ErrorHandlingMiddleware,
        inject_user_agent::InjectUserAgentMiddleware,
        retry_idempotent::{DynRetryPolicy, RetryIdempotentMiddleware},
    },
    store::{
        administrators::AdministratorsApi, beneficiaries::BeneficiariesApi,
        companies::CompaniesApi, merchants::MerchantsApi, statements::StatementsApi,
        transactions::TransactionsApi, DatabaseClientInner,
    },
};
use reqwest::{header::HeaderValue, Url};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_tracing::TracingMiddleware;
use retry_policies::RetryPolicy;
use secrecy::SecretString;
use std::sync::Arc;

/// Path of the REST layer relative to the project URL.
static REST_PATH: &str = "rest/v1/";

/// Client for the tables of the hosted database.
///
/// Cloning is cheap: all the table APIs share the same connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseClient {
    /// `administradores` table.
    pub administrators: AdministratorsApi,
    /// `empresas` table.
    pub companies: CompaniesApi,
    /// `beneficiarios` table.
    pub beneficiaries: BeneficiariesApi,
    /// `conveniados` table.
    pub merchants: MerchantsApi,
    /// `transacoes` table.
    pub transactions: TransactionsApi,
    /// `extratos` table.
    pub statements: StatementsApi,
}

impl DatabaseClient {
    /// Builds a new [`DatabaseClient`](crate::client::DatabaseClient) with the default configuration.
    ///
    /// Fails if `project_url` cannot hold the REST path (e.g. `mailto:` URLs).
    pub fn new(project_url: Url, service_key: SecretString) -> Result<DatabaseClient, Error> {
        DatabaseClientBuilder::new(project_url, service_key).build()
    }

    /// Returns a new builder to configure a new [`DatabaseClient`](crate::client::DatabaseClient).
    pub fn builder(project_url: Url, service_key: SecretString) -> DatabaseClientBuilder {
        DatabaseClientBuilder::new(project_url, service_key)
    }
}

/// Builder for a [`DatabaseClient`](crate::client::DatabaseClient).
#[derive(Debug)]
pub struct DatabaseClientBuilder {
    client: reqwest::Client,
    retry_policy: Option<DynRetryPolicy>,
    project_url: Url,
    service_key: SecretString,
    user_agent: Option<HeaderValue>,
}

impl DatabaseClientBuilder {
    /// Creates a new builder to configure a [`DatabaseClient`](crate::client::DatabaseClient).
    pub fn new(project_url: Url, service_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            retry_policy: Some(DynRetryPolicy(Arc::new(
                ExponentialBackoff::builder().build_with_max_retries(3),
            ))),
            project_url,
            service_key,
            user_agent: None,
        }
    }

    /// Consumes the builder and builds a new [`DatabaseClient`](crate::client::DatabaseClient).
    pub fn build(self) -> Result<DatabaseClient, Error> {
        let rest_url = rest_url(&self.project_url)?;
        let inner = Arc::new(DatabaseClientInner {
            client: build_client_with_middleware(
                self.client,
                self.retry_policy,
                self.user_agent,
                ApiKeyMiddleware {
                    service_key: self.service_key,
                },
            ),
            rest_url,
        });

        Ok(DatabaseClient {
            administrators: AdministratorsApi::new(inner.clone()),
            companies: CompaniesApi::new(inner.clone()),
            beneficiaries: BeneficiariesApi::new(inner.clone()),
            merchants: MerchantsApi::new(inner.clone()),
            transactions: TransactionsApi::new(inner.clone()),
            statements: StatementsApi::new(inner),
        })
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets a specific [`RetryPolicy`](retry_policies::RetryPolicy) to use when retrying transient failures.
    ///
    /// To disable automatic retrying of failed requests, use `None`.
    pub fn with_retry_policy(
        mut self,
        retry_policy: impl Into<Option<Arc<dyn RetryPolicy + Send + Sync + 'static>>>,
    ) -> Self {
        self.retry_policy = retry_policy.into().map(DynRetryPolicy);
        self
    }

    /// Retries transient failures up to `max_retries` times with exponential backoff.
    pub fn with_max_retries(self, max_retries: u32) -> Self {
        self.with_retry_policy(Some(Arc::new(
            ExponentialBackoff::builder().build_with_max_retries(max_retries),
        ) as Arc<dyn RetryPolicy + Send + Sync>))
    }

    /// Overrides the `User-Agent` sent with every request.
    ///
    /// Defaults to `acieicard/<version>`.
    pub fn with_user_agent(mut self, user_agent: HeaderValue) -> Self {
        self.user_agent = Some(user_agent);
        self
    }
}

fn rest_url(project_url: &Url) -> Result<Url, Error> {
    if project_url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(project_url.to_string()));
    }

    // `Url::join` replaces the last path segment unless the base ends with a slash
    let mut base = project_url.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }

    base.join(REST_PATH)
        .map_err(|_| Error::InvalidUrl(project_url.to_string()))
}

fn build_client_with_middleware(
    client: reqwest::Client,
    retry_policy: Option<DynRetryPolicy>,
    user_agent: Option<HeaderValue>,
    api_key_middleware: ApiKeyMiddleware,
) -> ClientWithMiddleware {
    let user_agent_middleware = user_agent
        .map(InjectUserAgentMiddleware::new)
        .unwrap_or_default();

    let mut builder = reqwest_middleware::ClientBuilder::new(client)
        .with(user_agent_middleware)
        .with(TracingMiddleware::default())
        .with(ErrorHandlingMiddleware);

    if let Some(retry_policy) = retry_policy {
        builder = builder.with(RetryIdempotentMiddleware::new(retry_policy));
    }

    builder.with(api_key_middleware).build()
}
