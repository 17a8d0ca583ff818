//! Clients for the tables of the hosted database.
//!
//! The database is reached through its REST layer (PostgREST, as exposed by Supabase):
//! every table lives at `<project>/rest/v1/<table>` and is filtered through the query string.

use crate::{
    common::{IDEMPOTENCY_KEY_HEADER, PREFER_HEADER, RETURN_REPRESENTATION},
    Error,
};
use anyhow::anyhow;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use uuid::Uuid;

pub mod administrators;
pub mod beneficiaries;
pub mod companies;
pub mod merchants;
pub mod query;
pub mod statements;
pub mod transactions;

pub use query::{Direction, Query};

pub(crate) struct DatabaseClientInner {
    pub(crate) client: ClientWithMiddleware,
    pub(crate) rest_url: Url,
}

impl Debug for DatabaseClientInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseClientInner")
            .field("rest_url", &self.rest_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Lifecycle status shared by every kind of account.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "inativo")]
    Inactive,
    #[serde(rename = "suspenso")]
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ativo",
            AccountStatus::Inactive => "inativo",
            AccountStatus::Suspended => "suspenso",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped access to a single table. The per-table APIs wrap this with typed operations.
#[derive(Clone, Debug)]
pub(crate) struct Table {
    inner: Arc<DatabaseClientInner>,
    name: &'static str,
}

impl Table {
    pub(crate) fn new(inner: Arc<DatabaseClientInner>, name: &'static str) -> Self {
        Self { inner, name }
    }

    fn url(&self) -> Url {
        self.inner.rest_url.join(self.name).unwrap()
    }

    pub(crate) async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, Error> {
        let rows = self
            .inner
            .client
            .get(self.url())
            .query(&query.to_pairs())
            .send()
            .await?
            .json()
            .await?;

        Ok(rows)
    }

    /// Returns the first row matching the query, or `None` if nothing matched.
    pub(crate) async fn select_one<T: DeserializeOwned>(
        &self,
        query: Query,
    ) -> Result<Option<T>, Error> {
        let mut rows: Vec<T> = self.select(&query.limit(1)).await?;
        Ok(rows.pop())
    }

    /// Inserts a single row and returns it as stored (with generated ids and timestamps).
    pub(crate) async fn insert<B, T>(&self, row: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut rows: Vec<T> = self
            .inner
            .client
            .post(self.url())
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(row)
            .send()
            .await?
            .json()
            .await?;

        rows.pop()
            .ok_or_else(|| Error::Other(anyhow!("Insert into {} returned no rows", self.name)))
    }

    /// Applies `changes` to every row matching the query and returns the updated rows.
    ///
    /// Plain updates write absolute values, so they are marked as safe to retry.
    pub(crate) async fn update<B, T>(&self, query: &Query, changes: &B) -> Result<Vec<T>, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let idempotency_key = Uuid::new_v4();

        self.patch(query, changes, Some(idempotency_key)).await
    }

    /// Like [`update`](Self::update), for updates whose filter also checks the current value
    /// of the columns being written (compare-and-set).
    ///
    /// These are never retried: a replay after a lost response matches no rows and would
    /// report a conflict for a write that actually happened.
    pub(crate) async fn update_conditional<B, T>(
        &self,
        query: &Query,
        changes: &B,
    ) -> Result<Vec<T>, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.patch(query, changes, None).await
    }

    async fn patch<B, T>(
        &self,
        query: &Query,
        changes: &B,
        idempotency_key: Option<Uuid>,
    ) -> Result<Vec<T>, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .inner
            .client
            .patch(self.url())
            .query(&query.to_pairs())
            .header(PREFER_HEADER, RETURN_REPRESENTATION);

        if let Some(idempotency_key) = idempotency_key {
            request = request.header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string());
        }

        let rows = request.json(changes).send().await?.json().await?;

        Ok(rows)
    }
}

/// Table plumbing pointed at a wiremock server, with the same error translation as the real
/// client and no retries.
#[cfg(test)]
pub(crate) fn mock_inner(mock_server: &wiremock::MockServer) -> Arc<DatabaseClientInner> {
    use crate::middlewares::error_handling::ErrorHandlingMiddleware;

    let rest_url = Url::parse(&format!("{}/rest/v1/", mock_server.uri())).unwrap();

    Arc::new(DatabaseClientInner {
        client: reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
            .with(ErrorHandlingMiddleware)
            .build(),
        rest_url,
    })
}
