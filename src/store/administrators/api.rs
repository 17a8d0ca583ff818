use crate::{
    store::{administrators::Administrator, AccountStatus, DatabaseClientInner, Query, Table},
    Error,
};
use std::sync::Arc;

/// Client for the `administradores` table.
#[derive(Clone, Debug)]
pub struct AdministratorsApi {
    table: Table,
}

impl AdministratorsApi {
    pub(crate) fn new(inner: Arc<DatabaseClientInner>) -> Self {
        Self {
            table: Table::new(inner, "administradores"),
        }
    }

    #[tracing::instrument(name = "Get Administrator by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Administrator>, Error> {
        self.table.select_one(Query::new().eq("id", id)).await
    }

    /// Administrators log in with their email rather than a CPF/CNPJ.
    #[tracing::instrument(name = "Find Administrator by email", skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Administrator>, Error> {
        self.table.select_one(Query::new().eq("email", email)).await
    }

    #[tracing::instrument(name = "List active Administrators", skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Administrator>, Error> {
        self.table
            .select(&Query::new().eq("status", AccountStatus::Active))
            .await
    }
}
