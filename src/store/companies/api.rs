use crate::{
    store::{
        companies::{Company, CompanyUpdate, NewCompany},
        AccountStatus, DatabaseClientInner, Direction, Query, Table,
    },
    Error,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

/// Client for the `empresas` table.
#[derive(Clone, Debug)]
pub struct CompaniesApi {
    table: Table,
}

impl CompaniesApi {
    pub(crate) fn new(inner: Arc<DatabaseClientInner>) -> Self {
        Self {
            table: Table::new(inner, "empresas"),
        }
    }

    /// Lists all companies, newest first.
    #[tracing::instrument(name = "List Companies", skip(self))]
    pub async fn list(&self) -> Result<Vec<Company>, Error> {
        self.table
            .select(&Query::new().order("created_at", Direction::Descending))
            .await
    }

    #[tracing::instrument(name = "List active Companies", skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Company>, Error> {
        self.table
            .select(&Query::new().eq("status", AccountStatus::Active))
            .await
    }

    /// Gets a company by id.
    ///
    /// If there's no company with the given id, `None` is returned.
    #[tracing::instrument(name = "Get Company by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Company>, Error> {
        self.table.select_one(Query::new().eq("id", id)).await
    }

    /// Looks a company up by its (digits only) CNPJ.
    #[tracing::instrument(name = "Find Company by CNPJ", skip(self))]
    pub async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Company>, Error> {
        self.table.select_one(Query::new().eq("cnpj", cnpj)).await
    }

    #[tracing::instrument(name = "Create Company", skip(self, company), fields(cnpj = %company.cnpj))]
    pub async fn create(&self, company: &NewCompany) -> Result<Company, Error> {
        self.table.insert(company).await
    }

    /// Applies a partial update, stamping `updated_at`.
    ///
    /// Returns `None` if no company has the given id.
    #[tracing::instrument(name = "Update Company", skip(self, changes))]
    pub async fn update(&self, id: &str, changes: &CompanyUpdate) -> Result<Option<Company>, Error> {
        let changes = CompanyUpdate {
            updated_at: Some(Utc::now()),
            ..changes.clone()
        };

        let mut rows: Vec<Company> = self
            .table
            .update(&Query::new().eq("id", id), &changes)
            .await?;

        Ok(rows.pop())
    }

    /// Sets the aggregate balance to `new` only if it still equals `expected`.
    ///
    /// Returns `false` when the balance moved in the meantime and nothing was written.
    #[tracing::instrument(name = "Compare and set Company balance", skip(self))]
    pub async fn compare_and_set_balance(
        &self,
        id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<bool, Error> {
        let rows: Vec<Company> = self
            .table
            .update_conditional(
                &Query::new().eq("id", id).eq("saldo_total", expected),
                &json!({ "saldo_total": new, "updated_at": Utc::now() }),
            )
            .await?;

        Ok(!rows.is_empty())
    }
}
