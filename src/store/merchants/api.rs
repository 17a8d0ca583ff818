use crate::{
    store::{
        merchants::{Merchant, MerchantUpdate, NewMerchant},
        AccountStatus, DatabaseClientInner, Direction, Query, Table,
    },
    Error,
};
use chrono::Utc;
use std::sync::Arc;

/// Client for the `conveniados` table.
#[derive(Clone, Debug)]
pub struct MerchantsApi {
    table: Table,
}

impl MerchantsApi {
    pub(crate) fn new(inner: Arc<DatabaseClientInner>) -> Self {
        Self {
            table: Table::new(inner, "conveniados"),
        }
    }

    /// Lists merchants sorted by trade name, optionally only those with the given status.
    #[tracing::instrument(name = "List Merchants", skip(self))]
    pub async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Merchant>, Error> {
        let mut query = Query::new().order("nome_fantasia", Direction::Ascending);
        if let Some(status) = status {
            query = query.eq("status", status);
        }

        self.table.select(&query).await
    }

    pub async fn list_active(&self) -> Result<Vec<Merchant>, Error> {
        self.list(Some(AccountStatus::Active)).await
    }

    /// Gets a merchant by id.
    ///
    /// If there's no merchant with the given id, `None` is returned.
    #[tracing::instrument(name = "Get Merchant by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Merchant>, Error> {
        self.table.select_one(Query::new().eq("id", id)).await
    }

    /// Looks a merchant up by its (digits only) CNPJ.
    #[tracing::instrument(name = "Find Merchant by CNPJ", skip(self))]
    pub async fn find_by_cnpj(&self, cnpj: &str) -> Result<Option<Merchant>, Error> {
        self.table.select_one(Query::new().eq("cnpj", cnpj)).await
    }

    #[tracing::instrument(name = "Create Merchant", skip(self, merchant), fields(cnpj = %merchant.cnpj))]
    pub async fn create(&self, merchant: &NewMerchant) -> Result<Merchant, Error> {
        self.table.insert(merchant).await
    }

    /// Applies a partial update, stamping `updated_at`.
    ///
    /// Returns `None` if no merchant has the given id.
    #[tracing::instrument(name = "Update Merchant", skip(self, changes))]
    pub async fn update(
        &self,
        id: &str,
        changes: &MerchantUpdate,
    ) -> Result<Option<Merchant>, Error> {
        let changes = MerchantUpdate {
            updated_at: Some(Utc::now()),
            ..changes.clone()
        };

        let mut rows: Vec<Merchant> = self
            .table
            .update(&Query::new().eq("id", id), &changes)
            .await?;

        Ok(rows.pop())
    }
}
