use crate::{
    store::{
        beneficiaries::{Beneficiary, BeneficiaryUpdate, NewBeneficiary},
        AccountStatus, DatabaseClientInner, Direction, Query, Table,
    },
    Error,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

/// Client for the `beneficiarios` table.
#[derive(Clone, Debug)]
pub struct BeneficiariesApi {
    table: Table,
}

impl BeneficiariesApi {
    pub(crate) fn new(inner: Arc<DatabaseClientInner>) -> Self {
        Self {
            table: Table::new(inner, "beneficiarios"),
        }
    }

    /// Lists the beneficiaries of a company, sorted by name.
    #[tracing::instrument(name = "List Beneficiaries by Company", skip(self))]
    pub async fn list_by_company(&self, company_id: &str) -> Result<Vec<Beneficiary>, Error> {
        self.table
            .select(
                &Query::new()
                    .eq("empresa_id", company_id)
                    .order("nome", Direction::Ascending),
            )
            .await
    }

    #[tracing::instrument(name = "List active Beneficiaries", skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Beneficiary>, Error> {
        self.table
            .select(&Query::new().eq("status", AccountStatus::Active))
            .await
    }

    /// Gets a beneficiary by id.
    ///
    /// If there's no beneficiary with the given id, `None` is returned.
    #[tracing::instrument(name = "Get Beneficiary by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Beneficiary>, Error> {
        self.table.select_one(Query::new().eq("id", id)).await
    }

    /// Looks a beneficiary up by its (digits only) CPF.
    #[tracing::instrument(name = "Find Beneficiary by CPF", skip(self))]
    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Beneficiary>, Error> {
        self.table.select_one(Query::new().eq("cpf", cpf)).await
    }

    #[tracing::instrument(
        name = "Create Beneficiary",
        skip(self, beneficiary),
        fields(company_id = %beneficiary.company_id)
    )]
    pub async fn create(&self, beneficiary: &NewBeneficiary) -> Result<Beneficiary, Error> {
        self.table.insert(beneficiary).await
    }

    /// Applies a partial update, stamping `updated_at`.
    ///
    /// Returns `None` if no beneficiary has the given id.
    #[tracing::instrument(name = "Update Beneficiary", skip(self, changes))]
    pub async fn update(
        &self,
        id: &str,
        changes: &BeneficiaryUpdate,
    ) -> Result<Option<Beneficiary>, Error> {
        let changes = BeneficiaryUpdate {
            updated_at: Some(Utc::now()),
            ..changes.clone()
        };

        let mut rows: Vec<Beneficiary> = self
            .table
            .update(&Query::new().eq("id", id), &changes)
            .await?;

        Ok(rows.pop())
    }

    /// Sets the balance to `new` only if it still equals `expected`.
    ///
    /// Returns `false` when the balance moved in the meantime and nothing was written.
    #[tracing::instrument(name = "Compare and set Beneficiary balance", skip(self))]
    pub async fn compare_and_set_balance(
        &self,
        id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<bool, Error> {
        let rows: Vec<Beneficiary> = self
            .table
            .update_conditional(
                &Query::new().eq("id", id).eq("saldo_atual", expected),
                &json!({ "saldo_atual": new, "updated_at": Utc::now() }),
            )
            .await?;

        Ok(!rows.is_empty())
    }
}
