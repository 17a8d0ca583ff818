use crate::{
    store::{
        transactions::{NewTransaction, Transaction, TransactionFilter, TransactionStatus},
        DatabaseClientInner, Direction, Query, Table,
    },
    Error,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;

static LIST_SELECT: &str =
    "*,beneficiarios(nome,cpf),conveniados(nome_fantasia,cnpj),empresas(razao_social,cnpj)";
static DETAIL_SELECT: &str = "*,beneficiarios(nome,cpf,email),conveniados(nome_fantasia,cnpj,telefone),empresas(razao_social,cnpj)";
static SALES_SELECT: &str = "*,beneficiarios(nome,cpf),empresas(razao_social,cnpj)";

/// Client for the `transacoes` table.
#[derive(Clone, Debug)]
pub struct TransactionsApi {
    table: Table,
}

impl TransactionsApi {
    pub(crate) fn new(inner: Arc<DatabaseClientInner>) -> Self {
        Self {
            table: Table::new(inner, "transacoes"),
        }
    }

    /// Lists transactions matching the filter, newest first.
    #[tracing::instrument(name = "List Transactions", skip(self))]
    pub async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        let mut query = Query::new()
            .select(LIST_SELECT)
            .order("data_transacao", Direction::Descending);

        if let Some(ref company_id) = filter.company_id {
            query = query.eq("empresa_id", company_id);
        }
        if let Some(ref beneficiary_id) = filter.beneficiary_id {
            query = query.eq("beneficiario_id", beneficiary_id);
        }
        if let Some(ref merchant_id) = filter.merchant_id {
            query = query.eq("conveniado_id", merchant_id);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status);
        }
        if let Some(ref from) = filter.from {
            query = query.gte("data_transacao", from);
        }
        if let Some(ref to) = filter.to {
            query = query.lte("data_transacao", to);
        }

        self.table.select(&query).await
    }

    /// Gets a transaction, with beneficiary, merchant and company details, by id.
    ///
    /// If there's no transaction with the given id, `None` is returned.
    #[tracing::instrument(name = "Get Transaction by ID", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Transaction>, Error> {
        self.table
            .select_one(Query::new().select(DETAIL_SELECT).eq("id", id))
            .await
    }

    #[tracing::instrument(
        name = "Create Transaction",
        skip(self, transaction),
        fields(
            beneficiary_id = %transaction.beneficiary_id,
            merchant_id = %transaction.merchant_id,
            amount = %transaction.amount,
        )
    )]
    pub async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, Error> {
        self.table.insert(transaction).await
    }

    /// Approved sales of a merchant, newest first, optionally bounded in time.
    #[tracing::instrument(name = "List approved Transactions for Merchant", skip(self))]
    pub async fn approved_for_merchant(
        &self,
        merchant_id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<Transaction>, Error> {
        let mut query = Query::new()
            .select(SALES_SELECT)
            .eq("conveniado_id", merchant_id)
            .eq("status", TransactionStatus::Approved)
            .order("data_transacao", Direction::Descending);

        if let Some(from) = from {
            query = query.gte("data_transacao", from);
        }
        if let Some(to) = to {
            query = query.lte("data_transacao", to);
        }

        self.table.select(&query).await
    }

    /// Approved payments of a beneficiary made at or after `since`.
    #[tracing::instrument(name = "List approved Transactions for Beneficiary", skip(self))]
    pub async fn approved_for_beneficiary_since(
        &self,
        beneficiary_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, Error> {
        self.table
            .select(
                &Query::new()
                    .eq("beneficiario_id", beneficiary_id)
                    .eq("status", TransactionStatus::Approved)
                    .gte("data_transacao", timestamp(since)),
            )
            .await
    }

    /// Moves a transaction from `aprovado` to `cancelado`, replacing its card payload.
    ///
    /// Returns `None` if the transaction does not exist or is no longer approved,
    /// which makes concurrent cancellations of the same payment mutually exclusive.
    #[tracing::instrument(name = "Cancel Transaction", skip(self, nfc_data))]
    pub async fn cancel_if_approved(
        &self,
        id: &str,
        nfc_data: serde_json::Value,
    ) -> Result<Option<Transaction>, Error> {
        let mut rows: Vec<Transaction> = self
            .table
            .update_conditional(
                &Query::new()
                    .eq("id", id)
                    .eq("status", TransactionStatus::Approved),
                &json!({
                    "status": TransactionStatus::Cancelled,
                    "dados_nfc": nfc_data,
                }),
            )
            .await?;

        Ok(rows.pop())
    }
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}
