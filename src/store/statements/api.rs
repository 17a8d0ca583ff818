use crate::{
    store::{
        statements::{NewStatementEntry, StatementEntry},
        DatabaseClientInner, Direction, Query, Table,
    },
    Error,
};
use std::sync::Arc;

/// Client for the `extratos` table.
#[derive(Clone, Debug)]
pub struct StatementsApi {
    table: Table,
}

impl StatementsApi {
    pub(crate) fn new(inner: Arc<DatabaseClientInner>) -> Self {
        Self {
            table: Table::new(inner, "extratos"),
        }
    }

    #[tracing::instrument(
        name = "Create Statement Entry",
        skip(self, entry),
        fields(beneficiary_id = %entry.beneficiary_id, kind = ?entry.kind)
    )]
    pub async fn create(&self, entry: &NewStatementEntry) -> Result<StatementEntry, Error> {
        self.table.insert(entry).await
    }

    /// Statement of a beneficiary, newest entries first.
    #[tracing::instrument(name = "List Statement Entries by Beneficiary", skip(self))]
    pub async fn list_by_beneficiary(
        &self,
        beneficiary_id: &str,
    ) -> Result<Vec<StatementEntry>, Error> {
        self.table
            .select(
                &Query::new()
                    .eq("beneficiario_id", beneficiary_id)
                    .order("created_at", Direction::Descending),
            )
            .await
    }
}
