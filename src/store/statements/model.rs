use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What moved the balance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Purchase at a merchant.
    #[serde(rename = "pagamento")]
    Payment,
    /// Purchase reversed by a cancellation.
    #[serde(rename = "estorno")]
    Reversal,
    /// Funds loaded by the company.
    #[serde(rename = "credito")]
    Credit,
    #[serde(rename = "debito")]
    Debit,
}

/// One row of a beneficiary's statement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatementEntry {
    pub id: String,
    #[serde(rename = "beneficiario_id")]
    pub beneficiary_id: String,
    #[serde(rename = "empresa_id")]
    pub company_id: String,
    #[serde(rename = "conveniado_id", default)]
    pub merchant_id: Option<String>,
    #[serde(rename = "tipo_transacao")]
    pub kind: EntryKind,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "saldo_anterior")]
    pub balance_before: Decimal,
    #[serde(rename = "saldo_atual")]
    pub balance_after: Decimal,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewStatementEntry {
    #[serde(rename = "beneficiario_id")]
    pub beneficiary_id: String,
    #[serde(rename = "empresa_id")]
    pub company_id: String,
    #[serde(rename = "conveniado_id")]
    pub merchant_id: Option<String>,
    #[serde(rename = "tipo_transacao")]
    pub kind: EntryKind,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "saldo_anterior")]
    pub balance_before: Decimal,
    #[serde(rename = "saldo_atual")]
    pub balance_after: Decimal,
    #[serde(rename = "descricao")]
    pub description: String,
}
