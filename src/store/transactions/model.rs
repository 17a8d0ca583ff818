use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "aprovado")]
    Approved,
    #[serde(rename = "recusado")]
    Declined,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pendente",
            TransactionStatus::Approved => "aprovado",
            TransactionStatus::Declined => "recusado",
            TransactionStatus::Cancelled => "cancelado",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "beneficiario_id")]
    pub beneficiary_id: String,
    #[serde(rename = "conveniado_id")]
    pub merchant_id: String,
    #[serde(rename = "empresa_id")]
    pub company_id: String,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    /// How the payment was captured, e.g. `nfc`.
    #[serde(rename = "tipo_pagamento")]
    pub payment_type: String,
    pub status: TransactionStatus,
    /// Raw payload read from the card reader, plus the cancellation reason once cancelled.
    #[serde(rename = "dados_nfc", default)]
    pub nfc_data: Option<serde_json::Value>,
    #[serde(rename = "data_transacao")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "beneficiarios", default, skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<BeneficiarySummary>,
    #[serde(rename = "conveniados", default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<MerchantSummary>,
    #[serde(rename = "empresas", default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySummary>,
}

/// Beneficiary columns embedded in transaction listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BeneficiarySummary {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Merchant columns embedded in transaction listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MerchantSummary {
    #[serde(rename = "nome_fantasia", default)]
    pub trade_name: Option<String>,
    pub cnpj: String,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Company columns embedded in transaction listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompanySummary {
    #[serde(rename = "razao_social")]
    pub legal_name: String,
    pub cnpj: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewTransaction {
    #[serde(rename = "beneficiario_id")]
    pub beneficiary_id: String,
    #[serde(rename = "conveniado_id")]
    pub merchant_id: String,
    #[serde(rename = "empresa_id")]
    pub company_id: String,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "tipo_pagamento")]
    pub payment_type: String,
    pub status: TransactionStatus,
    #[serde(rename = "dados_nfc")]
    pub nfc_data: Option<serde_json::Value>,
}

/// Filters accepted when listing transactions. Dates are passed through as given
/// (`2024-01-31` or a full timestamp).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    #[serde(rename = "empresa_id", default)]
    pub company_id: Option<String>,
    #[serde(rename = "beneficiario_id", default)]
    pub beneficiary_id: Option<String>,
    #[serde(rename = "conveniado_id", default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(rename = "data_inicio", default)]
    pub from: Option<String>,
    #[serde(rename = "data_fim", default)]
    pub to: Option<String>,
}
