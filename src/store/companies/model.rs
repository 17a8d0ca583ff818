use crate::store::AccountStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Company {
    pub id: String,
    pub cnpj: String,
    #[serde(rename = "razao_social")]
    pub legal_name: String,
    #[serde(rename = "nome_fantasia", default)]
    pub trade_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<serde_json::Value>,
    /// Sum of the funds the company has loaded onto its beneficiaries' cards.
    #[serde(rename = "saldo_total", default)]
    pub total_balance: Decimal,
    pub status: AccountStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub cnpj: String,
    #[serde(rename = "razao_social")]
    pub legal_name: String,
    #[serde(rename = "nome_fantasia")]
    pub trade_name: Option<String>,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<serde_json::Value>,
    #[serde(rename = "saldo_total")]
    pub total_balance: Decimal,
    pub status: AccountStatus,
    pub password_hash: String,
}

/// Partial update of a company. Fields left as `None` are not touched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CompanyUpdate {
    #[serde(rename = "razao_social", skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(rename = "nome_fantasia", skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
