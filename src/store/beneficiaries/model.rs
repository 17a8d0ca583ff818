use crate::store::AccountStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Beneficiary {
    pub id: String,
    #[serde(rename = "empresa_id")]
    pub company_id: String,
    pub cpf: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "saldo_atual", default)]
    pub balance: Decimal,
    #[serde(flatten)]
    pub limits: SpendingLimits,
    pub status: AccountStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
}

/// Maximum amount a beneficiary may spend per window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendingLimits {
    #[serde(rename = "limite_diario")]
    pub daily: Decimal,
    #[serde(rename = "limite_semanal")]
    pub weekly: Decimal,
    #[serde(rename = "limite_mensal")]
    pub monthly: Decimal,
}

impl Default for SpendingLimits {
    fn default() -> Self {
        Self {
            daily: Decimal::new(200_00, 2),
            weekly: Decimal::new(1000_00, 2),
            monthly: Decimal::new(3000_00, 2),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewBeneficiary {
    #[serde(rename = "empresa_id")]
    pub company_id: String,
    pub cpf: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: Option<String>,
    #[serde(flatten)]
    pub limits: SpendingLimits,
    #[serde(rename = "saldo_atual")]
    pub balance: Decimal,
    pub status: AccountStatus,
    pub password_hash: String,
}

/// Partial update of a beneficiary. Fields left as `None` are not touched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BeneficiaryUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "limite_diario", skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<Decimal>,
    #[serde(rename = "limite_semanal", skip_serializing_if = "Option::is_none")]
    pub weekly_limit: Option<Decimal>,
    #[serde(rename = "limite_mensal", skip_serializing_if = "Option::is_none")]
    pub monthly_limit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
