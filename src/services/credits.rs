//! Loading funds onto a beneficiary's card.

use crate::{
    client::DatabaseClient,
    services::balances::{self, BalanceError, Overdraft},
    store::statements::{EntryKind, NewStatementEntry},
    Error,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

static DEFAULT_DESCRIPTION: &str = "Crédito de benefício";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreditRequest {
    #[serde(rename = "valor", default)]
    pub amount: Option<Decimal>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreditReceipt {
    #[serde(rename = "saldo_anterior")]
    pub balance_before: Decimal,
    #[serde(rename = "saldo_atual")]
    pub balance_after: Decimal,
    pub message: &'static str,
}

#[derive(thiserror::Error, Debug)]
pub enum CreditError {
    #[error("Amount is required")]
    MissingAmount,
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Beneficiary not found")]
    BeneficiaryNotFound,
    #[error("Balance kept changing while crediting")]
    BalanceContention,
    #[error(transparent)]
    Database(#[from] Error),
}

impl From<BalanceError> for CreditError {
    fn from(e: BalanceError) -> Self {
        match e {
            BalanceError::NotFound => CreditError::BeneficiaryNotFound,
            // Credits never take a balance below zero
            BalanceError::InsufficientFunds { .. } | BalanceError::Contention => {
                CreditError::BalanceContention
            }
            BalanceError::Database(e) => CreditError::Database(e),
        }
    }
}

/// Adds funds to a beneficiary and to the aggregate balance of its company.
#[tracing::instrument(name = "Credit Beneficiary", skip(db, request))]
pub async fn credit(
    db: &DatabaseClient,
    beneficiary_id: &str,
    company_id: &str,
    request: CreditRequest,
) -> Result<CreditReceipt, CreditError> {
    let amount = request.amount.ok_or(CreditError::MissingAmount)?;
    if amount <= Decimal::ZERO {
        return Err(CreditError::InvalidAmount);
    }

    let credit = balances::apply(&db.beneficiaries, beneficiary_id, amount, Overdraft::Allowed)
        .await?;

    if let Err(e) = balances::apply(&db.companies, company_id, amount, Overdraft::Allowed).await {
        tracing::error!(company_id, "Failed to credit company balance: {}", e);
    }

    let entry = NewStatementEntry {
        beneficiary_id: beneficiary_id.to_string(),
        company_id: company_id.to_string(),
        merchant_id: None,
        kind: EntryKind::Credit,
        amount,
        balance_before: credit.before,
        balance_after: credit.after,
        description: request
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
    };
    if let Err(e) = db.statements.create(&entry).await {
        tracing::error!(beneficiary_id, "Failed to write statement entry: {}", e);
    }

    Ok(CreditReceipt {
        balance_before: credit.before,
        balance_after: credit.after,
        message: "Crédito realizado com sucesso",
    })
}
