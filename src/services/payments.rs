//! Card payments and their cancellation.

use crate::{
    auth::{Claims, UserKind},
    client::DatabaseClient,
    services::{
        balances::{self, BalanceError, Overdraft},
        limits::{self, LimitExceeded, Window},
    },
    store::{
        statements::{EntryKind, NewStatementEntry},
        transactions::{NewTransaction, Transaction, TransactionStatus},
        AccountStatus,
    },
    Error,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How long after a payment it can still be cancelled.
pub const CANCELLATION_WINDOW_HOURS: i64 = 24;

/// Payment as submitted by a card reader or a client application.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PaymentRequest {
    #[serde(rename = "beneficiario_id", default)]
    pub beneficiary_id: Option<String>,
    /// Defaults to the caller when a merchant submits the payment.
    #[serde(rename = "conveniado_id", default)]
    pub merchant_id: Option<String>,
    #[serde(rename = "valor", default)]
    pub amount: Option<Decimal>,
    #[serde(rename = "tipo_pagamento", default)]
    pub payment_type: Option<String>,
    #[serde(rename = "dados_nfc", default)]
    pub nfc_data: Option<Value>,
}

/// A payment request with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub beneficiary_id: String,
    pub merchant_id: String,
    pub amount: Decimal,
    pub payment_type: String,
    pub nfc_data: Option<Value>,
}

impl PaymentRequest {
    /// Fills the payee in for merchants and checks that nothing is missing.
    pub fn validate(self, caller: &Claims) -> Result<Payment, PaymentError> {
        let merchant_id = match self.merchant_id {
            None if caller.kind == UserKind::Merchant => Some(caller.user_id.clone()),
            other => other,
        };

        let (beneficiary_id, merchant_id, amount, payment_type) =
            match (self.beneficiary_id, merchant_id, self.amount, self.payment_type) {
                (Some(b), Some(m), Some(a), Some(p))
                    if !b.is_empty() && !m.is_empty() && !p.is_empty() =>
                {
                    (b, m, a, p)
                }
                _ => return Err(PaymentError::MissingFields),
            };

        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount);
        }

        Ok(Payment {
            beneficiary_id,
            merchant_id,
            amount,
            payment_type,
            nfc_data: self.nfc_data,
        })
    }
}

impl Payment {
    /// Administrators may charge anyone; merchants only charge to themselves and beneficiaries
    /// only pay from their own balance.
    fn may_be_submitted_by(&self, caller: &Claims) -> bool {
        match caller.kind {
            UserKind::Admin => true,
            UserKind::Merchant => caller.user_id == self.merchant_id,
            UserKind::Beneficiary => caller.user_id == self.beneficiary_id,
            UserKind::Company => false,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    #[serde(rename = "transacao_id")]
    pub transaction_id: String,
    pub status: TransactionStatus,
    #[serde(rename = "mensagem")]
    pub message: &'static str,
    #[serde(rename = "saldo_restante")]
    pub remaining_balance: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum PaymentError {
    #[error("Beneficiary, merchant, amount and payment type are required")]
    MissingFields,
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Caller may not submit this payment")]
    Forbidden,
    #[error("Beneficiary not found")]
    BeneficiaryNotFound,
    #[error("Beneficiary is not active")]
    BeneficiaryInactive,
    #[error("Merchant not found")]
    MerchantNotFound,
    #[error("Merchant is not active")]
    MerchantInactive,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("{0}")]
    LimitExceeded(LimitExceeded),
    #[error("Balance kept changing while debiting")]
    BalanceContention,
    #[error(transparent)]
    Database(#[from] Error),
}

impl From<LimitExceeded> for PaymentError {
    fn from(e: LimitExceeded) -> Self {
        PaymentError::LimitExceeded(e)
    }
}

impl From<BalanceError> for PaymentError {
    fn from(e: BalanceError) -> Self {
        match e {
            BalanceError::NotFound => PaymentError::BeneficiaryNotFound,
            BalanceError::InsufficientFunds { .. } => PaymentError::InsufficientBalance,
            BalanceError::Contention => PaymentError::BalanceContention,
            BalanceError::Database(e) => PaymentError::Database(e),
        }
    }
}

/// Charges a beneficiary's balance in favour of a merchant.
///
/// The beneficiary is debited before the transaction is recorded; if recording fails the debit
/// is reverted. Once the transaction exists the payment is settled, and failures to update the
/// company balance or the statement are only logged.
#[tracing::instrument(name = "Process Payment", skip(db, caller, request))]
pub async fn process(
    db: &DatabaseClient,
    caller: &Claims,
    request: PaymentRequest,
) -> Result<PaymentReceipt, PaymentError> {
    let payment = request.validate(caller)?;
    if !payment.may_be_submitted_by(caller) {
        return Err(PaymentError::Forbidden);
    }

    let beneficiary = db
        .beneficiaries
        .get_by_id(&payment.beneficiary_id)
        .await?
        .ok_or(PaymentError::BeneficiaryNotFound)?;
    if beneficiary.status != AccountStatus::Active {
        return Err(PaymentError::BeneficiaryInactive);
    }

    let merchant = db
        .merchants
        .get_by_id(&payment.merchant_id)
        .await?
        .ok_or(PaymentError::MerchantNotFound)?;
    if merchant.status != AccountStatus::Active {
        return Err(PaymentError::MerchantInactive);
    }

    if beneficiary.balance < payment.amount {
        return Err(PaymentError::InsufficientBalance);
    }

    let now = Utc::now();
    let history: Vec<_> = db
        .transactions
        .approved_for_beneficiary_since(&beneficiary.id, Window::Monthly.start(now))
        .await?
        .into_iter()
        .map(|t| (t.created_at, t.amount))
        .collect();
    limits::check(&beneficiary.limits, &history, payment.amount, now)?;

    let debit = balances::apply(
        &db.beneficiaries,
        &beneficiary.id,
        -payment.amount,
        Overdraft::Forbidden,
    )
    .await?;

    let new_transaction = NewTransaction {
        beneficiary_id: beneficiary.id.clone(),
        merchant_id: merchant.id.clone(),
        company_id: beneficiary.company_id.clone(),
        amount: payment.amount,
        payment_type: payment.payment_type,
        status: TransactionStatus::Approved,
        nfc_data: payment.nfc_data,
    };
    let transaction = match db.transactions.create(&new_transaction).await {
        Ok(transaction) => transaction,
        Err(e) => {
            tracing::error!("Failed to record transaction, reverting debit: {}", e);
            if let Err(revert) = balances::apply(
                &db.beneficiaries,
                &beneficiary.id,
                payment.amount,
                Overdraft::Allowed,
            )
            .await
            {
                tracing::error!(
                    beneficiary_id = %beneficiary.id,
                    amount = %payment.amount,
                    "Could not revert debit, balance needs manual correction: {}",
                    revert
                );
            }
            return Err(e.into());
        }
    };

    if let Err(e) = balances::apply(
        &db.companies,
        &beneficiary.company_id,
        -payment.amount,
        Overdraft::Allowed,
    )
    .await
    {
        tracing::error!(
            company_id = %beneficiary.company_id,
            transaction_id = %transaction.id,
            "Failed to debit company balance: {}",
            e
        );
    }

    let entry = NewStatementEntry {
        beneficiary_id: beneficiary.id.clone(),
        company_id: beneficiary.company_id.clone(),
        merchant_id: Some(merchant.id.clone()),
        kind: EntryKind::Payment,
        amount: payment.amount,
        balance_before: debit.before,
        balance_after: debit.after,
        description: format!("Pagamento em {}", merchant.display_name()),
    };
    if let Err(e) = db.statements.create(&entry).await {
        tracing::error!(
            transaction_id = %transaction.id,
            "Failed to write statement entry: {}",
            e
        );
    }

    tracing::info!(transaction_id = %transaction.id, "Payment approved");

    Ok(PaymentReceipt {
        transaction_id: transaction.id,
        status: transaction.status,
        message: "Pagamento realizado com sucesso",
        remaining_balance: debit.after,
        timestamp: transaction.created_at,
    })
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CancellationRequest {
    #[serde(rename = "motivo", default)]
    pub reason: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CancellationReceipt {
    #[serde(rename = "transacao")]
    pub transaction: Transaction,
    #[serde(rename = "mensagem")]
    pub message: &'static str,
    #[serde(rename = "saldo_restaurado")]
    pub restored: Decimal,
}

#[derive(thiserror::Error, Debug)]
pub enum CancellationError {
    #[error("Transaction not found")]
    NotFound,
    #[error("Caller may not cancel this transaction")]
    Forbidden,
    #[error("Only approved transactions can be cancelled")]
    NotCancellable,
    #[error("Cancellation window of {} hours has passed", CANCELLATION_WINDOW_HOURS)]
    Expired,
    #[error("Transaction was cancelled but the beneficiary could not be refunded: {0}")]
    Refund(#[source] BalanceError),
    #[error(transparent)]
    Database(#[from] Error),
}

/// Cancels an approved payment made less than [`CANCELLATION_WINDOW_HOURS`] ago and gives the
/// money back to the beneficiary and the company.
#[tracing::instrument(name = "Cancel Payment", skip(db, caller, request))]
pub async fn cancel(
    db: &DatabaseClient,
    caller: &Claims,
    id: &str,
    request: CancellationRequest,
) -> Result<CancellationReceipt, CancellationError> {
    let transaction = db
        .transactions
        .get_by_id(id)
        .await?
        .ok_or(CancellationError::NotFound)?;

    if !(caller.is_admin() || caller.is(UserKind::Merchant, &transaction.merchant_id)) {
        return Err(CancellationError::Forbidden);
    }
    check_cancellable(&transaction, Utc::now())?;

    let nfc_data = with_cancellation_reason(transaction.nfc_data.clone(), request.reason);
    let cancelled = db
        .transactions
        .cancel_if_approved(id, nfc_data)
        .await?
        // Someone else cancelled it in the meantime
        .ok_or(CancellationError::NotCancellable)?;

    let refund = balances::apply(
        &db.beneficiaries,
        &transaction.beneficiary_id,
        transaction.amount,
        Overdraft::Allowed,
    )
    .await
    .map_err(|e| {
        tracing::error!(
            transaction_id = %transaction.id,
            beneficiary_id = %transaction.beneficiary_id,
            amount = %transaction.amount,
            "Refund of cancelled transaction failed, balance needs manual correction: {}",
            e
        );
        CancellationError::Refund(e)
    })?;

    if let Err(e) = balances::apply(
        &db.companies,
        &transaction.company_id,
        transaction.amount,
        Overdraft::Allowed,
    )
    .await
    {
        tracing::error!(
            company_id = %transaction.company_id,
            transaction_id = %transaction.id,
            "Failed to restore company balance: {}",
            e
        );
    }

    let entry = NewStatementEntry {
        beneficiary_id: transaction.beneficiary_id.clone(),
        company_id: transaction.company_id.clone(),
        merchant_id: Some(transaction.merchant_id.clone()),
        kind: EntryKind::Reversal,
        amount: transaction.amount,
        balance_before: refund.before,
        balance_after: refund.after,
        description: format!("Estorno da transação {}", transaction.id),
    };
    if let Err(e) = db.statements.create(&entry).await {
        tracing::error!(
            transaction_id = %transaction.id,
            "Failed to write statement entry: {}",
            e
        );
    }

    tracing::info!(transaction_id = %transaction.id, "Payment cancelled");

    Ok(CancellationReceipt {
        transaction: cancelled,
        message: "Transação cancelada com sucesso",
        restored: transaction.amount,
    })
}

fn check_cancellable(transaction: &Transaction, now: DateTime<Utc>) -> Result<(), CancellationError> {
    if transaction.status != TransactionStatus::Approved {
        return Err(CancellationError::NotCancellable);
    }

    if now - transaction.created_at > Duration::hours(CANCELLATION_WINDOW_HOURS) {
        return Err(CancellationError::Expired);
    }

    Ok(())
}

/// Adds `motivo_cancelamento` to the card payload. Payloads that are not JSON objects are kept
/// under `dados_originais`.
fn with_cancellation_reason(nfc_data: Option<Value>, reason: Option<String>) -> Value {
    let mut object = match nfc_data {
        Some(Value::Object(map)) => map,
        None | Some(Value::Null) => Map::new(),
        Some(other) => {
            let mut map = Map::new();
            map.insert("dados_originais".to_string(), other);
            map
        }
    };

    if let Some(reason) = reason {
        object.insert("motivo_cancelamento".to_string(), Value::String(reason));
    }

    Value::Object(object)
}
