//! Balance moves with optimistic concurrency.
//!
//! A move reads the current balance, computes the new one and writes it only if the stored
//! value is still the one read. When another request got there first the move starts over,
//! up to [`MAX_ATTEMPTS`] times.

use crate::{
    store::{beneficiaries::BeneficiariesApi, companies::CompaniesApi},
    Error,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

pub const MAX_ATTEMPTS: usize = 5;

/// A ledger whose rows carry a single balance column.
#[async_trait]
pub trait BalanceLedger {
    /// Current balance of `id`, or `None` if there is no such row.
    async fn balance(&self, id: &str) -> Result<Option<Decimal>, Error>;

    /// Writes `new` if the balance still equals `expected`.
    async fn compare_and_set(&self, id: &str, expected: Decimal, new: Decimal)
        -> Result<bool, Error>;
}

#[async_trait]
impl BalanceLedger for BeneficiariesApi {
    async fn balance(&self, id: &str) -> Result<Option<Decimal>, Error> {
        Ok(self.get_by_id(id).await?.map(|b| b.balance))
    }

    async fn compare_and_set(
        &self,
        id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<bool, Error> {
        self.compare_and_set_balance(id, expected, new).await
    }
}

#[async_trait]
impl BalanceLedger for CompaniesApi {
    async fn balance(&self, id: &str) -> Result<Option<Decimal>, Error> {
        Ok(self.get_by_id(id).await?.map(|c| c.total_balance))
    }

    async fn compare_and_set(
        &self,
        id: &str,
        expected: Decimal,
        new: Decimal,
    ) -> Result<bool, Error> {
        self.compare_and_set_balance(id, expected, new).await
    }
}

/// Balance before and after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceMove {
    pub before: Decimal,
    pub after: Decimal,
}

#[derive(thiserror::Error, Debug)]
pub enum BalanceError {
    #[error("Account not found")]
    NotFound,
    #[error("Insufficient funds: {available} available")]
    InsufficientFunds { available: Decimal },
    #[error("Balance kept changing after {} attempts", MAX_ATTEMPTS)]
    Contention,
    #[error(transparent)]
    Database(#[from] Error),
}

/// Whether a move may leave the balance below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overdraft {
    Allowed,
    Forbidden,
}

/// Adds `delta` (negative for debits) to the balance of `id`.
#[tracing::instrument(name = "Move balance", skip(ledger))]
pub async fn apply<L>(
    ledger: &L,
    id: &str,
    delta: Decimal,
    overdraft: Overdraft,
) -> Result<BalanceMove, BalanceError>
where
    L: BalanceLedger + Sync + ?Sized,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let before = ledger.balance(id).await?.ok_or(BalanceError::NotFound)?;
        let after = before + delta;

        if overdraft == Overdraft::Forbidden && after < Decimal::ZERO {
            return Err(BalanceError::InsufficientFunds { available: before });
        }

        if ledger.compare_and_set(id, before, after).await? {
            return Ok(BalanceMove { before, after });
        }

        tracing::debug!(attempt, "Balance changed concurrently, retrying");
    }

    Err(BalanceError::Contention)
}
