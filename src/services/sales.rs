//! Sales figures for merchants.

use crate::{
    client::DatabaseClient,
    services::limits::Window,
    store::transactions::Transaction,
    Error,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesStatistics {
    #[serde(rename = "total_vendas")]
    pub total: Decimal,
    #[serde(rename = "total_transacoes")]
    pub count: usize,
    /// Average sale, rounded to cents. Zero when there are no sales.
    #[serde(rename = "ticket_medio")]
    pub average: Decimal,
}

impl SalesStatistics {
    pub fn from_sales(sales: &[Transaction]) -> Self {
        let total: Decimal = sales.iter().map(|t| t.amount).sum();
        let count = sales.len();
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            (total / Decimal::from(count)).round_dp(2)
        };

        Self {
            total,
            count,
            average,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SalesReport {
    #[serde(rename = "vendas")]
    pub sales: Vec<Transaction>,
    #[serde(rename = "estatisticas")]
    pub statistics: SalesStatistics,
}

/// Approved sales of a merchant, optionally bounded by `from` and `to` (dates or timestamps).
#[tracing::instrument(name = "Merchant Sales", skip(db))]
pub async fn report(
    db: &DatabaseClient,
    merchant_id: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<SalesReport, Error> {
    let sales = db
        .transactions
        .approved_for_merchant(merchant_id, from, to)
        .await?;

    Ok(SalesReport {
        statistics: SalesStatistics::from_sales(&sales),
        sales,
    })
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodSales {
    #[serde(rename = "valor")]
    pub total: Decimal,
    #[serde(rename = "transacoes")]
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dashboard {
    #[serde(rename = "vendas_hoje")]
    pub today: PeriodSales,
    #[serde(rename = "vendas_semana")]
    pub last_7_days: PeriodSales,
    #[serde(rename = "vendas_mes")]
    pub last_30_days: PeriodSales,
}

impl Dashboard {
    /// Buckets sales made in the last 30 days by period. The periods overlap.
    pub fn summarize(sales: &[Transaction], now: DateTime<Utc>) -> Self {
        let period = |window: Window| {
            let start = window.start(now);
            sales
                .iter()
                .filter(|t| t.created_at >= start)
                .fold(PeriodSales::default(), |acc, t| PeriodSales {
                    total: acc.total + t.amount,
                    count: acc.count + 1,
                })
        };

        Self {
            today: period(Window::Daily),
            last_7_days: period(Window::Weekly),
            last_30_days: period(Window::Monthly),
        }
    }
}

#[tracing::instrument(name = "Merchant Dashboard", skip(db))]
pub async fn dashboard(db: &DatabaseClient, merchant_id: &str) -> Result<Dashboard, Error> {
    let now = Utc::now();
    let since = Window::Monthly
        .start(now)
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let sales = db
        .transactions
        .approved_for_merchant(merchant_id, Some(&since), None)
        .await?;

    Ok(Dashboard::summarize(&sales, now))
}
