//! Daily, weekly and monthly spending limits.

use crate::store::beneficiaries::SpendingLimits;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Since midnight UTC.
    Daily,
    /// The last 7 days.
    Weekly,
    /// The last 30 days.
    Monthly,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Daily, Window::Weekly, Window::Monthly];

    /// Earliest instant counted in this window.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Window::Daily => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map_or(now, |midnight| Utc.from_utc_datetime(&midnight)),
            Window::Weekly => now - Duration::days(7),
            Window::Monthly => now - Duration::days(30),
        }
    }

    fn limit(&self, limits: &SpendingLimits) -> Decimal {
        match self {
            Window::Daily => limits.daily,
            Window::Weekly => limits.weekly,
            Window::Monthly => limits.monthly,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Window::Daily => "diário",
            Window::Weekly => "semanal",
            Window::Monthly => "mensal",
        }
    }
}

/// A payment that would take the spending of a window over its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitExceeded {
    pub window: Window,
    pub limit: Decimal,
    /// Amount already spent in the window, without the new payment.
    pub spent: Decimal,
}

impl fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "O valor excede o limite {} de R$ {:.2}",
            self.window.label(),
            self.limit
        )
    }
}

/// Checks `amount` against every window, given the approved payments of the last 30 days
/// as `(time, amount)` pairs.
pub fn check(
    limits: &SpendingLimits,
    history: &[(DateTime<Utc>, Decimal)],
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<(), LimitExceeded> {
    for window in Window::ALL {
        let start = window.start(now);
        let limit = window.limit(limits);
        let spent: Decimal = history
            .iter()
            .filter(|(at, _)| *at >= start)
            .map(|(_, value)| *value)
            .sum();

        if spent + amount > limit {
            return Err(LimitExceeded {
                window,
                limit,
                spent,
            });
        }
    }

    Ok(())
}
