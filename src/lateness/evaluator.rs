use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{LateFeeSchedule, RentConfig};
use crate::decimal::Money;
use crate::periods::GeneratedPeriod;
use crate::records::Payment;
use crate::types::RentCadence;

/// lateness of one period as of a given day
///
/// Derived on every query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodResult {
    pub expected_date: NaiveDate,
    pub rent_amount: Money,
    pub cadence: RentCadence,
    pub is_late: bool,
    /// display only; never feeds the fee
    pub days_late: u32,
    pub late_fees: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    /// today is past the end of the grace window
    pub grace_elapsed: bool,
}

/// payment window around a due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentWindow {
    pub opens: NaiveDate,
    pub closes: NaiveDate,
}

impl PaymentWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.opens && date <= self.closes
    }
}

/// decides whether a period is late and what it owes
#[derive(Debug, Clone)]
pub struct LatenessEvaluator {
    grace_period_days: u32,
    early_payment_tolerance_days: u32,
    late_fees: LateFeeSchedule,
}

impl LatenessEvaluator {
    pub fn new(grace_period_days: u32) -> Self {
        let defaults = RentConfig::default();
        Self {
            grace_period_days,
            early_payment_tolerance_days: defaults.early_payment_tolerance_days,
            late_fees: defaults.late_fees,
        }
    }

    pub fn from_config(config: &RentConfig) -> Self {
        Self {
            grace_period_days: config.grace_period_days,
            early_payment_tolerance_days: config.early_payment_tolerance_days,
            late_fees: config.late_fees,
        }
    }

    pub fn grace_period_days(&self) -> u32 {
        self.grace_period_days
    }

    /// last day a payment for `due_date` is on time
    pub fn grace_end(&self, due_date: NaiveDate) -> NaiveDate {
        due_date + Duration::days(self.grace_period_days as i64)
    }

    /// `[due - early tolerance, due + grace]`
    ///
    /// Windows of consecutive weekly periods overlap on `due + grace`, which
    /// is also the next period's `due - tolerance`. A payment dated that day
    /// counts in full toward both periods.
    pub fn payment_window(&self, due_date: NaiveDate) -> PaymentWindow {
        PaymentWindow {
            opens: due_date - Duration::days(self.early_payment_tolerance_days as i64),
            closes: self.grace_end(due_date),
        }
    }

    /// evaluate one period against the payments that might belong to it
    ///
    /// Only unreversed rent payments dated inside the payment window count. A
    /// period is late when no such payment exists and the grace window has
    /// closed; a payment landing after the window neither counts toward the
    /// period nor clears its lateness.
    pub fn evaluate(
        &self,
        period: &GeneratedPeriod,
        payments: &[Payment],
        today: NaiveDate,
    ) -> PayPeriodResult {
        let window = self.payment_window(period.due_date);
        let matched: Vec<&Payment> = payments
            .iter()
            .filter(|p| p.is_rent() && !p.reversed && window.contains(p.payment_date))
            .collect();

        let total_paid: Money = matched.iter().map(|p| p.amount).sum();
        let outstanding = period.rent_amount.saturating_sub(total_paid);

        let grace_end = window.closes;
        let grace_elapsed = today > grace_end;
        let is_late = matched.is_empty() && grace_elapsed;

        let days_late = if is_late {
            (today - grace_end).num_days().max(0) as u32
        } else {
            0
        };

        let late_fees = if is_late && outstanding.is_positive() {
            self.late_fees.fee_for(period.cadence)
        } else {
            Money::ZERO
        };

        PayPeriodResult {
            expected_date: period.due_date,
            rent_amount: period.rent_amount,
            cadence: period.cadence,
            is_late,
            days_late,
            late_fees,
            total_paid,
            outstanding,
            grace_elapsed,
        }
    }
}

/// evaluate with the default fee schedule and early-payment tolerance
pub fn evaluate_period(
    period: &GeneratedPeriod,
    payments: &[Payment],
    grace_days: u32,
    today: NaiveDate,
) -> PayPeriodResult {
    LatenessEvaluator::new(grace_days).evaluate(period, payments, today)
}
