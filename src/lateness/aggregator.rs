use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RentConfig;
use crate::decimal::Money;
use crate::periods::{GeneratedPeriod, PeriodGenerator};
use crate::records::{Lease, Payment};

use super::evaluator::{LatenessEvaluator, PayPeriodResult};

/// late-payment totals for one tenant's lease
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LatePaymentSummary {
    pub total_late_fees: Money,
    /// unpaid rent on periods whose grace window has closed
    pub total_outstanding: Money,
    pub total_due: Money,
    pub late_periods: u32,
    pub per_period_results: Vec<PayPeriodResult>,
}

impl LatePaymentSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_late_periods(&self) -> bool {
        self.late_periods > 0
    }
}

/// rolls per-period lateness up into a tenant summary
pub struct LatePaymentAggregator {
    evaluator: LatenessEvaluator,
    lookback_periods: u32,
    max_period_scan: u32,
}

impl LatePaymentAggregator {
    pub fn new(config: &RentConfig) -> Self {
        Self {
            evaluator: LatenessEvaluator::from_config(config),
            lookback_periods: config.lookback_periods,
            max_period_scan: config.max_period_scan,
        }
    }

    pub fn with_lookback(mut self, lookback_periods: u32) -> Self {
        self.lookback_periods = lookback_periods;
        self
    }

    /// summarize lateness over the last `lookback_periods` due periods
    ///
    /// No lease, an inactive lease, a missing start date or non-positive rent
    /// all mean nothing is owed and yield an empty summary. So does hitting
    /// the scan cap while walking from the lease start.
    pub fn aggregate(
        &self,
        lease: Option<&Lease>,
        payments: &[Payment],
        today: NaiveDate,
    ) -> LatePaymentSummary {
        let Some(lease) = lease else {
            return LatePaymentSummary::empty();
        };
        let Some(start) = lease.billable_start() else {
            debug!(lease_id = %lease.id, "lease not billable, nothing owed");
            return LatePaymentSummary::empty();
        };

        let Some(periods) = self.lookback_window(lease, start, today) else {
            warn!(
                lease_id = %lease.id,
                start = %start,
                cap = self.max_period_scan,
                "period scan cap reached, returning empty summary"
            );
            return LatePaymentSummary::empty();
        };

        let mut summary = LatePaymentSummary::empty();
        for period in &periods {
            let result = self.evaluator.evaluate(period, payments, today);

            summary.total_late_fees += result.late_fees;
            if result.grace_elapsed {
                summary.total_outstanding += result.outstanding;
            }
            if result.is_late {
                summary.late_periods += 1;
            }
            summary.per_period_results.push(result);
        }
        summary.total_due = summary.total_late_fees + summary.total_outstanding;

        debug!(
            lease_id = %lease.id,
            periods = periods.len(),
            late_periods = summary.late_periods,
            total_due = %summary.total_due,
            "late payment summary computed"
        );

        summary
    }

    /// last `lookback_periods` periods due on or before today
    ///
    /// `None` when the walk from the start would exceed the scan cap.
    fn lookback_window(
        &self,
        lease: &Lease,
        start: NaiveDate,
        today: NaiveDate,
    ) -> Option<Vec<GeneratedPeriod>> {
        let horizon = lease.billing_horizon(today);
        let generator = PeriodGenerator::new(lease.rent_cadence, lease.rent_per_period());

        let cap = self.max_period_scan as usize;
        let mut due: Vec<GeneratedPeriod> = generator
            .iter_from(start)
            .take(cap + 1)
            .take_while(|p| p.due_date <= horizon)
            .collect();

        if due.len() > cap {
            return None;
        }

        let keep = self.lookback_periods as usize;
        if due.len() > keep {
            due.drain(..due.len() - keep);
        }
        Some(due)
    }
}

/// summarize with the default configuration and a custom lookback
pub fn aggregate_late_payments(
    lease: Option<&Lease>,
    payments: &[Payment],
    lookback_periods: u32,
    today: NaiveDate,
) -> LatePaymentSummary {
    LatePaymentAggregator::new(&RentConfig::default())
        .with_lookback(lookback_periods)
        .aggregate(lease, payments, today)
}
