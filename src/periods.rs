use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::cadence::period_advance;
use crate::decimal::Money;
use crate::records::RentPeriod;
use crate::types::{LeaseId, RentCadence, TenantId};

/// an expected payment obligation, before it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPeriod {
    /// position in the lease, 0 at the start date
    pub index: u32,
    pub due_date: NaiveDate,
    pub rent_amount: Money,
    pub cadence: RentCadence,
}

impl GeneratedPeriod {
    pub fn into_rent_period(self, lease_id: LeaseId, tenant_id: TenantId) -> RentPeriod {
        RentPeriod::new(lease_id, tenant_id, self.due_date, self.rent_amount, self.cadence)
    }
}

/// where period generation stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodBounds {
    /// stop after this many periods
    pub count: Option<u32>,
    /// stop once the next due date would be after this date
    pub until: Option<NaiveDate>,
}

impl PeriodBounds {
    pub fn count(count: u32) -> Self {
        Self { count: Some(count), until: None }
    }

    pub fn until(until: NaiveDate) -> Self {
        Self { count: None, until: Some(until) }
    }
}

/// generates the due-date sequence for a lease
pub struct PeriodGenerator {
    cadence: RentCadence,
    rent_amount: Money,
}

impl PeriodGenerator {
    pub fn new(cadence: RentCadence, rent_amount: Money) -> Self {
        Self { cadence, rent_amount }
    }

    /// periods from `start`, bounded by `bounds`; a missing `until` means today
    pub fn generate(
        &self,
        start: NaiveDate,
        bounds: PeriodBounds,
        time_provider: &SafeTimeProvider,
    ) -> Vec<GeneratedPeriod> {
        let until = bounds
            .until
            .unwrap_or_else(|| time_provider.now().date_naive());
        self.generate_until(start, until, bounds.count)
    }

    /// periods from `start` with due dates on or before `until`
    pub fn generate_until(
        &self,
        start: NaiveDate,
        until: NaiveDate,
        count: Option<u32>,
    ) -> Vec<GeneratedPeriod> {
        self.iter_from(start)
            .take_while(|p| p.due_date <= until)
            .take(count.map(|c| c as usize).unwrap_or(usize::MAX))
            .collect()
    }

    /// exactly `count` periods from `start`, ignoring any end date
    pub fn generate_count(&self, start: NaiveDate, count: u32) -> Vec<GeneratedPeriod> {
        self.iter_from(start).take(count as usize).collect()
    }

    /// unbounded lazy sequence; each due date is computed from `start`
    pub fn iter_from(&self, start: NaiveDate) -> impl Iterator<Item = GeneratedPeriod> + '_ {
        (0u32..).map_while(move |index| {
            period_advance(start, self.cadence, index).map(|due_date| GeneratedPeriod {
                index,
                due_date,
                rent_amount: self.rent_amount,
                cadence: self.cadence,
            })
        })
    }
}

/// shorthand for `PeriodGenerator::new(..).generate_until(..)`
pub fn generate_periods(
    lease_start_date: NaiveDate,
    cadence: RentCadence,
    rent_amount: Money,
    bounds: PeriodBounds,
    today: NaiveDate,
) -> Vec<GeneratedPeriod> {
    PeriodGenerator::new(cadence, rent_amount).generate_until(
        lease_start_date,
        bounds.until.unwrap_or(today),
        bounds.count,
    )
}
