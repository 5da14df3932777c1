use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{RentError, Result};
use crate::ledger::TenantLedger;
use crate::records::Lease;
use crate::types::{LeaseId, LeaseStatus, PropertyId, RentCadence, TenantId};

/// one active lease on the rent roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRollEntry {
    pub lease_id: LeaseId,
    pub tenant_id: TenantId,
    pub property_id: PropertyId,
    pub rent_cadence: RentCadence,
    pub rent_per_period: Money,
    pub monthly_equivalent: Money,
}

/// expected monthly income across a set of leases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RentRoll {
    pub entries: Vec<RentRollEntry>,
    pub total_monthly_income: Money,
    /// leases on record that are not active
    pub inactive_leases: u32,
}

impl RentRoll {
    /// entries for every active lease with positive rent
    pub fn from_leases<'a, I>(leases: I) -> Self
    where
        I: IntoIterator<Item = &'a Lease>,
    {
        let mut roll = RentRoll::default();
        for lease in leases {
            if lease.status != LeaseStatus::Active || !lease.rent.is_positive() {
                roll.inactive_leases += 1;
                continue;
            }

            // lease rent is stored monthly
            let per_period = lease.rent_per_period();
            let monthly = lease.rent;
            roll.total_monthly_income += monthly;
            roll.entries.push(RentRollEntry {
                lease_id: lease.id,
                tenant_id: lease.tenant_id,
                property_id: lease.property_id,
                rent_cadence: lease.rent_cadence,
                rent_per_period: per_period,
                monthly_equivalent: monthly,
            });
        }
        roll
    }

    /// monthly income grouped by property
    pub fn by_property(&self) -> HashMap<PropertyId, Money> {
        let mut totals: HashMap<PropertyId, Money> = HashMap::new();
        for entry in &self.entries {
            *totals.entry(entry.property_id).or_default() += entry.monthly_equivalent;
        }
        totals
    }
}

/// money spent on a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub property_id: PropertyId,
    pub amount: Money,
    pub expense_date: NaiveDate,
    #[serde(default)]
    pub category: String,
}

impl Expense {
    pub fn new(property_id: PropertyId, amount: Money, expense_date: NaiveDate, category: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            amount,
            expense_date,
            category: category.to_string(),
        }
    }
}

/// inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(RentError::InvalidDate {
                message: format!("report range starts {} after it ends {}", from, to),
            });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// cash in and out for one property over a date range
///
/// Income is counted from allocations, by the date of the payment that
/// funded them, so reversed payments drop out and unallocated surplus is
/// not income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitReport {
    pub property_id: PropertyId,
    pub range: ReportRange,
    pub rent_collected: Money,
    pub late_fees_collected: Money,
    pub expenses: Money,
    pub net_profit: Money,
}

impl ProfitReport {
    pub fn new(property_id: PropertyId, range: ReportRange) -> Self {
        Self {
            property_id,
            range,
            rent_collected: Money::ZERO,
            late_fees_collected: Money::ZERO,
            expenses: Money::ZERO,
            net_profit: Money::ZERO,
        }
    }

    /// add income from one ledger; ledgers for other properties are ignored
    pub fn add_ledger(&mut self, ledger: &TenantLedger) {
        if ledger.lease().property_id != self.property_id {
            return;
        }

        let in_range: HashMap<_, _> = ledger
            .payments()
            .iter()
            .filter(|p| self.range.contains(p.payment_date))
            .map(|p| (p.id, p.payment_date))
            .collect();

        for allocation in ledger.allocations() {
            if in_range.contains_key(&allocation.payment_id) {
                self.rent_collected += allocation.amount_to_rent;
                self.late_fees_collected += allocation.amount_to_late_fee;
            }
        }
        self.recompute();
    }

    pub fn add_expenses(&mut self, expenses: &[Expense]) {
        for expense in expenses {
            if expense.property_id == self.property_id && self.range.contains(expense.expense_date) {
                self.expenses += expense.amount;
            }
        }
        self.recompute();
    }

    pub fn income(&self) -> Money {
        self.rent_collected + self.late_fees_collected
    }

    fn recompute(&mut self) {
        self.net_profit = self.income() - self.expenses;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RentConfig;
    use crate::records::Payment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rent_roll_uses_stated_monthly_rent() {
        let property = Uuid::new_v4();
        let monthly = Lease::new(Uuid::new_v4(), property, Money::from_major(1200), RentCadence::Monthly, date(2024, 1, 1));
        let weekly = Lease::new(Uuid::new_v4(), property, Money::from_major(1200), RentCadence::Weekly, date(2024, 1, 1));
        let mut vacant = Lease::new(Uuid::new_v4(), property, Money::from_major(900), RentCadence::Monthly, date(2024, 1, 1));
        vacant.status = LeaseStatus::Vacant;

        let roll = RentRoll::from_leases(&[monthly, weekly, vacant]);

        assert_eq!(roll.entries.len(), 2);
        assert_eq!(roll.inactive_leases, 1);
        assert_eq!(roll.entries[1].rent_per_period, Money::from_str_exact("277.14").unwrap());
        // not 277.14 * 4.33
        assert_eq!(roll.entries[1].monthly_equivalent, Money::from_major(1200));
        assert_eq!(roll.total_monthly_income, Money::from_major(2400));
        assert_eq!(roll.by_property()[&property], roll.total_monthly_income);
    }

    #[test]
    fn test_report_range_rejects_backwards() {
        assert!(ReportRange::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
        assert!(ReportRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_profit_report() {
        let property = Uuid::new_v4();
        let lease = Lease::new(Uuid::new_v4(), property, Money::from_major(1000), RentCadence::Monthly, date(2024, 1, 1));
        let tenant = lease.tenant_id;
        let mut ledger = TenantLedger::new(lease, RentConfig::default()).unwrap();
        ledger.sync_periods(date(2024, 3, 1));
        ledger.assess_late_fees(date(2024, 1, 20));

        ledger.record_payment(Payment::rent(tenant, Money::from_major(1045), date(2024, 1, 20))).unwrap();
        ledger.record_payment(Payment::rent(tenant, Money::from_major(1000), date(2024, 2, 2))).unwrap();
        ledger.record_payment(Payment::rent(tenant, Money::from_major(1000), date(2024, 3, 2))).unwrap();

        let expenses = vec![
            Expense::new(property, Money::from_major(300), date(2024, 1, 15), "repairs"),
            Expense::new(property, Money::from_major(80), date(2024, 3, 5), "cleaning"),
            Expense::new(Uuid::new_v4(), Money::from_major(999), date(2024, 1, 15), "elsewhere"),
        ];

        let range = ReportRange::new(date(2024, 1, 1), date(2024, 2, 29)).unwrap();
        let mut report = ProfitReport::new(property, range);
        report.add_ledger(&ledger);
        report.add_expenses(&expenses);

        assert_eq!(report.rent_collected, Money::from_major(2000));
        assert_eq!(report.late_fees_collected, Money::from_major(45));
        assert_eq!(report.expenses, Money::from_major(300));
        assert_eq!(report.net_profit, Money::from_major(1745));
    }
}
