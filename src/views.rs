/// serializable views for dashboards and tenant notices
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::lateness::LatePaymentSummary;
use crate::ledger::TenantLedger;
use crate::payments::AllocationResult;
use crate::types::{LeaseId, PaymentId, RentCadence, RentPeriodId, RentPeriodStatus, TenantId};

/// late-payment position of one tenant as of a date
#[derive(Debug, Serialize, Deserialize)]
pub struct LatePaymentSummaryView {
    pub tenant_id: TenantId,
    pub lease_id: LeaseId,
    pub as_of: NaiveDate,
    pub rent_cadence: RentCadence,
    pub totals: LateTotalsView,
    pub late_periods: Vec<LatePeriodView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LateTotalsView {
    pub late_period_count: u32,
    pub total_late_fees: Money,
    pub total_outstanding: Money,
    pub total_due: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LatePeriodView {
    pub due_date: NaiveDate,
    pub rent_amount: Money,
    pub paid: Money,
    pub outstanding: Money,
    pub days_late: u32,
    pub late_fee: Money,
}

impl LatePaymentSummaryView {
    pub fn from_summary(ledger: &TenantLedger, summary: &LatePaymentSummary, as_of: NaiveDate) -> Self {
        let lease = ledger.lease();
        LatePaymentSummaryView {
            tenant_id: lease.tenant_id,
            lease_id: lease.id,
            as_of,
            rent_cadence: lease.rent_cadence,
            totals: LateTotalsView {
                late_period_count: summary.late_periods,
                total_late_fees: summary.total_late_fees,
                total_outstanding: summary.total_outstanding,
                total_due: summary.total_due,
            },
            late_periods: summary
                .per_period_results
                .iter()
                .filter(|r| r.is_late)
                .map(|r| LatePeriodView {
                    due_date: r.expected_date,
                    rent_amount: r.rent_amount,
                    paid: r.total_paid,
                    outstanding: r.outstanding,
                    days_late: r.days_late,
                    late_fee: r.late_fees,
                })
                .collect(),
        }
    }

    /// summarize the ledger as of `as_of` and wrap the result
    pub fn from_ledger(ledger: &TenantLedger, as_of: NaiveDate) -> Self {
        let summary = ledger.late_payment_summary(as_of);
        Self::from_summary(ledger, &summary, as_of)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// receipt for one allocated payment
#[derive(Debug, Serialize, Deserialize)]
pub struct AllocationView {
    pub payment_id: PaymentId,
    pub success: bool,
    pub applied_to_rent: Money,
    pub applied_to_late_fees: Money,
    pub prepaid: Money,
    pub unallocated: Money,
    pub fees_waived: Money,
    pub lines: Vec<AllocationLineView>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllocationLineView {
    pub rent_period_id: RentPeriodId,
    pub due_date: NaiveDate,
    pub to_rent: Money,
    pub to_late_fee: Money,
    pub is_prepayment: bool,
    pub status_after: RentPeriodStatus,
}

impl AllocationView {
    pub fn from_result(result: &AllocationResult) -> Self {
        let lines = result
            .allocations
            .iter()
            .filter_map(|allocation| {
                let period = result
                    .period_updates
                    .iter()
                    .find(|p| p.id == allocation.rent_period_id)?;
                Some(AllocationLineView {
                    rent_period_id: allocation.rent_period_id,
                    due_date: period.period_due_date,
                    to_rent: allocation.amount_to_rent,
                    to_late_fee: allocation.amount_to_late_fee,
                    is_prepayment: allocation.is_prepayment,
                    status_after: period.status,
                })
            })
            .collect();

        AllocationView {
            payment_id: result.payment_id,
            success: result.success,
            applied_to_rent: result.total_rent_paid,
            applied_to_late_fees: result.total_late_fees,
            prepaid: result.total_prepaid,
            unallocated: result.remaining_amount,
            fees_waived: result.waived_fees.iter().map(|w| w.fee_amount).sum(),
            lines,
            note: result.note.clone(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
