use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::RentConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::records::{PaymentAllocation, RentPeriod};
use crate::types::{PaymentId, RentPeriodId};

use super::PaymentRequest;

/// fee forgiven because the payment landed inside the grace period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaivedFee {
    pub rent_period_id: RentPeriodId,
    pub due_date: NaiveDate,
    pub fee_amount: Money,
}

/// outcome of allocating one payment, plus the writes needed to persist it
///
/// `period_updates` holds the full new state of every period touched and
/// `allocations` one record per period that received money. The caller
/// writes both in a single transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub payment_id: PaymentId,
    pub success: bool,
    pub allocations: Vec<PaymentAllocation>,
    pub period_updates: Vec<RentPeriod>,
    pub waived_fees: Vec<WaivedFee>,
    pub remaining_amount: Money,
    pub total_rent_paid: Money,
    pub total_late_fees: Money,
    pub total_prepaid: Money,
    pub note: Option<String>,
}

impl AllocationResult {
    pub fn unallocated(payment: &PaymentRequest, note: &str) -> Self {
        Self {
            payment_id: payment.payment_id,
            success: false,
            allocations: Vec::new(),
            period_updates: Vec::new(),
            waived_fees: Vec::new(),
            remaining_amount: payment.amount,
            total_rent_paid: Money::ZERO,
            total_late_fees: Money::ZERO,
            total_prepaid: Money::ZERO,
            note: Some(note.to_string()),
        }
    }

    /// everything that went to a period
    pub fn total_allocated(&self) -> Money {
        self.allocations.iter().map(|a| a.total()).sum()
    }
}

/// distributes a payment across a tenant's open periods
///
/// Oldest due date first: rent, then any assessed late fee. A previously
/// assessed fee is waived when the payment arrives within the grace period
/// of its due date. Whatever is left after every due period is satisfied
/// prepays rent on periods due after the payment date.
pub struct PaymentAllocator {
    grace_period_days: u32,
}

impl PaymentAllocator {
    pub fn new(config: &RentConfig) -> Self {
        Self {
            grace_period_days: config.grace_period_days,
        }
    }

    pub fn allocate(&self, payment: &PaymentRequest, periods: &[RentPeriod]) -> Result<AllocationResult> {
        payment.validate()?;

        let mut open: Vec<&RentPeriod> = periods.iter().filter(|p| !p.is_settled()).collect();
        if open.is_empty() {
            info!(payment_id = %payment.payment_id, amount = %payment.amount, "no unpaid periods for payment");
            return Ok(AllocationResult::unallocated(payment, "no unpaid rent periods to allocate against"));
        }
        open.sort_by_key(|p| p.period_due_date);

        let (due, future): (Vec<&RentPeriod>, Vec<&RentPeriod>) = open
            .into_iter()
            .partition(|p| p.period_due_date <= payment.payment_date);

        let mut remaining = payment.amount;
        let mut result = AllocationResult {
            payment_id: payment.payment_id,
            success: false,
            allocations: Vec::new(),
            period_updates: Vec::new(),
            waived_fees: Vec::new(),
            remaining_amount: Money::ZERO,
            total_rent_paid: Money::ZERO,
            total_late_fees: Money::ZERO,
            total_prepaid: Money::ZERO,
            note: None,
        };

        for period in due {
            if remaining.is_zero() {
                break;
            }
            remaining = self.apply_to_due_period(payment, period, remaining, &mut result);
        }

        for period in future {
            if remaining.is_zero() {
                break;
            }
            remaining = self.apply_prepayment(payment, period, remaining, &mut result);
        }

        result.remaining_amount = remaining;
        result.success = !result.allocations.is_empty() || !result.waived_fees.is_empty();
        if remaining.is_positive() {
            result.note = Some(format!("{} left unallocated after all open periods", remaining));
        }

        info!(
            payment_id = %payment.payment_id,
            amount = %payment.amount,
            to_rent = %result.total_rent_paid,
            to_late_fees = %result.total_late_fees,
            prepaid = %result.total_prepaid,
            remaining = %remaining,
            periods = result.period_updates.len(),
            "payment allocated"
        );

        Ok(result)
    }

    fn apply_to_due_period(
        &self,
        payment: &PaymentRequest,
        period: &RentPeriod,
        available: Money,
        result: &mut AllocationResult,
    ) -> Money {
        let mut updated = period.clone();

        let days_late = (payment.payment_date - period.period_due_date).num_days();
        if days_late <= self.grace_period_days as i64
            && updated.late_fee_applied.is_positive()
            && !updated.late_fee_waived
        {
            updated.late_fee_waived = true;
            result.waived_fees.push(WaivedFee {
                rent_period_id: period.id,
                due_date: period.period_due_date,
                fee_amount: updated.late_fee_applied,
            });
            debug!(rent_period_id = %period.id, days_late, "late fee waived, paid within grace");
        }

        let mut remaining = available;

        let to_rent = remaining.min(updated.rent_needed());
        remaining -= to_rent;

        let to_fee = remaining.min(updated.late_fee_owed());
        remaining -= to_fee;

        updated.amount_paid += to_rent;
        updated.late_fee_paid += to_fee;
        updated.refresh_status();

        result.total_rent_paid += to_rent;
        result.total_late_fees += to_fee;
        if (to_rent + to_fee).is_positive() {
            result.allocations.push(PaymentAllocation {
                id: Uuid::new_v4(),
                payment_id: payment.payment_id,
                rent_period_id: period.id,
                amount_to_rent: to_rent,
                amount_to_late_fee: to_fee,
                is_prepayment: false,
            });
        }
        if updated != *period {
            result.period_updates.push(updated);
        }

        remaining
    }

    fn apply_prepayment(
        &self,
        payment: &PaymentRequest,
        period: &RentPeriod,
        available: Money,
        result: &mut AllocationResult,
    ) -> Money {
        let to_rent = available.min(period.rent_needed());
        if to_rent.is_zero() {
            return available;
        }

        let mut updated = period.clone();
        updated.amount_paid += to_rent;
        updated.refresh_status();

        result.total_rent_paid += to_rent;
        result.total_prepaid += to_rent;
        result.allocations.push(PaymentAllocation {
            id: Uuid::new_v4(),
            payment_id: payment.payment_id,
            rent_period_id: period.id,
            amount_to_rent: to_rent,
            amount_to_late_fee: Money::ZERO,
            is_prepayment: true,
        });
        result.period_updates.push(updated);

        debug!(rent_period_id = %period.id, amount = %to_rent, "prepayment applied to future period");

        available - to_rent
    }
}

/// allocate a bare amount with a given grace period
///
/// The result carries a fresh payment id; use [`PaymentAllocator`] directly
/// to allocate a recorded payment.
pub fn allocate_payment(
    amount: Money,
    payment_date: NaiveDate,
    periods: &[RentPeriod],
    grace_period_days: u32,
) -> Result<AllocationResult> {
    let request = PaymentRequest {
        payment_id: Uuid::new_v4(),
        tenant_id: periods.first().map(|p| p.tenant_id).unwrap_or_else(Uuid::nil),
        amount,
        payment_date,
    };
    PaymentAllocator { grace_period_days }.allocate(&request, periods)
}
