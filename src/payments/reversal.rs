use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{RentError, Result};
use crate::records::{PaymentAllocation, RentPeriod};
use crate::types::{PaymentId, RentPeriodId};

/// writes needed to undo one payment's allocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversalResult {
    pub payment_id: PaymentId,
    pub period_updates: Vec<RentPeriod>,
    pub removed_allocation_ids: Vec<Uuid>,
    pub rent_restored: Money,
    pub late_fees_restored: Money,
}

impl ReversalResult {
    /// nothing was allocated for the payment
    pub fn is_noop(&self) -> bool {
        self.removed_allocation_ids.is_empty()
    }
}

/// back out every allocation recorded for `payment_id`
///
/// Amounts come off `amount_paid` and `late_fee_paid` floored at zero and
/// each touched period's status is recomputed. A waiver granted by the
/// payment is left in place. Calling this for a payment with no remaining
/// allocations returns an empty result.
pub fn reverse_payment(
    payment_id: PaymentId,
    allocations: &[PaymentAllocation],
    periods: &[RentPeriod],
) -> Result<ReversalResult> {
    let mut touched: HashMap<RentPeriodId, RentPeriod> = HashMap::new();
    let mut order: Vec<RentPeriodId> = Vec::new();
    let mut result = ReversalResult {
        payment_id,
        period_updates: Vec::new(),
        removed_allocation_ids: Vec::new(),
        rent_restored: Money::ZERO,
        late_fees_restored: Money::ZERO,
    };

    for allocation in allocations.iter().filter(|a| a.payment_id == payment_id) {
        if !touched.contains_key(&allocation.rent_period_id) {
            let period = periods
                .iter()
                .find(|p| p.id == allocation.rent_period_id)
                .ok_or(RentError::OrphanAllocation { id: allocation.id })?;
            touched.insert(period.id, period.clone());
            order.push(period.id);
        }

        if let Some(period) = touched.get_mut(&allocation.rent_period_id) {
            let rent_back = allocation.amount_to_rent.min(period.amount_paid);
            let fee_back = allocation.amount_to_late_fee.min(period.late_fee_paid);
            period.amount_paid = period.amount_paid.saturating_sub(allocation.amount_to_rent);
            period.late_fee_paid = period.late_fee_paid.saturating_sub(allocation.amount_to_late_fee);
            period.refresh_status();

            result.rent_restored += rent_back;
            result.late_fees_restored += fee_back;
        }
        result.removed_allocation_ids.push(allocation.id);
    }

    result.period_updates = order
        .into_iter()
        .filter_map(|id| touched.remove(&id))
        .collect();

    if !result.is_noop() {
        info!(
            payment_id = %payment_id,
            allocations = result.removed_allocation_ids.len(),
            rent_restored = %result.rent_restored,
            late_fees_restored = %result.late_fees_restored,
            "payment reversed"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RentConfig;
    use crate::payments::{PaymentAllocator, PaymentRequest};
    use crate::types::{RentCadence, RentPeriodStatus};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn periods() -> Vec<RentPeriod> {
        let mut jan = RentPeriod::new(Uuid::nil(), Uuid::nil(), date(2024, 1, 1), Money::from_major(1200), RentCadence::Monthly);
        jan.late_fee_applied = Money::from_major(45);
        let feb = RentPeriod::new(Uuid::nil(), Uuid::nil(), date(2024, 2, 1), Money::from_major(1200), RentCadence::Monthly);
        vec![jan, feb]
    }

    fn apply(periods: &mut [RentPeriod], updates: &[RentPeriod]) {
        for update in updates {
            if let Some(p) = periods.iter_mut().find(|p| p.id == update.id) {
                *p = update.clone();
            }
        }
    }

    #[test]
    fn test_reversal_restores_balances() {
        let mut periods = periods();
        let request = PaymentRequest {
            payment_id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            amount: Money::from_major(1845),
            payment_date: date(2024, 1, 20),
        };
        let allocated = PaymentAllocator::new(&RentConfig::default())
            .allocate(&request, &periods)
            .unwrap();
        apply(&mut periods, &allocated.period_updates);
        assert_eq!(periods[0].status, RentPeriodStatus::Paid);
        assert_eq!(periods[1].status, RentPeriodStatus::Partial);

        let reversed = reverse_payment(request.payment_id, &allocated.allocations, &periods).unwrap();
        assert_eq!(reversed.rent_restored, Money::from_major(1800));
        assert_eq!(reversed.late_fees_restored, Money::from_major(45));
        assert_eq!(reversed.removed_allocation_ids.len(), 2);

        apply(&mut periods, &reversed.period_updates);
        for p in &periods {
            assert_eq!(p.amount_paid, Money::ZERO);
            assert_eq!(p.late_fee_paid, Money::ZERO);
            assert_eq!(p.status, RentPeriodStatus::Unpaid);
        }
    }

    #[test]
    fn test_reversal_without_allocations_is_noop() {
        let periods = periods();
        let result = reverse_payment(Uuid::new_v4(), &[], &periods).unwrap();
        assert!(result.is_noop());
        assert!(result.period_updates.is_empty());
    }

    #[test]
    fn test_reversal_floors_at_zero() {
        let mut periods = periods();
        periods[1].amount_paid = Money::from_major(100);
        periods[1].refresh_status();

        let payment_id = Uuid::new_v4();
        let allocation = PaymentAllocation {
            id: Uuid::new_v4(),
            payment_id,
            rent_period_id: periods[1].id,
            amount_to_rent: Money::from_major(300),
            amount_to_late_fee: Money::ZERO,
            is_prepayment: false,
        };

        let result = reverse_payment(payment_id, &[allocation], &periods).unwrap();
        assert_eq!(result.period_updates[0].amount_paid, Money::ZERO);
        assert_eq!(result.rent_restored, Money::from_major(100));
    }

    #[test]
    fn test_allocation_for_missing_period() {
        let payment_id = Uuid::new_v4();
        let allocation = PaymentAllocation {
            id: Uuid::new_v4(),
            payment_id,
            rent_period_id: Uuid::new_v4(),
            amount_to_rent: Money::from_major(10),
            amount_to_late_fee: Money::ZERO,
            is_prepayment: false,
        };

        let result = reverse_payment(payment_id, &[allocation], &periods());
        assert!(matches!(result, Err(RentError::OrphanAllocation { .. })));
    }
}
