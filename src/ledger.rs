use std::collections::HashSet;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info, warn};

use crate::config::RentConfig;
use crate::decimal::Money;
use crate::errors::{RentError, Result};
use crate::events::{Event, EventStore};
use crate::lateness::{LatePaymentAggregator, LatePaymentSummary};
use crate::payments::{reverse_payment, AllocationResult, PaymentAllocator, PaymentRequest, ReversalResult};
use crate::periods::PeriodGenerator;
use crate::records::{Lease, Payment, PaymentAllocation, RentPeriod};
use crate::types::{PaymentId, RentPeriodId, RentPeriodStatus, TenantId};

/// one lease's rent periods, payments and allocations
///
/// All writes for a tenant go through here. Each operation computes its
/// write set first and only mutates once the whole set is known to apply.
pub struct TenantLedger {
    pub config: RentConfig,
    pub events: EventStore,
    lease: Lease,
    periods: Vec<RentPeriod>,
    payments: Vec<Payment>,
    allocations: Vec<PaymentAllocation>,
}

impl TenantLedger {
    /// empty ledger for a lease
    pub fn new(lease: Lease, config: RentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            events: EventStore::new(),
            lease,
            periods: Vec::new(),
            payments: Vec::new(),
            allocations: Vec::new(),
        })
    }

    /// restore a ledger from persisted rows
    pub fn from_parts(
        lease: Lease,
        config: RentConfig,
        mut periods: Vec<RentPeriod>,
        payments: Vec<Payment>,
        allocations: Vec<PaymentAllocation>,
    ) -> Result<Self> {
        for allocation in &allocations {
            if !periods.iter().any(|p| p.id == allocation.rent_period_id) {
                return Err(RentError::OrphanAllocation { id: allocation.id });
            }
        }
        periods.sort_by_key(|p| p.period_due_date);

        let mut ledger = Self::new(lease, config)?;
        ledger.periods = periods;
        ledger.payments = payments;
        ledger.allocations = allocations;
        Ok(ledger)
    }

    pub fn lease(&self) -> &Lease {
        &self.lease
    }

    pub fn tenant_id(&self) -> TenantId {
        self.lease.tenant_id
    }

    /// persisted periods, oldest due date first
    pub fn periods(&self) -> &[RentPeriod] {
        &self.periods
    }

    pub fn period(&self, id: RentPeriodId) -> Option<&RentPeriod> {
        self.periods.iter().find(|p| p.id == id)
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn allocations(&self) -> &[PaymentAllocation] {
        &self.allocations
    }

    pub fn allocations_for(&self, payment_id: PaymentId) -> Vec<&PaymentAllocation> {
        self.allocations.iter().filter(|a| a.payment_id == payment_id).collect()
    }

    pub fn is_reversed(&self, payment_id: PaymentId) -> bool {
        self.payments.iter().any(|p| p.id == payment_id && p.reversed)
    }

    /// rent still owed across all persisted periods
    pub fn outstanding_rent(&self) -> Money {
        self.periods.iter().map(|p| p.rent_needed()).sum()
    }

    /// assessed, unwaived late fees not yet paid
    pub fn outstanding_late_fees(&self) -> Money {
        self.periods.iter().map(|p| p.late_fee_owed()).sum()
    }

    /// materialize periods due on or before `until`, capped at the lease end
    ///
    /// Due dates already present are skipped, so repeated calls only add the
    /// newly due periods. Returns how many were added. More than
    /// `max_period_scan` periods since the start adds nothing.
    pub fn sync_periods(&mut self, until: NaiveDate) -> u32 {
        let Some(start) = self.lease.billable_start() else {
            debug!(lease_id = %self.lease.id, "lease not billable, no periods to sync");
            return 0;
        };

        let horizon = self.lease.billing_horizon(until);
        let generator = PeriodGenerator::new(self.lease.rent_cadence, self.lease.rent_per_period());
        let cap = self.config.max_period_scan as usize;
        let generated: Vec<_> = generator
            .iter_from(start)
            .take_while(|p| p.due_date <= horizon)
            .take(cap + 1)
            .collect();

        if generated.len() > cap {
            warn!(
                lease_id = %self.lease.id,
                cap,
                through = %horizon,
                "period scan cap exceeded, no periods synced"
            );
            return 0;
        }

        let existing: HashSet<NaiveDate> = self.periods.iter().map(|p| p.period_due_date).collect();
        let mut added = 0u32;
        for period in generated {
            if existing.contains(&period.due_date) {
                continue;
            }
            self.periods.push(period.into_rent_period(self.lease.id, self.lease.tenant_id));
            added += 1;
        }

        if added > 0 {
            self.periods.sort_by_key(|p| p.period_due_date);
            self.events.emit(Event::PeriodsGenerated {
                lease_id: self.lease.id,
                count: added,
                through: horizon,
            });
            debug!(lease_id = %self.lease.id, added, through = %horizon, "rent periods synced");
        }

        added
    }

    pub fn sync_periods_now(&mut self, time_provider: &SafeTimeProvider) -> u32 {
        self.sync_periods(time_provider.now().date_naive())
    }

    /// apply the cadence late fee to every unpaid period past its grace window
    ///
    /// A period carries at most one fee; waived periods and periods already
    /// assessed are left alone. Returns the total newly assessed.
    pub fn assess_late_fees(&mut self, today: NaiveDate) -> Money {
        let grace = chrono::Duration::days(self.config.grace_period_days as i64);
        let mut total = Money::ZERO;

        for period in self.periods.iter_mut() {
            if period.status == RentPeriodStatus::Paid
                || period.late_fee_waived
                || period.late_fee_applied.is_positive()
                || today <= period.period_due_date + grace
            {
                continue;
            }

            let fee = self.config.late_fees.fee_for(period.rent_cadence);
            if fee.is_zero() {
                continue;
            }
            period.late_fee_applied = fee;
            total += fee;

            self.events.emit(Event::LateFeeApplied {
                rent_period_id: period.id,
                due_date: period.period_due_date,
                fee_amount: fee,
                assessed_on: today,
            });
            debug!(rent_period_id = %period.id, due = %period.period_due_date, fee = %fee, "late fee applied");
        }

        if total.is_positive() {
            info!(lease_id = %self.lease.id, total = %total, "late fees assessed");
        }
        total
    }

    pub fn assess_late_fees_now(&mut self, time_provider: &SafeTimeProvider) -> Money {
        self.assess_late_fees(time_provider.now().date_naive())
    }

    /// record a payment and allocate it across open periods
    ///
    /// Fees for periods whose grace closed before the payment date are
    /// assessed first, so a late payment owes its fee. Non-rent payments are
    /// stored but never allocated.
    pub fn record_payment(&mut self, payment: Payment) -> Result<AllocationResult> {
        if self.payments.iter().any(|p| p.id == payment.id) {
            return Err(RentError::DuplicatePayment { id: payment.id });
        }
        if payment.tenant_id != self.lease.tenant_id {
            return Err(RentError::TenantMismatch {
                ledger_tenant: self.lease.tenant_id,
                payment_tenant: payment.tenant_id,
            });
        }

        let request = PaymentRequest::from(&payment);
        request.validate()?;

        if !payment.is_rent() {
            let result = AllocationResult::unallocated(&request, "not a rent payment");
            self.emit_unallocated(&payment, "not a rent payment");
            self.payments.push(payment);
            return Ok(result);
        }

        self.assess_late_fees(payment.payment_date);
        let result = PaymentAllocator::new(&self.config).allocate(&request, &self.periods)?;
        self.apply_period_updates(&result.period_updates)?;

        for waived in &result.waived_fees {
            self.events.emit(Event::LateFeeWaived {
                rent_period_id: waived.rent_period_id,
                due_date: waived.due_date,
                fee_amount: waived.fee_amount,
                payment_id: payment.id,
            });
        }
        for allocation in result.allocations.iter().filter(|a| a.is_prepayment) {
            let due_date = self
                .period(allocation.rent_period_id)
                .map(|p| p.period_due_date)
                .unwrap_or(payment.payment_date);
            self.events.emit(Event::PrepaymentApplied {
                payment_id: payment.id,
                rent_period_id: allocation.rent_period_id,
                due_date,
                amount: allocation.amount_to_rent,
            });
        }

        if result.success {
            self.events.emit(Event::PaymentAllocated {
                payment_id: payment.id,
                tenant_id: payment.tenant_id,
                amount: payment.amount,
                to_rent: result.total_rent_paid,
                to_late_fees: result.total_late_fees,
                unallocated: result.remaining_amount,
                payment_date: payment.payment_date,
            });
        } else {
            let reason = result.note.clone().unwrap_or_default();
            self.emit_unallocated(&payment, &reason);
        }

        self.allocations.extend(result.allocations.iter().cloned());
        self.payments.push(payment);

        Ok(result)
    }

    /// undo every allocation a payment made
    ///
    /// The payment stays on record but no longer counts toward lateness.
    /// Reversing an already reversed payment changes nothing.
    pub fn reverse_payment(&mut self, payment_id: PaymentId) -> Result<ReversalResult> {
        let index = self
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or(RentError::PaymentNotFound { id: payment_id })?;

        let result = reverse_payment(payment_id, &self.allocations, &self.periods)?;
        self.payments[index].reversed = true;
        if result.is_noop() {
            return Ok(result);
        }

        self.apply_period_updates(&result.period_updates)?;
        let removed: HashSet<_> = result.removed_allocation_ids.iter().copied().collect();
        self.allocations.retain(|a| !removed.contains(&a.id));

        self.events.emit(Event::PaymentReversed {
            payment_id,
            rent_restored: result.rent_restored,
            late_fees_restored: result.late_fees_restored,
            periods_touched: result.period_updates.len() as u32,
        });

        Ok(result)
    }

    /// late-payment summary over this ledger's payments; reversed ones do not count
    pub fn late_payment_summary(&self, today: NaiveDate) -> LatePaymentSummary {
        LatePaymentAggregator::new(&self.config).aggregate(Some(&self.lease), &self.payments, today)
    }

    pub fn late_payment_summary_now(&self, time_provider: &SafeTimeProvider) -> LatePaymentSummary {
        self.late_payment_summary(time_provider.now().date_naive())
    }

    /// swap in new period rows, all or nothing
    fn apply_period_updates(&mut self, updates: &[RentPeriod]) -> Result<()> {
        let mut positions = Vec::with_capacity(updates.len());
        for update in updates {
            let index = self
                .periods
                .iter()
                .position(|p| p.id == update.id)
                .ok_or(RentError::PeriodNotFound { id: update.id })?;
            positions.push(index);
        }

        for (index, update) in positions.into_iter().zip(updates) {
            let old_status = self.periods[index].status;
            if old_status != update.status {
                self.events.emit(Event::PeriodStatusChanged {
                    rent_period_id: update.id,
                    due_date: update.period_due_date,
                    old_status,
                    new_status: update.status,
                });
            }
            self.periods[index] = update.clone();
        }
        Ok(())
    }

    fn emit_unallocated(&mut self, payment: &Payment, reason: &str) {
        self.events.emit(Event::PaymentUnallocated {
            payment_id: payment.id,
            tenant_id: payment.tenant_id,
            amount: payment.amount,
            reason: reason.to_string(),
        });
    }
}
