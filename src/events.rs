use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LeaseId, PaymentId, RentPeriodId, RentPeriodStatus, TenantId};

/// all events that can be emitted by a tenant ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // period events
    PeriodsGenerated {
        lease_id: LeaseId,
        count: u32,
        through: NaiveDate,
    },
    PeriodStatusChanged {
        rent_period_id: RentPeriodId,
        due_date: NaiveDate,
        old_status: RentPeriodStatus,
        new_status: RentPeriodStatus,
    },

    // late fee events
    LateFeeApplied {
        rent_period_id: RentPeriodId,
        due_date: NaiveDate,
        fee_amount: Money,
        assessed_on: NaiveDate,
    },
    LateFeeWaived {
        rent_period_id: RentPeriodId,
        due_date: NaiveDate,
        fee_amount: Money,
        payment_id: PaymentId,
    },

    // payment events
    PaymentAllocated {
        payment_id: PaymentId,
        tenant_id: TenantId,
        amount: Money,
        to_rent: Money,
        to_late_fees: Money,
        unallocated: Money,
        payment_date: NaiveDate,
    },
    PrepaymentApplied {
        payment_id: PaymentId,
        rent_period_id: RentPeriodId,
        due_date: NaiveDate,
        amount: Money,
    },
    PaymentUnallocated {
        payment_id: PaymentId,
        tenant_id: TenantId,
        amount: Money,
        reason: String,
    },
    PaymentReversed {
        payment_id: PaymentId,
        rent_restored: Money,
        late_fees_restored: Money,
        periods_touched: u32,
    },
}

impl Event {
    /// payment behind this event, if any
    pub fn payment_id(&self) -> Option<PaymentId> {
        match self {
            Event::LateFeeWaived { payment_id, .. }
            | Event::PaymentAllocated { payment_id, .. }
            | Event::PrepaymentApplied { payment_id, .. }
            | Event::PaymentUnallocated { payment_id, .. }
            | Event::PaymentReversed { payment_id, .. } => Some(*payment_id),
            _ => None,
        }
    }
}

/// events emitted by ledger operations, drained by the caller
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// hand over everything emitted so far and start empty
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Event) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    /// events tied to one payment, in emission order
    pub fn for_payment(&self, payment_id: PaymentId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.payment_id() == Some(payment_id))
            .collect()
    }
}
