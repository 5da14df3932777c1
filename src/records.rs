use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cadence::rent_per_period;
use crate::decimal::Money;
use crate::types::{
    LeaseId, LeaseStatus, PaymentId, PaymentType, PropertyId, RentCadence, RentPeriodId,
    RentPeriodStatus, TenantId,
};

/// a tenant/property pairing with its rent terms
///
/// `rent` is the monthly rent; per-period amounts come from
/// [`Lease::rent_per_period`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    pub id: LeaseId,
    pub tenant_id: TenantId,
    pub property_id: PropertyId,
    pub rent: Money,
    #[serde(default)]
    pub rent_cadence: RentCadence,
    #[serde(default)]
    pub lease_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub lease_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: LeaseStatus,
}

impl Lease {
    pub fn new(
        tenant_id: TenantId,
        property_id: PropertyId,
        rent: Money,
        rent_cadence: RentCadence,
        lease_start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            property_id,
            rent,
            rent_cadence,
            lease_start_date: Some(lease_start_date),
            lease_end_date: None,
            status: LeaseStatus::Active,
        }
    }

    pub fn with_end_date(mut self, end: NaiveDate) -> Self {
        self.lease_end_date = Some(end);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == LeaseStatus::Active
    }

    /// rent owed each period at this lease's cadence
    pub fn rent_per_period(&self) -> Money {
        rent_per_period(self.rent, self.rent_cadence)
    }

    /// start date, but only when the lease can owe anything at all
    pub fn billable_start(&self) -> Option<NaiveDate> {
        if !self.is_active() || !self.rent.is_positive() {
            return None;
        }
        self.lease_start_date
    }

    /// last date periods may fall due: the earlier of `until` and the lease end
    pub fn billing_horizon(&self, until: NaiveDate) -> NaiveDate {
        match self.lease_end_date {
            Some(end) if end < until => end,
            _ => until,
        }
    }
}

/// a single recorded transfer from a tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub tenant_id: TenantId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub payment_type: PaymentType,
    /// set once the payment's allocations have been undone
    #[serde(default)]
    pub reversed: bool,
}

impl Payment {
    pub fn rent(tenant_id: TenantId, amount: Money, payment_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            amount,
            payment_date,
            payment_type: PaymentType::Rent,
            reversed: false,
        }
    }

    pub fn is_rent(&self) -> bool {
        self.payment_type == PaymentType::Rent
    }
}

/// one persisted rent obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentPeriod {
    pub id: RentPeriodId,
    pub lease_id: LeaseId,
    pub tenant_id: TenantId,
    pub period_due_date: NaiveDate,
    pub rent_amount: Money,
    pub rent_cadence: RentCadence,
    #[serde(default)]
    pub status: RentPeriodStatus,
    #[serde(default)]
    pub amount_paid: Money,
    /// fee assessed against this period
    #[serde(default)]
    pub late_fee_applied: Money,
    /// portion of the assessed fee received
    #[serde(default)]
    pub late_fee_paid: Money,
    #[serde(default)]
    pub late_fee_waived: bool,
}

impl RentPeriod {
    pub fn new(
        lease_id: LeaseId,
        tenant_id: TenantId,
        period_due_date: NaiveDate,
        rent_amount: Money,
        rent_cadence: RentCadence,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lease_id,
            tenant_id,
            period_due_date,
            rent_amount,
            rent_cadence,
            status: RentPeriodStatus::Unpaid,
            amount_paid: Money::ZERO,
            late_fee_applied: Money::ZERO,
            late_fee_paid: Money::ZERO,
            late_fee_waived: false,
        }
    }

    /// rent still owed
    pub fn rent_needed(&self) -> Money {
        self.rent_amount.saturating_sub(self.amount_paid)
    }

    /// late fee still owed; zero once waived
    pub fn late_fee_owed(&self) -> Money {
        if self.late_fee_waived {
            return Money::ZERO;
        }
        self.late_fee_applied.saturating_sub(self.late_fee_paid)
    }

    /// nothing left to collect on this period
    pub fn is_settled(&self) -> bool {
        self.rent_needed().is_zero() && self.late_fee_owed().is_zero()
    }

    /// recompute `status` from the amount paid against rent
    pub fn refresh_status(&mut self) -> RentPeriodStatus {
        self.status = status_for(self.amount_paid, self.rent_amount);
        self.status
    }
}

/// rent-paid status for an amount paid against the rent owed
pub fn status_for(amount_paid: Money, rent_amount: Money) -> RentPeriodStatus {
    if amount_paid >= rent_amount {
        RentPeriodStatus::Paid
    } else if amount_paid.is_positive() {
        RentPeriodStatus::Partial
    } else {
        RentPeriodStatus::Unpaid
    }
}

/// join record: how much of one payment went to one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub id: Uuid,
    pub payment_id: PaymentId,
    pub rent_period_id: RentPeriodId,
    pub amount_to_rent: Money,
    pub amount_to_late_fee: Money,
    /// applied to a period not yet due at the payment date
    #[serde(default)]
    pub is_prepayment: bool,
}

impl PaymentAllocation {
    pub fn total(&self) -> Money {
        self.amount_to_rent + self.amount_to_late_fee
    }
}
