pub mod allocation;
pub mod reversal;

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{RentError, Result};
use crate::records::Payment;
use crate::types::{PaymentId, TenantId};

pub use allocation::{allocate_payment, AllocationResult, PaymentAllocator, WaivedFee};
pub use reversal::{reverse_payment, ReversalResult};

/// payment to be allocated across a tenant's periods
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub payment_id: PaymentId,
    pub tenant_id: TenantId,
    pub amount: Money,
    pub payment_date: NaiveDate,
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(RentError::InvalidPaymentAmount { amount: self.amount });
        }
        Ok(())
    }
}

impl From<&Payment> for PaymentRequest {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id,
            tenant_id: payment.tenant_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
        }
    }
}
