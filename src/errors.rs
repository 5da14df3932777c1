use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{PaymentId, RentPeriodId, TenantId};

#[derive(Error, Debug)]
pub enum RentError {
    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("rent period not found: {id}")]
    PeriodNotFound {
        id: RentPeriodId,
    },

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: PaymentId,
    },

    #[error("payment already recorded: {id}")]
    DuplicatePayment {
        id: PaymentId,
    },

    #[error("no ledger open for tenant {tenant_id}")]
    LedgerNotFound {
        tenant_id: TenantId,
    },

    #[error("payment belongs to tenant {payment_tenant}, ledger tenant is {ledger_tenant}")]
    TenantMismatch {
        ledger_tenant: TenantId,
        payment_tenant: TenantId,
    },

    #[error("allocation {id} references an unknown rent period")]
    OrphanAllocation {
        id: Uuid,
    },
}

pub type Result<T> = std::result::Result<T, RentError>;
