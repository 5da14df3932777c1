pub mod book;
pub mod cadence;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod lateness;
pub mod ledger;
pub mod payments;
pub mod periods;
pub mod records;
pub mod reports;
pub mod types;
pub mod views;

// re-export key types
pub use book::{LedgerBook, SharedLedger};
pub use cadence::{
    late_fee_amount, late_fee_amount_for, normalize_rent_to_monthly, period_advance,
    periods_per_month, rent_per_period,
};
pub use config::{LateFeeSchedule, RentConfig};
pub use decimal::Money;
pub use errors::{RentError, Result};
pub use events::{Event, EventStore};
pub use lateness::{
    aggregate_late_payments, evaluate_period, LatePaymentAggregator, LatePaymentSummary,
    LatenessEvaluator, PayPeriodResult,
};
pub use ledger::TenantLedger;
pub use payments::{
    allocate_payment, reverse_payment, AllocationResult, PaymentAllocator, PaymentRequest, ReversalResult,
};
pub use periods::{generate_periods, GeneratedPeriod, PeriodBounds, PeriodGenerator};
pub use records::{Lease, Payment, PaymentAllocation, RentPeriod};
pub use reports::{Expense, ProfitReport, RentRoll, ReportRange};
pub use types::{
    LeaseId, LeaseStatus, PaymentId, PaymentType, PropertyId, RentCadence, RentPeriodId,
    RentPeriodStatus, TenantId,
};
pub use views::{AllocationView, LatePaymentSummaryView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
