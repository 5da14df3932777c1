pub mod aggregator;
pub mod evaluator;

pub use aggregator::{aggregate_late_payments, LatePaymentAggregator, LatePaymentSummary};
pub use evaluator::{evaluate_period, LatenessEvaluator, PayPeriodResult, PaymentWindow};
