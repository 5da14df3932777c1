use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rent_roll_rs::{
    aggregate_late_payments, allocate_payment, evaluate_period, late_fee_amount,
    late_fee_amount_for, normalize_rent_to_monthly, periods_per_month, Event, GeneratedPeriod,
    Lease, Money, Payment, RentCadence, RentConfig, RentPeriod, RentPeriodStatus,
    SafeTimeProvider, TenantLedger, TimeSource, Uuid,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clock(y: i32, m: u32, d: u32) -> SafeTimeProvider {
    SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()))
}

fn monthly_lease() -> Lease {
    Lease::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Money::from_major(1200),
        RentCadence::Monthly,
        date(2024, 1, 1),
    )
}

#[test]
fn test_late_fee_table() {
    assert_eq!(late_fee_amount(RentCadence::Weekly), Money::from_major(10));
    assert_eq!(late_fee_amount(RentCadence::BiWeekly), Money::from_major(20));
    assert_eq!(late_fee_amount(RentCadence::Monthly), Money::from_major(45));
    assert_eq!(late_fee_amount_for("Bi-Weekly"), Money::from_major(20));
    assert_eq!(late_fee_amount_for("quarterly"), Money::from_major(45));
}

#[test]
fn test_three_unpaid_months() {
    let time = clock(2024, 4, 1);
    let lease = monthly_lease();

    let summary = aggregate_late_payments(Some(&lease), &[], 12, time.now().date_naive());
    assert_eq!(summary.late_periods, 3);
    assert_eq!(summary.total_late_fees, Money::from_major(135));
    assert_eq!(summary.total_outstanding, Money::from_major(3600));
    assert_eq!(summary.total_due, Money::from_major(3735));

    let late: Vec<_> = summary
        .per_period_results
        .iter()
        .filter(|r| r.is_late)
        .map(|r| r.expected_date)
        .collect();
    assert_eq!(late, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
}

#[test]
fn test_january_paid_within_grace() {
    let time = clock(2024, 4, 1);
    let mut ledger = TenantLedger::new(monthly_lease(), RentConfig::default()).unwrap();
    ledger.sync_periods_now(&time);

    let tenant = ledger.tenant_id();
    ledger
        .record_payment(Payment::rent(tenant, Money::from_major(1200), date(2024, 1, 3)))
        .unwrap();
    assert_eq!(ledger.periods()[0].status, RentPeriodStatus::Paid);

    // only feb and mar pick up a fee
    assert_eq!(ledger.assess_late_fees_now(&time), Money::from_major(90));
    assert_eq!(ledger.periods()[0].late_fee_applied, Money::ZERO);

    let summary = ledger.late_payment_summary_now(&time);
    assert_eq!(summary.late_periods, 2);
    assert!(summary
        .per_period_results
        .iter()
        .all(|r| r.expected_date != date(2024, 1, 1) || !r.is_late));
}

#[test]
fn test_backdated_grace_payment_waives_assessed_fee() {
    let time = clock(2024, 1, 1);
    let controller = time.test_control().unwrap();
    let mut ledger = TenantLedger::new(monthly_lease(), RentConfig::default()).unwrap();
    ledger.sync_periods_now(&time);

    // fee assessed once grace has run out
    controller.advance(Duration::days(19));
    assert_eq!(ledger.assess_late_fees_now(&time), Money::from_major(45));

    // the cheque dated jan 3 turns up afterwards
    let tenant = ledger.tenant_id();
    let result = ledger
        .record_payment(Payment::rent(tenant, Money::from_major(1200), date(2024, 1, 3)))
        .unwrap();

    assert_eq!(result.waived_fees.len(), 1);
    let january = &ledger.periods()[0];
    assert!(january.late_fee_waived);
    assert!(january.is_settled());
    assert_eq!(ledger.outstanding_late_fees(), Money::ZERO);
    assert_eq!(ledger.events.count_where(|e| matches!(e, Event::LateFeeWaived { .. })), 1);
}

#[test]
fn test_large_payment_prepays_march() {
    let lease = monthly_lease();
    let periods: Vec<RentPeriod> = [date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        .into_iter()
        .map(|due| RentPeriod::new(lease.id, lease.tenant_id, due, lease.rent, RentCadence::Monthly))
        .collect();

    // no fees assessed on these rows
    let result = allocate_payment(Money::from_major(3000), date(2024, 2, 10), &periods, 5).unwrap();

    let split: Vec<_> = result
        .allocations
        .iter()
        .map(|a| (a.amount_to_rent, a.is_prepayment))
        .collect();
    assert_eq!(
        split,
        vec![
            (Money::from_major(1200), false),
            (Money::from_major(1200), false),
            (Money::from_major(600), true),
        ]
    );
    assert_eq!(result.remaining_amount, Money::ZERO);
    assert_eq!(result.period_updates[2].rent_needed(), Money::from_major(600));

    // through the ledger both closed grace windows owe their fee first
    let time = clock(2024, 3, 1);
    let mut ledger = TenantLedger::new(lease, RentConfig::default()).unwrap();
    ledger.sync_periods_now(&time);
    let tenant = ledger.tenant_id();
    let result = ledger
        .record_payment(Payment::rent(tenant, Money::from_major(3000), date(2024, 2, 10)))
        .unwrap();

    assert_eq!(result.total_late_fees, Money::from_major(90));
    assert_eq!(result.total_prepaid, Money::from_major(510));
    assert_eq!(ledger.outstanding_rent(), Money::from_major(690));
}

#[test]
fn test_large_payment_without_future_period() {
    let time = clock(2024, 2, 10);
    let mut ledger = TenantLedger::new(monthly_lease(), RentConfig::default()).unwrap();
    ledger.sync_periods_now(&time);

    let tenant = ledger.tenant_id();
    let result = ledger
        .record_payment(Payment::rent(tenant, Money::from_major(3000), date(2024, 2, 10)))
        .unwrap();

    assert_eq!(result.total_rent_paid, Money::from_major(2400));
    assert_eq!(result.total_late_fees, Money::from_major(90));
    assert_eq!(result.remaining_amount, Money::from_major(510));
    assert!(ledger.periods().iter().all(|p| p.status == RentPeriodStatus::Paid));
}

#[test]
fn test_weekly_payment_ten_days_late() {
    let period = GeneratedPeriod {
        index: 0,
        due_date: date(2024, 3, 4),
        rent_amount: Money::from_major(300),
        cadence: RentCadence::Weekly,
    };
    let payments = vec![Payment::rent(Uuid::new_v4(), Money::from_major(300), date(2024, 3, 14))];
    let today = date(2024, 3, 14);

    let first = evaluate_period(&period, &payments, 5, today);
    assert!(first.is_late);
    assert_eq!(first.late_fees, Money::from_major(10));
    assert_eq!(first.outstanding, Money::from_major(300));

    // pure: same inputs, same answer
    assert_eq!(evaluate_period(&period, &payments, 5, today), first);
}

#[test]
fn test_normalization_round_trip() {
    for cadence in [RentCadence::Weekly, RentCadence::BiWeekly] {
        let rent = Money::from_str_exact("412.37").unwrap();
        let monthly = normalize_rent_to_monthly(rent, cadence);
        let back = Money::from_decimal(monthly.as_decimal() / periods_per_month(cadence));
        assert!((back - rent).abs() <= Money::CENT);
    }
}

#[test]
fn test_reversal_reopens_periods() {
    let time = clock(2024, 2, 1);
    let mut ledger = TenantLedger::new(monthly_lease(), RentConfig::default()).unwrap();
    ledger.sync_periods_now(&time);

    let tenant = ledger.tenant_id();
    let payment = Payment::rent(tenant, Money::from_major(2400), date(2024, 1, 5));
    let payment_id = payment.id;
    ledger.record_payment(payment).unwrap();
    assert_eq!(ledger.outstanding_rent(), Money::ZERO);

    ledger.reverse_payment(payment_id).unwrap();
    ledger.reverse_payment(payment_id).unwrap();

    assert_eq!(ledger.outstanding_rent(), Money::from_major(2400));
    assert!(ledger.allocations().is_empty());
    assert!(ledger.periods().iter().all(|p| p.status == RentPeriodStatus::Unpaid));
    assert_eq!(ledger.events.count_where(|e| matches!(e, Event::PaymentReversed { .. })), 1);
    assert_eq!(ledger.events.for_payment(payment_id).len(), 3);
}
