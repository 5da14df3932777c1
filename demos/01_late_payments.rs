/// late payments - grace windows, late fees and time control
use chrono::{Duration, TimeZone, Utc};
use rent_roll_rs::{
    Lease, LatePaymentSummaryView, Money, Payment, RentCadence, RentConfig, SafeTimeProvider,
    TenantLedger, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    println!("=== late payments example ===\n");

    // controlled time starting on the lease start date
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().ok_or("bad time")?,
    ));
    let controller = time.test_control().ok_or("time provider is not a test clock")?;

    // weekly lease, monthly rent $1,300
    let lease = Lease::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Money::from_major(1300),
        RentCadence::Weekly,
        time.now().date_naive(),
    );
    let tenant = lease.tenant_id;
    println!("rent per week: ${}", lease.rent_per_period());

    let mut ledger = TenantLedger::new(lease, RentConfig::default())?;

    // one payment, the day before the second week falls due
    controller.advance(Duration::days(6));
    ledger.sync_periods_now(&time);
    let paid_on = time.now().date_naive();
    ledger.record_payment(Payment::rent(tenant, Money::from_major(300), paid_on))?;
    println!("paid ${} on {}", 300, paid_on);

    // then nothing for a month
    controller.advance(Duration::days(30));
    ledger.sync_periods_now(&time);
    let assessed = ledger.assess_late_fees_now(&time);
    println!("\nadvanced to {}", time.now().format("%Y-%m-%d"));
    println!("late fees assessed: ${}", assessed);

    let view = LatePaymentSummaryView::from_ledger(&ledger, time.now().date_naive());
    println!("\n{}", view.to_json_pretty()?);

    for event in ledger.events.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
