/// quick start - minimal example to get started
use chrono::NaiveDate;
use rent_roll_rs::{Lease, Money, Payment, RentCadence, RentConfig, TenantLedger, Uuid};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let today = NaiveDate::from_ymd_opt(2024, 4, 1).ok_or("bad date")?;

    // a $1,200/month lease starting on jan 1
    let lease = Lease::new(Uuid::new_v4(), Uuid::new_v4(), Money::from_major(1200), RentCadence::Monthly, start);
    let tenant = lease.tenant_id;
    let mut ledger = TenantLedger::new(lease, RentConfig::default())?;

    // create the periods due so far
    ledger.sync_periods(today);

    // pay january on time
    let jan_3 = NaiveDate::from_ymd_opt(2024, 1, 3).ok_or("bad date")?;
    ledger.record_payment(Payment::rent(tenant, Money::from_major(1200), jan_3))?;

    // check where the tenant stands
    let summary = ledger.late_payment_summary(today);
    println!("late periods:      {}", summary.late_periods);
    println!("late fees:         ${}", summary.total_late_fees);
    println!("outstanding rent:  ${}", summary.total_outstanding);
    println!("total due:         ${}", summary.total_due);

    Ok(())
}
