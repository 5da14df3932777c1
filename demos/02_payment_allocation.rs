/// payment allocation - oldest first, grace waivers, prepayment and reversal
use chrono::NaiveDate;
use rent_roll_rs::{
    AllocationView, Lease, Money, Payment, RentCadence, RentConfig, TenantLedger, Uuid,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("bad date {}-{}-{}", y, m, d).into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== payment allocation example ===\n");

    let lease = Lease::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Money::from_major(1200),
        RentCadence::Monthly,
        date(2024, 1, 1)?,
    );
    let tenant = lease.tenant_id;
    let mut ledger = TenantLedger::new(lease, RentConfig::default())?;

    // periods through march, then assess as of jan 10 when only jan is past grace
    ledger.sync_periods(date(2024, 3, 1)?);
    let fees = ledger.assess_late_fees(date(2024, 1, 10)?);
    println!("late fees assessed: ${}", fees);

    // feb's fee is assessed as of the payment date, so the payment covers jan
    // and feb with their fees and prepays part of march
    let payment = Payment::rent(tenant, Money::from_major(3000), date(2024, 2, 10)?);
    let payment_id = payment.id;
    let result = ledger.record_payment(payment)?;
    println!("{}", AllocationView::from_result(&result).to_json_pretty()?);

    println!("\noutstanding rent after payment: ${}", ledger.outstanding_rent());
    println!("outstanding late fees:          ${}", ledger.outstanding_late_fees());

    // the payment bounces
    let reversal = ledger.reverse_payment(payment_id)?;
    println!("\nreversed: ${} rent, ${} late fees", reversal.rent_restored, reversal.late_fees_restored);
    println!("outstanding rent after reversal: ${}", ledger.outstanding_rent());

    // reversing again changes nothing
    let again = ledger.reverse_payment(payment_id)?;
    println!("second reversal was a no-op: {}", again.is_noop());

    Ok(())
}
