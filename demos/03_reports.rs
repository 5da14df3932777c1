/// reports - rent roll and per-property profit across many tenants
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use rent_roll_rs::{
    Expense, Lease, LedgerBook, Money, Payment, ProfitReport, RentCadence, RentConfig, RentRoll,
    ReportRange, Uuid,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("bad date {}-{}-{}", y, m, d).into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("=== reports example ===\n");

    // configuration can come from RENT_* environment variables
    let config = RentConfig::from_env()?;
    let book = Arc::new(LedgerBook::new(config)?);

    let property = Uuid::new_v4();
    let start = date(2024, 1, 1)?;
    let leases = vec![
        Lease::new(Uuid::new_v4(), property, Money::from_major(1200), RentCadence::Monthly, start),
        Lease::new(Uuid::new_v4(), property, Money::from_major(1100), RentCadence::BiWeekly, start),
        Lease::new(Uuid::new_v4(), property, Money::from_major(950), RentCadence::Weekly, start),
    ];
    for lease in &leases {
        book.open(lease.clone())?;
    }
    book.sync_all(date(2024, 3, 31)?);

    let roll = RentRoll::from_leases(&leases);
    println!("rent roll:");
    for entry in &roll.entries {
        println!(
            "  {:<9} ${:>8} per period  ${:>8} per month",
            entry.rent_cadence, entry.rent_per_period, entry.monthly_equivalent
        );
    }
    println!("  expected monthly income: ${}\n", roll.total_monthly_income);

    // tenants pay from different threads; each tenant's ledger is locked on its own
    let paid_on = date(2024, 3, 31)?;
    let handles: Vec<_> = leases
        .iter()
        .map(|lease| {
            let book = Arc::clone(&book);
            let tenant = lease.tenant_id;
            let amount = lease.rent * rent_roll_rs::Decimal::from(3);
            thread::spawn(move || book.record_payment(Payment::rent(tenant, amount, paid_on)))
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "payment thread panicked")??;
    }

    let expenses = vec![
        Expense::new(property, Money::from_major(450), date(2024, 2, 12)?, "plumbing"),
        Expense::new(property, Money::from_major(120), date(2024, 3, 3)?, "landscaping"),
    ];

    let mut report = ProfitReport::new(property, ReportRange::new(start, date(2024, 3, 31)?)?);
    for tenant in book.tenants() {
        let ledger = book.ledger(tenant)?;
        report.add_ledger(&ledger.lock());
    }
    report.add_expenses(&expenses);

    println!("profit report {} to {}:", report.range.from, report.range.to);
    println!("  rent collected:      ${}", report.rent_collected);
    println!("  late fees collected: ${}", report.late_fees_collected);
    println!("  expenses:            ${}", report.expenses);
    println!("  net profit:          ${}", report.net_profit);

    Ok(())
}
