use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::LateFeeSchedule;
use crate::decimal::Money;
use crate::types::RentCadence;

/// weeks per month, pre-rounded (52 / 12)
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);
/// fortnights per month, pre-rounded (52 / 24)
pub const FORTNIGHTS_PER_MONTH: Decimal = dec!(2.17);

/// periods of the given cadence in one month
pub fn periods_per_month(cadence: RentCadence) -> Decimal {
    match cadence {
        RentCadence::Weekly => WEEKS_PER_MONTH,
        RentCadence::BiWeekly => FORTNIGHTS_PER_MONTH,
        RentCadence::Monthly => Decimal::ONE,
    }
}

/// flat late fee for one missed period under the default schedule
pub fn late_fee_amount(cadence: RentCadence) -> Money {
    LateFeeSchedule::default().fee_for(cadence)
}

/// late fee for a raw, possibly unnormalized cadence string
pub fn late_fee_amount_for(raw_cadence: &str) -> Money {
    late_fee_amount(RentCadence::normalize(raw_cadence))
}

/// due date `n` periods after `date`
///
/// Monthly advance keeps the day of month and clamps to the last day of the
/// target month when that day does not exist (Jan 31 + 1 month is Feb 28/29).
/// Callers always advance from the lease start rather than chaining, so a
/// start on the 31st returns to the 31st in long months.
/// Returns `None` only when the result is outside chrono's date range.
pub fn period_advance(date: NaiveDate, cadence: RentCadence, n: u32) -> Option<NaiveDate> {
    match cadence {
        RentCadence::Weekly => date.checked_add_signed(Duration::days(7 * n as i64)),
        RentCadence::BiWeekly => date.checked_add_signed(Duration::days(14 * n as i64)),
        RentCadence::Monthly => date.checked_add_months(Months::new(n)),
    }
}

/// monthly equivalent of a per-period rent
pub fn normalize_rent_to_monthly(amount: Money, cadence: RentCadence) -> Money {
    amount * periods_per_month(cadence)
}

/// per-period rent from a monthly rent (inverse of `normalize_rent_to_monthly`)
pub fn rent_per_period(monthly_rent: Money, cadence: RentCadence) -> Money {
    monthly_rent / periods_per_month(cadence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_late_fee_amounts() {
        assert_eq!(late_fee_amount(RentCadence::Weekly), Money::from_major(10));
        assert_eq!(late_fee_amount(RentCadence::BiWeekly), Money::from_major(20));
        assert_eq!(late_fee_amount(RentCadence::Monthly), Money::from_major(45));
        assert_eq!(late_fee_amount_for("bi-weekly"), Money::from_major(20));
        assert_eq!(late_fee_amount_for("yearly"), Money::from_major(45));
        assert_eq!(late_fee_amount_for(""), Money::from_major(45));
    }

    #[test]
    fn test_weekly_and_biweekly_advance() {
        let start = date(2024, 1, 1);
        assert_eq!(period_advance(start, RentCadence::Weekly, 0), Some(start));
        assert_eq!(period_advance(start, RentCadence::Weekly, 3), Some(date(2024, 1, 22)));
        assert_eq!(period_advance(start, RentCadence::BiWeekly, 2), Some(date(2024, 1, 29)));
    }

    #[test]
    fn test_monthly_advance_clamps_to_month_end() {
        let start = date(2024, 1, 31);
        assert_eq!(period_advance(start, RentCadence::Monthly, 1), Some(date(2024, 2, 29)));
        assert_eq!(period_advance(start, RentCadence::Monthly, 2), Some(date(2024, 3, 31)));
        assert_eq!(period_advance(start, RentCadence::Monthly, 3), Some(date(2024, 4, 30)));
        assert_eq!(period_advance(date(2023, 1, 31), RentCadence::Monthly, 1), Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_normalize_rent_to_monthly() {
        let weekly = normalize_rent_to_monthly(Money::from_major(300), RentCadence::Weekly);
        assert_eq!(weekly, Money::from_major(1299));

        let biweekly = normalize_rent_to_monthly(Money::from_major(600), RentCadence::BiWeekly);
        assert_eq!(biweekly, Money::from_major(1302));

        let monthly = normalize_rent_to_monthly(Money::from_major(1200), RentCadence::Monthly);
        assert_eq!(monthly, Money::from_major(1200));
    }

    #[test]
    fn test_rent_per_period() {
        let weekly = rent_per_period(Money::from_major(1200), RentCadence::Weekly);
        assert_eq!(weekly, Money::from_str_exact("277.14").unwrap());

        let biweekly = rent_per_period(Money::from_major(1200), RentCadence::BiWeekly);
        assert_eq!(biweekly, Money::from_major(553));
    }

    #[test]
    fn test_round_trip_within_a_cent() {
        for cadence in [RentCadence::Weekly, RentCadence::BiWeekly] {
            let rent = Money::from_str_exact("287.65").unwrap();
            let monthly = normalize_rent_to_monthly(rent, cadence);
            let back = rent_per_period(monthly, cadence);
            assert!((back - rent).abs() <= Money::CENT, "{} round trip drifted", cadence);
        }
    }
}
