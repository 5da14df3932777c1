use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::decimal::Money;
use crate::errors::{RentError, Result};
use crate::types::RentCadence;

/// days after the due date during which a payment is still on time
pub const DEFAULT_GRACE_PERIOD_DAYS: u32 = 5;
/// days before the due date a payment still counts toward that period
pub const DEFAULT_EARLY_PAYMENT_TOLERANCE_DAYS: u32 = 2;
/// how many past periods the late-payment summary looks at
pub const DEFAULT_LOOKBACK_PERIODS: u32 = 12;
/// hard cap on periods walked from lease start before giving up
pub const DEFAULT_MAX_PERIOD_SCAN: u32 = 5000;

/// flat late fee per missed period, by cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFeeSchedule {
    pub weekly: Money,
    pub bi_weekly: Money,
    pub monthly: Money,
}

impl LateFeeSchedule {
    pub fn fee_for(&self, cadence: RentCadence) -> Money {
        match cadence {
            RentCadence::Weekly => self.weekly,
            RentCadence::BiWeekly => self.bi_weekly,
            RentCadence::Monthly => self.monthly,
        }
    }
}

impl Default for LateFeeSchedule {
    fn default() -> Self {
        Self {
            weekly: Money::from_major(10),
            bi_weekly: Money::from_major(20),
            monthly: Money::from_major(45),
        }
    }
}

/// rent calculation configuration
///
/// Built once at startup (from defaults, JSON, or the environment) and
/// handed to every engine. There is exactly one calculation path; nothing
/// here switches behaviour per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentConfig {
    pub grace_period_days: u32,
    pub early_payment_tolerance_days: u32,
    pub lookback_periods: u32,
    pub max_period_scan: u32,
    pub late_fees: LateFeeSchedule,
}

impl Default for RentConfig {
    fn default() -> Self {
        Self {
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            early_payment_tolerance_days: DEFAULT_EARLY_PAYMENT_TOLERANCE_DAYS,
            lookback_periods: DEFAULT_LOOKBACK_PERIODS,
            max_period_scan: DEFAULT_MAX_PERIOD_SCAN,
            late_fees: LateFeeSchedule::default(),
        }
    }
}

impl RentConfig {
    /// Create from environment variables, keeping defaults for unset ones
    /// - RENT_GRACE_PERIOD_DAYS
    /// - RENT_EARLY_PAYMENT_TOLERANCE_DAYS
    /// - RENT_LOOKBACK_PERIODS
    /// - RENT_MAX_PERIOD_SCAN
    /// - RENT_LATE_FEE_WEEKLY / RENT_LATE_FEE_BI_WEEKLY / RENT_LATE_FEE_MONTHLY
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// build from an arbitrary key lookup (environment, settings map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("RENT_GRACE_PERIOD_DAYS") {
            config.grace_period_days = parse_setting("RENT_GRACE_PERIOD_DAYS", &v)?;
        }
        if let Some(v) = lookup("RENT_EARLY_PAYMENT_TOLERANCE_DAYS") {
            config.early_payment_tolerance_days = parse_setting("RENT_EARLY_PAYMENT_TOLERANCE_DAYS", &v)?;
        }
        if let Some(v) = lookup("RENT_LOOKBACK_PERIODS") {
            config.lookback_periods = parse_setting("RENT_LOOKBACK_PERIODS", &v)?;
        }
        if let Some(v) = lookup("RENT_MAX_PERIOD_SCAN") {
            config.max_period_scan = parse_setting("RENT_MAX_PERIOD_SCAN", &v)?;
        }
        if let Some(v) = lookup("RENT_LATE_FEE_WEEKLY") {
            config.late_fees.weekly = parse_setting("RENT_LATE_FEE_WEEKLY", &v)?;
        }
        if let Some(v) = lookup("RENT_LATE_FEE_BI_WEEKLY") {
            config.late_fees.bi_weekly = parse_setting("RENT_LATE_FEE_BI_WEEKLY", &v)?;
        }
        if let Some(v) = lookup("RENT_LATE_FEE_MONTHLY") {
            config.late_fees.monthly = parse_setting("RENT_LATE_FEE_MONTHLY", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// parse from a json document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| RentError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_period_scan == 0 {
            return Err(RentError::InvalidConfiguration {
                message: "max_period_scan must be at least 1".to_string(),
            });
        }

        for cadence in RentCadence::ALL {
            let fee = self.late_fees.fee_for(cadence);
            if fee.is_negative() {
                return Err(RentError::InvalidConfiguration {
                    message: format!("late fee for {} cannot be negative: {}", cadence, fee),
                });
            }
        }

        Ok(())
    }
}

fn parse_setting<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| RentError::InvalidConfiguration {
        message: format!("{} has unparsable value {:?}", key, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RentConfig::default();
        assert_eq!(config.grace_period_days, 5);
        assert_eq!(config.early_payment_tolerance_days, 2);
        assert_eq!(config.lookback_periods, 12);
        assert_eq!(config.late_fees.fee_for(RentCadence::Weekly), Money::from_major(10));
        assert_eq!(config.late_fees.fee_for(RentCadence::BiWeekly), Money::from_major(20));
        assert_eq!(config.late_fees.fee_for(RentCadence::Monthly), Money::from_major(45));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RENT_GRACE_PERIOD_DAYS", "3"),
            ("RENT_LATE_FEE_MONTHLY", "50.00"),
        ]
        .into_iter()
        .collect();

        let config = RentConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.grace_period_days, 3);
        assert_eq!(config.late_fees.monthly, Money::from_major(50));
        assert_eq!(config.late_fees.weekly, Money::from_major(10));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = RentConfig::from_lookup(|k| {
            (k == "RENT_LOOKBACK_PERIODS").then(|| "twelve".to_string())
        });
        assert!(matches!(result, Err(RentError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let result = RentConfig::from_lookup(|k| {
            (k == "RENT_LATE_FEE_WEEKLY").then(|| "-1".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = RentConfig::from_json(r#"{"grace_period_days": 7}"#).unwrap();
        assert_eq!(config.grace_period_days, 7);
        assert_eq!(config.lookback_periods, 12);
    }
}
