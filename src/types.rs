use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a lease
pub type LeaseId = Uuid;
/// unique identifier for a tenant
pub type TenantId = Uuid;
/// unique identifier for a property
pub type PropertyId = Uuid;
/// unique identifier for a recorded payment
pub type PaymentId = Uuid;
/// unique identifier for a persisted rent period
pub type RentPeriodId = Uuid;

/// how often rent falls due
///
/// Deserialization accepts any spelling the database may hold
/// (`"Bi-Weekly"`, `"biweekly"`, `" monthly "`) and falls back to
/// `Monthly` for anything unrecognized. Serialization always writes the
/// canonical snake_case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RentCadence {
    Weekly,
    BiWeekly,
    #[default]
    Monthly,
}

impl RentCadence {
    pub const ALL: [RentCadence; 3] = [RentCadence::Weekly, RentCadence::BiWeekly, RentCadence::Monthly];

    /// normalize a raw cadence string, defaulting to monthly
    pub fn normalize(raw: &str) -> Self {
        let cleaned: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();

        match cleaned.as_str() {
            "weekly" => RentCadence::Weekly,
            "biweekly" => RentCadence::BiWeekly,
            _ => RentCadence::Monthly,
        }
    }

    /// canonical tag as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            RentCadence::Weekly => "weekly",
            RentCadence::BiWeekly => "bi_weekly",
            RentCadence::Monthly => "monthly",
        }
    }
}

impl From<&str> for RentCadence {
    fn from(raw: &str) -> Self {
        RentCadence::normalize(raw)
    }
}

impl From<String> for RentCadence {
    fn from(raw: String) -> Self {
        RentCadence::normalize(&raw)
    }
}

impl fmt::Display for RentCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// lease lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LeaseStatus {
    /// signed and in force
    Active,
    /// not yet in force, or status unknown
    #[default]
    Pending,
    /// term ended
    Expired,
    /// tenant moved out
    Vacant,
    /// ended early
    Terminated,
}

impl LeaseStatus {
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => LeaseStatus::Active,
            "expired" => LeaseStatus::Expired,
            "vacant" => LeaseStatus::Vacant,
            "terminated" => LeaseStatus::Terminated,
            _ => LeaseStatus::Pending,
        }
    }
}

impl From<String> for LeaseStatus {
    fn from(raw: String) -> Self {
        LeaseStatus::normalize(&raw)
    }
}

/// rent-paid status of a single period
///
/// A pure function of `amount_paid` against `rent_amount`; late fees never
/// move a period between these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RentPeriodStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

/// what a payment was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum PaymentType {
    #[default]
    Rent,
    Other,
}

impl From<String> for PaymentType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rent" => PaymentType::Rent,
            _ => PaymentType::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_spellings() {
        assert_eq!(RentCadence::normalize("weekly"), RentCadence::Weekly);
        assert_eq!(RentCadence::normalize("  WEEKLY "), RentCadence::Weekly);
        assert_eq!(RentCadence::normalize("bi-weekly"), RentCadence::BiWeekly);
        assert_eq!(RentCadence::normalize("biweekly"), RentCadence::BiWeekly);
        assert_eq!(RentCadence::normalize("Bi_Weekly"), RentCadence::BiWeekly);
        assert_eq!(RentCadence::normalize("monthly"), RentCadence::Monthly);
    }

    #[test]
    fn test_unknown_cadence_is_monthly() {
        assert_eq!(RentCadence::normalize(""), RentCadence::Monthly);
        assert_eq!(RentCadence::normalize("quarterly"), RentCadence::Monthly);
    }

    #[test]
    fn test_cadence_serde() {
        let c: RentCadence = serde_json::from_str("\"Bi-Weekly\"").unwrap();
        assert_eq!(c, RentCadence::BiWeekly);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"bi_weekly\"");
    }

    #[test]
    fn test_lease_status_normalize() {
        assert_eq!(LeaseStatus::normalize("Active"), LeaseStatus::Active);
        assert_eq!(LeaseStatus::normalize("something"), LeaseStatus::Pending);
        let s: LeaseStatus = serde_json::from_str("\"vacant\"").unwrap();
        assert_eq!(s, LeaseStatus::Vacant);
    }

    #[test]
    fn test_payment_type() {
        let t: PaymentType = serde_json::from_str("\"RENT\"").unwrap();
        assert_eq!(t, PaymentType::Rent);
        let t: PaymentType = serde_json::from_str("\"deposit\"").unwrap();
        assert_eq!(t, PaymentType::Other);
    }
}
