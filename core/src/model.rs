//! Entity records written by the generator and read by the monitor.
//!
//! Every record is create-only: nothing in this crate updates or
//! deletes a row once written.

use crate::types::{AgentId, ClientId, PolicyId, SaleId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Declares a closed string-valued enum with `as_str`, `Display` and
/// `FromStr`, using the exact spelling stored in the database.
macro_rules! stored_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// A stored string that does not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

stored_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

stored_enum!(
    /// Loyalty tier; drives the lifetime-value multiplier.
    LoyaltyTier {
        Bronze => "Bronze",
        Silver => "Silver",
        Gold => "Gold",
        Platinum => "Platinum",
    }
);

stored_enum!(RiskProfile {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

stored_enum!(PolicyType {
    Life => "Life",
    Health => "Health",
    Motor => "Motor",
    Property => "Property",
});

stored_enum!(CoverageType {
    Tpo => "TPO",
    Comprehensive => "Comprehensive",
});

stored_enum!(UsageType {
    Private => "Private",
    Commercial => "Commercial",
});

stored_enum!(
    /// New business is `Individual`; renewals are written by a
    /// separate process and carry the reduced commission rate.
    TransactionType {
        Individual => "Individual",
        Renewal => "Renewal",
    }
);

stored_enum!(
    /// Status of a newly written policy. Later states belong to the
    /// renewal process.
    PolicyStatus {
        Active => "Active",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: ClientId,
    pub name: String,
    pub dob: NaiveDate,
    pub age: u32,
    pub gender: Gender,
    pub location: String,
    pub join_date: NaiveDate,
    pub tier: LoyaltyTier,
    pub lifetime_value: f64,
    pub risk_profile: RiskProfile,
}

/// Attributes that exist only on Motor policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorDetails {
    pub coverage_type: CoverageType,
    pub vehicle_age: u32,
    pub usage_type: UsageType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: PolicyId,
    pub client_id: ClientId,
    pub agent_id: AgentId,
    pub policy_type: PolicyType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub premium_amount: f64,
    pub status: PolicyStatus,
    pub channel: String,
    pub payment_status: String,
    pub risk_score: f64,
    pub original_policy_id: Option<PolicyId>,
    pub renewal_number: u32,
    pub business_type: String,
    pub transaction_type: TransactionType,
    /// `Some` iff `policy_type == Motor`.
    pub motor: Option<MotorDetails>,
}

impl Policy {
    pub fn is_motor(&self) -> bool {
        self.policy_type == PolicyType::Motor
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: SaleId,
    pub policy_id: PolicyId,
    pub agent_id: AgentId,
    pub commission_amount: f64,
    pub sale_date: NaiveDate,
    pub commission_paid: bool,
    pub policy_type: PolicyType,
    pub transaction_type: TransactionType,
    pub business_type: String,
    pub commission_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: AgentId,
    pub name: String,
    pub hire_date: NaiveDate,
    pub region: String,
    pub performance_tier: String,
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_spelling_round_trips() {
        assert_eq!(CoverageType::Tpo.as_str(), "TPO");
        assert_eq!("TPO".parse::<CoverageType>().unwrap(), CoverageType::Tpo);
        for t in PolicyType::ALL {
            assert_eq!(t.as_str().parse::<PolicyType>().unwrap(), *t);
        }
    }

    #[test]
    fn unknown_variant_is_reported() {
        let err = "Boat".parse::<PolicyType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown PolicyType 'Boat'");
    }

    #[test]
    fn serde_uses_stored_spelling() {
        let json = serde_json::to_string(&CoverageType::Tpo).unwrap();
        assert_eq!(json, "\"TPO\"");
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(0.15, 4), 0.15);
    }
}
