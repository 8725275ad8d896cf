//! Immutable lookup tables for both pipelines.
//!
//! Nothing here reads the environment (see `settings.rs`). Components
//! receive a config at construction; tests build their own variants.

use crate::{
    model::{LoyaltyTier, PolicyType, RiskProfile, UsageType},
    types::AgentId,
};
use serde::{Deserialize, Serialize};

/// One value per policy type. Total by construction, so lookups
/// cannot miss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerPolicyType<T> {
    pub life: T,
    pub health: T,
    pub motor: T,
    pub property: T,
}

impl<T: Copy> PerPolicyType<T> {
    pub fn get(&self, policy_type: PolicyType) -> T {
        match policy_type {
            PolicyType::Life => self.life,
            PolicyType::Health => self.health,
            PolicyType::Motor => self.motor,
            PolicyType::Property => self.property,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    pub tier: LoyaltyTier,
    pub weight: f64,
    pub ltv_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// `(region, weight)`. The first entry is the primary region.
    pub regions: Vec<(String, f64)>,
    pub min_age: u32,
    pub max_age: u32,
    pub tiers: Vec<TierConfig>,
    pub ltv_base_range: (f64, f64),
    pub senior_age: u32,
    pub senior_ltv_multiplier: f64,
    pub primary_region_ltv_multiplier: f64,
    pub risk_profiles: Vec<(RiskProfile, f64)>,
}

impl ClientConfig {
    pub fn primary_region(&self) -> &str {
        self.regions
            .first()
            .map(|(r, _)| r.as_str())
            .unwrap_or("Unassigned")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotorConfig {
    pub tpo_probability: f64,
    pub tpo_multiplier: f64,
    pub vehicle_age_range: (u32, u32),
    /// Vehicles strictly older than this get `old_vehicle_multiplier`.
    pub old_vehicle_age: u32,
    pub old_vehicle_multiplier: f64,
    pub usage_types: Vec<(UsageType, f64)>,
    pub commercial_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub policy_types: Vec<PolicyType>,
    pub base_premiums: PerPolicyType<f64>,
    pub premium_jitter: (f64, f64),
    pub motor: MotorConfig,
    /// `(multiplier, weight)` applied after motor adjustments.
    pub premium_tier_multipliers: Vec<(f64, f64)>,
    pub channels: Vec<String>,
    pub payment_statuses: Vec<String>,
    pub risk_score_range: (f64, f64),
    pub business_type: String,
    /// `(policy count, weight)` drawn once per new client.
    pub policies_per_client: Vec<(u32, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleConfig {
    pub base_commission_rates: PerPolicyType<f64>,
    pub renewal_rate_factor: f64,
    pub commission_paid_probability: f64,
}

/// The agent inserted when the agents table is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackAgentConfig {
    pub agent_id: AgentId,
    pub name: String,
    pub performance_tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub client: ClientConfig,
    pub policy: PolicyConfig,
    pub sale: SaleConfig,
    pub fallback_agent: FallbackAgentConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let regions = [
            ("Nakuru CBD", 0.5),
            ("Gilgil", 0.15),
            ("Naivasha", 0.15),
            ("Molo", 0.1),
            ("Rongai", 0.1),
        ];

        let tiers = vec![
            TierConfig {
                tier: LoyaltyTier::Bronze,
                weight: 0.4,
                ltv_multiplier: 1.0,
            },
            TierConfig {
                tier: LoyaltyTier::Silver,
                weight: 0.35,
                ltv_multiplier: 2.0,
            },
            TierConfig {
                tier: LoyaltyTier::Gold,
                weight: 0.2,
                ltv_multiplier: 4.0,
            },
            TierConfig {
                tier: LoyaltyTier::Platinum,
                weight: 0.05,
                ltv_multiplier: 8.0,
            },
        ];

        Self {
            client: ClientConfig {
                regions: regions.iter().map(|(r, w)| (r.to_string(), *w)).collect(),
                min_age: 20,
                max_age: 75,
                tiers,
                ltv_base_range: (50_000.0, 150_000.0),
                senior_age: 50,
                senior_ltv_multiplier: 1.15,
                primary_region_ltv_multiplier: 1.2,
                risk_profiles: vec![
                    (RiskProfile::Low, 0.3),
                    (RiskProfile::Medium, 0.5),
                    (RiskProfile::High, 0.2),
                ],
            },
            policy: PolicyConfig {
                policy_types: PolicyType::ALL.to_vec(),
                base_premiums: PerPolicyType {
                    life: 80_000.0,
                    health: 35_000.0,
                    motor: 20_000.0,
                    property: 200_000.0,
                },
                premium_jitter: (0.8, 1.3),
                motor: MotorConfig {
                    tpo_probability: 0.7,
                    tpo_multiplier: 0.35,
                    vehicle_age_range: (1, 12),
                    old_vehicle_age: 10,
                    old_vehicle_multiplier: 0.8,
                    usage_types: vec![(UsageType::Private, 0.7), (UsageType::Commercial, 0.3)],
                    commercial_multiplier: 1.4,
                },
                premium_tier_multipliers: vec![(0.8, 0.4), (1.0, 0.35), (1.3, 0.2), (1.8, 0.05)],
                channels: ["Branch", "Phone", "Agent Visit", "Online", "Referral"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                payment_statuses: vec!["On-time".into(), "Late".into()],
                risk_score_range: (0.05, 0.4),
                business_type: "Individual".into(),
                policies_per_client: vec![(1, 0.8), (2, 0.2)],
            },
            sale: SaleConfig {
                base_commission_rates: PerPolicyType {
                    life: 0.20,
                    health: 0.12,
                    motor: 0.15,
                    property: 0.10,
                },
                renewal_rate_factor: 0.7,
                commission_paid_probability: 0.92,
            },
            fallback_agent: FallbackAgentConfig {
                agent_id: 1,
                name: "Fallback Agent".into(),
                performance_tier: "Medium".into(),
            },
        }
    }
}

/// Alerting parameters for the revenue monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Fractional day-over-day change that triggers an alert (0.10 = 10%).
    pub revenue_threshold: f64,
    pub company_name: String,
}

impl MonitorConfig {
    /// The threshold in percentage points, as compared against deltas.
    pub fn threshold_pct(&self) -> f64 {
        self.revenue_threshold * 100.0
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            revenue_threshold: 0.10,
            company_name: "Imara Insurance".into(),
        }
    }
}
