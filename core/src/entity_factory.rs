//! Entity factory — fabricates clients, policies and sales.
//!
//! Pure: no I/O, no clock, no global RNG. The generation date and the
//! random source are supplied by the caller, so a fixed seed and date
//! always yield the same records.
//!
//! Derivation chain:
//!   client   → tier/age/region weighted lifetime value
//!   policy   → base premium × jitter × motor adjustments × tier multiplier
//!   sale     → premium × commission rate (renewal discount applied)

use crate::{
    config::GeneratorConfig,
    model::{
        round_to, Client, CoverageType, Gender, MotorDetails, Policy, PolicyStatus, PolicyType,
        Sale, TransactionType, UsageType,
    },
    name_generator::NameGenerator,
    rng::RandomSource,
    types::{AgentId, ClientId, PolicyId, SaleId},
};
use chrono::{Days, Months, NaiveDate};

pub struct EntityFactory<'a> {
    config: &'a GeneratorConfig,
    today: NaiveDate,
}

impl<'a> EntityFactory<'a> {
    pub fn new(config: &'a GeneratorConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    // ── Client ────────────────────────────────────────────────────

    pub fn generate_client<R: RandomSource>(&self, client_id: ClientId, rng: &mut R) -> Client {
        let cfg = &self.config.client;

        let gender = *rng.pick(Gender::ALL);
        let name = NameGenerator::full_name(gender, rng);
        let dob = self.sample_dob(rng);
        let age = self.today.years_since(dob).unwrap_or(0);

        let location = rng.weighted(&cfg.regions).clone();

        let tier_weights: Vec<f64> = cfg.tiers.iter().map(|t| t.weight).collect();
        let tier = &cfg.tiers[rng.weighted_index(&tier_weights)];

        let (ltv_low, ltv_high) = cfg.ltv_base_range;
        let mut ltv = rng.uniform(ltv_low, ltv_high) * tier.ltv_multiplier;
        if age >= cfg.senior_age {
            ltv *= cfg.senior_ltv_multiplier;
        }
        if location == cfg.primary_region() {
            ltv *= cfg.primary_region_ltv_multiplier;
        }

        let risk_profile = *rng.weighted(&cfg.risk_profiles);

        Client {
            client_id,
            name,
            dob,
            age,
            gender,
            location,
            join_date: self.today,
            tier: tier.tier,
            lifetime_value: round_to(ltv, 2),
            risk_profile,
        }
    }

    /// Uniform date of birth such that the age today falls in
    /// `[min_age, max_age]` inclusive.
    fn sample_dob<R: RandomSource>(&self, rng: &mut R) -> NaiveDate {
        let cfg = &self.config.client;
        let latest = years_before(self.today, cfg.min_age);
        let earliest = years_before(self.today, cfg.max_age + 1)
            .checked_add_days(Days::new(1))
            .unwrap_or(latest);
        let span = (latest - earliest).num_days().max(0);
        let offset = rng.range_inclusive(0, span) as u64;
        earliest.checked_add_days(Days::new(offset)).unwrap_or(latest)
    }

    // ── Policy ────────────────────────────────────────────────────

    pub fn generate_policy<R: RandomSource>(
        &self,
        policy_id: PolicyId,
        client_id: ClientId,
        agent_id: AgentId,
        rng: &mut R,
    ) -> Policy {
        let cfg = &self.config.policy;

        let policy_type = *rng.pick(&cfg.policy_types);
        let start_date = self.today;
        let end_date = start_date
            .checked_add_months(Months::new(12))
            .unwrap_or(start_date);

        let (jitter_low, jitter_high) = cfg.premium_jitter;
        let mut premium = cfg.base_premiums.get(policy_type) * rng.uniform(jitter_low, jitter_high);

        let motor = if policy_type == PolicyType::Motor {
            let details = self.sample_motor_details(rng);
            premium *= self.motor_multiplier(&details);
            Some(details)
        } else {
            None
        };

        premium *= *rng.weighted(&cfg.premium_tier_multipliers);

        let channel = rng.pick(&cfg.channels).clone();
        let payment_status = rng.pick(&cfg.payment_statuses).clone();
        let (risk_low, risk_high) = cfg.risk_score_range;
        let risk_score = round_to(rng.uniform(risk_low, risk_high), 3);

        Policy {
            policy_id,
            client_id,
            agent_id,
            policy_type,
            start_date,
            end_date,
            premium_amount: round_to(premium, 2),
            status: PolicyStatus::Active,
            channel,
            payment_status,
            risk_score,
            original_policy_id: None,
            renewal_number: 0,
            business_type: cfg.business_type.clone(),
            transaction_type: TransactionType::Individual,
            motor,
        }
    }

    fn sample_motor_details<R: RandomSource>(&self, rng: &mut R) -> MotorDetails {
        let cfg = &self.config.policy.motor;
        let coverage_type = if rng.chance(cfg.tpo_probability) {
            CoverageType::Tpo
        } else {
            CoverageType::Comprehensive
        };
        let (age_low, age_high) = cfg.vehicle_age_range;
        let vehicle_age = rng.range_inclusive(age_low as i64, age_high as i64) as u32;
        let usage_type = *rng.weighted(&cfg.usage_types);
        MotorDetails {
            coverage_type,
            vehicle_age,
            usage_type,
        }
    }

    /// Product of the independent motor adjustments.
    pub fn motor_multiplier(&self, details: &MotorDetails) -> f64 {
        let cfg = &self.config.policy.motor;
        let mut multiplier = 1.0;
        if details.coverage_type == CoverageType::Tpo {
            multiplier *= cfg.tpo_multiplier;
        }
        if details.usage_type == UsageType::Commercial {
            multiplier *= cfg.commercial_multiplier;
        }
        if details.vehicle_age > cfg.old_vehicle_age {
            multiplier *= cfg.old_vehicle_multiplier;
        }
        multiplier
    }

    // ── Sale ──────────────────────────────────────────────────────

    pub fn generate_sale<R: RandomSource>(
        &self,
        sale_id: SaleId,
        policy: &Policy,
        rng: &mut R,
    ) -> Sale {
        let commission_rate = self.commission_rate(policy.policy_type, policy.transaction_type);
        Sale {
            sale_id,
            policy_id: policy.policy_id,
            agent_id: policy.agent_id,
            commission_amount: round_to(policy.premium_amount * commission_rate, 2),
            sale_date: policy.start_date,
            commission_paid: rng.chance(self.config.sale.commission_paid_probability),
            policy_type: policy.policy_type,
            transaction_type: policy.transaction_type,
            business_type: policy.business_type.clone(),
            commission_rate,
        }
    }

    /// Stored commission rate (4 dp). Renewals earn the reduced rate.
    pub fn commission_rate(
        &self,
        policy_type: PolicyType,
        transaction_type: TransactionType,
    ) -> f64 {
        let cfg = &self.config.sale;
        let factor = match transaction_type {
            TransactionType::Renewal => cfg.renewal_rate_factor,
            TransactionType::Individual => 1.0,
        };
        round_to(cfg.base_commission_rates.get(policy_type) * factor, 4)
    }

    // ── Assignment ────────────────────────────────────────────────

    /// Number of policies to write for one new client, never more
    /// than `max_per_client` and never fewer than one.
    pub fn policy_count<R: RandomSource>(&self, max_per_client: u32, rng: &mut R) -> u32 {
        let drawn = *rng.weighted(&self.config.policy.policies_per_client);
        drawn.min(max_per_client).max(1)
    }

    pub fn pick_agent<R: RandomSource>(&self, agent_ids: &[AgentId], rng: &mut R) -> AgentId {
        *rng.pick(agent_ids)
    }
}

fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn dob_bounds_match_age_range() {
        let cfg = GeneratorConfig::default();
        let factory = EntityFactory::new(&cfg, today());

        let youngest = factory.sample_dob(&mut ScriptedRng::constant(0.999_999_9));
        assert_eq!(today().years_since(youngest), Some(20));

        let oldest = factory.sample_dob(&mut ScriptedRng::constant(0.0));
        assert_eq!(today().years_since(oldest), Some(75));
    }

    #[test]
    fn motor_multipliers_compose() {
        let cfg = GeneratorConfig::default();
        let factory = EntityFactory::new(&cfg, today());
        let details = MotorDetails {
            coverage_type: CoverageType::Tpo,
            vehicle_age: 11,
            usage_type: UsageType::Commercial,
        };
        let expected = 0.35 * 1.4 * 0.8;
        assert!((factory.motor_multiplier(&details) - expected).abs() < 1e-12);

        let plain = MotorDetails {
            coverage_type: CoverageType::Comprehensive,
            vehicle_age: 10,
            usage_type: UsageType::Private,
        };
        assert_eq!(factory.motor_multiplier(&plain), 1.0);
    }

    #[test]
    fn renewal_rate_is_discounted() {
        let cfg = GeneratorConfig::default();
        let factory = EntityFactory::new(&cfg, today());
        assert_eq!(factory.commission_rate(PolicyType::Motor, TransactionType::Individual), 0.15);
        assert_eq!(factory.commission_rate(PolicyType::Motor, TransactionType::Renewal), 0.105);
        assert_eq!(factory.commission_rate(PolicyType::Health, TransactionType::Renewal), 0.084);
    }

    #[test]
    fn policy_count_respects_cap() {
        let cfg = GeneratorConfig::default();
        let factory = EntityFactory::new(&cfg, today());
        // A roll in the top 20% selects two policies.
        assert_eq!(factory.policy_count(2, &mut ScriptedRng::constant(0.95)), 2);
        assert_eq!(factory.policy_count(1, &mut ScriptedRng::constant(0.95)), 1);
        assert_eq!(factory.policy_count(0, &mut ScriptedRng::constant(0.1)), 1);
    }
}
