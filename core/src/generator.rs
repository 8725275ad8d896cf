//! Daily generator — one run of the synthetic data pipeline.
//!
//! RUN ORDER (fixed):
//!   1. Provision agents      (fallback agent committed on its own)
//!   2. Open the transaction
//!   3. Sequence ids          (max + 1 per table, read once)
//!   4. Generate              (per client: client → policies → sales)
//!   5. Batch write + commit  (all rows or none)

use crate::{
    agent_provisioner::AgentProvisioner,
    batch_writer::{BatchWriter, WriteCounts},
    config::GeneratorConfig,
    entity_factory::EntityFactory,
    error::ImaraResult,
    identity::{IdentitySequencer, NextIds},
    model::{Client, Policy, Sale},
    rng::{RngBank, StreamSlot},
    store::InsureStore,
    types::{AgentId, ClientId, PolicyId, SaleId},
};
use chrono::NaiveDate;
use std::ops::RangeInclusive;

/// Run-size knobs taken from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPlan {
    pub daily_new_clients: u32,
    pub max_policies_per_client: u32,
}

impl Default for GenerationPlan {
    fn default() -> Self {
        Self {
            daily_new_clients: 3,
            max_policies_per_client: 2,
        }
    }
}

/// Everything one run produces, in dependency order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedBatch {
    pub clients: Vec<Client>,
    pub policies: Vec<Policy>,
    pub sales: Vec<Sale>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub written: WriteCounts,
    pub client_ids: Option<RangeInclusive<ClientId>>,
    pub policy_ids: Option<RangeInclusive<PolicyId>>,
    pub sale_ids: Option<RangeInclusive<SaleId>>,
    pub agents_available: usize,
}

pub struct DailyGenerator<'a> {
    config: &'a GeneratorConfig,
    plan: GenerationPlan,
}

impl<'a> DailyGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig, plan: GenerationPlan) -> Self {
        Self { config, plan }
    }

    /// Generate without touching the store. Advances `next` past every
    /// id handed out.
    pub fn generate_batch(
        &self,
        next: &mut NextIds,
        agent_ids: &[AgentId],
        today: NaiveDate,
        rng_bank: &RngBank,
    ) -> GeneratedBatch {
        let factory = EntityFactory::new(self.config, today);
        let mut client_rng = rng_bank.for_stream(StreamSlot::Client);
        let mut policy_rng = rng_bank.for_stream(StreamSlot::Policy);
        let mut sale_rng = rng_bank.for_stream(StreamSlot::Sale);
        let mut assign_rng = rng_bank.for_stream(StreamSlot::Assignment);

        let mut batch = GeneratedBatch::default();
        for _ in 0..self.plan.daily_new_clients {
            let client = factory.generate_client(next.take_client(), &mut client_rng);

            let policy_count =
                factory.policy_count(self.plan.max_policies_per_client, &mut assign_rng);
            for _ in 0..policy_count {
                let agent_id = factory.pick_agent(agent_ids, &mut assign_rng);
                let policy = factory.generate_policy(
                    next.take_policy(),
                    client.client_id,
                    agent_id,
                    &mut policy_rng,
                );
                let sale = factory.generate_sale(next.take_sale(), &policy, &mut sale_rng);
                batch.policies.push(policy);
                batch.sales.push(sale);
            }
            batch.clients.push(client);
        }
        batch
    }

    pub fn run(
        &self,
        store: &mut InsureStore,
        rng_bank: &RngBank,
        today: NaiveDate,
    ) -> ImaraResult<GenerationSummary> {
        log::info!(
            "Starting data generation. DAILY_NEW_CLIENTS={} seed={}",
            self.plan.daily_new_clients,
            rng_bank.master_seed()
        );

        let agent_ids = AgentProvisioner::new(self.config).ensure(&*store, today)?;

        let tx = store.transaction()?;
        let mut next = IdentitySequencer::next_ids(&tx)?;
        let start = next;

        let batch = self.generate_batch(&mut next, &agent_ids, today, rng_bank);
        let written = BatchWriter::write(&tx, &batch.clients, &batch.policies, &batch.sales)?;
        tx.commit()?;

        log::info!(
            "Wrote {} clients, {} policies, {} sales",
            written.clients,
            written.policies,
            written.sales
        );

        Ok(GenerationSummary {
            written,
            client_ids: id_range(start.client, next.client),
            policy_ids: id_range(start.policy, next.policy),
            sale_ids: id_range(start.sale, next.sale),
            agents_available: agent_ids.len(),
        })
    }
}

fn id_range(first: i64, next: i64) -> Option<RangeInclusive<i64>> {
    (next > first).then(|| first..=next - 1)
}
