//! Agent provisioner — guarantees at least one agent exists.
//!
//! When the agents table is empty a single fallback agent is written
//! straight away, outside the generator's batch, so policies can
//! reference it. Two racing processes against an empty table could
//! both insert the fixed id; only at-most-once per process holds.

use crate::{
    config::GeneratorConfig,
    error::ImaraResult,
    model::Agent,
    store::StoreAccess,
    types::AgentId,
};
use chrono::NaiveDate;

pub struct AgentProvisioner<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> AgentProvisioner<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// The fallback agent this provisioner would insert on `today`.
    pub fn fallback_agent(&self, today: NaiveDate) -> Agent {
        let fallback = &self.config.fallback_agent;
        Agent {
            agent_id: fallback.agent_id,
            name: fallback.name.clone(),
            hire_date: today,
            region: self.config.client.primary_region().to_string(),
            performance_tier: fallback.performance_tier.clone(),
        }
    }

    /// Existing agent ids, or the fallback agent's id after inserting it.
    pub fn ensure<S: StoreAccess>(&self, store: &S, today: NaiveDate) -> ImaraResult<Vec<AgentId>> {
        let existing = store.agent_ids()?;
        if !existing.is_empty() {
            return Ok(existing);
        }
        let agent = self.fallback_agent(today);
        log::warn!(
            "No agents found in store. Creating a fallback agent (AgentID={}).",
            agent.agent_id
        );
        store.insert_agent(&agent)?;
        Ok(vec![agent.agent_id])
    }
}
