//! Identity sequencer — next-available ids per entity table.
//!
//! Read once per run, before anything is generated. Ids continue from
//! the store's current maximum; nothing is persisted between runs.
//! Concurrent runs against one store are not guarded (single writer).

use crate::{
    error::ImaraResult,
    store::{MaxIds, StoreAccess},
    types::{AgentId, ClaimId, ClientId, PolicyId, SaleId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextIds {
    pub client: ClientId,
    pub policy: PolicyId,
    pub sale: SaleId,
    pub claim: ClaimId,
    pub agent: AgentId,
}

impl NextIds {
    pub fn after(max: MaxIds) -> Self {
        Self {
            client: max.clients + 1,
            policy: max.policies + 1,
            sale: max.sales + 1,
            claim: max.claims + 1,
            agent: max.agents + 1,
        }
    }

    pub fn take_client(&mut self) -> ClientId {
        take(&mut self.client)
    }

    pub fn take_policy(&mut self) -> PolicyId {
        take(&mut self.policy)
    }

    pub fn take_sale(&mut self) -> SaleId {
        take(&mut self.sale)
    }
}

fn take(next: &mut i64) -> i64 {
    let id = *next;
    *next += 1;
    id
}

pub struct IdentitySequencer;

impl IdentitySequencer {
    pub fn next_ids<S: StoreAccess>(store: &S) -> ImaraResult<NextIds> {
        let max = store.max_ids()?;
        log::debug!(
            "sequencer: max ids clients={} policies={} sales={} claims={} agents={}",
            max.clients, max.policies, max.sales, max.claims, max.agents
        );
        Ok(NextIds::after(max))
    }
}
