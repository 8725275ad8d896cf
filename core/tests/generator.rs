//! End-to-end runs of the daily generator against an in-memory store.

use chrono::NaiveDate;
use imara_core::{
    agent_provisioner::AgentProvisioner,
    config::GeneratorConfig,
    generator::{DailyGenerator, GenerationPlan},
    identity::{IdentitySequencer, NextIds},
    model::Agent,
    rng::RngBank,
    store::{EntityTable, InsureStore, MaxIds, StoreAccess},
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn fresh_store() -> InsureStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = InsureStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn plan(clients: u32) -> GenerationPlan {
    GenerationPlan {
        daily_new_clients: clients,
        max_policies_per_client: 2,
    }
}

#[test]
fn empty_store_gets_fallback_agent_and_clean_batch() {
    let mut store = fresh_store();
    let cfg = GeneratorConfig::default();

    let summary = DailyGenerator::new(&cfg, plan(3))
        .run(&mut store, &RngBank::new(42), today())
        .expect("run");

    assert_eq!(summary.agents_available, 1);
    assert_eq!(store.agent_ids().unwrap(), vec![1]);
    assert_eq!(summary.written.clients, 3);
    assert_eq!(summary.written.policies, summary.written.sales);
    assert!((3..=6).contains(&summary.written.policies));
    assert_eq!(summary.client_ids, Some(1..=3));

    assert_eq!(store.row_count(EntityTable::Clients).unwrap(), 3);
    assert_eq!(store.row_count(EntityTable::Policies).unwrap() as usize, summary.written.policies);
    assert_eq!(store.row_count(EntityTable::Sales).unwrap() as usize, summary.written.sales);

    let report = store.integrity_report().unwrap();
    assert!(report.is_clean(), "integrity problems: {report:?}");
}

#[test]
fn stored_commissions_match_premiums() {
    let mut store = fresh_store();
    let cfg = GeneratorConfig::default();
    DailyGenerator::new(&cfg, plan(25))
        .run(&mut store, &RngBank::new(5), today())
        .expect("run");

    let lines = store.commission_lines().unwrap();
    assert!(!lines.is_empty());
    for (premium, rate, commission) in lines {
        let expected = (premium * rate * 100.0).round() / 100.0;
        assert!((commission - expected).abs() < 1e-9, "{premium} × {rate} stored as {commission}");
    }
}

#[test]
fn consecutive_runs_continue_the_id_sequence() {
    let mut store = fresh_store();
    let cfg = GeneratorConfig::default();
    let generator = DailyGenerator::new(&cfg, plan(4));

    let first = generator.run(&mut store, &RngBank::new(1), today()).unwrap();
    let second = generator
        .run(&mut store, &RngBank::new(2), today().succ_opt().unwrap())
        .unwrap();

    let first_clients = first.client_ids.unwrap();
    let second_clients = second.client_ids.unwrap();
    assert_eq!(*second_clients.start(), first_clients.end() + 1);

    let first_policies = first.policy_ids.unwrap();
    let second_policies = second.policy_ids.unwrap();
    assert_eq!(*second_policies.start(), first_policies.end() + 1);

    let max = store.max_ids().unwrap();
    assert_eq!(max.clients, *second_clients.end());
    assert_eq!(max.sales, *second.sale_ids.unwrap().end());
    assert_eq!(store.agent_ids().unwrap(), vec![1]);
    assert!(store.integrity_report().unwrap().is_clean());
}

#[test]
fn existing_agents_are_used_unchanged() {
    let store = fresh_store();
    let cfg = GeneratorConfig::default();
    for id in [4, 9] {
        store
            .insert_agent(&Agent {
                agent_id: id,
                name: format!("Agent {id}"),
                hire_date: NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
                region: "Naivasha".into(),
                performance_tier: "High".into(),
            })
            .unwrap();
    }

    let ids = AgentProvisioner::new(&cfg).ensure(&store, today()).unwrap();
    assert_eq!(ids, vec![4, 9]);
    assert_eq!(store.row_count(EntityTable::Agents).unwrap(), 2);
}

#[test]
fn fallback_agent_uses_primary_region() {
    let store = fresh_store();
    let cfg = GeneratorConfig::default();
    let provisioner = AgentProvisioner::new(&cfg);

    assert_eq!(provisioner.ensure(&store, today()).unwrap(), vec![1]);
    let agent = provisioner.fallback_agent(today());
    assert_eq!(agent.name, "Fallback Agent");
    assert_eq!(agent.region, "Nakuru CBD");
    assert_eq!(agent.performance_tier, "Medium");
    assert_eq!(agent.hire_date, today());

    // A second call sees the inserted agent and writes nothing.
    assert_eq!(provisioner.ensure(&store, today()).unwrap(), vec![1]);
    assert_eq!(store.row_count(EntityTable::Agents).unwrap(), 1);
}

#[test]
fn sequencer_starts_at_one_on_empty_tables() {
    let store = fresh_store();
    let next = IdentitySequencer::next_ids(&store).unwrap();
    assert_eq!(next, NextIds::after(MaxIds::default()));
    assert_eq!(next.client, 1);
    assert_eq!(next.policy, 1);
    assert_eq!(next.sale, 1);
    assert_eq!(next.claim, 1);
    assert_eq!(next.agent, 1);
}

#[test]
fn same_seed_same_batch() {
    let cfg = GeneratorConfig::default();
    let generator = DailyGenerator::new(&cfg, plan(12));
    let run = |seed| {
        let mut next = NextIds::after(MaxIds::default());
        generator.generate_batch(&mut next, &[1, 2, 3], today(), &RngBank::new(seed))
    };

    assert_eq!(run(0xC0FFEE), run(0xC0FFEE));
    assert_ne!(run(0xC0FFEE), run(0xBEEF));
}

#[test]
fn failed_write_rolls_back_the_whole_batch() {
    let mut store = fresh_store();
    let cfg = GeneratorConfig::default();
    store
        .conn()
        .execute_batch(
            "CREATE TRIGGER reject_sales BEFORE INSERT ON sales
             BEGIN SELECT RAISE(ABORT, 'sales table locked'); END;",
        )
        .expect("install trigger");

    let err = DailyGenerator::new(&cfg, plan(3))
        .run(&mut store, &RngBank::new(42), today())
        .unwrap_err();

    assert!(err.to_string().contains("sales table locked"), "unexpected error: {err}");
    assert_eq!(store.row_count(EntityTable::Clients).unwrap(), 0);
    assert_eq!(store.row_count(EntityTable::Policies).unwrap(), 0);
    assert_eq!(store.row_count(EntityTable::Sales).unwrap(), 0);
    // The fallback agent is committed ahead of the batch and survives.
    assert_eq!(store.agent_ids().unwrap(), vec![1]);
}
