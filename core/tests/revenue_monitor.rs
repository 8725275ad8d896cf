//! Revenue monitor: threshold decisions and the degraded paths of a run.

use chrono::NaiveDate;
use imara_core::{
    agent_provisioner::AgentProvisioner,
    batch_writer::BatchWriter,
    change_evaluator::ChangeEvaluator,
    config::{GeneratorConfig, MonitorConfig},
    dispatcher::{DispatchOutcome, MailRoute, MailTransport, OutgoingMail},
    entity_factory::EntityFactory,
    error::{ImaraError, ImaraResult},
    monitor::RevenueMonitor,
    revenue_reader::{DayFigure, RevenueSnapshot, RevenueSnapshotReader},
    rng::{RngBank, StreamSlot},
    store::InsureStore,
    summarizer::{Narrative, TextGenerator, KEY_NOT_CONFIGURED},
};
use std::cell::RefCell;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn yesterday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 13).unwrap()
}

fn snapshot(premium: (f64, f64), commission: (f64, f64)) -> RevenueSnapshot {
    let figure = |total| DayFigure { total, count: 1 };
    RevenueSnapshot {
        today: today(),
        yesterday: yesterday(),
        premium_today: figure(premium.0),
        premium_yesterday: figure(premium.1),
        commission_today: figure(commission.0),
        commission_yesterday: figure(commission.1),
    }
}

/// Writes one policy and its sale per `(day, premium, commission)`.
fn seeded_store(rows: &[(NaiveDate, f64, f64)]) -> InsureStore {
    let store = InsureStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let cfg = GeneratorConfig::default();
    AgentProvisioner::new(&cfg).ensure(&store, today()).unwrap();

    let bank = RngBank::new(11);
    let mut rng = bank.for_stream(StreamSlot::Policy);
    let mut clients = Vec::new();
    let mut policies = Vec::new();
    let mut sales = Vec::new();
    for (i, &(day, premium, commission)) in rows.iter().enumerate() {
        let id = i as i64 + 1;
        let factory = EntityFactory::new(&cfg, day);
        clients.push(factory.generate_client(id, &mut rng));
        let mut policy = factory.generate_policy(id, id, 1, &mut rng);
        policy.premium_amount = premium;
        let mut sale = factory.generate_sale(id, &policy, &mut rng);
        sale.commission_amount = commission;
        policies.push(policy);
        sales.push(sale);
    }
    BatchWriter::write(&store, &clients, &policies, &sales).unwrap();
    store
}

struct FixedText(Result<String, String>);

impl FixedText {
    fn ok(text: &str) -> Self {
        Self(Ok(text.to_string()))
    }

    fn failing(message: &str) -> Self {
        Self(Err(message.to_string()))
    }
}

impl TextGenerator for FixedText {
    fn complete(&self, _prompt: &str) -> ImaraResult<String> {
        self.0.clone().map_err(ImaraError::UnexpectedResponse)
    }
}

struct Unconfigured;

impl TextGenerator for Unconfigured {
    fn complete(&self, _prompt: &str) -> ImaraResult<String> {
        panic!("an unconfigured generator must not be called");
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: RefCell<Vec<OutgoingMail>>,
    fail: bool,
}

impl MailTransport for &RecordingMailer {
    fn send(&self, mail: &OutgoingMail) -> ImaraResult<()> {
        if self.fail {
            return Err(ImaraError::Mail("connection refused".into()));
        }
        self.sent.borrow_mut().push(mail.clone());
        Ok(())
    }
}

fn route(mailer: &RecordingMailer) -> Option<MailRoute<&RecordingMailer>> {
    Some(MailRoute {
        transport: mailer,
        sender: "alerts@imara.test".into(),
    })
}

// ── Change evaluation ─────────────────────────────────────────────

#[test]
fn ten_percent_exactly_does_not_alert() {
    let evaluator = ChangeEvaluator::new(&MonitorConfig::default());
    let decision = evaluator.evaluate(&snapshot((110_000.0, 100_000.0), (5_000.0, 5_000.0)));
    assert_eq!(decision.premium_change_pct, 10.0);
    assert!(!decision.should_alert);
    assert!(decision.reasons.is_empty());
}

#[test]
fn twenty_percent_drop_alerts() {
    let evaluator = ChangeEvaluator::new(&MonitorConfig::default());
    let decision = evaluator.evaluate(&snapshot((80_000.0, 100_000.0), (5_000.0, 5_000.0)));
    assert_eq!(decision.premium_change_pct, -20.0);
    assert!(decision.should_alert);
    assert_eq!(decision.reasons, vec!["Premium revenue decreased by 20.0%"]);
}

#[test]
fn both_metrics_can_alert_together() {
    let evaluator = ChangeEvaluator::new(&MonitorConfig::default());
    let decision = evaluator.evaluate(&snapshot((130_000.0, 100_000.0), (4_000.0, 5_000.0)));
    assert_eq!(
        decision.reasons,
        vec![
            "Premium revenue increased by 30.0%",
            "Commission revenue decreased by 20.0%",
        ]
    );
}

#[test]
fn zero_yesterday_never_alerts() {
    let evaluator = ChangeEvaluator::new(&MonitorConfig::default());
    let decision = evaluator.evaluate(&snapshot((5_000.0, 0.0), (500.0, 0.0)));
    assert_eq!(decision.premium_change_pct, 0.0);
    assert_eq!(decision.commission_change_pct, 0.0);
    assert!(!decision.should_alert);
}

// ── Snapshot reading ──────────────────────────────────────────────

#[test]
fn snapshot_sums_by_day_and_ignores_other_days() {
    let store = seeded_store(&[
        (today(), 60_000.0, 6_000.0),
        (today(), 20_000.0, 2_000.0),
        (yesterday(), 100_000.0, 10_000.0),
        (NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(), 999_999.0, 99_999.0),
    ]);

    let snap = RevenueSnapshotReader::read(&store, today()).unwrap();
    assert_eq!(snap.yesterday, yesterday());
    assert_eq!(snap.premium_today, DayFigure { total: 80_000.0, count: 2 });
    assert_eq!(snap.premium_yesterday, DayFigure { total: 100_000.0, count: 1 });
    assert_eq!(snap.commission_today, DayFigure { total: 8_000.0, count: 2 });
    assert_eq!(snap.commission_yesterday, DayFigure { total: 10_000.0, count: 1 });
}

#[test]
fn empty_days_read_as_zero() {
    let store = seeded_store(&[]);
    let snap = RevenueSnapshotReader::read(&store, today()).unwrap();
    assert_eq!(snap.premium_today, DayFigure::default());
    assert_eq!(snap.commission_yesterday, DayFigure::default());
}

// ── Full runs ─────────────────────────────────────────────────────

#[test]
fn quiet_day_prints_summary_lines() {
    let store = seeded_store(&[(today(), 105_000.0, 10_000.0), (yesterday(), 100_000.0, 10_000.0)]);
    let mailer = RecordingMailer::default();
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        FixedText::ok("unused"),
        route(&mailer),
        "ceo@imara.test",
    );

    let mut console = Vec::new();
    let outcome = monitor.run(&store, today(), &mut console).unwrap();
    let text = String::from_utf8(console).unwrap();

    assert!(!outcome.decision.should_alert);
    assert_eq!(outcome.narrative, Narrative::Skipped);
    assert_eq!(outcome.dispatch, None);
    assert!(text.contains("No alerts triggered today"));
    assert!(text.contains("Premium change: +5.0%"));
    assert!(text.contains("Commission change: +0.0%"));
    assert!(text.contains("Threshold: ±10.0%"));
    assert!(mailer.sent.borrow().is_empty());
}

#[test]
fn alert_is_emailed_with_narrative() {
    let store = seeded_store(&[(today(), 80_000.0, 10_000.0), (yesterday(), 100_000.0, 10_000.0)]);
    let mailer = RecordingMailer::default();
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        FixedText::ok("  Motor sales slowed after the holiday.  "),
        route(&mailer),
        "ceo@imara.test",
    );

    let mut console = Vec::new();
    let outcome = monitor.run(&store, today(), &mut console).unwrap();

    assert_eq!(
        outcome.dispatch,
        Some(DispatchOutcome::Sent {
            recipient: "ceo@imara.test".into()
        })
    );
    assert_eq!(
        outcome.narrative,
        Narrative::Generated("Motor sales slowed after the holiday.".into())
    );
    let sent = mailer.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, "alerts@imara.test");
    assert_eq!(sent[0].to, "ceo@imara.test");
    assert_eq!(sent[0].subject, "Insurance Revenue Alert - 2026-10-14");
    assert!(sent[0].html_body.contains("Premium revenue decreased by 20.0%"));
    assert!(sent[0].html_body.contains("Motor sales slowed after the holiday."));
    assert!(console.is_empty());
}

#[test]
fn failed_text_service_still_alerts() {
    let store = seeded_store(&[(today(), 80_000.0, 10_000.0), (yesterday(), 100_000.0, 10_000.0)]);
    let mailer = RecordingMailer::default();
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        FixedText::failing("quota exceeded"),
        route(&mailer),
        "ceo@imara.test",
    );

    let outcome = monitor.run(&store, today(), &mut Vec::new()).unwrap();
    assert!(outcome.narrative.is_degraded());
    assert!(outcome.narrative.text().starts_with("AI analysis error:"));
    assert!(outcome.narrative.text().contains("quota exceeded"));
    assert!(matches!(outcome.dispatch, Some(DispatchOutcome::Sent { .. })));
}

#[test]
fn unconfigured_key_uses_placeholder_text() {
    let store = seeded_store(&[(today(), 80_000.0, 10_000.0), (yesterday(), 100_000.0, 10_000.0)]);
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        Unconfigured,
        None::<MailRoute<&RecordingMailer>>,
        "ceo@imara.test",
    );

    let outcome = monitor.run(&store, today(), &mut Vec::new()).unwrap();
    assert_eq!(outcome.narrative, Narrative::Degraded(KEY_NOT_CONFIGURED.into()));
}

#[test]
fn failed_send_falls_back_to_console() {
    let store = seeded_store(&[(today(), 80_000.0, 10_000.0), (yesterday(), 100_000.0, 10_000.0)]);
    let mailer = RecordingMailer {
        fail: true,
        ..Default::default()
    };
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        FixedText::ok("Premiums dipped."),
        route(&mailer),
        "ceo@imara.test",
    );

    let mut console = Vec::new();
    let outcome = monitor.run(&store, today(), &mut console).unwrap();
    let text = String::from_utf8(console).unwrap();

    assert!(matches!(
        outcome.dispatch,
        Some(DispatchOutcome::Failed { ref error }) if error.contains("connection refused")
    ));
    assert!(text.contains("Failed to send email"));
    assert!(text.contains("Alert details:"));
    assert!(text.contains("REVENUE ALERT - 2026-10-14"));
    assert!(text.contains("Premiums dipped."));
}

#[test]
fn no_transport_prints_alert() {
    let store = seeded_store(&[(today(), 80_000.0, 10_000.0), (yesterday(), 100_000.0, 10_000.0)]);
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        FixedText::ok("Premiums dipped."),
        None::<MailRoute<&RecordingMailer>>,
        "ceo@imara.test",
    );

    let mut console = Vec::new();
    let outcome = monitor.run(&store, today(), &mut console).unwrap();
    let text = String::from_utf8(console).unwrap();

    assert_eq!(outcome.dispatch, Some(DispatchOutcome::ConsoleOnly));
    assert!(text.contains("• Premium revenue decreased by 20.0%"));
    assert!(text.contains("Premium Revenue: $80,000.00 (-20.0%)"));
}

#[test]
fn store_errors_propagate() {
    // No migration: the tables do not exist.
    let store = InsureStore::in_memory().unwrap();
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        FixedText::ok("unused"),
        None::<MailRoute<&RecordingMailer>>,
        "ceo@imara.test",
    );
    let err = monitor.run(&store, today(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, ImaraError::Database(_)));
}
