//! Revenue monitor — one run of the alerting pipeline.
//!
//! RUN ORDER (fixed):
//!   1. Read today's and yesterday's aggregates
//!   2. Evaluate deltas against the threshold
//!   3. Summarize            (only when alerting; never fails)
//!   4. Dispatch or print    (never fails on delivery)
//!
//! Store errors propagate; everything after step 1 degrades instead.

use crate::{
    change_evaluator::{AlertDecision, ChangeEvaluator},
    config::MonitorConfig,
    dispatcher::{AlertDispatcher, DispatchOutcome, MailRoute, MailTransport},
    error::ImaraResult,
    report::format_signed_pct,
    revenue_reader::RevenueSnapshotReader,
    store::StoreAccess,
    summarizer::{Narrative, NarrativeSummarizer, TextGenerator},
};
use chrono::NaiveDate;
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOutcome {
    pub decision: AlertDecision,
    pub narrative: Narrative,
    /// `None` when no alert was raised.
    pub dispatch: Option<DispatchOutcome>,
}

pub struct RevenueMonitor<G, T> {
    evaluator: ChangeEvaluator,
    summarizer: NarrativeSummarizer<G>,
    dispatcher: AlertDispatcher<T>,
}

impl<G: TextGenerator, T: MailTransport> RevenueMonitor<G, T> {
    pub fn new(
        config: &MonitorConfig,
        generator: G,
        route: Option<MailRoute<T>>,
        recipient: &str,
    ) -> Self {
        Self {
            evaluator: ChangeEvaluator::new(config),
            summarizer: NarrativeSummarizer::new(generator, config.revenue_threshold),
            dispatcher: AlertDispatcher::new(route, recipient, &config.company_name),
        }
    }

    pub fn run<S: StoreAccess, W: Write>(
        &self,
        store: &S,
        today: NaiveDate,
        console: &mut W,
    ) -> ImaraResult<MonitorOutcome> {
        log::info!("Checking revenue data for {today}...");

        let snapshot = RevenueSnapshotReader::read(store, today)?;
        let decision = self.evaluator.evaluate(&snapshot);
        let narrative = self.summarizer.summarize(&decision);

        let dispatch = if decision.should_alert {
            log::info!("monitor: alert raised ({})", decision.reasons.join("; "));
            Some(self.dispatcher.dispatch(&decision, narrative.text(), console)?)
        } else {
            let premium = format_signed_pct(decision.premium_change_pct);
            let commission = format_signed_pct(decision.commission_change_pct);
            writeln!(console, "No alerts triggered today")?;
            writeln!(console, "Premium change: {premium}")?;
            writeln!(console, "Commission change: {commission}")?;
            writeln!(console, "Threshold: ±{:.1}%", decision.threshold_pct)?;
            None
        };

        Ok(MonitorOutcome {
            decision,
            narrative,
            dispatch,
        })
    }
}
