//! Change evaluator — day-over-day deltas and the alert decision.
//!
//! Pure. The `AlertDecision` it returns is the only input to the
//! summarizer and the dispatcher.

use crate::{
    config::MonitorConfig,
    revenue_reader::{DayFigure, RevenueSnapshot},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDecision {
    pub today: NaiveDate,
    pub yesterday: NaiveDate,
    pub premium_today: DayFigure,
    pub premium_yesterday: DayFigure,
    pub commission_today: DayFigure,
    pub commission_yesterday: DayFigure,
    pub premium_change_pct: f64,
    pub commission_change_pct: f64,
    pub threshold_pct: f64,
    pub should_alert: bool,
    pub reasons: Vec<String>,
}

pub struct ChangeEvaluator {
    threshold_pct: f64,
}

impl ChangeEvaluator {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            threshold_pct: config.threshold_pct(),
        }
    }

    pub fn evaluate(&self, snapshot: &RevenueSnapshot) -> AlertDecision {
        let premium_change_pct =
            pct_change(snapshot.premium_today.total, snapshot.premium_yesterday.total);
        let commission_change_pct =
            pct_change(snapshot.commission_today.total, snapshot.commission_yesterday.total);

        let mut reasons = Vec::new();
        for (label, pct) in [
            ("Premium revenue", premium_change_pct),
            ("Commission revenue", commission_change_pct),
        ] {
            if pct.abs() > self.threshold_pct {
                let direction = if pct > 0.0 { "increased" } else { "decreased" };
                reasons.push(format!("{label} {direction} by {:.1}%", pct.abs()));
            }
        }

        AlertDecision {
            today: snapshot.today,
            yesterday: snapshot.yesterday,
            premium_today: snapshot.premium_today,
            premium_yesterday: snapshot.premium_yesterday,
            commission_today: snapshot.commission_today,
            commission_yesterday: snapshot.commission_yesterday,
            premium_change_pct,
            commission_change_pct,
            threshold_pct: self.threshold_pct,
            should_alert: !reasons.is_empty(),
            reasons,
        }
    }
}

/// Percentage change from `yesterday` to `today`.
///
/// Defined as 0 when `yesterday <= 0`, which also masks a spike on the
/// first day with any revenue.
pub fn pct_change(today: f64, yesterday: f64) -> f64 {
    if yesterday > 0.0 {
        (today - yesterday) / yesterday * 100.0
    } else {
        0.0
    }
}
