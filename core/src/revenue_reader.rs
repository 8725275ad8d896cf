//! Revenue snapshot reader — today's and yesterday's aggregates.

use crate::{
    error::ImaraResult,
    store::{DailyTotal, StoreAccess},
};
use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sum and row count for one metric on one day. Zero when the day
/// has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayFigure {
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueSnapshot {
    pub today: NaiveDate,
    pub yesterday: NaiveDate,
    pub premium_today: DayFigure,
    pub premium_yesterday: DayFigure,
    pub commission_today: DayFigure,
    pub commission_yesterday: DayFigure,
}

pub struct RevenueSnapshotReader;

impl RevenueSnapshotReader {
    pub fn read<S: StoreAccess>(store: &S, today: NaiveDate) -> ImaraResult<RevenueSnapshot> {
        let yesterday = today
            .pred_opt()
            .ok_or_else(|| anyhow!("no calendar day before {today}"))?;

        let premiums = store.daily_premium_totals(today, yesterday)?;
        let commissions = store.daily_commission_totals(today, yesterday)?;

        log::debug!(
            "revenue: {} premium rows, {} commission rows for {yesterday}..={today}",
            premiums.len(),
            commissions.len()
        );

        Ok(RevenueSnapshot {
            today,
            yesterday,
            premium_today: figure_for(&premiums, today),
            premium_yesterday: figure_for(&premiums, yesterday),
            commission_today: figure_for(&commissions, today),
            commission_yesterday: figure_for(&commissions, yesterday),
        })
    }
}

fn figure_for(totals: &[DailyTotal], day: NaiveDate) -> DayFigure {
    totals
        .iter()
        .find(|t| t.day == day)
        .map(|t| DayFigure {
            total: t.total,
            count: t.count,
        })
        .unwrap_or_default()
}
