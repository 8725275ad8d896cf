use crate::error::ImaraResult;
use chrono::NaiveDate;
use rusqlite::{params, Connection};

/// One day's aggregate: sum of an amount column and the row count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub total: f64,
    pub count: i64,
}

fn daily_totals(
    conn: &Connection,
    sql: &str,
    today: NaiveDate,
    yesterday: NaiveDate,
) -> ImaraResult<Vec<DailyTotal>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![today, yesterday], |row| {
            Ok(DailyTotal {
                day: row.get(0)?,
                total: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                count: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(super) fn daily_premium_totals(
    conn: &Connection,
    today: NaiveDate,
    yesterday: NaiveDate,
) -> ImaraResult<Vec<DailyTotal>> {
    daily_totals(
        conn,
        "SELECT date(startdate) AS day, SUM(premiumamount), COUNT(*)
         FROM policies
         WHERE date(startdate) IN (?1, ?2)
         GROUP BY date(startdate)
         ORDER BY day",
        today,
        yesterday,
    )
}

pub(super) fn daily_commission_totals(
    conn: &Connection,
    today: NaiveDate,
    yesterday: NaiveDate,
) -> ImaraResult<Vec<DailyTotal>> {
    daily_totals(
        conn,
        "SELECT date(saledate) AS day, SUM(commissionamount), COUNT(*)
         FROM sales
         WHERE date(saledate) IN (?1, ?2)
         GROUP BY date(saledate)
         ORDER BY day",
        today,
        yesterday,
    )
}
