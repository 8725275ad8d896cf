use crate::error::ImaraResult;
use rusqlite::Connection;

/// Counts of rows that break a referential or shape invariant.
/// All zero on a healthy store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegrityReport {
    pub orphan_policies: i64,
    pub orphan_sales: i64,
    pub motor_field_violations: i64,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

pub(super) fn integrity_report(conn: &Connection) -> ImaraResult<IntegrityReport> {
    let orphan_policies = conn.query_row(
        "SELECT COUNT(*) FROM policies p
         WHERE NOT EXISTS (SELECT 1 FROM clients c WHERE c.clientid = p.clientid)
            OR NOT EXISTS (SELECT 1 FROM agents a WHERE a.agentid = p.agentid)",
        [],
        |row| row.get(0),
    )?;
    let orphan_sales = conn.query_row(
        "SELECT COUNT(*) FROM sales s
         WHERE NOT EXISTS (SELECT 1 FROM policies p WHERE p.policyid = s.policyid)
            OR NOT EXISTS (SELECT 1 FROM agents a WHERE a.agentid = s.agentid)",
        [],
        |row| row.get(0),
    )?;
    let motor_field_violations = conn.query_row(
        "SELECT COUNT(*) FROM policies
         WHERE (policytype = 'Motor'
                AND (coveragetype IS NULL OR vehicleage IS NULL OR usagetype IS NULL))
            OR (policytype <> 'Motor'
                AND (coveragetype IS NOT NULL OR vehicleage IS NOT NULL OR usagetype IS NOT NULL))",
        [],
        |row| row.get(0),
    )?;
    Ok(IntegrityReport {
        orphan_policies,
        orphan_sales,
        motor_field_violations,
    })
}

pub(super) fn commission_lines(conn: &Connection) -> ImaraResult<Vec<(f64, f64, f64)>> {
    let mut stmt = conn.prepare(
        "SELECT p.premiumamount, s.commissionrate, s.commissionamount
         FROM sales s JOIN policies p ON p.policyid = s.policyid
         ORDER BY s.saleid ASC",
    )?;
    let lines = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}
