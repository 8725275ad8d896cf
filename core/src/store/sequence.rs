use super::EntityTable;
use crate::{
    error::ImaraResult,
    types::{AgentId, ClaimId, ClientId, PolicyId, SaleId},
};
use rusqlite::Connection;

/// Highest identifier present in each entity table (0 when empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaxIds {
    pub clients: ClientId,
    pub policies: PolicyId,
    pub sales: SaleId,
    pub claims: ClaimId,
    pub agents: AgentId,
}

fn max_id(conn: &Connection, table: EntityTable) -> ImaraResult<i64> {
    let sql = format!(
        "SELECT COALESCE(MAX({}), 0) FROM {}",
        table.id_column(),
        table.name()
    );
    let max = conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?;
    Ok(max)
}

pub(super) fn max_ids(conn: &Connection) -> ImaraResult<MaxIds> {
    Ok(MaxIds {
        clients: max_id(conn, EntityTable::Clients)?,
        policies: max_id(conn, EntityTable::Policies)?,
        sales: max_id(conn, EntityTable::Sales)?,
        claims: max_id(conn, EntityTable::Claims)?,
        agents: max_id(conn, EntityTable::Agents)?,
    })
}

pub(super) fn row_count(conn: &Connection, table: EntityTable) -> ImaraResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name());
    let count = conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?;
    Ok(count)
}
