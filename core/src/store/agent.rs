use crate::{error::ImaraResult, model::Agent, types::AgentId};
use rusqlite::{params, Connection};

pub(super) fn agent_ids(conn: &Connection) -> ImaraResult<Vec<AgentId>> {
    let mut stmt = conn.prepare("SELECT agentid FROM agents ORDER BY agentid ASC")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, AgentId>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub(super) fn insert_agent(conn: &Connection, agent: &Agent) -> ImaraResult<()> {
    conn.execute(
        "INSERT INTO agents (agentid, name, hiredate, region, performancetier)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            agent.agent_id,
            &agent.name,
            agent.hire_date,
            &agent.region,
            &agent.performance_tier,
        ],
    )?;
    Ok(())
}
