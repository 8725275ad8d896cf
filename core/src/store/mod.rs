//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! Pipelines call `StoreAccess` methods — they never execute SQL directly.
//!
//! `InsureStore` owns the connection. `StoreTx` wraps one open
//! transaction; both implement `StoreAccess`, so the same queries run
//! inside or outside a unit of work. Dropping a `StoreTx` without
//! calling `commit` rolls it back.

use crate::{
    batch_writer::ColumnBatch,
    error::ImaraResult,
    model::Agent,
    types::AgentId,
};
use chrono::NaiveDate;
use rusqlite::{Connection, Transaction};

mod agent;
mod audit;
mod batch;
mod revenue;
mod sequence;

pub use audit::IntegrityReport;
pub use revenue::DailyTotal;
pub use sequence::MaxIds;

/// Tables this crate reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTable {
    Clients,
    Policies,
    Sales,
    Claims,
    Agents,
}

impl EntityTable {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Policies => "policies",
            Self::Sales => "sales",
            Self::Claims => "claims",
            Self::Agents => "agents",
        }
    }

    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Clients => "clientid",
            Self::Policies => "policyid",
            Self::Sales => "saleid",
            Self::Claims => "claimid",
            Self::Agents => "agentid",
        }
    }
}

pub struct InsureStore {
    conn: Connection,
}

impl InsureStore {
    pub fn open(path: &str) -> ImaraResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        log::debug!("store: opened {path}");
        Ok(Self { conn })
    }

    /// Open an existing database without write access. A missing file
    /// is an error rather than a new empty database.
    pub fn open_read_only(path: &str) -> ImaraResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        log::debug!("store: opened {path} read-only");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ImaraResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply the schema. Idempotent.
    pub fn migrate(&self) -> ImaraResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_schema.sql"))?;
        Ok(())
    }

    /// Begin the run's unit of work.
    pub fn transaction(&mut self) -> ImaraResult<StoreTx<'_>> {
        Ok(StoreTx {
            tx: self.conn.transaction()?,
        })
    }
}

pub struct StoreTx<'a> {
    tx: Transaction<'a>,
}

impl StoreTx<'_> {
    pub fn commit(self) -> ImaraResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}

/// Queries shared by the store and an open transaction.
pub trait StoreAccess {
    fn conn(&self) -> &Connection;

    /// Current `MAX(id)` of every entity table, 0 for empty tables.
    fn max_ids(&self) -> ImaraResult<MaxIds> {
        sequence::max_ids(self.conn())
    }

    fn agent_ids(&self) -> ImaraResult<Vec<AgentId>> {
        agent::agent_ids(self.conn())
    }

    fn insert_agent(&self, agent: &Agent) -> ImaraResult<()> {
        agent::insert_agent(self.conn(), agent)
    }

    /// Append every row of `batch`. Returns the number of rows written.
    fn append_batch(&self, batch: &ColumnBatch) -> ImaraResult<usize> {
        batch::append_batch(self.conn(), batch)
    }

    fn row_count(&self, table: EntityTable) -> ImaraResult<i64> {
        sequence::row_count(self.conn(), table)
    }

    /// Premium sum and policy count per start date, for the given days.
    fn daily_premium_totals(
        &self,
        today: NaiveDate,
        yesterday: NaiveDate,
    ) -> ImaraResult<Vec<DailyTotal>> {
        revenue::daily_premium_totals(self.conn(), today, yesterday)
    }

    /// Commission sum and sale count per sale date, for the given days.
    fn daily_commission_totals(
        &self,
        today: NaiveDate,
        yesterday: NaiveDate,
    ) -> ImaraResult<Vec<DailyTotal>> {
        revenue::daily_commission_totals(self.conn(), today, yesterday)
    }

    /// Referential and motor-field consistency counts across the store.
    fn integrity_report(&self) -> ImaraResult<IntegrityReport> {
        audit::integrity_report(self.conn())
    }

    /// `(premium, commission rate, commission)` for every sale joined
    /// to its policy, in sale id order.
    fn commission_lines(&self) -> ImaraResult<Vec<(f64, f64, f64)>> {
        audit::commission_lines(self.conn())
    }
}

impl StoreAccess for InsureStore {
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl StoreAccess for StoreTx<'_> {
    fn conn(&self) -> &Connection {
        &self.tx
    }
}
