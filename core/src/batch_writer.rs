//! Batch writer — turns generated records into column-oriented
//! batches and appends them inside the caller's transaction.
//!
//! Attribute names are declared in the records' natural spelling and
//! lower-cased here, matching the store's lower-case column convention.

use crate::{
    error::ImaraResult,
    model::{Client, Policy, Sale},
    store::{EntityTable, StoreAccess},
};
use chrono::NaiveDate;
use rusqlite::types::Value;

/// A record that maps onto one row of one table.
pub trait TableRecord {
    const TABLE: EntityTable;
    /// Attribute names, in value order.
    const ATTRIBUTES: &'static [&'static str];

    fn values(&self) -> Vec<Value>;
}

/// Rows for a single table with a shared, lower-cased column list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBatch {
    table: EntityTable,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ColumnBatch {
    pub fn from_records<T: TableRecord>(records: &[T]) -> Self {
        Self {
            table: T::TABLE,
            columns: T::ATTRIBUTES.iter().map(|a| a.to_ascii_lowercase()).collect(),
            rows: records.iter().map(|r| r.values()).collect(),
        }
    }

    pub fn table(&self) -> EntityTable {
        self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows written per table by one `BatchWriter::write` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteCounts {
    pub clients: usize,
    pub policies: usize,
    pub sales: usize,
}

pub struct BatchWriter;

impl BatchWriter {
    /// Append clients, then policies, then sales. Empty sequences are
    /// skipped. Foreign keys resolve because parents are staged first.
    pub fn write<S: StoreAccess>(
        store: &S,
        clients: &[Client],
        policies: &[Policy],
        sales: &[Sale],
    ) -> ImaraResult<WriteCounts> {
        Ok(WriteCounts {
            clients: Self::append(store, clients)?,
            policies: Self::append(store, policies)?,
            sales: Self::append(store, sales)?,
        })
    }

    fn append<S: StoreAccess, T: TableRecord>(store: &S, records: &[T]) -> ImaraResult<usize> {
        if records.is_empty() {
            log::debug!("batch: no {} rows; skipping", T::TABLE.name());
            return Ok(0);
        }
        store.append_batch(&ColumnBatch::from_records(records))
    }
}

// ── Record mappings ───────────────────────────────────────────────

fn date(d: NaiveDate) -> Value {
    Value::Text(d.format("%Y-%m-%d").to_string())
}

fn text(s: impl Into<String>) -> Value {
    Value::Text(s.into())
}

fn optional<T>(v: Option<T>, f: impl FnOnce(T) -> Value) -> Value {
    v.map(f).unwrap_or(Value::Null)
}

impl TableRecord for Client {
    const TABLE: EntityTable = EntityTable::Clients;
    const ATTRIBUTES: &'static [&'static str] = &[
        "ClientID", "Name", "DOB", "Age", "Gender", "Location", "JoinDate", "Tier",
        "LifetimeValue", "RiskProfile",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.client_id),
            text(self.name.as_str()),
            date(self.dob),
            Value::Integer(self.age as i64),
            text(self.gender.as_str()),
            text(self.location.as_str()),
            date(self.join_date),
            text(self.tier.as_str()),
            Value::Real(self.lifetime_value),
            text(self.risk_profile.as_str()),
        ]
    }
}

impl TableRecord for Policy {
    const TABLE: EntityTable = EntityTable::Policies;
    const ATTRIBUTES: &'static [&'static str] = &[
        "PolicyID", "ClientID", "AgentID", "PolicyType", "StartDate", "EndDate",
        "PremiumAmount", "Status", "Channel", "PaymentStatus", "RiskScore",
        "OriginalPolicyID", "RenewalNumber", "BusinessType", "TransactionType",
        "CoverageType", "VehicleAge", "UsageType",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.policy_id),
            Value::Integer(self.client_id),
            Value::Integer(self.agent_id),
            text(self.policy_type.as_str()),
            date(self.start_date),
            date(self.end_date),
            Value::Real(self.premium_amount),
            text(self.status.as_str()),
            text(self.channel.as_str()),
            text(self.payment_status.as_str()),
            Value::Real(self.risk_score),
            optional(self.original_policy_id, Value::Integer),
            Value::Integer(self.renewal_number as i64),
            text(self.business_type.as_str()),
            text(self.transaction_type.as_str()),
            optional(self.motor, |m| text(m.coverage_type.as_str())),
            optional(self.motor, |m| Value::Integer(m.vehicle_age as i64)),
            optional(self.motor, |m| text(m.usage_type.as_str())),
        ]
    }
}

impl TableRecord for Sale {
    const TABLE: EntityTable = EntityTable::Sales;
    const ATTRIBUTES: &'static [&'static str] = &[
        "SaleID", "PolicyID", "AgentID", "CommissionAmount", "SaleDate",
        "CommissionPaidFlag", "PolicyType", "TransactionType", "BusinessType",
        "CommissionRate",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.sale_id),
            Value::Integer(self.policy_id),
            Value::Integer(self.agent_id),
            Value::Real(self.commission_amount),
            date(self.sale_date),
            Value::Integer(i64::from(self.commission_paid)),
            text(self.policy_type.as_str()),
            text(self.transaction_type.as_str()),
            text(self.business_type.as_str()),
            Value::Real(self.commission_rate),
        ]
    }
}
