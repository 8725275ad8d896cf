//! Shared primitive types used across both pipelines.

/// Primary key of a row in `clients`.
pub type ClientId = i64;

/// Primary key of a row in `policies`.
pub type PolicyId = i64;

/// Primary key of a row in `sales`.
pub type SaleId = i64;

/// Primary key of a row in `agents`.
pub type AgentId = i64;

/// Primary key of a row in `claims`.
pub type ClaimId = i64;
