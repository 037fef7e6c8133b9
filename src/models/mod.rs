//! Core data models for the Claim Validation & Decision Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod claim;
mod decision;
mod employee;
mod policy;
mod record;

pub use claim::{Claim, ClaimDetail, ExpenseCategory, NormalizationFlag};
pub use decision::{DecisionMetrics, DecisionResult, DecisionTag, RuleBand};
pub use employee::Employee;
pub use policy::{PerDiemRate, Policy};
pub use record::{ClaimRecord, format_claim_id};
