//! Collaborator boundaries for reference data and claim persistence.
//!
//! The engine only depends on these query contracts; real deployments back
//! them with the employee directory, policy tables and claim store. The
//! in-memory adapters in [`memory`] serve tests and the demo service.
//!
//! All reads are per-request snapshots: nothing here may cache across
//! requests, since policy changes must take effect promptly.

mod memory;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{ClaimRecord, Employee, ExpenseCategory, PerDiemRate, Policy};

pub use memory::{MemoryDirectory, MemoryLedger, MemoryPolicyStore, MemoryVendorRegistry};

/// Read-only lookup into the external employee directory.
pub trait EmployeeDirectory: Send + Sync {
    /// Finds an employee by identifier. `Ok(None)` means the employee is
    /// unknown: a decision outcome, not an error.
    fn find(&self, employee_id: &str) -> EngineResult<Option<Employee>>;
}

/// Read-only lookup of policy rows and per-diem rates.
pub trait PolicyStore: Send + Sync {
    /// Returns every policy row stored for a category; the resolver picks
    /// the applicable one.
    fn policies_for_category(&self, category: ExpenseCategory) -> EngineResult<Vec<Policy>>;

    /// Returns the per-diem rate for a (location, currency) pair, if one
    /// exists. Locations are keyed lowercased.
    fn per_diem(&self, location: &str, currency: &str) -> EngineResult<Option<PerDiemRate>>;
}

/// Read-only lookup into the vendor registry.
pub trait VendorRegistry: Send + Sync {
    /// Returns `Some(verified)` for a registered vendor, `None` for a vendor
    /// the registry does not know.
    fn is_verified(&self, vendor: &str) -> EngineResult<Option<bool>>;
}

/// Claim persistence and identifier issuance.
///
/// Identifier issuance MUST be an atomic "next sequence value" per day;
/// deriving the next id from a row count races under concurrent submission
/// and is forbidden by this contract.
pub trait ClaimLedger: Send + Sync {
    /// Issues the next claim identifier for the given day
    /// (`CLM-YYYYMMDD-NNNN`).
    fn next_claim_id(&self, date: NaiveDate) -> EngineResult<String>;

    /// Persists a claim record with its attached decision.
    fn insert(&self, record: ClaimRecord) -> EngineResult<()>;

    /// Returns the employee's claims with an expense date on or after
    /// `on_or_after`, the bounded window the duplicate screen runs over.
    fn recent_for_employee(
        &self,
        employee_id: &str,
        on_or_after: NaiveDate,
    ) -> EngineResult<Vec<ClaimRecord>>;
}
