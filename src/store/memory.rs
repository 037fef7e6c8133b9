//! In-memory collaborator adapters.
//!
//! These back the trait contracts in [`super`] with plain maps and vectors,
//! loaded from the YAML reference data. They are the adapters the tests and
//! the demo service run against; a production deployment swaps them for
//! database-backed implementations.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::engine::normalize_vendor;
use crate::error::{EngineError, EngineResult};
use crate::models::{ClaimRecord, Employee, ExpenseCategory, PerDiemRate, Policy, format_claim_id};

use super::{ClaimLedger, EmployeeDirectory, PolicyStore, VendorRegistry};

/// Employee directory backed by a map.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    employees: HashMap<String, Employee>,
}

impl MemoryDirectory {
    /// Builds a directory from employee records.
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: employees.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }
}

impl EmployeeDirectory for MemoryDirectory {
    fn find(&self, employee_id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.employees.get(employee_id).cloned())
    }
}

/// Policy store backed by vectors and a keyed rate map.
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    policies: Vec<Policy>,
    per_diem: HashMap<(String, String), PerDiemRate>,
}

impl MemoryPolicyStore {
    /// Builds a store from policy rows and per-diem rates.
    ///
    /// Per-diem rates are unique per (location, currency); a later duplicate
    /// entry replaces an earlier one.
    pub fn new(policies: Vec<Policy>, rates: Vec<PerDiemRate>) -> Self {
        let per_diem = rates
            .into_iter()
            .map(|r| {
                (
                    (r.location.to_ascii_lowercase(), r.currency.clone()),
                    r,
                )
            })
            .collect();
        Self { policies, per_diem }
    }
}

impl PolicyStore for MemoryPolicyStore {
    fn policies_for_category(&self, category: ExpenseCategory) -> EngineResult<Vec<Policy>> {
        Ok(self
            .policies
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    fn per_diem(&self, location: &str, currency: &str) -> EngineResult<Option<PerDiemRate>> {
        let key = (location.to_ascii_lowercase(), currency.to_string());
        Ok(self.per_diem.get(&key).cloned())
    }
}

/// Vendor registry backed by a map keyed on the normalized vendor name.
#[derive(Debug, Default)]
pub struct MemoryVendorRegistry {
    vendors: HashMap<String, bool>,
}

impl MemoryVendorRegistry {
    /// Builds a registry from (vendor name, verified) pairs.
    pub fn new(entries: Vec<(String, bool)>) -> Self {
        Self {
            vendors: entries
                .into_iter()
                .map(|(name, verified)| (normalize_vendor(&name), verified))
                .collect(),
        }
    }
}

impl VendorRegistry for MemoryVendorRegistry {
    fn is_verified(&self, vendor: &str) -> EngineResult<Option<bool>> {
        Ok(self.vendors.get(&normalize_vendor(vendor)).copied())
    }
}

/// Claim ledger backed by a mutex-guarded vector, with an atomic per-day
/// sequence counter for identifier issuance.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Mutex<Vec<ClaimRecord>>,
    sequences: Mutex<HashMap<NaiveDate, u32>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every persisted record, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the record lock was poisoned by a crashed writer.
    pub fn records(&self) -> Vec<ClaimRecord> {
        self.records
            .lock()
            .expect("claim store lock poisoned")
            .clone()
    }
}

impl ClaimLedger for MemoryLedger {
    fn next_claim_id(&self, date: NaiveDate) -> EngineResult<String> {
        let mut sequences = self
            .sequences
            .lock()
            .map_err(|_| EngineError::StoreUnavailable {
                message: "claim sequence lock poisoned".to_string(),
            })?;
        let next = sequences.entry(date).or_insert(0);
        *next += 1;
        Ok(format_claim_id(date, *next))
    }

    fn insert(&self, record: ClaimRecord) -> EngineResult<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| EngineError::StoreUnavailable {
                message: "claim store lock poisoned".to_string(),
            })?;
        records.push(record);
        Ok(())
    }

    fn recent_for_employee(
        &self,
        employee_id: &str,
        on_or_after: NaiveDate,
    ) -> EngineResult<Vec<ClaimRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| EngineError::StoreUnavailable {
                message: "claim store lock poisoned".to_string(),
            })?;
        Ok(records
            .iter()
            .filter(|r| r.employee_id == employee_id && r.expense_date >= on_or_after)
            .cloned()
            .collect())
    }
}
