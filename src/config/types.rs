//! Configuration types for the Claim Validation & Decision Engine.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML reference data files: policy rows, per-diem rates, the vendor
//! registry, the employee directory fixture and the screening thresholds.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{Employee, PerDiemRate, Policy};

/// `policies.yaml`: the policy rows served by the policy store.
#[derive(Debug, Clone, Deserialize)]
pub struct PoliciesConfig {
    /// Every policy row, all categories mixed.
    pub policies: Vec<Policy>,
}

/// `per_diem.yaml`: daily allowance rates by (location, currency).
#[derive(Debug, Clone, Deserialize)]
pub struct PerDiemConfig {
    /// The rate rows.
    pub rates: Vec<PerDiemRate>,
}

/// A single vendor registry entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorEntry {
    /// Vendor display name as it appears on receipts.
    pub name: String,
    /// Whether procurement has verified this vendor.
    pub verified: bool,
}

/// `vendors.yaml`: the vendor registry.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorsConfig {
    /// Registered vendors.
    pub vendors: Vec<VendorEntry>,
}

/// `employees.yaml`: the employee directory fixture for the in-memory
/// adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesConfig {
    /// Directory records.
    pub employees: Vec<Employee>,
}

/// Duplicate screen thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateConfig {
    /// Window, in days either side of the expense date, that similar claims
    /// are matched within.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// How many similar claims within the window trigger the flag.
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

fn default_window_days() -> i64 {
    3
}

fn default_threshold() -> usize {
    1
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            threshold: default_threshold(),
        }
    }
}

/// Fraud screen thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct FraudConfig {
    /// A claim exceeding this multiple of the policy ceiling is flagged.
    #[serde(default = "default_ceiling_multiplier")]
    pub ceiling_multiplier: Decimal,
}

fn default_ceiling_multiplier() -> Decimal {
    Decimal::from(3)
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            ceiling_multiplier: default_ceiling_multiplier(),
        }
    }
}

/// `screening.yaml`: thresholds for the fraud and duplicate screens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreeningConfig {
    /// Duplicate screen thresholds.
    #[serde(default)]
    pub duplicate: DuplicateConfig,
    /// Fraud screen thresholds.
    #[serde(default)]
    pub fraud: FraudConfig,
}
