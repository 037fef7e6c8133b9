//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! reference data from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PerDiemRate, Policy};

use super::types::{
    EmployeesConfig, PerDiemConfig, PoliciesConfig, ScreeningConfig, VendorEntry, VendorsConfig,
};

/// Loads and provides access to engine reference data.
///
/// The `ConfigLoader` reads YAML files from a directory and exposes the
/// policy rows, per-diem rates, vendor registry, employee fixture and
/// screening thresholds the in-memory adapters are built from.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policies.yaml    # Policy rows by category and grade
/// ├── per_diem.yaml    # Per-diem rates by (location, currency)
/// ├── vendors.yaml     # Vendor registry
/// ├── employees.yaml   # Employee directory fixture
/// └── screening.yaml   # Fraud/duplicate screen thresholds
/// ```
///
/// # Example
///
/// ```no_run
/// use expense_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// assert!(!loader.policies().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policies: Vec<Policy>,
    per_diem: Vec<PerDiemRate>,
    vendors: Vec<VendorEntry>,
    employees: Vec<Employee>,
    screening: ScreeningConfig,
}

impl ConfigLoader {
    /// Loads reference data from the specified directory.
    ///
    /// Returns an error if any required file is missing
    /// ([`EngineError::ConfigNotFound`]) or contains invalid YAML
    /// ([`EngineError::ConfigParseError`]). `screening.yaml` is the one
    /// optional file; absent thresholds fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policies: PoliciesConfig = Self::load_yaml(&path.join("policies.yaml"))?;
        let per_diem: PerDiemConfig = Self::load_yaml(&path.join("per_diem.yaml"))?;
        let vendors: VendorsConfig = Self::load_yaml(&path.join("vendors.yaml"))?;
        let employees: EmployeesConfig = Self::load_yaml(&path.join("employees.yaml"))?;

        let screening_path = path.join("screening.yaml");
        let screening = if screening_path.exists() {
            Self::load_yaml(&screening_path)?
        } else {
            ScreeningConfig::default()
        };

        Ok(Self {
            policies: policies.policies,
            per_diem: per_diem.rates,
            vendors: vendors.vendors,
            employees: employees.employees,
            screening,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the policy rows.
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Returns the per-diem rates.
    pub fn per_diem(&self) -> &[PerDiemRate] {
        &self.per_diem
    }

    /// Returns the vendor registry entries.
    pub fn vendors(&self) -> &[VendorEntry] {
        &self.vendors
    }

    /// Returns the employee directory fixture.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Returns the screening thresholds.
    pub fn screening(&self) -> &ScreeningConfig {
        &self.screening
    }
}
