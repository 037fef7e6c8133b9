//! Configuration module for the Claim Validation & Decision Engine.
//!
//! Provides loading of reference data (policies, per-diem rates, vendors,
//! employees) and screening thresholds from YAML files.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DuplicateConfig, EmployeesConfig, FraudConfig, PerDiemConfig, PoliciesConfig, ScreeningConfig,
    VendorEntry, VendorsConfig,
};
