//! Employee model.
//!
//! The engine treats employees as read-only reference data owned by the
//! external employee directory; a record is fetched once per evaluation and
//! never mutated here.

use serde::{Deserialize, Serialize};

/// An employee as known to the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee (e.g. "E1001").
    pub id: String,
    /// Display name.
    pub name: String,
    /// The policy tier this employee belongs to (e.g. "G1".."G5").
    ///
    /// Grade can be absent for freshly onboarded records; a claim from such
    /// an employee is routed to manual review rather than rejected.
    pub grade: Option<String>,
    /// Identifier of the employee's manager, if any.
    #[serde(default)]
    pub manager_id: Option<String>,
    /// Department label, if recorded.
    #[serde(default)]
    pub department: Option<String>,
    /// Whether the employee is currently active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns true if the directory has a grade recorded for this employee.
    pub fn has_grade(&self) -> bool {
        self.grade.as_deref().is_some_and(|g| !g.is_empty())
    }
}
