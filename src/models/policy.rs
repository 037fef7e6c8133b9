//! Policy and per-diem rate models.
//!
//! Policies are read-only reference rows served by the policy store; the
//! resolver picks the single applicable row for a (category, grade) pair.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ExpenseCategory;

/// An employer policy row: a currency-denominated ceiling for a category,
/// applicable to a set of employee grades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Unique policy identifier (e.g. "POL-FOOD-STD").
    pub id: String,
    /// The expense category this policy covers.
    pub category: ExpenseCategory,
    /// Maximum allowance for a single claim under this policy.
    pub max_allowance: Decimal,
    /// Daily allowance rate for stay-based categories, if the policy
    /// carries one.
    #[serde(default)]
    pub per_diem_rate: Option<Decimal>,
    /// 3-letter currency code the ceiling is denominated in.
    pub currency: String,
    /// The grades this policy applies to.
    pub applicable_grades: Vec<String>,
}

impl Policy {
    /// Returns true if this policy row lists the given grade.
    ///
    /// # Examples
    ///
    /// ```
    /// use expense_engine::models::{ExpenseCategory, Policy};
    /// use rust_decimal::Decimal;
    ///
    /// let policy = Policy {
    ///     id: "POL-FOOD-STD".to_string(),
    ///     category: ExpenseCategory::Food,
    ///     max_allowance: Decimal::new(60000, 2),
    ///     per_diem_rate: None,
    ///     currency: "INR".to_string(),
    ///     applicable_grades: vec!["G1".to_string(), "G2".to_string()],
    /// };
    /// assert!(policy.applies_to_grade("G2"));
    /// assert!(!policy.applies_to_grade("G5"));
    /// ```
    pub fn applies_to_grade(&self, grade: &str) -> bool {
        self.applicable_grades.iter().any(|g| g == grade)
    }
}

/// A daily allowance rate for a (location, currency) pair.
///
/// Unique per pair; the location key is stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDiemRate {
    /// Location key, lowercased (e.g. "mumbai").
    pub location: String,
    /// 3-letter currency code.
    pub currency: String,
    /// The daily rate.
    pub rate: Decimal,
}
