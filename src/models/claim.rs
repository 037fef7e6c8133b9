//! Claim model and related types.
//!
//! This module defines the canonical [`Claim`] record produced by the
//! normalizer, the [`ExpenseCategory`] enumeration and the category-specific
//! [`ClaimDetail`] payloads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the category of an expense claim.
///
/// Unrecognized categories fall back to [`ExpenseCategory::Other`] at the
/// normalizer boundary; the classifier never sees a free-form category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Travel between cities (flights, trains, long-distance transport).
    Travel,
    /// Hotel and other overnight accommodation.
    Hotel,
    /// Meals and food expenses.
    Food,
    /// Local transport within a city (cabs, autos, metro).
    LocalConveyance,
    /// Anything that does not map to a known category.
    Other,
}

impl ExpenseCategory {
    /// Returns true for categories whose ceiling is computed against a stay
    /// duration (per-diem semantics).
    ///
    /// # Examples
    ///
    /// ```
    /// use expense_engine::models::ExpenseCategory;
    ///
    /// assert!(ExpenseCategory::Hotel.has_stay_semantics());
    /// assert!(ExpenseCategory::Travel.has_stay_semantics());
    /// assert!(!ExpenseCategory::Food.has_stay_semantics());
    /// ```
    pub fn has_stay_semantics(&self) -> bool {
        matches!(self, ExpenseCategory::Travel | ExpenseCategory::Hotel)
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExpenseCategory::Travel => "travel",
            ExpenseCategory::Hotel => "hotel",
            ExpenseCategory::Food => "food",
            ExpenseCategory::LocalConveyance => "local_conveyance",
            ExpenseCategory::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Category-specific detail extracted alongside the core claim fields.
///
/// Dates inside a detail are best-effort: an unparsable date becomes `None`
/// rather than failing the claim, and the day-count logic falls back to a
/// one-day stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClaimDetail {
    /// Hotel stay detail.
    Hotel {
        /// Check-in date, if extracted.
        check_in: Option<NaiveDate>,
        /// Check-out date, if extracted.
        check_out: Option<NaiveDate>,
    },
    /// Inter-city travel detail.
    Travel {
        /// Origin city, if extracted.
        from_city: Option<String>,
        /// Destination city, if extracted.
        to_city: Option<String>,
        /// Outbound travel date, if extracted.
        departure: Option<NaiveDate>,
        /// Return travel date, if extracted.
        return_date: Option<NaiveDate>,
    },
    /// No category-specific detail.
    None,
}

/// A substitution the normalizer made while coercing untrusted input.
///
/// Flags are recorded on the claim so downstream heuristics and callers can
/// see every place where extraction output was defaulted rather than read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationFlag {
    /// The amount was missing, unparseable or negative and was coerced to 0.
    LowConfidenceAmount,
    /// The expense date was missing or unparsable and was replaced with the
    /// evaluation date.
    DefaultedExpenseDate,
    /// The currency was missing or not a 3-letter code and was replaced with
    /// the engine default.
    DefaultedCurrency,
    /// The category string did not map to a known category.
    UnknownCategory,
}

/// A canonical expense claim, produced by normalization from extracted input.
///
/// Invariants: `amount >= 0`, `currency` is an uppercased 3-letter code and
/// `category` is one of the enumerated set. The claim is immutable once it is
/// passed into the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Identifier of the employee submitting the claim.
    pub employee_id: String,
    /// The expense category.
    pub category: ExpenseCategory,
    /// The claimed amount. Never negative.
    pub amount: Decimal,
    /// 3-letter currency code, uppercased.
    pub currency: String,
    /// The vendor on the receipt, if extracted.
    pub vendor: Option<String>,
    /// The expense date.
    pub expense_date: NaiveDate,
    /// Location used for per-diem rate lookup (e.g. destination city).
    pub location: Option<String>,
    /// Category-specific detail.
    pub detail: ClaimDetail,
    /// Substitutions the normalizer made while coercing this claim.
    #[serde(default)]
    pub flags: Vec<NormalizationFlag>,
}

impl Claim {
    /// Returns true if the normalizer recorded the given flag on this claim.
    pub fn has_flag(&self, flag: NormalizationFlag) -> bool {
        self.flags.contains(&flag)
    }
}
