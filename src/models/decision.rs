//! Decision result models for the Claim Validation & Decision Engine.
//!
//! This module contains the [`DecisionResult`] type and its associated
//! structures that capture the outcome of one claim evaluation: the coarse
//! outcome tag, the rule band that produced it, the human-readable rationale
//! and the numeric comparison behind the verdict.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The coarse outcome bucket for a claim evaluation.
///
/// Serialized exactly as the variant name, matching the wire contract
/// (`"AutoApproved"`, `"Pending"`, `"FinancePending"`, `"Rejected"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionTag {
    /// The claim is within policy and requires no human review.
    AutoApproved,
    /// The claim needs manager or finance review before payment.
    Pending,
    /// The claim needs finance-team handling (cross-currency, data gaps).
    FinancePending,
    /// The claim is rejected outright (unknown employee).
    Rejected,
}

/// The categorical reason class behind a decision.
///
/// Bands carry a total severity order used by the fraud/duplicate screens:
/// a fired screen escalates the band to at least [`RuleBand::OverPolicy`]
/// but never lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleBand {
    /// Amount is within the applicable ceiling.
    WithinPolicy,
    /// Amount exceeds the applicable ceiling.
    OverPolicy,
    /// No policy row applies to the claim's (category, grade).
    NoPolicy,
    /// The employee's recorded grade is not a recognizable tier.
    GradeMismatch,
    /// The employee is not present in the directory.
    EmployeeNotFound,
}

impl RuleBand {
    /// Ordinal severity of this band, lowest first.
    pub fn severity(&self) -> u8 {
        match self {
            RuleBand::WithinPolicy => 0,
            RuleBand::OverPolicy => 1,
            RuleBand::NoPolicy => 2,
            RuleBand::GradeMismatch => 3,
            RuleBand::EmployeeNotFound => 4,
        }
    }

    /// Returns the more severe of `self` and `floor`.
    ///
    /// # Examples
    ///
    /// ```
    /// use expense_engine::models::RuleBand;
    ///
    /// assert_eq!(
    ///     RuleBand::WithinPolicy.at_least(RuleBand::OverPolicy),
    ///     RuleBand::OverPolicy
    /// );
    /// assert_eq!(
    ///     RuleBand::NoPolicy.at_least(RuleBand::OverPolicy),
    ///     RuleBand::NoPolicy
    /// );
    /// ```
    pub fn at_least(self, floor: RuleBand) -> RuleBand {
        if self.severity() < floor.severity() {
            floor
        } else {
            self
        }
    }
}

/// The numeric comparison that produced a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMetrics {
    /// The claimed amount.
    pub claimed: Decimal,
    /// The applicable ceiling, when a policy resolved.
    pub limit: Option<Decimal>,
    /// How far the claim exceeds the ceiling; zero when within limits or no
    /// ceiling applies.
    pub excess: Decimal,
    /// Day count used for per-diem ceilings, when one applied.
    pub per_diem_days: Option<i64>,
    /// The claim currency the comparison ran in.
    pub currency: String,
    /// True when the claim and policy currencies differ and no comparison
    /// was possible.
    pub currency_mismatch: bool,
}

impl DecisionMetrics {
    /// Metrics for an evaluation where no numeric comparison happened
    /// (unknown employee, missing grade, no policy).
    pub fn without_limit(claimed: Decimal, currency: &str) -> Self {
        Self {
            claimed,
            limit: None,
            excess: Decimal::ZERO,
            per_diem_days: None,
            currency: currency.to_string(),
            currency_mismatch: false,
        }
    }
}

/// The complete outcome of one claim evaluation.
///
/// A `DecisionResult` is created once per evaluation and never mutated; a
/// re-evaluation produces a new value. The engine is the sole producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResult {
    /// The coarse outcome bucket.
    pub tag: DecisionTag,
    /// Action label consistent with the tag (e.g. "Send to Manager").
    pub decision: String,
    /// The reason class behind the decision.
    pub rule_band: RuleBand,
    /// Human-readable rationale for the verdict.
    pub message: String,
    /// The numeric comparison behind the verdict.
    pub metrics: DecisionMetrics,
    /// True when the duplicate screen flagged this claim.
    pub is_duplicate: bool,
    /// True when the fraud screen flagged this claim.
    pub fraud_flag: bool,
    /// Set when policy resolution had to tie-break between multiple
    /// applicable rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_warning: Option<String>,
}
