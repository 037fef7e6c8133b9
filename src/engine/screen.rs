//! Screen composition.
//!
//! Applies the duplicate and fraud screen outcomes to a classified result.
//! Screens can only downgrade: a flagged AutoApproved claim becomes Pending,
//! and the rule band is escalated to at least over_policy severity. A clean
//! screen never upgrades an outcome.

use crate::models::{DecisionResult, DecisionTag, RuleBand};

use super::duplicate::DuplicateScreenResult;
use super::fraud::FraudScreenResult;

/// Folds screen outcomes into a classified result, producing a new
/// [`DecisionResult`].
///
/// The input result is consumed, not mutated in place: re-evaluation always
/// yields a fresh value.
pub fn apply_screens(
    result: DecisionResult,
    duplicate: &DuplicateScreenResult,
    fraud: &FraudScreenResult,
) -> DecisionResult {
    let mut out = DecisionResult {
        is_duplicate: duplicate.is_duplicate,
        fraud_flag: fraud.fraud_flag,
        ..result
    };

    if !duplicate.is_duplicate && !fraud.fraud_flag {
        return out;
    }

    out.rule_band = out.rule_band.at_least(RuleBand::OverPolicy);

    if out.tag == DecisionTag::AutoApproved {
        out.tag = DecisionTag::Pending;
        out.decision = "Send to Manager".to_string();
    }

    let mut notes = Vec::new();
    if duplicate.is_duplicate {
        notes.push(format!(
            "possible duplicate of {}",
            duplicate.matches.join(", ")
        ));
    }
    notes.extend(fraud.reasons.iter().cloned());
    out.message = format!("{}; flagged: {}", out.message, notes.join("; "));

    out
}
