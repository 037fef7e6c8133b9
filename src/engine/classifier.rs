//! The decision classifier.
//!
//! This is the rule-evaluation core: a pure function from (claim, employee,
//! resolved policy, per-diem rate) to a [`DecisionResult`]. The same inputs
//! always yield the same output, which is what makes a decision auditable:
//! a regulator or employee can replay exactly how an amount became a
//! rejection.
//!
//! Rules are evaluated in a fixed order, first match wins:
//! 1. unknown employee        → Rejected / employee_not_found
//! 2. missing grade           → Pending  / no_policy
//!    malformed grade         → Pending  / grade_mismatch
//! 3. no applicable policy    → Pending  / no_policy
//! 4. currency mismatch       → FinancePending / no_policy
//! 5. amount over the ceiling → Pending  / over_policy
//! 6. within the ceiling      → AutoApproved / within_policy

use rust_decimal::Decimal;

use crate::models::{
    Claim, DecisionMetrics, DecisionResult, DecisionTag, Employee, NormalizationFlag, PerDiemRate,
    RuleBand,
};

use super::resolver::PolicyResolution;
use super::stay::chargeable_days;

/// Returns true when a grade string has the recognized tier shape
/// (`G` followed by digits, e.g. "G1".."G5").
pub fn is_recognized_grade(grade: &str) -> bool {
    grade
        .strip_prefix('G')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Classifies a claim against its employee, resolved policy and per-diem
/// context.
///
/// Pure function: no lookups, no clock, no side effects. The pipeline
/// resolves every input before calling; the classifier still defends against
/// a `None` employee so the employee_not_found band is produced even when a
/// caller skips the directory branch.
///
/// The location-specific per-diem rate takes precedence over the policy's
/// own rate when its currency matches the claim; stay ceilings use
/// `max(max_allowance, rate × days)`. Boundary behavior: an amount exactly
/// equal to the ceiling is within policy.
pub fn classify(
    claim: &Claim,
    employee: Option<&Employee>,
    resolution: Option<&PolicyResolution>,
    per_diem: Option<&PerDiemRate>,
) -> DecisionResult {
    let Some(employee) = employee else {
        return DecisionResult {
            tag: DecisionTag::Rejected,
            decision: "Reject".to_string(),
            rule_band: RuleBand::EmployeeNotFound,
            message: format!(
                "Employee {} not found in the directory",
                claim.employee_id
            ),
            metrics: DecisionMetrics::without_limit(claim.amount, &claim.currency),
            is_duplicate: false,
            fraud_flag: false,
            policy_warning: None,
        };
    };

    let policy_warning = resolution.and_then(|r| r.tie_break.clone());

    let grade = match employee.grade.as_deref().filter(|g| !g.is_empty()) {
        Some(grade) => grade,
        None => {
            return DecisionResult {
                tag: DecisionTag::Pending,
                decision: "Send to Finance Team".to_string(),
                rule_band: RuleBand::NoPolicy,
                message: format!(
                    "Employee {} has no grade recorded; manual review required",
                    employee.id
                ),
                metrics: DecisionMetrics::without_limit(claim.amount, &claim.currency),
                is_duplicate: false,
                fraud_flag: false,
                policy_warning,
            };
        }
    };

    if !is_recognized_grade(grade) {
        return DecisionResult {
            tag: DecisionTag::Pending,
            decision: "Send to Finance Team".to_string(),
            rule_band: RuleBand::GradeMismatch,
            message: format!(
                "Employee {} grade '{}' is not a recognized tier",
                employee.id, grade
            ),
            metrics: DecisionMetrics::without_limit(claim.amount, &claim.currency),
            is_duplicate: false,
            fraud_flag: false,
            policy_warning,
        };
    }

    let Some(resolution) = resolution else {
        return DecisionResult {
            tag: DecisionTag::Pending,
            decision: "Send to Finance Team".to_string(),
            rule_band: RuleBand::NoPolicy,
            message: format!(
                "No policy covers category {} for grade {}",
                claim.category, grade
            ),
            metrics: DecisionMetrics::without_limit(claim.amount, &claim.currency),
            is_duplicate: false,
            fraud_flag: false,
            policy_warning,
        };
    };

    let policy = &resolution.policy;

    if policy.currency != claim.currency {
        let mut metrics = DecisionMetrics::without_limit(claim.amount, &claim.currency);
        metrics.currency_mismatch = true;
        return DecisionResult {
            tag: DecisionTag::FinancePending,
            decision: "Send to Finance Team".to_string(),
            rule_band: RuleBand::NoPolicy,
            message: format!(
                "Claim currency {} does not match policy currency {}; amounts cannot be compared",
                claim.currency, policy.currency
            ),
            metrics,
            is_duplicate: false,
            fraud_flag: false,
            policy_warning,
        };
    }

    let mut limit = policy.max_allowance;
    let mut per_diem_days = None;
    if claim.category.has_stay_semantics() {
        let rate = per_diem
            .filter(|r| r.currency == claim.currency)
            .map(|r| r.rate)
            .or(policy.per_diem_rate);
        if let Some(rate) = rate {
            let days = chargeable_days(&claim.detail);
            limit = limit.max(rate * Decimal::from(days));
            per_diem_days = Some(days);
        }
    }

    let metrics = DecisionMetrics {
        claimed: claim.amount,
        limit: Some(limit),
        excess: (claim.amount - limit).max(Decimal::ZERO),
        per_diem_days,
        currency: claim.currency.clone(),
        currency_mismatch: false,
    };

    if claim.amount > limit {
        return DecisionResult {
            tag: DecisionTag::Pending,
            decision: "Send to Manager".to_string(),
            rule_band: RuleBand::OverPolicy,
            message: format!(
                "Claimed {} {} exceeds limit {} {} by {}",
                claim.amount, claim.currency, limit, claim.currency, metrics.excess
            ),
            metrics,
            is_duplicate: false,
            fraud_flag: false,
            policy_warning,
        };
    }

    if claim.has_flag(NormalizationFlag::LowConfidenceAmount) {
        return DecisionResult {
            tag: DecisionTag::Pending,
            decision: "Send to Finance Team".to_string(),
            rule_band: RuleBand::WithinPolicy,
            message: format!(
                "Amount could not be read reliably from the document; claimed {} {} requires manual review",
                claim.amount, claim.currency
            ),
            metrics,
            is_duplicate: false,
            fraud_flag: false,
            policy_warning,
        };
    }

    DecisionResult {
        tag: DecisionTag::AutoApproved,
        decision: "Approve".to_string(),
        rule_band: RuleBand::WithinPolicy,
        message: format!(
            "Claimed {} {} is within limit {} {}",
            claim.amount, claim.currency, limit, claim.currency
        ),
        metrics,
        is_duplicate: false,
        fraud_flag: false,
        policy_warning,
    }
}
