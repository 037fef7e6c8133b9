//! Policy resolution.
//!
//! Given an employee grade and the policy rows stored for a category, the
//! resolver selects the single applicable row. "No applicable policy" is a
//! valid outcome, not an error; the classifier turns it into a `no_policy`
//! band downstream.

use crate::models::Policy;

/// The outcome of resolving a policy for a (category, grade) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyResolution {
    /// The selected policy row.
    pub policy: Policy,
    /// Set when more than one row matched and a tie-break was applied.
    pub tie_break: Option<String>,
}

/// Selects the applicable policy row for an employee grade.
///
/// Filters `candidates` to rows whose `applicable_grades` contain `grade`.
/// Zero matches resolve to `None`. A single match resolves to that row.
/// Multiple matches are a data-integrity situation that must never pick an
/// arbitrary row: the tie-break prefers the lowest `max_allowance` (the most
/// conservative applicable ceiling), with ties on allowance broken by policy
/// id so resolution is total and reproducible. The tie-break is reported via
/// [`PolicyResolution::tie_break`].
///
/// This function is never called for an unknown employee; the pipeline
/// branches to `employee_not_found` first.
pub fn resolve_policy(grade: &str, candidates: &[Policy]) -> Option<PolicyResolution> {
    let mut matches: Vec<&Policy> = candidates
        .iter()
        .filter(|policy| policy.applies_to_grade(grade))
        .collect();

    match matches.len() {
        0 => None,
        1 => Some(PolicyResolution {
            policy: matches[0].clone(),
            tie_break: None,
        }),
        n => {
            matches.sort_by(|a, b| {
                a.max_allowance
                    .cmp(&b.max_allowance)
                    .then_with(|| a.id.cmp(&b.id))
            });
            let chosen = matches[0];
            Some(PolicyResolution {
                policy: chosen.clone(),
                tie_break: Some(format!(
                    "{} policies matched grade {}; applied the most conservative ceiling ({})",
                    n, grade, chosen.id
                )),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn policy(id: &str, max_allowance: &str, grades: &[&str]) -> Policy {
        Policy {
            id: id.to_string(),
            category: ExpenseCategory::Food,
            max_allowance: dec(max_allowance),
            per_diem_rate: None,
            currency: "INR".to_string(),
            applicable_grades: grades.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_match_returns_none() {
        let candidates = vec![policy("POL-A", "600", &["G1", "G2"])];
        assert!(resolve_policy("G5", &candidates).is_none());
    }

    #[test]
    fn test_empty_candidates_returns_none() {
        assert!(resolve_policy("G2", &[]).is_none());
    }

    #[test]
    fn test_single_match_resolves_without_warning() {
        let candidates = vec![
            policy("POL-A", "600", &["G1", "G2"]),
            policy("POL-B", "1200", &["G3", "G4"]),
        ];

        let resolution = resolve_policy("G2", &candidates).unwrap();
        assert_eq!(resolution.policy.id, "POL-A");
        assert!(resolution.tie_break.is_none());
    }

    #[test]
    fn test_multiple_matches_prefer_lowest_allowance() {
        let candidates = vec![
            policy("POL-GENEROUS", "1500", &["G2"]),
            policy("POL-LEAN", "600", &["G2"]),
        ];

        let resolution = resolve_policy("G2", &candidates).unwrap();
        assert_eq!(resolution.policy.id, "POL-LEAN");
        let warning = resolution.tie_break.unwrap();
        assert!(warning.contains("2 policies matched"));
        assert!(warning.contains("POL-LEAN"));
    }

    #[test]
    fn test_allowance_tie_breaks_on_policy_id() {
        let candidates = vec![
            policy("POL-B", "600", &["G2"]),
            policy("POL-A", "600", &["G2"]),
        ];

        let resolution = resolve_policy("G2", &candidates).unwrap();
        assert_eq!(resolution.policy.id, "POL-A");
    }

    #[test]
    fn test_resolution_is_deterministic_regardless_of_order() {
        let forward = vec![
            policy("POL-GENEROUS", "1500", &["G2"]),
            policy("POL-LEAN", "600", &["G2"]),
            policy("POL-MID", "900", &["G2"]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = resolve_policy("G2", &forward).unwrap();
        let b = resolve_policy("G2", &reversed).unwrap();
        assert_eq!(a.policy.id, b.policy.id);
        assert_eq!(a.policy.id, "POL-LEAN");
    }
}
