//! Duplicate claim detection.
//!
//! A similarity match over a bounded window of the employee's recent claims:
//! same amount, same vendor and an expense date within a small window of
//! another claim is a candidate duplicate. Detection runs after
//! classification and can only downgrade the outcome (see
//! [`super::screen::apply_screens`]).

use crate::config::DuplicateConfig;
use crate::models::{Claim, ClaimRecord};

/// The outcome of the duplicate screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateScreenResult {
    /// True when enough similar recent claims were found.
    pub is_duplicate: bool,
    /// Claim ids of the similar records that were matched.
    pub matches: Vec<String>,
}

/// Normalizes a vendor name for comparison: collapsed whitespace,
/// lowercased.
pub(crate) fn normalize_vendor(vendor: &str) -> String {
    vendor
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Screens a claim against the employee's recent claims.
///
/// `recent` is the bounded window the ledger returned for this employee,
/// not full history. `exclude_claim_id` skips the record for the claim
/// itself when re-evaluating an already persisted claim. The flag fires when
/// at least `config.threshold` similar claims are found within
/// `config.window_days` of the claim's expense date.
pub fn screen_duplicates(
    claim: &Claim,
    recent: &[ClaimRecord],
    exclude_claim_id: Option<&str>,
    config: &DuplicateConfig,
) -> DuplicateScreenResult {
    let claim_vendor = claim.vendor.as_deref().map(normalize_vendor);

    let matches: Vec<String> = recent
        .iter()
        .filter(|record| {
            if exclude_claim_id == Some(record.claim_id.as_str()) {
                return false;
            }
            if record.employee_id != claim.employee_id {
                return false;
            }
            if record.amount != claim.amount {
                return false;
            }
            let record_vendor = record.vendor.as_deref().map(normalize_vendor);
            if record_vendor != claim_vendor {
                return false;
            }
            let gap = (claim.expense_date - record.expense_date).num_days().abs();
            gap <= config.window_days
        })
        .map(|record| record.claim_id.clone())
        .collect();

    DuplicateScreenResult {
        is_duplicate: matches.len() >= config.threshold,
        matches,
    }
}
