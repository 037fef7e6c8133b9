//! Fraud heuristics.
//!
//! Three independent signals: an amount that dwarfs the applicable ceiling,
//! a vendor the registry marks unverified, and category detail that is
//! internally inconsistent. Like the duplicate screen, a fraud flag
//! annotates and downgrades; it never blocks the pipeline.

use rust_decimal::Decimal;

use crate::config::FraudConfig;
use crate::models::{Claim, ClaimDetail};

/// The outcome of the fraud screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FraudScreenResult {
    /// True when any heuristic fired.
    pub fraud_flag: bool,
    /// Human-readable reasons, one per fired heuristic.
    pub reasons: Vec<String>,
}

/// Screens a claim for fraud signals.
///
/// `policy_ceiling` is the effective limit the classifier compared against
/// (per-diem included), when one resolved. `vendor_verified` is the vendor
/// registry's answer: `Some(false)` means the vendor is known and unverified;
/// `None` means the vendor is simply not registered and is not flagged.
pub fn screen_fraud(
    claim: &Claim,
    policy_ceiling: Option<Decimal>,
    vendor_verified: Option<bool>,
    config: &FraudConfig,
) -> FraudScreenResult {
    let mut reasons = Vec::new();

    if let Some(ceiling) = policy_ceiling {
        if ceiling > Decimal::ZERO && claim.amount > ceiling * config.ceiling_multiplier {
            reasons.push(format!(
                "amount {} is more than {}x the policy ceiling {}",
                claim.amount, config.ceiling_multiplier, ceiling
            ));
        }
    }

    if vendor_verified == Some(false) {
        let vendor = claim.vendor.as_deref().unwrap_or("(unknown)");
        reasons.push(format!("vendor '{}' is unverified in the registry", vendor));
    }

    match &claim.detail {
        ClaimDetail::Hotel {
            check_in: Some(check_in),
            check_out: Some(check_out),
        } if check_out < check_in => {
            reasons.push(format!(
                "hotel check-out {} precedes check-in {}",
                check_out, check_in
            ));
        }
        ClaimDetail::Travel {
            departure: Some(departure),
            return_date: Some(return_date),
            ..
        } if return_date < departure => {
            reasons.push(format!(
                "travel return {} precedes departure {}",
                return_date, departure
            ));
        }
        _ => {}
    }

    FraudScreenResult {
        fraud_flag: !reasons.is_empty(),
        reasons,
    }
}
