//! Persisted claim record.
//!
//! The engine never writes these itself; the orchestrator attaches a decision
//! to a [`ClaimRecord`] and hands it to the claim ledger collaborator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DecisionTag, ExpenseCategory};

/// Formats a claim identifier as `CLM-YYYYMMDD-NNNN`.
///
/// The numeric suffix is an atomic per-day sequence issued by the claim
/// ledger; it is never derived from a row count.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use expense_engine::models::format_claim_id;
///
/// let date = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
/// assert_eq!(format_claim_id(date, 7), "CLM-20250612-0007");
/// ```
pub fn format_claim_id(date: NaiveDate, sequence: u32) -> String {
    format!("CLM-{}-{:04}", date.format("%Y%m%d"), sequence)
}

/// A claim as retained by the external claim store after a decision was
/// attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Claim identifier in `CLM-YYYYMMDD-NNNN` format.
    pub claim_id: String,
    /// Identifier of the submitting employee.
    pub employee_id: String,
    /// The expense category.
    pub category: ExpenseCategory,
    /// The claimed amount.
    pub amount: Decimal,
    /// 3-letter currency code.
    pub currency: String,
    /// The vendor on the receipt, if known.
    pub vendor: Option<String>,
    /// The expense date.
    pub expense_date: NaiveDate,
    /// Status mirroring the decision tag.
    pub status: DecisionTag,
    /// True when the claim was approved without human review.
    pub auto_approved: bool,
    /// True when the duplicate screen flagged the claim.
    pub is_duplicate: bool,
    /// True when the fraud screen flagged the claim.
    pub fraud_flag: bool,
    /// The raw extracted payload, retained verbatim for audit.
    pub raw_payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_claim_id_format() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        assert_eq!(format_claim_id(date, 1), "CLM-20251203-0001");
        assert_eq!(format_claim_id(date, 482), "CLM-20251203-0482");
    }

    #[test]
    fn test_claim_id_sequence_padding_grows_past_four_digits() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(format_claim_id(date, 12345), "CLM-20250101-12345");
    }

    #[test]
    fn test_record_round_trip() {
        let record = ClaimRecord {
            claim_id: "CLM-20250612-0001".to_string(),
            employee_id: "E1001".to_string(),
            category: ExpenseCategory::Food,
            amount: Decimal::from_str("450.00").unwrap(),
            currency: "INR".to_string(),
            vendor: Some("Annapurna Caterers".to_string()),
            expense_date: NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
            status: DecisionTag::AutoApproved,
            auto_approved: true,
            is_duplicate: false,
            fraud_flag: false,
            raw_payload: serde_json::json!({"amount": "450.00"}),
        };

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ClaimRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
