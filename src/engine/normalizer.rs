//! Claim normalization.
//!
//! The document-understanding collaborator returns best-effort JSON: keys may
//! be missing, null or mistyped. This module coerces that untrusted payload
//! into a canonical [`Claim`], rejecting only structurally hopeless input.
//! Every substitution is recorded as a [`NormalizationFlag`] on the claim.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};
use crate::models::{Claim, ClaimDetail, ExpenseCategory, NormalizationFlag};

/// Currency assumed when extraction produced none.
pub const DEFAULT_CURRENCY: &str = "INR";

/// The untrusted extraction payload, with a catch-all bag for fields the
/// engine does not model.
///
/// Every field is optional and loosely typed; coercion happens in
/// [`normalize_claim`], not in serde.
#[derive(Debug, Default, Deserialize)]
pub struct RawExtraction {
    #[serde(default)]
    employee_id: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    amount: Option<Value>,
    #[serde(default)]
    currency: Option<Value>,
    #[serde(default)]
    vendor: Option<Value>,
    #[serde(default)]
    expense_date: Option<Value>,
    #[serde(default)]
    location: Option<Value>,
    #[serde(default)]
    hotel: Option<RawStay>,
    #[serde(default)]
    travel: Option<RawJourney>,
    /// Fields the extractor returned that the engine does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hotel stay detail as extracted.
#[derive(Debug, Default, Deserialize)]
struct RawStay {
    #[serde(default, alias = "checkin")]
    check_in: Option<Value>,
    #[serde(default, alias = "checkout")]
    check_out: Option<Value>,
    #[serde(default)]
    city: Option<Value>,
}

/// Travel journey detail as extracted.
#[derive(Debug, Default, Deserialize)]
struct RawJourney {
    #[serde(default)]
    from_city: Option<Value>,
    #[serde(default)]
    to_city: Option<Value>,
    #[serde(default)]
    departure: Option<Value>,
    #[serde(default, alias = "return")]
    return_date: Option<Value>,
}

/// Validates and coerces an extraction payload into a canonical [`Claim`].
///
/// Pure transformation: no lookups, no side effects. The only hard failures
/// are a non-object payload ([`EngineError::InvalidPayload`]) and a missing
/// employee identifier ([`EngineError::MissingEmployeeId`]); everything else
/// is coerced and flagged so the classifier can still reason about the claim.
///
/// `evaluation_date` substitutes for missing or unparsable expense dates,
/// and the substitution is visible to callers via
/// [`NormalizationFlag::DefaultedExpenseDate`].
pub fn normalize_claim(payload: &Value, evaluation_date: NaiveDate) -> EngineResult<Claim> {
    if !payload.is_object() {
        return Err(EngineError::InvalidPayload {
            message: "payload must be a JSON object".to_string(),
        });
    }

    let raw: RawExtraction =
        serde_json::from_value(payload.clone()).map_err(|e| EngineError::InvalidPayload {
            message: e.to_string(),
        })?;

    let employee_id = raw
        .employee_id
        .as_ref()
        .and_then(coerce_string)
        .filter(|id| !id.is_empty())
        .ok_or(EngineError::MissingEmployeeId)?;

    let mut flags = Vec::new();

    let category_text = raw.category.as_ref().and_then(coerce_string);
    let (category, recognized) = map_category(category_text.as_deref().unwrap_or(""));
    if !recognized {
        flags.push(NormalizationFlag::UnknownCategory);
    }

    let amount = match raw.amount.as_ref().and_then(coerce_amount) {
        Some(amount) => amount,
        None => {
            flags.push(NormalizationFlag::LowConfidenceAmount);
            Decimal::ZERO
        }
    };

    let currency = match raw
        .currency
        .as_ref()
        .and_then(coerce_string)
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()))
    {
        Some(currency) => currency,
        None => {
            flags.push(NormalizationFlag::DefaultedCurrency);
            DEFAULT_CURRENCY.to_string()
        }
    };

    let expense_date = match raw.expense_date.as_ref().and_then(coerce_date) {
        Some(date) => date,
        None => {
            flags.push(NormalizationFlag::DefaultedExpenseDate);
            evaluation_date
        }
    };

    let vendor = raw
        .vendor
        .as_ref()
        .and_then(coerce_string)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let detail = build_detail(category, &raw);

    let location = raw
        .location
        .as_ref()
        .and_then(coerce_string)
        .or_else(|| {
            raw.hotel
                .as_ref()
                .and_then(|h| h.city.as_ref())
                .and_then(coerce_string)
        })
        .or_else(|| {
            raw.travel
                .as_ref()
                .and_then(|t| t.to_city.as_ref())
                .and_then(coerce_string)
        })
        .map(|l| l.trim().to_ascii_lowercase())
        .filter(|l| !l.is_empty());

    Ok(Claim {
        employee_id,
        category,
        amount,
        currency,
        vendor,
        expense_date,
        location,
        detail,
        flags,
    })
}

/// Maps a raw category string through the fixed alias table.
///
/// Returns the category and whether the input was recognized; unmapped
/// values become [`ExpenseCategory::Other`].
pub fn map_category(raw: &str) -> (ExpenseCategory, bool) {
    let key = raw.trim().to_ascii_lowercase();
    let category = match key.as_str() {
        "travel" | "flight" | "flights" | "airfare" | "air travel" | "train" => {
            ExpenseCategory::Travel
        }
        "hotel" | "lodging" | "accommodation" | "stay" => ExpenseCategory::Hotel,
        "food" | "meal" | "meals" | "dining" | "food & beverage" => ExpenseCategory::Food,
        "local_conveyance" | "local conveyance" | "local" | "cab" | "taxi" | "conveyance" => {
            ExpenseCategory::LocalConveyance
        }
        _ => return (ExpenseCategory::Other, false),
    };
    (category, true)
}

fn build_detail(category: ExpenseCategory, raw: &RawExtraction) -> ClaimDetail {
    match category {
        ExpenseCategory::Hotel => {
            let stay = raw.hotel.as_ref();
            ClaimDetail::Hotel {
                check_in: stay.and_then(|s| s.check_in.as_ref()).and_then(coerce_date),
                check_out: stay.and_then(|s| s.check_out.as_ref()).and_then(coerce_date),
            }
        }
        ExpenseCategory::Travel => {
            let journey = raw.travel.as_ref();
            ClaimDetail::Travel {
                from_city: journey
                    .and_then(|j| j.from_city.as_ref())
                    .and_then(coerce_string),
                to_city: journey
                    .and_then(|j| j.to_city.as_ref())
                    .and_then(coerce_string),
                departure: journey
                    .and_then(|j| j.departure.as_ref())
                    .and_then(coerce_date),
                return_date: journey
                    .and_then(|j| j.return_date.as_ref())
                    .and_then(coerce_date),
            }
        }
        _ => ClaimDetail::None,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_amount(value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => {
            let cleaned = s.trim().replace(',', "");
            Decimal::from_str(&cleaned).ok()
        }
        _ => None,
    };
    // Negative amounts are extraction noise, not refunds.
    parsed.filter(|amount| !amount.is_sign_negative())
}

fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let text = match value {
        Value::String(s) => s.trim(),
        _ => return None,
    };
    NaiveDate::from_str(text)
        .ok()
        .or_else(|| text.get(..10).and_then(|d| NaiveDate::from_str(d).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_well_formed_payload() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": 450.0,
            "currency": "inr",
            "vendor": " Annapurna Caterers ",
            "expense_date": "2025-06-10"
        });

        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.employee_id, "E1001");
        assert_eq!(claim.category, ExpenseCategory::Food);
        assert_eq!(claim.amount, dec("450.0"));
        assert_eq!(claim.currency, "INR");
        assert_eq!(claim.vendor.as_deref(), Some("Annapurna Caterers"));
        assert_eq!(
            claim.expense_date,
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        );
        assert!(claim.flags.is_empty());
    }

    #[test]
    fn test_missing_employee_id_fails() {
        let payload = json!({"category": "food", "amount": 100, "currency": "INR"});
        let result = normalize_claim(&payload, eval_date());
        assert!(matches!(result, Err(EngineError::MissingEmployeeId)));
    }

    #[test]
    fn test_empty_employee_id_fails() {
        let payload = json!({"employee_id": "", "category": "food"});
        let result = normalize_claim(&payload, eval_date());
        assert!(matches!(result, Err(EngineError::MissingEmployeeId)));
    }

    #[test]
    fn test_non_object_payload_fails() {
        let result = normalize_claim(&json!([1, 2, 3]), eval_date());
        assert!(matches!(result, Err(EngineError::InvalidPayload { .. })));
    }

    #[test]
    fn test_numeric_employee_id_is_coerced() {
        let payload = json!({"employee_id": 1001, "category": "food", "amount": 10, "currency": "INR"});
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.employee_id, "1001");
    }

    #[test]
    fn test_missing_amount_coerces_to_zero_with_flag() {
        let payload = json!({"employee_id": "E1001", "category": "food", "currency": "INR"});
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.amount, Decimal::ZERO);
        assert!(claim.has_flag(NormalizationFlag::LowConfidenceAmount));
    }

    #[test]
    fn test_unparseable_amount_coerces_to_zero_with_flag() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": "about forty",
            "currency": "INR"
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.amount, Decimal::ZERO);
        assert!(claim.has_flag(NormalizationFlag::LowConfidenceAmount));
    }

    #[test]
    fn test_negative_amount_coerces_to_zero_with_flag() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": "-120.00",
            "currency": "INR"
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.amount, Decimal::ZERO);
        assert!(claim.has_flag(NormalizationFlag::LowConfidenceAmount));
    }

    #[test]
    fn test_string_amount_with_thousands_separator() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "hotel",
            "amount": "5,200.00",
            "currency": "INR"
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.amount, dec("5200.00"));
        assert!(!claim.has_flag(NormalizationFlag::LowConfidenceAmount));
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(map_category("Local Conveyance"), (ExpenseCategory::LocalConveyance, true));
        assert_eq!(map_category("local"), (ExpenseCategory::LocalConveyance, true));
        assert_eq!(map_category("TAXI"), (ExpenseCategory::LocalConveyance, true));
        assert_eq!(map_category("airfare"), (ExpenseCategory::Travel, true));
        assert_eq!(map_category("Lodging"), (ExpenseCategory::Hotel, true));
        assert_eq!(map_category("meals"), (ExpenseCategory::Food, true));
        assert_eq!(map_category("sundries"), (ExpenseCategory::Other, false));
        assert_eq!(map_category(""), (ExpenseCategory::Other, false));
    }

    #[test]
    fn test_unmapped_category_becomes_other_with_flag() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "sundries",
            "amount": 100,
            "currency": "INR"
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.category, ExpenseCategory::Other);
        assert!(claim.has_flag(NormalizationFlag::UnknownCategory));
    }

    #[test]
    fn test_missing_currency_defaults_with_flag() {
        let payload = json!({"employee_id": "E1001", "category": "food", "amount": 100});
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.currency, DEFAULT_CURRENCY);
        assert!(claim.has_flag(NormalizationFlag::DefaultedCurrency));
    }

    #[test]
    fn test_malformed_currency_defaults_with_flag() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": 100,
            "currency": "rupees"
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.currency, DEFAULT_CURRENCY);
        assert!(claim.has_flag(NormalizationFlag::DefaultedCurrency));
    }

    #[test]
    fn test_unparsable_date_defaults_to_evaluation_date_with_flag() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": 100,
            "currency": "INR",
            "expense_date": "last tuesday"
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.expense_date, eval_date());
        assert!(claim.has_flag(NormalizationFlag::DefaultedExpenseDate));
    }

    #[test]
    fn test_timestamp_date_is_truncated() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": 100,
            "currency": "INR",
            "expense_date": "2025-06-10T18:30:00Z"
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(
            claim.expense_date,
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        );
        assert!(!claim.has_flag(NormalizationFlag::DefaultedExpenseDate));
    }

    #[test]
    fn test_hotel_detail_and_location() {
        let payload = json!({
            "employee_id": "E1002",
            "category": "hotel",
            "amount": "5200",
            "currency": "INR",
            "expense_date": "2025-06-10",
            "hotel": {
                "check_in": "2025-06-08",
                "check_out": "2025-06-10",
                "city": "Mumbai"
            }
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(
            claim.detail,
            ClaimDetail::Hotel {
                check_in: NaiveDate::from_ymd_opt(2025, 6, 8),
                check_out: NaiveDate::from_ymd_opt(2025, 6, 10),
            }
        );
        assert_eq!(claim.location.as_deref(), Some("mumbai"));
    }

    #[test]
    fn test_travel_detail_with_return_alias() {
        let payload = json!({
            "employee_id": "E1003",
            "category": "flight",
            "amount": "8000",
            "currency": "INR",
            "travel": {
                "from_city": "Pune",
                "to_city": "Delhi",
                "departure": "2025-06-01",
                "return": "2025-06-04"
            }
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(claim.category, ExpenseCategory::Travel);
        assert_eq!(
            claim.detail,
            ClaimDetail::Travel {
                from_city: Some("Pune".to_string()),
                to_city: Some("Delhi".to_string()),
                departure: NaiveDate::from_ymd_opt(2025, 6, 1),
                return_date: NaiveDate::from_ymd_opt(2025, 6, 4),
            }
        );
        assert_eq!(claim.location.as_deref(), Some("delhi"));
    }

    #[test]
    fn test_bad_detail_dates_become_none_not_errors() {
        let payload = json!({
            "employee_id": "E1002",
            "category": "hotel",
            "amount": "5200",
            "currency": "INR",
            "hotel": {"check_in": "yesterday", "check_out": 42}
        });
        let claim = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(
            claim.detail,
            ClaimDetail::Hotel {
                check_in: None,
                check_out: None,
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": 100,
            "currency": "INR",
            "ocr_confidence": 0.91,
            "page_count": 2
        });
        assert!(normalize_claim(&payload, eval_date()).is_ok());
    }

    #[test]
    fn test_normalization_is_pure() {
        let payload = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": "450",
            "currency": "INR",
            "expense_date": "2025-06-10"
        });
        let first = normalize_claim(&payload, eval_date()).unwrap();
        let second = normalize_claim(&payload, eval_date()).unwrap();
        assert_eq!(first, second);
    }
}
