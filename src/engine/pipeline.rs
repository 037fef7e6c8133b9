//! The claim lifecycle orchestrator.
//!
//! A two-phase, re-entrant pipeline: `extract` turns a document into a
//! normalized claim, `validate` turns a claim payload into a persisted
//! decision, and `full` chains the two for trusted submission paths. Each
//! phase is stateless between invocations; the engine commits nothing itself
//! and a failed phase leaves no partial state behind.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde_json::Value;
use tracing::info;

use crate::config::{ConfigLoader, ScreeningConfig};
use crate::error::{EngineError, EngineResult};
use crate::extract::DocumentExtractor;
use crate::models::{Claim, ClaimRecord, DecisionResult, DecisionTag};
use crate::store::{
    ClaimLedger, EmployeeDirectory, MemoryDirectory, MemoryLedger, MemoryPolicyStore,
    MemoryVendorRegistry, PolicyStore, VendorRegistry,
};

use super::classifier::classify;
use super::duplicate::screen_duplicates;
use super::fraud::screen_fraud;
use super::normalizer::normalize_claim;
use super::resolver::resolve_policy;
use super::screen::apply_screens;

/// The pipeline phase a caller selects.
///
/// An unrecognized value is a client error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Document → normalized claim, no decision.
    Extract,
    /// Claim payload → decision, persisted.
    Validate,
    /// Extract followed immediately by validate.
    Full,
}

impl FromStr for Phase {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extract" => Ok(Phase::Extract),
            "validate" => Ok(Phase::Validate),
            "full" => Ok(Phase::Full),
            other => Err(EngineError::UnknownPhase {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Extract => write!(f, "extract"),
            Phase::Validate => write!(f, "validate"),
            Phase::Full => write!(f, "full"),
        }
    }
}

/// Explicit per-request context.
///
/// Carried through every pipeline call instead of any process-wide state:
/// two concurrent requests never observe each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// The date this evaluation runs on; substitutes for unparsable expense
    /// dates and anchors claim id issuance.
    pub evaluation_date: NaiveDate,
}

impl RequestContext {
    /// Creates a context for the given evaluation date.
    pub fn new(evaluation_date: NaiveDate) -> Self {
        Self { evaluation_date }
    }
}

/// The outcome of a validate or full run: the issued claim id and the
/// decision attached to the persisted record.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// The claim identifier issued by the ledger.
    pub claim_id: String,
    /// The decision the engine produced.
    pub result: DecisionResult,
}

/// Sequences normalization, lookup, classification, screening and
/// persistence behind a single call surface.
///
/// Holds no session state; reference data is read per request through the
/// collaborator traits, so arbitrarily many evaluations may run in parallel
/// against the same snapshot.
pub struct ClaimPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    directory: Arc<dyn EmployeeDirectory>,
    policies: Arc<dyn PolicyStore>,
    vendors: Arc<dyn VendorRegistry>,
    ledger: Arc<dyn ClaimLedger>,
    screening: ScreeningConfig,
}

impl ClaimPipeline {
    /// Creates a pipeline over the given collaborators.
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        directory: Arc<dyn EmployeeDirectory>,
        policies: Arc<dyn PolicyStore>,
        vendors: Arc<dyn VendorRegistry>,
        ledger: Arc<dyn ClaimLedger>,
        screening: ScreeningConfig,
    ) -> Self {
        Self {
            extractor,
            directory,
            policies,
            vendors,
            ledger,
            screening,
        }
    }

    /// Creates a pipeline over in-memory adapters built from loaded
    /// reference data.
    pub fn from_config(config: &ConfigLoader, extractor: Arc<dyn DocumentExtractor>) -> Self {
        let directory = Arc::new(MemoryDirectory::new(config.employees().to_vec()));
        let policies = Arc::new(MemoryPolicyStore::new(
            config.policies().to_vec(),
            config.per_diem().to_vec(),
        ));
        let vendors = Arc::new(MemoryVendorRegistry::new(
            config
                .vendors()
                .iter()
                .map(|v| (v.name.clone(), v.verified))
                .collect(),
        ));
        let ledger = Arc::new(MemoryLedger::new());
        Self::new(
            extractor,
            directory,
            policies,
            vendors,
            ledger,
            config.screening().clone(),
        )
    }

    /// Extract phase: document reference → normalized claim, no decision.
    ///
    /// `employee_hint` fills in the employee identifier when the document
    /// itself carries none. Nothing is persisted; re-running on the same
    /// document simply re-extracts.
    pub fn extract(
        &self,
        document_id: &str,
        employee_hint: Option<&str>,
        ctx: &RequestContext,
    ) -> EngineResult<Claim> {
        let payload = self.extractor.extract(document_id)?;
        let merged = Self::apply_hint(payload, employee_hint);

        let claim = normalize_claim(&merged, ctx.evaluation_date)?;
        info!(
            document_id,
            employee_id = %claim.employee_id,
            category = %claim.category,
            "Document extracted"
        );
        Ok(claim)
    }

    /// Validate phase: claim payload → decision, persisted.
    pub fn validate(&self, payload: &Value, ctx: &RequestContext) -> EngineResult<ValidationOutcome> {
        let claim = normalize_claim(payload, ctx.evaluation_date)?;
        self.validate_claim(claim, payload.clone(), ctx)
    }

    /// Full pipeline: extract followed immediately by validate, with no
    /// human edit step in between.
    ///
    /// The record retains the extraction output verbatim; the employee hint
    /// only feeds normalization.
    pub fn full(
        &self,
        document_id: &str,
        employee_hint: Option<&str>,
        ctx: &RequestContext,
    ) -> EngineResult<ValidationOutcome> {
        let raw = self.extractor.extract(document_id)?;
        let merged = Self::apply_hint(raw.clone(), employee_hint);
        let claim = normalize_claim(&merged, ctx.evaluation_date)?;
        info!(
            document_id,
            employee_id = %claim.employee_id,
            category = %claim.category,
            "Document extracted"
        );
        self.validate_claim(claim, raw, ctx)
    }

    /// Fills in the employee identifier from the hint when extraction
    /// produced none.
    fn apply_hint(mut payload: Value, employee_hint: Option<&str>) -> Value {
        if let Some(hint) = employee_hint {
            if let Some(object) = payload.as_object_mut() {
                let missing = object
                    .get("employee_id")
                    .map(|v| v.is_null() || v.as_str().is_some_and(str::is_empty))
                    .unwrap_or(true);
                if missing {
                    object.insert("employee_id".to_string(), Value::String(hint.to_string()));
                }
            }
        }
        payload
    }

    fn validate_claim(
        &self,
        claim: Claim,
        raw_payload: Value,
        ctx: &RequestContext,
    ) -> EngineResult<ValidationOutcome> {
        let employee = self.directory.find(&claim.employee_id)?;

        // Resolution is only attempted for a known employee with a usable
        // grade; the classifier owns the branching for the rest.
        let resolution = match &employee {
            Some(emp) => match emp.grade.as_deref().filter(|g| !g.is_empty()) {
                Some(grade) => {
                    let candidates = self.policies.policies_for_category(claim.category)?;
                    resolve_policy(grade, &candidates)
                }
                None => None,
            },
            None => None,
        };

        let per_diem = match (&claim.location, claim.category.has_stay_semantics()) {
            (Some(location), true) => self.policies.per_diem(location, &claim.currency)?,
            _ => None,
        };

        let classified = classify(&claim, employee.as_ref(), resolution.as_ref(), per_diem.as_ref());

        let window_start =
            claim.expense_date - Duration::days(self.screening.duplicate.window_days);
        let recent = self
            .ledger
            .recent_for_employee(&claim.employee_id, window_start)?;
        let duplicate = screen_duplicates(&claim, &recent, None, &self.screening.duplicate);

        let vendor_verified = match &claim.vendor {
            Some(vendor) => self.vendors.is_verified(vendor)?,
            None => None,
        };
        let fraud = screen_fraud(
            &claim,
            classified.metrics.limit,
            vendor_verified,
            &self.screening.fraud,
        );

        let result = apply_screens(classified, &duplicate, &fraud);

        let claim_id = self.ledger.next_claim_id(ctx.evaluation_date)?;
        let record = ClaimRecord {
            claim_id: claim_id.clone(),
            employee_id: claim.employee_id.clone(),
            category: claim.category,
            amount: claim.amount,
            currency: claim.currency.clone(),
            vendor: claim.vendor.clone(),
            expense_date: claim.expense_date,
            status: result.tag,
            auto_approved: result.tag == DecisionTag::AutoApproved,
            is_duplicate: result.is_duplicate,
            fraud_flag: result.fraud_flag,
            raw_payload,
        };
        self.ledger.insert(record)?;

        info!(
            claim_id = %claim_id,
            employee_id = %claim.employee_id,
            category = %claim.category,
            amount = %claim.amount,
            tag = ?result.tag,
            rule_band = ?result.rule_band,
            is_duplicate = result.is_duplicate,
            fraud_flag = result.fraud_flag,
            "Claim validated"
        );

        Ok(ValidationOutcome { claim_id, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FixtureExtractor;
    use crate::models::{ExpenseCategory, Policy, RuleBand};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr as _;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext::new(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap())
    }

    fn test_employee(id: &str, grade: Option<&str>) -> crate::models::Employee {
        crate::models::Employee {
            id: id.to_string(),
            name: "Test Employee".to_string(),
            grade: grade.map(|g| g.to_string()),
            manager_id: None,
            department: None,
            active: true,
        }
    }

    fn food_policy() -> Policy {
        Policy {
            id: "POL-FOOD-STD".to_string(),
            category: ExpenseCategory::Food,
            max_allowance: dec("600"),
            per_diem_rate: None,
            currency: "INR".to_string(),
            applicable_grades: vec!["G1".to_string(), "G2".to_string(), "G3".to_string()],
        }
    }

    fn create_pipeline(documents: Vec<(String, Value)>) -> ClaimPipeline {
        ClaimPipeline::new(
            Arc::new(FixtureExtractor::new(documents)),
            Arc::new(MemoryDirectory::new(vec![
                test_employee("E1001", Some("G2")),
                test_employee("E1002", None),
            ])),
            Arc::new(MemoryPolicyStore::new(vec![food_policy()], vec![])),
            Arc::new(MemoryVendorRegistry::new(vec![(
                "Annapurna Caterers".to_string(),
                true,
            )])),
            Arc::new(MemoryLedger::new()),
            ScreeningConfig::default(),
        )
    }

    fn food_payload(amount: &str) -> Value {
        json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": amount,
            "currency": "INR",
            "vendor": "Annapurna Caterers",
            "expense_date": "2025-06-12"
        })
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("extract".parse::<Phase>().unwrap(), Phase::Extract);
        assert_eq!("validate".parse::<Phase>().unwrap(), Phase::Validate);
        assert_eq!("full".parse::<Phase>().unwrap(), Phase::Full);
    }

    #[test]
    fn test_unrecognized_phase_is_client_error() {
        let err = "approve".parse::<Phase>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownPhase { value } if value == "approve"));
    }

    #[test]
    fn test_phase_display_round_trips() {
        for phase in [Phase::Extract, Phase::Validate, Phase::Full] {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
        }
    }

    #[test]
    fn test_validate_within_policy() {
        let pipeline = create_pipeline(vec![]);

        let outcome = pipeline.validate(&food_payload("500"), &ctx()).unwrap();

        assert_eq!(outcome.claim_id, "CLM-20250612-0001");
        assert_eq!(outcome.result.tag, DecisionTag::AutoApproved);
        assert_eq!(outcome.result.rule_band, RuleBand::WithinPolicy);
    }

    #[test]
    fn test_validate_persists_record_with_decision() {
        let ledger = Arc::new(MemoryLedger::new());
        let pipeline = ClaimPipeline::new(
            Arc::new(FixtureExtractor::default()),
            Arc::new(MemoryDirectory::new(vec![test_employee("E1001", Some("G2"))])),
            Arc::new(MemoryPolicyStore::new(vec![food_policy()], vec![])),
            Arc::new(MemoryVendorRegistry::new(vec![])),
            Arc::clone(&ledger) as Arc<dyn ClaimLedger>,
            ScreeningConfig::default(),
        );

        pipeline.validate(&food_payload("700"), &ctx()).unwrap();

        let records = ledger.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.claim_id, "CLM-20250612-0001");
        assert_eq!(record.status, DecisionTag::Pending);
        assert!(!record.auto_approved);
        assert_eq!(record.raw_payload["vendor"], "Annapurna Caterers");
    }

    #[test]
    fn test_validate_unknown_employee_rejected_without_resolution() {
        let pipeline = create_pipeline(vec![]);
        let payload = json!({
            "employee_id": "E9999",
            "category": "food",
            "amount": "100",
            "currency": "INR"
        });

        let outcome = pipeline.validate(&payload, &ctx()).unwrap();

        assert_eq!(outcome.result.tag, DecisionTag::Rejected);
        assert_eq!(outcome.result.rule_band, RuleBand::EmployeeNotFound);
    }

    #[test]
    fn test_validate_missing_grade_routes_to_finance() {
        let pipeline = create_pipeline(vec![]);
        let payload = json!({
            "employee_id": "E1002",
            "category": "food",
            "amount": "100",
            "currency": "INR"
        });

        let outcome = pipeline.validate(&payload, &ctx()).unwrap();

        assert_eq!(outcome.result.tag, DecisionTag::Pending);
        assert_eq!(outcome.result.rule_band, RuleBand::NoPolicy);
    }

    /// Scenario E end-to-end: the second near-identical claim is downgraded.
    #[test]
    fn test_second_similar_claim_is_flagged_duplicate() {
        let pipeline = create_pipeline(vec![]);

        let first = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": "450",
            "currency": "INR",
            "vendor": "Annapurna Caterers",
            "expense_date": "2025-06-11"
        });
        let second = json!({
            "employee_id": "E1001",
            "category": "food",
            "amount": "450",
            "currency": "INR",
            "vendor": "Annapurna Caterers",
            "expense_date": "2025-06-12"
        });

        let first_outcome = pipeline.validate(&first, &ctx()).unwrap();
        assert_eq!(first_outcome.result.tag, DecisionTag::AutoApproved);
        assert!(!first_outcome.result.is_duplicate);

        let second_outcome = pipeline.validate(&second, &ctx()).unwrap();
        assert!(second_outcome.result.is_duplicate);
        assert_eq!(second_outcome.result.tag, DecisionTag::Pending);
        assert_eq!(second_outcome.result.rule_band, RuleBand::OverPolicy);
        assert!(second_outcome.result.message.contains(&first_outcome.claim_id));
    }

    #[test]
    fn test_claim_ids_are_sequential_within_a_day() {
        let pipeline = create_pipeline(vec![]);

        let a = pipeline.validate(&food_payload("100"), &ctx()).unwrap();
        let b = pipeline.validate(&food_payload("200"), &ctx()).unwrap();

        assert_eq!(a.claim_id, "CLM-20250612-0001");
        assert_eq!(b.claim_id, "CLM-20250612-0002");
    }

    #[test]
    fn test_extract_returns_claim_without_persisting() {
        let ledger = Arc::new(MemoryLedger::new());
        let pipeline = ClaimPipeline::new(
            Arc::new(FixtureExtractor::new(vec![(
                "doc-001".to_string(),
                json!({"employee_id": "E1001", "category": "food", "amount": "450", "currency": "INR"}),
            )])),
            Arc::new(MemoryDirectory::new(vec![test_employee("E1001", Some("G2"))])),
            Arc::new(MemoryPolicyStore::new(vec![food_policy()], vec![])),
            Arc::new(MemoryVendorRegistry::new(vec![])),
            Arc::clone(&ledger) as Arc<dyn ClaimLedger>,
            ScreeningConfig::default(),
        );

        let claim = pipeline.extract("doc-001", None, &ctx()).unwrap();
        assert_eq!(claim.employee_id, "E1001");
        assert_eq!(claim.amount, dec("450"));
        assert!(ledger.records().is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let pipeline = create_pipeline(vec![(
            "doc-001".to_string(),
            json!({"employee_id": "E1001", "category": "food", "amount": "450", "currency": "INR"}),
        )]);

        let first = pipeline.extract("doc-001", None, &ctx()).unwrap();
        let second = pipeline.extract("doc-001", None, &ctx()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_applies_employee_hint_only_when_missing() {
        let pipeline = create_pipeline(vec![
            (
                "doc-no-id".to_string(),
                json!({"category": "food", "amount": "450", "currency": "INR"}),
            ),
            (
                "doc-with-id".to_string(),
                json!({"employee_id": "E1001", "category": "food", "amount": "450", "currency": "INR"}),
            ),
        ]);

        let hinted = pipeline.extract("doc-no-id", Some("E1002"), &ctx()).unwrap();
        assert_eq!(hinted.employee_id, "E1002");

        let unhinted = pipeline
            .extract("doc-with-id", Some("E1002"), &ctx())
            .unwrap();
        assert_eq!(unhinted.employee_id, "E1001");
    }

    #[test]
    fn test_extraction_failure_does_not_corrupt_state() {
        let ledger = Arc::new(MemoryLedger::new());
        let pipeline = ClaimPipeline::new(
            Arc::new(FixtureExtractor::default()),
            Arc::new(MemoryDirectory::new(vec![test_employee("E1001", Some("G2"))])),
            Arc::new(MemoryPolicyStore::new(vec![food_policy()], vec![])),
            Arc::new(MemoryVendorRegistry::new(vec![])),
            Arc::clone(&ledger) as Arc<dyn ClaimLedger>,
            ScreeningConfig::default(),
        );

        let result = pipeline.full("doc-missing", None, &ctx());
        assert!(matches!(result, Err(EngineError::ExtractionFailed { .. })));
        assert!(ledger.records().is_empty());

        // The pipeline still serves subsequent requests.
        let outcome = pipeline.validate(&food_payload("100"), &ctx()).unwrap();
        assert_eq!(outcome.result.tag, DecisionTag::AutoApproved);
    }

    #[test]
    fn test_full_runs_extract_then_validate() {
        let pipeline = create_pipeline(vec![(
            "doc-001".to_string(),
            json!({
                "employee_id": "E1001",
                "category": "food",
                "amount": "500",
                "currency": "INR",
                "vendor": "Annapurna Caterers",
                "expense_date": "2025-06-12"
            }),
        )]);

        let outcome = pipeline.full("doc-001", None, &ctx()).unwrap();
        assert_eq!(outcome.result.tag, DecisionTag::AutoApproved);
        assert_eq!(outcome.claim_id, "CLM-20250612-0001");
    }

    #[test]
    fn test_full_persists_raw_extraction_for_audit() {
        let ledger = Arc::new(MemoryLedger::new());
        let pipeline = ClaimPipeline::new(
            Arc::new(FixtureExtractor::new(vec![(
                "doc-001".to_string(),
                json!({
                    "employee_id": "E1001",
                    "category": "food",
                    "amount": "500",
                    "currency": "INR",
                    "ocr_confidence": 0.93
                }),
            )])),
            Arc::new(MemoryDirectory::new(vec![test_employee("E1001", Some("G2"))])),
            Arc::new(MemoryPolicyStore::new(vec![food_policy()], vec![])),
            Arc::new(MemoryVendorRegistry::new(vec![])),
            Arc::clone(&ledger) as Arc<dyn ClaimLedger>,
            ScreeningConfig::default(),
        );

        pipeline.full("doc-001", None, &ctx()).unwrap();

        let records = ledger.records();
        assert_eq!(records[0].raw_payload["ocr_confidence"], 0.93);
    }
}
