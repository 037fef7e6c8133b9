//! Request types for the Claim Validation & Decision Engine API.
//!
//! The extract and full phases take a typed request naming the document to
//! process. The validate phase deliberately has no typed request: its body
//! is the claim payload itself, which is untrusted by contract and belongs
//! to the normalizer, not to serde.

use serde::{Deserialize, Serialize};

/// Request body for the extract and full phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// Reference to the document to run extraction on.
    pub document_id: String,
    /// Employee identifier to fall back on when the document carries none.
    #[serde(default)]
    pub employee_hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_hint() {
        let json = r#"{"document_id": "doc-001", "employee_hint": "E1001"}"#;
        let request: ExtractRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.document_id, "doc-001");
        assert_eq!(request.employee_hint.as_deref(), Some("E1001"));
    }

    #[test]
    fn test_hint_is_optional() {
        let json = r#"{"document_id": "doc-001"}"#;
        let request: ExtractRequest = serde_json::from_str(json).unwrap();
        assert!(request.employee_hint.is_none());
    }

    #[test]
    fn test_missing_document_id_is_rejected() {
        let json = r#"{"employee_hint": "E1001"}"#;
        let result: Result<ExtractRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
