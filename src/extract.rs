//! Document extraction boundary.
//!
//! Converting a receipt or invoice into structured fields is the job of an
//! external document-understanding service. Its behavior is opaque and
//! non-deterministic, so the engine treats whatever it returns as untrusted
//! input for the normalizer. Only the call contract lives here.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{EngineError, EngineResult};

/// The document-understanding collaborator.
///
/// Implementations are expected to be idempotent per document: extracting
/// the same document twice is safe and simply re-extracts.
pub trait DocumentExtractor: Send + Sync {
    /// Extracts best-effort structured fields from a document.
    fn extract(&self, document_id: &str) -> EngineResult<Value>;
}

/// An extractor serving canned payloads by document id.
///
/// Backs tests and the demo service; unknown documents fail the way a real
/// extraction outage would.
#[derive(Debug, Default)]
pub struct FixtureExtractor {
    documents: HashMap<String, Value>,
}

impl FixtureExtractor {
    /// Builds an extractor from (document id, payload) pairs.
    pub fn new(documents: Vec<(String, Value)>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }
}

impl DocumentExtractor for FixtureExtractor {
    fn extract(&self, document_id: &str) -> EngineResult<Value> {
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| EngineError::ExtractionFailed {
                message: format!("document '{}' could not be processed", document_id),
            })
    }
}
