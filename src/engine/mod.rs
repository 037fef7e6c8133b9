//! Decision logic for the Claim Validation & Decision Engine.
//!
//! This module contains the rule-evaluation core: payload normalization,
//! policy resolution, the decision classifier, the fraud and duplicate
//! screens, and the lifecycle orchestrator that sequences them.

mod classifier;
mod duplicate;
mod fraud;
mod normalizer;
mod pipeline;
mod resolver;
mod screen;
mod stay;

pub use classifier::{classify, is_recognized_grade};
pub use duplicate::{DuplicateScreenResult, screen_duplicates};
pub use fraud::{FraudScreenResult, screen_fraud};
pub use normalizer::{DEFAULT_CURRENCY, RawExtraction, map_category, normalize_claim};
pub use pipeline::{ClaimPipeline, Phase, RequestContext, ValidationOutcome};
pub use resolver::{PolicyResolution, resolve_policy};
pub use screen::apply_screens;
pub use stay::chargeable_days;

pub(crate) use duplicate::normalize_vendor;
