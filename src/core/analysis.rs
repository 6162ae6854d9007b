use crate::core::Evidence;
use serde::{Deserialize, Serialize};

/// One completed stage of the upstream analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStep {
    pub step: String,
    pub timestamp: String,
}

/// Result document produced by the external analysis pipeline.
///
/// Field names follow the producer's camelCase JSON. Score and impact
/// values are kept signed so that out-of-range documents still decode
/// and can be reported instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub filename: String,
    pub credibility_score: i32,
    pub is_fake: bool,
    pub transcribed_text: String,
    pub summary: String,
    pub processing_steps: Vec<ProcessingStep>,
    pub evidences: Vec<Evidence>,
}
