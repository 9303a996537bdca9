use crate::types::ContentKind;

/// Conditions raised inside the analysis pipeline.
///
/// Only `EmptyInput` is returned from `ThreatAnalyzer::analyze`; the other
/// variants are logged and degrade to fewer signals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("input is empty or whitespace only")]
    EmptyInput,
    #[error("extractor '{extractor}' cannot evaluate {kind} content")]
    ExtractorUnavailable {
        extractor: String,
        kind: ContentKind,
    },
    #[error("classification provider unavailable: {0}")]
    ClassificationUnavailable(String),
    #[error("malformed collaborator response: {0}")]
    MalformedCollaboratorResponse(String),
}

impl AnalysisError {
    pub fn unavailable(extractor: &str, kind: ContentKind) -> Self {
        AnalysisError::ExtractorUnavailable {
            extractor: extractor.to_string(),
            kind,
        }
    }
}
