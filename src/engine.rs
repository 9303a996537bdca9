//! The analysis pipeline: normalize, extract, aggregate, score, classify,
//! explain.

use crate::collaborators::ContentClassifier;
use crate::components::education;
use crate::components::{CategoryScores, DecisionEngine, Explainer, TaxonomyClassifier};
use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::features::link_analyzer::LinkFinder;
use crate::features::remote_model::RemoteModelExtractor;
use crate::features::{Detection, FeatureEngine, SignalExtractor};
use crate::normalization::{ContentNormalizer, NormalizedContent};
use crate::types::{
    AnalysisMetadata, AnalysisResult, AnalysisStatus, ContentKind, ScamCategory, Severity,
    SignalCategory, UrgencyLevel,
};

/// Immutable after construction; share one instance across threads.
pub struct ThreatAnalyzer {
    normalizer: ContentNormalizer,
    features: FeatureEngine,
    decision_engine: DecisionEngine,
    link_finder: LinkFinder,
}

impl ThreatAnalyzer {
    pub fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let features = FeatureEngine::from_config(config)?;
        log::debug!("Extractors: {}", features.names().join(", "));

        Ok(Self {
            normalizer: ContentNormalizer::new(),
            features,
            decision_engine: DecisionEngine::default(),
            link_finder: LinkFinder::new()?,
        })
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Self::new(&EngineConfig::default())
    }

    /// Add a hosted model as one more extractor, run after the local ones.
    pub fn with_classifier(self, classifier: Box<dyn ContentClassifier>) -> Self {
        self.with_extractor(Box::new(RemoteModelExtractor::new(classifier)))
    }

    pub fn with_extractor(mut self, extractor: Box<dyn SignalExtractor>) -> Self {
        self.features.register(extractor);
        self
    }

    pub fn analyze(&self, input: &str, kind: ContentKind) -> Result<AnalysisResult, AnalysisError> {
        let content = self.normalizer.normalize(input, kind)?;
        if !content.obfuscation().is_empty() {
            log::debug!("Obfuscation resolved: {:?}", content.obfuscation());
        }
        let detections = self.features.analyze(&content);

        let scores = CategoryScores::from_detections(&detections);
        let decision = self.decision_engine.make_decision(&scores);
        let category = TaxonomyClassifier::classify(
            &detections,
            decision.score,
            self.decision_engine.get_config().safe_max,
        );

        let explanation =
            Explainer::explain(&detections, decision.status, category, decision.score);
        let education = if decision.status != AnalysisStatus::Safe
            && category != ScamCategory::None
        {
            education::build_module(category, &detections, self.has_link(&content))
        } else {
            None
        };

        log::debug!(
            "Analyzed {} input: {} signal(s), score {}, {} / {}",
            kind,
            detections.len(),
            decision.score,
            decision.status,
            category
        );

        Ok(AnalysisResult {
            status: decision.status,
            category,
            score: decision.score,
            explanation,
            metadata: metadata(&detections),
            flags: detections.into_iter().map(|d| d.signal).collect(),
            education,
        })
    }

    /// Same notion of a link as the link analyzer.
    fn has_link(&self, content: &NormalizedContent) -> bool {
        content.kind() == ContentKind::Url || self.link_finder.contains_link(content.text())
    }
}

fn urgency_level(detections: &[Detection]) -> UrgencyLevel {
    let pressure: Vec<Severity> = detections
        .iter()
        .filter(|d| d.kind.is_pressure())
        .map(|d| d.severity())
        .collect();

    let high_count = pressure.iter().filter(|s| **s == Severity::High).count();
    if high_count >= 2 {
        return UrgencyLevel::Critical;
    }

    match pressure.iter().max() {
        Some(Severity::High) => UrgencyLevel::High,
        Some(Severity::Medium) => UrgencyLevel::Medium,
        Some(Severity::Low) => UrgencyLevel::Low,
        None => UrgencyLevel::None,
    }
}

fn metadata(detections: &[Detection]) -> AnalysisMetadata {
    AnalysisMetadata {
        urgency_level: urgency_level(detections),
        is_financial_threat: detections
            .iter()
            .any(|d| d.category() == SignalCategory::Financial),
        is_impersonation: detections
            .iter()
            .any(|d| d.category() == SignalCategory::Social),
        domain_age: None,
    }
}
