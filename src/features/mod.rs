pub mod financial_lures;
pub mod impersonation;
pub mod link_analyzer;
pub mod offer_language;
pub mod pressure_language;
pub mod remote_model;
pub mod tld_risk;

use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::normalization::NormalizedContent;
use crate::types::{Severity, SignalCategory, ThreatSignal};
use regex::Regex;

/// Fine-grained tactic behind a signal. The taxonomy classifier matches on
/// these; the public `flags` list only carries the category and severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    // Semantic
    Urgency,
    AccountThreat,
    Coercion,
    AlarmHeader,
    CallToAction,
    CredentialRequest,
    JobOffer,
    RetailOffer,
    ImplausibleDiscount,
    // Social
    BankImpersonation,
    AuthorityImpersonation,
    ExecutiveImpersonation,
    BrandMention,
    // Financial
    Reward,
    PaymentRequest,
    AdvanceFee,
    GiftCard,
    PaymentRedirection,
    KycUpdate,
    // Technical
    IpLiteralHost,
    Homograph,
    LookalikeDomain,
    SuspiciousTld,
    BaitKeywordHost,
    UrlShortener,
    HiddenHost,
    InsecureTransport,
    MissingTransport,
    FakeHttpsIndicator,
    NestedSubdomains,
    // Reported by a remote model without a recognizable tactic
    ReportedSemantic,
    ReportedTechnical,
    ReportedFinancial,
    ReportedSocial,
}

impl SignalKind {
    /// Time pressure, threats and alarm wording.
    pub fn is_pressure(self) -> bool {
        matches!(
            self,
            SignalKind::Urgency
                | SignalKind::AccountThreat
                | SignalKind::Coercion
                | SignalKind::AlarmHeader
        )
    }

    pub fn is_impersonation(self) -> bool {
        matches!(
            self,
            SignalKind::BankImpersonation
                | SignalKind::AuthorityImpersonation
                | SignalKind::ExecutiveImpersonation
                | SignalKind::BrandMention
                | SignalKind::ReportedSocial
        )
    }

    /// Technical signals that make a domain pass for something it is not.
    pub fn is_lookalike(self) -> bool {
        matches!(
            self,
            SignalKind::Homograph | SignalKind::LookalikeDomain | SignalKind::SuspiciousTld
        )
    }

    pub fn reported(category: SignalCategory) -> Self {
        match category {
            SignalCategory::Semantic => SignalKind::ReportedSemantic,
            SignalCategory::Technical => SignalKind::ReportedTechnical,
            SignalCategory::Financial => SignalKind::ReportedFinancial,
            SignalCategory::Social => SignalKind::ReportedSocial,
        }
    }
}

/// A signal plus the tactic and evidence an extractor saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub signal: ThreatSignal,
    pub kind: SignalKind,
    pub evidence: Option<String>,
}

impl Detection {
    pub fn new(
        kind: SignalKind,
        category: SignalCategory,
        severity: Severity,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            signal: ThreatSignal::new(category, severity, reason),
            kind,
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        let evidence = evidence.into();
        if !evidence.trim().is_empty() {
            self.evidence = Some(evidence);
        }
        self
    }

    pub fn category(&self) -> SignalCategory {
        self.signal.category
    }

    pub fn severity(&self) -> Severity {
        self.signal.severity
    }
}

/// One regex family that emits at most one signal per analysis.
#[derive(Debug, Clone)]
pub struct PatternGroup {
    pub kind: SignalKind,
    pub category: SignalCategory,
    pub severity: Severity,
    pub reason: String,
    regex: Regex,
}

impl PatternGroup {
    pub fn new(
        kind: SignalKind,
        category: SignalCategory,
        severity: Severity,
        reason: &str,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            kind,
            category,
            severity,
            reason: reason.to_string(),
            regex: Regex::new(pattern)?,
        })
    }

    /// First match in the folded text, with the literal original excerpt as evidence.
    pub fn detect(&self, content: &NormalizedContent) -> Option<Detection> {
        let found = self.regex.find(content.text())?;
        let excerpt = content.excerpt(found.range());
        Some(
            Detection::new(self.kind, self.category, self.severity, self.reason.clone())
                .with_evidence(excerpt),
        )
    }
}

pub trait SignalExtractor: Send + Sync {
    /// Scan one snapshot. An extractor that cannot evaluate the content kind
    /// returns `AnalysisError::ExtractorUnavailable`.
    fn extract(&self, content: &NormalizedContent) -> Result<Vec<Detection>, AnalysisError>;
    fn name(&self) -> &str;
}

/// Runs every registered extractor in registration order.
pub struct FeatureEngine {
    extractors: Vec<Box<dyn SignalExtractor>>,
}

impl FeatureEngine {
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let candidates: Vec<Box<dyn SignalExtractor>> = vec![
            Box::new(pressure_language::PressureLanguageAnalyzer::new()?),
            Box::new(offer_language::OfferLanguageAnalyzer::new()?),
            Box::new(impersonation::ImpersonationAnalyzer::from_config(config)?),
            Box::new(financial_lures::FinancialLureAnalyzer::new()?),
            Box::new(link_analyzer::LinkAnalyzer::from_config(config)?),
        ];

        let extractors = candidates
            .into_iter()
            .filter(|extractor| {
                let enabled = !config
                    .disabled_extractors
                    .iter()
                    .any(|name| name == extractor.name());
                if !enabled {
                    log::info!("Extractor disabled by configuration: {}", extractor.name());
                }
                enabled
            })
            .collect();

        Ok(Self { extractors })
    }

    /// Append an extractor after the built-in ones.
    pub fn register(&mut self, extractor: Box<dyn SignalExtractor>) {
        log::debug!("Registered extractor: {}", extractor.name());
        self.extractors.push(extractor);
    }

    pub fn names(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    pub fn analyze(&self, content: &NormalizedContent) -> Vec<Detection> {
        let mut detections = Vec::new();

        for extractor in &self.extractors {
            match extractor.extract(content) {
                Ok(found) => {
                    log::debug!("{}: {} signal(s)", extractor.name(), found.len());
                    detections.extend(found);
                }
                Err(AnalysisError::ExtractorUnavailable { extractor: name, kind }) => {
                    log::debug!("{} skipped for {} content", name, kind);
                }
                Err(e) => {
                    log::warn!("{} failed, continuing without it: {}", extractor.name(), e);
                }
            }
        }

        detections
    }
}
