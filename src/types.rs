use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared shape of the content handed to the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Url,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Text => f.pad("text"),
            ContentKind::Url => f.pad("url"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalCategory {
    Semantic,
    Technical,
    Financial,
    Social,
}

impl SignalCategory {
    pub const ALL: [SignalCategory; 4] = [
        SignalCategory::Semantic,
        SignalCategory::Technical,
        SignalCategory::Financial,
        SignalCategory::Social,
    ];
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalCategory::Semantic => "Semantic",
            SignalCategory::Technical => "Technical",
            SignalCategory::Financial => "Financial",
            SignalCategory::Social => "Social",
        };
        f.pad(name)
    }
}

/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Contribution of one signal to its category sub-score.
    pub fn weight(self) -> u8 {
        match self {
            Severity::High => 40,
            Severity::Medium => 20,
            Severity::Low => 8,
        }
    }
}

/// One unit of evidence produced by an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatSignal {
    pub category: SignalCategory,
    pub reason: String,
    pub severity: Severity,
}

impl ThreatSignal {
    pub fn new(category: SignalCategory, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            category,
            reason: reason.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisStatus {
    Safe,
    Suspicious,
    Scam,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStatus::Safe => "Safe",
            AnalysisStatus::Suspicious => "Suspicious",
            AnalysisStatus::Scam => "Scam",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScamCategory {
    #[serde(rename = "Job Scam")]
    JobScam,
    #[serde(rename = "Payment Fraud")]
    PaymentFraud,
    #[serde(rename = "Fake Shopping Website")]
    FakeShoppingWebsite,
    #[serde(rename = "Lottery / Reward Scam")]
    LotteryRewardScam,
    #[serde(rename = "OTP / Account Takeover Scam")]
    AccountTakeover,
    General,
    None,
}

impl ScamCategory {
    /// Categories that carry a distinct lesson for the progress ledger.
    pub fn is_teachable(self) -> bool {
        !matches!(self, ScamCategory::General | ScamCategory::None)
    }

    pub fn label(self) -> &'static str {
        match self {
            ScamCategory::JobScam => "Job Scam",
            ScamCategory::PaymentFraud => "Payment Fraud",
            ScamCategory::FakeShoppingWebsite => "Fake Shopping Website",
            ScamCategory::LotteryRewardScam => "Lottery / Reward Scam",
            ScamCategory::AccountTakeover => "OTP / Account Takeover Scam",
            ScamCategory::General => "General",
            ScamCategory::None => "None",
        }
    }
}

impl fmt::Display for ScamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UrgencyLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationModule {
    pub scam_description: String,
    pub danger_reason: String,
    pub safety_tips: Vec<String>,
    pub red_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub urgency_level: UrgencyLevel,
    pub is_financial_threat: bool,
    pub is_impersonation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_age: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub status: AnalysisStatus,
    pub category: ScamCategory,
    pub score: u8,
    pub explanation: String,
    pub flags: Vec<ThreatSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<EducationModule>,
    pub metadata: AnalysisMetadata,
}

/// One analysis invocation as remembered by the calling application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub input: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub result: AnalysisResult,
    pub timestamp: DateTime<Utc>,
}

impl HistoryItem {
    pub fn new(input: impl Into<String>, kind: ContentKind, result: AnalysisResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            input: input.into(),
            kind,
            result,
            timestamp: Utc::now(),
        }
    }
}
