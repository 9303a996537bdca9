//! PhishShield: scores short messages and links for phishing and
//! social-engineering threats.
//!
//! [`ThreatAnalyzer`] runs the registered signal extractors over normalized
//! input, folds their detections into a 0-100 risk score and attaches a
//! category, an explanation and, for risky results, a safety lesson.

pub mod collaborators;
pub mod components;
pub mod config;
pub mod domain_utils;
pub mod engine;
pub mod error;
pub mod features;
pub mod normalization;
pub mod progress;
pub mod state;
pub mod types;

pub use collaborators::{find_help_centers, ContentClassifier, HelpCenter, HelpCenterProvider};
pub use config::EngineConfig;
pub use engine::ThreatAnalyzer;
pub use error::AnalysisError;
pub use progress::{mark_learned, LearnedCategorySet};
pub use state::AppState;
pub use types::{
    AnalysisMetadata, AnalysisResult, AnalysisStatus, ContentKind, EducationModule, HistoryItem,
    ScamCategory, Severity, SignalCategory, ThreatSignal, UrgencyLevel,
};
