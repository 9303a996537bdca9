//! Scoring and reporting stages that run after signal extraction.
//!
//! Each stage is a pure function of the detections it is handed, so one
//! analysis never observes another.

pub mod aggregator;
pub mod decision_engine;
pub mod education;
pub mod explainer;
pub mod taxonomy;

pub use aggregator::CategoryScores;
pub use decision_engine::{DecisionConfig, DecisionEngine, FinalDecision};
pub use explainer::Explainer;
pub use taxonomy::TaxonomyClassifier;
