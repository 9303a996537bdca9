//! Decision Engine Component
//!
//! Combines category sub-scores into the composite risk score and maps the
//! score to a verdict through threshold bands.

use crate::components::aggregator::CategoryScores;
use crate::types::{AnalysisStatus, SignalCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Weight of the Semantic bucket in tenths. Social signals count here.
    pub semantic_weight: u32,
    pub technical_weight: u32,
    pub financial_weight: u32,
    /// Highest score still reported as Safe
    pub safe_max: u8,
    /// Lowest score reported as Scam
    pub scam_min: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalDecision {
    pub score: u8,
    pub status: AnalysisStatus,
    pub reasoning: String,
}

pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    pub fn make_decision(&self, scores: &CategoryScores) -> FinalDecision {
        let score = self.composite_score(scores);
        let status = self.determine_status(score);
        let reasoning = self.build_reasoning(score, status, scores);
        log::debug!("{}", reasoning);

        FinalDecision {
            score,
            status,
            reasoning,
        }
    }

    /// Weighted mean of the buckets, rounded half up, in [0, 100].
    pub fn composite_score(&self, scores: &CategoryScores) -> u8 {
        let semantic = (scores.semantic as u32 + scores.social as u32).min(100);
        let technical = scores.technical as u32;
        let financial = scores.financial as u32;

        let total_weight = self.config.semantic_weight
            + self.config.technical_weight
            + self.config.financial_weight;
        if total_weight == 0 {
            return 0;
        }

        let weighted = semantic * self.config.semantic_weight
            + technical * self.config.technical_weight
            + financial * self.config.financial_weight;

        let rounded = (2 * weighted + total_weight) / (2 * total_weight);
        rounded.min(100) as u8
    }

    pub fn determine_status(&self, score: u8) -> AnalysisStatus {
        if score >= self.config.scam_min {
            AnalysisStatus::Scam
        } else if score > self.config.safe_max {
            AnalysisStatus::Suspicious
        } else {
            AnalysisStatus::Safe
        }
    }

    fn build_reasoning(
        &self,
        score: u8,
        status: AnalysisStatus,
        scores: &CategoryScores,
    ) -> String {
        let threshold_info = match status {
            AnalysisStatus::Scam => {
                format!("Score {} >= scam threshold {}", score, self.config.scam_min)
            }
            AnalysisStatus::Suspicious => {
                format!("Score {} > safe threshold {}", score, self.config.safe_max)
            }
            AnalysisStatus::Safe => {
                format!("Score {} <= safe threshold {}", score, self.config.safe_max)
            }
        };

        let breakdown = SignalCategory::ALL
            .iter()
            .map(|category| {
                format!(
                    "{} {}",
                    category.to_string().to_lowercase(),
                    scores.get(*category)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}: {} ({})", status, threshold_info, breakdown)
    }

    pub fn get_config(&self) -> &DecisionConfig {
        &self.config
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(DecisionConfig {
            semantic_weight: 4,
            technical_weight: 3,
            financial_weight: 3,
            safe_max: 30,
            scam_min: 71,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(semantic: u8, technical: u8, financial: u8, social: u8) -> CategoryScores {
        CategoryScores {
            semantic,
            technical,
            financial,
            social,
        }
    }

    #[test]
    fn test_status_boundaries() {
        let engine = DecisionEngine::default();

        assert_eq!(engine.determine_status(0), AnalysisStatus::Safe);
        assert_eq!(engine.determine_status(30), AnalysisStatus::Safe);
        assert_eq!(engine.determine_status(31), AnalysisStatus::Suspicious);
        assert_eq!(engine.determine_status(70), AnalysisStatus::Suspicious);
        assert_eq!(engine.determine_status(71), AnalysisStatus::Scam);
        assert_eq!(engine.determine_status(100), AnalysisStatus::Scam);
    }

    #[test]
    fn test_composite_weights() {
        let engine = DecisionEngine::default();

        assert_eq!(engine.composite_score(&scores(0, 0, 0, 0)), 0);
        assert_eq!(engine.composite_score(&scores(100, 100, 100, 100)), 100);
        assert_eq!(engine.composite_score(&scores(100, 0, 0, 0)), 40);
        assert_eq!(engine.composite_score(&scores(0, 100, 0, 0)), 30);
        assert_eq!(engine.composite_score(&scores(0, 0, 100, 0)), 30);
        // Social shares the Semantic bucket
        assert_eq!(engine.composite_score(&scores(0, 0, 0, 100)), 40);
        assert_eq!(engine.composite_score(&scores(80, 0, 0, 40)), 40);
    }

    #[test]
    fn test_rounding_half_up() {
        let engine = DecisionEngine::default();
        // 0.4 * 8 = 3.2
        assert_eq!(engine.composite_score(&scores(8, 0, 0, 0)), 3);
        // 0.3 * 20 + 0.3 * 8 = 8.4
        assert_eq!(engine.composite_score(&scores(0, 20, 8, 0)), 8);
        // 0.4 * 8 + 0.3 * 8 + 0.3 * 8 = 8.0
        assert_eq!(engine.composite_score(&scores(8, 8, 8, 0)), 8);
        // 0.4 * 8 + 0.3 * 20 = 9.2
        assert_eq!(engine.composite_score(&scores(8, 20, 0, 0)), 9);
        // 0.3 * 40 + 0.3 * 8 + 0.4 * 8 = 17.6
        assert_eq!(engine.composite_score(&scores(8, 40, 8, 0)), 18);
        // 0.4 * 20 + 0.3 * 8 + 0.3 * 8 = 12.8
        assert_eq!(engine.composite_score(&scores(20, 8, 8, 0)), 13);
    }

    #[test]
    fn test_boundary_scores_reachable() {
        let engine = DecisionEngine::default();

        // 0.4 * 48 + 0.3 * 40 = 31.2
        let decision = engine.make_decision(&scores(48, 40, 0, 0));
        assert_eq!(decision.score, 31);
        assert_eq!(decision.status, AnalysisStatus::Suspicious);

        // 0.3 * 100 = 30
        let decision = engine.make_decision(&scores(0, 100, 0, 0));
        assert_eq!(decision.score, 30);
        assert_eq!(decision.status, AnalysisStatus::Safe);

        // 0.4 * 100 + 0.3 * 100 = 70
        let decision = engine.make_decision(&scores(60, 100, 0, 40));
        assert_eq!(decision.score, 70);
        assert_eq!(decision.status, AnalysisStatus::Suspicious);

        // 0.4 * 100 + 0.3 * 96 + 0.3 * 8 = 71.2
        let decision = engine.make_decision(&scores(100, 96, 8, 0));
        assert_eq!(decision.score, 71);
        assert_eq!(decision.status, AnalysisStatus::Scam);
    }

    #[test]
    fn test_reasoning_mentions_threshold() {
        let decision = DecisionEngine::default().make_decision(&scores(100, 100, 20, 40));
        assert_eq!(decision.score, 76);
        assert!(decision.reasoning.starts_with("Scam: Score 76 >= scam threshold 71"));
        assert!(decision
            .reasoning
            .ends_with("(semantic 100, technical 100, financial 20, social 40)"));
    }
}
