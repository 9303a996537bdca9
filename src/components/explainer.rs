//! Human-readable rationale for a verdict.

use crate::features::Detection;
use crate::types::{AnalysisStatus, ScamCategory};

pub struct Explainer;

impl Explainer {
    /// One or two sentences built from the two strongest signals.
    pub fn explain(
        detections: &[Detection],
        status: AnalysisStatus,
        category: ScamCategory,
        score: u8,
    ) -> String {
        let lead = match (status, category) {
            (AnalysisStatus::Safe, _) => format!("Looks safe with a risk score of {}/100.", score),
            (AnalysisStatus::Suspicious, ScamCategory::None | ScamCategory::General) => {
                format!("Suspicious content with a risk score of {}/100.", score)
            }
            (AnalysisStatus::Suspicious, category) => format!(
                "Suspicious: resembles a {} with a risk score of {}/100.",
                category, score
            ),
            (AnalysisStatus::Scam, ScamCategory::None | ScamCategory::General) => {
                format!("Likely scam with a risk score of {}/100.", score)
            }
            (AnalysisStatus::Scam, category) => {
                format!("Likely {} with a risk score of {}/100.", category, score)
            }
        };

        let top = Self::top_signals(detections, 2);
        if top.is_empty() {
            return format!("{} No common scam indicators were found.", lead);
        }

        let reasons: Vec<String> = top
            .iter()
            .map(|d| format!("{} ({})", d.signal.reason, d.category()))
            .collect();
        let label = if status == AnalysisStatus::Safe {
            "Minor signal"
        } else {
            "Main signal"
        };
        let plural = if reasons.len() > 1 { "s" } else { "" };

        format!("{} {}{}: {}.", lead, label, plural, reasons.join("; "))
    }

    /// Strongest detections first; extraction order breaks ties.
    fn top_signals(detections: &[Detection], count: usize) -> Vec<&Detection> {
        let mut ranked: Vec<&Detection> = detections.iter().collect();
        ranked.sort_by(|a, b| b.severity().cmp(&a.severity()));
        ranked.truncate(count);
        ranked
    }
}
