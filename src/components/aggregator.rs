//! Category Aggregator
//!
//! Reduces the signal list into one bounded sub-score per category.

use crate::features::Detection;
use crate::types::{SignalCategory, ThreatSignal};
use serde::{Deserialize, Serialize};

/// Sub-scores in [0, 100], one per signal category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub semantic: u8,
    pub technical: u8,
    pub financial: u8,
    pub social: u8,
}

impl CategoryScores {
    pub const MAX: u8 = 100;

    pub fn from_signals<'a>(signals: impl IntoIterator<Item = &'a ThreatSignal>) -> Self {
        let mut scores = Self::default();
        for signal in signals {
            scores.add(signal);
        }
        scores
    }

    pub fn from_detections(detections: &[Detection]) -> Self {
        Self::from_signals(detections.iter().map(|d| &d.signal))
    }

    /// Saturating: once a category reaches 100 further signals change nothing.
    pub fn add(&mut self, signal: &ThreatSignal) {
        let slot = self.slot_mut(signal.category);
        *slot = slot.saturating_add(signal.severity.weight()).min(Self::MAX);
    }

    pub fn get(&self, category: SignalCategory) -> u8 {
        match category {
            SignalCategory::Semantic => self.semantic,
            SignalCategory::Technical => self.technical,
            SignalCategory::Financial => self.financial,
            SignalCategory::Social => self.social,
        }
    }

    fn slot_mut(&mut self, category: SignalCategory) -> &mut u8 {
        match category {
            SignalCategory::Semantic => &mut self.semantic,
            SignalCategory::Technical => &mut self.technical,
            SignalCategory::Financial => &mut self.financial,
            SignalCategory::Social => &mut self.social,
        }
    }
}
