//! State owned by the calling application: history, learned categories and
//! the pending-scan handoff, persisted as one JSON file.

use crate::progress::{mark_learned, LearnedCategorySet};
use crate::types::{ContentKind, HistoryItem, ScamCategory};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text handed over by another surface (a context menu, a share target)
/// to be analyzed on the next run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingScan {
    pub input: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Most recent first
    #[serde(default)]
    pub history: Vec<HistoryItem>,
    #[serde(default)]
    pub learned_categories: LearnedCategorySet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_scan: Option<PendingScan>,
}

impl AppState {
    /// A missing file is an empty state.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No state file at {}, starting fresh", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        let state = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;
        Ok(())
    }

    /// Prepend an analysis and drop the oldest entries beyond `limit`.
    pub fn record(&mut self, item: HistoryItem, limit: usize) {
        self.history.insert(0, item);
        if self.history.len() > limit {
            let evicted = self.history.len() - limit;
            self.history.truncate(limit);
            log::debug!("Evicted {} history item(s)", evicted);
        }
    }

    pub fn queue_scan(&mut self, input: impl Into<String>, kind: ContentKind) {
        self.pending_scan = Some(PendingScan {
            input: input.into(),
            kind,
            queued_at: Utc::now(),
        });
    }

    /// Consume the handoff; a second call returns `None`.
    pub fn take_pending_scan(&mut self) -> Option<PendingScan> {
        self.pending_scan.take()
    }

    /// Apply the progress ledger; true when the category is newly learned.
    pub fn learn(&mut self, category: ScamCategory) -> bool {
        let (updated, is_new) = mark_learned(&self.learned_categories, category);
        self.learned_categories = updated;
        is_new
    }
}
