//! Progress Ledger: which scam categories a user has already been taught.

use crate::types::ScamCategory;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Ordered set of teachable categories. `None` and `General` never enter it,
/// whether inserted directly or read back from a state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LearnedCategorySet(BTreeSet<ScamCategory>);

impl LearnedCategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: ScamCategory) -> bool {
        self.0.contains(&category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ScamCategory> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ScamCategory> for LearnedCategorySet {
    fn from_iter<I: IntoIterator<Item = ScamCategory>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|c| c.is_teachable()).collect())
    }
}

impl<'de> Deserialize<'de> for LearnedCategorySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let categories = Vec::<ScamCategory>::deserialize(deserializer)?;
        Ok(categories.into_iter().collect())
    }
}

/// Record exposure to `category`. Returns the updated set and whether the
/// category was newly learned.
pub fn mark_learned(
    set: &LearnedCategorySet,
    category: ScamCategory,
) -> (LearnedCategorySet, bool) {
    if !category.is_teachable() || set.contains(category) {
        return (set.clone(), false);
    }

    let mut updated = set.clone();
    updated.0.insert(category);
    (updated, true)
}
