use serde::Serialize;

use crate::diff::engine::RelationSets;
use crate::harvest::item::ListItem;

/// Aggregated outcome of one audit run.
///
/// Built from the two harvested relation sets via `from_sets()`. Consumed by
/// the console reporter.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Accounts the user follows
    pub following_total: usize,

    /// Accounts following the user
    pub followers_total: usize,

    /// Followed accounts that do not follow back, with following-side metadata
    pub unfollowers: Vec<ListItem>,

    /// Total run duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl AuditReport {
    /// Build a report from the harvested relation sets.
    pub fn from_sets(sets: &RelationSets) -> Self {
        Self {
            following_total: sets.following.len(),
            followers_total: sets.followers.len(),
            unfollowers: sets.unfollowers(),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_reciprocal(&self) -> bool {
        self.unfollowers.is_empty()
    }
}
