use crate::error::AuditError;
use crate::harvest::harvester::harvest;
use crate::harvest::item::ListItem;
use crate::harvest::set::AccumulatedSet;
use crate::harvest::source::ListSource;
use crate::trace::logger::TraceLogger;

// ============================================================================
// Relation diff — following \ followers
// ============================================================================

/// Both harvested relation sets, kept so reports can show totals.
#[derive(Debug)]
pub struct RelationSets {
    pub following: AccumulatedSet,
    pub followers: AccumulatedSet,
}

impl RelationSets {
    /// Accounts in `following` that are absent from `followers`, with their
    /// following-side metadata, in the following set's insertion order.
    pub fn unfollowers(&self) -> Vec<ListItem> {
        compute_diff(&self.following, &self.followers)
    }
}

/// Asymmetric set difference over handles.
///
/// Metadata comes from the following side; relative order is the following
/// set's insertion order.
pub fn compute_diff(following: &AccumulatedSet, followers: &AccumulatedSet) -> Vec<ListItem> {
    following
        .iter()
        .filter(|item| !followers.contains(&item.handle))
        .cloned()
        .collect()
}

/// Harvest both relations and return the sets.
///
/// The harvests run strictly sequentially, following first — both sources
/// ultimately address the same rendering surface, so they must never overlap.
pub fn audit_relations<F, G>(
    mut following_source: F,
    mut followers_source: G,
    tracer: &TraceLogger,
) -> Result<RelationSets, AuditError>
where
    F: ListSource,
    G: ListSource,
{
    let following = harvest(&mut following_source, tracer)?;
    let followers = harvest(&mut followers_source, tracer)?;
    Ok(RelationSets {
        following,
        followers,
    })
}
