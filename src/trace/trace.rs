use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One JSONL record per harvest round.
#[derive(Debug, Serialize)]
pub struct HarvestEvent {
    pub timestamp_ms: u128,

    /// Round number within one harvest, starting at 0
    pub round: u64,

    /// Rows rendered in this round's window
    pub window_len: usize,

    /// Partition index: first row of the window that was not yet recorded
    pub first_unseen: usize,

    /// Rows appended this round
    pub added: usize,

    /// Cumulative distinct items after this round
    pub total_seen: usize,
}

impl HarvestEvent {
    pub fn round(
        round: u64,
        window_len: usize,
        first_unseen: usize,
        added: usize,
        total_seen: usize,
    ) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            round,
            window_len,
            first_unseen,
            added,
            total_seen,
        }
    }
}
