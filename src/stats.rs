use tracing::debug;

use crate::entities::{SessionRecord, StatsSummary};
use crate::session_log::SessionLog;

impl StatsSummary {
    /// Count, best and mean score.  No records gives the zeroed summary.
    pub fn from_records(records: &[SessionRecord]) -> Self {
        if records.is_empty() {
            return StatsSummary::default();
        }
        let total: f64 = records.iter().map(|r| r.score).sum();
        let best = records
            .iter()
            .map(|r| r.score)
            .fold(f64::NEG_INFINITY, f64::max);
        StatsSummary {
            total_games: records.len(),
            highest_score: best.trunc() as i64,
            average_score: total / records.len() as f64,
        }
    }
}

/// Recompute the summary from the whole log.  Never fails: missing or
/// corrupt data reads as no games played.
pub fn summarize(log: &SessionLog) -> StatsSummary {
    let summary = StatsSummary::from_records(&log.read_records());
    debug!(?summary, "statistics recomputed");
    summary
}
