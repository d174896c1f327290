//! Bounded audit trail of purge attempts.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::purge::PurgeKind;

/// Maximum number of records any history store retains.
pub const HISTORY_CAPACITY: usize = 100;

/// One purge attempt, successful or not. This is a log, not a ledger: no
/// validation happens beyond the type tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub kind: PurgeKind,
    pub target: String,
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl HistoryRecord {
    pub fn new(
        kind: PurgeKind,
        target: impl Into<String>,
        success: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            target: target.into(),
            success,
            message: message.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Prepend `record`, then evict everything beyond [`HISTORY_CAPACITY`].
///
/// Records stay newest-first. Returns how many records were evicted so
/// stores can report on it.
pub fn push_capped(records: &mut Vec<HistoryRecord>, record: HistoryRecord) -> usize {
    records.insert(0, record);
    let evicted = records.len().saturating_sub(HISTORY_CAPACITY);
    records.truncate(HISTORY_CAPACITY);
    evicted
}
