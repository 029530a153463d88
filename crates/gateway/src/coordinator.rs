//! Bridges ledger saves to room notifications and gives summary readers a
//! causal version token instead of a guessed wait.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use autosplit_ledger::{AssignmentInput, LedgerResult, LedgerService, Summary};
use autosplit_rooms::RoomRegistry;

/// Consistency coordinator for the save/read-summary pair.
///
/// A successful save returns its new ledger version synchronously and
/// advertises it to the group's room as `ledger_updated`. A summary
/// reader holding such a version passes it back as `min_version`; if the
/// first read is still behind (async commit, replica lag), the read is
/// retried exactly once after a bounded delay.
pub struct Coordinator {
    ledger: Arc<LedgerService>,
    rooms: Arc<RoomRegistry>,
    summary_retry_delay: Duration,
}

impl Coordinator {
    pub fn new(
        ledger: Arc<LedgerService>,
        rooms: Arc<RoomRegistry>,
        summary_retry_delay: Duration,
    ) -> Self {
        Self {
            ledger,
            rooms,
            summary_retry_delay,
        }
    }

    /// Commit an assignment save, then fan the committed version out to
    /// the group's room. Notification is best-effort; the returned
    /// version is the caller's token for a consistent follow-up read.
    pub async fn save_assignments(
        &self,
        group_id: &str,
        entries: &[AssignmentInput],
    ) -> LedgerResult<i64> {
        let version = self.ledger.save_assignments(group_id, entries).await?;
        self.rooms.publish_ledger_update(group_id, version).await;
        Ok(version)
    }

    /// Read a group's summary. With `min_version`, a read observing an
    /// older version waits one retry delay and reads again: one bounded
    /// retry, never an indefinite loop. The second read is returned as
    /// observed either way.
    pub async fn summary(
        &self,
        group_id: &str,
        min_version: Option<i64>,
    ) -> LedgerResult<Summary> {
        let summary = self.ledger.summary(group_id).await?;

        match min_version {
            Some(target) if summary.version < target => {
                debug!(
                    group = group_id,
                    observed = summary.version,
                    target,
                    "summary behind requested version, retrying once"
                );
                sleep(self.summary_retry_delay).await;
                self.ledger.summary(group_id).await
            }
            _ => Ok(summary),
        }
    }
}
