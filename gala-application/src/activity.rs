use gala_domain::ActivityRecord;
use tracing::warn;

use crate::AppState;

/// Appends to the activity log. A failing log write never fails the mutation
/// it describes.
pub async fn record(state: &AppState, records: Vec<ActivityRecord>) {
    if records.is_empty() {
        return;
    }
    if let Err(err) = state.activity_repo.insert_activity(&records).await {
        state.metrics.record_activity_error();
        warn!(count = records.len(), "activity log write failed: {}", err);
    }
}

pub async fn record_one(state: &AppState, record: ActivityRecord) {
    self::record(state, vec![record]).await;
}
