use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use gala_domain::ports::ActivityRepository;
use gala_domain::{ActivityRecord, EventId};

use crate::utils::{millis_to_utc, utc_to_millis};

#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct ActivityRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub event_time: OffsetDateTime,
    pub event_id: String,
    pub kind: String,
    pub subject_id: String,
    pub detail: String,
}

impl From<&ActivityRecord> for ActivityRow {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            event_time: millis_to_utc(record.event_time),
            event_id: record.event_id.to_string(),
            kind: record.kind.clone(),
            subject_id: record.subject_id.clone(),
            detail: record.detail.clone(),
        }
    }
}

/// Activity log kept in ClickHouse when an analytics store is configured.
#[derive(Clone)]
pub struct ClickhouseActivityRepo {
    client: Client,
    database: String,
}

impl ClickhouseActivityRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_activity = r#"
CREATE TABLE IF NOT EXISTS activity_log (
    event_time DateTime64(3),
    event_id String,
    kind String,
    subject_id String,
    detail String
) ENGINE = MergeTree
PARTITION BY toDate(event_time)
ORDER BY (event_id, event_time)
TTL toDateTime(event_time) + INTERVAL 90 DAY
"#;

        self.client.query(create_activity).execute().await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for ClickhouseActivityRepo {
    async fn insert_activity(&self, records: &[ActivityRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut insert = self.client.insert("activity_log")?;
        for record in records {
            insert.write(&ActivityRow::from(record)).await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn fetch_activity(&self, event_id: EventId, limit: usize) -> Result<Vec<ActivityRecord>> {
        let rows = self
            .client
            .query(
                "SELECT event_time, event_id, kind, subject_id, detail FROM activity_log \
                 WHERE event_id = ? ORDER BY event_time DESC LIMIT ?",
            )
            .bind(event_id.to_string())
            .bind(limit as u64)
            .fetch_all::<ActivityRow>()
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| ActivityRecord {
                event_time: utc_to_millis(row.event_time),
                event_id,
                kind: row.kind,
                subject_id: row.subject_id,
                detail: row.detail,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gala_domain::ActivityKind;

    #[test]
    fn activity_rows_keep_millisecond_time() {
        let mut record = ActivityRecord::new(EventId::new(), ActivityKind::TaskMoved, "t-1", "todo -> done");
        record.event_time = 1_767_225_600_123;
        let row = ActivityRow::from(&record);
        assert_eq!(utc_to_millis(row.event_time), record.event_time);
        assert_eq!(row.event_id, record.event_id.to_string());
        assert_eq!(row.kind, "task_moved");
    }
}
