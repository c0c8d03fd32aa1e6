//! Database repository layer
//!
//! Provides query and insert operations for craving events and their
//! derived analytics records. The handle is explicitly constructed and
//! passed to every component that needs storage access.

use crate::error::{Error, Result};
use crate::types::{AnalyticsRecord, CravingEvent, RecordedAction};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

/// Query filter for listing craving events.
#[derive(Debug, Clone, Default)]
pub struct CravingFilter {
    /// Include soft-deleted events (default: false)
    pub include_archived: bool,
    /// Only events created at or after this time
    pub since: Option<DateTime<Utc>>,
    /// Maximum number of events to return
    pub limit: Option<usize>,
}

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Craving operations
    // ============================================

    /// Insert a craving event
    pub fn insert_craving(&self, event: &CravingEvent) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO cravings (id, text, created_at, is_archived, analytics_processed)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                event.id,
                event.text,
                event.created_at.to_rfc3339(),
                event.is_archived as i64,
                event.analytics_processed as i64,
            ],
        )?;
        Ok(())
    }

    /// Get a craving event by id
    pub fn get_craving(&self, id: &str) -> Result<Option<CravingEvent>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM cravings WHERE id = ?", [id], |row| {
            Self::row_to_craving(row)
        })
        .optional()
        .map_err(Error::from)
    }

    /// List craving events ordered by creation time
    pub fn list_cravings(&self, filter: &CravingFilter) -> Result<Vec<CravingEvent>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = String::from("SELECT * FROM cravings WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![];

        if !filter.include_archived {
            sql.push_str(" AND is_archived = 0");
        }

        if let Some(since) = &filter.since {
            sql.push_str(" AND created_at >= ?");
            params.push(Box::new(since.to_rfc3339()));
        }

        sql.push_str(" ORDER BY created_at ASC");

        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let events = stmt
            .query_map(params_refs.as_slice(), Self::row_to_craving)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    /// Soft-delete a craving event
    pub fn archive_craving(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE cravings SET is_archived = 1 WHERE id = ?",
            [id],
        )?;

        if updated == 0 {
            return Err(Error::CravingNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Mark craving events as incorporated into a computed statistic.
    ///
    /// Returns the number of rows updated. The flag is a lifecycle
    /// marker; aggregation never skips events based on it.
    pub fn mark_analytics_processed(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.conn.lock().unwrap();
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE cravings SET analytics_processed = 1 WHERE id IN ({})",
            placeholders
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();

        let updated = conn.execute(&sql, params_refs.as_slice())?;
        Ok(updated)
    }

    /// Total number of craving events, archived included
    pub fn craving_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cravings", [], |r| r.get(0))?;
        Ok(count)
    }

    fn row_to_craving(row: &Row) -> rusqlite::Result<CravingEvent> {
        let created_at_str: String = row.get("created_at")?;
        let is_archived: i64 = row.get("is_archived")?;
        let analytics_processed: i64 = row.get("analytics_processed")?;

        Ok(CravingEvent {
            id: row.get("id")?,
            text: row.get("text")?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            is_archived: is_archived != 0,
            analytics_processed: analytics_processed != 0,
        })
    }

    // ============================================
    // Analytics record operations
    // ============================================

    /// Insert an analytics record
    pub fn insert_analytics_record(&self, record: &AnalyticsRecord) -> Result<()> {
        let actions_json = serde_json::to_string(&record.actions)?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO analytics_records (id, craving_id, recorded_at, interaction_count, actions)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.id,
                record.craving_id,
                record.recorded_at.to_rfc3339(),
                record.interaction_count as i64,
                actions_json,
            ],
        )?;
        Ok(())
    }

    /// List analytics records for one craving event, oldest first
    pub fn list_records_for_craving(&self, craving_id: &str) -> Result<Vec<AnalyticsRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM analytics_records
            WHERE craving_id = ?
            ORDER BY recorded_at ASC
            "#,
        )?;

        let records = stmt
            .query_map([craving_id], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Total number of analytics records
    pub fn analytics_record_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM analytics_records", [], |r| r.get(0))?;
        Ok(count)
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<AnalyticsRecord> {
        let recorded_at_str: String = row.get("recorded_at")?;
        let interaction_count: i64 = row.get("interaction_count")?;
        let actions_str: String = row.get("actions")?;

        let actions: Vec<RecordedAction> =
            serde_json::from_str(&actions_str).unwrap_or_default();

        Ok(AnalyticsRecord {
            id: row.get("id")?,
            craving_id: row.get("craving_id")?,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            interaction_count: interaction_count.max(0) as u32,
            actions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;
    use chrono::Duration;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn backdated_event(text: &str, minutes_ago: i64) -> CravingEvent {
        let mut event = CravingEvent::new(text);
        event.created_at = Utc::now() - Duration::minutes(minutes_ago);
        event
    }

    #[test]
    fn test_craving_crud() {
        let db = test_db();

        let event = CravingEvent::new("midnight snack");
        db.insert_craving(&event).unwrap();

        let retrieved = db.get_craving(&event.id).unwrap().unwrap();
        assert_eq!(retrieved.id, event.id);
        assert_eq!(retrieved.text, "midnight snack");
        assert!(!retrieved.is_archived);
        assert!(!retrieved.analytics_processed);

        let listed = db.list_cravings(&CravingFilter::default()).unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_get_missing_craving_is_none() {
        let db = test_db();
        assert!(db.get_craving("no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_list_excludes_archived_by_default() {
        let db = test_db();

        let keep = CravingEvent::new("espresso");
        let gone = CravingEvent::new("cigarette");
        db.insert_craving(&keep).unwrap();
        db.insert_craving(&gone).unwrap();
        db.archive_craving(&gone.id).unwrap();

        let listed = db.list_cravings(&CravingFilter::default()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);

        let all = db
            .list_cravings(&CravingFilter {
                include_archived: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_list_since_and_limit() {
        let db = test_db();

        for minutes_ago in [180, 120, 60, 10] {
            db.insert_craving(&backdated_event("wave", minutes_ago))
                .unwrap();
        }

        let recent = db
            .list_cravings(&CravingFilter {
                since: Some(Utc::now() - Duration::minutes(90)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(recent.len(), 2);

        let capped = db
            .list_cravings(&CravingFilter {
                limit: Some(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(capped.len(), 3);
        // Oldest first
        assert!(capped[0].created_at < capped[1].created_at);
    }

    #[test]
    fn test_archive_missing_craving_fails() {
        let db = test_db();
        let err = db.archive_craving("no-such-id").unwrap_err();
        assert!(matches!(err, Error::CravingNotFound(_)));
    }

    #[test]
    fn test_mark_analytics_processed() {
        let db = test_db();

        let a = CravingEvent::new("one");
        let b = CravingEvent::new("two");
        db.insert_craving(&a).unwrap();
        db.insert_craving(&b).unwrap();

        let updated = db
            .mark_analytics_processed(&[a.id.clone(), b.id.clone()])
            .unwrap();
        assert_eq!(updated, 2);

        assert!(db.get_craving(&a.id).unwrap().unwrap().analytics_processed);
        assert!(db.get_craving(&b.id).unwrap().unwrap().analytics_processed);

        // Empty slice is a no-op
        assert_eq!(db.mark_analytics_processed(&[]).unwrap(), 0);
    }

    #[test]
    fn test_analytics_record_round_trip() {
        let db = test_db();

        let event = CravingEvent::new("salty chips");
        db.insert_craving(&event).unwrap();

        let record = AnalyticsRecord::for_tracked_event(&event.id, Utc::now());
        db.insert_analytics_record(&record).unwrap();

        let records = db.list_records_for_craving(&event.id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, record.id);
        assert_eq!(records[0].interaction_count, 1);
        assert_eq!(records[0].actions.len(), 1);
        assert_eq!(records[0].actions[0].kind, ActionKind::Logged);

        assert_eq!(db.analytics_record_count().unwrap(), 1);
    }

    #[test]
    fn test_record_requires_existing_craving() {
        let db = test_db();

        let record = AnalyticsRecord::for_tracked_event("ghost-craving", Utc::now());
        assert!(db.insert_analytics_record(&record).is_err());
    }
}
