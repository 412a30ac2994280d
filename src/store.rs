//! Storage gateway: one narrow interface between the application and the
//! keyed record store, so call sites never depend on a concrete client
//! shape. Raw values travel as JSON.

use std::collections::BTreeMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde_json::Value;
use thiserror::Error;

use crate::history::Snapshot;
use crate::model::{NewRecord, StoredRecord};
use crate::schema::records;

/// Collection holding the raw challenge records.
pub const CHALLENGES: &str = "challenges";
/// Collection holding the raw participant records.
pub const RANKING: &str = "ranking";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("stored value at {collection}/{key} is not valid JSON: {source}")]
    Corrupt {
        collection: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Point-in-time access to named key-value collections.
pub trait RecordStore {
    /// Reads a whole collection. `Ok(None)` means the collection holds no
    /// records at all; callers treat that as "no data", distinct from an
    /// empty list.
    fn fetch_collection(&mut self, collection: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Writes one raw value under one key, replacing any previous value.
    fn write_value(&mut self, collection: &str, key: &str, value: &Value)
        -> Result<(), StoreError>;

    /// Removes one key. Deleting a missing key is a no-op.
    fn delete_value(&mut self, collection: &str, key: &str) -> Result<(), StoreError>;
}

pub struct SqliteStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteStore<'_> {
    fn fetch_collection(&mut self, collection: &str) -> Result<Option<Snapshot>, StoreError> {
        let rows: Vec<StoredRecord> = records::table
            .filter(records::collection.eq(collection))
            .select(StoredRecord::as_select())
            .order(records::key.asc())
            .load(self.conn)?;
        if rows.is_empty() {
            return Ok(None);
        }

        let mut snapshot: Snapshot = BTreeMap::new();
        for row in rows {
            let value = serde_json::from_str(&row.value).map_err(|source| StoreError::Corrupt {
                collection: collection.to_string(),
                key: row.key.clone(),
                source,
            })?;
            snapshot.insert(row.key, value);
        }
        Ok(Some(snapshot))
    }

    fn write_value(
        &mut self,
        collection: &str,
        key: &str,
        value: &Value,
    ) -> Result<(), StoreError> {
        let record = NewRecord {
            collection,
            key,
            value: value.to_string(),
            updated_at: Utc::now().naive_utc(),
        };
        self.conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                // Replace any previous value under this key.
                diesel::delete(
                    records::table
                        .filter(records::collection.eq(collection))
                        .filter(records::key.eq(key)),
                )
                .execute(conn)?;
                diesel::insert_into(records::table)
                    .values(&record)
                    .execute(conn)?;
                Ok(())
            })?;
        Ok(())
    }

    fn delete_value(&mut self, collection: &str, key: &str) -> Result<(), StoreError> {
        diesel::delete(
            records::table
                .filter(records::collection.eq(collection))
                .filter(records::key.eq(key)),
        )
        .execute(self.conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_schema;
    use serde_json::json;

    fn test_conn() -> SqliteConnection {
        let mut conn =
            SqliteConnection::establish(":memory:").expect("failed to open in-memory SQLite");
        init_schema(&mut conn).expect("failed to create schema");
        conn
    }

    #[test]
    fn test_fetch_missing_collection_is_none() {
        let mut conn = test_conn();
        let snapshot = SqliteStore::new(&mut conn)
            .fetch_collection(CHALLENGES)
            .expect("fetch failed");
        assert!(snapshot.is_none());
    }

    #[test]
    fn test_write_then_fetch() {
        let mut conn = test_conn();
        let mut store = SqliteStore::new(&mut conn);
        store
            .write_value(CHALLENGES, "k1", &json!("2025-01-01: A"))
            .expect("write failed");
        store
            .write_value(RANKING, "u1", &json!({"name": "Anna", "points": 150}))
            .expect("write failed");

        let challenges = store
            .fetch_collection(CHALLENGES)
            .expect("fetch failed")
            .expect("collection should exist");
        assert_eq!(challenges.len(), 1);
        assert_eq!(challenges["k1"], json!("2025-01-01: A"));

        // Writes land in their own collection only.
        let ranking = store
            .fetch_collection(RANKING)
            .expect("fetch failed")
            .expect("collection should exist");
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking["u1"]["name"], json!("Anna"));
    }

    #[test]
    fn test_write_replaces_previous_value() {
        let mut conn = test_conn();
        let mut store = SqliteStore::new(&mut conn);
        store
            .write_value(CHALLENGES, "k1", &json!("2025-01-01: A"))
            .expect("write failed");
        store
            .write_value(CHALLENGES, "k1", &json!("2025-02-01: B"))
            .expect("write failed");

        let snapshot = store
            .fetch_collection(CHALLENGES)
            .expect("fetch failed")
            .expect("collection should exist");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["k1"], json!("2025-02-01: B"));
    }

    #[test]
    fn test_delete_value() {
        let mut conn = test_conn();
        let mut store = SqliteStore::new(&mut conn);
        store
            .write_value(CHALLENGES, "k1", &json!("2025-01-01: A"))
            .expect("write failed");
        store
            .delete_value(CHALLENGES, "k1")
            .expect("delete failed");

        // The last record is gone, so the collection reads as absent again.
        assert!(store
            .fetch_collection(CHALLENGES)
            .expect("fetch failed")
            .is_none());

        // Deleting a missing key is a no-op.
        store
            .delete_value(CHALLENGES, "k1")
            .expect("delete of missing key should succeed");
    }

    #[test]
    fn test_corrupt_value_is_reported() {
        let mut conn = test_conn();
        diesel::sql_query(
            "INSERT INTO records (collection, key, value, updated_at) \
             VALUES ('challenges', 'bad', 'not json', CURRENT_TIMESTAMP)",
        )
        .execute(&mut conn)
        .expect("raw insert failed");

        let err = SqliteStore::new(&mut conn)
            .fetch_collection(CHALLENGES)
            .expect_err("corrupt value should fail the fetch");
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
