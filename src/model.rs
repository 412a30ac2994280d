use chrono::NaiveDateTime;
#[cfg(feature = "ssr")]
use diesel::prelude::*;
#[cfg(feature = "ssr")]
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};

/// Canonical `{date, title}` pair derived from one raw challenge record.
/// Both fields stay `None` when nothing can be derived; key-based fallbacks
/// are applied by the lister, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryEntry {
    pub date: Option<String>,
    pub title: Option<String>,
}

/// One challenge as shown in a list, with key-based fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeItem {
    pub key: String,
    pub date: String,
    pub title: String,
}

/// One participant row in the ranking, with defensive coercion applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub id: String,
    pub name: String,
    pub points: u32,
    pub challenges_completed: u32,
}

#[cfg(feature = "ssr")]
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::records)]
#[diesel(check_for_backend(Sqlite))]
pub struct StoredRecord {
    pub id: i32,
    pub collection: String,
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[cfg(feature = "ssr")]
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::records)]
pub struct NewRecord<'a> {
    pub collection: &'a str,
    pub key: &'a str,
    pub value: String,
    pub updated_at: NaiveDateTime,
}

#[cfg(feature = "ssr")]
#[derive(Queryable, Debug)]
#[diesel(table_name = crate::schema::admin_sessions)]
pub struct AdminSession {
    pub id: i32,
    pub token: String,
    pub created_at: NaiveDateTime,
}

#[cfg(feature = "ssr")]
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::admin_sessions)]
pub struct NewAdminSession {
    pub token: String,
    // created_at uses default
}
