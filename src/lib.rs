pub mod app;
pub mod history;
pub mod model;
#[cfg(feature = "ssr")]
pub mod schema;
#[cfg(feature = "ssr")]
pub mod store;

#[cfg(feature = "ssr")]
use diesel::connection::SimpleConnection;
#[cfg(feature = "ssr")]
use diesel::prelude::*;
#[cfg(feature = "ssr")]
use diesel::SqliteConnection;
#[cfg(feature = "ssr")]
use dotenvy::dotenv;
#[cfg(feature = "ssr")]
use std::env;
#[cfg(feature = "ssr")]
use uuid::Uuid;

#[cfg(feature = "ssr")]
use crate::model::NewAdminSession;
#[cfg(feature = "ssr")]
use crate::schema::{admin_sessions, records};
#[cfg(feature = "ssr")]
use crate::store::{RecordStore, SqliteStore, StoreError, CHALLENGES, RANKING};

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}

#[cfg(feature = "ssr")]
pub fn establish_connection() -> SqliteConnection {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    let mut conn = SqliteConnection::establish(&database_url)
        .expect(&format!("Error connecting to {}", database_url));

    // Enable WAL mode to allow concurrent reads during writes, and a timeout to retry locked
    // operations.
    conn.batch_execute(
        "PRAGMA foreign_keys = ON; \
        PRAGMA journal_mode = WAL; \
        PRAGMA synchronous = NORMAL; \
        PRAGMA busy_timeout = 10000;",
    )
    .expect("Failed to set SQLite PRAGMAs");

    conn
}

/// Creates the tables if they don't exist yet. Must stay in sync with
/// schema.rs.
#[cfg(feature = "ssr")]
pub fn init_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(
        "CREATE TABLE IF NOT EXISTS records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL,
            UNIQUE (collection, key)
        );
        CREATE TABLE IF NOT EXISTS admin_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            token TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )
}

/// Creates an admin session and returns the token.
#[cfg(feature = "ssr")]
pub fn create_admin_session(conn: &mut SqliteConnection) -> Result<String, diesel::result::Error> {
    let uuid_token = Uuid::new_v4();
    let token_str = uuid_token.to_string();
    let new_session = NewAdminSession {
        token: token_str.clone(),
    };
    diesel::insert_into(admin_sessions::table)
        .values(&new_session)
        .execute(conn)?;
    Ok(token_str)
}

/// Validates an admin token. Returns true if the provided token exists in the admin_sessions
/// table.
#[cfg(feature = "ssr")]
pub fn validate_admin_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<bool, diesel::result::Error> {
    if Uuid::parse_str(token).is_err() {
        return Ok(false);
    }
    let count: i64 = admin_sessions::table
        .filter(admin_sessions::token.eq(token))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Wipes both collections and all admin sessions.
#[cfg(feature = "ssr")]
pub fn reset_database(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    conn.transaction(|conn| {
        diesel::delete(admin_sessions::table).execute(conn)?;
        diesel::delete(records::table).execute(conn)?;
        Ok(())
    })
}

/// Loads the demonstration dataset: a few dated challenges and the three
/// sample participants.
#[cfg(feature = "ssr")]
pub fn seed_demo_data(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    use serde_json::json;

    let mut store = SqliteStore::new(conn);
    store.write_value(CHALLENGES, "push-ups", &json!("2025-11-03: Do 20 push-ups"))?;
    store.write_value(
        CHALLENGES,
        "cold-shower",
        &json!("2025-11-10: Take a cold shower"),
    )?;
    store.write_value(
        CHALLENGES,
        "no-sugar-week",
        &json!({"date": "2025-11-17", "title": "One week without sugar"}),
    )?;
    store.write_value(
        RANKING,
        "u1",
        &json!({"name": "Anna", "points": 150, "challengesCompleted": 12}),
    )?;
    store.write_value(
        RANKING,
        "u2",
        &json!({"name": "Pol", "points": 120, "challengesCompleted": 10}),
    )?;
    store.write_value(
        RANKING,
        "u3",
        &json!({"name": "Mar", "points": 95, "challengesCompleted": 8}),
    )?;
    Ok(())
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::*;
    use crate::history::{list_entries, list_ranking};
    use crate::model::AdminSession;

    fn test_conn() -> SqliteConnection {
        let mut conn =
            SqliteConnection::establish(":memory:").expect("failed to open in-memory SQLite");
        init_schema(&mut conn).expect("failed to create schema");
        conn
    }

    #[test]
    fn test_create_and_validate_admin_session() {
        let mut conn = test_conn();

        let token = create_admin_session(&mut conn).expect("failed to create session");
        assert!(Uuid::parse_str(&token).is_ok());
        assert!(validate_admin_token(&mut conn, &token).expect("validation failed"));

        // A well-formed but unknown token is rejected.
        let unknown = Uuid::new_v4().to_string();
        assert!(!validate_admin_token(&mut conn, &unknown).expect("validation failed"));

        // A malformed token is rejected without touching the table.
        assert!(!validate_admin_token(&mut conn, "not-a-uuid").expect("validation failed"));

        let sessions: Vec<AdminSession> = admin_sessions::table
            .load(&mut conn)
            .expect("failed to load sessions");
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].token, token);
    }

    #[test]
    fn test_seed_demo_data_round_trip() {
        let mut conn = test_conn();
        seed_demo_data(&mut conn).expect("failed to seed");

        let mut store = SqliteStore::new(&mut conn);
        let challenges = store
            .fetch_collection(CHALLENGES)
            .expect("fetch failed")
            .expect("challenges should exist");
        let items = list_entries(&challenges);
        assert_eq!(items.len(), 3);
        // Newest first; the structured record parses like the strings do.
        assert_eq!(items[0].date, "2025-11-17");
        assert_eq!(items[0].title, "One week without sugar");
        assert_eq!(items[2].date, "2025-11-03");

        let ranking = store
            .fetch_collection(RANKING)
            .expect("fetch failed")
            .expect("ranking should exist");
        let rows = list_ranking(&ranking);
        assert_eq!(rows[0].name, "Anna");
        assert_eq!(rows[0].points, 150);
        assert_eq!(rows[2].name, "Mar");
    }

    #[test]
    fn test_reset_database() {
        let mut conn = test_conn();
        seed_demo_data(&mut conn).expect("failed to seed");
        create_admin_session(&mut conn).expect("failed to create session");

        reset_database(&mut conn).expect("failed to reset");

        let mut store = SqliteStore::new(&mut conn);
        assert!(store
            .fetch_collection(CHALLENGES)
            .expect("fetch failed")
            .is_none());
        assert!(store
            .fetch_collection(RANKING)
            .expect("fetch failed")
            .is_none());
        let session_count: i64 = admin_sessions::table
            .count()
            .get_result(&mut conn)
            .expect("failed to count sessions");
        assert_eq!(session_count, 0);
    }
}
