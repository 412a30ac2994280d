// Maintained by hand; the schema is small enough that we don't run Diesel
// CLI migrations (see init_schema in lib.rs for the matching DDL).

diesel::table! {
    admin_sessions (id) {
        id -> Integer,
        token -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    records (id) {
        id -> Integer,
        collection -> Text,
        key -> Text,
        value -> Text,
        updated_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(admin_sessions, records);
