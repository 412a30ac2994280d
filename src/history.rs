//! Normalization of the loosely-structured records stored under the
//! `challenges` and `ranking` collections, and the ordering applied before
//! display. Everything here is pure and synchronous: callers hand in an
//! already-fetched collection snapshot and get back an owned, ordered list.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::model::{ChallengeItem, HistoryEntry, RankingEntry};

/// A point-in-time read of one collection: storage key to raw value.
pub type Snapshot = BTreeMap<String, Value>;

/// Recognized field names for structured challenge records, in lookup order.
const DATE_ALIASES: &[&str] = &["date", "data", "d"];
const TITLE_ALIASES: &[&str] = &["title", "text", "body"];

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\s*:\s*(.*)$").unwrap());

/// Normalizes one raw challenge record into a `HistoryEntry`. Total over its
/// input domain: malformed records degrade to a best-effort text title, never
/// an error.
///
/// Strings are split only when they start with a real `YYYY-MM-DD` prefix
/// followed by a colon; a string without one is all title. (The data has also
/// been written by clients that split on the first colon unconditionally, but
/// that rule turns any stray colon into a bogus date, so it is deliberately
/// not supported.)
pub fn parse_history_entry(raw: &Value) -> HistoryEntry {
    match raw {
        Value::Null => HistoryEntry::default(),
        Value::Object(fields) => {
            let date = first_string_field(fields, DATE_ALIASES);
            let title = first_string_field(fields, TITLE_ALIASES);
            match (date, title) {
                (Some(date), Some(title)) => HistoryEntry {
                    date: Some(date.to_string()),
                    title: Some(title.to_string()),
                },
                // Unrecognized shape: keep the whole record visible as text.
                _ => HistoryEntry {
                    date: None,
                    title: Some(raw.to_string()),
                },
            }
        }
        Value::String(text) => match DATE_PREFIX.captures(text) {
            Some(caps) => HistoryEntry {
                date: Some(caps[1].to_string()),
                title: Some(caps[2].trim().to_string()),
            },
            None => HistoryEntry {
                date: None,
                title: Some(text.clone()),
            },
        },
        Value::Bool(_) | Value::Number(_) => HistoryEntry {
            date: None,
            title: Some(raw.to_string()),
        },
        Value::Array(_) => HistoryEntry {
            date: None,
            title: Some(raw.to_string()),
        },
    }
}

fn first_string_field<'a>(fields: &'a serde_json::Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|name| fields.get(*name).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Turns a challenges snapshot into an ordered display list. The storage key
/// stands in for a missing date, and `"Challenge: <key>"` for a missing or
/// empty title. Sorted by date descending; lexical comparison is
/// chronological here because dates are zero-padded ISO `YYYY-MM-DD`, and an
/// empty date string sorts last. The sort is stable, so ties keep key order.
pub fn list_entries(snapshot: &Snapshot) -> Vec<ChallengeItem> {
    let mut items: Vec<ChallengeItem> = snapshot
        .iter()
        .map(|(key, raw)| {
            let parsed = parse_history_entry(raw);
            let date = parsed
                .date
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| key.clone());
            let title = parsed
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format!("Challenge: {}", key));
            ChallengeItem {
                key: key.clone(),
                date,
                title,
            }
        })
        .collect();

    items.sort_by(|a, b| b.date.cmp(&a.date));
    items
}

/// Turns a ranking snapshot into a list ordered by points descending. Missing
/// names fall back to `"User <id>"`; counts are coerced defensively, so a
/// record that is not even an object still yields a zeroed row.
pub fn list_ranking(snapshot: &Snapshot) -> Vec<RankingEntry> {
    let mut rows: Vec<RankingEntry> = snapshot
        .iter()
        .map(|(id, raw)| {
            let fields = raw.as_object();
            let name = fields
                .and_then(|f| f.get("name"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("User {}", id));
            let points = coerce_count(fields.and_then(|f| f.get("points")));
            let challenges_completed =
                coerce_count(fields.and_then(|f| f.get("challengesCompleted")));
            RankingEntry {
                id: id.clone(),
                name,
                points,
                challenges_completed,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.points.cmp(&a.points));
    rows
}

/// Coerces a raw count field to an integer >= 0. Accepts JSON numbers and
/// numeric strings; anything else (absent, non-numeric, negative, NaN)
/// becomes 0. Fractional values are truncated.
fn coerce_count(raw: Option<&Value>) -> u32 {
    let numeric = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match numeric {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_-]").unwrap());

/// Derives a storage key from free text: lowercase, whitespace runs become a
/// single dash, everything else non-alphanumeric is dropped.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let dashed = WHITESPACE_RUN.replace_all(&lowered, "-");
    NON_SLUG.replace_all(&dashed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(pairs: &[(&str, Value)]) -> Snapshot {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_parse_dated_string() {
        let entry = parse_history_entry(&json!("2025-11-03: Do 20 push-ups"));
        assert_eq!(entry.date.as_deref(), Some("2025-11-03"));
        assert_eq!(entry.title.as_deref(), Some("Do 20 push-ups"));
    }

    #[test]
    fn test_parse_trims_title_whitespace() {
        let entry = parse_history_entry(&json!("2025-11-03:   Do 20 push-ups  "));
        assert_eq!(entry.date.as_deref(), Some("2025-11-03"));
        assert_eq!(entry.title.as_deref(), Some("Do 20 push-ups"));
    }

    #[test]
    fn test_parse_string_without_date_prefix() {
        let entry = parse_history_entry(&json!("no date here"));
        assert_eq!(entry.date, None);
        assert_eq!(entry.title.as_deref(), Some("no date here"));
    }

    #[test]
    fn test_parse_colon_without_date_is_all_title() {
        // The first-colon-split rule would call "note" a date; the anchored
        // rule keeps the whole string as the title.
        let entry = parse_history_entry(&json!("note: stretch every morning"));
        assert_eq!(entry.date, None);
        assert_eq!(entry.title.as_deref(), Some("note: stretch every morning"));
    }

    #[test]
    fn test_parse_null() {
        let entry = parse_history_entry(&Value::Null);
        assert_eq!(entry, HistoryEntry::default());
    }

    #[test]
    fn test_parse_structured_record() {
        let entry = parse_history_entry(&json!({"date": "2025-06-01", "title": "Run 5 km"}));
        assert_eq!(entry.date.as_deref(), Some("2025-06-01"));
        assert_eq!(entry.title.as_deref(), Some("Run 5 km"));
    }

    #[test]
    fn test_parse_structured_record_alias_order() {
        let entry = parse_history_entry(&json!({"d": "2025-06-01", "body": "Run 5 km"}));
        assert_eq!(entry.date.as_deref(), Some("2025-06-01"));
        assert_eq!(entry.title.as_deref(), Some("Run 5 km"));

        // "date" wins over "d", "title" over "body".
        let entry = parse_history_entry(&json!({
            "date": "2025-06-02", "d": "2025-06-01",
            "title": "Swim", "body": "Run 5 km"
        }));
        assert_eq!(entry.date.as_deref(), Some("2025-06-02"));
        assert_eq!(entry.title.as_deref(), Some("Swim"));
    }

    #[test]
    fn test_parse_structured_record_skips_empty_fields() {
        let entry = parse_history_entry(&json!({"date": "", "data": "2025-06-01", "title": "Run"}));
        assert_eq!(entry.date.as_deref(), Some("2025-06-01"));
        assert_eq!(entry.title.as_deref(), Some("Run"));
    }

    #[test]
    fn test_parse_unrecognized_object_serializes() {
        let entry = parse_history_entry(&json!({"foo": "bar"}));
        assert_eq!(entry.date, None);
        assert_eq!(entry.title.as_deref(), Some(r#"{"foo":"bar"}"#));
    }

    #[test]
    fn test_parse_other_types_render_as_text() {
        assert_eq!(
            parse_history_entry(&json!(42)).title.as_deref(),
            Some("42")
        );
        assert_eq!(
            parse_history_entry(&json!(true)).title.as_deref(),
            Some("true")
        );
        assert_eq!(
            parse_history_entry(&json!(["a", "b"])).title.as_deref(),
            Some(r#"["a","b"]"#)
        );
    }

    #[test]
    fn test_list_entries_sorts_by_date_descending() {
        let snap = snapshot(&[
            ("k1", json!("2025-01-01: A")),
            ("k2", json!("2025-06-01: B")),
        ]);
        let items = list_entries(&snap);
        assert_eq!(
            items,
            vec![
                ChallengeItem {
                    key: "k2".to_string(),
                    date: "2025-06-01".to_string(),
                    title: "B".to_string(),
                },
                ChallengeItem {
                    key: "k1".to_string(),
                    date: "2025-01-01".to_string(),
                    title: "A".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_list_entries_empty_snapshot() {
        assert!(list_entries(&Snapshot::new()).is_empty());
    }

    #[test]
    fn test_list_entries_key_fallbacks() {
        let snap = snapshot(&[("2025-03-10", Value::Null)]);
        let items = list_entries(&snap);
        assert_eq!(items[0].date, "2025-03-10");
        assert_eq!(items[0].title, "Challenge: 2025-03-10");
    }

    #[test]
    fn test_list_entries_empty_title_after_colon_falls_back() {
        let snap = snapshot(&[("k1", json!("2025-03-10:"))]);
        let items = list_entries(&snap);
        assert_eq!(items[0].date, "2025-03-10");
        assert_eq!(items[0].title, "Challenge: k1");
    }

    #[test]
    fn test_list_entries_undated_sorts_last() {
        // A key that is not date-shaped still becomes the date, and a
        // lexically small one lands after all real dates.
        let snap = snapshot(&[
            ("-misc", json!("just a note")),
            ("k1", json!("2025-01-01: A")),
        ]);
        let items = list_entries(&snap);
        assert_eq!(items[0].key, "k1");
        assert_eq!(items[1].key, "-misc");
    }

    #[test]
    fn test_list_ranking_orders_by_points() {
        let snap = snapshot(&[
            ("u1", json!({"name": "Anna", "points": 150, "challengesCompleted": 12})),
            ("u2", json!({"name": "Pol", "points": 120, "challengesCompleted": 10})),
        ]);
        let rows = list_ranking(&snap);
        assert_eq!(
            rows,
            vec![
                RankingEntry {
                    id: "u1".to_string(),
                    name: "Anna".to_string(),
                    points: 150,
                    challenges_completed: 12,
                },
                RankingEntry {
                    id: "u2".to_string(),
                    name: "Pol".to_string(),
                    points: 120,
                    challenges_completed: 10,
                },
            ]
        );
    }

    #[test]
    fn test_list_ranking_coerces_bad_points() {
        let snap = snapshot(&[("u3", json!({"points": "not-a-number"}))]);
        let rows = list_ranking(&snap);
        assert_eq!(rows[0].points, 0);
        assert_eq!(rows[0].challenges_completed, 0);
        assert_eq!(rows[0].name, "User u3");
    }

    #[test]
    fn test_list_ranking_accepts_numeric_strings() {
        let snap = snapshot(&[("u1", json!({"name": "Anna", "points": "150"}))]);
        assert_eq!(list_ranking(&snap)[0].points, 150);
    }

    #[test]
    fn test_coerce_count_edge_values() {
        assert_eq!(coerce_count(Some(&json!(12.9))), 12);
        assert_eq!(coerce_count(Some(&json!(-5))), 0);
        assert_eq!(coerce_count(Some(&json!(null))), 0);
        assert_eq!(coerce_count(Some(&json!({"nested": 1}))), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn test_listers_are_idempotent() {
        let snap = snapshot(&[
            ("k1", json!("2025-01-01: A")),
            ("u1", json!({"name": "Anna", "points": 150})),
        ]);
        assert_eq!(list_entries(&snap), list_entries(&snap));
        assert_eq!(list_ranking(&snap), list_ranking(&snap));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Do 20  Push-ups! "), "do-20-push-ups");
        assert_eq!(slugify("Run 5 km"), "run-5-km");
        assert_eq!(slugify("???"), "");
    }
}
