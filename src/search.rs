use crate::models::RatingRecord;

/// Case-insensitive substring match on the NEC name. An empty query matches
/// everything.
pub fn filter_by_subject<'a>(records: &'a [RatingRecord], query: &str) -> Vec<&'a RatingRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.subject_name.to_lowercase().contains(&needle))
        .collect()
}

pub fn latest(records: &[RatingRecord], n: usize) -> Vec<&RatingRecord> {
    let mut recent: Vec<&RatingRecord> = records.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(n);
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn review(subject: &str, hours_ago: i64) -> RatingRecord {
        RatingRecord {
            id: Uuid::new_v4(),
            subject_name: subject.to_string(),
            entity_name: "Prof. Sharma".to_string(),
            score: 4,
            comment: "fine".to_string(),
            created_at: Utc::now() - Duration::hours(hours_ago),
        }
    }

    #[test]
    fn subject_filter_ignores_case() {
        let records = vec![review("DBMS", 1), review("Operating Systems", 2), review("dbms lab", 3)];
        let hits = filter_by_subject(&records, "DbMs");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].subject_name, "DBMS");
        assert_eq!(hits[1].subject_name, "dbms lab");
    }

    #[test]
    fn empty_query_keeps_everything() {
        let records = vec![review("DBMS", 1), review("Networks", 2)];
        assert_eq!(filter_by_subject(&records, "").len(), 2);
    }

    #[test]
    fn latest_orders_newest_first() {
        let records = vec![review("old", 48), review("new", 1), review("mid", 10)];
        let subjects: Vec<&str> = latest(&records, 2)
            .into_iter()
            .map(|r| r.subject_name.as_str())
            .collect();
        assert_eq!(subjects, vec!["new", "mid"]);
    }

    #[test]
    fn latest_keeps_input_order_for_equal_timestamps() {
        let at = Utc::now();
        let records: Vec<RatingRecord> = ["first", "second", "third"]
            .iter()
            .map(|subject| RatingRecord {
                created_at: at,
                ..review(subject, 0)
            })
            .collect();

        let subjects: Vec<&str> = latest(&records, 3)
            .into_iter()
            .map(|r| r.subject_name.as_str())
            .collect();
        assert_eq!(subjects, vec!["first", "second", "third"]);
    }
}
