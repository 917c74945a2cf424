use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ReviewError;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// A stored review of one teacher for one NEC.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub id: Uuid,
    pub subject_name: String,
    pub entity_name: String,
    pub score: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Submission payload, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewRating {
    pub subject_name: String,
    pub entity_name: String,
    pub score: i32,
    pub comment: String,
}

impl NewRating {
    pub fn validate(&self) -> Result<(), ReviewError> {
        for (field, value) in [
            ("subject_name", &self.subject_name),
            ("entity_name", &self.entity_name),
            ("comment", &self.comment),
        ] {
            if value.trim().is_empty() {
                return Err(ReviewError::MissingField(field));
            }
        }

        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(ReviewError::ScoreOutOfRange(self.score));
        }

        Ok(())
    }

    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> RatingRecord {
        RatingRecord {
            id,
            subject_name: self.subject_name,
            entity_name: self.entity_name,
            score: self.score,
            comment: self.comment,
            created_at,
        }
    }
}

/// Per-teacher leaderboard row, recomputed on every aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityStats {
    pub entity_name: String,
    pub average_score: f64,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(score: i32) -> NewRating {
        NewRating {
            subject_name: "DBMS".to_string(),
            entity_name: "Prof. Sharma".to_string(),
            score,
            comment: "Clear lectures".to_string(),
        }
    }

    #[test]
    fn accepts_scores_within_range() {
        assert!(submission(1).validate().is_ok());
        assert!(submission(5).validate().is_ok());
    }

    #[test]
    fn rejects_unrated_and_out_of_range_scores() {
        assert_eq!(
            submission(0).validate(),
            Err(ReviewError::ScoreOutOfRange(0))
        );
        assert_eq!(
            submission(6).validate(),
            Err(ReviewError::ScoreOutOfRange(6))
        );
    }

    #[test]
    fn rejects_blank_fields() {
        let mut rating = submission(4);
        rating.entity_name = "   ".to_string();
        assert_eq!(rating.validate(), Err(ReviewError::MissingField("entity_name")));

        let mut rating = submission(4);
        rating.comment = String::new();
        assert_eq!(rating.validate(), Err(ReviewError::MissingField("comment")));
    }

    #[test]
    fn into_record_keeps_submitted_text() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let record = submission(3).into_record(id, now);
        assert_eq!(record.id, id);
        assert_eq!(record.entity_name, "Prof. Sharma");
        assert_eq!(record.score, 3);
        assert_eq!(record.created_at, now);
    }
}
