use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ReviewError;
use crate::models::{NewRating, RatingRecord};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Inserts one rating. Rows carrying a `source_key` that is already stored
/// are skipped; returns whether a row was written.
async fn insert_row(
    pool: &PgPool,
    record: &RatingRecord,
    source_key: Option<&str>,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO nec_reviews.ratings
        (id, subject_name, entity_name, score, comment, created_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(record.id)
    .bind(&record.subject_name)
    .bind(&record.entity_name)
    .bind(record.score)
    .bind(&record.comment)
    .bind(record.created_at)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn insert_rating(pool: &PgPool, rating: NewRating) -> anyhow::Result<RatingRecord> {
    rating.validate()?;
    let record = rating.into_record(Uuid::new_v4(), Utc::now());
    insert_row(pool, &record, None)
        .await
        .context("failed to store rating")?;

    info!(
        id = %record.id,
        subject = %record.subject_name,
        entity = %record.entity_name,
        score = record.score,
        "Rating submitted"
    );

    Ok(record)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let now = Utc::now();
    let ratings = vec![
        ("seed-001", "DBMS", "Prof. Sharma", 5, "Explains normalisation really well", 2),
        ("seed-002", "DBMS", "Prof. Sharma", 4, "Tough but fair labs", 5),
        ("seed-003", "Operating Systems", "Dr. Iyer", 3, "Slides are dense", 9),
        ("seed-004", "Computer Networks", "Prof. Rao", 4, "Great packet tracing demos", 12),
        ("seed-005", "Operating Systems", "Dr. Iyer", 4, "Helpful office hours", 20),
        ("seed-006", "Compiler Design", "Ms. Kapoor", 2, "Assignments felt rushed", 30),
    ];

    let mut inserted = 0usize;
    for (source_key, subject, entity, score, comment, days_ago) in ratings {
        let record = RatingRecord {
            id: Uuid::new_v4(),
            subject_name: subject.to_string(),
            entity_name: entity.to_string(),
            score,
            comment: comment.to_string(),
            created_at: now - Duration::days(days_ago),
        };
        if insert_row(pool, &record, Some(source_key)).await? {
            inserted += 1;
        }
    }

    info!(inserted, "Seed ratings stored");
    Ok(())
}

/// Fetches every rating, newest first.
pub async fn fetch_ratings(pool: &PgPool) -> anyhow::Result<Vec<RatingRecord>> {
    let rows = sqlx::query(
        "SELECT id, subject_name, entity_name, score, comment, created_at \
         FROM nec_reviews.ratings \
         ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch ratings")?;

    let mut ratings = Vec::with_capacity(rows.len());

    for row in rows {
        ratings.push(RatingRecord {
            id: row.get("id"),
            subject_name: row.get("subject_name"),
            entity_name: row.get("entity_name"),
            score: row.get("score"),
            comment: row.get("comment"),
            created_at: row.get("created_at"),
        });
    }

    Ok(ratings)
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    subject_name: String,
    entity_name: String,
    score: i32,
    comment: String,
    created_at: Option<DateTime<Utc>>,
    source_key: Option<String>,
}

fn parse_csv<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<CsvRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        rows.push(result.with_context(|| format!("invalid CSV record {}", line + 1))?);
    }
    Ok(rows)
}

/// Validates a CSV row and turns it into a record plus its optional
/// `source_key`. A blank `created_at` is stamped with the current time.
fn row_to_record(row: CsvRow) -> Result<(RatingRecord, Option<String>), ReviewError> {
    let rating = NewRating {
        subject_name: row.subject_name,
        entity_name: row.entity_name,
        score: row.score,
        comment: row.comment,
    };
    rating.validate()?;

    let created_at = row.created_at.unwrap_or_else(Utc::now);
    Ok((rating.into_record(Uuid::new_v4(), created_at), row.source_key))
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let rows = parse_csv(file)?;
    let mut inserted = 0usize;

    for (line, row) in rows.into_iter().enumerate() {
        let (record, source_key) = match row_to_record(row) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(record = line + 1, error = %err, "Skipping invalid CSV row");
                continue;
            }
        };

        if insert_row(pool, &record, source_key.as_deref()).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}
