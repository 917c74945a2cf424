use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::error::AggregateError;
use crate::models::{EntityStats, RatingRecord};

/// Groups `records` by teacher and ranks them by average score.
///
/// Grouping is exact and case-sensitive on `entity_name`. Rows are ordered by
/// average descending, then review count descending; remaining ties keep the
/// order in which each teacher first appears in `records`. A `limit` keeps
/// only the first `limit` rows and must not be negative.
///
/// Scores are not range-checked here.
pub fn aggregate(
    records: &[RatingRecord],
    limit: Option<i64>,
) -> Result<Vec<EntityStats>, AggregateError> {
    let limit = match limit {
        Some(n) if n < 0 => {
            return Err(AggregateError::InvalidArgument(format!(
                "limit must be non-negative, got {n}"
            )))
        }
        Some(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        None => None,
    };

    // (entity, score sum, count) in first-appearance order
    let mut groups: Vec<(&str, i64, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index
            .entry(record.entity_name.as_str())
            .or_insert_with(|| {
                groups.push((record.entity_name.as_str(), 0, 0));
                groups.len() - 1
            });
        let entry = &mut groups[slot];
        entry.1 += i64::from(record.score);
        entry.2 += 1;
    }

    let mut stats: Vec<EntityStats> = groups
        .into_iter()
        .map(|(entity_name, sum, count)| EntityStats {
            entity_name: entity_name.to_string(),
            average_score: sum as f64 / count as f64,
            count,
        })
        .collect();

    // sort_by is stable, which preserves first-appearance order on full ties
    stats.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
    });

    if let Some(n) = limit {
        stats.truncate(n);
    }

    debug!(
        records = records.len(),
        entities = stats.len(),
        "Aggregated ratings"
    );

    Ok(stats)
}
