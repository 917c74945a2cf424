use std::borrow::Cow;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::aggregate::aggregate;
use crate::error::AggregateError;
use crate::models::{EntityStats, RatingRecord, MAX_SCORE};
use crate::search;

pub const LATEST_COUNT: usize = 5;

pub fn stars(score: i32) -> String {
    let filled = score.clamp(0, MAX_SCORE) as usize;
    let mut out = "★".repeat(filled);
    out.push_str(&"☆".repeat(MAX_SCORE as usize - filled));
    out
}

pub fn medal(rank: usize) -> Option<&'static str> {
    match rank {
        1 => Some("🥇"),
        2 => Some("🥈"),
        3 => Some("🥉"),
        _ => None,
    }
}

fn review_label(count: usize) -> String {
    if count == 1 {
        "1 review".to_string()
    } else {
        format!("{count} reviews")
    }
}

pub fn leaderboard_line(rank: usize, stat: &EntityStats) -> String {
    let badge = medal(rank).map(|m| format!(" {m}")).unwrap_or_default();
    format!(
        "#{rank}{badge} {}  {:.2}★ ({})",
        stat.entity_name,
        stat.average_score,
        review_label(stat.count)
    )
}

pub fn render_leaderboard(stats: &[EntityStats]) -> String {
    if stats.is_empty() {
        return "No reviews yet.\n".to_string();
    }

    let mut output = String::new();
    for (i, stat) in stats.iter().enumerate() {
        let _ = writeln!(output, "{}", leaderboard_line(i + 1, stat));
    }
    output
}

pub fn review_line(record: &RatingRecord) -> String {
    format!(
        "{} | {} | {} | {}: {}",
        record.subject_name,
        format_timestamp(&record.created_at),
        record.entity_name,
        stars(record.score),
        record.comment
    )
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn build_report(
    subject: Option<&str>,
    top: i64,
    records: &[RatingRecord],
) -> Result<String, AggregateError> {
    let scoped: Cow<'_, [RatingRecord]> = match subject {
        Some(query) => Cow::Owned(
            search::filter_by_subject(records, query)
                .into_iter()
                .cloned()
                .collect(),
        ),
        None => Cow::Borrowed(records),
    };
    let stats = aggregate(&scoped, Some(top))?;

    let mut output = String::new();
    let scope_label = subject.unwrap_or("all NECs");

    let _ = writeln!(output, "# NEC Reviews Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} reviews)",
        scope_label,
        scoped.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Teacher Leaderboard");

    if stats.is_empty() {
        let _ = writeln!(output, "No reviews yet.");
    } else {
        for (i, stat) in stats.iter().enumerate() {
            let _ = writeln!(output, "- {}", leaderboard_line(i + 1, stat));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Latest Reviews");

    let recent = search::latest(&scoped, LATEST_COUNT);
    if recent.is_empty() {
        let _ = writeln!(output, "No reviews yet.");
    } else {
        for record in recent {
            let _ = writeln!(output, "- {}", review_line(record));
        }
    }

    Ok(output)
}
