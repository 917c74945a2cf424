use chrono::{Duration, Utc};
use nec_reviews::report::render_leaderboard;
use nec_reviews::{aggregate, NewRating};
use uuid::Uuid;

#[test]
fn submitted_reviews_rank_on_the_leaderboard() {
    let now = Utc::now();
    let submissions = [
        ("DBMS", "Prof. Sharma", 5),
        ("DBMS", "Prof. Sharma", 3),
        ("Networks", "Prof. Rao", 4),
        ("Compilers", "Ms. Kapoor", 2),
    ];

    let records: Vec<_> = submissions
        .iter()
        .enumerate()
        .map(|(i, (nec, teacher, score))| {
            let rating = NewRating {
                subject_name: nec.to_string(),
                entity_name: teacher.to_string(),
                score: *score,
                comment: "review".to_string(),
            };
            rating.validate().expect("valid submission");
            rating.into_record(Uuid::new_v4(), now - Duration::minutes(i as i64))
        })
        .collect();

    let stats = aggregate(&records, Some(5)).expect("aggregation");
    let rendered = render_leaderboard(&stats);

    assert_eq!(
        rendered,
        "#1 🥇 Prof. Sharma  4.00★ (2 reviews)\n\
         #2 🥈 Prof. Rao  4.00★ (1 review)\n\
         #3 🥉 Ms. Kapoor  2.00★ (1 review)\n"
    );
}
