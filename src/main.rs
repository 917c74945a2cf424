use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use nec_reviews::{aggregate, db, report, search, NewRating};

#[derive(Parser)]
#[command(name = "nec-reviews")]
#[command(about = "Submit, browse and rank NEC teacher reviews", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load sample reviews
    Seed,
    /// Submit a single review
    Submit {
        /// NEC (course/module) name
        #[arg(long)]
        nec: String,
        #[arg(long)]
        teacher: String,
        /// Rating from 1 to 5
        #[arg(long)]
        rating: i32,
        #[arg(long)]
        review: String,
    },
    /// Import reviews from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show the most recent reviews
    Latest {
        #[arg(long, default_value_t = report::LATEST_COUNT)]
        limit: usize,
    },
    /// Search reviews by NEC name
    Search {
        #[arg(long, default_value = "")]
        nec: String,
    },
    /// Rank teachers by average rating
    Leaderboard {
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        top: i64,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        nec: Option<String>,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        top: i64,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing() {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        );

    tracing_subscriber::registry().with(stderr_layer).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    debug!("Connected to Postgres");

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Submit {
            nec,
            teacher,
            rating,
            review,
        } => {
            let record = db::insert_rating(
                &pool,
                NewRating {
                    subject_name: nec,
                    entity_name: teacher,
                    score: rating,
                    comment: review,
                },
            )
            .await?;
            println!("Review submitted ({}).", record.id);
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} reviews from {}.", csv.display());
        }
        Commands::Latest { limit } => {
            let ratings = db::fetch_ratings(&pool).await?;
            let recent = search::latest(&ratings, limit);

            if recent.is_empty() {
                println!("No reviews yet.");
                return Ok(());
            }

            println!("Latest reviews:");
            for record in recent {
                println!("- {}", report::review_line(record));
            }
        }
        Commands::Search { nec } => {
            let ratings = db::fetch_ratings(&pool).await?;
            let hits = search::filter_by_subject(&ratings, &nec);
            info!(query = %nec, matches = hits.len(), "Search complete");

            if hits.is_empty() {
                println!("No reviews found for this NEC.");
                return Ok(());
            }

            for record in hits {
                println!("- {}", report::review_line(record));
            }
        }
        Commands::Leaderboard { top, json } => {
            let ratings = db::fetch_ratings(&pool).await?;
            let stats = aggregate(&ratings, Some(top))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Teacher Leaderboard");
                print!("{}", report::render_leaderboard(&stats));
            }
        }
        Commands::Report { nec, top, out } => {
            let ratings = db::fetch_ratings(&pool).await?;
            let report = report::build_report(nec.as_deref(), top, &ratings)?;
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
