use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod config;
mod db;
mod error;
mod intake;
mod labels;
mod models;
mod recommend;
mod report;
mod series;

use crate::aggregate::Question;
use crate::db::{PgRecordStore, RecordStore};
use crate::intake::SubmissionForm;
use crate::labels::Language;

#[derive(Parser)]
#[command(name = "skillbridge-survey")]
#[command(about = "Bilingual survey intake and results dashboard for SkillBridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic sample responses
    Seed,
    /// Import responses from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Validate and store one response
    Submit {
        #[command(flatten)]
        form: SubmissionForm,
    },
    /// Print participation and strategic recommendations
    Summary {
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// Print one question as a JSON chart series
    Series {
        #[arg(long, value_enum)]
        question: Question,
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, value_enum)]
        lang: Option<Language>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List everyone who answered
    Participants {
        #[arg(long, value_enum)]
        lang: Option<Language>,
        /// Print the stored records as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Delete every stored response
    Clear {
        /// Confirm the deletion; it cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skillbridge_survey=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::Settings::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await
        .context("failed to connect to Postgres")?;
    let store = PgRecordStore::new(pool);

    match cli.command {
        Commands::InitDb => {
            db::init_db(store.pool()).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let inserted = db::seed(store.pool()).await?;
            println!("Seed data inserted ({inserted} new responses).");
        }
        Commands::Import { csv } => {
            let summary = db::import_csv(store.pool(), &csv).await?;
            println!(
                "Inserted {} responses from {} ({} duplicates, {} rejected).",
                summary.inserted,
                csv.display(),
                summary.duplicates,
                summary.rejected
            );
        }
        Commands::Submit { form } => {
            let record = form.validate().context("submission rejected")?;
            let id = store.create(&record).await?;
            println!("Response stored with id {id}.");
        }
        Commands::Summary { lang } => {
            let lang = lang.unwrap_or(settings.language);
            let (_, bundle) = db::load_bundle(&store).await?;
            println!(
                "{}",
                report::progress_line(bundle.total, settings.target_participants, lang)
            );

            match recommend::recommend(&bundle) {
                Some(summary) => {
                    for sentence in summary.sentences(lang) {
                        println!("- {sentence}");
                    }
                }
                None => println!(
                    "{}",
                    lang.pick("لا توجد ردود مسجلة بعد.", "No survey responses recorded yet.")
                ),
            }
        }
        Commands::Series { question, lang } => {
            let lang = lang.unwrap_or(settings.language);
            let (_, bundle) = db::load_bundle(&store).await?;
            let points = match question {
                Question::CertificationImportance => {
                    // per-status averages ride along with the rating histogram
                    serde_json::json!({
                        "histogram": series::to_series(&bundle.table(question), lang),
                        "average_by_status": series::average_series(&bundle.certification_by_status, lang),
                    })
                }
                Question::DesiredSkills | Question::PreferredPrice | Question::JobOpportunities => {
                    let cross_tab = match question {
                        Question::DesiredSkills => &bundle.skills_by_status,
                        Question::PreferredPrice => &bundle.pricing_by_status,
                        _ => &bundle.job_by_status,
                    };
                    serde_json::json!({
                        "overall": series::to_series(&bundle.table(question), lang),
                        "by_status": series::cross_tab_series(cross_tab, lang)
                            .into_iter()
                            .map(|(status, points)| serde_json::json!({ "status": status, "series": points }))
                            .collect::<Vec<_>>(),
                    })
                }
                _ => serde_json::to_value(series::to_series(&bundle.table(question), lang))?,
            };
            println!("{}", serde_json::to_string_pretty(&points)?);
        }
        Commands::Report { lang, out } => {
            let lang = lang.unwrap_or(settings.language);
            let (_, bundle) = db::load_bundle(&store).await?;
            let summary = recommend::recommend(&bundle);
            let report = report::build_report(
                &bundle,
                summary.as_ref(),
                settings.target_participants,
                chrono::Utc::now(),
                lang,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Participants { lang, json } => {
            let lang = lang.unwrap_or(settings.language);
            let records = store.fetch_all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }
            if records.is_empty() {
                println!("{}", lang.pick("لا يوجد مشاركون.", "No participants yet."));
                return Ok(());
            }
            for line in report::participant_lines(&records, lang) {
                println!("{line}");
            }
        }
        Commands::Clear { yes } => {
            if !yes {
                anyhow::bail!("refusing to delete all responses without --yes");
            }
            let removed = store.delete_all().await?;
            info!(removed, "survey responses cleared");
            println!("Deleted {removed} responses.");
        }
    }

    Ok(())
}
