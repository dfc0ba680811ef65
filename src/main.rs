use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use cervical_risk_screen::config::Settings;
use cervical_risk_screen::models::{AssessmentRecord, PatientInput, RiskCategory};
use cervical_risk_screen::normalize;
use cervical_risk_screen::{batch, db, engine, recommend, report};

#[derive(Parser)]
#[command(name = "cervical-risk-screen")]
#[command(about = "Rule-based cervical cancer risk screening from symptom questionnaires", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one questionnaire given as a JSON object
    Assess {
        /// JSON file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
        #[arg(long)]
        respondent: Option<String>,
        /// Print the result as JSON instead of markdown
        #[arg(long)]
        json: bool,
        /// Store the assessment in Postgres
        #[arg(long)]
        save: bool,
    },
    /// Assess every row of a CSV questionnaire export
    Batch {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        save: bool,
    },
    /// Create or upgrade the database schema
    InitDb,
    /// List stored assessments, newest first
    History {
        #[arg(long)]
        category: Option<RiskCategory>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print age-based screening guidelines
    Guidelines {
        #[arg(long, conflicts_with = "dob")]
        age: Option<u32>,
        /// Date of birth as YYYY-MM-DD
        #[arg(long)]
        dob: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess {
            input: path,
            respondent,
            json,
            save,
        } => {
            let raw = read_document(&path)?;
            let input = PatientInput::from_json_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let record = AssessmentRecord {
                id: Uuid::new_v4(),
                respondent,
                assessed_at: Utc::now(),
                result: engine::assess(&input),
                input,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&record.result)?);
            } else {
                print!(
                    "{}",
                    report::render_assessment(&record.result, record.respondent.as_deref())
                );
            }

            if save {
                let settings = Settings::from_env()?;
                let pool = db::connect(&settings).await?;
                db::save_assessment(&pool, &record).await?;
                tracing::info!(id = %record.id, "assessment stored");
            }
        }
        Commands::Batch {
            csv,
            out,
            limit,
            save,
        } => {
            let rows = batch::read_rows_from_path(&csv)?;
            let today = Local::now().date_naive();
            let records = batch::assess_rows(rows, today);
            tracing::info!(rows = records.len(), "batch assessed");

            let limit = match limit {
                Some(limit) => limit,
                None => Settings::from_env()?.report_limit,
            };
            let source = csv.display().to_string();
            let report = report::build_report(Some(&source), today, &records, limit);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());

            if save {
                let settings = Settings::from_env()?;
                let pool = db::connect(&settings).await?;
                let inserted = db::save_assessments(&pool, &records).await?;
                println!("Stored {inserted} assessments.");
            }
        }
        Commands::InitDb => {
            let settings = Settings::from_env()?;
            let pool = db::connect(&settings).await?;
            db::init_db(&pool).await?;
            tracing::info!("schema ready");
            println!("Schema ready.");
        }
        Commands::History { category, limit } => {
            let settings = Settings::from_env()?;
            let pool = db::connect(&settings).await?;
            let records =
                db::fetch_history(&pool, category, limit.unwrap_or(settings.report_limit)).await?;

            if records.is_empty() {
                println!("No assessments stored.");
                return Ok(());
            }

            println!("Most recent assessments:");
            for record in records.iter() {
                println!(
                    "- {} {} score {:.1} ({}) {}",
                    record.assessed_at.format("%Y-%m-%d %H:%M"),
                    record.respondent.as_deref().unwrap_or("anonymous"),
                    record.result.score,
                    record.result.category,
                    record.result.scenario_label
                );
            }
        }
        Commands::Guidelines { age, dob } => {
            let today = Local::now().date_naive();
            let age = age.or_else(|| dob.and_then(|dob| normalize::age_on(&dob, today)));
            println!("Age-Based Screening Guidelines:");
            for line in recommend::screening_guidelines(age) {
                println!("- {line}");
            }
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read questionnaire from stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}
