use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use polls::config;
use polls::db;
use polls::visibility;

#[derive(Debug, Parser)]
#[command(author, version, about = "Administer poll questions and choices")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a question with its choices
    Add {
        /// Question text
        #[arg(long)]
        text: String,

        /// Publish offset in days from now (negative = past, positive = future)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        days: i64,

        /// Choice text; repeat for each choice
        #[arg(long = "choice")]
        choices: Vec<String>,
    },
    /// Print every question with its choice count and eligibility
    List,
    /// Delete a question and its choices
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let pool = db::init_pool(&cfg.database_url(), cfg.database.max_connections).await?;
    db::run_migrations(&pool).await?;

    match args.command {
        Command::Add {
            text,
            days,
            choices,
        } => {
            if text.trim().is_empty() {
                bail!("question text must be non-empty");
            }
            let pub_date = Utc::now() + Duration::days(days);
            let id = db::insert_question_with_choices(&pool, text.trim(), pub_date, &choices).await?;
            info!(id, choices = choices.len(), %pub_date, "question created");
            println!("{id}");
        }
        Command::List => {
            let now = Utc::now();
            for s in db::all_questions(&pool).await? {
                println!(
                    "{:>5}  {}  choices={:<3} eligible={:<5}  {}",
                    s.question.id,
                    s.question.pub_date.to_rfc3339(),
                    s.choice_count,
                    visibility::is_eligible(&s, now),
                    s.question.question_text
                );
            }
        }
        Command::Delete { id } => {
            if !db::delete_question(&pool, id).await? {
                bail!("question {id} not found");
            }
            info!(id, "question deleted");
        }
    }

    Ok(())
}
