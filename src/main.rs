use anyhow::Result;
use clap::Parser;
use polls::{config, db, web};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
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
    let addr = cfg.bind_addr()?;

    let pool = db::init_pool(&cfg.database_url(), cfg.database.max_connections).await?;
    db::run_migrations(&pool).await?;

    info!("starting polls server");
    let state = web::AppState::new(pool, cfg.polls.index_limit as usize);
    web::serve(addr, state).await
}
