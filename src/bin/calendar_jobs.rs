//! Maintenance jobs over lesson schedulers

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

use calendar_server::{
    config::AppConfig,
    jobs::{fill_scheduler, update_invalid_schedulers, JobParams},
    logging,
    repository::Repository,
};

#[derive(Parser)]
#[command(name = "calendar-jobs")]
#[command(about = "Scheduler maintenance jobs for the calendar service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach a one-off scheduler to every lesson that has none
    FillScheduler(JobArgs),
    /// Rebuild schedulers that are missing or have no valid frequency
    UpdateInvalidSchedulers(JobArgs),
}

#[derive(Args)]
struct JobArgs {
    /// Tenant to process
    #[arg(long)]
    resource_path: String,

    /// Operator running the job
    #[arg(long, default_value = "system")]
    user_id: String,

    /// Lessons per page (overrides config)
    #[arg(long)]
    page_size: Option<i64>,

    /// Concurrent page workers (overrides config)
    #[arg(long)]
    workers: Option<usize>,

    /// Pages buffered ahead of the workers (overrides config)
    #[arg(long)]
    channel_capacity: Option<usize>,
}

impl JobArgs {
    fn into_params(self, config: &AppConfig) -> JobParams {
        let mut params = JobParams::new(self.resource_path, self.user_id, &config.jobs);
        if let Some(page_size) = self.page_size {
            params.page_size = page_size;
        }
        if let Some(workers) = self.workers {
            params.workers = workers;
        }
        if let Some(capacity) = self.channel_capacity {
            params.channel_capacity = capacity;
        }
        params
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init(&config.logging);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    let repository = Repository::new(pool);
    let lessons = Arc::new(repository.lessons.clone());
    let schedulers = Arc::new(repository.schedulers.clone());

    match cli.command {
        Commands::FillScheduler(args) => {
            let params = args.into_params(&config);
            let summary =
                fill_scheduler::fill_scheduler_to_lessons(&params, lessons, schedulers).await?;
            if summary.pages_failed > 0 {
                anyhow::bail!("{} pages failed, see logs", summary.pages_failed);
            }
        }
        Commands::UpdateInvalidSchedulers(args) => {
            let params = args.into_params(&config);
            let summary =
                update_invalid_schedulers::update_invalid_schedulers(&params, lessons, schedulers)
                    .await?;
            if summary.failed > 0 {
                anyhow::bail!("{} schedulers could not be repaired", summary.failed);
            }
        }
    }

    Ok(())
}
