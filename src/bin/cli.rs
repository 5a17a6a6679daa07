//! Schedule Crawler CLI
//!
//! Local execution entry point: serve the HTTP routes, refresh the snapshot
//! once, or look up a single schedule.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use schedule_crawler::{
    config,
    error::Result,
    models::{Config, SubjectKind},
    pipeline,
};

/// Schedule Crawler - University Class Schedule Cache
#[derive(Parser, Debug)]
#[command(
    name = "schedule-crawler",
    version,
    about = "University class schedule crawler and cache"
)]

struct Cli {
    /// Path to storage directory containing config.toml and the snapshot
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API with periodic cache refresh
    #[cfg(feature = "server")]
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch group and teacher lists once and persist the snapshot
    Refresh,

    /// Print the schedule of one group or teacher as JSON
    Schedule(ScheduleTarget),

    /// Validate configuration
    Validate,

    /// Show persisted snapshot info
    Info,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ScheduleTarget {
    /// Group id
    #[arg(long)]
    group: Option<String>,

    /// Teacher id
    #[arg(long)]
    teacher: Option<String>,
}

impl ScheduleTarget {
    fn resolve(self) -> (SubjectKind, String) {
        match (self.group, self.teacher) {
            (Some(id), _) => (SubjectKind::Group, id),
            (None, Some(id)) => (SubjectKind::Teacher, id),
            // clap enforces exactly one of the two
            (None, None) => (SubjectKind::Group, String::new()),
        }
    }
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.storage_dir.join("config.toml");
    let config = config::load_config(&config_path)?;
    init_logging(cli.verbose, &config.logging.level);

    log::info!("Schedule crawler starting...");
    if config_path.exists() {
        log::info!("Loaded configuration from {}", config_path.display());
    } else {
        log::warn!(
            "No config at {}, using defaults",
            config_path.display()
        );
    }

    match cli.command {
        #[cfg(feature = "server")]
        Command::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let config = Arc::new(config);
            let cache = pipeline::build_cache(Arc::clone(&config), &cli.storage_dir)?;
            pipeline::run_server(&config, cache).await?;
        }

        Command::Refresh => {
            config.validate()?;
            let cache = pipeline::build_cache(Arc::new(config), &cli.storage_dir)?;
            pipeline::run_refresh(&cache).await?;
        }

        Command::Schedule(target) => {
            config.validate()?;
            let (kind, id) = target.resolve();
            let cache = pipeline::build_cache(Arc::new(config), &cli.storage_dir)?;
            let response = pipeline::run_schedule(&cache, kind, &id).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            let storage = pipeline::snapshot_storage(&config, &cli.storage_dir);
            log::info!("Snapshot: {}", storage.snapshot_path().display());
            pipeline::run_info(&config, &storage).await?;
        }
    }

    log::info!("Done!");

    Ok(())
}
