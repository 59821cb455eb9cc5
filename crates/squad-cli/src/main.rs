use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use squad_client::ReqwestFetcher;
use squad_core::codec;
use squad_core::locator::ORIGIN;
use squad_core::models::{RosterExtraction, TeamReference};
use squad_core::traits::{NullStore, PlayerStore};
use squad_core::{
    RosterWorker, ScrapeConfig, ScrapeService, TracingWorkerReporter, extract_roster_html,
};
use squad_db::{Database, DatabaseConfig, PlayerRepository};

#[derive(Parser)]
#[command(name = "squad", version, about = "Football roster extraction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the teams of a competition
    Teams {
        /// Team-listing path on the source site
        #[arg(short, long, env = "SQUAD_COMPETITION_PATH")]
        competition_path: Option<String>,
    },

    /// Extract one team's roster
    Roster {
        /// Team name stamped on every record
        #[arg(short, long)]
        team: String,

        /// Roster page URL
        #[arg(short, long)]
        url: String,

        /// Upsert the records (requires DATABASE_URL)
        #[arg(long, default_value_t = false)]
        save: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Extract a roster from a saved HTML page
    Parse {
        #[arg(long)]
        file: PathBuf,

        #[arg(short, long)]
        team: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Discover teams and scrape every roster, periodically
    Run {
        /// Run a single cycle and exit
        #[arg(long, default_value_t = false)]
        once: bool,

        /// Seconds between cycles (overrides SQUAD_INTERVAL_SECS)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    /// One compact JSON record per line
    Jsonl,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("squad=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Teams { competition_path } => {
            let config = ScrapeConfig::from_env()?;
            let config = match competition_path {
                Some(path) => ScrapeConfig {
                    competition_path: path,
                    ..config
                },
                None => config,
            };
            cmd_teams(&config).await?;
        }
        Commands::Roster {
            team,
            url,
            save,
            format,
        } => {
            let team = TeamReference {
                team_name: team,
                url,
            };
            let fetcher = build_fetcher(&ScrapeConfig::from_env()?)?;
            if save {
                let repo = connect_db().await?;
                cmd_roster(ScrapeService::with_store(fetcher, repo), &team, format).await?;
            } else {
                cmd_roster(ScrapeService::<_, NullStore>::new(fetcher), &team, format).await?;
            }
        }
        Commands::Parse { file, team, format } => {
            cmd_parse(&file, &team, format)?;
        }
        Commands::Run { once, interval } => {
            let config = ScrapeConfig::from_env()?;
            let config = match interval {
                Some(secs) => config.with_interval(Duration::from_secs(secs.max(1))),
                None => config,
            };
            cmd_run(config, once).await?;
        }
    }

    Ok(())
}

fn build_fetcher(config: &ScrapeConfig) -> Result<ReqwestFetcher> {
    ReqwestFetcher::with_timeout(config.team_timeout)
        .and_then(|f| f.restrict_to(ORIGIN))
        .context("Failed to create HTTP client")
}

/// Connect to PostgreSQL and apply migrations.
async fn connect_db() -> Result<PlayerRepository> {
    let db_config = DatabaseConfig::from_env()?;
    let db = Database::connect(&db_config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;
    Ok(db.player_repo())
}

async fn cmd_teams(config: &ScrapeConfig) -> Result<()> {
    let service = ScrapeService::<_, NullStore>::new(build_fetcher(config)?);
    let teams = service.discover_teams(&config.listing_url()).await?;
    println!("{}", serde_json::to_string_pretty(&teams)?);
    Ok(())
}

async fn cmd_roster<S: PlayerStore>(
    service: ScrapeService<ReqwestFetcher, S>,
    team: &TeamReference,
    format: OutputFormat,
) -> Result<()> {
    let outcome = service.scrape_team(team).await?;
    if outcome.upserted > 0 {
        tracing::info!(upserted = outcome.upserted, "Saved players");
    }

    let extraction = RosterExtraction {
        records: outcome.records,
        failures: outcome.failures,
    };
    print_extraction(&extraction, format)
}

/// Offline extraction; needs no scrape or database configuration.
fn cmd_parse(file: &Path, team: &str, format: OutputFormat) -> Result<RosterExtraction> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read HTML file: {}", file.display()))?;
    let extraction = extract_roster_html(&html, team)?;
    tracing::info!(
        records = extraction.records.len(),
        failures = extraction.failures.len(),
        "Parsed {}",
        file.display()
    );
    print_extraction(&extraction, format)?;
    Ok(extraction)
}

async fn cmd_run(config: ScrapeConfig, once: bool) -> Result<()> {
    let repo = connect_db().await?;
    let service = ScrapeService::with_store(build_fetcher(&config)?, repo);
    let worker = RosterWorker::new(service, config);
    let reporter = TracingWorkerReporter;

    if once {
        let summary = worker.run_cycle(&reporter).await?;
        let upserted: u64 = summary.completed.iter().map(|o| o.upserted).sum();
        println!(
            "{} teams scraped, {} failed, {} players saved",
            summary.completed.len(),
            summary.failed.len(),
            upserted
        );
        for failure in &summary.failed {
            println!("  {}: {}", failure.team_name, failure.error);
        }
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    worker.run(cancel, &reporter).await?;
    Ok(())
}

fn print_extraction(extraction: &RosterExtraction, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(extraction)?);
        }
        OutputFormat::Jsonl => {
            for record in &extraction.records {
                println!("{}", codec::encode(record)?);
            }
            report_failures(extraction)?;
        }
        OutputFormat::Csv => {
            let stdout = std::io::stdout();
            let mut writer = csv::Writer::from_writer(stdout.lock());
            for record in &extraction.records {
                writer.serialize(record)?;
            }
            writer.flush()?;
            report_failures(extraction)?;
        }
    }
    Ok(())
}

/// Skipped rows go to stderr, keeping stdout machine-readable.
fn report_failures(extraction: &RosterExtraction) -> Result<()> {
    let mut stderr = std::io::stderr().lock();
    for failure in &extraction.failures {
        writeln!(stderr, "row {}: {}", failure.row_index, failure.reason)?;
    }
    Ok(())
}
