//! quakewatch CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use quakewatch::{
    api,
    commands::{
        cmd_history, cmd_init, cmd_list, cmd_location, cmd_magnitude, cmd_purge_all,
        cmd_purge_old, cmd_recent, cmd_scrape, cmd_stats, print_history, print_purge_stats,
        print_records, print_scrape_stats, print_stats,
    },
    config::Config,
    error::Result,
    fetch::TimeRange,
    store::EventStore,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "quakewatch")]
#[command(version, about = "Seismic event feed scraper with a local query API", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize quakewatch configuration and database
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Fetch a feed window and ingest it
    Scrape {
        /// Feed window: hour, day, week or month
        #[arg(default_value = "day")]
        time_range: String,
    },

    /// List stored events, most recent first
    List {
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Filter events by magnitude range
    Magnitude {
        /// Minimum magnitude (inclusive)
        min: f64,

        /// Maximum magnitude (inclusive)
        max: Option<f64>,
    },

    /// Filter events by location substring (case-insensitive)
    Location {
        /// Location search string
        query: String,
    },

    /// List events from the last N hours
    Recent {
        /// Number of hours to look back
        #[arg(default_value = "24")]
        hours: i64,
    },

    /// Show aggregate statistics
    Stats,

    /// Show the scrape audit trail
    History {
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Delete stored events
    Purge {
        #[command(subcommand)]
        target: PurgeTarget,
    },

    /// Start the HTTP API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum PurgeTarget {
    /// Delete events older than N days
    Old {
        /// Age threshold in days
        #[arg(default_value = "30")]
        days: i64,
    },

    /// Delete every stored event
    All,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Handle init command specially (doesn't need existing config)
    if matches!(cli.command, Commands::Init { .. }) {
        return handle_init(cli).await;
    }

    // Handle completions command (doesn't need config/db)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "quakewatch", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Open the store
    let store = EventStore::connect(&config).await?;

    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Scrape { time_range } => {
            let range: TimeRange = time_range.parse()?;
            let stats = cmd_scrape(&config, &store, range).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_scrape_stats(&stats);
            }
        }

        Commands::List { limit } => {
            let records = cmd_list(&store, limit).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }

        Commands::Magnitude { min, max } => {
            let records = cmd_magnitude(&store, min, max).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }

        Commands::Location { query } => {
            let records = cmd_location(&store, &query).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }

        Commands::Recent { hours } => {
            let records = cmd_recent(&store, hours).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }

        Commands::Stats => {
            let stats = cmd_stats(&store).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }

        Commands::History { limit } => {
            let entries = cmd_history(&store, limit).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_history(&entries);
            }
        }

        Commands::Purge { target } => {
            let stats = match target {
                PurgeTarget::Old { days } => cmd_purge_old(&store, days).await?,
                PurgeTarget::All => cmd_purge_all(&store).await?,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_purge_stats(&stats);
            }
        }

        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            api::serve(config, store).await?;
        }
    }

    Ok(())
}

async fn handle_init(cli: Cli) -> Result<()> {
    let Commands::Init { force } = cli.command else {
        unreachable!()
    };

    // If the user specifies a config path, its parent is the base dir
    let base_dir = cli
        .config
        .as_deref()
        .and_then(|p| p.parent())
        .map(PathBuf::from);

    let config = cmd_init(base_dir, force).await?;

    println!("✓ quakewatch initialized successfully");
    println!("  Config:   {}", config.paths.config_file.display());
    println!("  Database: {}", config.paths.db_file.display());
    println!("\nNext steps:");
    println!("  quakewatch scrape day      # Ingest the past-day feed");
    println!("  quakewatch list --limit 20 # Show the latest events");
    println!("  quakewatch serve           # Start the HTTP API");

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_config_path);

    if !config_path.exists() {
        eprintln!(
            "Config file not found: {}\nRun 'quakewatch init' first.",
            config_path.display()
        );
        std::process::exit(1);
    }

    Config::load(&config_path)
}
