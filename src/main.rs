//! # BizSearch CLI (`bizq`)
//!
//! The `bizq` binary is the operational interface for the listing query
//! engine. It provides commands for database initialization, fixture
//! loading, intent inspection, search, and starting the HTTP API server.
//!
//! ## Usage
//!
//! ```bash
//! bizq --config ./config/bizq.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `bizq init` | Create the SQLite database and run schema migrations |
//! | `bizq seed <file>` | Load business/franchise listings from a JSON fixture |
//! | `bizq parse "<query>"` | Print the parsed intent as JSON (no store access) |
//! | `bizq search "<query>"` | Parse a query and execute it against the store |
//! | `bizq serve api` | Start the HTTP API server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bizsearch::{config, migrate, search, seed, server};

/// BizSearch CLI — a natural-language listing query engine for a business
/// and franchise marketplace.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/bizq.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "bizq",
    about = "BizSearch — natural-language listing query engine",
    version,
    long_about = "BizSearch turns free-text listing queries into structured, bounded filter \
    specifications and executes them as safe, paginated reads over the business and franchise \
    collections, exposed via a CLI and a JSON HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/bizq.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the listing tables with their
    /// indexes. Idempotent — running it multiple times is safe.
    Init,

    /// Load listings from a JSON fixture file.
    ///
    /// The file holds `{"businesses": [...], "franchises": [...]}`. Intended
    /// for local development and tests; the marketplace platform owns the
    /// production write path.
    Seed {
        /// Path to the JSON fixture.
        file: PathBuf,
    },

    /// Parse a free-text query and print the intent as JSON.
    ///
    /// Never touches the store — this is the CLI face of the NL endpoint's
    /// dry-run mode.
    Parse {
        /// The free-text listing query.
        query: String,
    },

    /// Parse a free-text query and execute it against the store.
    Search {
        /// The free-text listing query.
        query: String,

        /// Maximum results per collection (1–20).
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Start the HTTP API server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },
}

/// Server subcommands.
#[derive(Subcommand)]
enum ServeService {
    /// Start the JSON API server on the address in `[server].bind`.
    Api,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Parsing is pure; it needs neither config nor database.
    if let Commands::Parse { query } = &cli.command {
        search::run_parse(query)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Seed { file } => {
            seed::run_seed(&cfg, &file).await?;
        }
        Commands::Search { query, limit } => {
            search::run_search(&cfg, &query, limit).await?;
        }
        Commands::Serve { service } => match service {
            ServeService::Api => {
                tracing_subscriber::fmt()
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                    )
                    .init();
                server::run_server(&cfg).await?;
            }
        },
        Commands::Parse { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
