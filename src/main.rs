//! # Recipe AI CLI (`recipe-ai`)
//!
//! Runs the HTTP server and offers offline access to the resolver, the
//! matcher, and the stored request history.
//!
//! ## Usage
//!
//! ```bash
//! recipe-ai --config ./config/recipes.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `recipe-ai init` | Create the SQLite database and run schema migrations |
//! | `recipe-ai serve` | Start the HTTP server |
//! | `recipe-ai match <ingredient>...` | Match catalog recipes against ingredients |
//! | `recipe-ai guess <filename>` | Guess a recipe from an upload filename |
//! | `recipe-ai history` | List stored recipes and queries |
//!
//! Logging is controlled by `RUST_LOG` (default `recipe_ai=info,tower_http=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_ai::{config, history, matcher, migrate, resolver, server};

/// Recipe AI: dish guesses from photos and recipe ideas from ingredients.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means defaults plus environment overrides
/// (`DATABASE_URL`, `DATABASE_NAME`, `PORT`).
#[derive(Parser)]
#[command(name = "recipe-ai", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/recipes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `documents` table.
    /// Running it more than once is safe.
    Init,

    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` (or `PORT`) and serves the recipe API.
    Serve,

    /// Match catalog recipes against a list of ingredients.
    Match {
        /// Ingredient names; case and surrounding whitespace are ignored.
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Guess a recipe from an upload filename.
    Guess {
        /// Filename as it would be uploaded, e.g. `margherita.jpg`.
        filename: String,
    },

    /// List stored recipes and queries, newest first.
    History {
        /// Only show one collection (`recipe` or `recipe_query`).
        #[arg(long)]
        kind: Option<String>,

        /// Maximum number of documents to show.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_ai=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match { ingredients } => {
            matcher::run_match(&ingredients)?;
        }
        Commands::Guess { filename } => {
            resolver::run_guess(&filename)?;
        }
        Commands::Init => {
            let cfg = config::load_or_minimal(&cli.config)?;
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            let cfg = config::load_or_minimal(&cli.config)?;
            server::run_server(&cfg).await?;
        }
        Commands::History { kind, limit } => {
            let cfg = config::load_or_minimal(&cli.config)?;
            history::run_history(&cfg, kind.as_deref(), limit).await?;
        }
    }

    Ok(())
}
