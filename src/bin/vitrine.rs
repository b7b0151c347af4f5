//! vitrine: portfolio stats CLI
//!
//! Fetches (or serves cached) profile stats and manages the local cache.

use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Parser, Subcommand};
use serde::Serialize;
use vitrine::{Config, FetchOutcome, VitrineBuilder};

static LONG_VERSION: LazyLock<String> = LazyLock::new(vitrine::version_string);

/// Vitrine CLI
#[derive(Parser)]
#[command(name = "vitrine")]
#[command(version = LONG_VERSION.as_str())]
#[command(about = "Portfolio profile stats with a local TTL cache")]
struct Args {
    /// Config file (default: ~/.vitrine/config.toml, then /etc/vitrine/config.toml)
    #[arg(short, long, env = "VITRINE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show GitHub stats
    Github {
        /// Account name (default: [github] username from config)
        user: Option<String>,
        /// Also report where the record came from
        #[arg(long)]
        source: bool,
    },

    /// Show LeetCode stats
    Leetcode {
        /// Account name (default: [leetcode] username from config)
        user: Option<String>,
        /// Also report where the record came from
        #[arg(long)]
        source: bool,
    },

    /// Manage the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every stats entry written by vitrine
    Clear,

    /// Remove a single key
    Remove {
        /// Cache key (e.g., "github-stats-octocat")
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let service = VitrineBuilder::from_config(&config).build()?;

    match args.command {
        Command::Github { user, source } => {
            let user = user.unwrap_or_else(|| config.github.username.clone());
            print_outcome(service.github_outcome(&user).await, source)?;
        }
        Command::Leetcode { user, source } => {
            let user = user.unwrap_or_else(|| config.leetcode.username.clone());
            print_outcome(service.leetcode_outcome(&user).await, source)?;
        }
        Command::Cache { action } => match action {
            CacheAction::Clear => {
                let removed = service.cache().clear_namespaces();
                println!("removed {removed} entries");
            }
            CacheAction::Remove { key } => {
                service.cache().remove(&key);
                println!("removed {key}");
            }
        },
    }

    Ok(())
}

fn print_outcome<T: Serialize>(
    outcome: FetchOutcome<T>,
    show_source: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show_source {
        eprintln!("source: {}", outcome.origin());
    }
    println!("{}", serde_json::to_string_pretty(outcome.record())?);
    Ok(())
}
