//! Shelf load generator
//!
//! Hammers the item service over HTTP, or a Redis instance directly, from a
//! bounded worker pool and reports success rate and latency.

mod http;
mod kv;
mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shelf-loadgen")]
#[command(author, version, about = "Load generator for the shelf item service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Total number of requests to issue
    #[arg(short = 'n', long, global = true, default_value_t = 10_000)]
    requests: usize,

    /// Number of concurrent workers
    #[arg(short, long, global = true, default_value_t = 20)]
    workers: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a running server through the reporting create route
    Http {
        /// Base URL of the server
        #[arg(long, env = "SHELF_URL", default_value = "http://localhost:8080")]
        url: String,

        /// Per-request timeout in seconds; a timeout counts as a failure
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },

    /// Write item keys straight into Redis, bypassing the service
    Redis {
        #[arg(long, env = "REDIS_HOST", default_value = "localhost")]
        host: String,

        #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
        port: u16,

        #[arg(long, env = "REDIS_PASSWORD")]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let summary = match cli.command {
        Commands::Http { url, timeout } => {
            http::run(
                &url,
                cli.requests,
                cli.workers,
                Duration::from_secs(timeout),
            )
            .await?
        }
        Commands::Redis {
            host,
            port,
            password,
        } => kv::run(&host, port, password.as_deref(), cli.requests, cli.workers).await?,
    };

    summary.print();
    Ok(())
}

/// Random alphanumeric payload, like the synthetic items the original
/// benchmarks wrote.
fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_strings_have_the_requested_length() {
        assert_eq!(random_string(8).len(), 8);
        assert_eq!(random_string(0).len(), 0);
        assert!(random_string(20).chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn cli_parses_both_modes() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::parse_from(["shelf-loadgen", "http", "--url", "http://localhost:9999"]);
        assert_eq!(cli.requests, 10_000);
        assert!(matches!(cli.command, Commands::Http { .. }));

        let cli = Cli::parse_from([
            "shelf-loadgen",
            "redis",
            "--host",
            "cache.internal",
            "--workers",
            "50",
        ]);
        assert_eq!(cli.workers, 50);
        match cli.command {
            Commands::Redis { host, port, .. } => {
                assert_eq!(host, "cache.internal");
                assert_eq!(port, 6379);
            }
            _ => panic!("expected redis mode"),
        }
    }
}
