//! Key-value mode: writes item keys straight into Redis, bypassing the
//! HTTP surface. Measures what the datastore alone can sustain.

use crate::stats::{worker_share, Summary};
use anyhow::{Context, Result};
use futures::future::join_all;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::{Duration, Instant};

pub async fn run(
    host: &str,
    port: u16,
    password: Option<&str>,
    requests: usize,
    workers: usize,
) -> Result<Summary> {
    let url = match password {
        Some(password) => format!("redis://:{password}@{host}:{port}"),
        None => format!("redis://{host}:{port}"),
    };
    let client = redis::Client::open(url).context("Invalid Redis URL")?;
    let conn = ConnectionManager::new(client)
        .await
        .context("Failed to connect to Redis")?;

    println!("Writing {requests} keys to redis://{host}:{port} from {workers} workers");

    let handles: Vec<_> = (0..workers)
        .map(|index| {
            let conn = conn.clone();
            let budget = worker_share(requests, workers, index);
            tokio::spawn(async move { worker(conn, budget).await })
        })
        .collect();

    let mut failed = 0;
    let mut latencies = Vec::with_capacity(requests);
    for result in join_all(handles).await {
        let (worker_failed, worker_latencies) = result.context("Worker task panicked")?;
        failed += worker_failed;
        latencies.extend(worker_latencies);
    }

    Ok(Summary::new(requests, failed, latencies))
}

async fn worker(mut conn: ConnectionManager, budget: usize) -> (usize, Vec<Duration>) {
    let mut failed = 0;
    let mut latencies = Vec::with_capacity(budget);

    for _ in 0..budget {
        let name = crate::random_string(8);
        let description = crate::random_string(20);

        let started = Instant::now();
        let result: redis::RedisResult<()> = conn.set(format!("item:{name}"), description).await;
        match result {
            Ok(()) => latencies.push(started.elapsed()),
            Err(e) => {
                tracing::warn!("Redis write failed: {}", e);
                failed += 1;
            }
        }
    }

    (failed, latencies)
}
