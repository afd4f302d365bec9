//! HTTP mode: concurrent form posts against the reporting create route.

use crate::stats::{worker_share, Summary};
use anyhow::{bail, Context, Result};
use futures::future::join_all;
use shelf_types::CreateReport;
use std::time::{Duration, Instant};

pub async fn run(
    base_url: &str,
    requests: usize,
    workers: usize,
    timeout: Duration,
) -> Result<Summary> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let url = format!("{}/testitems", base_url.trim_end_matches('/'));

    println!("Posting {requests} items to {url} from {workers} workers");

    let handles: Vec<_> = (0..workers)
        .map(|index| {
            let client = client.clone();
            let url = url.clone();
            let budget = worker_share(requests, workers, index);
            tokio::spawn(async move { worker(client, url, budget).await })
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

async fn worker(client: reqwest::Client, url: String, budget: usize) -> (usize, Vec<Duration>) {
    let mut failed = 0;
    let mut latencies = Vec::with_capacity(budget);

    for _ in 0..budget {
        let name = crate::random_string(8);
        let description = crate::random_string(20);

        let started = Instant::now();
        match post_item(&client, &url, &name, &description).await {
            Ok(()) => latencies.push(started.elapsed()),
            Err(e) => {
                tracing::warn!("Request failed: {:#}", e);
                failed += 1;
            }
        }
    }

    (failed, latencies)
}

async fn post_item(
    client: &reqwest::Client,
    url: &str,
    name: &str,
    description: &str,
) -> Result<()> {
    let response = client
        .post(url)
        .form(&[("name", name), ("description", description)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        bail!("unexpected status {status}");
    }

    let report: CreateReport = response
        .json()
        .await
        .context("Failed to parse create response")?;
    if report.status != "success" {
        bail!("server reported status {:?}", report.status);
    }

    Ok(())
}
