//! `gpu-watch`: poll a running gateway for free GPUs until Ctrl+C.

use anyhow::Result;
use colored::Colorize;
use std::time::Duration;

use ilab_core::models::GpuAvailability;

const GPU_FREE_PATH: &str = "/api/fine-tune/gpu-free";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub async fn run(base_url: &str, interval_secs: u64) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    let endpoint = format!("{}{}", base_url.trim_end_matches('/'), GPU_FREE_PATH);

    println!("{} {} every {}s (Ctrl+C to stop)", "Watching".cyan().bold(), endpoint, interval_secs);

    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let gpus = fetch_gpu_availability(&client, &endpoint).await;
                print_availability(gpus);
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Stopped.".dimmed());
                return Ok(());
            }
        }
    }
}

/// Any failure reads as 0 of 0 GPUs free.
pub async fn fetch_gpu_availability(client: &reqwest::Client, endpoint: &str) -> GpuAvailability {
    let response = match client.get(endpoint).send().await {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            tracing::warn!("gpu-free returned HTTP {}", response.status());
            return GpuAvailability::UNAVAILABLE;
        },
        Err(e) => {
            tracing::warn!("gpu-free request failed: {}", e);
            return GpuAvailability::UNAVAILABLE;
        },
    };

    match response.json::<GpuAvailability>().await {
        Ok(gpus) => gpus,
        Err(e) => {
            tracing::warn!("gpu-free returned an unreadable body: {}", e);
            GpuAvailability::UNAVAILABLE
        },
    }
}

fn print_availability(gpus: GpuAvailability) {
    let summary = format!("{}/{}", gpus.free_gpus, gpus.total_gpus);
    let summary = if gpus.free_gpus > 0 { summary.green() } else { summary.yellow() };
    println!("GPUs free: {}", summary);
}
