//! xcsync Benchmark Runner
//!
//! Times parsing, writing and syncing of generated projects and prints a
//! report. `--json-only` prints the report as JSON instead of saving it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::time::{Duration, Instant};

mod benchmarks;

const RESULTS_DIR: &str = "benchmarks/results";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub category: String,
    pub iterations: u32,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub std_dev_ms: f64,
    pub throughput: Option<Throughput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Throughput {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub timestamp: String,
    pub version: String,
    pub os: String,
    pub arch: String,
    pub results: Vec<BenchmarkResult>,
    /// Category name → (benchmark count, summed mean time in ms)
    pub categories: BTreeMap<String, (usize, f64)>,
}

/// Time `f` over `iterations` runs after one warmup run
pub fn run_benchmark<F>(name: &str, category: &str, iterations: u32, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    f();
    let times: Vec<Duration> = (0..iterations)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();

    let times_ms: Vec<f64> = times.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
    let count = times_ms.len().max(1) as f64;
    let mean_ms = times_ms.iter().sum::<f64>() / count;
    let min_ms = times_ms.iter().copied().fold(f64::INFINITY, f64::min);
    let max_ms = times_ms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = times_ms.iter().map(|t| (t - mean_ms).powi(2)).sum::<f64>() / count;

    BenchmarkResult {
        name: name.to_string(),
        category: category.to_string(),
        iterations,
        mean_ms,
        min_ms,
        max_ms,
        std_dev_ms: variance.sqrt(),
        throughput: None,
    }
}

/// Like [`run_benchmark`], reporting `units` processed per second
pub fn run_benchmark_with_throughput<F>(
    name: &str,
    category: &str,
    iterations: u32,
    units: u64,
    unit: &str,
    f: F,
) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut result = run_benchmark(name, category, iterations, f);
    if result.mean_ms > 0.0 {
        result.throughput = Some(Throughput {
            value: units as f64 * 1000.0 / result.mean_ms,
            unit: unit.to_string(),
        });
    }
    result
}

fn print_report(report: &BenchmarkReport) {
    println!("\n======== xcsync Benchmark Report ========");
    println!("Version: {} | {} ({})", report.version, report.os, report.arch);

    let mut current = "";
    for result in &report.results {
        if result.category != current {
            current = &result.category;
            println!("\n--- {} ---", current);
        }
        print!("  {:<44} {:>9.3}ms (±{:.3})", result.name, result.mean_ms, result.std_dev_ms);
        if let Some(throughput) = &result.throughput {
            print!(" [{:.0} {}]", throughput.value, throughput.unit);
        }
        println!();
    }
    println!("\nTotal: {} benchmarks", report.results.len());
}

fn main() -> Result<()> {
    let json_only = std::env::args().any(|arg| arg == "--json-only");

    if !json_only {
        println!("Running xcsync benchmarks...\n");
    }
    let mut results = Vec::new();
    results.extend(benchmarks::pbxproj::run_all()?);
    results.extend(benchmarks::sync_tree::run_all()?);

    let mut categories: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for result in &results {
        let entry = categories.entry(result.category.clone()).or_default();
        entry.0 += 1;
        entry.1 += result.mean_ms;
    }

    let now = chrono::Utc::now();
    let report = BenchmarkReport {
        timestamp: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        results,
        categories,
    };

    if json_only {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    fs::create_dir_all(RESULTS_DIR)?;
    let path = format!("{}/benchmark-{}.json", RESULTS_DIR, now.format("%Y%m%d_%H%M%S"));
    fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("\nResults saved to {}", path);
    Ok(())
}
