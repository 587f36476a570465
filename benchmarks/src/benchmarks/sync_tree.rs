//! Sync benchmarks over generated directory trees

use anyhow::Result;
use tempfile::TempDir;
use xcsync_benchmarks::{sample_project, write_disk_tree};
use xcsync_core::{sync_configuration, Configuration};

use crate::{run_benchmark_with_throughput, BenchmarkResult};

const CATEGORY: &str = "Sync";
const ITERATIONS: u32 = 20;

pub fn run_all() -> Result<Vec<BenchmarkResult>> {
    Ok(vec![
        bench_sync("Sync flat directory", 0, 0, 200, false)?,
        bench_sync("Sync nested tree (4^3 dirs)", 4, 3, 5, false)?,
        bench_sync("Sync localized tree (3^2 dirs)", 3, 2, 5, true)?,
    ])
}

/// Each iteration replaces the group synced by the previous one
fn bench_sync(
    name: &str,
    breadth: usize,
    depth: usize,
    files_per_dir: usize,
    localized: bool,
) -> Result<BenchmarkResult> {
    let temp_dir = TempDir::new()?;
    let files = write_disk_tree(&temp_dir.path().join("Views"), breadth, depth, files_per_dir, localized)?;
    let mut project = sample_project(50)?;
    let configuration = Configuration::new("App/Views", "Views", "App");

    Ok(run_benchmark_with_throughput(
        name,
        CATEGORY,
        ITERATIONS,
        files as u64,
        "files/s",
        || {
            let report = sync_configuration(&mut project.graph, &configuration, temp_dir.path());
            std::hint::black_box(report.is_ok());
        },
    ))
}
