//! Project file benchmarks

use anyhow::Result;
use xcsync_benchmarks::sample_project;
use xcsync_core::Project;

use crate::{run_benchmark, run_benchmark_with_throughput, BenchmarkResult};

const CATEGORY: &str = "Project File";
const ITERATIONS: u32 = 30;

pub fn run_all() -> Result<Vec<BenchmarkResult>> {
    let mut results = Vec::new();
    for files in [100, 2_000] {
        results.push(bench_parse(files)?);
        results.push(bench_write(files)?);
    }
    results.push(bench_graph_lookup()?);
    Ok(results)
}

fn bench_parse(files: usize) -> Result<BenchmarkResult> {
    let text = sample_project(files)?.to_pbxproj();
    let bytes = text.len() as u64;
    Ok(run_benchmark_with_throughput(
        &format!("Parse project ({} files)", files),
        CATEGORY,
        ITERATIONS,
        bytes,
        "B/s",
        || {
            let project = Project::parse(&text);
            std::hint::black_box(project.is_ok());
        },
    ))
}

fn bench_write(files: usize) -> Result<BenchmarkResult> {
    let project = sample_project(files)?;
    Ok(run_benchmark(
        &format!("Write project ({} files)", files),
        CATEGORY,
        ITERATIONS,
        || {
            std::hint::black_box(project.to_pbxproj());
        },
    ))
}

fn bench_graph_lookup() -> Result<BenchmarkResult> {
    let project = sample_project(2_000)?;
    Ok(run_benchmark(
        "Resolve target phase (2000 files)",
        CATEGORY,
        ITERATIONS,
        || {
            let phase = project
                .graph
                .target_phase("App", xcsync_core::BuildPhaseKind::Sources);
            std::hint::black_box(phase);
        },
    ))
}
