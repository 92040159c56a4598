use std::time::Instant;

use serde::Serialize;

use crate::config::{BENCHMARK_PERCENTILE, BENCHMARK_WARMUP_RUNS};

/// Latency summary of repeated calls, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub runs: usize,
    pub mean_ms: f64,
    pub p95_ms: f64,
}

impl BenchmarkReport {
    /// Mean and the value at rank `ceil(0.95 * (n - 1))` of the sorted samples.
    pub fn from_samples(mut samples_ms: Vec<f64>) -> Option<Self> {
        if samples_ms.is_empty() {
            return None;
        }
        let runs = samples_ms.len();
        let mean_ms = samples_ms.iter().sum::<f64>() / runs as f64;
        samples_ms.sort_by(|a, b| a.total_cmp(b));
        let rank = (BENCHMARK_PERCENTILE * (runs - 1) as f64).ceil() as usize;
        Some(Self {
            runs,
            mean_ms,
            p95_ms: samples_ms[rank.min(runs - 1)],
        })
    }
}

/// Runs `call` untimed [`BENCHMARK_WARMUP_RUNS`] times, then `runs` timed
/// times, one after another. Returns `None` when `runs` is zero.
pub fn run_benchmark<T, E, F>(runs: usize, mut call: F) -> Result<Option<BenchmarkReport>, E>
where
    F: FnMut() -> Result<T, E>,
{
    if runs == 0 {
        return Ok(None);
    }
    for _ in 0..BENCHMARK_WARMUP_RUNS {
        call()?;
    }
    let mut samples_ms = Vec::with_capacity(runs);
    for _ in 0..runs {
        let started = Instant::now();
        call()?;
        samples_ms.push(started.elapsed().as_secs_f64() * 1000.0);
    }
    let report = BenchmarkReport::from_samples(samples_ms);
    if let Some(report) = &report {
        log::info!(
            "benchmark: {} runs, mean {:.4} ms, p95 {:.4} ms",
            report.runs,
            report.mean_ms,
            report.p95_ms
        );
    }
    Ok(report)
}
