// src/main.rs
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use eeg_infer::config::{DecisionPolicy, SpectrumMethod, DEFAULT_SAMPLE_RATE_HZ};
use eeg_infer::dsp::{
    relative_band_powers, render_spectrum_png, CsvSource, PlotStyle, SpectrumBuilder,
};
use eeg_infer::model::{BenchmarkReport, ClassifierError, OnnxGateway};
use eeg_infer::{synth, Band, Classification, ClassificationPipeline};

const USAGE: &str =
    "Usage: eeg_infer --model model.onnx --csv sample.csv --fs 256 [--benchmark 200]";

/// Classify a single-channel EEG segment by its relative band power.
#[derive(Parser, Debug)]
#[command(name = "eeg_infer", version, about)]
struct Cli {
    /// ONNX classifier taking a [1, 5] float input
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,
    /// Samples, one per line; only the first comma-separated field is read
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
    /// Sampling rate in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE_HZ)]
    fs: f32,
    /// Time this many inference calls after a short warm-up
    #[arg(long, value_name = "RUNS", default_value_t = 0)]
    benchmark: usize,
    /// Compute the spectrum with an FFT instead of the direct transform
    #[arg(long)]
    fft: bool,
    /// JSON file overriding the confidence thresholds
    #[arg(long, value_name = "JSON")]
    policy: Option<PathBuf>,
    /// Write the power spectrum to a PNG file
    #[arg(long, value_name = "PNG")]
    plot: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Write the synthetic reference CSVs into DIR and exit
    #[arg(long, value_name = "DIR")]
    generate_samples: Option<PathBuf>,
    /// Seed for --generate-samples
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    label: &'static str,
    #[serde(flatten)]
    classification: &'a Classification,
    benchmark: Option<BenchmarkReport>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print().ok();
            return ExitCode::from(code);
        }
    };

    if let Some(dir) = &cli.generate_samples {
        return match synth::write_reference_set(dir, cli.seed) {
            Ok(paths) => {
                for path in paths {
                    println!("Wrote {}", path.display());
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Error: {err}");
                ExitCode::from(1)
            }
        };
    }

    let (Some(model), Some(csv)) = (cli.model.as_deref(), cli.csv.as_deref()) else {
        eprintln!("Missing --model or --csv");
        eprintln!("{USAGE}");
        return ExitCode::from(1);
    };

    match run(&cli, model, csv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// 2 when the model's probability output is too short, 1 for anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ClassifierError>() {
        Some(ClassifierError::TooFewProbabilities { .. }) => 2,
        _ => 1,
    }
}

fn run(cli: &Cli, model: &Path, csv: &Path) -> Result<()> {
    let method = if cli.fft {
        SpectrumMethod::Fft
    } else {
        SpectrumMethod::Direct
    };
    let policy = match &cli.policy {
        Some(path) => DecisionPolicy::from_json_file(path)?,
        None => DecisionPolicy::default(),
    };

    let series = CsvSource::new(csv, cli.fs)
        .load()
        .with_context(|| format!("loading samples from {}", csv.display()))?;
    log::info!(
        "{} samples at {} Hz ({:.2} s)",
        series.len(),
        series.sample_rate_hz,
        series.duration_seconds()
    );
    let spectrum = SpectrumBuilder::with_method(method).compute(&series);
    let features = relative_band_powers(&spectrum);
    log::info!("strongest band in the spectrum: {}", features.dominant_band());
    if !cli.json {
        println!("Features (rel power): {features}");
    }

    if let Some(path) = &cli.plot {
        let png = render_spectrum_png(&spectrum, &PlotStyle::default())?;
        std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
        log::info!("spectrum plot written to {}", path.display());
    }

    let gateway = OnnxGateway::load(model)?;
    let mut pipeline = ClassificationPipeline::new(gateway)
        .with_method(method)
        .with_policy(policy);

    let result = pipeline.classify_features(features)?;
    let decision = result.decision;
    let benchmark = pipeline.benchmark(&features, cli.benchmark)?;

    if cli.json {
        let report = JsonReport {
            label: decision.predicted.label(),
            classification: &result,
            benchmark,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let probs = Band::ALL
        .iter()
        .map(|band| format!("{}={}", band, result.probabilities[band.index()]))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "Probs: {probs} -> pred={} ({})",
        decision.predicted,
        decision.class_index()
    );
    if decision.uncertain {
        println!(
            "Warning: Low confidence / mixed spectrum (top_prob={}, dominance_ratio={})",
            decision.top_probability, decision.dominance_ratio
        );
    }
    if let Some(report) = benchmark {
        println!(
            "Benchmark: avg={} ms, p95={} ms ({} runs)",
            report.mean_ms, report.p95_ms, report.runs
        );
    }
    Ok(())
}
