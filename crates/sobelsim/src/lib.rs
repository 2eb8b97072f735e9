use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sobelsim_pipeline::compare::{self, ComparisonReport, FrameMeta};
use sobelsim_pipeline::harness::GoldenPaths;
use sobelsim_pipeline::{expected_output_count, vectors, BorderMode, GoldenHarness, HarnessConfig};

/// Directory the HDL testbench loads its vectors from.
pub const DEFAULT_GOLDEN_DIR: &str = "sim/golden";

/// Inputs of a captured-stream comparison.
#[derive(Clone, Debug)]
pub struct CompareJob {
    /// RGB565 input stream (hex `.mem` or raw little-endian).
    pub input: PathBuf,
    /// Output stream produced by the hardware simulation.
    pub output: PathBuf,
    /// `key=value` metadata describing the input stream.
    pub meta: PathBuf,
    pub border: BorderMode,
    /// Where to write the TOML report, if anywhere.
    pub report: Option<PathBuf>,
}

pub fn run_generate(config: HarnessConfig, out_dir: &Path) -> Result<GoldenPaths> {
    let harness = GoldenHarness::new(config);
    let golden = harness.generate().with_context(|| {
        let config = harness.config();
        format!(
            "failed to generate vectors for {}x{} seed {}",
            config.width, config.height, config.seed
        )
    })?;
    let paths = golden
        .write_to(out_dir)
        .with_context(|| format!("failed to write vectors to '{}'", out_dir.display()))?;
    Ok(paths)
}

pub fn run_compare(job: &CompareJob) -> Result<ComparisonReport> {
    let meta = FrameMeta::load(&job.meta)
        .with_context(|| format!("failed to load metadata '{}'", job.meta.display()))?;
    let input = read_stream(&job.input, "input")?;
    let actual = read_stream(&job.output, "output")?;
    log::info!(
        "comparing {} frame(s) of {}x{} ({} border): {} input pixels, {} output samples",
        meta.frames,
        meta.width,
        meta.height,
        job.border,
        input.len(),
        actual.len()
    );

    let report = compare::compare_video(&input, &actual, &meta, job.border)
        .context("output stream does not fit the metadata")?;
    if let Some(path) = &job.report {
        report
            .write(path)
            .with_context(|| format!("failed to write report '{}'", path.display()))?;
        log::info!("report written to {}", path.display());
    }
    Ok(report)
}

/// Compare a single-frame simulation output against an expected vector file.
pub fn run_check(
    actual: &Path,
    expected: &Path,
    width: u32,
    height: u32,
) -> Result<ComparisonReport> {
    let expected_words = read_stream(expected, "expected")?;
    let actual_words = read_stream(actual, "actual")?;

    let count = expected_output_count(width, height);
    if expected_words.len() != count {
        log::warn!(
            "{} holds {} samples but a {}x{} frame produces {}",
            expected.display(),
            expected_words.len(),
            width,
            height,
            count
        );
    }

    let comparison = compare::compare_streams(&expected_words, &actual_words)
        .context("actual output has the wrong number of samples")?;
    Ok(ComparisonReport::new(
        &FrameMeta::single(width, height),
        BorderMode::Exclude,
        comparison,
    ))
}

fn read_stream(path: &Path, what: &str) -> Result<Vec<u16>> {
    vectors::read_stream(path)
        .with_context(|| format!("failed to read {what} stream '{}'", path.display()))
}
