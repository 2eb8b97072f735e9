//! Drives one frame through the pipeline and produces golden vectors.

use std::path::{Path, PathBuf};

use typed_builder::TypedBuilder;

use crate::frame::Frame;
use crate::line_buffer::{Coord, PixelSample, FIRST_VALID_COL, FIRST_VALID_ROW};
use crate::pipeline::{EdgeOutput, EdgePipeline};
use crate::{check_geometry, expected_output_count, vectors, Error, Result, PIPELINE_DEPTH};

/// Environment variable that enables per-window coordinate tracing.
pub const TRACE_WINDOWS_ENV: &str = "SOBELSIM_TRACE_WINDOWS";
/// Stimulus file name inside the golden directory.
pub const INPUT_FILE: &str = "input_rgb565.mem";
/// The same stimulus as a raw little-endian stream, for the video testbench.
pub const INPUT_RAW_FILE: &str = "input_rgb565.rgb";
/// Expected-output file name inside the golden directory.
pub const EXPECTED_FILE: &str = "expected_output.mem";

/// Whether [`TRACE_WINDOWS_ENV`] is set to a truthy value.
pub fn trace_windows_from_env() -> bool {
    std::env::var(TRACE_WINDOWS_ENV)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct HarnessConfig {
    #[builder(default = 64)]
    pub width: u32,
    #[builder(default = 48)]
    pub height: u32,
    #[builder(default = 123)]
    pub seed: u64,
    #[builder(default = trace_windows_from_env())]
    pub trace_windows: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig::builder().build()
    }
}

/// Input stimulus and expected output for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoldenVectors {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub input: Vec<u16>,
    pub expected: Vec<u16>,
    /// Window tag of each expected word, same order.
    pub coords: Vec<Coord>,
}

/// Paths written by [`GoldenVectors::write_to`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoldenPaths {
    pub input: PathBuf,
    pub input_raw: PathBuf,
    pub expected: PathBuf,
}

impl GoldenVectors {
    pub fn write_to(&self, dir: &Path) -> Result<GoldenPaths> {
        std::fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;
        let paths = GoldenPaths {
            input: dir.join(INPUT_FILE),
            input_raw: dir.join(INPUT_RAW_FILE),
            expected: dir.join(EXPECTED_FILE),
        };
        vectors::write_hex(&paths.input, &self.input)?;
        vectors::write_raw_le(&paths.input_raw, &self.input)?;
        vectors::write_hex(&paths.expected, &self.expected)?;
        log::info!(
            "wrote {} input pixels to {} and {}",
            self.input.len(),
            paths.input.display(),
            paths.input_raw.display()
        );
        log::info!(
            "wrote {} expected outputs to {}",
            self.expected.len(),
            paths.expected.display()
        );
        Ok(paths)
    }
}

pub struct GoldenHarness {
    config: HarnessConfig,
}

impl GoldenHarness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Generate the frame for the configured seed and simulate it.
    ///
    /// Fails without producing vectors if the pipeline does not emit exactly
    /// `(height-2)*(width-2)` outputs in raster order.
    pub fn generate(&self) -> Result<GoldenVectors> {
        let HarnessConfig {
            width,
            height,
            seed,
            trace_windows,
        } = self.config;
        check_geometry(width, height)?;

        let frame = Frame::generate(width, height, seed)?;
        let outputs = simulate_frame(&frame, trace_windows)?;
        log::info!(
            "{}x{} seed {}: {} outputs",
            width,
            height,
            seed,
            outputs.len()
        );

        Ok(GoldenVectors {
            width,
            height,
            seed,
            input: frame.pixels().to_vec(),
            expected: outputs.iter().map(|out| out.word).collect(),
            coords: outputs.iter().map(|out| out.coord).collect(),
        })
    }
}

/// Run one frame through a fresh pipeline: one valid pixel per cycle, then
/// exactly [`PIPELINE_DEPTH`] drain cycles.
pub fn simulate_frame(frame: &Frame, trace_windows: bool) -> Result<Vec<EdgeOutput>> {
    check_geometry(frame.width(), frame.height())?;
    let mut pipeline = EdgePipeline::new(frame.width())?.with_trace_windows(trace_windows);
    let drain = std::iter::repeat(PixelSample::IDLE).take(PIPELINE_DEPTH);
    let outputs: Vec<EdgeOutput> = frame
        .samples()
        .chain(drain)
        .filter_map(|sample| pipeline.step(sample))
        .collect();

    let expected = expected_output_count(frame.width(), frame.height());
    if outputs.len() != expected {
        log::error!(
            "output count mismatch: got {}, expected {}",
            outputs.len(),
            expected
        );
        return Err(Error::OutputCount {
            expected,
            actual: outputs.len(),
        });
    }
    check_raster_order(&outputs, frame.width())?;
    Ok(outputs)
}

fn check_raster_order(outputs: &[EdgeOutput], width: u32) -> Result<()> {
    let mut next = Coord::new(FIRST_VALID_ROW, FIRST_VALID_COL);
    for (index, out) in outputs.iter().enumerate() {
        if out.coord != next {
            return Err(Error::OutputOrder {
                index,
                coord: out.coord,
            });
        }
        next = out.coord.next_in_raster(width);
    }
    Ok(())
}
