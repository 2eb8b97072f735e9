//! Comparison of an externally produced output stream against the model.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use sobelsim_common::rgb565;

use crate::frame::Frame;
use crate::harness::simulate_frame;
use crate::reference::{self, BorderMode};
use crate::{check_geometry, Error, Result};

const DEFAULT_FPS: f64 = 30.0;

/// Geometry of a captured stream, from a `key=value` metadata file.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameMeta {
    pub frames: u32,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl FrameMeta {
    /// Parse `key=value` lines. Blank lines, `#` comments, lines without `=`
    /// and unknown keys are ignored; `frames`, `width` and `height` are
    /// required, `fps` defaults to 30.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim(), value.trim());
            }
        }

        let missing: Vec<&str> = ["frames", "width", "height"]
            .into_iter()
            .filter(|key| !entries.contains_key(key))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Metadata(format!(
                "missing keys: {}",
                missing.join(", ")
            )));
        }

        let int = |key: &str| -> Result<u32> {
            let value = entries.get(key).copied().unwrap_or_default();
            value
                .parse()
                .map_err(|_| Error::Metadata(format!("{key}: '{value}' is not an integer")))
        };
        let fps: f64 = match entries.get("fps") {
            Some(value) => value
                .parse()
                .map_err(|_| Error::Metadata(format!("fps: '{value}' is not a number")))?,
            None => DEFAULT_FPS,
        };
        let meta = FrameMeta {
            frames: int("frames")?,
            width: int("width")?,
            height: int("height")?,
            fps,
        };
        if meta.frames == 0 {
            return Err(Error::Metadata("frames must be at least 1".to_string()));
        }
        check_geometry(meta.width, meta.height)?;
        Ok(meta)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::parse(&text)
    }

    /// Metadata for a single generated frame.
    pub fn single(width: u32, height: u32) -> Self {
        FrameMeta {
            frames: 1,
            width,
            height,
            fps: DEFAULT_FPS,
        }
    }

    #[inline]
    pub fn pixels_per_frame(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Sample-level agreement between an expected and an actual stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub total_samples: usize,
    pub mismatches: usize,
    pub mismatch_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_mismatch: Option<usize>,
    pub max_abs_diff: u8,
    pub mean_abs_diff: f64,
    /// `None` when the streams decode identically (infinite PSNR).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psnr_db: Option<f64>,
    /// Mismatching samples equal to the expected sample one position
    /// earlier (output late by one).
    pub late_by_one: usize,
    /// Same, two positions earlier.
    pub late_by_two: usize,
    pub passed: bool,
}

/// Compare two streams of packed output words.
///
/// Exact mismatches are counted on the words; difference statistics and
/// PSNR are computed on magnitudes decoded from both streams through the
/// same luma path. Distinct words can decode to the same luma, so a failing
/// stream may still report a zero maximum difference and infinite PSNR.
pub fn compare_streams(expected: &[u16], actual: &[u16]) -> Result<Comparison> {
    if expected.len() != actual.len() {
        return Err(Error::StreamLength {
            what: "actual output stream".to_string(),
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    let total_samples = expected.len();
    let mut mismatches = 0;
    let mut first_mismatch = None;
    let mut late_by_one = 0;
    let mut late_by_two = 0;
    let mut max_abs_diff = 0u8;
    let mut abs_sum = 0u64;
    let mut sq_sum = 0u64;

    for (i, (&exp, &act)) in expected.iter().zip(actual).enumerate() {
        if exp != act {
            mismatches += 1;
            if first_mismatch.is_none() {
                first_mismatch = Some(i);
            }
            if i >= 1 && act == expected[i - 1] {
                late_by_one += 1;
            }
            if i >= 2 && act == expected[i - 2] {
                late_by_two += 1;
            }
        }
        let diff = rgb565::to_luma8(exp).abs_diff(rgb565::to_luma8(act));
        max_abs_diff = max_abs_diff.max(diff);
        abs_sum += diff as u64;
        sq_sum += diff as u64 * diff as u64;
    }

    let (mismatch_rate, mean_abs_diff, psnr_db) = if total_samples == 0 {
        (0.0, 0.0, None)
    } else {
        let n = total_samples as f64;
        let mse = sq_sum as f64 / n;
        let psnr = (mse > 0.0).then(|| 10.0 * (255.0f64 * 255.0 / mse).log10());
        (mismatches as f64 / n, abs_sum as f64 / n, psnr)
    };

    Ok(Comparison {
        total_samples,
        mismatches,
        mismatch_rate,
        first_mismatch,
        max_abs_diff,
        mean_abs_diff,
        psnr_db,
        late_by_one,
        late_by_two,
        passed: mismatches == 0,
    })
}

/// Report of a multi-frame comparison run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub frames: u32,
    pub width: u32,
    pub height: u32,
    pub valid_width: u32,
    pub valid_height: u32,
    pub border: String,
    pub total_samples: usize,
    pub mismatches: usize,
    pub mismatch_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_mismatch: Option<usize>,
    pub max_abs_diff: u8,
    pub mean_abs_diff: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psnr_db: Option<f64>,
    pub late_by_one: usize,
    pub late_by_two: usize,
    pub passed: bool,
}

impl ComparisonReport {
    pub fn new(meta: &FrameMeta, border: BorderMode, comparison: Comparison) -> Self {
        let (valid_width, valid_height) = border.valid_size(meta.width, meta.height);
        ComparisonReport {
            frames: meta.frames,
            width: meta.width,
            height: meta.height,
            valid_width,
            valid_height,
            border: border.to_string(),
            total_samples: comparison.total_samples,
            mismatches: comparison.mismatches,
            mismatch_rate: comparison.mismatch_rate,
            first_mismatch: comparison.first_mismatch,
            max_abs_diff: comparison.max_abs_diff,
            mean_abs_diff: comparison.mean_abs_diff,
            psnr_db: comparison.psnr_db,
            late_by_one: comparison.late_by_one,
            late_by_two: comparison.late_by_two,
            passed: comparison.passed,
        }
    }

    /// Human-readable summary, one metric per line.
    pub fn summary(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "=== Sobel Output Comparison ===");
        let _ = writeln!(text, "Frames           : {}", self.frames);
        let _ = writeln!(
            text,
            "Frame size       : {}x{} (valid region {}x{}, border {})",
            self.width, self.height, self.valid_width, self.valid_height, self.border
        );
        let _ = writeln!(text, "Samples compared : {}", self.total_samples);
        let _ = writeln!(
            text,
            "Mismatches       : {} ({:.6}%)",
            self.mismatches,
            self.mismatch_rate * 100.0
        );
        if let Some(index) = self.first_mismatch {
            let _ = writeln!(text, "First mismatch   : sample {index}");
            let _ = writeln!(
                text,
                "Late by 1 / 2    : {} / {}",
                self.late_by_one, self.late_by_two
            );
        }
        let _ = writeln!(text, "Max |diff|       : {}", self.max_abs_diff);
        let _ = writeln!(text, "Mean |diff|      : {:.4}", self.mean_abs_diff);
        match self.psnr_db {
            Some(psnr) => {
                let _ = writeln!(text, "PSNR             : {psnr:.2} dB");
            }
            None => {
                let _ = writeln!(text, "PSNR             : inf");
            }
        }
        if !self.passed && self.psnr_db.is_none() {
            let _ = writeln!(text, "Note: mismatching words decode to equal luma, PSNR reads inf");
        }
        let status = if self.passed { "PASS" } else { "FAIL" };
        let _ = write!(text, "Status: {status}");
        text
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }
        std::fs::write(path, self.to_toml()?).map_err(|err| Error::io(path, err))
    }
}

/// Expected output words for every frame of `input`.
///
/// [`BorderMode::Exclude`] runs each frame through a fresh cycle model;
/// [`BorderMode::Wrap`] uses the frame reference, since the streaming model
/// has no wrap-around mode.
pub fn expected_stream(input: &[u16], meta: &FrameMeta, border: BorderMode) -> Result<Vec<u16>> {
    let per_frame = meta.pixels_per_frame();
    let total = per_frame * meta.frames as usize;
    if input.len() != total {
        return Err(Error::StreamLength {
            what: format!(
                "input stream ({} frames of {}x{})",
                meta.frames, meta.width, meta.height
            ),
            expected: total,
            actual: input.len(),
        });
    }

    let capacity = border.sample_count(meta.width, meta.height) * meta.frames as usize;
    let mut expected = Vec::with_capacity(capacity);
    for (index, pixels) in input.chunks_exact(per_frame).enumerate() {
        let frame = Frame::from_pixels(meta.width, meta.height, pixels.to_vec())?;
        match border {
            BorderMode::Exclude => {
                let outputs = simulate_frame(&frame, false)?;
                expected.extend(outputs.iter().map(|out| out.word));
            }
            BorderMode::Wrap => {
                let words =
                    reference::sobel_frame_words(&frame.luma(), meta.width, meta.height, border)?;
                expected.extend(words);
            }
        }
        log::debug!("frame {}: {} expected samples so far", index, expected.len());
    }
    Ok(expected)
}

/// Recompute the expected stream from `input` and compare `actual` to it.
pub fn compare_video(
    input: &[u16],
    actual: &[u16],
    meta: &FrameMeta,
    border: BorderMode,
) -> Result<ComparisonReport> {
    let expected = expected_stream(input, meta, border)?;
    let comparison = compare_streams(&expected, actual)?;
    if let Some(index) = comparison.first_mismatch {
        log::warn!(
            "first mismatch at sample {}: expected {:04x}, got {:04x}",
            index,
            expected[index],
            actual[index]
        );
    }
    Ok(ComparisonReport::new(meta, border, comparison))
}

#[cfg(test)]
mod tests;
