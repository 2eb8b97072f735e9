//! Whole-frame Sobel reference.
//!
//! Computes the same magnitudes as the streaming pipeline directly from a
//! buffered frame, with no timing. Used to cross-check the cycle model and
//! to score captures from a datapath whose right-hand neighbour wraps
//! around to column 0.

use std::fmt;

use sobelsim_common::rgb565;

use crate::line_buffer::Window;
use crate::{check_geometry, sobel, Error, Result};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BorderMode {
    /// Windows are not emitted where any neighbour falls outside the frame.
    /// This is what the streaming pipeline produces.
    #[default]
    Exclude,
    /// Centres run over columns `1..width`; the right neighbour of the last
    /// column is column 0.
    Wrap,
}

impl BorderMode {
    /// `(valid_width, valid_height)` of the output region.
    pub const fn valid_size(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            BorderMode::Exclude => (width.saturating_sub(2), height.saturating_sub(2)),
            BorderMode::Wrap => (width.saturating_sub(1), height.saturating_sub(2)),
        }
    }

    pub const fn sample_count(self, width: u32, height: u32) -> usize {
        let (w, h) = self.valid_size(width, height);
        w as usize * h as usize
    }
}

impl fmt::Display for BorderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorderMode::Exclude => f.write_str("exclude"),
            BorderMode::Wrap => f.write_str("wrap"),
        }
    }
}

/// Window centred on frame pixel `(row, col)`. The right neighbour wraps
/// modulo `width`; callers keep `col` in range for the mode they model.
pub fn window_at(luma: &[u8], width: u32, row: u32, col: u32) -> Window {
    let stride = width as usize;
    let at = |r: u32, c: u32| luma[r as usize * stride + c as usize];
    let (left, right) = (col - 1, (col + 1) % width);
    let row_of = |r: u32| [at(r, left), at(r, col), at(r, right)];
    Window::from_rows(row_of(row - 1), row_of(row), row_of(row + 1))
}

/// Edge magnitudes of a luma frame in raster order.
pub fn sobel_frame(luma: &[u8], width: u32, height: u32, mode: BorderMode) -> Result<Vec<u8>> {
    check_geometry(width, height)?;
    let len = width as usize * height as usize;
    if luma.len() != len {
        return Err(Error::StreamLength {
            what: format!("{width}x{height} luma frame"),
            expected: len,
            actual: luma.len(),
        });
    }

    let col_end = match mode {
        BorderMode::Exclude => width - 1,
        BorderMode::Wrap => width,
    };
    let mut out = Vec::with_capacity(mode.sample_count(width, height));
    for row in 1..height - 1 {
        for col in 1..col_end {
            out.push(sobel::magnitude(&window_at(luma, width, row, col)));
        }
    }
    Ok(out)
}

/// [`sobel_frame`] packed into output words.
pub fn sobel_frame_words(
    luma: &[u8],
    width: u32,
    height: u32,
    mode: BorderMode,
) -> Result<Vec<u16>> {
    Ok(sobel_frame(luma, width, height, mode)?
        .into_iter()
        .map(rgb565::pack_edge)
        .collect())
}
