pub mod compare;
mod error;
pub mod frame;
pub mod harness;
pub mod line_buffer;
pub mod pipeline;
pub mod reference;
pub mod sobel;
pub mod vectors;

pub use error::{Error, Result};
pub use frame::Frame;
pub use harness::{GoldenHarness, GoldenVectors, HarnessConfig};
pub use line_buffer::{Coord, LineBuffer, PixelSample, Window};
pub use pipeline::{EdgeOutput, EdgePipeline};
pub use reference::BorderMode;

/// Read latency of a line memory, in cycles (address latch + output register).
pub const BRAM_READ_LATENCY: usize = 2;
/// Cycles from a valid input pixel to its edge output being valid: the line
/// buffer's read latency, then the Sobel and edge-magnitude registers.
pub const PIPELINE_DEPTH: usize = BRAM_READ_LATENCY + 2;
/// Smallest frame width/height that produces at least one 3x3 window.
pub const MIN_DIMENSION: u32 = 3;

/// Number of edge outputs one frame must produce: `(height-2)*(width-2)`.
pub const fn expected_output_count(width: u32, height: u32) -> usize {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return 0;
    }
    (height as usize - 2) * (width as usize - 2)
}

pub(crate) fn check_geometry(width: u32, height: u32) -> Result<()> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(Error::InvalidGeometry {
            width,
            height,
            min: MIN_DIMENSION,
        });
    }
    Ok(())
}
