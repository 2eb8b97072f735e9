//! Sobel gradient and L1 edge magnitude, matching the hardware datapath.

use crate::line_buffer::{Coord, Window};

/// Right shift applied to `|gx| + |gy|` before saturation.
pub const MAGNITUDE_SHIFT: u32 = 3;
/// Largest possible `|gx|` or `|gy|` for 8-bit inputs (255 * 4).
pub const GRADIENT_BOUND: i16 = 1020;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Gradient {
    pub gx: i16,
    pub gy: i16,
}

impl Gradient {
    /// `min((|gx| + |gy|) >> 3, 255)`.
    pub fn magnitude(&self) -> u8 {
        let sum = self.gx.unsigned_abs() as u32 + self.gy.unsigned_abs() as u32;
        (sum >> MAGNITUDE_SHIFT).min(0xFF) as u8
    }
}

/// Combinational Sobel over the window cells `p0..p8` (row-major).
pub fn gradient(window: &Window) -> Gradient {
    let p = window.cells().map(i16::from);
    let gx = -p[0] + p[2] - 2 * p[3] + 2 * p[5] - p[6] + p[8];
    let gy = -p[0] - 2 * p[1] - p[2] + p[6] + 2 * p[7] + p[8];
    Gradient { gx, gy }
}

#[inline]
pub fn magnitude(window: &Window) -> u8 {
    gradient(window).magnitude()
}

/// Sobel kernel register: the gradient of a valid window, one cycle after
/// window-valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SobelSample {
    pub coord: Coord,
    pub gradient: Gradient,
}

/// Edge-magnitude register, one cycle after the Sobel register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeSample {
    pub coord: Coord,
    pub magnitude: u8,
}

impl From<SobelSample> for EdgeSample {
    fn from(sample: SobelSample) -> Self {
        EdgeSample {
            coord: sample.coord,
            magnitude: sample.gradient.magnitude(),
        }
    }
}
