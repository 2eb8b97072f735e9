//! Bit-accurate RGB565 helpers.
//!
//! These mirror the conversion logic of the hardware datapath:
//! channel expansion replicates the high bits into the low bits, the luma
//! path uses 8.8 fixed-point weights with truncation, and the edge packer
//! slices the magnitude into the three fields (which is not the inverse of
//! the unpacking path).

use crate::Color;

/// Mask for the 5-bit red/blue fields.
pub const MASK5: u16 = 0x1F;
/// Mask for the 6-bit green field.
pub const MASK6: u16 = 0x3F;

/// Expand a 5-bit channel to 8 bits by bit replication.
#[inline]
pub const fn expand5(v: u8) -> u8 {
    let v = v & MASK5 as u8;
    (v << 3) | (v >> 2)
}

/// Expand a 6-bit channel to 8 bits by bit replication.
#[inline]
pub const fn expand6(v: u8) -> u8 {
    let v = v & MASK6 as u8;
    (v << 2) | (v >> 4)
}

/// Convert a packed RGB565 pixel to 8-bit luma.
#[inline]
pub fn to_luma8(pixel: u16) -> u8 {
    Rgb565(pixel).to_rgb8().luma8()
}

/// Pack an 8-bit edge magnitude into an RGB565 display word.
///
/// R = mag[7:3], G = mag[7:2], B = mag[7:3].
#[inline]
pub const fn pack_edge(mag: u8) -> u16 {
    let r5 = (mag >> 3) as u16 & MASK5;
    let g6 = (mag >> 2) as u16 & MASK6;
    let b5 = (mag >> 3) as u16 & MASK5;
    (r5 << 11) | (g6 << 5) | b5
}

/// A packed 16-bit RGB565 word.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    /// Raw 5/6/5-bit fields as `(r5, g6, b5)`.
    #[inline]
    pub const fn channels(self) -> (u8, u8, u8) {
        let r5 = ((self.0 >> 11) & MASK5) as u8;
        let g6 = ((self.0 >> 5) & MASK6) as u8;
        let b5 = (self.0 & MASK5) as u8;
        (r5, g6, b5)
    }

    pub const fn to_rgb8(self) -> Color {
        let (r5, g6, b5) = self.channels();
        Color::new_rgb(expand5(r5), expand6(g6), expand5(b5))
    }

    /// Truncating pack of an 8-bit color (drops the low bits of each channel).
    #[cfg(test)]
    pub(crate) const fn from_rgb8(color: Color) -> Rgb565 {
        let r5 = (color.r >> 3) as u16;
        let g6 = (color.g >> 2) as u16;
        let b5 = (color.b >> 3) as u16;
        Rgb565((r5 << 11) | (g6 << 5) | b5)
    }

    #[inline]
    pub fn luma8(self) -> u8 {
        self.to_rgb8().luma8()
    }
}

impl From<u16> for Rgb565 {
    fn from(value: u16) -> Self {
        Rgb565(value)
    }
}

impl From<Rgb565> for u16 {
    fn from(value: Rgb565) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests;
