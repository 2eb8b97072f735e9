use rand::RngCore;
use rand_mt::Mt;
use sobelsim_common::rgb565;

use crate::line_buffer::PixelSample;
use crate::{Error, Result};

/// One frame of packed RGB565 pixels in raster order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
}

impl Frame {
    /// Deterministic test frame for `seed`.
    ///
    /// The generator is MT19937 seeded by-array with the 32-bit words of the
    /// seed (least significant first); each pixel is the upper 16 bits of one
    /// 32-bit draw, which is what CPython's
    /// `random.Random(seed).getrandbits(16)` yields.
    pub fn generate(width: u32, height: u32, seed: u64) -> Result<Frame> {
        let mut rng = Mt::new_with_key(seed_key(seed));
        Self::from_rng(width, height, &mut rng)
    }

    /// Frame filled from an arbitrary generator, one 32-bit draw per pixel.
    pub fn from_rng<R: RngCore>(width: u32, height: u32, rng: &mut R) -> Result<Frame> {
        let len = pixel_count(width, height)?;
        let pixels = (0..len).map(|_| (rng.next_u32() >> 16) as u16).collect();
        Ok(Frame {
            width,
            height,
            pixels,
        })
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u16>) -> Result<Frame> {
        let len = pixel_count(width, height)?;
        if pixels.len() != len {
            return Err(Error::StreamLength {
                what: format!("{width}x{height} frame"),
                expected: len,
                actual: pixels.len(),
            });
        }
        Ok(Frame {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn luma(&self) -> Vec<u8> {
        self.pixels.iter().map(|&p| rgb565::to_luma8(p)).collect()
    }

    /// The frame as a stream of valid input cycles.
    pub fn samples(&self) -> impl Iterator<Item = PixelSample> + '_ {
        self.pixels
            .iter()
            .map(|&p| PixelSample::pixel(rgb565::to_luma8(p)))
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidGeometry {
            width,
            height,
            min: 1,
        });
    }
    Ok(width as usize * height as usize)
}

fn seed_key(seed: u64) -> Vec<u32> {
    let low = seed as u32;
    let high = (seed >> 32) as u32;
    if high == 0 {
        vec![low]
    } else {
        vec![low, high]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_frame() {
        let a = Frame::generate(16, 8, 7).unwrap();
        let b = Frame::generate(16, 8, 7).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Frame::generate(16, 8, 8).unwrap());
    }

    #[test]
    fn matches_reference_stimulus_prefix() {
        // First words of the reference generator for seed 123.
        let frame = Frame::generate(64, 48, 123).unwrap();
        assert_eq!(frame.pixels().len(), 64 * 48);
        assert_eq!(&frame.pixels()[..4], &[0x0d67, 0x4486, 0x1651, 0xc4da]);
    }

    #[test]
    fn large_seeds_use_both_words() {
        let low = Frame::generate(4, 4, 5).unwrap();
        let high = Frame::generate(4, 4, 5 | (1 << 32)).unwrap();
        assert_ne!(low, high);
        assert_eq!(seed_key(5 | (1 << 32)), vec![5, 1]);
        assert_eq!(seed_key(0), vec![0]);
    }

    #[test]
    fn from_rng_uses_one_draw_per_pixel() {
        let mut rng = StdRng::seed_from_u64(42);
        let frame = Frame::from_rng(5, 3, &mut rng).unwrap();
        assert_eq!(frame.pixels().len(), 15);
        assert_eq!(frame.samples().count(), 15);
        assert!(frame.samples().all(|s| s.valid));
    }

    #[test]
    fn from_pixels_checks_length() {
        let err = Frame::from_pixels(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::StreamLength {
                expected: 16,
                actual: 15,
                ..
            }
        ));
        assert!(Frame::from_pixels(0, 4, vec![]).is_err());
    }
}
