pub mod rgb565;

pub use rgb565::Rgb565;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);
    pub const RED: Color = Color::new_rgb(255, 0, 0);
    pub const GREEN: Color = Color::new_rgb(0, 255, 0);
    pub const BLUE: Color = Color::new_rgb(0, 0, 255);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Luma of an 8-bit-per-channel color with the pipeline's fixed-point
    /// weights: `(77*R + 151*G + 28*B) >> 8`, truncated.
    pub fn luma8(&self) -> u8 {
        let weighted = 77 * self.r as u32 + 151 * self.g as u32 + 28 * self.b as u32;
        let luma = weighted >> 8;
        if luma > 0xFF {
            // The weights sum to 256 so this cannot trigger for 8-bit input.
            log::warn!("luma {} out of range for {:?}, clamping", luma, self);
            return 0xFF;
        }
        luma as u8
    }
}
