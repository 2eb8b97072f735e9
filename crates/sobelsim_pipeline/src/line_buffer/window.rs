use std::fmt;

/// The 3x3 neighbourhood held in the window shift registers.
///
/// Column 2 is the newest column. `top` comes from the two-rows-back line
/// memory, `mid` from the one-row-back memory and `bot` from the delayed
/// input pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub top: [u8; 3],
    pub mid: [u8; 3],
    pub bot: [u8; 3],
}

impl Window {
    pub const ZERO: Window = Window {
        top: [0; 3],
        mid: [0; 3],
        bot: [0; 3],
    };

    pub const fn from_rows(top: [u8; 3], mid: [u8; 3], bot: [u8; 3]) -> Self {
        Self { top, mid, bot }
    }

    /// Drop the oldest column and append a new one.
    #[inline]
    pub fn shifted(&self, top: u8, mid: u8, bot: u8) -> Window {
        Window {
            top: [self.top[1], self.top[2], top],
            mid: [self.mid[1], self.mid[2], mid],
            bot: [self.bot[1], self.bot[2], bot],
        }
    }

    /// Cells `p0..p8` in row-major order.
    pub fn cells(&self) -> [u8; 9] {
        let Window { top, mid, bot } = *self;
        [
            top[0], top[1], top[2], mid[0], mid[1], mid[2], bot[0], bot[1], bot[2],
        ]
    }
}

/// Position tag of a window at the moment it became valid.
///
/// `row` is the scanline counter, which counts from 1 (the first scanline of
/// a frame is row 1); `col` is the 0-based column address. Together they
/// name the newest pixel of the window, i.e. frame pixel `(row - 1, col)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// 0-based frame row of the newest (bottom) pixel.
    #[inline]
    pub const fn frame_row(&self) -> u32 {
        self.row.saturating_sub(1)
    }

    /// 0-based frame `(row, col)` of the window centre.
    #[inline]
    pub const fn center(&self) -> (u32, u32) {
        (self.row.saturating_sub(2), self.col.saturating_sub(1))
    }

    /// The tag that follows this one in raster order for a frame `width`
    /// pixels wide.
    pub fn next_in_raster(&self, width: u32) -> Coord {
        if self.col + 1 >= width {
            Coord::new(self.row + 1, super::FIRST_VALID_COL)
        } else {
            Coord::new(self.row, self.col + 1)
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, col {})", self.row, self.col)
    }
}
