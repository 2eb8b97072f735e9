//! Three-scanline buffer that turns a raster stream of luma samples into a
//! sliding 3x3 window.
//!
//! Timing follows the synchronous hardware it models. On every valid cycle
//! the column address is presented to the three line memories, which
//! cascade their contents (`line2 <- line1 <- line0 <- luma`). The memory
//! read ports answer two cycles later, so the address/valid/pixel metadata
//! is carried through two delay taps (`d1`, `d2`) and the window only ever
//! consumes read data together with the `d2` tap that belongs to it.
//!
//! Each cycle is evaluated in two phases: [`LineBuffer::stage`] computes every
//! next-state value from `&self`, and [`LineBuffer::commit`] applies them.
//! No next-state field can observe another field's new value.
mod memory;
mod window;

pub use memory::{LineMemory, MemoryUpdate, ReadPort};
pub use window::{Coord, Window};

use crate::{check_geometry, Result, MIN_DIMENSION};

/// Smallest scanline counter value for which a window is emitted.
pub const FIRST_VALID_ROW: u32 = 3;
/// Smallest column address for which a window is emitted.
pub const FIRST_VALID_COL: u32 = 2;

const LINE0: usize = 0;
const LINE1: usize = 1;
const LINE2: usize = 2;

/// Valid cycles that must elapse before line history is real: two full
/// scanlines plus the first sample of the third.
#[inline]
pub const fn warmup_cycles(width: u32) -> u64 {
    2 * width as u64 + 1
}

/// One input cycle: a luma sample and its valid strobe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelSample {
    pub valid: bool,
    pub luma: u8,
}

impl PixelSample {
    /// A drain/idle cycle.
    pub const IDLE: PixelSample = PixelSample {
        valid: false,
        luma: 0,
    };

    pub const fn pixel(luma: u8) -> Self {
        Self { valid: true, luma }
    }
}

/// Metadata delay tap. `dN` holds what the undelayed signals held N cycles
/// earlier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tap {
    pub valid: bool,
    pub col: u32,
    pub row: u32,
    pub pixel: u8,
    /// Sample was accepted while the buffer was still warming up.
    pub warm_up: bool,
}

pub struct LineBuffer {
    width: u32,
    warmup_cycles: u64,
    lines: [LineMemory; 3],
    /// Column address of the next valid sample.
    col: u32,
    /// Scanline counter, starting at 1 and incremented on column wrap.
    row: u32,
    /// Valid cycles consumed so far, saturating at `warmup_cycles`.
    consumed: u64,
    warming_up: bool,
    d1: Tap,
    d2: Tap,
    window: Window,
}

/// Staged next state of a [`LineBuffer`] for one cycle.
#[derive(Clone, Debug)]
pub struct LineBufferUpdate {
    lines: [MemoryUpdate; 3],
    col: u32,
    row: u32,
    consumed: u64,
    warming_up: bool,
    d1: Tap,
    d2: Tap,
    window: Window,
    window_valid: Option<Coord>,
}

impl LineBufferUpdate {
    /// Window contents after this cycle's shift.
    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Tag of the window if it is fully populated with real data this cycle.
    #[inline]
    pub fn window_valid(&self) -> Option<Coord> {
        self.window_valid
    }
}

impl LineBuffer {
    pub fn new(width: u32) -> Result<Self> {
        check_geometry(width, MIN_DIMENSION)?;
        let cells = width as usize;
        Ok(Self {
            width,
            warmup_cycles: warmup_cycles(width),
            lines: [
                LineMemory::new(cells),
                LineMemory::new(cells),
                LineMemory::new(cells),
            ],
            col: 0,
            row: 1,
            consumed: 0,
            warming_up: true,
            d1: Tap::default(),
            d2: Tap::default(),
            window: Window::ZERO,
        })
    }

    pub fn stage(&self, sample: PixelSample) -> LineBufferUpdate {
        // Address bookkeeping and warm-up tracking. A valid cycle counts as
        // elapsed once its sample is consumed.
        let (consumed, warm_up) = if sample.valid {
            let consumed = self.consumed.saturating_add(1).min(self.warmup_cycles);
            (consumed, self.warming_up && consumed < self.warmup_cycles)
        } else {
            (self.consumed, self.warming_up)
        };
        let input = Tap {
            valid: sample.valid,
            col: self.col,
            row: self.row,
            pixel: if sample.valid { sample.luma } else { 0 },
            warm_up,
        };
        let (col, row) = match (sample.valid, self.col + 1 == self.width) {
            (false, _) => (self.col, self.row),
            (true, false) => (self.col + 1, self.row),
            (true, true) => (0, self.row.saturating_add(1)),
        };

        // Cascade write. Line1 has no real source until line0 holds a full
        // previous scanline; line2 has none until warm-up ends.
        let writes = if sample.valid {
            let addr = self.col;
            let line1_data = if self.consumed >= u64::from(self.width) {
                self.lines[LINE0].cell(addr)
            } else {
                0
            };
            let line2_data = if warm_up {
                0
            } else {
                self.lines[LINE1].cell(addr)
            };
            [
                Some((addr, sample.luma)),
                Some((addr, line1_data)),
                Some((addr, line2_data)),
            ]
        } else {
            [None; 3]
        };
        let read_addr = sample.valid.then_some(self.col);
        let lines: [MemoryUpdate; 3] =
            std::array::from_fn(|i| self.lines[i].stage(read_addr, writes[i]));

        // Window shift on the d2 pulse. The read ports' registered outputs
        // belong to the sample now in d2.
        let d2 = self.d2;
        let mut window = self.window;
        let mut window_valid = None;
        if d2.valid {
            window = if d2.warm_up {
                self.window.shifted(0, 0, 0)
            } else {
                self.window
                    .shifted(self.lines[LINE2].q(), self.lines[LINE1].q(), d2.pixel)
            };
            if !d2.warm_up && d2.row >= FIRST_VALID_ROW && d2.col >= FIRST_VALID_COL {
                window_valid = Some(Coord::new(d2.row, d2.col));
            }
        }

        LineBufferUpdate {
            lines,
            col,
            row,
            consumed,
            warming_up: warm_up,
            d1: input,
            d2: self.d1,
            window,
            window_valid,
        }
    }

    pub fn commit(&mut self, update: LineBufferUpdate) {
        if self.warming_up && !update.warming_up {
            log::debug!(
                "line buffer warm-up complete after {} valid cycles",
                update.consumed
            );
        }
        for (line, line_update) in self.lines.iter_mut().zip(update.lines) {
            line.commit(line_update);
        }
        self.col = update.col;
        self.row = update.row;
        self.consumed = update.consumed;
        self.warming_up = update.warming_up;
        self.d1 = update.d1;
        self.d2 = update.d2;
        self.window = update.window;
    }

    /// Advance one cycle and return the tag of the window if it became valid.
    pub fn step(&mut self, sample: PixelSample) -> Option<Coord> {
        let update = self.stage(sample);
        let valid = update.window_valid;
        self.commit(update);
        valid
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    #[inline]
    pub fn warming_up(&self) -> bool {
        self.warming_up
    }

    #[inline]
    pub fn d1(&self) -> Tap {
        self.d1
    }

    #[inline]
    pub fn d2(&self) -> Tap {
        self.d2
    }

    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Line memory `index` (0 = current row, 1 = one back, 2 = two back).
    pub fn line(&self, index: usize) -> &LineMemory {
        &self.lines[index]
    }

    #[cfg(test)]
    pub(crate) fn line_mut(&mut self, index: usize) -> &mut LineMemory {
        &mut self.lines[index]
    }
}
