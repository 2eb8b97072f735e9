use sobelsim_common::rgb565;

use crate::line_buffer::{Coord, LineBuffer, LineBufferUpdate, PixelSample, Window};
use crate::sobel::{self, EdgeSample, SobelSample};
use crate::Result;

/// One packed output word with the tag of the window that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeOutput {
    pub coord: Coord,
    pub magnitude: u8,
    pub word: u16,
}

impl From<EdgeSample> for EdgeOutput {
    fn from(sample: EdgeSample) -> Self {
        EdgeOutput {
            coord: sample.coord,
            magnitude: sample.magnitude,
            word: rgb565::pack_edge(sample.magnitude),
        }
    }
}

/// Line buffer -> Sobel kernel -> edge magnitude, clocked as one unit.
///
/// Registers and their timing for a pixel accepted on cycle `k`:
/// - `k+2`: window shifts, window-valid evaluated (line buffer `d2`)
/// - `k+3`: Sobel register holds the gradient
/// - `k+4`: edge register holds the magnitude; [`EdgePipeline::step`]
///   returns it as that cycle's output
///
/// Window tags travel with the data through the Sobel and edge registers,
/// so they are consumed in the order the windows became valid.
pub struct EdgePipeline {
    line_buffer: LineBuffer,
    sobel: Option<SobelSample>,
    edge: Option<EdgeSample>,
    cycle: u64,
    trace_windows: bool,
}

struct Staged {
    line_buffer: LineBufferUpdate,
    sobel: Option<SobelSample>,
    edge: Option<EdgeSample>,
}

impl EdgePipeline {
    pub fn new(width: u32) -> Result<Self> {
        Ok(Self {
            line_buffer: LineBuffer::new(width)?,
            sobel: None,
            edge: None,
            cycle: 0,
            trace_windows: false,
        })
    }

    /// Log the tag of every emitted output at debug level.
    pub fn with_trace_windows(mut self, enabled: bool) -> Self {
        self.trace_windows = enabled;
        self
    }

    /// Advance one clock cycle and return the output that is valid during
    /// it, if any.
    pub fn step(&mut self, sample: PixelSample) -> Option<EdgeOutput> {
        let output = self.edge.map(EdgeOutput::from);
        let staged = self.stage(sample);
        self.commit(staged);

        if let Some(out) = &output {
            if self.trace_windows {
                log::debug!(
                    "cycle {}: window {} -> mag {} word {:04x}",
                    self.cycle,
                    out.coord,
                    out.magnitude,
                    out.word
                );
            }
        }
        self.cycle += 1;
        output
    }

    fn stage(&self, sample: PixelSample) -> Staged {
        let line_buffer = self.line_buffer.stage(sample);
        let sobel = line_buffer.window_valid().map(|coord| SobelSample {
            coord,
            gradient: sobel::gradient(line_buffer.window()),
        });
        let edge = self.sobel.map(EdgeSample::from);
        Staged {
            line_buffer,
            sobel,
            edge,
        }
    }

    fn commit(&mut self, staged: Staged) {
        log::trace!(
            "cycle {}: d1={:?} d2={:?} sobel={:?} edge={:?}",
            self.cycle,
            self.line_buffer.d1(),
            self.line_buffer.d2(),
            self.sobel,
            self.edge
        );
        self.line_buffer.commit(staged.line_buffer);
        self.sobel = staged.sobel;
        self.edge = staged.edge;
    }

    /// Cycles stepped so far.
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[inline]
    pub fn line_buffer(&self) -> &LineBuffer {
        &self.line_buffer
    }

    #[inline]
    pub fn window(&self) -> &Window {
        self.line_buffer.window()
    }

    /// No sample is in flight anywhere in the pipeline.
    pub fn is_drained(&self) -> bool {
        let lb = &self.line_buffer;
        self.sobel.is_none() && self.edge.is_none() && !lb.d1().valid && !lb.d2().valid
    }
}
