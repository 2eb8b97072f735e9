use std::path::PathBuf;

use crate::line_buffer::Coord;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid frame geometry {width}x{height}: both dimensions must be at least {min}")]
    InvalidGeometry { width: u32, height: u32, min: u32 },

    /// The pipeline model produced the wrong number of windows. This is a
    /// latency/timing defect in the model itself; no vectors may be written.
    #[error("pipeline emitted {actual} outputs, expected {expected} (timing defect)")]
    OutputCount { expected: usize, actual: usize },

    #[error("output {index} tagged {coord} breaks raster order (timing defect)")]
    OutputOrder { index: usize, coord: Coord },

    #[error("{what}: expected {expected} samples, found {actual}")]
    StreamLength {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("{}:{line}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("metadata: {0}")]
    Metadata(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise report: {0}")]
    Report(#[from] toml::ser::Error),
}

impl Error {
    /// Structural failures of the model, as opposed to bad inputs.
    pub fn is_timing_defect(&self) -> bool {
        matches!(self, Error::OutputCount { .. } | Error::OutputOrder { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
