//! Error-recovery policy and per-decode diagnostics.

/// How a decoder reacts to a malformed scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorPolicy {
    /// Abort the image and surface the error.
    #[default]
    Strict,
    /// Abandon the scanline (left white), count it, and resume at the next
    /// recoverable line boundary.
    Tolerant,
}

impl ErrorPolicy {
    /// Whether malformed lines are skipped instead of aborting.
    pub fn is_tolerant(self) -> bool {
        self == Self::Tolerant
    }
}

/// Why decoding stopped before the requested number of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// Group 4 end-of-facsimile-block (two EOLs).
    EndOfBlock,
    /// Group 3 return-to-control (consecutive EOLs).
    ReturnToControl,
    /// The input ran out at a line boundary.
    Exhausted,
    /// A tolerant decode failed where no line boundary can be found again.
    Unrecoverable,
}

/// Diagnostics collected during one decode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeReport {
    /// Rows successfully decoded.
    pub rows_decoded: usize,
    /// Indices of rows abandoned under [`ErrorPolicy::Tolerant`].
    pub failed_rows: Vec<usize>,
    /// Set when decoding ended before every requested row was produced.
    pub stopped: Option<StopReason>,
}

impl DecodeReport {
    /// Number of abandoned rows.
    pub fn failure_count(&self) -> usize {
        self.failed_rows.len()
    }

    /// Whether the caller should retry with another strip-reading strategy.
    pub fn needs_fallback(&self) -> bool {
        self.stopped == Some(StopReason::Unrecoverable)
    }

    /// Fold the report of a following strip into this one.
    ///
    /// `row_offset` is the image row of the strip's first row.
    pub fn merge(&mut self, other: DecodeReport, row_offset: usize) {
        self.rows_decoded += other.rows_decoded;
        self.failed_rows
            .extend(other.failed_rows.into_iter().map(|row| row + row_offset));
        if other.stopped.is_some() {
            self.stopped = other.stopped;
        }
    }
}
