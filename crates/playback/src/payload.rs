//! In-memory audio payload.
//!
//! The firmware plays one fixed table linked into flash. The table starts
//! with a file header that the codec must not see; `AudioPayload` records
//! where the samples begin and hands out the header-stripped slice.

use thiserror_no_std::Error;

/// Errors returned by [`AudioPayload::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// The header would cover the whole table.
    #[error("start offset {offset} outside a table of {total} bytes")]
    OffsetOutOfRange {
        /// Header length requested.
        offset: usize,
        /// Declared table size.
        total: usize,
    },
    /// Fewer bytes are linked in than the declared table size.
    #[error("table holds {actual} bytes, {declared} declared")]
    TableTooShort {
        /// Bytes actually present.
        actual: usize,
        /// Declared table size.
        declared: usize,
    },
}

impl PayloadError {
    /// Short name for log output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OffsetOutOfRange { .. } => "offset out of range",
            Self::TableTooShort { .. } => "table too short",
        }
    }
}

/// A sample table with its header length.
#[derive(Debug, Clone, Copy)]
pub struct AudioPayload {
    table: &'static [u8],
    total_size: usize,
    start_offset: usize,
}

impl AudioPayload {
    /// Describe `table`, declared as `total_size` bytes of which the first
    /// `start_offset` are header.
    pub fn new(
        table: &'static [u8],
        total_size: usize,
        start_offset: usize,
    ) -> Result<Self, PayloadError> {
        if table.len() < total_size {
            return Err(PayloadError::TableTooShort {
                actual: table.len(),
                declared: total_size,
            });
        }
        if start_offset >= total_size {
            return Err(PayloadError::OffsetOutOfRange {
                offset: start_offset,
                total: total_size,
            });
        }
        Ok(Self {
            table,
            total_size,
            start_offset,
        })
    }

    /// Samples without the header.
    pub fn samples(&self) -> &'static [u8] {
        self.table
            .get(self.start_offset..self.total_size)
            .unwrap_or_default()
    }

    /// Header bytes.
    pub fn header(&self) -> &'static [u8] {
        self.table.get(..self.start_offset).unwrap_or_default()
    }

    /// Declared table size, header included.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Header length.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }
}
