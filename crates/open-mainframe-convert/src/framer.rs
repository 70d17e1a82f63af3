//! Record framing over a buffered byte source.
//!
//! Two framings are supported:
//!
//! - **Fixed**: every record is exactly `fixed_length` bytes.
//! - **RDW**: every record is preceded by a 4-byte record descriptor word of
//!   two big-endian halfwords; the body length is their sum minus 4.
//!
//! A short tail in either framing ends the stream. It is logged, not raised.
//! A record descriptor word of `00 04 00 00` frames an empty record and
//! reading continues after it.

use std::io::{BufRead, Read};

use tracing::{trace, warn};

/// Length of the record descriptor word.
pub const RDW_LENGTH: usize = 4;

/// Splits a byte stream into raw records.
pub struct RecordFramer<R> {
    /// Buffered byte source.
    reader: R,
    /// Record length in fixed mode; 0 selects RDW framing.
    fixed_length: usize,
    /// Records returned so far.
    record_number: u64,
}

impl<R: BufRead> RecordFramer<R> {
    /// Creates a framer in RDW mode.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            fixed_length: 0,
            record_number: 0,
        }
    }

    /// Selects fixed framing with the given length, or RDW framing for 0.
    pub fn set_fixed_length(&mut self, fixed_length: usize) {
        self.fixed_length = fixed_length;
    }

    /// Current fixed length; 0 in RDW mode.
    pub fn fixed_length(&self) -> usize {
        self.fixed_length
    }

    /// Number of records returned so far.
    pub fn record_number(&self) -> u64 {
        self.record_number
    }

    /// Whether at least one more byte is available.
    pub fn has_next(&mut self) -> std::io::Result<bool> {
        Ok(!self.reader.fill_buf()?.is_empty())
    }

    /// Reads the next record.
    ///
    /// Returns `None` at end of stream, including when fewer bytes remain
    /// than the next record needs. An RDW declaring no body yields an empty
    /// record.
    pub fn next_record(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        if !self.has_next()? {
            return Ok(None);
        }

        let record = if self.fixed_length > 0 {
            self.read_fixed_record()?
        } else {
            self.read_variable_record()?
        };

        if let Some(record) = &record {
            self.record_number += 1;
            trace!(record = self.record_number, length = record.len(), "framed record");
        }
        Ok(record)
    }

    fn read_fixed_record(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut record = vec![0u8; self.fixed_length];
        let read = read_full(&mut self.reader, &mut record)?;
        if read < self.fixed_length {
            warn!(
                expected = self.fixed_length,
                dangling = read,
                "truncated fixed-length record at end of input"
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    fn read_variable_record(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut rdw = [0u8; RDW_LENGTH];
        let read = read_full(&mut self.reader, &mut rdw)?;
        if read < RDW_LENGTH {
            warn!(dangling = read, "truncated record descriptor word at end of input");
            return Ok(None);
        }

        let first = u16::from_be_bytes([rdw[0], rdw[1]]) as usize;
        let second = u16::from_be_bytes([rdw[2], rdw[3]]) as usize;
        let length = (first + second).saturating_sub(RDW_LENGTH);

        let mut record = vec![0u8; length];
        let read = read_full(&mut self.reader, &mut record)?;
        if read < length {
            warn!(
                expected = length,
                dangling = read,
                "truncated variable-length record at end of input"
            );
            return Ok(None);
        }
        Ok(Some(record))
    }
}

impl<R: BufRead> Iterator for RecordFramer<R> {
    type Item = std::io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Reads until `buf` is full or the source is exhausted.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
