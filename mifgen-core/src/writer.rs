//! MIF emission — header, one line per record, terminator.
//!
//! The writer is a forward-only state machine over an owned sink:
//! `Created → HeaderWritten → Finalized`. Addresses are assigned
//! sequentially from zero in the order records are written, so the address
//! column always matches filtered source order with no gaps.
//!
//! Writing is streaming and append-only. An interrupted run leaves a
//! truncated file behind; callers wanting atomicity would need a
//! write-then-rename wrapper (hardening point, not provided here).

use std::io::{self, Write};

use thiserror::Error;

use crate::domain::{EncodeError, Record, Row};

/// Errors while emitting MIF text.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid writer state: {0}")]
    State(&'static str),
}

/// Failure during combined encode-and-write emission.
#[derive(Debug, Error)]
pub enum MifError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Created,
    HeaderWritten,
    Finalized,
}

/// Streaming MIF writer.
///
/// The sink is exclusively owned for the duration of the run: opened once by
/// the caller, handed in, and recovered with [`MifWriter::into_inner`] after
/// [`MifWriter::finish`].
pub struct MifWriter<W: Write> {
    sink: W,
    state: WriterState,
    next_addr: usize,
}

impl<W: Write> MifWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::Created,
            next_addr: 0,
        }
    }

    /// Emit the header block. `depth` is the total record count.
    pub fn write_header(&mut self, depth: usize) -> Result<(), WriteError> {
        if self.state != WriterState::Created {
            return Err(WriteError::State("header already written"));
        }
        writeln!(self.sink, "WIDTH={};", Record::WIDTH_BITS)?;
        writeln!(self.sink, "DEPTH={depth};")?;
        writeln!(self.sink, "ADDRESS_RADIX=UNS;")?;
        writeln!(self.sink, "DATA_RADIX=HEX;")?;
        writeln!(self.sink, "CONTENT BEGIN")?;
        self.state = WriterState::HeaderWritten;
        Ok(())
    }

    /// Emit one record line at the next sequential address. Returns the
    /// address the record landed on.
    pub fn write_record(&mut self, record: &Record) -> Result<usize, WriteError> {
        if self.state != WriterState::HeaderWritten {
            return Err(WriteError::State("record written outside CONTENT section"));
        }
        let addr = self.next_addr;
        writeln!(self.sink, "    {addr} : {};", record.to_hex())?;
        self.next_addr += 1;
        Ok(addr)
    }

    /// Emit the terminator and flush. The writer accepts nothing further.
    pub fn finish(&mut self) -> Result<(), WriteError> {
        if self.state != WriterState::HeaderWritten {
            return Err(WriteError::State("finish requires a written header"));
        }
        writeln!(self.sink, "END;")?;
        self.sink.flush()?;
        self.state = WriterState::Finalized;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> usize {
        self.next_addr
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Encode and stream a sequence of rows into `sink` as one complete MIF file.
///
/// Drives the full header → records → END sequence; each record is encoded
/// immediately before its line is written. Returns the record count.
pub fn write_mif<W, I>(rows: I, sink: W) -> Result<usize, MifError>
where
    W: Write,
    I: IntoIterator<Item = Row>,
    I::IntoIter: ExactSizeIterator,
{
    let rows = rows.into_iter();
    let mut writer = MifWriter::new(sink);
    writer.write_header(rows.len())?;
    for row in rows {
        let record = Record::encode(row.date, row.close)?;
        writer.write_record(&record)?;
    }
    writer.finish()?;
    Ok(writer.records_written())
}
