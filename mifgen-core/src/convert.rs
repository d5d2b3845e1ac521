//! The conversion pipeline: load → clean → encode → write.
//!
//! One linear, single-threaded pass. The loaded rows are held in memory (the
//! row count fixes the MIF `DEPTH` before any record line is written);
//! records themselves are encoded one at a time and streamed straight into
//! the output file. Any failure terminates the run — there is no per-record
//! recovery, and a failed run may leave partial output on disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConvertConfig;
use crate::data::loader::{load_rows, LoadError};
use crate::domain::{EncodeError, Record};
use crate::writer::{MifWriter, WriteError};

/// Errors from a conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("record at address {address}: {source}")]
    Encode {
        address: usize,
        #[source]
        source: EncodeError,
    },

    #[error("failed to create output '{}': {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// What to convert and where to put it.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Input CSV path.
    pub input: PathBuf,
    /// Output MIF path.
    pub output: PathBuf,
    /// Column mapping for the input.
    pub config: ConvertConfig,
}

/// Outcome of a completed conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub records_written: usize,
    pub width_bits: usize,
    /// BLAKE3 hex digest of the emitted MIF text. Unchanged input produces
    /// an unchanged digest, so two summaries prove byte-identical output.
    pub content_hash: String,
}

/// Default output path: the input path with an `.mif` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("mif")
}

// ─── Pipeline ───────────────────────────────────────────────────────

/// Run the full conversion.
///
/// The output handle is opened once, exclusively owned by the writer for the
/// duration of the run, and flushed before the summary is returned.
pub fn convert(opts: &ConvertOptions) -> Result<ConvertSummary, ConvertError> {
    let report = load_rows(&opts.input, &opts.config)?;

    let file = File::create(&opts.output).map_err(|source| ConvertError::CreateOutput {
        path: opts.output.clone(),
        source,
    })?;
    let mut writer = MifWriter::new(HashingWriter::new(BufWriter::new(file)));

    writer.write_header(report.rows.len())?;
    for row in &report.rows {
        let address = writer.records_written();
        let record = Record::encode(row.date, row.close)
            .map_err(|source| ConvertError::Encode { address, source })?;
        writer.write_record(&record)?;
    }
    writer.finish()?;

    let records_written = writer.records_written();
    let content_hash = writer.into_inner().finalize();

    Ok(ConvertSummary {
        input: opts.input.clone(),
        output: opts.output.clone(),
        rows_read: report.rows_read,
        rows_dropped: report.rows_dropped,
        records_written,
        width_bits: Record::WIDTH_BITS,
        content_hash,
    })
}

// ─── Hashing sink ───────────────────────────────────────────────────

/// Tee sink: passes bytes through to the inner writer while feeding them
/// into a BLAKE3 hasher, so the content hash costs no second read.
struct HashingWriter<W: Write> {
    inner: W,
    hasher: blake3::Hasher,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: blake3::Hasher::new(),
        }
    }

    fn finalize(self) -> String {
        self.hasher.finalize().to_hex().to_string()
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
