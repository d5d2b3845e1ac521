//! mifgen core — CSV row loading, fixed-width record encoding, MIF emission.
//!
//! The pipeline is a single linear pass over an in-memory sequence of rows:
//! - Load (date, close) rows from a CSV source, dropping incomplete rows
//! - Encode each row into an 8-byte big-endian record
//! - Stream record lines into a MIF text file (header, one line per address, END)
//!
//! There is no concurrency and no retry logic anywhere; every fallible step
//! returns an explicit error type and a failure terminates the whole run.

pub mod config;
pub mod convert;
pub mod data;
pub mod domain;
pub mod writer;

pub use config::{ConfigError, ConvertConfig};
pub use convert::{convert, default_output_path, ConvertError, ConvertOptions, ConvertSummary};
pub use data::loader::{load_rows, LoadError, LoadReport};
pub use domain::{EncodeError, Record, Row};
pub use writer::{write_mif, MifError, MifWriter, WriteError};
