//! Row — one cleaned input observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single (date, close) observation after load-time cleaning.
///
/// Rows are only constructed by the loader, which drops source rows with a
/// missing date or close before a `Row` is ever built. Source order is
/// preserved and determines the record's output address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub date: NaiveDate,
    pub close: f64,
}

impl Row {
    /// Returns true if the close survived cleaning as a finite number.
    pub fn has_finite_close(&self) -> bool {
        self.close.is_finite()
    }
}
