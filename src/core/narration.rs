//! Human-readable effect descriptions produced while reducing actions.
//!
//! Narration is a side channel: reducers return it so a driver can show what
//! happened ("rolled 3 and 5"), but it is never stored in game state and the
//! search engine discards it.

use std::fmt;

/// One line of narration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogEntry {
    pub msg: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}
