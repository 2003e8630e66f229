use serde::{Deserialize, Serialize};

use crate::engine::history::HistoryEntry;

pub const SCHEMA_VERSION: u32 = 1;

/// On-disk shape of the persisted outcome history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub entries: Vec<HistoryEntry>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

impl HistoryData {
    /// Loaded data with a different schema version is discarded rather than
    /// migrated; the history is a short performance log, not an archive.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
