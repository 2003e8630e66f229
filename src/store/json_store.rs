use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::engine::history::HistoryEntry;
use crate::store::schema::HistoryData;

/// JSON persistence for the outcome history, under the platform data dir.
/// Every caller treats writes as best-effort; a failed save must never reach
/// the engine.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordwheel");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn history_path(&self) -> PathBuf {
        self.base_dir.join("history.json")
    }

    /// Tolerant load: a missing, unreadable, unparsable, or stale-schema
    /// file all yield an empty history.
    pub fn load_history(&self) -> HistoryData {
        let path = self.history_path();
        if !path.exists() {
            return HistoryData::default();
        }
        let data: HistoryData = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        if data.needs_reset() {
            HistoryData::default()
        } else {
            data
        }
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        let path = self.history_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Append one entry, trimming the persisted list to `cap` newest.
    pub fn append_entry(&self, entry: &HistoryEntry, cap: usize) -> Result<()> {
        let mut data = self.load_history();
        data.entries.push(entry.clone());
        if data.entries.len() > cap {
            let excess = data.entries.len() - cap;
            data.entries.drain(..excess);
        }
        self.save_history(&data)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.save_history(&HistoryData::default())
    }
}
