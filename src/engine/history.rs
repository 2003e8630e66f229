use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Normal,
    Force,
    Vrtx,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Normal => "NORMAL",
            OutcomeKind::Force => "FORCE",
            OutcomeKind::Vrtx => "VRTX",
        }
    }

    pub fn is_forced(self) -> bool {
        !matches!(self, OutcomeKind::Normal)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub word: String,
    pub kind: OutcomeKind,
    pub timestamp: DateTime<Utc>,
}

pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Bounded append-only record of settled outcomes. Oldest entries are
/// evicted first once the cap is reached.
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    cap: usize,
}

impl HistoryLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current contents, most recent first.
    pub fn snapshot(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().collect()
    }

    pub fn oldest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}
