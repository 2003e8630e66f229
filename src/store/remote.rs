use std::time::Duration;

use anyhow::Result;

use crate::engine::history::HistoryEntry;

/// Best-effort forwarding of logged outcomes to a remote collector. The
/// caller ignores the result; a dead network must never stall or alter a
/// settle cycle, so the timeout is short and nothing is retried.
pub struct RemoteSink {
    url: String,
    client: reqwest::blocking::Client,
}

impl RemoteSink {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn forward(&self, entry: &HistoryEntry) -> Result<()> {
        self.client
            .post(&self.url)
            .json(entry)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}
