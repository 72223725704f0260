//! History Loader
//!
//! Aggregates text-log events per user and writes them as a block store.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::storage::BlockStoreWriter;
use crate::VmStoreError;

use super::HistoryRecord;

/// Counters reported after a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadStats {
    /// Lines read from the input
    pub lines: u64,
    /// Lines skipped as malformed
    pub skipped: u64,
    /// Distinct users written
    pub users: u64,
    /// Records written, summaries included
    pub records: u64,
}

#[derive(Debug, Default)]
struct UserHistory {
    played: f64,
    length: f64,
    events: Vec<HistoryRecord>,
}

impl UserHistory {
    fn summary(&self) -> HistoryRecord {
        let ratio = if self.length == 0.0 {
            0.0
        } else {
            self.played / self.length
        };
        HistoryRecord::summary(ratio)
    }
}

/// Accumulates events per uid, preserving first-seen uid order
#[derive(Debug, Default)]
pub struct HistoryLoader {
    order: Vec<u64>,
    users: HashMap<u64, UserHistory>,
    stats: LoadStats,
}

impl HistoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one input line into `(uid, event)`
    pub fn parse_line(line: &str) -> Result<(u64, HistoryRecord)> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(VmStoreError::Parse(format!(
                "expected at least 4 fields, got {}",
                fields.len()
            )));
        }

        let uid = parse_field::<u64>(fields[0], "uid")?;
        if uid == crate::storage::INVALID_KEY {
            return Err(VmStoreError::Parse("uid 0 is reserved".to_string()));
        }
        let pid = parse_field::<u64>(fields[1], "pid")?;
        let label = parse_field::<i32>(fields[2], "label")?;
        let time = parse_field::<u64>(fields[3], "time")?;
        let played = match fields.get(4) {
            Some(field) => parse_field::<f64>(field, "played")?,
            None => 0.0,
        };
        let length = match fields.get(5) {
            Some(field) => parse_field::<f64>(field, "length")?,
            None => 0.0,
        };

        Ok((uid, HistoryRecord::new(pid, label, time, played, length)))
    }

    /// Add one line; malformed lines are counted and skipped
    pub fn ingest_line(&mut self, line: &str) {
        self.stats.lines += 1;

        match Self::parse_line(line) {
            Ok((uid, event)) => self.push(uid, event),
            Err(e) => {
                self.stats.skipped += 1;
                tracing::debug!(line = self.stats.lines, error = %e, "skipping input line");
            }
        }
    }

    /// Add every line of `reader`
    pub fn ingest<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            self.ingest_line(&line?);
        }
        Ok(())
    }

    /// Add every line of the file at `path`
    pub fn ingest_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| VmStoreError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        self.ingest(BufReader::new(file))
    }

    /// Number of distinct uids seen so far
    pub fn user_count(&self) -> usize {
        self.order.len()
    }

    /// Write one key group per uid: summary record first, then the events
    pub fn write_to(self, writer: &mut BlockStoreWriter<HistoryRecord>) -> Result<LoadStats> {
        let mut stats = self.stats;
        let mut users = self.users;

        for uid in &self.order {
            let Some(history) = users.remove(uid) else {
                continue;
            };

            writer.switch_index(*uid)?;
            writer.write(&history.summary())?;
            for event in &history.events {
                writer.write(event)?;
            }

            stats.users += 1;
            stats.records += 1 + history.events.len() as u64;
        }
        writer.flush_index()?;

        Ok(stats)
    }

    /// Write the accumulated histories to a new store at `output`
    pub fn write_store(self, output: &Path, config: &Config) -> Result<LoadStats> {
        let mut writer = BlockStoreWriter::create_with_config(output, config)?;
        let stats = self.write_to(&mut writer)?;
        writer.close()?;
        Ok(stats)
    }

    fn push(&mut self, uid: u64, event: HistoryRecord) {
        let history = self.users.entry(uid).or_insert_with(|| {
            self.order.push(uid);
            UserHistory::default()
        });
        history.played += event.played;
        history.length += event.length;
        history.events.push(event);
    }
}

fn parse_field<F: std::str::FromStr>(field: &str, name: &str) -> Result<F> {
    field
        .parse()
        .map_err(|_| VmStoreError::Parse(format!("invalid {}: {:?}", name, field)))
}
