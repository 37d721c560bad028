/// Persisted ranking of graded runs
///
/// The whole collection is one JSON array, rewritten on every save. Losing it
/// is not fatal since any entry can be reproduced by re-grading, so a missing
/// or corrupt file loads as an empty ranking.
use crate::config::types::{Result, LEADERBOARD_SCHEMA_VERSION};
use crate::safety::lock::with_file_lock;
use crate::utils::fs::atomic_write;
use log::warn;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

fn default_version() -> u32 {
    LEADERBOARD_SCHEMA_VERSION
}

/// One graded run
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub timestamp: String,
    pub name: String,
    pub cmd: String,
    pub correctness: u32,
    pub perf_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perf_ms: Option<u64>,
    pub total_score: u32,
    #[serde(default = "default_version")]
    pub version: u32,
}

/// Ranking order: total score descending, then perf time ascending, with
/// entries lacking a perf time last. Ties keep their existing order.
pub fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then_with(|| (a.perf_ms.is_none(), a.perf_ms).cmp(&(b.perf_ms.is_none(), b.perf_ms)))
}

pub fn sort_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(rank_order);
}

/// Leaderboard document handle
#[derive(Clone, Debug)]
pub struct Leaderboard {
    path: PathBuf,
}

impl Leaderboard {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries; never fails.
    pub fn load(&self) -> Vec<LeaderboardEntry> {
        match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot read {} ({}), treating as empty", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Missing or unparsable content yields no entries; unparsable bytes are
    /// copied to the backup first. Only a failed read is an error, so a file
    /// that could not be inspected is never overwritten.
    fn read_entries(&self) -> Result<Vec<LeaderboardEntry>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let backup = self.backup_path();
                warn!(
                    "{} is corrupted ({}), backing up to {} and starting fresh",
                    self.path.display(),
                    e,
                    backup.display()
                );
                fs::write(&backup, &content)?;
                Ok(Vec::new())
            }
        }
    }

    /// Current ranking without grading anything
    pub fn list(&self) -> Vec<LeaderboardEntry> {
        let mut entries = self.load();
        sort_entries(&mut entries);
        entries
    }

    /// Append `entry`, re-sort and rewrite the document under the file lock.
    /// Returns the sorted collection that was written.
    pub fn record(&self, entry: LeaderboardEntry) -> Result<Vec<LeaderboardEntry>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        with_file_lock(&self.path, || {
            let mut entries = self.read_entries()?;
            entries.push(entry);
            sort_entries(&mut entries);
            let content = serde_json::to_string_pretty(&entries)?;
            atomic_write(&self.path, content.as_bytes())?;
            log::info!(
                "recorded leaderboard entry ({} total) in {}",
                entries.len(),
                self.path.display()
            );
            Ok(entries)
        })
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupted");
        self.path.with_file_name(name)
    }
}
