use crate::config::HistoryConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::session::Mode;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One completed typing session, as persisted in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// when the session was completed
    pub timestamp: DateTime<Local>,
    pub mode: Mode,
    #[serde(default)]
    pub text_length: usize,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(flatten)]
    pub metrics: Metrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_author: Option<String>,
}

/// Records parsed out of a history log, with the count of lines that were
/// dropped because they did not parse.
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub records: Vec<SessionRecord>,
    pub skipped: usize,
}

/// Parse a line-delimited log. Unparsable lines (a crash mid-write, manual
/// edits) are skipped rather than failing the whole read.
pub fn parse_records(data: &[u8]) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    for line in data.split(|b| *b == b'\n') {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<SessionRecord>(line) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                debug!("skipping history line: {}", e);
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

/// Append-only session history, one JSON object per line.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
    enabled: bool,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P, enabled: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            enabled,
        }
    }

    pub fn from_config(cfg: &HistoryConfig) -> Self {
        Self::new(cfg.path(), cfg.enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. A no-op when history is disabled.
    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(&line)?;

        debug!("appended session record to {}", self.path.display());
        Ok(())
    }

    /// Read every parsable record, newest first. Empty when history is
    /// disabled or the log does not exist yet.
    pub fn load(&self) -> Result<Vec<SessionRecord>> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let ParsedLog {
            mut records,
            skipped,
        } = parse_records(&data);
        if skipped > 0 {
            warn!(
                "skipped {} unparsable line(s) in {}",
                skipped,
                self.path.display()
            );
        }

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}
