//! Append-only JSON lines audit store
//!
//! Each record is written as a single JSON line and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::entity::EntityIdentity;
use super::record::{AuditDraft, AuditId, AuditRecord};
use super::store::AuditStore;
use crate::error::{AuditError, AuditResult};

/// Audit store backed by a JSONL file
///
/// Each line of the file is a complete JSON object for one audit record.
pub struct JsonlAuditStore {
    /// Path to the audit log file
    log_path: PathBuf,
    /// Serialises appends from this process
    write_lock: Mutex<()>,
}

impl JsonlAuditStore {
    /// Create a store that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            write_lock: Mutex::new(()),
        }
    }

    fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| AuditError::Persistence(format!("Failed to acquire audit log lock: {}", e)))?;

        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuditError::Persistence(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // Serialise before opening so a bad record never leaves a partial line
        let mut line = serde_json::to_string(record).map_err(|e| {
            AuditError::Persistence(format!("Failed to serialize audit record: {}", e))
        })?;
        line.push('\n');

        self.truncate_torn_tail()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AuditError::Persistence(format!("Failed to open audit log: {}", e)))?;

        file.write_all(line.as_bytes())
            .map_err(|e| AuditError::Persistence(format!("Failed to write audit record: {}", e)))?;

        file.flush()
            .map_err(|e| AuditError::Persistence(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Drop an unterminated final line left by an interrupted append
    fn truncate_torn_tail(&self) -> AuditResult<()> {
        let mut file = match OpenOptions::new().read(true).write(true).open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(AuditError::Persistence(format!(
                    "Failed to open audit log: {}",
                    e
                )))
            }
        };

        let repair_err =
            |e: std::io::Error| AuditError::Persistence(format!("Failed to repair audit log: {}", e));

        let len = file.metadata().map_err(repair_err)?.len();
        if len == 0 {
            return Ok(());
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(repair_err)?;
        file.read_exact(&mut last).map_err(repair_err)?;
        if last[0] == b'\n' {
            return Ok(());
        }

        let contents = fs::read(&self.log_path).map_err(repair_err)?;
        let keep = contents
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |pos| pos + 1);

        warn!(
            path = %self.log_path.display(),
            dropped_bytes = contents.len() - keep,
            "Truncating torn audit log line"
        );
        file.set_len(keep as u64).map_err(repair_err)?;

        Ok(())
    }

    /// Read all audit records from the log file
    ///
    /// Returns records in chronological order (oldest first). An unparsable
    /// final line is skipped with a warning; anywhere else it is an error.
    pub fn read_all(&self) -> AuditResult<Vec<AuditRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Persistence(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut lines = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AuditError::Persistence(format!(
                    "Failed to read audit log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            lines.push((line_num + 1, line));
        }

        let total = lines.len();
        let mut records = Vec::with_capacity(total);

        for (index, (line_num, line)) in lines.into_iter().enumerate() {
            match serde_json::from_str::<AuditRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) if index + 1 == total => {
                    warn!(
                        path = %self.log_path.display(),
                        line = line_num,
                        error = %e,
                        "Skipping torn final audit log line"
                    );
                }
                Err(e) => {
                    return Err(AuditError::Json(format!(
                        "Failed to parse audit record at line {}: {}",
                        line_num, e
                    )))
                }
            }
        }

        Ok(records)
    }

    /// Read the most recent N records from the log
    pub fn read_recent(&self, count: usize) -> AuditResult<Vec<AuditRecord>> {
        let all = self.read_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all[start..].to_vec())
    }

    /// Get the number of records in the audit log
    pub fn entry_count(&self) -> AuditResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Persistence(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let count = reader
            .lines()
            .filter_map(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count();

        Ok(count)
    }

    /// Check if the audit log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the audit log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

impl AuditStore for JsonlAuditStore {
    fn create(&self, draft: AuditDraft) -> AuditResult<AuditRecord> {
        let record = AuditRecord::from_draft(draft);
        self.append(&record)?;

        debug!(
            audit_id = %record.id,
            path = %self.log_path.display(),
            "Appended audit record"
        );
        Ok(record)
    }

    fn audits_for(&self, identity: &EntityIdentity) -> AuditResult<Vec<AuditRecord>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.is_for(identity))
            .collect())
    }

    fn find(&self, id: AuditId) -> AuditResult<Option<AuditRecord>> {
        Ok(self.read_all()?.into_iter().find(|r| r.id == id))
    }
}
