//! Append-only journal for wellness entries.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access.

use crate::{Result, WellnessEntry};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Entry sink trait for persisting wellness entries
pub trait EntrySink {
    fn append(&mut self, entry: &WellnessEntry) -> Result<()>;
}

/// JSONL-based entry sink with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new JSONL journal for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EntrySink for JsonlJournal {
    fn append(&mut self, entry: &WellnessEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        // Open file for appending
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        // Write entry as JSON line
        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        // Lock is automatically released when file is dropped
        file.unlock()?;

        tracing::debug!("Appended entry {} to journal", entry.id);
        Ok(())
    }
}

/// Read all entries from a journal file
///
/// Malformed lines are skipped with a warning so one bad record cannot blank
/// the whole dashboard.
pub fn read_entries(path: &Path) -> Result<Vec<WellnessEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WellnessEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse entry at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} entries from journal", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mood;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_entry() -> WellnessEntry {
        WellnessEntry {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            sleep_hours: 7.5,
            stress_level: 4,
            study_hours: 3.0,
            mood: Mood::Good,
        }
    }

    #[test]
    fn test_append_and_read_single_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("test.jsonl");

        let entry = create_test_entry();
        let entry_id = entry.id;

        // Append entry
        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&entry).unwrap();

        // Read back
        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry_id);
    }

    #[test]
    fn test_append_multiple_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("test.jsonl");

        let mut journal = JsonlJournal::new(&journal_path);

        // Append multiple entries
        for _ in 0..5 {
            let entry = create_test_entry();
            journal.append(&entry).unwrap();
        }

        // Read back
        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 5);
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("nonexistent.jsonl");

        let entries = read_entries(&journal_path).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_corrupt_line_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let journal_path = temp_dir.path().join("test.jsonl");

        let mut journal = JsonlJournal::new(&journal_path);
        journal.append(&create_test_entry()).unwrap();

        // Inject a corrupt line by hand
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(&journal_path)
                .unwrap();
            writeln!(file, "{{ not json").unwrap();
        }

        journal.append(&create_test_entry()).unwrap();

        let entries = read_entries(&journal_path).unwrap();
        assert_eq!(entries.len(), 2);
    }
}
