//! CSV archive for journaled wellness entries.
//!
//! This module implements atomic journal-to-CSV conversion with proper error
//! handling to prevent data loss, plus loading archived entries back for
//! history merges.

use crate::{Error, Mood, Result, WellnessEntry};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::path::Path;
use uuid::Uuid;

/// A row in the CSV archive
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CsvRow {
    id: String,
    created_at: String,
    sleep_hours: f64,
    stress_level: u8,
    study_hours: f64,
    mood: String,
}

impl From<&WellnessEntry> for CsvRow {
    fn from(entry: &WellnessEntry) -> Self {
        CsvRow {
            id: entry.id.to_string(),
            created_at: entry.created_at.to_rfc3339(),
            sleep_hours: entry.sleep_hours,
            stress_level: entry.stress_level,
            study_hours: entry.study_hours,
            mood: entry.mood.as_str().to_string(),
        }
    }
}

impl TryFrom<CsvRow> for WellnessEntry {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Other(format!("bad entry id '{}': {}", row.id, e)))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| Error::Other(format!("bad timestamp '{}': {}", row.created_at, e)))?
            .with_timezone(&Utc);
        let mood = Mood::parse(&row.mood)
            .ok_or_else(|| Error::Other(format!("unknown mood '{}'", row.mood)))?;

        Ok(WellnessEntry {
            id,
            created_at,
            sleep_hours: row.sleep_hours,
            stress_level: row.stress_level,
            study_hours: row.study_hours,
            mood,
        })
    }
}

/// Roll up journaled entries into CSV and archive the journal atomically
///
/// This function:
/// 1. Reads all entries from the journal
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the journal to .processed
/// 5. Returns the number of entries processed
///
/// # Safety
/// - CSV is fsynced before the journal is renamed
/// - Journal is renamed (not deleted) to allow manual recovery if needed
/// - Processed journal files can be cleaned up separately
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    // Read all entries from the journal
    let entries = crate::journal::read_entries(journal_path)?;

    if entries.is_empty() {
        tracing::info!("No entries in journal to roll up");
        return Ok(0);
    }

    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open CSV file for appending
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Headers go in only when the file is brand new; checking the open
    // handle's metadata avoids a separate stat
    let needs_headers = file.metadata()?.len() == 0;

    // When appending to an existing archive the header row must be skipped,
    // so header emission is decided here rather than left to the writer
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    // Write all entries to CSV
    for entry in &entries {
        let row = CsvRow::from(entry);
        writer.serialize(row)?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} entries to CSV", entries.len());

    // Atomically archive the journal by renaming it
    let processed_path = journal_path.with_extension("jsonl.processed");
    std::fs::rename(journal_path, &processed_path)?;

    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(entries.len())
}

/// Load archived entries back from CSV
///
/// Rows that fail to parse are skipped with a warning, matching the journal
/// reader's tolerance for isolated corruption.
pub fn load_entries_from_csv(csv_path: &Path) -> Result<Vec<WellnessEntry>> {
    if !csv_path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut entries = Vec::new();

    for (row_num, row_result) in reader.deserialize::<CsvRow>().enumerate() {
        match row_result
            .map_err(Error::from)
            .and_then(WellnessEntry::try_from)
        {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping archive row {}: {}", row_num + 1, e);
            }
        }
    }

    tracing::debug!("Loaded {} entries from CSV archive", entries.len());
    Ok(entries)
}

/// Clean up old processed journal files
///
/// This removes all .jsonl.processed files in the given directory.
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed journal: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journal files", count);
    }

    Ok(count)
}
