//! Entry history loading across journal and archive.
//!
//! The full history lives in two places: recent writes in the JSONL journal
//! and older entries rolled up into the CSV archive. Analytics always work
//! over the merged view.

use crate::{Result, WellnessEntry};
use std::collections::HashSet;
use std::path::Path;

/// Load the full entry history from both journal and CSV archive
///
/// Returns entries sorted by created_at ascending, which is the order the
/// analytics expect. Entries that appear in both sources (a rollup raced a
/// read) are deduplicated by id, journal copy winning.
pub fn load_entries(journal_path: &Path, csv_path: &Path) -> Result<Vec<WellnessEntry>> {
    let mut entries = Vec::new();
    let mut seen_ids = HashSet::new();

    // Journal first (most recent writes)
    if journal_path.exists() {
        for entry in crate::journal::read_entries(journal_path)? {
            seen_ids.insert(entry.id);
            entries.push(entry);
        }
        tracing::debug!("Loaded {} entries from journal", entries.len());
    }

    // Archived entries
    if csv_path.exists() {
        let mut csv_count = 0;
        for entry in crate::archive::load_entries_from_csv(csv_path)? {
            if !seen_ids.contains(&entry.id) {
                seen_ids.insert(entry.id);
                entries.push(entry);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} entries from CSV archive", csv_count);
    }

    // Sort by created_at, oldest first
    entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    tracing::info!("Loaded {} total entries", entries.len());

    Ok(entries)
}
