//! Tabular CSV export, one row per single occurrence.
//!
//! Unlike the calendar exports, no recurrence survives here: every
//! repetition becomes its own row, numbered "k of N" in the title.

use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use crate::cache::CacheDir;
use crate::constants::BASE_TABLE_CSV_FILENAME;
use crate::error::{CourseCalError, CourseCalResult};
use crate::expand::expand_source;
use crate::meeting::{MeetingSource, SingleOccurrence};

const TABLE_DT: &str = "%Y/%m/%d %H:%M";

/// Create a CSV table for a source list and write it to the cache.
///
/// Header: `Title, Datetime, Location, Description`. Row order follows the
/// source list, occurrences in chronological order within each source.
pub fn create_table_csv(sources: &[MeetingSource], cache: &CacheDir) -> CourseCalResult<PathBuf> {
    if sources.is_empty() {
        return Err(CourseCalError::EmptySource);
    }

    // Expand everything before touching the filesystem so a bad descriptor
    // cannot leave a partial file behind.
    let mut rows = Vec::new();
    for source in sources {
        let occurrences = expand_source(source)?;
        let total = occurrences.len();
        for (idx, occurrence) in occurrences.iter().enumerate() {
            rows.push(build_row(occurrence, idx + 1, total));
        }
    }

    let file_path = cache.allocate(
        BASE_TABLE_CSV_FILENAME,
        &Uuid::new_v4().simple().to_string(),
    )?;
    let mut writer = csv::Writer::from_path(&file_path)?;
    writer.write_record(["Title", "Datetime", "Location", "Description"])?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!(path = %file_path.display(), rows = rows.len(), "wrote meeting table");
    Ok(file_path)
}

fn build_row(occurrence: &SingleOccurrence, index: usize, total: usize) -> [String; 4] {
    [
        format!("{} - {} of {}", occurrence.name, index, total),
        format!(
            "{} ({}) → {}",
            occurrence.starts_at().format(TABLE_DT),
            occurrence.timezone,
            occurrence.ends_at().format(TABLE_DT)
        ),
        occurrence.location.clone(),
        occurrence.description.clone(),
    ]
}
