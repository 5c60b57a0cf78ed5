//! Student availability heatmap export.
//!
//! Renders an [`AvailabilityGrid`] as a delimited table and/or a
//! spreadsheet with a three-stop color scale over the data cells: minimum
//! green, 50th percentile yellow, maximum red.

use std::path::PathBuf;

use rust_xlsxwriter::{
    ConditionalFormat3ColorScale, ConditionalFormatType, Workbook,
};
use tracing::debug;
use uuid::Uuid;

use crate::availability::{AvailabilityGrid, Scope};
use crate::cache::CacheDir;
use crate::constants::{HEATMAP_CSV_FILENAME, HEATMAP_SHEET, HEATMAP_XLSX_FILENAME};
use crate::error::{CourseCalError, CourseCalResult};
use crate::expand::expand_sources;
use crate::meeting::MeetingSource;

/// Cache paths of the heatmap files produced by [`generate_heatmap`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeatmapFiles {
    pub csv: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
}

/// Expand a source list, aggregate it over `scope`, and write the selected
/// file formats.
pub fn generate_heatmap(
    sources: &[MeetingSource],
    scope: Scope,
    save_as_csv: bool,
    save_as_xlsx: bool,
    cache: &CacheDir,
) -> CourseCalResult<HeatmapFiles> {
    if sources.is_empty() {
        return Err(CourseCalError::EmptySource);
    }

    let occurrences = expand_sources(sources)?;
    let grid = AvailabilityGrid::aggregate(&occurrences, scope)?;

    let csv = if save_as_csv {
        Some(write_heatmap_csv(&grid, cache)?)
    } else {
        None
    };
    let xlsx = if save_as_xlsx {
        Some(write_heatmap_xlsx(&grid, cache)?)
    } else {
        None
    };

    Ok(HeatmapFiles { csv, xlsx })
}

/// Render the grid as a CSV file: `Date/Time` header plus half-hour range
/// labels, one row per scope day led by its ISO date.
pub fn write_heatmap_csv(grid: &AvailabilityGrid, cache: &CacheDir) -> CourseCalResult<PathBuf> {
    let file_path = cache.allocate(HEATMAP_CSV_FILENAME, &Uuid::new_v4().simple().to_string())?;

    let mut writer = csv::Writer::from_path(&file_path)?;
    writer.write_record(header_row(grid.scope()))?;
    for (date, row) in grid.scope().dates().zip(grid.rows()) {
        let mut record = vec![date.to_string()];
        record.extend(row.iter().map(u32::to_string));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    debug!(path = %file_path.display(), "wrote heatmap csv");
    Ok(file_path)
}

/// Render the grid as an XLSX file with the color scale applied to the
/// numeric data rectangle (header row and date column excluded).
pub fn write_heatmap_xlsx(grid: &AvailabilityGrid, cache: &CacheDir) -> CourseCalResult<PathBuf> {
    let file_path = cache.allocate(HEATMAP_XLSX_FILENAME, &Uuid::new_v4().simple().to_string())?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(HEATMAP_SHEET)?;

    for (col, label) in header_row(grid.scope()).iter().enumerate() {
        worksheet.write_string(0, col as u16, label.as_str())?;
    }
    for (row_idx, (date, row)) in grid.scope().dates().zip(grid.rows()).enumerate() {
        worksheet.write_string(row_idx as u32 + 1, 0, date.to_string())?;
        for (col_idx, value) in row.iter().enumerate() {
            worksheet.write_number(row_idx as u32 + 1, col_idx as u16 + 1, *value)?;
        }
    }

    let (num_days, num_intervals) = grid.shape();
    let color_scale = ConditionalFormat3ColorScale::new()
        .set_midpoint(ConditionalFormatType::Percentile, 50)
        .set_minimum_color("008000")
        .set_midpoint_color("FFFF00")
        .set_maximum_color("FF0000");
    worksheet.add_conditional_format(1, 1, num_days as u32, num_intervals as u16, &color_scale)?;

    workbook.save(&file_path)?;

    debug!(path = %file_path.display(), "wrote heatmap xlsx");
    Ok(file_path)
}

fn header_row(scope: &Scope) -> Vec<String> {
    let mut header = vec!["Date/Time".to_string()];
    header.extend(scope.interval_labels());
    header
}
