//! Constants related to export computation.

/// ICS calendar base file name.
pub const BASE_ICS_FILENAME: &str = "calendar.ics";

/// Tabular CSV calendar base file name.
pub const BASE_TABLE_CSV_FILENAME: &str = "meetings.csv";

/// Heatmap CSV base file name.
pub const HEATMAP_CSV_FILENAME: &str = "heatmap.csv";

/// Heatmap XLSX base file name.
pub const HEATMAP_XLSX_FILENAME: &str = "heatmap.xlsx";

/// Sheet name used for the heatmap XLSX export.
pub const HEATMAP_SHEET: &str = "Heatmap";

/// Default cache directory when the caller does not choose one.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Upper bound on occurrences produced for a single recurring meeting.
/// A date-limited rule cannot expand past this.
pub const MAX_OCCURRENCES: u16 = 1000;
