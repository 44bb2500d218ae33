//! # Series Tables
//!
//! One catalog file holds one series. The layout is fixed:
//!
//! ```text
//! Description,Type,Ix,Zx,...        <- headers
//! ,,10^6 mm^4,10^3 mm^3,...         <- units annotation (discarded)
//! 310UB46.2 (GR300),UB,99.5,...     <- one row per section
//! ```
//!
//! [`SeriesTable`] keeps every column as text; numeric interpretation and
//! unit scaling happen later in [`crate::properties`].

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CatalogError, CatalogResult};

/// Column holding the member description, the row-selection key
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Column holding the material/section type
pub const TYPE_COLUMN: &str = "Type";

/// File line (1-based) holding the units annotation
const UNITS_LINE: u64 = 2;

/// In-memory table for one series file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    /// File the table was read from
    source: Option<PathBuf>,

    /// Column names, in file order
    headers: Vec<String>,

    /// Data rows, padded to the header width
    rows: Vec<Vec<String>>,

    /// Index of the `Description` column
    description_idx: usize,
}

impl SeriesTable {
    /// An empty table (nothing loaded)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a series file, discarding the units row.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let file = File::open(path)
            .map_err(|e| CatalogError::file_error("open", path.display().to_string(), e.to_string()))?;
        let table = Self::from_reader(file, path)?;

        debug!(path = %path.display(), rows = table.len(), columns = table.headers.len(), "loaded series table");
        Ok(table)
    }

    fn from_reader<R: std::io::Read>(reader: R, path: &Path) -> CatalogResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| CatalogError::csv_error(path.display().to_string(), format!("Failed to read headers: {}", e)))?
            .iter()
            .map(normalize_header)
            .collect();

        let description_idx = headers
            .iter()
            .position(|h| h == DESCRIPTION_COLUMN)
            .ok_or_else(|| CatalogError::missing_column(DESCRIPTION_COLUMN, path.display().to_string()))?;

        let width = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| CatalogError::csv_error(path.display().to_string(), e.to_string()))?;
            // Blank lines never become records, so match the units row by line
            if record.position().map(|p| p.line()) == Some(UNITS_LINE) {
                continue;
            }
            rows.push(pad_record(&record, width));
        }

        Ok(SeriesTable {
            source: Some(path.to_path_buf()),
            headers,
            rows,
            description_idx,
        })
    }

    /// File the table was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when nothing is loaded or the file held no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-empty descriptions in file order; these populate the member menu.
    pub fn descriptions(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row[self.description_idx].clone())
            .filter(|d| !d.is_empty())
            .collect()
    }

    /// First row whose description matches exactly.
    ///
    /// `None` for an empty table or an unknown description.
    pub fn find_row(&self, description: &str) -> Option<SectionRow> {
        if self.is_empty() || description.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .find(|row| row[self.description_idx] == description)
            .map(|row| SectionRow {
                description: description.to_string(),
                cells: self.headers.iter().cloned().zip(row.iter().cloned()).collect(),
            })
    }
}

/// One section variant, as text cells keyed by column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    /// Member description (the row key)
    pub description: String,

    /// `(column, raw value)` in file order
    pub cells: Vec<(String, String)>,
}

impl SectionRow {
    /// Raw cell for a column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Material/section type, when the column is present and non-empty
    pub fn section_type(&self) -> Option<&str> {
        self.get(TYPE_COLUMN).filter(|t| !t.is_empty())
    }
}

fn normalize_header(name: &str) -> String {
    // Spreadsheet exports often lead with a UTF-8 BOM
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn pad_record(record: &StringRecord, width: usize) -> Vec<String> {
    let mut row: Vec<String> = record.iter().take(width).map(|s| s.to_string()).collect();
    row.resize(width, String::new());
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    const UB_CSV: &str = "\
Description,Type,Ix,Zx,Sx
,,10^6 mm^4,10^3 mm^3,10^3 mm^3
310UB46.2 (GR300),UB,99.5,633,710
310UB40.4 (GR300),UB,86.4,560,627
,UB,1,1,1
";

    fn parse(text: &str) -> CatalogResult<SeriesTable> {
        SeriesTable::from_reader(text.as_bytes(), Path::new("UB310.csv"))
    }

    #[test]
    fn test_units_row_is_discarded() {
        let table = parse(UB_CSV).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.find_row("").is_none());
        assert!(table.descriptions().iter().all(|d| !d.contains("mm")));
    }

    #[test]
    fn test_blank_units_line_keeps_first_member() {
        let table = parse("Description,Ix\n\nA,1\nB,2\n").unwrap();
        assert_eq!(table.descriptions(), vec!["A", "B"]);
        assert_eq!(table.find_row("A").unwrap().get("Ix"), Some("1"));
    }

    #[test]
    fn test_descriptions_skip_blanks() {
        let table = parse(UB_CSV).unwrap();
        assert_eq!(table.descriptions(), vec!["310UB46.2 (GR300)", "310UB40.4 (GR300)"]);
    }

    #[test]
    fn test_find_row() {
        let table = parse(UB_CSV).unwrap();
        let row = table.find_row("310UB40.4 (GR300)").unwrap();
        assert_eq!(row.get("Ix"), Some("86.4"));
        assert_eq!(row.section_type(), Some("UB"));
        assert_eq!(row.get("Missing"), None);
    }

    #[test]
    fn test_find_row_unknown_is_none() {
        let table = parse(UB_CSV).unwrap();
        assert!(table.find_row("610UB125 (GR300)").is_none());
        assert!(SeriesTable::empty().find_row("310UB46.2 (GR300)").is_none());
    }

    #[test]
    fn test_duplicate_description_takes_first() {
        let text = "Description,Ix\nunits,10^6\nA,1\nA,2\n";
        let table = parse(text).unwrap();
        assert_eq!(table.find_row("A").unwrap().get("Ix"), Some("1"));
    }

    #[test]
    fn test_missing_description_column() {
        let err = parse("Name,Ix\n,\nA,1\n").unwrap_err();
        assert_eq!(err.error_code(), "MISSING_COLUMN");
    }

    #[test]
    fn test_bom_and_short_rows() {
        let text = "\u{feff}Description , Ix ,Iy\n,,\nA,1\n";
        let table = parse(text).unwrap();
        assert_eq!(table.headers(), &["Description", "Ix", "Iy"]);
        let row = table.find_row("A").unwrap();
        assert_eq!(row.get("Iy"), Some(""));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let table = parse("Description,Ix\n,10^6\n").unwrap();
        assert!(table.is_empty());
        assert!(table.descriptions().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SeriesTable::load(Path::new("/no/such/UB310.csv")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UB310.csv");
        std::fs::write(&path, UB_CSV).unwrap();

        let table = SeriesTable::load(&path).unwrap();
        assert_eq!(table.source(), Some(path.as_path()));
        assert_eq!(table.len(), 3);
    }
}
