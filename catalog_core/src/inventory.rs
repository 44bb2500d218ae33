//! # Catalog Inventory
//!
//! Lists the catalog files in the library folder and answers the first two
//! questions of a selection: which categories exist, and which series belong
//! to a category.
//!
//! A category is never stored; it is the fixed-length prefix of a filename
//! (`PFC300.csv` belongs to `PFC`). A series is the filename without its
//! extension.
//!
//! ## Example
//!
//! ```rust,no_run
//! use catalog_core::inventory::CatalogInventory;
//! use catalog_core::settings::CatalogSettings;
//!
//! let settings = CatalogSettings::default();
//! let inventory = CatalogInventory::scan(&settings)?;
//!
//! for category in inventory.categories() {
//!     println!("{}: {:?}", category, inventory.series_for(&category));
//! }
//! # Ok::<(), catalog_core::errors::CatalogError>(())
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{CatalogError, CatalogResult};
use crate::settings::CatalogSettings;

/// Snapshot of the catalog files in a library folder
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogInventory {
    /// Library folder that was scanned
    root: PathBuf,

    /// Catalog extension, without the dot
    extension: String,

    /// Category prefix length (in characters)
    prefix_len: usize,

    /// Catalog filenames, sorted
    files: Vec<String>,
}

impl CatalogInventory {
    /// Scan the library folder named in the settings.
    ///
    /// A missing or unreadable folder is an error; there is nothing to fall
    /// back to.
    pub fn scan(settings: &CatalogSettings) -> CatalogResult<Self> {
        Self::scan_dir(&settings.library_folder, &settings.extension, settings.category_prefix_len)
    }

    /// Scan an explicit directory.
    pub fn scan_dir(root: &Path, extension: &str, prefix_len: usize) -> CatalogResult<Self> {
        if !root.is_dir() {
            return Err(CatalogError::directory_not_found(root.display().to_string()));
        }

        let entries = fs::read_dir(root)
            .map_err(|e| CatalogError::file_error("list", root.display().to_string(), e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| CatalogError::file_error("list", root.display().to_string(), e.to_string()))?;
            let path = entry.path();
            if !path.is_file() || !has_extension(&path, extension) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
        files.sort();

        debug!(root = %root.display(), count = files.len(), "scanned catalog folder");

        Ok(CatalogInventory {
            root: root.to_path_buf(),
            extension: extension.to_string(),
            prefix_len,
            files,
        })
    }

    /// Library folder this inventory was taken from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Catalog filenames, sorted
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Sorted, distinct category prefixes.
    ///
    /// Filenames shorter than the prefix contribute their whole stem.
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .files
            .iter()
            .map(|name| name.chars().take(self.prefix_len).collect())
            .collect();
        set.into_iter().collect()
    }

    /// Sorted series identifiers whose filename starts with `category`.
    ///
    /// An empty or unknown category yields an empty list.
    pub fn series_for(&self, category: &str) -> Vec<String> {
        if category.is_empty() {
            return Vec::new();
        }
        let mut series: Vec<String> = self
            .files
            .iter()
            .filter(|name| name.starts_with(category))
            .map(|name| strip_extension(name))
            .collect();
        series.sort();
        series
    }

    /// Full path of the catalog file for a series.
    ///
    /// Uses the filename as listed, so `PFC300.CSV` is found for `PFC300`.
    pub fn path_for(&self, series: &str) -> PathBuf {
        match self.files.iter().find(|name| strip_extension(name) == series) {
            Some(name) => self.root.join(name),
            None => self.root.join(format!("{}.{}", series, self.extension)),
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        == Some(true)
}

fn strip_extension(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn catalog_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn test_categories_are_sorted_and_distinct() {
        let dir = catalog_dir(&["UB_300.csv", "PFC300.csv", "UB_350.csv", "SHS350.csv", "notes.txt"]);
        let inv = CatalogInventory::scan_dir(dir.path(), "csv", 3).unwrap();

        assert_eq!(inv.categories(), vec!["PFC", "SHS", "UB_"]);
        assert_eq!(inv.files().len(), 4);
    }

    #[test]
    fn test_series_for_category() {
        let dir = catalog_dir(&["UB_350.csv", "UB_300.csv", "PFC300.csv"]);
        let inv = CatalogInventory::scan_dir(dir.path(), "csv", 3).unwrap();

        assert_eq!(inv.series_for("UB_"), vec!["UB_300", "UB_350"]);
        assert_eq!(inv.series_for("PFC"), vec!["PFC300"]);
        assert!(inv.series_for("XYZ").is_empty());
        assert!(inv.series_for("").is_empty());
    }

    #[test]
    fn test_every_series_maps_to_a_file() {
        let dir = catalog_dir(&["UB310.csv", "UB250.csv", "UC310.csv", "PFC.CSV"]);
        let inv = CatalogInventory::scan_dir(dir.path(), "csv", 2).unwrap();

        for category in inv.categories() {
            for series in inv.series_for(&category) {
                assert!(series.starts_with(&category));
                let on_disk = inv.files().iter().any(|f| strip_extension(f) == series);
                assert!(on_disk, "{} has no catalog file", series);
            }
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = catalog_dir(&["PFC300.CSV"]);
        let inv = CatalogInventory::scan_dir(dir.path(), "csv", 3).unwrap();
        assert_eq!(inv.series_for("PFC"), vec!["PFC300"]);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let err = CatalogInventory::scan_dir(Path::new("/no/such/catalog"), "csv", 3).unwrap_err();
        assert_eq!(err.error_code(), "DIRECTORY_NOT_FOUND");
    }

    #[test]
    fn test_subdirectories_ignored() {
        let dir = catalog_dir(&["UB310.csv"]);
        fs::create_dir(dir.path().join("old.csv")).unwrap();
        let inv = CatalogInventory::scan_dir(dir.path(), "csv", 3).unwrap();
        assert_eq!(inv.files(), &["UB310.csv".to_string()]);
    }

    #[test]
    fn test_path_for_keeps_listed_case() {
        let dir = catalog_dir(&["PFC300.CSV"]);
        let inv = CatalogInventory::scan_dir(dir.path(), "csv", 3).unwrap();
        assert_eq!(inv.path_for("PFC300"), dir.path().join("PFC300.CSV"));
    }

    #[test]
    fn test_path_for_series() {
        let dir = catalog_dir(&["UB310.csv"]);
        let inv = CatalogInventory::scan_dir(dir.path(), "csv", 2).unwrap();
        assert_eq!(inv.path_for("UB310"), dir.path().join("UB310.csv"));
    }
}
