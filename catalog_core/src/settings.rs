//! # Catalog Settings
//!
//! Session-wide settings for the resolver: where the catalog lives, how
//! categories are cut from filenames, and which grade/modulus policies apply.
//!
//! Settings serialize to TOML. Every field has a default, so a settings file
//! only needs to name what it changes:
//!
//! ```toml
//! library_folder = "SteelLibrary/Members/Main"
//! grade_policy = "series"
//! modulus_policy = "fixed"
//! display_geom_props = ["Ix", "Zx", "Sx"]
//! auto_define_props = ["Ix", "Zx"]
//! auto_define_suffix = "1"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CatalogError, CatalogResult};
use crate::grade::{GradePolicy, ModulusPolicy};

/// Default catalog location, relative to the working directory
pub const DEFAULT_LIBRARY_FOLDER: &str = "SteelLibrary/Members/Main";

/// Default catalog file extension (matched case-insensitively)
pub const DEFAULT_EXTENSION: &str = "csv";

/// Default number of leading filename characters that form a category
pub const DEFAULT_CATEGORY_PREFIX_LEN: usize = 3;

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory holding one catalog file per series
    pub library_folder: PathBuf,

    /// Catalog file extension, without the dot
    pub extension: String,

    /// Number of leading filename characters that form the category key
    pub category_prefix_len: usize,

    /// How the material grade is derived
    pub grade_policy: GradePolicy,

    /// How the elastic modulus is derived
    pub modulus_policy: ModulusPolicy,

    /// Columns shown as a raw-value table when a member is selected
    pub display_geom_props: Vec<String>,

    /// Keys published automatically on every member selection
    pub auto_define_props: Vec<String>,

    /// Suffix appended to auto-defined names (e.g. "1" gives `Ix1`)
    pub auto_define_suffix: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            library_folder: PathBuf::from(DEFAULT_LIBRARY_FOLDER),
            extension: DEFAULT_EXTENSION.to_string(),
            category_prefix_len: DEFAULT_CATEGORY_PREFIX_LEN,
            grade_policy: GradePolicy::default(),
            modulus_policy: ModulusPolicy::default(),
            display_geom_props: Vec::new(),
            auto_define_props: Vec::new(),
            auto_define_suffix: String::new(),
        }
    }
}

impl CatalogSettings {
    /// Settings pointing at a specific catalog directory, everything else default.
    pub fn for_folder(library_folder: impl Into<PathBuf>) -> Self {
        CatalogSettings {
            library_folder: library_folder.into(),
            ..CatalogSettings::default()
        }
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CatalogError::file_error("read settings", path.display().to_string(), e.to_string()))?;

        let settings: CatalogSettings = toml::from_str(&contents).map_err(|e| CatalogError::SerializationError {
            reason: format!("Invalid settings in {}: {}", path.display(), e),
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the inventory cannot work with.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.category_prefix_len == 0 {
            return Err(CatalogError::invalid_input(
                "category_prefix_len",
                "0",
                "Category prefix must be at least one character",
            ));
        }
        if self.extension.trim().is_empty() {
            return Err(CatalogError::invalid_input(
                "extension",
                self.extension.clone(),
                "Catalog extension must not be empty",
            ));
        }
        Ok(())
    }
}
