//! # Selector Session
//!
//! The cascading selection pipeline:
//!
//! ```text
//! category ──► series ──► member ──► derived properties ──► namespace
//!   (menu)      (menu)     (menu)        (mapping)           (bindings)
//! ```
//!
//! Each `select_*` call is the handler for one menu. Selecting at any stage
//! discards everything downstream of it, so the session never shows a table
//! from one series next to a member from another.
//!
//! Diagnostics are plain status lines (the last one is what a front-end shows
//! in its message area). They are cleared at the start of every selection.
//!
//! ## Example
//!
//! ```rust,no_run
//! use catalog_core::session::SelectorSession;
//! use catalog_core::settings::CatalogSettings;
//!
//! let mut session = SelectorSession::open(CatalogSettings::for_folder("assets/catalog"))?;
//! session.select_category("UB_");
//! session.select_series("UB_300");
//! session.select_member("310UB46.2 (GR300)");
//!
//! let vars = session.define_properties("1", &["Ix", "Zx"])?;
//! println!("{:?}", vars);
//! # Ok::<(), catalog_core::errors::CatalogError>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::CatalogResult;
use crate::grade::{Grade, Modulus};
use crate::inventory::CatalogInventory;
use crate::properties::{self, DerivedProperties, PropertyValue};
use crate::publish::{self, Namespace, PublishReport};
use crate::settings::CatalogSettings;
use crate::table::{SectionRow, SeriesTable};

/// Text shown for a missing material type or raw `Ix`
const NOT_AVAILABLE: &str = "N/A";

/// Summary of the selected member's material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSummary {
    pub member: String,
    pub grade: Grade,
    /// Value of the `Type` column, or "Unknown"
    pub material_type: String,
    pub modulus: Modulus,
    /// Raw tabulated `Ix` (10⁶ mm⁴), or "N/A"
    pub ix_raw: String,
}

/// One cascading selection, from category down to published bindings
#[derive(Debug, Clone)]
pub struct SelectorSession {
    settings: CatalogSettings,
    inventory: CatalogInventory,

    category: Option<String>,
    series_options: Vec<String>,

    series: Option<String>,
    table: SeriesTable,
    member_options: Vec<String>,

    row: Option<SectionRow>,
    derived: Option<DerivedProperties>,

    namespace: Namespace,
    diagnostics: Vec<String>,
}

impl SelectorSession {
    /// Scan the catalog folder and start an empty selection.
    pub fn open(settings: CatalogSettings) -> CatalogResult<Self> {
        settings.validate()?;
        let inventory = CatalogInventory::scan(&settings)?;
        Ok(Self::with_inventory(settings, inventory))
    }

    /// Start a session over an inventory that was already scanned.
    pub fn with_inventory(settings: CatalogSettings, inventory: CatalogInventory) -> Self {
        SelectorSession {
            settings,
            inventory,
            category: None,
            series_options: Vec::new(),
            series: None,
            table: SeriesTable::empty(),
            member_options: Vec::new(),
            row: None,
            derived: None,
            namespace: Namespace::new(),
            diagnostics: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Menus
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn inventory(&self) -> &CatalogInventory {
        &self.inventory
    }

    /// Options for the category menu
    pub fn category_options(&self) -> Vec<String> {
        self.inventory.categories()
    }

    /// Options for the series menu (empty until a category is chosen)
    pub fn series_options(&self) -> &[String] {
        &self.series_options
    }

    /// Options for the member menu (empty until a series loads)
    pub fn member_options(&self) -> &[String] {
        &self.member_options
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn selected_series(&self) -> Option<&str> {
        self.series.as_deref()
    }

    pub fn selected_member(&self) -> Option<&str> {
        self.row.as_ref().map(|r| r.description.as_str())
    }

    /// The current series table (empty if nothing loaded or the load failed)
    pub fn table(&self) -> &SeriesTable {
        &self.table
    }

    /// Derived properties of the selected member
    pub fn derived(&self) -> Option<&DerivedProperties> {
        self.derived.as_ref()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Replace the namespace, e.g. with one loaded from disk.
    pub fn set_namespace(&mut self, namespace: Namespace) {
        self.namespace = namespace;
    }

    /// Status lines produced by the latest selection
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    // ------------------------------------------------------------------
    // Selection handlers
    // ------------------------------------------------------------------

    /// Category menu handler: repopulate the series menu.
    pub fn select_category(&mut self, category: &str) {
        self.diagnostics.clear();
        self.clear_series();

        self.series_options = self.inventory.series_for(category);
        self.category = (!category.is_empty()).then(|| category.to_string());

        debug!(category, series = self.series_options.len(), "category selected");
    }

    /// Series menu handler: load the series table and repopulate the member menu.
    ///
    /// The previous table is dropped before the load is attempted. A failed
    /// load leaves the table and member menu empty and records a diagnostic;
    /// the user can pick another series.
    pub fn select_series(&mut self, series: &str) {
        self.diagnostics.clear();
        self.clear_from_series();

        if series.is_empty() {
            return;
        }
        self.series = Some(series.to_string());

        let path = self.inventory.path_for(series);
        match SeriesTable::load(&path) {
            Ok(table) => {
                self.member_options = table.descriptions();
                self.table = table;
            }
            Err(e) => {
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| series.to_string());
                let message = format!("Error reading {}: {}", file, e);
                warn!("{}", message);
                self.diagnostics.push(message);
            }
        }
    }

    /// Member menu handler: resolve the row, derive properties, auto-publish.
    ///
    /// An empty table or an unknown description is a silent no-op.
    pub fn select_member(&mut self, description: &str) {
        self.diagnostics.clear();

        let Some(series) = self.series.clone() else {
            return;
        };
        let Some(row) = self.table.find_row(description) else {
            return;
        };

        let derived = properties::derive(
            &row,
            &series,
            self.settings.grade_policy,
            self.settings.modulus_policy,
        );

        self.diagnostics.push(format!("Selected: {}", derived.description));
        self.diagnostics.push(format!("Grade: {}", derived.grade));
        self.diagnostics.push(format!("E: {}", derived.modulus));
        self.diagnostics.extend(derived.warnings.iter().cloned());

        self.row = Some(row);
        self.derived = Some(derived);

        self.auto_define();
    }

    fn auto_define(&mut self) {
        if self.settings.auto_define_props.is_empty() {
            return;
        }
        let keys = self.settings.auto_define_props.clone();
        let suffix = self.settings.auto_define_suffix.clone();

        match publish::publish(self.derived.as_ref(), &keys, &suffix, &mut self.namespace) {
            Ok(report) => self.record_report(&report),
            Err(e) => self.diagnostics.push(e.to_string()),
        }
    }

    fn record_report(&mut self, report: &PublishReport) {
        for (name, value) in &report.bindings {
            self.diagnostics.push(format!("{} = {:.3e}", name, value));
        }
        self.diagnostics.extend(report.warnings.iter().cloned());
    }

    fn clear_series(&mut self) {
        self.series_options.clear();
        self.clear_from_series();
    }

    fn clear_from_series(&mut self) {
        self.series = None;
        self.table = SeriesTable::empty();
        self.member_options.clear();
        self.row = None;
        self.derived = None;
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Material summary of the selected member
    pub fn material_summary(&self) -> Option<MaterialSummary> {
        let row = self.row.as_ref()?;
        let derived = self.derived.as_ref()?;

        Some(MaterialSummary {
            member: derived.description.clone(),
            grade: derived.grade.clone(),
            material_type: row.section_type().unwrap_or("Unknown").to_string(),
            modulus: derived.modulus,
            ix_raw: row
                .get("Ix")
                .filter(|v| !v.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        })
    }

    /// Raw values of the configured display columns for the selected member.
    ///
    /// Columns missing from the file are shown as "N/A".
    pub fn geometry_view(&self) -> Vec<(String, String)> {
        let Some(row) = self.row.as_ref() else {
            return Vec::new();
        };
        self.settings
            .display_geom_props
            .iter()
            .map(|col| {
                let value = row.get(col).unwrap_or(NOT_AVAILABLE).to_string();
                (col.clone(), value)
            })
            .collect()
    }

    /// Copy of the derived mapping, or the requested subset.
    ///
    /// Requested keys that are absent map to `None`.
    pub fn get_properties(&self, keys: Option<&[&str]>) -> BTreeMap<String, Option<PropertyValue>> {
        let Some(derived) = self.derived.as_ref() else {
            return match keys {
                Some(keys) => keys.iter().map(|k| (k.to_string(), None)).collect(),
                None => BTreeMap::new(),
            };
        };

        match keys {
            None => derived
                .values
                .iter()
                .map(|(k, v)| (k.clone(), Some(*v)))
                .collect(),
            Some(keys) => keys
                .iter()
                .map(|k| (k.to_string(), derived.get(k).copied()))
                .collect(),
        }
    }

    /// Publish keys from the selected member as `<key><suffix>`.
    ///
    /// Returns composed name → value. Fails if no member has been selected.
    pub fn define_properties<S: AsRef<str>>(
        &mut self,
        suffix: &str,
        keys: &[S],
    ) -> CatalogResult<BTreeMap<String, f64>> {
        let report = self.publish(suffix, keys)?;
        Ok(report.bindings.into_iter().collect())
    }

    /// Like [`Self::define_properties`], returning bindings and warnings separately.
    pub fn publish<S: AsRef<str>>(&mut self, suffix: &str, keys: &[S]) -> CatalogResult<PublishReport> {
        let report = publish::publish(self.derived.as_ref(), keys, suffix, &mut self.namespace)?;
        self.record_report(&report);
        Ok(report)
    }
}
