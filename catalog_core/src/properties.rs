//! # Derived Section Properties
//!
//! Turns a [`SectionRow`] into the flat property mapping used for hand
//! calculations: grade and modulus are derived, and every numeric cell is
//! multiplied by its factor from [`crate::scaling`].
//!
//! Cells fall into three groups:
//!
//! - **empty** (blank, `-`, `NaN`): left out of the mapping
//! - **numeric**: scaled and stored as [`PropertyValue::Number`]
//! - **text**: kept unchanged in [`DerivedProperties::text`] (e.g. `Type = "UB"`)
//!
//! A text cell in a column that the scaling table expects to be numeric is
//! recorded as [`PropertyValue::Unavailable`] with a warning. It is never
//! coerced to zero.
//!
//! ## Example
//!
//! ```rust
//! use catalog_core::grade::{GradePolicy, ModulusPolicy};
//! use catalog_core::properties::derive;
//! use catalog_core::table::SectionRow;
//!
//! let row = SectionRow {
//!     description: "310UB46.2 (GR300)".to_string(),
//!     cells: vec![
//!         ("Description".to_string(), "310UB46.2 (GR300)".to_string()),
//!         ("Type".to_string(), "UB".to_string()),
//!         ("Ix".to_string(), "99.5".to_string()),
//!     ],
//! };
//!
//! let props = derive(&row, "UB310", GradePolicy::Description, ModulusPolicy::GradeTable);
//! assert_eq!(props.number("Ix"), Some(99.5e6));
//! assert_eq!(props.number("E"), Some(200_000.0));
//! assert_eq!(props.text("Type"), Some("UB"));
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::grade::{Grade, GradePolicy, Modulus, ModulusPolicy};
use crate::scaling;
use crate::table::SectionRow;

/// Synthetic key for the elastic modulus
pub const MODULUS_KEY: &str = "E";

/// A scaled property value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Scaled numeric value
    Number(f64),
    /// Value could not be read as a number
    Unavailable,
}

impl PropertyValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Unavailable => None,
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Number(v) => write!(f, "{:.3e}", v),
            PropertyValue::Unavailable => write!(f, "N/A"),
        }
    }
}

/// Properties derived for one selected member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedProperties {
    /// Series the member was selected from
    pub series: String,

    /// Member description
    pub description: String,

    /// Derived material grade
    pub grade: Grade,

    /// Derived elastic modulus
    pub modulus: Modulus,

    /// Scaled values keyed by column name (plus `E`), `E` first then file order
    pub values: Vec<(String, PropertyValue)>,

    /// Non-numeric cells passed through unchanged
    pub text: Vec<(String, String)>,

    /// Cells that should have been numeric but were not
    pub warnings: Vec<String>,
}

impl DerivedProperties {
    /// Value for a key, numeric or unavailable
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Numeric value for a key
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_f64)
    }

    /// Text attribute for a key
    pub fn text(&self, key: &str) -> Option<&str> {
        self.text.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Keys of the scaled mapping, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

enum Cell {
    Empty,
    Number(f64),
    Text,
}

fn classify(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "—" {
        return Cell::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        Ok(_) => Cell::Empty,
        Err(_) => Cell::Text,
    }
}

/// Insert or replace a key, keeping its original position.
///
/// A tabulated `E` column replaces the modulus derived from the grade.
fn set_value(values: &mut Vec<(String, PropertyValue)>, key: &str, value: PropertyValue) {
    match values.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value,
        None => values.push((key.to_string(), value)),
    }
}

/// Derive grade, modulus and scaled values for a resolved row.
///
/// The result is a fresh mapping; nothing from a previous selection carries
/// over.
pub fn derive(
    row: &SectionRow,
    series: &str,
    grade_policy: GradePolicy,
    modulus_policy: ModulusPolicy,
) -> DerivedProperties {
    let grade = grade_policy.derive(series, &row.description);
    let modulus = modulus_policy.modulus(&grade);

    let mut values = Vec::with_capacity(row.cells.len() + 1);
    let mut text = Vec::new();
    let mut warnings = Vec::new();

    values.push((
        MODULUS_KEY.to_string(),
        modulus.mpa().map(PropertyValue::Number).unwrap_or(PropertyValue::Unavailable),
    ));

    for (column, raw) in &row.cells {
        match classify(raw) {
            Cell::Empty => {}
            Cell::Number(v) => set_value(&mut values, column, PropertyValue::Number(scaling::scale(column, v))),
            Cell::Text if scaling::is_scaled(column) => {
                let message = format!("{} = '{}' is not numeric; recorded as unavailable", column, raw.trim());
                warn!(series, member = %row.description, "{}", message);
                warnings.push(message);
                set_value(&mut values, column, PropertyValue::Unavailable);
            }
            Cell::Text => text.push((column.clone(), raw.trim().to_string())),
        }
    }

    DerivedProperties {
        series: series.to_string(),
        description: row.description.clone(),
        grade,
        modulus,
        values,
        text,
        warnings,
    }
}
