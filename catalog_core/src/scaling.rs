//! # Unit Scaling
//!
//! Catalog tables quote section properties in compact units (`Ix` in
//! 10⁶ mm⁴, `Zx` in 10³ mm³, `Iw` in 10⁹ mm⁶). Downstream hand calculations
//! work in plain mm/N, so every tabulated value is multiplied by a fixed
//! per-column factor. Columns not listed here pass through with factor 1.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Per-column scaling factors (tabulated unit → mm-based unit)
pub const SCALING_FACTORS: [(&str, f64); 10] = [
    ("Ix", 1e6),
    ("Zx", 1e3),
    ("Sx", 1e3),
    ("Iy", 1e6),
    ("Zy", 1e3),
    ("Sy", 1e3),
    ("J", 1e3),
    ("Iw", 1e9),
    ("Zex", 1e3),
    ("Zey", 1e3),
];

static SCALING: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| SCALING_FACTORS.into_iter().collect());

/// Factor applied to a column (1.0 for unlisted columns).
pub fn factor(column: &str) -> f64 {
    SCALING.get(column).copied().unwrap_or(1.0)
}

/// Whether a column has an entry in the scaling table.
pub fn is_scaled(column: &str) -> bool {
    SCALING.contains_key(column)
}

/// Scale a raw tabulated value for a column.
pub fn scale(column: &str, raw: f64) -> f64 {
    raw * factor(column)
}
