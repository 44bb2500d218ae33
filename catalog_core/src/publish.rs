//! # Publishing Properties as Named Variables
//!
//! Hand calculations refer to section properties by short names such as
//! `Ix1` or `Zx2`. Publishing copies selected keys out of the current
//! [`DerivedProperties`] into a [`Namespace`] under `<Key><Suffix>`, so two
//! members picked in the same session can sit side by side.
//!
//! Bindings accumulate: a later publish only replaces names it reuses.
//!
//! ## Namespace Files
//!
//! A namespace can be written to disk as JSON for other tools to read.
//! Saves are atomic: the JSON goes to a `.tmp` sibling, is synced, then
//! renamed over the target.
//!
//! ```rust,no_run
//! use catalog_core::publish::Namespace;
//! use std::path::Path;
//!
//! let mut ns = Namespace::new();
//! ns.bind("Ix1", 99.5e6);
//! ns.save(Path::new("section_vars.json"))?;
//! # Ok::<(), catalog_core::errors::CatalogError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{CatalogError, CatalogResult};
use crate::properties::{DerivedProperties, PropertyValue};

/// Current schema version for namespace files
pub const NAMESPACE_VERSION: &str = "0.1.0";

/// Named values available to downstream expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// Schema version (for compatibility checks)
    pub version: String,

    /// When a binding was last added or replaced
    pub modified: DateTime<Utc>,

    /// Bindings, sorted by name
    bindings: BTreeMap<String, f64>,
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace::new()
    }
}

impl Namespace {
    pub fn new() -> Self {
        Namespace {
            version: NAMESPACE_VERSION.to_string(),
            modified: Utc::now(),
            bindings: BTreeMap::new(),
        }
    }

    /// Bind a name, replacing any previous value. Returns the previous value.
    pub fn bind(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.modified = Utc::now();
        self.bindings.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.bindings.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Write the namespace to a JSON file with atomic write semantics.
    ///
    /// The `.json.tmp` sibling is removed whenever the save fails.
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| CatalogError::SerializationError {
            reason: e.to_string(),
        })?;

        let tmp_path = path.with_extension("json.tmp");
        let result = write_synced(&tmp_path, json.as_bytes()).and_then(|()| {
            fs::rename(&tmp_path, path)
                .map_err(|e| CatalogError::file_error("rename to final", path.display().to_string(), e.to_string()))
        });

        if result.is_err() && tmp_path.exists() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    /// Read a namespace file written by [`Namespace::save`].
    ///
    /// Files from a different major version (or a newer 0.x minor) are rejected.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CatalogError::file_error("read", path.display().to_string(), e.to_string()))?;

        let namespace: Namespace = serde_json::from_str(&contents).map_err(|e| CatalogError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
        check_version(&namespace.version)?;
        Ok(namespace)
    }

    /// Load an existing namespace file, or start a fresh one if it is absent.
    pub fn load_or_new(path: &Path) -> CatalogResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> CatalogResult<()> {
    let io_err = |op: &str, e: std::io::Error| CatalogError::file_error(op, path.display().to_string(), e.to_string());

    let mut file = File::create(path).map_err(|e| io_err("create temp file", e))?;
    file.write_all(bytes).map_err(|e| io_err("write temp file", e))?;
    file.sync_all().map_err(|e| io_err("sync temp file", e))
}

fn version_parts(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.').map(|p| p.parse::<u32>());
    let major = parts.next()?.ok()?;
    let minor = parts.next().and_then(Result::ok).unwrap_or(0);
    Some((major, minor))
}

fn check_version(file_version: &str) -> CatalogResult<()> {
    let mismatch = || CatalogError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: NAMESPACE_VERSION.to_string(),
    };

    let (file_major, file_minor) = version_parts(file_version).ok_or_else(mismatch)?;
    let (major, minor) = version_parts(NAMESPACE_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

/// Outcome of a publish request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishReport {
    /// Composed name → value, in request order
    pub bindings: Vec<(String, f64)>,

    /// Keys that were absent or not numeric
    pub warnings: Vec<String>,
}

impl PublishReport {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.bindings.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// Compose the variable name for a key (`Ix` + `1` → `Ix1`).
pub fn binding_name(key: &str, suffix: &str) -> String {
    format!("{}{}", key, suffix)
}

/// Publish `keys` from the current mapping into `namespace`.
///
/// Fails with [`CatalogError::NoSelection`] when there is no current mapping;
/// absent or non-numeric keys are reported as warnings.
pub fn publish<S: AsRef<str>>(
    current: Option<&DerivedProperties>,
    keys: &[S],
    suffix: &str,
    namespace: &mut Namespace,
) -> CatalogResult<PublishReport> {
    let props = match current {
        Some(p) if !p.is_empty() => p,
        _ => return Err(CatalogError::NoSelection),
    };

    let mut report = PublishReport::default();

    for key in keys {
        let key = key.as_ref();
        match props.get(key) {
            Some(PropertyValue::Number(value)) => {
                let name = binding_name(key, suffix);
                namespace.bind(name.clone(), *value);
                info!(name = %name, value = *value, member = %props.description, "published property");
                report.bindings.push((name, *value));
            }
            Some(PropertyValue::Unavailable) => {
                let message = format!("{} not available or not numeric", key);
                warn!("{}", message);
                report.warnings.push(message);
            }
            None if props.text(key).is_some() => {
                let message = format!("{} is not numeric", key);
                warn!("{}", message);
                report.warnings.push(message);
            }
            None => {
                let message = format!("{} not found", key);
                warn!("{}", message);
                report.warnings.push(message);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::{Grade, Modulus};

    fn props() -> DerivedProperties {
        DerivedProperties {
            series: "UB310".to_string(),
            description: "310UB46.2 (GR300)".to_string(),
            grade: Grade::Known("300".to_string()),
            modulus: Modulus::Mpa(200_000.0),
            values: vec![
                ("E".to_string(), PropertyValue::Number(200_000.0)),
                ("Ix".to_string(), PropertyValue::Number(99.5e6)),
                ("Zx".to_string(), PropertyValue::Number(633e3)),
                ("Iw".to_string(), PropertyValue::Unavailable),
            ],
            text: vec![("Type".to_string(), "UB".to_string())],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_publish_before_selection_fails() {
        let mut ns = Namespace::new();
        let err = publish(None, &["Ix"], "1", &mut ns).unwrap_err();
        assert_eq!(err, CatalogError::NoSelection);
        assert!(ns.is_empty());
    }

    #[test]
    fn test_publish_empty_mapping_fails() {
        let mut empty = props();
        empty.values.clear();
        let mut ns = Namespace::new();
        let err = publish(Some(&empty), &["Ix"], "1", &mut ns).unwrap_err();
        assert_eq!(err.error_code(), "NO_SELECTION");
    }

    #[test]
    fn test_publish_composes_names() {
        let p = props();
        let mut ns = Namespace::new();
        let report = publish(Some(&p), &["Ix", "Zx", "E"], "1", &mut ns).unwrap();

        assert_eq!(report.get("Ix1"), Some(99.5e6));
        assert_eq!(report.get("Zx1"), Some(633e3));
        assert_eq!(report.get("E1"), Some(200_000.0));
        assert_eq!(ns.get("Ix1"), Some(99.5e6));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_and_unavailable_keys_warn() {
        let p = props();
        let mut ns = Namespace::new();
        let report = publish(Some(&p), &["Ix", "Iw", "Sy", "Type"], "", &mut ns).unwrap();

        assert_eq!(report.bindings, vec![("Ix".to_string(), 99.5e6)]);
        assert_eq!(
            report.warnings,
            vec![
                "Iw not available or not numeric".to_string(),
                "Sy not found".to_string(),
                "Type is not numeric".to_string(),
            ]
        );
        assert!(ns.get("Iw").is_none());
        assert!(ns.get("Type").is_none());
    }

    #[test]
    fn test_bindings_accumulate_and_overwrite() {
        let p = props();
        let mut ns = Namespace::new();
        publish(Some(&p), &["Ix"], "1", &mut ns).unwrap();
        publish(Some(&p), &["Ix"], "2", &mut ns).unwrap();
        assert_eq!(ns.len(), 2);

        let mut lighter = props();
        lighter.values[1].1 = PropertyValue::Number(86.4e6);
        publish(Some(&lighter), &["Ix"], "1", &mut ns).unwrap();
        assert_eq!(ns.len(), 2);
        assert_eq!(ns.get("Ix1"), Some(86.4e6));
        assert_eq!(ns.get("Ix2"), Some(99.5e6));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");

        let mut ns = Namespace::new();
        ns.bind("Ix1", 99.5e6);
        ns.bind("Zx1", 633e3);
        ns.save(&path).unwrap();

        assert!(!path.with_extension("json.tmp").exists());

        let loaded = Namespace::load(&path).unwrap();
        assert_eq!(loaded.get("Ix1"), Some(99.5e6));
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.version, NAMESPACE_VERSION);
    }

    #[test]
    fn test_load_or_new() {
        let dir = tempfile::tempdir().unwrap();
        let ns = Namespace::load_or_new(&dir.path().join("absent.json")).unwrap();
        assert!(ns.is_empty());
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("vars.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();

        let mut ns = Namespace::new();
        ns.bind("Ix1", 99.5e6);
        assert!(ns.save(&target).is_err());
        assert!(!target.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_rejects_other_major_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");

        let mut ns = Namespace::new();
        ns.bind("Ix1", 99.5e6);
        ns.version = "1.0.0".to_string();
        ns.save(&path).unwrap();

        let err = Namespace::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_check() {
        assert!(check_version(NAMESPACE_VERSION).is_ok());
        assert!(check_version("0.0.9").is_ok());
        assert!(check_version("0.2.0").is_err());
        assert!(check_version("garbage").is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Namespace::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
