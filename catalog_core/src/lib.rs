//! # catalog_core - Steel Section Catalog Resolver
//!
//! `catalog_core` narrows a folder of steel section catalogs down to one
//! member and hands back its properties in consistent mm/N units, ready for
//! hand calculations.
//!
//! ## Pipeline
//!
//! ```text
//! folder ─► categories ─► series ─► table ─► row ─► scaled properties ─► named variables
//! ```
//!
//! - A **category** is the fixed-length filename prefix (`PFC`, `UB_`).
//! - A **series** is one catalog file (`UB_300.csv`).
//! - A **member** is one row, keyed by its `Description`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalog_core::session::SelectorSession;
//! use catalog_core::settings::CatalogSettings;
//!
//! let mut session = SelectorSession::open(CatalogSettings::default())?;
//! println!("{:?}", session.category_options());
//!
//! session.select_category("UB_");
//! session.select_series("UB_300");
//! session.select_member("310UB46.2 (GR300)");
//!
//! if let Some(props) = session.derived() {
//!     println!("Ix = {:?} mm^4", props.number("Ix"));
//! }
//! # Ok::<(), catalog_core::errors::CatalogError>(())
//! ```
//!
//! ## Modules
//!
//! - [`inventory`] - Catalog folder scan, categories and series
//! - [`table`] - Series file loading and row lookup
//! - [`grade`] - Grade and elastic modulus policies
//! - [`scaling`] - Per-column unit scaling factors
//! - [`properties`] - Derived property mapping for a member
//! - [`publish`] - Named variable bindings and namespace files
//! - [`session`] - The cascading selection state
//! - [`settings`] - TOML-backed resolver settings
//! - [`errors`] - Structured error types

pub mod errors;
pub mod grade;
pub mod inventory;
pub mod properties;
pub mod publish;
pub mod scaling;
pub mod session;
pub mod settings;
pub mod table;

// Re-export commonly used types at crate root for convenience
pub use errors::{CatalogError, CatalogResult};
pub use properties::{DerivedProperties, PropertyValue};
pub use publish::Namespace;
pub use session::SelectorSession;
pub use settings::CatalogSettings;
