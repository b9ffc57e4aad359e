//! sl-automation: the external application's automation object model.
//!
//! Provides:
//! - [`ObjectHandle`] / [`Application`]: the trait seam every wrapper reads through
//! - [`PropertyState`]: the `Free` / `Calculated` classification of numeric properties
//! - [`case`]: YAML/JSON case files describing an offline simulation case
//! - [`memory`]: an in-memory implementation of the object model
//!
//! # Example
//!
//! ```
//! use sl_automation::{Application, MemoryApplication, PropertyState, names};
//! use sl_automation::case::{CaseDef, FluidPackageDef, PropertyDef, StreamDef};
//!
//! let case = CaseDef {
//!     title: "demo".into(),
//!     fluid_package: FluidPackageDef {
//!         property_package: "Peng-Robinson".into(),
//!         components: vec!["Methane".into()],
//!     },
//!     solver_active: true,
//!     visible: false,
//!     material_streams: vec![
//!         StreamDef::new("Feed").with_property("Pressure", PropertyDef::free(10.0, "bar")),
//!     ],
//!     energy_streams: vec![],
//!     operations: vec![],
//! };
//!
//! let app = MemoryApplication::with_active_case(&case).unwrap();
//! let doc = app.active_document().unwrap();
//! let feed = doc
//!     .child(names::FLOWSHEET).unwrap()
//!     .item(names::MATERIAL_STREAMS, "Feed").unwrap();
//!
//! assert_eq!(feed.property_state("Pressure").unwrap(), PropertyState::Free);
//! let kpa = feed.get_value("Pressure", "kPa").unwrap();
//! assert!((kpa - 1000.0).abs() < 1e-9);
//! ```

pub mod case;
pub mod error;
pub mod handle;
pub mod memory;
pub mod names;

pub use error::{AutomationError, AutomationResult};
pub use handle::{Application, ObjectHandle, PropertyState};
pub use memory::{Call, CallKind, MemoryApplication, MemoryHandle, MemoryModel};
