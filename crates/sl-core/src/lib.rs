//! sl-core: stable foundation for simlink.
//!
//! Contains:
//! - units (unit-string table backed by uom SI quantities)
//! - numeric (finiteness checks, read-back tolerance)
//! - ids (arena ids for in-memory object graphs)
//! - sentinel (the "empty" setpoint and its external numeric encoding)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod sentinel;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::ObjectId;
pub use numeric::{Tolerance, ensure_finite};
pub use sentinel::{EMPTY_VALUE, Setpoint, is_empty_value};
pub use units::{Quantity, UnitDef, UnitError, parse_unit};
