//! The automation object model as seen from Rust.
//!
//! An [`ObjectHandle`] is an opaque reference to one object in the external application's
//! live object graph. Every method is one blocking round trip. Unit strings are passed
//! through verbatim; only the external side interprets them.

use std::fmt;
use std::path::Path;

use crate::error::{AutomationError, AutomationResult};

/// External classification of a numeric property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyState {
    /// Output of a solved calculation; read-only from outside.
    Calculated,
    /// Input that may be assigned from outside.
    Free,
}

impl PropertyState {
    /// Raw `State` flag the external object reports for an assignable property.
    pub const FREE_FLAG: i32 = 1;

    pub fn from_flag(flag: i32) -> Self {
        if flag == Self::FREE_FLAG {
            PropertyState::Free
        } else {
            PropertyState::Calculated
        }
    }

    pub fn flag(self) -> i32 {
        match self {
            PropertyState::Free => Self::FREE_FLAG,
            PropertyState::Calculated => 0,
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, PropertyState::Free)
    }
}

impl fmt::Display for PropertyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyState::Calculated => write!(f, "calculated"),
            PropertyState::Free => write!(f, "free"),
        }
    }
}

/// One object inside the external application.
///
/// Handles are not `Clone`; each wrapper owns the handle it reads through.
pub trait ObjectHandle: fmt::Debug {
    /// Display name of the object.
    fn name(&self) -> AutomationResult<String>;

    /// External type tag (e.g. `heatexop`).
    fn type_name(&self) -> AutomationResult<String>;

    /// `Property.GetValue(unit)`
    fn get_value(&self, property: &str, unit: &str) -> AutomationResult<f64>;

    /// `Property.SetValue(value, unit)`
    fn set_value(&self, property: &str, value: f64, unit: &str) -> AutomationResult<()>;

    /// `Property.GetValues(unit)` for per-component properties.
    fn get_values(&self, property: &str, unit: &str) -> AutomationResult<Vec<f64>>;

    /// `Property.SetValues(values, unit)` for per-component properties.
    fn set_values(&self, property: &str, values: &[f64], unit: &str) -> AutomationResult<()>;

    /// Raw `Property.State` flag.
    fn state(&self, property: &str) -> AutomationResult<i32>;

    /// Raw per-element `State` flags of a per-component property.
    fn states(&self, property: &str) -> AutomationResult<Vec<i32>>;

    /// Text-valued property (e.g. `Title`, `PropertyPackageName`).
    fn text(&self, property: &str) -> AutomationResult<String>;

    /// Name-list property (e.g. `Components`, `UpstreamOpers`).
    fn names(&self, property: &str) -> AutomationResult<Vec<String>>;

    /// Boolean property assignment (e.g. `Visible`, `CanSolve`).
    fn set_flag(&self, property: &str, on: bool) -> AutomationResult<()>;

    /// Named sub-object.
    fn child(&self, name: &str) -> AutomationResult<Box<dyn ObjectHandle>>;

    /// Enumerate a named collection.
    fn collection(&self, name: &str) -> AutomationResult<Vec<Box<dyn ObjectHandle>>>;

    /// Address one item of a collection by key.
    fn item(&self, collection: &str, key: &str) -> AutomationResult<Box<dyn ObjectHandle>> {
        for item in self.collection(collection)? {
            if item.name()? == key {
                return Ok(item);
            }
        }
        Err(AutomationError::NoSuchItem {
            object: self.name()?,
            collection: collection.to_string(),
            key: key.to_string(),
        })
    }

    /// Call a no-argument method (e.g. `Save`, `Close`).
    fn invoke(&self, method: &str) -> AutomationResult<()>;

    /// `State` mapped onto [`PropertyState`].
    fn property_state(&self, property: &str) -> AutomationResult<PropertyState> {
        self.state(property).map(PropertyState::from_flag)
    }

    /// Per-element `State` mapped onto [`PropertyState`].
    fn property_states(&self, property: &str) -> AutomationResult<Vec<PropertyState>> {
        Ok(self
            .states(property)?
            .into_iter()
            .map(PropertyState::from_flag)
            .collect())
    }
}

/// The application: entry point for opening or attaching to a case.
pub trait Application {
    /// Open a case file and make it the active document.
    fn open_case(&self, path: &Path) -> AutomationResult<Box<dyn ObjectHandle>>;

    /// Attach to the case that is already open.
    fn active_document(&self) -> AutomationResult<Box<dyn ObjectHandle>>;

    /// Shut the application down.
    fn quit(&self) -> AutomationResult<()>;
}
