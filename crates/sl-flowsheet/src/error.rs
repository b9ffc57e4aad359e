//! Error types for the flowsheet wrappers.

use sl_automation::{AutomationError, PropertyState};
use sl_core::CoreError;
use sl_registry::DispatchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowsheetError {
    /// Write attempted on a property the remote object does not report as free.
    #[error("Property '{property}' of '{entity}' is {state}, not free")]
    NotFree {
        entity: String,
        property: String,
        state: PropertyState,
    },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Main tower of column '{column}' was not located")]
    NotLocated { column: String },

    #[error("Unknown component '{component}' (components: {known})")]
    UnknownComponent { component: String, known: String },

    #[error("{kind} not found: {name}")]
    EntityNotFound { kind: &'static str, name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    #[error("Automation error: {0}")]
    Automation(#[from] AutomationError),
}

pub type FlowsheetResult<T> = Result<T, FlowsheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_free_display() {
        let err = FlowsheetError::NotFree {
            entity: "Feed".to_string(),
            property: "Temperature".to_string(),
            state: PropertyState::Calculated,
        };
        let msg = err.to_string();
        assert!(msg.contains("Feed"));
        assert!(msg.contains("calculated"));
    }

    #[test]
    fn read_only_is_transparent() {
        let err: FlowsheetError = DispatchError::ReadOnly {
            entity: "material stream",
            property: "MASS_DENSITY",
        }
        .into();
        assert!(err.to_string().starts_with("Property 'MASS_DENSITY'"));
    }
}
