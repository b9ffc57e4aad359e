//! Errors raised by automation objects.

use sl_core::UnitError;
use thiserror::Error;

use crate::case::ValidationError;

/// Errors reported by the external object model.
#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Object '{object}' has no property '{property}'")]
    NoSuchProperty { object: String, property: String },

    #[error("Object '{object}' has no sub-object '{name}'")]
    NoSuchObject { object: String, name: String },

    #[error("Object '{object}' has no collection '{name}'")]
    NoSuchCollection { object: String, name: String },

    #[error("Collection '{collection}' of '{object}' has no item '{key}'")]
    NoSuchItem {
        object: String,
        collection: String,
        key: String,
    },

    #[error("Object '{object}' does not support method '{method}'")]
    NoSuchMethod { object: String, method: String },

    #[error("Property '{property}' of '{object}' is not assignable")]
    NotAssignable { object: String, property: String },

    #[error("Property '{property}' of '{object}' holds {expected} values, got {found}")]
    LengthMismatch {
        object: String,
        property: String,
        expected: usize,
        found: usize,
    },

    #[error("No active document")]
    NoActiveDocument,

    #[error("Case has been closed")]
    CaseClosed,

    #[error("Application has quit")]
    ApplicationQuit,

    #[error("Case has no backing file")]
    NoBackingFile,

    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    #[error("Invalid case: {0}")]
    InvalidCase(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AutomationResult<T> = Result<T, AutomationError>;
