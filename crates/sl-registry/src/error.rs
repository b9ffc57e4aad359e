use thiserror::Error;

/// Failures the registry itself detects. Accessor failures use the entity's own error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Property '{property}' of {entity} is read-only")]
    ReadOnly {
        entity: &'static str,
        property: &'static str,
    },

    #[error("Property '{property}' has no accessor registered for {entity}")]
    NotRegistered {
        entity: &'static str,
        property: &'static str,
    },
}
