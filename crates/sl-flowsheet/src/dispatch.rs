//! Bulk property access shared by every wrapper kind.

use sl_registry::{PropertyKind, ReadBatch, ReadReport, Registry, WriteBatch, WriteReport};

use crate::error::{FlowsheetError, FlowsheetResult};

/// A wrapper with a named-property registry.
pub trait PropertyDispatch: Sized + 'static {
    type Kind: PropertyKind;

    /// Registry for this wrapper kind, built on first use.
    fn registry() -> &'static Registry<Self, Self::Kind, FlowsheetError>;

    /// Read every recognized label in `batch`, in order.
    fn get_properties(&self, batch: &ReadBatch) -> FlowsheetResult<ReadReport> {
        Self::registry().read(self, batch)
    }

    /// Write every recognized label in `batch`, in order. Stops at the first failed write.
    fn set_properties(&self, batch: &WriteBatch) -> FlowsheetResult<WriteReport> {
        Self::registry().write(self, batch)
    }

    /// Canonical names accepted by [`get_properties`](Self::get_properties).
    fn accepted_properties() -> &'static [&'static str] {
        Self::registry().accepted_names()
    }
}
