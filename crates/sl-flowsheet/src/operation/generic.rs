use std::sync::OnceLock;

use sl_automation::ObjectHandle;
use sl_registry::{PropertyKind, Registry};

use super::UnitOperation;
use crate::dispatch::PropertyDispatch;
use crate::entity::{Entity, EntityCore};
use crate::error::{FlowsheetError, FlowsheetResult};

/// Property set of operations without a specialized wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoProperty {}

impl PropertyKind for NoProperty {
    fn all() -> &'static [Self] {
        &[]
    }

    fn canonical_name(self) -> &'static str {
        match self {}
    }

    fn default_unit(self) -> &'static str {
        match self {}
    }
}

/// Operation of a type with no specialized wrapper: name, type tag and connections only.
#[derive(Debug)]
pub struct GenericOperation {
    core: EntityCore,
}

impl GenericOperation {
    pub fn new(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        Ok(Self {
            core: EntityCore::operation(handle)?,
        })
    }

    pub(crate) fn wrap(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<UnitOperation> {
        Self::new(handle).map(UnitOperation::Generic)
    }
}

impl Entity for GenericOperation {
    fn core(&self) -> &EntityCore {
        &self.core
    }
}

impl PropertyDispatch for GenericOperation {
    type Kind = NoProperty;

    fn registry() -> &'static Registry<Self, NoProperty, FlowsheetError> {
        static REGISTRY: OnceLock<Registry<GenericOperation, NoProperty, FlowsheetError>> =
            OnceLock::new();
        REGISTRY.get_or_init(|| Registry::builder("operation").build())
    }
}
