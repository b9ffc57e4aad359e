//! Unit operation wrappers and the type-tag factory.

mod column;
mod exchanger;
mod generic;
mod reactor;

use std::fmt;

use sl_automation::ObjectHandle;
use sl_registry::{ReadBatch, ReadReport, WriteBatch, WriteReport};
use tracing::debug;

use crate::dispatch::PropertyDispatch;
use crate::entity::{Entity, EntityCore};
use crate::error::FlowsheetResult;

pub use column::{ColumnProperty, DistillationColumn};
pub use exchanger::{ExchangerProperty, HeatExchanger, Heater, HeaterProperty};
pub use generic::{GenericOperation, NoProperty};
pub use reactor::{PlugFlowReactor, ReactorProperty};

/// Wrapper kind chosen for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Generic,
    Heater,
    HeatExchanger,
    Column,
    PlugFlowReactor,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::Heater => write!(f, "heater"),
            Self::HeatExchanger => write!(f, "heat exchanger"),
            Self::Column => write!(f, "column"),
            Self::PlugFlowReactor => write!(f, "plug-flow reactor"),
        }
    }
}

/// Builds a specialized wrapper from an operation handle.
pub type Constructor = fn(Box<dyn ObjectHandle>) -> FlowsheetResult<UnitOperation>;

/// External type tag → wrapper constructor. Tags are matched lower-case.
const FACTORY: &[(&str, Constructor)] = &[
    ("heaterop", Heater::wrap),
    ("coolerop", Heater::wrap),
    ("heatexop", HeatExchanger::wrap),
    ("distillation", DistillationColumn::wrap),
    ("absorber", DistillationColumn::wrap),
    ("reboiledabsorber", DistillationColumn::wrap),
    ("refluxedabsorber", DistillationColumn::wrap),
    ("pfreactorop", PlugFlowReactor::wrap),
];

/// Constructor registered for `type_tag`, if any.
pub fn constructor_for(type_tag: &str) -> Option<Constructor> {
    let tag = type_tag.to_ascii_lowercase();
    FACTORY
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, ctor)| *ctor)
}

/// One unit operation of the flowsheet.
#[derive(Debug)]
pub enum UnitOperation {
    Generic(GenericOperation),
    Heater(Heater),
    HeatExchanger(HeatExchanger),
    Column(DistillationColumn),
    PlugFlowReactor(PlugFlowReactor),
}

impl UnitOperation {
    /// Wrap an operation handle according to its type tag; unknown tags get the generic wrapper.
    pub fn from_handle(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        let type_tag = handle.type_name()?;
        match constructor_for(&type_tag) {
            Some(ctor) => ctor(handle),
            None => {
                debug!(type_tag = %type_tag, "no specialized wrapper");
                GenericOperation::wrap(handle)
            }
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Generic(_) => OperationKind::Generic,
            Self::Heater(_) => OperationKind::Heater,
            Self::HeatExchanger(_) => OperationKind::HeatExchanger,
            Self::Column(_) => OperationKind::Column,
            Self::PlugFlowReactor(_) => OperationKind::PlugFlowReactor,
        }
    }

    pub fn get_properties(&self, batch: &ReadBatch) -> FlowsheetResult<ReadReport> {
        match self {
            Self::Generic(op) => op.get_properties(batch),
            Self::Heater(op) => op.get_properties(batch),
            Self::HeatExchanger(op) => op.get_properties(batch),
            Self::Column(op) => op.get_properties(batch),
            Self::PlugFlowReactor(op) => op.get_properties(batch),
        }
    }

    pub fn set_properties(&self, batch: &WriteBatch) -> FlowsheetResult<WriteReport> {
        match self {
            Self::Generic(op) => op.set_properties(batch),
            Self::Heater(op) => op.set_properties(batch),
            Self::HeatExchanger(op) => op.set_properties(batch),
            Self::Column(op) => op.set_properties(batch),
            Self::PlugFlowReactor(op) => op.set_properties(batch),
        }
    }

    pub fn accepted_properties(&self) -> &'static [&'static str] {
        match self {
            Self::Generic(_) => GenericOperation::accepted_properties(),
            Self::Heater(_) => Heater::accepted_properties(),
            Self::HeatExchanger(_) => HeatExchanger::accepted_properties(),
            Self::Column(_) => DistillationColumn::accepted_properties(),
            Self::PlugFlowReactor(_) => PlugFlowReactor::accepted_properties(),
        }
    }

    pub fn as_heater(&self) -> Option<&Heater> {
        match self {
            Self::Heater(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_heat_exchanger(&self) -> Option<&HeatExchanger> {
        match self {
            Self::HeatExchanger(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&DistillationColumn> {
        match self {
            Self::Column(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_reactor(&self) -> Option<&PlugFlowReactor> {
        match self {
            Self::PlugFlowReactor(op) => Some(op),
            _ => None,
        }
    }
}

impl Entity for UnitOperation {
    fn core(&self) -> &EntityCore {
        match self {
            Self::Generic(op) => op.core(),
            Self::Heater(op) => op.core(),
            Self::HeatExchanger(op) => op.core(),
            Self::Column(op) => op.core(),
            Self::PlugFlowReactor(op) => op.core(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_tags_are_lower_case_and_unique() {
        let mut tags: Vec<&str> = FACTORY.iter().map(|(t, _)| *t).collect();
        for tag in &tags {
            assert_eq!(tag.to_ascii_lowercase(), *tag);
        }
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), FACTORY.len());
    }

    #[test]
    fn lookup_ignores_case() {
        assert!(constructor_for("HeatExOp").is_some());
        assert!(constructor_for("PFReactorOp").is_some());
        assert!(constructor_for("mixerop").is_none());
    }
}
