//! Plug-flow reactor.

use std::sync::OnceLock;

use sl_automation::ObjectHandle;
use sl_core::Setpoint;
use sl_registry::{PropertyKind, Registry};

use super::UnitOperation;
use crate::access::{self, RemoteProperty};
use crate::dispatch::PropertyDispatch;
use crate::entity::{Entity, EntityCore};
use crate::error::{FlowsheetError, FlowsheetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactorProperty {
    Length,
    Diameter,
    NumberOfTubes,
    VoidFraction,
    Duty,
    PressureDrop,
}

impl PropertyKind for ReactorProperty {
    fn all() -> &'static [Self] {
        &[
            Self::Length,
            Self::Diameter,
            Self::NumberOfTubes,
            Self::VoidFraction,
            Self::Duty,
            Self::PressureDrop,
        ]
    }

    fn canonical_name(self) -> &'static str {
        match self {
            Self::Length => "LENGTH",
            Self::Diameter => "DIAMETER",
            Self::NumberOfTubes => "NUMBER_OF_TUBES",
            Self::VoidFraction => "VOID_FRACTION",
            Self::Duty => "DUTY",
            Self::PressureDrop => "PRESSURE_DROP",
        }
    }

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::NumberOfTubes => &["TUBES", "NUMBEROFTUBES"],
            Self::VoidFraction => &["VOIDFRACTION"],
            Self::PressureDrop => &["PRESSUREDROP", "DELTA_P"],
            _ => &[],
        }
    }

    fn default_unit(self) -> &'static str {
        match self {
            Self::Length | Self::Diameter => "m",
            Self::NumberOfTubes | Self::VoidFraction => "",
            Self::Duty => "kW",
            Self::PressureDrop => "bar",
        }
    }
}

impl RemoteProperty for ReactorProperty {
    fn remote_name(self) -> &'static str {
        match self {
            Self::Length => "Length",
            Self::Diameter => "Diameter",
            Self::NumberOfTubes => "NumberOfTubes",
            Self::VoidFraction => "VoidFraction",
            Self::Duty => "Duty",
            Self::PressureDrop => "PressureDrop",
        }
    }
}

#[derive(Debug)]
pub struct PlugFlowReactor {
    core: EntityCore,
}

impl PlugFlowReactor {
    pub fn new(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        Ok(Self {
            core: EntityCore::operation(handle)?,
        })
    }

    pub(crate) fn wrap(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<UnitOperation> {
        Self::new(handle).map(UnitOperation::PlugFlowReactor)
    }

    pub fn length(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ReactorProperty::Length, unit)
    }

    pub fn set_length(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ReactorProperty::Length, value, unit)
    }

    pub fn diameter(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ReactorProperty::Diameter, unit)
    }

    pub fn set_diameter(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ReactorProperty::Diameter, value, unit)
    }

    pub fn number_of_tubes(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ReactorProperty::NumberOfTubes, unit)
    }

    pub fn set_number_of_tubes(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ReactorProperty::NumberOfTubes, value, unit)
    }

    pub fn void_fraction(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ReactorProperty::VoidFraction, unit)
    }

    pub fn set_void_fraction(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ReactorProperty::VoidFraction, value, unit)
    }

    pub fn duty(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ReactorProperty::Duty, unit)
    }

    pub fn set_duty(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ReactorProperty::Duty, value, unit)
    }

    pub fn pressure_drop(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ReactorProperty::PressureDrop, unit)
    }

    pub fn set_pressure_drop(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ReactorProperty::PressureDrop, value, unit)
    }

    fn write(&self, kind: ReactorProperty, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        access::write(self.handle(), self.name(), kind, value, unit)
    }
}

impl Entity for PlugFlowReactor {
    fn core(&self) -> &EntityCore {
        &self.core
    }
}

impl PropertyDispatch for PlugFlowReactor {
    type Kind = ReactorProperty;

    fn registry() -> &'static Registry<Self, ReactorProperty, FlowsheetError> {
        static REGISTRY: OnceLock<Registry<PlugFlowReactor, ReactorProperty, FlowsheetError>> =
            OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::builder("plug-flow reactor")
                .read_write(ReactorProperty::Length, Self::length, Self::set_length)
                .read_write(ReactorProperty::Diameter, Self::diameter, Self::set_diameter)
                .read_write(
                    ReactorProperty::NumberOfTubes,
                    Self::number_of_tubes,
                    Self::set_number_of_tubes,
                )
                .read_write(
                    ReactorProperty::VoidFraction,
                    Self::void_fraction,
                    Self::set_void_fraction,
                )
                .read_write(ReactorProperty::Duty, Self::duty, Self::set_duty)
                .read_write(
                    ReactorProperty::PressureDrop,
                    Self::pressure_drop,
                    Self::set_pressure_drop,
                )
                .build()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_property_is_writable() {
        let registry = PlugFlowReactor::registry();
        for kind in ReactorProperty::all() {
            assert!(registry.is_writable(*kind), "{:?}", kind);
        }
        assert_eq!(registry.resolve("delta_p"), Some(ReactorProperty::PressureDrop));
    }
}
