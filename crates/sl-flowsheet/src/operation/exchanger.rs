//! Heaters, coolers and shell-and-tube exchangers.

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
pub enum HeaterProperty {
    Duty,
    PressureDrop,
}

impl PropertyKind for HeaterProperty {
    fn all() -> &'static [Self] {
        &[Self::Duty, Self::PressureDrop]
    }

    fn canonical_name(self) -> &'static str {
        match self {
            Self::Duty => "DUTY",
            Self::PressureDrop => "PRESSURE_DROP",
        }
    }

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Duty => &["HEAT_FLOW", "HEATFLOW"],
            Self::PressureDrop => &["PRESSUREDROP", "DELTA_P", "DP"],
        }
    }

    fn default_unit(self) -> &'static str {
        match self {
            Self::Duty => "kW",
            Self::PressureDrop => "bar",
        }
    }
}

impl RemoteProperty for HeaterProperty {
    fn remote_name(self) -> &'static str {
        match self {
            Self::Duty => "Duty",
            Self::PressureDrop => "PressureDrop",
        }
    }
}

/// Heater or cooler.
#[derive(Debug)]
pub struct Heater {
    core: EntityCore,
}

impl Heater {
    pub fn new(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        Ok(Self {
            core: EntityCore::operation(handle)?,
        })
    }

    pub(crate) fn wrap(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<UnitOperation> {
        Self::new(handle).map(UnitOperation::Heater)
    }

    pub fn duty(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), HeaterProperty::Duty, unit)
    }

    pub fn set_duty(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        access::write(self.handle(), self.name(), HeaterProperty::Duty, value, unit)
    }

    pub fn pressure_drop(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), HeaterProperty::PressureDrop, unit)
    }

    pub fn set_pressure_drop(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        access::write(self.handle(), self.name(), HeaterProperty::PressureDrop, value, unit)
    }
}

impl Entity for Heater {
    fn core(&self) -> &EntityCore {
        &self.core
    }
}

impl PropertyDispatch for Heater {
    type Kind = HeaterProperty;

    fn registry() -> &'static Registry<Self, HeaterProperty, FlowsheetError> {
        static REGISTRY: OnceLock<Registry<Heater, HeaterProperty, FlowsheetError>> =
            OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::builder("heater")
                .read_write(HeaterProperty::Duty, Self::duty, Self::set_duty)
                .read_write(HeaterProperty::PressureDrop, Self::pressure_drop, Self::set_pressure_drop)
                .build()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangerProperty {
    Duty,
    TubePressureDrop,
    ShellPressureDrop,
}

impl PropertyKind for ExchangerProperty {
    fn all() -> &'static [Self] {
        &[Self::Duty, Self::TubePressureDrop, Self::ShellPressureDrop]
    }

    fn canonical_name(self) -> &'static str {
        match self {
            Self::Duty => "DUTY",
            Self::TubePressureDrop => "TUBE_PRESSURE_DROP",
            Self::ShellPressureDrop => "SHELL_PRESSURE_DROP",
        }
    }

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Duty => &["HEAT_FLOW", "HEATFLOW"],
            Self::TubePressureDrop => &["TUBE_DP", "TUBESIDE_PRESSURE_DROP"],
            Self::ShellPressureDrop => &["SHELL_DP", "SHELLSIDE_PRESSURE_DROP"],
        }
    }

    fn default_unit(self) -> &'static str {
        match self {
            Self::Duty => "kW",
            Self::TubePressureDrop | Self::ShellPressureDrop => "bar",
        }
    }
}

impl RemoteProperty for ExchangerProperty {
    fn remote_name(self) -> &'static str {
        match self {
            Self::Duty => "Duty",
            Self::TubePressureDrop => "TubeSidePressureDrop",
            Self::ShellPressureDrop => "ShellSidePressureDrop",
        }
    }
}

/// Two-sided heat exchanger.
#[derive(Debug)]
pub struct HeatExchanger {
    core: EntityCore,
}

impl HeatExchanger {
    pub fn new(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        Ok(Self {
            core: EntityCore::operation(handle)?,
        })
    }

    pub(crate) fn wrap(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<UnitOperation> {
        Self::new(handle).map(UnitOperation::HeatExchanger)
    }

    pub fn duty(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ExchangerProperty::Duty, unit)
    }

    pub fn set_duty(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ExchangerProperty::Duty, value, unit)
    }

    pub fn tube_pressure_drop(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ExchangerProperty::TubePressureDrop, unit)
    }

    pub fn set_tube_pressure_drop(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ExchangerProperty::TubePressureDrop, value, unit)
    }

    pub fn shell_pressure_drop(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), ExchangerProperty::ShellPressureDrop, unit)
    }

    pub fn set_shell_pressure_drop(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ExchangerProperty::ShellPressureDrop, value, unit)
    }

    fn write(&self, kind: ExchangerProperty, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        access::write(self.handle(), self.name(), kind, value, unit)
    }
}

impl Entity for HeatExchanger {
    fn core(&self) -> &EntityCore {
        &self.core
    }
}

impl PropertyDispatch for HeatExchanger {
    type Kind = ExchangerProperty;

    fn registry() -> &'static Registry<Self, ExchangerProperty, FlowsheetError> {
        static REGISTRY: OnceLock<Registry<HeatExchanger, ExchangerProperty, FlowsheetError>> =
            OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::builder("heat exchanger")
                .read_write(ExchangerProperty::Duty, Self::duty, Self::set_duty)
                .read_write(
                    ExchangerProperty::TubePressureDrop,
                    Self::tube_pressure_drop,
                    Self::set_tube_pressure_drop,
                )
                .read_write(
                    ExchangerProperty::ShellPressureDrop,
                    Self::shell_pressure_drop,
                    Self::set_shell_pressure_drop,
                )
                .build()
        })
    }
}
