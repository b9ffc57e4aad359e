//! Distillation columns and absorbers.
//!
//! The column operation owns a sub-flowsheet; stage count and stage pressures live on the
//! main tower inside it. A column whose main tower cannot be found still wraps, and only
//! the tower-backed accessors fail.

use std::sync::OnceLock;

use sl_automation::{ObjectHandle, names};
use sl_core::Setpoint;
use sl_registry::{PropertyKind, Registry};
use tracing::debug;

use super::UnitOperation;
use crate::access::{self, RemoteProperty};
use crate::dispatch::PropertyDispatch;
use crate::entity::{Entity, EntityCore};
use crate::error::{FlowsheetError, FlowsheetResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnProperty {
    RefluxRatio,
    NumberOfStages,
    TopPressure,
    BottomPressure,
}

impl PropertyKind for ColumnProperty {
    fn all() -> &'static [Self] {
        &[
            Self::RefluxRatio,
            Self::NumberOfStages,
            Self::TopPressure,
            Self::BottomPressure,
        ]
    }

    fn canonical_name(self) -> &'static str {
        match self {
            Self::RefluxRatio => "REFLUX_RATIO",
            Self::NumberOfStages => "NUMBER_OF_STAGES",
            Self::TopPressure => "TOP_PRESSURE",
            Self::BottomPressure => "BOTTOM_PRESSURE",
        }
    }

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::RefluxRatio => &["REFLUXRATIO"],
            Self::NumberOfStages => &["STAGES", "NUMBER_OF_TRAYS", "TRAYS"],
            Self::TopPressure => &["TOP_STAGE_PRESSURE"],
            Self::BottomPressure => &["BOTTOM_STAGE_PRESSURE"],
        }
    }

    fn default_unit(self) -> &'static str {
        match self {
            Self::RefluxRatio | Self::NumberOfStages => "",
            Self::TopPressure | Self::BottomPressure => "bar",
        }
    }
}

impl RemoteProperty for ColumnProperty {
    fn remote_name(self) -> &'static str {
        match self {
            Self::RefluxRatio => "RefluxRatio",
            Self::NumberOfStages => "NumberOfTrays",
            Self::TopPressure => "TopStagePressure",
            Self::BottomPressure => "BottomStagePressure",
        }
    }
}

impl ColumnProperty {
    fn on_tower(self) -> bool {
        !matches!(self, Self::RefluxRatio)
    }
}

#[derive(Debug)]
pub struct DistillationColumn {
    core: EntityCore,
    tower: Option<Box<dyn ObjectHandle>>,
}

impl DistillationColumn {
    pub fn new(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        let core = EntityCore::operation(handle)?;
        let tower = match core
            .handle()
            .child(names::COLUMN_FLOWSHEET)
            .and_then(|sub| sub.item(names::OPERATIONS, names::MAIN_TOWER))
        {
            Ok(tower) => Some(tower),
            Err(e) => {
                debug!(column = core.name(), error = %e, "main tower not located");
                None
            }
        };
        Ok(Self { core, tower })
    }

    pub(crate) fn wrap(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<UnitOperation> {
        Self::new(handle).map(UnitOperation::Column)
    }

    pub fn has_main_tower(&self) -> bool {
        self.tower.is_some()
    }

    /// The main tower inside the column sub-flowsheet.
    pub fn main_tower(&self) -> FlowsheetResult<&dyn ObjectHandle> {
        self.tower
            .as_deref()
            .ok_or_else(|| FlowsheetError::NotLocated {
                column: self.name().to_string(),
            })
    }

    pub fn reflux_ratio(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        self.read(ColumnProperty::RefluxRatio, unit)
    }

    pub fn set_reflux_ratio(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ColumnProperty::RefluxRatio, value, unit)
    }

    pub fn number_of_stages(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        self.read(ColumnProperty::NumberOfStages, unit)
    }

    pub fn set_number_of_stages(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ColumnProperty::NumberOfStages, value, unit)
    }

    pub fn top_pressure(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        self.read(ColumnProperty::TopPressure, unit)
    }

    pub fn set_top_pressure(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ColumnProperty::TopPressure, value, unit)
    }

    pub fn bottom_pressure(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        self.read(ColumnProperty::BottomPressure, unit)
    }

    pub fn set_bottom_pressure(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(ColumnProperty::BottomPressure, value, unit)
    }

    fn target(&self, kind: ColumnProperty) -> FlowsheetResult<&dyn ObjectHandle> {
        if kind.on_tower() {
            self.main_tower()
        } else {
            Ok(self.handle())
        }
    }

    fn read(&self, kind: ColumnProperty, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.target(kind)?, kind, unit)
    }

    fn write(&self, kind: ColumnProperty, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        access::write(self.target(kind)?, self.name(), kind, value, unit)
    }
}

impl Entity for DistillationColumn {
    fn core(&self) -> &EntityCore {
        &self.core
    }
}

impl PropertyDispatch for DistillationColumn {
    type Kind = ColumnProperty;

    fn registry() -> &'static Registry<Self, ColumnProperty, FlowsheetError> {
        static REGISTRY: OnceLock<Registry<DistillationColumn, ColumnProperty, FlowsheetError>> =
            OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::builder("column")
                .read_write(ColumnProperty::RefluxRatio, Self::reflux_ratio, Self::set_reflux_ratio)
                .read_write(
                    ColumnProperty::NumberOfStages,
                    Self::number_of_stages,
                    Self::set_number_of_stages,
                )
                .read_write(ColumnProperty::TopPressure, Self::top_pressure, Self::set_top_pressure)
                .read_write(
                    ColumnProperty::BottomPressure,
                    Self::bottom_pressure,
                    Self::set_bottom_pressure,
                )
                .build()
        })
    }
}
