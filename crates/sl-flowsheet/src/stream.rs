//! Material and energy stream wrappers.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::OnceLock;

use sl_automation::{AutomationError, ObjectHandle};
use sl_core::{EMPTY_VALUE, Setpoint, sentinel};
use sl_registry::{PropertyKind, Registry};
use tracing::debug;

use crate::access::{self, RemoteProperty};
use crate::dispatch::PropertyDispatch;
use crate::entity::{Entity, EntityCore};
use crate::error::{FlowsheetError, FlowsheetResult};

/// Scalar properties of a material stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamProperty {
    Pressure,
    Temperature,
    MassFlow,
    MolarFlow,
    VolumeFlow,
    VapourFraction,
    MassDensity,
}

impl PropertyKind for StreamProperty {
    fn all() -> &'static [Self] {
        &[
            Self::Pressure,
            Self::Temperature,
            Self::MassFlow,
            Self::MolarFlow,
            Self::VolumeFlow,
            Self::VapourFraction,
            Self::MassDensity,
        ]
    }

    fn canonical_name(self) -> &'static str {
        match self {
            Self::Pressure => "PRESSURE",
            Self::Temperature => "TEMPERATURE",
            Self::MassFlow => "MASS_FLOW",
            Self::MolarFlow => "MOLAR_FLOW",
            Self::VolumeFlow => "VOLUME_FLOW",
            Self::VapourFraction => "VAPOUR_FRACTION",
            Self::MassDensity => "MASS_DENSITY",
        }
    }

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::MassFlow => &["MASSFLOW"],
            Self::MolarFlow => &["MOLARFLOW"],
            Self::VolumeFlow => &["VOLFLOW", "VOLUMEFLOW"],
            Self::VapourFraction => &["VAPOURFRACTION", "VAPOR_FRACTION", "VAPORFRACTION"],
            Self::MassDensity => &["MASSDENSITY", "DENSITY"],
            _ => &[],
        }
    }

    fn default_unit(self) -> &'static str {
        match self {
            Self::Pressure => "bar",
            Self::Temperature => "C",
            Self::MassFlow => "kg/h",
            Self::MolarFlow => "kgmole/h",
            Self::VolumeFlow => "m3/h",
            Self::VapourFraction => "",
            Self::MassDensity => "kg/m3",
        }
    }
}

impl RemoteProperty for StreamProperty {
    fn remote_name(self) -> &'static str {
        match self {
            Self::Pressure => "Pressure",
            Self::Temperature => "Temperature",
            Self::MassFlow => "MassFlow",
            Self::MolarFlow => "MolarFlow",
            Self::VolumeFlow => "ActualVolumeFlow",
            Self::VapourFraction => "VapourFraction",
            Self::MassDensity => "MassDensity",
        }
    }
}

/// Per-component properties of a material stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentProperty {
    MassFlow,
    MolarFlow,
    MassFraction,
    MolarFraction,
}

impl ComponentProperty {
    pub fn remote_name(self) -> &'static str {
        match self {
            Self::MassFlow => "ComponentMassFlow",
            Self::MolarFlow => "ComponentMolarFlow",
            Self::MassFraction => "ComponentMassFraction",
            Self::MolarFraction => "ComponentMolarFraction",
        }
    }

    pub fn default_unit(self) -> &'static str {
        match self {
            Self::MassFlow => "kg/h",
            Self::MolarFlow => "kgmole/h",
            Self::MassFraction | Self::MolarFraction => "",
        }
    }
}

/// One material stream of the flowsheet.
#[derive(Debug)]
pub struct MaterialStream {
    core: EntityCore,
    components: Rc<[String]>,
}

impl MaterialStream {
    /// Wrap a stream handle. `components` is the fluid package component list.
    pub fn new(handle: Box<dyn ObjectHandle>, components: Rc<[String]>) -> FlowsheetResult<Self> {
        Ok(Self {
            core: EntityCore::stream(handle)?,
            components,
        })
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn pressure(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), StreamProperty::Pressure, unit)
    }

    pub fn set_pressure(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(StreamProperty::Pressure, value, unit)
    }

    pub fn temperature(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), StreamProperty::Temperature, unit)
    }

    pub fn set_temperature(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(StreamProperty::Temperature, value, unit)
    }

    pub fn mass_flow(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), StreamProperty::MassFlow, unit)
    }

    pub fn set_mass_flow(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(StreamProperty::MassFlow, value, unit)
    }

    pub fn molar_flow(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), StreamProperty::MolarFlow, unit)
    }

    pub fn set_molar_flow(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(StreamProperty::MolarFlow, value, unit)
    }

    pub fn volume_flow(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), StreamProperty::VolumeFlow, unit)
    }

    pub fn set_volume_flow(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(StreamProperty::VolumeFlow, value, unit)
    }

    pub fn vapour_fraction(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), StreamProperty::VapourFraction, unit)
    }

    pub fn set_vapour_fraction(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        self.write(StreamProperty::VapourFraction, value, unit)
    }

    /// Always calculated by the application.
    pub fn mass_density(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), StreamProperty::MassDensity, unit)
    }

    /// Component name → value. Empty entries are `None`.
    ///
    /// Fails when the remote vector and the component list differ in length.
    pub fn component_values(
        &self,
        property: ComponentProperty,
        unit: &str,
    ) -> FlowsheetResult<BTreeMap<String, Option<f64>>> {
        let remote = property.remote_name();
        let raw = self.handle().get_values(remote, unit)?;
        debug!(stream = self.name(), property = remote, unit, n = raw.len(), "get values");
        if raw.len() != self.components.len() {
            return Err(AutomationError::LengthMismatch {
                object: self.name().to_string(),
                property: remote.to_string(),
                expected: self.components.len(),
                found: raw.len(),
            }
            .into());
        }
        Ok(self
            .components
            .iter()
            .cloned()
            .zip(raw.into_iter().map(sentinel::decode))
            .collect())
    }

    /// Write a per-component property in one call.
    ///
    /// Components missing from `values` are written as zero and `Setpoint::Empty` entries
    /// as the empty sentinel. Every component's state must be free; otherwise nothing is
    /// written.
    pub fn set_component_values(
        &self,
        property: ComponentProperty,
        values: &BTreeMap<String, Setpoint>,
        unit: &str,
    ) -> FlowsheetResult<()> {
        let remote = property.remote_name();
        let full = self.expand(values)?;

        let states = self.handle().property_states(remote)?;
        if let Some((i, state)) = states.iter().enumerate().find(|(_, s)| !s.is_free()) {
            let component = self.components.get(i).map_or("?", String::as_str);
            return Err(FlowsheetError::NotFree {
                entity: self.name().to_string(),
                property: format!("{remote}[{component}]"),
                state: *state,
            });
        }

        let raw = full
            .iter()
            .map(|setpoint| match *setpoint {
                Setpoint::Value(v) => sl_core::ensure_finite(v, remote),
                Setpoint::Empty => Ok(EMPTY_VALUE),
            })
            .collect::<Result<Vec<f64>, _>>()?;
        debug!(stream = self.name(), property = remote, unit, "set values");
        self.handle().set_values(remote, &raw, unit)?;
        Ok(())
    }

    pub fn component_mass_flow(&self, unit: &str) -> FlowsheetResult<BTreeMap<String, Option<f64>>> {
        self.component_values(ComponentProperty::MassFlow, unit)
    }

    pub fn set_component_mass_flow(&self, values: &BTreeMap<String, Setpoint>, unit: &str) -> FlowsheetResult<()> {
        self.set_component_values(ComponentProperty::MassFlow, values, unit)
    }

    pub fn component_molar_flow(&self, unit: &str) -> FlowsheetResult<BTreeMap<String, Option<f64>>> {
        self.component_values(ComponentProperty::MolarFlow, unit)
    }

    pub fn set_component_molar_flow(&self, values: &BTreeMap<String, Setpoint>, unit: &str) -> FlowsheetResult<()> {
        self.set_component_values(ComponentProperty::MolarFlow, values, unit)
    }

    pub fn component_mass_fraction(&self) -> FlowsheetResult<BTreeMap<String, Option<f64>>> {
        self.component_values(ComponentProperty::MassFraction, ComponentProperty::MassFraction.default_unit())
    }

    pub fn set_component_mass_fraction(&self, values: &BTreeMap<String, Setpoint>) -> FlowsheetResult<()> {
        self.set_component_values(
            ComponentProperty::MassFraction,
            values,
            ComponentProperty::MassFraction.default_unit(),
        )
    }

    pub fn component_molar_fraction(&self) -> FlowsheetResult<BTreeMap<String, Option<f64>>> {
        self.component_values(ComponentProperty::MolarFraction, ComponentProperty::MolarFraction.default_unit())
    }

    pub fn set_component_molar_fraction(&self, values: &BTreeMap<String, Setpoint>) -> FlowsheetResult<()> {
        self.set_component_values(
            ComponentProperty::MolarFraction,
            values,
            ComponentProperty::MolarFraction.default_unit(),
        )
    }

    fn write(&self, kind: StreamProperty, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        access::write(self.handle(), self.name(), kind, value, unit)
    }

    /// Setpoints in component order, zero where not given.
    fn expand(&self, values: &BTreeMap<String, Setpoint>) -> FlowsheetResult<Vec<Setpoint>> {
        if let Some(unknown) = values.keys().find(|k| !self.components.contains(*k)) {
            return Err(FlowsheetError::UnknownComponent {
                component: unknown.clone(),
                known: self.components.join(", "),
            });
        }
        Ok(self
            .components
            .iter()
            .map(|c| values.get(c).copied().unwrap_or(Setpoint::Value(0.0)))
            .collect())
    }
}

impl Entity for MaterialStream {
    fn core(&self) -> &EntityCore {
        &self.core
    }
}

impl PropertyDispatch for MaterialStream {
    type Kind = StreamProperty;

    fn registry() -> &'static Registry<Self, StreamProperty, FlowsheetError> {
        static REGISTRY: OnceLock<Registry<MaterialStream, StreamProperty, FlowsheetError>> =
            OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::builder("material stream")
                .read_write(StreamProperty::Pressure, Self::pressure, Self::set_pressure)
                .read_write(StreamProperty::Temperature, Self::temperature, Self::set_temperature)
                .read_write(StreamProperty::MassFlow, Self::mass_flow, Self::set_mass_flow)
                .read_write(StreamProperty::MolarFlow, Self::molar_flow, Self::set_molar_flow)
                .read_write(StreamProperty::VolumeFlow, Self::volume_flow, Self::set_volume_flow)
                .read_write(
                    StreamProperty::VapourFraction,
                    Self::vapour_fraction,
                    Self::set_vapour_fraction,
                )
                .read_only(StreamProperty::MassDensity, Self::mass_density)
                .build()
        })
    }
}

/// Properties of an energy stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergyProperty {
    HeatFlow,
}

impl PropertyKind for EnergyProperty {
    fn all() -> &'static [Self] {
        &[Self::HeatFlow]
    }

    fn canonical_name(self) -> &'static str {
        "HEAT_FLOW"
    }

    fn synonyms(self) -> &'static [&'static str] {
        &["HEATFLOW", "POWER", "DUTY"]
    }

    fn default_unit(self) -> &'static str {
        "kW"
    }
}

impl RemoteProperty for EnergyProperty {
    fn remote_name(self) -> &'static str {
        "HeatFlow"
    }
}

/// One energy stream of the flowsheet.
#[derive(Debug)]
pub struct EnergyStream {
    core: EntityCore,
}

impl EnergyStream {
    pub fn new(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        Ok(Self {
            core: EntityCore::stream(handle)?,
        })
    }

    pub fn heat_flow(&self, unit: &str) -> FlowsheetResult<Option<f64>> {
        access::read(self.handle(), EnergyProperty::HeatFlow, unit)
    }

    pub fn set_heat_flow(&self, value: Setpoint, unit: &str) -> FlowsheetResult<()> {
        access::write(self.handle(), self.name(), EnergyProperty::HeatFlow, value, unit)
    }
}

impl Entity for EnergyStream {
    fn core(&self) -> &EntityCore {
        &self.core
    }
}

impl PropertyDispatch for EnergyStream {
    type Kind = EnergyProperty;

    fn registry() -> &'static Registry<Self, EnergyProperty, FlowsheetError> {
        static REGISTRY: OnceLock<Registry<EnergyStream, EnergyProperty, FlowsheetError>> =
            OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::builder("energy stream")
                .read_write(EnergyProperty::HeatFlow, Self::heat_flow, Self::set_heat_flow)
                .build()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_registry::canonicalize;
    use std::collections::HashSet;

    #[test]
    fn stream_spellings_are_unique() {
        let mut seen = HashSet::new();
        for kind in StreamProperty::all() {
            for spelling in std::iter::once(kind.canonical_name()).chain(kind.synonyms().iter().copied()) {
                assert_eq!(canonicalize(spelling), spelling, "{spelling} is not canonical");
                assert!(seen.insert(spelling), "{spelling} used twice");
            }
        }
    }

    #[test]
    fn default_units_parse() {
        for kind in StreamProperty::all() {
            assert!(sl_core::parse_unit(kind.default_unit()).is_ok(), "{:?}", kind);
        }
        assert!(sl_core::parse_unit(EnergyProperty::HeatFlow.default_unit()).is_ok());
    }

    #[test]
    fn density_is_read_only() {
        let registry = MaterialStream::registry();
        assert!(!registry.is_writable(StreamProperty::MassDensity));
        assert!(registry.is_writable(StreamProperty::MassFlow));
        assert_eq!(registry.resolve("volflow"), Some(StreamProperty::VolumeFlow));
    }
}
