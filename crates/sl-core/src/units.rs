//! Unit-string table for values exchanged with automation objects.
//!
//! Spellings follow the simulator's conventions (`"kg/h"`, `"kgmole/h"`, `"C"`, `"bar"`).
//! Matching is case-insensitive. Canonical values are SI:
//!
//! - mass flow: kg/s
//! - molar flow: mol/s
//! - volume flow: m³/s
//! - power: W
//! - pressure: Pa
//! - temperature: K
//! - length: m
//! - density: kg/m³
//! - dimensionless: plain ratio
//!
//! Flow units are parsed as `<numerator>/<time>` so any tabulated amount can be paired
//! with any tabulated time base.

use std::fmt;

use uom::si::f64::{
    AmountOfSubstance, Energy, Length, Mass, Power, Pressure, Ratio,
    ThermodynamicTemperature, Time, Volume,
};

/// Dimension/quantity family of a remote property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    MassFlow,
    MolarFlow,
    VolumeFlow,
    Power,
    Pressure,
    Temperature,
    Length,
    Density,
    Dimensionless,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MassFlow => write!(f, "Mass Flow"),
            Self::MolarFlow => write!(f, "Molar Flow"),
            Self::VolumeFlow => write!(f, "Volume Flow"),
            Self::Power => write!(f, "Power"),
            Self::Pressure => write!(f, "Pressure"),
            Self::Temperature => write!(f, "Temperature"),
            Self::Length => write!(f, "Length"),
            Self::Density => write!(f, "Density"),
            Self::Dimensionless => write!(f, "Dimensionless"),
        }
    }
}

/// Error in unit lookup or conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitError {
    /// Unit spelling not in the table
    UnknownUnit { unit: String },
    /// Unit exists but measures a different quantity
    DimensionMismatch {
        unit: String,
        expected: Quantity,
        found: Quantity,
    },
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUnit { unit } => write!(f, "Unknown unit '{}'", unit),
            Self::DimensionMismatch {
                unit,
                expected,
                found,
            } => write!(
                f,
                "Unit '{}' measures {} but {} was expected",
                unit, found, expected
            ),
        }
    }
}

impl std::error::Error for UnitError {}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scale {
    /// SI value = value * factor
    Linear(f64),
    Celsius,
    Fahrenheit,
}

/// A resolved unit: its quantity family and conversion to/from SI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub quantity: Quantity,
    scale: Scale,
}

impl UnitDef {
    const fn linear(quantity: Quantity, factor: f64) -> Self {
        Self {
            quantity,
            scale: Scale::Linear(factor),
        }
    }

    /// Convert a value expressed in this unit to canonical SI.
    pub fn to_si(&self, value: f64) -> f64 {
        use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        match self.scale {
            Scale::Linear(factor) => value * factor,
            Scale::Celsius => ThermodynamicTemperature::new::<degree_celsius>(value).get::<kelvin>(),
            Scale::Fahrenheit => {
                ThermodynamicTemperature::new::<degree_fahrenheit>(value).get::<kelvin>()
            }
        }
    }

    /// Convert a canonical SI value into this unit.
    pub fn from_si(&self, value: f64) -> f64 {
        use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        match self.scale {
            Scale::Linear(factor) => value / factor,
            Scale::Celsius => ThermodynamicTemperature::new::<kelvin>(value).get::<degree_celsius>(),
            Scale::Fahrenheit => {
                ThermodynamicTemperature::new::<kelvin>(value).get::<degree_fahrenheit>()
            }
        }
    }

    /// Require this unit to measure `expected`.
    pub fn ensure(self, expected: Quantity, unit: &str) -> Result<Self, UnitError> {
        if self.quantity == expected {
            Ok(self)
        } else {
            Err(UnitError::DimensionMismatch {
                unit: unit.to_string(),
                expected,
                found: self.quantity,
            })
        }
    }
}

/// Resolve a unit spelling.
pub fn parse_unit(unit: &str) -> Result<UnitDef, UnitError> {
    let key = unit.trim().to_lowercase();

    if let Some(def) = simple_unit(&key) {
        return Ok(def);
    }

    if let Some((numerator, denominator)) = key.split_once('/') {
        if let Some(seconds) = time_seconds(denominator.trim()) {
            let numerator = numerator.trim();
            let rate = |quantity, amount: f64| UnitDef::linear(quantity, amount / seconds);
            if let Some(kg) = mass_kg(numerator) {
                return Ok(rate(Quantity::MassFlow, kg));
            }
            if let Some(mol) = amount_mol(numerator) {
                return Ok(rate(Quantity::MolarFlow, mol));
            }
            if let Some(m3) = volume_m3(numerator) {
                return Ok(rate(Quantity::VolumeFlow, m3));
            }
            if let Some(j) = energy_j(numerator) {
                return Ok(rate(Quantity::Power, j));
            }
        }
    }

    Err(UnitError::UnknownUnit {
        unit: unit.to_string(),
    })
}

fn simple_unit(key: &str) -> Option<UnitDef> {
    use uom::si::length::{centimeter, foot, inch, meter, millimeter};
    use uom::si::power::{kilowatt, megawatt, watt};
    use uom::si::pressure::{
        atmosphere, bar, kilopascal, megapascal, pascal, pound_force_per_square_inch,
    };
    use uom::si::ratio::{percent, ratio};

    let def = match key {
        "" | "-" | "ratio" | "fraction" | "unitless" => {
            UnitDef::linear(Quantity::Dimensionless, 1.0)
        }
        "%" => UnitDef::linear(Quantity::Dimensionless, Ratio::new::<percent>(1.0).get::<ratio>()),

        "pa" => UnitDef::linear(Quantity::Pressure, 1.0),
        "kpa" => UnitDef::linear(Quantity::Pressure, Pressure::new::<kilopascal>(1.0).get::<pascal>()),
        "mpa" => UnitDef::linear(Quantity::Pressure, Pressure::new::<megapascal>(1.0).get::<pascal>()),
        "bar" => UnitDef::linear(Quantity::Pressure, Pressure::new::<bar>(1.0).get::<pascal>()),
        "atm" => UnitDef::linear(Quantity::Pressure, Pressure::new::<atmosphere>(1.0).get::<pascal>()),
        "psia" | "psi" => UnitDef::linear(
            Quantity::Pressure,
            Pressure::new::<pound_force_per_square_inch>(1.0).get::<pascal>(),
        ),

        "k" => UnitDef::linear(Quantity::Temperature, 1.0),
        "c" | "°c" => UnitDef {
            quantity: Quantity::Temperature,
            scale: Scale::Celsius,
        },
        "f" | "°f" => UnitDef {
            quantity: Quantity::Temperature,
            scale: Scale::Fahrenheit,
        },

        "w" => UnitDef::linear(Quantity::Power, 1.0),
        "kw" => UnitDef::linear(Quantity::Power, Power::new::<kilowatt>(1.0).get::<watt>()),
        // Simulator convention: "MW" is megawatt, never milliwatt.
        "mw" => UnitDef::linear(Quantity::Power, Power::new::<megawatt>(1.0).get::<watt>()),

        "m" => UnitDef::linear(Quantity::Length, 1.0),
        "cm" => UnitDef::linear(Quantity::Length, Length::new::<centimeter>(1.0).get::<meter>()),
        "mm" => UnitDef::linear(Quantity::Length, Length::new::<millimeter>(1.0).get::<meter>()),
        "ft" => UnitDef::linear(Quantity::Length, Length::new::<foot>(1.0).get::<meter>()),
        "in" => UnitDef::linear(Quantity::Length, Length::new::<inch>(1.0).get::<meter>()),

        "kg/m3" => UnitDef::linear(Quantity::Density, 1.0),
        _ => return None,
    };
    Some(def)
}

fn time_seconds(key: &str) -> Option<f64> {
    use uom::si::time::{day, hour, minute, second};
    let t = match key {
        "s" | "sec" => Time::new::<second>(1.0),
        "min" => Time::new::<minute>(1.0),
        "h" | "hr" => Time::new::<hour>(1.0),
        "d" | "day" => Time::new::<day>(1.0),
        _ => return None,
    };
    Some(t.get::<second>())
}

fn mass_kg(key: &str) -> Option<f64> {
    use uom::si::mass::{gram, kilogram, pound, ton};
    let m = match key {
        "kg" => Mass::new::<kilogram>(1.0),
        "g" => Mass::new::<gram>(1.0),
        "t" | "tonne" => Mass::new::<ton>(1.0),
        "lb" => Mass::new::<pound>(1.0),
        _ => return None,
    };
    Some(m.get::<kilogram>())
}

fn amount_mol(key: &str) -> Option<f64> {
    use uom::si::amount_of_substance::{kilomole, mole};
    let n = match key {
        "kgmole" | "kmol" => AmountOfSubstance::new::<kilomole>(1.0),
        "gmole" | "mol" => AmountOfSubstance::new::<mole>(1.0),
        // pound-mole: 453.59237 mol
        "lbmole" => AmountOfSubstance::new::<mole>(453.592_37),
        _ => return None,
    };
    Some(n.get::<mole>())
}

fn volume_m3(key: &str) -> Option<f64> {
    use uom::si::volume::{cubic_foot, cubic_meter, liter};
    let v = match key {
        "m3" => Volume::new::<cubic_meter>(1.0),
        "l" => Volume::new::<liter>(1.0),
        "ft3" => Volume::new::<cubic_foot>(1.0),
        _ => return None,
    };
    Some(v.get::<cubic_meter>())
}

fn energy_j(key: &str) -> Option<f64> {
    use uom::si::energy::{joule, kilojoule, megajoule};
    let e = match key {
        "j" => Energy::new::<joule>(1.0),
        "kj" => Energy::new::<kilojoule>(1.0),
        "mj" => Energy::new::<megajoule>(1.0),
        _ => return None,
    };
    Some(e.get::<joule>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tolerance;

    fn close(a: f64, b: f64) -> bool {
        Tolerance::READBACK.matches(a, b)
    }

    #[test]
    fn mass_flow_per_hour() {
        let def = parse_unit("kg/h").unwrap();
        assert_eq!(def.quantity, Quantity::MassFlow);
        assert!(close(def.to_si(3600.0), 1.0));
        assert!(close(def.from_si(1.0), 3600.0));
    }

    #[test]
    fn molar_flow_kgmole() {
        let def = parse_unit("kgmole/h").unwrap();
        assert_eq!(def.quantity, Quantity::MolarFlow);
        assert!(close(def.to_si(3.6), 1.0));
    }

    #[test]
    fn energy_rate_is_power() {
        let def = parse_unit("kJ/h").unwrap();
        assert_eq!(def.quantity, Quantity::Power);
        assert!(close(def.to_si(3600.0), 1000.0));
    }

    #[test]
    fn celsius_offset() {
        let def = parse_unit("C").unwrap();
        assert!(close(def.to_si(25.0), 298.15));
        assert!(close(def.from_si(273.15), 0.0));
    }

    #[test]
    fn density_is_not_a_rate() {
        assert_eq!(parse_unit("kg/m3").unwrap().quantity, Quantity::Density);
    }

    #[test]
    fn pressure_units_agree() {
        let bar = parse_unit("bar").unwrap();
        let kpa = parse_unit("kPa").unwrap();
        assert!(close(bar.to_si(1.0), kpa.to_si(100.0)));
    }

    #[test]
    fn unknown_unit() {
        let err = parse_unit("furlong/fortnight").unwrap_err();
        assert!(matches!(err, UnitError::UnknownUnit { .. }));
    }

    #[test]
    fn dimension_mismatch() {
        let err = parse_unit("bar")
            .unwrap()
            .ensure(Quantity::Temperature, "bar")
            .unwrap_err();
        assert!(err.to_string().contains("Pressure"));
    }
}
