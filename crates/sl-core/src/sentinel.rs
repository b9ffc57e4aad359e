//! The "empty" setpoint.
//!
//! Automation objects clear a specified input when they are written with the numeric
//! sentinel [`EMPTY_VALUE`], and report the same number back when read while empty.
//! Callers never see that number: writes take a [`Setpoint`] and reads return
//! `Option<f64>`, and the translation happens where the remote call is made.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, ensure_finite};

/// Numeric value the external application interprets as "no value".
pub const EMPTY_VALUE: f64 = -32767.0;

/// Marker accepted in text input in place of a number.
pub const EMPTY_MARKER: &str = "empty";

/// Whether a raw remote reading is the empty sentinel.
pub fn is_empty_value(raw: f64) -> bool {
    raw == EMPTY_VALUE
}

/// Map a raw remote reading to `None` when it is the empty sentinel.
pub fn decode(raw: f64) -> Option<f64> {
    (!is_empty_value(raw)).then_some(raw)
}

/// Value for a write: a number, or a request to clear the degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setpoint {
    Value(f64),
    Empty,
}

impl Setpoint {
    /// Raw number and unit to send for this setpoint.
    ///
    /// `Empty` ignores `unit` and always goes out with `fixed_unit`.
    pub fn encode<'a>(self, unit: &'a str, fixed_unit: &'a str) -> Result<(f64, &'a str), CoreError> {
        match self {
            Setpoint::Value(v) => Ok((ensure_finite(v, "setpoint")?, unit)),
            Setpoint::Empty => Ok((EMPTY_VALUE, fixed_unit)),
        }
    }
}

impl From<f64> for Setpoint {
    fn from(v: f64) -> Self {
        Setpoint::Value(v)
    }
}

impl FromStr for Setpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(EMPTY_MARKER) {
            return Ok(Setpoint::Empty);
        }
        trimmed
            .parse::<f64>()
            .map(Setpoint::Value)
            .map_err(|_| CoreError::InvalidArg {
                what: format!("'{}' is neither a number nor '{}'", trimmed, EMPTY_MARKER),
            })
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setpoint::Value(v) => write!(f, "{}", v),
            Setpoint::Empty => write!(f, "{}", EMPTY_MARKER),
        }
    }
}
