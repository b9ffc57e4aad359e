//! Float checks for values crossing the automation boundary.

use crate::CoreError;

/// Reject NaN and infinities before they are sent to a remote object.
pub fn ensure_finite(value: f64, what: &'static str) -> Result<f64, CoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::NonFinite { what, value })
    }
}

/// Comparison tolerance for values that went through a unit conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerance {
    /// A value written in one unit and read back in another.
    pub const READBACK: Self = Self {
        abs: 1e-9,
        rel: 1e-9,
    };

    pub fn matches(self, a: f64, b: f64) -> bool {
        let diff = (a - b).abs();
        diff <= self.abs || diff <= self.rel * a.abs().max(b.abs())
    }
}
