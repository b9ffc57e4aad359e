//! Request batches and dispatch reports.

use std::collections::BTreeMap;
use std::fmt;

use sl_core::Setpoint;

/// Ordered read requests: label and optional unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadBatch {
    requests: Vec<(String, Option<String>)>,
}

impl ReadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `label` in `unit`.
    pub fn with(mut self, label: impl Into<String>, unit: impl Into<String>) -> Self {
        self.push(label, Some(unit.into()));
        self
    }

    /// Request `label` in the property's default unit.
    pub fn with_default(mut self, label: impl Into<String>) -> Self {
        self.push(label, None);
        self
    }

    pub fn push(&mut self, label: impl Into<String>, unit: Option<String>) {
        self.requests.push((label.into(), unit));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.requests
            .iter()
            .map(|(label, unit)| (label.as_str(), unit.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, Option<String>)> for ReadBatch {
    fn from_iter<I: IntoIterator<Item = (L, Option<String>)>>(iter: I) -> Self {
        let mut batch = Self::new();
        for (label, unit) in iter {
            batch.push(label, unit);
        }
        batch
    }
}

/// One write request: the setpoint and an optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub setpoint: Setpoint,
    pub unit: Option<String>,
}

/// Ordered write requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    requests: Vec<(String, WriteRequest)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        label: impl Into<String>,
        setpoint: impl Into<Setpoint>,
        unit: impl Into<String>,
    ) -> Self {
        self.push(label, setpoint.into(), Some(unit.into()));
        self
    }

    pub fn with_default(mut self, label: impl Into<String>, setpoint: impl Into<Setpoint>) -> Self {
        self.push(label, setpoint.into(), None);
        self
    }

    pub fn push(&mut self, label: impl Into<String>, setpoint: Setpoint, unit: Option<String>) {
        self.requests
            .push((label.into(), WriteRequest { setpoint, unit }));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WriteRequest)> {
        self.requests.iter().map(|(label, req)| (label.as_str(), req))
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, WriteRequest)> for WriteBatch {
    fn from_iter<I: IntoIterator<Item = (L, WriteRequest)>>(iter: I) -> Self {
        let mut batch = Self::new();
        for (label, req) in iter {
            batch.push(label, req.setpoint, req.unit);
        }
        batch
    }
}

/// The single diagnostic a batch produces when some labels were not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProperties {
    /// Unrecognized labels, as the caller spelled them, in request order.
    pub labels: Vec<String>,
    /// Canonical names the registry accepts.
    pub accepted: Vec<&'static str>,
}

impl fmt::Display for UnknownProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Properties not found: {}. Accepted properties: {}",
            self.labels.join(", "),
            self.accepted.join(", ")
        )
    }
}

/// Outcome of a read batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    /// Original label → value, for recognized labels only. `None` is an empty value.
    pub values: BTreeMap<String, Option<f64>>,
    pub unknown: Option<UnknownProperties>,
}

impl ReadReport {
    pub fn value(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied().flatten()
    }
}

/// Outcome of a write batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    /// Labels written, in request order.
    pub applied: Vec<String>,
    pub unknown: Option<UnknownProperties>,
}
