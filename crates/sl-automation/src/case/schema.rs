//! Case file schema for the in-memory automation model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDef {
    pub title: String,
    pub fluid_package: FluidPackageDef,
    #[serde(default = "default_true")]
    pub solver_active: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub material_streams: Vec<StreamDef>,
    #[serde(default)]
    pub energy_streams: Vec<StreamDef>,
    #[serde(default)]
    pub operations: Vec<OperationDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidPackageDef {
    pub property_package: String,
    #[serde(default)]
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamDef {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vectors: BTreeMap<String, VectorDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationDef {
    pub name: String,
    /// External type tag, e.g. `heatexop`, `distillation`, `pfreactorop`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub feeds: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnDef>,
}

/// Sub-flowsheet owned by a column operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDef {
    #[serde(default)]
    pub operations: Vec<OperationDef>,
}

/// Scalar property. A missing `value` means the property is empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub state: StateDef,
}

/// Per-component property, ordered like the fluid package component list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorDef {
    pub values: Vec<Option<f64>>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub state: StateDef,
    /// Per-component overrides of `state`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<StateDef>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StateDef {
    #[default]
    Free,
    Calculated,
}

fn default_true() -> bool {
    true
}

impl PropertyDef {
    pub fn free(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            unit: unit.into(),
            state: StateDef::Free,
        }
    }

    pub fn calculated(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            unit: unit.into(),
            state: StateDef::Calculated,
        }
    }
}

impl StreamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            vectors: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, def: PropertyDef) -> Self {
        self.properties.insert(name.into(), def);
        self
    }

    pub fn with_vector(mut self, name: impl Into<String>, def: VectorDef) -> Self {
        self.vectors.insert(name.into(), def);
        self
    }
}

impl OperationDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            feeds: Vec::new(),
            products: Vec::new(),
            properties: BTreeMap::new(),
            column: None,
        }
    }

    pub fn with_feeds<I, S>(mut self, feeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feeds = feeds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, def: PropertyDef) -> Self {
        self.properties.insert(name.into(), def);
        self
    }

    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.column = Some(column);
        self
    }
}
