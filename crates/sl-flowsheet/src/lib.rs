//! sl-flowsheet: typed wrappers over a simulation case.
//!
//! A [`Simulation`] attaches to a case through any [`sl_automation::Application`] and
//! builds named collections of wrappers:
//! - [`MaterialStream`] / [`EnergyStream`]
//! - [`UnitOperation`], classified by the remote type tag into heaters, heat exchangers,
//!   distillation columns, plug-flow reactors or a generic wrapper
//!
//! Every named accessor is one remote round trip. Writes check the remote property state
//! first and refuse anything that is not free. [`PropertyDispatch`] adds bulk access by
//! property label on top of the named accessors.

mod access;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod operation;
pub mod session;
pub mod stream;

pub use access::RemoteProperty;
pub use dispatch::PropertyDispatch;
pub use entity::{Connections, Entity, EntityCore, EntitySnapshot, FEED_PREFIX, PRODUCT_PREFIX};
pub use error::{FlowsheetError, FlowsheetResult};
pub use operation::{
    ColumnProperty, DistillationColumn, ExchangerProperty, GenericOperation, HeatExchanger, Heater,
    HeaterProperty, OperationKind, PlugFlowReactor, ReactorProperty, UnitOperation,
};
pub use session::{CaseSource, FlowsheetSnapshot, Simulation};
pub use stream::{ComponentProperty, EnergyProperty, EnergyStream, MaterialStream, StreamProperty};

// Callers build batches and setpoints without naming the lower crates.
pub use sl_core::Setpoint;
pub use sl_registry::{ReadBatch, ReadReport, UnknownProperties, WriteBatch, WriteReport};
