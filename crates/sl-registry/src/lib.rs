//! sl-registry: named-property dispatch for entity wrappers.
//!
//! A [`Registry`] maps an enumerated [`PropertyKind`] to a getter/setter pair bound to an
//! entity type. Bulk requests name properties by label; labels are canonicalized
//! (trimmed, ASCII upper-case) and matched exactly against each kind's canonical name
//! and synonyms.
//!
//! Dispatch rules:
//! - requests run strictly in batch order, one accessor call at a time
//! - unrecognized labels are collected and reported once per batch
//! - an accessor error aborts the rest of the batch

pub mod batch;
pub mod error;
pub mod kind;
pub mod registry;

pub use batch::{ReadBatch, ReadReport, UnknownProperties, WriteBatch, WriteReport, WriteRequest};
pub use error::DispatchError;
pub use kind::{PropertyKind, canonicalize};
pub use registry::{Accessor, Getter, Registry, RegistryBuilder, Setter};
