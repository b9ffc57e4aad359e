//! Single-property round trips shared by every wrapper.

use sl_automation::ObjectHandle;
use sl_core::{Setpoint, sentinel};
use sl_registry::PropertyKind;
use tracing::debug;

use crate::error::{FlowsheetError, FlowsheetResult};

/// A property kind backed by one named remote property.
pub trait RemoteProperty: PropertyKind {
    fn remote_name(self) -> &'static str;
}

/// One remote read. The empty sentinel comes back as `None`.
pub(crate) fn read<K: RemoteProperty>(
    handle: &dyn ObjectHandle,
    kind: K,
    unit: &str,
) -> FlowsheetResult<Option<f64>> {
    let property = kind.remote_name();
    let raw = handle.get_value(property, unit)?;
    debug!(property, unit, raw, "get");
    Ok(sentinel::decode(raw))
}

/// One remote write, only after the remote object reports the property as free.
///
/// `Setpoint::Empty` is sent as the sentinel in the property's default unit.
pub(crate) fn write<K: RemoteProperty>(
    handle: &dyn ObjectHandle,
    owner: &str,
    kind: K,
    setpoint: Setpoint,
    unit: &str,
) -> FlowsheetResult<()> {
    let property = kind.remote_name();
    let state = handle.property_state(property)?;
    if !state.is_free() {
        return Err(FlowsheetError::NotFree {
            entity: owner.to_string(),
            property: property.to_string(),
            state,
        });
    }
    let (raw, unit) = setpoint.encode(unit, kind.default_unit())?;
    debug!(owner, property, raw, unit, "set");
    handle.set_value(property, raw, unit)?;
    Ok(())
}
