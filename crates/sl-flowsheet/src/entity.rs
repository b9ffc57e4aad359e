//! The capability every entity wrapper shares.

use sl_automation::{ObjectHandle, names};

use crate::error::FlowsheetResult;

/// Prefix of the synthetic upstream name recorded for a stream nothing feeds.
pub const FEED_PREFIX: &str = "<feed>:";

/// Prefix of the synthetic downstream name recorded for a stream nothing consumes.
pub const PRODUCT_PREFIX: &str = "<product>:";

/// Names of the objects on either side of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connections {
    pub upstream: Vec<String>,
    pub downstream: Vec<String>,
}

impl Connections {
    /// Connections of a stream; open ends get a synthetic boundary name.
    pub fn for_stream(name: &str, upstream: Vec<String>, downstream: Vec<String>) -> Self {
        let upstream = if upstream.is_empty() {
            vec![format!("{FEED_PREFIX}{name}")]
        } else {
            upstream
        };
        let downstream = if downstream.is_empty() {
            vec![format!("{PRODUCT_PREFIX}{name}")]
        } else {
            downstream
        };
        Self {
            upstream,
            downstream,
        }
    }

    /// Fed from outside the flowsheet.
    pub fn is_inlet(&self) -> bool {
        self.upstream.iter().any(|n| n.starts_with(FEED_PREFIX))
    }

    /// Leaves the flowsheet.
    pub fn is_outlet(&self) -> bool {
        self.downstream.iter().any(|n| n.starts_with(PRODUCT_PREFIX))
    }
}

/// Cached attributes of a wrapper, comparable across refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySnapshot {
    pub name: String,
    pub type_tag: String,
    pub connections: Connections,
}

/// One wrapped remote object.
pub trait Entity {
    fn core(&self) -> &EntityCore;

    fn name(&self) -> &str {
        &self.core().name
    }

    /// External type tag captured at construction.
    fn type_tag(&self) -> &str {
        &self.core().type_tag
    }

    fn connections(&self) -> &Connections {
        &self.core().connections
    }

    fn handle(&self) -> &dyn ObjectHandle {
        self.core().handle.as_ref()
    }

    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            name: self.name().to_string(),
            type_tag: self.type_tag().to_string(),
            connections: self.connections().clone(),
        }
    }
}

/// Handle plus the attributes read from it when the wrapper was built.
#[derive(Debug)]
pub struct EntityCore {
    pub(crate) handle: Box<dyn ObjectHandle>,
    pub(crate) name: String,
    pub(crate) type_tag: String,
    pub(crate) connections: Connections,
}

impl EntityCore {
    pub(crate) fn stream(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        let name = handle.name()?;
        let type_tag = handle.type_name()?;
        let connections = Connections::for_stream(
            &name,
            handle.names(names::UPSTREAM_OPERS)?,
            handle.names(names::DOWNSTREAM_OPERS)?,
        );
        Ok(Self {
            handle,
            name,
            type_tag,
            connections,
        })
    }

    pub(crate) fn operation(handle: Box<dyn ObjectHandle>) -> FlowsheetResult<Self> {
        let name = handle.name()?;
        let type_tag = handle.type_name()?;
        let connections = Connections {
            upstream: handle.names(names::ATTACHED_FEEDS)?,
            downstream: handle.names(names::ATTACHED_PRODUCTS)?,
        };
        Ok(Self {
            handle,
            name,
            type_tag,
            connections,
        })
    }
}

impl Entity for EntityCore {
    fn core(&self) -> &EntityCore {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ends_get_boundary_names() {
        let c = Connections::for_stream("Feed", vec![], vec!["E-100".to_string()]);
        assert_eq!(c.upstream, vec!["<feed>:Feed"]);
        assert!(c.is_inlet());
        assert!(!c.is_outlet());

        let c = Connections::for_stream("Mid", vec!["A".to_string()], vec!["B".to_string()]);
        assert!(!c.is_inlet());
        assert!(!c.is_outlet());
    }
}
